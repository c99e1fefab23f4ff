mod lineage;
mod search;
mod source;
mod task;

pub use lineage::LineageCommands;
pub use search::{ColumnCommands, SchemaCommands, SearchArgs, TableCommands};
pub use source::SourceCommands;
pub use task::TaskCommands;
