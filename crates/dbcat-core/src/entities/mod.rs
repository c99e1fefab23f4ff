//! Entity structs for all catalog objects.
//!
//! Each entity maps to a table in the catalog store. Hierarchy entities carry
//! the names of their ancestors so that [`Fqdn`](crate::fqdn::Fqdn) can be
//! derived without another round trip.

mod column;
mod job;
mod lineage;
mod schema;
mod source;
mod table;
mod task;

pub use column::Column;
pub use job::{Job, JobExecution};
pub use lineage::ColumnLineage;
pub use schema::Schema;
pub use source::{DefaultSchema, Source};
pub use table::Table;
pub use task::Task;
