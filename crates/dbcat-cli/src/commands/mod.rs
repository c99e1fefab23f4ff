pub mod dispatch;
pub mod init;
pub mod lineage;
pub mod search;
pub mod source;
pub mod task;
