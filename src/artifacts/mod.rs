//! Domain types
//!
//! - `branch`: Validated branch names
//! - `checkpoint`: The pending review record, switch/restore state machines and their errors
//! - `remote`: Remote URL parsing into `owner/repo`

pub mod branch;
pub mod checkpoint;
pub mod remote;
