//! Plumbing commands (read-only queries against the working copy)
//!
//! - `rev_parse`: repository check, git directory, current branch, last commit
//! - `remote`: origin url and the owner/repo pair parsed from it

pub mod remote;
pub mod rev_parse;
