//! Porcelain commands (user-facing review workflow)
//!
//! Each command is an `impl Repository` block composed from the plumbing
//! queries and the checkpoint store.
//!
//! ## Commands
//!
//! - `review`: Save work in progress and switch to a pull request branch
//! - `back`: Return to the original branch and unpack the saved work
//! - `status`: Show the pending review, if any

pub mod back;
pub mod review;
pub mod status;
