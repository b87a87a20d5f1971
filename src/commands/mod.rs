//! Command implementations
//!
//! - `plumbing`: Read-only git queries (rev-parse lookups, remote lookup)
//! - `porcelain`: The review workflow built on top of them (review, back, status)

pub mod plumbing;
pub mod porcelain;
