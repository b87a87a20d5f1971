//! Review checkpoints
//!
//! A checkpoint remembers where a review session started so it can be undone:
//!
//! - `checkpoint`: the persisted record and the review target
//! - `transition`: switch/restore phases and the compensation for each
//! - `error`: failures surfaced by the switch and restore operations
//! - `outcome`: results of successful switch and restore operations

pub mod checkpoint;
pub mod error;
pub mod outcome;
pub mod transition;

/// Subject of the synthetic commit that carries uncommitted work across a switch
pub const WIP_SENTINEL: &str = "[CASTOR WIP]";

/// Diagnostics git prints when `commit` has nothing staged
pub const NOTHING_TO_COMMIT_REGEX: &str =
    r"(?m)^(nothing to commit|nothing added to commit|no changes added to commit)";
