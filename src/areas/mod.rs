//! Repository-side state and process plumbing
//!
//! - `checkpoints`: persisted record of the pending review
//! - `config`: user configuration file
//! - `repository`: entry point tying the runner, output writer and stores together
//! - `runner`: execution of git subcommands

pub mod checkpoints;
pub mod config;
pub mod repository;
pub mod runner;
