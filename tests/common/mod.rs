#![allow(dead_code)]

pub mod command;
pub mod file;

pub const MAIN_BRANCH: &str = "main";
pub const REVIEW_BRANCH: &str = "feature-9";
pub const WIP_SUBJECT: &str = "[CASTOR WIP]";
