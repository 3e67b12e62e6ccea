//! Personal attendance tracker. Keeps a log of working days in a single json file and reports
//! hours worked per day.
//!

pub mod cli;
pub mod query;
pub mod storage;
pub mod submission;
pub mod utils;
pub mod worktime;
