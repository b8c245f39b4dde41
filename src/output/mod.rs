//! Output module for reporting recorded runs
//!
//! This module handles reading run and link metrics back out of storage
//! and presenting them.

pub mod stats;

pub use stats::{load_statistics, print_statistics, write_statistics, RunStatistics};
