#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![warn(clippy::must_use_candidate)]
//! Fault injection trials for symbol based error correcting codes.
//!
//! Codewords are corrupted with patterns modeled after DRAM subarray failures and every decode
//! attempt is classified as corrected, uncorrectable or a silent corruption.

pub mod classify;
pub mod config;
pub mod counters;
pub mod encoding;
pub mod fault;
pub mod prelude;
pub mod report;
pub mod runner;
