//! Course Lab
//!
//! Self-contained teaching units grouped by topic. Every unit can be read,
//! run and tested on its own; the demo binaries under `src/bin` walk through
//! them one topic at a time.

pub mod config;
pub mod error;
pub mod logging;

// Design patterns
pub mod patterns;

// Language basics
pub mod basics;
pub mod control_flow;
pub mod data_structures;
pub mod functions;

// Concurrency primitives
pub mod concurrency;

// Web, databases and testing
pub mod database;
pub mod testing;
pub mod web;

pub use config::CourseConfig;
pub use error::{CourseError, Result};
