//! Code under test for the testing unit: table-driven cases, coverage of
//! error paths, benchmark subjects and parallel test helpers.

pub mod calculator;
pub mod fibonacci;
pub mod parallel;
pub mod user_service;
