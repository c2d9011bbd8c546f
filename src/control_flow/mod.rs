//! Loops, conditionals and `match` as value-returning functions.

pub mod break_continue;
pub mod for_loops;
pub mod if_statements;
pub mod switch_statements;
