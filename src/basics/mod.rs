//! Language basics: bindings, constants, conversions, inference and defaults.

pub mod constants;
pub mod type_conversion;
pub mod type_inference;
pub mod variables;
pub mod zero_values;
