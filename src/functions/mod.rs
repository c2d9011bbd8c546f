//! Functions, closures, methods, deferred cleanup and panic recovery.

pub mod advanced_concepts;
pub mod basic_functions;
pub mod function_types;
