//! Example: Parameters, results and higher-order functions

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DivideError {
    #[error("division by zero")]
    DivisionByZero,
}

pub fn say_hello() -> String {
    "Hello, Rust!".to_string()
}

pub fn greet(name: &str) -> String {
    format!("Hello, {name}!")
}

pub fn add(a: i32, b: i32) -> i32 {
    a + b
}

pub fn divide(a: f64, b: f64) -> Result<f64, DivideError> {
    if b == 0.0 {
        return Err(DivideError::DivisionByZero);
    }
    Ok(a / b)
}

/// Returns `(area, perimeter)`.
pub fn rectangle(width: f64, height: f64) -> (f64, f64) {
    let area = width * height;
    let perimeter = 2.0 * (width + height);
    (area, perimeter)
}

pub fn sum(numbers: &[i32]) -> i32 {
    numbers.iter().sum()
}

pub fn apply_operation<F>(a: i32, b: i32, operation: F) -> i32
where
    F: Fn(i32, i32) -> i32,
{
    operation(a, b)
}
