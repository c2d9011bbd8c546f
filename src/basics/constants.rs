//! Example: Module and function level constants

#![allow(clippy::approx_constant)]

pub const PI: f64 = 3.14159;
pub const MAX_VALUE: i32 = 1000;
pub const GREETING: &str = "Hello, Rust!";
pub const IS_ENABLED: bool = true;

pub const CELSIUS: i32 = 100;
pub const FAHRENHEIT: i32 = CELSIUS * 9 / 5 + 32;

pub fn temperature_conversion() -> String {
    format!("{CELSIUS}°C = {FAHRENHEIT}°F")
}

/// Constants declared inside a function body.
pub fn local_constants() -> Vec<String> {
    const AGE: i32 = 25;
    const HEIGHT: f64 = 1.75;
    const NAME: &str = "John";
    const TEMPERATURE: f64 = 23.5;
    const IS_STUDENT: bool = true;

    vec![
        format!("Age: {AGE}"),
        format!("Height: {HEIGHT}"),
        format!("Name: {NAME}"),
        format!("Temperature: {TEMPERATURE}"),
        format!("Is Student: {IS_STUDENT}"),
    ]
}

#[cfg(test)]
mod constants_tests {
    use super::*;

    #[test]
    fn test_module_constants() {
        assert_eq!(PI, 3.14159);
        assert_eq!(MAX_VALUE, 1000);
        assert!(GREETING.starts_with("Hello"));
        assert!(IS_ENABLED);
    }

    #[test]
    fn test_const_expression() {
        assert_eq!(FAHRENHEIT, 212);
        assert_eq!(temperature_conversion(), "100°C = 212°F");
    }

    #[test]
    fn test_local_constants() {
        let lines = local_constants();
        assert_eq!(lines[0], "Age: 25");
        assert_eq!(lines[4], "Is Student: true");
    }
}
