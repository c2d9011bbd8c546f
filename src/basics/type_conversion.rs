//! Example: Explicit conversions between numeric, text and custom types

#![allow(clippy::approx_constant)]

use std::string::FromUtf8Error;

/// `i32 -> f64`, `f64 -> i64` (truncating), `u8 -> i32`, `i32 -> u8`.
pub fn numeric_conversions() -> (f64, i64, i32, u8) {
    let int_num: i32 = 42;
    let float_num: f64 = 3.14;
    let byte_num: u8 = 65;

    (int_num as f64, float_num as i64, byte_num as i32, int_num as u8)
}

pub fn byte_to_char(byte: u8) -> char {
    char::from(byte)
}

pub fn string_to_bytes(s: &str) -> Vec<u8> {
    s.as_bytes().to_vec()
}

pub fn bytes_to_string(bytes: Vec<u8>) -> Result<String, FromUtf8Error> {
    String::from_utf8(bytes)
}

/// Parsing is the fallible direction.
pub fn parse_number(s: &str) -> Result<i32, std::num::ParseIntError> {
    s.trim().parse()
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Celsius(pub f64);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fahrenheit(pub f64);

impl From<Celsius> for Fahrenheit {
    fn from(c: Celsius) -> Self {
        Fahrenheit(c.0 * 9.0 / 5.0 + 32.0)
    }
}

impl From<Fahrenheit> for Celsius {
    fn from(f: Fahrenheit) -> Self {
        Celsius((f.0 - 32.0) * 5.0 / 9.0)
    }
}
