//! Example: A calculator exercised with table-driven tests

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculatorError {
    #[error("division by zero")]
    DivisionByZero,
}

/// Remembers the result of the last successful operation.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Calculator {
    last_result: f64,
}

impl Calculator {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, value: f64) -> f64 {
        self.last_result = value;
        value
    }

    pub fn add(&mut self, a: f64, b: f64) -> f64 {
        self.record(a + b)
    }

    pub fn subtract(&mut self, a: f64, b: f64) -> f64 {
        self.record(a - b)
    }

    pub fn multiply(&mut self, a: f64, b: f64) -> f64 {
        self.record(a * b)
    }

    /// A zero divisor fails and leaves the last result untouched.
    pub fn divide(&mut self, a: f64, b: f64) -> Result<f64, CalculatorError> {
        if b == 0.0 {
            return Err(CalculatorError::DivisionByZero);
        }
        Ok(self.record(a / b))
    }

    pub fn last_result(&self) -> f64 {
        self.last_result
    }
}

#[cfg(test)]
mod calculator_tests {
    use super::*;

    struct Case {
        name: &'static str,
        a: f64,
        b: f64,
        expected: f64,
    }

    const fn case(name: &'static str, a: f64, b: f64, expected: f64) -> Case {
        Case { name, a, b, expected }
    }

    fn run(cases: &[Case], op: fn(&mut Calculator, f64, f64) -> f64) {
        for c in cases {
            let mut calc = Calculator::new();
            let got = op(&mut calc, c.a, c.b);
            assert_eq!(got, c.expected, "{}: ({}, {})", c.name, c.a, c.b);
            assert_eq!(calc.last_result(), c.expected, "{}: last result", c.name);
        }
    }

    #[test]
    fn test_add() {
        run(
            &[
                case("positive numbers", 2.0, 3.0, 5.0),
                case("negative numbers", -2.0, -3.0, -5.0),
                case("zeros", 0.0, 0.0, 0.0),
                case("decimals", 1.5, 2.5, 4.0),
            ],
            Calculator::add,
        );
    }

    #[test]
    fn test_subtract() {
        run(
            &[
                case("positive numbers", 5.0, 3.0, 2.0),
                case("negative numbers", -2.0, -3.0, 1.0),
                case("zeros", 0.0, 0.0, 0.0),
                case("decimals", 3.5, 1.5, 2.0),
            ],
            Calculator::subtract,
        );
    }

    #[test]
    fn test_multiply() {
        run(
            &[
                case("positive numbers", 2.0, 3.0, 6.0),
                case("negative numbers", -2.0, -3.0, 6.0),
                case("zero", 0.0, 5.0, 0.0),
                case("decimals", 1.5, 2.0, 3.0),
            ],
            Calculator::multiply,
        );
    }

    #[test]
    fn test_divide() {
        let cases: [(&str, f64, f64, Result<f64, CalculatorError>); 4] = [
            ("positive numbers", 6.0, 2.0, Ok(3.0)),
            ("division by zero", 1.0, 0.0, Err(CalculatorError::DivisionByZero)),
            ("decimal result", 5.0, 2.0, Ok(2.5)),
            ("negative numbers", -6.0, 2.0, Ok(-3.0)),
        ];
        for (name, a, b, expected) in cases {
            let mut calc = Calculator::new();
            assert_eq!(calc.divide(a, b), expected, "{name}");
        }
    }

    #[test]
    fn test_failed_divide_keeps_last_result() {
        let mut calc = Calculator::new();
        calc.add(2.0, 3.0);
        let err = calc.divide(1.0, 0.0).unwrap_err();
        assert_eq!(err.to_string(), "division by zero");
        assert_eq!(calc.last_result(), 5.0);
    }
}
