//! Example: Closures, function items, methods and function-pointer types

use std::thread;

pub fn print_numbers(numbers: &[i32]) -> Vec<String> {
    let mut lines = vec![format!("Numbers: {numbers:?}")];
    lines.extend(
        numbers
            .iter()
            .enumerate()
            .map(|(i, num)| format!("Index {i}: {num}")),
    );
    lines
}

pub const SQUARE: fn(i32) -> i32 = |x| x * x;

/// Each call returns the next count, starting at 1.
pub fn create_counter() -> impl FnMut() -> i32 {
    let mut count = 0;
    move || {
        count += 1;
        count
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    pub fn scale(&mut self, factor: f64) {
        self.width *= factor;
        self.height *= factor;
    }
}

pub type Operation = fn(i32, i32) -> i32;

pub fn run_operation(op: Operation, a: i32, b: i32) -> i32 {
    op(a, b)
}

pub fn closure_on_thread() -> String {
    thread::spawn(|| "Running in thread".to_string())
        .join()
        .unwrap_or_else(|_| "thread panicked".to_string())
}

pub fn immediately_invoked() -> String {
    (|x: i32| format!("Anonymous function with parameter: {x}"))(42)
}

#[cfg(test)]
mod function_types_tests {
    use super::*;

    #[test]
    fn test_print_numbers() {
        assert_eq!(
            print_numbers(&[1, 2, 3]),
            vec!["Numbers: [1, 2, 3]", "Index 0: 1", "Index 1: 2", "Index 2: 3"]
        );
        assert_eq!(print_numbers(&[]), vec!["Numbers: []"]);
    }

    #[test]
    fn test_square_and_counter() {
        assert_eq!(SQUARE(5), 25);
        let mut counter = create_counter();
        assert_eq!((counter(), counter(), counter()), (1, 2, 3));

        let mut other = create_counter();
        assert_eq!(other(), 1);
    }

    #[test]
    fn test_rectangle_methods() {
        let mut rect = Rectangle {
            width: 5.0,
            height: 3.0,
        };
        assert_eq!(rect.area(), 15.0);
        rect.scale(2.0);
        assert_eq!(rect.area(), 60.0);
    }

    #[test]
    fn test_operation_type_and_closures() {
        let add: Operation = |a, b| a + b;
        assert_eq!(run_operation(add, 5, 3), 8);
        assert_eq!(closure_on_thread(), "Running in thread");
        assert_eq!(immediately_invoked(), "Anonymous function with parameter: 42");
    }
}
