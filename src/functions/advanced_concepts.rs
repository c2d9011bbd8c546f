//! Example: Deferred cleanup, panic recovery and composition
//!
//! `Defer` stands in for a scope guard: closures registered on it run in
//! reverse order when it goes out of scope, even during unwinding.

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;

use crate::concurrency::panic_message;

/// A shared log the examples write into, so tests can see the ordering.
pub type DeferLog = Rc<RefCell<Vec<String>>>;

#[derive(Default)]
pub struct Defer {
    actions: Vec<Box<dyn FnOnce()>>,
}

impl Defer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: impl FnOnce() + 'static) {
        self.actions.push(Box::new(action));
    }
}

impl Drop for Defer {
    fn drop(&mut self) {
        while let Some(action) = self.actions.pop() {
            action();
        }
    }
}

fn log_line(log: &DeferLog, line: impl Into<String>) {
    log.borrow_mut().push(line.into());
}

fn deferred_line(log: &DeferLog, line: &'static str) -> impl FnOnce() + 'static {
    let log = Rc::clone(log);
    move || log_line(&log, line)
}

pub fn defer_example(log: &DeferLog) {
    log_line(log, "Starting defer example");
    let mut defer = Defer::new();
    defer.push(deferred_line(log, "This will be printed last"));
    defer.push(deferred_line(log, "This will be printed second to last"));
    log_line(log, "This will be printed first");
}

pub fn file_operations(log: &DeferLog) {
    log_line(log, "Opening file");
    let mut defer = Defer::new();
    defer.push(deferred_line(log, "Closing file"));
    log_line(log, "Writing to file");
}

pub fn multiple_defer(log: &DeferLog) {
    let mut defer = Defer::new();
    for i in 0..3 {
        let log = Rc::clone(log);
        defer.push(move || log_line(&log, format!("Deferred {i}")));
    }
    log_line(log, "Function body");
}

/// The deferred line is logged after the value is computed but before the
/// caller sees it.
pub fn deferred_return(log: &DeferLog) -> i32 {
    let mut defer = Defer::new();
    defer.push(deferred_line(log, "Deferred in return function"));
    42
}

/// Runs `f`, turning a panic into a message.
pub fn recover<F, T>(f: F) -> Result<T, String>
where
    F: FnOnce() -> T,
{
    panic::catch_unwind(AssertUnwindSafe(f))
        .map_err(|payload| format!("Recovered from panic: {}", panic_message(payload.as_ref())))
}

pub fn recover_from_panic() -> String {
    match recover::<_, ()>(|| panic!("Something went wrong!")) {
        Ok(()) => "no panic".to_string(),
        Err(message) => message,
    }
}

pub fn add_one(x: i32) -> i32 {
    x + 1
}

pub fn multiply_by_two(x: i32) -> i32 {
    x * 2
}

/// `compose(f, g)(x) == f(g(x))`
pub fn compose<F, G>(f: F, g: G) -> impl Fn(i32) -> i32
where
    F: Fn(i32) -> i32,
    G: Fn(i32) -> i32,
{
    move |x| f(g(x))
}

pub type MathFunc = fn(i32) -> i32;

pub fn apply_function(x: i32, f: MathFunc) -> i32 {
    f(x)
}

pub fn square(x: i32) -> i32 {
    x * x
}

#[cfg(test)]
mod advanced_concepts_tests {
    use super::*;

    fn new_log() -> DeferLog {
        Rc::new(RefCell::new(Vec::new()))
    }

    #[test]
    fn test_defer_runs_lifo() {
        let log = new_log();
        defer_example(&log);
        assert_eq!(
            *log.borrow(),
            vec![
                "Starting defer example",
                "This will be printed first",
                "This will be printed second to last",
                "This will be printed last",
            ]
        );
    }

    #[test]
    fn test_defer_in_loop_and_return() {
        let log = new_log();
        multiple_defer(&log);
        assert_eq!(
            *log.borrow(),
            vec!["Function body", "Deferred 2", "Deferred 1", "Deferred 0"]
        );

        let log = new_log();
        file_operations(&log);
        assert_eq!(log.borrow().last().unwrap(), "Closing file");

        let log = new_log();
        assert_eq!(deferred_return(&log), 42);
        assert_eq!(*log.borrow(), vec!["Deferred in return function"]);
    }

    #[test]
    fn test_defer_runs_during_unwind() {
        let log = new_log();
        let inner = Rc::clone(&log);
        let result: Result<(), String> = recover(move || {
            let mut defer = Defer::new();
            defer.push(deferred_line(&inner, "cleanup"));
            panic!("boom");
        });
        assert_eq!(result.unwrap_err(), "Recovered from panic: boom");
        assert_eq!(*log.borrow(), vec!["cleanup"]);
    }

    #[test]
    fn test_recover_from_panic() {
        assert_eq!(recover_from_panic(), "Recovered from panic: Something went wrong!");
        assert_eq!(recover(|| 7), Ok(7));
    }

    #[test]
    fn test_composition() {
        assert_eq!(compose(add_one, multiply_by_two)(5), 11);
        assert_eq!(compose(multiply_by_two, add_one)(5), 12);
        assert_eq!(apply_function(4, square), 16);
        assert_eq!(apply_function(4, |x| x * x), 16);
    }
}
