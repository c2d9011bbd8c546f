//! Example: Letting the compiler pick types

use std::fmt::Debug;

pub fn type_name_of<T>(_: &T) -> &'static str {
    std::any::type_name::<T>()
}

/// `Value: {v:?} (Type: {T})`
pub fn describe<T: Debug>(value: T) -> String {
    format!("Value: {:?} (Type: {})", value, type_name_of(&value))
}

/// Names and inferred types of the usual literal bindings.
pub fn inferred_types() -> Vec<(&'static str, &'static str)> {
    let name = "John";
    let age = 25;
    let height = 1.75;
    let is_student = true;
    let grade = 'A';

    vec![
        ("name", type_name_of(&name)),
        ("age", type_name_of(&age)),
        ("height", type_name_of(&height)),
        ("is_student", type_name_of(&is_student)),
        ("grade", type_name_of(&grade)),
    ]
}
