//! Example: Shared and mutable references in place of raw pointers

use std::collections::BTreeMap;
use std::fmt::Display;

pub fn set_through_reference(target: &mut i32, value: i32) {
    *target = value;
}

/// `x` starts at 42 and is overwritten with 100 through a `&mut`.
pub fn pointer_basics() -> (Option<i32>, i32) {
    let empty: Option<&i32> = None;
    let mut x = 42;
    set_through_reference(&mut x, 100);
    (empty.copied(), x)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: u32,
}

pub fn birthday(person: &mut Person) {
    person.age += 1;
}

pub fn array_through_reference() -> [i32; 3] {
    let mut arr = [1, 2, 3];
    let arr_ref = &mut arr;
    arr_ref[1] = 20;
    arr
}

pub fn vec_through_reference() -> Vec<i32> {
    let mut values = vec![1, 2, 3];
    let values_ref = &mut values;
    values_ref[0] = 10;
    values_ref.push(4);
    values
}

pub fn map_through_reference() -> BTreeMap<&'static str, i32> {
    let mut m = BTreeMap::from([("a", 1), ("b", 2)]);
    let m_ref = &mut m;
    m_ref.insert("c", 3);
    m
}

pub fn function_pointer() -> i32 {
    let add: fn(i32, i32) -> i32 = |a, b| a + b;
    let add_ref = &add;
    add_ref(5, 3)
}

pub struct StringPerson {
    pub name: String,
}

impl Display for StringPerson {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

pub fn render(value: &dyn Display) -> String {
    value.to_string()
}

/// Boxing moves a value to the heap; the box owns it.
pub fn boxed_sum(values: Box<[i32]>) -> i32 {
    values.iter().sum()
}
