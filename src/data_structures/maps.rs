//! Example: Maps of scores, structs, maps, vectors and functions

use serde_json::{json, Value};
use std::collections::{BTreeMap, HashMap};

pub fn scores() -> BTreeMap<String, i32> {
    let mut scores = BTreeMap::from([
        ("John".to_string(), 95),
        ("Alice".to_string(), 88),
        ("Bob".to_string(), 92),
    ]);
    scores.insert("Charlie".to_string(), 85);
    scores.remove("Bob");
    scores
}

#[derive(Debug, Clone, PartialEq)]
pub struct Resident {
    pub age: u32,
    pub city: String,
}

pub fn people() -> HashMap<&'static str, Resident> {
    HashMap::from([
        (
            "John",
            Resident {
                age: 25,
                city: "New York".to_string(),
            },
        ),
        (
            "Alice",
            Resident {
                age: 30,
                city: "London".to_string(),
            },
        ),
    ])
}

pub fn nested() -> BTreeMap<&'static str, BTreeMap<&'static str, i32>> {
    BTreeMap::from([
        ("A", BTreeMap::from([("x", 1), ("y", 2)])),
        ("B", BTreeMap::from([("x", 3), ("y", 4)])),
    ])
}

pub fn parity_groups(values: &[i32]) -> BTreeMap<&'static str, Vec<i32>> {
    let mut groups: BTreeMap<&'static str, Vec<i32>> = BTreeMap::new();
    for &v in values {
        let key = if v % 2 == 0 { "even" } else { "odd" };
        groups.entry(key).or_default().push(v);
    }
    groups
}

pub fn operations() -> HashMap<&'static str, fn(i32, i32) -> i32> {
    let mut ops: HashMap<&'static str, fn(i32, i32) -> i32> = HashMap::new();
    ops.insert("add", |a, b| a + b);
    ops.insert("sub", |a, b| a - b);
    ops.insert("mul", |a, b| a * b);
    ops
}

pub fn apply(op: &str, a: i32, b: i32) -> Option<i32> {
    operations().get(op).map(|f| f(a, b))
}

/// Values of mixed type live behind `serde_json::Value`.
pub fn mixed() -> Value {
    json!({
        "name": "John",
        "age": 25,
        "scores": [85, 92, 88],
    })
}

pub fn word_count(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for word in text.split_whitespace() {
        *counts.entry(word.to_lowercase()).or_insert(0) += 1;
    }
    counts
}
