//! Example: Every shape of loop

use crossbeam::channel;
use std::collections::BTreeMap;

pub fn counted_loop() -> Vec<String> {
    (0..5).map(|i| format!("Iteration {i}")).collect()
}

pub fn while_loop() -> Vec<String> {
    let mut lines = Vec::new();
    let mut count = 0;
    while count < 3 {
        lines.push(format!("Count is {count}"));
        count += 1;
    }
    lines
}

pub fn infinite_loop_with_break() -> Vec<String> {
    let mut lines = Vec::new();
    let mut counter = 0;
    loop {
        if counter >= 3 {
            break;
        }
        lines.push(format!("Counter is {counter}"));
        counter += 1;
    }
    lines
}

pub fn range_over_slice() -> Vec<String> {
    let fruits = ["apple", "banana", "orange"];
    fruits
        .iter()
        .enumerate()
        .map(|(index, value)| format!("Index: {index}, Value: {value}"))
        .collect()
}

/// Keys come back sorted because the map is a `BTreeMap`.
pub fn range_over_map() -> Vec<String> {
    let person = BTreeMap::from([("name", "John"), ("age", "25"), ("city", "New York")]);
    person
        .iter()
        .map(|(key, value)| format!("Key: {key}, Value: {value}"))
        .collect()
}

/// Indices are byte offsets, so multi-byte characters skip ahead.
pub fn range_over_string(s: &str) -> Vec<(usize, char)> {
    s.char_indices().collect()
}

pub fn nested_loops() -> Vec<(i32, i32)> {
    let mut pairs = Vec::new();
    for i in 0..2 {
        for j in 0..2 {
            pairs.push((i, j));
        }
    }
    pairs
}

/// Two counters moving toward each other.
pub fn two_variable_loop() -> Vec<(i32, i32)> {
    let mut pairs = Vec::new();
    let (mut i, mut j) = (0, 10);
    while i < j {
        pairs.push((i, j));
        i += 1;
        j -= 1;
    }
    pairs
}

/// Iterating a receiver ends once every sender is gone and the buffer is drained.
pub fn drain_closed_channel() -> Vec<i32> {
    let (tx, rx) = channel::bounded(3);
    for value in 1..=3 {
        let _ = tx.send(value);
    }
    drop(tx);
    rx.iter().collect()
}

#[cfg(test)]
mod for_loops_tests {
    use super::*;

    #[test]
    fn test_basic_loops() {
        assert_eq!(counted_loop().len(), 5);
        assert_eq!(counted_loop()[4], "Iteration 4");
        assert_eq!(while_loop(), vec!["Count is 0", "Count is 1", "Count is 2"]);
        assert_eq!(infinite_loop_with_break().last().unwrap(), "Counter is 2");
    }

    #[test]
    fn test_ranges() {
        assert_eq!(range_over_slice()[1], "Index: 1, Value: banana");
        assert_eq!(
            range_over_map(),
            vec![
                "Key: age, Value: 25",
                "Key: city, Value: New York",
                "Key: name, Value: John"
            ]
        );
        assert_eq!(range_over_string("Hello")[4], (4, 'o'));
        assert_eq!(range_over_string("héllo")[2], (3, 'l'));
    }

    #[test]
    fn test_nested_and_two_variable() {
        assert_eq!(nested_loops(), vec![(0, 0), (0, 1), (1, 0), (1, 1)]);
        let pairs = two_variable_loop();
        assert_eq!(pairs.len(), 5);
        assert_eq!(pairs[0], (0, 10));
        assert_eq!(pairs[4], (4, 6));
    }

    #[test]
    fn test_drain_channel() {
        assert_eq!(drain_closed_channel(), vec![1, 2, 3]);
    }
}
