//! Example: Default values for every kind of type

use std::collections::HashMap;
use std::fmt::Debug;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: i32,
}

#[derive(Debug, Default)]
pub struct ZeroReport {
    lines: Vec<String>,
}

impl ZeroReport {
    fn record<T: Default + Debug>(&mut self, label: &str) {
        self.lines.push(format!("{label}: {:?}", T::default()));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

pub fn zero_report() -> ZeroReport {
    let mut report = ZeroReport::default();

    report.record::<i32>("i32");
    report.record::<f64>("f64");
    report.record::<String>("String");
    report.record::<bool>("bool");
    report.record::<char>("char");
    report.record::<u8>("u8");

    report.record::<[i32; 3]>("[i32; 3]");
    report.record::<Vec<i32>>("Vec<i32>");
    report.record::<HashMap<String, i32>>("HashMap<String, i32>");
    report.record::<Option<Box<i32>>>("Option<Box<i32>>");

    report.record::<Person>("Person");
    report
}
