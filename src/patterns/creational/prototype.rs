//! Pattern: Prototype
//! Example: Cloning configured objects out of a registry
//!
//! `clone_box` lets trait objects be deep-copied; the registry always hands
//! out copies so stored prototypes never change behind its back.

use std::collections::{BTreeMap, HashMap};

pub trait Prototype {
    fn clone_box(&self) -> Box<dyn Prototype>;
    fn info(&self) -> String;
}

impl Clone for Box<dyn Prototype> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConcretePrototype1 {
    name: String,
    data: BTreeMap<String, String>,
}

impl ConcretePrototype1 {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.data.insert(key.into(), value.into());
    }
}

impl Prototype for ConcretePrototype1 {
    fn clone_box(&self) -> Box<dyn Prototype> {
        Box::new(self.clone())
    }

    fn info(&self) -> String {
        let entries: Vec<String> = self.data.iter().map(|(k, v)| format!("{k}:{v}")).collect();
        format!(
            "ConcretePrototype1: {}, Data: map[{}]",
            self.name,
            entries.join(" ")
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConcretePrototype2 {
    name: String,
    data: Vec<i32>,
}

impl ConcretePrototype2 {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: Vec::new(),
        }
    }

    pub fn add_data(&mut self, value: i32) {
        self.data.push(value);
    }
}

impl Prototype for ConcretePrototype2 {
    fn clone_box(&self) -> Box<dyn Prototype> {
        Box::new(self.clone())
    }

    fn info(&self) -> String {
        let values: Vec<String> = self.data.iter().map(ToString::to_string).collect();
        format!("ConcretePrototype2: {}, Data: [{}]", self.name, values.join(" "))
    }
}

#[derive(Default)]
pub struct PrototypeRegistry {
    prototypes: HashMap<String, Box<dyn Prototype>>,
}

impl PrototypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_prototype(&mut self, key: impl Into<String>, prototype: Box<dyn Prototype>) {
        self.prototypes.insert(key.into(), prototype);
    }

    /// A fresh deep copy of the stored prototype.
    pub fn get_prototype(&self, key: &str) -> Option<Box<dyn Prototype>> {
        self.prototypes.get(key).map(|p| p.clone_box())
    }

    pub fn remove_prototype(&mut self, key: &str) {
        self.prototypes.remove(key);
    }
}
