//! Pattern: Mediator
//! Example: Colleagues talking through a central hub
//!
//! Colleagues never reference each other. The mediator owns them by name and
//! fans an event out to everyone except the sender.

use std::collections::BTreeMap;

pub trait Colleague {
    fn name(&self) -> &str;

    fn receive(&self, event: &str) -> String {
        format!("{} received: {}", self.name(), event)
    }
}

pub struct ConcreteColleagueA {
    name: String,
}

impl ConcreteColleagueA {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Colleague for ConcreteColleagueA {
    fn name(&self) -> &str {
        &self.name
    }
}

pub struct ConcreteColleagueB {
    name: String,
}

impl ConcreteColleagueB {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Colleague for ConcreteColleagueB {
    fn name(&self) -> &str {
        &self.name
    }
}

pub trait Mediator {
    /// Delivers `event` to every colleague but `sender`; returns their replies.
    fn notify(&self, sender: &str, event: &str) -> Vec<String>;
}

#[derive(Default)]
pub struct ConcreteMediator {
    colleagues: BTreeMap<String, Box<dyn Colleague>>,
}

impl ConcreteMediator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_colleague(&mut self, name: impl Into<String>, colleague: Box<dyn Colleague>) {
        self.colleagues.insert(name.into(), colleague);
    }

    pub fn len(&self) -> usize {
        self.colleagues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colleagues.is_empty()
    }
}

impl Mediator for ConcreteMediator {
    fn notify(&self, sender: &str, event: &str) -> Vec<String> {
        // BTreeMap iteration keeps replies ordered by colleague name
        self.colleagues
            .iter()
            .filter(|(name, _)| name.as_str() != sender)
            .map(|(_, colleague)| colleague.receive(event))
            .collect()
    }
}

#[derive(Default)]
pub struct Client {
    mediator: ConcreteMediator,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_colleague(&mut self, colleague: Box<dyn Colleague>) {
        let name = colleague.name().to_string();
        self.mediator.register_colleague(name, colleague);
    }

    pub fn send_message(&self, sender: &str, message: &str) -> Vec<String> {
        self.mediator.notify(sender, message)
    }
}
