//! Pattern: Observer
//! Example: Observers mirroring a subject's state
//!
//! Observers are shared between the subject and whoever created them, so
//! they live behind `Rc<RefCell<..>>`; removal compares by pointer identity.

use std::cell::RefCell;
use std::rc::Rc;

pub trait Observer {
    fn update(&mut self, state: &str);
    fn state(&self) -> String;
}

pub type SharedObserver = Rc<RefCell<dyn Observer>>;

#[derive(Debug, Default)]
pub struct ConcreteObserverA {
    state: String,
}

impl ConcreteObserverA {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Observer for ConcreteObserverA {
    fn update(&mut self, state: &str) {
        self.state = state.to_string();
    }

    fn state(&self) -> String {
        self.state.clone()
    }
}

#[derive(Debug, Default)]
pub struct ConcreteObserverB {
    state: String,
}

impl ConcreteObserverB {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Observer for ConcreteObserverB {
    fn update(&mut self, state: &str) {
        self.state = state.to_string();
    }

    fn state(&self) -> String {
        self.state.clone()
    }
}

#[derive(Default)]
pub struct Subject {
    observers: Vec<SharedObserver>,
    state: String,
}

impl Subject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_observer(&mut self, observer: SharedObserver) {
        self.observers.push(observer);
    }

    /// Removes the first registration of `observer`; no-op if absent.
    pub fn remove_observer(&mut self, observer: &SharedObserver) {
        if let Some(pos) = self.observers.iter().position(|o| Rc::ptr_eq(o, observer)) {
            self.observers.remove(pos);
        }
    }

    pub fn notify_observers(&self) {
        for observer in &self.observers {
            observer.borrow_mut().update(&self.state);
        }
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.state = state.into();
        self.notify_observers();
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }
}

#[derive(Default)]
pub struct Client {
    subject: Subject,
    observers: Vec<SharedObserver>,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_observer(&mut self, observer: SharedObserver) {
        self.subject.register_observer(Rc::clone(&observer));
        self.observers.push(observer);
    }

    pub fn remove_observer(&mut self, observer: &SharedObserver) {
        self.subject.remove_observer(observer);
        self.observers.retain(|o| !Rc::ptr_eq(o, observer));
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.subject.set_state(state);
    }

    /// State of the observer at `index`; indices shift after a removal.
    pub fn get_observer_state(&self, index: usize) -> String {
        self.observers
            .get(index)
            .map(|o| o.borrow().state())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod observer_tests {
    use super::*;

    fn shared<O: Observer + 'static>(observer: O) -> SharedObserver {
        Rc::new(RefCell::new(observer))
    }

    #[test]
    fn test_set_state_notifies_all() {
        let mut subject = Subject::new();
        let a = shared(ConcreteObserverA::new());
        let b = shared(ConcreteObserverB::new());
        subject.register_observer(Rc::clone(&a));
        subject.register_observer(Rc::clone(&b));

        subject.set_state("test state");
        assert_eq!(subject.state(), "test state");
        assert_eq!(a.borrow().state(), "test state");
        assert_eq!(b.borrow().state(), "test state");
    }

    #[test]
    fn test_removed_observer_keeps_old_state() {
        let mut subject = Subject::new();
        let a = shared(ConcreteObserverA::new());
        let b = shared(ConcreteObserverB::new());
        subject.register_observer(Rc::clone(&a));
        subject.register_observer(Rc::clone(&b));
        subject.set_state("test state");

        subject.remove_observer(&a);
        subject.set_state("new state");
        assert_eq!(subject.observer_count(), 1);
        assert_eq!(a.borrow().state(), "test state");
        assert_eq!(b.borrow().state(), "new state");
    }

    #[test]
    fn test_client_indices_shift_after_removal() {
        let mut client = Client::new();
        let a = shared(ConcreteObserverA::new());
        let b = shared(ConcreteObserverB::new());
        client.add_observer(Rc::clone(&a));
        client.add_observer(Rc::clone(&b));

        client.set_state("test state");
        assert_eq!(client.get_observer_state(0), "test state");
        assert_eq!(client.get_observer_state(1), "test state");

        client.remove_observer(&a);
        client.set_state("new state");
        assert_eq!(client.get_observer_state(0), "new state");
        assert_eq!(client.get_observer_state(1), "");
    }
}
