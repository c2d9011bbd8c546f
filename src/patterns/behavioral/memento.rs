//! Pattern: Memento
//! Example: Snapshot and restore an originator's state

#[derive(Debug, Clone, PartialEq)]
pub struct Memento {
    state: String,
}

impl Memento {
    fn new(state: String) -> Self {
        Self { state }
    }

    pub fn state(&self) -> &str {
        &self.state
    }
}

#[derive(Debug)]
pub struct Originator {
    state: String,
}

impl Originator {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
        }
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.state = state.into();
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn create_memento(&self) -> Memento {
        Memento::new(self.state.clone())
    }

    pub fn restore_from_memento(&mut self, memento: &Memento) {
        self.state = memento.state.clone();
    }
}

#[derive(Debug, Default)]
pub struct Caretaker {
    mementos: Vec<Memento>,
}

impl Caretaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_memento(&mut self, memento: Memento) {
        self.mementos.push(memento);
    }

    pub fn get_memento(&self, index: usize) -> Option<&Memento> {
        self.mementos.get(index)
    }

    pub fn len(&self) -> usize {
        self.mementos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mementos.is_empty()
    }
}

pub struct Client {
    originator: Originator,
    caretaker: Caretaker,
}

impl Client {
    pub fn new(initial_state: impl Into<String>) -> Self {
        Self {
            originator: Originator::new(initial_state),
            caretaker: Caretaker::new(),
        }
    }

    pub fn set_state(&mut self, state: impl Into<String>) {
        self.originator.set_state(state);
    }

    pub fn save_state(&mut self) {
        self.caretaker.add_memento(self.originator.create_memento());
    }

    /// Unknown indices leave the current state untouched.
    pub fn restore_state(&mut self, index: usize) {
        if let Some(memento) = self.caretaker.get_memento(index) {
            self.originator.restore_from_memento(memento);
        }
    }

    pub fn current_state(&self) -> &str {
        self.originator.state()
    }
}

#[cfg(test)]
mod memento_tests {
    use super::*;

    #[test]
    fn test_originator_snapshot() {
        let mut originator = Originator::new("state1");
        let memento = originator.create_memento();
        originator.set_state("state2");
        assert_eq!(originator.state(), "state2");

        originator.restore_from_memento(&memento);
        assert_eq!(originator.state(), "state1");
    }

    #[test]
    fn test_caretaker_bounds() {
        let mut caretaker = Caretaker::new();
        caretaker.add_memento(Originator::new("only").create_memento());
        assert_eq!(caretaker.get_memento(0).map(Memento::state), Some("only"));
        assert!(caretaker.get_memento(1).is_none());
    }

    #[test]
    fn test_client_restores_by_index() {
        let mut client = Client::new("initial");
        client.save_state();
        client.set_state("state1");
        client.save_state();
        client.set_state("state2");

        client.restore_state(1);
        assert_eq!(client.current_state(), "state1");
        client.restore_state(0);
        assert_eq!(client.current_state(), "initial");
    }

    #[test]
    fn test_invalid_index_is_ignored() {
        let mut client = Client::new("initial");
        client.set_state("changed");
        client.restore_state(5);
        assert_eq!(client.current_state(), "changed");
    }
}
