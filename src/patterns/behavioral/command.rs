//! Pattern: Command
//! Example: Undoable commands against a shared receiver
//!
//! The invoker keeps a history of executed commands and pops them on undo.

use std::cell::RefCell;
use std::rc::Rc;

pub const INITIAL_STATE: &str = "initial";

pub trait Command {
    fn execute(&self) -> String;
    fn undo(&self) -> String;
}

#[derive(Debug)]
pub struct Receiver {
    state: String,
}

impl Default for Receiver {
    fn default() -> Self {
        Self {
            state: INITIAL_STATE.to_string(),
        }
    }
}

impl Receiver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn action(&mut self, param: &str) -> String {
        self.state = param.to_string();
        format!("Receiver: {}", param)
    }

    pub fn state(&self) -> &str {
        &self.state
    }
}

pub type SharedReceiver = Rc<RefCell<Receiver>>;

pub struct ConcreteCommandA {
    receiver: SharedReceiver,
    param: String,
}

impl ConcreteCommandA {
    pub fn new(receiver: SharedReceiver, param: impl Into<String>) -> Self {
        Self {
            receiver,
            param: param.into(),
        }
    }
}

impl Command for ConcreteCommandA {
    fn execute(&self) -> String {
        self.receiver.borrow_mut().action(&self.param)
    }

    fn undo(&self) -> String {
        self.receiver.borrow_mut().action(INITIAL_STATE)
    }
}

pub struct ConcreteCommandB {
    receiver: SharedReceiver,
    param: String,
}

impl ConcreteCommandB {
    pub fn new(receiver: SharedReceiver, param: impl Into<String>) -> Self {
        Self {
            receiver,
            param: param.into(),
        }
    }
}

impl Command for ConcreteCommandB {
    fn execute(&self) -> String {
        self.receiver.borrow_mut().action(&self.param)
    }

    fn undo(&self) -> String {
        self.receiver.borrow_mut().action(INITIAL_STATE)
    }
}

#[derive(Default)]
pub struct Invoker {
    history: Vec<Box<dyn Command>>,
}

impl Invoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn execute_command(&mut self, command: Box<dyn Command>) -> String {
        let result = command.execute();
        self.history.push(command);
        result
    }

    pub fn undo_last_command(&mut self) -> String {
        match self.history.pop() {
            Some(command) => command.undo(),
            None => "No commands to undo".to_string(),
        }
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

pub struct Client {
    invoker: Invoker,
    receiver: SharedReceiver,
}

impl Default for Client {
    fn default() -> Self {
        Self::new()
    }
}

impl Client {
    pub fn new() -> Self {
        Self {
            invoker: Invoker::new(),
            receiver: Rc::new(RefCell::new(Receiver::new())),
        }
    }

    pub fn run_command(&mut self, param: &str) -> String {
        let command = ConcreteCommandA::new(Rc::clone(&self.receiver), param);
        self.invoker.execute_command(Box::new(command))
    }

    pub fn undo_last_command(&mut self) -> String {
        self.invoker.undo_last_command()
    }

    pub fn receiver_state(&self) -> String {
        self.receiver.borrow().state().to_string()
    }
}

#[cfg(test)]
mod command_tests {
    use super::*;

    #[test]
    fn test_receiver_starts_initial() {
        let mut receiver = Receiver::new();
        assert_eq!(receiver.state(), "initial");
        assert_eq!(receiver.action("test"), "Receiver: test");
        assert_eq!(receiver.state(), "test");
    }

    #[test]
    fn test_commands_execute_and_undo() {
        let receiver = Rc::new(RefCell::new(Receiver::new()));
        let a = ConcreteCommandA::new(Rc::clone(&receiver), "A");
        let b = ConcreteCommandB::new(Rc::clone(&receiver), "B");

        assert_eq!(a.execute(), "Receiver: A");
        assert_eq!(receiver.borrow().state(), "A");
        assert_eq!(b.execute(), "Receiver: B");
        assert_eq!(b.undo(), "Receiver: initial");
        assert_eq!(receiver.borrow().state(), "initial");
    }

    #[test]
    fn test_invoker_history() {
        let receiver = Rc::new(RefCell::new(Receiver::new()));
        let mut invoker = Invoker::new();

        assert_eq!(invoker.undo_last_command(), "No commands to undo");

        invoker.execute_command(Box::new(ConcreteCommandA::new(Rc::clone(&receiver), "one")));
        invoker.execute_command(Box::new(ConcreteCommandB::new(Rc::clone(&receiver), "two")));
        assert_eq!(invoker.history_len(), 2);

        assert_eq!(invoker.undo_last_command(), "Receiver: initial");
        assert_eq!(invoker.history_len(), 1);
        invoker.undo_last_command();
        assert_eq!(invoker.undo_last_command(), "No commands to undo");
    }

    #[test]
    fn test_client_round_trip() {
        let mut client = Client::new();
        assert_eq!(client.run_command("test"), "Receiver: test");
        assert_eq!(client.receiver_state(), "test");
        assert_eq!(client.undo_last_command(), "Receiver: initial");
        assert_eq!(client.undo_last_command(), "No commands to undo");
    }
}
