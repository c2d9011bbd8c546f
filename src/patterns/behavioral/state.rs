//! Pattern: State
//! Example: A context toggling between two states
//!
//! Each state consumes itself and hands back its successor, so a transition
//! can never leave the context without a state.

pub trait State {
    fn handle(self: Box<Self>) -> (Box<dyn State>, String);
    fn name(&self) -> &'static str;
}

#[derive(Debug, Default)]
pub struct ConcreteStateA;

#[derive(Debug, Default)]
pub struct ConcreteStateB;

impl State for ConcreteStateA {
    fn handle(self: Box<Self>) -> (Box<dyn State>, String) {
        (
            Box::new(ConcreteStateB),
            "State A handled the request and transitioned to State B".to_string(),
        )
    }

    fn name(&self) -> &'static str {
        "StateA"
    }
}

impl State for ConcreteStateB {
    fn handle(self: Box<Self>) -> (Box<dyn State>, String) {
        (
            Box::new(ConcreteStateA),
            "State B handled the request and transitioned to State A".to_string(),
        )
    }

    fn name(&self) -> &'static str {
        "StateB"
    }
}

pub struct Context {
    state: Option<Box<dyn State>>,
}

impl Context {
    pub fn new(initial: Box<dyn State>) -> Self {
        Self {
            state: Some(initial),
        }
    }

    pub fn set_state(&mut self, state: Box<dyn State>) {
        self.state = Some(state);
    }

    pub fn request(&mut self) -> String {
        match self.state.take() {
            Some(state) => {
                let (next, message) = state.handle();
                self.state = Some(next);
                message
            }
            None => String::new(),
        }
    }

    pub fn state_name(&self) -> &'static str {
        self.state.as_ref().map_or("Unknown", |s| s.name())
    }
}

pub struct Client {
    context: Context,
}

impl Client {
    pub fn new(initial: Box<dyn State>) -> Self {
        Self {
            context: Context::new(initial),
        }
    }

    pub fn make_request(&mut self) -> String {
        self.context.request()
    }

    pub fn get_current_state(&self) -> &'static str {
        self.context.state_name()
    }
}
