//! Pattern: Chain of Responsibility
//! Example: Passing a request along a chain of handlers
//!
//! Each handler either answers the request or forwards it to the next one.
//! A request nobody handles comes back as an empty string.

pub trait Handler {
    /// Stores `next` and returns it, so calls can be chained:
    /// `a.set_next(b).set_next(c)`.
    fn set_next(&mut self, next: Box<dyn Handler>) -> &mut dyn Handler;

    fn handle(&self, request: &str) -> String;
}

/// Forwarding half shared by every concrete handler.
#[derive(Default)]
pub struct BaseHandler {
    next: Option<Box<dyn Handler>>,
}

impl BaseHandler {
    fn set_next(&mut self, next: Box<dyn Handler>) -> &mut dyn Handler {
        &mut **self.next.insert(next)
    }

    fn forward(&self, request: &str) -> String {
        match &self.next {
            Some(next) => next.handle(request),
            None => String::new(),
        }
    }
}

macro_rules! concrete_handler {
    ($name:ident, $accepts:literal) => {
        #[derive(Default)]
        pub struct $name {
            base: BaseHandler,
        }

        impl $name {
            pub fn new() -> Self {
                Self::default()
            }
        }

        impl Handler for $name {
            fn set_next(&mut self, next: Box<dyn Handler>) -> &mut dyn Handler {
                self.base.set_next(next)
            }

            fn handle(&self, request: &str) -> String {
                if request == $accepts {
                    return concat!(stringify!($name), " handled the request").to_string();
                }
                self.base.forward(request)
            }
        }
    };
}

concrete_handler!(ConcreteHandlerA, "A");
concrete_handler!(ConcreteHandlerB, "B");
concrete_handler!(ConcreteHandlerC, "C");

/// Links handlers in the given order and returns the head of the chain.
pub fn build_chain(handlers: Vec<Box<dyn Handler>>) -> Option<Box<dyn Handler>> {
    handlers.into_iter().rev().fold(None, |next, mut handler| {
        if let Some(next) = next {
            handler.set_next(next);
        }
        Some(handler)
    })
}

pub struct Client {
    chain: Box<dyn Handler>,
}

impl Client {
    pub fn new(chain: Box<dyn Handler>) -> Self {
        Self { chain }
    }

    pub fn send_request(&self, request: &str) -> String {
        self.chain.handle(request)
    }
}

#[cfg(test)]
mod chain_tests {
    use super::*;

    fn abc_chain() -> Box<dyn Handler> {
        let mut head = Box::new(ConcreteHandlerA::new());
        head.set_next(Box::new(ConcreteHandlerB::new()))
            .set_next(Box::new(ConcreteHandlerC::new()));
        head
    }

    #[test]
    fn test_each_handler_answers_its_request() {
        let chain = abc_chain();
        assert_eq!(chain.handle("A"), "ConcreteHandlerA handled the request");
        assert_eq!(chain.handle("B"), "ConcreteHandlerB handled the request");
        assert_eq!(chain.handle("C"), "ConcreteHandlerC handled the request");
    }

    #[test]
    fn test_unhandled_request_is_empty() {
        let chain = abc_chain();
        assert_eq!(chain.handle("D"), "");
        assert_eq!(ConcreteHandlerA::new().handle("B"), "");
    }

    #[test]
    fn test_client_delegates_to_chain() {
        let client = Client::new(abc_chain());
        assert_eq!(client.send_request("B"), "ConcreteHandlerB handled the request");
        assert_eq!(client.send_request("unknown"), "");
    }

    #[test]
    fn test_build_chain_preserves_order() {
        let chain = build_chain(vec![
            Box::new(ConcreteHandlerC::new()),
            Box::new(ConcreteHandlerA::new()),
        ])
        .unwrap();
        assert_eq!(chain.handle("A"), "ConcreteHandlerA handled the request");
        assert_eq!(chain.handle("B"), "");
        assert!(build_chain(Vec::new()).is_none());
    }
}
