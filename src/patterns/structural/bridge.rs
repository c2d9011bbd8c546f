//! Pattern: Bridge
//! Example: Abstractions and implementations that vary independently

pub trait Implementor {
    fn operation_impl(&self) -> String;
}

pub struct ConcreteImplementorA;

impl Implementor for ConcreteImplementorA {
    fn operation_impl(&self) -> String {
        "ConcreteImplementorA operation".to_string()
    }
}

pub struct ConcreteImplementorB;

impl Implementor for ConcreteImplementorB {
    fn operation_impl(&self) -> String {
        "ConcreteImplementorB operation".to_string()
    }
}

pub trait Abstraction {
    fn operation(&self) -> String;
    fn set_implementor(&mut self, implementor: Box<dyn Implementor>);
}

pub struct RefinedAbstraction {
    implementor: Box<dyn Implementor>,
}

impl RefinedAbstraction {
    pub fn new(implementor: Box<dyn Implementor>) -> Self {
        Self { implementor }
    }
}

impl Abstraction for RefinedAbstraction {
    fn operation(&self) -> String {
        format!("RefinedAbstraction: {}", self.implementor.operation_impl())
    }

    fn set_implementor(&mut self, implementor: Box<dyn Implementor>) {
        self.implementor = implementor;
    }
}

pub struct ExtendedAbstraction {
    implementor: Box<dyn Implementor>,
}

impl ExtendedAbstraction {
    pub fn new(implementor: Box<dyn Implementor>) -> Self {
        Self { implementor }
    }
}

impl Abstraction for ExtendedAbstraction {
    fn operation(&self) -> String {
        format!("ExtendedAbstraction: {}", self.implementor.operation_impl())
    }

    fn set_implementor(&mut self, implementor: Box<dyn Implementor>) {
        self.implementor = implementor;
    }
}

pub struct Client;

impl Client {
    pub fn use_abstraction(&self, abstraction: &dyn Abstraction) -> String {
        abstraction.operation()
    }
}
