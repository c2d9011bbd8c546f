//! Pattern: Abstract Factory
//! Example: Families of related products created together

pub trait ProductA {
    fn operation_a(&self) -> String;
}

pub trait ProductB {
    fn operation_b(&self) -> String;
    fn interact_with_a(&self, a: &dyn ProductA) -> String;
}

pub trait AbstractFactory {
    fn create_product_a(&self) -> Box<dyn ProductA>;
    fn create_product_b(&self) -> Box<dyn ProductB>;
}

pub struct ConcreteProductA1;
pub struct ConcreteProductA2;
pub struct ConcreteProductB1;
pub struct ConcreteProductB2;

impl ProductA for ConcreteProductA1 {
    fn operation_a(&self) -> String {
        "ConcreteProductA1 operation".to_string()
    }
}

impl ProductA for ConcreteProductA2 {
    fn operation_a(&self) -> String {
        "ConcreteProductA2 operation".to_string()
    }
}

impl ProductB for ConcreteProductB1 {
    fn operation_b(&self) -> String {
        "ConcreteProductB1 operation".to_string()
    }

    fn interact_with_a(&self, a: &dyn ProductA) -> String {
        format!("ConcreteProductB1 interacting with {}", a.operation_a())
    }
}

impl ProductB for ConcreteProductB2 {
    fn operation_b(&self) -> String {
        "ConcreteProductB2 operation".to_string()
    }

    fn interact_with_a(&self, a: &dyn ProductA) -> String {
        format!("ConcreteProductB2 interacting with {}", a.operation_a())
    }
}

pub struct ConcreteFactory1;
pub struct ConcreteFactory2;

impl AbstractFactory for ConcreteFactory1 {
    fn create_product_a(&self) -> Box<dyn ProductA> {
        Box::new(ConcreteProductA1)
    }

    fn create_product_b(&self) -> Box<dyn ProductB> {
        Box::new(ConcreteProductB1)
    }
}

impl AbstractFactory for ConcreteFactory2 {
    fn create_product_a(&self) -> Box<dyn ProductA> {
        Box::new(ConcreteProductA2)
    }

    fn create_product_b(&self) -> Box<dyn ProductB> {
        Box::new(ConcreteProductB2)
    }
}

/// `"1"` and `"2"` select a product family; anything else yields `None`.
pub fn new_factory(factory_type: &str) -> Option<Box<dyn AbstractFactory>> {
    match factory_type {
        "1" => Some(Box::new(ConcreteFactory1)),
        "2" => Some(Box::new(ConcreteFactory2)),
        _ => None,
    }
}

pub struct Client;

impl Client {
    pub fn create_products(&self, factory: &dyn AbstractFactory) -> (String, String) {
        let a = factory.create_product_a();
        let b = factory.create_product_b();
        (a.operation_a(), b.interact_with_a(a.as_ref()))
    }
}
