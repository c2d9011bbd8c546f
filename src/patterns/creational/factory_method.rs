//! Pattern: Factory Method
//! Example: Creators deferring product construction to a factory method

pub trait Product {
    fn operation(&self) -> String;
    fn name(&self) -> &str;
}

pub struct ConcreteProductA {
    name: String,
}

impl Product for ConcreteProductA {
    fn operation(&self) -> String {
        "ConcreteProductA operation".to_string()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub struct ConcreteProductB {
    name: String,
}

impl Product for ConcreteProductB {
    fn operation(&self) -> String {
        "ConcreteProductB operation".to_string()
    }

    fn name(&self) -> &str {
        &self.name
    }
}

pub trait Creator {
    fn factory_method(&self, name: &str) -> Box<dyn Product>;

    /// Label prepended by `some_operation`.
    fn label(&self) -> &'static str;

    fn some_operation(&self, name: &str) -> String {
        let product = self.factory_method(name);
        format!("{}: {}", self.label(), product.operation())
    }
}

pub struct ConcreteCreatorA;

impl Creator for ConcreteCreatorA {
    fn factory_method(&self, name: &str) -> Box<dyn Product> {
        Box::new(ConcreteProductA {
            name: name.to_string(),
        })
    }

    fn label(&self) -> &'static str {
        "CreatorA"
    }
}

pub struct ConcreteCreatorB;

impl Creator for ConcreteCreatorB {
    fn factory_method(&self, name: &str) -> Box<dyn Product> {
        Box::new(ConcreteProductB {
            name: name.to_string(),
        })
    }

    fn label(&self) -> &'static str {
        "CreatorB"
    }
}

pub fn new_creator(creator_type: &str) -> Option<Box<dyn Creator>> {
    match creator_type {
        "A" => Some(Box::new(ConcreteCreatorA)),
        "B" => Some(Box::new(ConcreteCreatorB)),
        _ => None,
    }
}

pub struct Client;

impl Client {
    pub fn use_creator(&self, creator: &dyn Creator, name: &str) -> String {
        creator.some_operation(name)
    }
}

#[cfg(test)]
mod factory_method_tests {
    use super::*;

    #[test]
    fn test_products_keep_their_names() {
        let product = ConcreteCreatorA.factory_method("widget");
        assert_eq!(product.name(), "widget");
        assert_eq!(product.operation(), "ConcreteProductA operation");
        assert_eq!(
            ConcreteCreatorB.factory_method("gadget").operation(),
            "ConcreteProductB operation"
        );
    }

    #[test]
    fn test_some_operation() {
        assert_eq!(
            ConcreteCreatorA.some_operation("x"),
            "CreatorA: ConcreteProductA operation"
        );
        assert_eq!(
            ConcreteCreatorB.some_operation("x"),
            "CreatorB: ConcreteProductB operation"
        );
    }

    #[test]
    fn test_new_creator_and_client() {
        let creator = new_creator("B").unwrap();
        assert_eq!(
            Client.use_creator(creator.as_ref(), "test"),
            "CreatorB: ConcreteProductB operation"
        );
        assert!(new_creator("C").is_none());
    }
}
