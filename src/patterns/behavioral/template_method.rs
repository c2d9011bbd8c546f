//! Pattern: Template Method
//! Example: A fixed algorithm skeleton with overridable steps
//!
//! The skeleton is the trait's provided method; implementors fill in the
//! primitive operations and may leave the hook empty.

pub trait AbstractClass {
    fn primitive_operation1(&self) -> String;
    fn primitive_operation2(&self) -> String;

    fn hook(&self) -> String {
        String::new()
    }

    fn template_method(&self) -> String {
        let mut steps = vec![self.primitive_operation1(), self.primitive_operation2()];
        let hook = self.hook();
        if !hook.is_empty() {
            steps.push(hook);
        }
        steps.join(" -> ")
    }
}

pub struct ConcreteClassA;

impl AbstractClass for ConcreteClassA {
    fn primitive_operation1(&self) -> String {
        "ConcreteClassA: Step 1".to_string()
    }

    fn primitive_operation2(&self) -> String {
        "ConcreteClassA: Step 2".to_string()
    }

    fn hook(&self) -> String {
        "ConcreteClassA: Hook".to_string()
    }
}

pub struct ConcreteClassB;

impl AbstractClass for ConcreteClassB {
    fn primitive_operation1(&self) -> String {
        "ConcreteClassB: Step 1".to_string()
    }

    fn primitive_operation2(&self) -> String {
        "ConcreteClassB: Step 2".to_string()
    }
}

pub struct Client<'a> {
    class: &'a dyn AbstractClass,
}

impl<'a> Client<'a> {
    pub fn new(class: &'a dyn AbstractClass) -> Self {
        Self { class }
    }

    pub fn execute_algorithm(&self) -> String {
        self.class.template_method()
    }
}
