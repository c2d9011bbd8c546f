//! Pattern: Visitor
//! Example: Adding operations over a fixed set of element types

pub trait Visitor {
    fn visit_element_a(&self, element: &ConcreteElementA) -> String;
    fn visit_element_b(&self, element: &ConcreteElementB) -> String;
}

pub trait Element {
    fn accept(&self, visitor: &dyn Visitor) -> String;
}

#[derive(Debug, Clone)]
pub struct ConcreteElementA {
    name: String,
}

impl ConcreteElementA {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Element for ConcreteElementA {
    fn accept(&self, visitor: &dyn Visitor) -> String {
        visitor.visit_element_a(self)
    }
}

#[derive(Debug, Clone)]
pub struct ConcreteElementB {
    name: String,
}

impl ConcreteElementB {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Element for ConcreteElementB {
    fn accept(&self, visitor: &dyn Visitor) -> String {
        visitor.visit_element_b(self)
    }
}

pub struct ConcreteVisitor1;

impl Visitor for ConcreteVisitor1 {
    fn visit_element_a(&self, element: &ConcreteElementA) -> String {
        format!("Visitor1: Processing {}", element.name())
    }

    fn visit_element_b(&self, element: &ConcreteElementB) -> String {
        format!("Visitor1: Processing {}", element.name())
    }
}

pub struct ConcreteVisitor2;

impl Visitor for ConcreteVisitor2 {
    fn visit_element_a(&self, element: &ConcreteElementA) -> String {
        format!("Visitor2: Processing {}", element.name())
    }

    fn visit_element_b(&self, element: &ConcreteElementB) -> String {
        format!("Visitor2: Processing {}", element.name())
    }
}

#[derive(Default)]
pub struct ObjectStructure {
    elements: Vec<Box<dyn Element>>,
}

impl ObjectStructure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, element: Box<dyn Element>) {
        self.elements.push(element);
    }

    /// Removes and returns the element at `index`, if any.
    pub fn detach(&mut self, index: usize) -> Option<Box<dyn Element>> {
        (index < self.elements.len()).then(|| self.elements.remove(index))
    }

    pub fn accept(&self, visitor: &dyn Visitor) -> Vec<String> {
        self.elements.iter().map(|e| e.accept(visitor)).collect()
    }
}

#[derive(Default)]
pub struct Client {
    structure: ObjectStructure,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_element(&mut self, element: Box<dyn Element>) {
        self.structure.attach(element);
    }

    pub fn execute_visitor(&self, visitor: &dyn Visitor) -> Vec<String> {
        self.structure.accept(visitor)
    }
}
