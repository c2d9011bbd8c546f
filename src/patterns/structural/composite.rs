//! Pattern: Composite
//! Example: Leaves and branches rendered through one `Component` interface

pub trait Component {
    fn operation(&self) -> String;

    /// Leaves ignore children.
    fn add(&mut self, _component: Box<dyn Component>) {}

    fn remove(&mut self, _index: usize) -> Option<Box<dyn Component>> {
        None
    }

    fn get_child(&self, _index: usize) -> Option<&dyn Component> {
        None
    }
}

pub struct Leaf {
    name: String,
}

impl Leaf {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Component for Leaf {
    fn operation(&self) -> String {
        format!("Leaf {}", self.name)
    }
}

pub struct Composite {
    name: String,
    children: Vec<Box<dyn Component>>,
}

impl Composite {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

impl Component for Composite {
    fn operation(&self) -> String {
        let children: Vec<String> = self.children.iter().map(|c| c.operation()).collect();
        format!("Composite {} [{}]", self.name, children.join(", "))
    }

    fn add(&mut self, component: Box<dyn Component>) {
        self.children.push(component);
    }

    fn remove(&mut self, index: usize) -> Option<Box<dyn Component>> {
        (index < self.children.len()).then(|| self.children.remove(index))
    }

    fn get_child(&self, index: usize) -> Option<&dyn Component> {
        self.children.get(index).map(|c| c.as_ref())
    }
}
