//! Pattern: Decorator
//! Example: Stacking behaviour around a component without subclassing

pub trait Component {
    fn operation(&self) -> String;
}

pub struct ConcreteComponent {
    name: String,
}

impl ConcreteComponent {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Component for ConcreteComponent {
    fn operation(&self) -> String {
        format!("ConcreteComponent {}", self.name)
    }
}

pub struct ConcreteDecoratorA {
    component: Box<dyn Component>,
    added_state: String,
}

impl ConcreteDecoratorA {
    pub fn new(component: Box<dyn Component>, added_state: impl Into<String>) -> Self {
        Self {
            component,
            added_state: added_state.into(),
        }
    }
}

impl Component for ConcreteDecoratorA {
    fn operation(&self) -> String {
        format!(
            "{} with ConcreteDecoratorA {}",
            self.component.operation(),
            self.added_state
        )
    }
}

pub struct ConcreteDecoratorB<F>
where
    F: Fn(String) -> String,
{
    component: Box<dyn Component>,
    added_behavior: F,
}

impl<F> ConcreteDecoratorB<F>
where
    F: Fn(String) -> String,
{
    pub fn new(component: Box<dyn Component>, added_behavior: F) -> Self {
        Self {
            component,
            added_behavior,
        }
    }
}

impl<F> Component for ConcreteDecoratorB<F>
where
    F: Fn(String) -> String,
{
    fn operation(&self) -> String {
        (self.added_behavior)(self.component.operation())
    }
}
