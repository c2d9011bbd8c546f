//! Pattern: Strategy
//! Example: Swapping an algorithm at runtime

pub trait Strategy {
    fn execute(&self, data: &str) -> String;
}

pub struct ConcreteStrategyA;

impl Strategy for ConcreteStrategyA {
    fn execute(&self, data: &str) -> String {
        format!("Strategy A: {}", data)
    }
}

pub struct ConcreteStrategyB;

impl Strategy for ConcreteStrategyB {
    fn execute(&self, data: &str) -> String {
        format!("Strategy B: {}", data)
    }
}

// Closures make handy one-off strategies.
impl<F> Strategy for F
where
    F: Fn(&str) -> String,
{
    fn execute(&self, data: &str) -> String {
        self(data)
    }
}

pub struct Context {
    strategy: Box<dyn Strategy>,
}

impl Context {
    pub fn new(strategy: Box<dyn Strategy>) -> Self {
        Self { strategy }
    }

    pub fn set_strategy(&mut self, strategy: Box<dyn Strategy>) {
        self.strategy = strategy;
    }

    pub fn execute_strategy(&self, data: &str) -> String {
        self.strategy.execute(data)
    }
}

pub struct Client {
    context: Context,
}

impl Client {
    pub fn new(strategy: Box<dyn Strategy>) -> Self {
        Self {
            context: Context::new(strategy),
        }
    }

    pub fn execute_strategy(&self, data: &str) -> String {
        self.context.execute_strategy(data)
    }

    pub fn change_strategy(&mut self, strategy: Box<dyn Strategy>) {
        self.context.set_strategy(strategy);
    }
}
