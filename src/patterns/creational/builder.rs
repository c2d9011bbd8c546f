//! Pattern: Builder
//! Example: A director driving interchangeable builders, plus a consuming
//! fluent builder for comparison.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    part_a: String,
    part_b: String,
    part_c: String,
}

impl Product {
    pub fn part_a(&self) -> &str {
        &self.part_a
    }

    pub fn part_b(&self) -> &str {
        &self.part_b
    }

    pub fn part_c(&self) -> &str {
        &self.part_c
    }
}

pub trait Builder {
    fn build_part_a(&mut self);
    fn build_part_b(&mut self);
    fn build_part_c(&mut self);
    /// Hands over the finished product and resets the builder.
    fn product(&mut self) -> Product;
}

#[derive(Default)]
pub struct ConcreteBuilder1 {
    product: Product,
}

impl ConcreteBuilder1 {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Builder for ConcreteBuilder1 {
    fn build_part_a(&mut self) {
        self.product.part_a = "PartA1".to_string();
    }

    fn build_part_b(&mut self) {
        self.product.part_b = "PartB1".to_string();
    }

    fn build_part_c(&mut self) {
        self.product.part_c = "PartC1".to_string();
    }

    fn product(&mut self) -> Product {
        std::mem::take(&mut self.product)
    }
}

#[derive(Default)]
pub struct ConcreteBuilder2 {
    product: Product,
}

impl ConcreteBuilder2 {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Builder for ConcreteBuilder2 {
    fn build_part_a(&mut self) {
        self.product.part_a = "PartA2".to_string();
    }

    fn build_part_b(&mut self) {
        self.product.part_b = "PartB2".to_string();
    }

    fn build_part_c(&mut self) {
        self.product.part_c = "PartC2".to_string();
    }

    fn product(&mut self) -> Product {
        std::mem::take(&mut self.product)
    }
}

pub struct Director {
    builder: Box<dyn Builder>,
}

impl Director {
    pub fn new(builder: Box<dyn Builder>) -> Self {
        Self { builder }
    }

    pub fn set_builder(&mut self, builder: Box<dyn Builder>) {
        self.builder = builder;
    }

    pub fn construct(&mut self) -> Product {
        self.builder.build_part_a();
        self.builder.build_part_b();
        self.builder.build_part_c();
        self.builder.product()
    }
}

// =============================================================================
// Consuming builder
// =============================================================================

#[derive(Debug, Default)]
pub struct ProductBuilder {
    product: Product,
}

impl ProductBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn part_a(mut self, part: impl Into<String>) -> Self {
        self.product.part_a = part.into();
        self
    }

    pub fn part_b(mut self, part: impl Into<String>) -> Self {
        self.product.part_b = part.into();
        self
    }

    pub fn part_c(mut self, part: impl Into<String>) -> Self {
        self.product.part_c = part.into();
        self
    }

    pub fn build(self) -> Product {
        self.product
    }
}

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn test_director_with_builder1() {
        let mut director = Director::new(Box::new(ConcreteBuilder1::new()));
        let product = director.construct();
        assert_eq!(product.part_a(), "PartA1");
        assert_eq!(product.part_b(), "PartB1");
        assert_eq!(product.part_c(), "PartC1");
    }

    #[test]
    fn test_director_switches_builder() {
        let mut director = Director::new(Box::new(ConcreteBuilder1::new()));
        director.set_builder(Box::new(ConcreteBuilder2::new()));
        let product = director.construct();
        assert_eq!(
            (product.part_a(), product.part_b(), product.part_c()),
            ("PartA2", "PartB2", "PartC2")
        );
    }

    #[test]
    fn test_builder_resets_after_handing_over() {
        let mut builder = ConcreteBuilder1::new();
        builder.build_part_a();
        let _ = builder.product();
        assert_eq!(builder.product(), Product::default());
    }

    #[test]
    fn test_consuming_builder() {
        let product = ProductBuilder::new().part_a("x").part_c("z").build();
        assert_eq!(product.part_a(), "x");
        assert_eq!(product.part_b(), "");
        assert_eq!(product.part_c(), "z");
    }
}
