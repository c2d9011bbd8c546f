//! Example: Plain structs, serde attributes, composition and traits

#![allow(clippy::approx_constant)]

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: u32,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Contact {
    pub phone: String,
    pub email: String,
    pub address: Address,
}

impl Contact {
    pub fn city(&self) -> &str {
        &self.address.city
    }
}

pub trait Shape {
    fn area(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle {
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn scale(&mut self, factor: f64) {
        self.width *= factor;
        self.height *= factor;
    }
}

impl Shape for Rectangle {
    fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub radius: f64,
}

impl Shape for Circle {
    fn area(&self) -> f64 {
        3.14159 * self.radius * self.radius
    }
}

/// Areas formatted to two decimals.
pub fn shape_areas(shapes: &[Box<dyn Shape>]) -> Vec<String> {
    shapes
        .iter()
        .map(|shape| format!("Area: {:.2}", shape.area()))
        .collect()
}

/// Tuple struct standing in for a one-off anonymous record.
#[derive(Debug, Clone, PartialEq)]
pub struct Car(pub &'static str, pub &'static str, pub u16);

pub fn sample_car() -> Car {
    Car("Toyota", "Camry", 2020)
}
