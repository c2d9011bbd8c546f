//! Pattern: Adapter
//! Example: Exposing an incompatible type through the `Target` interface

pub trait Target {
    fn request(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct Adaptee {
    specific_request: String,
}

impl Adaptee {
    pub fn new(specific_request: impl Into<String>) -> Self {
        Self {
            specific_request: specific_request.into(),
        }
    }

    pub fn specific_request(&self) -> String {
        self.specific_request.clone()
    }
}

/// Wraps a borrowed adaptee and labels its output.
pub struct Adapter<'a> {
    adaptee: &'a Adaptee,
}

impl<'a> Adapter<'a> {
    pub fn new(adaptee: &'a Adaptee) -> Self {
        Self { adaptee }
    }
}

impl Target for Adapter<'_> {
    fn request(&self) -> String {
        format!("Adapter: {}", self.adaptee.specific_request())
    }
}

/// Implements `Target` directly on a newtype around the adaptee.
pub struct ClassAdapter(Adaptee);

impl ClassAdapter {
    pub fn new(specific_request: impl Into<String>) -> Self {
        Self(Adaptee::new(specific_request))
    }
}

impl std::ops::Deref for ClassAdapter {
    type Target = Adaptee;

    fn deref(&self) -> &Adaptee {
        &self.0
    }
}

impl Target for ClassAdapter {
    fn request(&self) -> String {
        self.specific_request()
    }
}

/// Owns its adaptee and delegates to it.
pub struct ObjectAdapter {
    adaptee: Adaptee,
}

impl ObjectAdapter {
    pub fn new(specific_request: impl Into<String>) -> Self {
        Self {
            adaptee: Adaptee::new(specific_request),
        }
    }
}

impl Target for ObjectAdapter {
    fn request(&self) -> String {
        self.adaptee.specific_request()
    }
}

pub struct Client;

impl Client {
    pub fn use_target(&self, target: &dyn Target) -> String {
        target.request()
    }
}
