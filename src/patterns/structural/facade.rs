//! Pattern: Facade
//! Example: One entry point over three subsystems

pub struct SubsystemA {
    name: String,
}

impl SubsystemA {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn operation_a(&self) -> String {
        format!("SubsystemA {} operation", self.name)
    }
}

pub struct SubsystemB {
    name: String,
}

impl SubsystemB {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn operation_b(&self) -> String {
        format!("SubsystemB {} operation", self.name)
    }
}

pub struct SubsystemC {
    name: String,
}

impl SubsystemC {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn operation_c(&self) -> String {
        format!("SubsystemC {} operation", self.name)
    }
}

pub struct Facade {
    subsystem_a: SubsystemA,
    subsystem_b: SubsystemB,
    subsystem_c: SubsystemC,
}

impl Facade {
    /// Each subsystem is named `{name}_A`, `{name}_B` and `{name}_C`.
    pub fn new(name: &str) -> Self {
        Self {
            subsystem_a: SubsystemA::new(format!("{name}_A")),
            subsystem_b: SubsystemB::new(format!("{name}_B")),
            subsystem_c: SubsystemC::new(format!("{name}_C")),
        }
    }

    pub fn operation(&self) -> String {
        format!(
            "Facade operation:\n- {}\n- {}\n- {}",
            self.subsystem_a.operation_a(),
            self.subsystem_b.operation_b(),
            self.subsystem_c.operation_c()
        )
    }
}

pub struct Client {
    facade: Facade,
}

impl Client {
    pub fn new(facade: Facade) -> Self {
        Self { facade }
    }

    pub fn use_facade(&self) -> String {
        self.facade.operation()
    }
}
