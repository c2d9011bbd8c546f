//! Example: Declaring and printing variables

/// The values a beginner declares one binding at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub name: String,
    pub age: i32,
    pub height: f64,
    pub is_student: bool,
    pub city: String,
    pub temperature: f64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Default for Profile {
    fn default() -> Self {
        let name = "John";
        let age = 25;
        let height = 1.75;
        let is_student = true;

        let city = "New York";
        let temperature = 23.5;

        let (first_name, last_name, email) = ("Jane", "Doe", "jane@example.com");

        Self {
            name: name.to_string(),
            age,
            height,
            is_student,
            city: city.to_string(),
            temperature,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
        }
    }
}

impl Profile {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn describe(&self) -> Vec<String> {
        vec![
            format!("Name: {}", self.name),
            format!("Age: {}", self.age),
            format!("Height: {}", self.height),
            format!("Is Student: {}", self.is_student),
            format!("City: {}", self.city),
            format!("Temperature: {}", self.temperature),
            format!("Full Name: {}", self.full_name()),
            format!("Email: {}", self.email),
        ]
    }
}

/// Shadowing rebinds a name, optionally with a new type.
pub fn shadowing() -> (i32, String) {
    let value = "5";
    let value: i32 = value.parse().unwrap_or_default();
    let value = value * 2;
    let label = format!("{value}");
    (value, label)
}

#[cfg(test)]
mod variables_tests {
    use super::*;

    #[test]
    fn test_profile_values() {
        let profile = Profile::default();
        assert_eq!(profile.name, "John");
        assert_eq!(profile.age, 25);
        assert_eq!(profile.height, 1.75);
        assert!(profile.is_student);
        assert_eq!(profile.full_name(), "Jane Doe");
    }

    #[test]
    fn test_describe_lines() {
        let lines = Profile::default().describe();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[4], "City: New York");
        assert_eq!(lines[5], "Temperature: 23.5");
        assert_eq!(lines[7], "Email: jane@example.com");
    }

    #[test]
    fn test_shadowing() {
        assert_eq!(shadowing(), (10, "10".to_string()));
    }
}
