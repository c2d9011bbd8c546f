//! Example: A user service with every error path covered by tests

use std::collections::HashMap;

use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserServiceError {
    #[error("age cannot be negative")]
    NegativeAge,

    #[error("name cannot be empty")]
    EmptyName,

    #[error("user not found")]
    NotFound,
}

pub type Result<T> = std::result::Result<T, UserServiceError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceUser {
    pub id: u64,
    pub name: String,
    pub age: i32,
    pub is_active: bool,
}

fn validate(name: &str, age: i32) -> Result<()> {
    if age < 0 {
        return Err(UserServiceError::NegativeAge);
    }
    if name.is_empty() {
        return Err(UserServiceError::EmptyName);
    }
    Ok(())
}

#[derive(Debug, Default)]
pub struct UserService {
    users: HashMap<u64, ServiceUser>,
    next_id: u64,
}

impl UserService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids are never reused, even after a delete.
    pub fn create_user(&mut self, name: &str, age: i32) -> Result<ServiceUser> {
        validate(name, age)?;
        self.next_id += 1;
        let user = ServiceUser {
            id: self.next_id,
            name: name.to_string(),
            age,
            is_active: true,
        };
        self.users.insert(user.id, user.clone());
        Ok(user)
    }

    pub fn get_user(&self, id: u64) -> Result<&ServiceUser> {
        self.users.get(&id).ok_or(UserServiceError::NotFound)
    }

    pub fn update_user(&mut self, id: u64, name: &str, age: i32) -> Result<()> {
        let user = self.users.get_mut(&id).ok_or(UserServiceError::NotFound)?;
        validate(name, age)?;
        user.name = name.to_string();
        user.age = age;
        Ok(())
    }

    pub fn delete_user(&mut self, id: u64) -> Result<()> {
        self.users
            .remove(&id)
            .map(|_| ())
            .ok_or(UserServiceError::NotFound)
    }

    pub fn deactivate_user(&mut self, id: u64) -> Result<()> {
        let user = self.users.get_mut(&id).ok_or(UserServiceError::NotFound)?;
        user.is_active = false;
        Ok(())
    }

    pub fn active_users(&self) -> Vec<&ServiceUser> {
        let mut active: Vec<&ServiceUser> = self.users.values().filter(|u| u.is_active).collect();
        active.sort_by_key(|u| u.id);
        active
    }
}

#[cfg(test)]
mod user_service_tests {
    use super::*;

    #[test]
    fn test_create_user_validation_order() {
        let mut service = UserService::new();
        let cases = [
            ("valid user", "John", 30, None),
            ("negative age", "John", -1, Some(UserServiceError::NegativeAge)),
            ("empty name", "", 30, Some(UserServiceError::EmptyName)),
            ("both invalid", "", -5, Some(UserServiceError::NegativeAge)),
        ];
        for (label, name, age, expected) in cases {
            let result = service.create_user(name, age);
            assert_eq!(result.as_ref().err().copied(), expected, "{label}");
            if let Ok(user) = result {
                assert!(user.is_active);
                assert_eq!(user.name, name);
            }
        }
    }

    #[test]
    fn test_get_and_update() {
        let mut service = UserService::new();
        let user = service.create_user("John", 30).unwrap();
        assert_eq!(service.get_user(user.id).unwrap().age, 30);

        service.update_user(user.id, "Jane", 25).unwrap();
        let updated = service.get_user(user.id).unwrap();
        assert_eq!((updated.name.as_str(), updated.age), ("Jane", 25));

        assert_eq!(service.update_user(user.id, "Jane", -1), Err(UserServiceError::NegativeAge));
        assert_eq!(service.update_user(user.id, "", 20), Err(UserServiceError::EmptyName));
        assert_eq!(service.update_user(999, "x", 1), Err(UserServiceError::NotFound));
        assert_eq!(service.get_user(999).unwrap_err().to_string(), "user not found");
    }

    #[test]
    fn test_delete_keeps_ids_unique() {
        let mut service = UserService::new();
        let first = service.create_user("A", 1).unwrap();
        let second = service.create_user("B", 2).unwrap();
        service.delete_user(first.id).unwrap();
        assert_eq!(service.delete_user(first.id), Err(UserServiceError::NotFound));

        let third = service.create_user("C", 3).unwrap();
        assert_ne!(third.id, second.id);
        assert_eq!(third.id, 3);
    }

    #[test]
    fn test_active_users_sorted() {
        let mut service = UserService::new();
        for (name, age) in [("A", 1), ("B", 2), ("C", 3), ("D", 4)] {
            service.create_user(name, age).unwrap();
        }
        service.deactivate_user(2).unwrap();
        assert_eq!(service.deactivate_user(42), Err(UserServiceError::NotFound));

        let ids: Vec<u64> = service.active_users().iter().map(|u| u.id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }
}
