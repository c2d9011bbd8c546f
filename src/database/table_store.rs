//! Example: A key-value table of typed attribute maps
//!
//! Items are keyed by `user_id` and hold tagged attribute values (string,
//! number, string set). A secondary index on `age` answers range queries.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const KEY_ATTRIBUTE: &str = "user_id";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("user not found")]
    UserNotFound,

    #[error("attribute {0} is missing or has the wrong type")]
    BadAttribute(String),

    #[error("cannot update key attribute {KEY_ATTRIBUTE}")]
    KeyUpdate,
}

pub type Result<T> = std::result::Result<T, TableError>;

/// Numbers are kept in their decimal string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttributeValue {
    S(String),
    N(String),
    SS(Vec<String>),
}

impl AttributeValue {
    pub fn as_s(&self) -> Option<&str> {
        match self {
            AttributeValue::S(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_n(&self) -> Option<i64> {
        match self {
            AttributeValue::N(n) => n.parse().ok(),
            _ => None,
        }
    }

    pub fn as_ss(&self) -> Option<&[String]> {
        match self {
            AttributeValue::SS(set) => Some(set),
            _ => None,
        }
    }
}

pub type Item = HashMap<String, AttributeValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableUser {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub age: i64,
    pub interests: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

fn timestamp(at: DateTime<Utc>) -> AttributeValue {
    AttributeValue::S(at.to_rfc3339_opts(SecondsFormat::Secs, true))
}

fn attr<'a>(item: &'a Item, name: &str) -> Result<&'a AttributeValue> {
    item.get(name).ok_or_else(|| TableError::BadAttribute(name.to_string()))
}

fn string_attr(item: &Item, name: &str) -> Result<String> {
    attr(item, name)?
        .as_s()
        .map(str::to_string)
        .ok_or_else(|| TableError::BadAttribute(name.to_string()))
}

fn time_attr(item: &Item, name: &str) -> Result<DateTime<Utc>> {
    let raw = string_attr(item, name)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| TableError::BadAttribute(name.to_string()))
}

impl TableUser {
    pub fn new(user_id: &str, name: &str, email: &str, age: i64, interests: &[&str]) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            age,
            interests: interests.iter().map(|s| s.to_string()).collect(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn to_item(&self) -> Item {
        HashMap::from([
            (KEY_ATTRIBUTE.to_string(), AttributeValue::S(self.user_id.clone())),
            ("name".to_string(), AttributeValue::S(self.name.clone())),
            ("email".to_string(), AttributeValue::S(self.email.clone())),
            ("age".to_string(), AttributeValue::N(self.age.to_string())),
            ("interests".to_string(), AttributeValue::SS(self.interests.clone())),
            ("created_at".to_string(), timestamp(self.created_at)),
            ("updated_at".to_string(), timestamp(self.updated_at)),
        ])
    }

    pub fn from_item(item: &Item) -> Result<Self> {
        Ok(Self {
            user_id: string_attr(item, KEY_ATTRIBUTE)?,
            name: string_attr(item, "name")?,
            email: string_attr(item, "email")?,
            age: attr(item, "age")?
                .as_n()
                .ok_or_else(|| TableError::BadAttribute("age".to_string()))?,
            interests: attr(item, "interests")?
                .as_ss()
                .map(<[String]>::to_vec)
                .ok_or_else(|| TableError::BadAttribute("interests".to_string()))?,
            created_at: time_attr(item, "created_at")?,
            updated_at: time_attr(item, "updated_at")?,
        })
    }
}

#[derive(Debug, Default)]
struct Table {
    items: HashMap<String, Item>,
    age_index: BTreeMap<i64, BTreeSet<String>>,
}

impl Table {
    fn index(&mut self, id: &str, item: &Item) {
        if let Some(age) = item.get("age").and_then(AttributeValue::as_n) {
            self.age_index.entry(age).or_default().insert(id.to_string());
        }
    }

    fn unindex(&mut self, id: &str, item: &Item) {
        let Some(age) = item.get("age").and_then(AttributeValue::as_n) else {
            return;
        };
        if let Some(ids) = self.age_index.get_mut(&age) {
            ids.remove(id);
            if ids.is_empty() {
                self.age_index.remove(&age);
            }
        }
    }
}

/// A `users` table with an `age` index.
#[derive(Debug, Default)]
pub struct UserTable {
    table: RwLock<Table>,
}

impl UserTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the user, stamping both timestamps and replacing any item with
    /// the same id.
    pub fn put_user(&self, user: &mut TableUser) {
        let now = Utc::now();
        user.created_at = now;
        user.updated_at = now;
        let item = user.to_item();

        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(old) = table.items.remove(&user.user_id) {
            table.unindex(&user.user_id, &old);
        }
        table.index(&user.user_id, &item);
        table.items.insert(user.user_id.clone(), item);
        debug!(user_id = %user.user_id, "item put");
    }

    pub fn get_user(&self, user_id: &str) -> Result<TableUser> {
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        let item = table.items.get(user_id).ok_or(TableError::UserNotFound)?;
        TableUser::from_item(item)
    }

    /// Assigns each attribute in `updates` and refreshes `updated_at`. The
    /// stored item is left untouched unless the merged item is a valid user.
    pub fn update_user(&self, user_id: &str, mut updates: Item) -> Result<TableUser> {
        if updates.contains_key(KEY_ATTRIBUTE) {
            return Err(TableError::KeyUpdate);
        }
        updates.insert("updated_at".to_string(), timestamp(Utc::now()));

        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        let current = table.items.get(user_id).ok_or(TableError::UserNotFound)?;
        let mut merged = current.clone();
        merged.extend(updates);
        let user = TableUser::from_item(&merged)?;

        if let Some(old) = table.items.remove(user_id) {
            table.unindex(user_id, &old);
        }
        table.index(user_id, &merged);
        table.items.insert(user_id.to_string(), merged);
        Ok(user)
    }

    pub fn delete_user(&self, user_id: &str) -> Result<()> {
        let mut table = self.table.write().unwrap_or_else(PoisonError::into_inner);
        let item = table.items.remove(user_id).ok_or(TableError::UserNotFound)?;
        table.unindex(user_id, &item);
        Ok(())
    }

    /// Users with `min <= age <= max`, ordered by age then id.
    pub fn query_by_age(&self, min: i64, max: i64) -> Result<Vec<TableUser>> {
        if min > max {
            return Ok(Vec::new());
        }
        let table = self.table.read().unwrap_or_else(PoisonError::into_inner);
        table
            .age_index
            .range(min..=max)
            .flat_map(|(_, ids)| ids.iter())
            .filter_map(|id| table.items.get(id))
            .map(TableUser::from_item)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.table.read().unwrap_or_else(PoisonError::into_inner).items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod table_store_tests {
    use super::*;

    fn seeded() -> UserTable {
        let table = UserTable::new();
        for (id, name, age) in [("user1", "John Doe", 30), ("user2", "Ann Lee", 24), ("user3", "Bo Kim", 35)] {
            let mut user = TableUser::new(id, name, &format!("{id}@example.com"), age, &["rust", "cloud"]);
            table.put_user(&mut user);
        }
        table
    }

    #[test]
    fn test_item_round_trip() {
        let user = TableUser::new("user1", "John Doe", "john@example.com", 30, &["rust"]);
        let item = user.to_item();
        assert_eq!(item["age"], AttributeValue::N("30".to_string()));
        assert_eq!(item["interests"], AttributeValue::SS(vec!["rust".to_string()]));
        let back = TableUser::from_item(&item).unwrap();
        assert_eq!(back.name, "John Doe");
        assert_eq!(back.created_at.timestamp(), user.created_at.timestamp());
    }

    #[test]
    fn test_from_item_rejects_wrong_types() {
        let mut item = TableUser::new("u", "n", "e", 1, &[]).to_item();
        item.insert("age".to_string(), AttributeValue::S("old".to_string()));
        assert_eq!(
            TableUser::from_item(&item),
            Err(TableError::BadAttribute("age".to_string()))
        );
    }

    #[test]
    fn test_get_and_delete() {
        let table = seeded();
        assert_eq!(table.get_user("user1").unwrap().email, "user1@example.com");
        table.delete_user("user1").unwrap();
        assert_eq!(table.get_user("user1").unwrap_err().to_string(), "user not found");
        assert_eq!(table.delete_user("user1"), Err(TableError::UserNotFound));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_update_sets_attributes_and_reindexes() {
        let table = seeded();
        let before = table.get_user("user1").unwrap();
        let updates = Item::from([
            ("name".to_string(), AttributeValue::S("John Smith".to_string())),
            ("age".to_string(), AttributeValue::N("31".to_string())),
            (
                "interests".to_string(),
                AttributeValue::SS(vec!["rust".into(), "cloud".into(), "tables".into()]),
            ),
        ]);
        let user = table.update_user("user1", updates).unwrap();
        assert_eq!(user.name, "John Smith");
        assert_eq!(user.age, 31);
        assert_eq!(user.email, before.email);
        assert!(user.updated_at >= before.updated_at);

        let ages: Vec<i64> = table.query_by_age(31, 31).unwrap().iter().map(|u| u.age).collect();
        assert_eq!(ages, vec![31]);
        assert!(table.query_by_age(30, 30).unwrap().is_empty());
    }

    #[test]
    fn test_update_rejects_key_and_missing_user() {
        let table = seeded();
        let key_change = Item::from([(KEY_ATTRIBUTE.to_string(), AttributeValue::S("x".into()))]);
        assert_eq!(table.update_user("user1", key_change), Err(TableError::KeyUpdate));
        assert_eq!(table.update_user("nobody", Item::new()), Err(TableError::UserNotFound));
    }

    #[test]
    fn test_rejected_update_leaves_item_unchanged() {
        let table = seeded();
        let before = table.get_user("user1").unwrap();
        let updates = Item::from([
            ("name".to_string(), AttributeValue::S("Changed".to_string())),
            ("email".to_string(), AttributeValue::N("5".to_string())),
        ]);
        assert_eq!(
            table.update_user("user1", updates),
            Err(TableError::BadAttribute("email".to_string()))
        );
        assert_eq!(table.get_user("user1").unwrap(), before);
        assert_eq!(table.query_by_age(0, 100).unwrap().len(), 3);

        let bad_age = Item::from([("age".to_string(), AttributeValue::S("old".to_string()))]);
        assert_eq!(
            table.update_user("user1", bad_age),
            Err(TableError::BadAttribute("age".to_string()))
        );
        assert_eq!(table.query_by_age(30, 30).unwrap(), vec![before]);
    }

    #[test]
    fn test_query_by_age_range() {
        let table = seeded();
        let names: Vec<String> = table
            .query_by_age(25, 35)
            .unwrap()
            .into_iter()
            .map(|u| u.name)
            .collect();
        assert_eq!(names, vec!["John Doe", "Bo Kim"]);
        assert!(table.query_by_age(40, 20).unwrap().is_empty());
    }
}
