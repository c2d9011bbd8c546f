//! Example: A document store for a small blog (users and their posts)
//!
//! Documents get random UUIDs on insert. Multi-document writes happen under
//! a single lock, so a reader never sees a user deleted without their posts.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("user not found")]
    UserNotFound,

    #[error("page and limit must be at least 1")]
    InvalidPage,
}

pub type Result<T> = std::result::Result<T, DocumentError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlogUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: u32,
    pub interests: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: u32,
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Fields to overwrite; `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub age: Option<u32>,
    pub interests: Option<Vec<String>>,
}

#[derive(Debug, Default)]
struct Collections {
    users: HashMap<Uuid, BlogUser>,
    posts: HashMap<Uuid, Post>,
}

#[derive(Debug, Default)]
pub struct BlogStore {
    db: RwLock<Collections>,
}

impl BlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Collections> {
        self.db.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Collections> {
        self.db.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn create_user(&self, user: NewUser) -> BlogUser {
        let now = Utc::now();
        let user = BlogUser {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            age: user.age,
            interests: user.interests,
            created_at: now,
            updated_at: now,
        };
        self.write().users.insert(user.id, user.clone());
        debug!(id = %user.id, "user document inserted");
        user
    }

    pub fn get_user(&self, id: Uuid) -> Result<BlogUser> {
        self.read()
            .users
            .get(&id)
            .cloned()
            .ok_or(DocumentError::UserNotFound)
    }

    pub fn create_post(&self, user_id: Uuid, post: NewPost) -> Result<Post> {
        let mut db = self.write();
        if !db.users.contains_key(&user_id) {
            return Err(DocumentError::UserNotFound);
        }
        let now = Utc::now();
        let post = Post {
            id: Uuid::new_v4(),
            user_id,
            title: post.title,
            content: post.content,
            tags: post.tags,
            created_at: now,
            updated_at: now,
        };
        db.posts.insert(post.id, post.clone());
        Ok(post)
    }

    /// Page `page` (1-based) of the user's posts, newest first.
    pub fn user_posts(&self, user_id: Uuid, page: usize, limit: usize) -> Result<Vec<Post>> {
        if page == 0 || limit == 0 {
            return Err(DocumentError::InvalidPage);
        }
        let Some(offset) = (page - 1).checked_mul(limit) else {
            return Ok(Vec::new());
        };
        let db = self.read();
        let mut posts: Vec<&Post> = db.posts.values().filter(|p| p.user_id == user_id).collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(posts
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    /// Overwrites the given fields and bumps `updated_at`.
    pub fn update_user(&self, id: Uuid, update: UserUpdate) -> Result<BlogUser> {
        let mut db = self.write();
        let user = db.users.get_mut(&id).ok_or(DocumentError::UserNotFound)?;
        if let Some(name) = update.name {
            user.name = name;
        }
        if let Some(email) = update.email {
            user.email = email;
        }
        if let Some(age) = update.age {
            user.age = age;
        }
        if let Some(interests) = update.interests {
            user.interests = interests;
        }
        user.updated_at = Utc::now();
        Ok(user.clone())
    }

    /// Removes the user and every post they wrote; returns the post count.
    pub fn delete_user_and_posts(&self, id: Uuid) -> Result<usize> {
        let mut db = self.write();
        if db.users.remove(&id).is_none() {
            return Err(DocumentError::UserNotFound);
        }
        let before = db.posts.len();
        db.posts.retain(|_, post| post.user_id != id);
        let removed = before - db.posts.len();
        info!(user = %id, posts = removed, "user and posts deleted");
        Ok(removed)
    }

    pub fn post_count(&self) -> usize {
        self.read().posts.len()
    }
}

#[cfg(test)]
mod document_store_tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    fn john() -> NewUser {
        NewUser {
            name: "John Doe".to_string(),
            email: "john@example.com".to_string(),
            age: 30,
            interests: vec!["rust".into(), "databases".into(), "web development".into()],
        }
    }

    fn post(title: &str) -> NewPost {
        NewPost {
            title: title.to_string(),
            content: "Document stores keep related data together...".to_string(),
            tags: vec!["nosql".into()],
        }
    }

    #[test]
    fn test_create_and_get_user() {
        let store = BlogStore::new();
        let user = store.create_user(john());
        assert_eq!(store.get_user(user.id).unwrap(), user);
        assert_eq!(
            store.get_user(Uuid::new_v4()).unwrap_err().to_string(),
            "user not found"
        );
    }

    #[test]
    fn test_posts_require_existing_user() {
        let store = BlogStore::new();
        assert_eq!(
            store.create_post(Uuid::new_v4(), post("orphan")),
            Err(DocumentError::UserNotFound)
        );
    }

    #[test]
    fn test_user_posts_paginated_newest_first() {
        let store = BlogStore::new();
        let user = store.create_user(john());
        for i in 0..5 {
            store.create_post(user.id, post(&format!("post {i}"))).unwrap();
            thread::sleep(std::time::Duration::from_millis(2));
        }
        let other = store.create_user(john());
        store.create_post(other.id, post("not mine")).unwrap();

        let titles = |page, limit| -> Vec<String> {
            store
                .user_posts(user.id, page, limit)
                .unwrap()
                .into_iter()
                .map(|p| p.title)
                .collect()
        };
        assert_eq!(titles(1, 2), vec!["post 4", "post 3"]);
        assert_eq!(titles(3, 2), vec!["post 0"]);
        assert!(titles(4, 2).is_empty());
        assert_eq!(store.user_posts(user.id, 0, 2), Err(DocumentError::InvalidPage));
    }

    #[test]
    fn test_documents_serialize_with_string_ids() {
        let store = BlogStore::new();
        let user = store.create_user(john());
        let created = store.create_post(user.id, post("json")).unwrap();

        let value = serde_json::to_value(&created).unwrap();
        assert_eq!(value["user_id"], user.id.to_string());
        let back: Post = serde_json::from_value(value).unwrap();
        assert_eq!(back, created);
    }

    #[test]
    fn test_user_posts_far_page_is_empty() {
        let store = BlogStore::new();
        let user = store.create_user(john());
        store.create_post(user.id, post("only")).unwrap();

        assert!(store.user_posts(user.id, usize::MAX / 2, 4).unwrap().is_empty());
        assert!(store.user_posts(user.id, usize::MAX, usize::MAX).unwrap().is_empty());
        assert_eq!(store.user_posts(user.id, 1, usize::MAX).unwrap().len(), 1);
    }

    #[test]
    fn test_update_user_sets_only_given_fields() {
        let store = BlogStore::new();
        let user = store.create_user(john());
        let updated = store
            .update_user(
                user.id,
                UserUpdate {
                    age: Some(31),
                    interests: Some(vec!["rust".into(), "cloud".into()]),
                    ..UserUpdate::default()
                },
            )
            .unwrap();

        assert_eq!(updated.age, 31);
        assert_eq!(updated.interests, vec!["rust", "cloud"]);
        assert_eq!(updated.name, "John Doe");
        assert!(updated.updated_at >= user.updated_at);
        assert_eq!(updated.created_at, user.created_at);
        assert!(store.update_user(Uuid::new_v4(), UserUpdate::default()).is_err());
    }

    #[test]
    fn test_delete_user_and_posts() {
        let store = BlogStore::new();
        let user = store.create_user(john());
        let other = store.create_user(john());
        store.create_post(user.id, post("a")).unwrap();
        store.create_post(user.id, post("b")).unwrap();
        store.create_post(other.id, post("c")).unwrap();

        assert_eq!(store.delete_user_and_posts(user.id), Ok(2));
        assert_eq!(store.post_count(), 1);
        assert!(store.get_user(user.id).is_err());
        assert_eq!(store.delete_user_and_posts(user.id), Err(DocumentError::UserNotFound));
    }

    #[test]
    fn test_concurrent_inserts() {
        let store = Arc::new(BlogStore::new());
        let user = store.create_user(john());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..25 {
                        store.create_post(user.id, post(&format!("{t}-{i}"))).unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.post_count(), 100);
    }
}
