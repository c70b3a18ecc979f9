//! In-memory user records backing the validation endpoints.
//!
//! The store is volatile and append-only. The availability checks and
//! the signup insert are independent operations with no transactional
//! link between them, so two concurrent signups for the same username
//! can both land. That race is a property of the mock, kept on purpose.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;
use utoipa::ToSchema;

/// A signup record. The mock stores whatever the signup request carried,
/// plaintext password included.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct User {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tos: Option<bool>,
}

#[derive(Clone, Debug)]
pub struct UserStore {
    users: Arc<RwLock<Vec<User>>>,
}

impl UserStore {
    #[must_use]
    pub fn new(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    /// Store pre-populated with the record the demo expects to be taken.
    #[must_use]
    pub fn seeded() -> Self {
        Self::new(vec![User {
            username: "Omar Yehia".to_string(),
            email: "a@b".to_string(),
            password: None,
            tos: None,
        }])
    }

    /// Exact, case-sensitive match against existing usernames.
    pub async fn username_taken(&self, username: &str) -> bool {
        self.users
            .read()
            .await
            .iter()
            .any(|user| user.username == username)
    }

    /// Exact, case-sensitive match against existing emails.
    pub async fn email_taken(&self, email: &str) -> bool {
        self.users.read().await.iter().any(|user| user.email == email)
    }

    /// Append unconditionally and return a snapshot of all records.
    pub async fn insert(&self, user: User) -> Vec<User> {
        let mut users = self.users.write().await;
        users.push(user);
        users.clone()
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
