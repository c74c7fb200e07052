//! User Entity
//!
//! Blog administrators. Every account created through the management CLI
//! is staff; `is_staff` exists so an account can be kept but locked out.

use chrono::{DateTime, Utc};
use platform::password::HashedPassword;

use crate::domain::value_object::{email::Email, user_id::UserId, user_name::UserName};

#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub user_name: UserName,
    pub email: Option<Email>,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: HashedPassword,
    pub is_staff: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(user_name: UserName, password_hash: HashedPassword) -> Self {
        let now = Utc::now();
        Self {
            user_id: UserId::new(),
            user_name,
            email: None,
            first_name: String::new(),
            last_name: String::new(),
            password_hash,
            is_staff: false,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_names(mut self, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        self.first_name = first_name.into().trim().to_string();
        self.last_name = last_name.into().trim().to_string();
        self
    }

    pub fn with_email(mut self, email: Option<Email>) -> Self {
        self.email = email;
        self
    }

    pub fn with_staff(mut self, is_staff: bool) -> Self {
        self.is_staff = is_staff;
        self
    }

    /// "First Last", falling back to the user name when both are blank
    pub fn full_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.user_name.to_string()
        } else {
            full.to_string()
        }
    }

    pub fn record_login(&mut self) {
        let now = Utc::now();
        self.last_login_at = Some(now);
        self.updated_at = now;
    }
}
