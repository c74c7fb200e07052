//! Entry Author
//!
//! Snapshot of the admin who wrote an entry. The name survives the
//! account being removed.

use kernel::id::UserId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub user_id: Option<UserId>,
    pub name: String,
}

impl Author {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            name: name.into(),
        }
    }
}

impl From<&auth::models::User> for Author {
    fn from(user: &auth::models::User) -> Self {
        Self::new(user.user_id, user.full_name())
    }
}
