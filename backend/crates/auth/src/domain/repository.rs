//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in `infra/`.

use crate::domain::entity::user::User;
use crate::domain::value_object::{user_id::UserId, user_name::UserName};
use crate::error::AuthResult;

#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Fails with `UserNameTaken` when the canonical name exists
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: &UserId) -> AuthResult<Option<User>>;

    /// Case-insensitive
    async fn find_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    /// All users ordered by user name
    async fn list(&self) -> AuthResult<Vec<User>>;

    async fn update(&self, user: &User) -> AuthResult<()>;

    /// Returns the removed user, if there was one
    async fn delete_by_user_name(&self, user_name: &UserName) -> AuthResult<Option<User>>;
}
