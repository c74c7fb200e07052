//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - User entity, value objects, repository trait
//! - `application/` - Use cases (sign-in, session check, user management, CSRF)
//! - `infra/` - PostgreSQL and in-memory repositories
//! - `presentation/` - HTTP handlers, DTOs, router, middleware
//!
//! ## Security Model
//! - Session-less: the `userid` cookie holds signed `{uid, iat}` claims
//!   (HMAC-SHA1, optional zlib), verified on every request
//! - Key rotation through a previous key accepted for verification only
//! - Only staff users may sign in
//! - Passwords hashed with Argon2id
//! - Double-submit CSRF token on every unsafe request

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

pub use application::config::AuthConfig;
pub use error::{AuthError, AuthResult};
pub use infra::{InMemoryUserRepository, PgUserRepository};
pub use presentation::router::{auth_router, auth_router_generic, with_auth_layers};

pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::user::User;
    pub use crate::domain::value_object::*;
    pub use crate::presentation::dto::*;
}

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

#[cfg(test)]
pub(crate) mod test_support {
    use platform::password::ClearTextPassword;

    use crate::domain::entity::user::User;
    use crate::domain::value_object::user_name::UserName;

    pub fn staff_user(user_name: &str, password: &str) -> User {
        let hash = ClearTextPassword::for_verification(password.to_string())
            .hash(None)
            .unwrap();
        User::new(UserName::new(user_name).unwrap(), hash)
            .with_names("Test", "Editor")
            .with_staff(true)
    }
}
