//! Application Layer
//!
//! Use cases and application services.

pub mod check_session;
pub mod config;
pub mod csrf;
pub mod manage_users;
pub mod sign_in;

pub use check_session::CheckSessionUseCase;
pub use config::AuthConfig;
pub use manage_users::{AddUserInput, ManageUsersUseCase};
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
