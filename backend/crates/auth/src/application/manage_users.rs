//! Manage Users Use Case
//!
//! Account administration behind the `manage` CLI: add, list, remove.

use std::sync::Arc;

use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_name::UserName};
use crate::error::{AuthError, AuthResult};

pub struct AddUserInput {
    pub user_name: String,
    pub password: String,
    pub email: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

pub struct ManageUsersUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> ManageUsersUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Create a staff user
    pub async fn add_user(&self, input: AddUserInput) -> AuthResult<User> {
        let user_name = UserName::new(&input.user_name)?;
        let email = Email::parse_optional(input.email.as_deref())?;
        let password = ClearTextPassword::new(input.password)?;

        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }

        let password_hash = password.hash(self.config.pepper())?;
        let user = User::new(user_name, password_hash)
            .with_names(input.first_name, input.last_name)
            .with_email(email)
            .with_staff(true);

        self.user_repo.create(&user).await?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User added"
        );
        Ok(user)
    }

    pub async fn list_users(&self) -> AuthResult<Vec<User>> {
        self.user_repo.list().await
    }

    pub async fn remove_user(&self, user_name: &str) -> AuthResult<User> {
        let user_name = UserName::new(user_name).map_err(|_| AuthError::UserNotFound)?;
        let removed = self
            .user_repo
            .delete_by_user_name(&user_name)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        tracing::info!(
            user_id = %removed.user_id,
            user_name = %removed.user_name,
            "User removed"
        );
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryUserRepository;

    fn use_case() -> ManageUsersUseCase<InMemoryUserRepository> {
        ManageUsersUseCase::new(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(AuthConfig::development()),
        )
    }

    fn input(user_name: &str) -> AddUserInput {
        AddUserInput {
            user_name: user_name.to_string(),
            password: "a-long-passphrase".to_string(),
            email: Some("jane@example.com".to_string()),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_list_remove() {
        let use_case = use_case();

        let user = use_case.add_user(input("jane")).await.unwrap();
        assert!(user.is_staff);
        assert_eq!(user.full_name(), "Jane Doe");
        assert_eq!(user.email.as_ref().map(|e| e.as_str()), Some("jane@example.com"));

        use_case.add_user(input("adam")).await.unwrap();
        let names: Vec<String> = use_case
            .list_users()
            .await
            .unwrap()
            .iter()
            .map(|u| u.user_name.to_string())
            .collect();
        assert_eq!(names, vec!["adam", "jane"]);

        let removed = use_case.remove_user("JANE").await.unwrap();
        assert_eq!(removed.user_id, user.user_id);
        assert_eq!(use_case.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_user_name_is_case_insensitive() {
        let use_case = use_case();
        use_case.add_user(input("jane")).await.unwrap();
        assert!(matches!(
            use_case.add_user(input("Jane")).await,
            Err(AuthError::UserNameTaken)
        ));
    }

    #[tokio::test]
    async fn test_add_user_validation() {
        let use_case = use_case();

        let mut bad_password = input("jane");
        bad_password.password = "short".to_string();
        assert!(matches!(
            use_case.add_user(bad_password).await,
            Err(AuthError::PasswordValidation(_))
        ));

        let mut bad_email = input("jane");
        bad_email.email = Some("not-an-email".to_string());
        assert!(matches!(
            use_case.add_user(bad_email).await,
            Err(AuthError::InvalidEmail(_))
        ));

        assert!(matches!(
            use_case.add_user(input("j")).await,
            Err(AuthError::InvalidUserName(_))
        ));
    }

    #[tokio::test]
    async fn test_remove_missing_user() {
        assert!(matches!(
            use_case().remove_user("ghost").await,
            Err(AuthError::UserNotFound)
        ));
    }
}
