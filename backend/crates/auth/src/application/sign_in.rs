//! Sign In Use Case
//!
//! Checks a user name and password and issues a signed session token.

use std::sync::Arc;

use chrono::Utc;
use platform::password::ClearTextPassword;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{session_claims::SessionClaims, user_name::UserName};
use crate::error::{AuthError, AuthResult};

pub struct SignInInput {
    pub user_name: String,
    pub password: String,
}

pub struct SignInOutput {
    /// Value for the session cookie
    pub session_token: String,
    pub user: User,
}

pub struct SignInUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> SignInUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        let user_name =
            UserName::new(&input.user_name).map_err(|_| AuthError::InvalidCredentials)?;

        let mut user = self
            .user_repo
            .find_by_user_name(&user_name)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        let password = ClearTextPassword::for_verification(input.password);
        if !user.password_hash.verify(&password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        if !user.is_staff {
            return Err(AuthError::NotStaff);
        }

        user.record_login();
        self.user_repo.update(&user).await?;

        let claims = SessionClaims::new(user.user_id, Utc::now().timestamp_millis());
        let session_token = claims
            .encode(&self.config.session_signer())
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User signed in"
        );

        Ok(SignInOutput {
            session_token,
            user,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::memory::InMemoryUserRepository;
    use crate::test_support::staff_user;

    fn use_case(repo: InMemoryUserRepository) -> (SignInUseCase<InMemoryUserRepository>, Arc<AuthConfig>) {
        let config = Arc::new(AuthConfig::development());
        (SignInUseCase::new(Arc::new(repo), config.clone()), config)
    }

    #[tokio::test]
    async fn test_sign_in_success_issues_valid_token() {
        let repo = InMemoryUserRepository::new();
        let user = staff_user("editor", "correct-horse-1");
        repo.create(&user).await.unwrap();
        let (use_case, config) = use_case(repo.clone());

        let output = use_case
            .execute(SignInInput {
                user_name: "EDITOR".to_string(),
                password: "correct-horse-1".to_string(),
            })
            .await
            .unwrap();

        let claims =
            SessionClaims::decode(&output.session_token, &config.session_signer()).unwrap();
        assert_eq!(claims.uid, user.user_id);

        let stored = repo.find_by_id(&user.user_id).await.unwrap().unwrap();
        assert!(stored.last_login_at.is_some());
    }

    #[tokio::test]
    async fn test_sign_in_wrong_password() {
        let repo = InMemoryUserRepository::new();
        repo.create(&staff_user("editor", "correct-horse-1"))
            .await
            .unwrap();
        let (use_case, _) = use_case(repo);

        let result = use_case
            .execute(SignInInput {
                user_name: "editor".to_string(),
                password: "nope".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_sign_in_unknown_or_malformed_user() {
        let (use_case, _) = use_case(InMemoryUserRepository::new());
        for name in ["ghost", "x"] {
            let result = use_case
                .execute(SignInInput {
                    user_name: name.to_string(),
                    password: "whatever-123".to_string(),
                })
                .await;
            assert!(matches!(result, Err(AuthError::InvalidCredentials)));
        }
    }

    #[tokio::test]
    async fn test_sign_in_requires_staff() {
        let repo = InMemoryUserRepository::new();
        let user = staff_user("reader", "correct-horse-1").with_staff(false);
        repo.create(&user).await.unwrap();
        let (use_case, _) = use_case(repo);

        let result = use_case
            .execute(SignInInput {
                user_name: "reader".to_string(),
                password: "correct-horse-1".to_string(),
            })
            .await;
        assert!(matches!(result, Err(AuthError::NotStaff)));
    }
}
