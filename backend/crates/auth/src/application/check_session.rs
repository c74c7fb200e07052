//! Check Session Use Case
//!
//! Resolves a session cookie to its user.

use std::sync::Arc;

use chrono::Utc;

use crate::application::config::AuthConfig;
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::session_claims::SessionClaims;
use crate::error::{AuthError, AuthResult};

pub struct CheckSessionUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    config: Arc<AuthConfig>,
}

impl<U> CheckSessionUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, config: Arc<AuthConfig>) -> Self {
        Self { user_repo, config }
    }

    /// Verify the token, its age, and that the user still exists
    pub async fn execute(&self, session_token: &str) -> AuthResult<User> {
        let claims = SessionClaims::decode(session_token, &self.config.session_signer())?;

        if claims.is_expired(Utc::now().timestamp_millis(), self.config.session_ttl_ms()) {
            tracing::debug!(user_id = %claims.uid, "Session token expired");
            return Err(AuthError::SessionInvalid);
        }

        self.user_repo
            .find_by_id(&claims.uid)
            .await?
            .ok_or(AuthError::SessionInvalid)
    }

    /// `None` for any invalid session; infrastructure errors still surface
    pub async fn current_user(&self, session_token: Option<&str>) -> AuthResult<Option<User>> {
        let Some(token) = session_token else {
            return Ok(None);
        };
        match self.execute(token).await {
            Ok(user) => Ok(Some(user)),
            Err(AuthError::SessionInvalid) => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::user_id::UserId;
    use crate::infra::memory::InMemoryUserRepository;
    use crate::test_support::staff_user;

    async fn setup() -> (CheckSessionUseCase<InMemoryUserRepository>, Arc<AuthConfig>, User) {
        let repo = InMemoryUserRepository::new();
        let user = staff_user("editor", "correct-horse-1");
        repo.create(&user).await.unwrap();
        let config = Arc::new(AuthConfig::development());
        (
            CheckSessionUseCase::new(Arc::new(repo), config.clone()),
            config,
            user,
        )
    }

    #[tokio::test]
    async fn test_valid_session() {
        let (use_case, config, user) = setup().await;
        let token = SessionClaims::new(user.user_id, Utc::now().timestamp_millis())
            .encode(&config.session_signer())
            .unwrap();

        let found = use_case.execute(&token).await.unwrap();
        assert_eq!(found.user_id, user.user_id);
    }

    #[tokio::test]
    async fn test_tampered_session() {
        let (use_case, config, user) = setup().await;
        let token = SessionClaims::new(user.user_id, Utc::now().timestamp_millis())
            .encode(&config.session_signer())
            .unwrap();
        let tampered = format!("x{}", &token[1..]);

        assert!(matches!(
            use_case.execute(&tampered).await,
            Err(AuthError::SessionInvalid)
        ));
        assert!(matches!(
            use_case.execute("garbage").await,
            Err(AuthError::SessionInvalid)
        ));
    }

    #[tokio::test]
    async fn test_expired_session() {
        let (use_case, config, user) = setup().await;
        let issued = Utc::now().timestamp_millis() - config.session_ttl_ms() - 1_000;
        let token = SessionClaims::new(user.user_id, issued)
            .encode(&config.session_signer())
            .unwrap();

        assert!(matches!(
            use_case.execute(&token).await,
            Err(AuthError::SessionInvalid)
        ));
    }

    #[tokio::test]
    async fn test_session_for_deleted_user() {
        let (use_case, config, _) = setup().await;
        let token = SessionClaims::new(UserId::new(), Utc::now().timestamp_millis())
            .encode(&config.session_signer())
            .unwrap();

        assert!(use_case.current_user(Some(&token)).await.unwrap().is_none());
        assert!(use_case.current_user(None).await.unwrap().is_none());
    }
}
