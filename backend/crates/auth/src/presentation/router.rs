//! Auth Router

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, csrf_protect, load_current_user};

/// Auth router over PostgreSQL
pub fn auth_router(repo: PgUserRepository, config: AuthConfig) -> Router {
    auth_router_generic(Arc::new(repo), Arc::new(config))
}

/// Auth router for any repository implementation
///
/// Routes only; wrap the assembled application with [`with_auth_layers`]
/// so the session and CSRF middleware see every request.
pub fn auth_router_generic<U>(repo: Arc<U>, config: Arc<AuthConfig>) -> Router
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let state = AuthAppState { repo, config };

    Router::new()
        .route("/signin", post(handlers::sign_in::<U>))
        .route("/signout", post(handlers::sign_out::<U>))
        .route("/status", get(handlers::session_status))
        .route("/csrf", get(handlers::csrf_token::<U>))
        .with_state(state)
}

/// Apply session resolution and CSRF protection to `router`
///
/// CSRF runs outermost, so forged requests are refused before the session
/// is looked up.
pub fn with_auth_layers<U>(router: Router, repo: Arc<U>, config: Arc<AuthConfig>) -> Router
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let session_state = AuthMiddlewareState {
        repo,
        config: config.clone(),
    };

    router
        .layer(from_fn_with_state(session_state, load_current_user::<U>))
        .layer(from_fn_with_state(config, csrf_protect))
}
