//! HTTP Handlers

use axum::Json;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use std::sync::Arc;

use platform::cookie::{append_delete_cookie, append_set_cookie};

use crate::application::config::AuthConfig;
use crate::application::{SignInInput, SignInUseCase};
use crate::domain::repository::UserRepository;
use crate::error::AuthResult;
use crate::presentation::dto::{
    CsrfTokenResponse, SessionStatusResponse, SignInRequest, SignInResponse, UserInfoResponse,
};
use crate::presentation::middleware::{CsrfToken, CurrentUser};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<U>
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<U>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Sign In / Sign Out
// ============================================================================

/// POST /api/auth/signin
pub async fn sign_in<U>(
    State(state): State<AuthAppState<U>>,
    Json(req): Json<SignInRequest>,
) -> AuthResult<impl IntoResponse>
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = SignInUseCase::new(state.repo.clone(), state.config.clone());

    let output = use_case
        .execute(SignInInput {
            user_name: req.user_name,
            password: req.password,
        })
        .await?;

    let mut headers = HeaderMap::new();
    append_set_cookie(
        &mut headers,
        &state.config.session_cookie(),
        &output.session_token,
    );

    Ok((
        StatusCode::OK,
        headers,
        Json(SignInResponse {
            user: UserInfoResponse::from(&output.user),
        }),
    ))
}

/// POST /api/auth/signout
///
/// Stateless: clearing the cookie is the whole operation.
pub async fn sign_out<U>(
    State(state): State<AuthAppState<U>>,
    current: CurrentUser,
) -> impl IntoResponse
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    if let Some(user) = current.user() {
        tracing::info!(user_id = %user.user_id, "User signed out");
    }

    let mut headers = HeaderMap::new();
    append_delete_cookie(&mut headers, &state.config.session_cookie());
    (StatusCode::NO_CONTENT, headers)
}

// ============================================================================
// Session Status
// ============================================================================

/// GET /api/auth/status
///
/// Reports the user [`load_current_user`] already resolved for this request.
///
/// [`load_current_user`]: crate::presentation::middleware::load_current_user
pub async fn session_status(current: CurrentUser) -> Json<SessionStatusResponse> {
    let user = current.into_inner();
    Json(SessionStatusResponse {
        authenticated: user.is_some(),
        user: user.as_ref().map(UserInfoResponse::from),
    })
}

// ============================================================================
// CSRF
// ============================================================================

/// GET /api/auth/csrf
pub async fn csrf_token<U>(
    State(state): State<AuthAppState<U>>,
    token: CsrfToken,
) -> Json<CsrfTokenResponse>
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    Json(CsrfTokenResponse {
        token: token.0,
        header_name: state.config.csrf_header_name.clone(),
    })
}
