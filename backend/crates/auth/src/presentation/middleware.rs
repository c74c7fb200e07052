//! Auth Middleware
//!
//! - [`load_current_user`] resolves the session cookie once per request and
//!   stores the result as a [`CurrentUser`] extension.
//! - [`require_staff`] guards admin routes.
//! - [`csrf_protect`] enforces the double-submit token on unsafe methods and
//!   keeps the `csrftoken` cookie alive on every response.

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{FromRequestParts, Query, Request, State};
use axum::http::request::Parts;
use axum::http::{HeaderValue, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use platform::cookie::{append_set_cookie, extract_cookie};

use crate::application::config::AuthConfig;
use crate::application::{CheckSessionUseCase, csrf};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState<U>
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<U>,
    pub config: Arc<AuthConfig>,
}

// ============================================================================
// Extractors
// ============================================================================

/// Signed-in user for this request, if any
///
/// Extracting never fails; without [`load_current_user`] in the stack it is
/// always anonymous.
#[derive(Debug, Clone, Default)]
pub struct CurrentUser(Option<User>);

impl CurrentUser {
    pub fn new(user: Option<User>) -> Self {
        Self(user)
    }

    pub fn user(&self) -> Option<&User> {
        self.0.as_ref()
    }

    pub fn into_inner(self) -> Option<User> {
        self.0
    }

    pub fn is_staff(&self) -> bool {
        self.0.as_ref().is_some_and(|u| u.is_staff)
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .unwrap_or_default())
    }
}

/// Signed-in staff user; rejects with 401/403 otherwise
#[derive(Debug, Clone)]
pub struct StaffUser(pub User);

impl<S> FromRequestParts<S> for StaffUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = parts
            .extensions
            .get::<CurrentUser>()
            .and_then(|current| current.0.clone())
            .ok_or(AuthError::SessionInvalid)?;

        if !user.is_staff {
            return Err(AuthError::NotStaff);
        }
        Ok(StaffUser(user))
    }
}

/// CSRF token in effect for this request
#[derive(Debug, Clone)]
pub struct CsrfToken(pub String);

impl<S> FromRequestParts<S> for CsrfToken
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CsrfToken>()
            .cloned()
            .ok_or_else(|| AuthError::Internal("csrf_protect layer is not installed".to_string()))
    }
}

// ============================================================================
// Session
// ============================================================================

/// Resolve the session cookie into a [`CurrentUser`] extension
///
/// Invalid sessions count as anonymous; only infrastructure failures
/// short-circuit the request.
pub async fn load_current_user<U>(
    State(state): State<AuthMiddlewareState<U>>,
    mut req: Request,
    next: Next,
) -> Response
where
    U: UserRepository + Clone + Send + Sync + 'static,
{
    let token = extract_cookie(req.headers(), &state.config.session_cookie_name);

    let use_case = CheckSessionUseCase::new(state.repo.clone(), state.config.clone());
    let user = match use_case.current_user(token.as_deref()).await {
        Ok(user) => user,
        Err(e) => return e.into_response(),
    };

    req.extensions_mut().insert(CurrentUser(user));
    next.run(req).await
}

/// Reject anonymous (401) and non-staff (403) requests
pub async fn require_staff(current: CurrentUser, req: Request, next: Next) -> Response {
    match current.user() {
        None => AuthError::SessionInvalid.into_response(),
        Some(user) if !user.is_staff => AuthError::NotStaff.into_response(),
        Some(_) => next.run(req).await,
    }
}

// ============================================================================
// CSRF
// ============================================================================

/// Double-submit CSRF check
///
/// Unsafe methods must echo the `csrftoken` cookie in the configured header
/// or query parameter. Every response (re)sets the cookie, issuing a fresh
/// token when the request had none.
pub async fn csrf_protect(
    State(config): State<Arc<AuthConfig>>,
    mut req: Request,
    next: Next,
) -> Response {
    let existing = extract_cookie(req.headers(), &config.csrf_cookie_name)
        .filter(|token| csrf::is_well_formed(token));

    if csrf::requires_token(req.method()) {
        let accepted = match (&existing, presented_token(&req, &config)) {
            (Some(cookie), Some(presented)) => csrf::tokens_match(cookie, &presented),
            _ => false,
        };
        if !accepted {
            tracing::debug!(
                method = %req.method(),
                path = %req.uri().path(),
                has_cookie = existing.is_some(),
                "Rejected request without matching CSRF token"
            );
            return AuthError::CsrfMismatch.into_response();
        }
    }

    let token = existing.unwrap_or_else(csrf::generate_token);
    req.extensions_mut().insert(CsrfToken(token.clone()));

    let mut response = next.run(req).await;
    append_set_cookie(response.headers_mut(), &config.csrf_cookie(), &token);
    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("Cookie"));
    response
}

/// Token echoed by the client: header first, then query string
fn presented_token(req: &Request, config: &AuthConfig) -> Option<String> {
    if let Some(value) = req
        .headers()
        .get(config.csrf_header_name.as_str())
        .and_then(|v| v.to_str().ok())
    {
        return Some(value.trim().to_string());
    }

    let Query(mut params) = Query::<HashMap<String, String>>::try_from_uri(req.uri()).ok()?;
    params.remove(&config.csrf_param_name)
}
