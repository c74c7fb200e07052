//! API DTOs (Data Transfer Objects)

use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

// ============================================================================
// Sign In
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub user_name: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub user: UserInfoResponse,
}

// ============================================================================
// Session Status
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatusResponse {
    pub authenticated: bool,
    pub user: Option<UserInfoResponse>,
}

// ============================================================================
// CSRF
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CsrfTokenResponse {
    pub token: String,
    /// Header to echo the token in
    pub header_name: String,
}

// ============================================================================
// User Info
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfoResponse {
    pub user_id: String,
    pub user_name: String,
    pub full_name: String,
    pub email: Option<String>,
    pub is_staff: bool,
    /// Unix milliseconds
    pub last_login_at: Option<i64>,
}

impl From<&User> for UserInfoResponse {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.user_id.to_string(),
            user_name: user.user_name.to_string(),
            full_name: user.full_name(),
            email: user.email.as_ref().map(|e| e.to_string()),
            is_staff: user.is_staff,
            last_login_at: user.last_login_at.map(|t| t.timestamp_millis()),
        }
    }
}
