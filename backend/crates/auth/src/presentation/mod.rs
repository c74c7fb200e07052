//! Presentation Layer
//!
//! HTTP handlers, DTOs, router, and middleware.

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::AuthAppState;
pub use middleware::{
    AuthMiddlewareState, CsrfToken, CurrentUser, StaffUser, csrf_protect, load_current_user,
    require_staff,
};
pub use router::{auth_router, auth_router_generic, with_auth_layers};
