//! Blog Router

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;

use auth::middleware::require_staff;

use crate::application::config::BlogConfig;
use crate::application::feeds::{ATOM_PATH, RSS_PATH};
use crate::domain::repository::EntryRepository;
use crate::infra::postgres::PgEntryRepository;
use crate::presentation::handlers::{self, BlogAppState};

/// Blog router over PostgreSQL
pub fn blog_router(repo: PgEntryRepository, config: BlogConfig) -> Router {
    blog_router_generic(Arc::new(repo), Arc::new(config))
}

/// Blog router for any repository implementation
///
/// Mounts the public API under `/api`, the staff API under `/api/admin`
/// and the feeds at the root. Session resolution comes from the auth
/// layers wrapped around the assembled application.
pub fn blog_router_generic<R>(repo: Arc<R>, config: Arc<BlogConfig>) -> Router
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    let state = BlogAppState { repo, config };

    let public = Router::new()
        .route("/entries", get(handlers::list_entries::<R>))
        .route(
            "/entries/type/{entry_type}",
            get(handlers::list_entries_by_type::<R>),
        )
        .route(
            "/entries/{year}/{month}/{day}/{slug}",
            get(handlers::entry_detail::<R>),
        )
        .route(
            "/entries/{year}/{month}/{day}/{slug}/comments",
            post(handlers::post_comment::<R>),
        )
        .route("/tags", get(handlers::tag_cloud::<R>))
        .route("/tags/{tag}", get(handlers::list_entries_by_tag::<R>));

    let admin = Router::new()
        .route("/entries", get(handlers::dashboard::<R>))
        .route(
            "/entries/{entry}",
            post(handlers::create_entry::<R>)
                .get(handlers::get_entry::<R>)
                .put(handlers::update_entry::<R>)
                .delete(handlers::delete_entry::<R>),
        )
        .route(
            "/comments/{comment_id}",
            axum::routing::delete(handlers::delete_comment::<R>),
        )
        .route_layer(from_fn(require_staff));

    let feeds = Router::new()
        .route(RSS_PATH, get(handlers::rss_feed::<R>))
        .route(ATOM_PATH, get(handlers::atom_feed::<R>));

    Router::new()
        .nest("/api", public.nest("/admin", admin))
        .merge(feeds)
        .with_state(state)
}
