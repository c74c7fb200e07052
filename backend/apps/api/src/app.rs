//! Router assembly shared by every storage backend

use std::sync::Arc;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use auth::domain::repository::UserRepository;
use auth::{AuthConfig, auth_router_generic, with_auth_layers};
use blog::domain::repository::EntryRepository;
use blog::{BlogConfig, blog_router_generic};

/// Full application: auth under `/api/auth`, the blog API and feeds,
/// session/CSRF layers around both
pub fn build_router<U, R>(
    users: Arc<U>,
    entries: Arc<R>,
    auth_config: Arc<AuthConfig>,
    blog_config: Arc<BlogConfig>,
) -> Router
where
    U: UserRepository + Clone + Send + Sync + 'static,
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    let router = Router::new()
        .nest(
            "/api/auth",
            auth_router_generic(users.clone(), auth_config.clone()),
        )
        .merge(blog_router_generic(entries, blog_config));

    with_auth_layers(router, users, auth_config)
}

/// Browser access from the configured frontend origins, cookies included
pub fn cors_layer(origins: &[String], csrf_header: &str) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let mut headers = vec![header::CONTENT_TYPE, header::ACCEPT];
    if let Ok(name) = HeaderName::try_from(csrf_header) {
        headers.push(name);
    }

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list(headers))
        .allow_credentials(true)
}

/// Routes plus HTTP tracing and CORS
pub fn with_http_layers(router: Router, origins: &[String], csrf_header: &str) -> Router {
    router
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(origins, csrf_header))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use auth::InMemoryUserRepository;
    use blog::InMemoryEntryRepository;

    fn app() -> Router {
        let router = build_router(
            Arc::new(InMemoryUserRepository::new()),
            Arc::new(InMemoryEntryRepository::new()),
            Arc::new(AuthConfig::development()),
            Arc::new(BlogConfig::development()),
        );
        with_http_layers(router, &["http://localhost:40922".to_string()], "x-csrftoken")
    }

    #[tokio::test]
    async fn test_routes_are_mounted() {
        for uri in ["/api/entries", "/api/tags", "/api/auth/status", "/feeds/rss/"] {
            let response = app()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_cors_preflight_allows_csrf_header() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/entries")
                    .header(header::ORIGIN, "http://localhost:40922")
                    .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                    .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "x-csrftoken")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let allowed = response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS]
            .to_str()
            .unwrap()
            .to_string();
        assert!(allowed.contains("x-csrftoken"));
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:40922"
        );
    }
}
