//! Router-level tests over the in-memory repositories

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use serde_json::{Value, json};
use tower::ServiceExt;

use auth::application::csrf::generate_token;
use auth::domain::repository::UserRepository;
use auth::models::User;
use auth::models::user_name::UserName;
use auth::{AuthConfig, InMemoryUserRepository, auth_router_generic, with_auth_layers};
use platform::password::ClearTextPassword;

use crate::domain::entity::entry::Entry;
use crate::domain::repository::EntryRepository;
use crate::test_support::live_text_entry;
use crate::{BlogConfig, InMemoryEntryRepository, blog_router_generic};

struct TestApp {
    router: Router,
    entries: Arc<InMemoryEntryRepository>,
}

fn editor() -> User {
    let hash = ClearTextPassword::for_verification("correct-horse-1".to_string())
        .hash(None)
        .unwrap();
    User::new(UserName::new("editor").unwrap(), hash)
        .with_names("Test", "Editor")
        .with_staff(true)
}

async fn app() -> TestApp {
    let users = Arc::new(InMemoryUserRepository::new());
    users.create(&editor()).await.unwrap();
    let auth_config = Arc::new(AuthConfig::development());

    let entries = Arc::new(InMemoryEntryRepository::new());
    let blog_config = Arc::new(BlogConfig::development());

    let router = Router::new()
        .nest(
            "/api/auth",
            auth_router_generic(users.clone(), auth_config.clone()),
        )
        .merge(blog_router_generic(entries.clone(), blog_config));

    TestApp {
        router: with_auth_layers(router, users, auth_config),
        entries,
    }
}

fn set_cookie(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|v| {
            let (pair, _) = v.split_once(';').unwrap_or((v, ""));
            let (key, value) = pair.split_once('=')?;
            (key == name).then(|| value.to_string())
        })
}

async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn text_body(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Cookies and headers of a signed-in editor
struct Session {
    cookie: String,
    csrf: String,
}

async fn sign_in(app: &TestApp) -> Session {
    let csrf = generate_token();
    let response = app
        .router
        .clone()
        .oneshot(
            Request::post("/api/auth/signin")
                .header(header::COOKIE, format!("csrftoken={csrf}"))
                .header("x-csrftoken", &csrf)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    json!({"userName": "editor", "password": "correct-horse-1"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let session = set_cookie(&response, "userid").unwrap();
    Session {
        cookie: format!("userid={session}; csrftoken={csrf}"),
        csrf,
    }
}

fn api_path(entry: &Entry) -> String {
    format!(
        "/api/entries{}",
        entry.permalink().path().trim_end_matches('/')
    )
}

async fn get(app: &TestApp, uri: &str, session: Option<&Session>) -> Response {
    let mut req = Request::get(uri);
    if let Some(session) = session {
        req = req.header(header::COOKIE, &session.cookie);
    }
    app.router
        .clone()
        .oneshot(req.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn send_json(
    app: &TestApp,
    method: &str,
    uri: &str,
    session: &Session,
    body: Value,
) -> Response {
    app.router
        .clone()
        .oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::COOKIE, &session.cookie)
                .header("x-csrftoken", &session.csrf)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

/// Anonymous visitor holding only a CSRF cookie
fn visitor() -> Session {
    let csrf = generate_token();
    Session {
        cookie: format!("csrftoken={csrf}"),
        csrf,
    }
}

#[tokio::test]
async fn test_listing_shows_live_entries_only() {
    let app = app().await;
    app.entries
        .create(&live_text_entry("first", 2).with_tags(vec!["rust".into()]))
        .await
        .unwrap();
    let mut draft = live_text_entry("draft", 1);
    draft.published = false;
    app.entries.create(&draft).await.unwrap();

    let response = get(&app, "/api/entries", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;

    assert_eq!(body["title"], "Recent Entries");
    assert_eq!(body["page"]["total"], 1);
    assert_eq!(body["page"]["hasNext"], false);
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["slug"], "first");
    assert_eq!(entries[0]["entryType"], "text");
    assert_eq!(entries[0]["renderedContent"], "<p>Body of first</p>\n");
    assert!(entries[0].get("comments").is_none());
    assert_eq!(body["entryTypes"], json!(["Text", "Link", "Image", "Video"]));
}

#[tokio::test]
async fn test_unknown_type_and_bad_permalink_are_not_found() {
    let app = app().await;

    let response = get(&app, "/api/entries/type/podcast", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, "/api/entries/2010/foo/05/hello", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_tags_and_tagged_listing() {
    let app = app().await;
    app.entries
        .create(&live_text_entry("a", 1).with_tags(vec!["rust".into(), "web".into()]))
        .await
        .unwrap();
    app.entries
        .create(&live_text_entry("b", 2).with_tags(vec!["rust".into()]))
        .await
        .unwrap();

    let body = json_body(get(&app, "/api/tags", None).await).await;
    assert_eq!(body["tags"][0]["tag"], "rust");
    assert_eq!(body["tags"][0]["count"], 2);

    let body = json_body(get(&app, "/api/tags/Rust", None).await).await;
    assert_eq!(body["tag"], "rust");
    assert_eq!(body["entries"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_hidden_entry_visible_to_staff_only() {
    let app = app().await;
    let mut draft = live_text_entry("draft", 1);
    draft.published = false;
    app.entries.create(&draft).await.unwrap();

    let response = get(&app, &api_path(&draft), None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let session = sign_in(&app).await;
    let response = get(&app, &api_path(&draft), Some(&session)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["published"], false);
    assert_eq!(body["comments"], json!([]));
}

#[tokio::test]
async fn test_visitor_comment_flow() {
    let app = app().await;
    let entry = live_text_entry("hello", 1);
    app.entries.create(&entry).await.unwrap();
    let comments = format!("{}/comments", api_path(&entry));

    let response = send_json(
        &app,
        "POST",
        &comments,
        &visitor(),
        json!({"author": "Ann", "body": "<b>hi</b> *there*"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
    assert!(location.starts_with(&entry.permalink().path()));
    let body = json_body(response).await;
    assert_eq!(body["comment"]["author"], "Ann");
    assert_eq!(body["comment"]["isAdmin"], false);
    assert_eq!(
        body["comment"]["renderedBody"],
        "<p>&lt;b&gt;hi&lt;/b&gt; <em>there</em></p>\n"
    );

    let detail = json_body(get(&app, &api_path(&entry), None).await).await;
    assert_eq!(detail["commentCount"], 1);
    assert_eq!(detail["comments"][0]["author"], "Ann");
}

#[tokio::test]
async fn test_comment_without_csrf_is_forbidden() {
    let app = app().await;
    let entry = live_text_entry("hello", 1);
    app.entries.create(&entry).await.unwrap();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::post(format!("{}/comments", api_path(&entry)))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json!({"author": "Ann", "body": "hi"}).to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.entries.find_by_id(&entry.id).await.unwrap().unwrap().comments.is_empty());
}

#[tokio::test]
async fn test_comment_validation_and_disabled() {
    let app = app().await;
    let entry = live_text_entry("open", 1);
    let mut closed = live_text_entry("closed", 1);
    closed.comments_enabled = false;
    app.entries.create(&entry).await.unwrap();
    app.entries.create(&closed).await.unwrap();

    let response = send_json(
        &app,
        "POST",
        &format!("{}/comments", api_path(&entry)),
        &visitor(),
        json!({"author": "", "body": "hi"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = send_json(
        &app,
        "POST",
        &format!("{}/comments", api_path(&closed)),
        &visitor(),
        json!({"author": "Ann", "body": "hi"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_staff_comment_is_marked_admin() {
    let app = app().await;
    let entry = live_text_entry("hello", 1);
    app.entries.create(&entry).await.unwrap();
    let session = sign_in(&app).await;

    let response = send_json(
        &app,
        "POST",
        &format!("{}/comments", api_path(&entry)),
        &session,
        json!({"body": "Thanks"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["comment"]["author"], "Test Editor");
    assert_eq!(body["comment"]["isAdmin"], true);
}

#[tokio::test]
async fn test_admin_requires_staff_session() {
    let app = app().await;

    let response = get(&app, "/api/admin/entries", None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = send_json(
        &app,
        "POST",
        "/api/admin/entries/text",
        &visitor(),
        json!({"title": "Hi", "slug": "hi", "content": "body"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.entries.list_recent(10).await.unwrap().len(), 0);
}

#[tokio::test]
async fn test_admin_entry_lifecycle() {
    let app = app().await;
    let session = sign_in(&app).await;

    let response = send_json(
        &app,
        "POST",
        "/api/admin/entries/link",
        &session,
        json!({
            "title": "A Link",
            "slug": "a-link",
            "tags": "Rust, Web Dev",
            "linkUrl": "https://www.rust-lang.org/",
            "description": "The *language*"
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    let id = body["entry"]["id"].as_str().unwrap().to_string();
    assert_eq!(body["entry"]["entryType"], "link");
    assert_eq!(body["entry"]["author"], "Test Editor");
    assert_eq!(body["entry"]["titleUrl"], "https://www.rust-lang.org/");
    assert_eq!(body["entry"]["tags"], json!(["rust", "web-dev"]));
    assert_eq!(body["form"]["tags"], "rust, web-dev");

    let dashboard = json_body(get(&app, "/api/admin/entries", Some(&session)).await).await;
    assert_eq!(dashboard["entries"][0]["id"], id.as_str());
    assert_eq!(dashboard["entryTypes"][0]["key"], "text");

    let response = send_json(
        &app,
        "PUT",
        &format!("/api/admin/entries/{id}"),
        &session,
        json!({
            "title": "Renamed",
            "slug": "a-link",
            "linkUrl": "https://docs.rs/",
            "published": false
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["entry"]["title"], "Renamed");
    assert_eq!(body["form"]["linkUrl"], "https://docs.rs/");

    let listing = json_body(get(&app, "/api/entries", None).await).await;
    assert_eq!(listing["page"]["total"], 0);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::delete(format!("/api/admin/entries/{id}"))
                .header(header::COOKIE, &session.cookie)
                .header("x-csrftoken", &session.csrf)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(&app, &format!("/api/admin/entries/{id}"), Some(&session)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_validation_errors() {
    let app = app().await;
    let session = sign_in(&app).await;

    let response = send_json(
        &app,
        "POST",
        "/api/admin/entries/image",
        &session,
        json!({"title": "Pic", "slug": "pic", "imageUrl": "javascript:alert(1)"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = send_json(
        &app,
        "POST",
        "/api/admin/entries/text",
        &session,
        json!({"title": "Bad", "slug": "no spaces", "content": "x"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = send_json(
        &app,
        "POST",
        "/api/admin/entries/podcast",
        &session,
        json!({"title": "Pod", "slug": "pod"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(&app, "/api/admin/entries/not-a-uuid", Some(&session)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_deletes_comment() {
    let app = app().await;
    let entry = live_text_entry("hello", 1);
    app.entries.create(&entry).await.unwrap();

    let response = send_json(
        &app,
        "POST",
        &format!("{}/comments", api_path(&entry)),
        &visitor(),
        json!({"author": "Spammer", "body": "buy now"}),
    )
    .await;
    let comment_id = json_body(response).await["comment"]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let session = sign_in(&app).await;
    let response = app
        .router
        .clone()
        .oneshot(
            Request::delete(format!("/api/admin/comments/{comment_id}"))
                .header(header::COOKIE, &session.cookie)
                .header("x-csrftoken", &session.csrf)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["slug"], "hello");
    assert_eq!(body["comments"], json!([]));

    let response = app
        .router
        .clone()
        .oneshot(
            Request::delete(format!("/api/admin/comments/{comment_id}"))
                .header(header::COOKIE, &session.cookie)
                .header("x-csrftoken", &session.csrf)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_feeds() {
    let app = app().await;
    app.entries
        .create(&live_text_entry("feed-me", 1).with_tags(vec!["rust".into()]))
        .await
        .unwrap();

    let response = get(&app, "/feeds/rss/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/rss+xml; charset=utf-8"
    );
    let rss = text_body(response).await;
    assert!(rss.contains("<title>Post feed-me</title>"));
    assert!(rss.contains("<category>rust</category>"));

    let response = get(&app, "/feeds/atom/", None).await;
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/atom+xml; charset=utf-8"
    );
    assert!(text_body(response).await.contains("<feed"));
}
