//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use std::sync::Arc;

use auth::middleware::{CurrentUser, StaffUser};
use kernel::id::EntryId;

use crate::application::config::BlogConfig;
use crate::application::{
    BrowseEntriesUseCase, EntryDetailUseCase, EntryInput, FeedFormat, FeedsUseCase,
    ManageEntriesUseCase, PostCommentInput, PostCommentUseCase, TagCloudUseCase,
};
use crate::domain::repository::EntryRepository;
use crate::domain::value_object::author::Author;
use crate::domain::value_object::permalink::Permalink;
use crate::error::{BlogError, BlogResult};
use crate::presentation::dto::{
    AdminEntryResponse, CommentCreatedResponse, CommentResponse, CreateCommentRequest,
    DashboardResponse, EntryListResponse, EntryRequest, EntryResponse, TagCloudResponse,
};

/// Shared state for blog handlers
#[derive(Clone)]
pub struct BlogAppState<R>
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<BlogConfig>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PermalinkPath {
    pub year: String,
    pub month: String,
    pub day: String,
    pub slug: String,
}

impl PermalinkPath {
    fn resolve(&self) -> BlogResult<Permalink> {
        Permalink::parse(&self.year, &self.month, &self.day, &self.slug)
            .ok_or(BlogError::EntryNotFound)
    }
}

fn parse_entry_id(raw: &str) -> BlogResult<EntryId> {
    raw.parse().map_err(|_| BlogError::EntryNotFound)
}

// ============================================================================
// Listings
// ============================================================================

/// GET /api/entries
pub async fn list_entries<R>(
    State(state): State<BlogAppState<R>>,
    Query(query): Query<PageQuery>,
) -> BlogResult<Json<EntryListResponse>>
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    let use_case = BrowseEntriesUseCase::new(state.repo.clone(), state.config.clone());
    let listing = use_case.recent(query.page.as_deref()).await?;
    Ok(Json(EntryListResponse::new(
        &listing,
        state.config.markup_language,
    )))
}

/// GET /api/entries/type/{entry_type}
pub async fn list_entries_by_type<R>(
    State(state): State<BlogAppState<R>>,
    Path(entry_type): Path<String>,
    Query(query): Query<PageQuery>,
) -> BlogResult<Json<EntryListResponse>>
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    let use_case = BrowseEntriesUseCase::new(state.repo.clone(), state.config.clone());
    let listing = use_case
        .by_type(&entry_type, query.page.as_deref())
        .await?;
    Ok(Json(EntryListResponse::new(
        &listing,
        state.config.markup_language,
    )))
}

/// GET /api/tags/{tag}
pub async fn list_entries_by_tag<R>(
    State(state): State<BlogAppState<R>>,
    Path(tag): Path<String>,
    Query(query): Query<PageQuery>,
) -> BlogResult<Json<EntryListResponse>>
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    let use_case = BrowseEntriesUseCase::new(state.repo.clone(), state.config.clone());
    let listing = use_case.tagged(&tag, query.page.as_deref()).await?;
    Ok(Json(EntryListResponse::new(
        &listing,
        state.config.markup_language,
    )))
}

/// GET /api/tags
pub async fn tag_cloud<R>(State(state): State<BlogAppState<R>>) -> BlogResult<Json<TagCloudResponse>>
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    let weights = TagCloudUseCase::new(state.repo.clone()).execute().await?;
    Ok(Json(TagCloudResponse::from(weights)))
}

// ============================================================================
// Entry Detail / Comments
// ============================================================================

/// GET /api/entries/{year}/{month}/{day}/{slug}
///
/// Staff also see entries that are not live yet (or any more).
pub async fn entry_detail<R>(
    State(state): State<BlogAppState<R>>,
    Path(path): Path<PermalinkPath>,
    current: CurrentUser,
) -> BlogResult<Json<EntryResponse>>
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    let permalink = path.resolve()?;
    let entry = EntryDetailUseCase::new(state.repo.clone())
        .execute(&permalink, current.is_staff())
        .await?;
    Ok(Json(EntryResponse::detail(
        &entry,
        state.config.markup_language,
    )))
}

/// POST /api/entries/{year}/{month}/{day}/{slug}/comments
pub async fn post_comment<R>(
    State(state): State<BlogAppState<R>>,
    Path(path): Path<PermalinkPath>,
    current: CurrentUser,
    Json(req): Json<CreateCommentRequest>,
) -> BlogResult<impl IntoResponse>
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    let permalink = path.resolve()?;
    let admin_name = current
        .user()
        .filter(|u| u.is_staff)
        .map(|u| u.full_name());

    let use_case = PostCommentUseCase::new(state.repo.clone(), state.config.clone());
    let output = use_case
        .execute(
            &permalink,
            PostCommentInput {
                author: req.author,
                body: req.body,
                admin_name,
            },
        )
        .await?;

    let location = format!("{}#comment-{}", output.entry.permalink().path(), output.comment.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location.clone())],
        Json(CommentCreatedResponse {
            comment: CommentResponse::from(&output.comment),
            location,
        }),
    ))
}

// ============================================================================
// Feeds
// ============================================================================

async fn render_feed<R>(state: &BlogAppState<R>, format: FeedFormat) -> BlogResult<Response>
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    let body = FeedsUseCase::new(state.repo.clone(), state.config.clone())
        .execute(format)
        .await?;
    Ok(([(header::CONTENT_TYPE, format.content_type())], body).into_response())
}

/// GET /feeds/rss/
pub async fn rss_feed<R>(State(state): State<BlogAppState<R>>) -> BlogResult<Response>
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    render_feed(&state, FeedFormat::Rss).await
}

/// GET /feeds/atom/
pub async fn atom_feed<R>(State(state): State<BlogAppState<R>>) -> BlogResult<Response>
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    render_feed(&state, FeedFormat::Atom).await
}

// ============================================================================
// Admin
// ============================================================================

/// GET /api/admin/entries
pub async fn dashboard<R>(
    State(state): State<BlogAppState<R>>,
) -> BlogResult<Json<DashboardResponse>>
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    let use_case = ManageEntriesUseCase::new(state.repo.clone(), state.config.clone());
    let dashboard = use_case.dashboard().await?;
    Ok(Json(DashboardResponse::new(
        &dashboard,
        state.config.markup_language,
    )))
}

/// POST /api/admin/entries/{entry_type}
pub async fn create_entry<R>(
    State(state): State<BlogAppState<R>>,
    Path(entry_type): Path<String>,
    StaffUser(user): StaffUser,
    Json(req): Json<EntryRequest>,
) -> BlogResult<impl IntoResponse>
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    let input = EntryInput::try_from(req)?;
    let use_case = ManageEntriesUseCase::new(state.repo.clone(), state.config.clone());
    let entry = use_case
        .create(&entry_type, input, Some(Author::from(&user)))
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AdminEntryResponse::new(&entry, state.config.markup_language)),
    ))
}

/// GET /api/admin/entries/{entry_id}
pub async fn get_entry<R>(
    State(state): State<BlogAppState<R>>,
    Path(entry_id): Path<String>,
) -> BlogResult<Json<AdminEntryResponse>>
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    let entry_id = parse_entry_id(&entry_id)?;
    let use_case = ManageEntriesUseCase::new(state.repo.clone(), state.config.clone());
    let entry = use_case.get(&entry_id).await?;
    Ok(Json(AdminEntryResponse::new(
        &entry,
        state.config.markup_language,
    )))
}

/// PUT /api/admin/entries/{entry_id}
pub async fn update_entry<R>(
    State(state): State<BlogAppState<R>>,
    Path(entry_id): Path<String>,
    Json(req): Json<EntryRequest>,
) -> BlogResult<Json<AdminEntryResponse>>
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    let entry_id = parse_entry_id(&entry_id)?;
    let input = EntryInput::try_from(req)?;
    let use_case = ManageEntriesUseCase::new(state.repo.clone(), state.config.clone());
    let entry = use_case.update(&entry_id, input).await?;
    Ok(Json(AdminEntryResponse::new(
        &entry,
        state.config.markup_language,
    )))
}

/// DELETE /api/admin/entries/{entry_id}
pub async fn delete_entry<R>(
    State(state): State<BlogAppState<R>>,
    Path(entry_id): Path<String>,
) -> BlogResult<StatusCode>
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    let entry_id = parse_entry_id(&entry_id)?;
    let use_case = ManageEntriesUseCase::new(state.repo.clone(), state.config.clone());
    use_case.delete(&entry_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/admin/comments/{comment_id}
///
/// Answers with the entry the comment belonged to.
pub async fn delete_comment<R>(
    State(state): State<BlogAppState<R>>,
    Path(comment_id): Path<String>,
) -> BlogResult<Json<EntryResponse>>
where
    R: EntryRepository + Clone + Send + Sync + 'static,
{
    let use_case = ManageEntriesUseCase::new(state.repo.clone(), state.config.clone());
    let entry = use_case.delete_comment(&comment_id).await?;
    Ok(Json(EntryResponse::detail(
        &entry,
        state.config.markup_language,
    )))
}
