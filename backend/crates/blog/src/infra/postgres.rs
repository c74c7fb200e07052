//! PostgreSQL Repository Implementation
//!
//! Per-type fields and comments are JSONB documents on the `entries` row;
//! tags are a `TEXT[]` so tag filters can use the GIN index.

use chrono::{DateTime, Utc};
use kernel::id::{EntryId, UserId};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::entity::comment::Comment;
use crate::domain::entity::entry::{Entry, EntryBody};
use crate::domain::repository::{EntryRepository, LiveFilter};
use crate::domain::value_object::author::Author;
use crate::domain::value_object::slug::Slug;
use crate::error::{BlogError, BlogResult};

const ENTRY_COLUMNS: &str = r#"
    entry_id,
    title,
    slug,
    author_id,
    author_name,
    tags,
    body,
    comments,
    comments_enabled,
    published,
    publish_date,
    expiry_date,
    created_at,
    updated_at
"#;

/// `$1` = now, `$2` = entry type key or NULL, `$3` = tag or NULL
const LIVE_WHERE: &str = r#"
    published
    AND (publish_date IS NULL OR publish_date <= $1)
    AND (expiry_date IS NULL OR expiry_date > $1)
    AND ($2::TEXT IS NULL OR entry_type = $2)
    AND ($3::TEXT IS NULL OR $3 = ANY(tags))
"#;

#[derive(Clone)]
pub struct PgEntryRepository {
    pool: PgPool,
}

impl PgEntryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl EntryRepository for PgEntryRepository {
    async fn create(&self, entry: &Entry) -> BlogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO entries (
                entry_id,
                entry_type,
                title,
                slug,
                author_id,
                author_name,
                tags,
                body,
                comments,
                comments_enabled,
                published,
                publish_date,
                expiry_date,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(entry.entry_type().as_str())
        .bind(&entry.title)
        .bind(entry.slug.as_str())
        .bind(entry.author.as_ref().and_then(|a| a.user_id).map(UserId::into_uuid))
        .bind(entry.author.as_ref().map(|a| a.name.as_str()))
        .bind(&entry.tags)
        .bind(Json(&entry.body))
        .bind(Json(&entry.comments))
        .bind(entry.comments_enabled)
        .bind(entry.published)
        .bind(entry.publish_date)
        .bind(entry.expiry_date)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, entry: &Entry) -> BlogResult<()> {
        sqlx::query(
            r#"
            UPDATE entries SET
                entry_type = $2,
                title = $3,
                slug = $4,
                author_id = $5,
                author_name = $6,
                tags = $7,
                body = $8,
                comments_enabled = $9,
                published = $10,
                publish_date = $11,
                expiry_date = $12,
                updated_at = $13
            WHERE entry_id = $1
            "#,
        )
        .bind(entry.id.as_uuid())
        .bind(entry.entry_type().as_str())
        .bind(&entry.title)
        .bind(entry.slug.as_str())
        .bind(entry.author.as_ref().and_then(|a| a.user_id).map(UserId::into_uuid))
        .bind(entry.author.as_ref().map(|a| a.name.as_str()))
        .bind(&entry.tags)
        .bind(Json(&entry.body))
        .bind(entry.comments_enabled)
        .bind(entry.published)
        .bind(entry.publish_date)
        .bind(entry.expiry_date)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, entry_id: &EntryId) -> BlogResult<bool> {
        let result = sqlx::query("DELETE FROM entries WHERE entry_id = $1")
            .bind(entry_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_by_id(&self, entry_id: &EntryId) -> BlogResult<Option<Entry>> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries WHERE entry_id = $1"
        ))
        .bind(entry_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        row.map(EntryRow::into_entry).transpose()
    }

    async fn find_by_slug_between(
        &self,
        slug: &Slug,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
        live_at: Option<DateTime<Utc>>,
    ) -> BlogResult<Option<Entry>> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS} FROM entries
            WHERE slug = $1
              AND COALESCE(publish_date, created_at) >= $2
              AND COALESCE(publish_date, created_at) < $3
              AND ($4::TIMESTAMPTZ IS NULL OR (
                  published
                  AND (publish_date IS NULL OR publish_date <= $4)
                  AND (expiry_date IS NULL OR expiry_date > $4)
              ))
            ORDER BY COALESCE(publish_date, created_at) DESC
            LIMIT 1
            "#
        ))
        .bind(slug.as_str())
        .bind(from)
        .bind(to)
        .bind(live_at)
        .fetch_optional(&self.pool)
        .await?;

        row.map(EntryRow::into_entry).transpose()
    }

    async fn list_live(
        &self,
        filter: &LiveFilter,
        offset: u64,
        limit: u64,
    ) -> BlogResult<Vec<Entry>> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            r#"
            SELECT {ENTRY_COLUMNS} FROM entries
            WHERE {LIVE_WHERE}
            ORDER BY COALESCE(publish_date, created_at) DESC, created_at DESC
            LIMIT $4 OFFSET $5
            "#
        ))
        .bind(filter.now)
        .bind(filter.entry_type.map(|t| t.as_str()))
        .bind(filter.tag.as_deref())
        .bind(to_i64(limit))
        .bind(to_i64(offset))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(EntryRow::into_entry).collect()
    }

    async fn count_live(&self, filter: &LiveFilter) -> BlogResult<u64> {
        let count = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM entries WHERE {LIVE_WHERE}"
        ))
        .bind(filter.now)
        .bind(filter.entry_type.map(|t| t.as_str()))
        .bind(filter.tag.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(count.max(0) as u64)
    }

    async fn live_tag_counts(&self, now: DateTime<Utc>) -> BlogResult<Vec<(String, u64)>> {
        let rows = sqlx::query_as::<_, (String, i64)>(&format!(
            r#"
            SELECT tag, COUNT(*) FROM entries, UNNEST(tags) AS tag
            WHERE {LIVE_WHERE}
            GROUP BY tag
            "#
        ))
        .bind(now)
        .bind(None::<&str>)
        .bind(None::<&str>)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(tag, count)| (tag, count.max(0) as u64))
            .collect())
    }

    async fn list_recent(&self, limit: u64) -> BlogResult<Vec<Entry>> {
        let rows = sqlx::query_as::<_, EntryRow>(&format!(
            "SELECT {ENTRY_COLUMNS} FROM entries ORDER BY created_at DESC LIMIT $1"
        ))
        .bind(to_i64(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(EntryRow::into_entry).collect()
    }

    async fn push_comment(&self, entry_id: &EntryId, comment: &Comment) -> BlogResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE entries
            SET comments = comments || jsonb_build_array($2::JSONB)
            WHERE entry_id = $1
            "#,
        )
        .bind(entry_id.as_uuid())
        .bind(Json(comment))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn remove_comment(&self, comment_id: &str) -> BlogResult<Option<Entry>> {
        let row = sqlx::query_as::<_, EntryRow>(&format!(
            r#"
            UPDATE entries SET
                comments = (
                    SELECT COALESCE(jsonb_agg(c ORDER BY ord), '[]'::JSONB)
                    FROM jsonb_array_elements(comments) WITH ORDINALITY AS t(c, ord)
                    WHERE c->>'id' <> $1
                ),
                updated_at = NOW()
            WHERE comments @> jsonb_build_array(jsonb_build_object('id', $1::TEXT))
            RETURNING {ENTRY_COLUMNS}
            "#
        ))
        .bind(comment_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(EntryRow::into_entry).transpose()
    }
}

fn to_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct EntryRow {
    entry_id: Uuid,
    title: String,
    slug: String,
    author_id: Option<Uuid>,
    author_name: Option<String>,
    tags: Vec<String>,
    body: Json<EntryBody>,
    comments: Json<Vec<Comment>>,
    comments_enabled: bool,
    published: bool,
    publish_date: Option<DateTime<Utc>>,
    expiry_date: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl EntryRow {
    fn into_entry(self) -> BlogResult<Entry> {
        let slug = Slug::new(&self.slug)
            .map_err(|e| BlogError::Internal(format!("Invalid slug in database: {}", e)))?;

        Ok(Entry {
            id: EntryId::from_uuid(self.entry_id),
            title: self.title,
            slug,
            author: self.author_name.map(|name| Author {
                user_id: self.author_id.map(UserId::from_uuid),
                name,
            }),
            tags: self.tags,
            body: self.body.0,
            comments: self.comments.0,
            comments_enabled: self.comments_enabled,
            published: self.published,
            publish_date: self.publish_date,
            expiry_date: self.expiry_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
