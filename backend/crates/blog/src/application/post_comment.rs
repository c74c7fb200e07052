//! Post Comment Use Case

use std::sync::Arc;

use crate::application::config::BlogConfig;
use crate::application::entry_detail::EntryDetailUseCase;
use crate::domain::entity::comment::Comment;
use crate::domain::entity::entry::Entry;
use crate::domain::repository::EntryRepository;
use crate::domain::value_object::permalink::Permalink;
use crate::error::{BlogError, BlogResult};

pub const COMMENT_AUTHOR_MAX_LENGTH: usize = 100;
pub const COMMENT_BODY_MAX_LENGTH: usize = 10_000;

#[derive(Debug, Clone)]
pub struct PostCommentInput {
    pub author: String,
    pub body: String,
    /// Full name of the signed-in admin posting, if any
    pub admin_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostCommentOutput {
    pub entry: Entry,
    pub comment: Comment,
}

pub struct PostCommentUseCase<R>
where
    R: EntryRepository,
{
    repo: Arc<R>,
    config: Arc<BlogConfig>,
}

impl<R> PostCommentUseCase<R>
where
    R: EntryRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<BlogConfig>) -> Self {
        Self { repo, config }
    }

    pub async fn execute(
        &self,
        permalink: &Permalink,
        input: PostCommentInput,
    ) -> BlogResult<PostCommentOutput> {
        let is_admin = input.admin_name.is_some();
        let entry = EntryDetailUseCase::new(self.repo.clone())
            .execute(permalink, is_admin)
            .await?;

        if !entry.comments_enabled {
            return Err(BlogError::CommentsDisabled);
        }

        let mut author = input.author.trim().to_string();
        if author.is_empty() {
            author = input.admin_name.unwrap_or_default();
        }
        let body = input.body.trim();

        if author.is_empty() {
            return Err(BlogError::validation("author", "This field is required"));
        }
        if author.chars().count() > COMMENT_AUTHOR_MAX_LENGTH {
            return Err(BlogError::validation(
                "author",
                format!("At most {COMMENT_AUTHOR_MAX_LENGTH} characters"),
            ));
        }
        if body.is_empty() {
            return Err(BlogError::validation("body", "This field is required"));
        }
        if body.chars().count() > COMMENT_BODY_MAX_LENGTH {
            return Err(BlogError::validation(
                "body",
                format!("At most {COMMENT_BODY_MAX_LENGTH} characters"),
            ));
        }

        let comment = Comment::new(author, body, self.config.markup_language).with_admin(is_admin);
        if !self.repo.push_comment(&entry.id, &comment).await? {
            return Err(BlogError::EntryNotFound);
        }

        tracing::info!(
            entry_id = %entry.id,
            comment_id = %comment.id,
            is_admin,
            "Comment posted"
        );
        Ok(PostCommentOutput { entry, comment })
    }
}
