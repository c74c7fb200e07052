//! Application Layer
//!
//! Use cases and application services.

pub mod browse_entries;
pub mod config;
pub mod entry_detail;
pub mod feeds;
pub mod manage_entries;
pub mod post_comment;
pub mod tag_cloud;

pub use browse_entries::{BrowseEntriesUseCase, EntryListing};
pub use config::BlogConfig;
pub use entry_detail::EntryDetailUseCase;
pub use feeds::{FeedFormat, FeedsUseCase};
pub use manage_entries::{Dashboard, EntryInput, ManageEntriesUseCase};
pub use post_comment::{PostCommentInput, PostCommentOutput, PostCommentUseCase};
pub use tag_cloud::TagCloudUseCase;
