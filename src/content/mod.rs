//! Content loading and processing

pub mod authors;
pub mod frontmatter;
pub mod loader;
pub mod markdown;
pub mod post;

pub use authors::{Author, AuthorRegistry};
pub use frontmatter::FrontMatter;
pub use loader::ContentLoader;
pub use markdown::MarkdownRenderer;
pub use post::Post;

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading post content
#[derive(Debug, Error)]
pub enum ContentError {
    #[error("missing required field `{field}` in {}", path.display())]
    MissingField { field: &'static str, path: PathBuf },

    #[error("unknown author `{id}` in {}", path.display())]
    UnknownAuthor { id: String, path: PathBuf },

    #[error("invalid date `{value}` in {}", path.display())]
    InvalidDate { value: String, path: PathBuf },
}
