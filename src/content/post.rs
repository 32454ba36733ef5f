//! Post model

use crate::content::Author;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::path::PathBuf;

/// A fully loaded blog post
#[derive(Debug, Clone, Serialize)]
pub struct Post {
    pub title: String,
    /// Site-absolute path of the rendered page, such as `/blog/hello-world/`
    pub slug: String,
    pub created: DateTime<Local>,
    pub updated: Option<DateTime<Local>>,
    /// Plain-text summary pruned from the rendered body
    pub excerpt: String,
    /// Estimated reading time in minutes
    pub time_to_read: usize,
    /// Cover image URL, when the front matter names one
    pub cover: Option<String>,
    pub author: Author,
    pub tags: Vec<String>,
    pub draft: bool,
    /// Rendered HTML body
    pub content: String,
    /// Raw markdown body
    pub raw: String,
    /// File the post was loaded from
    pub source: PathBuf,
}
