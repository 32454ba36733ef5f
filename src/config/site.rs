//! Site configuration (_config.yml)

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub language: String,

    // URL
    pub url: String,
    pub root: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,
    /// Subdirectory of `source_dir` holding blog posts. Also where the
    /// listing pages are mounted, e.g. `/blog/`.
    pub blog_dir: String,
    pub tag_dir: String,

    // Authors
    /// Author registry file, relative to the site root.
    pub authors_file: String,
    /// Author id assumed when a post's frontmatter has no `author` field.
    pub default_author: String,

    // Listing
    /// Posts per listing page. This single value drives both the query
    /// slice and the page-count math; keep them in lockstep.
    pub per_page: usize,
    pub pagination_dir: String,
    /// Render the tag sidebar next to the listing (and the tag-filtered
    /// listing pages behind its links).
    pub tag_sidebar: bool,
    /// Maximum excerpt length in characters, pruned at a word boundary.
    pub excerpt_length: usize,

    // Writing
    pub render_drafts: bool,
    pub highlight_theme: String,

    // Date format (Moment.js-style, as shown in the card footer)
    pub date_format: String,

    // Store any additional fields
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Vellum".to_string(),
            subtitle: String::new(),
            description: String::new(),
            language: "en".to_string(),

            url: "http://example.com".to_string(),
            root: "/".to_string(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),
            blog_dir: "blog".to_string(),
            tag_dir: "tags".to_string(),

            authors_file: "authors.yml".to_string(),
            default_author: String::new(),

            per_page: 10,
            pagination_dir: "page".to_string(),
            tag_sidebar: false,
            excerpt_length: 140,

            render_drafts: false,
            highlight_theme: "base16-ocean.dark".to_string(),

            date_format: "DD MMMM, YYYY".to_string(),

            extra: HashMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.title, "Vellum");
        assert_eq!(config.blog_dir, "blog");
        assert_eq!(config.per_page, 10);
        assert!(!config.tag_sidebar);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: My Blog
url: https://blog.example.com
per_page: 5
tag_sidebar: true
default_author: jane
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "My Blog");
        assert_eq!(config.url, "https://blog.example.com");
        assert_eq!(config.per_page, 5);
        assert!(config.tag_sidebar);
        assert_eq!(config.default_author, "jane");
        // Unspecified fields keep their defaults
        assert_eq!(config.blog_dir, "blog");
        assert_eq!(config.date_format, "DD MMMM, YYYY");
    }
}
