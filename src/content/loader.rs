//! Loads markdown posts from the source tree

use crate::config::SiteConfig;
use crate::content::frontmatter::{self, FrontMatter};
use crate::content::markdown::{excerpt, time_to_read, MarkdownRenderer};
use crate::content::{Author, AuthorRegistry, ContentError, Post};
use crate::helpers::url_for;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Walks the blog directory and turns markdown files into posts
pub struct ContentLoader<'a> {
    config: &'a SiteConfig,
    base_dir: PathBuf,
    renderer: MarkdownRenderer,
    authors: AuthorRegistry,
}

impl<'a> ContentLoader<'a> {
    pub fn new(config: &'a SiteConfig, base_dir: &Path) -> Result<Self> {
        let renderer = MarkdownRenderer::new(&config.highlight_theme)?;
        let authors = AuthorRegistry::load(&base_dir.join(&config.authors_file))?;

        Ok(Self {
            config,
            base_dir: base_dir.to_path_buf(),
            renderer,
            authors,
        })
    }

    pub fn authors(&self) -> &AuthorRegistry {
        &self.authors
    }

    /// Load every post under `<source_dir>/<blog_dir>`, newest first
    ///
    /// Drafts are included; callers decide whether they are visible.
    pub fn load_posts(&self) -> Result<Vec<Post>> {
        let blog_dir = self
            .base_dir
            .join(&self.config.source_dir)
            .join(&self.config.blog_dir);

        if !blog_dir.exists() {
            warn!("content directory {} does not exist", blog_dir.display());
            return Ok(Vec::new());
        }

        let mut posts = Vec::new();
        for entry in WalkDir::new(&blog_dir).follow_links(true).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_file() && is_markdown_file(entry.path()) {
                posts.push(self.load_post(entry.path())?);
            }
        }

        posts.sort_by(|a, b| b.created.cmp(&a.created));
        debug!("loaded {} posts from {}", posts.len(), blog_dir.display());
        Ok(posts)
    }

    /// Load a single post, failing on missing required front matter
    pub fn load_post(&self, path: &Path) -> Result<Post> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let (fm, body) = frontmatter::parse(&content)
            .with_context(|| format!("invalid front matter in {}", path.display()))?;

        let title = fm.title.clone().ok_or_else(|| ContentError::MissingField {
            field: "title",
            path: path.to_path_buf(),
        })?;

        let created_raw = fm
            .created_date
            .clone()
            .ok_or_else(|| ContentError::MissingField {
                field: "createdDate",
                path: path.to_path_buf(),
            })?;
        let created =
            frontmatter::parse_date_string(&created_raw).ok_or_else(|| ContentError::InvalidDate {
                value: created_raw.clone(),
                path: path.to_path_buf(),
            })?;

        let updated = match fm.updated_date.as_deref() {
            Some(value) => Some(frontmatter::parse_date_string(value).ok_or_else(|| {
                ContentError::InvalidDate {
                    value: value.to_string(),
                    path: path.to_path_buf(),
                }
            })?),
            None => None,
        };

        let author = self.resolve_author(&fm, path)?;
        let html = self.renderer.render(body);
        let excerpt_text = excerpt(&html, self.config.excerpt_length);
        let minutes = time_to_read(&html);
        let cover = fm.image.as_deref().map(|image| self.resolve_cover(image, path));

        Ok(Post {
            title,
            slug: self.slug_for(path),
            created,
            updated,
            excerpt: excerpt_text,
            time_to_read: minutes,
            cover,
            author,
            tags: fm.tags.clone(),
            draft: fm.draft,
            content: html,
            raw: body.to_string(),
            source: path.to_path_buf(),
        })
    }

    fn resolve_author(&self, fm: &FrontMatter, path: &Path) -> Result<Author> {
        let id = match fm.author.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ if !self.config.default_author.is_empty() => self.config.default_author.as_str(),
            _ => {
                return Err(ContentError::MissingField {
                    field: "author",
                    path: path.to_path_buf(),
                }
                .into())
            }
        };

        self.authors.resolve(id).ok_or_else(|| {
            ContentError::UnknownAuthor {
                id: id.to_string(),
                path: path.to_path_buf(),
            }
            .into()
        })
    }

    /// Site path of the rendered page, derived from the file name
    fn slug_for(&self, path: &Path) -> String {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy())
            .unwrap_or_default();
        let slug = slug::slugify(&stem);
        url_for(
            &self.config.root,
            &format!("{}/{}/", self.config.blog_dir, slug),
        )
    }

    /// Turn a front matter image reference into a URL the generated site serves
    fn resolve_cover(&self, image: &str, path: &Path) -> String {
        if image.starts_with("http://") || image.starts_with("https://") || image.starts_with('/')
        {
            return image.to_string();
        }

        let image = image.trim_start_matches("./");
        let source_root = self.base_dir.join(&self.config.source_dir);
        let parent = path.parent().unwrap_or_else(|| Path::new(""));
        let relative = parent.strip_prefix(&source_root).unwrap_or(Path::new(""));
        let joined = relative.join(image);

        url_for(&self.config.root, &joined.to_string_lossy().replace('\\', "/"))
    }
}

/// True for visible `.md`/`.markdown` files
pub fn is_markdown_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(true);

    if hidden {
        return false;
    }

    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("md") | Some("markdown")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    fn write_site(dir: &Path) {
        std::fs::create_dir_all(dir.join("source/blog")).unwrap();
        std::fs::write(dir.join("authors.yml"), "jane:\n  github: janedoe\n").unwrap();
    }

    fn write_post(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join("source/blog").join(name), content).unwrap();
    }

    #[test]
    fn test_load_posts_sorted_desc() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path());
        write_post(
            dir.path(),
            "older.md",
            "---\ntitle: Older\ncreatedDate: \"2020-01-01\"\nauthor: jane\n---\nOld body.\n",
        );
        write_post(
            dir.path(),
            "newer.md",
            "---\ntitle: Newer\ncreatedDate: \"2021-06-15\"\nauthor: jane\n---\nNew body.\n",
        );

        let config = SiteConfig::default();
        let loader = ContentLoader::new(&config, dir.path()).unwrap();
        let posts = loader.load_posts().unwrap();

        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].title, "Newer");
        assert_eq!(posts[1].title, "Older");
        assert_eq!(posts[0].slug, "/blog/newer/");
        assert_eq!(posts[1].created.year(), 2020);
        assert_eq!(posts[0].author.id, "jane");
    }

    #[test]
    fn test_missing_title_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path());
        write_post(
            dir.path(),
            "untitled.md",
            "---\ncreatedDate: \"2020-01-01\"\nauthor: jane\n---\nBody.\n",
        );

        let config = SiteConfig::default();
        let loader = ContentLoader::new(&config, dir.path()).unwrap();
        let err = loader.load_posts().unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn test_missing_date_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path());
        write_post(
            dir.path(),
            "undated.md",
            "---\ntitle: Undated\nauthor: jane\n---\nBody.\n",
        );

        let config = SiteConfig::default();
        let loader = ContentLoader::new(&config, dir.path()).unwrap();
        let err = loader.load_posts().unwrap_err();
        assert!(err.to_string().contains("createdDate"));
    }

    #[test]
    fn test_unknown_author_fails() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path());
        write_post(
            dir.path(),
            "ghost.md",
            "---\ntitle: Ghost\ncreatedDate: \"2020-01-01\"\nauthor: nobody\n---\nBody.\n",
        );

        let config = SiteConfig::default();
        let loader = ContentLoader::new(&config, dir.path()).unwrap();
        let err = loader.load_posts().unwrap_err();
        assert!(err.to_string().contains("nobody"));
    }

    #[test]
    fn test_default_author_applies() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path());
        write_post(
            dir.path(),
            "anon.md",
            "---\ntitle: Anon\ncreatedDate: \"2020-01-01\"\n---\nBody.\n",
        );

        let config = SiteConfig {
            default_author: "jane".to_string(),
            ..SiteConfig::default()
        };
        let loader = ContentLoader::new(&config, dir.path()).unwrap();
        let posts = loader.load_posts().unwrap();
        assert_eq!(posts[0].author.id, "jane");
    }

    #[test]
    fn test_relative_cover_resolves() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path());
        write_post(
            dir.path(),
            "covered.md",
            "---\ntitle: Covered\ncreatedDate: \"2020-01-01\"\nauthor: jane\nimage: ./cover.png\n---\nBody.\n",
        );

        let config = SiteConfig::default();
        let loader = ContentLoader::new(&config, dir.path()).unwrap();
        let posts = loader.load_posts().unwrap();
        assert_eq!(posts[0].cover.as_deref(), Some("/blog/cover.png"));
    }

    #[test]
    fn test_draft_flag_loaded() {
        let dir = tempfile::tempdir().unwrap();
        write_site(dir.path());
        write_post(
            dir.path(),
            "wip.md",
            "---\ntitle: WIP\ncreatedDate: \"2020-01-01\"\nauthor: jane\ndraft: true\n---\nBody.\n",
        );

        let config = SiteConfig::default();
        let loader = ContentLoader::new(&config, dir.path()).unwrap();
        let posts = loader.load_posts().unwrap();
        assert!(posts[0].draft);
    }
}
