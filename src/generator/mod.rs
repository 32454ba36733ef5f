//! Static site generation

use crate::config::SiteConfig;
use crate::content::loader::is_markdown_file;
use crate::helpers::{full_url_for, html_escape, url_for};
use crate::query::{ContentIndex, ListingQuery};
use crate::templates::{STYLESHEET_PATH, THEME_STYLESHEET};
use crate::view::pagination::{page_count, page_url};
use crate::view::{ListingView, PageContext};
use anyhow::{Context, Result};
use chrono::Local;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

/// Number of posts carried in the atom feed
const FEED_SIZE: usize = 20;

/// One record in `search.json`
#[derive(Serialize)]
struct SearchEntry<'a> {
    title: &'a str,
    url: &'a str,
    created: String,
    tags: &'a [String],
    excerpt: &'a str,
    author: &'a str,
}

/// Writes the whole site into the public directory
pub struct Generator<'a> {
    config: &'a SiteConfig,
    base_dir: &'a Path,
    public_dir: PathBuf,
    view: ListingView,
}

impl<'a> Generator<'a> {
    pub fn new(config: &'a SiteConfig, base_dir: &'a Path) -> Result<Self> {
        Ok(Self {
            config,
            base_dir,
            public_dir: base_dir.join(&config.public_dir),
            view: ListingView::new(config)?,
        })
    }

    /// Generate every output file for the given index
    pub fn generate(&self, index: &ContentIndex) -> Result<()> {
        fs::create_dir_all(&self.public_dir)
            .with_context(|| format!("failed to create {}", self.public_dir.display()))?;

        self.write_stylesheet()?;
        self.copy_assets()?;
        self.generate_listing_pages(index)?;
        if self.config.tag_sidebar {
            self.generate_tag_pages(index)?;
        }
        self.generate_post_pages(index)?;
        self.generate_search_index(index)?;
        self.generate_feed(index)?;
        self.write_root_redirect()?;

        Ok(())
    }

    /// Main listing pages: page 1 at the blog base, later pages under the
    /// pagination directory
    ///
    /// Page 1 is always written, even for an empty site.
    fn generate_listing_pages(&self, index: &ContentIndex) -> Result<()> {
        let pages = page_count(index.len(), self.config.per_page).max(1);
        let base = self.view.base_path(&PageContext::page(1));

        for number in 1..=pages {
            let ctx = PageContext::page(number);
            let result = index.run(&ListingQuery::page(number, self.config.per_page));
            let html = self.view.render(&result, &ctx)?;
            self.write_page(&page_url(&base, &self.config.pagination_dir, number), &html)?;
        }

        info!(pages, "generated listing");
        Ok(())
    }

    /// Tag-filtered listings behind the sidebar links
    fn generate_tag_pages(&self, index: &ContentIndex) -> Result<()> {
        let mut written = 0;
        for group in index.tag_groups() {
            let pages = page_count(group.count, self.config.per_page).max(1);
            for number in 1..=pages {
                let ctx = PageContext::tagged(&group.name, number);
                let query = ListingQuery::tagged(&group.name, number, self.config.per_page);
                let html = self.view.render(&index.run(&query), &ctx)?;
                let base = self.view.base_path(&ctx);
                self.write_page(&page_url(&base, &self.config.pagination_dir, number), &html)?;
                written += 1;
            }
        }

        info!(pages = written, "generated tag listings");
        Ok(())
    }

    fn generate_post_pages(&self, index: &ContentIndex) -> Result<()> {
        for post in index.posts() {
            let html = self.view.render_post(post)?;
            self.write_page(&post.slug, &html)?;
        }

        info!(posts = index.len(), "generated post pages");
        Ok(())
    }

    /// Client-side search index over every post in the listing
    fn generate_search_index(&self, index: &ContentIndex) -> Result<()> {
        let entries: Vec<SearchEntry> = index
            .posts()
            .iter()
            .map(|post| SearchEntry {
                title: &post.title,
                url: &post.slug,
                created: post.created.format("%Y-%m-%d").to_string(),
                tags: &post.tags,
                excerpt: &post.excerpt,
                author: &post.author.id,
            })
            .collect();

        let json = serde_json::to_string_pretty(&entries)?;
        fs::write(self.public_dir.join("search.json"), json)?;
        Ok(())
    }

    /// Atom feed of the most recent posts
    fn generate_feed(&self, index: &ContentIndex) -> Result<()> {
        let site_url = full_url_for(&self.config.url, &url_for(&self.config.root, ""));
        let feed_url = full_url_for(&self.config.url, &url_for(&self.config.root, "atom.xml"));
        let updated = index
            .posts()
            .first()
            .map(|post| post.created.to_rfc3339())
            .unwrap_or_else(|| Local::now().to_rfc3339());

        let mut feed = String::new();
        feed.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        feed.push_str("<feed xmlns=\"http://www.w3.org/2005/Atom\">\n");
        feed.push_str(&format!(
            "  <title>{}</title>\n",
            html_escape(&self.config.title)
        ));
        feed.push_str(&format!("  <id>{}</id>\n", site_url));
        feed.push_str(&format!(
            "  <link rel=\"alternate\" href=\"{}\"/>\n",
            site_url
        ));
        feed.push_str(&format!(
            "  <link rel=\"self\" href=\"{}\"/>\n",
            feed_url
        ));
        feed.push_str(&format!("  <updated>{}</updated>\n", updated));

        for post in index.posts().iter().take(FEED_SIZE) {
            let post_url = full_url_for(&self.config.url, &post.slug);
            feed.push_str("  <entry>\n");
            feed.push_str(&format!(
                "    <title>{}</title>\n",
                html_escape(&post.title)
            ));
            feed.push_str(&format!("    <id>{}</id>\n", post_url));
            feed.push_str(&format!("    <link href=\"{}\"/>\n", post_url));
            feed.push_str(&format!(
                "    <updated>{}</updated>\n",
                post.updated.unwrap_or(post.created).to_rfc3339()
            ));
            feed.push_str(&format!(
                "    <author><name>{}</name></author>\n",
                html_escape(&post.author.id)
            ));
            feed.push_str(&format!(
                "    <summary>{}</summary>\n",
                html_escape(&post.excerpt)
            ));
            feed.push_str(&format!(
                "    <content type=\"html\"><![CDATA[{}]]></content>\n",
                post.content.replace("]]>", "]]]]><![CDATA[>")
            ));
            feed.push_str("  </entry>\n");
        }

        feed.push_str("</feed>\n");
        fs::write(self.public_dir.join("atom.xml"), feed)?;
        Ok(())
    }

    fn write_stylesheet(&self) -> Result<()> {
        let path = self.public_dir.join(STYLESHEET_PATH);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, THEME_STYLESHEET)?;
        Ok(())
    }

    /// Copy everything under the source tree that is not a markdown file
    fn copy_assets(&self) -> Result<()> {
        let source = self.base_dir.join(&self.config.source_dir);
        if !source.exists() {
            return Ok(());
        }

        let mut copied = 0;
        for entry in WalkDir::new(&source) {
            let entry = entry?;
            let path = entry.path();
            if !entry.file_type().is_file() {
                continue;
            }

            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if name.starts_with('.') || is_markdown_file(path) {
                continue;
            }

            let dest = self.public_dir.join(path.strip_prefix(&source)?);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::copy(path, &dest)
                .with_context(|| format!("failed to copy {}", path.display()))?;
            copied += 1;
        }

        debug!(files = copied, "copied assets");
        Ok(())
    }

    /// The site root forwards to the listing when they are not the same page
    fn write_root_redirect(&self) -> Result<()> {
        let home = url_for(&self.config.root, "");
        let blog_base = self.view.base_path(&PageContext::page(1));
        if blog_base == home {
            return Ok(());
        }

        let html = format!(
            "<!DOCTYPE html>\n<html>\n<head>\n  <meta charset=\"utf-8\">\n  \
             <meta http-equiv=\"refresh\" content=\"0; url={0}\">\n  \
             <link rel=\"canonical\" href=\"{0}\">\n</head>\n<body></body>\n</html>\n",
            blog_base
        );
        self.write_page(&home, &html)
    }

    fn write_page(&self, url: &str, html: &str) -> Result<()> {
        let file = self.output_file(url);
        if let Some(parent) = file.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&file, html).with_context(|| format!("failed to write {}", file.display()))?;
        debug!("wrote {}", file.display());
        Ok(())
    }

    /// Map a site-absolute URL like `/blog/page/2/` to its output file
    ///
    /// The configured root is a deploy-time mount point; it never appears
    /// in the output tree.
    fn output_file(&self, url: &str) -> PathBuf {
        let root = self.config.root.trim_matches('/');
        let mut trimmed = url.trim_start_matches('/');
        if !root.is_empty() {
            trimmed = trimmed.strip_prefix(root).unwrap_or(trimmed);
            trimmed = trimmed.trim_start_matches('/');
        }

        let path = self.public_dir.join(trimmed);
        if url.ends_with('/') || trimmed.is_empty() {
            path.join("index.html")
        } else {
            path
        }
    }
}
