//! Vellum, a static blog generator
//!
//! Markdown posts under `source/blog/` become a paginated listing, one
//! page per post, a search index and an atom feed. Authors live in a
//! site-wide registry; posts reference them by id.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod query;
pub mod server;
pub mod templates;
pub mod view;

use anyhow::{Context, Result};
use config::SiteConfig;
use content::ContentLoader;
use generator::Generator;
use query::ContentIndex;
use std::path::{Path, PathBuf};
use tracing::info;

/// Site configuration file name
pub const CONFIG_FILE: &str = "_config.yml";

/// A site rooted at a directory holding `_config.yml`
pub struct Vellum {
    pub config: SiteConfig,
    pub base_dir: PathBuf,
    pub public_dir: PathBuf,
}

impl Vellum {
    /// Open the site at `base_dir`, reading its configuration
    pub fn new(base_dir: &Path) -> Result<Self> {
        let config_path = base_dir.join(CONFIG_FILE);
        let config = SiteConfig::load(&config_path)
            .with_context(|| format!("failed to load {}", config_path.display()))?;
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir: base_dir.to_path_buf(),
            public_dir,
        })
    }

    /// Load posts and index the ones the listing should show
    ///
    /// Drafts stay out of the index unless `render_drafts` is set.
    pub fn load_index(&self) -> Result<ContentIndex> {
        let loader = ContentLoader::new(&self.config, &self.base_dir)?;
        let posts = loader.load_posts()?;
        let visible = posts
            .into_iter()
            .filter(|post| !post.draft || self.config.render_drafts)
            .collect();
        Ok(ContentIndex::new(visible))
    }

    /// Generate the whole site into the public directory
    pub fn generate(&self) -> Result<()> {
        let started = std::time::Instant::now();
        let index = self.load_index()?;
        Generator::new(&self.config, &self.base_dir)?.generate(&index)?;
        info!(
            posts = index.len(),
            elapsed = ?started.elapsed(),
            "site generated"
        );
        Ok(())
    }

    /// Remove the public directory
    pub fn clean(&self) -> Result<()> {
        if self.public_dir.exists() {
            std::fs::remove_dir_all(&self.public_dir)
                .with_context(|| format!("failed to remove {}", self.public_dir.display()))?;
            info!("removed {}", self.public_dir.display());
        }
        Ok(())
    }

    pub fn source_dir(&self) -> PathBuf {
        self.base_dir.join(&self.config.source_dir)
    }

    pub fn authors_path(&self) -> PathBuf {
        self.base_dir.join(&self.config.authors_file)
    }

    /// Paths a watcher should observe to pick up rebuild-worthy changes
    pub fn watch_targets(&self) -> Vec<PathBuf> {
        vec![
            self.source_dir(),
            self.base_dir.join(CONFIG_FILE),
            self.authors_path(),
        ]
    }
}
