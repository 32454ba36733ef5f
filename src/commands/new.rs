//! `new` creates a draft post

use crate::content::AuthorRegistry;
use crate::Vellum;
use anyhow::{bail, Result};
use chrono::Local;
use std::fs;
use tracing::info;

pub fn run(vellum: &Vellum, title: &str) -> Result<()> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        bail!("title `{}` produces an empty file name", title);
    }

    let blog_dir = vellum.source_dir().join(&vellum.config.blog_dir);
    fs::create_dir_all(&blog_dir)?;

    let path = blog_dir.join(format!("{}.md", slug));
    if path.exists() {
        bail!("{} already exists", path.display());
    }

    let author = post_author(vellum)?;
    let content = format!(
        "---\ntitle: {}\ncreatedDate: \"{}\"\nauthor: {}\ntags: []\ndraft: true\n---\n\n",
        title,
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        author,
    );
    fs::write(&path, content)?;

    info!("created {}", path.display());
    Ok(())
}

/// Pick the author for a fresh post: the configured default, else the
/// first registry entry
fn post_author(vellum: &Vellum) -> Result<String> {
    if !vellum.config.default_author.is_empty() {
        return Ok(vellum.config.default_author.clone());
    }

    let registry = AuthorRegistry::load(&vellum.authors_path())?;
    let first = registry.iter().next();
    match first {
        Some((id, _)) => Ok(id.to_string()),
        None => bail!(
            "no authors defined; add one to {} first",
            vellum.authors_path().display()
        ),
    }
}
