//! `list` prints the site inventory

use crate::content::ContentLoader;
use crate::query::ContentIndex;
use crate::Vellum;
use anyhow::Result;
use clap::ValueEnum;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListKind {
    Posts,
    Tags,
    Authors,
    Drafts,
}

pub fn run(base_dir: &Path, kind: ListKind) -> Result<()> {
    let vellum = Vellum::new(base_dir)?;
    let loader = ContentLoader::new(&vellum.config, &vellum.base_dir)?;

    match kind {
        ListKind::Posts => {
            for post in loader.load_posts()?.iter().filter(|post| !post.draft) {
                println!(
                    "{}  {}  {}",
                    post.created.format("%Y-%m-%d"),
                    post.slug,
                    post.title
                );
            }
        }
        ListKind::Drafts => {
            for post in loader.load_posts()?.iter().filter(|post| post.draft) {
                println!("{}  {}", post.source.display(), post.title);
            }
        }
        ListKind::Tags => {
            let published = loader
                .load_posts()?
                .into_iter()
                .filter(|post| !post.draft)
                .collect();
            for group in ContentIndex::new(published).tag_groups() {
                println!("{:4}  {}", group.count, group.name);
            }
        }
        ListKind::Authors => {
            for (id, entry) in loader.authors().iter() {
                println!("{}  {}", id, entry.github.as_deref().unwrap_or("-"));
            }
        }
    }

    Ok(())
}
