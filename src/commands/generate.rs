//! `generate` builds the site

use crate::Vellum;
use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use std::path::Path;
use std::time::Duration;
use tracing::{error, info, warn};

pub fn run(base_dir: &Path) -> Result<()> {
    Vellum::new(base_dir)?.generate()
}

/// Build once, then rebuild on every source change until interrupted
pub async fn watch(base_dir: &Path) -> Result<()> {
    run(base_dir)?;

    let vellum = Vellum::new(base_dir)?;
    let (tx, mut rx) = tokio::sync::mpsc::channel(8);
    let mut debouncer = new_debouncer(Duration::from_millis(300), move |result| {
        let _ = tx.blocking_send(result);
    })?;

    for target in vellum.watch_targets() {
        if !target.exists() {
            continue;
        }
        let mode = if target.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        debouncer.watcher().watch(&target, mode)?;
    }

    info!("watching for changes, ctrl-c to stop");
    while let Some(result) = rx.recv().await {
        match result {
            Ok(events) => {
                info!(changes = events.len(), "source changed, rebuilding");
                if let Err(error) = run(base_dir) {
                    error!("rebuild failed: {error:#}");
                }
            }
            Err(error) => warn!("watch error: {error:?}"),
        }
    }

    Ok(())
}
