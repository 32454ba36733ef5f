//! `clean` removes generated output

use crate::Vellum;
use anyhow::Result;
use std::path::Path;

pub fn run(base_dir: &Path) -> Result<()> {
    Vellum::new(base_dir)?.clean()
}
