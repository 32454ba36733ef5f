//! `init` scaffolds a new site

use anyhow::{bail, Result};
use chrono::Local;
use std::fs;
use std::path::Path;
use tracing::info;

const DEFAULT_CONFIG: &str = r#"# Site
title: My Blog
subtitle: ""
description: ""
language: en

# URL
url: http://example.com
root: /

# Listing
per_page: 10
tag_sidebar: false

# Authors
default_author: admin
"#;

const DEFAULT_AUTHORS: &str = r#"admin:
  github: octocat
"#;

fn hello_post() -> String {
    format!(
        r#"---
title: Hello World
createdDate: "{}"
tags: [meta]
---
Welcome to your new blog. Edit or delete this post, then run `vellum generate`.

```rust
fn main() {{
    println!("hello, blog");
}}
```
"#,
        Local::now().format("%Y-%m-%d")
    )
}

pub fn run(folder: &str, cwd: &Path) -> Result<()> {
    let target = cwd.join(folder);
    if target.join(crate::CONFIG_FILE).exists() {
        bail!("{} already contains a site", target.display());
    }

    fs::create_dir_all(target.join("source/blog"))?;
    fs::write(target.join(crate::CONFIG_FILE), DEFAULT_CONFIG)?;
    fs::write(target.join("authors.yml"), DEFAULT_AUTHORS)?;
    fs::write(target.join("source/blog/hello-world.md"), hello_post())?;

    info!("initialized new site in {}", target.display());
    Ok(())
}
