//! Embedded template engine
//!
//! The `prose` theme ships inside the binary so a generated site needs no
//! theme checkout. Templates are Tera; the stylesheet is written into the
//! output tree by the generator.

use crate::helpers::truncate_words;
use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera, Value};

/// Stylesheet for the embedded theme
pub const THEME_STYLESHEET: &str = include_str!("prose/vellum.css");

/// Relative output path of the stylesheet
pub const STYLESHEET_PATH: &str = "css/vellum.css";

pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("layout.html", include_str!("prose/layout.html")),
            ("listing.html", include_str!("prose/listing.html")),
            ("post.html", include_str!("prose/post.html")),
            ("partials/card.html", include_str!("prose/partials/card.html")),
            ("partials/pager.html", include_str!("prose/partials/pager.html")),
            (
                "partials/tag_sidebar.html",
                include_str!("prose/partials/tag_sidebar.html"),
            ),
        ])?;
        tera.autoescape_on(vec![]);
        tera.register_filter("truncate_chars", truncate_chars);

        Ok(Self { tera })
    }

    pub fn render<T: Serialize>(&self, template: &str, context: &T) -> Result<String> {
        let context = Context::from_serialize(context)?;
        Ok(self.tera.render(template, &context)?)
    }
}

/// `truncate_chars(length=160)` filter, pruning on a word boundary
fn truncate_chars(value: &Value, args: &HashMap<String, Value>) -> tera::Result<Value> {
    let text = value.as_str().unwrap_or_default();
    let length = args.get("length").and_then(Value::as_u64).unwrap_or(140) as usize;
    Ok(Value::String(truncate_words(text, length)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_templates_parse() {
        assert!(TemplateRenderer::new().is_ok());
    }

    #[test]
    fn test_truncate_chars_filter() {
        let mut args = HashMap::new();
        args.insert("length".to_string(), Value::from(12));
        let out = truncate_chars(&Value::from("hello brave new world"), &args).unwrap();
        assert_eq!(out, Value::from("hello brave\u{2026}"));
    }
}
