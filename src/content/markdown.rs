//! Markdown rendering with syntax highlighting

use crate::helpers::{html_escape, strip_html, truncate_words};
use anyhow::{anyhow, Result};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

/// Words per minute used for read time estimates
const READING_SPEED: usize = 265;

/// Renders markdown to HTML, highlighting fenced code blocks
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme: Theme,
}

impl MarkdownRenderer {
    pub fn new(theme_name: &str) -> Result<Self> {
        let theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .get(theme_name)
            .cloned()
            .ok_or_else(|| anyhow!("unknown highlight theme `{}`", theme_name))?;

        Ok(Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme,
        })
    }

    /// Render a markdown body to HTML
    pub fn render(&self, markdown: &str) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        let parser = Parser::new_ext(markdown, options);

        let mut events = Vec::new();
        let mut code_lang: Option<String> = None;
        let mut code_buf = String::new();

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    code_buf.clear();
                    code_lang = Some(match kind {
                        CodeBlockKind::Fenced(info) => info
                            .split(|c: char| c == ',' || c.is_whitespace())
                            .next()
                            .unwrap_or("")
                            .to_string(),
                        CodeBlockKind::Indented => String::new(),
                    });
                }
                Event::Text(text) if code_lang.is_some() => code_buf.push_str(&text),
                Event::End(TagEnd::CodeBlock) => {
                    if let Some(lang) = code_lang.take() {
                        events.push(Event::Html(self.highlight_block(&code_buf, &lang).into()));
                    }
                }
                other => events.push(other),
            }
        }

        let mut html = String::with_capacity(markdown.len() * 2);
        pulldown_cmark::html::push_html(&mut html, events.into_iter());
        html
    }

    fn highlight_block(&self, code: &str, lang: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let highlighted =
            match highlighted_html_for_string(code, &self.syntax_set, syntax, &self.theme) {
                Ok(html) => html,
                Err(_) => format!("<pre><code>{}</code></pre>\n", html_escape(code)),
            };

        let class = if lang.is_empty() {
            "highlight".to_string()
        } else {
            format!("highlight {}", html_escape(lang))
        };

        format!("<figure class=\"{}\">{}</figure>\n", class, highlighted)
    }
}

/// Build a plain-text excerpt from rendered HTML
pub fn excerpt(html: &str, max_chars: usize) -> String {
    let text = strip_html(html);
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    truncate_words(&collapsed, max_chars)
}

/// Estimate reading time in whole minutes, never below one
pub fn time_to_read(html: &str) -> usize {
    let words = strip_html(html).split_whitespace().count();
    ((words + READING_SPEED / 2) / READING_SPEED).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> MarkdownRenderer {
        MarkdownRenderer::new("base16-ocean.dark").unwrap()
    }

    #[test]
    fn test_render_basic() {
        let html = renderer().render("Hello **world**");
        assert!(html.contains("<p>Hello <strong>world</strong></p>"));
    }

    #[test]
    fn test_render_code_block() {
        let html = renderer().render("```rust\nfn main() {}\n```\n");
        assert!(html.contains("<figure class=\"highlight rust\">"));
        assert!(html.contains("<pre"));
    }

    #[test]
    fn test_unknown_theme() {
        assert!(MarkdownRenderer::new("no-such-theme").is_err());
    }

    #[test]
    fn test_excerpt_prunes_on_word_boundary() {
        let html = "<p>The quick brown fox jumps over the lazy dog</p>";
        assert_eq!(excerpt(html, 19), "The quick brown\u{2026}");
        assert_eq!(excerpt(html, 200), "The quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn test_time_to_read_floor() {
        assert_eq!(time_to_read("<p>short</p>"), 1);
        let long = format!("<p>{}</p>", "word ".repeat(600));
        assert_eq!(time_to_read(&long), 2);
    }
}
