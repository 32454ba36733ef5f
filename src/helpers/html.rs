//! HTML helper functions

/// Escape the characters that carry meaning in HTML
pub fn html_escape(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(ch),
        }
    }
    result
}

/// Remove all tags from an HTML fragment, leaving the text content
pub fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut chars = html.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            '&' if !in_tag => {
                // Decode the handful of entities the renderer emits
                let mut entity = String::new();
                while let Some(&next) = chars.peek() {
                    entity.push(next);
                    chars.next();
                    if next == ';' || entity.len() > 8 {
                        break;
                    }
                }
                match entity.as_str() {
                    "amp;" => result.push('&'),
                    "lt;" => result.push('<'),
                    "gt;" => result.push('>'),
                    "quot;" => result.push('"'),
                    "#39;" => result.push('\''),
                    "nbsp;" => result.push(' '),
                    _ => {
                        result.push('&');
                        result.push_str(&entity);
                    }
                }
            }
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }

    result
}

/// Truncate text to a maximum number of characters on a word boundary
pub fn truncate_words(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let truncated: String = text.chars().take(max_chars).collect();
    let cut = match truncated.rfind(char::is_whitespace) {
        Some(pos) if pos > 0 => &truncated[..pos],
        _ => truncated.as_str(),
    };

    format!("{}\u{2026}", cut.trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape("<script>\"a\" & 'b'</script>"),
            "&lt;script&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Hello <strong>world</strong></p>"),
            "Hello world"
        );
        assert_eq!(strip_html("a &amp; b"), "a & b");
        assert_eq!(strip_html("<a href=\"/x\">link</a>"), "link");
    }

    #[test]
    fn test_truncate_words() {
        assert_eq!(truncate_words("short text", 140), "short text");
        assert_eq!(truncate_words("hello brave new world", 12), "hello brave\u{2026}");
    }

    #[test]
    fn test_truncate_no_boundary() {
        assert_eq!(truncate_words("abcdefghij", 5), "abcde\u{2026}");
    }
}
