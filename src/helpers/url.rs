//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters that must be escaped inside a URL path
const PATH_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'#')
    .add(b'?')
    .add(b'{')
    .add(b'}');

/// Build a site-absolute URL from the configured root and a relative path
pub fn url_for(root: &str, path: &str) -> String {
    let root = root.trim_matches('/');
    let path = path.trim_start_matches('/');

    if root.is_empty() {
        format!("/{}", path)
    } else {
        format!("/{}/{}", root, path)
    }
}

/// Build a fully-qualified URL from the configured site URL and a path
pub fn full_url_for(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    encode_url(&format!("{}/{}", base, path))
}

/// Percent-encode the characters that are not safe inside a URL
pub fn encode_url(url: &str) -> String {
    utf8_percent_encode(url, PATH_SET).to_string()
}
