//! Helper functions shared across the generator

pub mod date;
pub mod html;
pub mod url;

pub use date::format_date;
pub use html::{html_escape, strip_html, truncate_words};
pub use url::{encode_url, full_url_for, url_for};
