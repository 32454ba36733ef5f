//! Front matter parsing for markdown posts

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// Parsed YAML front matter of a post
///
/// All fields are optional at this level; the loader decides which ones
/// a post cannot do without.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    #[serde(rename = "createdDate", alias = "date")]
    pub created_date: Option<String>,
    #[serde(rename = "updatedDate", alias = "updated")]
    pub updated_date: Option<String>,
    pub author: Option<String>,
    pub image: Option<String>,
    #[serde(deserialize_with = "string_or_seq")]
    pub tags: Vec<String>,
    pub draft: bool,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_yaml::Value>,
}

/// Split a post file into front matter and body
///
/// The front matter block is delimited by `---` fences at the top of the
/// file. A file without a fence is all body.
pub fn parse(content: &str) -> Result<(FrontMatter, &str)> {
    let source = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(rest) = source.strip_prefix("---") else {
        return Ok((FrontMatter::default(), source));
    };

    let Some(end) = rest.find("\n---") else {
        bail!("unterminated front matter block");
    };

    let yaml = &rest[..end];
    let after = &rest[end + 4..];
    let body = after
        .strip_prefix("\r\n")
        .or_else(|| after.strip_prefix('\n'))
        .unwrap_or(after);

    let front_matter = if yaml.trim().is_empty() {
        FrontMatter::default()
    } else {
        serde_yaml::from_str(yaml).context("invalid front matter YAML")?
    };

    Ok((front_matter, body))
}

/// Parse a date value from front matter, accepting several common forms
pub fn parse_date_string(value: &str) -> Option<DateTime<Local>> {
    let value = value.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Local));
    }

    let datetime_formats = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y/%m/%d %H:%M:%S"];
    for format in datetime_formats {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Local.from_local_datetime(&naive).earliest();
        }
    }

    let date_formats = ["%Y-%m-%d", "%Y/%m/%d", "%d %B, %Y", "%B %d, %Y"];
    for format in date_formats {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            let naive = date.and_hms_opt(0, 0, 0)?;
            return Local.from_local_datetime(&naive).earliest();
        }
    }

    None
}

/// Accept `tags: a, b` and `tags: [a, b]` alike
fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrSeq;

    impl<'de> serde::de::Visitor<'de> for StringOrSeq {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or a sequence of strings")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value
                .split(',')
                .map(|tag| tag.trim().to_string())
                .filter(|tag| !tag.is_empty())
                .collect())
        }

        fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
        where
            A: serde::de::SeqAccess<'de>,
        {
            let mut tags = Vec::new();
            while let Some(tag) = seq.next_element::<String>()? {
                tags.push(tag);
            }
            Ok(tags)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrSeq)
}
