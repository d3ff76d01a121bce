//! Front-matter parsing
//!
//! A post starts with either a YAML block between `---` fences or a bare JSON
//! object. Anything else is all body.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Front-matter data from a post file
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<String>,
    pub author: Option<String>,
    #[serde(deserialize_with = "tag_list")]
    pub tags: Vec<String>,
    pub image: Option<String>,
    /// Overrides the path derived from the file name
    pub slug: Option<String>,
    pub draft: bool,
    pub published: bool,
}

impl Default for FrontMatter {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            date: None,
            author: None,
            tags: Vec::new(),
            image: None,
            slug: None,
            draft: false,
            published: true,
        }
    }
}

/// `tags: rust` and `tags: [rust, async]` both work
fn tag_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Tags>::deserialize(deserializer)? {
        Some(Tags::One(tag)) => vec![tag],
        Some(Tags::Many(tags)) => tags,
        None => Vec::new(),
    })
}

impl FrontMatter {
    /// Whether the post should appear in the feed
    pub fn is_listed(&self) -> bool {
        self.published && !self.draft
    }

    /// Split a post file into its front matter and body
    pub fn parse(content: &str) -> Result<(Self, &str)> {
        let content = content.trim_start();

        if content.starts_with('{') {
            return Self::parse_json(content);
        }

        match split_yaml(content) {
            Some((yaml, body)) if yaml.trim().is_empty() => Ok((Self::default(), body)),
            Some((yaml, body)) => {
                let fm = serde_yaml::from_str(yaml).context("Invalid YAML front matter")?;
                Ok((fm, body))
            }
            None => Ok((Self::default(), content)),
        }
    }

    fn parse_json(content: &str) -> Result<(Self, &str)> {
        let mut stream = serde_json::Deserializer::from_str(content).into_iter::<Self>();
        let fm = match stream.next() {
            Some(fm) => fm.context("Invalid JSON front matter")?,
            None => Self::default(),
        };
        let body = content[stream.byte_offset()..].trim_start_matches(['\n', '\r']);
        Ok((fm, body))
    }

    /// Parse the date string into a calendar date
    pub fn parse_date(&self) -> Option<NaiveDate> {
        self.date.as_deref().and_then(parse_date_string)
    }
}

/// The text between an opening `---` line and the next `---` line, and the
/// body after it. `None` without both fences.
fn split_yaml(content: &str) -> Option<(&str, &str)> {
    let rest = content.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let body = rest[offset + line.len()..].trim_start_matches(['\n', '\r']);
            return Some((&rest[..offset], body));
        }
        offset += line.len();
    }
    None
}

/// Parse a date string in the formats blog front matter commonly uses.
///
/// Only the calendar date is kept; times and offsets are dropped.
pub fn parse_date_string(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    for fmt in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }

    // RFC 3339 / ISO 8601 with offset, keep the author's local calendar day
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}
