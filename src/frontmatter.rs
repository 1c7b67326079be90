//! Frontmatter splitting and decoding.
//!
//! A post may start with a flat metadata block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: "Getting Started with React"
//! date: 2024-01-15
//! tags: [React, "JavaScript", 'Web Development']
//! ---
//! # Getting Started with React
//! ...
//! ```
//!
//! Parsing is single-pass and line-oriented: one `key: value` per line, no
//! nesting, no multi-line values. Values are either a scalar string (quotes
//! stripped) or a bracketed, comma-separated list. Lines without a colon are
//! skipped. A document that does not open with a `---` line, or never closes
//! the block, has no frontmatter and is returned untouched.

use std::collections::BTreeMap;

const FENCE: &str = "---";

/// A raw frontmatter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrontmatterValue {
    Scalar(String),
    List(Vec<String>),
}

impl FrontmatterValue {
    fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Scalar(s) => Some(s),
            Self::List(_) => None,
        }
    }
}

/// Result of splitting a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub metadata: BTreeMap<String, FrontmatterValue>,
    pub body: String,
}

/// The recognized frontmatter keys, decoded.
///
/// Every field is optional; the loader fills gaps with derived values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostMeta {
    pub title: Option<String>,
    pub date: Option<String>,
    pub tags: Vec<String>,
    pub author: Option<String>,
    pub excerpt: Option<String>,
    pub slug: Option<String>,
}

/// Split `raw` into a metadata map and a body.
pub fn parse(raw: &str) -> Document {
    match split_block(raw) {
        Some((block, body)) => Document {
            metadata: parse_block(block),
            body: body.to_string(),
        },
        None => Document {
            metadata: BTreeMap::new(),
            body: raw.to_string(),
        },
    }
}

/// Locate the fenced block. Returns `(block, body)` slices of `raw`.
fn split_block(raw: &str) -> Option<(&str, &str)> {
    let (first, rest) = raw.split_once('\n')?;
    if first.trim_end() != FENCE {
        return None;
    }

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let block = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Some((block, body));
        }
        offset += line.len();
    }
    None
}

fn parse_block(block: &str) -> BTreeMap<String, FrontmatterValue> {
    block
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(':')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), parse_value(value.trim())))
        })
        .collect()
}

fn parse_value(value: &str) -> FrontmatterValue {
    let value = strip_quotes(value);
    match value
        .strip_prefix('[')
        .and_then(|v| v.strip_suffix(']'))
    {
        Some(inner) => FrontmatterValue::List(
            inner
                .split(',')
                .map(|item| item.trim().replace(['"', '\''], ""))
                .filter(|item| !item.is_empty())
                .collect(),
        ),
        None => FrontmatterValue::Scalar(value.to_string()),
    }
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2
            && let Some(inner) = value
                .strip_prefix(quote)
                .and_then(|v| v.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}

impl PostMeta {
    /// Decode the recognized keys from a raw metadata map.
    ///
    /// Scalar fields ignore list values. `tags` takes a list, or a non-empty
    /// scalar as a single tag; duplicate tags keep their first occurrence.
    pub fn from_map(metadata: &BTreeMap<String, FrontmatterValue>) -> Self {
        let scalar = |key: &str| {
            metadata
                .get(key)
                .and_then(FrontmatterValue::as_scalar)
                .map(str::to_string)
        };

        let raw_tags: Vec<String> = match metadata.get("tags") {
            Some(FrontmatterValue::List(items)) => items.clone(),
            Some(FrontmatterValue::Scalar(s)) if !s.is_empty() => vec![s.clone()],
            _ => Vec::new(),
        };
        let mut tags: Vec<String> = Vec::with_capacity(raw_tags.len());
        for tag in raw_tags {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }

        Self {
            title: scalar("title"),
            date: scalar("date"),
            tags,
            author: scalar("author"),
            excerpt: scalar("excerpt"),
            slug: scalar("slug"),
        }
    }
}
