//! Shared types used across the pipeline and the CLI.
//!
//! A [`Post`] is created once during loading and never mutated afterwards.
//! It serializes to JSON for the generated `posts.json` search index.

use serde::{Deserialize, Serialize};

/// Title used when frontmatter has none.
pub const UNTITLED: &str = "Untitled";

/// A fully resolved blog post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    /// ISO-8601 date or timestamp, as written in frontmatter (or the load time)
    pub date: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub author: String,
    /// Markdown body, frontmatter stripped
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    pub excerpt: String,
    /// Unique, URL-safe routing key
    pub slug: String,
    /// Estimated minutes to read, at least 1
    pub read_time: u32,
}

impl Post {
    /// Whether the post carries `tag` (exact match).
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// A copy without the markdown body, for listings and the search index.
    pub fn summary(&self) -> Post {
        Post {
            content: String::new(),
            ..self.clone()
        }
    }
}
