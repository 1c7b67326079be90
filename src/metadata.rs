//! Derived post metadata: slugs, reading time, excerpts.
//!
//! A post's frontmatter may set `slug` and `excerpt` explicitly. Anything it
//! leaves out is derived from the title or the markdown body:
//!
//! | Field | Source when absent |
//! |-------|--------------------|
//! | `slug` | [`derive_slug`] of the title |
//! | `excerpt` | [`derive_excerpt`] of the body |
//! | `read_time` | always [`derive_read_time`] of the body |
//!
//! ## Excerpt truncation
//!
//! Excerpts are cut from the plain-text rendering of the body (see
//! [`crate::plaintext`]). When the text is longer than the limit, the cut
//! prefers a sentence boundary in the second half of the window and falls
//! back to the last word boundary plus an ellipsis:
//!
//! ```text
//! "React is great. It makes UIs easy to build and ..."   (limit 40)
//!  └─ sentence end at 14, not past 20 → word cut: "React is great. It makes UIs easy to..."
//! ```
//!
//! All lengths count `char`s, so multi-byte text never splits mid-codepoint.

use crate::plaintext::to_plain_text;

/// Excerpt length used when a caller has no preference.
pub const DEFAULT_EXCERPT_LENGTH: usize = 150;

/// Average reading speed used for [`derive_read_time`].
pub const WORDS_PER_MINUTE: usize = 200;

/// Appended to excerpts cut at a word boundary.
pub const ELLIPSIS: &str = "...";

/// Resolve a metadata field from multiple sources.
///
/// Takes a list of optional values in priority order and returns the first
/// non-None, non-empty value:
///
/// ```text
/// slug:   resolve(&[frontmatter_slug, derived_from_title, derived_from_filename])
/// author: resolve(&[frontmatter_author, configured_default])
/// ```
pub fn resolve(sources: &[Option<&str>]) -> Option<String> {
    sources
        .iter()
        .filter_map(|opt| {
            opt.map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
        })
        .next()
}

/// Turn a title into a URL slug.
///
/// - Lowercases, then drops everything outside `[a-z0-9 -]`
/// - Replaces whitespace runs with a dash
/// - Collapses consecutive dashes into one
/// - Strips leading and trailing dashes
///
/// Returns an empty string when the title has no ASCII alphanumerics.
pub fn derive_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut prev_dash = false;
    for c in title.to_lowercase().chars() {
        let c = match c {
            'a'..='z' | '0'..='9' => c,
            ' ' | '-' => '-',
            _ => continue,
        };
        if c == '-' {
            if !prev_dash {
                slug.push('-');
            }
            prev_dash = true;
        } else {
            slug.push(c);
            prev_dash = false;
        }
    }
    slug.trim_matches('-').to_string()
}

/// Estimated reading time in whole minutes, never less than one.
pub fn derive_read_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Build a plain-text preview of at most `max_length` chars (plus [`ELLIPSIS`]).
pub fn derive_excerpt(content: &str, max_length: usize) -> String {
    let plain = to_plain_text(content);
    if plain.chars().count() <= max_length {
        return plain;
    }

    let truncated: String = plain.chars().take(max_length).collect();

    if let Some(pos) = truncated.rfind(". ") {
        let char_pos = truncated[..pos].chars().count();
        if char_pos * 2 > max_length {
            return truncated[..=pos].to_string();
        }
    }

    match truncated.rfind(' ') {
        Some(pos) => format!("{}{}", &truncated[..pos], ELLIPSIS),
        None => format!("{}{}", truncated, ELLIPSIS),
    }
}
