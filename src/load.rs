//! Post loading: documents → posts.
//!
//! Fetches every configured document, parses its frontmatter, fills missing
//! fields with derived values, and returns the posts newest first.
//!
//! ```text
//! posts.files ──fetch (parallel)──► raw text ──frontmatter──► PostMeta + body
//!                                                                  │
//!           sorted by date desc ◄── slug dedupe ◄── derive missing fields
//! ```
//!
//! ## Partial success
//!
//! A document that is missing or unreadable is skipped and reported through
//! [`LoadEvent::Skipped`]; the rest still load. If every document fails the
//! result is an empty collection, not an error. The only hard failure is a
//! broken configuration, surfaced by [`load_site`].
//!
//! ## Ordering
//!
//! Fetches run on rayon's pool but results are reassembled in configured
//! order, so events and tie-breaks are deterministic. The date sort is
//! stable: posts with equal dates keep fetch order, and posts with dates
//! that don't parse go last.
//!
//! ## Progress events
//!
//! Callers pass an optional `Sender<LoadEvent>`; the CLI drains it on a
//! printer thread (see [`crate::output::format_load_event`]). Passing `None`
//! keeps loading free of side effects.

use crate::config::{self, BlogConfig, ConfigError};
use crate::frontmatter::{self, PostMeta};
use crate::metadata::{derive_excerpt, derive_read_time, derive_slug, resolve};
use crate::source::{ContentSource, FsSource, document_stem};
use crate::types::{Post, UNTITLED};
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use rayon::prelude::*;
use std::cmp::Reverse;
use std::collections::HashSet;
use std::path::Path;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Slug used when neither the title nor the file name yields one.
const FALLBACK_SLUG: &str = "post";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

/// Knobs for turning documents into posts.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadOptions {
    pub default_author: String,
    pub excerpt_length: usize,
}

impl LoadOptions {
    pub fn from_config(config: &BlogConfig) -> Self {
        Self {
            default_author: config.site.author.clone(),
            excerpt_length: config.excerpt.length,
        }
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::from_config(&BlogConfig::default())
    }
}

/// Why a document was left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    NotFound,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDocument {
    pub id: String,
    pub reason: SkipReason,
}

/// Progress events emitted while loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadEvent {
    Loaded {
        id: String,
        title: String,
    },
    Skipped(SkippedDocument),
    /// A slug was already taken by a newer post and got a numeric suffix.
    SlugRenamed {
        title: String,
        from: String,
        to: String,
    },
    Finished {
        loaded: usize,
        skipped: usize,
    },
}

/// Outcome of a load: the posts (newest first) and what was skipped.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub posts: Vec<Post>,
    pub skipped: Vec<SkippedDocument>,
}

/// A loaded content root: its resolved config plus the load report.
#[derive(Debug, Clone)]
pub struct LoadedSite {
    pub config: BlogConfig,
    pub report: LoadReport,
}

/// Load config and posts from the content root `root`.
pub fn load_site(root: &Path, events: Option<&Sender<LoadEvent>>) -> Result<LoadedSite, LoadError> {
    let config = config::load_config(root)?;
    let source = FsSource::new(root);
    let options = LoadOptions::from_config(&config);
    let report = load_posts(&source, &config.posts.files, &options, events);
    Ok(LoadedSite { config, report })
}

/// Consistency of a content root against its configured file list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckReport {
    pub loaded: usize,
    pub skipped: Vec<SkippedDocument>,
    /// Markdown files under `posts/` that `posts.files` doesn't list.
    pub unlisted: Vec<String>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.skipped.is_empty() && self.unlisted.is_empty()
    }
}

/// Compare what loaded from `root` with what is on disk.
pub fn check_site(root: &Path, site: &LoadedSite) -> CheckReport {
    let listed: HashSet<&str> = site.config.posts.files.iter().map(String::as_str).collect();
    let unlisted = FsSource::new(root)
        .discover()
        .into_iter()
        .filter(|id| !listed.contains(id.as_str()))
        .collect();
    CheckReport {
        loaded: site.report.posts.len(),
        skipped: site.report.skipped.clone(),
        unlisted,
    }
}

/// Fetch and assemble every document in `ids`.
pub fn load_posts(
    source: &impl ContentSource,
    ids: &[String],
    options: &LoadOptions,
    events: Option<&Sender<LoadEvent>>,
) -> LoadReport {
    let fetched: Vec<_> = ids.par_iter().map(|id| source.get(id)).collect();
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut report = LoadReport::default();
    for (id, result) in ids.iter().zip(fetched) {
        let reason = match result {
            Ok(Some(raw)) => {
                let post = build_post(id, &raw, options, &now);
                emit(
                    events,
                    LoadEvent::Loaded {
                        id: id.clone(),
                        title: post.title.clone(),
                    },
                );
                report.posts.push(post);
                continue;
            }
            Ok(None) => SkipReason::NotFound,
            Err(e) => SkipReason::Failed(e.to_string()),
        };
        let skipped = SkippedDocument {
            id: id.clone(),
            reason,
        };
        emit(events, LoadEvent::Skipped(skipped.clone()));
        report.skipped.push(skipped);
    }

    sort_newest_first(&mut report.posts);
    dedupe_slugs(&mut report.posts, events);

    emit(
        events,
        LoadEvent::Finished {
            loaded: report.posts.len(),
            skipped: report.skipped.len(),
        },
    );
    report
}

/// Assemble one post from a raw document.
///
/// `now` is the date given to posts without one.
pub fn build_post(id: &str, raw: &str, options: &LoadOptions, now: &str) -> Post {
    let doc = frontmatter::parse(raw);
    let meta = PostMeta::from_map(&doc.metadata);
    let body = doc.body;

    let title = resolve(&[meta.title.as_deref()]).unwrap_or_else(|| UNTITLED.to_string());
    let slug = resolve(&[
        meta.slug.as_deref().map(derive_slug).as_deref(),
        Some(derive_slug(&title).as_str()),
        Some(derive_slug(document_stem(id)).as_str()),
    ])
    .unwrap_or_else(|| FALLBACK_SLUG.to_string());
    let excerpt = resolve(&[meta.excerpt.as_deref()])
        .unwrap_or_else(|| derive_excerpt(&body, options.excerpt_length));

    Post {
        date: resolve(&[meta.date.as_deref()]).unwrap_or_else(|| now.to_string()),
        author: resolve(&[meta.author.as_deref(), Some(options.default_author.as_str())])
            .unwrap_or_default(),
        tags: meta.tags,
        read_time: derive_read_time(&body),
        title,
        slug,
        excerpt,
        content: body,
    }
}

/// Parse a frontmatter date into a sortable timestamp (millis, UTC).
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DDTHH:MM:SS` (read as UTC), and
/// plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_date(date: &str) -> Option<i64> {
    let date = date.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// Long-form date for display ("January 15, 2024"), in UTC.
/// Unparseable dates are shown as written.
pub fn display_date(date: &str) -> String {
    parse_date(date)
        .and_then(DateTime::from_timestamp_millis)
        .map(|dt| dt.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| date.to_string())
}

/// Stable sort by date, newest first; unparseable dates last.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by_cached_key(|p| match parse_date(&p.date) {
        Some(ts) => (false, Reverse(ts)),
        None => (true, Reverse(0)),
    });
}

/// Give every post a unique slug; later posts get `-2`, `-3`, ... suffixes.
fn dedupe_slugs(posts: &mut [Post], events: Option<&Sender<LoadEvent>>) {
    let mut taken: HashSet<String> = HashSet::with_capacity(posts.len());
    for post in posts.iter_mut() {
        if !taken.contains(&post.slug) {
            taken.insert(post.slug.clone());
            continue;
        }
        let renamed = (2..)
            .map(|n| format!("{}-{n}", post.slug))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or_default();
        emit(
            events,
            LoadEvent::SlugRenamed {
                title: post.title.clone(),
                from: post.slug.clone(),
                to: renamed.clone(),
            },
        );
        taken.insert(renamed.clone());
        post.slug = renamed;
    }
}

fn emit(events: Option<&Sender<LoadEvent>>, event: LoadEvent) {
    if let Some(tx) = events {
        // A dropped receiver just means nobody is listening.
        tx.send(event).ok();
    }
}
