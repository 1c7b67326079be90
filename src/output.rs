//! CLI output formatting.
//!
//! # Display Contract
//!
//! Posts are shown by title first, with positional index; slug, date and
//! tags follow as indented context lines. This keeps `list`, `build` and
//! `check` output readable as a content inventory.
//!
//! ## List
//!
//! ```text
//! Latest Posts (3 posts)
//! 001 The Future of JavaScript
//!     By 3Dayg • March 1, 2024 • 2 min read
//!     Tags: JavaScript, ES2024
//!     Path: /post/the-future-of-javascript
//! ...
//! Showing 2 of 3 (use --pages to see more)
//! ```
//!
//! ## Build
//!
//! ```text
//! Home → index.html
//! 001 The Future of JavaScript → post/the-future-of-javascript/index.html
//!
//! Tags
//! 001 JavaScript → tags/javascript/index.html
//!
//! Generated 3 posts, 5 tag pages
//! ```
//!
//! # Architecture
//!
//! Every `format_*` function returns `Vec<String>` and does no I/O; the
//! `print_*` wrappers write to stdout.

use crate::generate::{PageKind, SiteReport};
use crate::load::{CheckReport, LoadEvent, SkipReason, display_date};
use crate::pagination::Feed;
use crate::routes::post_path;
use crate::types::Post;
use std::collections::BTreeMap;

// ============================================================================
// Shared display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// "By 3Dayg • January 5, 2024 • 1 min read"
fn meta_line(post: &Post) -> String {
    format!(
        "By {} \u{2022} {} \u{2022} {} min read",
        post.author,
        display_date(&post.date),
        post.read_time
    )
}

fn print_lines(lines: Vec<String>) {
    for line in lines {
        println!("{}", line);
    }
}

// ============================================================================
// Loading
// ============================================================================

/// Format a single load progress event.
pub fn format_load_event(event: &LoadEvent) -> Vec<String> {
    match event {
        LoadEvent::Loaded { id, title } => vec![
            format!("Loaded {}", title),
            format!("{}Source: {}", indent(1), id),
        ],
        LoadEvent::Skipped(skipped) => {
            let why = match &skipped.reason {
                SkipReason::NotFound => "not found".to_string(),
                SkipReason::Failed(msg) => msg.clone(),
            };
            vec![format!("Skipped {}: {}", skipped.id, why)]
        }
        LoadEvent::SlugRenamed { title, from, to } => vec![format!(
            "Renamed slug for {}: {} \u{2192} {}",
            title, from, to
        )],
        LoadEvent::Finished { loaded, skipped } => {
            let mut line = format!("Loaded {}", plural(*loaded, "post"));
            if *skipped > 0 {
                line.push_str(&format!(" ({} skipped)", skipped));
            }
            vec![line]
        }
    }
}

// ============================================================================
// Queries
// ============================================================================

/// Format the revealed part of a feed with its results header.
pub fn format_post_list(feed: &Feed) -> Vec<String> {
    let summary = feed.summary();
    let mut lines = vec![format!(
        "{} ({})",
        summary.heading(),
        summary.count_label()
    )];

    if summary.matched == 0 {
        if summary.filtered {
            lines.push("No posts found matching your criteria.".to_string());
        } else {
            lines.push("No posts yet".to_string());
        }
        return lines;
    }

    for (i, post) in feed.visible().iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), post.title));
        lines.push(format!("{}{}", indent(1), meta_line(post)));
        if !post.tags.is_empty() {
            lines.push(format!("{}Tags: {}", indent(1), post.tags.join(", ")));
        }
        lines.push(format!("{}Path: {}", indent(1), post_path(&post.slug)));
    }

    if feed.has_more() {
        lines.push(format!(
            "Showing {} of {} (use --pages to see more)",
            summary.shown, summary.matched
        ));
    }
    lines
}

pub fn print_post_list(feed: &Feed) {
    print_lines(format_post_list(feed));
}

/// Format one post: header, meta, tags, then the markdown body as written.
pub fn format_post(post: &Post) -> Vec<String> {
    let mut lines = vec![post.title.clone(), meta_line(post)];
    if !post.tags.is_empty() {
        lines.push(format!("Tags: {}", post.tags.join(", ")));
    }
    lines.push(String::new());
    lines.extend(post.content.lines().map(str::to_string));
    lines
}

pub fn print_post(post: &Post) {
    print_lines(format_post(post));
}

pub fn format_not_found(slug: &str) -> Vec<String> {
    vec![
        "Post Not Found".to_string(),
        format!(
            "{}No post with slug \"{}\". The post you're looking for doesn't exist.",
            indent(1),
            slug
        ),
    ]
}

pub fn print_not_found(slug: &str) {
    print_lines(format_not_found(slug));
}

/// Format every tag with how many posts carry it, sorted by tag.
pub fn format_tags(posts: &[Post]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for tag in posts.iter().flat_map(|p| &p.tags) {
        *counts.entry(tag.as_str()).or_default() += 1;
    }
    if counts.is_empty() {
        return vec!["No tags".to_string()];
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, (tag, n))| format!("{} {} ({})", format_index(i + 1), tag, plural(n, "post")))
        .collect()
}

pub fn print_tags(posts: &[Post]) {
    print_lines(format_tags(posts));
}

// ============================================================================
// Build and check
// ============================================================================

/// Format the pages written by a build.
pub fn format_build_output(report: &SiteReport) -> Vec<String> {
    let mut lines = Vec::new();
    let arrow = |title: &str, path: &str| format!("{} \u{2192} {}", title, path);

    for page in report.pages.iter().filter(|p| p.kind == PageKind::Index) {
        lines.push(arrow(&page.title, &page.path));
    }
    for (i, page) in report
        .pages
        .iter()
        .filter(|p| p.kind == PageKind::Post)
        .enumerate()
    {
        lines.push(arrow(
            &format!("{} {}", format_index(i + 1), page.title),
            &page.path,
        ));
    }

    let tags: Vec<_> = report
        .pages
        .iter()
        .filter(|p| p.kind == PageKind::Tag)
        .collect();
    if !tags.is_empty() {
        lines.push(String::new());
        lines.push("Tags".to_string());
        for (i, page) in tags.iter().enumerate() {
            lines.push(format!(
                "{}{}",
                indent(1),
                arrow(&format!("{} {}", format_index(i + 1), page.title), &page.path)
            ));
        }
    }

    lines.push(String::new());
    for page in report
        .pages
        .iter()
        .filter(|p| matches!(p.kind, PageKind::NotFound | PageKind::Data))
    {
        lines.push(arrow(&page.title, &page.path));
    }

    lines.push(format!(
        "Generated {}, {}",
        plural(report.count(PageKind::Post), "post"),
        plural(report.count(PageKind::Tag), "tag page")
    ));
    lines
}

pub fn print_build_output(report: &SiteReport) {
    print_lines(format_build_output(report));
}

/// Format a content check.
pub fn format_check(report: &CheckReport) -> Vec<String> {
    let mut lines = vec![format!("Loaded {}", plural(report.loaded, "post"))];

    if !report.skipped.is_empty() {
        lines.push("Skipped".to_string());
        for skipped in &report.skipped {
            let why = match &skipped.reason {
                SkipReason::NotFound => "listed in config.toml but not found",
                SkipReason::Failed(msg) => msg.as_str(),
            };
            lines.push(format!("{}{}: {}", indent(1), skipped.id, why));
        }
    }

    if !report.unlisted.is_empty() {
        lines.push("Not in posts.files".to_string());
        for id in &report.unlisted {
            lines.push(format!("{}{}", indent(1), id));
        }
    }

    if report.is_clean() {
        lines.push("Content OK".to_string());
    }
    lines
}

pub fn print_check(report: &CheckReport) {
    print_lines(format_check(report));
}

// ============================================================================
// Tests
// ============================================================================
