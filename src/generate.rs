//! Static HTML site generation.
//!
//! Renders the loaded posts into a self-contained site that mirrors the two
//! routed views (list and single post), plus a page per tag and a JSON index
//! for client-side search.
//!
//! ## Output Structure
//!
//! ```text
//! dist/
//! ├── index.html                 # Latest posts, tag facet
//! ├── 404.html                   # "Post Not Found"
//! ├── posts.json                 # Post summaries (no body)
//! ├── post/
//! │   └── getting-started-with-react/
//! │       └── index.html
//! └── tags/
//!     └── react/
//!         └── index.html
//! ```
//!
//! The index lists every post; cards past the first page carry
//! `data-deferred` so a script can reveal them incrementally.
//!
//! ## HTML Generation
//!
//! Uses [maud](https://maud.lambda.xyz/) for compile-time HTML templating and
//! pulldown-cmark (with tables, strikethrough, task lists and footnotes) for
//! post bodies. Stylesheet is embedded from `static/style.css`.

use crate::config::{BlogConfig, SiteConfig};
use crate::load::display_date;
use crate::metadata::derive_slug;
use crate::pagination::Feed;
use crate::query::all_tags;
use crate::routes::post_path;
use crate::types::Post;
use chrono::{Datelike, Utc};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use pulldown_cmark::{Options, Parser, html as md_html};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

const CSS: &str = include_str!("../static/style.css");

/// Tags shown before the "more tags" disclosure.
const VISIBLE_TAGS: usize = 8;
/// Slug for a tag whose name has no slug-safe characters.
const FALLBACK_TAG_SLUG: &str = "tag";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Index,
    Post,
    Tag,
    NotFound,
    Data,
}

/// One file written by [`generate`], relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPage {
    pub kind: PageKind,
    pub title: String,
    pub path: String,
}

#[derive(Debug, Clone, Default)]
pub struct SiteReport {
    pub pages: Vec<GeneratedPage>,
}

impl SiteReport {
    pub fn count(&self, kind: PageKind) -> usize {
        self.pages.iter().filter(|p| p.kind == kind).count()
    }

    fn push(&mut self, kind: PageKind, title: &str, path: String) {
        self.pages.push(GeneratedPage {
            kind,
            title: title.to_string(),
            path,
        });
    }
}

/// A tag and its unique URL slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLink {
    pub name: String,
    pub slug: String,
}

/// Every tag across `posts` (sorted) with a unique slug.
///
/// Tags that slugify identically ("CSS", "css") get `-2`, `-3` suffixes in
/// sort order.
pub fn tag_links(posts: &[Post]) -> Vec<TagLink> {
    let mut taken = HashSet::new();
    all_tags(posts)
        .into_iter()
        .map(|name| {
            let base = Some(derive_slug(&name))
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| FALLBACK_TAG_SLUG.to_string());
            let slug = if taken.contains(&base) {
                (2..)
                    .map(|n| format!("{base}-{n}"))
                    .find(|candidate| !taken.contains(candidate))
                    .unwrap_or_default()
            } else {
                base
            };
            taken.insert(slug.clone());
            TagLink { name, slug }
        })
        .collect()
}

/// Write the full site for `posts` (expected newest first) into `output_dir`.
pub fn generate(
    posts: &[Post],
    config: &BlogConfig,
    output_dir: &Path,
) -> Result<SiteReport, GenerateError> {
    let mut report = SiteReport::default();
    let snapshot: Arc<[Post]> = Arc::from(posts);
    let tags = tag_links(posts);
    let tag_slugs = slug_map(&tags);
    let page_size = config.pagination.page_size.max(1);

    fs::create_dir_all(output_dir)?;

    let feed = Feed::new(Arc::clone(&snapshot), &config.pagination);
    let index = render_index(&feed, page_size, &tags, &config.site);
    fs::write(output_dir.join("index.html"), index.into_string())?;
    report.push(PageKind::Index, "Home", "index.html".to_string());

    for post in posts {
        let dir = output_dir.join("post").join(&post.slug);
        fs::create_dir_all(&dir)?;
        let page = render_post_page(post, &tag_slugs, &config.site);
        fs::write(dir.join("index.html"), page.into_string())?;
        report.push(
            PageKind::Post,
            &post.title,
            format!("post/{}/index.html", post.slug),
        );
    }

    for tag in &tags {
        let mut feed = Feed::new(Arc::clone(&snapshot), &config.pagination);
        feed.toggle_tag(&tag.name);
        let dir = output_dir.join("tags").join(&tag.slug);
        fs::create_dir_all(&dir)?;
        let page = render_tag_page(tag, &feed, page_size, &tags, &config.site);
        fs::write(dir.join("index.html"), page.into_string())?;
        report.push(
            PageKind::Tag,
            &tag.name,
            format!("tags/{}/index.html", tag.slug),
        );
    }

    fs::write(
        output_dir.join("404.html"),
        render_not_found(&config.site).into_string(),
    )?;
    report.push(PageKind::NotFound, "Post Not Found", "404.html".to_string());

    let summaries: Vec<Post> = posts.iter().map(Post::summary).collect();
    fs::write(
        output_dir.join("posts.json"),
        serde_json::to_string_pretty(&summaries)?,
    )?;
    report.push(PageKind::Data, "Search index", "posts.json".to_string());

    Ok(report)
}

/// Markdown body to HTML (GitHub-flavored extensions on).
pub fn render_markdown(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_FOOTNOTES;
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    md_html::push_html(&mut out, Parser::new_ext(markdown, options));
    out
}

fn tag_path(slug: &str) -> String {
    format!("/tags/{slug}/")
}

// ============================================================================
// HTML Components
// ============================================================================

fn base_document(title: &str, site: &SiteConfig, content: Markup) -> Markup {
    let page_title = if title == site.title {
        site.title.clone()
    } else {
        format!("{title} | {}", site.title)
    };
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                meta name="description" content=(site.description);
                title { (page_title) }
                style { (PreEscaped(CSS)) }
            }
            body {
                (navbar(site))
                (content)
                (footer(site))
            }
        }
    }
}

fn navbar(site: &SiteConfig) -> Markup {
    html! {
        nav.navbar {
            div.container {
                a.logo href="/" { (site.title) }
                a.nav-link href="/" { "Home" }
            }
        }
    }
}

fn footer(site: &SiteConfig) -> Markup {
    let year = Utc::now().year();
    html! {
        footer.site-footer {
            div.container {
                h3 { (site.title) }
                p { (site.description) }
                p { "© " (year) " " (site.title) ". All rights reserved." }
            }
        }
    }
}

/// "By author • January 5, 2024 • 3 min read"
fn meta_line(post: &Post) -> Markup {
    html! {
        div.meta {
            span.author { "By " (post.author) }
            span.separator { "•" }
            time datetime=(post.date) { (display_date(&post.date)) }
            span.separator { "•" }
            span.read-time { (post.read_time) " min read" }
        }
    }
}

fn tag_list(tags: &[String], tag_slugs: &BTreeMap<&str, &str>) -> Markup {
    html! {
        @if !tags.is_empty() {
            div.tags {
                @for tag in tags {
                    @match tag_slugs.get(tag.as_str()) {
                        Some(slug) => {
                            a.tag href=(tag_path(slug)) { (tag) }
                        }
                        None => {
                            span.tag { (tag) }
                        }
                    }
                }
            }
        }
    }
}

fn post_card(
    post: &Post,
    page: usize,
    deferred: bool,
    tag_slugs: &BTreeMap<&str, &str>,
) -> Markup {
    let href = post_path(&post.slug);
    html! {
        article.post-card data-page=(page) data-deferred[deferred] {
            h2 { a href=(href) { (post.title) } }
            (meta_line(post))
            @if !post.excerpt.is_empty() {
                p.excerpt { (post.excerpt) }
            }
            (tag_list(&post.tags, tag_slugs))
            a.read-more href=(href) { "Read more →" }
        }
    }
}

fn tag_facet(tags: &[TagLink], selected: Option<&str>) -> Markup {
    let chip = |tag: &TagLink| {
        let is_selected = selected == Some(tag.name.as_str());
        html! {
            a.tag.selected[is_selected] href=(tag_path(&tag.slug)) aria-pressed=(if is_selected { "true" } else { "false" }) {
                (tag.name)
            }
        }
    };
    let (head, rest) = tags.split_at(tags.len().min(VISIBLE_TAGS));
    html! {
        @if !tags.is_empty() {
            section.tag-filter {
                h3 { "Filter by Tags" }
                div.tags {
                    @for tag in head { (chip(tag)) }
                }
                @if !rest.is_empty() {
                    details {
                        summary { "Show all " (tags.len()) " tags" }
                        div.tags {
                            @for tag in rest { (chip(tag)) }
                        }
                    }
                }
                @if selected.is_some() {
                    a.clear-tags href="/" { "Clear All" }
                }
            }
        }
    }
}

/// Results header plus the card grid for a feed.
fn results(feed: &Feed, page_size: usize, tag_slugs: &BTreeMap<&str, &str>) -> Markup {
    let summary = feed.summary();
    let matched = feed.matched();
    html! {
        section.results {
            div.results-header {
                h2 { (summary.heading()) }
                span.results-count { (summary.count_label()) }
            }
            @if matched.is_empty() {
                div.empty-state {
                    @if summary.filtered {
                        p { "No posts found matching your criteria." }
                        a.clear-filters href="/" { "Clear all filters" }
                    } @else {
                        h3 { "No posts yet" }
                        p { "Check back soon for new content!" }
                    }
                }
            } @else {
                div.posts-grid data-page-size=(page_size) {
                    @for (i, post) in matched.iter().enumerate() {
                        (post_card(post, i / page_size + 1, i >= summary.shown, tag_slugs))
                    }
                }
            }
        }
    }
}

fn slug_map(tags: &[TagLink]) -> BTreeMap<&str, &str> {
    tags.iter()
        .map(|t| (t.name.as_str(), t.slug.as_str()))
        .collect()
}

// ============================================================================
// Page Renderers
// ============================================================================

fn render_index(feed: &Feed, page_size: usize, tags: &[TagLink], site: &SiteConfig) -> Markup {
    let content = html! {
        main.container.home {
            section.hero {
                h1 { "Welcome to " (site.title) }
                p { (site.description) }
            }
            (tag_facet(tags, None))
            (results(feed, page_size, &slug_map(tags)))
        }
    };
    base_document(&site.title, site, content)
}

fn render_tag_page(
    tag: &TagLink,
    feed: &Feed,
    page_size: usize,
    tags: &[TagLink],
    site: &SiteConfig,
) -> Markup {
    let content = html! {
        main.container.home {
            section.hero {
                h1 { "Posts tagged " (tag.name) }
            }
            (tag_facet(tags, Some(tag.name.as_str())))
            (results(feed, page_size, &slug_map(tags)))
        }
    };
    base_document(&tag.name, site, content)
}

fn render_post_page(post: &Post, tag_slugs: &BTreeMap<&str, &str>, site: &SiteConfig) -> Markup {
    let content = html! {
        div.container.post-page {
            nav { a.back-link href="/" { "← Back to All Posts" } }
            main {
                article {
                    header.post-header {
                        h1 { (post.title) }
                        (meta_line(post))
                        (tag_list(&post.tags, tag_slugs))
                    }
                    div.post-content {
                        (PreEscaped(render_markdown(&post.content)))
                    }
                }
            }
            section.more-posts {
                h3 { "More Posts" }
                a href="/" { "View All Posts →" }
            }
        }
    };
    base_document(&post.title, site, content)
}

fn render_not_found(site: &SiteConfig) -> Markup {
    let content = html! {
        main.container.not-found {
            h1 { "Post Not Found" }
            p { "The post you're looking for doesn't exist." }
            a.back-link href="/" { "← Back to Home" }
        }
    };
    base_document("Post Not Found", site, content)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::{LoadOptions, build_post};
    use crate::config::PaginationConfig;
    use crate::test_helpers::{load_fixtures, setup_fixtures, titles};

    fn post(title: &str, date: &str, tags: &[&str], body: &str) -> Post {
        let raw = format!(
            "---\ntitle: {title}\ndate: {date}\ntags: [{}]\n---\n{body}",
            tags.join(", ")
        );
        build_post("x.md", &raw, &LoadOptions::default(), date)
    }

    fn sample() -> Vec<Post> {
        vec![
            post(
                "The Future of JavaScript",
                "2024-03-01",
                &["JavaScript", "ES2024"],
                "## Pattern matching\n\nIt is **coming**.",
            ),
            post("CSS Modules", "2024-02-01", &["CSS", "Frontend"], "Scoped styles."),
            post(
                "Getting Started with React",
                "2024-01-15",
                &["React", "JavaScript"],
                "React is a library.",
            ),
        ]
    }

    fn read(dir: &Path, rel: &str) -> String {
        fs::read_to_string(dir.join(rel)).unwrap()
    }

    // =========================================================================
    // Tag links
    // =========================================================================

    #[test]
    fn tag_links_sorted_with_unique_slugs() {
        let posts = vec![
            post("A", "2024-01-01", &["CSS", "css", "C++"], "x"),
            post("B", "2024-01-01", &["!!!"], "y"),
        ];
        let links: Vec<(String, String)> = tag_links(&posts)
            .into_iter()
            .map(|t| (t.name, t.slug))
            .collect();
        assert_eq!(
            links,
            vec![
                ("!!!".to_string(), "tag".to_string()),
                ("C++".to_string(), "c".to_string()),
                ("CSS".to_string(), "css".to_string()),
                ("css".to_string(), "css-2".to_string()),
            ]
        );
    }

    // =========================================================================
    // Components
    // =========================================================================

    #[test]
    fn markdown_renders_gfm() {
        let html = render_markdown("# Title\n\n| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>old</del>"));
    }

    #[test]
    fn base_document_includes_doctype_and_title() {
        let site = SiteConfig::default();
        let doc = base_document("Hello", &site, html! { p { "test" } }).into_string();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>Hello | 3Blog</title>"));
    }

    #[test]
    fn meta_line_shows_author_date_and_read_time() {
        let p = post("T", "2024-01-05", &[], "word");
        let html = meta_line(&p).into_string();
        assert!(html.contains("By 3Dayg"));
        assert!(html.contains("January 5, 2024"));
        assert!(html.contains("1 min read"));
    }

    #[test]
    fn post_card_marks_deferred() {
        let p = post("T", "2024-01-05", &[], "word");
        let slugs = BTreeMap::new();
        let shown = post_card(&p, 1, false, &slugs).into_string();
        let hidden = post_card(&p, 2, true, &slugs).into_string();
        assert!(!shown.contains("data-deferred"));
        assert!(hidden.contains("data-deferred"));
        assert!(hidden.contains(r#"data-page="2""#));
        assert!(shown.contains(r#"href="/post/t""#));
    }

    #[test]
    fn tag_facet_collapses_long_lists() {
        let tags: Vec<TagLink> = (0..10)
            .map(|i| TagLink {
                name: format!("t{i}"),
                slug: format!("t{i}"),
            })
            .collect();
        let html = tag_facet(&tags, Some("t9")).into_string();
        assert!(html.contains("<details>"));
        assert!(html.contains("Show all 10 tags"));
        assert!(html.contains("Clear All"));
        assert!(tag_facet(&[], None).into_string().is_empty());
    }

    // =========================================================================
    // Full site
    // =========================================================================

    #[test]
    fn generate_writes_every_page() {
        let tmp = tempfile::TempDir::new().unwrap();
        let report = generate(&sample(), &BlogConfig::default(), tmp.path()).unwrap();

        assert_eq!(report.count(PageKind::Index), 1);
        assert_eq!(report.count(PageKind::Post), 3);
        assert_eq!(report.count(PageKind::Tag), 5);
        assert_eq!(report.count(PageKind::NotFound), 1);
        for page in &report.pages {
            assert!(tmp.path().join(&page.path).exists(), "{}", page.path);
        }
    }

    #[test]
    fn index_lists_posts_newest_first() {
        let tmp = tempfile::TempDir::new().unwrap();
        generate(&sample(), &BlogConfig::default(), tmp.path()).unwrap();
        let index = read(tmp.path(), "index.html");

        assert!(index.contains("Welcome to 3Blog"));
        assert!(index.contains("Latest Posts"));
        assert!(index.contains("3 posts"));
        let future = index.find("The Future of JavaScript").unwrap();
        let react = index.find("Getting Started with React").unwrap();
        assert!(future < react);
    }

    #[test]
    fn index_defers_posts_past_first_page() {
        let tmp = tempfile::TempDir::new().unwrap();
        let mut config = BlogConfig::default();
        config.pagination = PaginationConfig {
            page_size: 2,
            ..PaginationConfig::default()
        };
        generate(&sample(), &config, tmp.path()).unwrap();
        let index = read(tmp.path(), "index.html");
        assert_eq!(index.matches("data-deferred").count(), 1);
        assert!(index.contains(r#"data-page-size="2""#));
    }

    #[test]
    fn post_page_renders_markdown_and_tag_links() {
        let tmp = tempfile::TempDir::new().unwrap();
        generate(&sample(), &BlogConfig::default(), tmp.path()).unwrap();
        let page = read(tmp.path(), "post/the-future-of-javascript/index.html");
        assert!(page.contains("<h2>Pattern matching</h2>"));
        assert!(page.contains("<strong>coming</strong>"));
        assert!(page.contains(r#"href="/tags/es2024/""#));
        assert!(page.contains("Back to All Posts"));
    }

    #[test]
    fn tag_page_shows_only_tagged_posts() {
        let tmp = tempfile::TempDir::new().unwrap();
        generate(&sample(), &BlogConfig::default(), tmp.path()).unwrap();
        let page = read(tmp.path(), "tags/javascript/index.html");
        assert!(page.contains("2 posts found"));
        assert!(page.contains("Getting Started with React"));
        assert!(!page.contains("CSS Modules"));
    }

    #[test]
    fn posts_json_has_summaries_without_body() {
        let tmp = tempfile::TempDir::new().unwrap();
        generate(&sample(), &BlogConfig::default(), tmp.path()).unwrap();
        let json = read(tmp.path(), "posts.json");
        let posts: Vec<Post> = serde_json::from_str(&json).unwrap();
        assert_eq!(posts.len(), 3);
        assert!(posts.iter().all(|p| p.content.is_empty()));
        assert_eq!(posts[0].slug, "the-future-of-javascript");
    }

    #[test]
    fn titles_are_escaped() {
        let tmp = tempfile::TempDir::new().unwrap();
        let posts = vec![post("<script>x</script>", "2024-01-01", &[], "body")];
        generate(&posts, &BlogConfig::default(), tmp.path()).unwrap();
        let index = read(tmp.path(), "index.html");
        assert!(!index.contains("<script>x"));
        assert!(index.contains("&lt;script&gt;"));
    }

    #[test]
    fn fixture_site_builds() {
        let content = setup_fixtures();
        let site = load_fixtures(&content);
        let out = tempfile::TempDir::new().unwrap();
        let report = generate(&site.report.posts, &site.config, out.path()).unwrap();

        assert_eq!(report.count(PageKind::Post), 3);
        let index = read(out.path(), "index.html");
        assert_eq!(index.matches("data-deferred").count(), 1);
        let page = read(out.path(), "post/future-of-javascript/index.html");
        assert!(page.contains("<h1>The Future of JavaScript</h1>"));
        assert!(page.contains(r#"<code class="language-javascript">"#));
        assert_eq!(
            titles(&site.report.posts)[0],
            "Getting Started with React"
        );
    }

    #[test]
    fn empty_collection_still_builds() {
        let tmp = tempfile::TempDir::new().unwrap();
        let report = generate(&[], &BlogConfig::default(), tmp.path()).unwrap();
        assert_eq!(report.count(PageKind::Post), 0);
        let index = read(tmp.path(), "index.html");
        assert!(index.contains("No posts yet"));
        assert_eq!(read(tmp.path(), "posts.json").trim(), "[]");
    }
}
