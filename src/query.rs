//! Search and tag filtering over the post list.
//!
//! Filtering is a linear scan; the collection is small enough that indexing
//! would cost more than it saves. Results keep the input order.
//!
//! - **Search** is a case-insensitive substring match against the title, the
//!   excerpt, and each tag. An empty term matches everything.
//! - **Tags** are conjunctive: a post must carry *every* selected tag
//!   (exact match). No selection matches everything.

use crate::types::Post;
use std::collections::BTreeSet;

/// Posts matching both `search_term` and every tag in `selected_tags`.
pub fn filter_posts<'a>(
    posts: &'a [Post],
    search_term: &str,
    selected_tags: &BTreeSet<String>,
) -> Vec<&'a Post> {
    let term = search_term.to_lowercase();
    posts
        .iter()
        .filter(|post| matches_search(post, &term) && matches_tags(post, selected_tags))
        .collect()
}

/// `term` must already be lowercase.
fn matches_search(post: &Post, term: &str) -> bool {
    term.is_empty()
        || post.title.to_lowercase().contains(term)
        || post.excerpt.to_lowercase().contains(term)
        || post.tags.iter().any(|t| t.to_lowercase().contains(term))
}

fn matches_tags(post: &Post, selected: &BTreeSet<String>) -> bool {
    selected.iter().all(|tag| post.has_tag(tag))
}

/// Every distinct tag across `posts`, sorted.
pub fn all_tags(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|p| p.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The user's current search term and tag selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryState {
    search_term: String,
    selected_tags: BTreeSet<String>,
}

impl QueryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn selected_tags(&self) -> &BTreeSet<String> {
        &self.selected_tags
    }

    /// Set the search term (surrounding whitespace ignored).
    /// Returns whether the query changed.
    pub fn set_search(&mut self, term: &str) -> bool {
        let term = term.trim();
        if self.search_term == term {
            return false;
        }
        self.search_term = term.to_string();
        true
    }

    /// Select `tag` if unselected, deselect it otherwise.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.selected_tags.remove(tag) {
            self.selected_tags.insert(tag.to_string());
        }
    }

    /// Select `tag`; selecting it again is a no-op.
    /// Returns whether the query changed.
    pub fn select_tag(&mut self, tag: &str) -> bool {
        self.selected_tags.insert(tag.to_string())
    }

    /// Returns whether any tag was selected.
    pub fn clear_tags(&mut self) -> bool {
        let had_tags = !self.selected_tags.is_empty();
        self.selected_tags.clear();
        had_tags
    }

    /// Reset search and tags. Returns whether the query changed.
    pub fn clear(&mut self) -> bool {
        let changed = self.is_filtered();
        self.search_term.clear();
        self.selected_tags.clear();
        changed
    }

    /// Whether any filter is active ("Search Results" vs "Latest Posts").
    pub fn is_filtered(&self) -> bool {
        !self.search_term.is_empty() || !self.selected_tags.is_empty()
    }

    pub fn apply<'a>(&self, posts: &'a [Post]) -> Vec<&'a Post> {
        filter_posts(posts, &self.search_term, &self.selected_tags)
    }

    /// Whether a single post passes the current query.
    pub fn matches(&self, post: &Post) -> bool {
        matches_search(post, &self.search_term.to_lowercase())
            && matches_tags(post, &self.selected_tags)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::{LoadOptions, build_post};

    fn post(title: &str, tags: &[&str], body: &str) -> Post {
        let raw = format!(
            "---\ntitle: {title}\ndate: 2024-01-01\ntags: [{}]\n---\n{body}",
            tags.join(", ")
        );
        build_post("x.md", &raw, &LoadOptions::default(), "2024-01-01")
    }

    fn sample() -> Vec<Post> {
        vec![
            post(
                "Getting Started with React",
                &["React", "JavaScript"],
                "React is a library.",
            ),
            post("CSS Modules", &["CSS", "Frontend"], "Scoped styles."),
            post(
                "The Future of JavaScript",
                &["JavaScript", "ES2024"],
                "Pattern matching is coming.",
            ),
        ]
    }

    fn tags(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn titles<'a>(posts: &[&'a Post]) -> Vec<&'a str> {
        posts.iter().map(|p| p.title.as_str()).collect()
    }

    #[test]
    fn empty_query_returns_everything_in_order() {
        let posts = sample();
        let result = filter_posts(&posts, "", &BTreeSet::new());
        let expected: Vec<&Post> = posts.iter().collect();
        assert_eq!(result, expected);
    }

    #[test]
    fn search_is_case_insensitive_on_title() {
        let posts = vec![
            post("Getting Started with React", &[], "x"),
            post("CSS Modules", &[], "y"),
        ];
        let result = filter_posts(&posts, "react", &BTreeSet::new());
        assert_eq!(titles(&result), vec!["Getting Started with React"]);
    }

    #[test]
    fn search_matches_excerpt_and_tags() {
        let posts = sample();
        assert_eq!(
            titles(&filter_posts(&posts, "SCOPED", &BTreeSet::new())),
            vec!["CSS Modules"]
        );
        assert_eq!(
            titles(&filter_posts(&posts, "es20", &BTreeSet::new())),
            vec!["The Future of JavaScript"]
        );
    }

    #[test]
    fn search_ignores_body_beyond_excerpt() {
        let long_tail = format!("{} needle", "word ".repeat(100));
        let posts = vec![post("Plain", &[], &long_tail)];
        assert!(filter_posts(&posts, "needle", &BTreeSet::new()).is_empty());
    }

    #[test]
    fn tag_filter_is_conjunctive() {
        let posts = vec![post("Only A", &["A"], "x"), post("A and B", &["A", "B"], "y")];
        let result = filter_posts(&posts, "", &tags(&["A", "B"]));
        assert_eq!(titles(&result), vec!["A and B"]);
    }

    #[test]
    fn tag_filter_is_exact() {
        let posts = sample();
        assert!(filter_posts(&posts, "", &tags(&["react"])).is_empty());
    }

    #[test]
    fn search_and_tags_combine() {
        let posts = sample();
        let result = filter_posts(&posts, "future", &tags(&["JavaScript"]));
        assert_eq!(titles(&result), vec!["The Future of JavaScript"]);
        assert!(filter_posts(&posts, "css", &tags(&["JavaScript"])).is_empty());
    }

    #[test]
    fn all_tags_sorted_and_unique() {
        assert_eq!(
            all_tags(&sample()),
            vec!["CSS", "ES2024", "Frontend", "JavaScript", "React"]
        );
        assert!(all_tags(&[]).is_empty());
    }

    // =========================================================================
    // QueryState
    // =========================================================================

    #[test]
    fn set_search_trims_and_reports_change() {
        let mut q = QueryState::new();
        assert!(q.set_search("  react "));
        assert_eq!(q.search_term(), "react");
        assert!(!q.set_search("react"));
        assert!(q.is_filtered());
    }

    #[test]
    fn toggle_tag_adds_then_removes() {
        let mut q = QueryState::new();
        q.toggle_tag("CSS");
        q.toggle_tag("React");
        assert_eq!(q.selected_tags(), &tags(&["CSS", "React"]));
        q.toggle_tag("CSS");
        assert_eq!(q.selected_tags(), &tags(&["React"]));
    }

    #[test]
    fn select_tag_twice_stays_selected() {
        let mut q = QueryState::new();
        assert!(q.select_tag("React"));
        assert!(!q.select_tag("React"));
        assert_eq!(q.selected_tags(), &tags(&["React"]));
        assert!(q.is_filtered());
    }

    #[test]
    fn clear_resets_everything() {
        let mut q = QueryState::new();
        assert!(!q.clear());
        q.set_search("x");
        q.toggle_tag("A");
        assert!(q.clear());
        assert!(!q.is_filtered());
        assert!(!q.clear_tags());
    }

    #[test]
    fn matches_agrees_with_apply() {
        let posts = sample();
        let mut q = QueryState::new();
        q.set_search("JAVA");
        let matched: Vec<&str> = posts
            .iter()
            .filter(|p| q.matches(p))
            .map(|p| p.title.as_str())
            .collect();
        assert_eq!(matched, titles(&q.apply(&posts)));
    }

    #[test]
    fn apply_uses_current_state() {
        let posts = sample();
        let mut q = QueryState::new();
        q.toggle_tag("JavaScript");
        assert_eq!(
            titles(&q.apply(&posts)),
            vec!["Getting Started with React", "The Future of JavaScript"]
        );
    }
}
