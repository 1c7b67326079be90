//! Incremental reveal of the filtered post list ("infinite scroll").
//!
//! The list shows a window of `page_size` posts. Scrolling near the bottom
//! asks for more; after a short simulated fetch the window grows by another
//! `page_size`, capped at the number of matching posts.
//!
//! ```text
//!            on_scroll (near bottom)           complete(ticket)
//! window=5 ───────────────────────► in flight ─────────────────► window=10
//!     ▲                                 │
//!     └──────── reset() on query change ┘  (ticket now stale, ignored)
//! ```
//!
//! ## Stale loads
//!
//! A "load more" is not cancellable once issued. Each request carries a
//! [`LoadTicket`] stamped with the controller's generation; [`reset`] bumps
//! the generation, so a ticket issued before a query change completes as a
//! no-op instead of growing the freshly reset window. The last state change
//! wins.
//!
//! [`reset`]: PaginationController::reset

use crate::config::PaginationConfig;
use crate::query::QueryState;
use crate::types::Post;
use std::sync::Arc;
use std::time::Duration;

/// Where the viewport sits over the rendered list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollPosition {
    /// Distance scrolled from the top.
    pub offset: u32,
    /// Height of the visible area.
    pub viewport: u32,
    /// Full height of the rendered list.
    pub content: u32,
}

impl ScrollPosition {
    pub fn distance_to_bottom(&self) -> u32 {
        self.content
            .saturating_sub(self.offset.saturating_add(self.viewport))
    }
}

/// A pending "load more" request. Consumed by [`PaginationController::complete`].
#[derive(Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
    delay: Duration,
}

impl LoadTicket {
    /// How long the simulated fetch takes before [`PaginationController::complete`].
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[derive(Debug, Clone)]
pub struct PaginationController {
    page_size: usize,
    trigger_distance: u32,
    delay: Duration,
    window: usize,
    generation: u64,
    in_flight: Option<u64>,
}

impl PaginationController {
    pub fn new(config: &PaginationConfig) -> Self {
        let page_size = config.page_size.max(1);
        Self {
            page_size,
            trigger_distance: config.trigger_distance,
            delay: config.load_delay(),
            window: page_size,
            generation: 0,
            in_flight: None,
        }
    }

    /// Current window size (may exceed the number of matching posts).
    pub fn window(&self) -> usize {
        self.window
    }

    /// How many of `total` matching posts are shown.
    pub fn visible(&self, total: usize) -> usize {
        self.window.min(total)
    }

    pub fn has_more(&self, total: usize) -> bool {
        self.visible(total) < total
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    /// React to a scroll: request more if the viewport is near the bottom.
    pub fn on_scroll(&mut self, position: ScrollPosition, total: usize) -> Option<LoadTicket> {
        if position.distance_to_bottom() > self.trigger_distance {
            return None;
        }
        self.request_more(total)
    }

    /// Request another page, unless one is in flight or nothing is left.
    pub fn request_more(&mut self, total: usize) -> Option<LoadTicket> {
        if self.in_flight.is_some() || !self.has_more(total) {
            return None;
        }
        self.in_flight = Some(self.generation);
        Some(LoadTicket {
            generation: self.generation,
            delay: self.delay,
        })
    }

    /// Finish a load. Returns `false` (and changes nothing) unless `ticket` is
    /// the load currently in flight.
    pub fn complete(&mut self, ticket: LoadTicket, total: usize) -> bool {
        if ticket.generation != self.generation || self.in_flight != Some(ticket.generation) {
            return false;
        }
        self.in_flight = None;
        self.window = (self.window + self.page_size).min(total).max(self.window);
        true
    }

    /// Back to the first page; outstanding tickets become stale.
    pub fn reset(&mut self) {
        self.window = self.page_size;
        self.generation += 1;
        self.in_flight = None;
    }
}

/// Counts for the results header ("3 posts found").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedSummary {
    pub total: usize,
    pub matched: usize,
    pub shown: usize,
    pub filtered: bool,
}

impl FeedSummary {
    pub fn heading(&self) -> &'static str {
        if self.filtered {
            "Search Results"
        } else {
            "Latest Posts"
        }
    }

    /// "1 post", "3 posts", "0 posts found".
    pub fn count_label(&self) -> String {
        let plural = if self.matched == 1 { "" } else { "s" };
        let found = if self.filtered { " found" } else { "" };
        format!("{} post{plural}{found}", self.matched)
    }
}

/// The list view model: a posts snapshot, the query, and the pager.
///
/// Every query change re-filters and resets pagination.
#[derive(Debug, Clone)]
pub struct Feed {
    posts: Arc<[Post]>,
    query: QueryState,
    pager: PaginationController,
    matched: Vec<usize>,
}

impl Feed {
    pub fn new(posts: Arc<[Post]>, config: &PaginationConfig) -> Self {
        let mut feed = Self {
            matched: Vec::with_capacity(posts.len()),
            posts,
            query: QueryState::new(),
            pager: PaginationController::new(config),
        };
        feed.refilter();
        feed
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    pub fn pager(&self) -> &PaginationController {
        &self.pager
    }

    pub fn set_search(&mut self, term: &str) {
        if self.query.set_search(term) {
            self.query_changed();
        }
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        self.query.toggle_tag(tag);
        self.query_changed();
    }

    pub fn select_tag(&mut self, tag: &str) {
        if self.query.select_tag(tag) {
            self.query_changed();
        }
    }

    pub fn clear_tags(&mut self) {
        if self.query.clear_tags() {
            self.query_changed();
        }
    }

    pub fn clear_filters(&mut self) {
        if self.query.clear() {
            self.query_changed();
        }
    }

    /// All posts matching the query, in collection order.
    pub fn matched(&self) -> Vec<&Post> {
        self.matched.iter().map(|&i| &self.posts[i]).collect()
    }

    /// The revealed part of [`matched`](Self::matched).
    pub fn visible(&self) -> Vec<&Post> {
        let shown = self.pager.visible(self.matched.len());
        self.matched[..shown].iter().map(|&i| &self.posts[i]).collect()
    }

    pub fn has_more(&self) -> bool {
        self.pager.has_more(self.matched.len())
    }

    pub fn on_scroll(&mut self, position: ScrollPosition) -> Option<LoadTicket> {
        self.pager.on_scroll(position, self.matched.len())
    }

    pub fn request_more(&mut self) -> Option<LoadTicket> {
        self.pager.request_more(self.matched.len())
    }

    pub fn complete(&mut self, ticket: LoadTicket) -> bool {
        self.pager.complete(ticket, self.matched.len())
    }

    pub fn summary(&self) -> FeedSummary {
        FeedSummary {
            total: self.posts.len(),
            matched: self.matched.len(),
            shown: self.pager.visible(self.matched.len()),
            filtered: self.query.is_filtered(),
        }
    }

    fn query_changed(&mut self) {
        self.refilter();
        self.pager.reset();
    }

    fn refilter(&mut self) {
        self.matched = self
            .posts
            .iter()
            .enumerate()
            .filter(|(_, post)| self.query.matches(post))
            .map(|(i, _)| i)
            .collect();
    }
}
