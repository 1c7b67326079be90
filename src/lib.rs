//! # Inkpost
//!
//! A small markdown blog engine. A fixed list of markdown documents becomes a
//! searchable, tag-filterable post collection with incremental pagination and
//! a per-post view addressed by slug. The same collection can be rendered to a
//! static HTML site.
//!
//! # Architecture: Load, Hold, Query, Present
//!
//! ```text
//! posts/*.md ──load──► Vec<Post> ──settle──► PostStore ──resolve(route)──► View
//!                      (newest first)        (Loading│Ready│Failed)          │
//!                                                              Feed ◄────────┘
//!                                                    (query + pagination window)
//! ```
//!
//! - **Load** ([`load`]) fetches every configured document in parallel,
//!   splits off frontmatter ([`frontmatter`]), fills gaps with derived values
//!   ([`metadata`]), sorts by date and makes slugs unique.
//! - **Hold** ([`store`]) keeps the collection behind a single settle
//!   transition. The store is an ordinary value built by the caller; there is
//!   no global instance.
//! - **Query** ([`query`], [`pagination`]) filters by search term and tags
//!   and reveals the matches one page at a time.
//! - **Present** ([`routes`], [`output`], [`generate`]) maps paths to views,
//!   prints CLI output, or writes HTML.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`plaintext`] | Strip markdown syntax to plain text |
//! | [`metadata`] | Slug, reading time, excerpt derivation; first-non-empty field resolution |
//! | [`frontmatter`] | Split a raw document into a metadata map and body |
//! | [`source`] | Where raw documents come from: filesystem or memory |
//! | [`load`] | Documents → sorted posts, with progress events |
//! | [`store`] | Load status plus the loaded collection |
//! | [`query`] | Search and tag filtering, tag facet |
//! | [`pagination`] | Infinite-scroll window and the list view model |
//! | [`routes`] | `/` and `/post/<slug>` routing |
//! | [`generate`] | Static HTML site and `posts.json` using Maud |
//! | [`config`] | `config.toml` loading, merging over defaults, validation |
//! | [`types`] | The `Post` record |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Partial Loads Are Not Failures
//!
//! A missing or unreadable document is skipped and reported; the others still
//! load. Only a broken `config.toml` fails the whole load. An empty collection
//! is a valid, ready state.
//!
//! ## Events Instead of a Logger
//!
//! Loading reports progress as typed [`load::LoadEvent`]s over an optional
//! channel. The library never prints; the CLI drains the channel on a printer
//! thread and formats each event with [`output::format_load_event`].
//!
//! ## Last Query Wins
//!
//! A "load more" cannot be cancelled once started. Pagination stamps each
//! request with a generation and a query change bumps it, so a late
//! completion never grows a freshly reset window. See [`pagination`].
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): templates are Rust
//! expressions, checked at compile time and escaped by default.

pub mod config;
pub mod frontmatter;
pub mod generate;
pub mod load;
pub mod metadata;
pub mod output;
pub mod pagination;
pub mod plaintext;
pub mod query;
pub mod routes;
pub mod source;
pub mod store;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
