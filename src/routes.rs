//! Path routing for the two views: the post list and a single post.
//!
//! | Path               | Route             |
//! |--------------------|-------------------|
//! | `/`                | `List`            |
//! | `/post/<slug>`     | `Post(slug)`      |
//! | `/post/<slug>/`    | `Post(slug)`      |
//! | anything else      | `NotFound`        |
//!
//! [`resolve`] turns a route into what should be shown, given the store's
//! current state. A slug that is not in a ready store is `PostNotFound`, which
//! is a normal outcome rather than an error.

use crate::store::{PostStore, PostsState};
use crate::types::Post;
use std::sync::Arc;

pub const POST_PREFIX: &str = "/post/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    List,
    Post(String),
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        if path == "/" || path.is_empty() {
            return Self::List;
        }
        let Some(rest) = path.strip_prefix(POST_PREFIX) else {
            return Self::NotFound;
        };
        let slug = rest.strip_suffix('/').unwrap_or(rest);
        if slug.is_empty() || slug.contains('/') {
            return Self::NotFound;
        }
        Self::Post(slug.to_string())
    }

    /// Canonical path for this route (no trailing slash on posts).
    pub fn path(&self) -> Option<String> {
        match self {
            Self::List => Some("/".to_string()),
            Self::Post(slug) => Some(post_path(slug)),
            Self::NotFound => None,
        }
    }
}

pub fn post_path(slug: &str) -> String {
    format!("{POST_PREFIX}{slug}")
}

/// What a route shows against the current store state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Loading,
    Failed(String),
    List(Arc<[Post]>),
    Post(Post),
    PostNotFound(String),
    NotFound,
}

pub fn resolve(route: &Route, store: &PostStore) -> View {
    if *route == Route::NotFound {
        return View::NotFound;
    }
    match store.snapshot() {
        PostsState::Loading => View::Loading,
        PostsState::Failed(message) => View::Failed(message),
        PostsState::Ready(posts) => match route {
            Route::List => View::List(posts),
            Route::Post(slug) => posts
                .iter()
                .find(|p| p.slug == *slug)
                .cloned()
                .map_or_else(|| View::PostNotFound(slug.clone()), View::Post),
            Route::NotFound => View::NotFound,
        },
    }
}
