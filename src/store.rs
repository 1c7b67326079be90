//! The post store: load status plus the loaded collection.
//!
//! A [`PostStore`] is created by whoever composes the application (the CLI's
//! `main`, a test) and handed to readers by reference. It starts out
//! [`PostsState::Loading`] and settles exactly once, to either `Ready` or
//! `Failed`. Readers take cheap snapshots: the posts live in an `Arc<[Post]>`
//! that is never mutated after settling.
//!
//! The settle transition is the only write, so the state sits behind a
//! read-mostly `RwLock`.

use crate::types::Post;
use parking_lot::RwLock;
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StoreError {
    #[error("Post store already settled")]
    AlreadySettled,
}

/// Load status of the post collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PostsState {
    #[default]
    Loading,
    Ready(Arc<[Post]>),
    Failed(String),
}

impl PostsState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The loaded posts; empty while loading or after a failure.
    pub fn posts(&self) -> &[Post] {
        match self {
            Self::Ready(posts) => &posts[..],
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
pub struct PostStore {
    state: RwLock<PostsState>,
}

impl PostStore {
    /// A store in the `Loading` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Settle with the loaded posts (expected newest first).
    pub fn ready(&self, posts: Vec<Post>) -> Result<(), StoreError> {
        self.settle(PostsState::Ready(posts.into()))
    }

    /// Settle with a pipeline failure.
    pub fn fail(&self, message: impl Into<String>) -> Result<(), StoreError> {
        self.settle(PostsState::Failed(message.into()))
    }

    fn settle(&self, next: PostsState) -> Result<(), StoreError> {
        let mut state = self.state.write();
        if !state.is_loading() {
            return Err(StoreError::AlreadySettled);
        }
        *state = next;
        Ok(())
    }

    /// Current state (cheap: clones an `Arc`).
    pub fn snapshot(&self) -> PostsState {
        self.state.read().clone()
    }

    /// Loaded posts, or an empty slice while loading or failed.
    pub fn posts(&self) -> Arc<[Post]> {
        match &*self.state.read() {
            PostsState::Ready(posts) => Arc::clone(posts),
            _ => Arc::from(Vec::new()),
        }
    }

    /// Look a post up by slug. `None` means "post not found".
    pub fn find_by_slug(&self, slug: &str) -> Option<Post> {
        self.state
            .read()
            .posts()
            .iter()
            .find(|p| p.slug == slug)
            .cloned()
    }
}
