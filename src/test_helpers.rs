//! Shared test utilities.
//!
//! Provides an isolated copy of `fixtures/content/` plus lookup helpers that
//! panic with the available options on a miss.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let site = load_fixtures(&tmp);
//!
//! let post = find_post(&site.report.posts, "future-of-javascript");
//! assert_eq!(post.title, "The Future of JavaScript");
//! ```

use std::path::Path;
use tempfile::TempDir;

use crate::load::{LoadedSite, load_site};
use crate::types::Post;

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/content/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/content");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Load the fixture copy in `tmp` without progress events.
pub fn load_fixtures(tmp: &TempDir) -> LoadedSite {
    load_site(tmp.path(), None).unwrap()
}

// =========================================================================
// Lookups
// =========================================================================

/// Find a post by slug. Panics if not found.
pub fn find_post<'a>(posts: &'a [Post], slug: &str) -> &'a Post {
    posts.iter().find(|p| p.slug == slug).unwrap_or_else(|| {
        panic!("post '{slug}' not found. Available: {:?}", slugs(posts))
    })
}

/// Every slug, in collection order.
pub fn slugs(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|p| p.slug.as_str()).collect()
}

/// Every title, in collection order.
pub fn titles(posts: &[Post]) -> Vec<&str> {
    posts.iter().map(|p| p.title.as_str()).collect()
}
