//! Content sources: where raw post documents come from.
//!
//! The loader only needs one operation, [`ContentSource::get`], which answers
//! "raw text for this document id, or not found". Two implementations:
//!
//! - [`FsSource`] reads `<content_root>/posts/<id>` from disk.
//! - [`MemorySource`] serves documents from a map, for tests and embedding.
//!
//! A missing document is `Ok(None)`, not an error; the loader skips it either
//! way but reports the two cases differently.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

/// Directory under the content root that holds post documents.
pub const POSTS_DIR: &str = "posts";

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error reading {id}: {source}")]
    Io {
        id: String,
        #[source]
        source: io::Error,
    },
    #[error("Invalid document id: {0}")]
    InvalidId(String),
}

/// A provider of raw markdown documents.
///
/// Implementations must be `Sync`: the loader fetches documents in parallel.
pub trait ContentSource: Sync {
    /// Raw text for `id`, or `Ok(None)` if no such document exists.
    fn get(&self, id: &str) -> Result<Option<String>, SourceError>;
}

/// Reads documents from `<root>/posts/`.
#[derive(Debug, Clone)]
pub struct FsSource {
    posts_dir: PathBuf,
}

impl FsSource {
    /// Source for the content root `root` (documents live in `root/posts`).
    pub fn new(root: &Path) -> Self {
        Self {
            posts_dir: root.join(POSTS_DIR),
        }
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// List every markdown document id under the posts directory, sorted.
    ///
    /// Ids are paths relative to the posts directory with `/` separators.
    /// A missing posts directory yields an empty list.
    pub fn discover(&self) -> Vec<String> {
        let mut ids: Vec<String> = WalkDir::new(&self.posts_dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.path()
                    .extension()
                    .map(|ext| ext.eq_ignore_ascii_case("md"))
                    .unwrap_or(false)
            })
            .filter_map(|e| {
                let rel = e.path().strip_prefix(&self.posts_dir).ok()?;
                let parts: Vec<String> = rel
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                Some(parts.join("/"))
            })
            .collect();
        ids.sort();
        ids
    }

    fn resolve(&self, id: &str) -> Result<PathBuf, SourceError> {
        let rel = Path::new(id);
        let escapes = rel
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if id.is_empty() || escapes {
            return Err(SourceError::InvalidId(id.to_string()));
        }
        Ok(self.posts_dir.join(rel))
    }
}

impl ContentSource for FsSource {
    fn get(&self, id: &str) -> Result<Option<String>, SourceError> {
        let path = self.resolve(id)?;
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(SourceError::Io {
                id: id.to_string(),
                source,
            }),
        }
    }
}

/// Serves documents from memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    documents: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, id: impl Into<String>, raw: impl Into<String>) -> Self {
        self.insert(id, raw);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, raw: impl Into<String>) {
        self.documents.insert(id.into(), raw.into());
    }

    pub fn ids(&self) -> Vec<String> {
        self.documents.keys().cloned().collect()
    }
}

impl ContentSource for MemorySource {
    fn get(&self, id: &str) -> Result<Option<String>, SourceError> {
        Ok(self.documents.get(id).cloned())
    }
}

/// The file stem of a document id: `notes/hello-world.md` → `hello-world`.
pub fn document_stem(id: &str) -> &str {
    let name = id.rsplit('/').next().unwrap_or(id);
    match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    }
}
