//! Blog configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! the base layer; a `config.toml` in the content root overrides any subset
//! of keys.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml              # Optional, overrides stock defaults
//! └── posts/
//!     ├── getting-started-with-react.md
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "3Blog"
//! description = "Exploring ideas, sharing knowledge, and building connections through thoughtful writing."
//! author = "3Dayg"          # Author for posts without one
//!
//! [posts]
//! files = [                 # Documents to load, relative to content/posts/
//!     "getting-started-with-react.md",
//!     "css-modules-modern-web-development.md",
//!     "future-of-javascript.md",
//! ]
//!
//! [excerpt]
//! length = 200              # Max chars for derived excerpts
//!
//! [pagination]
//! page_size = 5             # Posts revealed initially and per load
//! load_delay_ms = 500       # Simulated fetch delay for "load more"
//! trigger_distance = 100    # Distance from the bottom that triggers a load
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Config file name looked up in the content root.
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Blog configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BlogConfig {
    /// Site identity shown in generated pages.
    pub site: SiteConfig,
    /// Which documents make up the blog.
    pub posts: PostsConfig,
    /// Excerpt derivation settings.
    pub excerpt: ExcerptConfig,
    /// Incremental list reveal settings.
    pub pagination: PaginationConfig,
}

impl BlogConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.author.trim().is_empty() {
            return Err(ConfigError::Validation(
                "site.author must not be empty".into(),
            ));
        }
        if self.excerpt.length == 0 {
            return Err(ConfigError::Validation(
                "excerpt.length must be greater than 0".into(),
            ));
        }
        if self.pagination.page_size == 0 {
            return Err(ConfigError::Validation(
                "pagination.page_size must be greater than 0".into(),
            ));
        }
        if let Some(empty) = self.posts.files.iter().find(|f| f.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "posts.files contains an empty entry: {empty:?}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub title: String,
    pub description: String,
    /// Author assigned to posts whose frontmatter has none.
    pub author: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "3Blog".to_string(),
            description: "Exploring ideas, sharing knowledge, and building connections \
                          through thoughtful writing."
                .to_string(),
            author: "3Dayg".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PostsConfig {
    /// Document ids relative to `content/posts/`, in fetch order.
    pub files: Vec<String>,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            files: vec![
                "getting-started-with-react.md".to_string(),
                "css-modules-modern-web-development.md".to_string(),
                "future-of-javascript.md".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExcerptConfig {
    /// Maximum chars of a derived excerpt (an ellipsis may follow).
    pub length: usize,
}

impl Default for ExcerptConfig {
    fn default() -> Self {
        Self { length: 200 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginationConfig {
    /// Posts revealed at first, and added by each load.
    pub page_size: usize,
    /// Simulated latency of a "load more" request, in milliseconds.
    pub load_delay_ms: u64,
    /// How close to the bottom a scroll must get to trigger a load.
    pub trigger_distance: u32,
}

impl PaginationConfig {
    pub fn load_delay(&self) -> Duration {
        Duration::from_millis(self.load_delay_ms)
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: 5,
            load_delay_ms: 500,
            trigger_distance: 100,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// [`BlogConfig::default`] as a TOML table: the values a content root
/// without `config.toml` runs with.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(BlogConfig::default()).expect("default config must serialize")
}

/// Overlay a site's `config.toml` onto the stock table.
///
/// `[site]`, `[posts]`, `[excerpt]` and `[pagination]` merge per key, so a
/// site can set only `pagination.page_size`. Arrays are not merged: a
/// `posts.files` list names the complete set of posts to load.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut merged), toml::Value::Table(overrides)) => {
            for (key, value) in overrides {
                let value = match merged.remove(&key) {
                    Some(stock) => merge_toml(stock, value),
                    None => value,
                };
                merged.insert(key, value);
            }
            toml::Value::Table(merged)
        }
        (_, replacement) => replacement,
    }
}

/// The `config.toml` at the content root, unparsed into [`BlogConfig`].
/// A missing file is `Ok(None)`; an unreadable one is an error.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let content = match fs::read_to_string(root.join(CONFIG_FILE)) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(toml::from_str(&content)?))
}

/// Stock table plus optional site overrides, typed and validated.
/// Unknown keys and a zero `page_size` are rejected here.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<BlogConfig, ConfigError> {
    let merged = match overlay {
        Some(site) => merge_toml(base, site),
        None => base,
    };
    let config: BlogConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config for the content root `root`.
pub fn load_config(root: &Path) -> Result<BlogConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(root)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Inkpost Configuration
# =====================
#
# Place this file in your content root (next to the posts/ directory).
# Every key is optional: anything left out keeps the value shown here.

[site]
# Site title shown in the header of every generated page.
title = "3Blog"
# Tagline shown on the home page.
description = "Exploring ideas, sharing knowledge, and building connections through thoughtful writing."
# Author for posts whose frontmatter has no `author` key.
author = "3Dayg"

[posts]
# Documents to load, relative to content/posts/, in fetch order.
# Missing files are skipped with a warning. `inkpost check` lists markdown
# files present on disk but missing here.
files = [
    "getting-started-with-react.md",
    "css-modules-modern-web-development.md",
    "future-of-javascript.md",
]

[excerpt]
# Maximum characters of a derived excerpt. Posts with an `excerpt` key in
# their frontmatter use it verbatim.
length = 200

[pagination]
# Posts revealed at first, and added by each "load more".
page_size = 5
# Simulated latency of a "load more" request, in milliseconds.
load_delay_ms = 500
# How close to the bottom of the list a scroll must get to trigger a load.
trigger_distance = 100
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_stock_values() {
        let config = BlogConfig::default();
        assert_eq!(config.site.author, "3Dayg");
        assert_eq!(config.posts.files.len(), 3);
        assert_eq!(config.excerpt.length, 200);
        assert_eq!(config.pagination.page_size, 5);
        assert_eq!(config.pagination.load_delay(), Duration::from_millis(500));
    }

    #[test]
    fn load_config_without_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, BlogConfig::default());
    }

    #[test]
    fn partial_config_overrides_only_given_keys() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[site]
title = "My Blog"

[pagination]
page_size = 10
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.site.title, "My Blog");
        assert_eq!(config.site.author, "3Dayg");
        assert_eq!(config.pagination.page_size, 10);
        assert_eq!(config.pagination.load_delay_ms, 500);
    }

    #[test]
    fn overlay_list_replaces_stock_list() {
        let overlay: toml::Value = toml::from_str(
            r#"
[posts]
files = ["only.md"]
"#,
        )
        .unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert_eq!(config.posts.files, vec!["only.md"]);
    }

    #[test]
    fn unknown_keys_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[pagination]
page_sise = 10
"#,
        )
        .unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[site\ntitle = ").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(BlogConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_zero_page_size() {
        let mut config = BlogConfig::default();
        config.pagination.page_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn validate_zero_excerpt_length() {
        let mut config = BlogConfig::default();
        config.excerpt.length = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_blank_author() {
        let mut config = BlogConfig::default();
        config.site.author = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_blank_file_entry() {
        let mut config = BlogConfig::default();
        config.posts.files.push(String::new());
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            r#"
[excerpt]
length = 0
"#,
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn empty_file_list_is_allowed() {
        let overlay: toml::Value = toml::from_str("[posts]\nfiles = []\n").unwrap();
        let config = resolve_config(stock_defaults_value(), Some(overlay)).unwrap();
        assert!(config.posts.files.is_empty());
    }

    // =========================================================================
    // Stock config tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: BlogConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, BlogConfig::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.is_table());
        for section in ["site", "posts", "excerpt", "pagination"] {
            assert!(val.get(section).is_some(), "missing [{section}]");
        }
    }
}
