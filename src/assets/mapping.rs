//! URL prefix to filesystem root binding

use std::io;
use std::path::{Path, PathBuf};

use crate::config::AssetsConfig;

/// A single static asset mapping, built once at startup
#[derive(Debug, Clone)]
pub struct Mapping {
    url_prefix: String,
    root: PathBuf,
}

impl Mapping {
    /// Build a mapping, resolving a relative `root` against the working directory
    pub fn new(url_prefix: &str, root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref();
        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()?.join(root)
        };

        Ok(Self {
            url_prefix: normalize_prefix(url_prefix),
            root,
        })
    }

    pub fn from_config(config: &AssetsConfig) -> io::Result<Self> {
        Self::new(&config.url_prefix, &config.root)
    }

    /// Normalized prefix: leading `/`, no trailing `/` or `/**`
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Absolute filesystem root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Strip the URL prefix on a segment boundary
    ///
    /// Returns the remainder without its leading `/`, or `None` when the path
    /// is outside the prefix. `/uploads` and `/uploads/` both yield `""`.
    pub fn strip_prefix<'a>(&self, path: &'a str) -> Option<&'a str> {
        if self.url_prefix == "/" {
            return Some(path.trim_start_matches('/'));
        }

        let rest = path.strip_prefix(self.url_prefix.as_str())?;
        if rest.is_empty() {
            Some(rest)
        } else {
            rest.strip_prefix('/')
        }
    }
}

/// `/uploads/**`, `/uploads/`, `uploads` all become `/uploads`
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix
        .trim()
        .trim_end_matches("/**")
        .trim_end_matches('/')
        .trim_start_matches('/');

    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}
