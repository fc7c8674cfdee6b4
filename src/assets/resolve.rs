//! Request path resolution and file loading
//!
//! A remainder (request path with the URL prefix stripped) is decoded,
//! checked segment by segment, joined onto the root and canonicalized.
//! The canonical result must stay inside the canonical root; this also
//! catches symlinks that point elsewhere.

use std::path::{Component, Path, PathBuf};

use hyper::body::Bytes;
use tokio::fs;

use super::Mapping;
use crate::error::AssetError;
use crate::http::mime;

/// A loaded asset ready to be sent
#[derive(Debug, Clone)]
pub struct Asset {
    pub content: Bytes,
    pub content_type: &'static str,
}

/// Turn a URL remainder into a safe relative path
///
/// Rejects `..`, NUL, backslashes, and anything that is not a plain file
/// name segment after percent-decoding.
pub fn sanitize(remainder: &str) -> Result<PathBuf, AssetError> {
    let decoded = urlencoding::decode(remainder).map_err(|_| AssetError::NotFound)?;

    let mut relative = PathBuf::new();
    for segment in decoded.split('/') {
        match segment {
            "" | "." => {}
            ".." => return Err(AssetError::Forbidden),
            s if s.contains('\0') || s.contains('\\') => return Err(AssetError::Forbidden),
            s => {
                let mut components = Path::new(s).components();
                match (components.next(), components.next()) {
                    (Some(Component::Normal(_)), None) => relative.push(s),
                    _ => return Err(AssetError::Forbidden),
                }
            }
        }
    }

    // The prefix itself is a directory, and listings are not served
    if relative.as_os_str().is_empty() {
        return Err(AssetError::NotFound);
    }

    Ok(relative)
}

impl Mapping {
    /// Canonical path of a regular file under the root
    async fn resolve(&self, relative: &Path) -> Result<PathBuf, AssetError> {
        let root = fs::canonicalize(self.root())
            .await
            .map_err(AssetError::from_io)?;
        let candidate = fs::canonicalize(root.join(relative))
            .await
            .map_err(AssetError::from_io)?;

        if !candidate.starts_with(&root) {
            return Err(AssetError::Forbidden);
        }

        let metadata = fs::metadata(&candidate)
            .await
            .map_err(AssetError::from_io)?;
        if !metadata.is_file() {
            return Err(AssetError::NotFound);
        }

        Ok(candidate)
    }

    /// Resolve and read an asset
    pub async fn load(&self, remainder: &str) -> Result<Asset, AssetError> {
        let relative = sanitize(remainder)?;
        let path = self.resolve(&relative).await?;
        let content = fs::read(&path).await.map_err(AssetError::from_io)?;

        // Type follows the requested name, not a symlink target
        let content_type = mime::content_type_for(&relative);

        Ok(Asset {
            content: Bytes::from(content),
            content_type,
        })
    }
}
