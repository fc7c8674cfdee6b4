//! Asset resolution errors
//!
//! Every variant is terminal for the request being served.

use hyper::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssetError {
    /// No regular file at the resolved path
    #[error("asset not found")]
    NotFound,

    /// Resolved path escapes the configured root
    #[error("path escapes the asset root")]
    Forbidden,

    /// Unexpected filesystem failure
    #[error("filesystem error: {0}")]
    Io(std::io::Error),
}

impl AssetError {
    /// HTTP status sent to the client
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Classify an I/O error from opening or reading a candidate file
    ///
    /// Errors caused by the requested name itself (missing, a file used as a
    /// directory, a name too long for the filesystem) are `NotFound`.
    /// Everything else, symlink loops included, is a server-side fault.
    pub fn from_io(err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match err.kind() {
            ErrorKind::NotFound | ErrorKind::NotADirectory | ErrorKind::InvalidFilename => {
                Self::NotFound
            }
            _ => Self::Io(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_status_codes() {
        assert_eq!(AssetError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AssetError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AssetError::Io(Error::other("disk on fire")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_from_io() {
        assert!(matches!(
            AssetError::from_io(Error::from(ErrorKind::NotFound)),
            AssetError::NotFound
        ));
        assert!(matches!(
            AssetError::from_io(Error::from(ErrorKind::InvalidFilename)),
            AssetError::NotFound
        ));
        assert!(matches!(
            AssetError::from_io(Error::from(ErrorKind::PermissionDenied)),
            AssetError::Io(_)
        ));
        // `ErrorKind::FilesystemLoop` is unstable to name; ELOOP (40 on Linux) maps to it
        #[cfg(target_os = "linux")]
        assert!(matches!(
            AssetError::from_io(Error::from_raw_os_error(40)),
            AssetError::Io(_)
        ));
    }
}
