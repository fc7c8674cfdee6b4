//! Static asset mapping
//!
//! Binds one URL prefix to one directory on disk and turns request paths
//! into file contents, refusing anything that resolves outside the directory.

mod mapping;
mod resolve;

pub use mapping::Mapping;
pub use resolve::Asset;
