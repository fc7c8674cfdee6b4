//! HTTP protocol layer module
//!
//! MIME detection and response builders, decoupled from asset resolution.

pub mod mime;
pub mod response;

// Re-export commonly used builders
pub use response::{
    build_404_response, build_405_response, build_asset_response, build_error_response,
    build_health_response, build_options_response, with_server_name,
};
