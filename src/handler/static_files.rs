//! Static file serving module
//!
//! Turns a mapped asset, or the reason it could not be loaded, into a response.

use crate::assets::Asset;
use crate::config::AppState;
use crate::error::AssetError;
use crate::handler::router::RequestContext;
use crate::http;
use crate::logger;
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Serve one file from the mapped directory
pub async fn serve_asset(
    ctx: &RequestContext<'_>,
    state: &AppState,
    remainder: &str,
) -> Response<Full<Bytes>> {
    match state.mapping.load(remainder).await {
        Ok(asset) => build_response(asset, state.config.http.enable_cors, ctx.is_head),
        Err(err) => {
            match &err {
                AssetError::NotFound => {}
                AssetError::Forbidden => logger::log_warning(&format!(
                    "Path traversal attempt blocked: {}",
                    ctx.path
                )),
                AssetError::Io(e) => {
                    logger::log_error(&format!("Failed to read '{}': {e}", ctx.path));
                }
            }
            http::build_error_response(err.status(), ctx.is_head)
        }
    }
}

fn build_response(asset: Asset, enable_cors: bool, is_head: bool) -> Response<Full<Bytes>> {
    http::build_asset_response(asset.content, asset.content_type, enable_cors, is_head)
}
