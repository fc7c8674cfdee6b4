//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: method validation, route
//! matching, server header stamping and access logging.

use crate::config::AppState;
use crate::handler::static_files;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    pub path: &'a str,
    pub is_head: bool,
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let mut entry = state.access_log_enabled().then(|| {
        let (method, uri) = (req.method(), req.uri());
        AccessLogEntry::from_request(peer_addr, method, uri, req.version(), req.headers())
    });

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let response = dispatch(&method, &path, &state).await;
    let response = http::with_server_name(response, &state.config.http.server_name);

    if let Some(entry) = entry.as_mut() {
        let body_bytes = response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.finish(response.status().as_u16(), body_bytes, started.elapsed());
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

async fn dispatch(method: &Method, path: &str, state: &AppState) -> Response<Full<Bytes>> {
    // 1. Check HTTP method
    if let Some(resp) = check_http_method(method, state.config.http.enable_cors) {
        return resp;
    }

    let ctx = RequestContext {
        path,
        is_head: *method == Method::HEAD,
    };

    route_request(&ctx, state).await
}

/// Check HTTP method and return appropriate response for non-GET/HEAD methods
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match *method {
        Method::GET | Method::HEAD => None,
        Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_debug(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Route request based on path and configuration
async fn route_request(ctx: &RequestContext<'_>, state: &AppState) -> Response<Full<Bytes>> {
    // 0. Health check endpoint (highest priority, always fast)
    let http_config = &state.config.http;
    if http_config.enable_health && ctx.path == http_config.health_path {
        return http::build_health_response(ctx.is_head);
    }

    // 1. Asset mapping (prefix match on segment boundary)
    if let Some(remainder) = state.mapping.strip_prefix(ctx.path) {
        return static_files::serve_asset(ctx, state, remainder).await;
    }

    // 2. Nothing else is served
    http::build_404_response(ctx.is_head)
}
