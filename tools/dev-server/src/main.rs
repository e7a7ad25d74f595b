//! Development server for the module host page
//!
//! Serves the host page, the bridge's wasm-bindgen output and the native
//! module artifacts with the content types browsers insist on.
//!
//! Environment:
//! - `PORT` - listen port (default 8080)
//! - `WEB_ROOT` - directory to serve (default `web`)

use axum::{
    body::Body,
    http::{header, HeaderValue, Request, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get_service,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_WEB_ROOT: &str = "web";

/// Content types keyed by file extension
const CONTENT_TYPES: &[(&str, &str)] = &[
    ("html", "text/html; charset=utf-8"),
    ("css", "text/css; charset=utf-8"),
    ("js", "application/javascript; charset=utf-8"),
    ("mjs", "application/javascript; charset=utf-8"),
    ("json", "application/json; charset=utf-8"),
    ("wasm", "application/wasm"),
    // Plugin module manifest and portable executable
    ("nmf", "application/json; charset=utf-8"),
    ("pexe", "application/x-pnacl"),
    ("nexe", "application/octet-stream"),
];

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT);
    let root: PathBuf = std::env::var("WEB_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_WEB_ROOT));

    if !root.is_dir() {
        eprintln!("[dev-server] Web root {} is not a directory", root.display());
    }

    let serve_dir = ServeDir::new(&root).precompressed_gzip().precompressed_br();

    let app = Router::new()
        .fallback_service(get_service(serve_dir).handle_error(|_| async {
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }))
        .layer(
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(add_headers)),
        );

    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    println!("==================================================");
    println!("  Module host dev server");
    println!("  Serving: {}", root.display());
    println!("  URL:     http://localhost:{}", port);
    println!("  Press Ctrl+C to stop");
    println!("==================================================");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

/// Content type for a request path, by extension.
fn content_type(path: &str) -> Option<&'static str> {
    let (_, ext) = path.rsplit_once('.')?;
    CONTENT_TYPES
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(ext))
        .map(|(_, ty)| *ty)
}

/// Add isolation headers and fix MIME types
async fn add_headers(request: Request<Body>, next: Next) -> Response<Body> {
    let path = request.uri().path().to_string();

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    // Threaded wasm modules need SharedArrayBuffer
    headers.insert(
        "Cross-Origin-Opener-Policy",
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        "Cross-Origin-Embedder-Policy",
        HeaderValue::from_static("require-corp"),
    );

    if let Some(ty) = content_type(&path) {
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(ty));
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type_by_extension() {
        assert_eq!(content_type("/modhost_web_bg.wasm"), Some("application/wasm"));
        assert_eq!(
            content_type("/module.nmf"),
            Some("application/json; charset=utf-8")
        );
        assert_eq!(content_type("/module.PEXE"), Some("application/x-pnacl"));
    }

    #[test]
    fn test_content_type_unknown() {
        assert_eq!(content_type("/"), None);
        assert_eq!(content_type("/data.bin"), None);
    }
}
