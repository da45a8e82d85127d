// src/test_support.rs
// =============================================================================
// Test-only helpers: in-process HTTP servers built with axum.
//
// Each server binds 127.0.0.1:0 so tests can run in parallel without port
// clashes. Handlers count hits with AtomicUsize so tests can assert how many
// requests actually reached the server.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

// Serves `router` in the background and returns its base URL (no trailing slash)
pub async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

// A base URL nothing listens on, so connections are refused
pub fn unreachable_base() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn bump(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

// Route serving a fixed robots.txt body and counting fetches
pub fn robots_route(router: Router, body: &'static str, hits: Hits) -> Router {
    router.route(
        "/robots.txt",
        get(move || {
            let hits = hits.clone();
            async move {
                hits.bump();
                body
            }
        }),
    )
}

// Route answering with a bare status and counting hits
pub fn status_route(router: Router, path: &str, status: StatusCode, hits: Hits) -> Router {
    router.route(
        path,
        get(move || {
            let hits = hits.clone();
            async move {
                hits.bump();
                status
            }
        }),
    )
}

// Route answering 301 with a fixed Location
//
// Pointing `location` at `path` itself gives an endless redirect loop.
pub fn redirect_route(router: Router, path: &str, location: &'static str) -> Router {
    router.route(
        path,
        get(move || async move {
            (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
        }),
    )
}
