//! Property-Based Tests for the Router
//!
//! Uses proptest to check routing and body-policy invariants over generated requests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use proptest::prelude::*;
use tower::util::ServiceExt;

use crate::api::{create_router, AppState};
use crate::cache::MemoryCache;
use crate::config::Config;
use crate::store::{StoreLink, StoreState};

const MAPPED_PATHS: [&str; 3] = ["/", "/health", "/api/users"];

struct FixedStore;

impl StoreLink for FixedStore {
    fn state(&self) -> StoreState {
        StoreState::Connected
    }
}

fn test_app() -> Router {
    let state = AppState::new(Arc::new(FixedStore), Arc::new(MemoryCache::new()));
    create_router(state, &Config::default())
}

fn status_of(request: Request<Body>) -> StatusCode {
    tokio_test::block_on(async { test_app().oneshot(request).await.unwrap().status() })
}

// == Strategies ==
/// Generates request paths that are not in the routing table
fn unmapped_path_strategy() -> impl Strategy<Value = String> {
    "(/[a-z0-9_-]{1,12}){1,3}".prop_filter("mapped path", |p| !MAPPED_PATHS.contains(&p.as_str()))
}

/// Methods other than GET/HEAD (HEAD is answered for GET routes)
fn non_get_method_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["POST", "PUT", "PATCH", "DELETE"])
}

fn any_path_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(MAPPED_PATHS.to_vec()).prop_map(String::from),
        unmapped_path_strategy(),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    // Every GET to a path outside the routing table is a 404.
    #[test]
    fn prop_unmapped_path_not_found(path in unmapped_path_strategy()) {
        let request = Request::builder().uri(&path).body(Body::empty()).unwrap();
        prop_assert_eq!(status_of(request), StatusCode::NOT_FOUND);
    }

    // Mapped paths only answer GET; other methods are a 404, never a 405.
    #[test]
    fn prop_unmapped_method_not_found(
        method in non_get_method_strategy(),
        path in any_path_strategy(),
    ) {
        let request = Request::builder()
            .method(method)
            .uri(&path)
            .body(Body::empty())
            .unwrap();
        prop_assert_eq!(status_of(request), StatusCode::NOT_FOUND);
    }

    // A malformed JSON body is rejected with 400 whatever the method and path.
    #[test]
    fn prop_malformed_json_rejected(
        method in prop::sample::select(vec!["GET", "POST", "PUT", "PATCH", "DELETE"]),
        path in any_path_strategy(),
        junk in "\\{[a-z\":,]{0,16}",
    ) {
        let request = Request::builder()
            .method(method)
            .uri(&path)
            .header("content-type", "application/json")
            .body(Body::from(junk))
            .unwrap();
        prop_assert_eq!(status_of(request), StatusCode::BAD_REQUEST);
    }
}
