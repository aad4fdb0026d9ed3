mod common;

use std::sync::Arc;

use addrkind::erc20::{FN_DECIMALS, FN_SYMBOL};
use addrkind::server::{router, AppState, ClassifyResponse};
use addrkind::transport::{Upstream, UpstreamError};
use addrkind::{Classifier, TokenHeuristic};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{abi_string, word, FakeUpstream, CODE, TOKEN};
use tower::ServiceExt;
use web3::types::{Address, Bytes};

fn app(upstream: &Arc<FakeUpstream>) -> Router {
    router(AppState {
        classifier: Arc::new(Classifier::new(upstream.clone(), TokenHeuristic::default())),
    })
}

async fn get(app: Router, uri: &str) -> (StatusCode, ClassifyResponse) {
    let resp = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn healthz() {
    let upstream = FakeUpstream::unreachable().shared();
    let resp = app(&upstream)
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn token_response_carries_metadata() {
    let upstream = FakeUpstream::with_code(CODE)
        .answer(FN_SYMBOL, abi_string("TKN"))
        .answer(FN_DECIMALS, word(18))
        .shared();
    let (status, body) = get(app(&upstream), &format!("/api/classify?address={TOKEN}")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.ok);
    assert_eq!(body.kind.as_deref(), Some("erc20"));
    assert_eq!(body.address.as_deref(), Some(TOKEN));
    let token = body.token.expect("token metadata");
    assert_eq!(token.symbol, "TKN");
    assert_eq!(token.decimals, Some(18));
    assert_eq!(token.total_supply, None);
    assert!(body.error.is_none());
}

#[tokio::test]
async fn address_is_reported_lowercase() {
    let upstream = FakeUpstream::unreachable().shared();
    let (status, body) = get(
        app(&upstream),
        "/api/classify?address=0x1C7D4B196CB0C7B01D743FBC6116A902379C7238",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.kind.as_deref(), Some("wallet"));
    assert_eq!(body.address.as_deref(), Some(TOKEN));
    assert!(body.token.is_none());
}

#[tokio::test]
async fn contract_without_token_interface() {
    let upstream = FakeUpstream::with_code(CODE).shared();
    let (status, body) = get(app(&upstream), &format!("/api/classify?address={TOKEN}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.kind.as_deref(), Some("contract"));
    assert!(body.token.is_none());
}

#[tokio::test]
async fn invalid_address_is_bad_request() {
    let upstream = FakeUpstream::with_code(CODE).shared();
    let (status, body) = get(app(&upstream), "/api/classify?address=0x1234").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!body.ok);
    assert_eq!(body.error.as_deref(), Some("invalid_address"));
    assert_eq!(body.kind.as_deref(), Some("invalid"));
    assert_eq!(upstream.call_count(), 0);
}

#[tokio::test]
async fn missing_address_is_bad_request() {
    let upstream = FakeUpstream::with_code(CODE).shared();
    let (status, body) = get(app(&upstream), "/api/classify").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.error.as_deref(), Some("invalid_address"));
    assert_eq!(upstream.call_count(), 0);
}

struct BrokenUpstream;

#[async_trait]
impl Upstream for BrokenUpstream {
    async fn fetch_code(&self, _addr: Address) -> Result<Bytes, UpstreamError> {
        panic!("upstream bug");
    }

    async fn fetch_call(&self, _addr: Address, _data: Bytes) -> Result<Bytes, UpstreamError> {
        panic!("upstream bug");
    }

    fn url(&self) -> &str {
        "broken"
    }
}

#[tokio::test]
async fn panicking_classification_is_server_error() {
    let app = router(AppState {
        classifier: Arc::new(Classifier::new(
            Arc::new(BrokenUpstream),
            TokenHeuristic::default(),
        )),
    });
    let (status, body) = get(app, &format!("/api/classify?address={TOKEN}")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.ok);
    assert_eq!(body.error.as_deref(), Some("server_error"));
    assert!(body.kind.is_none());
}

#[test]
fn server_error_shape() {
    let (status, body) = ClassifyResponse::server_error();
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let json = serde_json::to_value(&body).unwrap();
    assert_eq!(json, serde_json::json!({"ok": false, "error": "server_error"}));
}
