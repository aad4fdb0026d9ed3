//! HTTP surface of the classifier.
//!
//! `GET /api/classify?address=0x...` answers with one JSON shape for every
//! outcome:
//!
//! ```text
//! 200 {"ok": true, "address": "0x..", "type": "wallet"|"erc20"|"erc721"|"contract", "token"?: {...}}
//! 400 {"ok": false, "type": "invalid", "error": "invalid_address"}
//! 500 {"ok": false, "error": "server_error"}
//! ```

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use web3::types::Address;

use crate::classifier::Classifier;
use crate::types::{canonical, parse_address, TokenMetadata, Verdict};

#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<Classifier>,
}

#[derive(Deserialize, Debug)]
pub struct ClassifyQuery {
    pub address: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ClassifyResponse {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<TokenMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ClassifyResponse {
    pub fn from_verdict(addr: Option<&Address>, verdict: &Verdict) -> (StatusCode, Self) {
        if let Verdict::InvalidInput = verdict {
            return (
                StatusCode::BAD_REQUEST,
                Self {
                    ok: false,
                    address: None,
                    kind: Some(verdict.kind().into()),
                    token: None,
                    error: Some("invalid_address".into()),
                },
            );
        }
        (
            StatusCode::OK,
            Self {
                ok: true,
                address: addr.map(canonical),
                kind: Some(verdict.kind().into()),
                token: verdict.token().cloned(),
                error: None,
            },
        )
    }

    pub fn server_error() -> (StatusCode, Self) {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Self {
                ok: false,
                address: None,
                kind: None,
                token: None,
                error: Some("server_error".into()),
            },
        )
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(health))
        .route("/api/classify", get(classify))
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    "ok"
}

async fn classify(
    State(state): State<AppState>,
    Query(query): Query<ClassifyQuery>,
) -> impl IntoResponse {
    let input = query.address.unwrap_or_default();
    let addr = match parse_address(&input) {
        Ok(addr) => addr,
        Err(e) => {
            debug!(input = %input, error = %e, "rejecting address");
            let (status, body) = ClassifyResponse::from_verdict(None, &Verdict::InvalidInput);
            return (status, Json(body));
        }
    };

    // A panic in the task surfaces as server_error.
    let classifier = Arc::clone(&state.classifier);
    let (status, body) =
        match tokio::spawn(async move { classifier.classify_address(addr).await }).await {
            Ok(verdict) => ClassifyResponse::from_verdict(Some(&addr), &verdict),
            Err(e) => {
                error!(address = %canonical(&addr), error = %e, "classification task failed");
                ClassifyResponse::server_error()
            }
        };
    (status, Json(body))
}
