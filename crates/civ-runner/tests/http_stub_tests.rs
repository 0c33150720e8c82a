//! End-to-end runs against a local HTTP lint endpoint.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use civ_core::{ClientIdentity, EndpointConfig, ValidationOutcome};
use civ_remote::ReqwestTransport;
use civ_runner::{RunOutcome, Runner};
use tokio::io::{AsyncReadExt, AsyncWriteExt};

#[derive(Clone, Default)]
struct StubState {
    hits: Arc<AtomicUsize>,
}

async fn lint(
    State(st): State<StubState>,
    Path(project): Path<String>,
    Query(q): Query<HashMap<String, String>>,
    Json(req): Json<serde_json::Value>,
) -> Response {
    st.hits.fetch_add(1, Ordering::SeqCst);
    if q.get("private_token").map(String::as_str) != Some("good") {
        return (
            StatusCode::UNAUTHORIZED,
            Json(serde_json::json!({ "message": "401 Unauthorized" })),
        )
            .into_response();
    }
    if project != "42" {
        return (StatusCode::NOT_FOUND, "404 Project Not Found").into_response();
    }
    let content = req["content"].as_str().unwrap_or_default();
    if content.contains("unknown_keyword") {
        Json(serde_json::json!({
            "valid": false,
            "errors": ["jobs:build config contains unknown keys: unknown_keyword"],
            "warnings": []
        }))
        .into_response()
    } else {
        Json(serde_json::json!({ "valid": true, "errors": [], "warnings": [] })).into_response()
    }
}

async fn spawn_stub() -> (SocketAddr, StubState) {
    let state = StubState::default();
    let app = Router::new()
        .route("/api/v4/projects/{id}/ci/lint", post(lint))
        .with_state(state.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, state)
}

fn runner(addr: SocketAddr, token: &str, project: &str) -> Runner<ReqwestTransport> {
    let endpoint = EndpointConfig::new(&format!("http://{addr}"))
        .unwrap()
        .with_token(token)
        .with_project_id(project);
    Runner::new(
        endpoint,
        ClientIdentity::new("gitlab-ci-validate", "test"),
        ReqwestTransport::new(None).unwrap(),
    )
}

fn fixtures() -> (tempfile::TempDir, PathBuf, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.yml");
    let bad = dir.path().join("bad.yml");
    std::fs::write(&good, "build:\n  script: make\n").unwrap();
    std::fs::write(&bad, "build:\n  unknown_keyword: 1\n").unwrap();
    (dir, good, bad)
}

#[tokio::test]
async fn validates_against_live_endpoint() {
    let (addr, state) = spawn_stub().await;
    let (_dir, good, bad) = fixtures();

    let mut out = Vec::new();
    let outcome = runner(addr, "good", "42")
        .run(&[good, bad], &mut out)
        .await
        .unwrap();

    assert_eq!(state.hits.load(Ordering::SeqCst), 2);
    let outcomes: Vec<_> = outcome.reports().iter().map(|r| r.outcome).collect();
    assert_eq!(
        outcomes,
        vec![ValidationOutcome::Pass, ValidationOutcome::HardFail]
    );
    assert_eq!(outcome.exit_code(), 1);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains(" - jobs:build config contains unknown keys: unknown_keyword"));
}

#[tokio::test]
async fn bad_token_stops_after_first_request() {
    let (addr, state) = spawn_stub().await;
    let (_dir, good, bad) = fixtures();

    let mut out = Vec::new();
    let outcome = runner(addr, "wrong", "42")
        .run(&[good, bad], &mut out)
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::Aborted { .. }));
    assert_eq!(state.hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn unknown_project_is_soft_failure() {
    let (addr, _state) = spawn_stub().await;
    let (_dir, good, _bad) = fixtures();

    let mut out = Vec::new();
    let outcome = runner(addr, "good", "7").run(&[good], &mut out).await.unwrap();

    assert_eq!(outcome.exit_code(), 2);
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("404"), "{text}");
    assert!(!text.contains("private_token"), "{text}");
}

#[tokio::test]
async fn unreachable_endpoint_is_soft_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let (_dir, good, _bad) = fixtures();

    let mut out = Vec::new();
    let outcome = runner(addr, "good", "42").run(&[good], &mut out).await.unwrap();

    assert_eq!(outcome.exit_code(), 2);
    assert_eq!(outcome.reports()[0].outcome, ValidationOutcome::SoftFail);
}

/// Answers every request with a 401 whose body ends before its declared
/// `Content-Length`, then closes the connection.
async fn spawn_truncated_auth_stub() -> (SocketAddr, Arc<AtomicUsize>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = hits.clone();
    tokio::spawn(async move {
        loop {
            let Ok((mut sock, _)) = listener.accept().await else {
                return;
            };
            counter.fetch_add(1, Ordering::SeqCst);
            read_request(&mut sock).await;
            let _ = sock
                .write_all(b"HTTP/1.1 401 Unauthorized\r\nContent-Length: 100\r\n\r\n{\"message\":")
                .await;
            let _ = sock.shutdown().await;
        }
    });
    (addr, hits)
}

/// Drains headers and body so closing the socket does not reset it.
async fn read_request(sock: &mut tokio::net::TcpStream) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    loop {
        let n = sock.read(&mut chunk).await.unwrap_or(0);
        if n == 0 {
            return;
        }
        buf.extend_from_slice(&chunk[..n]);
        let Some(end) = buf.windows(4).position(|w| w == b"\r\n\r\n") else {
            continue;
        };
        let head = String::from_utf8_lossy(&buf[..end]).to_ascii_lowercase();
        let len = head
            .lines()
            .find_map(|l| l.strip_prefix("content-length:"))
            .and_then(|v| v.trim().parse::<usize>().ok())
            .unwrap_or(0);
        if buf.len() >= end + 4 + len {
            return;
        }
    }
}

#[tokio::test]
async fn unauthorized_with_truncated_body_still_aborts() {
    let (addr, hits) = spawn_truncated_auth_stub().await;
    let (_dir, good, bad) = fixtures();

    let mut out = Vec::new();
    let outcome = runner(addr, "good", "42")
        .run(&[good, bad], &mut out)
        .await
        .unwrap();

    assert!(matches!(outcome, RunOutcome::Aborted { .. }), "{outcome:?}");
    assert_eq!(outcome.exit_code(), 1);
    assert_eq!(hits.load(Ordering::SeqCst), 1);
}
