//! The HTTP proof verifier against a local stand-in for the ZoKrates worker.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;

use twilight_protocol::config::CheckerConfig;
use twilight_protocol::curve::ProofObject;
use twilight_protocol::field::Word;
use twilight_protocol::transaction::{
    HttpProofVerifier, ProofVerifier, VerifyRequest, VerifyResponse,
};

type Seen = Arc<Mutex<Vec<serde_json::Value>>>;

/// Accepts the proof iff the single public input is odd.
async fn verify(
    State(seen): State<Seen>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<VerifyResponse>, StatusCode> {
    seen.lock().push(body.clone());
    let request: VerifyRequest =
        serde_json::from_value(body).map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)?;
    let input = request.inputs.first().ok_or(StatusCode::BAD_REQUEST)?;
    Ok(Json(VerifyResponse {
        verifies: input.is_odd(),
    }))
}

async fn spawn_worker() -> (String, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/verify", post(verify))
        .with_state(seen.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr.to_string(), seen)
}

fn request(input: u64) -> VerifyRequest {
    VerifyRequest {
        vk: vec![Word::from_u64(1), Word::from_u64(2)],
        proof: ProofObject::from_flat(&[Word::from_u64(3); 8]).unwrap(),
        proving_scheme: "gm17".into(),
        backend: "libsnark".into(),
        curve: "bn128".into(),
        inputs: vec![Word::from_u64(input)],
    }
}

#[tokio::test]
async fn posts_request_and_reads_verdict() {
    let (host, seen) = spawn_worker().await;
    let config = CheckerConfig {
        zokrates_worker_host: host,
        ..CheckerConfig::default()
    };
    let verifier = HttpProofVerifier::new(&config);

    assert!(verifier.verify(&request(7)).await.unwrap());
    assert!(!verifier.verify(&request(8)).await.unwrap());

    let seen = seen.lock();
    assert_eq!(seen.len(), 2);
    let body = &seen[0];
    assert_eq!(body["provingScheme"], "gm17");
    assert_eq!(body["backend"], "libsnark");
    assert_eq!(body["curve"], "bn128");
    assert_eq!(body["inputs"][0], Word::from_u64(7).to_hex());
    assert_eq!(body["proof"]["b"][0][1], Word::from_u64(3).to_hex());
}

#[tokio::test]
async fn server_errors_are_failures_not_verdicts() {
    let (host, _) = spawn_worker().await;
    let verifier = HttpProofVerifier::with_client(
        reqwest::Client::new(),
        format!("http://{host}/no-such-route"),
    );
    assert!(verifier.verify(&request(7)).await.is_err());
}

#[tokio::test]
async fn unreachable_worker_is_an_error() {
    // Bind then drop, so nothing is listening on the port.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let verifier = HttpProofVerifier::with_client(
        reqwest::Client::new(),
        format!("http://{addr}/verify"),
    );
    assert!(verifier.verify(&request(7)).await.is_err());
}
