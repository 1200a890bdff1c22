//! Collaborators the checker talks to.
//!
//! The checker needs three things it cannot compute itself: historic blocks
//! (see [`crate::storage::BlockStore`]), verification keys held by the
//! challenges contract, and a verdict from the off-chain proof verifier.
//! Each is an async trait so deployments can plug in the real contract and
//! HTTP clients while tests plug in a struct with a hash map.
//!
//! Implementations return `anyhow::Result`. A failure here is an
//! infrastructure problem, not a verdict on the transaction, and the
//! checker keeps the two apart.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CheckerConfig;
use crate::curve::ProofObject;
use crate::field::Word;

/// Source of on-chain verification keys.
#[async_trait]
pub trait VerificationKeySource: Send + Sync {
    /// The flat verification key registered for `transaction_type`.
    ///
    /// Implementations backed by a contract wait for the contract to become
    /// available before calling it.
    async fn verification_key(&self, transaction_type: u8) -> anyhow::Result<Vec<Word>>;
}

/// An off-chain proof verifier.
#[async_trait]
pub trait ProofVerifier: Send + Sync {
    /// `Ok(true)` if the proof verifies, `Ok(false)` if the verifier says no.
    async fn verify(&self, request: &VerifyRequest) -> anyhow::Result<bool>;
}

/// Body of `POST /verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub vk: Vec<Word>,
    pub proof: ProofObject,
    pub proving_scheme: String,
    pub backend: String,
    pub curve: String,
    pub inputs: Vec<Word>,
}

/// Body of the `/verify` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub verifies: bool,
}

/// [`ProofVerifier`] over HTTP, speaking the ZoKrates worker protocol.
///
/// No timeout is configured here; wrap the checker call in
/// `tokio::time::timeout` if the worker can hang.
#[derive(Debug, Clone)]
pub struct HttpProofVerifier {
    client: Client,
    url: String,
}

impl HttpProofVerifier {
    pub fn new(config: &CheckerConfig) -> Self {
        Self::with_client(Client::new(), config.verify_url())
    }

    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl ProofVerifier for HttpProofVerifier {
    async fn verify(&self, request: &VerifyRequest) -> anyhow::Result<bool> {
        debug!(url = %self.url, inputs = request.inputs.len(), "posting proof to verifier");
        let response: VerifyResponse = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(response.verifies)
    }
}
