//! Transaction validity checking.
//!
//! Every transaction the optimist sees, whether gossiped off chain or
//! proposed in a block, goes through [`TransactionChecker::check_transaction`].
//! The four stages are independent of each other:
//!
//! 1. **Hash**: `transactionHash` must match the field values.
//! 2. **Type**: the fields must fit the declared type (see [`classify`]).
//! 3. **Public input hash**: recomputed from the fields and the resolved
//!    historic root. Resolving the root can itself fail.
//! 4. **Proof**: the off-chain verifier must accept the proof against the
//!    on-chain verification key for the type.
//!
//! Stages 1 and 2 are pure and run first, in order; stages 3 and 4 only
//! start once both pass. Stages 3 and 4 then run concurrently and their
//! results are read in stage order, so whichever collaborator answers
//! first, the reported failure is always the one from the earliest
//! failing stage.
//!
//! Failures split in two. [`TransactionError`] is a verdict: the
//! transaction is bad and its numeric code goes into a challenge.
//! [`CheckError::External`] means a collaborator broke and nothing is known
//! about the transaction.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::builder::Transaction;
use super::kind::{classify, TransactionKind};
use super::public_inputs::PublicInputs;
use super::services::{ProofVerifier, VerificationKeySource, VerifyRequest};
use super::types::TransactionType;
use crate::config::CheckerConfig;
use crate::curve::ProofObject;
use crate::field::Word;
use crate::storage::BlockStore;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a transaction is invalid.
///
/// Each variant carries the numeric code reported in challenges, see
/// [`TransactionError::code`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    /// Code 0.
    #[error("transaction hash mismatch: expected {expected}, got {actual}")]
    HashMismatch { expected: Word, actual: Word },

    /// Code 1.
    #[error("{transaction_type} transaction is malformed: {reason}")]
    InconsistentFields {
        transaction_type: TransactionType,
        reason: &'static str,
    },

    /// Code 2.
    #[error("unknown transaction type {0}")]
    UnknownType(u8),

    /// Code 3.
    #[error("no L2 block {block_number_l2} to take the historic root from")]
    HistoricRootMissing { block_number_l2: u64 },

    /// Code 4.
    #[error("public input hash mismatch: expected {expected}, got {actual}")]
    PublicInputHashMismatch { expected: Word, actual: Word },

    /// Code 5.
    #[error("proof rejected: {reason}")]
    ProofRejected { reason: String },
}

impl TransactionError {
    /// The challenge code for this failure.
    pub fn code(&self) -> u8 {
        match self {
            Self::HashMismatch { .. } => 0,
            Self::InconsistentFields { .. } => 1,
            Self::UnknownType(_) => 2,
            Self::HistoricRootMissing { .. } => 3,
            Self::PublicInputHashMismatch { .. } => 4,
            Self::ProofRejected { .. } => 5,
        }
    }
}

/// Outcome of a failed check.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Invalid(#[from] TransactionError),

    /// A block store, key source or verifier failed.
    #[error(transparent)]
    External(#[from] anyhow::Error),
}

impl CheckError {
    /// The challenge code, if the transaction was found invalid.
    pub fn code(&self) -> Option<u8> {
        match self {
            Self::Invalid(e) => Some(e.code()),
            Self::External(_) => None,
        }
    }

    pub fn as_invalid(&self) -> Option<&TransactionError> {
        match self {
            Self::Invalid(e) => Some(e),
            Self::External(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// TransactionChecker
// ---------------------------------------------------------------------------

/// Runs the validity stages against shared collaborators.
///
/// Cheap to clone; clones share the collaborators.
#[derive(Clone)]
pub struct TransactionChecker {
    config: CheckerConfig,
    blocks: Arc<dyn BlockStore>,
    keys: Arc<dyn VerificationKeySource>,
    verifier: Arc<dyn ProofVerifier>,
}

impl std::fmt::Debug for TransactionChecker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransactionChecker")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn known_type(tx: &Transaction) -> Result<TransactionType, TransactionError> {
    TransactionType::try_from(tx.transaction_type).map_err(TransactionError::UnknownType)
}

impl TransactionChecker {
    pub fn new(
        config: CheckerConfig,
        blocks: Arc<dyn BlockStore>,
        keys: Arc<dyn VerificationKeySource>,
        verifier: Arc<dyn ProofVerifier>,
    ) -> Self {
        Self {
            config,
            blocks,
            keys,
            verifier,
        }
    }

    pub fn config(&self) -> &CheckerConfig {
        &self.config
    }

    /// Run every stage. Returns the typed view of the transaction if all
    /// of them pass.
    pub async fn check_transaction(&self, tx: &Transaction) -> Result<TransactionKind, CheckError> {
        debug!(
            hash = %tx.transaction_hash,
            transaction_type = tx.transaction_type,
            "checking transaction"
        );

        self.check_transaction_hash(tx)?;
        let kind = self.check_transaction_type(tx)?;

        let (inputs, proof) =
            tokio::join!(self.check_public_input_hash(tx), self.verify_proof(tx));
        inputs?;
        proof?;

        info!(
            hash = %tx.transaction_hash,
            transaction_type = %kind.transaction_type(),
            "transaction is valid"
        );
        Ok(kind)
    }

    /// Stage 1.
    pub fn check_transaction_hash(&self, tx: &Transaction) -> Result<(), TransactionError> {
        let expected = tx.compute_hash();
        if expected == tx.transaction_hash {
            Ok(())
        } else {
            Err(TransactionError::HashMismatch {
                expected,
                actual: tx.transaction_hash,
            })
        }
    }

    /// Stage 2.
    pub fn check_transaction_type(
        &self,
        tx: &Transaction,
    ) -> Result<TransactionKind, TransactionError> {
        classify(tx)
    }

    /// Resolve the historic root the proof was made against.
    ///
    /// `Ok(None)` for deposits, which do not reference one.
    pub async fn check_historic_root(&self, tx: &Transaction) -> Result<Option<Word>, CheckError> {
        let ty = known_type(tx)?;
        if !ty.needs_historic_root() {
            return Ok(None);
        }

        let block_number_l2 = tx.historic_root_block_number_l2;
        match self.blocks.block_by_number_l2(block_number_l2).await? {
            Some(block) => Ok(Some(block.root)),
            None => Err(TransactionError::HistoricRootMissing { block_number_l2 }.into()),
        }
    }

    /// Stage 3.
    pub async fn check_public_input_hash(&self, tx: &Transaction) -> Result<(), CheckError> {
        let root = self.check_historic_root(tx).await?.unwrap_or(Word::ZERO);
        let inputs = PublicInputs::for_transaction(tx, root)
            .ok_or(TransactionError::UnknownType(tx.transaction_type))?;

        let expected = inputs.hash();
        if expected == tx.public_input_hash {
            Ok(())
        } else {
            Err(TransactionError::PublicInputHashMismatch {
                expected,
                actual: tx.public_input_hash,
            }
            .into())
        }
    }

    /// Stage 4.
    pub async fn verify_proof(&self, tx: &Transaction) -> Result<(), CheckError> {
        let ty = known_type(tx)?;
        let proof = match ProofObject::from_flat(&tx.proof) {
            Ok(proof) => proof,
            Err(e) => {
                warn!(hash = %tx.transaction_hash, error = %e, "malformed proof vector");
                return Err(TransactionError::ProofRejected {
                    reason: e.to_string(),
                }
                .into());
            }
        };

        let vk = self.keys.verification_key(ty.as_u8()).await?;
        let request = VerifyRequest {
            vk,
            proof,
            proving_scheme: self.config.proving_scheme.clone(),
            backend: self.config.backend.clone(),
            curve: self.config.curve.clone(),
            inputs: vec![tx.public_input_hash],
        };

        if self.verifier.verify(&request).await? {
            debug!(hash = %tx.transaction_hash, "proof verified");
            Ok(())
        } else {
            Err(TransactionError::ProofRejected {
                reason: "verifier returned false".to_string(),
            }
            .into())
        }
    }
}
