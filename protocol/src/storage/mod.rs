//! # Storage Module
//!
//! The persistence seams the checker and the commitment sync depend on.
//! Neither owns a database: the optimist keeps L2 blocks, the client keeps
//! its commitments and the transactions it has seen, and both plug in here
//! through async traits.
//!
//! ```text
//! mod.rs     L2Block, BlockStore, CommitmentStore, StoredCommitment
//! memory.rs  MemoryStore, a lock-guarded in-memory implementation
//! ```
//!
//! Trait methods return `anyhow::Result` so backends can surface whatever
//! their driver produces.

pub mod memory;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::commitment::Commitment;
use crate::field::{Scalar, Word};
use crate::transaction::Transaction;

pub use memory::MemoryStore;

/// The part of an L2 block the checker cares about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct L2Block {
    #[serde(rename = "blockNumberL2")]
    pub block_number_l2: u64,
    /// Commitment tree root after this block.
    pub root: Word,
}

/// Read access to proposed L2 blocks.
#[async_trait]
pub trait BlockStore: Send + Sync {
    /// `Ok(None)` if no block with that number has been seen.
    async fn block_by_number_l2(&self, block_number_l2: u64) -> anyhow::Result<Option<L2Block>>;
}

/// A commitment the wallet owns, with the key needed to nullify it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCommitment {
    pub commitment: Commitment,
    pub nsk: Scalar,
}

/// Client-side commitment database.
#[async_trait]
pub trait CommitmentStore: Send + Sync {
    async fn store_commitment(&self, commitment: Commitment, nsk: Scalar) -> anyhow::Result<()>;

    /// Every transaction the client has seen, in arrival order.
    async fn all_transactions(&self) -> anyhow::Result<Vec<Transaction>>;

    /// How many of `hashes` are already stored.
    async fn count_commitments(&self, hashes: &[Word]) -> anyhow::Result<usize>;
}
