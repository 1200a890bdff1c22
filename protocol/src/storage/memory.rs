//! In-memory storage backend.
//!
//! Good enough for tests and for a light client that resyncs on start. All
//! state sits behind `parking_lot` locks; no lock is held across an await.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::{BlockStore, CommitmentStore, L2Block, StoredCommitment};
use crate::commitment::Commitment;
use crate::field::{Scalar, Word};
use crate::transaction::Transaction;

#[derive(Debug, Default)]
pub struct MemoryStore {
    blocks: RwLock<BTreeMap<u64, L2Block>>,
    transactions: RwLock<Vec<Transaction>>,
    commitments: RwLock<HashMap<Word, StoredCommitment>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a block, replacing any earlier block with the same number.
    pub fn insert_block(&self, block: L2Block) {
        self.blocks.write().insert(block.block_number_l2, block);
    }

    pub fn insert_transaction(&self, tx: Transaction) {
        self.transactions.write().push(tx);
    }

    /// Look up a stored commitment by hash.
    pub fn commitment(&self, hash: &Word) -> Option<StoredCommitment> {
        self.commitments.read().get(hash).cloned()
    }

    pub fn commitment_count(&self) -> usize {
        self.commitments.read().len()
    }
}

#[async_trait]
impl BlockStore for MemoryStore {
    async fn block_by_number_l2(&self, block_number_l2: u64) -> anyhow::Result<Option<L2Block>> {
        Ok(self.blocks.read().get(&block_number_l2).copied())
    }
}

#[async_trait]
impl CommitmentStore for MemoryStore {
    async fn store_commitment(&self, commitment: Commitment, nsk: Scalar) -> anyhow::Result<()> {
        // Idempotent: two keys decrypting the same commitment keep the first.
        self.commitments
            .write()
            .entry(commitment.hash)
            .or_insert(StoredCommitment { commitment, nsk });
        Ok(())
    }

    async fn all_transactions(&self) -> anyhow::Result<Vec<Transaction>> {
        Ok(self.transactions.read().clone())
    }

    async fn count_commitments(&self, hashes: &[Word]) -> anyhow::Result<usize> {
        let commitments = self.commitments.read();
        Ok(hashes.iter().filter(|h| commitments.contains_key(h)).count())
    }
}
