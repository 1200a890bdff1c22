//! Public inputs and their hash.
//!
//! The circuits take a single public input: the MiMC hash of an ordered,
//! type-specific list of transaction fields. Transfers and withdrawals bind
//! the proof to a historic commitment root, so the list carries the *root*
//! of the referenced L2 block, never the block number.
//!
//! ```text
//! DEPOSIT          [erc, tokenId, value, commitments[0]]
//! SINGLE_TRANSFER  [erc, commitments[0], nullifiers[0], root, compressedSecrets...]
//! DOUBLE_TRANSFER  [erc, erc, commitments..., nullifiers..., root, compressedSecrets...]
//! WITHDRAW         [erc, tokenId, value, nullifiers[0], recipientAddress, root]
//! ```
//!
//! Double transfers really do list the ERC address twice. The circuit was
//! compiled that way; do not "fix" it.

use super::builder::Transaction;
use super::types::TransactionType;
use crate::crypto::mimc_hash_words;
use crate::field::Word;

/// An ordered list of public input words.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PublicInputs(Vec<Word>);

fn first(words: &[Word]) -> Word {
    words.first().copied().unwrap_or(Word::ZERO)
}

impl PublicInputs {
    pub fn new(words: Vec<Word>) -> Self {
        Self(words)
    }

    /// Lay out the public inputs of `tx` using `root` as the resolved
    /// historic root. `None` for an unknown transaction type.
    ///
    /// Works on the raw record so it can run before, or without, the type
    /// consistency check. Missing slots read as zero.
    pub fn for_transaction(tx: &Transaction, root: Word) -> Option<Self> {
        let ty = TransactionType::try_from(tx.transaction_type).ok()?;
        let words = match ty {
            TransactionType::Deposit => vec![
                tx.erc_address,
                tx.token_id,
                tx.value,
                first(&tx.commitments),
            ],
            TransactionType::SingleTransfer => {
                let mut words = vec![
                    tx.erc_address,
                    first(&tx.commitments),
                    first(&tx.nullifiers),
                    root,
                ];
                words.extend_from_slice(&tx.compressed_secrets);
                words
            }
            TransactionType::DoubleTransfer => {
                let mut words = vec![tx.erc_address, tx.erc_address];
                words.extend_from_slice(&tx.commitments);
                words.extend_from_slice(&tx.nullifiers);
                words.push(root);
                words.extend_from_slice(&tx.compressed_secrets);
                words
            }
            TransactionType::Withdraw => vec![
                tx.erc_address,
                tx.token_id,
                tx.value,
                first(&tx.nullifiers),
                tx.recipient_address,
                root,
            ],
        };
        Some(Self(words))
    }

    pub fn as_slice(&self) -> &[Word] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// MiMC over the words.
    pub fn hash(&self) -> Word {
        mimc_hash_words(&self.0)
    }
}
