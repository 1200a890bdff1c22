//! The wire transaction and its builder.
//!
//! [`Transaction`] is the record exactly as it travels between the client,
//! the optimist and the chain: every field present for every type, unused
//! fields set to zero. The type consistency rules in
//! [`super::kind`] decide which zeros are legal.
//!
//! [`TransactionBuilder`] fills in the zeros, computes the transaction hash
//! and, on request, the public input hash.

use serde::{Deserialize, Serialize};

use super::kind::{classify, TransactionKind};
use super::public_inputs::PublicInputs;
use super::types::{TokenType, TransactionType};
use super::verification::TransactionError;
use crate::commitment::EncryptedSecrets;
use crate::config::{
    COMMITMENTS_PER_TX, COMPRESSED_SECRETS_LENGTH, NULLIFIERS_PER_TX, PROOF_LENGTH, WORD_BYTES,
};
use crate::crypto::keccak256;
use crate::field::Word;

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A rollup transaction.
///
/// `transaction_type` stays a raw byte so that a transaction of unknown type
/// can still be parsed and then rejected with the right error code.
///
/// # Hash encoding
///
/// `transaction_hash` is keccak-256 over the concatenation of 32-byte
/// big-endian words, in field order:
///
/// ```text
/// value, historicRootBlockNumberL2, transactionType, tokenType,
/// publicInputHash, tokenId, ercAddress, recipientAddress,
/// len(commitments), commitments..., len(nullifiers), nullifiers...,
/// len(compressedSecrets), compressedSecrets..., len(proof), proof...
/// ```
///
/// The hash field itself is excluded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub value: Word,
    #[serde(rename = "historicRootBlockNumberL2")]
    pub historic_root_block_number_l2: u64,
    pub transaction_type: u8,
    pub token_type: TokenType,
    pub public_input_hash: Word,
    pub token_id: Word,
    pub erc_address: Word,
    pub recipient_address: Word,
    pub commitments: Vec<Word>,
    pub nullifiers: Vec<Word>,
    pub compressed_secrets: Vec<Word>,
    pub proof: Vec<Word>,
    pub transaction_hash: Word,
}

impl Default for Transaction {
    fn default() -> Self {
        Self {
            value: Word::ZERO,
            historic_root_block_number_l2: 0,
            transaction_type: TransactionType::Deposit.as_u8(),
            token_type: TokenType::Erc20,
            public_input_hash: Word::ZERO,
            token_id: Word::ZERO,
            erc_address: Word::ZERO,
            recipient_address: Word::ZERO,
            commitments: vec![Word::ZERO; COMMITMENTS_PER_TX],
            nullifiers: vec![Word::ZERO; NULLIFIERS_PER_TX],
            compressed_secrets: vec![Word::ZERO; COMPRESSED_SECRETS_LENGTH],
            proof: vec![Word::ZERO; PROOF_LENGTH],
            transaction_hash: Word::ZERO,
        }
    }
}

impl Transaction {
    /// The canonical byte string the transaction hash is taken over.
    pub fn hash_preimage(&self) -> Vec<u8> {
        let vectors = [
            &self.commitments,
            &self.nullifiers,
            &self.compressed_secrets,
            &self.proof,
        ];
        let words = 8 + vectors.iter().map(|v| v.len() + 1).sum::<usize>();
        let mut buf = Vec::with_capacity(words * WORD_BYTES);

        for word in [
            self.value,
            Word::from_u64(self.historic_root_block_number_l2),
            Word::from_u64(u64::from(self.transaction_type)),
            Word::from_u64(u64::from(self.token_type.as_u8())),
            self.public_input_hash,
            self.token_id,
            self.erc_address,
            self.recipient_address,
        ] {
            buf.extend_from_slice(word.as_bytes());
        }
        for vector in vectors {
            buf.extend_from_slice(Word::from_u64(vector.len() as u64).as_bytes());
            for word in vector.iter() {
                buf.extend_from_slice(word.as_bytes());
            }
        }
        buf
    }

    /// Recompute the transaction hash from the current field values.
    pub fn compute_hash(&self) -> Word {
        Word::from_be_bytes(keccak256(&self.hash_preimage()))
    }

    /// Whether `transaction_hash` matches the field values.
    pub fn check_hash(&self) -> bool {
        self.compute_hash() == self.transaction_hash
    }

    /// The declared type, if it is one we know.
    pub fn kind(&self) -> Option<TransactionType> {
        TransactionType::try_from(self.transaction_type).ok()
    }

    /// Non-zero commitments, in order.
    pub fn non_zero_commitments(&self) -> Vec<Word> {
        self.commitments
            .iter()
            .copied()
            .filter(|c| !c.is_zero())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Transaction`].
///
/// Anything not set stays zero. `build()` computes the transaction hash last,
/// so the result always passes the hash check.
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    tx: Transaction,
    historic_root: Option<Word>,
}

impl TransactionBuilder {
    pub fn new(transaction_type: TransactionType) -> Self {
        Self::raw(transaction_type.as_u8())
    }

    /// A builder for an arbitrary type byte, including unknown ones.
    pub fn raw(transaction_type: u8) -> Self {
        Self {
            tx: Transaction {
                transaction_type,
                ..Transaction::default()
            },
            historic_root: None,
        }
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.tx.transaction_type = transaction_type.as_u8();
        self
    }

    pub fn value(mut self, value: Word) -> Self {
        self.tx.value = value;
        self
    }

    pub fn token_type(mut self, token_type: TokenType) -> Self {
        self.tx.token_type = token_type;
        self
    }

    pub fn token_id(mut self, token_id: Word) -> Self {
        self.tx.token_id = token_id;
        self
    }

    pub fn erc_address(mut self, erc_address: Word) -> Self {
        self.tx.erc_address = erc_address;
        self
    }

    pub fn recipient_address(mut self, recipient_address: Word) -> Self {
        self.tx.recipient_address = recipient_address;
        self
    }

    pub fn commitments(mut self, commitments: Vec<Word>) -> Self {
        self.tx.commitments = commitments;
        self
    }

    pub fn nullifiers(mut self, nullifiers: Vec<Word>) -> Self {
        self.tx.nullifiers = nullifiers;
        self
    }

    pub fn compressed_secrets(mut self, secrets: Vec<Word>) -> Self {
        self.tx.compressed_secrets = secrets;
        self
    }

    /// Write a commitment's encrypted secrets in the client layout: the
    /// ephemeral key over `recipientAddress`, the ciphertexts over
    /// `ercAddress`, `tokenId` and the first two compressed secrets.
    ///
    /// Both hashes are taken in `build()`, so they cover the ciphertexts.
    pub fn encrypted_secrets(mut self, secrets: &EncryptedSecrets) -> Self {
        secrets.write_into(&mut self.tx);
        self
    }

    pub fn proof(mut self, proof: Vec<Word>) -> Self {
        self.tx.proof = proof;
        self
    }

    pub fn historic_root_block_number_l2(mut self, block_number: u64) -> Self {
        self.tx.historic_root_block_number_l2 = block_number;
        self
    }

    /// Set the public input hash explicitly.
    pub fn public_input_hash(mut self, hash: Word) -> Self {
        self.tx.public_input_hash = hash;
        self.historic_root = None;
        self
    }

    /// Derive the public input hash at build time, using `root` as the
    /// resolved historic root. Deposits ignore the root.
    pub fn derive_public_input_hash(mut self, root: Word) -> Self {
        self.historic_root = Some(root);
        self
    }

    /// Finish: derive the public input hash if requested, then the
    /// transaction hash.
    pub fn build(self) -> Transaction {
        let mut tx = self.tx;
        if let Some(root) = self.historic_root {
            if let Some(inputs) = PublicInputs::for_transaction(&tx, root) {
                tx.public_input_hash = inputs.hash();
            }
        }
        tx.transaction_hash = tx.compute_hash();
        tx
    }

    /// [`build`](Self::build), then run the type consistency rules.
    pub fn build_validated(self) -> Result<(Transaction, TransactionKind), TransactionError> {
        let tx = self.build();
        let kind = classify(&tx)?;
        Ok((tx, kind))
    }
}
