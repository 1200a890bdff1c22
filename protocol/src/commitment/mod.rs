//! # Value Commitments
//!
//! A commitment binds a token amount to its owner without revealing either:
//!
//! ```text
//! hash = MiMC(ercAddress, tokenId, value, pkd.u, pkd.v, salt)
//! ```
//!
//! Only `hash` goes on chain. The four secrets (`ercAddress`, `tokenId`,
//! `value`, `salt`) travel KEM-DEM encrypted inside the transaction that
//! creates the commitment, so the recipient can rebuild it and later spend
//! it. See [`encrypt_secrets`] for the sender side and [`sync`] for the
//! recipient side.
//!
//! ## Ciphertext layout
//!
//! The token id's top limb is packed into limb 2 of the ERC address before
//! encryption, then the four ciphertexts land in the transaction as:
//!
//! ```text
//! recipientAddress     = compressed ephemeral public key
//! ercAddress           = c0   (packed ERC address)
//! tokenId              = c1   (token id minus its top limb)
//! compressedSecrets[0] = c2   (value)
//! compressedSecrets[1] = c3   (salt)
//! ```

pub mod sync;

use ark_bn254::Fr;
use ark_ff::PrimeField;
use rand::{CryptoRng, RngCore};
use thiserror::Error;

use crate::config::COMPRESSED_SECRETS_LENGTH;
use crate::crypto::{
    encrypt, gen_ephemeral_keys, mimc_hash_words, pack_secrets, KemDemError, PackingError,
};
use crate::curve::{edwards_compress, CurveError, EdwardsPoint};
use crate::field::Word;
use crate::transaction::Transaction;

pub use sync::{client_commitment_sync, decrypt_commitment};

/// Limb of the ERC address that carries the token id's top limb.
pub const PACKED_ERC_LIMB: usize = 2;

/// Limb of the token id moved out before encryption.
pub const PACKED_TOKEN_ID_LIMB: usize = 0;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a decryption or encryption attempt did not produce a commitment.
///
/// `Mismatch` is the everyday case during a sync: the ciphertext was for
/// somebody else.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecryptionError {
    #[error("decrypted commitment does not match the on-chain hash")]
    Mismatch,

    #[error("transaction carries no commitment")]
    NoCommitment,

    #[error("only {0} encrypted secrets, need 4")]
    MissingSecrets(usize),

    #[error(transparent)]
    Curve(#[from] CurveError),

    #[error(transparent)]
    Packing(#[from] PackingError),

    #[error(transparent)]
    KemDem(#[from] KemDemError),

    #[error("secret {0} is not a field element")]
    NonCanonical(Word),
}

// ---------------------------------------------------------------------------
// Commitment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commitment {
    pub erc_address: Word,
    pub token_id: Word,
    pub value: Word,
    pub salt: Word,
    pub pkd: EdwardsPoint,
    pub compressed_pkd: Word,
    pub hash: Word,
}

impl Commitment {
    pub fn new(
        erc_address: Word,
        token_id: Word,
        value: Word,
        pkd: EdwardsPoint,
        salt: Word,
    ) -> Self {
        let hash = mimc_hash_words(&[
            erc_address,
            token_id,
            value,
            Word::from_field(&pkd.u),
            Word::from_field(&pkd.v),
            salt,
        ]);
        Self {
            erc_address,
            token_id,
            value,
            salt,
            pkd,
            compressed_pkd: edwards_compress(&pkd),
            hash,
        }
    }

    /// A uniformly random salt below the BN254 scalar modulus.
    pub fn random_salt<R: RngCore + CryptoRng>(rng: &mut R) -> Word {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        Word::from_field(&Fr::from_be_bytes_mod_order(&bytes))
    }
}

// ---------------------------------------------------------------------------
// Sender side
// ---------------------------------------------------------------------------

/// The encrypted secrets of one commitment, ready to be written into a
/// transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptedSecrets {
    pub ephemeral_pub: EdwardsPoint,
    pub ciphertexts: [Word; 4],
}

impl EncryptedSecrets {
    /// Write the ciphertexts into `tx` using the layout in the module docs.
    ///
    /// Leaves both hashes untouched, so it is only called on a transaction
    /// still inside [`TransactionBuilder`](crate::transaction::TransactionBuilder).
    pub(crate) fn write_into(&self, tx: &mut Transaction) {
        let [erc, token_id, value, salt] = self.ciphertexts;
        if tx.compressed_secrets.len() < COMPRESSED_SECRETS_LENGTH {
            tx.compressed_secrets
                .resize(COMPRESSED_SECRETS_LENGTH, Word::ZERO);
        }
        tx.recipient_address = edwards_compress(&self.ephemeral_pub);
        tx.erc_address = erc;
        tx.token_id = token_id;
        tx.compressed_secrets[0] = value;
        tx.compressed_secrets[1] = salt;
    }
}

fn to_field(word: &Word) -> Result<Fr, DecryptionError> {
    word.to_field::<Fr>().ok_or(DecryptionError::NonCanonical(*word))
}

/// Encrypt `commitment`'s secrets to its owner under a fresh ephemeral key.
pub fn encrypt_secrets<R: RngCore + CryptoRng>(
    commitment: &Commitment,
    rng: &mut R,
) -> Result<EncryptedSecrets, DecryptionError> {
    let (token_id, erc_address) = pack_secrets(
        &commitment.token_id,
        &commitment.erc_address,
        Some(PACKED_TOKEN_ID_LIMB),
        Some(PACKED_ERC_LIMB),
    )?;
    let plaintexts = [
        to_field(&erc_address)?,
        to_field(&token_id)?,
        to_field(&commitment.value)?,
        to_field(&commitment.salt)?,
    ];

    let (ephemeral_private, ephemeral_pub) = gen_ephemeral_keys(rng)?;
    let ciphertexts = encrypt(
        &ephemeral_private,
        &ephemeral_pub,
        &commitment.pkd,
        &plaintexts,
    )?;

    let mut words = [Word::ZERO; 4];
    for (slot, c) in words.iter_mut().zip(ciphertexts.iter()) {
        *slot = Word::from_field(c);
    }
    Ok(EncryptedSecrets {
        ephemeral_pub,
        ciphertexts: words,
    })
}
