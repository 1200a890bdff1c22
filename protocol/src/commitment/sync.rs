//! Recipient side: find the commitments addressed to us.
//!
//! A transfer does not say who it pays. The only way to find out is to try
//! every wallet key against every transfer we have not already claimed and
//! see whether the decrypted secrets hash back to the on-chain commitment.
//! Almost every attempt fails, so failures are logged at `debug` and never
//! stop the sync.

use futures::future::join_all;
use tokio::task;
use tracing::{debug, info, warn};

use super::{Commitment, DecryptionError, PACKED_ERC_LIMB, PACKED_TOKEN_ID_LIMB};
use crate::crypto::{calculate_pkd, decrypt_words, pack_secrets, WalletKey};
use crate::curve::edwards_decompress;
use crate::field::Word;
use crate::storage::CommitmentStore;
use crate::transaction::{Transaction, TransactionType};

/// Rebuild the commitment `tx` pays to `key`, if it pays to `key` at all.
///
/// Ciphertexts are read from the client layout: the ephemeral key in
/// `recipientAddress`, then `ercAddress`, `tokenId` and the compressed
/// secrets.
pub fn try_decrypt(tx: &Transaction, key: &WalletKey) -> Result<Commitment, DecryptionError> {
    let target = *tx
        .non_zero_commitments()
        .first()
        .ok_or(DecryptionError::NoCommitment)?;

    let ephemeral_pub = edwards_decompress(&tx.recipient_address)?;
    let mut ciphertexts = vec![tx.erc_address, tx.token_id];
    ciphertexts.extend_from_slice(&tx.compressed_secrets);
    let plain = decrypt_words(&key.ivk, &ephemeral_pub, &ciphertexts)?;

    let &[packed_erc, packed_token_id, value, salt, ..] = plain.as_slice() else {
        return Err(DecryptionError::MissingSecrets(plain.len()));
    };
    let (erc_address, token_id) = pack_secrets(
        &packed_erc,
        &packed_token_id,
        Some(PACKED_ERC_LIMB),
        Some(PACKED_TOKEN_ID_LIMB),
    )?;

    let (pkd, _) = calculate_pkd(&key.ivk)?;
    let commitment = Commitment::new(erc_address, token_id, value, pkd, salt);
    if commitment.hash == target {
        Ok(commitment)
    } else {
        Err(DecryptionError::Mismatch)
    }
}

/// Every key `tx` decrypts under, with the commitment it yields.
fn decrypt_with_keys(tx: &Transaction, keys: &[WalletKey]) -> Vec<(Commitment, WalletKey)> {
    keys.iter()
        .filter_map(|key| match try_decrypt(tx, key) {
            Ok(commitment) => Some((commitment, *key)),
            Err(e) => {
                debug!(hash = %tx.transaction_hash, error = %e, "not ours");
                None
            }
        })
        .collect()
}

/// Try every key against `tx` and store what decrypts.
///
/// The decryption attempts are curve and MiMC work, so they run on the
/// blocking pool rather than the calling task. Returns the number of
/// commitments stored.
pub async fn decrypt_commitment<S>(store: &S, tx: &Transaction, keys: &[WalletKey]) -> usize
where
    S: CommitmentStore + ?Sized,
{
    let owned_tx = tx.clone();
    let owned_keys = keys.to_vec();
    let found =
        match task::spawn_blocking(move || decrypt_with_keys(&owned_tx, &owned_keys)).await {
            Ok(found) => found,
            Err(e) => {
                warn!(hash = %tx.transaction_hash, error = %e, "decryption task failed");
                return 0;
            }
        };

    let mut stored = 0;
    for (commitment, key) in found {
        let hash = commitment.hash;
        match store.store_commitment(commitment, key.nsk).await {
            Ok(()) => {
                info!(commitment = %hash, "stored decrypted commitment");
                stored += 1;
            }
            Err(e) => warn!(commitment = %hash, error = %e, "failed to store commitment"),
        }
    }
    stored
}

fn is_transfer(tx: &Transaction) -> bool {
    matches!(
        tx.kind(),
        Some(TransactionType::SingleTransfer | TransactionType::DoubleTransfer)
    )
}

async fn unclaimed<S>(store: &S, tx: &Transaction) -> bool
where
    S: CommitmentStore + ?Sized,
{
    let commitments: Vec<Word> = tx.non_zero_commitments();
    if commitments.is_empty() {
        return false;
    }
    match store.count_commitments(&commitments).await {
        Ok(count) => count == 0,
        Err(e) => {
            warn!(hash = %tx.transaction_hash, error = %e, "failed to count commitments");
            false
        }
    }
}

/// Scan every stored transfer whose commitments we do not hold yet and
/// try to decrypt it with each key. Each transaction's attempts run as
/// their own blocking task, so transactions decrypt in parallel and the
/// runtime stays free for other work.
///
/// Returns the number of commitments stored. Fails only if the transaction
/// list itself cannot be read.
pub async fn client_commitment_sync<S>(store: &S, keys: &[WalletKey]) -> anyhow::Result<usize>
where
    S: CommitmentStore + ?Sized,
{
    let transactions = store.all_transactions().await?;
    let total = transactions.len();

    let attempts = transactions
        .iter()
        .filter(|tx| is_transfer(tx))
        .map(|tx| async move {
            if unclaimed(store, tx).await {
                decrypt_commitment(store, tx, keys).await
            } else {
                0
            }
        });
    let stored: usize = join_all(attempts).await.into_iter().sum();

    info!(transactions = total, stored, "commitment sync finished");
    Ok(stored)
}
