//! End-to-end: senders encrypt commitment secrets into transfers, and the
//! recipient's sync finds exactly the commitments addressed to its keys.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;

use twilight_protocol::commitment::{
    client_commitment_sync, decrypt_commitment, encrypt_secrets, Commitment,
};
use twilight_protocol::crypto::{WalletKey, ZkpKeys};
use twilight_protocol::field::{Scalar, Word};
use twilight_protocol::storage::{CommitmentStore, MemoryStore};
use twilight_protocol::transaction::{Transaction, TransactionBuilder, TransactionType};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn wallet(seed: u8) -> ZkpKeys {
    ZkpKeys::from_root_key([seed; 32]).unwrap()
}

fn commitment_to(owner: &ZkpKeys, token_id: Word, value: u64, rng: &mut StdRng) -> Commitment {
    Commitment::new(
        Word::from_hex("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48").unwrap(),
        token_id,
        Word::from_u64(value),
        owner.pkd,
        Commitment::random_salt(rng),
    )
}

/// A single transfer paying `commitment`, secrets in the client layout.
fn transfer(commitment: &Commitment, rng: &mut StdRng) -> Transaction {
    let tx = TransactionBuilder::new(TransactionType::SingleTransfer)
        .commitments(vec![commitment.hash, Word::ZERO])
        .nullifiers(vec![Word::from_u64(0x11), Word::ZERO])
        .encrypted_secrets(&encrypt_secrets(commitment, rng).unwrap())
        .build();
    assert!(tx.check_hash());
    tx
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn each_wallet_finds_only_its_own_commitments() {
    let mut rng = StdRng::seed_from_u64(1);
    let alice = wallet(1);
    let bob = wallet(2);

    let to_alice: Vec<Commitment> = (0..3)
        .map(|i| commitment_to(&alice, Word::ZERO, 10 + i, &mut rng))
        .collect();
    let to_bob = commitment_to(&bob, Word::from_u64(42), 7, &mut rng);

    let alice_store = MemoryStore::new();
    let bob_store = MemoryStore::new();
    for c in to_alice.iter().chain(std::iter::once(&to_bob)) {
        let tx = transfer(c, &mut rng);
        alice_store.insert_transaction(tx.clone());
        bob_store.insert_transaction(tx);
    }

    let stored = client_commitment_sync(&alice_store, &[alice.wallet_key()])
        .await
        .unwrap();
    assert_eq!(stored, 3);
    for c in &to_alice {
        let found = alice_store.commitment(&c.hash).unwrap();
        assert_eq!(found.commitment, *c);
        assert_eq!(found.nsk, alice.nsk);
    }
    assert!(alice_store.commitment(&to_bob.hash).is_none());

    let stored = client_commitment_sync(&bob_store, &[bob.wallet_key()])
        .await
        .unwrap();
    assert_eq!(stored, 1);
    let found = bob_store.commitment(&to_bob.hash).unwrap();
    assert_eq!(found.commitment.token_id, Word::from_u64(42));
}

#[tokio::test]
async fn wide_token_ids_survive_packing() {
    let mut rng = StdRng::seed_from_u64(2);
    let owner = wallet(3);
    let token_id =
        Word::from_hex("0xdeadbeef00000000000000000000000000000000000000000000000000000001")
            .unwrap();
    let c = commitment_to(&owner, token_id, 1, &mut rng);

    let store = MemoryStore::new();
    store.insert_transaction(transfer(&c, &mut rng));
    assert_eq!(client_commitment_sync(&store, &[owner.wallet_key()]).await.unwrap(), 1);
    assert_eq!(store.commitment(&c.hash).unwrap().commitment.token_id, token_id);
}

#[tokio::test]
async fn many_keys_many_transactions() {
    let mut rng = StdRng::seed_from_u64(3);
    let wallets: Vec<ZkpKeys> = (10..14).map(wallet).collect();
    let keys: Vec<WalletKey> = wallets.iter().map(ZkpKeys::wallet_key).collect();

    let store = MemoryStore::new();
    for (i, owner) in wallets.iter().enumerate() {
        let c = commitment_to(owner, Word::ZERO, i as u64, &mut rng);
        store.insert_transaction(transfer(&c, &mut rng));
    }
    // Noise: a deposit, an undecodable ephemeral key, and a withdrawal.
    store.insert_transaction(TransactionBuilder::new(TransactionType::Deposit).build());
    let junk = TransactionBuilder::new(TransactionType::SingleTransfer)
        .commitments(vec![Word::from_u64(5), Word::ZERO])
        .recipient_address(Word::from_be_bytes([0xff; 32]))
        .build();
    store.insert_transaction(junk);
    store.insert_transaction(TransactionBuilder::new(TransactionType::Withdraw).build());

    assert_eq!(client_commitment_sync(&store, &keys).await.unwrap(), 4);
    assert_eq!(store.commitment_count(), 4);
}

/// Refuses every write.
struct ReadOnly(MemoryStore);

#[async_trait]
impl CommitmentStore for ReadOnly {
    async fn store_commitment(&self, _: Commitment, _: Scalar) -> anyhow::Result<()> {
        anyhow::bail!("read-only store")
    }

    async fn all_transactions(&self) -> anyhow::Result<Vec<Transaction>> {
        self.0.all_transactions().await
    }

    async fn count_commitments(&self, hashes: &[Word]) -> anyhow::Result<usize> {
        self.0.count_commitments(hashes).await
    }
}

#[tokio::test]
async fn store_failures_do_not_abort_the_sync() {
    let mut rng = StdRng::seed_from_u64(4);
    let owner = wallet(5);
    let inner = MemoryStore::new();
    for value in 0..3 {
        let c = commitment_to(&owner, Word::ZERO, value, &mut rng);
        inner.insert_transaction(transfer(&c, &mut rng));
    }
    let store = ReadOnly(inner);

    assert_eq!(client_commitment_sync(&store, &[owner.wallet_key()]).await.unwrap(), 0);
}

#[tokio::test]
async fn decrypt_commitment_tries_every_key() {
    let mut rng = StdRng::seed_from_u64(5);
    let owner = wallet(6);
    let stranger = wallet(7);
    let c = commitment_to(&owner, Word::ZERO, 1, &mut rng);
    let tx = transfer(&c, &mut rng);

    let store = MemoryStore::new();
    let keys = [stranger.wallet_key(), owner.wallet_key()];
    assert_eq!(decrypt_commitment(&store, &tx, &keys).await, 1);
    assert_eq!(store.commitment(&c.hash).unwrap().nsk, owner.nsk);
}

#[tokio::test]
async fn sync_leaves_the_runtime_free_for_other_tasks() {
    let mut rng = StdRng::seed_from_u64(6);
    let wallets: Vec<ZkpKeys> = (20..24).map(wallet).collect();
    let keys: Vec<WalletKey> = wallets.iter().map(ZkpKeys::wallet_key).collect();

    let store = MemoryStore::new();
    for i in 0..12u64 {
        let owner = &wallets[i as usize % wallets.len()];
        let c = commitment_to(owner, Word::ZERO, i, &mut rng);
        store.insert_transaction(transfer(&c, &mut rng));
    }

    // The test runtime is single threaded: the sibling only runs if the
    // sync yields while it decrypts.
    let finished = Arc::new(AtomicBool::new(false));
    let sibling = tokio::spawn({
        let finished = Arc::clone(&finished);
        async move { !finished.load(Ordering::SeqCst) }
    });

    assert_eq!(client_commitment_sync(&store, &keys).await.unwrap(), 12);
    finished.store(true, Ordering::SeqCst);

    assert!(sibling.await.unwrap(), "sibling task starved until the sync finished");
}
