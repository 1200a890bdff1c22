//! # Wallet Keys
//!
//! A wallet holds three secret scalars on BabyJubjub:
//!
//! - `ask`: spending key. Authorizes spends inside the circuit.
//! - `nsk`: nullifier key. Derives the nullifier revealed on spend.
//! - `ivk`: incoming viewing key. `MiMC(ask·G, nsk·G)`, reduced into the
//!   scalar field. Enough to detect and decrypt incoming commitments, not
//!   enough to spend them.
//!
//! The public side is `pkd = ivk·G`, published compressed as
//! `compressed_pkd`. Senders encrypt to `pkd`; the sync decrypts with `ivk`.
//!
//! `ask` and `nsk` are derived from a 32-byte root key with domain-separated
//! SHA-256, so a wallet is fully recoverable from its root key.
//!
//! Secrets are never printed. `Debug` shows the public key only.

use std::fmt;

use ark_bn254::Fr;
use rand::{CryptoRng, RngCore};

use super::hash::{hash_to_scalar, mimc_hash};
use crate::config::{GENERATOR, ZKP_KEY_LENGTH};
use crate::curve::{edwards_compress, scalar_mult, CurveError, EdwardsPoint};
use crate::field::{Scalar, Word};

const ASK_DOMAIN: &[u8] = b"twilight/ask";
const NSK_DOMAIN: &[u8] = b"twilight/nsk";

/// The keys the commitment sync needs: detect with `ivk`, remember `nsk`
/// so the commitment can be spent later.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct WalletKey {
    pub ivk: Scalar,
    pub nsk: Scalar,
}

impl fmt::Debug for WalletKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("WalletKey(..)")
    }
}

/// A complete wallet key bundle.
#[derive(Clone)]
pub struct ZkpKeys {
    root_key: [u8; ZKP_KEY_LENGTH],
    pub ask: Scalar,
    pub nsk: Scalar,
    pub ivk: Scalar,
    pub pkd: EdwardsPoint,
    pub compressed_pkd: Word,
}

impl ZkpKeys {
    /// Fresh keys from a random root key.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, CurveError> {
        let mut root_key = [0u8; ZKP_KEY_LENGTH];
        rng.fill_bytes(&mut root_key);
        Self::from_root_key(root_key)
    }

    /// Deterministically rebuild the bundle from its root key.
    pub fn from_root_key(root_key: [u8; ZKP_KEY_LENGTH]) -> Result<Self, CurveError> {
        let ask = hash_to_scalar(ASK_DOMAIN, &root_key);
        let nsk = hash_to_scalar(NSK_DOMAIN, &root_key);
        let ivk = derive_ivk(&ask, &nsk)?;
        let (pkd, compressed_pkd) = calculate_pkd(&ivk)?;
        Ok(Self {
            root_key,
            ask,
            nsk,
            ivk,
            pkd,
            compressed_pkd,
        })
    }

    pub fn root_key(&self) -> &[u8; ZKP_KEY_LENGTH] {
        &self.root_key
    }

    pub fn wallet_key(&self) -> WalletKey {
        WalletKey {
            ivk: self.ivk,
            nsk: self.nsk,
        }
    }
}

impl fmt::Debug for ZkpKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZkpKeys")
            .field("compressed_pkd", &self.compressed_pkd)
            .finish_non_exhaustive()
    }
}

/// `ivk = MiMC(ak.u, ak.v, nk.u, nk.v) mod l` with `ak = ask·G`, `nk = nsk·G`.
pub fn derive_ivk(ask: &Scalar, nsk: &Scalar) -> Result<Scalar, CurveError> {
    let ak = scalar_mult(ask, &GENERATOR)?;
    let nk = scalar_mult(nsk, &GENERATOR)?;
    let digest: Fr = mimc_hash(&[ak.u, ak.v, nk.u, nk.v]);
    Ok(Word::from_field(&digest).to_field_reduced::<Scalar>())
}

/// `pkd = ivk·G` and its compressed form.
pub fn calculate_pkd(ivk: &Scalar) -> Result<(EdwardsPoint, Word), CurveError> {
    let pkd = scalar_mult(ivk, &GENERATOR)?;
    Ok((pkd, edwards_compress(&pkd)))
}
