//! # Cryptographic Primitives
//!
//! Everything here is a pure function of its inputs: no I/O, no shared
//! state, safe to call from any number of tasks at once.
//!
//! - **hash**: MiMC over the BN254 scalar field, keccak-256, SHA-256.
//! - **kem_dem**: the hybrid cipher that hides commitment secrets.
//! - **packing**: limb shuffling so oversized plaintexts fit a field slot.
//! - **keys**: wallet key bundle (`ask`, `nsk`, `ivk`, `pkd`).
//!
//! ## A note on the DEM
//!
//! It has no authentication tag. Decrypting under the wrong key returns
//! plausible-looking field elements. If you consume decrypted secrets
//! without recomputing the commitment hash, you will eventually credit a
//! wallet with garbage.

pub mod hash;
pub mod kem_dem;
pub mod keys;
pub mod packing;

pub use hash::{hash_to_scalar, keccak256, mimc_hash, mimc_hash_words, sha256};
pub use kem_dem::{
    de_dem, decrypt, decrypt_words, dem, encrypt, gen_ephemeral_keys, kem, KemDemError,
};
pub use keys::{calculate_pkd, derive_ivk, WalletKey, ZkpKeys};
pub use packing::{immutable_splice, pack_secrets, PackingError};
