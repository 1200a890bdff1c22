//! # Hashing
//!
//! Three hash functions, each with exactly one job:
//!
//! - **MiMC**: the algebraic hash the circuits use. Commitments, the KEM
//!   key derivation, the DEM stream and the public-input hash are all MiMC
//!   over the BN254 scalar field, because anything the prover has to
//!   recompute must be cheap in R1CS.
//! - **Keccak-256**: the transaction hash, and the generator of MiMC's
//!   round constants. Same function the EVM uses.
//! - **SHA-256**: deriving wallet scalars from a root secret. Never seen by
//!   a circuit.
//!
//! ## MiMC construction
//!
//! MiMC-p/p with exponent 7 and 91 rounds, chained Miyaguchi–Preneel style:
//!
//! ```text
//! E_k(x):  for each round i:  x = (x + k + c_i)^7      then  x + k
//! H(m_1..m_n):  r = 0;  r = r + m_j + E_r(m_j)   for each j
//! ```
//!
//! The round constants are a keccak chain: `c_0 = keccak(keccak("mimc"))`,
//! `c_{i+1} = keccak(c_i)`, each reduced into the field.

use std::sync::OnceLock;

use ark_bn254::Fr;
use ark_ff::{Field, PrimeField, Zero};
use sha2::{Digest, Sha256};
use sha3::Keccak256;

use crate::config::{MIMC_ROUNDS, MIMC_SEED};
use crate::field::{Scalar, Word};

/// Keccak-256 of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 of `data`.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Map `data` to a BabyJubjub scalar under a domain tag.
///
/// `SHA-256(domain || data)`, reduced modulo the subgroup order.
pub fn hash_to_scalar(domain: &[u8], data: &[u8]) -> Scalar {
    let mut hasher = Sha256::new();
    hasher.update(domain);
    hasher.update(data);
    Scalar::from_be_bytes_mod_order(&hasher.finalize())
}

// ---------------------------------------------------------------------------
// MiMC
// ---------------------------------------------------------------------------

fn round_constants() -> &'static [Fr] {
    static CONSTANTS: OnceLock<Vec<Fr>> = OnceLock::new();
    CONSTANTS.get_or_init(|| {
        let mut c = keccak256(MIMC_SEED);
        (0..MIMC_ROUNDS)
            .map(|_| {
                c = keccak256(&c);
                Fr::from_be_bytes_mod_order(&c)
            })
            .collect()
    })
}

/// The keyed permutation `E_k(x)`.
fn mimc_encrypt(x: Fr, k: Fr) -> Fr {
    let mut x = x;
    for c in round_constants() {
        x = (x + k + c).pow([7u64]);
    }
    x + k
}

/// MiMC over field elements. The empty message hashes to zero.
pub fn mimc_hash(inputs: &[Fr]) -> Fr {
    inputs.iter().fold(Fr::zero(), |r, m| r + m + mimc_encrypt(*m, r))
}

/// MiMC over wire words. Each word is reduced into the field first.
pub fn mimc_hash_words(inputs: &[Word]) -> Word {
    let inputs: Vec<Fr> = inputs.iter().map(Word::to_field_reduced::<Fr>).collect();
    Word::from_field(&mimc_hash(&inputs))
}
