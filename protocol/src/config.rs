//! # Protocol Configuration & Constants
//!
//! Every magic number in the rollup core lives here. The curve parameters
//! and domain separators are baked into circuits that are already deployed,
//! so changing any of them silently breaks proof verification and strands
//! every encrypted commitment on chain. Treat this file as append-only.
//!
//! Two primes are in play:
//!
//! - `BN128_GROUP_ORDER` (`r`): the BN254 scalar field. BabyJubjub is
//!   defined over this field, and it is the modulus of the KEM-DEM stream.
//! - `BN128_PRIME_FIELD` (`q`): the BN254 base field, where the G1/G2
//!   coordinates of a proof live.
//!
//! The runtime knobs for the validity checker are in [`CheckerConfig`].

use ark_bn254::Fr;
use ark_ff::MontFp;
use serde::{Deserialize, Serialize};

use crate::curve::EdwardsPoint;

// ---------------------------------------------------------------------------
// Primes
// ---------------------------------------------------------------------------

/// Order of the BN254 G1 group, i.e. the modulus of `ark_bn254::Fr`.
pub const BN128_GROUP_ORDER: &str =
    "21888242871839275222246405745257275088548364400416034343698204186575808495617";

/// Modulus of the BN254 base field, i.e. the modulus of `ark_bn254::Fq`.
pub const BN128_PRIME_FIELD: &str =
    "21888242871839275222246405745257275088696311157297823662689037894645226208583";

// ---------------------------------------------------------------------------
// BabyJubjub
// ---------------------------------------------------------------------------

/// Twisted Edwards coefficient `a` in `a·u² + v² = 1 + d·u²·v²`.
pub const JUBJUB_A: Fr = MontFp!("168700");

/// Twisted Edwards coefficient `d`.
pub const JUBJUB_D: Fr = MontFp!("168696");

/// Full curve order (cofactor times subgroup order).
pub const JUBJUB_E: &str =
    "21888242871839275222246405745257275088614511777268538073601725287587578984328";

/// Cofactor. `JUBJUB_E / JUBJUB_C` is the prime subgroup order, which is the
/// modulus of `ark_ed_on_bn254::Fr`.
pub const JUBJUB_C: u64 = 8;

/// Generator of the prime-order subgroup.
pub const GENERATOR: EdwardsPoint = EdwardsPoint {
    u: MontFp!("16540640123574156134436876038791482806971768689494387082833631921987005038935"),
    v: MontFp!("20819045374670962167435360035096875258406992893633759881276124905556507972311"),
};

/// The neutral element `(0, 1)`.
pub const INFINITY: EdwardsPoint = EdwardsPoint {
    u: MontFp!("0"),
    v: MontFp!("1"),
};

/// Length in bytes of freshly drawn private scalars.
pub const ZKP_KEY_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// KEM-DEM domain separators
// ---------------------------------------------------------------------------

/// Prefix of the MiMC preimage that turns a shared secret into a key.
pub const DOMAIN_KEM: Fr =
    MontFp!("21033365405711675223813179268586447041622169155539365736392974498519442361181");

/// Prefix of the MiMC preimage that expands a key into the DEM stream.
pub const DOMAIN_DEM: Fr =
    MontFp!("1241463701002173366467794894814691939898321302682516549591039420117995599097");

// ---------------------------------------------------------------------------
// MiMC
// ---------------------------------------------------------------------------

/// Rounds of the MiMC-p/p permutation (exponent 7 over the BN254 scalar field).
pub const MIMC_ROUNDS: usize = 91;

/// Nothing-up-my-sleeve seed of the keccak chain producing round constants.
pub const MIMC_SEED: &[u8] = b"mimc";

// ---------------------------------------------------------------------------
// Word geometry
// ---------------------------------------------------------------------------

/// Bytes in a wire word.
pub const WORD_BYTES: usize = 32;

/// Width of a limb used by secret packing.
pub const LIMB_BITS: usize = 32;

/// Limbs per 256-bit word.
pub const LIMBS_PER_WORD: usize = 8;

// ---------------------------------------------------------------------------
// Transaction geometry
// ---------------------------------------------------------------------------

/// Commitment slots carried by every transaction.
pub const COMMITMENTS_PER_TX: usize = 2;

/// Nullifier slots carried by every transaction.
pub const NULLIFIERS_PER_TX: usize = 2;

/// Words of encrypted commitment secrets carried by every transaction.
pub const COMPRESSED_SECRETS_LENGTH: usize = 8;

/// Words in a flattened proof: `a` (2), `b` (4), `c` (2).
pub const PROOF_LENGTH: usize = 8;

/// Words in a compressed proof: `a`, `b.real`, `b.imaginary`, `c`.
pub const COMPRESSED_PROOF_LENGTH: usize = 4;

// ---------------------------------------------------------------------------
// Checker settings
// ---------------------------------------------------------------------------

/// Settings for talking to the off-chain verifier.
///
/// Defaults match a docker-compose deployment where the ZoKrates worker is
/// reachable as `worker`. Every field can be overridden from the environment
/// via [`CheckerConfig::from_env`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckerConfig {
    /// Host (and optional port) of the proof verification service.
    pub zokrates_worker_host: String,

    /// Proving scheme name forwarded verbatim to the verifier.
    pub proving_scheme: String,

    /// Backend name forwarded verbatim to the verifier.
    pub backend: String,

    /// Curve name forwarded verbatim to the verifier.
    pub curve: String,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        Self {
            zokrates_worker_host: "worker".to_string(),
            proving_scheme: "gm17".to_string(),
            backend: "libsnark".to_string(),
            curve: "bn128".to_string(),
        }
    }
}

impl CheckerConfig {
    /// Build a config from the defaults, overriding each field whose
    /// environment variable is set (`ZOKRATES_WORKER_HOST`, `PROVING_SCHEME`,
    /// `BACKEND`, `CURVE`).
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            zokrates_worker_host: lookup("ZOKRATES_WORKER_HOST")
                .unwrap_or(defaults.zokrates_worker_host),
            proving_scheme: lookup("PROVING_SCHEME").unwrap_or(defaults.proving_scheme),
            backend: lookup("BACKEND").unwrap_or(defaults.backend),
            curve: lookup("CURVE").unwrap_or(defaults.curve),
        }
    }

    /// URL of the verifier's `/verify` endpoint.
    pub fn verify_url(&self) -> String {
        format!("http://{}/verify", self.zokrates_worker_host.trim_end_matches('/'))
    }
}
