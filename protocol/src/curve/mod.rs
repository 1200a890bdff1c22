//! # Curve Arithmetic
//!
//! Two curves, two very different jobs:
//!
//! - **BabyJubjub** (`babyjubjub.rs`): the embedded twisted Edwards curve
//!   over the BN254 scalar field. Full group law, because wallet keys and
//!   the KEM shared secret are computed on it.
//! - **BN254 G1/G2** (`compression.rs`, `proof.rs`): the pairing curve the
//!   SNARK proofs live on. We never add these points; we only squeeze them
//!   into as few words as possible and back.

pub mod babyjubjub;
pub mod compression;
pub mod proof;

pub use babyjubjub::{
    add, edwards_compress, edwards_decompress, negate, scalar_mult, scalar_mult_raw, CurveError,
    EdwardsPoint,
};
pub use compression::{
    compress_g1, compress_g2, decompress_g1, decompress_g2, g1_from_words, g1_to_words,
    g2_from_words, g2_to_words, CompressionError,
};
pub use proof::{compress_flat_proof, compress_proof, decompress_proof, Proof, ProofObject};

pub use crate::field::Scalar;
