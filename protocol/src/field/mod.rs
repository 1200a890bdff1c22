//! # Field Arithmetic
//!
//! Fixed-width words and modular helpers shared by the curve code, the
//! KEM-DEM cipher and the transaction checker.
//!
//! ```text
//! word.rs        Word: 256-bit big-endian wire word, limbs, hex serde
//! arithmetic.rs  mul_mod / add_mod / square_root_mod_prime / mod_divide, Fq2 helpers
//! ```
//!
//! The concrete fields are arkworks types:
//!
//! - `ark_bn254::Fr`: modulus `BN128_GROUP_ORDER`; BabyJubjub coordinates.
//! - `ark_bn254::Fq`: modulus `BN128_PRIME_FIELD`; G1 coordinates.
//! - `ark_bn254::Fq2`: `Fq[i]/(i² + 1)`; G2 coordinates.
//! - `ark_ed_on_bn254::Fr`: BabyJubjub scalars.

pub mod arithmetic;
pub mod word;

pub use arithmetic::{
    add_mod, fq2, fq2_div, fq2_sqrt, fq2_to_words, mod_divide, mul_mod, square_root_mod_prime,
};
pub use word::{Word, WordError};

pub use ark_bn254::{Fq, Fq2, Fr};

/// BabyJubjub scalar field (prime subgroup order).
pub type Scalar = ark_ed_on_bn254::Fr;
