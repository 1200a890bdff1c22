//! Modular arithmetic helpers.
//!
//! The modulus is the type: `mul_mod::<Fq>` works modulo the BN254 base
//! prime, `mul_mod::<Fr>` modulo the group order. Every result is a reduced
//! arkworks field element, so there is no way to leak an unreduced
//! intermediate to the caller.

use ark_bn254::{Fq, Fq2};
use ark_ff::Field;

use super::word::Word;

/// Product of all `values`, reduced. The empty product is one.
pub fn mul_mod<F: Field>(values: &[F]) -> F {
    values.iter().product()
}

/// Sum of all `values`, reduced. The empty sum is zero.
pub fn add_mod<F: Field>(values: &[F]) -> F {
    values.iter().sum()
}

/// A square root of `value`, or `None` if it is a non-residue.
///
/// The result is deterministic but the choice between `s` and `-s` is
/// arbitrary; callers that care about the sign fix the parity afterwards.
pub fn square_root_mod_prime<F: Field>(value: &F) -> Option<F> {
    value.sqrt()
}

/// `numerator / denominator`, or `None` when the denominator is zero.
pub fn mod_divide<F: Field>(numerator: F, denominator: F) -> Option<F> {
    denominator.inverse().map(|inv| numerator * inv)
}

/// Build an `Fq2` element `real + imaginary·i`.
pub fn fq2(real: Fq, imaginary: Fq) -> Fq2 {
    Fq2::new(real, imaginary)
}

/// `numerator / denominator` in `Fq2`.
pub fn fq2_div(numerator: Fq2, denominator: Fq2) -> Option<Fq2> {
    mod_divide(numerator, denominator)
}

/// A square root in `Fq2` that has been checked to square back to `value`.
pub fn fq2_sqrt(value: &Fq2) -> Option<Fq2> {
    square_root_mod_prime(value).filter(|root| root.square() == *value)
}

/// `[real, imaginary]` as wire words.
pub fn fq2_to_words(value: &Fq2) -> [Word; 2] {
    [Word::from_field(&value.c0), Word::from_field(&value.c1)]
}
