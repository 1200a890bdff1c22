//! # BabyJubjub
//!
//! The twisted Edwards curve `a·u² + v² = 1 + d·u²·v²` over the BN254 scalar
//! field, with `a = 168700` and `d = 168696`. Wallet keys, ephemeral KEM keys
//! and commitment owners are all points on this curve.
//!
//! The group law is the textbook Edwards formula. It is complete on this
//! curve (`a` is a square, `d` is not), so the denominators of a sum of two
//! genuine points never vanish. We still refuse to return anything that
//! fails the curve equation: an off-curve point here means corrupted input
//! or a broken implementation, and either way it must not reach a
//! commitment.
//!
//! ## Compression
//!
//! A point packs into one word: the low 255 bits hold `v`, the top bit holds
//! the parity of `u`. This is the form carried on chain as `compressedPkd`
//! and as the ephemeral key in `recipientAddress`.

use ark_bn254::Fr;
use ark_ff::{BigInteger, Field, One, PrimeField, Zero};
use thiserror::Error;

use crate::config::{GENERATOR, INFINITY, JUBJUB_A, JUBJUB_D};
use crate::field::{mod_divide, square_root_mod_prime, Scalar, Word};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CurveError {
    /// The result of a group operation fails the curve equation.
    #[error("point is not on the babyjubjub curve")]
    PointNotOnCurve,

    /// A denominator of the addition law was zero.
    #[error("division by zero in the addition law")]
    NonInvertible,

    /// The coordinate recovered from a compressed point has no square root.
    #[error("no curve point has this compressed coordinate")]
    NoSquareRoot,

    /// A compressed coordinate is not below the field modulus.
    #[error("coordinate {0} is not a canonical field element")]
    NonCanonical(Word),
}

// ---------------------------------------------------------------------------
// Points
// ---------------------------------------------------------------------------

/// An affine point `(u, v)` on BabyJubjub.
///
/// Fields are public so constants can be written down, but every point
/// handed out by this module has passed [`EdwardsPoint::is_on_curve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EdwardsPoint {
    pub u: Fr,
    pub v: Fr,
}

impl EdwardsPoint {
    /// Build a point, checking it against the curve equation.
    pub fn new(u: Fr, v: Fr) -> Result<Self, CurveError> {
        let point = Self { u, v };
        if point.is_on_curve() {
            Ok(point)
        } else {
            Err(CurveError::PointNotOnCurve)
        }
    }

    /// Parse `[u, v]` wire words, rejecting non-canonical coordinates and
    /// off-curve points.
    pub fn from_words(u: &Word, v: &Word) -> Result<Self, CurveError> {
        let u = u.to_field::<Fr>().ok_or(CurveError::NonCanonical(*u))?;
        let v = v.to_field::<Fr>().ok_or(CurveError::NonCanonical(*v))?;
        Self::new(u, v)
    }

    pub fn to_words(&self) -> [Word; 2] {
        [Word::from_field(&self.u), Word::from_field(&self.v)]
    }

    /// `a·u² + v² == 1 + d·u²·v²`
    pub fn is_on_curve(&self) -> bool {
        let uu = self.u.square();
        let vv = self.v.square();
        JUBJUB_A * uu + vv == Fr::one() + JUBJUB_D * uu * vv
    }

    pub fn is_infinity(&self) -> bool {
        *self == INFINITY
    }

    pub fn generator() -> Self {
        GENERATOR
    }

    pub fn infinity() -> Self {
        INFINITY
    }
}

impl Default for EdwardsPoint {
    fn default() -> Self {
        INFINITY
    }
}

// ---------------------------------------------------------------------------
// Group law
// ---------------------------------------------------------------------------

/// Edwards addition.
///
/// ```text
/// u' = (u1·v2 + v1·u2) / (1 + d·u1·u2·v1·v2)
/// v' = (v1·v2 − a·u1·u2) / (1 − d·u1·u2·v1·v2)
/// ```
pub fn add(p: &EdwardsPoint, q: &EdwardsPoint) -> Result<EdwardsPoint, CurveError> {
    let u1u2 = p.u * q.u;
    let v1v2 = p.v * q.v;
    let cross = JUBJUB_D * u1u2 * v1v2;

    let u = mod_divide(p.u * q.v + p.v * q.u, Fr::one() + cross)
        .ok_or(CurveError::NonInvertible)?;
    let v = mod_divide(v1v2 - JUBJUB_A * u1u2, Fr::one() - cross)
        .ok_or(CurveError::NonInvertible)?;

    EdwardsPoint::new(u, v)
}

/// `(u, v) ↦ (−u, v)`
pub fn negate(p: &EdwardsPoint) -> EdwardsPoint {
    EdwardsPoint { u: -p.u, v: p.v }
}

/// Double-and-add, most significant bit first. `0·P` is `INFINITY`.
pub fn scalar_mult(scalar: &Scalar, point: &EdwardsPoint) -> Result<EdwardsPoint, CurveError> {
    let bits = scalar.into_bigint().to_bits_be();
    let mut acc = INFINITY;
    for bit in bits.into_iter().skip_while(|b| !b) {
        acc = add(&acc, &acc)?;
        if bit {
            acc = add(&acc, point)?;
        }
    }
    if !acc.is_on_curve() {
        return Err(CurveError::PointNotOnCurve);
    }
    Ok(acc)
}

/// Scalar multiplication by an arbitrary 256-bit value, first reduced
/// modulo the subgroup order.
pub fn scalar_mult_raw(scalar: &Word, point: &EdwardsPoint) -> Result<EdwardsPoint, CurveError> {
    scalar_mult(&scalar.to_field_reduced::<Scalar>(), point)
}

// ---------------------------------------------------------------------------
// Compression
// ---------------------------------------------------------------------------

/// Pack a point into a word: parity of `u` in the top bit, `v` below it.
pub fn edwards_compress(point: &EdwardsPoint) -> Word {
    let parity = point.u.into_bigint().is_odd();
    Word::from_field(&point.v).with_top_bit(parity)
}

/// Recover a point from [`edwards_compress`] output.
///
/// `u² = (1 − v²) / (a − d·v²)`, with the root whose parity matches the
/// stored bit.
pub fn edwards_decompress(word: &Word) -> Result<EdwardsPoint, CurveError> {
    let parity = word.top_bit();
    let v_word = word.without_top_bit();
    let v = v_word
        .to_field::<Fr>()
        .ok_or(CurveError::NonCanonical(v_word))?;

    let vv = v.square();
    let uu = mod_divide(Fr::one() - vv, JUBJUB_A - JUBJUB_D * vv)
        .ok_or(CurveError::NonInvertible)?;
    let mut u = square_root_mod_prime(&uu).ok_or(CurveError::NoSquareRoot)?;
    if u.into_bigint().is_odd() != parity {
        u = -u;
    }
    // u = 0 has only the even root, so a set parity bit is unreachable.
    if u.is_zero() && parity {
        return Err(CurveError::NoSquareRoot);
    }

    EdwardsPoint::new(u, v)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ark_ff::UniformRand;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn random_point(rng: &mut StdRng) -> EdwardsPoint {
        scalar_mult(&Scalar::rand(rng), &GENERATOR).unwrap()
    }

    #[test]
    fn test_infinity_is_neutral() {
        let g = GENERATOR;
        assert_eq!(add(&g, &INFINITY).unwrap(), g);
        assert_eq!(add(&INFINITY, &g).unwrap(), g);
        assert!(INFINITY.is_infinity());
    }

    #[test]
    fn test_negation_cancels() {
        let g = GENERATOR;
        assert_eq!(add(&g, &negate(&g)).unwrap(), INFINITY);
    }

    #[test]
    fn test_scalar_mult_small_multiples() {
        let g = GENERATOR;
        assert_eq!(scalar_mult(&Scalar::zero(), &g).unwrap(), INFINITY);
        assert_eq!(scalar_mult(&Scalar::one(), &g).unwrap(), g);
        let two_g = add(&g, &g).unwrap();
        assert_eq!(scalar_mult(&Scalar::from(2u64), &g).unwrap(), two_g);
        let three_g = add(&two_g, &g).unwrap();
        assert_eq!(scalar_mult(&Scalar::from(3u64), &g).unwrap(), three_g);
    }

    #[test]
    fn test_generator_has_subgroup_order() {
        // l·G = INFINITY, so (l − 1)·G = −G.
        let minus_one = -Scalar::one();
        assert_eq!(scalar_mult(&minus_one, &GENERATOR).unwrap(), negate(&GENERATOR));
    }

    #[test]
    fn test_scalar_mult_distributes() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = Scalar::rand(&mut rng);
        let b = Scalar::rand(&mut rng);
        let lhs = scalar_mult(&(a + b), &GENERATOR).unwrap();
        let rhs = add(
            &scalar_mult(&a, &GENERATOR).unwrap(),
            &scalar_mult(&b, &GENERATOR).unwrap(),
        )
        .unwrap();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_scalar_mult_raw_reduces() {
        // A word equal to l reduces to zero.
        let modulus = {
            let be = Scalar::MODULUS.to_bytes_be();
            let mut bytes = [0u8; 32];
            bytes.copy_from_slice(&be);
            Word::from_be_bytes(bytes)
        };
        assert_eq!(scalar_mult_raw(&modulus, &GENERATOR).unwrap(), INFINITY);
        assert_eq!(
            scalar_mult_raw(&Word::from_u64(5), &GENERATOR).unwrap(),
            scalar_mult(&Scalar::from(5u64), &GENERATOR).unwrap()
        );
    }

    #[test]
    fn test_off_curve_input_is_rejected() {
        let bogus = EdwardsPoint {
            u: Fr::from(1u64),
            v: Fr::from(1u64),
        };
        assert!(!bogus.is_on_curve());
        assert_eq!(
            EdwardsPoint::new(bogus.u, bogus.v),
            Err(CurveError::PointNotOnCurve)
        );
        assert!(add(&bogus, &GENERATOR).is_err());
    }

    #[test]
    fn test_compress_round_trip() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..8 {
            let p = random_point(&mut rng);
            let word = edwards_compress(&p);
            assert_eq!(edwards_decompress(&word).unwrap(), p);
        }
        assert_eq!(edwards_decompress(&edwards_compress(&INFINITY)).unwrap(), INFINITY);
    }

    #[test]
    fn test_compress_layout() {
        let g = GENERATOR;
        let word = edwards_compress(&g);
        assert_eq!(word.without_top_bit(), Word::from_field(&g.v));
        assert_eq!(word.top_bit(), g.u.into_bigint().is_odd());
    }

    #[test]
    fn test_decompress_rejects_non_canonical() {
        let too_big = Word::from_be_bytes([0x7f; 32]);
        assert!(matches!(
            edwards_decompress(&too_big),
            Err(CurveError::NonCanonical(_))
        ));
    }

    #[test]
    fn test_words_round_trip() {
        let [u, v] = GENERATOR.to_words();
        assert_eq!(EdwardsPoint::from_words(&u, &v).unwrap(), GENERATOR);
        assert!(EdwardsPoint::from_words(&v, &u).is_err());
    }
}
