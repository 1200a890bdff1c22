//! BN254 point compression.
//!
//! A G1 point `(x, y)` with `y² = x³ + 3` is stored as one word: `x` in the
//! low 255 bits, the parity of `y` in the top bit. Both coordinates are
//! below `BN128_PRIME_FIELD < 2²⁵⁴`, so the bit is always free.
//!
//! G2 lives over `Fq2` with `y² = x³ + 3/(9+i)`. It compresses into two
//! G1-style words, one built from the real parts `(x.re, y.re)` and one
//! from the imaginary parts `(x.im, y.im)`. Each word carries its own
//! parity bit and decompression fixes each component independently, then
//! checks the curve equation.
//!
//! The point at infinity compresses to [`Word::ZERO`] in both groups.

use ark_bn254::{Fq, Fq2, G1Affine, G2Affine};
use ark_ec::short_weierstrass::SWCurveConfig;
use ark_ff::{BigInteger, Field, PrimeField};
use thiserror::Error;

use crate::field::{fq2, square_root_mod_prime, Word};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompressionError {
    #[error("coordinate {0} is not a canonical base field element")]
    NonCanonical(Word),

    #[error("no point on the curve has x = {0}")]
    NoSquareRoot(Word),

    #[error("decompressed point is not on the curve")]
    PointNotOnCurve,

    #[error("flat proof must have {expected} elements, got {actual}")]
    InvalidProofLength { expected: usize, actual: usize },
}

fn is_odd(value: &Fq) -> bool {
    value.into_bigint().is_odd()
}

fn coordinate(word: &Word) -> Result<Fq, CompressionError> {
    word.to_field::<Fq>()
        .ok_or(CompressionError::NonCanonical(*word))
}

/// Parity of `y` in the top bit, `x` below it.
fn pack(x: &Fq, y: &Fq) -> Word {
    Word::from_field(x).with_top_bit(is_odd(y))
}

/// `(parity, x)` out of a compressed word.
fn unpack(word: &Word) -> Result<(bool, Fq), CompressionError> {
    Ok((word.top_bit(), coordinate(&word.without_top_bit())?))
}

/// `p − y` when the parity of `y` disagrees with the stored bit.
fn fix_parity(y: Fq, parity: bool) -> Fq {
    if is_odd(&y) == parity {
        y
    } else {
        -y
    }
}

// ---------------------------------------------------------------------------
// G1
// ---------------------------------------------------------------------------

pub fn compress_g1(point: &G1Affine) -> Word {
    if point.infinity {
        return Word::ZERO;
    }
    pack(&point.x, &point.y)
}

pub fn decompress_g1(word: &Word) -> Result<G1Affine, CompressionError> {
    if word.is_zero() {
        return Ok(G1Affine::identity());
    }
    let (parity, x) = unpack(word)?;
    let y2 = x.square() * x + ark_bn254::g1::Config::COEFF_B;
    let y = square_root_mod_prime(&y2).ok_or(CompressionError::NoSquareRoot(*word))?;

    let point = G1Affine::new_unchecked(x, fix_parity(y, parity));
    if !point.is_on_curve() {
        return Err(CompressionError::PointNotOnCurve);
    }
    Ok(point)
}

/// `[x, y]` as words.
pub fn g1_to_words(point: &G1Affine) -> [Word; 2] {
    [Word::from_field(&point.x), Word::from_field(&point.y)]
}

/// Parse `[x, y]` words into a checked G1 point. `[0, 0]` is infinity.
pub fn g1_from_words(x: &Word, y: &Word) -> Result<G1Affine, CompressionError> {
    if x.is_zero() && y.is_zero() {
        return Ok(G1Affine::identity());
    }
    let point = G1Affine::new_unchecked(coordinate(x)?, coordinate(y)?);
    if !point.is_on_curve() {
        return Err(CompressionError::PointNotOnCurve);
    }
    Ok(point)
}

// ---------------------------------------------------------------------------
// G2
// ---------------------------------------------------------------------------

/// `[compress(x.re, y.re), compress(x.im, y.im)]`
pub fn compress_g2(point: &G2Affine) -> [Word; 2] {
    if point.infinity {
        return [Word::ZERO; 2];
    }
    [
        pack(&point.x.c0, &point.y.c0),
        pack(&point.x.c1, &point.y.c1),
    ]
}

pub fn decompress_g2(words: &[Word; 2]) -> Result<G2Affine, CompressionError> {
    if words.iter().all(Word::is_zero) {
        return Ok(G2Affine::identity());
    }
    let (parity_re, x_re) = unpack(&words[0])?;
    let (parity_im, x_im) = unpack(&words[1])?;
    let x = fq2(x_re, x_im);

    let y2 = x.square() * x + ark_bn254::g2::Config::COEFF_B;
    let y = square_root_mod_prime(&y2).ok_or(CompressionError::NoSquareRoot(words[0]))?;
    let y = fq2(fix_parity(y.c0, parity_re), fix_parity(y.c1, parity_im));

    // Flipping one component alone does not yield a root, so malformed
    // parities surface here.
    let point = G2Affine::new_unchecked(x, y);
    if !point.is_on_curve() {
        return Err(CompressionError::PointNotOnCurve);
    }
    Ok(point)
}

/// `[x.re, x.im, y.re, y.im]` as words.
pub fn g2_to_words(point: &G2Affine) -> [Word; 4] {
    [
        Word::from_field(&point.x.c0),
        Word::from_field(&point.x.c1),
        Word::from_field(&point.y.c0),
        Word::from_field(&point.y.c1),
    ]
}

/// Parse `[x.re, x.im, y.re, y.im]` into a checked G2 point.
pub fn g2_from_words(words: &[Word; 4]) -> Result<G2Affine, CompressionError> {
    if words.iter().all(Word::is_zero) {
        return Ok(G2Affine::identity());
    }
    let x = Fq2::new(coordinate(&words[0])?, coordinate(&words[1])?);
    let y = Fq2::new(coordinate(&words[2])?, coordinate(&words[3])?);
    let point = G2Affine::new_unchecked(x, y);
    if !point.is_on_curve() {
        return Err(CompressionError::PointNotOnCurve);
    }
    Ok(point)
}
