//! GM17 proof objects and their flat and compressed forms.
//!
//! ```text
//! object      { a: G1, b: G2, c: G1 }
//! flat        [a.x, a.y, b.x.re, b.x.im, b.y.re, b.y.im, c.x, c.y]
//! compressed  [a, b.re, b.im, c]
//! ```
//!
//! Transactions carry the flat form. The compressed form is what goes on
//! chain; the object form is what the verifier service accepts.

use ark_bn254::{G1Affine, G2Affine};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use serde::{Deserialize, Serialize};

use super::compression::{
    compress_g1, compress_g2, decompress_g1, decompress_g2, g1_from_words, g1_to_words,
    g2_from_words, g2_to_words, CompressionError,
};
use crate::config::{COMPRESSED_PROOF_LENGTH, PROOF_LENGTH};
use crate::field::Word;

/// A proof as three curve points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, CanonicalSerialize, CanonicalDeserialize)]
pub struct Proof {
    pub a: G1Affine,
    pub b: G2Affine,
    pub c: G1Affine,
}

impl Proof {
    /// Parse the 8-word flat form. Every point is checked against its curve.
    pub fn from_flat(flat: &[Word]) -> Result<Self, CompressionError> {
        let flat: &[Word; PROOF_LENGTH] =
            flat.try_into().map_err(|_| CompressionError::InvalidProofLength {
                expected: PROOF_LENGTH,
                actual: flat.len(),
            })?;
        Ok(Self {
            a: g1_from_words(&flat[0], &flat[1])?,
            b: g2_from_words(&[flat[2], flat[3], flat[4], flat[5]])?,
            c: g1_from_words(&flat[6], &flat[7])?,
        })
    }

    pub fn to_flat(&self) -> [Word; PROOF_LENGTH] {
        let [ax, ay] = g1_to_words(&self.a);
        let [bxr, bxi, byr, byi] = g2_to_words(&self.b);
        let [cx, cy] = g1_to_words(&self.c);
        [ax, ay, bxr, bxi, byr, byi, cx, cy]
    }

    pub fn compress(&self) -> [Word; COMPRESSED_PROOF_LENGTH] {
        compress_proof(self)
    }

    pub fn decompress(words: &[Word; COMPRESSED_PROOF_LENGTH]) -> Result<Self, CompressionError> {
        let [a, b_re, b_im, c] = words;
        Ok(Self {
            a: decompress_g1(a)?,
            b: decompress_g2(&[*b_re, *b_im])?,
            c: decompress_g1(c)?,
        })
    }

    /// The nested hex form the verifier service expects.
    pub fn to_object(&self) -> ProofObject {
        let flat = self.to_flat();
        ProofObject {
            a: [flat[0], flat[1]],
            b: [[flat[2], flat[3]], [flat[4], flat[5]]],
            c: [flat[6], flat[7]],
        }
    }

    /// Compact binary encoding via `ark-serialize`.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.serialize_compressed(&mut buf)
            .expect("serialization into a Vec cannot fail");
        buf
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, ark_serialize::SerializationError> {
        Self::deserialize_compressed(data)
    }
}

/// `{ a: [x, y], b: [[x.re, x.im], [y.re, y.im]], c: [x, y] }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofObject {
    pub a: [Word; 2],
    pub b: [[Word; 2]; 2],
    pub c: [Word; 2],
}

impl ProofObject {
    /// Reshape a flat proof without touching the curve. Only the length is
    /// checked; whether the points are valid is the verifier's call.
    pub fn from_flat(flat: &[Word]) -> Result<Self, CompressionError> {
        match flat {
            [ax, ay, bxr, bxi, byr, byi, cx, cy] => Ok(Self {
                a: [*ax, *ay],
                b: [[*bxr, *bxi], [*byr, *byi]],
                c: [*cx, *cy],
            }),
            _ => Err(CompressionError::InvalidProofLength {
                expected: PROOF_LENGTH,
                actual: flat.len(),
            }),
        }
    }
}

/// `[a, b.re, b.im, c]`
pub fn compress_proof(proof: &Proof) -> [Word; COMPRESSED_PROOF_LENGTH] {
    let [b_re, b_im] = compress_g2(&proof.b);
    [compress_g1(&proof.a), b_re, b_im, compress_g1(&proof.c)]
}

/// Compress a proof given in flat form. Anything but 8 words is rejected.
pub fn compress_flat_proof(
    flat: &[Word],
) -> Result<[Word; COMPRESSED_PROOF_LENGTH], CompressionError> {
    Ok(compress_proof(&Proof::from_flat(flat)?))
}

/// Expand a compressed proof straight into the flat form.
pub fn decompress_proof(
    compressed: &[Word; COMPRESSED_PROOF_LENGTH],
) -> Result<[Word; PROOF_LENGTH], CompressionError> {
    Ok(Proof::decompress(compressed)?.to_flat())
}
