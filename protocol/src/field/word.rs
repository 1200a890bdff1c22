//! 256-bit wire words.
//!
//! Every value that crosses a process boundary (field elements, hashes,
//! compressed points, ciphertexts) travels as a 32-byte big-endian word,
//! rendered as `0x` followed by exactly 64 lower-case hex digits. `Word`
//! is that representation. It knows nothing about moduli; conversion into
//! a field is explicit via [`Word::to_field`] (canonical only) or
//! [`Word::to_field_reduced`].
//!
//! Limb access follows the packing convention: eight 32-bit limbs, index 0
//! being the most significant.

use std::fmt;
use std::str::FromStr;

use ark_ff::{BigInteger, PrimeField};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::{LIMBS_PER_WORD, WORD_BYTES};

/// Errors produced when parsing a word from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    #[error("word is longer than 64 hex digits ({0} digits)")]
    TooLong(usize),

    #[error("invalid hex in word: {0}")]
    InvalidHex(String),

    #[error("empty word")]
    Empty,
}

/// A 256-bit big-endian word.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Word([u8; WORD_BYTES]);

impl Word {
    /// The all-zero word, used as the "field not in use" sentinel.
    pub const ZERO: Word = Word([0u8; WORD_BYTES]);

    pub const fn from_be_bytes(bytes: [u8; WORD_BYTES]) -> Self {
        Self(bytes)
    }

    pub const fn to_be_bytes(self) -> [u8; WORD_BYTES] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; WORD_BYTES] {
        &self.0
    }

    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; WORD_BYTES];
        bytes[WORD_BYTES - 8..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    /// Parse a hex word. The `0x` prefix is optional and short inputs are
    /// left-padded with zeros.
    pub fn from_hex(s: &str) -> Result<Self, WordError> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty() {
            return Err(WordError::Empty);
        }
        if digits.len() > WORD_BYTES * 2 {
            return Err(WordError::TooLong(digits.len()));
        }
        let padded = format!("{:0>64}", digits);
        let mut bytes = [0u8; WORD_BYTES];
        hex::decode_to_slice(&padded, &mut bytes)
            .map_err(|e| WordError::InvalidHex(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// `0x` followed by 64 zero-padded hex digits.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Lowest bit of the word.
    pub fn is_odd(&self) -> bool {
        self.0[WORD_BYTES - 1] & 1 == 1
    }

    /// Most significant bit, used as the parity flag of compressed points.
    pub fn top_bit(&self) -> bool {
        self.0[0] & 0x80 != 0
    }

    pub fn with_top_bit(mut self, set: bool) -> Self {
        if set {
            self.0[0] |= 0x80;
        } else {
            self.0[0] &= 0x7f;
        }
        self
    }

    /// The low 255 bits.
    pub fn without_top_bit(self) -> Self {
        self.with_top_bit(false)
    }

    /// The word as eight 32-bit limbs, most significant first.
    pub fn limbs(&self) -> [u32; LIMBS_PER_WORD] {
        let mut limbs = [0u32; LIMBS_PER_WORD];
        for (limb, chunk) in limbs.iter_mut().zip(self.0.chunks_exact(4)) {
            *limb = u32::from_be_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        limbs
    }

    /// Reassemble a word from limbs, most significant first.
    pub fn from_limbs(limbs: [u32; LIMBS_PER_WORD]) -> Self {
        let mut bytes = [0u8; WORD_BYTES];
        for (chunk, limb) in bytes.chunks_exact_mut(4).zip(limbs.iter()) {
            chunk.copy_from_slice(&limb.to_be_bytes());
        }
        Self(bytes)
    }

    /// Encode a field element in canonical (reduced) form.
    pub fn from_field<F: PrimeField>(value: &F) -> Self {
        let be = value.into_bigint().to_bytes_be();
        let mut bytes = [0u8; WORD_BYTES];
        // Moduli used here are at most 256 bits, so `be` never exceeds a word.
        let offset = WORD_BYTES.saturating_sub(be.len());
        bytes[offset..].copy_from_slice(&be[be.len().saturating_sub(WORD_BYTES)..]);
        Self(bytes)
    }

    /// Interpret the word as a field element, rejecting values at or above
    /// the modulus.
    pub fn to_field<F: PrimeField>(&self) -> Option<F> {
        let mut bigint = F::BigInt::from(0u64);
        let limbs = bigint.as_mut();
        // `as_mut` yields little-endian u64 limbs.
        for (i, chunk) in self.0.rchunks_exact(8).enumerate() {
            let mut limb = [0u8; 8];
            limb.copy_from_slice(chunk);
            match limbs.get_mut(i) {
                Some(slot) => *slot = u64::from_be_bytes(limb),
                None if limb == [0u8; 8] => {}
                None => return None,
            }
        }
        F::from_bigint(bigint)
    }

    /// Interpret the word as an integer and reduce it modulo the field order.
    pub fn to_field_reduced<F: PrimeField>(&self) -> F {
        F::from_be_bytes_mod_order(&self.0)
    }
}

impl From<u64> for Word {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl From<[u8; WORD_BYTES]> for Word {
    fn from(bytes: [u8; WORD_BYTES]) -> Self {
        Self(bytes)
    }
}

impl FromStr for Word {
    type Err = WordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Word {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Word({})", self.to_hex())
    }
}

impl Serialize for Word {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Word {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Word::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
