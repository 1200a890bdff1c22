//! Limb packing.
//!
//! Ciphertext slots are field elements, so each plaintext must be below the
//! BN254 scalar modulus. A 256-bit token id is not. The fix is to move its
//! top 32-bit limb into an unused limb of the ERC address (160 bits, so its
//! top three limbs are always free) before encrypting, and move it back
//! after decrypting.
//!
//! Limbs are indexed most significant first, eight per word.

use thiserror::Error;

use crate::config::LIMBS_PER_WORD;
use crate::field::Word;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PackingError {
    /// The destination limb already holds data.
    #[error("destination limb {index} is not zero")]
    DestinationOccupied { index: usize },

    /// The source word has no non-zero limb to move.
    #[error("source word has no non-zero limb to pack")]
    NothingToPack,

    /// The destination word has no zero limb left.
    #[error("destination word has no free limb")]
    NoFreeLimb,

    #[error("limb index {index} is out of range")]
    IndexOutOfRange { index: usize },
}

/// A copy of `limbs` with `limbs[index]` replaced by `value`.
pub fn immutable_splice(
    limbs: &[u32; LIMBS_PER_WORD],
    index: usize,
    value: u32,
) -> Result<[u32; LIMBS_PER_WORD], PackingError> {
    let mut out = *limbs;
    *out.get_mut(index)
        .ok_or(PackingError::IndexOutOfRange { index })? = value;
    Ok(out)
}

/// Move one limb of `from` into a zero limb of `to`.
///
/// Without explicit indices the most significant non-zero limb of `from`
/// goes into the most significant zero limb of `to`. With explicit indices
/// exactly that limb moves, even if it is zero, which is what unpacking a
/// small token id needs.
///
/// Returns the updated `(from, to)`.
pub fn pack_secrets(
    from: &Word,
    to: &Word,
    from_index: Option<usize>,
    to_index: Option<usize>,
) -> Result<(Word, Word), PackingError> {
    let from_limbs = from.limbs();
    let to_limbs = to.limbs();

    let from_index = match from_index {
        Some(index) => index,
        None => from_limbs
            .iter()
            .position(|limb| *limb != 0)
            .ok_or(PackingError::NothingToPack)?,
    };
    let to_index = match to_index {
        Some(index) => index,
        None => to_limbs
            .iter()
            .position(|limb| *limb == 0)
            .ok_or(PackingError::NoFreeLimb)?,
    };

    let moved = *from_limbs
        .get(from_index)
        .ok_or(PackingError::IndexOutOfRange { index: from_index })?;
    match to_limbs.get(to_index) {
        None => return Err(PackingError::IndexOutOfRange { index: to_index }),
        Some(0) => {}
        Some(_) => return Err(PackingError::DestinationOccupied { index: to_index }),
    }

    let from_limbs = immutable_splice(&from_limbs, from_index, 0)?;
    let to_limbs = immutable_splice(&to_limbs, to_index, moved)?;
    Ok((Word::from_limbs(from_limbs), Word::from_limbs(to_limbs)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token_id() -> Word {
        Word::from_hex("0xdeadbeef00000000000000000000000000000000000000000000000000000042")
            .unwrap()
    }

    fn erc_address() -> Word {
        Word::from_hex("0x000000000000000000000000a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48")
            .unwrap()
    }

    #[test]
    fn test_splice_is_immutable_and_reversible() {
        let limbs = [1, 2, 3, 4, 5, 6, 7, 8];
        let spliced = immutable_splice(&limbs, 2, 99).unwrap();
        assert_eq!(limbs[2], 3);
        assert_eq!(spliced[2], 99);
        assert_eq!(immutable_splice(&spliced, 2, 3).unwrap(), limbs);
        assert_eq!(
            immutable_splice(&limbs, 8, 0),
            Err(PackingError::IndexOutOfRange { index: 8 })
        );
    }

    #[test]
    fn test_default_indices() {
        let (token, erc) = pack_secrets(&token_id(), &erc_address(), None, None).unwrap();
        assert_eq!(token.limbs()[0], 0);
        assert_eq!(erc.limbs()[0], 0xdeadbeef);
        assert_eq!(token.limbs()[7], 0x42);
    }

    #[test]
    fn test_pack_and_unpack_with_fixed_indices() {
        let (token, erc) = pack_secrets(&token_id(), &erc_address(), Some(0), Some(2)).unwrap();
        assert_eq!(erc.limbs()[2], 0xdeadbeef);
        assert!(token.to_field::<ark_bn254::Fr>().is_some());

        let (erc_back, token_back) = pack_secrets(&erc, &token, Some(2), Some(0)).unwrap();
        assert_eq!(erc_back, erc_address());
        assert_eq!(token_back, token_id());
    }

    #[test]
    fn test_explicit_zero_limb_moves() {
        let small = Word::from_u64(5);
        let (token, erc) = pack_secrets(&small, &erc_address(), Some(0), Some(2)).unwrap();
        assert_eq!(token, small);
        assert_eq!(erc, erc_address());
    }

    #[test]
    fn test_occupied_destination_is_rejected() {
        let full = Word::from_be_bytes([0x11; 32]);
        assert_eq!(
            pack_secrets(&token_id(), &full, Some(0), Some(3)),
            Err(PackingError::DestinationOccupied { index: 3 })
        );
        assert_eq!(
            pack_secrets(&token_id(), &full, None, None),
            Err(PackingError::NoFreeLimb)
        );
    }

    #[test]
    fn test_nothing_to_pack() {
        assert_eq!(
            pack_secrets(&Word::ZERO, &erc_address(), None, None),
            Err(PackingError::NothingToPack)
        );
    }

    #[test]
    fn test_out_of_range_index() {
        assert_eq!(
            pack_secrets(&token_id(), &erc_address(), Some(9), Some(0)),
            Err(PackingError::IndexOutOfRange { index: 9 })
        );
    }
}
