//! # KEM-DEM Hybrid Encryption
//!
//! How a sender hides the secret fields of a commitment from everyone but
//! the recipient.
//!
//! ## KEM
//!
//! The sender draws an ephemeral key pair `(e, E = e·G)` and computes the
//! shared point `S = e·Pk` against the recipient's public key. The symmetric
//! key is
//!
//! ```text
//! key = MiMC(DOMAIN_KEM, S.u, S.v, E.u, E.v)
//! ```
//!
//! The recipient, holding `sk` with `Pk = sk·G`, gets the same `S = sk·E`
//! and therefore the same key. Both sides call [`kem`]; only the private
//! scalar and the point it multiplies differ.
//!
//! ## DEM
//!
//! An additive stream over the BN254 scalar field:
//!
//! ```text
//! c_i = p_i + MiMC(DOMAIN_DEM, key, i)
//! ```
//!
//! There is no tag. Decrypting with the wrong key yields garbage, not an
//! error; the commitment hash check in the sync is what tells the two
//! apart.

use ark_bn254::Fr;
use ark_ff::PrimeField;
use rand::{CryptoRng, RngCore};
use thiserror::Error;

use super::hash::mimc_hash;
use crate::config::{DOMAIN_DEM, DOMAIN_KEM, GENERATOR, ZKP_KEY_LENGTH};
use crate::curve::{scalar_mult, CurveError, EdwardsPoint};
use crate::field::{Scalar, Word};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KemDemError {
    #[error("curve error: {0}")]
    Curve(#[from] CurveError),

    #[error("ciphertext word {0} is not a field element")]
    NonCanonical(Word),
}

/// Draw `ZKP_KEY_LENGTH` random bytes, reduce them into a scalar and derive
/// the matching public point.
pub fn gen_ephemeral_keys<R: RngCore + CryptoRng>(
    rng: &mut R,
) -> Result<(Scalar, EdwardsPoint), KemDemError> {
    let mut bytes = [0u8; ZKP_KEY_LENGTH];
    rng.fill_bytes(&mut bytes);
    let private_key = Scalar::from_be_bytes_mod_order(&bytes);
    let public_key = scalar_mult(&private_key, &GENERATOR)?;
    Ok((private_key, public_key))
}

/// Derive the symmetric key shared between `private_key` and `public_key`.
///
/// `ephemeral_pub` only enters the hash; it is the sender's ephemeral
/// public key on both sides.
pub fn kem(
    private_key: &Scalar,
    ephemeral_pub: &EdwardsPoint,
    public_key: &EdwardsPoint,
) -> Result<Fr, KemDemError> {
    let shared = scalar_mult(private_key, public_key)?;
    Ok(mimc_hash(&[
        DOMAIN_KEM,
        shared.u,
        shared.v,
        ephemeral_pub.u,
        ephemeral_pub.v,
    ]))
}

fn keystream(key: Fr, index: usize) -> Fr {
    mimc_hash(&[DOMAIN_DEM, key, Fr::from(index as u64)])
}

pub fn dem(key: Fr, plaintexts: &[Fr]) -> Vec<Fr> {
    plaintexts
        .iter()
        .enumerate()
        .map(|(i, p)| keystream(key, i) + p)
        .collect()
}

pub fn de_dem(key: Fr, ciphertexts: &[Fr]) -> Vec<Fr> {
    ciphertexts
        .iter()
        .enumerate()
        .map(|(i, c)| *c - keystream(key, i))
        .collect()
}

/// Sender side: ephemeral private key, ephemeral public key, recipient key.
pub fn encrypt(
    ephemeral_private: &Scalar,
    ephemeral_pub: &EdwardsPoint,
    recipient_pub: &EdwardsPoint,
    plaintexts: &[Fr],
) -> Result<Vec<Fr>, KemDemError> {
    let key = kem(ephemeral_private, ephemeral_pub, recipient_pub)?;
    Ok(dem(key, plaintexts))
}

/// Recipient side: own private key and the sender's ephemeral public key.
pub fn decrypt(
    private_key: &Scalar,
    ephemeral_pub: &EdwardsPoint,
    ciphertexts: &[Fr],
) -> Result<Vec<Fr>, KemDemError> {
    let key = kem(private_key, ephemeral_pub, ephemeral_pub)?;
    Ok(de_dem(key, ciphertexts))
}

/// [`decrypt`] over wire words. Ciphertexts must be canonical field
/// elements; anything else cannot have come out of [`dem`].
pub fn decrypt_words(
    private_key: &Scalar,
    ephemeral_pub: &EdwardsPoint,
    ciphertexts: &[Word],
) -> Result<Vec<Word>, KemDemError> {
    let ciphertexts = ciphertexts
        .iter()
        .map(|w| w.to_field::<Fr>().ok_or(KemDemError::NonCanonical(*w)))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(decrypt(private_key, ephemeral_pub, &ciphertexts)?
        .iter()
        .map(Word::from_field)
        .collect())
}
