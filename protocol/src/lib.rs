// Copyright (c) 2026 Twilight Protocol Contributors. MIT License.
// See LICENSE for details.

//! # Twilight Protocol: Rollup Core
//!
//! The cryptographic and validation core of the Twilight zk-rollup. Everything
//! in here either manipulates curve points and field elements bit-exactly or
//! decides whether a transaction is allowed anywhere near a block. The HTTP
//! routes, the database layer and the wallet UI live elsewhere and talk to
//! this crate through small async traits.
//!
//! ## Architecture
//!
//! Modules are listed leaves first:
//!
//! - **field**: 256-bit words, modular helpers and the `Fq2` extension.
//! - **curve**: BabyJubjub group law plus the BN254 G1/G2 compression codec.
//! - **crypto**: MiMC, keccak, the KEM-DEM cipher, limb packing and wallet keys.
//! - **commitment**: value commitments, secret encryption and the decryption sync.
//! - **transaction**: the wire transaction, builders and the validity checker.
//! - **storage**: collaborator traits for blocks and commitments, plus an
//!   in-memory implementation.
//! - **config**: curve constants, domain separators and checker settings.
//! - **logging**: `tracing` subscriber setup for processes embedding the core.
//!
//! ## Ground rules
//!
//! 1. Every curve point that leaves `curve` has been checked against the
//!    curve equation. Off-curve results are errors, never values.
//! 2. Field elements are arkworks types; unreduced integers never escape.
//! 3. The checker is a predicate. It never mutates a transaction.

pub mod commitment;
pub mod config;
pub mod crypto;
pub mod curve;
pub mod field;
pub mod logging;
pub mod storage;
pub mod transaction;
