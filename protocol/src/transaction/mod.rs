//! # Transaction Module
//!
//! The rollup transaction and everything the optimist does to decide
//! whether one is valid.
//!
//! ## Architecture
//!
//! ```text
//! types.rs          TransactionType and TokenType
//! builder.rs        the wire Transaction, its hash, and TransactionBuilder
//! kind.rs           per-type consistency rules, producing TransactionKind
//! public_inputs.rs  public input layouts and their MiMC hash
//! services.rs       verification key and proof verifier collaborators
//! verification.rs   TransactionChecker and the challenge error codes
//! ```
//!
//! ## Checking
//!
//! 1. **Hash**: keccak-256 over the canonical word encoding.
//! 2. **Type**: which fields must be zero or set for the declared type.
//! 3. **Public input hash**: needs the historic root from the block store.
//! 4. **Proof**: needs the verification key and the off-chain verifier.
//!
//! The stages run concurrently inside [`TransactionChecker::check_transaction`].
//! A failure carries one of the codes 0 to 5 used in challenges.

pub mod builder;
pub mod kind;
pub mod public_inputs;
pub mod services;
pub mod types;
pub mod verification;

pub use builder::{Transaction, TransactionBuilder};
pub use kind::{classify, TransactionKind};
pub use public_inputs::PublicInputs;
pub use services::{
    HttpProofVerifier, ProofVerifier, VerificationKeySource, VerifyRequest, VerifyResponse,
};
pub use types::{TokenType, TransactionType};
pub use verification::{CheckError, TransactionChecker, TransactionError};
