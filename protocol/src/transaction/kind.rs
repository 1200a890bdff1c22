//! Type consistency: from the flat wire record to a typed transaction.
//!
//! Every wire transaction carries every field. Which of them must be zero,
//! which must not, and how long each vector must be depends on the type:
//!
//! | type            | commitments | nullifiers  | compressedSecrets | extra                                   |
//! |-----------------|-------------|-------------|-------------------|-----------------------------------------|
//! | DEPOSIT         | `[c, 0]`    | all zero    | all zero, len 8   | block number 0, no recipient            |
//! | SINGLE_TRANSFER | `[c, 0]`    | `[n, 0]`    | not all zero, len 8 | tokenId, value, recipient zero        |
//! | DOUBLE_TRANSFER | `[c, c]`    | `[n, n]`    | not all zero, len 8 | tokenId, value, recipient zero        |
//! | WITHDRAW        | all zero    | `[n, 0]`    | all zero          | recipient required                      |
//!
//! All types need a non-zero ERC address, a non-zero public input hash and a
//! proof that is not all zeros. Deposits and withdrawals of non-ERC20 tokens
//! must name a token id or a value.
//!
//! [`classify`] checks the table and hands back a [`TransactionKind`] whose
//! records only have the fields that type actually uses.

use super::builder::Transaction;
use super::types::{TokenType, TransactionType};
use super::verification::TransactionError;
use crate::config::{COMMITMENTS_PER_TX, COMPRESSED_SECRETS_LENGTH, NULLIFIERS_PER_TX};
use crate::field::Word;

/// A transaction that has passed the type consistency rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionKind {
    Deposit {
        erc_address: Word,
        token_id: Word,
        value: Word,
        token_type: TokenType,
        commitment: Word,
        proof: Vec<Word>,
        public_input_hash: Word,
    },
    SingleTransfer {
        erc_address: Word,
        commitment: Word,
        nullifier: Word,
        compressed_secrets: Vec<Word>,
        historic_root_block_number_l2: u64,
        proof: Vec<Word>,
        public_input_hash: Word,
    },
    DoubleTransfer {
        erc_address: Word,
        commitments: [Word; 2],
        nullifiers: [Word; 2],
        compressed_secrets: Vec<Word>,
        historic_root_block_number_l2: u64,
        proof: Vec<Word>,
        public_input_hash: Word,
    },
    Withdraw {
        erc_address: Word,
        token_id: Word,
        value: Word,
        token_type: TokenType,
        nullifier: Word,
        recipient_address: Word,
        historic_root_block_number_l2: u64,
        proof: Vec<Word>,
        public_input_hash: Word,
    },
}

impl TransactionKind {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Self::Deposit { .. } => TransactionType::Deposit,
            Self::SingleTransfer { .. } => TransactionType::SingleTransfer,
            Self::DoubleTransfer { .. } => TransactionType::DoubleTransfer,
            Self::Withdraw { .. } => TransactionType::Withdraw,
        }
    }
}

fn all_zero(words: &[Word]) -> bool {
    words.iter().all(Word::is_zero)
}

/// Exactly `[non-zero, 0]`.
fn first_only(words: &[Word], len: usize) -> bool {
    words.len() == len && !words[0].is_zero() && all_zero(&words[1..])
}

/// Exactly `len` words, none zero.
fn all_set(words: &[Word], len: usize) -> bool {
    words.len() == len && !words.iter().any(Word::is_zero)
}

/// A non-ERC20 deposit or withdrawal must name a token id or a value.
fn names_a_token(tx: &Transaction) -> bool {
    tx.token_type == TokenType::Erc20 || !tx.token_id.is_zero() || !tx.value.is_zero()
}

fn ensure(
    ok: bool,
    transaction_type: TransactionType,
    reason: &'static str,
) -> Result<(), TransactionError> {
    if ok {
        Ok(())
    } else {
        Err(TransactionError::InconsistentFields {
            transaction_type,
            reason,
        })
    }
}

/// Run the type consistency rules.
///
/// Unknown types fail with code 2, any violated rule with code 1.
pub fn classify(tx: &Transaction) -> Result<TransactionKind, TransactionError> {
    let ty = TransactionType::try_from(tx.transaction_type)
        .map_err(TransactionError::UnknownType)?;

    ensure(!tx.public_input_hash.is_zero(), ty, "public input hash is zero")?;
    ensure(!tx.erc_address.is_zero(), ty, "ERC address is zero")?;
    ensure(!all_zero(&tx.proof), ty, "proof is all zeros")?;

    match ty {
        TransactionType::Deposit => {
            ensure(names_a_token(tx), ty, "token id and value are both zero")?;
            ensure(tx.recipient_address.is_zero(), ty, "recipient address is set")?;
            ensure(
                first_only(&tx.commitments, COMMITMENTS_PER_TX),
                ty,
                "commitments must be [commitment, 0]",
            )?;
            ensure(all_zero(&tx.nullifiers), ty, "nullifiers are set")?;
            ensure(
                tx.compressed_secrets.len() == COMPRESSED_SECRETS_LENGTH
                    && all_zero(&tx.compressed_secrets),
                ty,
                "compressed secrets must be eight zeros",
            )?;
            ensure(
                tx.historic_root_block_number_l2 == 0,
                ty,
                "historic root block number is not zero",
            )?;
            Ok(TransactionKind::Deposit {
                erc_address: tx.erc_address,
                token_id: tx.token_id,
                value: tx.value,
                token_type: tx.token_type,
                commitment: tx.commitments[0],
                proof: tx.proof.clone(),
                public_input_hash: tx.public_input_hash,
            })
        }
        TransactionType::SingleTransfer => {
            ensure_transfer_header(tx, ty)?;
            ensure(
                first_only(&tx.commitments, COMMITMENTS_PER_TX),
                ty,
                "commitments must be [commitment, 0]",
            )?;
            ensure(
                first_only(&tx.nullifiers, NULLIFIERS_PER_TX),
                ty,
                "nullifiers must be [nullifier, 0]",
            )?;
            Ok(TransactionKind::SingleTransfer {
                erc_address: tx.erc_address,
                commitment: tx.commitments[0],
                nullifier: tx.nullifiers[0],
                compressed_secrets: tx.compressed_secrets.clone(),
                historic_root_block_number_l2: tx.historic_root_block_number_l2,
                proof: tx.proof.clone(),
                public_input_hash: tx.public_input_hash,
            })
        }
        TransactionType::DoubleTransfer => {
            ensure_transfer_header(tx, ty)?;
            ensure(
                all_set(&tx.commitments, COMMITMENTS_PER_TX),
                ty,
                "both commitments must be set",
            )?;
            ensure(
                all_set(&tx.nullifiers, NULLIFIERS_PER_TX),
                ty,
                "both nullifiers must be set",
            )?;
            Ok(TransactionKind::DoubleTransfer {
                erc_address: tx.erc_address,
                commitments: [tx.commitments[0], tx.commitments[1]],
                nullifiers: [tx.nullifiers[0], tx.nullifiers[1]],
                compressed_secrets: tx.compressed_secrets.clone(),
                historic_root_block_number_l2: tx.historic_root_block_number_l2,
                proof: tx.proof.clone(),
                public_input_hash: tx.public_input_hash,
            })
        }
        TransactionType::Withdraw => {
            ensure(names_a_token(tx), ty, "token id and value are both zero")?;
            ensure(!tx.recipient_address.is_zero(), ty, "recipient address is zero")?;
            ensure(all_zero(&tx.commitments), ty, "commitments are set")?;
            ensure(
                first_only(&tx.nullifiers, NULLIFIERS_PER_TX),
                ty,
                "nullifiers must be [nullifier, 0]",
            )?;
            ensure(all_zero(&tx.compressed_secrets), ty, "compressed secrets are set")?;
            Ok(TransactionKind::Withdraw {
                erc_address: tx.erc_address,
                token_id: tx.token_id,
                value: tx.value,
                token_type: tx.token_type,
                nullifier: tx.nullifiers[0],
                recipient_address: tx.recipient_address,
                historic_root_block_number_l2: tx.historic_root_block_number_l2,
                proof: tx.proof.clone(),
                public_input_hash: tx.public_input_hash,
            })
        }
    }
}

/// Rules shared by both transfer types.
fn ensure_transfer_header(tx: &Transaction, ty: TransactionType) -> Result<(), TransactionError> {
    ensure(tx.token_id.is_zero(), ty, "token id is set")?;
    ensure(tx.value.is_zero(), ty, "value is set")?;
    ensure(tx.recipient_address.is_zero(), ty, "recipient address is set")?;
    ensure(
        tx.compressed_secrets.len() == COMPRESSED_SECRETS_LENGTH
            && !all_zero(&tx.compressed_secrets),
        ty,
        "compressed secrets must be eight words, not all zero",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionBuilder;

    fn w(n: u64) -> Word {
        Word::from_u64(n)
    }

    fn deposit() -> TransactionBuilder {
        TransactionBuilder::new(TransactionType::Deposit)
            .erc_address(w(0xe7c))
            .value(w(10))
            .commitments(vec![w(0xc0), Word::ZERO])
            .proof(vec![w(1); 8])
            .public_input_hash(w(0x91))
    }

    fn single_transfer() -> TransactionBuilder {
        TransactionBuilder::new(TransactionType::SingleTransfer)
            .erc_address(w(0xe7c))
            .commitments(vec![w(0xc0), Word::ZERO])
            .nullifiers(vec![w(0xa0), Word::ZERO])
            .compressed_secrets(vec![w(5); 8])
            .historic_root_block_number_l2(3)
            .proof(vec![w(1); 8])
            .public_input_hash(w(0x91))
    }

    fn double_transfer() -> TransactionBuilder {
        single_transfer()
            .transaction_type(TransactionType::DoubleTransfer)
            .commitments(vec![w(0xc0), w(0xc1)])
            .nullifiers(vec![w(0xa0), w(0xa1)])
    }

    fn withdraw() -> TransactionBuilder {
        TransactionBuilder::new(TransactionType::Withdraw)
            .erc_address(w(0xe7c))
            .value(w(10))
            .nullifiers(vec![w(0xa0), Word::ZERO])
            .recipient_address(w(0xbeef))
            .historic_root_block_number_l2(3)
            .proof(vec![w(1); 8])
            .public_input_hash(w(0x91))
    }

    fn code(builder: TransactionBuilder) -> Option<u8> {
        classify(&builder.build()).err().map(|e| e.code())
    }

    #[test]
    fn well_formed_transactions_classify() {
        assert_eq!(code(deposit()), None);
        assert_eq!(code(single_transfer()), None);
        assert_eq!(code(double_transfer()), None);
        assert_eq!(code(withdraw()), None);

        let kind = classify(&double_transfer().build()).unwrap();
        assert!(matches!(
            kind,
            TransactionKind::DoubleTransfer { commitments, .. } if commitments == [w(0xc0), w(0xc1)]
        ));
    }

    #[test]
    fn deposit_rules() {
        assert_eq!(code(deposit().recipient_address(w(1))), Some(1));
        assert_eq!(code(deposit().commitments(vec![w(1), w(2)])), Some(1));
        assert_eq!(code(deposit().commitments(vec![w(1)])), Some(1));
        assert_eq!(code(deposit().nullifiers(vec![w(1), Word::ZERO])), Some(1));
        assert_eq!(code(deposit().compressed_secrets(vec![Word::ZERO; 7])), Some(1));
        assert_eq!(code(deposit().historic_root_block_number_l2(1)), Some(1));
        assert_eq!(code(deposit().proof(vec![Word::ZERO; 8])), Some(1));
    }

    #[test]
    fn non_erc20_must_name_a_token() {
        let nft = deposit().token_type(TokenType::Erc721).value(Word::ZERO);
        assert_eq!(code(nft.clone()), Some(1));
        assert_eq!(code(nft.token_id(w(42))), None);
        // ERC20 with zero value is structurally fine.
        assert_eq!(code(deposit().value(Word::ZERO)), None);
    }

    #[test]
    fn transfer_rules() {
        assert_eq!(code(single_transfer().token_id(w(1))), Some(1));
        assert_eq!(code(single_transfer().value(w(1))), Some(1));
        assert_eq!(code(single_transfer().nullifiers(vec![w(1), w(2)])), Some(1));
        assert_eq!(code(single_transfer().compressed_secrets(vec![Word::ZERO; 8])), Some(1));
        assert_eq!(code(double_transfer().commitments(vec![w(1), Word::ZERO])), Some(1));
        assert_eq!(code(double_transfer().nullifiers(vec![w(1), w(2), w(3)])), Some(1));
    }

    #[test]
    fn withdraw_requires_recipient() {
        assert_eq!(code(withdraw().recipient_address(Word::ZERO)), Some(1));
        assert_eq!(code(withdraw().commitments(vec![w(1), Word::ZERO])), Some(1));
        assert_eq!(code(withdraw().compressed_secrets(vec![w(1); 8])), Some(1));
    }

    #[test]
    fn shared_rules() {
        assert_eq!(code(withdraw().erc_address(Word::ZERO)), Some(1));
        assert_eq!(code(single_transfer().public_input_hash(Word::ZERO)), Some(1));
    }

    #[test]
    fn unknown_type_is_code_two() {
        assert_eq!(code(TransactionBuilder::raw(9)), Some(2));
        assert_eq!(code(TransactionBuilder::raw(4)), Some(2));
    }
}
