//! Core type definitions for rollup transactions.

use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// What a transaction does. The numeric values are protocol constants: they
/// index verification keys on chain and appear in every wire transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TransactionType {
    /// Move public ERC tokens into a fresh commitment.
    Deposit = 0,
    /// Spend one commitment into one new commitment.
    SingleTransfer = 1,
    /// Spend two commitments into two new commitments.
    DoubleTransfer = 2,
    /// Spend one commitment back out to a public address.
    Withdraw = 3,
}

impl TransactionType {
    pub const ALL: [TransactionType; 4] = [
        Self::Deposit,
        Self::SingleTransfer,
        Self::DoubleTransfer,
        Self::Withdraw,
    ];

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Whether the public inputs include a historic commitment root.
    pub fn needs_historic_root(self) -> bool {
        !matches!(self, Self::Deposit)
    }
}

impl TryFrom<u8> for TransactionType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Deposit),
            1 => Ok(Self::SingleTransfer),
            2 => Ok(Self::DoubleTransfer),
            3 => Ok(Self::Withdraw),
            other => Err(other),
        }
    }
}

impl From<TransactionType> for u8 {
    fn from(ty: TransactionType) -> Self {
        ty as u8
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deposit => write!(f, "DEPOSIT"),
            Self::SingleTransfer => write!(f, "SINGLE_TRANSFER"),
            Self::DoubleTransfer => write!(f, "DOUBLE_TRANSFER"),
            Self::Withdraw => write!(f, "WITHDRAW"),
        }
    }
}

// ---------------------------------------------------------------------------
// TokenType
// ---------------------------------------------------------------------------

/// Token standard of the ERC contract a deposit or withdrawal touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TokenType {
    #[default]
    #[serde(rename = "ERC20")]
    Erc20,
    #[serde(rename = "ERC721")]
    Erc721,
    #[serde(rename = "ERC1155")]
    Erc1155,
}

impl TokenType {
    /// Position in the canonical hash encoding.
    pub fn as_u8(self) -> u8 {
        match self {
            Self::Erc20 => 0,
            Self::Erc721 => 1,
            Self::Erc1155 => 2,
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Erc20 => write!(f, "ERC20"),
            Self::Erc721 => write!(f, "ERC721"),
            Self::Erc1155 => write!(f, "ERC1155"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_codes_are_stable() {
        for (code, ty) in TransactionType::ALL.iter().enumerate() {
            assert_eq!(ty.as_u8() as usize, code);
            assert_eq!(TransactionType::try_from(code as u8), Ok(*ty));
        }
        assert_eq!(TransactionType::try_from(9), Err(9));
    }

    #[test]
    fn only_deposit_skips_historic_root() {
        assert!(!TransactionType::Deposit.needs_historic_root());
        assert!(TransactionType::Withdraw.needs_historic_root());
    }

    #[test]
    fn token_type_serde_names() {
        assert_eq!(serde_json::to_string(&TokenType::Erc721).unwrap(), "\"ERC721\"");
        let parsed: TokenType = serde_json::from_str("\"ERC1155\"").unwrap();
        assert_eq!(parsed, TokenType::Erc1155);
        assert_eq!(TokenType::default(), TokenType::Erc20);
    }

    #[test]
    fn display_matches_protocol_names() {
        assert_eq!(TransactionType::DoubleTransfer.to_string(), "DOUBLE_TRANSFER");
        assert_eq!(TokenType::Erc20.to_string(), "ERC20");
    }
}
