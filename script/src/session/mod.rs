pub mod runner;

pub use runner::{BalanceRow, SessionRunner, StepReport};

use alloy_primitives::{keccak256, Address, U256};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use swap_lib::{OrderId, SwapError, TransferError};
use thiserror::Error;

/// A scripted sequence of token and swap actions, replayed against an
/// in-process ledger.
#[derive(Debug, Deserialize, Serialize)]
pub struct Session {
    /// Custody address of the ledger. Derived from "ledger" when absent.
    #[serde(default)]
    pub ledger: Option<String>,
    /// Named accounts. Names not listed here may still be used; they are
    /// either parsed as addresses or derived from the name.
    #[serde(default)]
    pub accounts: BTreeMap<String, String>,
    pub actions: Vec<Action>,
}

impl Session {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// One step of a session. Amounts are decimal or `0x`-prefixed hex strings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Deploy a token, minting `supply` to `owner`.
    Deploy {
        token: String,
        #[serde(default)]
        name: Option<String>,
        owner: String,
        supply: String,
    },
    Transfer {
        token: String,
        from: String,
        to: String,
        amount: String,
    },
    /// Approve the ledger to pull `amount` of `token` from `owner`.
    Approve {
        token: String,
        owner: String,
        amount: String,
    },
    CreateOrder {
        seller: String,
        sell_token: String,
        sell_amount: String,
        buy_token: String,
        buy_amount: String,
    },
    FulfillOrder { buyer: String, order_id: OrderId },
}

impl Action {
    pub fn describe(&self) -> String {
        match self {
            Action::Deploy {
                token,
                owner,
                supply,
                ..
            } => format!("deploy {token} ({supply} to {owner})"),
            Action::Transfer {
                token,
                from,
                to,
                amount,
            } => format!("transfer {amount} {token} {from} → {to}"),
            Action::Approve {
                token,
                owner,
                amount,
            } => format!("approve {amount} {token} from {owner}"),
            Action::CreateOrder {
                seller,
                sell_token,
                sell_amount,
                buy_token,
                buy_amount,
            } => format!(
                "create order by {seller}: {sell_amount} {sell_token} for {buy_amount} {buy_token}"
            ),
            Action::FulfillOrder { buyer, order_id } => {
                format!("fulfill order {order_id} by {buyer}")
            }
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("Unknown token: {0}")]
    UnknownToken(String),

    #[error("Token already deployed: {0}")]
    DuplicateToken(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid address for {name}: {value}")]
    InvalidAddress { name: String, value: String },

    #[error(transparent)]
    Transfer(#[from] TransferError),

    #[error(transparent)]
    Swap(#[from] SwapError),
}

pub fn parse_amount(value: &str) -> Result<U256, SessionError> {
    U256::from_str(value.trim()).map_err(|_| SessionError::InvalidAmount(value.to_string()))
}

/// Address for a name that has no explicit mapping: parsed when it looks like
/// an address, otherwise derived from the name's hash.
pub fn derive_address(name: &str) -> Address {
    if let Ok(address) = Address::from_str(name) {
        return address;
    }
    Address::from_word(keccak256(name.as_bytes()))
}
