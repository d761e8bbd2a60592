//! Swap and token transfer errors

use alloy_primitives::{Address, U256};
use thiserror::Error;

use crate::order::OrderId;

/// Error raised by the asset transfer collaborator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("Unknown asset: {0}")]
    UnknownAsset(Address),

    #[error("Insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: U256, need: U256 },

    #[error("Insufficient allowance: have {have}, need {need}")]
    InsufficientAllowance { have: U256, need: U256 },

    #[error("Arithmetic overflow")]
    Overflow,
}

/// Error during escrow ledger operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwapError {
    #[error("Order amounts must be greater than zero")]
    InvalidAmount,

    #[error("Transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    #[error("Order already fulfilled: {0}")]
    AlreadyFulfilled(OrderId),
}

/// Result type for escrow ledger operations
pub type SwapResult<T> = Result<T, SwapError>;

/// Result type for asset transfers
pub type TransferResult<T> = Result<T, TransferError>;
