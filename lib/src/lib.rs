//! Order-based token swap
//!
//! A peer-to-peer exchange without a matching engine: a seller escrows one
//! fungible asset and names the amount of a second asset it wants; any buyer
//! settles the order by paying that amount, and both sides are released in a
//! single atomic step.
//!
//! # Key Types
//!
//! - [`OrderBasedSwap`]: the escrow ledger holding every order record
//! - [`AssetTransfer`]: the token transfer capability the ledger calls into
//! - [`TokenBank`]: an in-memory ERC-20 style implementation of [`AssetTransfer`]
//! - [`SharedSwap`]: a lock-guarded handle for concurrent callers
//! - [`SwapEvent`]: `OrderCreated` / `OrderFulfilled` notifications

pub mod assets;
pub mod errors;
pub mod events;
pub mod order;
pub mod shared;
pub mod swap;
pub mod token;

pub use assets::AssetTransfer;
pub use errors::*;
pub use events::{OrderCreated, OrderFulfilled, SwapEvent};
pub use order::{Order, OrderId};
pub use shared::SharedSwap;
pub use swap::OrderBasedSwap;
pub use token::{Token, TokenBank};
