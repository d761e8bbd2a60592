//! Fungible asset transfer interface
//!
//! The escrow ledger never keeps balances itself. It moves funds through an
//! [`AssetTransfer`] implementation, the way a swap contract calls into the
//! ERC-20 contracts of the tokens it trades.

use alloy_primitives::{Address, U256};

use crate::errors::TransferResult;

/// Trait for fungible asset transfers
///
/// Every method is atomic on its own: a failed call leaves all balances and
/// allowances untouched. Operations that chain several transfers use
/// [`AssetTransfer::checkpoint`] and [`AssetTransfer::revert_to`] to undo the
/// legs that already went through.
pub trait AssetTransfer {
    /// Opaque snapshot of the collaborator's state.
    type Checkpoint;

    /// Move `amount` of `asset` from `owner` to `recipient` on behalf of
    /// `spender`, consuming the allowance `owner` granted to `spender`.
    fn transfer_from(
        &mut self,
        spender: Address,
        asset: Address,
        owner: Address,
        recipient: Address,
        amount: U256,
    ) -> TransferResult<()>;

    /// Move `amount` of `asset` that `owner` itself holds to `recipient`.
    fn transfer(
        &mut self,
        asset: Address,
        owner: Address,
        recipient: Address,
        amount: U256,
    ) -> TransferResult<()>;

    /// Balance of `owner` in `asset`. Unknown assets and accounts read as zero.
    fn balance_of(&self, asset: Address, owner: Address) -> U256;

    fn checkpoint(&self) -> Self::Checkpoint;

    fn revert_to(&mut self, checkpoint: Self::Checkpoint);
}
