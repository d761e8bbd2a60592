use alloy_primitives::{keccak256, Address, FixedBytes, U256};
use alloy_sol_types::SolValue;
use serde::{Deserialize, Serialize};

/// Sequential handle of an order, assigned by the ledger that created it.
pub type OrderId = u64;

/// A seller's standing offer: `sell_amount` of `sell_asset` held in custody,
/// released to whoever pays `buy_amount` of `buy_asset`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub seller: Address,
    pub sell_asset: Address,
    pub sell_amount: U256,
    pub buy_asset: Address,
    pub buy_amount: U256,
    pub fulfilled: bool,
}

impl Order {
    /// Computes the Keccak256 hash of the order terms.
    /// This matches Solidity's `keccak256(abi.encode(id, seller, sellAsset, sellAmount, buyAsset, buyAmount))`.
    ///
    /// The `fulfilled` flag is not part of the digest, so the hash is stable
    /// across the order's lifecycle.
    pub fn hash(&self) -> FixedBytes<32> {
        let encoded = (
            U256::from(self.id),
            self.seller,
            self.sell_asset,
            self.sell_amount,
            self.buy_asset,
            self.buy_amount,
        )
            .abi_encode();
        keccak256(&encoded)
    }

    pub fn is_open(&self) -> bool {
        !self.fulfilled
    }
}
