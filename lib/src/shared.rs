//! Thread-safe handle to an escrow ledger and its asset collaborator
//!
//! Every operation holds one lock for its full duration, so the open-check,
//! the flag flip, and both transfer legs of a fulfillment form a single
//! indivisible step with respect to all other callers.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use parking_lot::Mutex;

use crate::assets::AssetTransfer;
use crate::errors::SwapResult;
use crate::events::SwapEvent;
use crate::order::{Order, OrderId};
use crate::swap::OrderBasedSwap;

struct Exchange<A> {
    swap: OrderBasedSwap,
    assets: A,
}

/// Cloneable, shareable escrow ledger
pub struct SharedSwap<A> {
    inner: Arc<Mutex<Exchange<A>>>,
}

impl<A> Clone for SharedSwap<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: AssetTransfer> SharedSwap<A> {
    pub fn new(swap: OrderBasedSwap, assets: A) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Exchange { swap, assets })),
        }
    }

    pub fn address(&self) -> Address {
        self.inner.lock().swap.address()
    }

    pub fn create_order(
        &self,
        seller: Address,
        sell_asset: Address,
        sell_amount: U256,
        buy_asset: Address,
        buy_amount: U256,
    ) -> SwapResult<OrderId> {
        let mut guard = self.inner.lock();
        let Exchange { swap, assets } = &mut *guard;
        swap.create_order(assets, seller, sell_asset, sell_amount, buy_asset, buy_amount)
    }

    pub fn fulfill_order(&self, buyer: Address, order_id: OrderId) -> SwapResult<()> {
        let mut guard = self.inner.lock();
        let Exchange { swap, assets } = &mut *guard;
        swap.fulfill_order(assets, buyer, order_id)
    }

    pub fn is_fulfilled(&self, order_id: OrderId) -> SwapResult<bool> {
        self.inner.lock().swap.is_fulfilled(order_id)
    }

    pub fn order(&self, order_id: OrderId) -> SwapResult<Order> {
        self.inner.lock().swap.order(order_id).cloned()
    }

    pub fn balance_of(&self, asset: Address, owner: Address) -> U256 {
        self.inner.lock().assets.balance_of(asset, owner)
    }

    pub fn take_events(&self) -> Vec<SwapEvent> {
        self.inner.lock().swap.take_events()
    }

    /// Run `f` against the asset collaborator under the ledger lock, e.g. to
    /// grant approvals.
    pub fn with_assets<R>(&self, f: impl FnOnce(&mut A) -> R) -> R {
        f(&mut self.inner.lock().assets)
    }
}
