//! Order-based swap escrow ledger
//!
//! A seller locks `sell_amount` of one asset with [`OrderBasedSwap::create_order`],
//! asking for `buy_amount` of another. Any buyer can then settle the order with
//! [`OrderBasedSwap::fulfill_order`], which pays the seller and releases the
//! escrowed funds to the buyer in one all-or-nothing step.
//!
//! Orders are never removed. An order is either open or fulfilled, and only
//! ever moves from open to fulfilled.

use alloy_primitives::{Address, U256};
use tracing::{debug, info, warn};

use crate::assets::AssetTransfer;
use crate::errors::{SwapError, SwapResult};
use crate::events::SwapEvent;
use crate::order::{Order, OrderId};

/// The escrow ledger
#[derive(Debug, Clone)]
pub struct OrderBasedSwap {
    /// Custody address: the account escrowed funds are held under.
    address: Address,
    /// Indexed by order id.
    orders: Vec<Order>,
    events: Vec<SwapEvent>,
}

impl OrderBasedSwap {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            orders: Vec::new(),
            events: Vec::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Lock `sell_amount` of `sell_asset` from `seller` and open an order
    /// asking `buy_amount` of `buy_asset` in return.
    ///
    /// The seller must have approved this ledger's address for at least
    /// `sell_amount` beforehand. On any failure no funds move and no order id
    /// is consumed.
    pub fn create_order<A: AssetTransfer>(
        &mut self,
        assets: &mut A,
        seller: Address,
        sell_asset: Address,
        sell_amount: U256,
        buy_asset: Address,
        buy_amount: U256,
    ) -> SwapResult<OrderId> {
        if sell_amount.is_zero() || buy_amount.is_zero() {
            warn!(%seller, %sell_amount, %buy_amount, "rejecting zero-amount order");
            return Err(SwapError::InvalidAmount);
        }

        assets
            .transfer_from(self.address, sell_asset, seller, self.address, sell_amount)
            .inspect_err(|e| warn!(%seller, %sell_asset, %sell_amount, "escrow transfer failed: {e}"))?;

        let order = Order {
            id: self.next_order_id(),
            seller,
            sell_asset,
            sell_amount,
            buy_asset,
            buy_amount,
            fulfilled: false,
        };
        let order_id = order.id;

        info!(
            order_id,
            %seller,
            %sell_asset,
            %sell_amount,
            %buy_asset,
            %buy_amount,
            "order created"
        );
        self.events.push(SwapEvent::created(&order));
        self.orders.push(order);

        Ok(order_id)
    }

    /// Settle an open order: `buyer` pays the seller `buy_amount` of the buy
    /// asset and receives the escrowed `sell_amount` of the sell asset.
    ///
    /// The order is marked fulfilled before either transfer runs, so a
    /// collaborator that calls back into the ledger observes a closed order.
    /// If either leg fails, the flag is cleared again and every balance change
    /// made during this call is rolled back.
    pub fn fulfill_order<A: AssetTransfer>(
        &mut self,
        assets: &mut A,
        buyer: Address,
        order_id: OrderId,
    ) -> SwapResult<()> {
        let custody = self.address;
        let order = self.order_mut(order_id)?;
        if order.fulfilled {
            debug!(order_id, %buyer, "order already fulfilled");
            return Err(SwapError::AlreadyFulfilled(order_id));
        }
        order.fulfilled = true;
        let order = order.clone();

        let checkpoint = assets.checkpoint();
        let settled = assets
            .transfer_from(custody, order.buy_asset, buyer, order.seller, order.buy_amount)
            .and_then(|()| assets.transfer(order.sell_asset, custody, buyer, order.sell_amount));

        if let Err(e) = settled {
            assets.revert_to(checkpoint);
            self.order_mut(order_id)?.fulfilled = false;
            warn!(order_id, %buyer, "fulfillment rolled back: {e}");
            return Err(SwapError::TransferFailed(e));
        }

        info!(order_id, %buyer, seller = %order.seller, "order fulfilled");
        self.events.push(SwapEvent::fulfilled(order_id, buyer));
        Ok(())
    }

    /// Whether the order has been settled. Unknown ids are an error rather
    /// than reading as `false`.
    pub fn is_fulfilled(&self, order_id: OrderId) -> SwapResult<bool> {
        self.order(order_id).map(|order| order.fulfilled)
    }

    pub fn order(&self, order_id: OrderId) -> SwapResult<&Order> {
        usize::try_from(order_id)
            .ok()
            .and_then(|index| self.orders.get(index))
            .ok_or(SwapError::OrderNotFound(order_id))
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Number of orders ever created, which is also the next id to be issued.
    pub fn order_count(&self) -> u64 {
        self.orders.len() as u64
    }

    /// Sum of `sell_amount` over open orders escrowing `asset`.
    ///
    /// While the ledger is the only party moving funds under its address,
    /// this equals the ledger's balance of `asset`.
    pub fn escrowed(&self, asset: Address) -> U256 {
        self.orders
            .iter()
            .filter(|order| order.is_open() && order.sell_asset == asset)
            .fold(U256::ZERO, |total, order| total.saturating_add(order.sell_amount))
    }

    /// All notifications emitted so far, oldest first.
    pub fn events(&self) -> &[SwapEvent] {
        &self.events
    }

    /// Drain the notification journal.
    pub fn take_events(&mut self) -> Vec<SwapEvent> {
        std::mem::take(&mut self.events)
    }

    fn next_order_id(&self) -> OrderId {
        self.order_count()
    }

    fn order_mut(&mut self, order_id: OrderId) -> SwapResult<&mut Order> {
        usize::try_from(order_id)
            .ok()
            .and_then(|index| self.orders.get_mut(index))
            .ok_or(SwapError::OrderNotFound(order_id))
    }
}
