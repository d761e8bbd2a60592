use alloy_primitives::{Address, LogData, U256};
use alloy_sol_types::{sol, SolEvent};

use crate::order::{Order, OrderId};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    event OrderCreated(
        uint256 indexed orderId,
        address indexed seller,
        address sellAsset,
        uint256 sellAmount,
        address buyAsset,
        uint256 buyAmount
    );

    #[derive(Debug, PartialEq, Eq)]
    event OrderFulfilled(uint256 indexed orderId, address indexed buyer);
}

/// A notification emitted by the escrow ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwapEvent {
    Created(OrderCreated),
    Fulfilled(OrderFulfilled),
}

impl SwapEvent {
    pub fn created(order: &Order) -> Self {
        SwapEvent::Created(OrderCreated {
            orderId: U256::from(order.id),
            seller: order.seller,
            sellAsset: order.sell_asset,
            sellAmount: order.sell_amount,
            buyAsset: order.buy_asset,
            buyAmount: order.buy_amount,
        })
    }

    pub fn fulfilled(order_id: OrderId, buyer: Address) -> Self {
        SwapEvent::Fulfilled(OrderFulfilled {
            orderId: U256::from(order_id),
            buyer,
        })
    }

    pub fn order_id(&self) -> U256 {
        match self {
            SwapEvent::Created(e) => e.orderId,
            SwapEvent::Fulfilled(e) => e.orderId,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SwapEvent::Created(_) => "OrderCreated",
            SwapEvent::Fulfilled(_) => "OrderFulfilled",
        }
    }

    /// Encodes the event as an EVM log: signature hash and indexed fields as
    /// topics, the remaining fields ABI-encoded as data.
    pub fn to_log_data(&self) -> LogData {
        match self {
            SwapEvent::Created(e) => e.encode_log_data(),
            SwapEvent::Fulfilled(e) => e.encode_log_data(),
        }
    }
}
