use crate::session::BalanceRow;
use swap_lib::SwapEvent;

/// One-line rendering of a ledger event, matching its Solidity signature.
pub fn format_event(event: &SwapEvent) -> String {
    match event {
        SwapEvent::Created(e) => format!(
            "OrderCreated({}, {}, {}, {}, {}, {})",
            e.orderId, e.seller, e.sellAsset, e.sellAmount, e.buyAsset, e.buyAmount
        ),
        SwapEvent::Fulfilled(e) => format!("OrderFulfilled({}, {})", e.orderId, e.buyer),
    }
}

pub fn print_event(event: &SwapEvent, with_log: bool) {
    println!("   📣 {}", format_event(event));
    if with_log {
        let log = event.to_log_data();
        for (i, topic) in log.topics().iter().enumerate() {
            println!("      topic[{i}]: {topic}");
        }
        println!("      data: 0x{}", hex::encode(&log.data));
    }
}

pub fn print_balances(rows: &[BalanceRow]) {
    println!("💰 Balances:");
    let mut current_token = None;
    for row in rows {
        if current_token != Some(&row.token) {
            println!("   {}", row.token);
            current_token = Some(&row.token);
        }
        println!("      {:<12} {} {}", row.account, row.address, row.amount);
    }
}
