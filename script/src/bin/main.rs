//! An end-to-end walk through an order-based swap: a seller escrows token A
//! asking for token B, a buyer fulfills the order, and the ledger refuses a
//! second fulfillment and an unknown order.
//!
//! You can run this script using the following command:
//! ```shell
//! RUST_LOG=info cargo run --release -- --sell-amount 100 --buy-amount 50
//! ```

use alloy_primitives::hex::FromHex;
use alloy_primitives::{Address, U256};
use clap::Parser;
use swap_lib::{AssetTransfer, OrderBasedSwap, SwapError, TokenBank};
use swap_script::logging::init_logging;
use swap_script::report::print_event;

/// The arguments for the command.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Units of token A the seller escrows
    #[arg(long, default_value_t = 100)]
    sell_amount: u64,

    /// Units of token B the seller asks for
    #[arg(long, default_value_t = 50)]
    buy_amount: u64,

    /// Print every event as EVM log topics and data
    #[arg(long)]
    logs: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    init_logging(false);

    let args = Args::parse();
    let sell_amount = U256::from(args.sell_amount);
    let buy_amount = U256::from(args.buy_amount);

    let seller = Address::from_hex("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266")?;
    let buyer = Address::from_hex("0x70997970C51812dc3A010C7d01b50e0d17dc79C8")?;
    let ledger = Address::from_hex("0x5FbDB2315678afecb367f032d93F642f64180aa3")?;

    let mut bank = TokenBank::new();
    let supply = U256::from(1_000_000u64);
    let token_a = bank.deploy("Token A", "TKA", seller, supply)?;
    let token_b = bank.deploy("Token B", "TKB", seller, supply)?;
    let mut swap = OrderBasedSwap::new(ledger);

    println!("📋 Ledger:  {ledger}");
    println!("   Token A: {token_a}");
    println!("   Token B: {token_b}\n");

    // Escrow
    println!("📝 Seller escrows {sell_amount} A for {buy_amount} B");
    bank.approve(token_a, seller, ledger, sell_amount)?;
    let order_id = swap.create_order(&mut bank, seller, token_a, sell_amount, token_b, buy_amount)?;
    for event in swap.take_events() {
        print_event(&event, args.logs);
    }
    println!("   Ledger holds {} A\n", bank.balance_of(token_a, ledger));

    // Fulfillment
    bank.transfer(token_b, seller, buyer, buy_amount)?;
    bank.approve(token_b, buyer, ledger, buy_amount)?;
    let seller_b_before = bank.balance_of(token_b, seller);
    let buyer_a_before = bank.balance_of(token_a, buyer);

    println!("📤 Buyer fulfills order {order_id}");
    swap.fulfill_order(&mut bank, buyer, order_id)?;
    for event in swap.take_events() {
        print_event(&event, args.logs);
    }
    println!(
        "   Seller B: +{}",
        bank.balance_of(token_b, seller) - seller_b_before
    );
    println!(
        "   Buyer A:  +{}",
        bank.balance_of(token_a, buyer) - buyer_a_before
    );
    println!("   Fulfilled: {}\n", swap.is_fulfilled(order_id)?);

    // The order is closed for good
    println!("🔁 Buyer tries order {order_id} again");
    match swap.fulfill_order(&mut bank, buyer, order_id) {
        Err(e @ SwapError::AlreadyFulfilled(_)) => println!("   Rejected: {e}\n"),
        other => return Err(format!("expected AlreadyFulfilled, got {other:?}").into()),
    }

    // Unknown order
    let missing = swap.order_count();
    println!("❓ Buyer tries order {missing}");
    match swap.fulfill_order(&mut bank, buyer, missing) {
        Err(e @ SwapError::OrderNotFound(_)) => println!("   Rejected: {e}\n"),
        other => return Err(format!("expected OrderNotFound, got {other:?}").into()),
    }

    println!("✅ Swap behaved as expected");
    Ok(())
}
