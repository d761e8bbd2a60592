use alloy_primitives::{Address, U256};
use swap_lib::*;

/// `value` whole tokens at 18 decimals.
fn units(value: u64) -> U256 {
    U256::from(value) * U256::from(10u64).pow(U256::from(18u64))
}

struct Deployment {
    swap: OrderBasedSwap,
    bank: TokenBank,
    owner: Address,
    other_account: Address,
    token_a: Address,
    token_b: Address,
}

/// Deploys the swap ledger and two test tokens, each minting its full supply
/// to `owner`.
fn deploy_order_based_swap() -> Deployment {
    let owner = Address::repeat_byte(0xf3);
    let other_account = Address::repeat_byte(0x70);
    let swap = OrderBasedSwap::new(Address::repeat_byte(0x5f));

    let mut bank = TokenBank::new();
    let token_a = bank.deploy("TestERC20", "TST", owner, units(1_000_000)).unwrap();
    let token_b = bank.deploy("TestERC20", "TST", owner, units(1_000_000)).unwrap();

    Deployment {
        swap,
        bank,
        owner,
        other_account,
        token_a,
        token_b,
    }
}

/// The owner escrows 100 A asking 50 B.
fn create_first_order(d: &mut Deployment) -> OrderId {
    let ledger = d.swap.address();
    d.bank.approve(d.token_a, d.owner, ledger, units(100)).unwrap();
    d.swap
        .create_order(&mut d.bank, d.owner, d.token_a, units(100), d.token_b, units(50))
        .unwrap()
}

/// Hand the other account 50 B and approve the ledger for it.
fn fund_buyer(d: &mut Deployment) {
    let ledger = d.swap.address();
    d.bank.transfer(d.token_b, d.owner, d.other_account, units(50)).unwrap();
    d.bank
        .approve(d.token_b, d.other_account, ledger, units(50))
        .unwrap();
}

#[test]
fn should_create_an_order_successfully() {
    let mut d = deploy_order_based_swap();

    let id = create_first_order(&mut d);

    assert_eq!(id, 0);
    assert_eq!(
        d.swap.events(),
        &[SwapEvent::Created(OrderCreated {
            orderId: U256::ZERO,
            seller: d.owner,
            sellAsset: d.token_a,
            sellAmount: units(100),
            buyAsset: d.token_b,
            buyAmount: units(50),
        })]
    );
    assert_eq!(d.bank.balance_of(d.token_a, d.swap.address()), units(100));

    let order = d.swap.order(id).unwrap();
    assert_eq!(order.seller, d.owner);
    assert!(order.is_open());
}

#[test]
fn should_fulfill_an_order_successfully() {
    let mut d = deploy_order_based_swap();
    let id = create_first_order(&mut d);
    fund_buyer(&mut d);

    let seller_b_before = d.bank.balance_of(d.token_b, d.owner);
    let buyer_a_before = d.bank.balance_of(d.token_a, d.other_account);
    d.swap.take_events();

    d.swap.fulfill_order(&mut d.bank, d.other_account, id).unwrap();

    assert_eq!(
        d.swap.events(),
        &[SwapEvent::Fulfilled(OrderFulfilled {
            orderId: U256::ZERO,
            buyer: d.other_account,
        })]
    );
    assert_eq!(
        d.bank.balance_of(d.token_b, d.owner),
        seller_b_before + units(50)
    );
    assert_eq!(
        d.bank.balance_of(d.token_a, d.other_account),
        buyer_a_before + units(100)
    );
    assert_eq!(d.swap.is_fulfilled(id), Ok(true));
    assert_eq!(d.bank.balance_of(d.token_a, d.swap.address()), U256::ZERO);
}

#[test]
fn second_fulfillment_fails_without_moving_funds() {
    let mut d = deploy_order_based_swap();
    let id = create_first_order(&mut d);
    fund_buyer(&mut d);
    d.swap.fulfill_order(&mut d.bank, d.other_account, id).unwrap();

    // Give the buyer enough to pay again, so only the order state can reject it.
    let ledger = d.swap.address();
    d.bank.transfer(d.token_b, d.owner, d.other_account, units(50)).unwrap();
    d.bank
        .approve(d.token_b, d.other_account, ledger, units(50))
        .unwrap();
    let balances_before = [
        d.bank.balance_of(d.token_a, d.owner),
        d.bank.balance_of(d.token_b, d.owner),
        d.bank.balance_of(d.token_a, d.other_account),
        d.bank.balance_of(d.token_b, d.other_account),
    ];

    let result = d.swap.fulfill_order(&mut d.bank, d.other_account, id);

    assert_eq!(result, Err(SwapError::AlreadyFulfilled(id)));
    let balances_after = [
        d.bank.balance_of(d.token_a, d.owner),
        d.bank.balance_of(d.token_b, d.owner),
        d.bank.balance_of(d.token_a, d.other_account),
        d.bank.balance_of(d.token_b, d.other_account),
    ];
    assert_eq!(balances_before, balances_after);
}

#[test]
fn fulfilling_a_missing_order_fails() {
    let mut d = deploy_order_based_swap();
    fund_buyer(&mut d);

    assert_eq!(
        d.swap.fulfill_order(&mut d.bank, d.other_account, 0),
        Err(SwapError::OrderNotFound(0))
    );
}

#[test]
fn custody_tracks_open_orders_across_assets() {
    let mut d = deploy_order_based_swap();
    let ledger = d.swap.address();

    let first = create_first_order(&mut d);
    d.bank.approve(d.token_b, d.owner, ledger, units(30)).unwrap();
    let second = d
        .swap
        .create_order(&mut d.bank, d.owner, d.token_b, units(30), d.token_a, units(60))
        .unwrap();
    assert!(second > first);

    for asset in [d.token_a, d.token_b] {
        assert_eq!(d.bank.balance_of(asset, ledger), d.swap.escrowed(asset));
    }

    fund_buyer(&mut d);
    d.swap.fulfill_order(&mut d.bank, d.other_account, first).unwrap();

    for asset in [d.token_a, d.token_b] {
        assert_eq!(d.bank.balance_of(asset, ledger), d.swap.escrowed(asset));
    }
    assert_eq!(d.bank.balance_of(d.token_a, ledger), U256::ZERO);
    assert_eq!(d.bank.balance_of(d.token_b, ledger), units(30));
    assert_eq!(d.swap.is_fulfilled(second), Ok(false));
}

#[test]
fn events_render_as_logs_in_emission_order() {
    let mut d = deploy_order_based_swap();
    let id = create_first_order(&mut d);
    fund_buyer(&mut d);
    d.swap.fulfill_order(&mut d.bank, d.other_account, id).unwrap();

    let names: Vec<&str> = d.swap.events().iter().map(SwapEvent::name).collect();
    assert_eq!(names, ["OrderCreated", "OrderFulfilled"]);

    let logs: Vec<_> = d.swap.events().iter().map(SwapEvent::to_log_data).collect();
    assert_eq!(logs[0].topics()[1], logs[1].topics()[1]);
}
