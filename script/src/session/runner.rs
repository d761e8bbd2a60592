use super::{derive_address, parse_amount, Action, Session, SessionError};
use alloy_primitives::{Address, U256};
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;
use swap_lib::{AssetTransfer, OrderBasedSwap, SwapEvent, TokenBank};
use tracing::{info, warn};

/// Name the ledger's custody account is listed under in balance reports.
pub const LEDGER_ACCOUNT: &str = "ledger";

/// Outcome of one replayed action.
#[derive(Debug)]
pub struct StepReport {
    pub index: usize,
    pub action: Action,
    pub result: Result<String, SessionError>,
    /// Events the ledger emitted while executing this step.
    pub events: Vec<SwapEvent>,
}

#[derive(Debug, Serialize)]
pub struct BalanceRow {
    pub account: String,
    pub address: Address,
    pub token: String,
    pub amount: U256,
}

/// Replays session actions against a fresh ledger and token bank.
pub struct SessionRunner {
    swap: OrderBasedSwap,
    bank: TokenBank,
    accounts: BTreeMap<String, Address>,
    tokens: BTreeMap<String, Address>,
}

impl SessionRunner {
    /// `ledger_override` takes precedence over the session's own ledger
    /// address.
    pub fn new(session: &Session, ledger_override: Option<&str>) -> Result<Self, SessionError> {
        let mut accounts = BTreeMap::new();
        for (name, value) in &session.accounts {
            let address = Address::from_str(value).map_err(|_| SessionError::InvalidAddress {
                name: name.clone(),
                value: value.clone(),
            })?;
            accounts.insert(name.clone(), address);
        }

        let ledger = match ledger_override.or(session.ledger.as_deref()) {
            Some(value) => Address::from_str(value).map_err(|_| SessionError::InvalidAddress {
                name: LEDGER_ACCOUNT.to_string(),
                value: value.to_string(),
            })?,
            None => derive_address(LEDGER_ACCOUNT),
        };
        accounts.insert(LEDGER_ACCOUNT.to_string(), ledger);

        Ok(Self {
            swap: OrderBasedSwap::new(ledger),
            bank: TokenBank::new(),
            accounts,
            tokens: BTreeMap::new(),
        })
    }

    pub fn swap(&self) -> &OrderBasedSwap {
        &self.swap
    }

    pub fn bank(&self) -> &TokenBank {
        &self.bank
    }

    /// Run every action in order. Failed steps are recorded and the replay
    /// continues, unless `strict` is set, in which case the first failure is
    /// returned.
    pub fn run(
        &mut self,
        actions: &[Action],
        strict: bool,
    ) -> Result<Vec<StepReport>, SessionError> {
        let mut reports = Vec::with_capacity(actions.len());
        for (index, action) in actions.iter().enumerate() {
            let result = self.apply(action);
            match &result {
                Ok(summary) => info!(step = index, "{summary}"),
                Err(e) => warn!(step = index, "{} failed: {e}", action.describe()),
            }
            if strict {
                if let Err(e) = &result {
                    return Err(e.clone());
                }
            }
            reports.push(StepReport {
                index,
                action: action.clone(),
                result,
                events: self.swap.take_events(),
            });
        }
        Ok(reports)
    }

    pub fn apply(&mut self, action: &Action) -> Result<String, SessionError> {
        let ledger = self.swap.address();
        match action {
            Action::Deploy {
                token,
                name,
                owner,
                supply,
            } => {
                if self.tokens.contains_key(token) {
                    return Err(SessionError::DuplicateToken(token.clone()));
                }
                let owner = self.account(owner);
                let supply = parse_amount(supply)?;
                let name = name.clone().unwrap_or_else(|| token.clone());
                let asset = self.bank.deploy(&name, token, owner, supply)?;
                self.tokens.insert(token.clone(), asset);
                Ok(format!("deployed {token} at {asset}"))
            }
            Action::Transfer {
                token,
                from,
                to,
                amount,
            } => {
                let asset = self.token(token)?;
                let amount = parse_amount(amount)?;
                let (from, to) = (self.account(from), self.account(to));
                self.bank.transfer(asset, from, to, amount)?;
                Ok(format!("transferred {amount} {token}"))
            }
            Action::Approve {
                token,
                owner,
                amount,
            } => {
                let asset = self.token(token)?;
                let amount = parse_amount(amount)?;
                let owner = self.account(owner);
                self.bank.approve(asset, owner, ledger, amount)?;
                Ok(format!("approved ledger for {amount} {token}"))
            }
            Action::CreateOrder {
                seller,
                sell_token,
                sell_amount,
                buy_token,
                buy_amount,
            } => {
                let sell_asset = self.token(sell_token)?;
                let buy_asset = self.token(buy_token)?;
                let sell_amount = parse_amount(sell_amount)?;
                let buy_amount = parse_amount(buy_amount)?;
                let seller = self.account(seller);
                let order_id = self.swap.create_order(
                    &mut self.bank,
                    seller,
                    sell_asset,
                    sell_amount,
                    buy_asset,
                    buy_amount,
                )?;
                Ok(format!("created order {order_id}"))
            }
            Action::FulfillOrder { buyer, order_id } => {
                let buyer = self.account(buyer);
                self.swap.fulfill_order(&mut self.bank, buyer, *order_id)?;
                Ok(format!("fulfilled order {order_id}"))
            }
        }
    }

    /// Balance of every known account in every deployed token, including the
    /// ledger's custody account.
    pub fn balances(&self) -> Vec<BalanceRow> {
        let mut rows = Vec::new();
        for (token, asset) in &self.tokens {
            for (account, address) in &self.accounts {
                rows.push(BalanceRow {
                    account: account.clone(),
                    address: *address,
                    token: token.clone(),
                    amount: self.bank.balance_of(*asset, *address),
                });
            }
        }
        rows
    }

    /// Resolves an account name, remembering derived addresses so they show
    /// up in balance reports.
    fn account(&mut self, name: &str) -> Address {
        *self
            .accounts
            .entry(name.to_string())
            .or_insert_with(|| derive_address(name))
    }

    fn token(&self, token: &str) -> Result<Address, SessionError> {
        self.tokens
            .get(token)
            .copied()
            .ok_or_else(|| SessionError::UnknownToken(token.to_string()))
    }
}
