//! In-memory ERC-20 style token bank
//!
//! Holds any number of fungible tokens, each keyed by the address it was
//! deployed at. Implements [`AssetTransfer`] so it can back an escrow ledger
//! in tests, demos, and session replays.

use std::collections::BTreeMap;

use alloy_primitives::{keccak256, Address, U256};
use tracing::debug;

use crate::assets::AssetTransfer;
use crate::errors::{TransferError, TransferResult};

/// A single fungible token
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Token {
    pub name: String,
    pub symbol: String,
    total_supply: U256,
    balances: BTreeMap<Address, U256>,
    allowances: BTreeMap<(Address, Address), U256>,
}

impl Token {
    pub fn total_supply(&self) -> U256 {
        self.total_supply
    }

    pub fn balance_of(&self, owner: &Address) -> U256 {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> U256 {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    fn mint(&mut self, to: Address, amount: U256) -> TransferResult<()> {
        self.total_supply = self
            .total_supply
            .checked_add(amount)
            .ok_or(TransferError::Overflow)?;
        let balance = self.balance_of(&to);
        // Cannot overflow: every balance is bounded by total_supply.
        self.balances.insert(to, balance + amount);
        Ok(())
    }

    fn move_balance(&mut self, from: Address, to: Address, amount: U256) -> TransferResult<()> {
        let from_balance = self.balance_of(&from);
        if from_balance < amount {
            return Err(TransferError::InsufficientBalance {
                have: from_balance,
                need: amount,
            });
        }
        self.balances.insert(from, from_balance - amount);
        let to_balance = self.balance_of(&to);
        self.balances.insert(to, to_balance + amount);
        Ok(())
    }

    fn spend_allowance(&mut self, owner: Address, spender: Address, amount: U256) -> TransferResult<()> {
        let allowed = self.allowance(&owner, &spender);
        if allowed == U256::MAX {
            return Ok(());
        }
        if allowed < amount {
            return Err(TransferError::InsufficientAllowance {
                have: allowed,
                need: amount,
            });
        }
        self.allowances.insert((owner, spender), allowed - amount);
        Ok(())
    }
}

/// Collection of deployed tokens
#[derive(Debug, Clone, Default)]
pub struct TokenBank {
    tokens: BTreeMap<Address, Token>,
    deployments: u64,
}

impl TokenBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deploy a new token, minting `initial_supply` to `owner`.
    ///
    /// The token address is derived from the owner and a bank-wide deployment
    /// counter, so repeated deployments never collide.
    pub fn deploy(
        &mut self,
        name: &str,
        symbol: &str,
        owner: Address,
        initial_supply: U256,
    ) -> TransferResult<Address> {
        let mut seed = Vec::with_capacity(28);
        seed.extend_from_slice(owner.as_slice());
        seed.extend_from_slice(&self.deployments.to_be_bytes());
        let asset = Address::from_word(keccak256(&seed));

        let mut token = Token {
            name: name.to_string(),
            symbol: symbol.to_string(),
            ..Default::default()
        };
        token.mint(owner, initial_supply)?;

        self.deployments += 1;
        self.tokens.insert(asset, token);
        debug!(%asset, symbol, %owner, %initial_supply, "token deployed");
        Ok(asset)
    }

    pub fn token(&self, asset: &Address) -> Option<&Token> {
        self.tokens.get(asset)
    }

    pub fn assets(&self) -> impl Iterator<Item = (&Address, &Token)> {
        self.tokens.iter()
    }

    /// Set the allowance `owner` grants `spender`, replacing any previous value.
    pub fn approve(
        &mut self,
        asset: Address,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> TransferResult<()> {
        let token = self.token_mut(asset)?;
        token.allowances.insert((owner, spender), amount);
        debug!(%asset, %owner, %spender, %amount, "approval");
        Ok(())
    }

    pub fn allowance(&self, asset: Address, owner: Address, spender: Address) -> U256 {
        self.tokens
            .get(&asset)
            .map(|token| token.allowance(&owner, &spender))
            .unwrap_or_default()
    }

    pub fn total_supply(&self, asset: Address) -> U256 {
        self.tokens
            .get(&asset)
            .map(Token::total_supply)
            .unwrap_or_default()
    }

    fn token_mut(&mut self, asset: Address) -> TransferResult<&mut Token> {
        self.tokens
            .get_mut(&asset)
            .ok_or(TransferError::UnknownAsset(asset))
    }
}

impl AssetTransfer for TokenBank {
    type Checkpoint = BTreeMap<Address, Token>;

    fn transfer_from(
        &mut self,
        spender: Address,
        asset: Address,
        owner: Address,
        recipient: Address,
        amount: U256,
    ) -> TransferResult<()> {
        let token = self.token_mut(asset)?;
        // Check the balance before touching the allowance so a failed call
        // changes nothing.
        let have = token.balance_of(&owner);
        if have < amount {
            return Err(TransferError::InsufficientBalance { have, need: amount });
        }
        token.spend_allowance(owner, spender, amount)?;
        token.move_balance(owner, recipient, amount)?;
        debug!(%asset, %owner, %recipient, %spender, %amount, "transfer_from");
        Ok(())
    }

    fn transfer(
        &mut self,
        asset: Address,
        owner: Address,
        recipient: Address,
        amount: U256,
    ) -> TransferResult<()> {
        self.token_mut(asset)?.move_balance(owner, recipient, amount)?;
        debug!(%asset, %owner, %recipient, %amount, "transfer");
        Ok(())
    }

    fn balance_of(&self, asset: Address, owner: Address) -> U256 {
        self.tokens
            .get(&asset)
            .map(|token| token.balance_of(&owner))
            .unwrap_or_default()
    }

    fn checkpoint(&self) -> Self::Checkpoint {
        self.tokens.clone()
    }

    fn revert_to(&mut self, checkpoint: Self::Checkpoint) {
        self.tokens = checkpoint;
    }
}
