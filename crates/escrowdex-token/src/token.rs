//! Fixed-supply fungible token.
//!
//! Every mutating call validates first and writes last, so a rejected
//! call leaves balances, allowances and the event log untouched.

use std::collections::HashMap;

use escrowdex_types::{
    Address, Amount, EscrowdexError, FungibleAsset, Result, TokenConfig, TokenEvent,
};

/// An ERC20-style token with its whole supply minted to the deployer.
#[derive(Debug, Clone)]
pub struct Token {
    address: Address,
    name: String,
    symbol: String,
    decimals: u32,
    total_supply: Amount,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    /// Emitted events (append-only).
    events: Vec<TokenEvent>,
}

impl Token {
    /// Deploy a token at `address`, minting `config.total_supply` to `deployer`.
    #[must_use]
    pub fn new(address: Address, deployer: Address, config: TokenConfig) -> Self {
        let mut balances = HashMap::new();
        balances.insert(deployer, config.total_supply);
        tracing::debug!(
            token = %address,
            symbol = %config.symbol,
            supply = %config.total_supply,
            deployer = %deployer,
            "Token deployed"
        );
        Self {
            address,
            name: config.name,
            symbol: config.symbol,
            decimals: config.decimals,
            total_supply: config.total_supply,
            balances,
            allowances: HashMap::new(),
            events: Vec::new(),
        }
    }

    /// Deploy with the default settings.
    #[must_use]
    pub fn with_defaults(address: Address, deployer: Address) -> Self {
        Self::new(address, deployer, TokenConfig::default())
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    #[must_use]
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// All events emitted so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Validate and apply a balance move. Nothing is written on error.
    fn move_funds(&mut self, from: Address, to: Address, amount: Amount) -> Result<()> {
        if to.is_zero() {
            return Err(EscrowdexError::InvalidRecipient);
        }
        let from_balance = self.balance_of(&from);
        let new_from = from_balance
            .checked_sub(amount)
            .ok_or(EscrowdexError::InsufficientFunds {
                needed: amount,
                available: from_balance,
            })?;
        if from != to {
            let new_to = self
                .balance_of(&to)
                .checked_add(amount)
                .ok_or(EscrowdexError::BalanceOverflow)?;
            self.balances.insert(from, new_from);
            self.balances.insert(to, new_to);
        }
        Ok(())
    }
}

impl FungibleAsset for Token {
    fn address(&self) -> Address {
        self.address
    }

    fn decimals(&self) -> u32 {
        self.decimals
    }

    fn balance_of(&self, owner: &Address) -> Amount {
        self.balances.get(owner).copied().unwrap_or_default()
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or_default()
    }

    fn transfer(&mut self, caller: Address, to: Address, amount: Amount) -> Result<()> {
        self.move_funds(caller, to, amount)?;
        self.events.push(TokenEvent::Transfer {
            from: caller,
            to,
            value: amount,
        });
        tracing::debug!(token = %self.symbol, from = %caller, to = %to, value = %amount, "Transfer");
        Ok(())
    }

    fn approve(&mut self, caller: Address, spender: Address, amount: Amount) -> Result<()> {
        if spender.is_zero() {
            return Err(EscrowdexError::InvalidRecipient);
        }
        self.allowances.insert((caller, spender), amount);
        self.events.push(TokenEvent::Approval {
            owner: caller,
            spender,
            value: amount,
        });
        tracing::debug!(token = %self.symbol, owner = %caller, spender = %spender, value = %amount, "Approval");
        Ok(())
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<()> {
        let allowance = self.allowance(&from, &spender);
        let remaining = allowance
            .checked_sub(amount)
            .ok_or(EscrowdexError::InsufficientAllowance {
                needed: amount,
                allowance,
            })?;
        self.move_funds(from, to, amount)?;
        self.allowances.insert((from, spender), remaining);
        self.events.push(TokenEvent::Transfer {
            from,
            to,
            value: amount,
        });
        tracing::debug!(
            token = %self.symbol,
            spender = %spender,
            from = %from,
            to = %to,
            value = %amount,
            "Delegated transfer"
        );
        Ok(())
    }
}
