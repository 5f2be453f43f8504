//! Exchange facade: the only surface external callers touch.
//!
//! Each operation validates, performs one atomic mutation of the ledger or
//! the order book, then appends one event. A failed operation leaves
//! balances, orders, custody and the event log exactly as they were.

use chrono::Utc;
use escrowdex_types::constants::{ENGINE_NAME, VERSION};
use escrowdex_types::{
    Address, Amount, Deposit, EscrowdexError, ExchangeConfig, ExchangeEvent, NATIVE_ASSET, Order,
    OrderCancelled, OrderId, OrderPlaced, Result, SharedAsset, Withdraw,
};

use crate::balance_ledger::BalanceLedger;
use crate::order_book::OrderBookState;
use crate::registry::AssetRegistry;
use crate::supply_conservation::SupplyConservation;

/// Custodial exchange: escrowed balances, resting orders, fee settings.
#[derive(Debug)]
pub struct Exchange {
    /// Custody account; token allowances are granted to this address.
    address: Address,
    config: ExchangeConfig,
    ledger: BalanceLedger,
    book: OrderBookState,
    registry: AssetRegistry,
    supply: SupplyConservation,
    /// Native value currently held on behalf of depositors.
    native_custody: Amount,
    /// Emitted events log (append-only).
    events: Vec<ExchangeEvent>,
}

impl Exchange {
    /// Create an exchange with custody account `address`.
    ///
    /// # Errors
    /// - `InvalidFeePercent` if the config's fee is above 100
    /// - `Configuration` if `address` is the zero address
    pub fn new(address: Address, config: ExchangeConfig) -> Result<Self> {
        config.validate()?;
        if address.is_zero() {
            return Err(EscrowdexError::Configuration(
                "exchange address must be non-zero".to_string(),
            ));
        }
        tracing::info!(
            engine = ENGINE_NAME,
            version = VERSION,
            exchange = %address,
            fee_account = %config.fee_account,
            fee_percent = config.fee_percent,
            "Exchange created"
        );
        Ok(Self {
            address,
            config,
            ledger: BalanceLedger::new(),
            book: OrderBookState::new(),
            registry: AssetRegistry::new(),
            supply: SupplyConservation::new(),
            native_custody: Amount::ZERO,
            events: Vec::new(),
        })
    }

    // -----------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------

    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    #[must_use]
    pub fn fee_account(&self) -> Address {
        self.config.fee_account
    }

    #[must_use]
    pub fn fee_percent(&self) -> u8 {
        self.config.fee_percent
    }

    #[must_use]
    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Make a fungible asset depositable.
    pub fn register_asset(&mut self, asset: SharedAsset) -> Result<Address> {
        let address = self.registry.register(asset)?;
        tracing::info!(asset = %address, "Asset registered");
        Ok(address)
    }

    /// Shared handle of a registered asset.
    pub fn asset(&self, address: &Address) -> Result<SharedAsset> {
        self.registry.get(address)
    }

    #[must_use]
    pub fn registered_assets(&self) -> Vec<Address> {
        self.registry.addresses()
    }

    // -----------------------------------------------------------------
    // Deposits
    // -----------------------------------------------------------------

    /// Pull `amount` of a fungible asset from `caller` into escrow.
    ///
    /// `caller` must have approved the exchange address for at least
    /// `amount` beforehand.
    ///
    /// # Errors
    /// - `WrongAssetPath` if `asset` is the native sentinel
    /// - `ZeroAmount` if `amount` is zero
    /// - `UnknownAsset` if `asset` is not registered
    /// - `InsufficientAllowance` if the asset declines the delegated transfer
    /// - `BalanceOverflow` if a balance or running total would not fit
    pub fn deposit_token(
        &mut self,
        asset: Address,
        amount: Amount,
        caller: Address,
    ) -> Result<Deposit> {
        if asset.is_native() {
            tracing::warn!(user = %caller, %amount, "Native asset rejected on token deposit path");
            return Err(EscrowdexError::WrongAssetPath {
                operation: "deposit_token",
            });
        }
        if amount.is_zero() {
            tracing::warn!(user = %caller, asset = %asset, "Zero token deposit rejected");
            return Err(EscrowdexError::ZeroAmount);
        }
        let handle = self.registry.get(&asset)?;
        self.supply.check_deposit(asset, amount)?;

        let custody = self.address;
        let balance = self.ledger.deposit_with(asset, caller, amount, || {
            let mut token = handle.lock();
            let pulled = token.transfer_from(custody, caller, custody, amount);
            pulled.map_err(|err| {
                let allowance = token.allowance(&caller, &custody);
                tracing::warn!(
                    asset = %asset,
                    user = %caller,
                    %amount,
                    %allowance,
                    error = %err,
                    "Token deposit not honored by asset"
                );
                EscrowdexError::InsufficientAllowance {
                    needed: amount,
                    allowance,
                }
            })
        })?;
        self.supply.record_deposit(asset, amount)?;

        Ok(self.emit_deposit(asset, caller, amount, balance))
    }

    /// Credit `value` of native asset sent along with the call.
    ///
    /// Any value, including zero, is accepted.
    ///
    /// # Errors
    /// `BalanceOverflow` if a balance or running total would not fit.
    pub fn deposit_ether(&mut self, caller: Address, value: Amount) -> Result<Deposit> {
        let custody = self
            .native_custody
            .checked_add(value)
            .ok_or(EscrowdexError::BalanceOverflow)?;
        self.supply.check_deposit(NATIVE_ASSET, value)?;

        let balance = self.ledger.deposit(NATIVE_ASSET, caller, value)?;
        self.native_custody = custody;
        self.supply.record_deposit(NATIVE_ASSET, value)?;

        Ok(self.emit_deposit(NATIVE_ASSET, caller, value, balance))
    }

    /// Native value sent to the exchange outside [`Exchange::deposit_ether`].
    ///
    /// Always rejected; the value is never credited.
    pub fn direct_transfer(&self, caller: Address, value: Amount) -> Result<()> {
        tracing::warn!(exchange = %self.address, from = %caller, %value, "Direct transfer rejected");
        Err(EscrowdexError::DirectTransferRejected { value })
    }

    fn emit_deposit(
        &mut self,
        asset: Address,
        user: Address,
        amount: Amount,
        balance: Amount,
    ) -> Deposit {
        let event = Deposit {
            asset,
            user,
            amount,
            balance,
        };
        tracing::info!(asset = %asset, user = %user, %amount, %balance, "Deposit");
        self.events.push(ExchangeEvent::Deposit(event.clone()));
        event
    }

    // -----------------------------------------------------------------
    // Withdrawals
    // -----------------------------------------------------------------

    /// Release `amount` of a fungible asset from escrow back to `caller`.
    ///
    /// # Errors
    /// - `WrongAssetPath` if `asset` is the native sentinel
    /// - `UnknownAsset` if `asset` is not registered
    /// - `InsufficientBalance` if the escrowed balance is below `amount`
    /// - `TransferRejected` if the asset refuses to release custody
    pub fn withdraw_token(
        &mut self,
        asset: Address,
        amount: Amount,
        caller: Address,
    ) -> Result<Withdraw> {
        if asset.is_native() {
            tracing::warn!(user = %caller, %amount, "Native asset rejected on token withdraw path");
            return Err(EscrowdexError::WrongAssetPath {
                operation: "withdraw_token",
            });
        }
        let handle = self.registry.get(&asset)?;
        self.supply.check_withdrawal(asset, amount)?;

        let custody = self.address;
        let balance = self
            .ledger
            .withdraw_with(asset, caller, amount, || {
                handle
                    .lock()
                    .transfer(custody, caller, amount)
                    .map_err(|err| EscrowdexError::TransferRejected {
                        reason: err.to_string(),
                    })
            })
            .inspect_err(|err| {
                tracing::warn!(asset = %asset, user = %caller, %amount, error = %err, "Token withdrawal failed");
            })?;
        self.supply.record_withdrawal(asset, amount)?;

        Ok(self.emit_withdraw(asset, caller, amount, balance))
    }

    /// Release `amount` of native asset from escrow back to `caller`.
    ///
    /// # Errors
    /// - `InsufficientBalance` if the escrowed balance is below `amount`
    /// - `SupplyInvariantViolation` if native custody cannot cover it
    pub fn withdraw_ether(&mut self, amount: Amount, caller: Address) -> Result<Withdraw> {
        self.supply.check_withdrawal(NATIVE_ASSET, amount)?;

        let mut custody = self.native_custody;
        let balance = self
            .ledger
            .withdraw_with(NATIVE_ASSET, caller, amount, || {
                custody = custody.checked_sub(amount).ok_or_else(|| {
                    EscrowdexError::SupplyInvariantViolation {
                        reason: format!("native custody {custody} cannot release {amount}"),
                    }
                })?;
                Ok(())
            })
            .inspect_err(|err| {
                tracing::warn!(user = %caller, %amount, error = %err, "Ether withdrawal failed");
            })?;
        self.native_custody = custody;
        self.supply.record_withdrawal(NATIVE_ASSET, amount)?;

        Ok(self.emit_withdraw(NATIVE_ASSET, caller, amount, balance))
    }

    fn emit_withdraw(
        &mut self,
        asset: Address,
        user: Address,
        amount: Amount,
        balance: Amount,
    ) -> Withdraw {
        let event = Withdraw {
            asset,
            user,
            amount,
            balance,
        };
        tracing::info!(asset = %asset, user = %user, %amount, %balance, "Withdraw");
        self.events.push(ExchangeEvent::Withdraw(event.clone()));
        event
    }

    // -----------------------------------------------------------------
    // Balances
    // -----------------------------------------------------------------

    /// Escrowed balance of `owner` in any asset, native sentinel included.
    #[must_use]
    pub fn balance_of(&self, asset: Address, owner: Address) -> Amount {
        self.ledger.balance_of(asset, owner)
    }

    /// Escrowed balance of `owner` in a fungible asset.
    ///
    /// # Errors
    /// `WrongAssetPath` if `asset` is the native sentinel.
    pub fn balance_of_token(&self, asset: Address, owner: Address) -> Result<Amount> {
        if asset.is_native() {
            return Err(EscrowdexError::WrongAssetPath {
                operation: "balance_of_token",
            });
        }
        Ok(self.ledger.balance_of(asset, owner))
    }

    /// Escrowed native balance of `owner`.
    #[must_use]
    pub fn balance_of_ether(&self, owner: Address) -> Amount {
        self.ledger.balance_of(NATIVE_ASSET, owner)
    }

    /// Native value held in custody.
    #[must_use]
    pub fn native_custody(&self) -> Amount {
        self.native_custody
    }

    // -----------------------------------------------------------------
    // Orders
    // -----------------------------------------------------------------

    /// Place a resting order. No funds are reserved.
    ///
    /// # Errors
    /// `OrderIdExhausted` if no further id can be issued.
    pub fn make_order(
        &mut self,
        asset_wanted: Address,
        amount_wanted: Amount,
        asset_offered: Address,
        amount_offered: Amount,
        caller: Address,
    ) -> Result<OrderPlaced> {
        let order = self.book.make_order(
            caller,
            asset_wanted,
            amount_wanted,
            asset_offered,
            amount_offered,
            Utc::now(),
        )?;
        let event = OrderPlaced::from_order(order);
        tracing::info!(
            order = %event.id,
            user = %caller,
            asset_wanted = %asset_wanted,
            %amount_wanted,
            asset_offered = %asset_offered,
            %amount_offered,
            "Order placed"
        );
        self.events.push(ExchangeEvent::Order(event.clone()));
        Ok(event)
    }

    /// Cancel an order owned by `caller`.
    ///
    /// # Errors
    /// - `OrderNotFound` if `id` was never issued
    /// - `Unauthorized` if `caller` is not the order's owner
    pub fn cancel_order(&mut self, id: OrderId, caller: Address) -> Result<OrderCancelled> {
        let cancelled_at = Utc::now();
        let order = self.book.cancel_order(id, caller).inspect_err(|err| {
            tracing::warn!(order = %id, caller = %caller, error = %err, "Cancel rejected");
        })?;
        let event = OrderCancelled::from_order(order, cancelled_at);
        tracing::info!(order = %id, user = %caller, "Order cancelled");
        self.events.push(ExchangeEvent::Cancel(event.clone()));
        Ok(event)
    }

    #[must_use]
    pub fn order(&self, id: OrderId) -> Option<&Order> {
        self.book.order(id)
    }

    #[must_use]
    pub fn is_cancelled(&self, id: OrderId) -> bool {
        self.book.is_cancelled(id)
    }

    /// Number of orders ever placed.
    #[must_use]
    pub fn order_count(&self) -> u64 {
        self.book.order_count()
    }

    pub fn orders_of(&self, owner: Address) -> impl Iterator<Item = &Order> {
        self.book.orders_of(owner)
    }

    pub fn open_orders(&self) -> impl Iterator<Item = &Order> {
        self.book.open_orders()
    }

    // -----------------------------------------------------------------
    // Events & invariants
    // -----------------------------------------------------------------

    /// Every event emitted so far, oldest first.
    #[must_use]
    pub fn events(&self) -> &[ExchangeEvent] {
        &self.events
    }

    /// Verify supply conservation and custody coverage for one asset.
    ///
    /// Checks that the ledger total equals deposits minus withdrawals, and
    /// that the value in custody covers the ledger total.
    ///
    /// # Errors
    /// `SupplyInvariantViolation` on any mismatch.
    pub fn verify_supply(&self, asset: Address) -> Result<()> {
        let held = self.ledger.total_held(asset)?;
        self.supply.verify(asset, held)?;

        let in_custody = if asset.is_native() {
            self.native_custody
        } else {
            self.registry.get(&asset)?.lock().balance_of(&self.address)
        };
        if in_custody < held {
            tracing::error!(asset = %asset, %held, %in_custody, "Custody does not cover ledger");
            return Err(EscrowdexError::SupplyInvariantViolation {
                reason: format!("Asset {asset}: custody {in_custody} < ledger total {held}"),
            });
        }
        Ok(())
    }

    /// [`Exchange::verify_supply`] for every asset that has seen a deposit
    /// or withdrawal.
    pub fn verify_all_supply(&self) -> Result<()> {
        self.supply
            .tracked_assets()
            .into_iter()
            .try_for_each(|asset| self.verify_supply(asset))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use escrowdex_token::Token;
    use escrowdex_types::FungibleAsset;
    use parking_lot::Mutex;

    use super::*;

    struct Fixture {
        exchange: Exchange,
        token: Arc<Mutex<Token>>,
        token_addr: Address,
        deployer: Address,
        fee_account: Address,
        user1: Address,
    }

    fn setup() -> Fixture {
        let deployer = Address::derive("deployer");
        let fee_account = Address::derive("fee-account");
        let user1 = Address::derive("user1");
        let token_addr = Address::derive("token");

        let config = ExchangeConfig::new(fee_account, 10).unwrap();
        let mut exchange = Exchange::new(Address::derive("exchange"), config).unwrap();

        let token = Arc::new(Mutex::new(Token::with_defaults(token_addr, deployer)));
        token
            .lock()
            .transfer(deployer, user1, Amount::tokens(100))
            .unwrap();
        let shared: SharedAsset = token.clone();
        exchange.register_asset(shared).unwrap();

        Fixture {
            exchange,
            token,
            token_addr,
            deployer,
            fee_account,
            user1,
        }
    }

    fn approve(f: &Fixture, amount: Amount) {
        f.token
            .lock()
            .approve(f.user1, f.exchange.address(), amount)
            .unwrap();
    }

    #[test]
    fn tracks_fee_account_and_percent() {
        let f = setup();
        assert_eq!(f.exchange.fee_account(), f.fee_account);
        assert_eq!(f.exchange.fee_percent(), 10);
    }

    #[test]
    fn rejects_invalid_construction() {
        let cfg = ExchangeConfig {
            fee_account: Address::derive("fees"),
            fee_percent: 101,
        };
        assert!(matches!(
            Exchange::new(Address::derive("exchange"), cfg),
            Err(EscrowdexError::InvalidFeePercent { fee_percent: 101 })
        ));

        let cfg = ExchangeConfig::new(Address::derive("fees"), 1).unwrap();
        assert!(matches!(
            Exchange::new(Address::ZERO, cfg),
            Err(EscrowdexError::Configuration(_))
        ));
    }

    #[test]
    fn token_deposit_moves_custody_and_credits() {
        let mut f = setup();
        let amount = Amount::tokens(10);
        approve(&f, amount);

        let event = f
            .exchange
            .deposit_token(f.token_addr, amount, f.user1)
            .unwrap();

        assert_eq!(
            f.token.lock().balance_of(&f.exchange.address()),
            amount
        );
        assert_eq!(f.exchange.balance_of(f.token_addr, f.user1), amount);
        assert_eq!(event.asset, f.token_addr);
        assert_eq!(event.user, f.user1);
        assert_eq!(event.amount, amount);
        assert_eq!(event.balance, amount);
        assert_eq!(f.exchange.events(), &[ExchangeEvent::Deposit(event)]);
    }

    #[test]
    fn token_deposit_rejects_ether() {
        let mut f = setup();
        let err = f
            .exchange
            .deposit_token(NATIVE_ASSET, Amount::tokens(10), f.user1)
            .unwrap_err();
        assert!(matches!(err, EscrowdexError::WrongAssetPath { .. }));
        assert!(f.exchange.events().is_empty());
    }

    #[test]
    fn token_deposit_rejects_unapproved() {
        let mut f = setup();
        let err = f
            .exchange
            .deposit_token(f.token_addr, Amount::tokens(10), f.user1)
            .unwrap_err();
        assert_eq!(
            err,
            EscrowdexError::InsufficientAllowance {
                needed: Amount::tokens(10),
                allowance: Amount::ZERO,
            }
        );
        assert_eq!(f.exchange.balance_of(f.token_addr, f.user1), Amount::ZERO);
        assert_eq!(f.token.lock().balance_of(&f.user1), Amount::tokens(100));
    }

    #[test]
    fn token_deposit_rejects_zero() {
        let mut f = setup();
        approve(&f, Amount::ZERO);
        let err = f
            .exchange
            .deposit_token(f.token_addr, Amount::ZERO, f.user1)
            .unwrap_err();
        assert_eq!(err, EscrowdexError::ZeroAmount);
    }

    #[test]
    fn token_deposit_unknown_asset() {
        let mut f = setup();
        let stranger = Address::derive("other-token");
        let err = f
            .exchange
            .deposit_token(stranger, Amount::tokens(1), f.user1)
            .unwrap_err();
        assert_eq!(err, EscrowdexError::UnknownAsset(stranger));
    }

    #[test]
    fn approved_but_unfunded_deposit_is_not_honored() {
        let mut f = setup();
        let broke = Address::derive("broke");
        f.token
            .lock()
            .approve(broke, f.exchange.address(), Amount::tokens(5))
            .unwrap();
        let err = f
            .exchange
            .deposit_token(f.token_addr, Amount::tokens(5), broke)
            .unwrap_err();
        assert!(matches!(err, EscrowdexError::InsufficientAllowance { .. }));
        assert_eq!(f.exchange.balance_of(f.token_addr, broke), Amount::ZERO);
    }

    #[test]
    fn ether_deposit_and_withdraw() {
        let mut f = setup();
        let event = f
            .exchange
            .deposit_ether(f.user1, Amount::ether(1))
            .unwrap();
        assert_eq!(event.asset, NATIVE_ASSET);
        assert_eq!(event.balance, Amount::ether(1));
        assert_eq!(f.exchange.native_custody(), Amount::ether(1));

        let event = f
            .exchange
            .withdraw_ether(Amount::new(400), f.user1)
            .unwrap();
        assert_eq!(event.asset, NATIVE_ASSET);
        assert_eq!(event.amount, Amount::new(400));
        assert_eq!(
            f.exchange.balance_of_ether(f.user1),
            Amount::new(Amount::ether(1).get() - 400)
        );
        assert_eq!(f.exchange.native_custody(), f.exchange.balance_of_ether(f.user1));
    }

    #[test]
    fn ether_overdraw_rejected() {
        let mut f = setup();
        f.exchange.deposit_ether(f.user1, Amount::ether(1)).unwrap();
        let err = f
            .exchange
            .withdraw_ether(Amount::ether(2), f.user1)
            .unwrap_err();
        assert!(matches!(err, EscrowdexError::InsufficientBalance { .. }));
        assert_eq!(f.exchange.balance_of_ether(f.user1), Amount::ether(1));
        assert_eq!(f.exchange.native_custody(), Amount::ether(1));
        assert_eq!(f.exchange.events().len(), 1);
    }

    #[test]
    fn token_withdraw_returns_tokens() {
        let mut f = setup();
        approve(&f, Amount::tokens(10));
        f.exchange
            .deposit_token(f.token_addr, Amount::tokens(10), f.user1)
            .unwrap();

        let event = f
            .exchange
            .withdraw_token(f.token_addr, Amount::tokens(3), f.user1)
            .unwrap();
        assert_eq!(event.balance, Amount::tokens(7));
        assert_eq!(f.token.lock().balance_of(&f.user1), Amount::tokens(93));
        assert_eq!(
            f.token.lock().balance_of(&f.exchange.address()),
            Amount::tokens(7)
        );
    }

    #[test]
    fn token_withdraw_rejects_ether_sentinel() {
        let mut f = setup();
        let err = f
            .exchange
            .withdraw_token(NATIVE_ASSET, Amount::tokens(1), f.user1)
            .unwrap_err();
        assert!(matches!(err, EscrowdexError::WrongAssetPath { .. }));
    }

    #[test]
    fn balance_of_token_rejects_ether_sentinel() {
        let f = setup();
        assert!(matches!(
            f.exchange.balance_of_token(NATIVE_ASSET, f.user1),
            Err(EscrowdexError::WrongAssetPath { .. })
        ));
        assert_eq!(
            f.exchange.balance_of_token(f.token_addr, f.user1).unwrap(),
            Amount::ZERO
        );
    }

    #[test]
    fn direct_transfer_rejected() {
        let f = setup();
        let err = f
            .exchange
            .direct_transfer(f.user1, Amount::new(1))
            .unwrap_err();
        assert_eq!(
            err,
            EscrowdexError::DirectTransferRejected {
                value: Amount::new(1)
            }
        );
        assert_eq!(f.exchange.native_custody(), Amount::ZERO);
        assert_eq!(f.exchange.balance_of_ether(f.user1), Amount::ZERO);
    }

    #[test]
    fn order_event_mirrors_stored_order() {
        let mut f = setup();
        let placed = f
            .exchange
            .make_order(
                f.token_addr,
                Amount::tokens(2),
                NATIVE_ASSET,
                Amount::ether(1),
                f.user1,
            )
            .unwrap();
        let stored = f.exchange.order(placed.id).unwrap();
        assert_eq!(placed, OrderPlaced::from_order(stored));
        assert_eq!(placed.id, OrderId(1));
        assert_eq!(f.exchange.order_count(), 1);
    }

    #[test]
    fn cancel_flow() {
        let mut f = setup();
        let id = f
            .exchange
            .make_order(
                f.token_addr,
                Amount::tokens(2),
                NATIVE_ASSET,
                Amount::ether(1),
                f.user1,
            )
            .unwrap()
            .id;

        let err = f.exchange.cancel_order(id, f.deployer).unwrap_err();
        assert!(matches!(err, EscrowdexError::Unauthorized { .. }));
        assert!(!f.exchange.is_cancelled(id));

        let cancelled = f.exchange.cancel_order(id, f.user1).unwrap();
        assert!(f.exchange.is_cancelled(id));
        assert_eq!(cancelled.id, id);
        assert_eq!(cancelled.user, f.user1);
        assert_eq!(cancelled.amount_offered, Amount::ether(1));
        assert!(matches!(
            f.exchange.events().last(),
            Some(ExchangeEvent::Cancel(_))
        ));

        assert_eq!(
            f.exchange.cancel_order(OrderId(99), f.user1).unwrap_err(),
            EscrowdexError::OrderNotFound(OrderId(99))
        );
    }

    #[test]
    fn orders_do_not_touch_balances() {
        let mut f = setup();
        f.exchange.deposit_ether(f.user1, Amount::ether(1)).unwrap();
        f.exchange
            .make_order(
                f.token_addr,
                Amount::tokens(2),
                NATIVE_ASSET,
                Amount::ether(5),
                f.user1,
            )
            .unwrap();
        assert_eq!(f.exchange.balance_of_ether(f.user1), Amount::ether(1));
        assert_eq!(f.exchange.open_orders().count(), 1);
        assert_eq!(f.exchange.orders_of(f.user1).count(), 1);
    }

    #[test]
    fn supply_verifies_after_activity() {
        let mut f = setup();
        approve(&f, Amount::tokens(10));
        f.exchange
            .deposit_token(f.token_addr, Amount::tokens(10), f.user1)
            .unwrap();
        f.exchange
            .withdraw_token(f.token_addr, Amount::tokens(4), f.user1)
            .unwrap();
        f.exchange.deposit_ether(f.user1, Amount::ether(3)).unwrap();
        f.exchange.withdraw_ether(Amount::ether(1), f.user1).unwrap();

        f.exchange.verify_supply(f.token_addr).unwrap();
        f.exchange.verify_supply(NATIVE_ASSET).unwrap();
        f.exchange.verify_all_supply().unwrap();
    }

    #[test]
    fn tokens_sent_straight_to_custody_do_not_break_coverage() {
        let mut f = setup();
        let custody = f.exchange.address();
        f.token
            .lock()
            .transfer(f.deployer, custody, Amount::tokens(1))
            .unwrap();
        f.exchange.verify_supply(f.token_addr).unwrap();
        assert_eq!(f.exchange.balance_of(f.token_addr, f.deployer), Amount::ZERO);
    }

    #[test]
    fn custody_drained_behind_exchange_is_detected() {
        let mut f = setup();
        approve(&f, Amount::tokens(10));
        f.exchange
            .deposit_token(f.token_addr, Amount::tokens(10), f.user1)
            .unwrap();
        let custody = f.exchange.address();
        f.token
            .lock()
            .transfer(custody, f.deployer, Amount::tokens(5))
            .unwrap();
        assert!(matches!(
            f.exchange.verify_supply(f.token_addr),
            Err(EscrowdexError::SupplyInvariantViolation { .. })
        ));
    }

    #[test]
    fn repeat_deposit_event_carries_running_balance() {
        let mut f = setup();
        approve(&f, Amount::tokens(15));
        f.exchange
            .deposit_token(f.token_addr, Amount::tokens(10), f.user1)
            .unwrap();
        let second = f
            .exchange
            .deposit_token(f.token_addr, Amount::tokens(5), f.user1)
            .unwrap();
        assert_eq!(second.amount, Amount::tokens(5));
        assert_eq!(second.balance, Amount::tokens(15));
        assert_eq!(f.exchange.balance_of(f.token_addr, f.user1), Amount::tokens(15));
    }

    #[test]
    fn refused_release_rolls_back_withdrawal() {
        let mut f = setup();
        approve(&f, Amount::tokens(15));
        f.exchange
            .deposit_token(f.token_addr, Amount::tokens(10), f.user1)
            .unwrap();
        f.exchange
            .deposit_token(f.token_addr, Amount::tokens(5), f.user1)
            .unwrap();

        // Leave only one token in custody so the asset refuses the release.
        let custody = f.exchange.address();
        f.token
            .lock()
            .transfer(custody, f.deployer, Amount::tokens(14))
            .unwrap();
        let events_before = f.exchange.events().len();

        let err = f
            .exchange
            .withdraw_token(f.token_addr, Amount::tokens(10), f.user1)
            .unwrap_err();

        assert!(matches!(err, EscrowdexError::TransferRejected { .. }));
        assert!(err.to_string().contains("DX_ERR_502"));
        assert_eq!(f.exchange.balance_of(f.token_addr, f.user1), Amount::tokens(15));
        assert_eq!(f.exchange.events().len(), events_before);
        assert_eq!(f.exchange.supply.total_withdrawals(f.token_addr), Amount::ZERO);
        assert_eq!(f.exchange.supply.total_deposits(f.token_addr), Amount::tokens(15));
        assert_eq!(f.token.lock().balance_of(&custody), Amount::tokens(1));
        assert_eq!(f.token.lock().balance_of(&f.user1), Amount::tokens(85));
    }
}
