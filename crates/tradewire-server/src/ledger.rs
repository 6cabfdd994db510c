//! In-memory exchange ledger.
//!
//! Backs the [`ExchangeService`] contract with per-asset balances and a
//! book of open limit orders. Sell orders reserve the base asset; buy
//! orders reserve the quote asset at `price * amount`. All arithmetic is
//! exact decimal arithmetic; overflow is reported as an invalid order,
//! never silently wrapped.

use std::sync::Mutex;

use ulid::Ulid;

use tradewire_contract::ops::{CancelOrderError, OrderError, OrderSide, WalletError};
use tradewire_contract::{Decimal, Timestamp};

use crate::config::ServerConfig;
use crate::service::{CancelAck, ExchangeService, LimitOrder, OrderAck, WalletSnapshot};

#[derive(Debug, Clone)]
struct WalletEntry {
    asset: String,
    balance: Decimal,
    reserved: Decimal,
}

#[derive(Debug, Clone, PartialEq)]
enum OrderState {
    Open,
    Filled,
}

#[derive(Debug, Clone)]
struct OpenOrder {
    order_id: String,
    reserve_asset: String,
    reserve_amount: Decimal,
    state: OrderState,
}

#[derive(Debug, Default)]
struct LedgerState {
    wallets: Vec<WalletEntry>,
    orders: Vec<OpenOrder>,
}

/// Thread-safe in-memory ledger.
pub struct Ledger {
    quote_asset: String,
    state: Mutex<LedgerState>,
}

impl Ledger {
    /// Empty ledger with the given quote asset.
    pub fn new(quote_asset: impl Into<String>) -> Self {
        Self {
            quote_asset: quote_asset.into(),
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// Build a ledger from the configured seed wallets.
    ///
    /// Seed literals that fail to parse are a deployment mistake; they
    /// are skipped rather than taking the server down.
    pub fn from_config(config: &ServerConfig) -> Self {
        let ledger = Self::new(config.quote_asset.clone());
        for seed in &config.wallets {
            let balance = match seed.balance.parse() {
                Ok(d) => d,
                Err(_) => continue,
            };
            let reserved = seed
                .reserved
                .as_deref()
                .and_then(|r| r.parse().ok())
                .unwrap_or(Decimal::ZERO);
            ledger.credit(&seed.asset, balance, reserved);
        }
        ledger
    }

    /// Add or replace a wallet entry.
    pub fn credit(&self, asset: &str, balance: Decimal, reserved: Decimal) {
        let mut state = self.state.lock().unwrap();
        match state.wallets.iter_mut().find(|w| w.asset == asset) {
            Some(entry) => {
                entry.balance = balance;
                entry.reserved = reserved;
            }
            None => state.wallets.push(WalletEntry {
                asset: asset.to_string(),
                balance,
                reserved,
            }),
        }
    }

    /// Mark an open order as filled. Used to model execution.
    pub fn fill_order(&self, order_id: &str) -> bool {
        let mut state = self.state.lock().unwrap();
        match state
            .orders
            .iter_mut()
            .find(|o| o.order_id == order_id && o.state == OrderState::Open)
        {
            Some(order) => {
                order.state = OrderState::Filled;
                true
            }
            None => false,
        }
    }

    /// Number of open orders, for tests and diagnostics.
    pub fn open_orders(&self) -> usize {
        let state = self.state.lock().unwrap();
        state
            .orders
            .iter()
            .filter(|o| o.state == OrderState::Open)
            .count()
    }
}

impl ExchangeService for Ledger {
    fn wallets(&self) -> Result<Vec<WalletSnapshot>, WalletError> {
        let state = self.state.lock().map_err(|_| WalletError::LedgerUnavailable)?;
        Ok(state
            .wallets
            .iter()
            .map(|w| WalletSnapshot {
                asset: w.asset.clone(),
                balance: w.balance,
                reserved: w.reserved,
            })
            .collect())
    }

    fn create_limit_order(&self, order: LimitOrder) -> Result<OrderAck, OrderError> {
        if order.amount.is_zero() || order.amount.is_negative() {
            return Err(OrderError::InvalidAmount);
        }
        if order.price.is_zero() || order.price.is_negative() {
            return Err(OrderError::InvalidPrice);
        }

        // What the order locks up until filled or cancelled.
        let (reserve_asset, reserve_amount) = match order.side {
            OrderSide::Sell => (order.asset.clone(), order.amount),
            OrderSide::Buy => {
                let notional = order
                    .price
                    .checked_mul(&order.amount)
                    .ok_or(OrderError::InvalidAmount)?;
                (self.quote_asset.clone(), notional)
            }
        };

        let mut state = self.state.lock().map_err(|_| OrderError::UnknownAsset)?;

        // The traded asset must exist even when the reservation is on the
        // quote side.
        if !state.wallets.iter().any(|w| w.asset == order.asset) {
            return Err(OrderError::UnknownAsset);
        }

        let wallet = state
            .wallets
            .iter_mut()
            .find(|w| w.asset == reserve_asset)
            .ok_or(OrderError::UnknownAsset)?;

        let available = wallet
            .balance
            .checked_sub(&wallet.reserved)
            .ok_or(OrderError::InvalidAmount)?;
        if available < reserve_amount {
            return Err(OrderError::NotEnoughBalance);
        }
        wallet.reserved = wallet
            .reserved
            .checked_add(&reserve_amount)
            .ok_or(OrderError::InvalidAmount)?;

        let order_id = Ulid::new().to_string();
        state.orders.push(OpenOrder {
            order_id: order_id.clone(),
            reserve_asset,
            reserve_amount,
            state: OrderState::Open,
        });

        Ok(OrderAck {
            order_id,
            accepted_at: Timestamp::now(),
        })
    }

    fn cancel_order(&self, order_id: &str) -> Result<CancelAck, CancelOrderError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| CancelOrderError::OrderNotFound)?;

        let position = state
            .orders
            .iter()
            .position(|o| o.order_id == order_id)
            .ok_or(CancelOrderError::OrderNotFound)?;
        if state.orders[position].state == OrderState::Filled {
            return Err(CancelOrderError::AlreadyFilled);
        }
        let order = state.orders.remove(position);

        if let Some(wallet) = state
            .wallets
            .iter_mut()
            .find(|w| w.asset == order.reserve_asset)
        {
            wallet.reserved = wallet
                .reserved
                .checked_sub(&order.reserve_amount)
                .unwrap_or(Decimal::ZERO);
        }

        Ok(CancelAck {
            order_id: order.order_id,
        })
    }
}
