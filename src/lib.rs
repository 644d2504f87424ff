//! # Ledger Engine
//!
//! An in-memory multi-bank ledger: clients hold debit, credit and deposit
//! accounts at banks; money moves via refill, withdraw and inter-account
//! transfer; every logged movement is reversible; banks project balances
//! under interest and commission schedules and broadcast configuration
//! changes to subscribed clients.
//!
//! ## Design Principles
//!
//! - **Fixed-point arithmetic**: 4 decimal places via `rust_decimal`
//! - **Closed variant set**: account kinds are an enum, matched exhaustively
//! - **Explicit coordinator**: no global state; construct a [`Ledger`] and
//!   pass it around
//! - **Synchronous everything**: errors surface to the caller, notifications
//!   fan out inline
//!
//! ## Example
//!
//! ```no_run
//! use ledger_engine::{AccountKind, BankConfig, Client, Decimal4, Ledger};
//! use std::str::FromStr;
//!
//! let mut ledger = Ledger::new();
//! let client = ledger.register_client(
//!     Client::new("Kolya", "Petrov").with_address("Pionerskaya"),
//! );
//! let bank = ledger.create_bank(BankConfig {
//!     debit_interest: Decimal4::from_str("0.1").unwrap(),
//!     deposit_tiers: vec![],
//!     credit_limit: Decimal4::from_str("-1000").unwrap(),
//!     credit_commission: Decimal4::from_str("0.2").unwrap(),
//!     term: 0,
//! });
//! let account = ledger.create_account(bank, client, AccountKind::Debit).unwrap();
//! ledger.refill(account, Decimal4::from_str("200").unwrap()).unwrap();
//! ledger.accrue_all().unwrap();
//! ```

pub mod account;
pub mod analyzer;
pub mod bank;
pub mod client;
pub mod decimal;
pub mod entry;
pub mod error;
pub mod ledger;
pub mod script;

pub use account::{Account, AccountId, AccountKind, OpContext};
pub use analyzer::{project_credit, project_debit, project_deposit, CreditProjection};
pub use bank::{Bank, BankConfig, BankId, InterestTier};
pub use client::{Client, ClientId};
pub use decimal::Decimal4;
pub use entry::{EntryKind, LedgerEntry};
pub use error::{LedgerError, Result};
pub use ledger::{AccrualMode, Ledger};
