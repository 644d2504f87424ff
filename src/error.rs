//! Error types for the ledger engine.

use crate::decimal::Decimal4;
use crate::entry::EntryKind;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors surfaced by ledger operations.
///
/// Every variant is a synchronous rejection of one attempted operation; none
/// is retried and none is fatal to the process.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// The owning client is suspicious (no address and no passport data)
    #[error("operation not authorized: client {client} is suspicious")]
    Unauthorized { client: String },

    /// Withdrawal amount exceeds the available balance (debit and deposit accounts)
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        requested: Decimal4,
        available: Decimal4,
    },

    /// Withdrawal attempted on a deposit account while the bank term lock is active
    #[error("deposit withdrawals are locked for {remaining} more period(s)")]
    WithdrawalBeforeTerm { remaining: u32 },

    /// Account creation requested with an unrecognized variant tag
    #[error("unknown account type: {0:?}")]
    UnknownAccountType(String),

    /// No account registered under this id
    #[error("unknown account id {0}")]
    UnknownAccount(u32),

    /// No bank registered under this id
    #[error("unknown bank id {0}")]
    UnknownBank(u32),

    /// No client registered under this id
    #[error("unknown client id {0}")]
    UnknownClient(u32),

    /// Reversal target does not match any logged entry of the account
    #[error("no logged {kind} entry of {amount} to reverse")]
    EntryNotFound { kind: EntryKind, amount: Decimal4 },

    /// Failed to open or read the scenario file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing or writing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing scenario file argument
    #[error("Missing scenario file argument. Usage: ledger-engine <scenario.csv>")]
    MissingArgument,
}
