//! Account variants and their authorization and timing rules.
//!
//! An account owns a balance and an ordered entry log. The invariant is that
//! the balance equals the net effect of all currently-logged entries plus any
//! adjustments applied with logging deferred (transfers mutate balances first
//! and log both sides only after both mutations succeed).

use crate::bank::BankId;
use crate::client::ClientId;
use crate::decimal::Decimal4;
use crate::entry::{EntryKind, LedgerEntry};
use crate::error::{LedgerError, Result};
use std::fmt;
use std::str::FromStr;

/// Unique account identifier assigned by the ledger.
pub type AccountId = u32;

/// The closed set of account variants.
///
/// The variant decides which checks `withdraw` runs and in which order; the
/// set is fixed and exhaustively matched everywhere, so it is an enum rather
/// than an open trait hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountKind {
    /// Plain account: withdrawals must be covered by the balance.
    Debit,

    /// May go negative; debt cost is modeled by the commission projector,
    /// not enforced at withdrawal time.
    Credit,

    /// Covered withdrawals only, and none at all while the owning bank's
    /// term lock is counting down.
    Deposit,
}

impl FromStr for AccountKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "debit" => Ok(AccountKind::Debit),
            "credit" => Ok(AccountKind::Credit),
            "deposit" => Ok(AccountKind::Deposit),
            other => Err(LedgerError::UnknownAccountType(other.to_string())),
        }
    }
}

impl fmt::Display for AccountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AccountKind::Debit => "debit",
            AccountKind::Credit => "credit",
            AccountKind::Deposit => "deposit",
        };
        f.write_str(name)
    }
}

/// Snapshot of the facts an account operation needs but cannot read itself:
/// the owner's suspicious status, the owner's display name for error
/// messages, and the owning bank's term-lock countdown.
///
/// Assembled by the [`Ledger`](crate::ledger::Ledger) right before each
/// operation, since accounts reference their bank and client by id only.
#[derive(Debug, Clone)]
pub struct OpContext {
    /// Whether the owning client is currently suspicious.
    pub suspicious: bool,

    /// Periods left on the owning bank's deposit term lock.
    pub term_remaining: u32,

    /// Owner display name, embedded in authorization errors.
    pub client: String,
}

/// One account at one bank, owned by one client.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique account id.
    pub id: AccountId,

    /// Owning bank (shared reference by id, not owned).
    pub bank: BankId,

    /// Owning client (shared reference by id, not owned).
    pub client: ClientId,

    /// Variant deciding the withdrawal rules.
    pub kind: AccountKind,

    balance: Decimal4,
    entries: Vec<LedgerEntry>,
}

impl Account {
    /// Creates a zero-balance account with an empty entry log.
    pub fn new(id: AccountId, bank: BankId, client: ClientId, kind: AccountKind) -> Self {
        Account {
            id,
            bank,
            client,
            kind,
            balance: Decimal4::ZERO,
            entries: Vec::new(),
        }
    }

    /// Current balance.
    pub fn balance(&self) -> Decimal4 {
        self.balance
    }

    /// Logged entries in chronological order.
    pub fn entries(&self) -> &[LedgerEntry] {
        &self.entries
    }

    /// Appends an entry to the log without touching the balance.
    ///
    /// Used by the transfer protocol, which applies both balance mutations
    /// first and logs both sides only once the transfer cannot fail anymore.
    pub fn log(&mut self, kind: EntryKind, amount: Decimal4) {
        self.entries.push(LedgerEntry::new(kind, amount));
    }

    /// Adds `amount` to the balance.
    ///
    /// Fails with [`LedgerError::Unauthorized`] if the owner is suspicious.
    /// There is no upper bound on any variant's balance. Logs a Refill entry
    /// when `to_log` is set.
    pub fn refill(&mut self, amount: Decimal4, to_log: bool, ctx: &OpContext) -> Result<()> {
        if ctx.suspicious {
            return Err(LedgerError::Unauthorized {
                client: ctx.client.clone(),
            });
        }
        if to_log {
            self.log(EntryKind::Refill, amount);
        }
        self.balance += amount;
        Ok(())
    }

    /// Removes `amount` from the balance, subject to the variant rules.
    ///
    /// The check order is observable through the error kind when several
    /// conditions hold at once and must not be rearranged:
    ///
    /// - Debit: balance check, then suspicious check.
    /// - Credit: suspicious check only; the balance may go negative without
    ///   bound (the credit limit matters only to the projector).
    /// - Deposit: balance check, then suspicious check, then term check.
    ///
    /// Logs a Withdraw entry when `to_log` is set.
    pub fn withdraw(&mut self, amount: Decimal4, to_log: bool, ctx: &OpContext) -> Result<()> {
        match self.kind {
            AccountKind::Debit => {
                self.check_covered(amount)?;
                self.check_authorized(ctx)?;
            }
            AccountKind::Credit => {
                self.check_authorized(ctx)?;
            }
            AccountKind::Deposit => {
                self.check_covered(amount)?;
                self.check_authorized(ctx)?;
                if ctx.term_remaining != 0 {
                    return Err(LedgerError::WithdrawalBeforeTerm {
                        remaining: ctx.term_remaining,
                    });
                }
            }
        }
        if to_log {
            self.log(EntryKind::Withdraw, amount);
        }
        self.balance -= amount;
        Ok(())
    }

    /// Reverses a previously logged entry.
    ///
    /// Applies the inverse money movement without re-running any
    /// authorization or timing checks, then removes the entry from the log.
    /// Removal matches by structural equality of (kind, amount); among
    /// structural duplicates the first match is removed, in which case the
    /// choice of concrete entry is unspecified.
    pub fn reverse(&mut self, entry: &LedgerEntry) -> Result<()> {
        let position = self
            .entries
            .iter()
            .position(|logged| logged == entry)
            .ok_or(LedgerError::EntryNotFound {
                kind: entry.kind,
                amount: entry.amount,
            })?;

        match entry.kind {
            EntryKind::Refill | EntryKind::TransferIn => self.balance -= entry.amount,
            EntryKind::Withdraw | EntryKind::TransferOut => self.balance += entry.amount,
        }
        self.entries.remove(position);
        Ok(())
    }

    /// Puts funds back after a failed transfer leg. Bypasses all checks and
    /// logs nothing.
    pub(crate) fn restore(&mut self, amount: Decimal4) {
        self.balance += amount;
    }

    fn check_covered(&self, amount: Decimal4) -> Result<()> {
        if self.balance < amount {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available: self.balance,
            });
        }
        Ok(())
    }

    fn check_authorized(&self, ctx: &OpContext) -> Result<()> {
        if ctx.suspicious {
            return Err(LedgerError::Unauthorized {
                client: ctx.client.clone(),
            });
        }
        Ok(())
    }
}
