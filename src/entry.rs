//! Ledger entries: immutable records of logged money movements.

use crate::decimal::Decimal4;
use std::fmt;

/// Kind of a logged money movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Money added to an account.
    Refill,

    /// Money taken from an account.
    Withdraw,

    /// Sender side of an inter-account transfer.
    TransferOut,

    /// Receiver side of an inter-account transfer.
    TransferIn,
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntryKind::Refill => "refill",
            EntryKind::Withdraw => "withdraw",
            EntryKind::TransferOut => "transfer-out",
            EntryKind::TransferIn => "transfer-in",
        };
        f.write_str(name)
    }
}

/// One logged money movement.
///
/// Entries are immutable once created and owned by the account that logged
/// them. Equality is structural: two entries with the same kind and amount
/// compare equal regardless of when they were logged, which is also the match
/// rule used by reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerEntry {
    /// What the movement was.
    pub kind: EntryKind,

    /// How much money moved. Non-negative for every logged operation.
    pub amount: Decimal4,
}

impl LedgerEntry {
    /// Creates a new entry.
    pub fn new(kind: EntryKind, amount: Decimal4) -> Self {
        LedgerEntry { kind, amount }
    }
}

impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.amount)
    }
}
