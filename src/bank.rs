//! Banks: rate configuration, owned accounts and the subscriber list.
//!
//! Rate-change operations mutate the configuration and hand back the
//! notification text; the [`Ledger`](crate::ledger::Ledger) fans that text
//! out synchronously to every subscribed client.

use crate::account::AccountId;
use crate::client::ClientId;
use crate::decimal::Decimal4;
use std::fmt::Write as _;

/// Unique bank identifier assigned by the ledger.
pub type BankId = u32;

/// One row of the tiered deposit-rate table.
///
/// The rate applies to balances at or above the threshold, up to the next
/// tier. Callers must supply tiers in ascending threshold order: lookup is a
/// reverse linear scan that stops at the first qualifying tier, so the
/// "highest qualifying tier" semantic depends on that ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterestTier {
    /// Minimum balance for this tier.
    pub threshold: Decimal4,

    /// Interest rate applied per period inside this tier.
    pub rate: Decimal4,
}

/// Configuration for a newly created bank.
#[derive(Debug, Clone)]
pub struct BankConfig {
    /// Flat interest rate used for accrual and debit projection.
    pub debit_interest: Decimal4,

    /// Deposit-rate table, ascending by threshold.
    pub deposit_tiers: Vec<InterestTier>,

    /// Credit floor, expressed as a negative balance.
    pub credit_limit: Decimal4,

    /// Commission rate charged on negative credit balances.
    pub credit_commission: Decimal4,

    /// Periods remaining before deposit withdrawals unlock. Shared by all
    /// deposit accounts of the bank.
    pub term: u32,
}

/// A bank holding accounts, rates and subscribers.
#[derive(Debug, Clone)]
pub struct Bank {
    /// Unique bank id.
    pub id: BankId,

    /// Accounts registered at this bank, in creation order.
    pub accounts: Vec<AccountId>,

    /// Subscribed clients. Duplicate subscriptions are allowed and receive
    /// duplicate notifications.
    pub subscribers: Vec<ClientId>,

    /// Flat interest rate used for accrual and debit projection.
    pub debit_interest: Decimal4,

    /// Credit floor, expressed as a negative balance.
    pub credit_limit: Decimal4,

    /// Commission rate charged on negative credit balances.
    pub credit_commission: Decimal4,

    /// Deposit-rate table, ascending by threshold.
    pub deposit_tiers: Vec<InterestTier>,

    /// Bank-wide term-lock countdown for deposit withdrawals.
    pub term: u32,
}

impl Bank {
    /// Creates a bank from its configuration, with no accounts and no
    /// subscribers.
    pub fn new(id: BankId, config: BankConfig) -> Self {
        Bank {
            id,
            accounts: Vec::new(),
            subscribers: Vec::new(),
            debit_interest: config.debit_interest,
            credit_limit: config.credit_limit,
            credit_commission: config.credit_commission,
            deposit_tiers: config.deposit_tiers,
            term: config.term,
        }
    }

    /// Adds a subscriber. Not idempotent: subscribing twice delivers every
    /// notification twice.
    pub fn subscribe(&mut self, client: ClientId) {
        self.subscribers.push(client);
    }

    /// Removes one subscription of the client, if any.
    pub fn unsubscribe(&mut self, client: ClientId) {
        if let Some(position) = self.subscribers.iter().position(|&c| c == client) {
            self.subscribers.remove(position);
        }
    }

    /// Sets the credit commission and returns the notification text.
    pub fn set_credit_commission(&mut self, rate: Decimal4) -> String {
        self.credit_commission = rate;
        format!(
            "Dear customer, credit commission has been changed. New credit commission: {rate}"
        )
    }

    /// Sets the credit limit and returns the notification text.
    pub fn set_credit_limit(&mut self, limit: Decimal4) -> String {
        self.credit_limit = limit;
        format!("Dear customer, credit limit has been changed. New credit limit: {limit}")
    }

    /// Sets the debit interest rate and returns the notification text.
    pub fn set_debit_interest(&mut self, rate: Decimal4) -> String {
        self.debit_interest = rate;
        format!("Dear customer, debit interest has been changed. New debit interest: {rate}")
    }

    /// Replaces the deposit-rate table and returns the notification text,
    /// which renders the full table in table order.
    pub fn set_deposit_tiers(&mut self, tiers: Vec<InterestTier>) -> String {
        let mut message =
            String::from("Dear customer, deposit interest has been changed. New deposit rates:\n");
        for tier in &tiers {
            let _ = writeln!(message, "From {}:{}", tier.threshold, tier.rate);
        }
        self.deposit_tiers = tiers;
        message
    }

    /// Sets the term-lock countdown and returns the notification text.
    pub fn set_term(&mut self, term: u32) -> String {
        self.term = term;
        format!("Dear customer, deposit term has been changed. New deposit term: {term}")
    }
}
