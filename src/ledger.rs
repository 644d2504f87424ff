//! The ledger coordinator: owns clients, banks and accounts, orchestrates
//! transfers, mass accrual, reversals and configuration broadcasts.
//!
//! The coordinator is an explicitly constructed context object; create one
//! per process (or one per test) and pass it around. All entities are
//! referenced by sequential ids.

use crate::account::{Account, AccountId, AccountKind, OpContext};
use crate::bank::{Bank, BankConfig, BankId, InterestTier};
use crate::client::{Client, ClientId};
use crate::decimal::Decimal4;
use crate::entry::{EntryKind, LedgerEntry};
use crate::error::{LedgerError, Result};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;

/// How [`Ledger::accrue_all`] picks the rate for each account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccrualMode {
    /// The bank's flat debit rate is applied to every account regardless of
    /// variant.
    #[default]
    FlatDebitRate,

    /// Opt-in: each variant uses its own rate model. Debit accrues at the
    /// debit rate; deposit accrues at its highest qualifying tier rate unless
    /// the bank term lock is active; credit is charged the commission on a
    /// negative balance as a logged withdrawal.
    PerVariant,
}

/// Central registry and transaction coordinator.
///
/// Owns the full entity graph. Single-threaded: callers must serialize
/// mutating operations, which preserves the atomicity the transfer protocol
/// assumes.
pub struct Ledger {
    clients: HashMap<ClientId, Client>,
    banks: HashMap<BankId, Bank>,
    accounts: HashMap<AccountId, Account>,
    accrual_mode: AccrualMode,
    next_client: ClientId,
    next_bank: BankId,
    next_account: AccountId,
}

/// One row of the account-state report.
#[derive(Debug, Serialize)]
struct ReportRow {
    account: AccountId,
    bank: BankId,
    client: ClientId,
    kind: String,
    balance: Decimal4,
    entries: usize,
}

impl Ledger {
    /// Creates an empty ledger with flat-rate accrual.
    pub fn new() -> Self {
        Ledger {
            clients: HashMap::new(),
            banks: HashMap::new(),
            accounts: HashMap::new(),
            accrual_mode: AccrualMode::default(),
            next_client: 1,
            next_bank: 1,
            next_account: 1,
        }
    }

    /// Selects the accrual mode for subsequent [`Ledger::accrue_all`] calls.
    pub fn set_accrual_mode(&mut self, mode: AccrualMode) {
        self.accrual_mode = mode;
    }

    // ---- registration ----

    /// Registers a client and returns its id.
    pub fn register_client(&mut self, client: Client) -> ClientId {
        let id = self.next_client;
        self.next_client += 1;
        self.clients.insert(id, client);
        debug!("Registered client {}", id);
        id
    }

    /// Creates a bank and returns its id.
    pub fn create_bank(&mut self, config: BankConfig) -> BankId {
        let id = self.next_bank;
        self.next_bank += 1;
        self.banks.insert(id, Bank::new(id, config));
        debug!("Created bank {}", id);
        id
    }

    /// Creates a zero-balance account of the requested variant for the
    /// bank/client pair and returns its id.
    pub fn create_account(
        &mut self,
        bank: BankId,
        client: ClientId,
        kind: AccountKind,
    ) -> Result<AccountId> {
        if !self.clients.contains_key(&client) {
            return Err(LedgerError::UnknownClient(client));
        }
        let bank_entry = self
            .banks
            .get_mut(&bank)
            .ok_or(LedgerError::UnknownBank(bank))?;

        let id = self.next_account;
        self.next_account += 1;
        bank_entry.accounts.push(id);
        self.accounts.insert(id, Account::new(id, bank, client, kind));
        debug!("Created {} account {} at bank {}", kind, id, bank);
        Ok(id)
    }

    // ---- accessors ----

    /// Looks up an account.
    pub fn account(&self, id: AccountId) -> Result<&Account> {
        self.accounts.get(&id).ok_or(LedgerError::UnknownAccount(id))
    }

    /// Looks up a bank.
    pub fn bank(&self, id: BankId) -> Result<&Bank> {
        self.banks.get(&id).ok_or(LedgerError::UnknownBank(id))
    }

    /// Looks up a client.
    pub fn client(&self, id: ClientId) -> Result<&Client> {
        self.clients.get(&id).ok_or(LedgerError::UnknownClient(id))
    }

    /// Mutable client access, for profile updates after registration.
    pub fn client_mut(&mut self, id: ClientId) -> Result<&mut Client> {
        self.clients.get_mut(&id).ok_or(LedgerError::UnknownClient(id))
    }

    // ---- money movement ----

    /// Refills an account and logs a Refill entry.
    pub fn refill(&mut self, account: AccountId, amount: Decimal4) -> Result<()> {
        let ctx = self.op_context(account)?;
        self.account_mut(account)?.refill(amount, true, &ctx)?;
        debug!("Refilled account {} by {}", account, amount);
        Ok(())
    }

    /// Withdraws from an account and logs a Withdraw entry.
    pub fn withdraw(&mut self, account: AccountId, amount: Decimal4) -> Result<()> {
        let ctx = self.op_context(account)?;
        self.account_mut(account)?.withdraw(amount, true, &ctx)?;
        debug!("Withdrew {} from account {}", amount, account);
        Ok(())
    }

    /// Moves `amount` from `sender` to `receiver` atomically.
    ///
    /// Protocol order, observable through which error fires:
    ///
    /// 1. Authorization check naming the sender's client.
    /// 2. Authorization check naming the receiver's client.
    /// 3. Unlogged withdrawal from the sender; its error aborts the transfer
    ///    with no state change.
    /// 4. Unlogged refill of the receiver; if it fails the sender's funds are
    ///    restored before the error is surfaced.
    /// 5. One TransferOut entry on the sender and one TransferIn entry on the
    ///    receiver, logged only after both balance mutations succeeded.
    pub fn transfer(
        &mut self,
        sender: AccountId,
        receiver: AccountId,
        amount: Decimal4,
    ) -> Result<()> {
        let sender_ctx = self.op_context(sender)?;
        if sender_ctx.suspicious {
            return Err(LedgerError::Unauthorized {
                client: sender_ctx.client,
            });
        }
        let receiver_ctx = self.op_context(receiver)?;
        if receiver_ctx.suspicious {
            return Err(LedgerError::Unauthorized {
                client: receiver_ctx.client,
            });
        }

        self.account_mut(sender)?.withdraw(amount, false, &sender_ctx)?;

        if let Err(err) = self.account_mut(receiver)?.refill(amount, false, &receiver_ctx) {
            // Not reachable after the pre-checks above, but the sender must
            // never stay debited without the receiver being credited.
            self.account_mut(sender)?.restore(amount);
            return Err(err);
        }

        self.account_mut(sender)?.log(EntryKind::TransferOut, amount);
        self.account_mut(receiver)?.log(EntryKind::TransferIn, amount);
        debug!(
            "Transferred {} from account {} to account {}",
            amount, sender, receiver
        );
        Ok(())
    }

    /// Reverses a previously logged entry of the account: applies the inverse
    /// money movement and removes the first structurally matching entry.
    pub fn reverse_entry(&mut self, account: AccountId, entry: &LedgerEntry) -> Result<()> {
        self.account_mut(account)?.reverse(entry)?;
        debug!("Reversed {} on account {}", entry, account);
        Ok(())
    }

    // ---- accrual ----

    /// Accrues interest on every account of every bank.
    ///
    /// Banks are visited in ascending id order and each bank's accounts in
    /// creation order, so the first error encountered is deterministic. The
    /// first error aborts the run; already-accrued accounts are not rolled
    /// back.
    pub fn accrue_all(&mut self) -> Result<()> {
        let mut bank_ids: Vec<BankId> = self.banks.keys().copied().collect();
        bank_ids.sort_unstable();
        for bank in bank_ids {
            self.accrue_bank(bank)?;
        }
        Ok(())
    }

    /// Accrues interest on every account of one bank.
    pub fn accrue_bank(&mut self, bank: BankId) -> Result<()> {
        let accounts = self.bank(bank)?.accounts.clone();
        for account in accounts {
            self.accrue_account(account)?;
        }
        Ok(())
    }

    fn accrue_account(&mut self, id: AccountId) -> Result<()> {
        let (kind, balance, bank_id) = {
            let account = self.account(id)?;
            (account.kind, account.balance(), account.bank)
        };
        let (debit_interest, credit_commission, tier_rate) = {
            let bank = self.bank(bank_id)?;
            let tier_rate = bank
                .deposit_tiers
                .iter()
                .rev()
                .find(|tier| balance >= tier.threshold)
                .map(|tier| tier.rate);
            (bank.debit_interest, bank.credit_commission, tier_rate)
        };
        let ctx = self.op_context(id)?;

        match self.accrual_mode {
            AccrualMode::FlatDebitRate => {
                self.account_mut(id)?
                    .refill(balance * debit_interest, true, &ctx)?;
            }
            AccrualMode::PerVariant => match kind {
                AccountKind::Debit => {
                    self.account_mut(id)?
                        .refill(balance * debit_interest, true, &ctx)?;
                }
                AccountKind::Deposit => {
                    if ctx.term_remaining != 0 {
                        return Ok(());
                    }
                    if let Some(rate) = tier_rate {
                        self.account_mut(id)?.refill(balance * rate, true, &ctx)?;
                    }
                }
                AccountKind::Credit => {
                    if balance.is_negative() {
                        let charge = (balance * credit_commission).abs();
                        self.account_mut(id)?.withdraw(charge, true, &ctx)?;
                    }
                }
            },
        }
        Ok(())
    }

    // ---- configuration & notification ----

    /// Changes a bank's credit commission and notifies every subscriber.
    pub fn change_credit_commission(&mut self, bank: BankId, rate: Decimal4) -> Result<()> {
        let message = self.bank_mut(bank)?.set_credit_commission(rate);
        self.notify_subscribers(bank, &message)
    }

    /// Changes a bank's credit limit and notifies every subscriber.
    pub fn change_credit_limit(&mut self, bank: BankId, limit: Decimal4) -> Result<()> {
        let message = self.bank_mut(bank)?.set_credit_limit(limit);
        self.notify_subscribers(bank, &message)
    }

    /// Changes a bank's debit interest rate and notifies every subscriber.
    pub fn change_debit_interest(&mut self, bank: BankId, rate: Decimal4) -> Result<()> {
        let message = self.bank_mut(bank)?.set_debit_interest(rate);
        self.notify_subscribers(bank, &message)
    }

    /// Replaces a bank's deposit-rate table and notifies every subscriber
    /// with the rendered table.
    pub fn change_deposit_interest(&mut self, bank: BankId, tiers: Vec<InterestTier>) -> Result<()> {
        let message = self.bank_mut(bank)?.set_deposit_tiers(tiers);
        self.notify_subscribers(bank, &message)
    }

    /// Changes a bank's term lock and notifies every subscriber.
    pub fn change_term(&mut self, bank: BankId, term: u32) -> Result<()> {
        let message = self.bank_mut(bank)?.set_term(term);
        self.notify_subscribers(bank, &message)
    }

    /// Subscribes a client to a bank's configuration notifications.
    pub fn subscribe(&mut self, bank: BankId, client: ClientId) -> Result<()> {
        if !self.clients.contains_key(&client) {
            return Err(LedgerError::UnknownClient(client));
        }
        self.bank_mut(bank)?.subscribe(client);
        Ok(())
    }

    /// Removes one subscription of the client from the bank.
    pub fn unsubscribe(&mut self, bank: BankId, client: ClientId) -> Result<()> {
        self.bank_mut(bank)?.unsubscribe(client);
        Ok(())
    }

    /// Synchronous fan-out of one message to every subscriber, duplicates
    /// included, in subscription order.
    fn notify_subscribers(&mut self, bank: BankId, message: &str) -> Result<()> {
        let subscribers = self.bank(bank)?.subscribers.clone();
        for client in subscribers {
            if let Some(client) = self.clients.get_mut(&client) {
                client.receive_notification(message);
            }
        }
        Ok(())
    }

    // ---- reporting ----

    /// Writes final account states as CSV, sorted by account id.
    pub fn write_report<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        let mut accounts: Vec<&Account> = self.accounts.values().collect();
        accounts.sort_by_key(|a| a.id);

        for account in accounts {
            csv_writer.serialize(ReportRow {
                account: account.id,
                bank: account.bank,
                client: account.client,
                kind: account.kind.to_string(),
                balance: account.balance(),
                entries: account.entries().len(),
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }

    // ---- internals ----

    fn account_mut(&mut self, id: AccountId) -> Result<&mut Account> {
        self.accounts
            .get_mut(&id)
            .ok_or(LedgerError::UnknownAccount(id))
    }

    fn bank_mut(&mut self, id: BankId) -> Result<&mut Bank> {
        self.banks.get_mut(&id).ok_or(LedgerError::UnknownBank(id))
    }

    /// Snapshots the owner's suspicious status and the bank's term lock for
    /// one account operation.
    fn op_context(&self, id: AccountId) -> Result<OpContext> {
        let account = self.account(id)?;
        let client = self.client(account.client)?;
        let bank = self.bank(account.bank)?;
        Ok(OpContext {
            suspicious: client.is_suspicious(),
            term_remaining: bank.term,
            client: client.full_name(),
        })
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}
