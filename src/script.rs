//! CSV scenario stream for the CLI.
//!
//! A scenario file is a header row plus one operation per line:
//!
//! ```csv
//! op,bank,client,account,to,kind,amount,rate,limit,commission,term
//! client,,,,,verified,,,,,
//! bank,,,,,,,0.1,-1000,0.2,0
//! account,1,1,,,debit,,,,,
//! refill,,,1,,,200,,,,
//! transfer,,,1,2,,50,,,,
//! accrue,,,,,,,,,,
//! ```
//!
//! Entities are referenced by their sequential 1-based ids in creation
//! order. Invalid rows and failing operations are logged at warn level and
//! skipped; the stream keeps going.

use crate::account::AccountId;
use crate::bank::{BankConfig, BankId};
use crate::client::{Client, ClientId};
use crate::decimal::Decimal4;
use crate::error::Result;
use crate::ledger::Ledger;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use serde::Deserialize;
use std::io::Read;

/// Raw scenario record as read from CSV. Columns not used by an operation
/// are left empty.
#[derive(Debug, Deserialize)]
pub struct ScriptRecord {
    /// Operation tag: client, bank, account, refill, withdraw, transfer, accrue
    pub op: String,

    /// Bank id (account creation)
    pub bank: Option<BankId>,

    /// Client id (account creation)
    pub client: Option<ClientId>,

    /// Account id (refill, withdraw, transfer sender)
    pub account: Option<AccountId>,

    /// Receiving account id (transfer)
    pub to: Option<AccountId>,

    /// Variant tag for account creation, or `suspicious` for client
    /// registration without profile fields
    pub kind: Option<String>,

    /// Money amount (refill, withdraw, transfer)
    pub amount: Option<Decimal4>,

    /// Debit interest rate (bank creation)
    pub rate: Option<Decimal4>,

    /// Credit limit as a negative floor (bank creation)
    pub limit: Option<Decimal4>,

    /// Credit commission rate (bank creation)
    pub commission: Option<Decimal4>,

    /// Deposit term lock in periods (bank creation)
    pub term: Option<u32>,
}

/// A parsed scenario operation ready to apply.
#[derive(Debug, Clone)]
pub enum ScriptOp {
    /// Registers a client; verified clients get placeholder profile fields.
    RegisterClient { verified: bool },

    /// Creates a bank. The deposit tier table is not expressible in one CSV
    /// cell and starts empty.
    CreateBank {
        debit_interest: Decimal4,
        credit_limit: Decimal4,
        credit_commission: Decimal4,
        term: u32,
    },

    /// Creates an account; the variant tag is validated on apply.
    CreateAccount {
        bank: BankId,
        client: ClientId,
        kind: String,
    },

    /// Logged refill.
    Refill {
        account: AccountId,
        amount: Decimal4,
    },

    /// Logged withdrawal.
    Withdraw {
        account: AccountId,
        amount: Decimal4,
    },

    /// Two-account transfer.
    Transfer {
        from: AccountId,
        to: AccountId,
        amount: Decimal4,
    },

    /// Mass interest accrual across all banks.
    Accrue,
}

impl ScriptRecord {
    /// Parses the raw record into an operation.
    ///
    /// Returns `None` when the tag is unknown or a required column is
    /// missing. Unknown account variants are deliberately *not* rejected
    /// here; they surface as `UnknownAccountType` when applied.
    pub fn parse(&self) -> Option<ScriptOp> {
        match self.op.trim().to_lowercase().as_str() {
            "client" => {
                let verified = !matches!(self.kind.as_deref(), Some("suspicious"));
                Some(ScriptOp::RegisterClient { verified })
            }
            "bank" => Some(ScriptOp::CreateBank {
                debit_interest: self.rate?,
                credit_limit: self.limit?,
                credit_commission: self.commission?,
                term: self.term?,
            }),
            "account" => Some(ScriptOp::CreateAccount {
                bank: self.bank?,
                client: self.client?,
                kind: self.kind.clone()?,
            }),
            "refill" => Some(ScriptOp::Refill {
                account: self.account?,
                amount: self.amount?,
            }),
            "withdraw" => Some(ScriptOp::Withdraw {
                account: self.account?,
                amount: self.amount?,
            }),
            "transfer" => Some(ScriptOp::Transfer {
                from: self.account?,
                to: self.to?,
                amount: self.amount?,
            }),
            "accrue" => Some(ScriptOp::Accrue),
            _ => None,
        }
    }
}

/// Applies one parsed operation to the ledger.
pub fn apply(ledger: &mut Ledger, op: ScriptOp) -> Result<()> {
    match op {
        ScriptOp::RegisterClient { verified } => {
            let number = ledger.register_client(Client::new("Scripted", "Client"));
            if verified {
                let client = ledger.client_mut(number)?;
                client.set_address(Some("on file".to_string()));
                client.set_passport(Some("on file".to_string()));
            }
            debug!("Script registered client {}", number);
        }
        ScriptOp::CreateBank {
            debit_interest,
            credit_limit,
            credit_commission,
            term,
        } => {
            let bank = ledger.create_bank(BankConfig {
                debit_interest,
                deposit_tiers: Vec::new(),
                credit_limit,
                credit_commission,
                term,
            });
            debug!("Script created bank {}", bank);
        }
        ScriptOp::CreateAccount { bank, client, kind } => {
            let kind = kind.parse()?;
            ledger.create_account(bank, client, kind)?;
        }
        ScriptOp::Refill { account, amount } => ledger.refill(account, amount)?,
        ScriptOp::Withdraw { account, amount } => ledger.withdraw(account, amount)?,
        ScriptOp::Transfer { from, to, amount } => ledger.transfer(from, to, amount)?,
        ScriptOp::Accrue => ledger.accrue_all()?,
    }
    Ok(())
}

/// Streams a scenario CSV into the ledger.
///
/// Records are read one at a time. Rows that fail to parse or operations the
/// ledger rejects are logged at warn level and skipped.
pub fn run<R: Read>(ledger: &mut Ledger, reader: R) -> Result<()> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(reader);

    for (row_idx, result) in csv_reader.deserialize::<ScriptRecord>().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        match result {
            Ok(record) => match record.parse() {
                Some(op) => {
                    if let Err(e) = apply(ledger, op) {
                        warn!("Row {}: {}", row_num, e);
                    }
                }
                None => {
                    warn!("Row {}: Failed to parse scenario record", row_num);
                }
            },
            Err(e) => {
                warn!("Row {}: CSV parse error: {}", row_num, e);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn record(op: &str) -> ScriptRecord {
        ScriptRecord {
            op: op.to_string(),
            bank: None,
            client: None,
            account: None,
            to: None,
            kind: None,
            amount: None,
            rate: None,
            limit: None,
            commission: None,
            term: None,
        }
    }

    #[test]
    fn test_parse_refill() {
        let mut rec = record("refill");
        rec.account = Some(1);
        rec.amount = Some(Decimal4::from_str("10.5").unwrap());

        match rec.parse().unwrap() {
            ScriptOp::Refill { account, amount } => {
                assert_eq!(account, 1);
                assert_eq!(amount.to_string(), "10.5000");
            }
            other => panic!("Expected Refill, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_transfer_requires_both_accounts() {
        let mut rec = record("transfer");
        rec.account = Some(1);
        rec.amount = Some(Decimal4::from_str("10").unwrap());
        assert!(rec.parse().is_none());

        rec.to = Some(2);
        assert!(matches!(rec.parse(), Some(ScriptOp::Transfer { .. })));
    }

    #[test]
    fn test_parse_client_suspicious_tag() {
        let mut rec = record("client");
        assert!(matches!(
            rec.parse(),
            Some(ScriptOp::RegisterClient { verified: true })
        ));

        rec.kind = Some("suspicious".to_string());
        assert!(matches!(
            rec.parse(),
            Some(ScriptOp::RegisterClient { verified: false })
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_op() {
        assert!(record("liquidate").parse().is_none());
    }

    #[test]
    fn test_parse_handles_case_and_whitespace() {
        assert!(matches!(record(" ACCRUE ").parse(), Some(ScriptOp::Accrue)));
    }

    #[test]
    fn test_run_applies_a_scenario_and_skips_bad_rows() {
        let csv = "\
op,bank,client,account,to,kind,amount,rate,limit,commission,term
client,,,,,,,,,,
client,,,,,suspicious,,,,,
bank,,,,,,,0.1,-1000,0.2,0
account,1,1,,,debit,,,,,
account,1,1,,,debit,,,,,
account,1,1,,,savings,,,,,
refill,,,1,,,500,,,,
withdraw,,,1,,,9999,,,,
transfer,,,1,2,,100,,,,
nonsense,,,,,,,,,,
accrue,,,,,,,,,,
";
        let mut ledger = Ledger::new();
        run(&mut ledger, csv.as_bytes()).unwrap();

        // The unknown variant, uncovered withdrawal and nonsense rows were
        // skipped; everything else applied, including the final accrual.
        assert_eq!(ledger.account(1).unwrap().balance().to_string(), "440.0000");
        assert_eq!(ledger.account(2).unwrap().balance().to_string(), "110.0000");
        assert!(ledger.account(3).is_err());
        assert!(ledger.client(2).unwrap().is_suspicious());
    }
}
