//! Balance projectors: pure functions that roll a balance forward over a
//! number of periods under a variant-specific rate model.
//!
//! None of these touch an account; they consume a balance/rate snapshot and
//! return the projected value.

use crate::bank::InterestTier;
use crate::decimal::Decimal4;

/// Outcome of a credit projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditProjection {
    /// Projected balance after all periods.
    pub balance: Decimal4,

    /// Set once the projected balance falls below the credit limit. Sticky:
    /// never cleared, even if a later period recovers above the limit.
    pub over_limit: bool,
}

/// Projects a balance under simple compounding: `balance += balance * rate`
/// for each period. The rate may be any sign.
pub fn project_debit(periods: u32, balance: Decimal4, rate: Decimal4) -> Decimal4 {
    let mut balance = balance;
    for _ in 0..periods {
        balance += balance * rate;
    }
    balance
}

/// Projects a negative credit balance under the commission schedule.
///
/// Only engages when the starting balance is negative; a non-negative balance
/// is returned untouched. Each period charges `|balance * commission|`, which
/// always moves the balance further negative. `limit` is the credit floor
/// expressed as a negative balance; the over-limit flag is set the first time
/// the projected balance falls below it.
pub fn project_credit(
    periods: u32,
    balance: Decimal4,
    limit: Decimal4,
    commission: Decimal4,
) -> CreditProjection {
    let mut projection = CreditProjection {
        balance,
        over_limit: false,
    };
    if !balance.is_negative() {
        return projection;
    }
    for _ in 0..periods {
        projection.balance -= (projection.balance * commission).abs();
        if projection.balance < limit {
            projection.over_limit = true;
        }
    }
    projection
}

/// Projects a deposit balance under the tiered rate table and term lock.
///
/// A local countdown starts at `term`; periods spent inside it accrue
/// nothing. Afterwards each period applies the rate of the highest tier whose
/// threshold does not exceed the current balance, found by a reverse linear
/// scan. A period with no qualifying tier leaves the balance unchanged.
/// Callers must supply `tiers` in ascending threshold order.
pub fn project_deposit(
    periods: u32,
    balance: Decimal4,
    tiers: &[InterestTier],
    term: u32,
) -> Decimal4 {
    let mut balance = balance;
    let mut term = term;
    for _ in 0..periods {
        if term > 0 {
            term -= 1;
            continue;
        }
        for tier in tiers.iter().rev() {
            if balance >= tier.threshold {
                balance += balance * tier.rate;
                break;
            }
        }
    }
    balance
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal4 {
        Decimal4::from_str(s).unwrap()
    }

    fn tiers() -> Vec<InterestTier> {
        vec![
            InterestTier {
                threshold: dec("0"),
                rate: dec("0.05"),
            },
            InterestTier {
                threshold: dec("104"),
                rate: dec("0.1"),
            },
            InterestTier {
                threshold: dec("1000"),
                rate: dec("0.2"),
            },
        ]
    }

    #[test]
    fn test_debit_compounds_each_period() {
        assert_eq!(project_debit(2, dec("200"), dec("0.1")), dec("242"));
    }

    #[test]
    fn test_debit_zero_periods_is_identity() {
        assert_eq!(project_debit(0, dec("200"), dec("0.1")), dec("200"));
    }

    #[test]
    fn test_debit_negative_rate_shrinks_balance() {
        assert_eq!(project_debit(1, dec("200"), dec("-0.5")), dec("100"));
    }

    #[test]
    fn test_credit_commission_deepens_debt() {
        let projection = project_credit(2, dec("-100"), dec("-1000"), dec("0.2"));

        // -100 - |-20| = -120, then -120 - |-24| = -144
        assert_eq!(projection.balance, dec("-144"));
        assert!(!projection.over_limit);
    }

    #[test]
    fn test_credit_ignores_non_negative_balance() {
        let projection = project_credit(5, dec("100"), dec("-1000"), dec("0.2"));

        assert_eq!(projection.balance, dec("100"));
        assert!(!projection.over_limit);

        let projection = project_credit(5, Decimal4::ZERO, dec("-1000"), dec("0.2"));
        assert_eq!(projection.balance, Decimal4::ZERO);
    }

    #[test]
    fn test_credit_over_limit_flag_is_sticky() {
        // -100 doubles in magnitude each period with commission 1.0:
        // -200, -400, -800 — past the -150 floor from the first period on.
        let projection = project_credit(3, dec("-100"), dec("-150"), dec("1.0"));

        assert_eq!(projection.balance, dec("-800"));
        assert!(projection.over_limit);
    }

    #[test]
    fn test_deposit_term_lock_skips_periods() {
        // term=1: period 1 accrues nothing, periods 2-3 apply tier (104, 0.1)
        // while the balance stays below 1000.
        let balance = project_deposit(3, dec("105"), &tiers(), 1);
        assert_eq!(balance, dec("127.05"));

        let after_two = project_deposit(2, dec("105"), &tiers(), 1);
        assert_eq!(after_two, dec("115.5"));
    }

    #[test]
    fn test_deposit_highest_qualifying_tier_wins() {
        // 1000 qualifies for the top tier exactly at the threshold.
        assert_eq!(project_deposit(1, dec("1000"), &tiers(), 0), dec("1200"));
        assert_eq!(project_deposit(1, dec("104"), &tiers(), 0), dec("114.4"));
        assert_eq!(project_deposit(1, dec("50"), &tiers(), 0), dec("52.5"));
    }

    #[test]
    fn test_deposit_no_qualifying_tier_leaves_balance_unchanged() {
        assert_eq!(project_deposit(3, dec("-10"), &tiers(), 0), dec("-10"));
        assert_eq!(project_deposit(3, dec("50"), &[], 0), dec("50"));
    }

    #[test]
    fn test_deposit_fully_locked_projection_is_identity() {
        assert_eq!(project_deposit(3, dec("105"), &tiers(), 3), dec("105"));
    }
}
