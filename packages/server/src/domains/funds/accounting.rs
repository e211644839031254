use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FundsError {
    #[error("Donation not found.")]
    DonationNotFound,

    #[error("Distribution not found.")]
    DistributionNotFound,

    #[error("Vendor not found.")]
    VendorNotFound,

    #[error("Funds can only be distributed to approved vendors.")]
    VendorNotApproved,

    #[error("Amount must be greater than zero.")]
    NonPositiveAmount,

    #[error("Requested ${requested} exceeds the remaining balance of ${remaining}.")]
    ExceedsBalance {
        requested: Decimal,
        remaining: Decimal,
    },

    #[error("Cannot move a distribution from {from} to {to}.")]
    InvalidTransition {
        from: DistributionStatus,
        to: DistributionStatus,
    },

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Distribution lifecycle: pending -> approved -> distributed, with
/// cancellation possible until the money has gone out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistributionStatus {
    Pending,
    Approved,
    Distributed,
    Cancelled,
}

impl DistributionStatus {
    pub const ALL: [DistributionStatus; 4] = [
        DistributionStatus::Pending,
        DistributionStatus::Approved,
        DistributionStatus::Distributed,
        DistributionStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DistributionStatus::Pending => "pending",
            DistributionStatus::Approved => "approved",
            DistributionStatus::Distributed => "distributed",
            DistributionStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DistributionStatus::Pending => "Pending",
            DistributionStatus::Approved => "Approved",
            DistributionStatus::Distributed => "Distributed",
            DistributionStatus::Cancelled => "Cancelled",
        }
    }

    pub fn can_transition(from: DistributionStatus, to: DistributionStatus) -> bool {
        use DistributionStatus::*;
        matches!(
            (from, to),
            (Pending, Approved) | (Approved, Distributed) | (Pending, Cancelled) | (Approved, Cancelled)
        )
    }

    /// States from which `self` can be reached.
    pub fn sources(to: DistributionStatus) -> Vec<DistributionStatus> {
        Self::ALL
            .into_iter()
            .filter(|from| Self::can_transition(*from, to))
            .collect()
    }
}

impl fmt::Display for DistributionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistributionStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| anyhow::anyhow!("Invalid distribution status: {}", s))
    }
}

/// Where a donation's money stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DonationBalance {
    pub amount: Decimal,
    /// Sum of non-cancelled distributions
    pub committed: Decimal,
    /// Sum of distributions already paid out
    pub distributed: Decimal,
    pub remaining: Decimal,
}

impl DonationBalance {
    pub fn new(amount: Decimal, committed: Decimal, distributed: Decimal) -> Self {
        Self {
            amount,
            committed,
            distributed,
            remaining: amount - committed,
        }
    }
}

/// Checks that `requested` fits in what is left of a donation.
pub fn check_allocation(
    donation_amount: Decimal,
    committed: Decimal,
    requested: Decimal,
) -> Result<(), FundsError> {
    if requested <= Decimal::ZERO {
        return Err(FundsError::NonPositiveAmount);
    }
    if committed + requested > donation_amount {
        return Err(FundsError::ExceedsBalance {
            requested,
            remaining: (donation_amount - committed).max(Decimal::ZERO),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn allocation_up_to_the_full_amount_is_allowed() {
        assert!(check_allocation(dec("500.00"), dec("0"), dec("500.00")).is_ok());
        assert!(check_allocation(dec("500.00"), dec("300.00"), dec("200.00")).is_ok());
    }

    #[test]
    fn allocation_beyond_the_balance_reports_remaining() {
        let err = check_allocation(dec("500.00"), dec("300.00"), dec("200.01")).unwrap_err();
        match err {
            FundsError::ExceedsBalance {
                requested,
                remaining,
            } => {
                assert_eq!(requested, dec("200.01"));
                assert_eq!(remaining, dec("200.00"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn allocation_must_be_positive() {
        assert!(matches!(
            check_allocation(dec("10"), dec("0"), dec("0")),
            Err(FundsError::NonPositiveAmount)
        ));
        assert!(matches!(
            check_allocation(dec("10"), dec("0"), dec("-1")),
            Err(FundsError::NonPositiveAmount)
        ));
    }

    #[test]
    fn exceeds_balance_message_includes_amounts() {
        let err = check_allocation(dec("100.00"), dec("75.00"), dec("30.00")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Requested $30.00 exceeds the remaining balance of $25.00."
        );
    }

    #[test]
    fn transitions_are_one_way() {
        use DistributionStatus::*;
        assert!(DistributionStatus::can_transition(Pending, Approved));
        assert!(DistributionStatus::can_transition(Approved, Distributed));
        assert!(DistributionStatus::can_transition(Pending, Cancelled));
        assert!(DistributionStatus::can_transition(Approved, Cancelled));

        assert!(!DistributionStatus::can_transition(Pending, Distributed));
        assert!(!DistributionStatus::can_transition(Approved, Pending));
        assert!(!DistributionStatus::can_transition(Distributed, Cancelled));
        assert!(!DistributionStatus::can_transition(Cancelled, Approved));
        for status in DistributionStatus::ALL {
            assert!(!DistributionStatus::can_transition(status, status));
        }
    }

    #[test]
    fn sources_of_each_target() {
        use DistributionStatus::*;
        assert_eq!(DistributionStatus::sources(Approved), vec![Pending]);
        assert_eq!(DistributionStatus::sources(Distributed), vec![Approved]);
        assert_eq!(DistributionStatus::sources(Cancelled), vec![Pending, Approved]);
        assert!(DistributionStatus::sources(Pending).is_empty());
    }

    #[test]
    fn balance_remaining() {
        let balance = DonationBalance::new(dec("250.00"), dec("100.00"), dec("40.00"));
        assert_eq!(balance.remaining, dec("150.00"));
    }
}
