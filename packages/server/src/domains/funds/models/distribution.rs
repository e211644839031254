use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::common::{DistributionId, DonationId, VendorId};
use crate::domains::funds::accounting::{check_allocation, DistributionStatus, FundsError};

/// FundDistribution model - part of a donation earmarked for a vendor
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FundDistribution {
    pub id: DistributionId,
    pub donation_id: DonationId,
    pub vendor_id: VendorId,
    pub amount: Decimal,
    pub purpose: String,
    pub status: String,
    pub created_by: String,
    pub approved_by: Option<String>,
    pub approved_at: Option<DateTime<Utc>>,
    pub distributed_by: Option<String>,
    pub distributed_at: Option<DateTime<Utc>>,
    pub cancelled_by: Option<String>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Distribution joined with its donor and vendor names
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DistributionWithParties {
    #[sqlx(flatten)]
    pub distribution: FundDistribution,
    pub donor_name: String,
    pub vendor_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDistribution {
    pub donation_id: DonationId,
    pub vendor_id: VendorId,
    pub amount: Decimal,
    pub purpose: String,
}

const SELECT_WITH_PARTIES: &str = r#"
    SELECT f.*, d.donor_name AS donor_name, v.business_name AS vendor_name
    FROM fund_distributions f
    JOIN donations d ON d.id = f.donation_id
    JOIN vendor_submissions v ON v.id = f.vendor_id
"#;

impl FundDistribution {
    /// Parsed status; the column is constrained to known values.
    pub fn status(&self) -> DistributionStatus {
        self.status.parse().unwrap_or(DistributionStatus::Pending)
    }

    pub async fn find_by_id(
        id: DistributionId,
        pool: &PgPool,
    ) -> Result<Option<DistributionWithParties>> {
        let distribution = sqlx::query_as::<_, DistributionWithParties>(&format!(
            "{SELECT_WITH_PARTIES} WHERE f.id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(distribution)
    }

    /// Distributions newest first, optionally restricted to one status
    pub async fn find_all(
        status: Option<DistributionStatus>,
        pool: &PgPool,
    ) -> Result<Vec<DistributionWithParties>> {
        let distributions = sqlx::query_as::<_, DistributionWithParties>(&format!(
            "{SELECT_WITH_PARTIES} WHERE $1::text IS NULL OR f.status = $1 \
             ORDER BY f.created_at DESC, f.id DESC"
        ))
        .bind(status.map(|s| s.as_str()))
        .fetch_all(pool)
        .await?;
        Ok(distributions)
    }

    pub async fn find_by_donation(
        donation_id: DonationId,
        pool: &PgPool,
    ) -> Result<Vec<DistributionWithParties>> {
        let distributions = sqlx::query_as::<_, DistributionWithParties>(&format!(
            "{SELECT_WITH_PARTIES} WHERE f.donation_id = $1 ORDER BY f.created_at DESC, f.id DESC"
        ))
        .bind(donation_id)
        .fetch_all(pool)
        .await?;
        Ok(distributions)
    }

    pub async fn count_by_status(status: DistributionStatus, pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM fund_distributions WHERE status = $1",
        )
        .bind(status.as_str())
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Earmark part of a donation for an approved vendor.
    ///
    /// The donation row stays locked until commit, so concurrent allocations
    /// against the same donation see each other's committed amounts.
    pub async fn allocate(
        input: NewDistribution,
        created_by: &str,
        pool: &PgPool,
    ) -> Result<Self, FundsError> {
        if input.amount <= Decimal::ZERO {
            return Err(FundsError::NonPositiveAmount);
        }

        let mut tx = pool.begin().await?;

        let donation_amount = sqlx::query_scalar::<_, Decimal>(
            "SELECT amount FROM donations WHERE id = $1 FOR UPDATE",
        )
        .bind(input.donation_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(FundsError::DonationNotFound)?;

        let vendor_status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM vendor_submissions WHERE id = $1",
        )
        .bind(input.vendor_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(FundsError::VendorNotFound)?;
        if vendor_status != "approved" {
            return Err(FundsError::VendorNotApproved);
        }

        let committed = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT COALESCE(SUM(amount), 0) FROM fund_distributions
            WHERE donation_id = $1 AND status <> 'cancelled'
            "#,
        )
        .bind(input.donation_id)
        .fetch_one(&mut *tx)
        .await?;

        if let Err(e) = check_allocation(donation_amount, committed, input.amount) {
            warn!(
                donation_id = %input.donation_id,
                requested = %input.amount,
                committed = %committed,
                "Distribution rejected"
            );
            return Err(e);
        }

        let distribution = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO fund_distributions (id, donation_id, vendor_id, amount, purpose, status, created_by)
            VALUES ($1, $2, $3, $4, $5, 'pending', $6)
            RETURNING *
            "#,
        )
        .bind(DistributionId::new())
        .bind(input.donation_id)
        .bind(input.vendor_id)
        .bind(input.amount)
        .bind(&input.purpose)
        .bind(created_by)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        info!(
            distribution_id = %distribution.id,
            donation_id = %distribution.donation_id,
            vendor_id = %distribution.vendor_id,
            amount = %distribution.amount,
            "Distribution allocated"
        );

        Ok(distribution)
    }

    /// pending -> approved
    pub async fn approve(id: DistributionId, actor: &str, pool: &PgPool) -> Result<Self, FundsError> {
        Self::transition(id, DistributionStatus::Approved, actor, pool).await
    }

    /// approved -> distributed
    pub async fn mark_distributed(
        id: DistributionId,
        actor: &str,
        pool: &PgPool,
    ) -> Result<Self, FundsError> {
        Self::transition(id, DistributionStatus::Distributed, actor, pool).await
    }

    /// pending | approved -> cancelled; the amount returns to the donation's balance
    pub async fn cancel(id: DistributionId, actor: &str, pool: &PgPool) -> Result<Self, FundsError> {
        Self::transition(id, DistributionStatus::Cancelled, actor, pool).await
    }

    async fn transition(
        id: DistributionId,
        to: DistributionStatus,
        actor: &str,
        pool: &PgPool,
    ) -> Result<Self, FundsError> {
        let sql = match to {
            DistributionStatus::Approved => {
                "UPDATE fund_distributions SET status = 'approved', approved_by = $2, approved_at = NOW() \
                 WHERE id = $1 AND status = ANY($3) RETURNING *"
            }
            DistributionStatus::Distributed => {
                "UPDATE fund_distributions SET status = 'distributed', distributed_by = $2, distributed_at = NOW() \
                 WHERE id = $1 AND status = ANY($3) RETURNING *"
            }
            DistributionStatus::Cancelled => {
                "UPDATE fund_distributions SET status = 'cancelled', cancelled_by = $2, cancelled_at = NOW() \
                 WHERE id = $1 AND status = ANY($3) RETURNING *"
            }
            DistributionStatus::Pending => return Err(Self::rejected_transition(id, to, pool).await),
        };

        let sources: Vec<String> = DistributionStatus::sources(to)
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();

        let updated = sqlx::query_as::<_, Self>(sql)
            .bind(id)
            .bind(actor)
            .bind(&sources)
            .fetch_optional(pool)
            .await?;

        match updated {
            Some(distribution) => {
                info!(distribution_id = %id, status = %to, actor = %actor, "Distribution status changed");
                Ok(distribution)
            }
            None => Err(Self::rejected_transition(id, to, pool).await),
        }
    }

    async fn rejected_transition(
        id: DistributionId,
        to: DistributionStatus,
        pool: &PgPool,
    ) -> FundsError {
        let current = sqlx::query_as::<_, Self>("SELECT * FROM fund_distributions WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await;
        match current {
            Ok(Some(current)) => FundsError::InvalidTransition {
                from: current.status(),
                to,
            },
            Ok(None) => FundsError::DistributionNotFound,
            Err(e) => FundsError::Database(e),
        }
    }
}
