use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::DonationId;
use crate::domains::funds::accounting::DonationBalance;

/// Donation model - money received, recorded by staff
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Donation {
    pub id: DonationId,
    pub donor_name: String,
    pub donor_email: String,
    pub amount: Decimal,
    pub method: String,
    pub reference: String,
    pub note: String,
    pub received_on: NaiveDate,
    pub recorded_by: String,
    pub created_at: DateTime<Utc>,
}

/// Donation with the sums of its distributions
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DonationWithBalance {
    #[sqlx(flatten)]
    pub donation: Donation,
    pub committed: Decimal,
    pub distributed: Decimal,
}

impl DonationWithBalance {
    pub fn balance(&self) -> DonationBalance {
        DonationBalance::new(self.donation.amount, self.committed, self.distributed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateDonation {
    pub donor_name: String,
    pub donor_email: String,
    pub amount: Decimal,
    pub method: String,
    pub reference: String,
    pub note: String,
    pub received_on: NaiveDate,
}

/// Site-wide money totals for the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, sqlx::FromRow)]
pub struct FundTotals {
    pub donated: Decimal,
    pub committed: Decimal,
    pub distributed: Decimal,
}

const SELECT_WITH_BALANCE: &str = r#"
    SELECT d.*,
        COALESCE(SUM(f.amount) FILTER (WHERE f.status <> 'cancelled'), 0) AS committed,
        COALESCE(SUM(f.amount) FILTER (WHERE f.status = 'distributed'), 0) AS distributed
    FROM donations d
    LEFT JOIN fund_distributions f ON f.donation_id = d.id
"#;

impl Donation {
    pub async fn find_by_id(id: DonationId, pool: &PgPool) -> Result<Option<Self>> {
        let donation = sqlx::query_as::<_, Self>("SELECT * FROM donations WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(donation)
    }

    pub async fn find_with_balance(
        id: DonationId,
        pool: &PgPool,
    ) -> Result<Option<DonationWithBalance>> {
        let donation = sqlx::query_as::<_, DonationWithBalance>(&format!(
            "{SELECT_WITH_BALANCE} WHERE d.id = $1 GROUP BY d.id"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(donation)
    }

    /// All donations with balances, most recently received first
    pub async fn find_all_with_balance(pool: &PgPool) -> Result<Vec<DonationWithBalance>> {
        let donations = sqlx::query_as::<_, DonationWithBalance>(&format!(
            "{SELECT_WITH_BALANCE} GROUP BY d.id ORDER BY d.received_on DESC, d.created_at DESC"
        ))
        .fetch_all(pool)
        .await?;
        Ok(donations)
    }

    pub async fn create(input: CreateDonation, recorded_by: &str, pool: &PgPool) -> Result<Self> {
        let donation = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO donations (
                id, donor_name, donor_email, amount, method, reference, note,
                received_on, recorded_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(DonationId::new())
        .bind(&input.donor_name)
        .bind(&input.donor_email)
        .bind(input.amount)
        .bind(&input.method)
        .bind(&input.reference)
        .bind(&input.note)
        .bind(input.received_on)
        .bind(recorded_by)
        .fetch_one(pool)
        .await?;
        Ok(donation)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM donations")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    pub async fn totals(pool: &PgPool) -> Result<FundTotals> {
        let totals = sqlx::query_as::<_, FundTotals>(
            r#"
            SELECT
                (SELECT COALESCE(SUM(amount), 0) FROM donations) AS donated,
                (SELECT COALESCE(SUM(amount), 0) FROM fund_distributions
                    WHERE status <> 'cancelled') AS committed,
                (SELECT COALESCE(SUM(amount), 0) FROM fund_distributions
                    WHERE status = 'distributed') AS distributed
            "#,
        )
        .fetch_one(pool)
        .await?;
        Ok(totals)
    }
}
