//! Admin dashboard figures.
//!
//! Kept in its own test binary so it owns its database: the totals are sums
//! over whole tables.

mod common;

use common::{
    create_approved_vendor, create_donation, create_staff_user, dollars, TestHarness,
    TEST_PASSWORD,
};
use community_core::domains::funds::{FundDistribution, NewDistribution};
use test_context::test_context;

fn stat(value: &str, label: &str) -> String {
    format!(r#"<span class="stat-value">{value}</span><span class="stat-label">{label}</span>"#)
}

#[test_context(TestHarness)]
#[tokio::test]
async fn dashboard_totals_follow_distribution_lifecycle(ctx: &TestHarness) {
    let pool = &ctx.db_pool;
    let staff = create_staff_user(pool).await.unwrap();
    let donation = create_donation(pool, "500.00").await.unwrap();
    let vendor = create_approved_vendor(pool).await.unwrap();

    let allocate = |amount: &str| NewDistribution {
        donation_id: donation.id,
        vendor_id: vendor.id,
        amount: dollars(amount),
        purpose: "Back-to-school supplies".to_string(),
    };

    let approved = FundDistribution::allocate(allocate("200.00"), "staff", pool).await.unwrap();
    FundDistribution::approve(approved.id, "staff", pool).await.unwrap();

    let paid = FundDistribution::allocate(allocate("100.00"), "staff", pool).await.unwrap();
    FundDistribution::approve(paid.id, "staff", pool).await.unwrap();
    FundDistribution::mark_distributed(paid.id, "staff", pool).await.unwrap();

    let cancelled = FundDistribution::allocate(allocate("50.00"), "staff", pool).await.unwrap();
    FundDistribution::cancel(cancelled.id, "staff", pool).await.unwrap();

    FundDistribution::allocate(allocate("25.00"), "staff", pool).await.unwrap();

    let mut admin = ctx.client();
    admin.login(&staff.username, TEST_PASSWORD).await;
    let page = admin.get("/admin").await;
    let body = &page.body;

    assert!(body.contains(&stat("$500.00", "Total donated")));
    assert!(body.contains(&stat("$325.00", "Committed")));
    assert!(body.contains(&stat("$100.00", "Distributed")));
    assert!(body.contains(&stat("$175.00", "Available")));
    assert!(body.contains(&stat("1", "Distributions awaiting approval")));
    assert!(body.contains(&stat("0", "Vendors pending review")));
    assert!(body.contains(&stat("0", "Programs")));
}
