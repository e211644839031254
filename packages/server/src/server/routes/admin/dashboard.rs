use crate::domains::content::{Certification, Course, Document, Quiz, Test, Video};
use crate::domains::funds::{DistributionStatus, Donation, FundDistribution};
use crate::domains::membership::MemberDocument;
use crate::domains::participants::Participant;
use crate::domains::programs::Program;
use crate::domains::vault::VaultItem;
use crate::domains::vendors::{VendorStatus, VendorSubmission};
use crate::server::error::AppResult;
use crate::server::extractors::StaffContext;
use crate::server::routes::admin::admin_body;
use crate::server::views::{escape, money};

fn stat(label: &str, value: impl std::fmt::Display, href: &str) -> String {
    format!(
        r#"<a class="stat" href="{href}"><span class="stat-value">{value}</span><span class="stat-label">{label}</span></a>"#,
        label = escape(label),
    )
}

pub async fn dashboard(staff: StaffContext) -> AppResult {
    let db = staff.page.db();

    let content = [
        stat("Documents", Document::count(db).await?, "/admin/documents"),
        stat("Courses", Course::count(db).await?, "/admin/courses"),
        stat("Quizzes", Quiz::count(db).await?, "/admin/quizzes"),
        stat("Videos", Video::count(db).await?, "/admin/videos"),
        stat("Tests", Test::count(db).await?, "/admin/tests"),
        stat("Certifications", Certification::count(db).await?, "/admin/certifications"),
    ]
    .concat();

    let community = [
        stat("Programs", Program::count(db).await?, "/programs"),
        stat("Participants", Participant::count(db).await?, "/participants"),
        stat("Member documents", MemberDocument::count(db).await?, "/admin/member-documents"),
        stat(
            "Vendors pending review",
            VendorSubmission::count_by_status(VendorStatus::PendingReview, db).await?,
            "/admin/vendors?status=pending_review",
        ),
        stat("Vault items", VaultItem::count(db).await?, "/admin/vault"),
    ]
    .concat();

    let totals = Donation::totals(db).await?;
    let pending = FundDistribution::count_by_status(DistributionStatus::Pending, db).await?;
    let funds = [
        stat("Total donated", money(totals.donated), "/admin/donations"),
        stat("Committed", money(totals.committed), "/admin/distributions"),
        stat("Distributed", money(totals.distributed), "/admin/distributions?status=distributed"),
        stat(
            "Available",
            money(totals.donated - totals.committed),
            "/admin/donations",
        ),
        stat("Distributions awaiting approval", pending, "/admin/distributions?status=pending"),
    ]
    .concat();

    let body = admin_body(format!(
        r#"<h1>Admin dashboard</h1>
<p>Signed in as {user}.</p>
<h2>Content</h2><div class="stats">{content}</div>
<h2>Community</h2><div class="stats">{community}</div>
<h2>Funds</h2><div class="stats">{funds}</div>"#,
        user = escape(&staff.user.username),
    ));
    Ok(staff.page.render("Admin dashboard", body).await)
}
