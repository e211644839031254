use super::escape;
use crate::server::auth::{Flash, SessionUser};

/// Per-request pieces of the shared page frame
pub struct PageChrome<'a> {
    pub site_name: &'a str,
    pub user: Option<&'a SessionUser>,
    pub flashes: &'a [Flash],
}

const PUBLIC_NAV: &[(&str, &str)] = &[
    ("/", "Home"),
    ("/programs", "Programs"),
    ("/participants", "Participants"),
    ("/membership", "Membership"),
    ("/vendor", "Vendors"),
    ("/donate", "Donate"),
    ("/about", "About"),
];

const ADMIN_NAV: &[(&str, &str)] = &[
    ("/admin", "Dashboard"),
    ("/admin/documents", "Documents"),
    ("/admin/courses", "Courses"),
    ("/admin/quizzes", "Quizzes"),
    ("/admin/tests", "Tests"),
    ("/admin/videos", "Videos"),
    ("/admin/certifications", "Certifications"),
    ("/admin/member-documents", "Member Documents"),
    ("/admin/vendors", "Vendors"),
    ("/admin/donations", "Donations"),
    ("/admin/distributions", "Distributions"),
    ("/admin/vault", "Data Vault"),
];

fn nav_links(links: &[(&str, &str)]) -> String {
    links
        .iter()
        .map(|(href, label)| format!(r#"<a href="{href}">{label}</a>"#))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Secondary navigation shown at the top of admin pages
pub fn admin_nav() -> String {
    format!(r#"<nav class="admin-nav">{}</nav>"#, nav_links(ADMIN_NAV))
}

fn account_links(user: Option<&SessionUser>) -> String {
    match user {
        Some(user) if user.is_staff => format!(
            r#"<span class="account">{}</span> <a href="/admin">Admin</a> <a href="/admin/logout">Log out</a>"#,
            escape(&user.username)
        ),
        Some(user) => format!(
            r#"<span class="account">Signed in as {}</span>"#,
            escape(&user.username)
        ),
        None => r#"<a href="/register">Register</a> <a href="/admin/login">Staff login</a>"#.to_string(),
    }
}

fn flash_list(flashes: &[Flash]) -> String {
    if flashes.is_empty() {
        return String::new();
    }
    let items: String = flashes
        .iter()
        .map(|f| {
            format!(
                r#"<li class="flash flash-{}">{}</li>"#,
                f.level.as_str(),
                escape(&f.message)
            )
        })
        .collect();
    format!(r#"<ul class="flashes">{items}</ul>"#)
}

/// Wraps `body` (already-escaped HTML) in the site layout
pub fn render_page(chrome: &PageChrome<'_>, title: &str, body: &str) -> String {
    let site = escape(chrome.site_name);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title} | {site}</title>
<link rel="stylesheet" href="/static/style.css">
</head>
<body>
<header class="site-header">
<a class="brand" href="/">{site}</a>
<nav class="main-nav">{nav}</nav>
<div class="account-links">{account}</div>
</header>
<main>
{flashes}
{body}
</main>
<footer class="site-footer"><p>&copy; {site}</p></footer>
</body>
</html>"#,
        title = escape(title),
        site = site,
        nav = nav_links(PUBLIC_NAV),
        account = account_links(chrome.user),
        flashes = flash_list(chrome.flashes),
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::AdminUserId;
    use crate::server::auth::FlashLevel;

    #[test]
    fn renders_flashes_escaped() {
        let flashes = vec![Flash {
            level: FlashLevel::Error,
            message: "<b>nope</b>".to_string(),
        }];
        let html = render_page(
            &PageChrome {
                site_name: "Community Hub",
                user: None,
                flashes: &flashes,
            },
            "Home",
            "<p>hi</p>",
        );
        assert!(html.contains(r#"<li class="flash flash-error">&lt;b&gt;nope&lt;/b&gt;</li>"#));
        assert!(html.contains("<title>Home | Community Hub</title>"));
        assert!(html.contains("Staff login"));
    }

    #[test]
    fn staff_see_admin_links() {
        let user = SessionUser {
            id: AdminUserId::new(),
            username: "sam".to_string(),
            is_staff: true,
        };
        let html = render_page(
            &PageChrome {
                site_name: "Hub",
                user: Some(&user),
                flashes: &[],
            },
            "Dashboard",
            "",
        );
        assert!(html.contains(r#"<a href="/admin/logout">Log out</a>"#));
        assert!(!html.contains("Staff login"));
    }
}
