//! Server-side HTML rendering.
//!
//! Pages are plain `format!` templates. Every interpolated user value goes
//! through [`escape`].

mod forms;
mod pages;

use std::fmt::Write;

use axum::http::StatusCode;

use crate::api::session::Flash;
use crate::domain::User;

pub use forms::{account_form, login_form, register_form, AccountFields, LoginFields, RegisterFields};
pub use pages::{about, home};

const SITE_NAME: &str = "Rust Blog";

/// Escape text for HTML element content and quoted attribute values.
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Full page: navigation (which depends on whether `user` is set), flash
/// messages, then `content`.
pub fn layout(title: Option<&str>, user: Option<&User>, flashes: &[Flash], content: &str) -> String {
    let title = match title {
        Some(t) => format!("{} - {}", SITE_NAME, escape(t)),
        None => SITE_NAME.to_string(),
    };

    let account_links = match user {
        Some(_) => concat!(
            r#"<a class="nav-item" href="/account">Account</a>"#,
            r#"<a class="nav-item" href="/logout">Logout</a>"#
        ),
        None => concat!(
            r#"<a class="nav-item" href="/login">Login</a>"#,
            r#"<a class="nav-item" href="/register">Register</a>"#
        ),
    };

    let mut flash_html = String::new();
    for flash in flashes {
        let _ = write!(
            flash_html,
            r#"<div class="alert alert-{}">{}</div>"#,
            flash.category.as_str(),
            escape(&flash.message)
        );
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="stylesheet" href="/static/main.css">
<title>{title}</title>
</head>
<body>
<header>
<nav>
<a class="brand" href="/">{site}</a>
<a class="nav-item" href="/">Home</a>
<a class="nav-item" href="/about">About</a>
<span class="nav-right">{account_links}</span>
</nav>
</header>
<main>
{flash_html}
{content}
</main>
</body>
</html>
"#,
        site = SITE_NAME,
    )
}

/// Standalone page for errors that escape a handler.
pub fn error_page(status: StatusCode, message: &str) -> String {
    let heading = format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    let content = format!(
        r#"<div class="content-section"><h1>{}</h1><p>{}</p><a href="/">Back to home</a></div>"#,
        escape(&heading),
        escape(message)
    );
    layout(Some(&heading), None, &[], &content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::session::FlashCategory;
    use uuid::Uuid;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#x27;y&#x27;&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_layout_nav_for_anonymous() {
        let html = layout(None, None, &[], "<p>hi</p>");
        assert!(html.contains(r#"href="/login""#));
        assert!(html.contains(r#"href="/register""#));
        assert!(!html.contains(r#"href="/logout""#));
        assert!(html.contains("<title>Rust Blog</title>"));
    }

    #[test]
    fn test_layout_nav_for_user_and_flashes() {
        let user = User::new(
            Uuid::new_v4(),
            "alice".to_string(),
            "alice@example.com".to_string(),
            "hash".to_string(),
        );
        let flashes = [Flash::new(FlashCategory::Success, "Saved <ok>")];
        let html = layout(Some("Account"), Some(&user), &flashes, "");

        assert!(html.contains(r#"href="/account""#));
        assert!(html.contains(r#"href="/logout""#));
        assert!(!html.contains(r#"href="/login""#));
        assert!(html.contains(r#"<div class="alert alert-success">Saved &lt;ok&gt;</div>"#));
        assert!(html.contains("<title>Rust Blog - Account</title>"));
    }

    #[test]
    fn test_error_page() {
        let html = error_page(StatusCode::NOT_FOUND, "Resource not found");
        assert!(html.contains("404 Not Found"));
        assert!(html.contains("Resource not found"));
    }
}
