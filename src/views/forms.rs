use std::fmt::Write;

use super::escape;
use crate::api::extractors::FormErrors;

/// Values echoed back into the register form.
#[derive(Debug, Default)]
pub struct RegisterFields<'a> {
    pub username: &'a str,
    pub email: &'a str,
}

#[derive(Debug, Default)]
pub struct LoginFields<'a> {
    pub email: &'a str,
    pub remember: bool,
    /// Carried through the form action so the POST sees it too
    pub next: Option<&'a str>,
}

#[derive(Debug)]
pub struct AccountFields<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub image_url: &'a str,
}

fn input(name: &str, label: &str, kind: &str, value: &str, errors: &FormErrors) -> String {
    let messages = errors.get(name);
    let class = if messages.is_empty() {
        "form-control"
    } else {
        "form-control is-invalid"
    };

    let mut html = format!(
        r#"<div class="form-group"><label for="{name}">{label}</label><input id="{name}" name="{name}" type="{kind}" class="{class}" value="{value}">"#,
        value = escape(value),
    );
    for message in messages {
        let _ = write!(html, r#"<div class="invalid-feedback">{}</div>"#, escape(message));
    }
    html.push_str("</div>");
    html
}

pub fn register_form(fields: &RegisterFields<'_>, errors: &FormErrors) -> String {
    format!(
        r#"<div class="content-section">
<form method="POST" action="/register">
<fieldset><legend>Join Today</legend>
{username}
{email}
{password}
{confirm}
</fieldset>
<button type="submit" class="btn">Sign Up</button>
</form>
<small>Already Have An Account? <a href="/login">Sign In</a></small>
</div>"#,
        username = input("username", "Username", "text", fields.username, errors),
        email = input("email", "Email", "email", fields.email, errors),
        password = input("password", "Password", "password", "", errors),
        confirm = input("confirm_password", "Confirm Password", "password", "", errors),
    )
}

pub fn login_form(fields: &LoginFields<'_>, errors: &FormErrors) -> String {
    let action = match fields.next {
        Some(next) => {
            let encoded: String = url::form_urlencoded::byte_serialize(next.as_bytes()).collect();
            format!("/login?next={}", encoded)
        }
        None => "/login".to_string(),
    };
    let checked = if fields.remember { " checked" } else { "" };

    format!(
        r#"<div class="content-section">
<form method="POST" action="{action}">
<fieldset><legend>Log In</legend>
{email}
{password}
<div class="form-check"><input id="remember" name="remember" type="checkbox" value="y"{checked}><label for="remember">Remember Me</label></div>
</fieldset>
<button type="submit" class="btn">Login</button>
</form>
<small>Need An Account? <a href="/register">Sign Up Now</a></small>
</div>"#,
        action = escape(&action),
        email = input("email", "Email", "email", fields.email, errors),
        password = input("password", "Password", "password", "", errors),
    )
}

pub fn account_form(fields: &AccountFields<'_>, errors: &FormErrors) -> String {
    let mut picture_errors = String::new();
    for message in errors.get("picture") {
        let _ = write!(picture_errors, r#"<div class="invalid-feedback">{}</div>"#, escape(message));
    }

    format!(
        r#"<div class="content-section">
<div class="media">
<img class="account-img" src="{image}" alt="Profile picture">
<div class="media-body"><h2 class="account-heading">{username_text}</h2><p class="text-secondary">{email_text}</p></div>
</div>
<form method="POST" action="/account" enctype="multipart/form-data">
<fieldset><legend>Account Info</legend>
{username}
{email}
<div class="form-group"><label for="picture">Update Profile Picture</label><input id="picture" name="picture" type="file" accept=".jpg,.png">{picture_errors}</div>
</fieldset>
<button type="submit" class="btn">Update</button>
</form>
</div>"#,
        image = escape(fields.image_url),
        username_text = escape(fields.username),
        email_text = escape(fields.email),
        username = input("username", "Username", "text", fields.username, errors),
        email = input("email", "Email", "email", fields.email, errors),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_form_echoes_values_and_errors() {
        let mut errors = FormErrors::new();
        errors.add("email", "That email is taken. Please choose a different one.");
        let html = register_form(
            &RegisterFields {
                username: "al<ice",
                email: "alice@example.com",
            },
            &errors,
        );

        assert!(html.contains(r#"value="al&lt;ice""#));
        assert!(html.contains("That email is taken"));
        assert!(html.contains("form-control is-invalid"));
        assert!(html.contains(r#"name="confirm_password""#));
    }

    #[test]
    fn test_login_form_keeps_next() {
        let html = login_form(
            &LoginFields {
                next: Some("/account"),
                remember: true,
                ..Default::default()
            },
            &FormErrors::new(),
        );
        assert!(html.contains(r#"action="/login?next=%2Faccount""#));
        assert!(html.contains(" checked"));
    }

    #[test]
    fn test_account_form_shows_picture() {
        let html = account_form(
            &AccountFields {
                username: "alice",
                email: "alice@example.com",
                image_url: "/static/profile_pics/default.jpg",
            },
            &FormErrors::new(),
        );
        assert!(html.contains(r#"src="/static/profile_pics/default.jpg""#));
        assert!(html.contains(r#"enctype="multipart/form-data""#));
    }
}
