//! HTML views for login-gate
//!
//! The gateway is agnostic to rendering technology; these are small
//! hand-built pages. Every interpolated user value passes through
//! [`escape`], and failure pages are fixed text that never echoes
//! caller-supplied input.

use crate::models::{Identity, UserView};

/// Escape a string for interpolation into HTML text or attribute context
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Shared page shell
fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>{title}</title></head>
<body>
{body}
</body>
</html>
"#
    )
}

/// Home view: identity summary, navigation, and flashed messages
pub fn home(identity: &Identity, messages: &[String]) -> String {
    let flashes: String = messages
        .iter()
        .map(|m| format!("<p class=\"flash\">{}</p>\n", escape(m)))
        .collect();

    let body = match identity.user() {
        Some(user) => format!(
            "{flashes}<h1>Home</h1>\n<p>Logged in as {}.</p>\n\
             <p><a href=\"/secret\">Secret</a> | <a href=\"/logout\">Logout</a></p>",
            escape(&user.username)
        ),
        None => format!(
            "{flashes}<h1>Home</h1>\n<p>You are not logged in.</p>\n\
             <p><a href=\"/login\">Login</a> | <a href=\"/register\">Register</a></p>"
        ),
    };
    layout("Home", &body)
}

/// Protected view, only reachable through the access gate
pub fn secret(user: &UserView) -> String {
    let body = format!(
        "<h1>Secret</h1>\n<p>Only {} can see this.</p>\n<p><a href=\"/\">Home</a></p>",
        escape(&user.username)
    );
    layout("Secret", &body)
}

/// Login form, preserving an optional `next` target in the form action
///
/// The target is percent-encoded into the query string, so arbitrary input
/// cannot break out of the attribute.
pub fn login_form(next: Option<&str>, error: Option<&str>) -> String {
    let action = match next {
        Some(next) if !next.is_empty() => {
            format!("/login?next={}", urlencoding::encode(next))
        }
        _ => "/login".to_string(),
    };
    let error_line = error
        .map(|e| format!("<p class=\"error\">{}</p>\n", escape(e)))
        .unwrap_or_default();

    let body = format!(
        "<h1>Login</h1>\n{error_line}\
         <form method=\"post\" action=\"{action}\">\n\
         <label>Username <input type=\"text\" name=\"username\"></label><br>\n\
         <label>Password <input type=\"password\" name=\"password\"></label><br>\n\
         <button type=\"submit\">Login</button>\n\
         </form>\n\
         <p><a href=\"/register\">Register</a></p>"
    );
    layout("Login", &body)
}

/// Registration form
pub fn register_form(error: Option<&str>) -> String {
    let error_line = error
        .map(|e| format!("<p class=\"error\">{}</p>\n", escape(e)))
        .unwrap_or_default();

    let body = format!(
        "<h1>Register</h1>\n{error_line}\
         <form method=\"post\" action=\"/register\">\n\
         <label>Username <input type=\"text\" name=\"username\"></label><br>\n\
         <label>Email <input type=\"text\" name=\"email\"></label><br>\n\
         <label>Password <input type=\"password\" name=\"password\"></label><br>\n\
         <button type=\"submit\">Register</button>\n\
         </form>\n\
         <p><a href=\"/login\">Login</a></p>"
    );
    layout("Register", &body)
}

/// Fixed failure page for bad credentials; never parameterized
pub fn login_failed() -> String {
    layout("Login failed", "<h1>Login failed</h1>")
}

/// Fixed page for authenticated callers hitting the login route
pub fn already_logged_in() -> String {
    layout("Already logged in", "<p>Already logged in.</p>")
}
