//! Server rendered HTML. The pages are small enough that plain `format!` is
//! all the templating they need

use shared::{
    api::{Object, Page},
    model::Status,
};

use crate::UserState;

pub const LOGGED: &str = "<p>Logged! <a href='/'>Back</a></p>";
pub const EMERGENCY_STARTED: &str = "<p>Emergency started! <a href='/'>Back</a></p>";

/// Escapes text for use in element content and quoted attribute values
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
</head>
<body>
{body}
</body>
</html>
"#
    )
}

fn account_links(user: Option<&UserState>) -> String {
    match user {
        Some(user) => format!(
            r#"<p>Logged in as <strong>{username}</strong></p>
<form method="post" action="{logout}"><button type="submit">Log out</button></form>
<form method="post" action="{delete}" onsubmit="return confirm('Delete your account and all of its history?')">
<button type="submit">Delete account</button>
</form>"#,
            username = escape_html(&user.username),
            logout = Page::Logout.path(),
            delete = Page::DeleteAccount.path(),
        ),
        None => format!(
            r#"<p><a href="{login}">Log in</a> or <a href="{signup}">sign up</a> to keep your own count</p>"#,
            login = Page::Login.path(),
            signup = Page::Signup.path(),
        ),
    }
}

/// Home page. `status` is rendered server side and then refreshed by polling
/// the status endpoint once a second
pub fn index(user: Option<&UserState>, status: &Status, goal: u32) -> String {
    let body = format!(
        r#"<h1>Pushups</h1>
{account}
<p>Goal: {goal}</p>
<p>Remaining: <span id="remaining">{remaining}</span></p>
<p id="emergency"{emergency_hidden}>Emergency! <span id="time_left">{time_left}</span> seconds left</p>

<form method="post" action="{log}">
<input type="number" name="amount" min="0" required>
<button type="submit">Log pushups</button>
</form>

<form method="post" action="{start}">
<button type="submit">Start emergency</button>
</form>

<form id="extend">
<input type="password" name="code" placeholder="Passcode">
<button type="submit">Extend emergency</button>
<span id="extend_result"></span>
</form>

<script>
async function refresh() {{
    const response = await fetch("{status_path}");
    if (!response.ok) return;
    const status = await response.json();
    document.getElementById("remaining").textContent = status.remaining;
    document.getElementById("time_left").textContent = status.time_left;
    document.getElementById("emergency").hidden = !status.emergency;
}}

document.getElementById("extend").addEventListener("submit", async (event) => {{
    event.preventDefault();
    const response = await fetch("{extend}", {{
        method: "POST",
        body: new URLSearchParams(new FormData(event.target)),
    }});
    const result = await response.json();
    document.getElementById("extend_result").textContent = result.ok ? "Extended" : "Wrong passcode";
    refresh();
}});

setInterval(refresh, 1000);
</script>"#,
        account = account_links(user),
        remaining = status.remaining,
        time_left = status.time_left,
        emergency_hidden = if status.emergency { "" } else { " hidden" },
        log = Object::LogPushups.path(),
        start = Object::StartEmergency.path(),
        extend = Object::ExtendEmergency.path(),
        status_path = Object::Status.path(),
    );

    layout("Pushups", &body)
}

pub fn signup_form() -> String {
    let body = format!(
        r#"<h1>Sign up</h1>
<form method="post" action="{signup}">
<p><label>Username <input name="username" required></label></p>
<p><label>Email <input type="email" name="email" required></label></p>
<p><label>Password <input type="password" name="password" required></label></p>
<button type="submit">Sign up</button>
</form>
<p>Already registered? <a href="{login}">Log in</a></p>"#,
        signup = Page::Signup.path(),
        login = Page::Login.path(),
    );

    layout("Sign up", &body)
}

pub fn login_form() -> String {
    let body = format!(
        r#"<h1>Log in</h1>
<form method="post" action="{login}">
<p><label>Username <input name="username" required></label></p>
<p><label>Password <input type="password" name="password" required></label></p>
<button type="submit">Log in</button>
</form>
<p>No account? <a href="{signup}">Sign up</a></p>"#,
        login = Page::Login.path(),
        signup = Page::Signup.path(),
    );

    layout("Log in", &body)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#x27;y&#x27;&quot;)&lt;/script&gt;"
        );
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_index_escapes_username() {
        let user = UserState {
            id: 1,
            username: "<b>bob</b>".to_string(),
        };
        let status = Status {
            remaining: 30,
            emergency: false,
            time_left: 0,
        };

        let html = index(Some(&user), &status, 50);
        assert!(html.contains("&lt;b&gt;bob&lt;/b&gt;"));
        assert!(!html.contains("<b>bob</b>"));
        assert!(html.contains(r#"<span id="remaining">30</span>"#));
        assert!(html.contains(r#"<p id="emergency" hidden>"#));
    }

    #[test]
    fn test_index_shows_running_emergency() {
        let status = Status {
            remaining: 0,
            emergency: true,
            time_left: 800,
        };

        let html = index(None, &status, 50);
        assert!(html.contains(r#"<p id="emergency">"#));
        assert!(html.contains(r#"<span id="time_left">800</span>"#));
        assert!(html.contains(Page::Signup.path()));
    }
}
