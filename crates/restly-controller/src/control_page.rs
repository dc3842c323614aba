//! HTML for the local control page: quick-action buttons and the one-line
//! command form.

use crate::MenuAction;

/// Banner shown after a form post redirects back to the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// The command was recorded.
    Sent,
    /// The form was submitted empty.
    Empty,
}

impl PageStatus {
    /// Query value used in the redirect.
    pub fn as_query(self) -> &'static str {
        match self {
            PageStatus::Sent => "sent",
            PageStatus::Empty => "empty",
        }
    }

    /// Parse the `status` query value.
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "sent" => Some(PageStatus::Sent),
            "empty" => Some(PageStatus::Empty),
            _ => None,
        }
    }

    fn message(self) -> &'static str {
        match self {
            PageStatus::Sent => "Command sent.",
            PageStatus::Empty => "Nothing to send.",
        }
    }
}

/// Render the control page. Every form posts with `token` in its query.
pub fn render(
    deep_work_minutes: u32,
    token: &str,
    prefill: &str,
    status: Option<PageStatus>,
) -> String {
    let token = escape(token);

    let mut buttons = String::new();
    for action in MenuAction::QUICK {
        if let Some(slug) = action.slug() {
            buttons.push_str(&format!(
                "<form method=\"post\" action=\"/actions/{}?token={}\"><button>{}</button></form>\n",
                slug,
                token,
                escape(&action.label(deep_work_minutes)),
            ));
        }
    }

    let banner = status
        .map(|s| format!("<p class=\"status\">{}</p>\n", s.message()))
        .unwrap_or_default();

    format!(
        r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<title>Restly Controller</title>
<style>
body {{ font-family: sans-serif; max-width: 28rem; margin: 2rem auto; }}
.actions {{ display: flex; flex-wrap: wrap; gap: .5rem; margin-bottom: 1rem; }}
.command {{ display: flex; gap: .5rem; }}
.command input {{ flex: 1; }}
.status {{ color: #3aa68c; }}
</style>
</head>
<body>
<h1>Restly Controller</h1>
{banner}<div class="actions">
{buttons}</div>
<form class="command" method="post" action="/command?token={token}">
<input name="text" autofocus value="{prefill}" placeholder="e.g., Set a 45-minute deep work session">
<button>Send</button>
</form>
<form method="post" action="/quit?token={token}"><button>Quit Controller</button></form>
</body>
</html>
"#,
        banner = banner,
        buttons = buttons,
        prefill = escape(prefill),
        token = token,
    )
}

/// Escape text for HTML element content and double-quoted attributes.
pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
