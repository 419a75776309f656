use askama::Template;

/// Attribution printed under every card.
pub const ATTRIBUTION: &str = "Art and text produced by an AI at Alphajot.com";

/// Convert newline-separated completion text into paragraph markup.
///
/// Newlines alternately open and close a paragraph, starting with `<p>`, so
/// text shaped like "\nline\n\nline\n" becomes `<p>line</p><p>line</p>`. An
/// odd number of newlines leaves the last paragraph open. Double quotes are
/// dropped so the markup can be echoed back through a form field.
pub fn format_to_html(message: &str) -> String {
    let mut rebuilt = String::with_capacity(message.len() + 16);
    let mut close_tag = false;

    for c in message.chars() {
        match c {
            '\n' => {
                rebuilt.push_str(if close_tag { "</p>" } else { "<p>" });
                close_tag = !close_tag;
            }
            '"' => {}
            other => rebuilt.push(other),
        }
    }

    rebuilt
}

/// Reduce round-tripped message markup to text and paragraph tags.
///
/// The message comes back from the client in a form field, so it is not
/// trusted: everything is escaped, then only bare `<p>` and `</p>` are
/// restored.
pub fn sanitize_message_html(message_html: &str) -> String {
    let mut escaped = String::with_capacity(message_html.len());

    for c in message_html.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            other => escaped.push(other),
        }
    }

    escaped
        .replace("&lt;p&gt;", "<p>")
        .replace("&lt;/p&gt;", "</p>")
}

/// The generated card page with the confirmation form.
///
/// `img` and `msg` are round-tripped through hidden inputs exactly as shown,
/// so confirming never regenerates anything.
#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultTemplate {
    pub image_url: String,
    pub message_html: String,
    pub attribution: &'static str,
}

pub fn format_result(image_url: impl Into<String>, message_html: impl Into<String>) -> ResultTemplate {
    ResultTemplate {
        image_url: image_url.into(),
        message_html: message_html.into(),
        attribution: ATTRIBUTION,
    }
}
