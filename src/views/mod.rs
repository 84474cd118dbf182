//! Server-rendered HTML.
//!
//! Pages are assembled with plain string formatting from the
//! translation table; there is no template engine. Everything that
//! originates from user input goes through `escape_html`.

pub mod layout;
pub mod pages;

pub use pages::ContactFormValues;

/// Escape text for interpolation into HTML.
pub fn escape_html(input: &str) -> String {
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
