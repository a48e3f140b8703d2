//! Server-side HTML for the dashboard page.

mod chart;
mod page;
mod theme;

pub use chart::candlestick_svg;
pub use page::{render_dashboard, PageOptions};
pub use theme::{Palette, Theme};

/// Escapes text for use in HTML element content and attribute values.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}
