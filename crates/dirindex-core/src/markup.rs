use std::fmt::Write as _;

use bytes::Bytes;

use crate::escape::escape_html;
use crate::format::{ListingFormat, Rendered};
use crate::listing::Listing;
use crate::timestamp::markup_time;

pub const DEFAULT_STYLESHEET: &str = ".dir { font-weight: bold }";

/// Presentation knobs for the HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupOptions {
    /// Inline CSS placed in the page head. Trusted, emitted verbatim.
    pub stylesheet: String,
}

impl Default for MarkupOptions {
    fn default() -> Self {
        Self {
            stylesheet: DEFAULT_STYLESHEET.to_string(),
        }
    }
}

/// Render a listing as a self-contained HTML page.
///
/// Every request-derived string (current path, parent link, names and link
/// targets) is HTML-escaped before it is placed in the document.
pub fn render_markup(listing: &Listing, options: &MarkupOptions) -> Rendered {
    let base = escape_html(listing.current_path());
    let mut page = String::with_capacity(256 + listing.len() * 128);

    // fmt::Write into a String cannot fail
    let _ = write!(
        page,
        "<html><head><title>{}</title><style>{}</style></head><body>",
        base, options.stylesheet
    );
    let _ = write!(page, "<h1>{}</h1>", base);
    page.push_str("<ul>");

    if let Some(parent) = listing.parent_path() {
        let _ = write!(page, r#"<li><a href="{}" class="dir">..</a></li>"#, escape_html(parent));
    }

    for entry in listing.entries() {
        let _ = write!(
            page,
            r#"<li><a href="{}" class="{}">{}</a>, {}, last modified {}</li>"#,
            escape_html(&entry.display_path),
            entry.class.as_str(),
            escape_html(&entry.name),
            entry.aux_text(),
            markup_time(entry.modified_at),
        );
    }
    page.push_str("</ul></body></html>");

    Rendered {
        format: ListingFormat::Html,
        body: Bytes::from(page),
    }
}
