use std::borrow::Cow;
use std::io;

use bytes::Bytes;
use serde::Serialize;
use serde_json::ser::{Formatter, Serializer};

use crate::escape::escape_html;
use crate::format::{ListingFormat, Rendered};
use crate::listing::{EntryClass, Listing, ListingEntry};
use crate::timestamp::rfc3339_time;

// Field order is lexical; the wire layout is fixed.

/// Wire shape of a structured listing
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredListing<'a> {
    pub base_path_escaped: Cow<'a, str>,
    pub files: Vec<StructuredEntry<'a>>,
    /// Present even at the root, where it is `/..`
    pub parent_path_escaped: Cow<'a, str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredEntry<'a> {
    pub class: EntryClass,
    pub mod_time: String,
    /// Raw name, deliberately not HTML-escaped
    pub name: &'a str,
    pub path_escaped: Cow<'a, str>,
    pub size: u64,
}

impl<'a> StructuredListing<'a> {
    pub fn from_listing(listing: &'a Listing) -> Self {
        Self {
            base_path_escaped: escape_html(listing.current_path()),
            files: listing.entries().iter().map(StructuredEntry::from_entry).collect(),
            parent_path_escaped: escape_html(listing.parent_target()),
        }
    }
}

impl<'a> StructuredEntry<'a> {
    fn from_entry(entry: &'a ListingEntry) -> Self {
        Self {
            class: entry.class,
            mod_time: rfc3339_time(entry.modified_at),
            name: &entry.name,
            path_escaped: escape_html(&entry.display_path),
            size: entry.size,
        }
    }
}

/// JSON formatter that also escapes `<`, `>`, `&`, U+2028 and U+2029 inside
/// strings, so the document stays inert when embedded in HTML.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlSafeFormatter;

impl Formatter for HtmlSafeFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            let escaped = match c {
                '<' => "\\u003c",
                '>' => "\\u003e",
                '&' => "\\u0026",
                '\u{2028}' => "\\u2028",
                '\u{2029}' => "\\u2029",
                _ => continue,
            };
            writer.write_all(fragment[start..i].as_bytes())?;
            writer.write_all(escaped.as_bytes())?;
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

/// Render a listing as a JSON document with the same order and
/// classification as the HTML page.
pub fn render_structured(listing: &Listing) -> Result<Rendered, serde_json::Error> {
    let doc = StructuredListing::from_listing(listing);

    let mut body = Vec::with_capacity(64 + listing.len() * 160);
    let mut ser = Serializer::with_formatter(&mut body, HtmlSafeFormatter);
    doc.serialize(&mut ser)?;

    Ok(Rendered {
        format: ListingFormat::Json,
        body: Bytes::from(body),
    })
}
