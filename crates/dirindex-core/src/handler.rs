use std::io;

use thiserror::Error;
use tracing::{debug, warn};

use dirindex_platform::filesystem::{DirectoryHandle, DirectoryReadError};

use crate::collector::collect_entries;
use crate::format::{ListingFormat, Rendered};
use crate::listing::Listing;
use crate::markup::{render_markup, MarkupOptions};
use crate::response::ResponseSink;
use crate::structured::render_structured;

#[derive(Debug, Error)]
pub enum ListingError {
    #[error(transparent)]
    Read(#[from] DirectoryReadError),
    #[error("failed to encode listing: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write response: {0}")]
    Write(#[source] io::Error),
}

/// Serves directory listings for the static-file layer.
///
/// Holds no per-request state; one handler can serve concurrent requests.
#[derive(Debug, Clone, Default)]
pub struct ListingHandler {
    markup: MarkupOptions,
}

impl ListingHandler {
    pub fn new(markup: MarkupOptions) -> Self {
        Self { markup }
    }

    /// Read `dir` and render it as it appears at `request_path`.
    ///
    /// Nothing is written to the sink unless the whole listing was read
    /// and rendered.
    pub fn render(
        &self,
        dir: &mut dyn DirectoryHandle,
        request_path: &str,
        format: ListingFormat,
    ) -> Result<Rendered, ListingError> {
        let entries = collect_entries(dir)?;
        let listing = Listing::build(entries, request_path);

        let rendered = match format {
            ListingFormat::Html => render_markup(&listing, &self.markup),
            ListingFormat::Json => render_structured(&listing)?,
        };
        debug!(
            "rendered {} ({} entries, {} bytes) as {}",
            request_path,
            listing.len(),
            rendered.body.len(),
            format
        );
        Ok(rendered)
    }

    /// Render a listing and hand it to `sink`.
    pub fn handle_request(
        &self,
        dir: &mut dyn DirectoryHandle,
        request_path: &str,
        format: ListingFormat,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), ListingError> {
        let rendered = match self.render(dir, request_path, format) {
            Ok(r) => r,
            Err(e) => {
                warn!("directory listing for {} failed: {}", request_path, e);
                return Err(e);
            }
        };

        sink.set_content_type(rendered.content_type());
        sink.write_body(&rendered.body).map_err(ListingError::Write)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::BufferedResponse;
    use dirindex_local::LocalDirectory;
    use dirindex_platform::filesystem::Entry;
    use serde_json::Value;
    use std::fs;
    use std::time::SystemTime;

    struct FixedDirectory(Vec<Entry>);

    impl DirectoryHandle for FixedDirectory {
        fn location(&self) -> &str {
            "fixed"
        }

        fn read_entries(&mut self) -> Result<Vec<Entry>, DirectoryReadError> {
            Ok(std::mem::take(&mut self.0))
        }
    }

    struct BrokenDirectory;

    impl DirectoryHandle for BrokenDirectory {
        fn location(&self) -> &str {
            "/broken"
        }

        fn read_entries(&mut self) -> Result<Vec<Entry>, DirectoryReadError> {
            Err(DirectoryReadError::new(
                "/broken",
                io::Error::new(io::ErrorKind::Other, "input/output error"),
            ))
        }
    }

    fn fixture() -> Vec<Entry> {
        let t = SystemTime::UNIX_EPOCH;
        vec![
            Entry::file("b.txt", 5, t),
            Entry::dir("a", t),
            Entry::file("Zed.md", 12, t),
            Entry::file("<evil>.html", 7, t),
            Entry::dir("sub dir", t),
        ]
    }

    fn respond(entries: Vec<Entry>, path: &str, format: ListingFormat) -> BufferedResponse {
        let mut resp = BufferedResponse::new();
        ListingHandler::default()
            .handle_request(&mut FixedDirectory(entries), path, format, &mut resp)
            .unwrap();
        resp
    }

    /// (href, class) pairs of the entry links, parent link excluded
    fn markup_links(html: &str) -> Vec<(String, String)> {
        html.split("<li><a href=\"")
            .skip(1)
            .filter_map(|item| {
                let (href, rest) = item.split_once('"')?;
                let rest = rest.strip_prefix(" class=\"")?;
                let (class, rest) = rest.split_once('"')?;
                if rest.starts_with(">..</a>") {
                    return None;
                }
                Some((href.to_string(), class.to_string()))
            })
            .collect()
    }

    #[test]
    fn test_markup_and_structured_agree() {
        let html = respond(fixture(), "/docs", ListingFormat::Html);
        let json = respond(fixture(), "/docs", ListingFormat::Json);
        assert_eq!(html.content_type.as_deref(), Some("html"));
        assert_eq!(json.content_type.as_deref(), Some("json"));

        let html = String::from_utf8(html.body).unwrap();
        let value: Value = serde_json::from_slice(&json.body).unwrap();
        let files = value["files"].as_array().unwrap();

        let links = markup_links(&html);
        assert_eq!(links.len(), files.len());
        for ((href, class), file) in links.iter().zip(files) {
            assert_eq!(file["pathEscaped"].as_str().unwrap(), href);
            assert_eq!(file["class"].as_str().unwrap(), class);
        }

        let names: Vec<&str> = files.iter().map(|f| f["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["<evil>.html", "Zed.md", "a", "b.txt", "sub dir"]);

        for file in files {
            let size = file["size"].as_u64().unwrap();
            match file["class"].as_str().unwrap() {
                "dir" => assert_eq!(size, 0),
                _ => assert!(html.contains(&format!("file, {} bytes", size))),
            }
        }
        assert!(html.contains(r#"<a href="/docs/&lt;evil&gt;.html" class="file">&lt;evil&gt;.html</a>"#));
    }

    #[test]
    fn test_root_parent_discrepancy() {
        let html = respond(fixture(), "/", ListingFormat::Html);
        let json = respond(fixture(), "/", ListingFormat::Json);

        assert!(!String::from_utf8(html.body).unwrap().contains(">..</a>"));
        let value: Value = serde_json::from_slice(&json.body).unwrap();
        assert_eq!(value["parentPathEscaped"], "/..");
    }

    #[test]
    fn test_read_error_writes_nothing() {
        for format in [ListingFormat::Html, ListingFormat::Json] {
            let mut resp = BufferedResponse::new();
            let err = ListingHandler::default()
                .handle_request(&mut BrokenDirectory, "/broken", format, &mut resp)
                .unwrap_err();

            match err {
                ListingError::Read(e) => {
                    assert_eq!(e.kind(), io::ErrorKind::Other);
                    assert_eq!(e.location(), "/broken");
                }
                other => panic!("expected read error, got {:?}", other),
            }
            assert!(resp.is_empty());
        }
    }

    #[test]
    fn test_local_directory_end_to_end() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("b.txt"), b"hello").unwrap();
        fs::create_dir(tmp.path().join("a")).unwrap();

        let mut dir = LocalDirectory::open(tmp.path()).unwrap();
        let mut resp = BufferedResponse::new();
        ListingHandler::default()
            .handle_request(&mut dir, "/files/", ListingFormat::Json, &mut resp)
            .unwrap();

        let value: Value = serde_json::from_slice(&resp.body).unwrap();
        assert_eq!(value["basePathEscaped"], "/files/");
        assert_eq!(value["parentPathEscaped"], "/files/..");
        let files = value["files"].as_array().unwrap();
        assert_eq!(files.len(), 2);
        assert_eq!(files[0]["name"], "a");
        assert_eq!(files[0]["class"], "dir");
        assert_eq!(files[0]["size"], 0);
        assert_eq!(files[0]["pathEscaped"], "/files/a");
        assert_eq!(files[1]["name"], "b.txt");
        assert_eq!(files[1]["class"], "file");
        assert_eq!(files[1]["size"], 5);
    }

    #[test]
    fn test_render_returns_body_without_sink() {
        let handler = ListingHandler::new(MarkupOptions::default());
        let rendered = handler
            .render(&mut FixedDirectory(fixture()), "/", ListingFormat::Html)
            .unwrap();
        assert_eq!(rendered.content_type(), "html");
        assert!(rendered.body.starts_with(b"<html>"));
    }
}
