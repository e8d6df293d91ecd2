use std::io::{self, Write};

use tracing::debug;

/// Destination for a rendered listing, supplied by the HTTP layer.
pub trait ResponseSink {
    /// Content-type hint, `"html"` or `"json"`
    fn set_content_type(&mut self, hint: &str);

    fn write_body(&mut self, body: &[u8]) -> io::Result<()>;
}

/// In-memory response, inspected after the handler returns
#[derive(Debug, Default, Clone)]
pub struct BufferedResponse {
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl BufferedResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.content_type.is_none() && self.body.is_empty()
    }
}

impl ResponseSink for BufferedResponse {
    fn set_content_type(&mut self, hint: &str) {
        self.content_type = Some(hint.to_string());
    }

    fn write_body(&mut self, body: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(body);
        Ok(())
    }
}

/// Streams the body to any writer; the content type is only logged.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResponseSink for WriterSink<W> {
    fn set_content_type(&mut self, hint: &str) {
        debug!("content type: {}", hint);
    }

    fn write_body(&mut self, body: &[u8]) -> io::Result<()> {
        self.writer.write_all(body)?;
        self.writer.flush()
    }
}
