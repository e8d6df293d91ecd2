use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::paths::file_extension;

/// Output representation of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListingFormat {
    #[default]
    Html,
    Json,
}

impl ListingFormat {
    /// Short content-type hint handed to the response layer
    pub fn hint(self) -> &'static str {
        match self {
            ListingFormat::Html => "html",
            ListingFormat::Json => "json",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            ListingFormat::Html => "text/html; charset=utf-8",
            ListingFormat::Json => "application/json",
        }
    }

    /// Guess a format from a file name such as `index.json`.
    pub fn from_file_name(name: &str) -> Option<Self> {
        match file_extension(name).to_ascii_lowercase().as_str() {
            ".html" | ".htm" => Some(ListingFormat::Html),
            ".json" => Some(ListingFormat::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ListingFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.hint())
    }
}

#[derive(Debug, Error)]
#[error("unknown listing format: {0} (expected html or json)")]
pub struct UnknownFormat(pub String);

impl FromStr for ListingFormat {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "html" => Ok(ListingFormat::Html),
            "json" => Ok(ListingFormat::Json),
            _ => Err(UnknownFormat(s.to_string())),
        }
    }
}

/// A fully rendered listing body plus the format it was rendered in.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub format: ListingFormat,
    pub body: Bytes,
}

impl Rendered {
    pub fn content_type(&self) -> &'static str {
        self.format.hint()
    }
}
