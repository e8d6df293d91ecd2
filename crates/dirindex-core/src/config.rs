use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::format::ListingFormat;
use crate::markup::{MarkupOptions, DEFAULT_STYLESHEET};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Format used when the caller does not pick one
    #[serde(default)]
    pub default_format: ListingFormat,

    /// Inline CSS for HTML listings
    #[serde(default = "default_stylesheet")]
    pub stylesheet: String,
}

fn default_stylesheet() -> String {
    DEFAULT_STYLESHEET.to_string()
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            default_format: ListingFormat::default(),
            stylesheet: default_stylesheet(),
        }
    }
}

impl IndexConfig {
    /// `config.json` under the per-user config dir, or the working directory
    /// when no home directory can be resolved.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("org", "dirindex", "dirindex")
            .map(|dirs| dirs.config_dir().join("config.json"))
            .unwrap_or_else(|| PathBuf::from("dirindex-config.json"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read(path)
            .with_context(|| format!("cannot open listing config {}", path.display()))?;
        let config: Self = serde_json::from_slice(&raw)
            .with_context(|| format!("listing config {} is not valid JSON", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("cannot create config directory {}", dir.display()))?;
        }
        let mut json = serde_json::to_vec_pretty(self)?;
        json.push(b'\n');
        std::fs::write(path, json)
            .with_context(|| format!("cannot store listing config {}", path.display()))
    }

    /// The stylesheet is placed verbatim inside `<style>`; it must not close it.
    pub fn validate(&self) -> Result<()> {
        if self.stylesheet.to_ascii_lowercase().contains("</style") {
            anyhow::bail!("stylesheet must not contain a closing </style> tag");
        }
        Ok(())
    }

    pub fn markup_options(&self) -> MarkupOptions {
        MarkupOptions {
            stylesheet: self.stylesheet.clone(),
        }
    }
}
