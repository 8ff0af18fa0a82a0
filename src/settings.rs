// ── Settings file ─────────────────────────────────────────────────────────────
//
// Optional JSON file read by the `splashscreen` binary.  Every field may be
// omitted; command-line flags are applied on top afterwards.
// No `unsafe`; pure safe Rust + serde_json.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::lifecycle::DisplayMode;

/// Title used for error alerts when nothing else is configured.
pub const DEFAULT_HOST_NAME: &str = "Setup";

/// How long the binary keeps the splash screen up by default.
pub const DEFAULT_HOLD_MS: u64 = 3_000;

/// Root of the JSON settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Window caption.  Never drawn, but visible to accessibility tools.
    pub caption: Option<String>,
    /// Title of error alerts.
    pub host_name: String,
    pub display: DisplayMode,
    /// Milliseconds the splash screen stays up before it is closed.
    pub hold_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            caption: None,
            host_name: DEFAULT_HOST_NAME.to_owned(),
            display: DisplayMode::Full,
            hold_ms: DEFAULT_HOLD_MS,
        }
    }
}

impl Settings {
    /// Parse settings from JSON bytes.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        Ok(serde_json::from_slice(data)?)
    }

    /// Read and parse the settings file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read(path)?;
        let settings = Self::from_slice(&data)?;
        log::debug!("settings loaded from {}", path.display());
        Ok(settings)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
