//! Screen configuration.
use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Options controlling how a screen drives its terminal. Every field has a
/// default, so a TOML file only needs to name what it changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenOptions {
    /// Merge touching borders into junction glyphs.
    pub dock_borders: bool,
    /// Use terminal scroll regions to move scrolled content.
    pub scroll_region: bool,
    /// Render on the alternate screen.
    pub alt_screen: bool,
    /// Hide the cursor while the screen is active.
    pub hide_cursor: bool,
    /// Capture mouse input.
    pub mouse: bool,
    /// Tab stop width used when expanding content.
    pub tab_size: usize,
}

impl Default for ScreenOptions {
    fn default() -> Self {
        Self {
            dock_borders: false,
            scroll_region: true,
            alt_screen: true,
            hide_cursor: true,
            mouse: true,
            tab_size: 4,
        }
    }
}

impl ScreenOptions {
    /// Parse options from a TOML document.
    pub fn from_toml(s: &str) -> Result<Self> {
        let opts: Self = toml::from_str(s).map_err(|e| Error::Config(e.to_string()))?;
        if opts.tab_size == 0 {
            return Err(Error::Config("tab_size must be at least 1".into()));
        }
        Ok(opts)
    }

    /// Load options from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let s = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml(&s)
    }

    /// Serialize options as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}
