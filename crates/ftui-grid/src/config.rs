#![forbid(unsafe_code)]

//! Grid configuration.
//!
//! Every field has a default, so a host can deserialize a partial document:
//!
//! ```
//! use ftui_grid::{CompactionMode, GridConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config: GridConfig = serde_json::from_str(r#"{ "compaction": "horizontal" }"#)?;
//! config.validate()?;
//! assert_eq!(config.compaction, CompactionMode::Horizontal);
//! assert_eq!(config.margin, [10, 10]);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

use crate::breakpoint::{BreakpointTable, ColumnTable, resolve_columns};
use crate::compact::CompactionMode;
use crate::error::ConfigError;
use crate::sync::{DefaultWidth, ItemDefaults};

/// Configuration for a [`ResponsiveGrid`](crate::ResponsiveGrid).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Tier thresholds in pixels.
    pub breakpoints: BreakpointTable,
    /// Column count per tier.
    pub cols: ColumnTable,
    pub compaction: CompactionMode,
    /// Size of auto-placed items.
    pub default_item: ItemDefaults,
    /// Horizontal and vertical margin between items, in pixels. Only passed
    /// through to width-changed listeners.
    pub margin: [u32; 2],
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            breakpoints: BreakpointTable::default(),
            cols: ColumnTable::default(),
            compaction: CompactionMode::Vertical,
            default_item: ItemDefaults::default(),
            margin: [10, 10],
        }
    }
}

impl GridConfig {
    #[must_use]
    pub fn with_breakpoints(mut self, breakpoints: BreakpointTable) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    #[must_use]
    pub fn with_cols(mut self, cols: ColumnTable) -> Self {
        self.cols = cols;
        self
    }

    #[must_use]
    pub fn with_compaction(mut self, mode: CompactionMode) -> Self {
        self.compaction = mode;
        self
    }

    /// Size of items that appear without a layout entry or size hint.
    #[must_use]
    pub fn with_default_size(mut self, width: DefaultWidth, height: i32) -> Self {
        self.default_item = ItemDefaults { width, height };
        self
    }

    #[must_use]
    pub fn with_margin(mut self, horizontal: u32, vertical: u32) -> Self {
        self.margin = [horizontal, vertical];
        self
    }

    /// Check that at least one tier exists and every tier has a positive
    /// column count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.breakpoints.is_empty() {
            return Err(ConfigError::EmptyBreakpoints);
        }
        for name in self.breakpoints.names() {
            resolve_columns(name, &self.cols)?;
        }
        Ok(())
    }
}
