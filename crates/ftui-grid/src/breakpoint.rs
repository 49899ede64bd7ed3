#![forbid(unsafe_code)]

//! Named breakpoint tiers and their column counts.
//!
//! A [`BreakpointTable`] maps tier names to minimum container widths in
//! pixels. A [`ColumnTable`] maps the same names to grid column counts.
//!
//! # Invariants
//!
//! 1. Entries are kept sorted by threshold descending; equal thresholds are
//!    ordered by name so resolution never depends on input order.
//! 2. [`resolve_breakpoint`] returns the first tier whose threshold is
//!    `<= width`, falling back to the smallest tier. It is a non-increasing
//!    step function of width over the descending order.
//! 3. Resolution only fails for an empty table.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One breakpoint tier.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Breakpoint {
    name: String,
    /// Minimum container width (px) for this tier.
    min_width: u32,
}

/// Breakpoint tiers, sorted by threshold descending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, u32>", into = "BTreeMap<String, u32>")]
pub struct BreakpointTable {
    tiers: Vec<Breakpoint>,
}

impl BreakpointTable {
    /// Build a table from `(name, min_width)` pairs. A repeated name keeps its
    /// last threshold.
    pub fn new<S: Into<String>>(entries: impl IntoIterator<Item = (S, u32)>) -> Self {
        let map: BTreeMap<String, u32> = entries
            .into_iter()
            .map(|(name, width)| (name.into(), width))
            .collect();
        Self::from(map)
    }

    /// Tier names from widest to narrowest.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tiers.iter().map(|bp| bp.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tiers.iter().any(|bp| bp.name == name)
    }

    /// Resolve the active tier for `width`. See [`resolve_breakpoint`].
    pub fn resolve(&self, width: u32) -> Result<&str, ConfigError> {
        resolve_breakpoint(width, self)
    }
}

impl Default for BreakpointTable {
    /// `lg: 1200, md: 996, sm: 768, xs: 480, xxs: 0`.
    fn default() -> Self {
        Self::new([("lg", 1200), ("md", 996), ("sm", 768), ("xs", 480), ("xxs", 0)])
    }
}

impl From<BTreeMap<String, u32>> for BreakpointTable {
    fn from(map: BTreeMap<String, u32>) -> Self {
        let mut tiers: Vec<Breakpoint> = map
            .into_iter()
            .map(|(name, min_width)| Breakpoint { name, min_width })
            .collect();
        // BTreeMap order gives ascending names; the stable sort keeps it for ties.
        tiers.sort_by(|a, b| b.min_width.cmp(&a.min_width));
        Self { tiers }
    }
}

impl From<BreakpointTable> for BTreeMap<String, u32> {
    fn from(table: BreakpointTable) -> Self {
        table
            .tiers
            .into_iter()
            .map(|bp| (bp.name, bp.min_width))
            .collect()
    }
}

/// Column count per breakpoint name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnTable {
    cols: FxHashMap<String, i32>,
}

impl ColumnTable {
    pub fn new<S: Into<String>>(entries: impl IntoIterator<Item = (S, i32)>) -> Self {
        Self {
            cols: entries
                .into_iter()
                .map(|(name, cols)| (name.into(), cols))
                .collect(),
        }
    }

    /// Resolve the column count for a tier. See [`resolve_columns`].
    pub fn resolve(&self, name: &str) -> Result<i32, ConfigError> {
        resolve_columns(name, self)
    }
}

impl Default for ColumnTable {
    /// `lg: 12, md: 10, sm: 6, xs: 4, xxs: 2`.
    fn default() -> Self {
        Self::new([("lg", 12), ("md", 10), ("sm", 6), ("xs", 4), ("xxs", 2)])
    }
}

/// Active breakpoint for a container width.
///
/// Returns the first tier (widest first) whose threshold is `<= width`; when
/// none qualifies, the narrowest tier.
pub fn resolve_breakpoint(width: u32, table: &BreakpointTable) -> Result<&str, ConfigError> {
    let narrowest = table.tiers.last().ok_or(ConfigError::EmptyBreakpoints)?;
    Ok(table
        .tiers
        .iter()
        .find(|bp| bp.min_width <= width)
        .unwrap_or(narrowest)
        .name
        .as_str())
}

/// Column count for a breakpoint name.
pub fn resolve_columns(name: &str, table: &ColumnTable) -> Result<i32, ConfigError> {
    match table.cols.get(name) {
        None => Err(ConfigError::MissingColumns {
            breakpoint: name.to_owned(),
        }),
        Some(&cols) if cols < 1 => Err(ConfigError::InvalidColumns {
            breakpoint: name.to_owned(),
            cols,
        }),
        Some(&cols) => Ok(cols),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
