#![forbid(unsafe_code)]

//! Per-breakpoint layout lookup and generation.
//!
//! [`synthesize`] returns the cached layout for a breakpoint when there is
//! one. Otherwise it picks a source layout, scales it proportionally to the
//! target column count and compacts the result.
//!
//! # Source selection
//!
//! 1. The previous breakpoint, if it has a cached layout.
//! 2. The nearest cached wider breakpoint, walking up from the target.
//! 3. The nearest cached narrower breakpoint, walking down from the target.
//! 4. An empty layout.
//!
//! # Scaling
//!
//! `w' = max(1, round(w * to / from))`, `x' = max(0, round(x * to / from))`.
//! When `x' + w'` crosses the last column, `w'` shrinks to fit; `x'` only
//! moves when it starts at or past the last column. Heights and rows are
//! not scaled.

use std::collections::BTreeMap;

use crate::breakpoint::{BreakpointTable, ColumnTable};
use crate::compact::{CompactionMode, compact};
use crate::error::ConfigError;
use crate::item::{Layout, LayoutItem};

/// Last known layout per breakpoint name.
pub type LayoutCache = BTreeMap<String, Layout>;

/// Where a synthesized layout came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisSource {
    /// Returned unchanged from the cache.
    Cached,
    /// Scaled from another breakpoint's cached layout.
    Scaled { from: String, from_cols: i32 },
    /// No cached layout anywhere.
    Empty,
}

/// Result of [`synthesize`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Synthesized {
    pub layout: Layout,
    pub source: SynthesisSource,
}

impl Synthesized {
    /// Whether the layout was generated rather than read from the cache.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.source != SynthesisSource::Cached
    }
}

/// Everything [`synthesize`] reads.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisRequest<'a> {
    pub cache: &'a LayoutCache,
    pub breakpoints: &'a BreakpointTable,
    pub cols: &'a ColumnTable,
    pub target: &'a str,
    /// Equal to `target` on first mount.
    pub previous: &'a str,
    pub target_cols: i32,
    pub mode: CompactionMode,
}

/// Find or generate the layout for `req.target`.
pub fn synthesize(req: &SynthesisRequest<'_>) -> Result<Synthesized, ConfigError> {
    if let Some(layout) = req.cache.get(req.target) {
        return Ok(Synthesized {
            layout: layout.clone(),
            source: SynthesisSource::Cached,
        });
    }

    let Some((from, source)) = pick_source(req) else {
        return Ok(Synthesized {
            layout: Layout::new(),
            source: SynthesisSource::Empty,
        });
    };
    let from_cols = req.cols.resolve(from)?;
    let scaled = scale_layout(source, from_cols, req.target_cols);
    Ok(Synthesized {
        layout: compact(&scaled, req.target_cols, req.mode),
        source: SynthesisSource::Scaled {
            from: from.to_owned(),
            from_cols,
        },
    })
}

fn pick_source<'a>(req: &SynthesisRequest<'a>) -> Option<(&'a str, &'a Layout)> {
    let cache: &'a LayoutCache = req.cache;
    let breakpoints: &'a BreakpointTable = req.breakpoints;
    let lookup = move |name: &str| {
        cache
            .get_key_value(name)
            .map(|(key, layout)| (key.as_str(), layout))
    };
    if let Some(found) = lookup(req.previous) {
        return Some(found);
    }

    let tiers: Vec<&'a str> = breakpoints.names().collect();
    let Some(rank) = tiers.iter().position(|&name| name == req.target) else {
        return tiers.iter().find_map(|&name| lookup(name));
    };
    let (wider, narrower) = tiers.split_at(rank);
    wider
        .iter()
        .rev()
        .chain(narrower.iter().skip(1))
        .find_map(|&name| lookup(name))
}

/// `round(value * to / from)` for non-negative inputs, halves rounding up.
/// Saturates at `i32::MAX` when scaling up.
fn scale(value: i32, from: i32, to: i32) -> i32 {
    let (value, from, to) = (i64::from(value.max(0)), i64::from(from.max(1)), i64::from(to));
    i32::try_from((2 * value * to + from) / (2 * from)).unwrap_or(i32::MAX)
}

/// Rescale one item from `from_cols` to `to_cols` columns.
#[must_use]
pub fn scale_item(item: &LayoutItem, from_cols: i32, to_cols: i32) -> LayoutItem {
    let to_cols = to_cols.max(1);
    let mut w = scale(item.w, from_cols, to_cols).max(1);
    let mut x = scale(item.x, from_cols, to_cols).max(0);
    if x.saturating_add(w) > to_cols {
        // Shrink first; move only when not even one column is left.
        if x < to_cols {
            w = to_cols - x;
        } else {
            w = 1;
            x = to_cols - 1;
        }
    }
    LayoutItem {
        x,
        w,
        ..item.clone()
    }
}

/// Rescale every item of `layout`. Rows and heights are kept.
#[must_use]
pub fn scale_layout(layout: &Layout, from_cols: i32, to_cols: i32) -> Layout {
    layout
        .iter()
        .map(|item| scale_item(item, from_cols, to_cols))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
