#![forbid(unsafe_code)]

//! Reconcile a stored layout with the items the host is currently showing.
//!
//! [`synchronize`] never fails: stale entries are dropped, missing entries
//! are appended below the existing content, and the result is compacted.
//! The output has exactly one entry per live id, in presentation order.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::compact::{CompactionMode, compact};
use crate::item::{Layout, LayoutItem};

/// Width given to an item that has no layout entry yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultWidth {
    /// A fixed number of columns, clipped to the grid.
    Fixed(i32),
    /// Span every column of the active breakpoint.
    FullColumns,
}

impl DefaultWidth {
    /// Resolve against the active column count.
    #[must_use]
    pub fn resolve(self, cols: i32) -> i32 {
        match self {
            Self::Fixed(w) => w.clamp(1, cols.max(1)),
            Self::FullColumns => cols.max(1),
        }
    }
}

impl Default for DefaultWidth {
    fn default() -> Self {
        Self::Fixed(1)
    }
}

/// Size used for auto-placed items that carry no hint of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemDefaults {
    pub width: DefaultWidth,
    pub height: i32,
}

impl Default for ItemDefaults {
    fn default() -> Self {
        Self {
            width: DefaultWidth::default(),
            height: 1,
        }
    }
}

/// Size and constraint metadata declared by the host for one item.
///
/// Only consulted when the item has no layout entry yet.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ItemHint {
    pub w: Option<i32>,
    pub h: Option<i32>,
    pub min_w: Option<i32>,
    pub max_w: Option<i32>,
    pub min_h: Option<i32>,
    pub max_h: Option<i32>,
    #[serde(rename = "static")]
    pub is_static: bool,
    pub is_draggable: Option<bool>,
    pub is_resizable: Option<bool>,
}

/// An item the host is currently presenting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveItem {
    pub id: String,
    #[serde(default)]
    pub hint: ItemHint,
}

impl LiveItem {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            hint: ItemHint::default(),
        }
    }

    /// Declare a default size (builder pattern).
    #[must_use]
    pub fn with_size(mut self, w: i32, h: i32) -> Self {
        self.hint.w = Some(w);
        self.hint.h = Some(h);
        self
    }

    /// Declare the item static (builder pattern).
    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.hint.is_static = true;
        self
    }

    /// Layout entry for an item with no stored position, placed at `(0, y)`.
    #[must_use]
    pub fn default_entry(&self, y: i32, cols: i32, defaults: &ItemDefaults) -> LayoutItem {
        let hint = &self.hint;
        LayoutItem {
            id: self.id.clone(),
            x: 0,
            y,
            w: hint.w.unwrap_or_else(|| defaults.width.resolve(cols)),
            h: hint.h.unwrap_or(defaults.height).max(1),
            min_w: hint.min_w,
            max_w: hint.max_w,
            min_h: hint.min_h,
            max_h: hint.max_h,
            is_static: hint.is_static,
            is_draggable: hint.is_draggable,
            is_resizable: hint.is_resizable,
        }
    }
}

impl From<&str> for LiveItem {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Build a compacted layout covering exactly the ids in `live`.
///
/// Repeated live ids are collapsed to their first occurrence.
#[must_use]
pub fn synchronize(
    live: &[LiveItem],
    existing: &Layout,
    cols: i32,
    mode: CompactionMode,
    defaults: &ItemDefaults,
) -> Layout {
    let live_ids: FxHashSet<&str> = live.iter().map(|item| item.id.as_str()).collect();
    let stale = existing
        .iter()
        .filter(|item| !live_ids.contains(item.id.as_str()))
        .count();

    // Appended entries stack below everything kept so far.
    let mut bottom = existing
        .iter()
        .filter(|item| live_ids.contains(item.id.as_str()))
        .map(LayoutItem::bottom)
        .max()
        .unwrap_or(0);

    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut added = 0usize;
    let mut out = Layout::new();
    for item in live {
        if !seen.insert(item.id.as_str()) {
            continue;
        }
        match existing.get(&item.id) {
            Some(entry) => out.push(entry.clone()),
            None => {
                let entry = item.default_entry(bottom, cols, defaults);
                bottom = entry.bottom();
                added += 1;
                out.push(entry);
            }
        }
    }

    if stale > 0 || added > 0 {
        tracing::debug!(
            target: "ftui.grid",
            stale,
            added,
            live = out.len(),
            "synchronized layout with live items"
        );
    }
    compact(&out, cols, mode)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
