#![forbid(unsafe_code)]

//! Grid items and layouts.
//!
//! A [`LayoutItem`] is a rectangle on a column grid measured in grid units:
//! `x`/`w` count columns, `y`/`h` count rows. A [`Layout`] is the ordered set
//! of items for one breakpoint, one entry per item id.
//!
//! # Invariants
//!
//! 1. Ids are unique within a [`Layout`] (checked by
//!    [`validate_layout`](crate::validate_layout) for external input, kept by
//!    construction for generated layouts).
//! 2. Insertion order is preserved by every operation in this crate; it is
//!    the final tie-break of the compaction order.
//! 3. Rectangles are half-open: `[x, x + w) × [y, y + h)`. Touching edges
//!    never collide.
//! 4. Edge arithmetic saturates at `i32::MAX`, so any validated item has a
//!    defined `right` and `bottom`.

use serde::{Deserialize, Serialize};

/// One positioned item on the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutItem {
    /// Item identifier, unique within a layout.
    #[serde(rename = "i")]
    pub id: String,
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_w: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_w: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_h: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_h: Option<i32>,
    /// Static items are never repositioned; they only act as obstacles.
    #[serde(default, rename = "static")]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_draggable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_resizable: Option<bool>,
}

impl LayoutItem {
    /// Create a non-static item with no size bounds.
    #[must_use]
    pub fn new(id: impl Into<String>, x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            w,
            h,
            min_w: None,
            max_w: None,
            min_h: None,
            max_h: None,
            is_static: false,
            is_draggable: None,
            is_resizable: None,
        }
    }

    /// Mark the item static (builder pattern).
    #[must_use]
    pub fn fixed(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Set width bounds (builder pattern).
    #[must_use]
    pub fn with_w_bounds(mut self, min_w: Option<i32>, max_w: Option<i32>) -> Self {
        self.min_w = min_w;
        self.max_w = max_w;
        self
    }

    /// Set height bounds (builder pattern).
    #[must_use]
    pub fn with_h_bounds(mut self, min_h: Option<i32>, max_h: Option<i32>) -> Self {
        self.min_h = min_h;
        self.max_h = max_h;
        self
    }

    /// One past the last occupied column.
    #[inline]
    #[must_use]
    pub const fn right(&self) -> i32 {
        self.x.saturating_add(self.w)
    }

    /// One past the last occupied row.
    #[inline]
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.h)
    }

    /// Whether the column ranges `[x, x + w)` overlap.
    #[inline]
    #[must_use]
    pub const fn overlaps_cols(&self, other: &Self) -> bool {
        self.x < other.right() && other.x < self.right()
    }

    /// Whether the row ranges `[y, y + h)` overlap.
    #[inline]
    #[must_use]
    pub const fn overlaps_rows(&self, other: &Self) -> bool {
        self.y < other.bottom() && other.y < self.bottom()
    }

    /// Whether two items collide. An item never collides with itself (same id).
    #[must_use]
    pub fn collides(&self, other: &Self) -> bool {
        self.id != other.id && self.overlaps_cols(other) && self.overlaps_rows(other)
    }
}

/// Ordered set of items for one breakpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    items: Vec<LayoutItem>,
}

impl Layout {
    /// Empty layout.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LayoutItem] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LayoutItem> {
        self.items.iter()
    }

    pub fn into_items(self) -> Vec<LayoutItem> {
        self.items
    }

    /// Append an item. Callers keep ids unique.
    pub fn push(&mut self, item: LayoutItem) {
        self.items.push(item);
    }

    /// Item ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.id.as_str())
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LayoutItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Lowest occupied row boundary: max `y + h`, or `0` when empty.
    #[must_use]
    pub fn bottom(&self) -> i32 {
        self.items.iter().map(LayoutItem::bottom).max().unwrap_or(0)
    }

    /// Static items only.
    pub fn statics(&self) -> impl Iterator<Item = &LayoutItem> {
        self.items.iter().filter(|item| item.is_static)
    }

    /// Every item colliding with `target`, in insertion order.
    pub fn all_collisions<'a>(
        &'a self,
        target: &'a LayoutItem,
    ) -> impl Iterator<Item = &'a LayoutItem> + 'a {
        self.items.iter().filter(move |item| item.collides(target))
    }

    /// Whether any two non-static items intersect.
    #[must_use]
    pub fn has_overlap(&self) -> bool {
        self.items.iter().enumerate().any(|(i, a)| {
            !a.is_static
                && self.items[i + 1..]
                    .iter()
                    .any(|b| !b.is_static && a.collides(b))
        })
    }

    /// Insertion indices sorted by row, then column, then insertion order.
    #[must_use]
    pub fn sort_by_row_col(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.items.len()).collect();
        order.sort_by_key(|&i| (self.items[i].y, self.items[i].x, i));
        order
    }

    /// Insertion indices sorted by column, then row, then insertion order.
    #[must_use]
    pub fn sort_by_col_row(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.items.len()).collect();
        order.sort_by_key(|&i| (self.items[i].x, self.items[i].y, i));
        order
    }
}

impl From<Vec<LayoutItem>> for Layout {
    fn from(items: Vec<LayoutItem>) -> Self {
        Self { items }
    }
}

impl FromIterator<LayoutItem> for Layout {
    fn from_iter<I: IntoIterator<Item = LayoutItem>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Layout {
    type Item = LayoutItem;
    type IntoIter = std::vec::IntoIter<LayoutItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a> IntoIterator for &'a Layout {
    type Item = &'a LayoutItem;
    type IntoIter = std::slice::Iter<'a, LayoutItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
