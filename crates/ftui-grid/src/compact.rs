#![forbid(unsafe_code)]

//! Compaction: remove overlaps and close gaps on a column grid.
//!
//! # Algorithm (vertical)
//!
//! 1. Bound every non-static item to the grid (see [`correct_bounds`]).
//! 2. Seed the placed set with all static items.
//! 3. Visit non-static items by `(y, x, insertion index)`. For each, let
//!    `y'` be the largest `bottom` among placed items that share a column
//!    and start above the item's bottom edge (0 if none). While the item at
//!    `y'` still collides with a placed item, move it to that item's bottom.
//! 4. Commit `y'` and add the item to the placed set.
//!
//! Horizontal mode is the same with rows and columns swapped, visiting by
//! `(x, y, insertion index)`. An item that cannot fit in its row without
//! crossing the last column moves one row down and is re-placed from
//! column 0 until it fits.
//!
//! # Invariants
//!
//! 1. The output has the same items in the same insertion order.
//! 2. No two non-static items intersect, and no non-static item intersects
//!    a static one.
//! 3. Identical input gives identical output.
//! 4. `compact(compact(l)) == compact(l)`.
//!
//! # Complexity
//!
//! O(n²) in the number of items sharing column ranges.

use serde::{Deserialize, Serialize};

use crate::item::{Layout, LayoutItem};

/// Direction in which gaps are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompactionMode {
    /// Items float up.
    #[default]
    Vertical,
    /// Items float left.
    Horizontal,
    /// Free placement: items are only bounded to the grid, never moved.
    None,
}

impl CompactionMode {
    /// Short label for display and logging.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Vertical => "vertical",
            Self::Horizontal => "horizontal",
            Self::None => "none",
        }
    }
}

impl std::fmt::Display for CompactionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Keep a non-static item inside a `cols`-wide grid.
///
/// Width is clipped to `cols` first. If the item still crosses the last
/// column, its width shrinks to the remaining columns; only an item starting
/// at or past the last column is pulled left. Static items are exempt.
pub fn correct_bounds(item: &mut LayoutItem, cols: i32) {
    if item.is_static {
        return;
    }
    let cols = cols.max(1);
    item.x = item.x.max(0);
    item.y = item.y.max(0);
    item.h = item.h.max(1);
    item.w = item.w.clamp(1, cols);
    if item.right() > cols {
        if item.x < cols {
            item.w = cols - item.x;
        } else {
            item.x = cols - item.w;
        }
    }
}

/// Compact `layout` on a `cols`-wide grid.
#[must_use]
pub fn compact(layout: &Layout, cols: i32, mode: CompactionMode) -> Layout {
    let bounded: Layout = layout
        .iter()
        .cloned()
        .map(|mut item| {
            correct_bounds(&mut item, cols);
            item
        })
        .collect();
    tracing::trace!(
        target: "ftui.grid",
        mode = mode.label(),
        items = bounded.len(),
        cols,
        "compaction pass"
    );

    let order = match mode {
        CompactionMode::None => return bounded,
        CompactionMode::Vertical => bounded.sort_by_row_col(),
        CompactionMode::Horizontal => bounded.sort_by_col_row(),
    };

    let mut placed: Vec<LayoutItem> = bounded.statics().cloned().collect();
    let mut items = bounded.into_items();
    for i in order {
        if items[i].is_static {
            continue;
        }
        let (x, y) = match mode {
            CompactionMode::Horizontal => settle_left(&placed, &items[i], cols.max(1)),
            _ => (items[i].x, settle_up(&placed, &items[i])),
        };
        items[i].x = x;
        items[i].y = y;
        placed.push(items[i].clone());
    }

    let out = Layout::from(items);
    debug_assert!(!out.has_overlap(), "compaction left overlapping items");
    out
}

/// Minimal row for `item` given the placed obstacles.
fn settle_up(placed: &[LayoutItem], item: &LayoutItem) -> i32 {
    let obstacles = move || placed.iter().filter(move |o| o.overlaps_cols(item));

    let mut y = obstacles()
        .filter(|o| o.y < item.bottom())
        .map(LayoutItem::bottom)
        .max()
        .unwrap_or(0);
    while let Some(bottom) = obstacles()
        .filter(|o| o.y < y.saturating_add(item.h) && y < o.bottom())
        .map(LayoutItem::bottom)
        .max()
    {
        y = bottom;
    }
    y
}

/// Minimal `(x, y)` for `item` in horizontal mode.
fn settle_left(placed: &[LayoutItem], item: &LayoutItem, cols: i32) -> (i32, i32) {
    let in_band = move |y: i32| {
        placed
            .iter()
            .filter(move |o| o.y < y.saturating_add(item.h) && y < o.bottom())
    };

    let mut y = item.y;
    let mut x = in_band(y)
        .filter(|o| o.x < item.right())
        .map(LayoutItem::right)
        .max()
        .unwrap_or(0);
    loop {
        while let Some(right) = in_band(y)
            .filter(|o| o.x < x.saturating_add(item.w) && x < o.right())
            .map(LayoutItem::right)
            .max()
        {
            x = right;
        }
        if x.saturating_add(item.w) <= cols {
            return (x, y);
        }
        y = y.saturating_add(1);
        x = 0;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, x: i32, y: i32, w: i32, h: i32) -> LayoutItem {
        LayoutItem::new(id, x, y, w, h)
    }

    fn pos(layout: &Layout, id: &str) -> (i32, i32, i32, i32) {
        let it = layout.get(id).unwrap();
        (it.x, it.y, it.w, it.h)
    }

    #[test]
    fn empty_layout_stays_empty() {
        for mode in [CompactionMode::Vertical, CompactionMode::Horizontal, CompactionMode::None] {
            assert!(compact(&Layout::new(), 12, mode).is_empty());
        }
    }

    #[test]
    fn extreme_coordinates_do_not_overflow() {
        let layout: Layout = vec![
            item("a", i32::MAX - 1, i32::MAX - 1, i32::MAX, i32::MAX),
            item("b", 0, i32::MAX, 3, i32::MAX),
        ]
        .into();
        let vertical = compact(&layout, 12, CompactionMode::Vertical);
        assert_eq!(pos(&vertical, "a"), (0, 0, 12, i32::MAX));
        assert_eq!(pos(&vertical, "b"), (0, i32::MAX, 3, i32::MAX));
        let horizontal = compact(&layout, 12, CompactionMode::Horizontal);
        assert!(!horizontal.has_overlap());
    }

    #[test]
    fn identical_requests_stack_in_insertion_order() {
        let layout: Layout = vec![item("a", 0, 0, 2, 1), item("b", 0, 0, 2, 1)].into();
        let out = compact(&layout, 12, CompactionMode::Vertical);
        assert_eq!(pos(&out, "a"), (0, 0, 2, 1));
        assert_eq!(pos(&out, "b"), (0, 1, 2, 1));
    }

    #[test]
    fn gaps_close_upward() {
        let layout: Layout = vec![item("a", 0, 5, 3, 2), item("b", 2, 9, 3, 1)].into();
        let out = compact(&layout, 12, CompactionMode::Vertical);
        assert_eq!(pos(&out, "a"), (0, 0, 3, 2));
        assert_eq!(pos(&out, "b"), (2, 2, 3, 1));
    }

    #[test]
    fn item_in_other_columns_rises_to_top() {
        let layout: Layout = vec![item("a", 0, 0, 2, 4), item("b", 2, 3, 2, 1)].into();
        let out = compact(&layout, 4, CompactionMode::Vertical);
        assert_eq!(pos(&out, "b"), (2, 0, 2, 1));
    }

    #[test]
    fn pushed_item_cascades_past_lower_obstacles() {
        let layout: Layout = vec![
            item("a", 0, 0, 2, 2),
            item("wide", 0, 1, 4, 1),
            item("c", 2, 2, 2, 3),
        ]
        .into();
        let out = compact(&layout, 4, CompactionMode::Vertical);
        assert_eq!(pos(&out, "wide"), (0, 2, 4, 1));
        assert_eq!(pos(&out, "c"), (2, 3, 2, 3));
        assert!(!out.has_overlap());
    }

    #[test]
    fn statics_stay_and_block() {
        let layout: Layout = vec![
            item("a", 0, 0, 2, 1),
            item("s", 0, 1, 2, 2).fixed(),
            item("b", 0, 4, 2, 1),
        ]
        .into();
        let out = compact(&layout, 12, CompactionMode::Vertical);
        assert_eq!(pos(&out, "s"), (0, 1, 2, 2));
        assert_eq!(pos(&out, "a"), (0, 0, 2, 1));
        assert_eq!(pos(&out, "b"), (0, 3, 2, 1));
    }

    #[test]
    fn static_below_blocks_earlier_item() {
        let layout: Layout = vec![item("tall", 0, 0, 1, 3), item("s", 0, 1, 1, 1).fixed()].into();
        let out = compact(&layout, 4, CompactionMode::Vertical);
        assert_eq!(pos(&out, "tall"), (0, 2, 1, 3));
    }

    #[test]
    fn wide_item_clipped_to_columns() {
        let layout: Layout = vec![item("a", 0, 0, 20, 1)].into();
        let out = compact(&layout, 6, CompactionMode::Vertical);
        assert_eq!(pos(&out, "a"), (0, 0, 6, 1));
    }

    #[test]
    fn overflowing_item_shrinks_before_moving() {
        let mut shrink = item("a", 4, 0, 4, 1);
        correct_bounds(&mut shrink, 6);
        assert_eq!((shrink.x, shrink.w), (4, 2));

        let mut moved = item("b", 9, 0, 3, 1);
        correct_bounds(&mut moved, 6);
        assert_eq!((moved.x, moved.w), (3, 3));

        let mut fixed = item("s", 9, 0, 3, 1).fixed();
        correct_bounds(&mut fixed, 6);
        assert_eq!((fixed.x, fixed.w), (9, 3));
    }

    #[test]
    fn horizontal_floats_left() {
        let layout: Layout = vec![item("a", 3, 0, 2, 1), item("b", 8, 0, 2, 1)].into();
        let out = compact(&layout, 12, CompactionMode::Horizontal);
        assert_eq!(pos(&out, "a"), (0, 0, 2, 1));
        assert_eq!(pos(&out, "b"), (2, 0, 2, 1));
    }

    #[test]
    fn horizontal_overflow_drops_a_row() {
        let layout: Layout = vec![
            item("a", 0, 0, 3, 1),
            item("b", 0, 0, 2, 1),
        ]
        .into();
        let out = compact(&layout, 4, CompactionMode::Horizontal);
        assert_eq!(pos(&out, "a"), (0, 0, 3, 1));
        assert_eq!(pos(&out, "b"), (0, 1, 2, 1));
    }

    #[test]
    fn none_mode_only_bounds() {
        let layout: Layout = vec![item("a", 0, 5, 2, 1), item("b", 0, 5, 9, 1)].into();
        let out = compact(&layout, 4, CompactionMode::None);
        assert_eq!(pos(&out, "a"), (0, 5, 2, 1));
        assert_eq!(pos(&out, "b"), (0, 5, 4, 1));
    }

    #[test]
    fn compaction_is_idempotent_on_mixed_layout() {
        let layout: Layout = vec![
            item("a", 0, 3, 4, 2),
            item("b", 2, 0, 3, 5),
            item("s", 6, 1, 2, 2).fixed(),
            item("c", 5, 4, 4, 1),
            item("d", 0, 0, 1, 1),
            item("e", 6, 0, 6, 2),
        ]
        .into();
        for mode in [CompactionMode::Vertical, CompactionMode::Horizontal] {
            let once = compact(&layout, 12, mode);
            assert!(!once.has_overlap());
            assert_eq!(compact(&once, 12, mode), once, "mode {mode}");
        }
    }

    #[test]
    fn output_keeps_insertion_order() {
        let layout: Layout = vec![item("z", 0, 9, 1, 1), item("y", 0, 0, 1, 1)].into();
        let out = compact(&layout, 2, CompactionMode::Vertical);
        let ids: Vec<_> = out.ids().collect();
        assert_eq!(ids, ["z", "y"]);
        assert_eq!(pos(&out, "z"), (0, 1, 1, 1));
    }

    #[test]
    fn mode_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&CompactionMode::Horizontal).unwrap(),
            "\"horizontal\""
        );
        let none: CompactionMode = serde_json::from_str("\"none\"").unwrap();
        assert_eq!(none, CompactionMode::None);
    }
}
