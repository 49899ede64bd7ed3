#![forbid(unsafe_code)]

//! Structural validation for layouts arriving from outside the crate.
//!
//! Checks run in a fixed order and stop at the first failure:
//!
//! 1. every item has a non-empty id,
//! 2. ids are unique,
//! 3. `x` and `y` are `>= 0`,
//! 4. `w` and `h` are `>= 1`,
//! 5. `minW <= maxW` and `minH <= maxH` when both bounds are present.
//!
//! Checks 1 and 2 are run across the whole layout before the per-item checks,
//! so a duplicate id is reported even if a later item has a bad size.

use rustc_hash::FxHashMap;

use crate::error::LayoutValidationError;
use crate::item::{Layout, LayoutItem};

/// Validate a layout, returning it unchanged on success.
pub fn validate_layout(layout: Layout) -> Result<Layout, LayoutValidationError> {
    check_layout(&layout)?;
    Ok(layout)
}

/// Validate a layout by reference.
pub fn check_layout(layout: &Layout) -> Result<(), LayoutValidationError> {
    if let Some(index) = layout.iter().position(|item| item.id.is_empty()) {
        return Err(LayoutValidationError::EmptyId { index });
    }

    let mut seen: FxHashMap<&str, usize> = FxHashMap::default();
    for (index, item) in layout.iter().enumerate() {
        if let Some(&first) = seen.get(item.id.as_str()) {
            return Err(LayoutValidationError::DuplicateId {
                id: item.id.clone(),
                first,
                second: index,
            });
        }
        seen.insert(item.id.as_str(), index);
    }

    for item in layout {
        check_position(item)?;
    }
    for item in layout {
        check_size(item)?;
    }
    for item in layout {
        check_bounds(item)?;
    }
    Ok(())
}

/// Validate a single item in isolation (checks 1, 3, 4, 5).
pub fn check_item(item: &LayoutItem) -> Result<(), LayoutValidationError> {
    if item.id.is_empty() {
        return Err(LayoutValidationError::EmptyId { index: 0 });
    }
    check_position(item)?;
    check_size(item)?;
    check_bounds(item)
}

fn check_position(item: &LayoutItem) -> Result<(), LayoutValidationError> {
    for (field, value) in [("x", item.x), ("y", item.y)] {
        if value < 0 {
            return Err(LayoutValidationError::NegativePosition {
                id: item.id.clone(),
                field,
                value,
            });
        }
    }
    Ok(())
}

fn check_size(item: &LayoutItem) -> Result<(), LayoutValidationError> {
    for (field, value) in [("w", item.w), ("h", item.h)] {
        if value < 1 {
            return Err(LayoutValidationError::NonPositiveSize {
                id: item.id.clone(),
                field,
                value,
            });
        }
    }
    Ok(())
}

fn check_bounds(item: &LayoutItem) -> Result<(), LayoutValidationError> {
    let pairs = [
        ("minW", item.min_w, "maxW", item.max_w),
        ("minH", item.min_h, "maxH", item.max_h),
    ];
    for (min_field, min, max_field, max) in pairs {
        if let (Some(min), Some(max)) = (min, max)
            && min > max
        {
            return Err(LayoutValidationError::InvertedBounds {
                id: item.id.clone(),
                min_field,
                max_field,
                min,
                max,
            });
        }
    }
    Ok(())
}
