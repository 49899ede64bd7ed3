#![forbid(unsafe_code)]

//! Error types for grid configuration, layout validation and controller input.

use std::fmt;

/// Malformed or incomplete breakpoint/column configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The breakpoint table has no entries.
    EmptyBreakpoints,
    /// A breakpoint has no column count.
    MissingColumns { breakpoint: String },
    /// A column count is not positive.
    InvalidColumns { breakpoint: String, cols: i32 },
    /// A breakpoint name is not present in the breakpoint table.
    UnknownBreakpoint { name: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyBreakpoints => write!(f, "breakpoint table is empty"),
            Self::MissingColumns { breakpoint } => {
                write!(f, "no column count for breakpoint {breakpoint:?}")
            }
            Self::InvalidColumns { breakpoint, cols } => {
                write!(f, "column count for breakpoint {breakpoint:?} must be positive, got {cols}")
            }
            Self::UnknownBreakpoint { name } => write!(f, "unknown breakpoint {name:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// First structural problem found in an externally supplied layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutValidationError {
    /// Item at `index` has an empty id.
    EmptyId { index: usize },
    /// `id` appears at both `first` and `second`.
    DuplicateId {
        id: String,
        first: usize,
        second: usize,
    },
    /// `x` or `y` is negative.
    NegativePosition {
        id: String,
        field: &'static str,
        value: i32,
    },
    /// `w` or `h` is below 1.
    NonPositiveSize {
        id: String,
        field: &'static str,
        value: i32,
    },
    /// `minW > maxW` or `minH > maxH`.
    InvertedBounds {
        id: String,
        min_field: &'static str,
        max_field: &'static str,
        min: i32,
        max: i32,
    },
}

impl LayoutValidationError {
    /// Id of the offending item, when it has one.
    #[must_use]
    pub fn item_id(&self) -> Option<&str> {
        match self {
            Self::EmptyId { .. } => None,
            Self::DuplicateId { id, .. }
            | Self::NegativePosition { id, .. }
            | Self::NonPositiveSize { id, .. }
            | Self::InvertedBounds { id, .. } => Some(id),
        }
    }
}

impl fmt::Display for LayoutValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId { index } => write!(f, "item #{index}: id must not be empty"),
            Self::DuplicateId { id, first, second } => {
                write!(f, "item {id:?}: duplicate id at #{first} and #{second}")
            }
            Self::NegativePosition { id, field, value } => {
                write!(f, "item {id:?}: {field} must be >= 0, got {value}")
            }
            Self::NonPositiveSize { id, field, value } => {
                write!(f, "item {id:?}: {field} must be >= 1, got {value}")
            }
            Self::InvertedBounds {
                id,
                min_field,
                max_field,
                min,
                max,
            } => write!(
                f,
                "item {id:?}: {min_field} ({min}) exceeds {max_field} ({max})"
            ),
        }
    }
}

impl std::error::Error for LayoutValidationError {}

/// Errors surfaced by [`ResponsiveGrid`](crate::ResponsiveGrid) entry points.
///
/// A failed call leaves the controller state and layout cache untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    Config(ConfigError),
    /// A supplied layout for `breakpoint` failed validation.
    InvalidLayout {
        breakpoint: String,
        error: LayoutValidationError,
    },
    /// An item update named an id that is not in the current layout.
    UnknownItem { id: String },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(error) => write!(f, "grid configuration error: {error}"),
            Self::InvalidLayout { breakpoint, error } => {
                write!(f, "invalid layout for breakpoint {breakpoint:?}: {error}")
            }
            Self::UnknownItem { id } => write!(f, "no item {id:?} in the current layout"),
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(error) => Some(error),
            Self::InvalidLayout { error, .. } => Some(error),
            Self::UnknownItem { .. } => None,
        }
    }
}

impl From<ConfigError> for GridError {
    fn from(error: ConfigError) -> Self {
        Self::Config(error)
    }
}
