#![forbid(unsafe_code)]

//! Responsive compacting grid layouts.
//!
//! Items live on a fixed-column grid whose column count depends on the
//! container width tier ("breakpoint"). The crate keeps the placement
//! overlap-free and gap-free, and carries it across breakpoints:
//!
//! - [`resolve_breakpoint`] / [`resolve_columns`]: width → tier → columns.
//! - [`validate_layout`]: structural checks for layouts from the host.
//! - [`compact`]: remove overlaps and close gaps vertically or horizontally.
//! - [`synchronize`]: reconcile a layout with the live item set.
//! - [`synthesize`]: fetch a tier's cached layout or scale one from a
//!   neighbouring tier.
//! - [`ResponsiveGrid`]: owns state and cache, runs transitions, notifies
//!   [`GridListener`]s.
//!
//! # Example
//!
//! ```
//! use ftui_grid::{GridConfig, LayoutCache, LiveItem, ResponsiveGrid};
//!
//! # fn main() -> Result<(), ftui_grid::GridError> {
//! let items = vec![LiveItem::new("chart").with_size(6, 3), LiveItem::new("log")];
//! let mut grid = ResponsiveGrid::new(GridConfig::default(), LayoutCache::new(), items, 1280)?;
//! assert_eq!(grid.breakpoint(), "lg");
//! assert_eq!(grid.layout().get("log").map(|item| item.y), Some(3));
//!
//! grid.set_width(800)?;
//! assert_eq!(grid.cols(), 6);
//! # Ok(())
//! # }
//! ```
//!
//! Everything runs synchronously on the caller's thread. Logging goes through
//! `tracing` under the `ftui.grid` target.

pub mod breakpoint;
pub mod compact;
pub mod config;
pub mod controller;
pub mod error;
pub mod item;
pub mod sync;
pub mod synthesize;
pub mod validate;

pub use breakpoint::{BreakpointTable, ColumnTable, resolve_breakpoint, resolve_columns};
pub use compact::{CompactionMode, compact, correct_bounds};
pub use config::GridConfig;
pub use controller::{GridListener, GridState, ResponsiveGrid};
pub use error::{ConfigError, GridError, LayoutValidationError};
pub use item::{Layout, LayoutItem};
pub use sync::{DefaultWidth, ItemDefaults, ItemHint, LiveItem, synchronize};
pub use synthesize::{
    LayoutCache, SynthesisRequest, SynthesisSource, Synthesized, scale_item, scale_layout,
    synthesize,
};
pub use validate::{check_item, check_layout, validate_layout};
