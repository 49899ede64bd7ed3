#![forbid(unsafe_code)]

//! Responsive state controller.
//!
//! [`ResponsiveGrid`] owns the committed [`GridState`] (layout, breakpoint,
//! columns) and the per-breakpoint [`LayoutCache`]. Hosts drive it with
//! width changes, breakpoint overrides, layout table replacement, item set
//! changes and relayed item moves.
//!
//! # Transition
//!
//! Leaving breakpoint `old` for `new`:
//!
//! 1. snapshot the live layout into the cache under `old`,
//! 2. resolve the column count for `new`,
//! 3. synthesize the layout for `new` (cached, scaled, or empty),
//! 4. synchronize it with the live items,
//! 5. store it in the cache under `new`,
//! 6. commit state and cache together,
//! 7. notify layout-changed, breakpoint-changed, width-changed, in order.
//!
//! # Invariants
//!
//! 1. A call that returns `Err` leaves state and cache untouched.
//! 2. Listeners run after commit and only receive shared references, so
//!    they observe committed state and cannot re-enter the controller.
//! 3. The cache entry for the current breakpoint always equals the
//!    committed layout after any successful call.

use std::fmt;

use rustc_hash::FxHashSet;

use crate::compact::compact;
use crate::config::GridConfig;
use crate::error::{ConfigError, GridError};
use crate::item::{Layout, LayoutItem};
use crate::synthesize::{LayoutCache, SynthesisRequest, SynthesisSource, synthesize};
use crate::sync::{LiveItem, synchronize};
use crate::validate::{check_item, check_layout};

/// The state rendered by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridState {
    pub layout: Layout,
    pub breakpoint: String,
    pub cols: i32,
}

/// Receives change notifications after each committed update.
///
/// All methods default to no-ops.
pub trait GridListener {
    /// The live layout changed. `all` is the full cache, including `layout`.
    fn on_layout_change(&mut self, _layout: &Layout, _all: &LayoutCache) {}

    /// The active breakpoint changed.
    fn on_breakpoint_change(&mut self, _breakpoint: &str, _cols: i32) {}

    /// The container width changed.
    fn on_width_change(&mut self, _width: u32, _margin: [u32; 2], _cols: i32) {}
}

/// Which notifications to send after a commit.
#[derive(Debug, Clone, Copy)]
struct Notify {
    layout: bool,
    breakpoint: bool,
    width: bool,
}

impl Notify {
    const TRANSITION: Self = Self {
        layout: true,
        breakpoint: true,
        width: true,
    };
    const LAYOUT: Self = Self {
        layout: true,
        breakpoint: false,
        width: false,
    };
    const WIDTH: Self = Self {
        layout: false,
        breakpoint: false,
        width: true,
    };
}

/// Responsive grid controller.
pub struct ResponsiveGrid {
    config: GridConfig,
    items: Vec<LiveItem>,
    width: u32,
    breakpoint_override: Option<String>,
    state: GridState,
    cache: LayoutCache,
    listeners: Vec<Box<dyn GridListener>>,
}

impl fmt::Debug for ResponsiveGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponsiveGrid")
            .field("width", &self.width)
            .field("breakpoint_override", &self.breakpoint_override)
            .field("state", &self.state)
            .field("cached", &self.cache.keys().collect::<Vec<_>>())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

impl ResponsiveGrid {
    /// Create a controller for `items` at container `width`.
    ///
    /// `layouts` is the authored per-breakpoint layout table; it may be
    /// partial or empty. The initial layout is generated like a transition
    /// from the resolved breakpoint to itself.
    pub fn new(
        config: GridConfig,
        layouts: LayoutCache,
        items: Vec<LiveItem>,
        width: u32,
    ) -> Result<Self, GridError> {
        config.validate()?;
        validate_table(&layouts)?;

        let breakpoint = config.breakpoints.resolve(width)?.to_owned();
        let mut cache = layouts;
        let state = enter(&config, &mut cache, &items, &breakpoint, &breakpoint)?;
        tracing::debug!(
            target: "ftui.grid",
            breakpoint = %state.breakpoint,
            cols = state.cols,
            width,
            items = state.layout.len(),
            "grid initialized"
        );

        Ok(Self {
            config,
            items,
            width,
            breakpoint_override: None,
            state,
            cache,
            listeners: Vec::new(),
        })
    }

    /// Register a listener. Listeners are invoked in registration order.
    pub fn add_listener(&mut self, listener: impl GridListener + 'static) {
        self.listeners.push(Box::new(listener));
    }
}

// ---------------------------------------------------------------------------
// Accessors
// ---------------------------------------------------------------------------

impl ResponsiveGrid {
    #[must_use]
    pub fn state(&self) -> &GridState {
        &self.state
    }

    #[must_use]
    pub fn layout(&self) -> &Layout {
        &self.state.layout
    }

    #[must_use]
    pub fn breakpoint(&self) -> &str {
        &self.state.breakpoint
    }

    #[must_use]
    pub fn cols(&self) -> i32 {
        self.state.cols
    }

    #[must_use]
    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn items(&self) -> &[LiveItem] {
        &self.items
    }

    #[must_use]
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Breakpoint forced by [`set_breakpoint`](Self::set_breakpoint), if any.
    #[must_use]
    pub fn breakpoint_override(&self) -> Option<&str> {
        self.breakpoint_override.as_deref()
    }
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

impl ResponsiveGrid {
    /// Report a new container width.
    ///
    /// Crossing into another tier runs a full transition. A width change
    /// within the same tier, or while a breakpoint override is active, only
    /// notifies width-changed. An unchanged width is a no-op.
    pub fn set_width(&mut self, width: u32) -> Result<(), GridError> {
        if width == self.width {
            return Ok(());
        }
        let target = match &self.breakpoint_override {
            Some(name) => name.clone(),
            None => self.config.breakpoints.resolve(width)?.to_owned(),
        };
        let previous_width = self.width;
        self.width = width;
        if target == self.state.breakpoint {
            self.notify(Notify::WIDTH);
            return Ok(());
        }
        if let Err(err) = self.transition(target) {
            self.width = previous_width;
            return Err(err);
        }
        Ok(())
    }

    /// Force a breakpoint regardless of width.
    pub fn set_breakpoint(&mut self, name: &str) -> Result<(), GridError> {
        if !self.config.breakpoints.contains(name) {
            return Err(ConfigError::UnknownBreakpoint {
                name: name.to_owned(),
            }
            .into());
        }
        self.transition(name.to_owned())?;
        self.breakpoint_override = Some(name.to_owned());
        Ok(())
    }

    /// Drop a breakpoint override and return to width-based resolution.
    pub fn clear_breakpoint_override(&mut self) -> Result<(), GridError> {
        let target = self.config.breakpoints.resolve(self.width)?.to_owned();
        self.transition(target)?;
        self.breakpoint_override = None;
        Ok(())
    }

    /// Replace the per-breakpoint layout table.
    ///
    /// Every layout is validated first; on failure nothing changes. The
    /// current breakpoint's layout is then re-derived from the new table.
    pub fn set_layouts(&mut self, layouts: LayoutCache) -> Result<(), GridError> {
        if let Err(err) = validate_table(&layouts) {
            tracing::warn!(target: "ftui.grid", error = %err, "rejected layout table");
            return Err(err);
        }
        let mut cache = layouts;
        let breakpoint = self.state.breakpoint.clone();
        let state = enter(&self.config, &mut cache, &self.items, &breakpoint, &breakpoint)?;
        self.cache = cache;
        self.state = state;
        self.notify(Notify::LAYOUT);
        Ok(())
    }

    /// Replace the live item list and resynchronize the current layout.
    pub fn set_items(&mut self, items: Vec<LiveItem>) {
        let layout = synchronize(
            &items,
            &self.state.layout,
            self.state.cols,
            self.config.compaction,
            &self.config.default_item,
        );
        self.items = items;
        self.commit_layout(layout);
    }

    /// Accept an item the host has moved or resized.
    ///
    /// Non-static items the new rectangle overlaps are pushed just below it
    /// before the layout is compacted.
    pub fn update_item(&mut self, item: LayoutItem) -> Result<(), GridError> {
        if let Err(error) = check_item(&item) {
            tracing::warn!(target: "ftui.grid", id = %item.id, error = %error, "rejected item update");
            return Err(GridError::InvalidLayout {
                breakpoint: self.state.breakpoint.clone(),
                error,
            });
        }
        if self.state.layout.get(&item.id).is_none() {
            tracing::warn!(target: "ftui.grid", id = %item.id, "update for unknown item");
            return Err(GridError::UnknownItem { id: item.id });
        }

        let pushed: FxHashSet<&str> = self
            .state
            .layout
            .all_collisions(&item)
            .filter(|other| !other.is_static)
            .map(|other| other.id.as_str())
            .collect();
        let displaced: Layout = self
            .state
            .layout
            .iter()
            .map(|other| {
                if other.id == item.id {
                    item.clone()
                } else if pushed.contains(other.id.as_str()) {
                    LayoutItem {
                        y: item.bottom(),
                        ..other.clone()
                    }
                } else {
                    other.clone()
                }
            })
            .collect();
        let layout = compact(&displaced, self.state.cols, self.config.compaction);
        self.commit_layout(layout);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

impl ResponsiveGrid {
    fn transition(&mut self, target: String) -> Result<(), GridError> {
        let from = self.state.breakpoint.clone();
        if target == from {
            return Ok(());
        }
        let _span = tracing::debug_span!(
            target: "ftui.grid",
            "grid.transition",
            from = %from,
            to = %target,
        )
        .entered();

        let mut cache = self.cache.clone();
        cache.insert(from.clone(), self.state.layout.clone());
        tracing::debug!(target: "ftui.grid", breakpoint = %from, "snapshot stored");

        let state = enter(&self.config, &mut cache, &self.items, &target, &from)?;
        self.cache = cache;
        self.state = state;
        tracing::debug!(
            target: "ftui.grid",
            breakpoint = %self.state.breakpoint,
            cols = self.state.cols,
            "transition committed"
        );
        self.notify(Notify::TRANSITION);
        Ok(())
    }

    fn commit_layout(&mut self, layout: Layout) {
        self.cache
            .insert(self.state.breakpoint.clone(), layout.clone());
        self.state.layout = layout;
        self.notify(Notify::LAYOUT);
    }

    fn notify(&mut self, which: Notify) {
        let Self {
            config,
            width,
            state,
            cache,
            listeners,
            ..
        } = self;
        for listener in listeners.iter_mut() {
            if which.layout {
                listener.on_layout_change(&state.layout, cache);
            }
        }
        for listener in listeners.iter_mut() {
            if which.breakpoint {
                listener.on_breakpoint_change(&state.breakpoint, state.cols);
            }
        }
        for listener in listeners.iter_mut() {
            if which.width {
                listener.on_width_change(*width, config.margin, state.cols);
            }
        }
    }
}

/// Resolve, synthesize, synchronize and cache the layout for `target`.
fn enter(
    config: &GridConfig,
    cache: &mut LayoutCache,
    items: &[LiveItem],
    target: &str,
    previous: &str,
) -> Result<GridState, ConfigError> {
    let cols = config.cols.resolve(target)?;
    let synthesized = synthesize(&SynthesisRequest {
        cache,
        breakpoints: &config.breakpoints,
        cols: &config.cols,
        target,
        previous,
        target_cols: cols,
        mode: config.compaction,
    })?;
    match &synthesized.source {
        SynthesisSource::Cached => {
            tracing::debug!(target: "ftui.grid", breakpoint = target, "layout from cache");
        }
        SynthesisSource::Scaled { from, from_cols } => tracing::debug!(
            target: "ftui.grid",
            breakpoint = target,
            from = %from,
            from_cols,
            to_cols = cols,
            "layout scaled"
        ),
        SynthesisSource::Empty => {
            tracing::debug!(target: "ftui.grid", breakpoint = target, "no layout to scale");
        }
    }

    let layout = synchronize(
        items,
        &synthesized.layout,
        cols,
        config.compaction,
        &config.default_item,
    );
    cache.insert(target.to_owned(), layout.clone());
    Ok(GridState {
        layout,
        breakpoint: target.to_owned(),
        cols,
    })
}

fn validate_table(layouts: &LayoutCache) -> Result<(), GridError> {
    for (breakpoint, layout) in layouts {
        check_layout(layout).map_err(|error| GridError::InvalidLayout {
            breakpoint: breakpoint.clone(),
            error,
        })?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
