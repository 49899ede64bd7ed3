//! End-to-end controller flows: configuration loading, breakpoint sweeps,
//! item churn, relayed moves, listener ordering and tracing output.
//!
//! Run with: `cargo test -p ftui-grid --test e2e_responsive`

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use ftui_grid::{
    CompactionMode, DefaultWidth, GridConfig, GridError, GridListener, Layout, LayoutCache,
    LayoutItem, LiveItem, ResponsiveGrid,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

// ============================================================================
// Tracing capture
// ============================================================================

#[derive(Debug, Clone)]
struct CapturedEvent {
    target: String,
    fields: HashMap<String, String>,
}

#[derive(Clone, Default)]
struct Capture {
    spans: Arc<Mutex<Vec<String>>>,
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for Capture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        self.spans
            .lock()
            .unwrap()
            .push(attrs.metadata().name().to_string());
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events.lock().unwrap().push(CapturedEvent {
            target: event.metadata().target().to_string(),
            fields: visitor.0.into_iter().collect(),
        });
    }
}

fn with_captured_tracing<F: FnOnce()>(f: F) -> Capture {
    let capture = Capture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    tracing::subscriber::with_default(subscriber, f);
    capture
}

fn messages(capture: &Capture) -> Vec<String> {
    capture
        .events
        .lock()
        .unwrap()
        .iter()
        .filter(|event| event.target == "ftui.grid")
        .filter_map(|event| event.fields.get("message").cloned())
        .collect()
}

// ============================================================================
// Listeners
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum Note {
    Layout { listener: u8, bp_in_cache: bool },
    Breakpoint { listener: u8, name: String, cols: i32 },
    Width { listener: u8, width: u32, margin: [u32; 2], cols: i32 },
}

struct Tagged {
    tag: u8,
    log: Rc<RefCell<Vec<Note>>>,
}

impl GridListener for Tagged {
    fn on_layout_change(&mut self, layout: &Layout, all: &LayoutCache) {
        self.log.borrow_mut().push(Note::Layout {
            listener: self.tag,
            bp_in_cache: all.values().any(|cached| cached == layout),
        });
    }

    fn on_breakpoint_change(&mut self, breakpoint: &str, cols: i32) {
        self.log.borrow_mut().push(Note::Breakpoint {
            listener: self.tag,
            name: breakpoint.to_owned(),
            cols,
        });
    }

    fn on_width_change(&mut self, width: u32, margin: [u32; 2], cols: i32) {
        self.log.borrow_mut().push(Note::Width {
            listener: self.tag,
            width,
            margin,
            cols,
        });
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn live(ids: &[&str]) -> Vec<LiveItem> {
    ids.iter().map(|&id| LiveItem::new(id)).collect()
}

fn rect(layout: &Layout, id: &str) -> (i32, i32, i32, i32) {
    let item = layout.get(id).unwrap_or_else(|| panic!("missing {id}"));
    (item.x, item.y, item.w, item.h)
}

fn assert_render_ready(grid: &ResponsiveGrid) {
    let layout = grid.layout();
    assert!(!layout.has_overlap(), "overlap in {layout:?}");
    for item in layout.iter().filter(|item| !item.is_static) {
        assert!(item.right() <= grid.cols(), "{item:?} exceeds {} cols", grid.cols());
    }
    let ids: Vec<_> = layout.ids().collect();
    let expected: Vec<_> = grid.items().iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, expected);
    assert_eq!(grid.cache().get(grid.breakpoint()), Some(layout));
}

// ============================================================================
// Flows
// ============================================================================

#[test]
fn e2e_json_config_drives_resolution() {
    let config: GridConfig = serde_json::from_str(
        r#"{
            "breakpoints": {"desk": 1000, "tablet": 600, "phone": 0},
            "cols": {"desk": 12, "tablet": 8, "phone": 1},
            "default_item": {"width": "full_columns", "height": 2},
            "margin": [4, 6]
        }"#,
    )
    .unwrap();
    let mut grid = ResponsiveGrid::new(config, LayoutCache::new(), live(&["a", "b"]), 1200).unwrap();
    assert_eq!(grid.breakpoint(), "desk");
    assert_eq!(rect(grid.layout(), "a"), (0, 0, 12, 2));
    assert_eq!(rect(grid.layout(), "b"), (0, 2, 12, 2));

    grid.set_width(300).unwrap();
    assert_eq!(grid.breakpoint(), "phone");
    assert_eq!(grid.cols(), 1);
    assert_eq!(rect(grid.layout(), "a"), (0, 0, 1, 2));
    assert_eq!(rect(grid.layout(), "b"), (0, 2, 1, 2));
    assert_render_ready(&grid);
}

#[test]
fn e2e_empty_table_mounts_empty_layout() {
    let grid = ResponsiveGrid::new(GridConfig::default(), LayoutCache::new(), Vec::new(), 800).unwrap();
    assert_eq!(grid.breakpoint(), "sm");
    assert_eq!(grid.cols(), 6);
    assert!(grid.layout().is_empty());
}

#[test]
fn e2e_full_sweep_keeps_layout_render_ready() {
    let lg = Layout::from(vec![
        LayoutItem::new("a", 0, 0, 6, 2),
        LayoutItem::new("b", 6, 0, 6, 4),
        LayoutItem::new("c", 0, 2, 3, 2),
        LayoutItem::new("pin", 3, 2, 3, 1).fixed(),
    ]);
    let mut grid = ResponsiveGrid::new(
        GridConfig::default(),
        LayoutCache::from([("lg".to_owned(), lg)]),
        live(&["a", "b", "c", "pin", "d"]),
        1300,
    )
    .unwrap();
    assert_render_ready(&grid);
    for width in [1100, 900, 700, 400, 100, 350, 520, 780, 1000, 1250] {
        grid.set_width(width).unwrap();
        assert_render_ready(&grid);
    }
    assert_eq!(grid.cache().len(), 5);
}

#[test]
fn e2e_listeners_fire_in_documented_order() {
    let log = Rc::new(RefCell::new(Vec::new()));
    let config = GridConfig::default().with_margin(8, 12);
    let mut grid = ResponsiveGrid::new(config, LayoutCache::new(), live(&["a"]), 1300).unwrap();
    grid.add_listener(Tagged { tag: 1, log: log.clone() });
    grid.add_listener(Tagged { tag: 2, log: log.clone() });

    grid.set_width(700).unwrap();
    assert_eq!(
        *log.borrow(),
        vec![
            Note::Layout { listener: 1, bp_in_cache: true },
            Note::Layout { listener: 2, bp_in_cache: true },
            Note::Breakpoint { listener: 1, name: "xs".into(), cols: 4 },
            Note::Breakpoint { listener: 2, name: "xs".into(), cols: 4 },
            Note::Width { listener: 1, width: 700, margin: [8, 12], cols: 4 },
            Note::Width { listener: 2, width: 700, margin: [8, 12], cols: 4 },
        ]
    );
}

#[test]
fn e2e_item_churn_self_heals() {
    let config = GridConfig::default().with_default_size(DefaultWidth::Fixed(4), 2);
    let mut grid = ResponsiveGrid::new(config, LayoutCache::new(), live(&["a", "b"]), 1300).unwrap();
    assert_eq!(rect(grid.layout(), "a"), (0, 0, 4, 2));
    assert_eq!(rect(grid.layout(), "b"), (0, 2, 4, 2));

    grid.set_items(live(&["b", "c"]));
    assert_render_ready(&grid);
    assert_eq!(rect(grid.layout(), "b"), (0, 0, 4, 2));
    assert_eq!(rect(grid.layout(), "c"), (0, 2, 4, 2));

    grid.set_items(vec![LiveItem::new("b"), LiveItem::new("c"), LiveItem::new("wide").with_size(12, 1)]);
    assert_eq!(rect(grid.layout(), "wide"), (0, 4, 12, 1));
    assert_render_ready(&grid);
}

#[test]
fn e2e_moved_item_survives_breakpoint_round_trip() {
    let mut grid =
        ResponsiveGrid::new(GridConfig::default(), LayoutCache::new(), live(&["a", "b", "c"]), 1300)
            .unwrap();
    grid.update_item(LayoutItem::new("c", 5, 0, 7, 3)).unwrap();
    assert_eq!(rect(grid.layout(), "c"), (5, 0, 7, 3));
    let lg = grid.layout().clone();

    grid.set_width(700).unwrap();
    assert_render_ready(&grid);
    grid.set_width(1300).unwrap();
    assert_eq!(grid.layout(), &lg);
}

#[test]
fn e2e_horizontal_mode_packs_left() {
    let config = GridConfig::default().with_compaction(CompactionMode::Horizontal);
    let lg = Layout::from(vec![
        LayoutItem::new("a", 4, 0, 4, 1),
        LayoutItem::new("b", 10, 0, 2, 1),
    ]);
    let grid = ResponsiveGrid::new(
        config,
        LayoutCache::from([("lg".to_owned(), lg)]),
        live(&["a", "b"]),
        1300,
    )
    .unwrap();
    assert_eq!(rect(grid.layout(), "a"), (0, 0, 4, 1));
    assert_eq!(rect(grid.layout(), "b"), (4, 0, 2, 1));
}

#[test]
fn e2e_rejected_table_leaves_cache_intact() {
    let mut grid =
        ResponsiveGrid::new(GridConfig::default(), LayoutCache::new(), live(&["a"]), 1300).unwrap();
    grid.set_width(800).unwrap();
    let before = grid.cache().clone();

    let bad = LayoutCache::from([(
        "lg".to_owned(),
        Layout::from(vec![LayoutItem::new("a", 0, 0, 1, 1), LayoutItem::new("a", 1, 0, 1, 1)]),
    )]);
    let err = grid.set_layouts(bad).unwrap_err();
    assert!(matches!(err, GridError::InvalidLayout { .. }));
    assert!(err.to_string().contains("duplicate id"));
    assert_eq!(grid.cache(), &before);
    assert_eq!(grid.breakpoint(), "sm");
}

#[test]
fn e2e_transition_emits_tracing() {
    let capture = with_captured_tracing(|| {
        let mut grid = ResponsiveGrid::new(
            GridConfig::default(),
            LayoutCache::from([(
                "lg".to_owned(),
                Layout::from(vec![LayoutItem::new("a", 0, 0, 6, 2)]),
            )]),
            live(&["a"]),
            1300,
        )
        .unwrap();
        grid.set_width(800).unwrap();
    });

    let spans = capture.spans.lock().unwrap().clone();
    assert!(spans.iter().any(|name| name == "grid.transition"));

    let messages = messages(&capture);
    for expected in ["grid initialized", "snapshot stored", "layout scaled", "transition committed"] {
        assert!(
            messages.iter().any(|m| m == expected),
            "missing {expected:?} in {messages:?}"
        );
    }

    let events = capture.events.lock().unwrap();
    let scaled = events
        .iter()
        .find(|event| event.fields.get("message").map(String::as_str) == Some("layout scaled"))
        .unwrap();
    assert_eq!(scaled.fields.get("from").map(String::as_str), Some("lg"));
    assert_eq!(scaled.fields.get("to_cols").map(String::as_str), Some("6"));
}

#[test]
fn e2e_rejected_update_warns() {
    let capture = with_captured_tracing(|| {
        let mut grid =
            ResponsiveGrid::new(GridConfig::default(), LayoutCache::new(), live(&["a"]), 1300)
                .unwrap();
        let _ = grid.update_item(LayoutItem::new("ghost", 0, 0, 1, 1));
    });
    assert!(messages(&capture).iter().any(|m| m == "update for unknown item"));
}
