//! In-memory virtualized list for testing navigation without a live UI.
//!
//! [`MockList`] behaves like a list view inside a main view:
//!
//! ```text
//! QQuickView                (no geometry)
//! └── MainView              window rect
//!     ├── Label             header
//!     └── QQuickListView    view rect
//!         └── QQuickItem    content item
//!             └── Standard  one per instantiated delegate
//! ```
//!
//! Only delegates intersecting the view (plus `cache_buffer` pixels) are
//! instantiated, so lookups of far-away items fail until the list is
//! scrolled near them. Drags that start inside the view move the content by
//! the dragged distance, clamped to the content extent, and leave the view
//! dragging and moving for a few polls.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

use crate::element::{HasBoundaryFlags, HasRect, PointingDevice, ScrollableView, TreeNode};
use crate::geometry::{Point, Rect};
use crate::list_view::CONTENT_ITEM_TYPE;
use crate::result::{NavError, NavResult};
use crate::selector::{Selector, OBJECT_NAME};

/// Type name of instantiated delegates
pub const DELEGATE_TYPE: &str = "Standard";

/// Shape and behaviour of a [`MockList`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MockListConfig {
    /// Number of model rows
    pub items: usize,
    /// Height of every delegate
    pub item_height: i32,
    /// Rows that fit in the view
    pub visible_items: usize,
    /// Width of window and view
    pub width: i32,
    /// Height of the label above the list
    pub header_height: i32,
    /// Window height; defaults to header plus view
    pub window_height: Option<i32>,
    /// Extra pixels around the view in which delegates stay instantiated
    pub cache_buffer: i32,
    /// Polls for which the view reports dragging after a drag
    pub settle_polls: u32,
    /// Report moving forever after the first drag
    pub stuck_moving: bool,
    /// Delegate `objectName` prefix, followed by the row index
    pub name_prefix: String,
}

impl Default for MockListConfig {
    fn default() -> Self {
        Self {
            items: 20,
            item_height: 50,
            visible_items: 4,
            width: 480,
            header_height: 30,
            window_height: None,
            cache_buffer: 0,
            settle_polls: 2,
            stuck_moving: false,
            name_prefix: "item".to_string(),
        }
    }
}

impl MockListConfig {
    /// Set the number of rows
    #[must_use]
    pub const fn with_items(mut self, items: usize) -> Self {
        self.items = items;
        self
    }

    /// Set the delegate height
    #[must_use]
    pub const fn with_item_height(mut self, height: i32) -> Self {
        self.item_height = height;
        self
    }

    /// Set how many rows fit in the view
    #[must_use]
    pub const fn with_visible_items(mut self, visible: usize) -> Self {
        self.visible_items = visible;
        self
    }

    /// Set the window height
    #[must_use]
    pub const fn with_window_height(mut self, height: i32) -> Self {
        self.window_height = Some(height);
        self
    }

    /// Set the instantiation buffer
    #[must_use]
    pub const fn with_cache_buffer(mut self, pixels: i32) -> Self {
        self.cache_buffer = pixels;
        self
    }

    /// Set the number of polls the view stays in motion
    #[must_use]
    pub const fn with_settle_polls(mut self, polls: u32) -> Self {
        self.settle_polls = polls;
        self
    }

    /// Make the view never stop moving
    #[must_use]
    pub const fn with_stuck_moving(mut self, stuck: bool) -> Self {
        self.stuck_moving = stuck;
        self
    }

    /// Set the delegate name prefix
    #[must_use]
    pub fn with_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.name_prefix = prefix.into();
        self
    }
}

/// A recorded drag: start, end and rate
pub type RecordedDrag = (Point, Point, u32);

#[derive(Debug)]
struct ListState {
    config: MockListConfig,
    content_y: i32,
    drags: Vec<RecordedDrag>,
    clicks: Vec<(Point, Option<String>)>,
    dragging_polls: u32,
    moving_polls: u32,
    moved: bool,
}

/// Pixel offset of `rows` rows, saturating at `i32::MAX`
fn rows_extent(rows: usize, item_height: i32) -> i32 {
    i32::try_from(rows)
        .unwrap_or(i32::MAX)
        .saturating_mul(item_height)
}

impl ListState {
    fn view_rect(&self) -> Rect {
        let c = &self.config;
        Rect::new(
            0,
            c.header_height,
            c.width,
            rows_extent(c.visible_items, c.item_height),
        )
    }

    fn window_rect(&self) -> Rect {
        let c = &self.config;
        let height = c
            .window_height
            .unwrap_or_else(|| c.header_height.saturating_add(self.view_rect().height));
        Rect::new(0, 0, c.width, height)
    }

    fn content_height(&self) -> i32 {
        rows_extent(self.config.items, self.config.item_height)
    }

    fn max_content_y(&self) -> i32 {
        self.content_height()
            .saturating_sub(self.view_rect().height)
            .max(0)
    }

    fn delegate_rect(&self, index: usize) -> Rect {
        let c = &self.config;
        let view = self.view_rect();
        Rect::new(
            view.x,
            view.y
                .saturating_add(rows_extent(index, c.item_height))
                .saturating_sub(self.content_y),
            view.width,
            c.item_height,
        )
    }

    /// Rows that may intersect the buffered view; filtered exactly by
    /// `instantiated`
    fn candidate_rows(&self) -> std::ops::Range<usize> {
        let c = &self.config;
        if c.item_height <= 0 {
            return 0..c.items;
        }
        let height = i64::from(c.item_height);
        let buffer = i64::from(c.cache_buffer);
        let top = i64::from(self.content_y) - buffer;
        let bottom = i64::from(self.content_y) + i64::from(self.view_rect().height) + buffer;
        let to_row = |offset: i64| usize::try_from(offset / height).unwrap_or(0);
        // Rows past a saturated content height do not exist.
        let rows = to_row(i64::from(self.content_height())).min(c.items);
        let first = to_row(top).saturating_sub(1);
        let last = to_row(bottom).saturating_add(2).min(rows);
        first.min(last)..last
    }

    fn instantiated(&self) -> Vec<usize> {
        let view = self.view_rect();
        let buffer = self.config.cache_buffer;
        self.candidate_rows()
            .filter(|&index| {
                let rect = self.delegate_rect(index);
                rect.bottom() > view.y.saturating_sub(buffer)
                    && rect.y < view.bottom().saturating_add(buffer)
            })
            .collect()
    }

    fn delegate_name(&self, index: usize) -> String {
        format!("{}{index}", self.config.name_prefix)
    }

    fn drag(&mut self, from: Point, to: Point, rate: u32) {
        self.drags.push((from, to, rate));
        let view = self.view_rect();
        let inside = from.x >= view.x
            && from.x < view.x + view.width
            && from.y >= view.y
            && from.y < view.bottom();
        if !inside {
            return;
        }
        self.scroll_to(self.content_y.saturating_sub(to.y.saturating_sub(from.y)));
        self.dragging_polls = self.config.settle_polls;
        self.moving_polls = self.config.settle_polls * 2;
        self.moved = true;
    }

    fn scroll_to(&mut self, content_y: i32) {
        self.content_y = content_y.clamp(0, self.max_content_y());
    }

    fn click(&mut self, at: Point) {
        let view = self.view_rect();
        let hit = (at.y >= view.y && at.y < view.bottom())
            .then(|| {
                self.instantiated().into_iter().find(|&index| {
                    let rect = self.delegate_rect(index);
                    at.y >= rect.y && at.y < rect.bottom()
                })
            })
            .flatten()
            .map(|index| self.delegate_name(index));
        self.clicks.push((at, hit));
    }
}

fn countdown(polls: &mut u32) -> bool {
    if *polls == 0 {
        return false;
    }
    *polls -= 1;
    true
}

/// Handle to a simulated list view
#[derive(Debug, Clone)]
pub struct MockList {
    state: Rc<RefCell<ListState>>,
}

impl MockList {
    /// Create a list scrolled to the top
    #[must_use]
    pub fn new(config: MockListConfig) -> Self {
        Self {
            state: Rc::new(RefCell::new(ListState {
                config,
                content_y: 0,
                drags: Vec::new(),
                clicks: Vec::new(),
                dragging_polls: 0,
                moving_polls: 0,
                moved: false,
            })),
        }
    }

    /// Pointing device acting on this list
    #[must_use]
    pub fn pointer(&self) -> MockPointer {
        MockPointer {
            state: Rc::clone(&self.state),
        }
    }

    /// Jump to a content offset without dragging
    pub fn scroll_to(&self, content_y: i32) {
        self.state.borrow_mut().scroll_to(content_y);
    }

    /// Jump to the end of the content without dragging
    pub fn scroll_to_end(&self) {
        let mut state = self.state.borrow_mut();
        let end = state.max_content_y();
        state.scroll_to(end);
    }

    /// Current content offset
    #[must_use]
    pub fn content_y(&self) -> i32 {
        self.state.borrow().content_y
    }

    /// All drags received so far
    #[must_use]
    pub fn drags(&self) -> Vec<RecordedDrag> {
        self.state.borrow().drags.clone()
    }

    /// Number of drags received so far
    #[must_use]
    pub fn drag_count(&self) -> usize {
        self.state.borrow().drags.len()
    }

    /// Name of the delegate hit by the last click
    #[must_use]
    pub fn last_clicked(&self) -> Option<String> {
        self.state
            .borrow()
            .clicks
            .last()
            .and_then(|(_, hit)| hit.clone())
    }

    /// Names of the delegates currently instantiated
    #[must_use]
    pub fn instantiated_names(&self) -> Vec<String> {
        let state = self.state.borrow();
        state
            .instantiated()
            .into_iter()
            .map(|index| state.delegate_name(index))
            .collect()
    }

    fn content_item(&self) -> MockNode {
        MockNode {
            type_name: CONTENT_ITEM_TYPE.to_string(),
            object_name: None,
            kind: NodeKind::ContentItem(Rc::clone(&self.state)),
        }
    }

    fn delegates(&self) -> Vec<MockNode> {
        let state = self.state.borrow();
        state
            .instantiated()
            .into_iter()
            .map(|index| MockNode {
                type_name: DELEGATE_TYPE.to_string(),
                object_name: Some(state.delegate_name(index)),
                kind: NodeKind::Delegate {
                    state: Rc::clone(&self.state),
                    index,
                },
            })
            .collect()
    }

    fn matching(&self, selector: &Selector) -> Vec<MockNode> {
        let mut candidates = vec![self.content_item()];
        candidates.extend(self.delegates());
        candidates
            .into_iter()
            .filter(|node| selector.matches(&node.type_name, |key| node.property(key)))
            .collect()
    }
}

impl HasRect for MockList {
    fn global_rect(&self) -> Option<Rect> {
        Some(self.state.borrow().view_rect())
    }
}

impl HasBoundaryFlags for MockList {
    fn at_y_beginning(&self) -> bool {
        self.state.borrow().content_y <= 0
    }

    fn at_y_end(&self) -> bool {
        let state = self.state.borrow();
        state.content_y >= state.max_content_y()
    }

    fn is_dragging(&self) -> bool {
        countdown(&mut self.state.borrow_mut().dragging_polls)
    }

    fn is_moving(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.config.stuck_moving && state.moved {
            return true;
        }
        countdown(&mut state.moving_polls)
    }
}

impl ScrollableView for MockList {
    type Element = MockNode;

    fn root(&self) -> NavResult<MockNode> {
        let (window, view, header) = {
            let state = self.state.borrow();
            let window = state.window_rect();
            let header = Rect::new(0, 0, window.width, state.config.header_height);
            (window, state.view_rect(), header)
        };
        let list = MockNode::detached("QQuickListView", Some(view)).with_child(self.content_item());
        let main_view = MockNode::detached("MainView", Some(window))
            .with_object_name("mainView")
            .with_child(MockNode::detached("Label", Some(header)).with_object_name("clickedLabel"))
            .with_child(list.with_object_name("testListView"));
        Ok(MockNode::detached("QQuickView", None).with_child(main_view))
    }

    fn children(&self) -> NavResult<Vec<MockNode>> {
        Ok(vec![self.content_item()])
    }

    fn select_single(&self, selector: &Selector) -> NavResult<Option<MockNode>> {
        let mut found = self.matching(selector);
        if found.len() > 1 {
            return Err(NavError::QueryFailed {
                selector: selector.to_string(),
                message: format!("{} elements match", found.len()),
            });
        }
        Ok(found.pop())
    }

    fn select_many(&self, selector: &Selector) -> NavResult<Vec<MockNode>> {
        Ok(self.matching(selector))
    }

    fn describe(&self) -> String {
        "QQuickListView".to_string()
    }
}

/// Pointing device that drives a [`MockList`]
#[derive(Debug, Clone)]
pub struct MockPointer {
    state: Rc<RefCell<ListState>>,
}

impl PointingDevice for MockPointer {
    fn drag(&self, from: Point, to: Point, rate: u32) -> NavResult<()> {
        if rate == 0 {
            return Err(NavError::InputError {
                message: "drag rate must be positive".to_string(),
            });
        }
        self.state.borrow_mut().drag(from, to, rate);
        Ok(())
    }

    fn click(&self, at: Point) -> NavResult<()> {
        self.state.borrow_mut().click(at);
        Ok(())
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Static {
        rect: Option<Rect>,
        children: Vec<MockNode>,
    },
    ContentItem(Rc<RefCell<ListState>>),
    Delegate {
        state: Rc<RefCell<ListState>>,
        index: usize,
    },
}

/// Element handle of the simulated tree
#[derive(Debug, Clone)]
pub struct MockNode {
    type_name: String,
    object_name: Option<String>,
    kind: NodeKind,
}

impl MockNode {
    /// A node with fixed geometry, not attached to any list
    #[must_use]
    pub fn detached(type_name: impl Into<String>, rect: Option<Rect>) -> Self {
        Self {
            type_name: type_name.into(),
            object_name: None,
            kind: NodeKind::Static {
                rect,
                children: Vec::new(),
            },
        }
    }

    /// Set the `objectName`
    #[must_use]
    pub fn with_object_name(mut self, name: impl Into<String>) -> Self {
        self.object_name = Some(name.into());
        self
    }

    /// Append a child; only fixed nodes keep explicit children
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        if let NodeKind::Static { children, .. } = &mut self.kind {
            children.push(child);
        }
        self
    }

    /// Property lookup used by selectors
    #[must_use]
    pub fn property(&self, key: &str) -> Option<String> {
        match (key, &self.kind) {
            (OBJECT_NAME, _) => self.object_name.clone(),
            ("index", NodeKind::Delegate { index, .. }) => Some(index.to_string()),
            _ => None,
        }
    }
}

impl HasRect for MockNode {
    fn global_rect(&self) -> Option<Rect> {
        match &self.kind {
            NodeKind::Static { rect, .. } => *rect,
            NodeKind::ContentItem(state) => {
                let state = state.borrow();
                let view = state.view_rect();
                Some(Rect::new(
                    view.x,
                    view.y.saturating_sub(state.content_y),
                    view.width,
                    state.content_height(),
                ))
            }
            NodeKind::Delegate { state, index } => Some(state.borrow().delegate_rect(*index)),
        }
    }
}

impl TreeNode for MockNode {
    fn children(&self) -> NavResult<Vec<Self>> {
        match &self.kind {
            NodeKind::Static { children, .. } => Ok(children.clone()),
            NodeKind::ContentItem(state) => Ok(MockList {
                state: Rc::clone(state),
            }
            .delegates()),
            NodeKind::Delegate { .. } => Ok(Vec::new()),
        }
    }

    fn type_name(&self) -> String {
        self.type_name.clone()
    }

    fn object_name(&self) -> Option<String> {
        self.object_name.clone()
    }
}
