//! Flicknav: scroll-aware navigation for flickable UI containers
//!
//! Brings elements of scrollable views into the visible area by simulated
//! swipes, and finds elements of virtualized lists that only exist once
//! scrolled near the viewport.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    FLICKNAV Architecture                      │
//! ├──────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌────────────┐    ┌────────────┐         │
//! │   │ ListView   │    │ Flickable  │    │ Scrollable │         │
//! │   │ (search)   │───►│ (swipes,   │───►│ View +     │         │
//! │   │            │    │  settling) │    │ Pointer    │         │
//! │   └────────────┘    └────────────┘    └────────────┘         │
//! │                           │                                   │
//! │                  ┌────────▼───────┐                           │
//! │                  │ ContainerChain │  visible band             │
//! │                  └────────────────┘                           │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The introspection backend is abstracted by the traits in [`element`];
//! [`mock`] provides an in-memory virtualized list.
//!
//! # Example
//!
//! ```
//! use flicknav::mock::{MockList, MockListConfig};
//! use flicknav::{ListView, Selector};
//!
//! let list = MockList::new(MockListConfig::default());
//! let pointer = list.pointer();
//! let helper = ListView::new(&list, &pointer);
//! helper.click_element(&Selector::object_name("item2"), None).unwrap();
//! assert_eq!(list.last_clicked().as_deref(), Some("item2"));
//! ```

#![warn(missing_docs)]

mod config;
mod containers;
#[allow(clippy::missing_errors_doc)]
pub mod element;
mod geometry;
mod list_view;
/// Simulated virtualized list for tests and dry runs
#[allow(clippy::cast_possible_wrap, clippy::must_use_candidate)]
pub mod mock;
mod navigator;
/// Scene performance logs and statistics
#[allow(clippy::cast_precision_loss)]
pub mod perf;
mod result;
mod selector;
mod wait;

pub use config::{NavigatorConfig, DEFAULT_DRAG_RATE, DEFAULT_MAX_SWIPES, DEFAULT_SWIPE_INSET};
pub use containers::{find_top_container, ContainerChain};
pub use element::{
    HasBoundaryFlags, HasRect, PointerKind, PointingDevice, ScrollableView, TreeNode,
};
pub use geometry::{is_visible, visible_bottom, visible_top, Point, Rect, VisibleBand};
pub use list_view::{ListView, CONTENT_ITEM_TYPE};
pub use navigator::{Direction, Flickable};
pub use result::{NavError, NavResult};
pub use selector::{Selector, OBJECT_NAME};
pub use wait::{
    wait_until, FnCondition, WaitCondition, WaitOptions, WaitResult, Waiter,
    DEFAULT_POLL_INTERVAL_MS, DEFAULT_WAIT_TIMEOUT_MS,
};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::element::{
        HasBoundaryFlags, HasRect, PointerKind, PointingDevice, ScrollableView, TreeNode,
    };
    pub use super::{
        ContainerChain, Direction, Flickable, ListView, NavError, NavResult, NavigatorConfig,
        Point, Rect, Selector, VisibleBand,
    };
}
