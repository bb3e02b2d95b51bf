//! Capability traits over the live UI tree.
//!
//! The navigator never sees concrete proxy types. An introspection backend
//! implements these traits for its element handles; the [`mock`](crate::mock)
//! module implements them for an in-memory virtualized list.
//!
//! All property reads are live: implementations must not cache geometry or
//! scroll flags between calls, because delegates are created and destroyed
//! while the list scrolls.

use crate::geometry::{Point, Rect};
use crate::result::NavResult;
use crate::selector::Selector;

/// Anything that may expose a global rectangle
pub trait HasRect {
    /// Current global rectangle, `None` if the element has no geometry
    fn global_rect(&self) -> Option<Rect>;
}

/// A node of the live UI tree
pub trait TreeNode: HasRect + Sized {
    /// Direct children, in tree order
    fn children(&self) -> NavResult<Vec<Self>>;

    /// Type name reported by the introspection backend
    fn type_name(&self) -> String;

    /// The `objectName` property, if set
    fn object_name(&self) -> Option<String>;

    /// Short description for error messages and logs
    fn describe(&self) -> String {
        match self.object_name() {
            Some(name) => format!("{}[objectName={name:?}]", self.type_name()),
            None => self.type_name(),
        }
    }
}

/// Scroll boundary and motion flags of a flickable
pub trait HasBoundaryFlags {
    /// `atYBeginning`: content is scrolled to the very top
    fn at_y_beginning(&self) -> bool;

    /// `atYEnd`: content is scrolled to the very bottom
    fn at_y_end(&self) -> bool;

    /// `dragging`: a pointer is currently dragging the content
    fn is_dragging(&self) -> bool;

    /// `moving`: the content is moving (dragging or flicking)
    fn is_moving(&self) -> bool;
}

/// A scrollable view that can answer tree queries about its subtree
pub trait ScrollableView: HasRect + HasBoundaryFlags {
    /// Element handle type of the backend
    type Element: TreeNode;

    /// Root instance of the application tree
    fn root(&self) -> NavResult<Self::Element>;

    /// Direct children of the view
    fn children(&self) -> NavResult<Vec<Self::Element>>;

    /// Single descendant matching `selector`; `Ok(None)` when no element
    /// matches right now
    fn select_single(&self, selector: &Selector) -> NavResult<Option<Self::Element>>;

    /// All descendants matching `selector`
    fn select_many(&self, selector: &Selector) -> NavResult<Vec<Self::Element>>;

    /// Short description for error messages and logs
    fn describe(&self) -> String {
        "flickable".to_string()
    }
}

/// Input injection device
pub trait PointingDevice {
    /// Press at `from`, move to `to` at `rate` pixels per step, release
    fn drag(&self, from: Point, to: Point, rate: u32) -> NavResult<()>;

    /// Click at a point
    fn click(&self, at: Point) -> NavResult<()>;

    /// Click the centre of an element
    fn click_object<E: HasRect + ?Sized>(&self, element: &E) -> NavResult<()> {
        let rect = element
            .global_rect()
            .ok_or_else(|| crate::result::NavError::InputError {
                message: "cannot click an element without geometry".to_string(),
            })?;
        self.click(rect.center())
    }
}

/// Kind of pointing device to create for a platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    /// Mouse pointer, used on desktop
    Mouse,
    /// Touch screen, used everywhere else
    Touch,
}

impl PointerKind {
    /// Pick the device for a platform model string
    #[must_use]
    pub fn for_platform_model(model: &str) -> Self {
        if model == "Desktop" {
            Self::Mouse
        } else {
            Self::Touch
        }
    }
}

impl std::fmt::Display for PointerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mouse => write!(f, "mouse"),
            Self::Touch => write!(f, "touch"),
        }
    }
}
