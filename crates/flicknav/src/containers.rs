//! Containers that bound what is visible inside a flickable.
//!
//! Only two containers are modelled: the top-most container that exposes
//! geometry, and the flickable itself. Flickables nested between the two are
//! ignored unless added with [`ContainerChain::with_intermediate`].

use crate::element::{HasRect, ScrollableView, TreeNode};
use crate::geometry::{is_visible, Rect, VisibleBand};
use crate::result::{NavError, NavResult};

/// Find the top-most container with geometry.
///
/// Descends from `root` while each level has exactly one node, returning
/// the first node that exposes a global rectangle.
pub fn find_top_container<E: TreeNode>(root: E) -> NavResult<E> {
    let mut level = vec![root];
    loop {
        let mut nodes = level.into_iter();
        match (nodes.next(), nodes.next()) {
            (Some(node), None) => {
                if node.global_rect().is_some() {
                    tracing::trace!(container = %node.describe(), "top container found");
                    return Ok(node);
                }
                level = node.children()?;
            }
            _ => return Err(NavError::TopContainerNotFound),
        }
    }
}

/// Containers whose intersection is the visible band of a flickable.
///
/// The chain holds element handles, not rectangles: every call to
/// [`band`](Self::band) reads the current geometry.
pub struct ContainerChain<'v, V: ScrollableView> {
    top: V::Element,
    intermediates: Vec<V::Element>,
    view: &'v V,
}

impl<'v, V: ScrollableView> ContainerChain<'v, V> {
    /// Resolve the chain for `view`
    pub fn resolve(view: &'v V) -> NavResult<Self> {
        let top = find_top_container(view.root()?)?;
        Ok(Self::new(top, view))
    }

    /// Chain of an explicit top container and the view
    pub fn new(top: V::Element, view: &'v V) -> Self {
        Self {
            top,
            intermediates: Vec::new(),
            view,
        }
    }

    /// Add a container between the top container and the view
    #[must_use]
    pub fn with_intermediate(mut self, container: V::Element) -> Self {
        self.intermediates.push(container);
        self
    }

    /// The top-most container
    pub const fn top(&self) -> &V::Element {
        &self.top
    }

    /// The flickable at the bottom of the chain
    pub const fn view(&self) -> &'v V {
        self.view
    }

    /// Number of containers in the chain
    pub fn len(&self) -> usize {
        self.intermediates.len() + 2
    }

    /// Always false; a chain has at least the top container and the view
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Current rectangles, top container first and view last
    pub fn rects(&self) -> NavResult<Vec<Rect>> {
        let mut rects = Vec::with_capacity(self.len());
        rects.push(require_rect(&self.top, || self.top.describe())?);
        for container in &self.intermediates {
            rects.push(require_rect(container, || container.describe())?);
        }
        rects.push(require_rect(self.view, || self.view.describe())?);
        Ok(rects)
    }

    /// Current visible band
    pub fn band(&self) -> NavResult<VisibleBand> {
        VisibleBand::from_containers(&self.rects()?)
    }

    /// Whether the centre of `element` is inside the current band
    pub fn is_visible<E: HasRect + ?Sized>(&self, element: &E) -> NavResult<bool> {
        let rect = require_rect(element, || "target element".to_string())?;
        Ok(is_visible(&rect, &self.band()?))
    }
}

impl<V: ScrollableView> std::fmt::Debug for ContainerChain<'_, V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerChain")
            .field("top", &self.top.describe())
            .field("intermediates", &self.intermediates.len())
            .field("view", &self.view.describe())
            .finish()
    }
}

/// Read a rectangle that must exist
pub(crate) fn require_rect<E, D>(element: &E, describe: D) -> NavResult<Rect>
where
    E: HasRect + ?Sized,
    D: FnOnce() -> String,
{
    element.global_rect().ok_or_else(|| NavError::MissingGeometry {
        element: describe(),
    })
}
