//! Screen geometry and the visible band of nested containers.
//!
//! All coordinates are integer screen pixels. The centre of an element is
//! computed with integer division, so a 5px-high element at `y = 10` has its
//! centre at `12`, not `12.5`.

use serde::{Deserialize, Serialize};

use crate::result::{NavError, NavResult};

/// A point in screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Global rectangle of an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width, never negative
    pub width: i32,
    /// Height, never negative
    pub height: i32,
}

impl Rect {
    /// Create a rectangle; negative sizes are clamped to zero
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width: if width < 0 { 0 } else { width },
            height: if height < 0 { 0 } else { height },
        }
    }

    /// Bottom edge (`y + height`)
    #[must_use]
    pub const fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Vertical centre, floor-divided
    #[must_use]
    pub const fn center_y(&self) -> i32 {
        self.y.saturating_add(self.height / 2)
    }

    /// Centre point, floor-divided on both axes
    #[must_use]
    pub const fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.center_y())
    }

    /// Whether the rectangle has any vertical extent
    #[must_use]
    pub const fn has_extent(&self) -> bool {
        self.height > 0
    }

    /// Copy of this rectangle moved vertically
    #[must_use]
    pub const fn translated_y(&self, dy: i32) -> Self {
        Self::new(self.x, self.y + dy, self.width, self.height)
    }
}

/// Top of the visible band: the lowest container top
pub fn visible_top(containers: &[Rect]) -> NavResult<i32> {
    containers
        .iter()
        .map(|rect| rect.y)
        .max()
        .ok_or(NavError::NoVisibleExtent { containers: 0 })
}

/// Bottom of the visible band: the highest container bottom, ignoring
/// containers without height
pub fn visible_bottom(containers: &[Rect]) -> NavResult<i32> {
    containers
        .iter()
        .filter(|rect| rect.has_extent())
        .map(Rect::bottom)
        .min()
        .ok_or(NavError::NoVisibleExtent {
            containers: containers.len(),
        })
}

/// Vertical interval inside which an element centre counts as visible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisibleBand {
    /// Top edge (inclusive)
    pub top: i32,
    /// Bottom edge (inclusive)
    pub bottom: i32,
}

impl VisibleBand {
    /// Intersect the containers' vertical extents
    pub fn from_containers(containers: &[Rect]) -> NavResult<Self> {
        let bottom = visible_bottom(containers)?;
        let top = visible_top(containers)?;
        Ok(Self { top, bottom })
    }

    /// Whether `y` lies inside the band, edges included
    #[must_use]
    pub const fn contains(&self, y: i32) -> bool {
        self.top <= y && y <= self.bottom
    }

    /// Band shrunk by `inset` pixels at both edges
    #[must_use]
    pub const fn inset(&self, inset: i32) -> Self {
        Self {
            top: self.top + inset,
            bottom: self.bottom - inset,
        }
    }

    /// Band height; negative when the containers do not overlap
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.bottom - self.top
    }
}

/// Whether the centre of `element` falls inside `band`
#[must_use]
pub const fn is_visible(element: &Rect, band: &VisibleBand) -> bool {
    band.contains(element.center_y())
}
