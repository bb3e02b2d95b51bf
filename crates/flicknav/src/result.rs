//! Result and error types for flicknav.

use crate::navigator::Direction;
use thiserror::Error;

/// Result type for navigation operations
pub type NavResult<T> = Result<T, NavError>;

/// Errors that can occur while navigating a flickable
#[derive(Debug, Error)]
pub enum NavError {
    /// No geometry-bearing container on the root-to-flickable path
    #[error("Couldn't find the top-most container")]
    TopContainerNotFound,

    /// Swipe above requested while the view reports its top boundary
    #[error("Can't swipe more, we are already at the top of the container")]
    AlreadyAtTop,

    /// Swipe below requested while the view reports its bottom boundary
    #[error("Can't swipe more, we are already at the bottom of the container")]
    AlreadyAtBottom,

    /// No element matches, after an exhaustive search when `direction` is set
    #[error("List element with {selector} not found{}", searched_suffix(.direction))]
    ElementNotFound {
        /// Selector that was searched for
        selector: String,
        /// Direction the search scrolled in
        direction: Option<Direction>,
    },

    /// Every container in the chain has zero height
    #[error("No visible extent: {containers} container(s), none with a positive height")]
    NoVisibleExtent {
        /// Number of containers considered
        containers: usize,
    },

    /// An element that should expose geometry did not
    #[error("Element {element} exposes no geometry")]
    MissingGeometry {
        /// Description of the element
        element: String,
    },

    /// The visible band leaves no room for a drag once the inset is removed
    #[error("Visible band {top}..{bottom} is too narrow to swipe with a {inset}px inset")]
    BandTooNarrow {
        /// Top of the visible band
        top: i32,
        /// Bottom of the visible band
        bottom: i32,
        /// Inset removed at both edges
        inset: i32,
    },

    /// A blocking wait exceeded its bound
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// What was waited for
        waited_for: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// An operation issued more swipes than allowed
    #[error("Gave up after {swipes} swipes {direction} while {operation}")]
    SwipeLimitExceeded {
        /// Operation that was running
        operation: String,
        /// Direction of the last swipe
        direction: Direction,
        /// Number of swipes issued
        swipes: u32,
    },

    /// Tree query failed in the introspection backend
    #[error("Query for {selector} failed: {message}")]
    QueryFailed {
        /// Selector that was queried
        selector: String,
        /// Error message
        message: String,
    },

    /// Input injection failed
    #[error("Input simulation failed: {message}")]
    InputError {
        /// Error message
        message: String,
    },

    /// Invalid configuration value
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message
        message: String,
    },

    /// Malformed performance log
    #[error("Performance log error: {message}")]
    PerfLog {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

fn searched_suffix(direction: &Option<Direction>) -> String {
    direction.map_or_else(|| ".".to_string(), |d| format!(" after swiping {d}."))
}

impl NavError {
    /// Whether the error reports an exhausted scroll boundary
    #[must_use]
    pub const fn is_boundary(&self) -> bool {
        matches!(self, Self::AlreadyAtTop | Self::AlreadyAtBottom)
    }

    /// Whether the error reports that the target is definitely absent
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary_messages() {
        assert!(NavError::AlreadyAtTop.to_string().contains("top"));
        assert!(NavError::AlreadyAtBottom.to_string().contains("bottom"));
        assert!(NavError::AlreadyAtTop.is_boundary());
        assert!(!NavError::TopContainerNotFound.is_boundary());
    }

    #[test]
    fn test_not_found_carries_selector() {
        let err = NavError::ElementNotFound {
            selector: "objectName \"unexisting\"".to_string(),
            direction: Some(Direction::Below),
        };
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "List element with objectName \"unexisting\" not found after swiping below."
        );

        let err = NavError::ElementNotFound {
            selector: "objectName \"gone\"".to_string(),
            direction: None,
        };
        assert_eq!(err.to_string(), "List element with objectName \"gone\" not found.");
    }

    #[test]
    fn test_timeout_message() {
        let err = NavError::Timeout {
            waited_for: "dragging == false".to_string(),
            ms: 250,
        };
        assert!(err.to_string().contains("250ms"));
        assert!(err.to_string().contains("dragging"));
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: NavError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }
}
