//! Swiping a flickable until an element becomes visible.
//!
//! Only vertical swiping is supported. Each swipe is a slow drag across the
//! visible band followed by a settle wait; visibility is re-read after
//! every swipe. Loops end at a boundary flag, at the configured swipe limit,
//! or when a settle wait times out.

use serde::{Deserialize, Serialize};

use crate::config::NavigatorConfig;
use crate::containers::{require_rect, ContainerChain};
use crate::element::{HasRect, PointingDevice, ScrollableView};
use crate::geometry::{Point, Rect};
use crate::result::{NavError, NavResult};
use crate::wait::Waiter;

/// Vertical direction in which more content is revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Reveal content above the viewport (drag downwards)
    Above,
    /// Reveal content below the viewport (drag upwards)
    Below,
}

impl Direction {
    /// Direction of a target relative to the view: above iff its top edge
    /// is higher than the view's top edge
    #[must_use]
    pub const fn towards(target: &Rect, view: &Rect) -> Self {
        if target.y < view.y {
            Self::Above
        } else {
            Self::Below
        }
    }

    /// The other direction
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Above => Self::Below,
            Self::Below => Self::Above,
        }
    }

    /// Drag endpoints inside a band: starts at one inset edge and ends at
    /// the other
    #[must_use]
    pub const fn drag_points(self, x: i32, top: i32, bottom: i32) -> (Point, Point) {
        match self {
            Self::Above => (Point::new(x, top), Point::new(x, bottom)),
            Self::Below => (Point::new(x, bottom), Point::new(x, top)),
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Above => write!(f, "above"),
            Self::Below => write!(f, "below"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "above" => Ok(Self::Above),
            "below" => Ok(Self::Below),
            other => Err(NavError::InvalidConfig {
                message: format!("invalid direction {other:?}, expected \"above\" or \"below\""),
            }),
        }
    }
}

/// Navigator over a scrollable view.
///
/// Holds no state between operations: containers, geometry and flags are
/// re-read on every call.
#[derive(Debug)]
pub struct Flickable<'a, V, P> {
    view: &'a V,
    pointer: &'a P,
    config: NavigatorConfig,
}

impl<'a, V, P> Flickable<'a, V, P>
where
    V: ScrollableView,
    P: PointingDevice,
{
    /// Navigator with default configuration
    pub fn new(view: &'a V, pointer: &'a P) -> Self {
        Self {
            view,
            pointer,
            config: NavigatorConfig::default(),
        }
    }

    /// Replace the configuration after validating it
    pub fn with_config(mut self, config: NavigatorConfig) -> NavResult<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// The navigated view
    pub const fn view(&self) -> &'a V {
        self.view
    }

    /// The pointing device used for swipes and clicks
    pub const fn pointer(&self) -> &'a P {
        self.pointer
    }

    /// Active configuration
    pub const fn config(&self) -> &NavigatorConfig {
        &self.config
    }

    /// Containers to take into account when swiping: the top-most container
    /// and this flickable
    pub fn containers(&self) -> NavResult<ContainerChain<'a, V>> {
        ContainerChain::resolve(self.view)
    }

    /// Whether the centre of `child` is currently visible
    pub fn is_child_visible<E: HasRect + ?Sized>(&self, child: &E) -> NavResult<bool> {
        self.containers()?.is_visible(child)
    }

    /// Whether the view reports the boundary in `direction`
    pub fn at_boundary(&self, direction: Direction) -> bool {
        match direction {
            Direction::Above => self.view.at_y_beginning(),
            Direction::Below => self.view.at_y_end(),
        }
    }

    /// Swipe until the centre of `child` is visible.
    ///
    /// Returns the number of swipes; zero when the child was already
    /// visible.
    pub fn swipe_child_into_view<E: HasRect + ?Sized>(&self, child: &E) -> NavResult<u32> {
        let _span = tracing::info_span!("swipe_child_into_view").entered();
        let chain = self.containers()?;
        if chain.is_visible(child)? {
            tracing::debug!("the element is already visible");
            return Ok(0);
        }

        let mut swipes = 0;
        loop {
            let target = require_rect(child, || "target element".to_string())?;
            let view = require_rect(self.view, || self.view.describe())?;
            let direction = Direction::towards(&target, &view);
            self.check_budget(swipes, "swiping child into view", direction)?;
            self.swipe_to_show_more(direction, &chain)?;
            swipes += 1;
            if chain.is_visible(child)? {
                tracing::info!(swipes, "element swiped into view");
                return Ok(swipes);
            }
        }
    }

    /// Swipe once to reveal more content in `direction`.
    ///
    /// Fails without dragging when the view is already at that boundary.
    pub fn swipe_to_show_more(
        &self,
        direction: Direction,
        chain: &ContainerChain<'_, V>,
    ) -> NavResult<()> {
        if self.at_boundary(direction) {
            return Err(match direction {
                Direction::Above => NavError::AlreadyAtTop,
                Direction::Below => NavError::AlreadyAtBottom,
            });
        }
        self.swipe(direction, chain)
    }

    /// Swipe once to reveal content above
    pub fn swipe_to_show_more_above(&self, chain: &ContainerChain<'_, V>) -> NavResult<()> {
        self.swipe_to_show_more(Direction::Above, chain)
    }

    /// Swipe once to reveal content below
    pub fn swipe_to_show_more_below(&self, chain: &ContainerChain<'_, V>) -> NavResult<()> {
        self.swipe_to_show_more(Direction::Below, chain)
    }

    /// Swipe above until the view reports its top boundary
    pub fn swipe_to_top(&self) -> NavResult<u32> {
        let _span = tracing::info_span!("swipe_to_top").entered();
        self.swipe_to_boundary(Direction::Above)
    }

    /// Swipe below until the view reports its bottom boundary
    pub fn swipe_to_bottom(&self) -> NavResult<u32> {
        let _span = tracing::info_span!("swipe_to_bottom").entered();
        self.swipe_to_boundary(Direction::Below)
    }

    fn swipe_to_boundary(&self, direction: Direction) -> NavResult<u32> {
        if self.at_boundary(direction) {
            return Ok(0);
        }
        let chain = self.containers()?;
        let mut swipes = 0;
        while !self.at_boundary(direction) {
            self.check_budget(swipes, "swiping to the boundary", direction)?;
            self.swipe_to_show_more(direction, &chain)?;
            swipes += 1;
        }
        tracing::debug!(%direction, swipes, "boundary reached");
        Ok(swipes)
    }

    /// One slow drag across the inset band, then wait for the view to
    /// settle. Does not check the boundary flags; see
    /// [`swipe_to_show_more`](Self::swipe_to_show_more).
    ///
    /// Fails with [`NavError::BandTooNarrow`] before dragging when the band
    /// is no taller than twice the inset. The dragging and moving waits are
    /// bounded separately, so a swipe may block for up to twice
    /// `settle_timeout_ms`.
    pub fn swipe(&self, direction: Direction, chain: &ContainerChain<'_, V>) -> NavResult<()> {
        let view = require_rect(self.view, || self.view.describe())?;
        let visible = chain.band()?;
        let inset = self.config.swipe_inset;
        if visible.height() <= inset.saturating_mul(2) {
            return Err(NavError::BandTooNarrow {
                top: visible.top,
                bottom: visible.bottom,
                inset,
            });
        }
        let band = visible.inset(inset);
        let x = view.x + view.width / 2;
        let (from, to) = direction.drag_points(x, band.top, band.bottom);
        tracing::debug!(%direction, %from, %to, rate = self.config.drag_rate, "swipe");
        self.pointer.drag(from, to, self.config.drag_rate)?;
        self.wait_settled()
    }

    fn wait_settled(&self) -> NavResult<()> {
        let waiter = Waiter::with_options(self.config.settle_wait());
        waiter.wait_for_function(|| !self.view.is_dragging(), "dragging == false")?;
        waiter.wait_for_function(|| !self.view.is_moving(), "moving == false")?;
        Ok(())
    }

    pub(crate) fn check_budget(
        &self,
        swipes: u32,
        operation: &str,
        direction: Direction,
    ) -> NavResult<()> {
        if swipes >= self.config.max_swipes {
            return Err(NavError::SwipeLimitExceeded {
                operation: operation.to_string(),
                direction,
                swipes,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::element::HasBoundaryFlags;
    use crate::mock::{MockList, MockListConfig};
    use crate::selector::Selector;

    fn fast() -> NavigatorConfig {
        NavigatorConfig::new()
            .with_poll_interval(1)
            .with_settle_timeout(200)
    }

    mod direction_tests {
        use super::*;

        #[test]
        fn test_target_above_view() {
            let view = Rect::new(0, 100, 100, 100);
            assert_eq!(
                Direction::towards(&Rect::new(0, 50, 10, 10), &view),
                Direction::Above
            );
        }

        #[test]
        fn test_target_below_view() {
            let view = Rect::new(0, 100, 100, 100);
            assert_eq!(
                Direction::towards(&Rect::new(0, 150, 10, 10), &view),
                Direction::Below
            );
            // Same top edge counts as below.
            assert_eq!(
                Direction::towards(&Rect::new(0, 100, 10, 10), &view),
                Direction::Below
            );
        }

        #[test]
        fn test_drag_points() {
            let (from, to) = Direction::Below.drag_points(50, 25, 75);
            assert_eq!((from, to), (Point::new(50, 75), Point::new(50, 25)));
            let (from, to) = Direction::Above.drag_points(50, 25, 75);
            assert_eq!((from, to), (Point::new(50, 25), Point::new(50, 75)));
        }

        #[test]
        fn test_parse_and_display() {
            assert_eq!("above".parse::<Direction>().unwrap(), Direction::Above);
            assert_eq!(Direction::Below.to_string(), "below");
            assert_eq!(Direction::Below.opposite(), Direction::Above);
            assert!("sideways".parse::<Direction>().is_err());
        }

        #[test]
        fn test_serde_lowercase() {
            assert_eq!(serde_json::to_string(&Direction::Above).unwrap(), "\"above\"");
            let parsed: Direction = serde_json::from_str("\"below\"").unwrap();
            assert_eq!(parsed, Direction::Below);
        }
    }

    mod swipe_tests {
        use super::*;

        #[test]
        fn test_visible_child_needs_no_swipe() {
            let list = MockList::new(MockListConfig::default());
            let pointer = list.pointer();
            let flickable = Flickable::new(&list, &pointer).with_config(fast()).unwrap();
            let item = list.select_single(&Selector::object_name("item1")).unwrap().unwrap();

            assert_eq!(flickable.swipe_child_into_view(&item).unwrap(), 0);
            assert_eq!(list.drag_count(), 0);
        }

        #[test]
        fn test_swipe_uses_inset_band_and_slow_rate() {
            let list = MockList::new(MockListConfig::default());
            let pointer = list.pointer();
            let flickable = Flickable::new(&list, &pointer).with_config(fast()).unwrap();
            let chain = flickable.containers().unwrap();
            let view = list.global_rect().unwrap();

            flickable.swipe_to_show_more_below(&chain).unwrap();

            let drags = list.drags();
            assert_eq!(drags.len(), 1);
            let (from, to, rate) = drags[0];
            assert_eq!(from, Point::new(view.x + view.width / 2, view.bottom() - 5));
            assert_eq!(to, Point::new(view.x + view.width / 2, view.y + 5));
            assert_eq!(rate, 5);
        }

        #[test]
        fn test_swipe_above_at_top_fails_without_drag() {
            let list = MockList::new(MockListConfig::default());
            let pointer = list.pointer();
            let flickable = Flickable::new(&list, &pointer).with_config(fast()).unwrap();
            let chain = flickable.containers().unwrap();

            let err = flickable.swipe_to_show_more_above(&chain).unwrap_err();
            assert!(matches!(err, NavError::AlreadyAtTop));
            assert_eq!(list.drag_count(), 0);
        }

        #[test]
        fn test_swipe_below_at_bottom_fails_without_drag() {
            let list = MockList::new(MockListConfig::default());
            list.scroll_to_end();
            let pointer = list.pointer();
            let flickable = Flickable::new(&list, &pointer).with_config(fast()).unwrap();
            let chain = flickable.containers().unwrap();

            let err = flickable.swipe_to_show_more_below(&chain).unwrap_err();
            assert!(matches!(err, NavError::AlreadyAtBottom));
            assert_eq!(list.drag_count(), 0);
        }

        #[test]
        fn test_child_below_is_swiped_into_view() {
            let config = MockListConfig::default().with_cache_buffer(1000);
            let list = MockList::new(config);
            let pointer = list.pointer();
            let flickable = Flickable::new(&list, &pointer).with_config(fast()).unwrap();
            let item = list.select_single(&Selector::object_name("item9")).unwrap().unwrap();
            assert!(!flickable.is_child_visible(&item).unwrap());

            let swipes = flickable.swipe_child_into_view(&item).unwrap();

            assert!(swipes >= 1);
            assert!(flickable.is_child_visible(&item).unwrap());
            assert!(list.drags().iter().all(|(from, to, _)| to.y < from.y));
        }

        #[test]
        fn test_child_above_is_swiped_into_view() {
            let config = MockListConfig::default().with_cache_buffer(1000);
            let list = MockList::new(config);
            list.scroll_to_end();
            let pointer = list.pointer();
            let flickable = Flickable::new(&list, &pointer).with_config(fast()).unwrap();
            let item = list.select_single(&Selector::object_name("item4")).unwrap().unwrap();

            flickable.swipe_child_into_view(&item).unwrap();

            assert!(flickable.is_child_visible(&item).unwrap());
            assert!(list.drags().iter().all(|(from, to, _)| to.y > from.y));
        }

        #[test]
        fn test_swipe_to_top_and_bottom() {
            let list = MockList::new(MockListConfig::default());
            let pointer = list.pointer();
            let flickable = Flickable::new(&list, &pointer).with_config(fast()).unwrap();

            assert_eq!(flickable.swipe_to_top().unwrap(), 0);
            let down = flickable.swipe_to_bottom().unwrap();
            assert!(down > 0);
            assert!(list.at_y_end());
            let up = flickable.swipe_to_top().unwrap();
            assert_eq!(up, down);
            assert!(list.at_y_beginning());
        }

        #[test]
        fn test_settle_timeout() {
            let list = MockList::new(MockListConfig::default().with_stuck_moving(true));
            let pointer = list.pointer();
            let flickable = Flickable::new(&list, &pointer)
                .with_config(fast().with_settle_timeout(10))
                .unwrap();
            let chain = flickable.containers().unwrap();

            let err = flickable.swipe_to_show_more_below(&chain).unwrap_err();
            match err {
                NavError::Timeout { waited_for, ms } => {
                    assert_eq!(waited_for, "moving == false");
                    assert_eq!(ms, 10);
                }
                other => panic!("unexpected error: {other}"),
            }
        }

        #[test]
        fn test_narrow_band_fails_before_dragging() {
            let list = MockList::new(MockListConfig::default().with_window_height(38));
            let pointer = list.pointer();
            let flickable = Flickable::new(&list, &pointer)
                .with_config(fast().with_max_swipes(20))
                .unwrap();
            let item = list.select_single(&Selector::object_name("item3")).unwrap().unwrap();

            let err = flickable.swipe_child_into_view(&item).unwrap_err();
            assert!(matches!(
                err,
                NavError::BandTooNarrow {
                    top: 30,
                    bottom: 38,
                    inset: 5
                }
            ));
            assert_eq!(list.drag_count(), 0);
            assert_eq!(list.content_y(), 0);
        }

        #[test]
        fn test_band_just_wider_than_inset_drags_upwards() {
            let list = MockList::new(MockListConfig::default().with_window_height(41));
            let pointer = list.pointer();
            let flickable = Flickable::new(&list, &pointer).with_config(fast()).unwrap();
            let chain = flickable.containers().unwrap();

            flickable.swipe(Direction::Below, &chain).unwrap();
            let (from, to, _) = list.drags()[0];
            assert_eq!((from.y, to.y), (36, 35));
            assert_eq!(list.content_y(), 1);
        }

        #[test]
        fn test_swipe_limit() {
            let list = MockList::new(MockListConfig::default());
            let pointer = list.pointer();
            let flickable = Flickable::new(&list, &pointer)
                .with_config(fast().with_max_swipes(1))
                .unwrap();

            let err = flickable.swipe_to_bottom().unwrap_err();
            assert!(matches!(
                err,
                NavError::SwipeLimitExceeded {
                    swipes: 1,
                    direction: Direction::Below,
                    ..
                }
            ));
        }

        #[test]
        fn test_invalid_config_rejected() {
            let list = MockList::new(MockListConfig::default());
            let pointer = list.pointer();
            let result = Flickable::new(&list, &pointer)
                .with_config(NavigatorConfig::new().with_drag_rate(0));
            assert!(result.is_err());
        }
    }
}
