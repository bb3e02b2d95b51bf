//! Locating and clicking elements of a virtualized list.
//!
//! A list view only instantiates delegates near its viewport, so a plain
//! lookup misses elements that are far away. [`ListView::find_element`]
//! scrolls through the list, looking the element up before every swipe,
//! until it appears or the list reports its boundary.

use crate::config::NavigatorConfig;
use crate::element::{HasRect, PointingDevice, ScrollableView, TreeNode};
use crate::navigator::{Direction, Flickable};
use crate::result::{NavError, NavResult};
use crate::selector::Selector;

/// Type name of the item holding a list's delegates
pub const CONTENT_ITEM_TYPE: &str = "QQuickItem";

/// Search strategies for list views, layered on [`Flickable`]
#[derive(Debug)]
pub struct ListView<'a, V, P> {
    flickable: Flickable<'a, V, P>,
}

impl<'a, V, P> ListView<'a, V, P>
where
    V: ScrollableView,
    P: PointingDevice,
{
    /// List helper with default configuration
    pub fn new(view: &'a V, pointer: &'a P) -> Self {
        Self {
            flickable: Flickable::new(view, pointer),
        }
    }

    /// Replace the configuration after validating it
    pub fn with_config(self, config: NavigatorConfig) -> NavResult<Self> {
        Ok(Self {
            flickable: self.flickable.with_config(config)?,
        })
    }

    /// The underlying flickable navigator
    pub const fn flickable(&self) -> &Flickable<'a, V, P> {
        &self.flickable
    }

    /// Click an element of the list, swiping it into view first.
    ///
    /// `direction` says where the element is when the caller knows it;
    /// `None` searches the whole list from the top.
    pub fn click_element(
        &self,
        selector: &Selector,
        direction: Option<Direction>,
    ) -> NavResult<V::Element> {
        let _span = tracing::info_span!("click_element", %selector).entered();
        let element = match self.flickable.view().select_single(selector)? {
            Some(element) => element,
            // Not instantiated yet; search the list for it.
            None => self.find_element(selector, direction)?,
        };
        self.flickable.swipe_child_into_view(&element)?;
        self.flickable.pointer().click_object(&element)?;
        tracing::info!(element = %element.describe(), "clicked");
        Ok(element)
    }

    /// Scroll through the list until an element matches `selector`.
    ///
    /// Without a direction hint the list is first swiped to the top and
    /// searched downwards. The lookup happens before every swipe, so an
    /// element on the current page is returned without swiping.
    pub fn find_element(
        &self,
        selector: &Selector,
        direction: Option<Direction>,
    ) -> NavResult<V::Element> {
        let _span = tracing::info_span!("find_element", %selector).entered();
        let direction = match direction {
            Some(direction) => direction,
            None => {
                self.flickable.swipe_to_top()?;
                Direction::Below
            }
        };

        let view = self.flickable.view();
        let chain = self.flickable.containers()?;
        let mut swipes = 0;
        loop {
            if let Some(element) = view.select_single(selector)? {
                tracing::debug!(swipes, %direction, "element found");
                return Ok(element);
            }
            if self.flickable.at_boundary(direction) {
                break;
            }
            self.flickable
                .check_budget(swipes, "searching the list", direction)?;
            self.flickable.swipe_to_show_more(direction, &chain)?;
            swipes += 1;
        }

        tracing::warn!(swipes, %direction, "list exhausted");
        Err(NavError::ElementNotFound {
            selector: selector.to_string(),
            direction: Some(direction),
        })
    }

    /// Whether the element exists and its centre is visible
    pub fn is_element_clickable(&self, selector: &Selector) -> NavResult<bool> {
        let element = self
            .flickable
            .view()
            .select_single(selector)?
            .ok_or_else(|| NavError::ElementNotFound {
                selector: selector.to_string(),
                direction: None,
            })?;
        self.flickable.is_child_visible(&element)
    }

    /// The instantiated delegate closest to the top of the content
    pub fn first_item(&self) -> NavResult<V::Element> {
        let content = self
            .flickable
            .view()
            .children()?
            .into_iter()
            .find(|child| child.type_name() == CONTENT_ITEM_TYPE);
        let not_found = || NavError::ElementNotFound {
            selector: Selector::of_type(CONTENT_ITEM_TYPE).to_string(),
            direction: None,
        };
        content
            .ok_or_else(not_found)?
            .children()?
            .into_iter()
            .filter_map(|item| item.global_rect().map(|rect| (rect.y, item)))
            .min_by_key(|(y, _)| *y)
            .map(|(_, item)| item)
            .ok_or_else(not_found)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::element::HasBoundaryFlags;
    use crate::mock::{MockList, MockListConfig};

    fn fast() -> NavigatorConfig {
        NavigatorConfig::new()
            .with_poll_interval(1)
            .with_settle_timeout(200)
    }

    fn name(n: &str) -> Selector {
        Selector::object_name(n)
    }

    mod find_tests {
        use super::*;

        #[test]
        fn test_element_on_first_page_found_without_swiping() {
            let list = MockList::new(MockListConfig::default());
            let pointer = list.pointer();
            let helper = ListView::new(&list, &pointer).with_config(fast()).unwrap();

            let element = helper.find_element(&name("item2"), None).unwrap();
            assert_eq!(element.object_name().as_deref(), Some("item2"));
            assert_eq!(list.drag_count(), 0);
        }

        #[test]
        fn test_last_element_found_within_page_bound() {
            let list = MockList::new(MockListConfig::default());
            let pointer = list.pointer();
            let helper = ListView::new(&list, &pointer).with_config(fast()).unwrap();
            assert!(list.select_single(&name("item19")).unwrap().is_none());

            let element = helper.find_element(&name("item19"), None).unwrap();

            assert_eq!(element.object_name().as_deref(), Some("item19"));
            // 20 items, 4 per page
            assert!(list.drag_count() <= 5, "{} swipes", list.drag_count());
        }

        #[test]
        fn test_unexisting_element_exhausts_the_list() {
            let list = MockList::new(MockListConfig::default());
            let pointer = list.pointer();
            let helper = ListView::new(&list, &pointer).with_config(fast()).unwrap();

            let err = helper.find_element(&name("unexisting"), None).unwrap_err();

            assert_eq!(
                err.to_string(),
                "List element with objectName \"unexisting\" not found after swiping below."
            );
            assert!(list.at_y_end());
        }

        #[test]
        fn test_search_returns_to_top_first() {
            let list = MockList::new(MockListConfig::default());
            list.scroll_to_end();
            let pointer = list.pointer();
            let helper = ListView::new(&list, &pointer).with_config(fast()).unwrap();

            helper.find_element(&name("item0"), None).unwrap();

            assert!(list.at_y_beginning());
            assert!(list.drags().iter().all(|(from, to, _)| to.y > from.y));
        }

        #[test]
        fn test_direction_hint_skips_return_to_top() {
            let list = MockList::new(MockListConfig::default());
            list.scroll_to(400);
            let pointer = list.pointer();
            let helper = ListView::new(&list, &pointer).with_config(fast()).unwrap();

            helper.find_element(&name("item19"), Some(Direction::Below)).unwrap();
            assert!(list.drags().iter().all(|(from, to, _)| to.y < from.y));

            let above = helper.find_element(&name("item1"), Some(Direction::Above)).unwrap();
            assert_eq!(above.object_name().as_deref(), Some("item1"));
        }

        #[test]
        fn test_hinted_search_in_wrong_direction_fails() {
            let list = MockList::new(MockListConfig::default());
            let pointer = list.pointer();
            let helper = ListView::new(&list, &pointer).with_config(fast()).unwrap();

            let err = helper
                .find_element(&name("item19"), Some(Direction::Above))
                .unwrap_err();
            assert!(matches!(
                err,
                NavError::ElementNotFound {
                    direction: Some(Direction::Above),
                    ..
                }
            ));
            assert_eq!(list.drag_count(), 0);
        }
    }

    mod click_tests {
        use super::*;

        #[test]
        fn test_click_visible_element() {
            let list = MockList::new(MockListConfig::default());
            let pointer = list.pointer();
            let helper = ListView::new(&list, &pointer).with_config(fast()).unwrap();

            helper.click_element(&name("item0"), None).unwrap();
            assert_eq!(list.last_clicked().as_deref(), Some("item0"));
            assert_eq!(list.drag_count(), 0);
        }

        #[test]
        fn test_click_element_outside_view_below() {
            let list = MockList::new(MockListConfig::default().with_cache_buffer(100));
            let pointer = list.pointer();
            let helper = ListView::new(&list, &pointer).with_config(fast()).unwrap();
            assert!(!helper.is_element_clickable(&name("item5")).unwrap());

            helper.click_element(&name("item5"), None).unwrap();
            assert_eq!(list.last_clicked().as_deref(), Some("item5"));
        }

        #[test]
        fn test_click_element_outside_view_above() {
            let list = MockList::new(MockListConfig::default());
            let pointer = list.pointer();
            let helper = ListView::new(&list, &pointer).with_config(fast()).unwrap();

            helper.click_element(&name("item9"), None).unwrap();
            helper.click_element(&name("item4"), None).unwrap();
            assert_eq!(list.last_clicked().as_deref(), Some("item4"));
        }

        #[test]
        fn test_click_element_not_created_at_start() {
            let list = MockList::new(MockListConfig::default());
            let pointer = list.pointer();
            let helper = ListView::new(&list, &pointer).with_config(fast()).unwrap();

            helper.click_element(&name("item19"), None).unwrap();

            assert_eq!(list.last_clicked().as_deref(), Some("item19"));
            assert!(list.at_y_end());
        }

        #[test]
        fn test_no_swipe_down_after_element_from_first_page_found() {
            let list = MockList::new(MockListConfig::default());
            let pointer = list.pointer();
            let helper = ListView::new(&list, &pointer).with_config(fast()).unwrap();
            helper.click_element(&name("item19"), None).unwrap();
            assert!(list.select_single(&name("item1")).unwrap().is_none());

            let before = list.drag_count();
            helper.click_element(&name("item1"), None).unwrap();

            let new_drags = &list.drags()[before..];
            assert!(new_drags.iter().all(|(from, to, _)| to.y > from.y));
            assert_eq!(list.last_clicked().as_deref(), Some("item1"));
        }

        #[test]
        fn test_click_unexisting_element() {
            let list = MockList::new(MockListConfig::default());
            let pointer = list.pointer();
            let helper = ListView::new(&list, &pointer).with_config(fast()).unwrap();

            let err = helper.click_element(&name("unexisting"), None).unwrap_err();
            assert!(err.is_not_found());
            assert!(list.last_clicked().is_none());
        }

        #[test]
        fn test_click_when_list_extends_past_window() {
            // The window cuts the list in half, so swipes must stay inside
            // the window rather than the list.
            let config = MockListConfig::default()
                .with_visible_items(8)
                .with_window_height(230);
            let list = MockList::new(config);
            let pointer = list.pointer();
            let helper = ListView::new(&list, &pointer).with_config(fast()).unwrap();
            assert!(list.select_single(&name("item6")).unwrap().is_some());
            assert!(!helper.is_element_clickable(&name("item6")).unwrap());

            helper.click_element(&name("item6"), None).unwrap();

            assert_eq!(list.last_clicked().as_deref(), Some("item6"));
            assert!(list.drags().iter().all(|(from, _, _)| from.y <= 230));
        }
    }

    mod misc_tests {
        use super::*;

        #[test]
        fn test_is_element_clickable_requires_element() {
            let list = MockList::new(MockListConfig::default());
            let pointer = list.pointer();
            let helper = ListView::new(&list, &pointer);

            assert!(helper.is_element_clickable(&name("item0")).unwrap());
            let err = helper.is_element_clickable(&name("item15")).unwrap_err();
            assert_eq!(
                err.to_string(),
                "List element with objectName \"item15\" not found."
            );
        }

        #[test]
        fn test_first_item_is_topmost_delegate() {
            let list = MockList::new(MockListConfig::default());
            list.scroll_to(275);
            let pointer = list.pointer();
            let helper = ListView::new(&list, &pointer);

            let first = helper.first_item().unwrap();
            assert_eq!(first.object_name().as_deref(), Some("item5"));
        }
    }
}
