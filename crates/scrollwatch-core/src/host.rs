//! Host environment contracts
//!
//! Everything this crate knows about the live document comes through the
//! [`Host`] trait: computed overflow, geometry, tree membership, sticky
//! annotations, scroll notifications and the scroll-to primitive. A browser
//! binding, a native widget tree or the in-memory [`crate::MemoryDocument`]
//! can all sit behind it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Scroll geometry of a single element, in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Geometry {
    /// Current vertical scroll offset
    pub scroll_top: f64,
    /// Full height of the content, including the part scrolled out of view
    pub scroll_height: f64,
    /// Height of the visible content box
    pub client_height: f64,
    /// Layout height including borders
    pub offset_height: f64,
}

/// Geometry of the top-level viewport
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewportMetrics {
    pub inner_height: f64,
    pub scroll_y: f64,
}

/// The element or viewport that owns scrollable overflow for some content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollRegion<N> {
    /// A scrollable ancestor element
    Container(N),
    /// The implicit top-level viewport
    Viewport,
}

impl<N: Copy> ScrollRegion<N> {
    pub fn container(&self) -> Option<N> {
        match self {
            Self::Container(node) => Some(*node),
            Self::Viewport => None,
        }
    }

    pub fn is_viewport(&self) -> bool {
        matches!(self, Self::Viewport)
    }
}

impl<N> From<Option<N>> for ScrollRegion<N> {
    fn from(container: Option<N>) -> Self {
        match container {
            Some(node) => Self::Container(node),
            None => Self::Viewport,
        }
    }
}

/// Behavior hint forwarded to the host's scroll primitive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrollBehavior {
    #[default]
    Auto,
    Instant,
    Smooth,
}

impl ScrollBehavior {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Instant => "instant",
            Self::Smooth => "smooth",
        }
    }
}

impl fmt::Display for ScrollBehavior {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of a scroll command. Unset fields leave that axis or hint to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollToOptions {
    pub top: Option<f64>,
    pub left: Option<f64>,
    pub behavior: Option<ScrollBehavior>,
}

impl ScrollToOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn top(top: f64) -> Self {
        Self {
            top: Some(top),
            ..Self::default()
        }
    }

    pub fn with_left(mut self, left: f64) -> Self {
        self.left = Some(left);
        self
    }

    pub fn with_behavior(mut self, behavior: ScrollBehavior) -> Self {
        self.behavior = Some(behavior);
        self
    }

    /// Layer `overrides` on top of `self`; every field set in `overrides` wins.
    pub fn merge(self, overrides: ScrollToOptions) -> Self {
        Self {
            top: overrides.top.or(self.top),
            left: overrides.left.or(self.left),
            behavior: overrides.behavior.or(self.behavior),
        }
    }
}

/// Registration options for scroll listeners
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerOptions {
    /// The listener never cancels or blocks the scroll it observes
    pub passive: bool,
}

impl ListenerOptions {
    pub fn passive() -> Self {
        Self { passive: true }
    }
}

impl Default for ListenerOptions {
    fn default() -> Self {
        Self::passive()
    }
}

/// Handle identifying one registered scroll listener
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// What a listener wants done with its registration after it ran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerControl {
    Keep,
    Remove,
}

/// A scroll notification listener. It receives the host so it can re-read
/// geometry without holding a reference of its own.
pub type Listener<H> = Box<dyn FnMut(&H) -> ListenerControl>;

/// Introspection, notification and command surface of the host environment
pub trait Host: Sized {
    /// Handle to an element in the host's tree
    type Node: Copy + Eq + fmt::Debug + 'static;

    fn parent(&self, node: Self::Node) -> Option<Self::Node>;

    /// Whether `node` is the document root (the `html` element)
    fn is_root(&self, node: Self::Node) -> bool;

    /// Computed `overflow` value, e.g. `"auto"` or `"hidden scroll"`
    fn overflow(&self, node: Self::Node) -> String;

    fn geometry(&self, node: Self::Node) -> Geometry;

    fn viewport(&self) -> ViewportMetrics;

    /// Whether `node` is currently part of the live document body
    fn is_connected(&self, node: Self::Node) -> bool;

    /// Raw value of an out-of-band attribute such as a `data-*` tag
    fn annotation(&self, node: Self::Node, key: &str) -> Option<String>;

    fn body(&self) -> Option<Self::Node>;

    fn document_element(&self) -> Option<Self::Node>;

    fn add_scroll_listener(
        &self,
        region: ScrollRegion<Self::Node>,
        options: ListenerOptions,
        listener: Listener<Self>,
    ) -> ListenerId;

    /// Detach a listener. Unknown or already removed ids are ignored.
    fn remove_scroll_listener(&self, region: ScrollRegion<Self::Node>, id: ListenerId);

    fn scroll_to(&self, region: ScrollRegion<Self::Node>, options: &ScrollToOptions);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_overrides_win() {
        let base = ScrollToOptions::top(0.0).with_behavior(ScrollBehavior::Instant);
        let merged = base.merge(ScrollToOptions::new().with_behavior(ScrollBehavior::Smooth));
        assert_eq!(merged.top, Some(0.0));
        assert_eq!(merged.behavior, Some(ScrollBehavior::Smooth));

        let merged = base.merge(ScrollToOptions::top(40.0));
        assert_eq!(merged.top, Some(40.0));
        assert_eq!(merged.behavior, Some(ScrollBehavior::Instant));
    }

    #[test]
    fn test_region_from_option() {
        assert_eq!(ScrollRegion::from(Some(3usize)), ScrollRegion::Container(3));
        assert_eq!(ScrollRegion::<usize>::from(None), ScrollRegion::Viewport);
        assert!(ScrollRegion::<usize>::Viewport.is_viewport());
        assert_eq!(ScrollRegion::Container(7usize).container(), Some(7));
    }

    #[test]
    fn test_listener_options_default_passive() {
        assert!(ListenerOptions::default().passive);
    }
}
