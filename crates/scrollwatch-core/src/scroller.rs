//! Host-bound facade applying a [`WatchConfig`]

use crate::command::{self, scroll_to_bottom_with};
use crate::config::WatchConfig;
use crate::container::{self, scroll_container, scroll_position, scroll_region, sticky_top_with};
use crate::host::{Host, ScrollRegion, ScrollToOptions};
use crate::visibility;
use crate::watcher::{watch_bottom, watch_top, Subscription};

/// Scroll helpers bound to one host, with margin, sticky attribute and
/// behavior defaults taken from a [`WatchConfig`].
pub struct Scroller<'h, H: Host> {
    host: &'h H,
    config: WatchConfig,
}

impl<'h, H: Host> Scroller<'h, H> {
    pub fn new(host: &'h H) -> Self {
        Self::with_config(host, WatchConfig::default())
    }

    pub fn with_config(host: &'h H, config: WatchConfig) -> Self {
        Self { host, config }
    }

    pub fn host(&self) -> &'h H {
        self.host
    }

    pub fn config(&self) -> &WatchConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: WatchConfig) {
        self.config = config;
    }

    pub fn container(&self, node: H::Node) -> Option<H::Node> {
        scroll_container(self.host, Some(node))
    }

    pub fn region(&self, node: H::Node) -> ScrollRegion<H::Node> {
        scroll_region(self.host, Some(node))
    }

    /// Sticky header height between `node` and `container`
    pub fn sticky_top(&self, node: H::Node, container: Option<H::Node>) -> f64 {
        sticky_top_with(self.host, node, container, 0.0, &self.config.sticky_attribute)
    }

    pub fn position(&self, node: H::Node) -> f64 {
        scroll_position(self.host, Some(node))
    }

    pub fn body_scroll_height(&self) -> f64 {
        container::body_scroll_height(self.host)
    }

    pub fn is_top_visible(&self, node: H::Node) -> bool {
        visibility::is_top_visible(self.host, node, self.config.margin)
    }

    pub fn is_bottom_visible(&self, node: H::Node, region: Option<ScrollRegion<H::Node>>) -> bool {
        visibility::is_bottom_visible(self.host, node, self.config.margin, region)
    }

    pub fn scroll(&self, node: H::Node, options: ScrollToOptions) {
        command::scroll(self.host, node, self.apply_behavior(options));
    }

    pub fn scroll_to_top(&self, node: H::Node, options: ScrollToOptions) {
        command::scroll_to_top(self.host, node, self.apply_behavior(options));
    }

    /// Scroll to the bottom of `node`, honoring `add_sticky` from the config.
    pub fn scroll_to_bottom(
        &self,
        node: H::Node,
        options: ScrollToOptions,
        region: Option<ScrollRegion<H::Node>>,
    ) {
        scroll_to_bottom_with(
            self.host,
            node,
            self.apply_behavior(options),
            region,
            self.config.add_sticky,
            &self.config.sticky_attribute,
        );
    }

    fn apply_behavior(&self, mut options: ScrollToOptions) -> ScrollToOptions {
        if options.behavior.is_none() {
            options.behavior = self.config.behavior;
        }
        options
    }
}

impl<'h, H: Host + 'static> Scroller<'h, H> {
    pub fn on_scroll_top<F>(&self, node: H::Node, callback: F) -> Subscription<H::Node>
    where
        F: FnOnce() + 'static,
    {
        watch_top(self.host, node, self.config.watch_params(), callback)
    }

    pub fn on_scroll_bottom<F>(&self, node: H::Node, callback: F) -> Subscription<H::Node>
    where
        F: FnOnce() + 'static,
    {
        watch_bottom(self.host, node, self.config.watch_params(), callback)
    }

    /// Detach a watcher created through this scroller.
    pub fn cancel(&self, subscription: &Subscription<H::Node>) {
        subscription.cancel(self.host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::MemoryDocument;
    use crate::host::{Geometry, ScrollBehavior};
    use crate::watcher::WatchState;
    use std::cell::Cell;
    use std::rc::Rc;

    fn chat_log(doc: &MemoryDocument) -> (crate::NodeId, crate::NodeId) {
        let log = doc.append_element(doc.body_node(), "div");
        doc.set_overflow(log, "hidden scroll");
        doc.set_geometry(
            log,
            Geometry {
                scroll_height: 1000.0,
                client_height: 400.0,
                offset_height: 400.0,
                ..Default::default()
            },
        );
        doc.set_attribute(log, "data-header", "40");
        let messages = doc.append_element(log, "div");
        doc.set_geometry(
            messages,
            Geometry {
                scroll_height: 1000.0,
                ..Default::default()
            },
        );
        (log, messages)
    }

    #[test]
    fn test_config_behavior_applies_when_unset() {
        let doc = MemoryDocument::new();
        let (_log, messages) = chat_log(&doc);
        let config = WatchConfig {
            behavior: Some(ScrollBehavior::Smooth),
            ..Default::default()
        };
        let scroller = Scroller::with_config(&doc, config);

        scroller.scroll_to_top(messages, ScrollToOptions::new());
        assert_eq!(
            doc.last_command().and_then(|c| c.options.behavior),
            Some(ScrollBehavior::Smooth)
        );

        scroller.scroll(
            messages,
            ScrollToOptions::top(10.0).with_behavior(ScrollBehavior::Instant),
        );
        assert_eq!(
            doc.last_command().and_then(|c| c.options.behavior),
            Some(ScrollBehavior::Instant)
        );
    }

    #[test]
    fn test_scroll_to_bottom_uses_configured_attribute() {
        let doc = MemoryDocument::new();
        let (log, messages) = chat_log(&doc);
        let scroller = Scroller::with_config(
            &doc,
            WatchConfig {
                sticky_attribute: "data-header".to_string(),
                ..Default::default()
            },
        );

        assert_eq!(scroller.sticky_top(messages, Some(log)), 40.0);
        scroller.scroll_to_bottom(messages, ScrollToOptions::new(), None);
        assert_eq!(doc.last_command().and_then(|c| c.options.top), Some(640.0));

        let mut scroller = scroller;
        scroller.set_config(WatchConfig {
            add_sticky: false,
            ..Default::default()
        });
        scroller.scroll_to_bottom(messages, ScrollToOptions::new(), None);
        assert_eq!(doc.last_command().and_then(|c| c.options.top), Some(600.0));
    }

    #[test]
    fn test_load_more_flow() {
        let doc = MemoryDocument::new();
        let (log, messages) = chat_log(&doc);
        let scroller = Scroller::new(&doc);
        assert_eq!(scroller.container(messages), Some(log));
        assert!(!scroller.is_bottom_visible(messages, None));

        let loads = Rc::new(Cell::new(0));
        let counter = loads.clone();
        let sub = scroller.on_scroll_bottom(messages, move || counter.set(counter.get() + 1));
        assert!(sub.is_armed());

        scroller.scroll_to_bottom(messages, ScrollToOptions::new(), None);
        assert_eq!(scroller.position(messages), 600.0);
        assert_eq!(loads.get(), 1);
        assert_eq!(sub.state(), WatchState::Fired);

        let top = scroller.on_scroll_top(messages, || {});
        assert!(top.is_armed());
        scroller.cancel(&top);
        assert_eq!(top.state(), WatchState::Cancelled);
        assert_eq!(doc.listener_count(scroller.region(messages)), 0);
    }
}
