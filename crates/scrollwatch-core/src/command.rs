//! Scroll commands routed to the region that actually scrolls

use crate::container::{scroll_region, sticky_top_with, STICKY_HEADER_ATTRIBUTE};
use crate::host::{Host, ScrollRegion, ScrollToOptions};

/// Forward `options` to the scroll region owning `node`.
pub fn scroll<H: Host>(host: &H, node: H::Node, options: ScrollToOptions) {
    let region = scroll_region(host, Some(node));
    tracing::debug!(?region, top = ?options.top, behavior = ?options.behavior, "scroll");
    host.scroll_to(region, &options);
}

/// Scroll `node`'s region to offset 0. Fields set in `options` take precedence.
pub fn scroll_to_top<H: Host>(host: &H, node: H::Node, options: ScrollToOptions) {
    scroll(host, node, ScrollToOptions::top(0.0).merge(options));
}

/// Scroll so the bottom of `node`'s content is in view.
///
/// `region` of `None` resolves the region from `node`. With `add_sticky` the
/// target is pushed down by the sticky headers between `node` and the
/// container. Fields set in `options` take precedence over the computed target.
pub fn scroll_to_bottom<H: Host>(
    host: &H,
    node: H::Node,
    options: ScrollToOptions,
    region: Option<ScrollRegion<H::Node>>,
    add_sticky: bool,
) {
    scroll_to_bottom_with(host, node, options, region, add_sticky, STICKY_HEADER_ATTRIBUTE);
}

pub(crate) fn scroll_to_bottom_with<H: Host>(
    host: &H,
    node: H::Node,
    options: ScrollToOptions,
    region: Option<ScrollRegion<H::Node>>,
    add_sticky: bool,
    sticky_attribute: &str,
) {
    let region = region.unwrap_or_else(|| scroll_region(host, Some(node)));
    let top = bottom_offset(host, node, region, add_sticky, sticky_attribute);
    tracing::debug!(?region, top, "scroll to bottom");
    host.scroll_to(region, &ScrollToOptions::top(top).merge(options));
}

/// Target offset that brings the bottom of `node` into view, never negative.
pub fn bottom_offset<H: Host>(
    host: &H,
    node: H::Node,
    region: ScrollRegion<H::Node>,
    add_sticky: bool,
    sticky_attribute: &str,
) -> f64 {
    let sticky = if add_sticky {
        sticky_top_with(host, node, region.container(), 0.0, sticky_attribute)
    } else {
        0.0
    };
    let visible_height = match region {
        ScrollRegion::Container(container) => host.geometry(container).client_height,
        ScrollRegion::Viewport => host.viewport().inner_height,
    };
    // f64::max maps NaN to the floor as well
    (host.geometry(node).scroll_height - visible_height + sticky).max(0.0)
}
