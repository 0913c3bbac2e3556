//! Scroll container resolution and the ancestor walks built on it
//!
//! Nothing here is cached: overflow and geometry can change between calls, so
//! every query walks the live tree again.

use crate::host::{Host, ScrollRegion};

/// Data attribute holding the height of a sticky header inside a container
pub const STICKY_HEADER_ATTRIBUTE: &str = "data-sticky-container-header-height";

/// Whether a computed overflow value lets the element scroll.
///
/// Per-axis values come through as two words (`"hidden scroll"`), so only the
/// last one is checked.
pub fn is_scrollable_overflow(overflow: &str) -> bool {
    let overflow = overflow.trim_end();
    overflow.ends_with("scroll") || overflow.ends_with("auto")
}

/// Find the nearest element, starting at `node` itself, whose overflow
/// permits scrolling.
///
/// Returns `None` when `node` is absent or the walk reaches the document
/// root, meaning the viewport is the scroll region.
pub fn scroll_container<H: Host>(host: &H, node: Option<H::Node>) -> Option<H::Node> {
    let mut current = node;
    while let Some(el) = current {
        if host.is_root(el) {
            break;
        }
        if is_scrollable_overflow(&host.overflow(el)) {
            tracing::trace!(node = ?el, "resolved scroll container");
            return Some(el);
        }
        current = host.parent(el);
    }
    None
}

/// The scroll region owning `node`: its container, or the viewport.
pub fn scroll_region<H: Host>(host: &H, node: Option<H::Node>) -> ScrollRegion<H::Node> {
    scroll_container(host, node).into()
}

/// Sum sticky header heights from `node` up to and including `container`.
///
/// `container` of `None` walks up to the root. A parentless node adds
/// nothing, and when `node` is the container itself `base` comes back as is.
/// Annotations are read from `attribute`; missing or unparsable values count
/// as zero.
pub fn sticky_top_with<H: Host>(
    host: &H,
    node: H::Node,
    container: Option<H::Node>,
    base: f64,
    attribute: &str,
) -> f64 {
    if Some(node) == container {
        return base;
    }

    let mut top = base;
    let mut current = node;
    loop {
        let Some(parent) = host.parent(current) else {
            return top;
        };
        top += sticky_height(host, current, attribute);
        if Some(current) == container {
            return top;
        }
        current = parent;
    }
}

/// [`sticky_top_with`] reading [`STICKY_HEADER_ATTRIBUTE`].
pub fn sticky_top<H: Host>(host: &H, node: H::Node, container: Option<H::Node>, base: f64) -> f64 {
    sticky_top_with(host, node, container, base, STICKY_HEADER_ATTRIBUTE)
}

fn sticky_height<H: Host>(host: &H, node: H::Node, attribute: &str) -> f64 {
    let Some(raw) = host.annotation(node, attribute) else {
        return 0.0;
    };
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            tracing::warn!(node = ?node, value = %raw, "Ignoring invalid sticky header height");
            0.0
        }
    }
}

/// Current scroll offset of the region owning `node`.
pub fn scroll_position<H: Host>(host: &H, node: Option<H::Node>) -> f64 {
    match scroll_container(host, node) {
        Some(container) => host.geometry(container).scroll_top,
        None => host.viewport().scroll_y,
    }
}

/// Full document height: the largest of the scroll, offset and client heights
/// of the body and the document element.
pub fn body_scroll_height<H: Host>(host: &H) -> f64 {
    [host.body(), host.document_element()]
        .into_iter()
        .flatten()
        .map(|node| host.geometry(node))
        .flat_map(|g| [g.scroll_height, g.offset_height, g.client_height])
        .fold(0.0, f64::max)
}
