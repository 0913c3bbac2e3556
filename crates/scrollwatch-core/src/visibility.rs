//! Edge visibility checks with a tolerance margin for sub-pixel rounding

use crate::container::{scroll_container, scroll_position};
use crate::host::{Host, ScrollRegion};

/// Default tolerance, in pixels
pub const DEFAULT_MARGIN: f64 = 1.0;

/// Whether the region owning `node` is scrolled to (within `margin` of) the top.
pub fn is_top_visible<H: Host>(host: &H, node: H::Node, margin: f64) -> bool {
    scroll_position(host, Some(node)) <= margin
}

/// Whether the bottom of `node`'s content is within view.
///
/// `region` of `None` resolves the region from `node`. The container offset
/// is taken as an absolute value so regions anchored to the bottom, which
/// report negative offsets, are handled too.
pub fn is_bottom_visible<H: Host>(
    host: &H,
    node: H::Node,
    margin: f64,
    region: Option<ScrollRegion<H::Node>>,
) -> bool {
    let region = region.unwrap_or_else(|| scroll_container(host, Some(node)).into());
    let content_height = host.geometry(node).scroll_height;
    match region {
        ScrollRegion::Container(container) => {
            let g = host.geometry(container);
            content_height <= g.client_height + g.scroll_top.abs() + margin
        }
        ScrollRegion::Viewport => {
            let viewport = host.viewport();
            content_height <= viewport.inner_height + viewport.scroll_y + margin
        }
    }
}
