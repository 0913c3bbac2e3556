pub mod command;
pub mod config;
pub mod container;
pub mod dom;
pub mod error;
pub mod host;
pub mod scroller;
pub mod visibility;
pub mod watcher;

pub use command::{bottom_offset, scroll, scroll_to_bottom, scroll_to_top};
pub use config::WatchConfig;
pub use container::{
    body_scroll_height, is_scrollable_overflow, scroll_container, scroll_position, scroll_region,
    sticky_top, sticky_top_with, STICKY_HEADER_ATTRIBUTE,
};
pub use dom::{MemoryDocument, NodeId, ScrollCommand};
pub use error::{Error, Result};
pub use host::{
    Geometry, Host, Listener, ListenerControl, ListenerId, ListenerOptions, ScrollBehavior,
    ScrollRegion, ScrollToOptions, ViewportMetrics,
};
pub use scroller::Scroller;
pub use visibility::{is_bottom_visible, is_top_visible, DEFAULT_MARGIN};
pub use watcher::{
    on_scroll_bottom, on_scroll_top, watch_bottom, watch_top, Subscription, WatchParams,
    WatchState,
};
