//! One-shot edge watchers
//!
//! `on_scroll_top` / `on_scroll_bottom` check their edge right away. If it is
//! already visible the callback runs synchronously; otherwise a passive
//! listener is attached to the element's scroll region and re-checks on every
//! notification until the edge shows up, fires the callback once and detaches.
//!
//! ```text
//! Unarmed --(visible now)--> Fired
//! Unarmed --(subscribe)----> Armed --(visible)--> Fired
//!                            Armed --(cancel)---> Cancelled
//! ```

use std::cell::Cell;
use std::rc::Rc;

use crate::container::scroll_region;
use crate::host::{Host, ListenerControl, ListenerId, ListenerOptions, ScrollRegion};
use crate::visibility::{is_bottom_visible, is_top_visible, DEFAULT_MARGIN};

/// Lifecycle of an edge watcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchState {
    /// Created, first evaluation not done yet
    Unarmed,
    /// Listener attached, waiting for the edge
    Armed,
    /// Callback ran; listener detached
    Fired,
    /// Cancelled before firing; listener detached
    Cancelled,
}

/// Tuning for a single watcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WatchParams {
    pub margin: f64,
    /// Detach instead of idling when a notification finds the element
    /// outside the document.
    pub release_detached: bool,
}

impl Default for WatchParams {
    fn default() -> Self {
        Self {
            margin: DEFAULT_MARGIN,
            release_detached: false,
        }
    }
}

/// Cancellation handle returned by the edge watchers.
///
/// Dropping it does not detach anything; call [`Subscription::cancel`] when
/// the watched element is torn down.
#[derive(Debug, Clone)]
pub struct Subscription<N> {
    state: Rc<Cell<WatchState>>,
    registration: Option<(ScrollRegion<N>, ListenerId)>,
}

impl<N: Copy> Subscription<N> {
    fn fired() -> Self {
        Self {
            state: Rc::new(Cell::new(WatchState::Fired)),
            registration: None,
        }
    }

    pub fn state(&self) -> WatchState {
        self.state.get()
    }

    /// Whether the listener is still waiting for its edge.
    pub fn is_armed(&self) -> bool {
        self.state.get() == WatchState::Armed
    }

    /// Region the listener was attached to, if one was attached at all
    pub fn region(&self) -> Option<ScrollRegion<N>> {
        self.registration.map(|(region, _)| region)
    }

    pub fn listener_id(&self) -> Option<ListenerId> {
        self.registration.map(|(_, id)| id)
    }

    /// Detach the listener. Safe to call any number of times, before or after
    /// the callback fired.
    pub fn cancel<H: Host<Node = N>>(&self, host: &H) {
        if self.state.get() == WatchState::Armed {
            self.state.set(WatchState::Cancelled);
            tracing::debug!("edge watcher cancelled");
        }
        if let Some((region, id)) = self.registration {
            host.remove_scroll_listener(region, id);
        }
    }
}

/// Run `callback` once the top of `node`'s scroll region is visible.
pub fn on_scroll_top<H, F>(host: &H, node: H::Node, callback: F) -> Subscription<H::Node>
where
    H: Host + 'static,
    F: FnOnce() + 'static,
{
    watch_top(host, node, WatchParams::default(), callback)
}

/// Run `callback` once the bottom of `node`'s content is visible.
pub fn on_scroll_bottom<H, F>(host: &H, node: H::Node, callback: F) -> Subscription<H::Node>
where
    H: Host + 'static,
    F: FnOnce() + 'static,
{
    watch_bottom(host, node, WatchParams::default(), callback)
}

/// [`on_scroll_top`] with explicit tuning.
pub fn watch_top<H, F>(
    host: &H,
    node: H::Node,
    params: WatchParams,
    callback: F,
) -> Subscription<H::Node>
where
    H: Host + 'static,
    F: FnOnce() + 'static,
{
    let margin = params.margin;
    // The region is re-resolved on every check
    let visible = move |host: &H| is_top_visible(host, node, margin);
    let region = scroll_region(host, Some(node));
    watch_edge(host, node, region, params, visible, callback)
}

/// [`on_scroll_bottom`] with explicit tuning.
pub fn watch_bottom<H, F>(
    host: &H,
    node: H::Node,
    params: WatchParams,
    callback: F,
) -> Subscription<H::Node>
where
    H: Host + 'static,
    F: FnOnce() + 'static,
{
    let margin = params.margin;
    // Resolved once and reused for every check
    let region = scroll_region(host, Some(node));
    let visible = move |host: &H| is_bottom_visible(host, node, margin, Some(region));
    watch_edge(host, node, region, params, visible, callback)
}

fn watch_edge<H, P, F>(
    host: &H,
    node: H::Node,
    region: ScrollRegion<H::Node>,
    params: WatchParams,
    visible: P,
    callback: F,
) -> Subscription<H::Node>
where
    H: Host + 'static,
    P: Fn(&H) -> bool + 'static,
    F: FnOnce() + 'static,
{
    if visible(host) {
        tracing::trace!(node = ?node, "edge already visible");
        callback();
        return Subscription::fired();
    }

    let state = Rc::new(Cell::new(WatchState::Unarmed));
    let listener_state = state.clone();
    let release_detached = params.release_detached;
    let mut callback = Some(callback);

    let listener = Box::new(move |host: &H| {
        if listener_state.get() != WatchState::Armed {
            return ListenerControl::Remove;
        }
        if !host.is_connected(node) {
            if release_detached {
                tracing::debug!(node = ?node, "watched element detached, releasing listener");
                listener_state.set(WatchState::Cancelled);
                return ListenerControl::Remove;
            }
            return ListenerControl::Keep;
        }
        if !visible(host) {
            return ListenerControl::Keep;
        }

        listener_state.set(WatchState::Fired);
        tracing::debug!(node = ?node, "edge became visible");
        if let Some(callback) = callback.take() {
            callback();
        }
        ListenerControl::Remove
    });

    let id = host.add_scroll_listener(region, ListenerOptions::passive(), listener);
    state.set(WatchState::Armed);
    tracing::debug!(node = ?node, ?region, ?id, "edge watcher armed");

    Subscription {
        state,
        registration: Some((region, id)),
    }
}
