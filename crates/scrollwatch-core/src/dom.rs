//! In-memory document host
//!
//! An arena-backed element tree that implements [`Host`] without a rendering
//! engine. Overflow and geometry are plain values set by the caller, scroll
//! commands are applied instantly and logged, and scroll notifications are
//! delivered synchronously by [`MemoryDocument::dispatch_scroll`].
//!
//! All mutators take `&self` so the document can be driven while listeners
//! hold a borrow of it during dispatch.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::container::body_scroll_height;
use crate::host::{
    Geometry, Host, Listener, ListenerControl, ListenerId, ListenerOptions, ScrollRegion,
    ScrollToOptions, ViewportMetrics,
};

/// Index into the [`MemoryDocument`] node arena
pub type NodeId = usize;

/// A single element in the arena
#[derive(Debug, Clone)]
pub struct Node {
    pub tag: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Computed `overflow` value
    pub overflow: String,
    pub geometry: Geometry,
    pub attributes: Vec<(String, String)>,
}

impl Node {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            parent: None,
            children: Vec::new(),
            overflow: "visible".to_string(),
            geometry: Geometry::default(),
            attributes: Vec::new(),
        }
    }
}

struct Registration {
    id: ListenerId,
    options: ListenerOptions,
    // Taken out while the listener runs
    listener: Option<Listener<MemoryDocument>>,
}

/// A scroll command received through [`Host::scroll_to`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollCommand {
    pub region: ScrollRegion<NodeId>,
    pub options: ScrollToOptions,
}

pub struct MemoryDocument {
    nodes: RefCell<Vec<Node>>,
    root: NodeId,
    body: NodeId,
    viewport: Cell<ViewportMetrics>,
    listeners: RefCell<HashMap<ScrollRegion<NodeId>, Vec<Registration>>>,
    next_listener: Cell<u64>,
    commands: RefCell<Vec<ScrollCommand>>,
}

impl Default for MemoryDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryDocument {
    /// Create a document holding an `html` root with a single `body` child.
    pub fn new() -> Self {
        let mut root = Node::new("html");
        let mut body = Node::new("body");
        root.children.push(1);
        body.parent = Some(0);
        Self {
            nodes: RefCell::new(vec![root, body]),
            root: 0,
            body: 1,
            viewport: Cell::new(ViewportMetrics::default()),
            listeners: RefCell::new(HashMap::new()),
            next_listener: Cell::new(1),
            commands: RefCell::new(Vec::new()),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn body_node(&self) -> NodeId {
        self.body
    }

    /// Add a detached element to the arena.
    pub fn create_element(&self, tag: &str) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(Node::new(tag));
        nodes.len() - 1
    }

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    ///
    /// Appending a node under itself or one of its descendants would create
    /// a parent cycle; such calls are ignored.
    pub fn append_child(&self, parent: NodeId, child: NodeId) {
        if self.is_inclusive_ancestor(child, parent) {
            tracing::warn!(parent, child, "Refusing to append a node into its own subtree");
            return;
        }
        self.detach(child);
        let mut nodes = self.nodes.borrow_mut();
        nodes[parent].children.push(child);
        nodes[child].parent = Some(parent);
    }

    /// Shorthand for `create_element` followed by `append_child`.
    pub fn append_element(&self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.create_element(tag);
        self.append_child(parent, id);
        id
    }

    /// Remove `child` (and its subtree) from the tree. The nodes stay in the
    /// arena and can be appended again.
    pub fn remove_child(&self, parent: NodeId, child: NodeId) {
        let mut nodes = self.nodes.borrow_mut();
        if nodes[child].parent != Some(parent) {
            return;
        }
        nodes[parent].children.retain(|&c| c != child);
        nodes[child].parent = None;
    }

    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = nodes[id].parent;
        }
        false
    }

    fn detach(&self, child: NodeId) {
        let parent = self.nodes.borrow()[child].parent;
        if let Some(parent) = parent {
            self.remove_child(parent, child);
        }
    }

    pub fn tag(&self, node: NodeId) -> String {
        self.nodes.borrow()[node].tag.clone()
    }

    pub fn set_overflow(&self, node: NodeId, overflow: &str) {
        self.nodes.borrow_mut()[node].overflow = overflow.to_string();
    }

    pub fn set_geometry(&self, node: NodeId, geometry: Geometry) {
        self.nodes.borrow_mut()[node].geometry = geometry;
    }

    /// Move a container without issuing a command or notification.
    pub fn set_scroll_top(&self, node: NodeId, scroll_top: f64) {
        self.nodes.borrow_mut()[node].geometry.scroll_top = scroll_top;
    }

    pub fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        let mut nodes = self.nodes.borrow_mut();
        let attributes = &mut nodes[node].attributes;
        match attributes.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => attributes.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attribute(&self, node: NodeId, name: &str) {
        self.nodes.borrow_mut()[node]
            .attributes
            .retain(|(n, _)| n != name);
    }

    pub fn set_viewport(&self, viewport: ViewportMetrics) {
        self.viewport.set(viewport);
    }

    /// Move the viewport without issuing a command or notification.
    pub fn set_viewport_scroll(&self, scroll_y: f64) {
        let mut viewport = self.viewport.get();
        viewport.scroll_y = scroll_y;
        self.viewport.set(viewport);
    }

    /// Number of listeners currently registered on `region`.
    pub fn listener_count(&self, region: ScrollRegion<NodeId>) -> usize {
        self.listeners
            .borrow()
            .get(&region)
            .map_or(0, |regs| regs.len())
    }

    /// Options the listener `id` was registered with, if it is still attached.
    pub fn listener_options(
        &self,
        region: ScrollRegion<NodeId>,
        id: ListenerId,
    ) -> Option<ListenerOptions> {
        self.listeners
            .borrow()
            .get(&region)?
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.options)
    }

    /// Every scroll command received so far, oldest first.
    pub fn commands(&self) -> Vec<ScrollCommand> {
        self.commands.borrow().clone()
    }

    pub fn last_command(&self) -> Option<ScrollCommand> {
        self.commands.borrow().last().copied()
    }

    /// Deliver one scroll notification to the listeners of `region`.
    ///
    /// Listeners run in registration order. Listeners registered while the
    /// dispatch is running are first called on the next notification, while
    /// a listener removed by an earlier one in the same cycle is skipped.
    pub fn dispatch_scroll(&self, region: ScrollRegion<NodeId>) {
        let ids: Vec<ListenerId> = match self.listeners.borrow().get(&region) {
            Some(regs) => regs.iter().map(|r| r.id).collect(),
            None => return,
        };
        tracing::trace!(?region, listeners = ids.len(), "dispatching scroll");

        for id in ids {
            let listener = self
                .listeners
                .borrow_mut()
                .get_mut(&region)
                .and_then(|regs| regs.iter_mut().find(|r| r.id == id))
                .and_then(|r| r.listener.take());
            // Removed by an earlier listener in this cycle
            let Some(mut listener) = listener else {
                continue;
            };

            let control = listener(self);

            let mut listeners = self.listeners.borrow_mut();
            let Some(regs) = listeners.get_mut(&region) else {
                continue;
            };
            // A listener that removed itself while running is already gone
            if let Some(pos) = regs.iter().position(|r| r.id == id) {
                match control {
                    ListenerControl::Keep => regs[pos].listener = Some(listener),
                    ListenerControl::Remove => {
                        regs.remove(pos);
                    }
                }
            }
        }
    }

    fn max_scroll(&self, region: ScrollRegion<NodeId>) -> f64 {
        match region {
            ScrollRegion::Container(node) => {
                let g = self.nodes.borrow()[node].geometry;
                (g.scroll_height - g.client_height).max(0.0)
            }
            ScrollRegion::Viewport => {
                let document_height = body_scroll_height(self);
                // Unscripted document height: only the lower bound applies
                if document_height <= 0.0 {
                    return f64::INFINITY;
                }
                (document_height - self.viewport.get().inner_height).max(0.0)
            }
        }
    }
}

impl Host for MemoryDocument {
    type Node = NodeId;

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow()[node].parent
    }

    fn is_root(&self, node: NodeId) -> bool {
        node == self.root
    }

    fn overflow(&self, node: NodeId) -> String {
        self.nodes.borrow()[node].overflow.clone()
    }

    fn geometry(&self, node: NodeId) -> Geometry {
        self.nodes.borrow()[node].geometry
    }

    fn viewport(&self) -> ViewportMetrics {
        self.viewport.get()
    }

    fn is_connected(&self, node: NodeId) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = Some(node);
        while let Some(id) = current {
            if id == self.body {
                return true;
            }
            current = nodes[id].parent;
        }
        false
    }

    fn annotation(&self, node: NodeId, key: &str) -> Option<String> {
        self.nodes.borrow()[node]
            .attributes
            .iter()
            .find(|(n, _)| n == key)
            .map(|(_, v)| v.clone())
    }

    fn body(&self) -> Option<NodeId> {
        Some(self.body)
    }

    fn document_element(&self) -> Option<NodeId> {
        Some(self.root)
    }

    fn add_scroll_listener(
        &self,
        region: ScrollRegion<NodeId>,
        options: ListenerOptions,
        listener: Listener<Self>,
    ) -> ListenerId {
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners
            .borrow_mut()
            .entry(region)
            .or_default()
            .push(Registration {
                id,
                options,
                listener: Some(listener),
            });
        id
    }

    fn remove_scroll_listener(&self, region: ScrollRegion<NodeId>, id: ListenerId) {
        let mut listeners = self.listeners.borrow_mut();
        if let Some(regs) = listeners.get_mut(&region) {
            regs.retain(|r| r.id != id);
            if regs.is_empty() {
                listeners.remove(&region);
            }
        }
    }

    /// Applies `top` instantly and notifies the region if it moved. Containers
    /// clamp to `[0, scrollHeight - clientHeight]`. The viewport clamps to the
    /// document height from [`body_scroll_height`], or only at 0 while that
    /// height is unset.
    fn scroll_to(&self, region: ScrollRegion<NodeId>, options: &ScrollToOptions) {
        self.commands.borrow_mut().push(ScrollCommand {
            region,
            options: *options,
        });

        let Some(top) = options.top else {
            return;
        };
        let target = top.clamp(0.0, self.max_scroll(region));
        let moved = match region {
            ScrollRegion::Container(node) => {
                let mut nodes = self.nodes.borrow_mut();
                let geometry = &mut nodes[node].geometry;
                let moved = geometry.scroll_top != target;
                geometry.scroll_top = target;
                moved
            }
            ScrollRegion::Viewport => {
                let moved = self.viewport.get().scroll_y != target;
                self.set_viewport_scroll(target);
                moved
            }
        };

        if moved {
            self.dispatch_scroll(region);
        }
    }
}
