//! Renderer
//!
//! Mounts elements into a node arena, reconciles later renders against the
//! mounted tree, and delivers context changes.
//!
//! Reconciliation matches children by position and kind: a slot whose kind
//! (tag name, component type, context token) is unchanged is patched in
//! place, anything else is unmounted and mounted fresh.
//!
//! Context reaches consumers over two channels. The ordinary top-down walk
//! hands every node the map that applies to it. When a provider's value
//! changes identity, the provider additionally walks its subscription ledger
//! and re-renders each subscribed consumer directly, so consumers below a
//! component that declined to update still see the new value.

use crate::config::RenderConfig;
use crate::context::{
    resolve, ConsumerState, Context, ContextMap, ProviderLookup, ProviderState, Resolution, Value,
};
use crate::error::TreeError;
use crate::tree::component::Component;
use crate::tree::element::Element;
use crate::tree::html;
use crate::tree::node::{ComponentSlot, Node, NodeKind};
use crate::types::NodeId;
use std::any::TypeId;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::{debug, instrument, trace, warn};

/// Counters accumulated across renders.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RenderStats {
    pub mounts: u64,
    pub unmounts: u64,
    pub component_renders: u64,
    /// Component updates suppressed by `should_update`.
    pub skipped_renders: u64,
    pub consumer_renders: u64,
    /// Consumer renders issued from a provider's ledger.
    pub forced_deliveries: u64,
}

/// What a freshly inserted node still needs.
enum Descend {
    Nothing,
    Children(Vec<Element>),
    RenderComponent,
    RenderConsumer,
}

pub struct Renderer {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
    config: RenderConfig,
    stats: RenderStats,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::with_config(RenderConfig::default())
    }

    pub fn with_config(config: RenderConfig) -> Self {
        let root = NodeId(0);
        let mut nodes = HashMap::new();
        nodes.insert(
            root,
            Node {
                id: root,
                parent: None,
                depth: 0,
                context: ContextMap::new(),
                children: Vec::new(),
                kind: NodeKind::Root,
            },
        );
        Self {
            nodes,
            root,
            next_id: 1,
            config,
            stats: RenderStats::default(),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn stats(&self) -> RenderStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = RenderStats::default();
    }

    /// Render `element` as the tree's single top-level child.
    ///
    /// The first call mounts; later calls reconcile against what is mounted.
    #[instrument(skip_all)]
    pub fn render(&mut self, element: Element) -> Result<(), TreeError> {
        let map = self.node(self.root)?.child_context();
        self.patch_children(self.root, vec![element], &map)
    }

    /// Tear down everything that is mounted.
    #[instrument(skip_all)]
    pub fn unmount(&mut self) -> Result<(), TreeError> {
        let children = std::mem::take(&mut self.node_mut(self.root)?.children);
        for child in children {
            self.unmount_node(child)?;
        }
        Ok(())
    }

    /// State-change request: mutate a mounted component and re-render it.
    ///
    /// The component's own `should_update` is not consulted; its descendants
    /// are reconciled normally.
    #[instrument(skip(self, update), fields(node = %id))]
    pub fn update_component<C, F>(&mut self, id: NodeId, update: F) -> Result<(), TreeError>
    where
        C: Component,
        F: FnOnce(&mut C),
    {
        let expected = std::any::type_name::<C>();
        let node = self.node_mut(id)?;
        let NodeKind::Component(slot) = &mut node.kind else {
            return Err(TreeError::ComponentMismatch { id, expected });
        };
        let component = slot
            .instance
            .as_any_mut()
            .downcast_mut::<C>()
            .ok_or(TreeError::ComponentMismatch { id, expected })?;
        update(component);
        self.render_component(id)
    }

    /// Serialize the mounted host output.
    pub fn to_html(&self) -> String {
        html::render_html(&self.nodes, self.root, self.config.escape_text)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id != self.root && self.nodes.contains_key(&id)
    }

    /// Number of mounted nodes, excluding the root.
    pub fn node_count(&self) -> usize {
        self.nodes.len() - 1
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, TreeError> {
        Ok(self.node(id)?.parent.filter(|parent| *parent != self.root))
    }

    pub fn component<C: Component>(&self, id: NodeId) -> Result<&C, TreeError> {
        let expected = std::any::type_name::<C>();
        match &self.node(id)?.kind {
            NodeKind::Component(slot) => slot
                .instance
                .as_any()
                .downcast_ref::<C>()
                .ok_or(TreeError::ComponentMismatch { id, expected }),
            _ => Err(TreeError::ComponentMismatch { id, expected }),
        }
    }

    /// First mounted component of type `C`, in document order.
    pub fn find_component<C: Component>(&self) -> Option<NodeId> {
        self.find_components::<C>().into_iter().next()
    }

    /// All mounted components of type `C`, in document order.
    pub fn find_components<C: Component>(&self) -> Vec<NodeId> {
        let wanted = TypeId::of::<C>();
        self.collect(|node| matches!(&node.kind, NodeKind::Component(slot) if slot.type_id == wanted))
    }

    /// Mounted providers for `context`, in document order.
    pub fn providers_of<T: 'static>(&self, context: &Context<T>) -> Vec<NodeId> {
        let wanted = context.id();
        self.collect(|node| matches!(&node.kind, NodeKind::Provider(state) if state.context() == wanted))
    }

    /// Mounted consumers for `context`, in document order.
    pub fn consumers_of<T: 'static>(&self, context: &Context<T>) -> Vec<NodeId> {
        let wanted = context.id();
        self.collect(|node| matches!(&node.kind, NodeKind::Consumer(state) if state.context() == wanted))
    }

    /// Current ledger of a provider, in subscription order.
    pub fn subscribers(&self, provider: NodeId) -> Result<Vec<NodeId>, TreeError> {
        match &self.node(provider)?.kind {
            NodeKind::Provider(state) => Ok(state.ledger().snapshot()),
            _ => Err(TreeError::NotAProvider(provider)),
        }
    }

    /// Provider a consumer is currently subscribed to; `None` means default.
    pub fn subscription(&self, consumer: NodeId) -> Result<Option<NodeId>, TreeError> {
        match &self.node(consumer)?.kind {
            NodeKind::Consumer(state) => Ok(state.provider()),
            _ => Err(TreeError::NotAConsumer(consumer)),
        }
    }

    /// Value of `context` visible at `id`: the nearest strict ancestor
    /// provider's value, or the default.
    pub fn context_value<T: 'static>(&self, id: NodeId, context: &Context<T>) -> Result<Rc<T>, TreeError> {
        let node = self.node(id)?;
        let default: Value = Rc::clone(context.default_value()) as Value;
        let resolution = resolve(context.id(), &default, &node.context, self);
        Ok(context.typed(resolution.value))
    }

    fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.nodes.get(&id).ok_or(TreeError::NodeNotFound(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.nodes.get_mut(&id).ok_or(TreeError::NodeNotFound(id))
    }

    fn provider_mut(&mut self, id: NodeId) -> Option<&mut ProviderState> {
        match self.nodes.get_mut(&id).map(|node| &mut node.kind) {
            Some(NodeKind::Provider(state)) => Some(state),
            _ => None,
        }
    }

    fn allocate(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn collect<P>(&self, predicate: P) -> Vec<NodeId>
    where
        P: Fn(&Node) -> bool,
    {
        let mut found = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if predicate(node) {
                found.push(id);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        found
    }

    fn patch_children(
        &mut self,
        parent: NodeId,
        elements: Vec<Element>,
        map: &ContextMap,
    ) -> Result<(), TreeError> {
        let old = self.node(parent)?.children.clone();
        let mut next = Vec::with_capacity(elements.len());
        let mut old = old.into_iter();
        let mut elements = elements.into_iter();

        let outcome = loop {
            match (old.next(), elements.next()) {
                (Some(id), Some(element)) => match self.patch(parent, id, element, map) {
                    Ok(id) => next.push(id),
                    Err(err) => {
                        // A failed patch may or may not have replaced the slot.
                        if self.nodes.contains_key(&id) {
                            next.push(id);
                        }
                        break Err(err);
                    }
                },
                (Some(id), None) => {
                    if let Err(err) = self.unmount_node(id) {
                        break Err(err);
                    }
                }
                (None, Some(element)) => match self.mount(parent, element, map) {
                    Ok(id) => next.push(id),
                    Err(err) => break Err(err),
                },
                (None, None) => break Ok(()),
            }
        };

        // Every surviving node stays attached, so a failed pass leaves a
        // tree the next render can still reconcile or tear down.
        next.extend(old);
        self.node_mut(parent)?.children = next;
        outcome
    }

    fn mount(&mut self, parent: NodeId, element: Element, map: &ContextMap) -> Result<NodeId, TreeError> {
        let depth = self.node(parent)?.depth + 1;
        if depth > self.config.max_depth {
            warn!(limit = self.config.max_depth, "Render depth limit reached");
            return Err(TreeError::DepthExceeded {
                limit: self.config.max_depth,
            });
        }

        let id = self.allocate();
        let (kind, descend) = match element {
            Element::Empty => (NodeKind::Empty, Descend::Nothing),
            Element::Text(text) => (NodeKind::Text(text), Descend::Nothing),
            Element::Tag(tag) => (
                NodeKind::Tag {
                    name: tag.name,
                    attrs: tag.attrs,
                },
                Descend::Children(tag.children),
            ),
            Element::Fragment(children) => (NodeKind::Fragment, Descend::Children(children)),
            Element::Component(element) => {
                let instance = (element.mount)(element.props).ok_or(TreeError::ComponentMismatch {
                    id,
                    expected: element.name,
                })?;
                let slot = ComponentSlot {
                    type_id: element.type_id,
                    name: element.name,
                    instance,
                };
                (NodeKind::Component(slot), Descend::RenderComponent)
            }
            Element::Provider(element) => {
                let state = ProviderState::new(element.context, element.name, element.value);
                (NodeKind::Provider(state), Descend::Children(element.children))
            }
            Element::Consumer(element) => (
                NodeKind::Consumer(ConsumerState::new(element)),
                Descend::RenderConsumer,
            ),
        };

        let node = Node {
            id,
            parent: Some(parent),
            depth,
            context: map.clone(),
            children: Vec::new(),
            kind,
        };
        trace!(node = %id, parent = %parent, kind = node.kind_name(), "Mounting node");
        self.nodes.insert(id, node);
        self.stats.mounts += 1;

        let descended = match descend {
            Descend::Nothing => Ok(()),
            Descend::Children(children) => {
                let child_map = self.node(id)?.child_context();
                self.patch_children(id, children, &child_map)
            }
            Descend::RenderComponent => self.render_component(id),
            Descend::RenderConsumer => self.render_consumer(id),
        };

        // A half-mounted node is never attached to its parent.
        if let Err(err) = descended {
            self.unmount_node(id)?;
            return Err(err);
        }
        Ok(id)
    }

    /// Reconcile one mounted node against a new element. Returns the id that
    /// now occupies the slot.
    fn patch(
        &mut self,
        parent: NodeId,
        id: NodeId,
        element: Element,
        map: &ContextMap,
    ) -> Result<NodeId, TreeError> {
        let node = self.node_mut(id)?;
        node.context = map.clone();

        match (&mut node.kind, element) {
            (NodeKind::Empty, Element::Empty) => Ok(id),
            (NodeKind::Text(text), Element::Text(next)) => {
                if *text != next {
                    *text = next;
                }
                Ok(id)
            }
            (NodeKind::Tag { name, attrs }, Element::Tag(tag)) if *name == tag.name => {
                *attrs = tag.attrs;
                self.patch_children(id, tag.children, map)?;
                Ok(id)
            }
            (NodeKind::Fragment, Element::Fragment(children)) => {
                self.patch_children(id, children, map)?;
                Ok(id)
            }
            (NodeKind::Component(slot), Element::Component(next)) if slot.type_id == next.type_id => {
                let update = slot.instance.should_update(&*next.props);
                slot.instance.set_props(next.props);
                if update {
                    self.render_component(id)?;
                } else {
                    self.stats.skipped_renders += 1;
                    trace!(node = %id, component = next.name, "Component declined update");
                }
                Ok(id)
            }
            (NodeKind::Provider(state), Element::Provider(next)) if state.context() == next.context => {
                let changed = state.set_value(next.value);
                let child_map = state.child_context(id, map);
                if changed {
                    debug!(provider = %id, context = %state.label(), "Provider value changed");
                }
                self.patch_children(id, next.children, &child_map)?;
                if changed {
                    self.deliver(id)?;
                }
                Ok(id)
            }
            (NodeKind::Consumer(state), Element::Consumer(next)) if state.context() == next.context => {
                state.receive(next);
                self.render_consumer(id)?;
                Ok(id)
            }
            (_, element) => {
                self.unmount_node(id)?;
                self.mount(parent, element, map)
            }
        }
    }

    fn render_component(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        let map = node.child_context();
        let NodeKind::Component(slot) = &mut node.kind else {
            return Err(TreeError::ComponentMismatch {
                id,
                expected: "component",
            });
        };
        let name = slot.name;
        let element = slot.instance.render();
        self.stats.component_renders += 1;
        trace!(node = %id, component = name, "Rendered component");
        self.patch_children(id, vec![element], &map)
    }

    /// Resolve, (re)subscribe, and run a consumer's render function once.
    fn render_consumer(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node(id)?;
        let NodeKind::Consumer(state) = &node.kind else {
            return Err(TreeError::NotAConsumer(id));
        };
        let previous = state.provider();
        let Resolution { provider, value } =
            resolve(state.context(), state.default_value(), &node.context, &*self);

        if previous != provider {
            if let Some(old) = previous {
                self.unsubscribe(old, id);
            }
            if let Some(new) = provider {
                self.subscribe(new, id);
            }
        }

        let node = self.node_mut(id)?;
        let map = node.child_context();
        let NodeKind::Consumer(state) = &mut node.kind else {
            return Err(TreeError::NotAConsumer(id));
        };
        state.set_provider(provider);
        let element = state.invoke(value);
        self.stats.consumer_renders += 1;
        self.patch_children(id, vec![element], &map)
    }

    /// Forced delivery: re-render every subscriber that has not yet rendered
    /// the provider's current value. Skip hooks along the way are bypassed.
    fn deliver(&mut self, provider_id: NodeId) -> Result<(), TreeError> {
        let Some(state) = self.provider(provider_id) else {
            return Ok(());
        };
        let value = Rc::clone(state.value());
        let subscribers = state.ledger().snapshot();
        debug!(
            provider = %provider_id,
            context = %state.label(),
            subscribers = subscribers.len(),
            "Delivering context value"
        );

        for consumer in subscribers {
            // Unmounted or re-subscribed elsewhere since the snapshot, or
            // already reached by the top-down walk.
            let pending = match self.nodes.get(&consumer).map(|node| &node.kind) {
                Some(NodeKind::Consumer(state)) => {
                    state.provider() == Some(provider_id) && !state.has_seen(&value)
                }
                _ => false,
            };
            if !pending {
                continue;
            }

            trace!(provider = %provider_id, consumer = %consumer, "Forcing consumer render");
            self.stats.forced_deliveries += 1;
            self.render_consumer(consumer)?;
        }
        Ok(())
    }

    fn subscribe(&mut self, provider: NodeId, consumer: NodeId) {
        if let Some(state) = self.provider_mut(provider) {
            if state.ledger_mut().add(consumer) {
                debug!(provider = %provider, consumer = %consumer, context = %state.label(), "Consumer subscribed");
            }
        }
    }

    fn unsubscribe(&mut self, provider: NodeId, consumer: NodeId) {
        if let Some(state) = self.provider_mut(provider) {
            if state.ledger_mut().remove(consumer) {
                debug!(provider = %provider, consumer = %consumer, context = %state.label(), "Consumer unsubscribed");
            }
        }
    }

    /// Unmount a node and its subtree. Teardown hooks run parent-first.
    fn unmount_node(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        let children = std::mem::take(&mut node.children);

        match &mut node.kind {
            NodeKind::Component(slot) => slot.instance.unmounted(),
            NodeKind::Consumer(state) => {
                if let Some(provider) = state.provider() {
                    state.set_provider(None);
                    self.unsubscribe(provider, id);
                }
            }
            NodeKind::Provider(_) => self.release_provider(id),
            _ => {}
        }

        for child in children {
            self.unmount_node(child)?;
        }

        self.nodes.remove(&id);
        self.stats.unmounts += 1;
        trace!(node = %id, "Unmounted node");
        Ok(())
    }

    /// Hand the subscribers of a departing provider to the next-nearest
    /// provider for the same token, or to the default.
    fn release_provider(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(&id) else {
            return;
        };
        let NodeKind::Provider(state) = &mut node.kind else {
            return;
        };
        let orphans = state.ledger_mut().drain();
        if orphans.is_empty() {
            return;
        }
        let context = state.context();
        let next = node
            .context
            .get(context)
            .filter(|candidate| self.provider(*candidate).is_some());

        for consumer in orphans {
            let Some(node) = self.nodes.get_mut(&consumer) else {
                continue;
            };
            let NodeKind::Consumer(state) = &mut node.kind else {
                continue;
            };
            state.set_provider(next);
            node.context = match next {
                Some(provider) => node.context.with(context, provider),
                None => node.context.without(context),
            };
            if let Some(next) = next {
                self.subscribe(next, consumer);
            }
            debug!(consumer = %consumer, provider = ?next, "Reassigned orphaned subscriber");
        }
    }
}

impl ProviderLookup for Renderer {
    fn provider(&self, id: NodeId) -> Option<&ProviderState> {
        match self.nodes.get(&id).map(|node| &node.kind) {
            Some(NodeKind::Provider(state)) => Some(state),
            _ => None,
        }
    }
}
