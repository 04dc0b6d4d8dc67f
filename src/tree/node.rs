//! Mounted nodes held in the renderer's arena.

use crate::context::{ContextMap, ConsumerState, ProviderState};
use crate::tree::component::AnyComponent;
use crate::types::NodeId;
use std::any::TypeId;

pub(crate) struct Node {
    pub id: NodeId,
    pub parent: Option<NodeId>,
    pub depth: usize,
    /// Map inherited from the parent: bindings of strict ancestors only.
    pub context: ContextMap,
    pub children: Vec<NodeId>,
    pub kind: NodeKind,
}

pub(crate) enum NodeKind {
    Root,
    Empty,
    Text(String),
    Tag {
        name: String,
        attrs: Vec<(String, String)>,
    },
    Fragment,
    Component(ComponentSlot),
    Provider(ProviderState),
    Consumer(ConsumerState),
}

pub(crate) struct ComponentSlot {
    pub type_id: TypeId,
    pub name: &'static str,
    pub instance: Box<dyn AnyComponent>,
}

impl Node {
    /// Tree walk hook: the map that applies to this node's children.
    ///
    /// Only providers extend the map; every other kind hands down its own
    /// map by pointer.
    pub fn child_context(&self) -> ContextMap {
        match &self.kind {
            NodeKind::Provider(state) => state.child_context(self.id, &self.context),
            _ => self.context.clone(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Root => "root",
            NodeKind::Empty => "empty",
            NodeKind::Text(_) => "text",
            NodeKind::Tag { .. } => "tag",
            NodeKind::Fragment => "fragment",
            NodeKind::Component(slot) => slot.name,
            NodeKind::Provider(_) => "provider",
            NodeKind::Consumer(_) => "consumer",
        }
    }
}
