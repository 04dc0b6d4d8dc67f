//! Context map: token -> nearest provider binding, threaded down the tree.
//!
//! Maps are persistent. Extending one copies the bindings into a new
//! allocation; the original is never edited. Nodes that are not providers
//! share their parent's map by pointer.

use crate::types::{ContextId, NodeId};
use indexmap::IndexMap;
use std::rc::Rc;

#[derive(Clone, Debug, Default)]
pub struct ContextMap {
    bindings: Rc<IndexMap<ContextId, NodeId>>,
}

impl ContextMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider bound to `context` along the current ancestor path.
    pub fn get(&self, context: ContextId) -> Option<NodeId> {
        self.bindings.get(&context).copied()
    }

    pub fn contains(&self, context: ContextId) -> bool {
        self.bindings.contains_key(&context)
    }

    /// Return a new map with `context` bound to `provider`.
    ///
    /// A shadowed binding keeps its original position; a new token is
    /// appended, so iteration runs outermost-first.
    pub fn with(&self, context: ContextId, provider: NodeId) -> ContextMap {
        let mut bindings = IndexMap::clone(&self.bindings);
        bindings.insert(context, provider);
        ContextMap {
            bindings: Rc::new(bindings),
        }
    }

    /// Return a new map with any binding for `context` removed.
    pub fn without(&self, context: ContextId) -> ContextMap {
        if !self.contains(context) {
            return self.clone();
        }
        let mut bindings = IndexMap::clone(&self.bindings);
        bindings.shift_remove(&context);
        ContextMap {
            bindings: Rc::new(bindings),
        }
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ContextId, NodeId)> + '_ {
        self.bindings.iter().map(|(c, p)| (*c, *p))
    }

    /// Whether both maps share the same allocation.
    pub fn ptr_eq(&self, other: &ContextMap) -> bool {
        Rc::ptr_eq(&self.bindings, &other.bindings)
    }
}
