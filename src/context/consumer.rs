//! Consumer nodes: resolve the nearest provider's value for a token and
//! render through a caller-supplied function.

use crate::context::map::ContextMap;
use crate::context::provider::ProviderState;
use crate::context::Value;
use crate::tree::element::Element;
use crate::types::{ContextId, NodeId};
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Type-erased consumer render function.
pub type RenderFn = Rc<dyn Fn(&Value) -> Element>;

/// Unmounted consumer description, produced by `Context::consumer`.
pub struct ConsumerElement {
    pub(crate) context: ContextId,
    pub(crate) default: Value,
    pub(crate) render: RenderFn,
}

impl ConsumerElement {
    pub fn context(&self) -> ContextId {
        self.context
    }
}

impl fmt::Debug for ConsumerElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerElement")
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}

/// Access to mounted providers by id.
pub trait ProviderLookup {
    fn provider(&self, id: NodeId) -> Option<&ProviderState>;
}

impl ProviderLookup for HashMap<NodeId, ProviderState> {
    fn provider(&self, id: NodeId) -> Option<&ProviderState> {
        self.get(&id)
    }
}

/// Outcome of resolving a token against a context map.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Provider the value came from; `None` means the default applied.
    pub provider: Option<NodeId>,
    pub value: Value,
}

/// Resolve `context` against `map`, falling back to `default`.
///
/// The map names the nearest provider; its current value is read through
/// `lookup`, so a map built on an earlier pass still yields the live value.
pub fn resolve<L>(context: ContextId, default: &Value, map: &ContextMap, lookup: &L) -> Resolution
where
    L: ProviderLookup + ?Sized,
{
    let bound = map
        .get(context)
        .and_then(|id| lookup.provider(id).map(|state| (id, state)))
        .filter(|(_, state)| state.context() == context);

    match bound {
        Some((id, state)) => Resolution {
            provider: Some(id),
            value: Rc::clone(state.value()),
        },
        None => Resolution {
            provider: None,
            value: Rc::clone(default),
        },
    }
}

/// Mounted consumer instance.
pub struct ConsumerState {
    context: ContextId,
    default: Value,
    render: RenderFn,
    /// Provider whose ledger holds this consumer. Lookup only.
    provider: Option<NodeId>,
    /// Value passed to the last render.
    seen: Option<Value>,
}

impl ConsumerState {
    pub(crate) fn new(element: ConsumerElement) -> Self {
        Self {
            context: element.context,
            default: element.default,
            render: element.render,
            provider: None,
            seen: None,
        }
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    pub fn default_value(&self) -> &Value {
        &self.default
    }

    pub fn provider(&self) -> Option<NodeId> {
        self.provider
    }

    pub(crate) fn set_provider(&mut self, provider: Option<NodeId>) {
        self.provider = provider;
    }

    /// Take the render function from a newer element for the same token.
    pub(crate) fn receive(&mut self, element: ConsumerElement) {
        self.render = element.render;
        self.default = element.default;
    }

    /// Whether the last render already used this exact value.
    pub(crate) fn has_seen(&self, value: &Value) -> bool {
        self.seen
            .as_ref()
            .is_some_and(|seen| Rc::ptr_eq(seen, value))
    }

    /// Run the render function once with `value`.
    pub(crate) fn invoke(&mut self, value: Value) -> Element {
        let element = (self.render)(&value);
        self.seen = Some(value);
        element
    }
}

impl fmt::Debug for ConsumerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumerState")
            .field("context", &self.context)
            .field("provider", &self.provider)
            .finish_non_exhaustive()
    }
}
