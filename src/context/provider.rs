//! Provider nodes: bind a value for one token over a subtree and keep the
//! ledger of consumers currently resolving through them.

use crate::context::ledger::SubscriptionLedger;
use crate::context::map::ContextMap;
use crate::context::Value;
use crate::tree::element::Element;
use crate::types::{ContextId, NodeId};
use std::rc::Rc;

/// Unmounted provider description, produced by `Context::provider`.
#[derive(Debug)]
pub struct ProviderElement {
    pub(crate) context: ContextId,
    pub(crate) name: Option<Rc<str>>,
    pub(crate) value: Value,
    pub(crate) children: Vec<Element>,
}

impl ProviderElement {
    pub fn context(&self) -> ContextId {
        self.context
    }
}

/// Mounted provider instance.
#[derive(Debug)]
pub struct ProviderState {
    context: ContextId,
    name: Option<Rc<str>>,
    value: Value,
    ledger: SubscriptionLedger,
}

impl ProviderState {
    pub(crate) fn new(context: ContextId, name: Option<Rc<str>>, value: Value) -> Self {
        Self {
            context,
            name,
            value,
            ledger: SubscriptionLedger::new(),
        }
    }

    pub fn context(&self) -> ContextId {
        self.context
    }

    /// Display label: the context name if set, otherwise its id.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.to_string(),
            None => self.context.to_string(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn ledger(&self) -> &SubscriptionLedger {
        &self.ledger
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut SubscriptionLedger {
        &mut self.ledger
    }

    /// Store the value from a new render. Returns true when the identity
    /// changed, which is what triggers forced delivery.
    pub(crate) fn set_value(&mut self, value: Value) -> bool {
        let changed = !Rc::ptr_eq(&self.value, &value);
        self.value = value;
        changed
    }

    /// Map seen by this provider's children: `inherited` with this token
    /// bound to `this`.
    pub fn child_context(&self, this: NodeId, inherited: &ContextMap) -> ContextMap {
        inherited.with(self.context, this)
    }
}
