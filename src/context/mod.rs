//! Context Propagation
//!
//! Passes a value from an ancestor node to arbitrarily deep descendants
//! without threading it through every intermediate component's props.
//!
//! A [`Context`] token is minted by [`create_context`]. Its provider element
//! binds a value for the token over a subtree; its consumer element resolves
//! the nearest bound value (or the token's default) and renders with it.
//!
//! Values are compared by identity (`Rc::ptr_eq`), never structurally: a
//! provider handed a fresh `Rc` counts as changed even if the contents are
//! equal. Reuse the same `Rc` to signal "unchanged".

pub mod consumer;
pub mod ledger;
pub mod map;
pub mod provider;

use crate::tree::element::Element;
use crate::types::ContextId;
use std::any::Any;
use std::fmt;
use std::rc::Rc;

pub use consumer::{resolve, ConsumerElement, ConsumerState, ProviderLookup, RenderFn, Resolution};
pub use ledger::SubscriptionLedger;
pub use map::ContextMap;
pub use provider::{ProviderElement, ProviderState};

/// Type-erased context value. Identity is the allocation.
pub type Value = Rc<dyn Any>;

/// A context token: unique identity plus the default value used when no
/// provider for it is mounted above a consumer.
pub struct Context<T: 'static> {
    id: ContextId,
    name: Option<Rc<str>>,
    default: Rc<T>,
}

/// Mint a new context token with the given default value.
pub fn create_context<T: 'static>(default: T) -> Context<T> {
    Context {
        id: ContextId::mint(),
        name: None,
        default: Rc::new(default),
    }
}

/// Mint a new context token carrying a display name for logs and `Debug`.
pub fn create_context_named<T: 'static>(name: &str, default: T) -> Context<T> {
    Context {
        id: ContextId::mint(),
        name: Some(Rc::from(name)),
        default: Rc::new(default),
    }
}

impl<T: 'static> Context<T> {
    pub fn id(&self) -> ContextId {
        self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn default_value(&self) -> &Rc<T> {
        &self.default
    }

    /// Build a provider element binding `value` for this token over `children`.
    ///
    /// Passing a `T` allocates a new identity on every call; passing a cloned
    /// `Rc<T>` keeps the identity and therefore suppresses forced delivery.
    pub fn provider<V, I>(&self, value: V, children: I) -> Element
    where
        V: Into<Rc<T>>,
        I: IntoIterator<Item = Element>,
    {
        let value: Rc<T> = value.into();
        let value: Value = value;
        Element::Provider(ProviderElement {
            context: self.id,
            name: self.name.clone(),
            value,
            children: children.into_iter().collect(),
        })
    }

    /// Build a consumer element that renders `render` with the resolved value.
    pub fn consumer<F>(&self, render: F) -> Element
    where
        F: Fn(Rc<T>) -> Element + 'static,
    {
        let default = Rc::clone(&self.default);
        let erased_default: Value = Rc::clone(&self.default) as Value;
        let erased: RenderFn = Rc::new(move |value: &Value| {
            // Providers for this id always carry a `T`.
            let typed = Rc::clone(value)
                .downcast::<T>()
                .unwrap_or_else(|_| Rc::clone(&default));
            render(typed)
        });
        Element::Consumer(ConsumerElement {
            context: self.id,
            default: erased_default,
            render: erased,
        })
    }

    /// Downcast an erased value resolved for this token.
    pub(crate) fn typed(&self, value: Value) -> Rc<T> {
        value
            .downcast::<T>()
            .unwrap_or_else(|_| Rc::clone(&self.default))
    }
}

impl<T: 'static> Clone for Context<T> {
    fn clone(&self) -> Self {
        Context {
            id: self.id,
            name: self.name.clone(),
            default: Rc::clone(&self.default),
        }
    }
}

impl<T: 'static> fmt::Debug for Context<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}
