//! Virtual elements: the description a render produces, before mounting.

use crate::context::{ConsumerElement, ProviderElement};
use crate::tree::component::{Component, ComponentElement};

#[derive(Debug)]
pub enum Element {
    /// Renders nothing.
    Empty,
    Text(String),
    Tag(TagElement),
    Fragment(Vec<Element>),
    Component(ComponentElement),
    Provider(ProviderElement),
    Consumer(ConsumerElement),
}

impl Element {
    pub fn text(text: impl Into<String>) -> Element {
        Element::Text(text.into())
    }

    pub fn tag(name: impl Into<String>) -> TagElement {
        TagElement {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn fragment<I>(children: I) -> Element
    where
        I: IntoIterator<Item = Element>,
    {
        Element::Fragment(children.into_iter().collect())
    }

    pub fn component<C: Component>(props: C::Props) -> Element {
        Element::Component(ComponentElement::new::<C>(props))
    }
}

/// Host element with a tag name, attributes, and children.
#[derive(Debug)]
pub struct TagElement {
    pub(crate) name: String,
    pub(crate) attrs: Vec<(String, String)>,
    pub(crate) children: Vec<Element>,
}

impl TagElement {
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn child(mut self, child: impl Into<Element>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = Element>,
    {
        self.children.extend(children);
        self
    }
}

impl From<TagElement> for Element {
    fn from(tag: TagElement) -> Self {
        Element::Tag(tag)
    }
}

impl From<&str> for Element {
    fn from(text: &str) -> Self {
        Element::Text(text.to_string())
    }
}

impl From<String> for Element {
    fn from(text: String) -> Self {
        Element::Text(text)
    }
}
