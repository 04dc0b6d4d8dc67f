//! Component Tree
//!
//! Minimal single-threaded host engine: virtual elements, user components,
//! the mounted node arena, and HTML output. Context propagation plugs into
//! it through the tree walk hook (`Node::child_context`), the render-skip
//! hook (`Component::should_update`), and mount/unmount notifications.

pub mod component;
pub mod element;
pub mod html;
pub(crate) mod node;
pub mod renderer;

pub use component::Component;
pub use element::{Element, TagElement};
pub use renderer::{RenderStats, Renderer};
