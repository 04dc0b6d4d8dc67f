//! Canopy: Component-Tree Rendering with Context Propagation
//!
//! A small, single-threaded component-tree renderer whose central feature is
//! context: a value bound by a provider high in the tree reaches consumers
//! at any depth, even through components that decline to re-render.
//!
//! ```
//! use canopy::{create_context, Element, Renderer};
//!
//! let theme = create_context("light");
//! let mut renderer = Renderer::new();
//! renderer
//!     .render(theme.provider("dark", vec![theme.consumer(|t| Element::text(*t))]))
//!     .unwrap();
//! assert_eq!(renderer.to_html(), "dark");
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod logging;
pub mod tree;
pub mod types;

pub use context::{create_context, create_context_named, Context};
pub use error::{ConfigError, TreeError};
pub use tree::{Component, Element, RenderStats, Renderer, TagElement};
pub use types::{ContextId, NodeId};
