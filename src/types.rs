//! Core identifier types shared by the context and tree modules.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static CONTEXT_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a context token.
///
/// Minted once per `create_context` call. Two tokens with equal default
/// values still carry distinct ids; ids are ordered by creation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ContextId(u64);

impl ContextId {
    pub(crate) fn mint() -> Self {
        ContextId(CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ctx#{}", self.0)
    }
}

/// Identity of a mounted node in a renderer's arena.
///
/// Ids are allocated monotonically and never reused within a renderer, so a
/// stale id can only miss, never alias another node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}
