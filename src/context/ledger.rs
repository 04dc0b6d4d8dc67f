//! Subscription ledger: the consumers a provider must force-update when its
//! value changes. Entries are node ids, used for lookup only.

use crate::types::NodeId;
use indexmap::IndexSet;

#[derive(Debug, Default, Clone)]
pub struct SubscriptionLedger {
    subscribers: IndexSet<NodeId>,
}

impl SubscriptionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if `consumer` was already subscribed.
    pub fn add(&mut self, consumer: NodeId) -> bool {
        self.subscribers.insert(consumer)
    }

    /// Returns false if `consumer` was not subscribed.
    pub fn remove(&mut self, consumer: NodeId) -> bool {
        self.subscribers.shift_remove(&consumer)
    }

    pub fn contains(&self, consumer: NodeId) -> bool {
        self.subscribers.contains(&consumer)
    }

    pub fn len(&self) -> usize {
        self.subscribers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscribers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.subscribers.iter().copied()
    }

    /// Copy of the current subscribers in subscription order.
    pub fn snapshot(&self) -> Vec<NodeId> {
        self.iter().collect()
    }

    /// Remove and return every subscriber.
    pub fn drain(&mut self) -> Vec<NodeId> {
        self.subscribers.drain(..).collect()
    }
}
