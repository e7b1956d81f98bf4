//! Key → node bookkeeping.
//!
//! The registry records, for every key, the parent a node was attached to and
//! the node currently standing in for that key. Entries are overwritten on
//! re-attach and on replacement but never removed.

use std::collections::HashMap;

use crate::key::Key;

/// Where a keyed node lives.
#[derive(Debug, Clone)]
pub struct NodeRecord<N> {
    parent: Option<N>,
    current: N,
}

impl<N> NodeRecord<N> {
    /// Creates a record.
    pub const fn new(parent: Option<N>, current: N) -> Self {
        Self { parent, current }
    }

    /// The node the keyed node was attached to. Only the root may lack one.
    #[must_use]
    pub const fn parent(&self) -> Option<&N> {
        self.parent.as_ref()
    }

    /// The node currently registered under the key.
    #[must_use]
    pub const fn current(&self) -> &N {
        &self.current
    }
}

/// Map from [`Key`] to [`NodeRecord`].
#[derive(Debug)]
pub struct Registry<N> {
    nodes: HashMap<Key, NodeRecord<N>>,
}

impl<N> Default for Registry<N> {
    fn default() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }
}

impl<N: Clone> Registry<N> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `record` under `key`, overwriting any previous entry.
    pub fn insert(&mut self, key: Key, record: NodeRecord<N>) {
        self.nodes.insert(key, record);
    }

    /// Swaps the current node of `key`, keeping its parent.
    ///
    /// Returns the node that was current before, or `None` when the key is
    /// not registered.
    pub fn swap_current(&mut self, key: &Key, current: N) -> Option<N> {
        self.nodes
            .get_mut(key)
            .map(|record| core::mem::replace(&mut record.current, current))
    }

    /// Looks up the record for `key`.
    #[must_use]
    pub fn get(&self, key: &Key) -> Option<&NodeRecord<N>> {
        self.nodes.get(key)
    }

    /// Returns `true` if `key` is registered.
    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        self.nodes.contains_key(key)
    }

    /// Number of registered keys, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates every registered key.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.nodes.keys()
    }
}
