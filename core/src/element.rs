//! Keyed elements and children specifications.

use alloc::vec::Vec;

use crate::key::Key;

/// A host node together with the key it was registered under.
#[derive(Debug, Clone)]
pub struct Element<N> {
    key: Key,
    node: N,
}

impl<N> Element<N> {
    /// Pairs a node with its key.
    pub const fn new(key: Key, node: N) -> Self {
        Self { key, node }
    }

    /// The key this element is tracked under.
    #[must_use]
    pub const fn key(&self) -> &Key {
        &self.key
    }

    /// The underlying host node.
    #[must_use]
    pub const fn node(&self) -> &N {
        &self.node
    }

    /// Splits the element into its key and node.
    #[must_use]
    pub fn into_parts(self) -> (Key, N) {
        (self.key, self.node)
    }
}

/// What goes inside a freshly constructed element.
///
/// Text content and structural children are mutually exclusive.
#[derive(Debug, Clone)]
pub enum Children<N> {
    /// Literal text content.
    Text(String),
    /// Already constructed elements, attached in order.
    Elements(Vec<Element<N>>),
}

impl<N> Default for Children<N> {
    fn default() -> Self {
        Self::Elements(Vec::new())
    }
}

impl<N> From<()> for Children<N> {
    fn from((): ()) -> Self {
        Self::default()
    }
}

impl<N> From<&str> for Children<N> {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl<N> From<String> for Children<N> {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<N> From<Vec<Element<N>>> for Children<N> {
    fn from(value: Vec<Element<N>>) -> Self {
        Self::Elements(value)
    }
}

impl<N, const LEN: usize> From<[Element<N>; LEN]> for Children<N> {
    fn from(value: [Element<N>; LEN]) -> Self {
        Self::Elements(value.into())
    }
}

impl<N> FromIterator<Element<N>> for Children<N> {
    fn from_iter<I: IntoIterator<Item = Element<N>>>(iter: I) -> Self {
        Self::Elements(iter.into_iter().collect())
    }
}
