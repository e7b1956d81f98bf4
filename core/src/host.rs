//! The host document capability the registry renders into.

use core::fmt::Debug;

use serde_json::Value;

use crate::{
    error::Result,
    event::{EventHandler, EventName},
    key::Key,
};

/// A document-like UI tree that elements are created in and attached to.
///
/// Implementations hand out cheap, cloneable node handles. All methods take
/// `&self`; hosts that need mutation keep their own interior state, because
/// event handlers may call back into the registry while a host call is in
/// flight.
pub trait Host: 'static {
    /// Handle to one node of the host tree.
    type Node: Clone + Debug + 'static;

    /// Finds the first node matching `selector`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot evaluate the selector.
    fn query_selector(&self, selector: &str) -> Result<Option<Self::Node>>;

    /// Returns the current parent of `node`.
    fn parent_of(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Creates a detached element with the given tag name.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the tag name.
    fn create_element(&self, tag: &str) -> Result<Self::Node>;

    /// Tags `node` with its registry key under `attribute`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the attribute.
    fn set_key(&self, node: &Self::Node, attribute: &str, key: &Key) -> Result<()>;

    /// Assigns a static property, using `name` verbatim.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the assignment.
    fn set_property(&self, node: &Self::Node, name: &str, value: &Value) -> Result<()>;

    /// Replaces the text content of `node`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host rejects the assignment.
    fn set_text(&self, node: &Self::Node, text: &str) -> Result<()>;

    /// Appends `child` as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host refuses the insertion.
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<()>;

    /// Swaps `old` for `new` in place under `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if `old` is not a child of `parent`.
    fn replace_child(&self, parent: &Self::Node, new: &Self::Node, old: &Self::Node)
    -> Result<()>;

    /// Installs an event binding on `node`.
    ///
    /// # Errors
    ///
    /// Returns an error if the host cannot register the listener.
    fn listen(&self, node: &Self::Node, event: &EventName, handler: EventHandler) -> Result<()>;
}
