//! Core of the `FlexDOM` rendering library.
//!
//! The crate is organised around three cooperating pieces:
//!
//! - [`Dom`], a registry instance bound to one root element. It maps every
//!   element [`Key`] to the node it was attached to and the node currently
//!   standing in for it.
//! - [`Dom::element`], the component constructor. It creates a host element,
//!   keys it, applies a [`Props`] bag and mounts the children.
//! - [`State`], a single-slot reactive container. Subscribed components are
//!   re-rendered and swapped in place, wholesale, whenever the value changes.
//!
//! Everything renders through the [`Host`] trait. [`MemoryDocument`] is a
//! headless host; the browser host lives in `flexdom-web`.
//!
//! ```
//! use flexdom_core::{Dom, Host, MemoryDocument, Props};
//!
//! let document = MemoryDocument::with_container("root");
//! let dom = Dom::initialize(document.clone(), "#root").unwrap();
//! dom.render(|dom| {
//!     let title = dom.element("h1", "Hello", Props::new())?;
//!     dom.element("div", vec![title], Props::new().attr("className", "layout"))
//! })
//! .unwrap();
//!
//! let root = document.query_selector("#root").unwrap().unwrap();
//! assert_eq!(document.text_content(root), "Hello");
//! ```

extern crate alloc;

mod dom;
mod element;
pub mod error;
pub mod event;
mod host;
pub mod key;
pub mod memory;
pub mod props;
pub mod registry;
mod state;

#[cfg(test)]
mod tests;

pub use dom::{DEFAULT_KEY_ATTRIBUTE, Dom, DomConfig, start, start_with_config};
pub use element::{Children, Element};
pub use error::{FlexError, Result};
pub use event::{Event, EventHandler, EventName};
pub use host::Host;
pub use key::{Key, KeyStrategy};
pub use memory::{MemoryDocument, NodeId};
pub use props::Props;
pub use registry::NodeRecord;
pub use serde_json::{Value, json};
pub use state::State;
