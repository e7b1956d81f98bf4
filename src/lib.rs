#![doc = include_str!("../README.md")]
#![allow(clippy::multiple_crate_versions)]

pub mod logging;

pub mod prelude {
    //! A collection of commonly used types for easy importing.
    //!
    //! ```rust
    //! use flexdom::prelude::*;
    //!
    //! fn greeting<H: Host>(dom: &Dom<H>, props: Props) -> Result<Element<H::Node>> {
    //!     let name = props.get_str("name").unwrap_or("world");
    //!     dom.element("p", format!("Hello, {name}!"), Props::new())
    //! }
    //! ```
    pub use flexdom_core::{
        Children, Dom, DomConfig, Element, Event, EventHandler, EventName, FlexError, Host, Key,
        KeyStrategy, Props, Result, State, json,
    };
}

#[doc(inline)]
pub use flexdom_core::{
    Children, DEFAULT_KEY_ATTRIBUTE, Dom, DomConfig, Element, Event, EventHandler, EventName,
    FlexError, Host, Key, KeyStrategy, MemoryDocument, NodeId, NodeRecord, Props, Result, State,
    Value, event, json, key, memory, props, registry, start, start_with_config,
};

/// The browser host.
#[cfg(feature = "web")]
pub use flexdom_web as web;
