#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Browser backend for `FlexDOM`.
//!
//! [`WebHost`] implements the core [`Host`](flexdom_core::Host) trait over
//! `web-sys`: elements are real DOM nodes, static properties are assigned with
//! `Reflect.set`, and event bindings become `addEventListener` callbacks that
//! hand a [`flexdom_core::Event`] to the bound handler.
//!
//! [`start`] is the usual entry point; [`WebAppBuilder`] exposes the knobs.

mod app;
mod dom;
mod error;
pub mod logging;

pub use app::{DEFAULT_ROOT_SELECTOR, WebApp, WebAppBuilder, start};
pub use dom::WebHost;
pub use error::WebError;
