//! Example pages built with `FlexDOM`.
//!
//! The components are generic over the [`Host`](flexdom::Host), so the same
//! page renders in the browser and in a [`MemoryDocument`](flexdom::MemoryDocument).
//! On `wasm32` the crate exposes a start function that mounts the page on
//! `#root` and fetches cat pictures over HTTP.

use flexdom::prelude::*;

pub mod cats;
mod components;
pub mod form;
#[cfg(target_arch = "wasm32")]
mod web;

pub use cats::{Cat, CatFetcher, cats_list, example_with_cats};
pub use components::{input, text};
pub use form::{FormState, Hobby, form};

/// The form example under a heading.
///
/// # Errors
///
/// Propagates host failures.
pub fn example_with_form<H: Host>(dom: &Dom<H>) -> Result<Element<H::Node>> {
    dom.element(
        "div",
        vec![
            dom.element("h2", "Example with form", Props::new())?,
            form(dom)?,
        ],
        Props::new().attr("className", "home-page"),
    )
}

/// Both examples side by side.
///
/// # Errors
///
/// Propagates host failures.
pub fn page_layout<H: Host>(dom: &Dom<H>, fetch: CatFetcher<H>) -> Result<Element<H::Node>> {
    dom.element(
        "div",
        vec![example_with_form(dom)?, example_with_cats(dom, fetch)?],
        Props::new().attr("className", "layout"),
    )
}

#[cfg(test)]
mod tests;
