//! A count input that drives a heading and a list of cat pictures fetched
//! from a remote image search.

use std::rc::Rc;

use flexdom::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::{input, report, text};

/// Number of pictures requested before the user types anything.
pub const DEFAULT_COUNT: u32 = 2;

/// Image search endpoint; `{limit}` is the number of pictures.
pub const CAT_API: &str =
    "https://api.thecatapi.com/v1/images/search?limit={limit}&size=full&sub_id=demo-e17b0";

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cat {
    /// Identifier of the picture.
    pub id: String,
    /// Where the picture is served from.
    pub url: String,
}

/// Builds the search URL for `limit` pictures.
#[must_use]
pub fn search_url(limit: u32) -> String {
    CAT_API.replace("{limit}", &limit.to_string())
}

/// Loads `limit` pictures and stores them in the given state.
pub type CatFetcher<H> = Rc<dyn Fn(u32, State<Vec<Cat>, H>)>;

/// A `<div class="cats-list">` with one `<img>` per entry of the `cats` prop.
///
/// # Errors
///
/// Propagates host failures.
pub fn cats_list<H: Host>(dom: &Dom<H>, props: Props) -> Result<Element<H::Node>> {
    let cats: Vec<Cat> = props
        .get("cats")
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default();

    let images = cats
        .into_iter()
        .map(|cat| {
            dom.element(
                "img",
                (),
                Props::new().attr("src", cat.url).attr("alt", cat.id),
            )
        })
        .collect::<Result<Vec<_>>>()?;

    dom.element("div", images, Props::new().attr("className", "cats-list"))
}

/// The cats example, with its own count and result states.
///
/// # Errors
///
/// Propagates host failures.
pub fn example_with_cats<H: Host>(dom: &Dom<H>, fetch: CatFetcher<H>) -> Result<Element<H::Node>> {
    let count = dom.use_state(DEFAULT_COUNT);
    let cats: State<Vec<Cat>, H> = dom.use_state(Vec::new());

    let on_input = {
        let count = count.clone();
        let cats = cats.clone();
        move |event: &Event| {
            let Some(value) = event.target_value().filter(|value| !value.is_empty()) else {
                return;
            };
            let Ok(limit) = value.trim().parse::<u32>() else {
                debug!(value, "ignoring non-numeric count");
                return;
            };
            report(count.set(limit, false));
            fetch(limit, cats.clone());
        }
    };

    dom.element(
        "div",
        vec![
            dom.element("h2", "Example with cats and fetch", Props::new())?,
            input(
                dom,
                Props::new()
                    .attr("value", DEFAULT_COUNT)
                    .on(EventName::Input, on_input),
            )?,
            count.subscribe_with(
                text,
                |count: &u32| Props::new().attr("count", *count),
                Props::new(),
            )?,
            cats.subscribe_with(
                cats_list,
                |cats: &Vec<Cat>| Props::new().attr("cats", json!(cats)),
                Props::new(),
            )?,
        ],
        Props::new().attr("className", "home-page"),
    )
}
