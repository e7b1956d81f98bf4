use std::rc::Rc;

use flexdom::{State, web::WebHost};
use tracing::error;
use wasm_bindgen::{JsCast, JsValue, prelude::wasm_bindgen};
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::Response;

use crate::{
    cats::{Cat, search_url},
    components::report,
    page_layout,
};

/// Mounts the demo page on `#root`.
///
/// # Errors
///
/// Returns the bootstrap failure as a JavaScript exception.
#[wasm_bindgen(start)]
pub fn run() -> Result<(), JsValue> {
    flexdom::web::start("#root", |dom| page_layout(dom, Rc::new(fetch_cats)))?;
    Ok(())
}

fn fetch_cats(limit: u32, cats: State<Vec<Cat>, WebHost>) {
    spawn_local(async move {
        match load(limit).await {
            Ok(list) => report(cats.set(list, false)),
            Err(err) => error!(?err, limit, "cat search failed"),
        }
    });
}

async fn load(limit: u32) -> Result<Vec<Cat>, JsValue> {
    let window = web_sys::window().ok_or("no global `window` exists")?;
    let response: Response = JsFuture::from(window.fetch_with_str(&search_url(limit)))
        .await?
        .dyn_into()?;
    let body = JsFuture::from(response.text()?).await?;
    let body = body.as_string().ok_or("response body is not text")?;
    serde_json::from_str(&body).map_err(|err| JsValue::from_str(&err.to_string()))
}
