use crate::error::{WebError, host_error};

use flexdom_core::{Event, EventHandler, EventName, Host, Key, Result, Value};

use wasm_bindgen::{JsCast, JsValue, closure::Closure};

use web_sys::{Document, Element, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement, Window};

/// [`Host`] backed by the browser document.
#[derive(Debug, Clone)]
pub struct WebHost {
    document: Document,
}

impl WebHost {
    /// Binds to the document of the global `window`.
    ///
    /// # Errors
    ///
    /// Returns [`WebError::DomUnavailable`] outside of a browser.
    pub fn new() -> Result<Self, WebError> {
        let window: Window = web_sys::window().ok_or(WebError::DomUnavailable)?;
        let document: Document = window.document().ok_or(WebError::DomUnavailable)?;
        Ok(Self { document })
    }

    /// Binds to an explicit document.
    #[must_use]
    pub const fn from_document(document: Document) -> Self {
        Self { document }
    }

    /// Returns the owning document.
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.document
    }
}

impl Host for WebHost {
    type Node = Element;

    fn query_selector(&self, selector: &str) -> Result<Option<Element>> {
        self.document
            .query_selector(selector)
            .map_err(|e| host_error(&e))
    }

    fn parent_of(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn create_element(&self, tag: &str) -> Result<Element> {
        self.document
            .create_element(tag)
            .map_err(|e| host_error(&e))
    }

    fn set_key(&self, node: &Element, attribute: &str, key: &Key) -> Result<()> {
        node.set_attribute(attribute, key.as_str())
            .map_err(|e| host_error(&e))
    }

    fn set_property(&self, node: &Element, name: &str, value: &Value) -> Result<()> {
        let value = to_js(value)?;
        js_sys::Reflect::set(node, &JsValue::from_str(name), &value)
            .map(drop)
            .map_err(|e| host_error(&e))
    }

    fn set_text(&self, node: &Element, text: &str) -> Result<()> {
        node.set_text_content(Some(text));
        Ok(())
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<()> {
        parent
            .append_child(child)
            .map(drop)
            .map_err(|e| host_error(&e))
    }

    fn replace_child(&self, parent: &Element, new: &Element, old: &Element) -> Result<()> {
        parent
            .replace_child(new, old)
            .map(drop)
            .map_err(|e| host_error(&e))
    }

    fn listen(&self, node: &Element, event: &EventName, handler: EventHandler) -> Result<()> {
        let name = event.clone();
        let callback = Closure::<dyn Fn(web_sys::Event)>::new(move |event: web_sys::Event| {
            handler.call(&describe(&name, &event));
        });
        node.add_event_listener_with_callback(event.as_str(), callback.as_ref().unchecked_ref())
            .map_err(|e| host_error(&e))?;
        // Listeners live as long as the node; nodes are never torn down.
        callback.forget();
        Ok(())
    }
}

/// Converts a static property value into its JavaScript form.
fn to_js(value: &Value) -> Result<JsValue> {
    Ok(match value {
        Value::Null => JsValue::NULL,
        Value::Bool(flag) => JsValue::from_bool(*flag),
        Value::Number(number) => number
            .as_f64()
            .map_or_else(|| JsValue::from_str(&number.to_string()), JsValue::from_f64),
        Value::String(text) => JsValue::from_str(text),
        Value::Array(_) | Value::Object(_) => {
            js_sys::JSON::parse(&value.to_string()).map_err(|e| host_error(&e))?
        }
    })
}

/// Reads the target's `name` and `value` from form controls.
fn describe(name: &EventName, event: &web_sys::Event) -> Event {
    let described = Event::new(name.clone());
    let Some(target) = event.target() else {
        return described;
    };

    if let Some(input) = target.dyn_ref::<HtmlInputElement>() {
        described
            .with_target_name(input.name())
            .with_target_value(input.value())
    } else if let Some(area) = target.dyn_ref::<HtmlTextAreaElement>() {
        described
            .with_target_name(area.name())
            .with_target_value(area.value())
    } else if let Some(select) = target.dyn_ref::<HtmlSelectElement>() {
        described
            .with_target_name(select.name())
            .with_target_value(select.value())
    } else {
        described
    }
}
