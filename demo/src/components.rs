//! Small presentational components shared by the examples.

use flexdom::prelude::*;

/// An `<input>` showing the `value` and `name` props.
///
/// The `input` binding of `props`, if any, is installed on the element.
///
/// # Errors
///
/// Propagates host failures.
pub fn input<H: Host>(dom: &Dom<H>, props: Props) -> Result<Element<H::Node>> {
    let mut own = Props::new()
        .attr("value", props.get("value").cloned().unwrap_or_else(|| json!("")))
        .attr("name", props.get("name").cloned().unwrap_or_else(|| json!("")));
    if let Some(handler) = props.event(&EventName::Input) {
        own = own.handler(EventName::Input, handler.clone());
    }
    dom.element("input", (), own)
}

/// An `<h1 class="text">` showing the `count` prop.
///
/// # Errors
///
/// Propagates host failures.
pub fn text<H: Host>(dom: &Dom<H>, props: Props) -> Result<Element<H::Node>> {
    let count = match props.get("count") {
        Some(flexdom::Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    dom.element("h1", count, Props::new().attr("className", "text"))
}

/// Logs a failed state update raised inside an event handler.
pub(crate) fn report(result: Result<usize>) {
    if let Err(err) = result {
        tracing::error!(%err, "state update failed");
    }
}
