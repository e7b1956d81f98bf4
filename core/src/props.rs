//! Property bags for elements and components.
//!
//! A [`Props`] bag keeps static attributes and event bindings apart, so the
//! host never has to guess whether a value is a handler.

use alloc::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use crate::event::{Event, EventHandler, EventName};

/// Attribute name used when non-object state is spread into a bag.
pub const VALUE_ATTRIBUTE: &str = "value";

/// Static attributes plus event bindings.
#[derive(Debug, Clone, Default)]
pub struct Props {
    attributes: BTreeMap<String, Value>,
    events: BTreeMap<EventName, EventHandler>,
}

impl Props {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a static attribute, keeping the name verbatim.
    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Binds a handler to an event.
    #[must_use]
    pub fn on(mut self, event: EventName, handler: impl Fn(&Event) + 'static) -> Self {
        self.events.insert(event, EventHandler::new(handler));
        self
    }

    /// Binds an existing handler to an event.
    #[must_use]
    pub fn handler(mut self, event: EventName, handler: EventHandler) -> Self {
        self.events.insert(event, handler);
        self
    }

    /// Binds a handler through a property name such as `onClick`.
    #[must_use]
    pub fn on_prop(self, prop: &str, handler: impl Fn(&Event) + 'static) -> Self {
        self.on(EventName::from_prop(prop), handler)
    }

    /// Sets a static attribute in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Looks up an attribute.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Looks up a string attribute.
    #[must_use]
    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Looks up the handler bound to an event.
    #[must_use]
    pub fn event(&self, event: &EventName) -> Option<&EventHandler> {
        self.events.get(event)
    }

    /// Iterates the static attributes in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Iterates the event bindings in name order.
    pub fn events(&self) -> impl Iterator<Item = (&EventName, &EventHandler)> {
        self.events.iter()
    }

    /// Returns `true` when the bag holds neither attributes nor events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.events.is_empty()
    }

    /// Layers `over` on top of `self`; entries of `over` win on collision.
    #[must_use]
    pub fn merge(mut self, over: Self) -> Self {
        self.attributes.extend(over.attributes);
        self.events.extend(over.events);
        self
    }

    /// Spreads a serializable value into a bag.
    ///
    /// Object fields become attributes. Any other value is stored under
    /// [`VALUE_ATTRIBUTE`]. Values that fail to serialize produce an empty bag.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(Value::Object(fields)) => fields.into_iter().collect(),
            Ok(Value::Null) | Err(_) => Self::new(),
            Ok(other) => Self::new().attr(VALUE_ATTRIBUTE, other),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            events: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;
    use serde_json::json;

    use super::*;

    #[test]
    fn merge_prefers_right_hand_side() {
        let fixed = Props::new().attr("name", "x").attr("kind", "text");
        let mapped = Props::new().attr("name", "y");
        let merged = fixed.merge(mapped);
        assert_eq!(merged.get_str("name"), Some("y"));
        assert_eq!(merged.get_str("kind"), Some("text"));
    }

    #[test]
    fn merge_overrides_event_bindings() {
        let first = EventHandler::new(|_| {});
        let second = EventHandler::new(|_| {});
        let merged = Props::new()
            .handler(EventName::Click, first)
            .merge(Props::new().handler(EventName::Click, second.clone()));
        assert!(merged.event(&EventName::Click).unwrap().ptr_eq(&second));
    }

    #[test]
    fn objects_spread_into_attributes() {
        #[derive(Serialize)]
        struct Form {
            name: &'static str,
            age: u8,
        }

        let props = Props::from_serialize(&Form { name: "Ada", age: 36 });
        assert_eq!(props.get("name"), Some(&json!("Ada")));
        assert_eq!(props.get("age"), Some(&json!(36)));
    }

    #[test]
    fn scalars_land_under_value() {
        assert_eq!(Props::from_serialize(&7).get("value"), Some(&json!(7)));
        assert!(Props::from_serialize(&()).is_empty());
    }

    #[test]
    fn legacy_handler_names_resolve() {
        let props = Props::new().on_prop("onClick", |_| {});
        assert!(props.event(&EventName::Click).is_some());
    }
}
