//! Event names, payloads and handler closures.

use alloc::rc::Rc;
use core::{fmt, str::FromStr};

/// Canonical lowercase name of a host event.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum EventName {
    /// `click`
    Click,
    /// `input`
    Input,
    /// `change`
    Change,
    /// `submit`
    Submit,
    /// `keydown`
    KeyDown,
    /// `keyup`
    KeyUp,
    /// `focus`
    Focus,
    /// `blur`
    Blur,
    /// Any other event, stored lowercased.
    Other(String),
}

impl EventName {
    /// Returns the name the host uses for this event.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Click => "click",
            Self::Input => "input",
            Self::Change => "change",
            Self::Submit => "submit",
            Self::KeyDown => "keydown",
            Self::KeyUp => "keyup",
            Self::Focus => "focus",
            Self::Blur => "blur",
            Self::Other(name) => name,
        }
    }

    /// Resolves a handler property name such as `onClick` or `oninput`.
    ///
    /// The name is lowercased and a leading `on` is dropped, so `onClick`
    /// binds the `click` event.
    #[must_use]
    pub fn from_prop(prop: &str) -> Self {
        let lowered = prop.to_lowercase();
        let name = lowered.strip_prefix("on").unwrap_or(&lowered);
        Self::from_lowercase(name)
    }

    fn from_lowercase(name: &str) -> Self {
        match name {
            "click" => Self::Click,
            "input" => Self::Input,
            "change" => Self::Change,
            "submit" => Self::Submit,
            "keydown" => Self::KeyDown,
            "keyup" => Self::KeyUp,
            "focus" => Self::Focus,
            "blur" => Self::Blur,
            other => Self::Other(other.to_owned()),
        }
    }
}

impl FromStr for EventName {
    type Err = core::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_lowercase(&s.to_lowercase()))
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host-independent description of a fired event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    name: EventName,
    target_name: Option<String>,
    target_value: Option<String>,
}

impl Event {
    /// Creates an event with no target details.
    #[must_use]
    pub const fn new(name: EventName) -> Self {
        Self {
            name,
            target_name: None,
            target_value: None,
        }
    }

    /// Sets the `name` property of the event target.
    #[must_use]
    pub fn with_target_name(mut self, name: impl Into<String>) -> Self {
        self.target_name = Some(name.into());
        self
    }

    /// Sets the `value` property of the event target.
    #[must_use]
    pub fn with_target_value(mut self, value: impl Into<String>) -> Self {
        self.target_value = Some(value.into());
        self
    }

    /// The event that fired.
    #[must_use]
    pub const fn name(&self) -> &EventName {
        &self.name
    }

    /// The target's `name` property, when it has one.
    #[must_use]
    pub fn target_name(&self) -> Option<&str> {
        self.target_name.as_deref()
    }

    /// The target's `value` property, when it has one.
    #[must_use]
    pub fn target_value(&self) -> Option<&str> {
        self.target_value.as_deref()
    }
}

/// Shared closure invoked when an event fires.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&Event)>);

impl EventHandler {
    /// Wraps a closure.
    pub fn new(handler: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(handler))
    }

    /// Invokes the handler.
    pub fn call(&self, event: &Event) {
        (self.0)(event);
    }

    /// Returns `true` if both handles point at the same closure.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventHandler")
    }
}

impl<F: Fn(&Event) + 'static> From<F> for EventHandler {
    fn from(value: F) -> Self {
        Self::new(value)
    }
}
