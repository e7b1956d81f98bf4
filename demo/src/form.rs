//! A form with two text fields and a growing list of hobbies.
//!
//! Typing only stores the new value (so the focused input survives); adding a
//! hobby re-renders every subscriber of the form state.

use flexdom::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::components::{input, report};

/// One entry of the hobby list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hobby {
    /// What the user typed.
    pub value: String,
}

/// Everything the form holds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormState {
    /// First name.
    pub name: String,
    /// Last name.
    #[serde(rename = "surName")]
    pub sur_name: String,
    /// Hobbies, in the order they were added.
    pub hobbies: Vec<Hobby>,
}

impl FormState {
    fn with_field(mut self, field: &str, value: String) -> Self {
        match field {
            "name" => self.name = value,
            "surName" => self.sur_name = value,
            other => warn!(field = other, "ignoring change of unknown form field"),
        }
        self
    }

    fn with_hobby(mut self, index: usize, value: String) -> Self {
        if let Some(hobby) = self.hobbies.get_mut(index) {
            hobby.value = value;
        }
        self
    }
}

/// Renders one input per hobby. Edits are stored without re-rendering.
fn hobbies<H: Host>(
    dom: &Dom<H>,
    props: &Props,
    form: &State<FormState, H>,
) -> Result<Element<H::Node>> {
    let list: Vec<Hobby> = props
        .get("hobbies")
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
        .unwrap_or_default();

    let inputs = list
        .into_iter()
        .enumerate()
        .map(|(index, hobby)| {
            let form = form.clone();
            let on_input = move |event: &Event| {
                let value = event.target_value().unwrap_or_default().to_owned();
                report(form.update(|state| state.clone().with_hobby(index, value), true));
            };
            input(
                dom,
                Props::new()
                    .attr("value", hobby.value)
                    .on(EventName::Input, on_input),
            )
        })
        .collect::<Result<Vec<_>>>()?;

    dom.element("div", inputs, Props::new())
}

/// The form component, with its own state.
///
/// # Errors
///
/// Propagates host failures.
pub fn form<H: Host>(dom: &Dom<H>) -> Result<Element<H::Node>> {
    let form = dom.use_state(FormState::default());

    let on_change = {
        let form = form.clone();
        EventHandler::new(move |event: &Event| {
            let (Some(field), Some(value)) = (event.target_name(), event.target_value()) else {
                return;
            };
            let (field, value) = (field.to_owned(), value.to_owned());
            report(form.update(|state| state.clone().with_field(&field, value), true));
        })
    };
    let on_add = {
        let form = form.clone();
        move |_: &Event| {
            report(form.update(
                |state| {
                    let mut next = state.clone();
                    next.hobbies.push(Hobby::default());
                    next
                },
                false,
            ));
        }
    };

    let name = form.subscribe_with(
        input,
        |state: &FormState| Props::new().attr("value", state.name.as_str()),
        Props::new()
            .attr("name", "name")
            .handler(EventName::Input, on_change.clone()),
    )?;
    let sur_name = form.subscribe_with(
        input,
        |state: &FormState| Props::new().attr("value", state.sur_name.as_str()),
        Props::new()
            .attr("name", "surName")
            .handler(EventName::Input, on_change),
    )?;
    let hobby_list = form.subscribe_with(
        {
            let form = form.clone();
            move |dom: &Dom<H>, props: Props| hobbies(dom, &props, &form)
        },
        |state: &FormState| Props::new().attr("hobbies", json!(state.hobbies)),
        Props::new(),
    )?;

    dom.element(
        "div",
        vec![
            dom.element("div", "text", Props::new())?,
            name,
            sur_name,
            hobby_list,
            dom.element("button", "Add new", Props::new().on(EventName::Click, on_add))?,
        ],
        Props::new(),
    )
}
