//! End-to-end behaviour of the registry, the component constructor and
//! state containers, driven through the in-memory host.

use alloc::rc::Rc;
use core::cell::Cell;

use serde_json::{Value, json};

use crate::{
    DEFAULT_KEY_ATTRIBUTE, Dom, DomConfig, Element, EventName, FlexError, Host, KeyStrategy,
    MemoryDocument, NodeId, Props, Result, State,
};

// ============================================================================
// Test Infrastructure
// ============================================================================

fn setup() -> (MemoryDocument, Dom<MemoryDocument>) {
    let document = MemoryDocument::with_container("root");
    let dom = Dom::initialize(document.clone(), "#root").unwrap();
    (document, dom)
}

fn root_node(document: &MemoryDocument) -> NodeId {
    document.query_selector("#root").unwrap().unwrap()
}

/// Renders `props.value` as the text of a `<span>`.
fn label(dom: &Dom<MemoryDocument>, props: Props) -> Result<Element<NodeId>> {
    let text = match props.get("value") {
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    };
    dom.element("span", text, Props::new())
}

/// An `<input>` that forwards its `input` binding and `value` prop.
fn text_input(dom: &Dom<MemoryDocument>, props: Props) -> Result<Element<NodeId>> {
    let mut own = Props::new().attr("value", props.get("value").cloned().unwrap_or(json!("")));
    if let Some(name) = props.get("name") {
        own.set_attr("name", name.clone());
    }
    if let Some(handler) = props.event(&EventName::Input) {
        own = own.handler(EventName::Input, handler.clone());
    }
    dom.element("input", (), own)
}

fn current(dom: &Dom<MemoryDocument>, element: &Element<NodeId>) -> NodeId {
    *dom.get(element.key()).unwrap().current()
}

// ============================================================================
// Registry
// ============================================================================

#[test]
fn initialize_seeds_root_entry() {
    let (document, dom) = setup();
    let root = root_node(&document);
    let record = dom.get(dom.root().key()).unwrap();

    assert_eq!(dom.len(), 1);
    assert_eq!(record.current(), &root);
    assert_eq!(record.parent(), Some(&document.body()));
}

#[test]
fn initialize_fails_without_root() {
    let err = Dom::initialize(MemoryDocument::new(), "#root").unwrap_err();
    assert_eq!(err, FlexError::RootNotFound("#root".into()));
}

#[test]
fn attached_children_are_retrievable_with_their_parent() {
    let (document, dom) = setup();
    let outer = dom.element("div", (), Props::new()).unwrap();
    dom.add(Some(dom.root()), Some(outer.clone())).unwrap();

    let mut attached = Vec::new();
    for parent in [&outer, dom.root(), &outer] {
        let child = dom.element("p", "x", Props::new()).unwrap();
        dom.add(Some(parent), Some(child.clone())).unwrap();
        attached.push((parent.clone(), child));
    }

    for (parent, child) in &attached {
        let record = dom.get(child.key()).unwrap();
        assert_eq!(record.current(), child.node());
        assert_eq!(record.parent(), Some(parent.node()));
        assert_eq!(document.parent(*child.node()), Some(*parent.node()));
    }
}

#[test]
fn add_rejects_absent_sides() {
    let (_, dom) = setup();
    let child = dom.element("p", (), Props::new()).unwrap();

    assert_eq!(
        dom.add(None, Some(child)).unwrap_err(),
        FlexError::MissingParent
    );
    assert_eq!(
        dom.add(Some(dom.root()), None).unwrap_err(),
        FlexError::MissingChild
    );
}

#[test]
fn replace_preserves_key_and_parent() {
    let (document, dom) = setup();
    let root = root_node(&document);
    let old = dom
        .render(|dom| dom.element("p", "old", Props::new()))
        .unwrap();
    let fresh = dom.element("p", "new", Props::new()).unwrap();
    let fresh_node = *fresh.node();

    let replaced = dom.replace(old.key(), fresh).unwrap();

    let record = dom.get(old.key()).unwrap();
    assert_eq!(replaced.key(), old.key());
    assert_eq!(record.current(), &fresh_node);
    assert_eq!(record.parent(), Some(&root));
    assert_eq!(
        document.attribute(fresh_node, DEFAULT_KEY_ATTRIBUTE).as_deref(),
        Some(old.key().as_str())
    );
    assert_eq!(document.children(root), vec![fresh_node]);
    assert_eq!(document.text_content(root), "new");
}

#[test]
fn replace_unknown_key_fails() {
    let (document, dom) = setup();
    let orphan = dom.element("p", (), Props::new()).unwrap();
    let fresh = dom.element("p", (), Props::new()).unwrap();

    let err = dom.replace(orphan.key(), fresh).unwrap_err();
    assert_eq!(err, FlexError::UnknownKey(orphan.key().clone()));
    assert_eq!(document.replacements(), 0);
}

#[test]
fn independent_instances_coexist() {
    let document = MemoryDocument::new();
    document.mount_container("div", "left");
    document.mount_container("div", "right");
    let left = Dom::initialize(document.clone(), "#left").unwrap();
    let right = Dom::initialize(document.clone(), "#right").unwrap();

    left.render(|dom| dom.element("p", "L", Props::new())).unwrap();
    right.render(|dom| dom.element("p", "R", Props::new())).unwrap();

    let left_root = document.query_selector("#left").unwrap().unwrap();
    let right_root = document.query_selector("#right").unwrap().unwrap();
    assert_eq!(document.text_content(left_root), "L");
    assert_eq!(document.text_content(right_root), "R");
}

#[test]
fn random_keys_work_end_to_end() {
    let document = MemoryDocument::with_container("root");
    let config = DomConfig::new()
        .with_key_strategy(KeyStrategy::random())
        .with_key_attribute("data-key");
    let dom = crate::start_with_config(document.clone(), "#root", config, |dom| {
        let items = (0..20)
            .map(|i| dom.element("li", i.to_string(), Props::new()))
            .collect::<Result<Vec<_>>>()?;
        dom.element("ul", items, Props::new())
    })
    .unwrap();

    assert_eq!(dom.len(), 22);
    let list = document.children(root_node(&document))[0];
    for item in document.children(list) {
        let key = document.attribute(item, "data-key").unwrap();
        assert_eq!(key.len(), 10);
        assert_eq!(*dom.get(&key.as_str().into()).unwrap().current(), item);
    }
}

// ============================================================================
// Component constructor
// ============================================================================

#[test]
fn element_applies_attributes_events_and_children() {
    let (document, dom) = setup();
    let clicks = Rc::new(Cell::new(0));
    let first = dom.element("li", "one", Props::new()).unwrap();
    let second = dom.element("li", "two", Props::new()).unwrap();

    let list = dom
        .element(
            "ul",
            vec![first.clone(), second.clone()],
            Props::new().attr("className", "items").on_prop("onClick", {
                let clicks = Rc::clone(&clicks);
                move |_| clicks.set(clicks.get() + 1)
            }),
        )
        .unwrap();

    let node = *list.node();
    assert_eq!(document.property(node, "className"), Some(json!("items")));
    assert_eq!(document.property(node, "onclick"), None);
    assert_eq!(document.listener_count(node), 1);
    assert_eq!(document.children(node), vec![*first.node(), *second.node()]);
    assert_eq!(dom.get(second.key()).unwrap().parent(), Some(&node));

    document.click(node);
    assert_eq!(clicks.get(), 1);
}

#[test]
fn element_keys_are_written_to_the_host() {
    let (document, dom) = setup();
    let element = dom.element("div", (), Props::new()).unwrap();
    assert_eq!(
        document.attribute(*element.node(), DEFAULT_KEY_ATTRIBUTE),
        Some(element.key().to_string())
    );
}

#[test]
fn element_reports_host_failures() {
    let (_, dom) = setup();
    assert!(matches!(
        dom.element("not a tag", (), Props::new()),
        Err(FlexError::Host(_))
    ));
}

// ============================================================================
// State containers
// ============================================================================

#[test]
fn equal_values_trigger_no_render() {
    let (document, dom) = setup();
    let count = dom.use_state(3_u32);
    dom.render(|_| count.subscribe(label)).unwrap();

    assert_eq!(count.set(3, false).unwrap(), 0);
    assert_eq!(count.update(|n| *n, false).unwrap(), 0);
    assert_eq!(document.replacements(), 0);
}

#[test]
fn mapped_props_override_fixed_props() {
    let (_, dom) = setup();
    let state = dom.use_state(());
    let seen = Rc::new(std::cell::RefCell::new(None));

    state
        .subscribe_with(
            {
                let seen = Rc::clone(&seen);
                move |dom: &Dom<MemoryDocument>, props: Props| {
                    *seen.borrow_mut() = props.get_str("name").map(str::to_owned);
                    dom.element("div", (), Props::new())
                }
            },
            |(): &()| Props::new().attr("name", "y"),
            Props::new().attr("name", "x"),
        )
        .unwrap();

    assert_eq!(seen.borrow().as_deref(), Some("y"));
}

#[test]
fn skip_render_stores_without_replacing() {
    let (document, dom) = setup();
    let text = dom.use_state(String::from("a"));
    dom.render(|_| text.subscribe(label)).unwrap();

    assert_eq!(text.set("b".into(), true).unwrap(), 0);
    assert_eq!(document.replacements(), 0);
    assert_eq!(text.get(), "b");

    let reader = text.subscribe(label).unwrap();
    assert_eq!(document.text_content(*reader.node()), "b");
}

#[test]
fn typing_into_bound_input_keeps_the_element() {
    let (document, dom) = setup();
    let value: State<String, MemoryDocument> = dom.use_state(String::new());

    let field = dom
        .render(|dom| {
            let on_input = {
                let value = value.clone();
                move |event: &crate::Event| {
                    let typed = event.target_value().unwrap_or_default().to_owned();
                    value.set(typed, true).unwrap();
                }
            };
            let field = value.subscribe_with(
                text_input,
                |v: &String| Props::new().attr("value", v.as_str()),
                Props::new().on(EventName::Input, on_input),
            )?;
            dom.element("form", vec![field], Props::new())
        })
        .map(|form| document.children(*form.node())[0])
        .unwrap();

    assert_eq!(document.input(field, "abc"), 1);

    assert_eq!(document.replacements(), 0);
    assert_eq!(document.parent(field).map(|p| document.tag(p)), Some(Some("form".into())));
    let reader = value.subscribe(label).unwrap();
    assert_eq!(document.text_content(*reader.node()), "abc");
}

#[test]
fn every_subscriber_is_replaced_once_and_keeps_its_key() {
    let (document, dom) = setup();
    let count = dom.use_state(1_u32);

    let (first, second) = {
        let first = count.subscribe(label).unwrap();
        let second = count.subscribe(label).unwrap();
        dom.render(|dom| dom.element("div", vec![first.clone(), second.clone()], Props::new()))
            .unwrap();
        (first, second)
    };

    assert_eq!(count.set(5, false).unwrap(), 2);
    assert_eq!(document.replacements(), 2);

    for original in [&first, &second] {
        let now = current(&dom, original);
        assert_ne!(now, *original.node());
        assert_eq!(document.find_by_key(DEFAULT_KEY_ATTRIBUTE, original.key()), Some(now));
        assert_eq!(document.text_content(now), "5");
    }
}

#[test]
fn updater_sees_previous_value() {
    let (document, dom) = setup();
    let items = dom.use_state(vec!["a".to_owned()]);
    let list = dom
        .render(|_| {
            items.subscribe_with(
                |dom: &Dom<MemoryDocument>, props: Props| {
                    let entries = props
                        .get("items")
                        .and_then(Value::as_array)
                        .cloned()
                        .unwrap_or_default();
                    let children = entries
                        .iter()
                        .map(|entry| {
                            let text = entry.as_str().unwrap_or_default();
                            dom.element("li", text, Props::new())
                        })
                        .collect::<Result<Vec<_>>>()?;
                    dom.element("ul", children, Props::new())
                },
                |items: &Vec<String>| Props::new().attr("items", json!(items)),
                Props::new(),
            )
        })
        .unwrap();

    items
        .update(
            |prev| {
                let mut next = prev.clone();
                next.push("b".into());
                next
            },
            false,
        )
        .unwrap();

    let node = current(&dom, &list);
    assert_eq!(document.children(node).len(), 2);
    assert_eq!(document.text_content(node), "ab");
}

#[test]
fn clicking_a_bound_button_re_renders() {
    let (document, dom) = setup();
    let count = dom.use_state(0_u32);

    dom.render(|dom| {
        let bump = {
            let count = count.clone();
            move |_: &crate::Event| {
                count.update(|n| n + 1, false).unwrap();
            }
        };
        let shown = count.subscribe(label)?;
        let button = dom.element("button", "Add", Props::new().on(EventName::Click, bump))?;
        dom.element("div", vec![shown, button], Props::new())
    })
    .unwrap();

    let button = document.query_selector("button").unwrap().unwrap();
    document.click(button);
    document.click(button);

    assert_eq!(count.get(), 2);
    assert_eq!(document.replacements(), 2);
    let span = document.query_selector("span").unwrap().unwrap();
    assert_eq!(document.text_content(span), "2");
}

#[test]
fn unmounted_subscriber_fails_the_update() {
    let (_, dom) = setup();
    let count = dom.use_state(0_u32);
    let stale = count.subscribe(label).unwrap();

    let err = count.set(1, false).unwrap_err();
    assert_eq!(err, FlexError::UnknownKey(stale.key().clone()));
    assert_eq!(count.get(), 1);
}

#[test]
fn failing_subscriber_stops_the_re_render() {
    let (document, dom) = setup();
    let count = dom.use_state(0_u32);
    let stale = count.subscribe(label).unwrap();
    let mounted = dom.render(|_| count.subscribe(label)).unwrap();
    let before = current(&dom, &mounted);

    let err = count.set(1, false).unwrap_err();

    assert_eq!(err, FlexError::UnknownKey(stale.key().clone()));
    assert_eq!(document.replacements(), 0);
    assert_eq!(current(&dom, &mounted), before);
    assert_eq!(document.text_content(before), "0");
    assert_eq!(count.get(), 1);
}

#[test]
fn unsubscribed_elements_stop_updating() {
    let (document, dom) = setup();
    let count = dom.use_state(0_u32);
    let shown = dom.render(|_| count.subscribe(label)).unwrap();

    assert!(count.unsubscribe(shown.key()));
    assert!(!count.unsubscribe(shown.key()));
    assert_eq!(count.set(1, false).unwrap(), 0);
    assert_eq!(document.replacements(), 0);
    assert_eq!(count.subscriber_count(), 0);
}

#[test]
fn dropped_registry_is_reported() {
    let (_, dom) = setup();
    let count = dom.use_state(0_u32);
    drop(dom);

    assert_eq!(
        count.subscribe(label).unwrap_err(),
        FlexError::NoActiveRegistry
    );
    assert_eq!(count.set(1, true).unwrap(), 0);
    assert_eq!(count.set(2, false).unwrap_err(), FlexError::NoActiveRegistry);
}
