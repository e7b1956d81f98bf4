use std::{cell::RefCell, rc::Rc};

use flexdom::{Dom, Host, MemoryDocument, NodeId, State, Value};

use crate::{Cat, CatFetcher, page_layout};

struct Page {
    document: MemoryDocument,
    _dom: Dom<MemoryDocument>,
    requests: Rc<RefCell<Vec<u32>>>,
}

impl Page {
    fn mount() -> Self {
        let document = MemoryDocument::with_container("root");
        let requests = Rc::new(RefCell::new(Vec::new()));
        let fetch: CatFetcher<MemoryDocument> = Rc::new({
            let requests = Rc::clone(&requests);
            move |limit: u32, cats: State<Vec<Cat>, MemoryDocument>| {
                requests.borrow_mut().push(limit);
                let found = (0..limit)
                    .map(|i| Cat {
                        id: format!("cat{i}"),
                        url: format!("https://cats.test/{i}.jpg"),
                    })
                    .collect();
                cats.set(found, false).unwrap();
            }
        });
        let dom = flexdom::start(document.clone(), "#root", |dom| page_layout(dom, fetch)).unwrap();
        Self {
            document,
            _dom: dom,
            requests,
        }
    }

    fn inputs(&self) -> Vec<NodeId> {
        self.document.query_selector_all("input")
    }

    fn first(&self, selector: &str) -> NodeId {
        self.document.query_selector(selector).unwrap().unwrap()
    }

    fn value(&self, node: NodeId) -> Option<Value> {
        self.document.property(node, "value")
    }
}

#[test]
fn page_renders_both_examples() {
    let page = Page::mount();

    assert_eq!(page.inputs().len(), 3);
    assert_eq!(page.document.query_selector_all("h2").len(), 2);
    assert_eq!(page.document.query_selector_all(".home-page").len(), 2);
    assert_eq!(page.document.text_content(page.first("h1")), "2");
    assert!(page.document.children(page.first(".cats-list")).is_empty());
    assert_eq!(page.document.replacements(), 0);
}

#[test]
fn typing_a_name_keeps_the_input_mounted() {
    let page = Page::mount();
    let name = page.inputs()[0];

    page.document.input(name, "Ada");

    assert_eq!(page.document.replacements(), 0);
    assert_eq!(page.inputs()[0], name);
    assert_eq!(page.value(name), Some(Value::from("Ada")));
}

#[test]
fn adding_a_hobby_re_renders_the_form() {
    let page = Page::mount();
    page.document.input(page.inputs()[0], "Ada");
    page.document.input(page.inputs()[1], "Lovelace");

    page.document.click(page.first("button"));

    assert_eq!(page.document.replacements(), 3);
    let inputs = page.inputs();
    assert_eq!(inputs.len(), 4);
    assert_eq!(page.value(inputs[0]), Some(Value::from("Ada")));
    assert_eq!(page.value(inputs[1]), Some(Value::from("Lovelace")));
    assert_eq!(page.value(inputs[2]), Some(Value::from("")));
}

#[test]
fn hobby_edits_survive_the_next_render() {
    let page = Page::mount();
    let button = page.first("button");
    page.document.click(button);

    page.document.input(page.inputs()[2], "chess");
    assert_eq!(page.document.replacements(), 3);

    page.document.click(button);
    let inputs = page.inputs();
    assert_eq!(inputs.len(), 5);
    assert_eq!(page.value(inputs[2]), Some(Value::from("chess")));
    assert_eq!(page.value(inputs[3]), Some(Value::from("")));
}

#[test]
fn count_input_drives_heading_and_pictures() {
    let page = Page::mount();
    let count = *page.inputs().last().unwrap();

    page.document.input(count, "3");

    assert_eq!(*page.requests.borrow(), vec![3]);
    assert_eq!(page.document.text_content(page.first("h1")), "3");
    let images = page.document.children(page.first(".cats-list"));
    assert_eq!(images.len(), 3);
    assert_eq!(
        page.document.property(images[1], "src"),
        Some(Value::from("https://cats.test/1.jpg"))
    );
    assert_eq!(page.document.replacements(), 2);
}

#[test]
fn count_input_ignores_empty_and_garbage() {
    let page = Page::mount();
    let count = *page.inputs().last().unwrap();

    page.document.input(count, "");
    page.document.input(count, "many");

    assert!(page.requests.borrow().is_empty());
    assert_eq!(page.document.replacements(), 0);
}

#[test]
fn search_url_carries_the_limit() {
    assert_eq!(
        crate::cats::search_url(5),
        "https://api.thecatapi.com/v1/images/search?limit=5&size=full&sub_id=demo-e17b0"
    );
}
