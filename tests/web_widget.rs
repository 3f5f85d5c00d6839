//! Browser tests for the widget wired to a real document: DOM layout, event
//! handling, and what reaches `onSelect`.

#![cfg(target_arch = "wasm32")]

use autocomplete_web::{Autocomplete, Options};
use js_sys::{Array, Object, Reflect};
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::{JsCast, JsValue, prelude::Closure};
use wasm_bindgen_test::*;
use web_sys::{Element, Event, HtmlElement, HtmlInputElement, KeyboardEvent, KeyboardEventInit};

wasm_bindgen_test_configure!(run_in_browser);

fn host() -> Element {
    let document = web_sys::window().unwrap().document().unwrap();
    let host = document.create_element("div").unwrap();
    document.body().unwrap().append_child(&host).unwrap();
    host
}

fn set(target: &JsValue, key: &str, value: &JsValue) {
    Reflect::set(target, &JsValue::from_str(key), value).unwrap();
}

fn entry(text: &str, value: &JsValue) -> JsValue {
    let item: JsValue = Object::new().into();
    set(&item, "text", &JsValue::from_str(text));
    set(&item, "value", value);
    item
}

fn with_data(entries: &[JsValue]) -> JsValue {
    let options: JsValue = Object::new().into();
    let data: Array = entries.iter().collect();
    set(&options, "data", &data);
    options
}

/// Every value `onSelect` was called with, in call order.
struct Recorder {
    calls: Rc<RefCell<Vec<JsValue>>>,
    _callback: Closure<dyn Fn(JsValue)>,
}

impl Recorder {
    fn attach(options: &JsValue) -> Self {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let callback = Closure::<dyn Fn(JsValue)>::new(move |value| sink.borrow_mut().push(value));
        set(options, "onSelect", callback.as_ref());
        Self {
            calls,
            _callback: callback,
        }
    }

    fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn last(&self) -> JsValue {
        self.calls.borrow().last().cloned().unwrap()
    }
}

fn mount(host: &Element, options: &JsValue) -> Autocomplete {
    Autocomplete::new(host.clone(), Options::from_js(options).unwrap()).unwrap()
}

fn input_of(host: &Element) -> HtmlInputElement {
    host.first_element_child().unwrap().dyn_into().unwrap()
}

fn list_of(host: &Element) -> Element {
    host.first_element_child()
        .unwrap()
        .next_element_sibling()
        .unwrap()
}

fn entries(host: &Element) -> Vec<Element> {
    let mut ret = Vec::new();
    let mut next = list_of(host).first_element_child();
    while let Some(item) = next {
        next = item.next_element_sibling();
        ret.push(item);
    }
    ret
}

fn classes(host: &Element) -> Vec<String> {
    entries(host).iter().map(Element::class_name).collect()
}

fn texts(host: &Element) -> Vec<String> {
    entries(host)
        .iter()
        .map(|item| item.text_content().unwrap_or_default())
        .collect()
}

fn type_query(host: &Element, query: &str) {
    let input = input_of(host);
    input.set_value(query);
    input
        .dispatch_event(&Event::new("input").unwrap())
        .unwrap();
}

fn press(host: &Element, key: &str) {
    let init = KeyboardEventInit::new();
    init.set_key(key);
    init.set_cancelable(true);
    let ev = KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap();
    input_of(host).dispatch_event(&ev).unwrap();
}

fn click(item: &Element) {
    item.dyn_ref::<HtmlElement>().unwrap().click();
}

fn people() -> Vec<JsValue> {
    vec![
        entry("Ann Lee", &1.into()),
        entry("Bea Lee", &2.into()),
        entry("Cid Lee", &3.into()),
    ]
}

#[wasm_bindgen_test]
fn test_mount_appends_input_then_list() {
    let host = host();
    let _widget = mount(&host, &JsValue::UNDEFINED);

    assert_eq!(host.child_element_count(), 2);
    let input = host.first_element_child().unwrap();
    assert_eq!(input.tag_name(), "INPUT");
    assert_eq!(input.get_attribute("type").as_deref(), Some("search"));
    assert_eq!(input.get_attribute("class").as_deref(), Some("query"));
    assert_eq!(input.get_attribute("autocomplete").as_deref(), Some("off"));

    let list = list_of(&host);
    assert_eq!(list.tag_name(), "UL");
    assert_eq!(list.class_name(), "results");
    assert_eq!(list.child_element_count(), 0);
}

#[wasm_bindgen_test]
fn test_typing_renders_matches() {
    let host = host();
    let options = with_data(&[
        entry("Paris", &0.into()),
        entry("Lisbon", &1.into()),
        entry("Parma", &2.into()),
        entry("Caparica", &3.into()),
    ]);
    let _widget = mount(&host, &options);

    type_query(&host, "PAR");
    assert_eq!(texts(&host), ["Paris", "Parma", "Caparica"]);
    assert_eq!(classes(&host), ["result", "result", "result"]);

    type_query(&host, "");
    assert!(entries(&host).is_empty());
}

#[wasm_bindgen_test]
fn test_number_of_results_is_capped() {
    let host = host();
    let options = with_data(&people());
    set(&options, "numOfResults", &2.into());
    let _widget = mount(&host, &options);

    type_query(&host, "lee");
    assert_eq!(texts(&host), ["Ann Lee", "Bea Lee"]);
}

#[wasm_bindgen_test]
fn test_click_fills_input_and_notifies_once() {
    let host = host();
    let options = with_data(&[entry("Paris", &10.into())]);
    let recorder = Recorder::attach(&options);
    let _widget = mount(&host, &options);

    type_query(&host, "par");
    let items = entries(&host);
    assert_eq!(items.len(), 1);
    click(&items[0]);

    assert_eq!(input_of(&host).value(), "Paris");
    assert_eq!(recorder.count(), 1);
    assert_eq!(recorder.last().as_f64(), Some(10.0));
}

#[wasm_bindgen_test]
fn test_arrows_move_highlight_and_enter_fills() {
    let host = host();
    let options = with_data(&people());
    let recorder = Recorder::attach(&options);
    let _widget = mount(&host, &options);

    type_query(&host, "lee");
    press(&host, "ArrowDown");
    assert_eq!(classes(&host), ["result highlighted", "result", "result"]);
    press(&host, "ArrowDown");
    assert_eq!(classes(&host), ["result", "result highlighted", "result"]);

    press(&host, "Enter");
    assert_eq!(input_of(&host).value(), "Bea Lee");
    assert_eq!(recorder.count(), 0);
    // the list stays as it was
    assert_eq!(classes(&host), ["result", "result highlighted", "result"]);
}

#[wasm_bindgen_test]
fn test_arrow_up_wraps_to_last() {
    let host = host();
    let _widget = mount(&host, &with_data(&people()));

    type_query(&host, "lee");
    press(&host, "ArrowUp");
    assert_eq!(classes(&host), ["result", "result", "result highlighted"]);
    press(&host, "ArrowDown");
    assert_eq!(classes(&host), ["result highlighted", "result", "result"]);
}

#[wasm_bindgen_test]
fn test_enter_selects_when_configured() {
    let host = host();
    let options = with_data(&people());
    set(&options, "enterAction", &"select".into());
    let recorder = Recorder::attach(&options);
    let _widget = mount(&host, &options);

    type_query(&host, "lee");
    press(&host, "ArrowUp");
    press(&host, "Enter");
    assert_eq!(input_of(&host).value(), "Cid Lee");
    assert_eq!(recorder.count(), 1);
    assert_eq!(recorder.last().as_f64(), Some(3.0));
}

#[wasm_bindgen_test]
fn test_rerender_drops_old_entries_and_highlight() {
    let host = host();
    let _widget = mount(&host, &with_data(&people()));

    type_query(&host, "lee");
    press(&host, "ArrowDown");
    let old = entries(&host);
    assert_eq!(old.len(), 3);

    type_query(&host, "le");
    assert_eq!(classes(&host), ["result", "result", "result"]);
    assert!(old.iter().all(|item| item.parent_node().is_none()));

    // a fresh list starts from the top again
    press(&host, "ArrowDown");
    assert_eq!(classes(&host), ["result highlighted", "result", "result"]);
}

#[wasm_bindgen_test]
fn test_on_select_gets_the_supplied_value() {
    let host = host();
    let date: JsValue = js_sys::Date::new_0().into();
    let looped: JsValue = Object::new().into();
    set(&looped, "me", &looped);
    let options = with_data(&[
        entry("Oslo", &JsValue::UNDEFINED),
        entry("Rome", &date),
        entry("Riga", &looped),
    ]);
    let recorder = Recorder::attach(&options);
    let _widget = mount(&host, &options);

    type_query(&host, "o");
    assert_eq!(texts(&host), ["Oslo", "Rome"]);
    click(&entries(&host)[0]);
    assert!(recorder.last().is_undefined());
    click(&entries(&host)[1]);
    assert!(Object::is(&recorder.last(), &date));

    type_query(&host, "riga");
    click(&entries(&host)[0]);
    assert!(Object::is(&recorder.last(), &looped));
    assert_eq!(recorder.count(), 3);
}

#[wasm_bindgen_test]
fn test_ignores_non_function_on_select() {
    let host = host();
    let options = with_data(&[entry("Paris", &10.into())]);
    set(&options, "onSelect", &"not a function".into());
    let _widget = mount(&host, &options);

    type_query(&host, "par");
    click(&entries(&host)[0]);
    assert_eq!(input_of(&host).value(), "Paris");
}

#[wasm_bindgen_test]
fn test_dropping_widget_detaches_it() {
    let host = host();
    let widget = mount(&host, &with_data(&people()));
    type_query(&host, "lee");
    assert_eq!(host.child_element_count(), 2);

    drop(widget);
    assert_eq!(host.child_element_count(), 0);
}
