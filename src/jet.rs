// Autocomplete "web support" structs to be used by Components.
// These wrap web_sys types to prevent "unsafe" access to the underlying DOM object.
// A Component owns its elements (they leave the page when it is dropped) and
// holds explicit handles to them, so it never has to find a node by walking
// to a parent or sibling.

use crate::utils::FmtError;
use anyhow::{Context, Result, anyhow};
use delegate::delegate;
use std::{
    collections::HashMap,
    ops::{Deref, DerefMut},
};
use wasm_bindgen::closure::Closure;
use web_sys::{Element, HtmlElement, KeyboardEvent, MouseEvent, wasm_bindgen::JsCast};

// Traits that give "raw" access to an underlying node or element,
// only usable from the jet (web support) module.
struct _Private();
pub struct AccessToken(_Private);
const TOKEN: AccessToken = AccessToken(_Private());

pub trait WithNode {
    fn with_node(&self, f: impl FnMut(&web_sys::Node), g: AccessToken);
}

// Any HTML element
pub trait AnyElement: AsRef<Element> + AsRef<web_sys::Node> {
    fn element(&self) -> &Element {
        self.as_ref()
    }
}

impl<T: AsRef<Element> + AsRef<web_sys::Node>> AnyElement for T {}

pub trait WithElement {
    type Element: AnyElement;
    fn with_element(&self, f: impl FnMut(&Self::Element), g: AccessToken);
}

impl<T: WithElement> WithNode for T {
    fn with_node(&self, mut f: impl FnMut(&web_sys::Node), g: AccessToken) {
        self.with_element(|elem| f(elem.as_ref()), g);
    }
}

// Wrapper for a Node or Element that removes it from its parent when dropped
struct AutoRemove<T: AsRef<web_sys::Node>>(T);

impl<T: AsRef<web_sys::Node>> From<T> for AutoRemove<T> {
    fn from(t: T) -> Self {
        Self(t)
    }
}

impl<T: AsRef<web_sys::Node>> Deref for AutoRemove<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: AsRef<web_sys::Node>> DerefMut for AutoRemove<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: AsRef<web_sys::Node>> Drop for AutoRemove<T> {
    fn drop(&mut self) {
        // already detached if the parent replaced its children
        if let Some(parent) = self.0.as_ref().parent_node() {
            let _ = parent.remove_child(self.0.as_ref());
        }
    }
}

// Wrapper for a DOM Text node, allowing access to and modification of its CharacterData's data.
// Access to the underlying Node is only via the WithNode trait (i.e. only in this module).
pub struct TextHandle(AutoRemove<web_sys::Text>);

impl WithNode for TextHandle {
    fn with_node(&self, mut f: impl FnMut(&web_sys::Node), _g: AccessToken) {
        f(&self.0)
    }
}

impl TextHandle {
    delegate! {
        to self.0 {
            pub fn data(&self) -> String;
        }
    }
}

// Event handlers on an element
#[derive(Default)]
pub struct Handlers {
    input: Option<Closure<dyn Fn(web_sys::Event)>>,
    keydown: Option<Closure<dyn Fn(KeyboardEvent)>>,
    click: Option<Closure<dyn Fn(MouseEvent)>>,
}

impl Handlers {
    pub fn audit(&self, elem: &impl AsRef<HtmlElement>) {
        audit_handler(&self.input, elem.as_ref().oninput());
        audit_handler(&self.keydown, elem.as_ref().onkeydown());
        audit_handler(&self.click, elem.as_ref().onclick());

        fn audit_handler<EventType>(
            expected: &Option<Closure<dyn Fn(EventType)>>,
            actual: Option<::js_sys::Function>,
        ) {
            match (expected, actual) {
                (Some(expected), Some(actual)) => {
                    assert_eq!(actual, *expected.as_ref().unchecked_ref())
                }
                (Some(_), None) => panic!("missing event handler"),
                (None, Some(_)) => panic!("unexpected event handler"),
                (None, None) => (),
            }
        }
    }
}

pub struct ReactiveComponent<T: ElementComponent> {
    component: T,
    handlers: Handlers,
}

impl<T: ElementComponent> ReactiveComponent<T>
where
    T::Element: AsRef<HtmlElement>,
{
    pub fn new(component: T) -> Self {
        Self {
            component,
            handlers: Handlers::default(),
        }
    }

    pub fn inner(&self) -> &T {
        &self.component
    }

    pub fn inner_mut(&mut self) -> &mut T {
        &mut self.component
    }
}

pub trait ControlHandlers {
    fn set_oninput<F: Fn(web_sys::Event) + 'static>(&mut self, handler: F);
    fn set_onkeydown<F: Fn(KeyboardEvent) + 'static>(&mut self, handler: F);
    fn set_onclick<F: Fn(MouseEvent) + 'static>(&mut self, handler: F);
}

impl<T: ElementComponent> ControlHandlers for ReactiveComponent<T>
where
    T::Element: AsRef<HtmlElement>,
{
    fn set_oninput<F: Fn(web_sys::Event) + 'static>(&mut self, handler: F) {
        let closure = self.handlers.input.insert(Closure::new(handler));
        self.component.with_element(
            |elem| {
                let html: &HtmlElement = elem.as_ref();
                html.set_oninput(Some(closure.as_ref().unchecked_ref()))
            },
            TOKEN,
        );
    }

    fn set_onkeydown<F: Fn(KeyboardEvent) + 'static>(&mut self, handler: F) {
        let closure = self.handlers.keydown.insert(Closure::new(handler));
        self.component.with_element(
            |elem| {
                let html: &HtmlElement = elem.as_ref();
                html.set_onkeydown(Some(closure.as_ref().unchecked_ref()))
            },
            TOKEN,
        );
    }

    fn set_onclick<F: Fn(MouseEvent) + 'static>(&mut self, handler: F) {
        let closure = self.handlers.click.insert(Closure::new(handler));
        self.component.with_element(
            |elem| {
                let html: &HtmlElement = elem.as_ref();
                html.set_onclick(Some(closure.as_ref().unchecked_ref()))
            },
            TOKEN,
        );
    }
}

impl<T: ElementComponent> Component for ReactiveComponent<T>
where
    T::Element: AsRef<HtmlElement>,
{
    fn audit(&self) {
        self.component.audit();
        self.component.with_element(
            |elem| {
                self.handlers.audit(&elem);
            },
            TOKEN,
        );
    }
}

impl<T: ElementComponent> WithElement for ReactiveComponent<T> {
    type Element = T::Element;
    fn with_element(&self, f: impl FnMut(&Self::Element), g: AccessToken) {
        self.component.with_element(f, g)
    }
}

// Wrapper for a DOM Element, allowing access to and modification of its attributes
// and event handlers, and the ability to set and append to its child nodes.
pub struct ElementHandle<T: AnyElement> {
    elem: AutoRemove<T>,
    attributes: HashMap<String, String>,
}

impl<T: AnyElement> WithElement for ElementHandle<T> {
    type Element = T;
    fn with_element(&self, mut f: impl FnMut(&T), _g: AccessToken) {
        f(&self.elem.0)
    }
}

impl<T: AnyElement> ElementHandle<T> {
    fn new(elem: T) -> Self {
        Self {
            elem: elem.into(),
            attributes: HashMap::default(),
        }
    }

    pub fn append_node(&self, child: &impl WithNode) -> Result<()> {
        let mut ret = Ok(());
        child.with_node(
            |node| ret = self.elem.element().append_with_node_1(node).fmt_err(),
            TOKEN,
        );
        ret
    }

    // Replaces every existing child in one step.
    pub fn attach_nodes(&self, children: ArrayHandle) {
        self.elem.element().replace_children_with_node(&children.0);
    }

    pub fn set_attribute(&mut self, name: &str, value: &str) -> Result<()> {
        match self.attributes.insert(name.to_string(), value.to_string()) {
            Some(x) if x == value => Ok(()),
            _ => self.elem.element().set_attribute(name, value).fmt_err(),
        }
    }

    pub fn get_child_node_list(&self) -> NodeListHandle {
        NodeListHandle(self.elem.element().child_nodes())
    }
}

impl<T: AnyElement> Component for ElementHandle<T> {
    fn audit(&self) {
        for (key, value) in &self.attributes {
            if let Some(dom_value) = self.elem.element().get_attribute(key) {
                assert_eq!(dom_value, *value);
            } else {
                panic!("missing {key} (expected value {value})");
            }
        }

        for dom_key in self.elem.element().get_attribute_names() {
            assert!(self.attributes.contains_key(&dom_key.as_string().unwrap()));
        }
    }
}

impl ElementHandle<web_sys::HtmlInputElement> {
    delegate! {
        to self.elem.0 {
            pub fn value(&self) -> String;
            pub fn set_value(&self, value: &str);
        }
    }
}

// Wrapper for the page-owned element the widget attaches to. Unlike an
// ElementHandle it is never removed from the DOM, and its other children
// are left alone.
pub struct HostHandle(Element);

impl From<Element> for HostHandle {
    fn from(elem: Element) -> Self {
        Self(elem)
    }
}

impl HostHandle {
    pub fn append_node(&self, child: &impl WithNode) -> Result<()> {
        let mut ret = Ok(());
        child.with_node(|node| ret = self.0.append_with_node_1(node).fmt_err(), TOKEN);
        ret
    }

    // Panics unless `child` is currently attached directly under the host.
    pub fn audit_child(&self, child: &impl WithNode) {
        let host: &web_sys::Node = &self.0;
        child.with_node(
            |node| {
                let parent = node.parent_node();
                assert!(
                    parent.is_some_and(|p| p.is_same_node(Some(host))),
                    "component detached from host"
                );
            },
            TOKEN,
        );
    }
}

#[derive(Clone)]
pub struct ElementFactory(web_sys::Document);

impl ElementFactory {
    pub fn for_host(host: &HostHandle) -> Result<Self> {
        host.0
            .owner_document()
            .map(Self)
            .context("host element has no owner document")
    }

    fn create_element<T: JsCast>(&self, t: &str) -> Result<T> {
        self.0
            .create_element(t)
            .fmt_err()?
            .dyn_into::<T>()
            .map_err(|_| anyhow!("expecting {t} element"))
    }

    pub fn input(&self) -> Result<ElementHandle<web_sys::HtmlInputElement>> {
        Ok(ElementHandle::new(self.create_element("input")?))
    }

    pub fn ul(&self) -> Result<ElementHandle<web_sys::HtmlUListElement>> {
        Ok(ElementHandle::new(self.create_element("ul")?))
    }

    pub fn li(&self) -> Result<ElementHandle<web_sys::HtmlLiElement>> {
        Ok(ElementHandle::new(self.create_element("li")?))
    }

    pub fn text(&self, data: &str) -> TextHandle {
        TextHandle(self.0.create_text_node(data).into())
    }
}

// Wrapper for a DOM NodeList, allowing audit that each entry matches an expected node.
pub struct NodeListHandle(web_sys::NodeList);

impl NodeListHandle {
    pub fn length(&self) -> usize {
        self.0.length() as usize
    }

    pub fn audit_node(&self, index: usize, child: &impl WithNode) {
        child.with_node(
            |node| {
                if let Some(actual) = self.0.item(index.try_into().expect("index -> u32"))
                    && actual.is_same_node(Some(node))
                {
                    return;
                }
                panic!("node {} mismatch (#{}/{})", index, index + 1, self.length())
            },
            TOKEN,
        );
    }
}

// Wrapper for a DOM Array, allowing modification of its entries.
pub struct ArrayHandle(js_sys::Array);

impl ArrayHandle {
    pub fn new_with_length(len: usize) -> Self {
        Self(js_sys::Array::new_with_length(
            len.try_into().expect("len -> u32"),
        ))
    }

    pub fn set(&mut self, index: usize, child: &impl WithNode) {
        child.with_node(
            |node| {
                self.0
                    .set(index.try_into().expect("index -> u32"), node.into())
            },
            TOKEN,
        )
    }
}

// A trait for a safe "Component", allowing wrapped access to its root Node and audit
// that the DOM subtree matches the Component's expectations.
pub trait Component: WithNode {
    fn audit(&self);
}

// ElementComponent is a trait for a "Component" that is also an HTML Element (e.g. not Text).
pub trait ElementComponent: Component + WithElement {}
impl<U: Component + WithElement> ElementComponent for U {}
