// The results list: one <li> per result, rebuilt in full on every render.

use crate::{
    jet::{
        AccessToken, ArrayHandle, Component, ControlHandlers, ElementFactory, ElementHandle,
        ReactiveComponent, TextHandle, WithElement,
    },
    search::SearchResult,
};
use anyhow::Result;
use web_sys::{HtmlLiElement, HtmlUListElement, MouseEvent};

const LIST_CLASS: &str = "results";
const ENTRY_CLASS: &str = "result";
const HIGHLIGHTED_CLASS: &str = "result highlighted";

struct DropdownEntry {
    item: ReactiveComponent<ElementHandle<HtmlLiElement>>,
    label: TextHandle,
}

impl DropdownEntry {
    fn set_highlighted(&mut self, on: bool) -> Result<()> {
        let class = if on { HIGHLIGHTED_CLASS } else { ENTRY_CLASS };
        self.item.inner_mut().set_attribute("class", class)
    }
}

pub struct Dropdown {
    list: ElementHandle<HtmlUListElement>,
    entries: Vec<DropdownEntry>,
}

impl Dropdown {
    pub fn new(factory: &ElementFactory) -> Result<Self> {
        let mut list = factory.ul()?;
        list.set_attribute("class", LIST_CLASS)?;
        Ok(Self {
            list,
            entries: Vec::new(),
        })
    }

    /// Replace the list content with `results`. `on_click(i)` builds the
    /// click handler for entry `i`.
    pub fn render<H>(
        &mut self,
        factory: &ElementFactory,
        results: &[SearchResult],
        mut on_click: impl FnMut(usize) -> H,
    ) -> Result<()>
    where
        H: Fn(MouseEvent) + 'static,
    {
        let mut entries = Vec::with_capacity(results.len());
        let mut nodes = ArrayHandle::new_with_length(results.len());
        for (i, result) in results.iter().enumerate() {
            let mut item = ReactiveComponent::new(factory.li()?);
            item.inner_mut().set_attribute("class", ENTRY_CLASS)?;
            let label = factory.text(&result.text);
            item.inner().append_node(&label)?;
            item.set_onclick(on_click(i));
            nodes.set(i, &item);
            entries.push(DropdownEntry { item, label });
        }

        self.list.attach_nodes(nodes);
        // the old entries are already detached, so dropping them is quiet
        self.entries = entries;
        Ok(())
    }

    /// Move the highlight marker from `previous` to `current`.
    pub fn set_highlight(&mut self, previous: Option<usize>, current: Option<usize>) -> Result<()> {
        if let Some(entry) = previous.and_then(|i| self.entries.get_mut(i)) {
            entry.set_highlighted(false)?;
        }
        if let Some(entry) = current.and_then(|i| self.entries.get_mut(i)) {
            entry.set_highlighted(true)?;
        }
        Ok(())
    }

    /// Text shown by entry `index`, as it is in the DOM.
    pub fn entry_text(&self, index: usize) -> Option<String> {
        self.entries.get(index).map(|entry| entry.label.data())
    }
}

impl WithElement for Dropdown {
    type Element = HtmlUListElement;
    fn with_element(&self, f: impl FnMut(&HtmlUListElement), g: AccessToken) {
        self.list.with_element(f, g)
    }
}

impl Component for Dropdown {
    fn audit(&self) {
        self.list.audit();
        let children = self.list.get_child_node_list();
        assert_eq!(children.length(), self.entries.len());
        for (i, entry) in self.entries.iter().enumerate() {
            children.audit_node(i, &entry.item);
            entry.item.audit();
            let labels = entry.item.inner().get_child_node_list();
            assert_eq!(labels.length(), 1);
            labels.audit_node(0, &entry.label);
        }
    }
}
