// The Autocomplete widget: a search input followed by a results list,
// appended to a host element.

use crate::{
    config::Options,
    dropdown::Dropdown,
    jet::{Component, ControlHandlers, ElementFactory, ElementHandle, HostHandle, ReactiveComponent},
    remote::fetch_results,
    search::{SearchResult, filter_local},
    state::{KeyAction, KeyOutcome, SearchState, Selection, Ticket},
    utils::FmtError,
};
use anyhow::Result;
use std::{cell::RefCell, rc::Rc};
use wasm_bindgen::JsValue;
use web_sys::{HtmlInputElement, KeyboardEvent, MouseEvent, console::log_1};

type InputType = ReactiveComponent<ElementHandle<HtmlInputElement>>;

struct _Autocomplete {
    host: HostHandle,
    input: InputType,
    dropdown: Dropdown,
    factory: ElementFactory,
    options: Options,
    state: SearchState,
}

pub struct Autocomplete(Rc<RefCell<_Autocomplete>>);

impl Clone for Autocomplete {
    fn clone(&self) -> Self {
        Autocomplete(Rc::clone(&self.0))
    }
}

impl Autocomplete {
    /// Build the input and the (empty) list and append them to `root`, in that order.
    pub fn new(root: web_sys::Element, options: Options) -> Result<Self> {
        let host = HostHandle::from(root);
        let factory = ElementFactory::for_host(&host)?;

        let mut input = ReactiveComponent::new(factory.input()?);
        input.inner_mut().set_attribute("type", "search")?;
        input.inner_mut().set_attribute("name", "query")?;
        input.inner_mut().set_attribute("autocomplete", "off")?;
        input.inner_mut().set_attribute("class", "query")?;
        let dropdown = Dropdown::new(&factory)?;

        host.append_node(&input)?;
        host.append_node(&dropdown)?;

        let state = SearchState::new(
            options.settings.num_of_results,
            options.settings.enter_action,
        );
        let ret = Autocomplete(Rc::new(RefCell::new(_Autocomplete {
            host,
            input,
            dropdown,
            factory,
            options,
            state,
        })));

        {
            let mut inner = ret.0.borrow_mut();

            let widget = Rc::downgrade(&ret.0);
            inner.input.set_oninput(move |_| {
                if let Some(widget) = widget.upgrade() {
                    let widget = Autocomplete(widget);
                    let query = widget.query();
                    widget.on_query_change(&query);
                }
            });

            let widget = Rc::downgrade(&ret.0);
            inner.input.set_onkeydown(move |ev| {
                if let Some(widget) = widget.upgrade()
                    && let Err(e) = Autocomplete(widget).handle_keydown(&ev)
                {
                    log_1(&format!("keydown handler: {e:#}").into());
                }
            });
        }

        #[cfg(debug_assertions)]
        ret.audit();

        Ok(ret)
    }

    /// Current text of the query input.
    pub fn query(&self) -> String {
        self.0.borrow().input.inner().value()
    }

    /// Resolve `query` and re-render the list. Remote lookups finish later;
    /// if another query has started by then, their results are dropped.
    pub fn on_query_change(&self, query: &str) {
        let (ticket, remote_url) = {
            let mut inner = self.0.borrow_mut();
            let ticket = inner.state.begin_query();
            let settings = &inner.options.settings;
            (ticket, settings.is_remote().then(|| settings.url.clone()))
        };

        let Some(url) = remote_url else {
            let results = filter_local(query, &self.0.borrow().options.settings.data);
            self.apply_results(ticket, results);
            return;
        };

        let widget = Rc::downgrade(&self.0);
        let query = query.to_string();
        wasm_bindgen_futures::spawn_local(async move {
            match fetch_results(&url, &query).await {
                Ok(results) => {
                    if let Some(widget) = widget.upgrade() {
                        Autocomplete(widget).apply_results(ticket, results);
                    }
                }
                Err(e) => log_1(&format!("lookup for {query:?} failed: {e:#}").into()),
            }
        });
    }

    fn apply_results(&self, ticket: Ticket, results: Vec<SearchResult>) {
        if let Err(e) = self.render(ticket, results) {
            log_1(&format!("rendering results failed: {e:#}").into());
        }
    }

    fn render(&self, ticket: Ticket, results: Vec<SearchResult>) -> Result<()> {
        {
            let mut guard = self.0.borrow_mut();
            let inner = &mut *guard;
            if !inner.state.accept(ticket, results) {
                return Ok(());
            }

            let widget = Rc::downgrade(&self.0);
            inner
                .dropdown
                .render(&inner.factory, inner.state.results(), |index| {
                    let widget = widget.clone();
                    move |_: MouseEvent| {
                        if let Some(widget) = widget.upgrade()
                            && let Err(e) = Autocomplete(widget).select_entry(index)
                        {
                            log_1(&format!("click handler: {e:#}").into());
                        }
                    }
                })?;
        }

        #[cfg(debug_assertions)]
        self.audit();

        Ok(())
    }

    fn select_entry(&self, index: usize) -> Result<()> {
        let selection = self.0.borrow().state.click(index);
        match selection {
            Some(selection) => self.commit(selection),
            None => Ok(()),
        }
    }

    fn handle_keydown(&self, ev: &KeyboardEvent) -> Result<()> {
        let action = KeyAction::from_key(&ev.key());
        let outcome = self.0.borrow_mut().state.handle_key(action);
        match outcome {
            KeyOutcome::Unchanged => {}
            KeyOutcome::Highlight { previous, current } => {
                // keep the caret where it is
                ev.prevent_default();
                self.0
                    .borrow_mut()
                    .dropdown
                    .set_highlight(previous, Some(current))?;
            }
            KeyOutcome::Select(selection) => self.commit(selection)?,
        }
        Ok(())
    }

    // Fill the input, then call onSelect. No borrow is held during the
    // callback, so it may call back into the widget.
    fn commit(&self, selection: Selection) -> Result<()> {
        let callback = {
            let inner = self.0.borrow();
            inner.input.inner().set_value(&selection.text);
            match &inner.options.on_select {
                Some(on_select) if selection.notify => Some((
                    on_select.clone(),
                    inner.options.js_value(&selection.value)?,
                )),
                _ => None,
            }
        };
        if let Some((on_select, value)) = callback {
            on_select.call1(&JsValue::NULL, &value).fmt_err()?;
        }
        Ok(())
    }

    /// Check that the DOM matches what the widget believes it rendered.
    pub fn audit(&self) {
        let inner = self.0.borrow();
        inner.host.audit_child(&inner.input);
        inner.host.audit_child(&inner.dropdown);
        inner.input.audit();
        inner.dropdown.audit();

        let results = inner.state.results();
        for (i, result) in results.iter().enumerate() {
            assert_eq!(
                inner.dropdown.entry_text(i).as_deref(),
                Some(result.text.as_str())
            );
        }
        assert_eq!(inner.dropdown.entry_text(results.len()), None);
    }
}
