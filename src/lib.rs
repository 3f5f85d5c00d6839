//! Search-as-you-type input with a dropdown of suggestions.
//!
//! The widget appends a search input and a results list to a host element.
//! Typing filters either a locally supplied list (substring match) or the
//! response of a remote endpoint (prefix match), and the matches can be picked
//! by click or with the arrow keys and Enter.
//!
//! From JS:
//!
//! ```js
//! const widget = new Autocomplete(document.getElementById("search"), {
//!   numOfResults: 5,
//!   url: "https://api.github.com/search/users?q=${query}",
//!   onSelect: (id) => console.log("picked", id),
//! });
//! ```

mod autocomplete;
pub mod config;
mod dropdown;
mod jet;
pub mod remote;
pub mod search;
pub mod state;
mod utils;

pub use autocomplete::Autocomplete;
pub use config::{EnterAction, Options, Settings};
pub use search::{ResultValue, SearchResult, cap_results, filter_local};

use utils::to_js_error;
use wasm_bindgen::prelude::*;

/// JS-facing handle for one widget instance.
#[wasm_bindgen(js_name = Autocomplete)]
pub struct AutocompleteHandle {
    widget: Option<Autocomplete>,
}

#[wasm_bindgen(js_class = Autocomplete)]
impl AutocompleteHandle {
    /// Attach a new widget to `root`. Throws if `options` is malformed.
    #[wasm_bindgen(constructor)]
    pub fn new(root: web_sys::Element, options: JsValue) -> Result<AutocompleteHandle, JsValue> {
        let options = Options::from_js(&options).map_err(to_js_error)?;
        let widget = Autocomplete::new(root, options).map_err(to_js_error)?;
        Ok(Self {
            widget: Some(widget),
        })
    }

    #[wasm_bindgen(js_name = onQueryChange)]
    pub fn on_query_change(&self, query: &str) {
        if let Some(widget) = &self.widget {
            widget.on_query_change(query);
        }
    }

    pub fn query(&self) -> String {
        self.widget
            .as_ref()
            .map(Autocomplete::query)
            .unwrap_or_default()
    }

    /// Remove the input and list from the host and release the event handlers.
    pub fn destroy(&mut self) {
        self.widget = None;
    }
}
