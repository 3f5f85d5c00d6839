// Widget configuration, read from the options object given by the host page.

use crate::{
    search::{ResultValue, SearchResult},
    utils::FmtError,
};
use anyhow::{Context, Result, anyhow};
use js_sys::Reflect;
use serde::Deserialize;
use wasm_bindgen::{JsCast, JsValue};

pub const DEFAULT_NUM_OF_RESULTS: usize = 10;

// Options read through JSON. `data` and `onSelect` are read as JS values.
const JSON_FIELDS: [&str; 3] = ["numOfResults", "url", "enterAction"];

/// What Enter does to the highlighted entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnterAction {
    /// Copy the entry's text into the input, nothing else.
    #[default]
    Fill,
    /// Behave exactly like clicking the entry (also calls `onSelect`).
    Select,
}

/// The data part of the options object. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Settings {
    pub num_of_results: usize,
    /// Filled from the JS array, never from JSON.
    #[serde(skip)]
    pub data: Vec<SearchResult>,
    /// Remote endpoint template; empty means "filter `data` locally".
    pub url: String,
    pub enter_action: EnterAction,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            num_of_results: DEFAULT_NUM_OF_RESULTS,
            data: Vec::new(),
            url: String::new(),
            enter_action: EnterAction::default(),
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("malformed autocomplete options")
    }

    pub fn is_remote(&self) -> bool {
        !self.url.is_empty()
    }
}

pub struct Options {
    pub settings: Settings,
    pub on_select: Option<js_sys::Function>,
    // `value` of each `data` entry, as given
    data_values: Vec<JsValue>,
}

impl Options {
    /// Read a JS options object. `undefined` or `null` give the defaults, and
    /// an `onSelect` that is not a function is ignored.
    pub fn from_js(options: &JsValue) -> Result<Self> {
        let mut ret = Self {
            settings: Settings::default(),
            on_select: None,
            data_values: Vec::new(),
        };
        if options.is_undefined() || options.is_null() {
            return Ok(ret);
        }

        let fields = js_sys::Object::new();
        for name in JSON_FIELDS {
            let key = JsValue::from_str(name);
            let value = Reflect::get(options, &key).fmt_err()?;
            if !value.is_undefined() {
                Reflect::set(&fields, &key, &value).fmt_err()?;
            }
        }
        let json: String = js_sys::JSON::stringify(&fields).fmt_err()?.into();
        ret.settings = Settings::from_json(&json)?;

        let data = Reflect::get(options, &JsValue::from_str("data")).fmt_err()?;
        if !data.is_undefined() {
            let data = data
                .dyn_into::<js_sys::Array>()
                .map_err(|_| anyhow!("data must be an array"))?;
            for (i, item) in data.iter().enumerate() {
                let text = Reflect::get(&item, &JsValue::from_str("text"))
                    .fmt_err()?
                    .as_string()
                    .with_context(|| format!("data[{i}].text is not a string"))?;
                let value = Reflect::get(&item, &JsValue::from_str("value")).fmt_err()?;
                ret.settings.data.push(SearchResult::from_data(text, i));
                ret.data_values.push(value);
            }
        }

        ret.on_select = Reflect::get(options, &JsValue::from_str("onSelect"))
            .fmt_err()?
            .dyn_into::<js_sys::Function>()
            .ok();

        Ok(ret)
    }

    /// The JS value to hand to `onSelect`. Data entries give back the object
    /// the host supplied; remote ids are rebuilt from their JSON.
    pub fn js_value(&self, value: &ResultValue) -> Result<JsValue> {
        match value {
            ResultValue::Data(i) => self
                .data_values
                .get(*i)
                .cloned()
                .with_context(|| format!("no data entry {i}")),
            ResultValue::Remote(id) => js_sys::JSON::parse(&id.to_string()).fmt_err(),
        }
    }
}
