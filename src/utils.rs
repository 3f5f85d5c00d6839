use wasm_bindgen::JsValue;

pub trait FmtError {
    type T;
    fn fmt_err(self) -> anyhow::Result<Self::T, anyhow::Error>;
}
impl<T, Q: core::fmt::Debug> FmtError for Result<T, Q> {
    type T = T;
    fn fmt_err(self) -> anyhow::Result<T, anyhow::Error> {
        self.map_err(|e| anyhow::Error::msg(format!("{e:?}")))
    }
}

/// Convert an error into something that can be thrown back to JS.
pub fn to_js_error(e: anyhow::Error) -> JsValue {
    JsValue::from_str(&format!("{e:#}"))
}

/// Case-insensitive substring test (both sides lowercased).
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Case-insensitive prefix test (both sides lowercased).
pub fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack.to_lowercase().starts_with(&prefix.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Paris", "ar"));
        assert!(contains_ignore_case("Paris", "PAR"));
        assert!(contains_ignore_case("Paris", "is"));
        assert!(contains_ignore_case("ÉCOLE", "éco"));
        assert!(!contains_ignore_case("Paris", "rome"));
        assert!(!contains_ignore_case("", "a"));
    }

    #[test]
    fn test_starts_with_ignore_case() {
        assert!(starts_with_ignore_case("Ada", "a"));
        assert!(starts_with_ignore_case("ada", "AD"));
        assert!(!starts_with_ignore_case("Bo", "a"));
        // contains is not enough
        assert!(!starts_with_ignore_case("Nadia", "ad"));
    }

    #[test]
    fn test_fmt_err() {
        let failed: Result<(), &str> = Err("boom");
        let e = failed.fmt_err().unwrap_err();
        assert_eq!(e.to_string(), "\"boom\"");
        let ok: Result<u8, &str> = Ok(3);
        assert_eq!(ok.fmt_err().unwrap(), 3);
    }
}
