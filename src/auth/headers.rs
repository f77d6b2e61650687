// Header access over the two supported request shapes

use axum::http::HeaderMap;
use std::collections::HashMap;

/// Anything a bearer token can be read from
///
/// `header` returns the single string value for `name`, or `None` when the
/// header is absent, multi-valued or not valid text.
pub trait HeaderSource {
    fn header(&self, name: &str) -> Option<String>;
}

/// Header-accessor adapter over an HTTP header map (case-insensitive `get`)
#[derive(Debug, Clone, Copy)]
pub struct AccessorHeaders<'a>(pub &'a HeaderMap);

impl HeaderSource for AccessorHeaders<'_> {
    fn header(&self, name: &str) -> Option<String> {
        self.0
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    }
}

impl HeaderSource for HeaderMap {
    fn header(&self, name: &str) -> Option<String> {
        AccessorHeaders(self).header(name)
    }
}

/// Value slot of a plain header map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderField {
    Single(String),
    Multiple(Vec<String>),
}

/// Plain header-map adapter (lower-cased keys, possibly repeated values)
#[derive(Debug, Clone, Default)]
pub struct PlainHeaders(pub HashMap<String, HeaderField>);

impl PlainHeaders {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: HeaderField) {
        self.0.insert(name.to_ascii_lowercase(), value);
    }
}

impl HeaderSource for PlainHeaders {
    fn header(&self, name: &str) -> Option<String> {
        let field = self.0.get(name).or_else(|| {
            self.0
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, field)| field)
        })?;

        match field {
            HeaderField::Single(value) => Some(value.clone()),
            HeaderField::Multiple(_) => None,
        }
    }
}

/// Strip a leading `Bearer ` (any case) from an authorization value
///
/// A value without the prefix is returned unchanged. Empty results are `None`.
pub fn bearer_token(authorization: Option<&str>) -> Option<&str> {
    let value = authorization?;
    let token = match value.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => &value[7..],
        _ => value,
    };

    if token.is_empty() {
        None
    } else {
        Some(token)
    }
}
