//! Multi-valued string parameters in `application/x-www-form-urlencoded` form.
//!
//! The same type carries both the query string of a request and the path
//! parameters a route extracts from named capture groups.

use url::form_urlencoded;

use crate::multi_map::MultiMap;

/// Key prefix marking a value that came from a route pattern.
pub const PATH_PARAM_PREFIX: char = ':';

#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct Params(MultiMap<String, String>);

impl Params {
    pub fn new_empty() -> Self {
        Self(MultiMap::new_empty())
    }

    /// Parses a raw query string (without the leading `?`).
    pub fn parse(raw_query: &str) -> Self {
        Self(
            form_urlencoded::parse(raw_query.as_bytes())
                .into_owned()
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn add(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Adds a value under `:<name>`.
    pub fn add_path_param(&mut self, name: &str, value: impl Into<String>) {
        self.add(format!("{PATH_PARAM_PREFIX}{name}"), value);
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.0.get_all(key)
    }

    /// Shorthand for `get(":<name>")`.
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.get(&format!("{PATH_PARAM_PREFIX}{name}"))
    }

    /// Serializes sorted by key, e.g. `%3Aname=keith&a=b`.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (k, v) in self.0.pairs() {
            serializer.append_pair(k, v);
        }
        serializer.finish()
    }

    /// Places these parameters in front of `raw_query`.
    ///
    /// Returns `None` when there is nothing to merge, in which case the raw
    /// query must be left as it is.
    pub fn merge_before(&self, raw_query: &str) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let encoded = self.encode();
        if raw_query.is_empty() {
            return Some(encoded);
        }
        Some(format!("{encoded}&{raw_query}"))
    }
}
