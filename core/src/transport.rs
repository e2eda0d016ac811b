//! The seam between resource navigation and the network.
//!
//! # Design
//! Navigator operations only ever need two calls: an authenticated GET that
//! returns a body, and an authenticated form POST that returns a body. Any
//! type providing those can back a `Session`: the bundled `TrelloClient`, a
//! caller's own HTTP stack, or a test double.

use std::collections::BTreeMap;
use std::sync::Arc;

use url::form_urlencoded;

use crate::error::TransportError;

/// Authenticated access to the API, relative to its base URL.
///
/// Implementations own credentials, timeouts and retries. Paths always start
/// with `/`.
pub trait Transport: Send + Sync {
    fn get(&self, path: &str) -> Result<Vec<u8>, TransportError>;

    fn post(&self, path: &str, form: &FormParams) -> Result<Vec<u8>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn get(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        (**self).get(path)
    }

    fn post(&self, path: &str, form: &FormParams) -> Result<Vec<u8>, TransportError> {
        (**self).post(path, form)
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn get(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        (**self).get(path)
    }

    fn post(&self, path: &str, form: &FormParams) -> Result<Vec<u8>, TransportError> {
        (**self).post(path, form)
    }
}

/// Form-encoded request parameters, one or more values per key.
///
/// Keys are kept sorted so `encode` is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams {
    values: BTreeMap<String, Vec<String>>,
}

impl FormParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every value of `key` with `value`.
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), vec![value.into()]);
    }

    /// Append `value` to the values already held for `key`.
    pub fn add(&mut self, key: &str, value: impl Into<String>) {
        self.values
            .entry(key.to_string())
            .or_default()
            .push(value.into());
    }

    /// First value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .get(key)
            .and_then(|v| v.first())
            .map(String::as_str)
    }

    pub fn get_all(&self, key: &str) -> &[String] {
        self.values.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(key, value)` pairs, repeating the key for multi-valued entries.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .flat_map(|(k, vs)| vs.iter().map(move |v| (k.as_str(), v.as_str())))
    }

    /// `application/x-www-form-urlencoded` body.
    pub fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in self.iter() {
            serializer.append_pair(key, value);
        }
        serializer.finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = FormParams::new();
        for (k, v) in iter {
            let key: String = k.into();
            params.add(&key, v);
        }
        params
    }
}
