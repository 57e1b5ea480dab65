//! Shape validation for upstream JSON and decoded XML
//!
//! Raw responses are parsed into `serde_json::Value` first and only reach
//! domain code after passing through [`validate`], which narrows them into a
//! typed structure or fails with [`Error::Validation`].

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// A field that upstream sends as a bare value when there is one of it and
/// as an array when there are several.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

impl<T> Default for OneOrMany<T> {
    fn default() -> Self {
        OneOrMany::Many(vec![])
    }
}

/// Untyped counterpart of [`OneOrMany::into_vec`]: arrays yield their items,
/// anything else is a one-element sequence.
pub fn sequence(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

/// Parse a JSON body into a `Value`.
pub fn parse_json(body: &str, what: &str) -> Result<Value> {
    serde_json::from_str(body)
        .map_err(|e| Error::validation(format!("{} is not valid JSON: {}", what, e)))
}

/// Narrow `value` into `T`, naming `shape` in the failure.
pub fn validate<T: DeserializeOwned>(value: Value, shape: &str) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| Error::validation(format!("expected {}: {}", shape, e)))
}

/// Envelope shared by the search and lookup endpoints.
#[derive(Debug, Deserialize)]
pub struct CatalogResponse {
    #[serde(rename = "resultCount", default)]
    pub result_count: Option<u64>,
    pub results: Vec<Value>,
}
