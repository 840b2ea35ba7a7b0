use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Credential material for a provider, keyed by field name.
///
/// Field names follow the provider's `config_schema()` (for the Data API
/// connectors that is a single `api_key` entry). Values are stored verbatim
/// and never logged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuthDetails(HashMap<String, String>);

impl AuthDetails {
    pub fn new() -> Self {
        AuthDetails(HashMap::new())
    }

    pub fn insert(&mut self, key: String, value: String) -> Option<String> {
        self.0.insert(key, value)
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }

    /// Field names present in these details, for redacted status output.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}
