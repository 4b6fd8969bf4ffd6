use crate::record::attributes::{same_value, Attributes};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// In-memory record: current attributes plus a snapshot of the persisted ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    attributes: Map<String, Value>,
    original: Map<String, Value>,
    exists: bool,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// A record loaded from storage: nothing is dirty.
    pub fn from_row(row: Map<String, Value>) -> Self {
        Self {
            original: row.clone(),
            attributes: row,
            exists: true,
        }
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Called by the persistence layer once the current attributes are stored.
    pub fn mark_persisted(&mut self) {
        self.original = self.attributes.clone();
        self.exists = true;
    }
}

impl Attributes for Record {
    fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    fn set_attribute(&mut self, key: &str, value: Value) {
        self.attributes.insert(key.to_string(), value);
    }

    fn remove_attribute(&mut self, key: &str) -> Option<Value> {
        self.attributes.remove(key)
    }

    fn attribute_names(&self) -> Vec<String> {
        self.attributes.keys().cloned().collect()
    }

    fn is_dirty(&self, key: &str) -> bool {
        !same_value(self.attributes.get(key), self.original.get(key))
    }

    fn sync_original(&mut self, key: &str) {
        match self.attributes.get(key) {
            Some(value) => {
                self.original.insert(key.to_string(), value.clone());
            }
            None => {
                self.original.remove(key);
            }
        }
    }

    fn dirty_keys(&self) -> BTreeSet<String> {
        self.attributes
            .keys()
            .chain(self.original.keys())
            .filter(|k| self.is_dirty(k))
            .cloned()
            .collect()
    }
}
