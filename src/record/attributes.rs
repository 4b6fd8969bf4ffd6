use serde_json::Value;
use std::collections::BTreeSet;

/// What the multi-unit engine needs from a host record: named attributes with
/// dirty tracking against the last persisted state.
pub trait Attributes {
    fn attribute(&self, key: &str) -> Option<&Value>;

    fn set_attribute(&mut self, key: &str, value: Value);

    fn remove_attribute(&mut self, key: &str) -> Option<Value>;

    fn attribute_names(&self) -> Vec<String>;

    /// Does `key` differ from its last persisted value?
    fn is_dirty(&self, key: &str) -> bool;

    /// Make the current value of `key` its original value, clearing its dirty mark.
    fn sync_original(&mut self, key: &str);

    fn dirty_keys(&self) -> BTreeSet<String>;
}

/// Attribute equality as the host sees it: numbers compare by value, a missing
/// attribute equals null.
pub fn same_value(a: Option<&Value>, b: Option<&Value>) -> bool {
    match (a, b) {
        (None | Some(Value::Null), None | Some(Value::Null)) => true,
        (Some(Value::Number(x)), Some(Value::Number(y))) => x.as_f64() == y.as_f64(),
        (Some(x), Some(y)) => x == y,
        _ => false,
    }
}
