//! Conversion between nested locale documents and flat composite keys
//!
//! ```text
//! {"a": "Hello", "b": {"c": "World"}}   <->   {"a": "Hello", "b:c": "World"}
//! ```

use crate::error::{UpdaterError, UpdaterResult};
use serde_json::{Map, Value};

/// Separator joining path segments into a composite key
pub const DEFAULT_SEPARATOR: &str = ":";

/// A single-level view of a locale document, keyed by composite key.
///
/// Entries keep the order in which they were inserted, which for a flattened
/// document is document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatMessages(pub Map<String, Value>);

impl FlatMessages {
    pub fn new() -> Self {
        FlatMessages(Map::new())
    }
    pub fn with_message(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        self.0.insert(key.to_owned(), value.into());
        self
    }
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }
    /// The value at `key` if it is a string
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Flatten `doc` into composite keys joined by `separator`
///
/// Every non-object value is a leaf. Empty objects are kept as leaves too,
/// otherwise they would vanish on the way back through [`unflatten`].
pub fn flatten(doc: &Map<String, Value>, separator: &str) -> FlatMessages {
    let mut flat = FlatMessages::new();
    flatten_into(doc, None, separator, &mut flat);
    flat
}

fn flatten_into(
    doc: &Map<String, Value>,
    parent: Option<&str>,
    separator: &str,
    flat: &mut FlatMessages,
) {
    for (key, value) in doc {
        if key.contains(separator) {
            tracing::warn!(
                key = %key,
                separator,
                "key contains the separator and will not survive unflattening unchanged"
            );
        }
        let composite = match parent {
            Some(parent) => format!("{}{}{}", parent, separator, key),
            None => key.clone(),
        };
        match value {
            Value::Object(children) if !children.is_empty() => {
                flatten_into(children, Some(&composite), separator, flat);
            }
            leaf => {
                flat.0.insert(composite, leaf.clone());
            }
        }
    }
}

/// Rebuild a nested document from composite keys
///
/// # Errors
///
/// `UpdaterError::PrefixCollision` when one key needs an object where
/// another key already stored a scalar, e.g. `a` and `a:b` both present.
pub fn unflatten(flat: &FlatMessages, separator: &str) -> UpdaterResult<Map<String, Value>> {
    let mut root = Map::new();

    for (key, value) in &flat.0 {
        let parts: Vec<&str> = key.split(separator).collect();
        let (last, parents) = match parts.split_last() {
            Some(split) => split,
            None => continue,
        };

        let mut current = &mut root;
        for (depth, part) in parents.iter().enumerate() {
            let slot = current
                .entry(part.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            current = match slot {
                Value::Object(children) => children,
                _ => {
                    return Err(UpdaterError::PrefixCollision {
                        key: key.clone(),
                        prefix: parts[..=depth].join(separator),
                    });
                }
            };
        }

        match current.get(*last) {
            None => {
                current.insert(last.to_string(), value.clone());
            }
            // An empty-object leaf merges into a subtree built by longer keys.
            Some(Value::Object(_)) if is_empty_object(value) => {}
            Some(_) => {
                return Err(UpdaterError::PrefixCollision {
                    key: key.clone(),
                    prefix: key.clone(),
                });
            }
        }
    }

    Ok(root)
}

fn is_empty_object(value: &Value) -> bool {
    matches!(value, Value::Object(map) if map.is_empty())
}

/// Recursively sort object keys at every level
///
/// Scalars pass through unchanged; array elements keep their order but are
/// sorted internally.
pub fn sort_document(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(&String, &Value)> = map.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(key, child)| (key.clone(), sort_document(child)))
                    .collect(),
            )
        }
        Value::Array(items) => Value::Array(items.iter().map(sort_document).collect()),
        scalar => scalar.clone(),
    }
}
