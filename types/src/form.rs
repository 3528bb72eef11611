//! Form payload shaping and field-level error messages.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

/// Key for messages that are not tied to a single field.
pub const NO_FIELD: &str = "__nofield";

/// Field name to message, as shown inline next to form inputs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorMessages {
    messages: BTreeMap<String, String>,
}

impl ErrorMessages {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn general(message: impl Into<String>) -> Self {
        let mut messages = Self::new();
        messages.insert(NO_FIELD, message);
        messages
    }

    /// Extract messages from a validation error body.
    ///
    /// Understands the hub's `{"errors": [{"source": {"parameter": ..}, "detail": ..}]}`
    /// shape and the plain `{"field": ["message", ..]}` shape. Returns `None`
    /// when the body has neither.
    #[must_use]
    pub fn from_body(body: &Value) -> Option<Self> {
        let object = body.as_object()?;
        let mut messages = Self::new();

        if let Some(errors) = object.get("errors").and_then(Value::as_array) {
            for error in errors {
                let field = error
                    .pointer("/source/parameter")
                    .and_then(Value::as_str)
                    .unwrap_or(NO_FIELD);
                let detail = error
                    .get("detail")
                    .or_else(|| error.get("title"))
                    .and_then(Value::as_str);
                if let Some(detail) = detail {
                    messages.insert(field, detail);
                }
            }
        } else {
            for (field, value) in object {
                let field = if field == "non_field_errors" || field == "detail" {
                    NO_FIELD
                } else {
                    field.as_str()
                };
                if let Some(text) = join_messages(value) {
                    messages.insert(field, text);
                }
            }
        }

        (!messages.is_empty()).then_some(messages)
    }

    /// Later messages for the same field are appended.
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        self.messages
            .entry(field.to_string())
            .and_modify(|existing| {
                existing.push(' ');
                existing.push_str(&message);
            })
            .or_insert(message);
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.messages.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.messages.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }
}

fn join_messages(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
            (!parts.is_empty()).then(|| parts.join(" "))
        }
        _ => None,
    }
}

/// Drop empty strings and nulls so a create request never trips
/// "This field may not be blank." for inputs the user cleared.
#[must_use]
pub fn strip_blank_fields(mut payload: Map<String, Value>) -> Map<String, Value> {
    payload.retain(|_, value| match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    });
    payload
}

/// Fields of `edited` that differ from `original`.
///
/// Fields missing from `edited` but present in `original` were cleared by the
/// user and are sent as null. Cleared strings are sent as null as well.
#[must_use]
pub fn changed_fields(original: &Map<String, Value>, edited: &Map<String, Value>) -> Map<String, Value> {
    let mut changes = Map::new();

    for (key, value) in edited {
        if original.get(key) != Some(value) {
            let value = match value {
                Value::String(s) if s.is_empty() => Value::Null,
                other => other.clone(),
            };
            changes.insert(key.clone(), value);
        }
    }

    for key in original.keys() {
        if !edited.contains_key(key) {
            changes.insert(key.clone(), Value::Null);
        }
    }

    changes
}

/// Remove server-computed fields from a payload.
#[must_use]
pub fn without_fields(mut payload: Map<String, Value>, fields: &[&str]) -> Map<String, Value> {
    for field in fields {
        payload.remove(*field);
    }
    payload
}
