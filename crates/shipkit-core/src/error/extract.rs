use serde_json::Value;

use crate::outcome::Response;

/// Carrier-specific reading of a failed response body.
///
/// Implementations return `None` whenever the body does not have the
/// expected shape; callers then fall back to the raw transport message.
pub trait MessageExtractor: Send + Sync {
    fn extract_message(&self, response: &Response) -> Option<String>;
}

/// An array of message objects, e.g. `{"errors": [{"message": "..."}]}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StructuredMessages {
    pub pointer: &'static str,
    pub field: &'static str,
}

impl MessageExtractor for StructuredMessages {
    fn extract_message(&self, response: &Response) -> Option<String> {
        let value = parse_body(response)?;
        let node = value.pointer(self.pointer)?;
        let messages = match node {
            Value::Array(entries) => entries
                .iter()
                .filter_map(|entry| string_field(entry, self.field))
                .collect::<Vec<_>>(),
            Value::Object(_) => string_field(node, self.field).into_iter().collect(),
            _ => Vec::new(),
        };
        if messages.is_empty() {
            return None;
        }
        Some(messages.join(", "))
    }
}

/// A flat status/description pair, e.g. `{"fault": {"status": "400", "description": "..."}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusDescription {
    pub status_pointer: &'static str,
    pub description_pointer: &'static str,
}

impl MessageExtractor for StatusDescription {
    fn extract_message(&self, response: &Response) -> Option<String> {
        let value = parse_body(response)?;
        let description = value
            .pointer(self.description_pointer)
            .and_then(scalar_text)?;
        match value.pointer(self.status_pointer).and_then(scalar_text) {
            Some(status) => Some(format!("{status}: {description}")),
            None => Some(description),
        }
    }
}

/// A single string. Without a pointer the whole body is the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlainMessage {
    pub pointer: Option<&'static str>,
}

impl MessageExtractor for PlainMessage {
    fn extract_message(&self, response: &Response) -> Option<String> {
        match self.pointer {
            Some(pointer) => parse_body(response)?
                .pointer(pointer)
                .and_then(scalar_text),
            None => {
                let text = response.body.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
        }
    }
}

fn parse_body(response: &Response) -> Option<Value> {
    serde_json::from_str::<Value>(&response.body).ok()
}

fn string_field(entry: &Value, field: &str) -> Option<String> {
    entry.get(field).and_then(scalar_text)
}

fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => text.trim().to_string(),
        Value::Number(number) => number.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}
