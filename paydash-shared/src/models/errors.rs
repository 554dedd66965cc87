//! Error payloads sent by the backend with non-2xx responses.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Field name to validation messages, as reported by the backend.
pub type ValidationErrors = BTreeMap<String, Vec<String>>;

/// Error payload returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    /// Human-readable error message.
    #[serde(default)]
    pub message: Option<String>,
    /// Per-field validation messages.
    #[serde(
        default,
        deserialize_with = "deserialize_validation_errors",
        skip_serializing_if = "Option::is_none"
    )]
    pub errors: Option<ValidationErrors>,
}

impl ErrorBody {
    /// Creates an error body with just a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            errors: None,
        }
    }

    /// Attaches a validation message for `field`.
    #[must_use]
    pub fn with_field_error(mut self, field: impl Into<String>, message: impl Into<String>) -> Self {
        self.errors
            .get_or_insert_with(BTreeMap::new)
            .entry(field.into())
            .or_default()
            .push(message.into());
        self
    }

    /// Returns the message when it is present and not blank.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message
            .as_deref()
            .map(str::trim)
            .filter(|message| !message.is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

// Backends disagree on whether a field maps to one message or a list.
fn deserialize_validation_errors<'de, D>(deserializer: D) -> Result<Option<ValidationErrors>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<BTreeMap<String, OneOrMany>> = Option::deserialize(deserializer)?;
    Ok(raw.map(|map| {
        map.into_iter()
            .map(|(field, messages)| {
                let messages = match messages {
                    OneOrMany::One(message) => vec![message],
                    OneOrMany::Many(messages) => messages,
                };
                (field, messages)
            })
            .collect()
    }))
}
