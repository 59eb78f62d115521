//! URL paths and error responses of an underscored REST API

use crate::naming::{camelize, decamelize, pluralize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Field name → messages, with camelized field names
pub type ValidationErrors = BTreeMap<String, Vec<String>>;

/// Field carrying the sentinel message of a recovered 404
pub const NOT_FOUND_FIELD: &str = "404";
pub const NOT_FOUND_MESSAGE: &str = "Not Found";

const UNPROCESSABLE_ENTITY: u16 = 422;
const NOT_FOUND: u16 = 404;

/// A failed response as received from the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub status: u16,
    pub body: String,
}

impl TransportError {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        TransportError {
            status,
            body: body.into(),
        }
    }
}

/// Domain view of a failed response
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdapterError {
    #[error("record is invalid: {}", describe(.0))]
    Invalid(ValidationErrors),

    #[error("record not found")]
    NotFound(ValidationErrors),

    #[error("request failed with status {}", .0.status)]
    Transport(TransportError),
}

fn describe(errors: &ValidationErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{field} {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone, Default)]
pub struct RestAdapter {
    /// Prepended to every path, e.g. `api/v1`
    pub namespace: Option<String>,

    /// Turn 404 responses into [`AdapterError::NotFound`]
    pub recover_not_found: bool,
}

impl RestAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    pub fn recovering_not_found(mut self) -> Self {
        self.recover_not_found = true;
        self
    }

    /// `famousPerson` -> `famous_people`
    pub fn path_for_type(&self, type_key: &str) -> String {
        pluralize(&decamelize(type_key))
    }

    /// `/<namespace>/<path>[/<id>]`
    pub fn build_path(&self, type_key: &str, id: Option<&str>) -> String {
        let mut segments = Vec::new();
        if let Some(namespace) = self.namespace.as_deref() {
            let namespace = namespace.trim_matches('/');
            if !namespace.is_empty() {
                segments.push(namespace.to_string());
            }
        }
        segments.push(self.path_for_type(type_key));
        if let Some(id) = id.filter(|id| !id.is_empty()) {
            segments.push(id.to_string());
        }

        format!("/{}", segments.join("/"))
    }

    /// Map a failed response into its domain error.
    ///
    /// A 422 whose body holds an `errors` object becomes [`AdapterError::Invalid`]
    /// and a 404 becomes [`AdapterError::NotFound`] when recovery is enabled.
    /// Anything else is passed through as [`AdapterError::Transport`].
    pub fn classify_error(&self, error: TransportError) -> AdapterError {
        match error.status {
            UNPROCESSABLE_ENTITY => match validation_errors(&error.body) {
                Some(errors) => AdapterError::Invalid(errors),
                None => {
                    tracing::warn!(status = error.status, "unprocessable response without an errors object");
                    AdapterError::Transport(error)
                }
            },
            NOT_FOUND if self.recover_not_found => {
                let mut errors = ValidationErrors::new();
                errors.insert(NOT_FOUND_FIELD.to_string(), vec![NOT_FOUND_MESSAGE.to_string()]);
                AdapterError::NotFound(errors)
            }
            _ => AdapterError::Transport(error),
        }
    }
}

fn validation_errors(body: &str) -> Option<ValidationErrors> {
    let body: Value = serde_json::from_str(body).ok()?;
    let Value::Object(fields) = body.get("errors")? else {
        return None;
    };

    Some(
        fields
            .iter()
            .map(|(field, messages)| (camelize(field), messages_of(messages)))
            .collect(),
    )
}

fn messages_of(value: &Value) -> Vec<String> {
    match value {
        Value::Array(messages) => messages.iter().map(message_of).collect(),
        other => vec![message_of(other)],
    }
}

fn message_of(value: &Value) -> String {
    match value {
        Value::String(message) => message.clone(),
        other => other.to_string(),
    }
}
