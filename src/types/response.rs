// src/types/response.rs
//! Canonical response envelope and the one function that produces it.
//!
//! The Bixo API answers in several shapes: `{success, data}` envelopes,
//! envelopes that carry `message` instead of `error`, bare JSON payloads and
//! empty bodies. Everything is collapsed into [`ApiResponse`] here so call
//! sites never branch on the wire format.

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const INVALID_JSON_ERROR: &str = "Invalid JSON response from server";

/// Tagged result of every API call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>) -> Self {
        Self {
            success: true,
            data,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Error text, or `fallback` when the server gave none.
    pub fn error_or(&self, fallback: &str) -> String {
        match self.error.as_deref() {
            Some(error) if !error.is_empty() => error.to_string(),
            _ => fallback.to_string(),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ApiResponse<U> {
        ApiResponse {
            success: self.success,
            data: self.data.map(f),
            error: self.error,
        }
    }

    /// Bridges into `anyhow` at the edges of the crate (CLI, scripts).
    pub fn into_result(self) -> anyhow::Result<Option<T>> {
        if self.success {
            Ok(self.data)
        } else {
            let message = self.error_or("Request failed");
            anyhow::bail!(message)
        }
    }
}

impl ApiResponse<Value> {
    /// Decodes the untyped payload into `T`. A failed response keeps the
    /// server's error and drops its payload undecoded.
    pub fn into_typed<T: DeserializeOwned>(self) -> ApiResponse<T> {
        let ApiResponse {
            success,
            data,
            error,
        } = self;

        if !success {
            return ApiResponse {
                success,
                data: None,
                error,
            };
        }

        let data = match data {
            None | Some(Value::Null) => None,
            Some(value) => match serde_json::from_value::<T>(value) {
                Ok(typed) => Some(typed),
                Err(e) => return ApiResponse::failure(format!("Invalid response payload: {e}")),
            },
        };

        ApiResponse {
            success,
            data,
            error,
        }
    }
}

/// Normalizes a raw HTTP response into the canonical envelope.
pub fn normalize_response(status: StatusCode, body: &str) -> ApiResponse<Value> {
    if body.is_empty() {
        return if status.is_success() {
            ApiResponse::success(None)
        } else {
            ApiResponse::failure(status_error(status))
        };
    }

    let parsed: Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(_) => return ApiResponse::failure(INVALID_JSON_ERROR),
    };

    if let Some(envelope) = parsed.as_object().filter(|o| o.contains_key("success")) {
        return from_envelope(envelope);
    }

    if status.is_success() {
        let data = match parsed {
            Value::Null => None,
            other => Some(other),
        };
        return ApiResponse::success(data);
    }

    let error = parsed
        .as_object()
        .and_then(|o| text_field(o, "message").or_else(|| text_field(o, "error")))
        .unwrap_or_else(|| status_error(status));
    ApiResponse::failure(error)
}

fn from_envelope(envelope: &Map<String, Value>) -> ApiResponse<Value> {
    let success = envelope
        .get("success")
        .and_then(Value::as_bool)
        .unwrap_or(false);

    let data = envelope.get("data").filter(|v| !v.is_null()).cloned();

    let mut error = text_field(envelope, "error");
    if !success && error.is_none() {
        error = text_field(envelope, "message");
    }

    ApiResponse {
        success,
        data,
        error,
    }
}

/// Reads a non-empty error-ish field; non-string values are rendered as JSON.
fn text_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    match object.get(key)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

pub fn status_error(status: StatusCode) -> String {
    format!("Request failed with status {}", status.as_u16())
}
