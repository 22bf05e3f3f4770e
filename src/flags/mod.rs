pub mod gate;
pub mod http;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

pub use gate::GateOnError;
pub use http::HttpTransport;

// MODELS

/// Name of a toggle in the evaluation service. Keys are compile-time
/// constants, never user input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagKey(&'static str);

impl FlagKey {
    pub const CREATION_ENABLED: FlagKey = FlagKey::new("creationenabled");
    pub const UPPERCASE_ITEM_NAME: FlagKey = FlagKey::new("uppercaseitemname");

    pub const fn new(key: &'static str) -> Self {
        assert!(!key.is_empty(), "flag key cannot be empty");
        Self(key)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FlagKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Who is being evaluated. Flags here are global switches, so a fresh
/// random identity is minted for every call and thrown away afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationIdentity(String);

impl EvaluationIdentity {
    pub fn fresh() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Raw value resolved by the evaluation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagValue(String);

impl FlagValue {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Strict boolean reading of the value. Only the canonical tokens are
    /// accepted; anything else is `None`.
    pub fn as_bool(&self) -> Option<bool> {
        parse_bool(&self.0)
    }
}

/// Accepts `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

// WIRE TYPES

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationRequest {
    pub flag_key: String,
    pub entity_id: String,
    pub context: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationResponse {
    #[serde(default)]
    pub value: String,
    #[serde(default, rename = "match")]
    pub matched: bool,
}

// ERRORS

#[derive(Debug, Error)]
pub enum FlagError {
    /// Transport or remote failure; the service could not be asked.
    #[error("flag service unavailable while evaluating '{key}': {reason}")]
    Unavailable { key: String, reason: String },

    /// The service answered, but with an explicit error for this request.
    #[error("flag service rejected '{key}' ({status}): {message}")]
    Rejected {
        key: String,
        status: u16,
        message: String,
    },

    /// Resolved value is not a canonical boolean token.
    #[error("flag '{key}' resolved to non-boolean value '{value}'")]
    InvalidValue { key: String, value: String },
}

// CLIENT

/// One remote evaluation round trip. Implementations must not cache or
/// retry.
#[async_trait]
pub trait EvaluationTransport: Send + Sync {
    async fn evaluate(&self, request: &EvaluationRequest)
        -> Result<EvaluationResponse, FlagError>;
}

/// Resolves flags for the request being served. Holds no per-request
/// state, so a single instance is shared by every handler.
///
/// Cancellation follows the request: the evaluation future is dropped
/// together with the handler, and the transport bounds every round trip
/// with its own timeout.
#[derive(Clone)]
pub struct FlagClient {
    transport: Arc<dyn EvaluationTransport>,
}

impl FlagClient {
    pub fn new(transport: Arc<dyn EvaluationTransport>) -> Self {
        Self { transport }
    }

    /// Issue exactly one evaluation for `key` under a fresh identity and
    /// return the resolved value verbatim.
    pub async fn evaluate(&self, key: FlagKey) -> Result<FlagValue, FlagError> {
        let identity = EvaluationIdentity::fresh();
        let request = EvaluationRequest {
            flag_key: key.as_str().to_string(),
            entity_id: identity.as_str().to_string(),
            context: HashMap::new(),
        };

        let response = self.transport.evaluate(&request).await?;
        tracing::debug!(
            flag = %key,
            value = %response.value,
            matched = response.matched,
            "flag evaluated"
        );

        Ok(FlagValue::new(response.value))
    }

    /// `evaluate` followed by a strict boolean parse. A malformed value is
    /// an error, never a silent `false`.
    pub async fn is_enabled(&self, key: FlagKey) -> Result<bool, FlagError> {
        let value = self.evaluate(key).await?;

        value.as_bool().ok_or_else(|| FlagError::InvalidValue {
            key: key.to_string(),
            value: value.as_str().to_string(),
        })
    }
}
