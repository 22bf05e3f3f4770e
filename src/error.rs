use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::flags::{FlagError, FlagKey};
use crate::items::model::{Item, ValidationErrors};
use crate::items::store::StoreError;

/// Failures of a request against the items resource.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Flag(#[from] FlagError),

    #[error("feature '{0}' is disabled")]
    AccessGateDenied(FlagKey),

    /// Carries the submitted item and the gate state so the form can be
    /// shown again.
    #[error("item failed validation")]
    ValidationFailed {
        item: Box<Item>,
        errors: ValidationErrors,
        creation_enabled: bool,
    },

    #[error("item not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Flag(FlagError::Unavailable { .. }) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Flag(FlagError::Rejected { .. }) => StatusCode::BAD_GATEWAY,
            AppError::Flag(FlagError::InvalidValue { .. }) => StatusCode::BAD_GATEWAY,
            AppError::AccessGateDenied(_) => StatusCode::FORBIDDEN,
            AppError::ValidationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Rebuild a store failure as a request failure, attaching the
    /// submitted item and gate state when validation rejected it.
    pub fn from_store(err: StoreError, submitted: Item, creation_enabled: bool) -> Self {
        match err {
            StoreError::Invalid(errors) => AppError::ValidationFailed {
                item: Box::new(submitted),
                errors,
                creation_enabled,
            },
            other => other.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound,
            StoreError::Invalid(errors) => AppError::ValidationFailed {
                item: Box::default(),
                errors,
                creation_enabled: false,
            },
            StoreError::Database(e) => AppError::Database(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::Database(e) => {
                tracing::error!(error = ?e, "database failure");
                "Database error".to_string()
            }
            AppError::Flag(e) => {
                tracing::error!(error = %e, "flag evaluation failed");
                self.to_string()
            }
            _ => self.to_string(),
        };

        let mut body = serde_json::json!({ "error": message });
        if let AppError::ValidationFailed { errors, .. } = &self {
            body["errors"] = serde_json::json!(errors);
        }

        (status, Json(body)).into_response()
    }
}
