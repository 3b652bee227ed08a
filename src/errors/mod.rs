use std::collections::BTreeMap;
use std::fmt;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use chrono::Utc;
use log::error;
use serde::Serialize;
use validator::ValidationErrors;

use crate::store::StoreError;
use crate::utils::validation::field_messages;

#[derive(Debug)]
pub enum AppError {
    Validation(ValidationErrors),
    BadRequest(String),
    DuplicateEmail(String),
    NotFound(i64),
    Database(String),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    status: u16,
    error: String,
    message: String,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    validation_errors: Option<BTreeMap<String, String>>,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Validation(_) => write!(f, "Validation failed"),
            AppError::BadRequest(msg) => write!(f, "{}", msg),
            AppError::DuplicateEmail(email) => {
                write!(f, "Employee with email {} already exists", email)
            }
            AppError::NotFound(id) => write!(f, "Employee not found with ID: {}", id),
            AppError::Database(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateEmail(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let (message, validation_errors) = match self {
            AppError::Validation(errors) => (self.to_string(), Some(field_messages(errors))),
            AppError::Database(msg) => {
                error!("store failure: {}", msg);
                ("An unexpected error occurred".to_string(), None)
            }
            _ => (self.to_string(), None),
        };

        HttpResponse::build(status).json(ErrorResponse {
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
            timestamp: Utc::now().to_rfc3339(),
            validation_errors,
        })
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail(email) => AppError::DuplicateEmail(email),
            StoreError::Backend(msg) => AppError::Database(msg),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    async fn body_json(err: AppError) -> serde_json::Value {
        let body = to_bytes(err.error_response().into_body()).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[actix_web::test]
    async fn duplicate_email_is_conflict_with_offending_email() {
        let err = AppError::DuplicateEmail("ann@x.com".into());
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let body = body_json(err).await;
        assert_eq!(body["status"], 409);
        assert_eq!(body["message"], "Employee with email ann@x.com already exists");
        assert!(body.get("validationErrors").is_none());
    }

    #[actix_web::test]
    async fn database_error_hides_details() {
        let body = body_json(AppError::Database("connection refused".into())).await;
        assert_eq!(body["status"], 500);
        assert_eq!(body["message"], "An unexpected error occurred");
    }

    #[test]
    fn store_errors_map_to_app_errors() {
        let err: AppError = StoreError::DuplicateEmail("a@b.com".into()).into();
        assert!(matches!(err, AppError::DuplicateEmail(email) if email == "a@b.com"));

        let err: AppError = StoreError::Backend("boom".into()).into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
