//! Error types for the outfit ranker backend.
//!
//! `AppError` is what every HTTP handler returns. It implements actix's
//! `ResponseError`, so a failed request always answers with a JSON
//! `{"error": "..."}` body and a status derived from the variant:
//! client mistakes map to `400 Bad Request`, everything else to
//! `500 Internal Server Error`.
//!
//! `ScorerError` never crosses the HTTP boundary. The ranking workflow turns
//! it into a zero score for the affected record.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::responses::ErrorResponse;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Missing or malformed client input.
    #[error("{0}")]
    Validation(String),

    /// An operation needs at least one stored outfit.
    #[error("No outfits uploaded yet")]
    EmptyCollection,

    /// The record document exists but is not a list of outfit records.
    #[error("Outfit store {path} is corrupt: {source}")]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Writing images or the record document failed.
    #[error("{context}: {source}")]
    Persistence {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The multipart stream broke off while the upload was being read.
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Invalid startup configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl AppError {
    pub fn validation(reason: impl Into<String>) -> Self {
        AppError::Validation(reason.into())
    }

    pub fn persistence(context: impl Into<String>, source: std::io::Error) -> Self {
        AppError::Persistence {
            context: context.into(),
            source,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::EmptyCollection => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: self.to_string(),
        })
    }
}

/// Failures of a single scoring call.
#[derive(Error, Debug)]
pub enum ScorerError {
    #[error("Invalid combination: {occasion}/{style}")]
    UnsupportedCombination { occasion: String, style: String },

    #[error("Unreadable image {path}: {reason}")]
    Image { path: PathBuf, reason: String },

    #[error("Model error: {0}")]
    Model(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_bad_request() {
        assert_eq!(
            AppError::validation("Invalid file type").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::EmptyCollection.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn storage_errors_map_to_internal_error() {
        let err = AppError::persistence(
            "Failed to write outfits.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Failed to write outfits.json: denied");
    }
}
