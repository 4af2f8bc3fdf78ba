// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types and handling for the server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use crate::types::DiagnosticInfo;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing file in request")]
    MissingFile,

    #[error("Unsupported file type '{0}': only .ifc files are accepted")]
    UnsupportedFileType(String),

    #[error("Invalid UTF-8 content: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),

    #[error("Invalid mode '{0}': expected 'strict' or 'tolerant'")]
    InvalidMode(String),

    #[error("Error parsing the uploaded IFC file: {0}")]
    Parse(String),

    #[error("{0}")]
    Geometry(String),

    /// Nothing to draw; carries the per-product failures of a tolerant run.
    #[error("No faces could be extracted from the uploaded IFC file. Please check the file or try another.")]
    NoGeometry(Vec<DiagnosticInfo>),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Join error")]
    Join(#[from] tokio::task::JoinError),
}

impl ApiError {
    /// HTTP status and machine-readable code.
    pub fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::MissingFile => (StatusCode::BAD_REQUEST, "MISSING_FILE"),
            ApiError::UnsupportedFileType(_) => (StatusCode::BAD_REQUEST, "UNSUPPORTED_FILE_TYPE"),
            ApiError::InvalidUtf8(_) => (StatusCode::BAD_REQUEST, "INVALID_UTF8"),
            ApiError::Multipart(_) => (StatusCode::BAD_REQUEST, "MULTIPART_ERROR"),
            ApiError::InvalidMode(_) => (StatusCode::BAD_REQUEST, "INVALID_MODE"),
            ApiError::Parse(_) => (StatusCode::UNPROCESSABLE_ENTITY, "PARSE_ERROR"),
            ApiError::Geometry(_) => (StatusCode::UNPROCESSABLE_ENTITY, "GEOMETRY_ERROR"),
            ApiError::NoGeometry(_) => (StatusCode::UNPROCESSABLE_ENTITY, "NO_GEOMETRY"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Join(_) => (StatusCode::INTERNAL_SERVER_ERROR, "TASK_ERROR"),
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    /// Products that failed before the request gave up.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<DiagnosticInfo>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(error = %self, code, "Request failed");
        } else {
            tracing::debug!(error = %self, code, "Request rejected");
        }

        let error = self.to_string();
        let diagnostics = match self {
            ApiError::NoGeometry(diagnostics) => diagnostics,
            _ => Vec::new(),
        };
        let body = ErrorResponse {
            error,
            code: code.to_string(),
            diagnostics,
        };

        (status, Json(body)).into_response()
    }
}

impl From<ifc_facets_core::Error> for ApiError {
    fn from(err: ifc_facets_core::Error) -> Self {
        match err {
            ifc_facets_core::Error::InvalidUtf8(e) => ApiError::InvalidUtf8(e),
            other => ApiError::Parse(other.to_string()),
        }
    }
}

impl From<ifc_facets_geometry::Error> for ApiError {
    fn from(err: ifc_facets_geometry::Error) -> Self {
        match err {
            ifc_facets_geometry::Error::NoGeometry => ApiError::NoGeometry(Vec::new()),
            ifc_facets_geometry::Error::CoreError(e) => ApiError::from(e),
            other => ApiError::Geometry(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Internal(format!("JSON error: {}", err))
    }
}
