// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! View endpoint: upload an IFC file, get back the rendered scene.

use crate::error::ApiError;
use crate::services::process_upload;
use crate::types::{ViewQuery, ViewResponse};
use crate::AppState;
use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use bytes::Bytes;
use ifc_facets_geometry::{ErrorPolicy, ExtractOptions};

/// Uploaded file.
struct Upload {
    file_name: Option<String>,
    data: Bytes,
}

/// Extract the `file` field from a multipart request.
async fn extract_file(multipart: &mut Multipart) -> Result<Upload, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        let field_name = field.name().unwrap_or_default();
        tracing::debug!(field_name = %field_name, "Processing multipart field");

        if field_name == "file" {
            let file_name = field.file_name().map(str::to_string);
            let data = field.bytes().await?;
            tracing::debug!(size = data.len(), file_name = ?file_name, "Extracted file from multipart");
            return Ok(Upload { file_name, data });
        }
    }

    tracing::warn!("No 'file' field found in multipart request");
    Err(ApiError::MissingFile)
}

/// Only `.ifc` uploads are accepted; a missing file name is not checked.
fn check_file_type(file_name: Option<&str>) -> Result<(), ApiError> {
    match file_name {
        Some(name) if !name.to_ascii_lowercase().ends_with(".ifc") => {
            Err(ApiError::UnsupportedFileType(name.to_string()))
        }
        _ => Ok(()),
    }
}

fn resolve_policy(mode: Option<&str>, default: ErrorPolicy) -> Result<ErrorPolicy, ApiError> {
    match mode {
        None => Ok(default),
        Some(mode) => mode
            .parse()
            .map_err(|_| ApiError::InvalidMode(mode.to_string())),
    }
}

/// POST /api/v1/view - Extract faces and build the scene.
pub async fn view(
    State(state): State<AppState>,
    Query(query): Query<ViewQuery>,
    mut multipart: Multipart,
) -> Result<Json<ViewResponse>, ApiError> {
    let policy = resolve_policy(query.mode.as_deref(), state.config.error_policy)?;
    let upload = extract_file(&mut multipart).await?;
    check_file_type(upload.file_name.as_deref())?;

    let options = ExtractOptions {
        policy,
        apply_placement: state.config.apply_placement,
        ..ExtractOptions::default()
    };

    // Process on blocking thread pool (CPU-intensive)
    let data = upload.data;
    let response = tokio::task::spawn_blocking(move || process_upload(&data, options)).await??;

    Ok(Json(response))
}
