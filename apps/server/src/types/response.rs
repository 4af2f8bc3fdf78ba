// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response types for the API.

use super::Scene;
use ifc_facets_geometry::{Diagnostic, ExtractionStats};
use serde::{Deserialize, Serialize};

/// Result of viewing one uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewResponse {
    /// Figure to render.
    pub scene: Scene,
    /// Products whose geometry failed (tolerant mode only).
    pub diagnostics: Vec<DiagnosticInfo>,
    /// Model metadata.
    pub metadata: ModelMetadata,
    /// Processing statistics.
    pub stats: ProcessingStats,
}

/// A per-product failure as shown to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosticInfo {
    pub product_id: u32,
    pub product_type: String,
    pub product_name: Option<String>,
    /// Underlying error.
    pub message: String,
    /// Full sentence for display.
    pub summary: String,
}

impl From<&Diagnostic> for DiagnosticInfo {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            product_id: diagnostic.product_id,
            product_type: diagnostic.product_type.clone(),
            product_name: diagnostic.product_name.clone(),
            message: diagnostic.message.clone(),
            summary: diagnostic.to_string(),
        }
    }
}

/// Model metadata extracted from the IFC file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// IFC schema version (e.g., "IFC2X3", "IFC4", "IFC4X3").
    pub schema_version: String,
    /// Name recorded in FILE_NAME.
    pub file_name: Option<String>,
    /// Authoring application recorded in FILE_NAME.
    pub originating_system: Option<String>,
    /// Total number of entities in the file.
    pub entity_count: usize,
    /// Length unit scale to metres.
    pub length_unit_scale: f64,
    /// Extraction mode used ("strict" or "tolerant").
    pub mode: String,
}

/// Processing statistics.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    pub products: usize,
    pub products_with_representation: usize,
    pub tessellated_representations: usize,
    pub skipped_representations: usize,
    pub failures: usize,
    /// Total number of triangles (equals the number of traces).
    pub total_triangles: usize,
    /// Time spent parsing entities (ms).
    pub parse_time_ms: u64,
    /// Time spent extracting faces (ms).
    pub geometry_time_ms: u64,
    /// Total processing time (ms).
    pub total_time_ms: u64,
}

impl ProcessingStats {
    pub fn from_extraction(stats: &ExtractionStats) -> Self {
        Self {
            products: stats.products,
            products_with_representation: stats.products_with_representation,
            tessellated_representations: stats.tessellated_representations,
            skipped_representations: stats.skipped_representations,
            failures: stats.failures,
            total_triangles: stats.triangles,
            ..Self::default()
        }
    }
}
