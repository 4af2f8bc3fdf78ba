// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Upload pipeline: load the model, extract faces, build the scene.
//!
//! Runs synchronously; callers move it onto a blocking thread.

use super::scene::build_scene;
use crate::error::ApiError;
use crate::types::{DiagnosticInfo, ModelMetadata, ProcessingStats, ViewResponse};
use ifc_facets_core::IfcModel;
use ifc_facets_geometry::{Diagnostic, ExtractOptions, FaceExtractor};
use std::time::Instant;

/// Process one uploaded file into a renderable response.
pub fn process_upload(data: &[u8], options: ExtractOptions) -> Result<ViewResponse, ApiError> {
    let total_start = Instant::now();

    tracing::info!(
        content_size = data.len(),
        mode = %options.policy,
        apply_placement = options.apply_placement,
        "Starting IFC face extraction"
    );

    let parse_start = Instant::now();
    let model = IfcModel::from_bytes(data)?;
    let parse_time_ms = parse_start.elapsed().as_millis() as u64;

    let header = model.header();
    let metadata = ModelMetadata {
        schema_version: model.schema_version().to_string(),
        file_name: header.file_name.clone(),
        originating_system: header.originating_system.clone(),
        entity_count: model.entity_count(),
        length_unit_scale: model.length_unit_scale(),
        mode: options.policy.to_string(),
    };

    tracing::debug!(
        entity_count = metadata.entity_count,
        schema = %metadata.schema_version,
        parse_time_ms,
        "Model loaded"
    );

    let geometry_start = Instant::now();
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    let extraction = FaceExtractor::new(options).extract(&model, &mut diagnostics);
    let geometry_time_ms = geometry_start.elapsed().as_millis() as u64;

    for diagnostic in &diagnostics {
        tracing::warn!(
            product_id = diagnostic.product_id,
            product_type = %diagnostic.product_type,
            error = %diagnostic.message,
            "Skipping product geometry"
        );
    }

    let extraction = match extraction {
        Ok(extraction) => extraction,
        Err(err) => {
            tracing::warn!(error = %err, diagnostics = diagnostics.len(), "Face extraction failed");
            return Err(match ApiError::from(err) {
                ApiError::NoGeometry(_) => {
                    ApiError::NoGeometry(diagnostics.iter().map(DiagnosticInfo::from).collect())
                }
                other => other,
            });
        }
    };

    let scene = build_scene(&extraction.faces);

    let mut stats = ProcessingStats::from_extraction(&extraction.stats);
    stats.parse_time_ms = parse_time_ms;
    stats.geometry_time_ms = geometry_time_ms;
    stats.total_time_ms = total_start.elapsed().as_millis() as u64;

    tracing::info!(
        products = stats.products,
        triangles = stats.total_triangles,
        traces = scene.trace_count(),
        failures = stats.failures,
        skipped_representations = stats.skipped_representations,
        total_time_ms = stats.total_time_ms,
        "Face extraction complete"
    );

    Ok(ViewResponse {
        scene,
        diagnostics: diagnostics.iter().map(DiagnosticInfo::from).collect(),
        metadata,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const GOOD_AND_BAD: &str = r#"ISO-10303-21;
HEADER;
FILE_DESCRIPTION((''),'2;1');
FILE_NAME('model.ifc','2024-01-01T00:00:00',(''),(''),'','Modeller 1.0','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(1.,0.,0.),(0.,1.,0.)));
#2=IFCTRIANGULATEDFACESET(#1,$,$,((1,2,3)),$);
#3=IFCTRIANGULATEDFACESET(#1,$,$,((1,2,7)),$);
#4=IFCSHAPEREPRESENTATION($,'Body','Tessellation',(#3));
#5=IFCPRODUCTDEFINITIONSHAPE($,$,(#4));
#6=IFCWALL('2O2Fr$t4X7Zf8NOew3FLOH',$,'A',$,$,$,#5,$,$);
#7=IFCSHAPEREPRESENTATION($,'Body','Tessellation',(#2));
#8=IFCPRODUCTDEFINITIONSHAPE($,$,(#7));
#9=IFCSLAB('3cUkl32yn9qRSPvBJVyWYp',$,'B',$,$,$,#8,$,$);
ENDSEC;
END-ISO-10303-21;
"#;

    #[test]
    fn test_tolerant_pipeline() {
        let response = process_upload(GOOD_AND_BAD.as_bytes(), ExtractOptions::tolerant()).unwrap();

        assert_eq!(response.scene.trace_count(), 1);
        assert_eq!(response.stats.total_triangles, 1);
        assert_eq!(response.diagnostics.len(), 1);
        assert_eq!(response.diagnostics[0].product_name.as_deref(), Some("A"));
        assert_eq!(response.metadata.schema_version, "IFC4");
        assert_eq!(response.metadata.originating_system.as_deref(), Some("Modeller 1.0"));
        assert_eq!(response.metadata.mode, "tolerant");
    }

    #[test]
    fn test_strict_pipeline() {
        let err = process_upload(GOOD_AND_BAD.as_bytes(), ExtractOptions::strict()).unwrap_err();
        assert!(matches!(err, ApiError::Geometry(_)));
        assert!(err.to_string().contains("#6"));
    }

    #[test]
    fn test_all_failures_reach_the_error() {
        let text = GOOD_AND_BAD.replace("(#2)", "(#3)");
        let err = process_upload(text.as_bytes(), ExtractOptions::tolerant()).unwrap_err();
        match err {
            ApiError::NoGeometry(diagnostics) => {
                let names: Vec<_> = diagnostics.iter().map(|d| d.product_name.as_deref()).collect();
                assert_eq!(names, vec![Some("A"), Some("B")]);
            }
            other => panic!("unexpected error {other:?}"),
        }

        let err = process_upload(text.as_bytes(), ExtractOptions::strict()).unwrap_err();
        assert!(matches!(err, ApiError::Geometry(_)));
    }

    #[test]
    fn test_invalid_upload() {
        let err = process_upload(&[0xff, 0xfe, 0x00], ExtractOptions::tolerant()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidUtf8(_)));

        let err = process_upload(b"hello world", ExtractOptions::tolerant()).unwrap_err();
        assert!(matches!(err, ApiError::Parse(_)));
    }
}
