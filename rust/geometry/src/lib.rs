// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC tessellated face extraction
//!
//! Turns the `Tessellation` representations of an [`ifc_facets_core::IfcModel`]
//! into flat triangle lists, using earcutr for polygonal faces and nalgebra
//! for placements.

pub mod error;
pub mod extract;
pub mod mesh;
pub mod processors;
pub mod representation;
pub mod router;
pub mod triangulation;

// Re-export nalgebra types for convenience
pub use nalgebra::{Matrix4, Point3, Vector3};

pub use error::{Error, Result};
pub use extract::{
    Diagnostic, DiagnosticSink, ErrorPolicy, ExtractOptions, Extraction, ExtractionStats,
    FaceExtractor, ParsePolicyError,
};
pub use mesh::{FaceList, Mesh, Triangle};
pub use processors::{PolygonalFaceSetProcessor, TriangulatedFaceSetProcessor};
pub use representation::{product_representations, RepresentationKind, ShapeRepresentation};
pub use router::{GeometryProcessor, GeometryRouter};
pub use triangulation::triangulate_polygon_3d;
