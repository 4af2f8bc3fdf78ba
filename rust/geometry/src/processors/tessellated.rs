// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tessellated geometry processors - pre-tessellated/polygon meshes.
//!
//! Handles IfcTriangulatedFaceSet (explicit triangle meshes) and
//! IfcPolygonalFaceSet (polygon meshes requiring triangulation).

use super::helpers::{parse_point_list, resolve_index};
use crate::router::GeometryProcessor;
use crate::triangulation::triangulate_polygon_3d;
use crate::{Error, Mesh, Point3, Result};
use ifc_facets_core::{AttributeValue, DecodedEntity, IfcModel, IfcType};
use smallvec::SmallVec;

/// Index loop of one polygon, usually small
type IndexLoop = SmallVec<[u32; 8]>;

/// Coordinates and optional PnIndex remapping shared by both face set types
struct FaceSetVertices {
    positions: Vec<f64>,
    pn_index: Option<Vec<i64>>,
}

impl FaceSetVertices {
    fn load(
        model: &IfcModel,
        entity: &DecodedEntity,
        coords_index: usize,
        pn_index: usize,
    ) -> Result<Self> {
        let coords_attr = entity.get(coords_index).ok_or_else(|| {
            Error::geometry(format!("{} #{} missing Coordinates", entity.ifc_type, entity.id))
        })?;
        let coords = model.resolve_ref(coords_attr)?.ok_or_else(|| {
            Error::geometry(format!(
                "{} #{} Coordinates is not an entity reference",
                entity.ifc_type, entity.id
            ))
        })?;
        if coords.ifc_type != IfcType::IfcCartesianPointList3D {
            return Err(Error::geometry(format!(
                "Expected IfcCartesianPointList3D for Coordinates, found {}",
                model.type_name(coords.id).unwrap_or("?")
            )));
        }

        let point_list = coords
            .get_list(0)
            .ok_or_else(|| Error::geometry("CartesianPointList3D missing CoordList"))?;
        let positions = parse_point_list(point_list)?;

        let pn_index = entity
            .get_list(pn_index)
            .map(|values| {
                values
                    .iter()
                    .map(|v| {
                        v.as_int()
                            .ok_or_else(|| Error::geometry("PnIndex entry is not an integer"))
                    })
                    .collect::<Result<Vec<i64>>>()
            })
            .transpose()?;

        Ok(Self {
            positions,
            pn_index,
        })
    }

    #[inline]
    fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Resolve a 1-based CoordIndex value to a 0-based vertex index
    #[inline]
    fn resolve(&self, value: &AttributeValue) -> Result<u32> {
        let raw = value
            .as_int()
            .ok_or_else(|| Error::geometry("Face index is not an integer"))?;
        let mapped = match &self.pn_index {
            Some(pn) => *raw
                .checked_sub(1)
                .and_then(|i| usize::try_from(i).ok())
                .and_then(|i| pn.get(i))
                .ok_or(Error::IndexOutOfRange {
                    index: raw,
                    vertex_count: pn.len(),
                })?,
            None => raw,
        };
        resolve_index(mapped, self.vertex_count())
    }

    #[inline]
    fn point(&self, index: u32) -> Point3<f64> {
        let base = index as usize * 3;
        Point3::new(
            self.positions[base],
            self.positions[base + 1],
            self.positions[base + 2],
        )
    }

    fn resolve_loop(&self, values: &[AttributeValue]) -> Result<IndexLoop> {
        values.iter().map(|v| self.resolve(v)).collect()
    }
}

/// TriangulatedFaceSet processor
/// Handles IfcTriangulatedFaceSet and IfcTriangulatedIrregularNetwork
pub struct TriangulatedFaceSetProcessor;

impl TriangulatedFaceSetProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl GeometryProcessor for TriangulatedFaceSetProcessor {
    fn process(&self, entity: &DecodedEntity, model: &IfcModel) -> Result<Mesh> {
        // IfcTriangulatedFaceSet attributes:
        // 0: Coordinates (IfcCartesianPointList3D)
        // 1: Normals (optional)
        // 2: Closed (optional)
        // 3: CoordIndex (list of list of IfcPositiveInteger)
        // 4: PnIndex (optional, IFC4 ADD2 and later)
        let vertices = FaceSetVertices::load(model, entity, 0, 4)?;

        let faces = entity
            .get_list(3)
            .ok_or_else(|| Error::geometry("TriangulatedFaceSet missing CoordIndex"))?;

        let mut indices = Vec::with_capacity(faces.len() * 3);
        for face in faces {
            let triple = face
                .as_list()
                .filter(|values| values.len() == 3)
                .ok_or_else(|| Error::geometry("CoordIndex entry is not an index triple"))?;
            for value in triple {
                indices.push(vertices.resolve(value)?);
            }
        }

        Ok(Mesh {
            positions: vertices.positions,
            indices,
        })
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![
            IfcType::IfcTriangulatedFaceSet,
            IfcType::IfcTriangulatedIrregularNetwork,
        ]
    }
}

impl Default for TriangulatedFaceSetProcessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles IfcPolygonalFaceSet - explicit polygon meshes that need triangulation
/// Unlike IfcTriangulatedFaceSet, faces can be arbitrary polygons (not just triangles)
pub struct PolygonalFaceSetProcessor;

impl PolygonalFaceSetProcessor {
    pub fn new() -> Self {
        Self
    }

    /// Triangulate one IfcIndexedPolygonalFace(WithVoids) into `indices`
    fn triangulate_face(
        vertices: &FaceSetVertices,
        face: &DecodedEntity,
        indices: &mut Vec<u32>,
    ) -> Result<()> {
        // IfcIndexedPolygonalFace: 0 CoordIndex
        // IfcIndexedPolygonalFaceWithVoids: 0 CoordIndex, 1 InnerCoordIndices
        let outer_values = face
            .get_list(0)
            .ok_or_else(|| Error::geometry(format!("Polygonal face #{} missing CoordIndex", face.id)))?;
        let outer = vertices.resolve_loop(outer_values)?;

        let mut holes: Vec<IndexLoop> = Vec::new();
        if face.ifc_type == IfcType::IfcIndexedPolygonalFaceWithVoids {
            for inner in face.get_list(1).unwrap_or_default() {
                if let Some(values) = inner.as_list() {
                    holes.push(vertices.resolve_loop(values)?);
                }
            }
        }

        if outer.len() < 3 {
            return Err(Error::geometry(format!(
                "Polygonal face #{} has fewer than 3 vertices",
                face.id
            )));
        }

        let outer_points: Vec<Point3<f64>> = outer.iter().map(|&i| vertices.point(i)).collect();
        let hole_points: Vec<Vec<Point3<f64>>> = holes
            .iter()
            .map(|hole| hole.iter().map(|&i| vertices.point(i)).collect())
            .collect();

        let loop_indices: Vec<u32> = outer
            .iter()
            .chain(holes.iter().flatten())
            .copied()
            .collect();

        for [a, b, c] in triangulate_polygon_3d(&outer_points, &hole_points)? {
            indices.extend_from_slice(&[loop_indices[a], loop_indices[b], loop_indices[c]]);
        }

        Ok(())
    }
}

impl GeometryProcessor for PolygonalFaceSetProcessor {
    fn process(&self, entity: &DecodedEntity, model: &IfcModel) -> Result<Mesh> {
        // IfcPolygonalFaceSet attributes:
        // 0: Coordinates (IfcCartesianPointList3D)
        // 1: Closed (optional)
        // 2: Faces (list of IfcIndexedPolygonalFace)
        // 3: PnIndex (optional)
        let vertices = FaceSetVertices::load(model, entity, 0, 3)?;

        let faces_attr = entity
            .get(2)
            .ok_or_else(|| Error::geometry("PolygonalFaceSet missing Faces"))?;
        let faces = model.resolve_ref_list(faces_attr)?;

        let mut indices = Vec::with_capacity(faces.len() * 6);
        for face in faces {
            match face.ifc_type {
                IfcType::IfcIndexedPolygonalFace | IfcType::IfcIndexedPolygonalFaceWithVoids => {
                    Self::triangulate_face(&vertices, face, &mut indices)?;
                }
                _ => {
                    return Err(Error::geometry(format!(
                        "Unexpected face type {} in PolygonalFaceSet #{}",
                        model.type_name(face.id).unwrap_or("?"),
                        entity.id
                    )))
                }
            }
        }

        Ok(Mesh {
            positions: vertices.positions,
            indices,
        })
    }

    fn supported_types(&self) -> Vec<IfcType> {
        vec![IfcType::IfcPolygonalFaceSet]
    }
}

impl Default for PolygonalFaceSetProcessor {
    fn default() -> Self {
        Self::new()
    }
}
