// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Geometry Router - Dynamic dispatch to geometry processors
//!
//! Routes representation items to the processor registered for their type
//! and merges the resulting meshes.

mod transforms;


use crate::processors::{PolygonalFaceSetProcessor, TriangulatedFaceSetProcessor};
use crate::representation::ShapeRepresentation;
use crate::{Error, Mesh, Result};
use ifc_facets_core::{DecodedEntity, IfcModel, IfcType};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// Geometry processor trait
/// Each processor handles one family of IFC representation items
pub trait GeometryProcessor: Send + Sync {
    /// Process entity into mesh
    fn process(&self, entity: &DecodedEntity, model: &IfcModel) -> Result<Mesh>;

    /// Get supported IFC types
    fn supported_types(&self) -> Vec<IfcType>;
}

/// Geometry router - routes entities to processors
pub struct GeometryRouter {
    processors: FxHashMap<IfcType, Arc<dyn GeometryProcessor>>,
    /// Unit scale factor (e.g., 0.001 for millimeters -> meters)
    /// Applied to all mesh positions after placement
    unit_scale: f64,
}

impl GeometryRouter {
    /// Create new router with the face set processors registered
    pub fn new() -> Self {
        let mut router = Self {
            processors: FxHashMap::default(),
            unit_scale: 1.0, // Default to base meters
        };

        router.register(Box::new(TriangulatedFaceSetProcessor::new()));
        router.register(Box::new(PolygonalFaceSetProcessor::new()));

        router
    }

    /// Create router with a fixed unit scale
    pub fn with_scale(unit_scale: f64) -> Self {
        let mut router = Self::new();
        router.unit_scale = unit_scale;
        router
    }

    /// Create router with the length unit declared by the model's IFCPROJECT
    pub fn with_units(model: &IfcModel) -> Self {
        Self::with_scale(model.length_unit_scale())
    }

    /// Unit scale applied after placement
    #[inline]
    pub fn unit_scale(&self) -> f64 {
        self.unit_scale
    }

    /// Register a processor for every type it supports
    pub fn register(&mut self, processor: Box<dyn GeometryProcessor>) {
        let processor: Arc<dyn GeometryProcessor> = Arc::from(processor);
        for ifc_type in processor.supported_types() {
            self.processors.insert(ifc_type, Arc::clone(&processor));
        }
    }

    /// Whether a processor is registered for `ifc_type`
    #[inline]
    pub fn supports(&self, ifc_type: IfcType) -> bool {
        self.processors.contains_key(&ifc_type)
    }

    /// Process one representation item
    pub fn process_item(&self, model: &IfcModel, item: &DecodedEntity) -> Result<Mesh> {
        match self.processors.get(&item.ifc_type) {
            Some(processor) => processor.process(item, model),
            None => Err(Error::UnsupportedItem(format!(
                "#{} {}",
                item.id,
                model.type_name(item.id).unwrap_or("unknown")
            ))),
        }
    }

    /// Tessellate every item of a shape representation into one mesh
    ///
    /// Item meshes are merged in declaration order. Coordinates stay in the
    /// representation's local frame; see [`GeometryRouter::process_element`]
    /// for placed geometry.
    pub fn tessellate(
        &self,
        model: &IfcModel,
        representation: &ShapeRepresentation<'_>,
    ) -> Result<Mesh> {
        let mut mesh = Mesh::new();
        for item_id in representation.item_ids() {
            let item = model.entity(item_id)?;
            let item_mesh = self.process_item(model, item)?;
            mesh.merge(&item_mesh);
        }

        if mesh.is_empty() {
            return Err(Error::EmptyMesh(format!(
                "representation #{} has no triangles",
                representation.entity.id
            )));
        }
        Ok(mesh)
    }

    /// Tessellate a representation of `element` and move it into world space
    ///
    /// With `apply_placement` unset only the unit scale is applied.
    pub fn process_element(
        &self,
        model: &IfcModel,
        element: &DecodedEntity,
        representation: &ShapeRepresentation<'_>,
        apply_placement: bool,
    ) -> Result<Mesh> {
        let mut mesh = self.tessellate(model, representation)?;
        let transform = self.element_transform(model, element, apply_placement)?;
        mesh.transform(&transform);
        Ok(mesh)
    }
}

impl Default for GeometryRouter {
    fn default() -> Self {
        Self::new()
    }
}
