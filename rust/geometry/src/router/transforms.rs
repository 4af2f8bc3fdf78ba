// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Placement and transformation: local placement chains and unit scaling.

use super::GeometryRouter;
use crate::processors::helpers::parse_axis2_placement_3d;
use crate::Result;
use ifc_facets_core::{DecodedEntity, IfcModel, IfcType};
use nalgebra::Matrix4;

/// Depth limit on PlacementRelTo chains (guards circular references)
const MAX_PLACEMENT_DEPTH: usize = 100;

impl GeometryRouter {
    /// Transform from an element's local frame to scaled world space
    pub fn element_transform(
        &self,
        model: &IfcModel,
        element: &DecodedEntity,
        apply_placement: bool,
    ) -> Result<Matrix4<f64>> {
        let placement = if apply_placement {
            self.placement_transform_from_element(model, element)?
        } else {
            Matrix4::identity()
        };

        if self.unit_scale == 1.0 {
            return Ok(placement);
        }
        Ok(Matrix4::new_scaling(self.unit_scale) * placement)
    }

    /// Combined ObjectPlacement transform of an element (unscaled)
    pub fn placement_transform_from_element(
        &self,
        model: &IfcModel,
        element: &DecodedEntity,
    ) -> Result<Matrix4<f64>> {
        // IfcProduct attribute 5: ObjectPlacement
        let placement = match element.get(5) {
            Some(attr) => model.resolve_ref(attr)?,
            None => None,
        };

        match placement {
            Some(placement) => self.placement_transform(model, placement, 0),
            None => Ok(Matrix4::identity()),
        }
    }

    /// Recursively resolve a placement hierarchy, composing parent * local
    ///
    /// Placements other than IfcLocalPlacement (grid, linear) resolve to identity.
    fn placement_transform(
        &self,
        model: &IfcModel,
        placement: &DecodedEntity,
        depth: usize,
    ) -> Result<Matrix4<f64>> {
        if depth > MAX_PLACEMENT_DEPTH || placement.ifc_type != IfcType::IfcLocalPlacement {
            return Ok(Matrix4::identity());
        }

        // Attribute 0: PlacementRelTo
        let parent = match placement.get(0) {
            Some(attr) => model.resolve_ref(attr)?,
            None => None,
        };
        let parent_transform = match parent {
            Some(parent) => self.placement_transform(model, parent, depth + 1)?,
            None => Matrix4::identity(),
        };

        // Attribute 1: RelativePlacement
        let relative = match placement.get(1) {
            Some(attr) => model.resolve_ref(attr)?,
            None => None,
        };
        let local_transform = match relative {
            Some(rel) if rel.ifc_type == IfcType::IfcAxis2Placement3D => {
                parse_axis2_placement_3d(rel, model)?
            }
            _ => Matrix4::identity(),
        };

        Ok(parent_transform * local_transform)
    }
}
