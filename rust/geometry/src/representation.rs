// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shape representations of products.
//!
//! `IfcProduct.Representation` → `IfcProductDefinitionShape.Representations`
//! → `IfcShapeRepresentation(ContextOfItems, RepresentationIdentifier,
//! RepresentationType, Items)`.

use crate::Result;
use ifc_facets_core::{DecodedEntity, IfcModel, IfcType};

/// RepresentationType label of tessellated shapes
const TESSELLATION_LABEL: &str = "Tessellation";

/// Kind of a shape representation
///
/// Only `Tessellated` is consumed. Swept solids, breps, CSG, mapped
/// representations and curves stay `Other` and are skipped without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepresentationKind {
    Tessellated,
    Other(String),
}

impl RepresentationKind {
    /// Classify a RepresentationType label (exact match)
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some(TESSELLATION_LABEL) => RepresentationKind::Tessellated,
            Some(other) => RepresentationKind::Other(other.to_string()),
            None => RepresentationKind::Other(String::new()),
        }
    }

    pub fn is_tessellated(&self) -> bool {
        matches!(self, RepresentationKind::Tessellated)
    }
}

/// One `IfcShapeRepresentation` of a product
#[derive(Debug, Clone)]
pub struct ShapeRepresentation<'m> {
    pub entity: &'m DecodedEntity,
    /// RepresentationIdentifier, e.g. `Body` or `Axis`
    pub identifier: Option<&'m str>,
    pub kind: RepresentationKind,
}

impl<'m> ShapeRepresentation<'m> {
    pub fn new(entity: &'m DecodedEntity) -> Self {
        Self {
            entity,
            identifier: entity.get_string(1),
            kind: RepresentationKind::from_label(entity.get_string(2)),
        }
    }

    /// Ids of the geometric items (attribute 3)
    pub fn item_ids(&self) -> Vec<u32> {
        self.entity.get_ref_list(3)
    }
}

/// Shape representations of a product, in declaration order
///
/// A product without Representation yields an empty list.
pub fn product_representations<'m>(
    model: &'m IfcModel,
    product: &DecodedEntity,
) -> Result<Vec<ShapeRepresentation<'m>>> {
    // IfcProduct attribute 6: Representation
    let shape = match product.get(6) {
        Some(attr) => model.resolve_ref(attr)?,
        None => None,
    };
    let Some(shape) = shape else {
        return Ok(Vec::new());
    };

    // IfcProductDefinitionShape attribute 2: Representations
    let representations = match shape.get(2) {
        Some(attr) => model.resolve_ref_list(attr)?,
        None => Vec::new(),
    };

    Ok(representations
        .into_iter()
        .filter(|entity| entity.ifc_type == IfcType::IfcShapeRepresentation)
        .map(ShapeRepresentation::new)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_label() {
        assert_eq!(
            RepresentationKind::from_label(Some("Tessellation")),
            RepresentationKind::Tessellated
        );
        assert_eq!(
            RepresentationKind::from_label(Some("SweptSolid")),
            RepresentationKind::Other("SweptSolid".to_string())
        );
        assert!(!RepresentationKind::from_label(Some("tessellation")).is_tessellated());
        assert!(!RepresentationKind::from_label(None).is_tessellated());
    }

    #[test]
    fn test_product_representations() {
        let model = IfcModel::parse(
            r#"ISO-10303-21;
DATA;
#1=IFCWALL('w',$,'Wall',$,$,$,#2,$);
#2=IFCPRODUCTDEFINITIONSHAPE($,$,(#3,#4));
#3=IFCSHAPEREPRESENTATION(#9,'Axis','Curve2D',(#10));
#4=IFCSHAPEREPRESENTATION(#9,'Body','Tessellation',(#11,#12));
#5=IFCWALL('v',$,'Bare',$,$,$,$,$);
ENDSEC;
"#,
        )
        .unwrap();

        let wall = model.get(1).unwrap();
        let reps = product_representations(&model, wall).unwrap();
        assert_eq!(reps.len(), 2);
        assert_eq!(reps[0].identifier, Some("Axis"));
        assert_eq!(reps[0].kind, RepresentationKind::Other("Curve2D".to_string()));
        assert!(reps[1].kind.is_tessellated());
        assert_eq!(reps[1].item_ids(), vec![11, 12]);

        let bare = model.get(5).unwrap();
        assert!(product_representations(&model, bare).unwrap().is_empty());
    }
}
