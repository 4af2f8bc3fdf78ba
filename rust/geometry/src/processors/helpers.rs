// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared helper functions for geometry processors and placement.
//!
//! Parses the small entities every geometric item leans on:
//! IfcCartesianPoint, IfcDirection, IfcAxis2Placement3D and point lists.

use crate::{Error, Point3, Result, Vector3};
use ifc_facets_core::{AttributeValue, DecodedEntity, IfcModel, IfcType};
use nalgebra::Matrix4;

/// Read up to three numeric components, missing ones default to 0
#[inline]
fn components(values: &[AttributeValue]) -> [f64; 3] {
    let at = |i: usize| values.get(i).and_then(|v| v.as_float()).unwrap_or(0.0);
    [at(0), at(1), at(2)]
}

/// Flatten an IfcCartesianPointList3D CoordList into `[x, y, z, ...]`
///
/// Every entry must hold three numbers.
pub(crate) fn parse_point_list(points: &[AttributeValue]) -> Result<Vec<f64>> {
    let mut positions = Vec::with_capacity(points.len() * 3);
    for (i, point) in points.iter().enumerate() {
        let coords = point
            .as_list()
            .filter(|coords| coords.len() == 3)
            .ok_or_else(|| Error::geometry(format!("Point {} is not a 3D coordinate", i + 1)))?;
        for value in coords {
            let v = value
                .as_float()
                .ok_or_else(|| Error::geometry(format!("Point {} has a non-numeric coordinate", i + 1)))?;
            positions.push(v);
        }
    }
    Ok(positions)
}

/// Convert a 1-based IFC index into a checked 0-based vertex index
#[inline]
pub(crate) fn resolve_index(index: i64, vertex_count: usize) -> Result<u32> {
    if index < 1 || index as u64 > vertex_count as u64 {
        return Err(Error::IndexOutOfRange {
            index,
            vertex_count,
        });
    }
    Ok((index - 1) as u32)
}

/// Parse IfcCartesianPoint referenced by `parent` at `attr_index`
pub(crate) fn parse_cartesian_point(
    parent: &DecodedEntity,
    model: &IfcModel,
    attr_index: usize,
) -> Result<Point3<f64>> {
    let point_attr = parent
        .get(attr_index)
        .ok_or_else(|| Error::geometry("Missing cartesian point"))?;

    let point_entity = model
        .resolve_ref(point_attr)?
        .ok_or_else(|| Error::geometry("Failed to resolve cartesian point"))?;

    if point_entity.ifc_type != IfcType::IfcCartesianPoint {
        return Err(Error::geometry(format!(
            "Expected IfcCartesianPoint, got {}",
            point_entity.ifc_type
        )));
    }

    let coords = point_entity
        .get_list(0)
        .ok_or_else(|| Error::geometry("IfcCartesianPoint missing coordinates"))?;
    let [x, y, z] = components(coords);
    Ok(Point3::new(x, y, z))
}

/// Parse IfcDirection ratios
pub(crate) fn parse_direction(direction: &DecodedEntity) -> Result<Vector3<f64>> {
    if direction.ifc_type != IfcType::IfcDirection {
        return Err(Error::geometry(format!(
            "Expected IfcDirection, got {}",
            direction.ifc_type
        )));
    }

    let ratios = direction
        .get_list(0)
        .ok_or_else(|| Error::geometry("IfcDirection missing ratios"))?;
    let [x, y, z] = components(ratios);
    Ok(Vector3::new(x, y, z))
}

/// Resolve an optional direction attribute, falling back to `default`
fn optional_direction(
    entity: &DecodedEntity,
    model: &IfcModel,
    attr_index: usize,
    default: Vector3<f64>,
) -> Result<Vector3<f64>> {
    let resolved = match entity.get(attr_index) {
        Some(attr) => model.resolve_ref(attr)?,
        None => None,
    };
    match resolved {
        Some(direction) => {
            let v = parse_direction(direction)?;
            if v.norm() < 1e-12 {
                Ok(default)
            } else {
                Ok(v)
            }
        }
        None => Ok(default),
    }
}

/// Parse IfcAxis2Placement3D into a transformation matrix
///
/// Location defaults to the origin, Axis to +Z and RefDirection to +X.
/// RefDirection is projected onto the plane normal to Axis.
pub(crate) fn parse_axis2_placement_3d(
    placement: &DecodedEntity,
    model: &IfcModel,
) -> Result<Matrix4<f64>> {
    // IfcAxis2Placement3D: Location, Axis, RefDirection
    let location = match placement.get(0) {
        Some(attr) if !attr.is_null() => parse_cartesian_point(placement, model, 0)?,
        _ => Point3::origin(),
    };

    let z_axis = optional_direction(placement, model, 1, Vector3::z())?.normalize();
    let x_hint = optional_direction(placement, model, 2, Vector3::x())?.normalize();

    let x_orthogonal = x_hint - z_axis * x_hint.dot(&z_axis);
    let x_axis = if x_orthogonal.norm() > 1e-6 {
        x_orthogonal.normalize()
    } else if z_axis.z.abs() < 0.9 {
        // X parallel to Z: pick any perpendicular
        Vector3::z().cross(&z_axis).normalize()
    } else {
        Vector3::x().cross(&z_axis).normalize()
    };
    let y_axis = z_axis.cross(&x_axis).normalize();

    // Columns are the local axes in parent space
    let mut transform = Matrix4::identity();
    for (col, axis) in [x_axis, y_axis, z_axis].iter().enumerate() {
        transform[(0, col)] = axis.x;
        transform[(1, col)] = axis.y;
        transform[(2, col)] = axis.z;
    }
    transform[(0, 3)] = location.x;
    transform[(1, 3)] = location.y;
    transform[(2, 3)] = location.z;

    Ok(transform)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_resolve_index_bounds() {
        assert_eq!(resolve_index(1, 3).unwrap(), 0);
        assert_eq!(resolve_index(3, 3).unwrap(), 2);
        assert!(matches!(
            resolve_index(0, 3),
            Err(Error::IndexOutOfRange { index: 0, .. })
        ));
        assert!(matches!(
            resolve_index(4, 3),
            Err(Error::IndexOutOfRange { index: 4, vertex_count: 3 })
        ));
        assert!(resolve_index(-2, 3).is_err());
    }

    #[test]
    fn test_parse_point_list_rejects_2d_points() {
        let model = IfcModel::parse(
            "ISO-10303-21;\nDATA;\n#1=IFCCARTESIANPOINTLIST3D(((0.,0.,0.),(1.,2.)));\nENDSEC;\n",
        )
        .unwrap();
        let list = model.get(1).unwrap().get_list(0).unwrap();
        assert!(parse_point_list(list).is_err());
    }

    #[test]
    fn test_axis2_placement_rotated() {
        let model = IfcModel::parse(
            r#"ISO-10303-21;
DATA;
#1=IFCCARTESIANPOINT((5.,0.,0.));
#2=IFCDIRECTION((0.,0.,1.));
#3=IFCDIRECTION((0.,1.,0.));
#4=IFCAXIS2PLACEMENT3D(#1,#2,#3);
ENDSEC;
"#,
        )
        .unwrap();
        let m = parse_axis2_placement_3d(model.get(4).unwrap(), &model).unwrap();
        // Local X maps to world Y, then offset by the location
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 5.0, epsilon = 1e-9);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-9);
        assert_relative_eq!(p.z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_axis2_placement_defaults() {
        let model = IfcModel::parse(
            "ISO-10303-21;\nDATA;\n#1=IFCCARTESIANPOINT((0.,0.,0.));\n#2=IFCAXIS2PLACEMENT3D(#1,$,$);\nENDSEC;\n",
        )
        .unwrap();
        let m = parse_axis2_placement_3d(model.get(2).unwrap(), &model).unwrap();
        assert_relative_eq!(m, Matrix4::identity(), epsilon = 1e-12);
    }
}
