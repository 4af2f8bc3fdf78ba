// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Unit extraction and conversion for IFC files
//!
//! Handles parsing of IFCSIUNIT and IFCCONVERSIONBASEDUNIT so geometry can
//! be reported in metres.

use crate::decoded::DecodedEntity;
use crate::error::Result;
use crate::model::IfcModel;
use crate::schema::IfcType;

/// SI Prefix multipliers as defined in IFC specification
/// Maps IfcSIPrefix enum values to their numeric multipliers
#[inline]
pub fn get_si_prefix_multiplier(prefix: &str) -> f64 {
    match prefix {
        "ATTO" => 1e-18,
        "FEMTO" => 1e-15,
        "PICO" => 1e-12,
        "NANO" => 1e-9,
        "MICRO" => 1e-6,
        "MILLI" => 1e-3,
        "CENTI" => 1e-2,
        "DECI" => 1e-1,
        "DECA" => 1e1,
        "HECTO" => 1e2,
        "KILO" => 1e3,
        "MEGA" => 1e6,
        "GIGA" => 1e9,
        "TERA" => 1e12,
        "PETA" => 1e15,
        "EXA" => 1e18,
        _ => 1.0,
    }
}

/// Extract length unit scale factor from IFC file
///
/// Follows the chain: IFCPROJECT → IFCUNITASSIGNMENT → IFCSIUNIT / IFCCONVERSIONBASEDUNIT
/// Returns the multiplier to convert coordinates to base metres.
pub fn extract_length_unit_scale(model: &IfcModel, project_id: u32) -> Result<f64> {
    let project = model.entity(project_id)?;
    if project.ifc_type != IfcType::IfcProject {
        return Ok(1.0);
    }

    // IFCPROJECT attribute 8: UnitsInContext (IFCUNITASSIGNMENT)
    let assignment = match project.get(8) {
        Some(attr) => match model.resolve_ref(attr)? {
            Some(entity) if entity.ifc_type == IfcType::IfcUnitAssignment => entity,
            _ => return Ok(1.0),
        },
        None => return Ok(1.0),
    };

    let units = match assignment.get(0) {
        Some(attr) => model.resolve_ref_list(attr)?,
        None => return Ok(1.0),
    };

    for unit in units {
        if let Some(scale) = length_unit_scale(model, unit)? {
            return Ok(scale);
        }
    }

    Ok(1.0)
}

/// Scale of one unit entity if it is a length unit
fn length_unit_scale(model: &IfcModel, unit: &DecodedEntity) -> Result<Option<f64>> {
    match unit.ifc_type {
        // IFCSIUNIT(Dimensions, UnitType, Prefix, Name)
        IfcType::IfcSiUnit => {
            if unit.get_enum(1) != Some("LENGTHUNIT") {
                return Ok(None);
            }
            Ok(Some(si_unit_scale(unit)))
        }
        // IFCCONVERSIONBASEDUNIT(Dimensions, UnitType, Name, ConversionFactor)
        IfcType::IfcConversionBasedUnit => {
            if unit.get_enum(1) != Some("LENGTHUNIT") {
                return Ok(None);
            }
            let factor = match unit.get(3) {
                Some(attr) => model.resolve_ref(attr)?,
                None => None,
            };
            let Some(factor) = factor.filter(|f| f.ifc_type == IfcType::IfcMeasureWithUnit)
            else {
                return Ok(None);
            };

            // IFCMEASUREWITHUNIT(ValueComponent, UnitComponent)
            let value = factor.get_float(0).unwrap_or(1.0);
            let base = match factor.get(1) {
                Some(attr) => match model.resolve_ref(attr)? {
                    Some(base) if base.ifc_type == IfcType::IfcSiUnit => si_unit_scale(base),
                    _ => 1.0,
                },
                None => 1.0,
            };
            Ok(Some(value * base))
        }
        _ => Ok(None),
    }
}

#[inline]
fn si_unit_scale(unit: &DecodedEntity) -> f64 {
    unit.get_enum(2).map(get_si_prefix_multiplier).unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn model_with_units(units: &str, refs: &str) -> IfcModel {
        let text = format!(
            "ISO-10303-21;\nDATA;\n#1=IFCPROJECT('p',$,$,$,$,$,$,$,#2);\n#2=IFCUNITASSIGNMENT(({refs}));\n{units}\nENDSEC;\n"
        );
        IfcModel::parse(&text).unwrap()
    }

    #[test]
    fn test_si_prefix_multipliers() {
        assert_eq!(get_si_prefix_multiplier("MILLI"), 0.001);
        assert_eq!(get_si_prefix_multiplier("CENTI"), 0.01);
        assert_eq!(get_si_prefix_multiplier("KILO"), 1000.0);
        assert_eq!(get_si_prefix_multiplier(""), 1.0);
        assert_eq!(get_si_prefix_multiplier("UNKNOWN"), 1.0);
    }

    #[test]
    fn test_millimetre_project() {
        let model = model_with_units(
            "#3=IFCSIUNIT(*,.AREAUNIT.,$,.SQUARE_METRE.);\n#4=IFCSIUNIT(*,.LENGTHUNIT.,.MILLI.,.METRE.);",
            "#3,#4",
        );
        assert_relative_eq!(model.length_unit_scale(), 0.001);
    }

    #[test]
    fn test_foot_project() {
        let model = model_with_units(
            "#3=IFCSIUNIT(*,.LENGTHUNIT.,$,.METRE.);\n#4=IFCDIMENSIONALEXPONENTS(1,0,0,0,0,0,0);\n#5=IFCMEASUREWITHUNIT(IFCLENGTHMEASURE(0.3048),#3);\n#6=IFCCONVERSIONBASEDUNIT(#4,.LENGTHUNIT.,'FOOT',#5);",
            "#6",
        );
        assert_relative_eq!(model.length_unit_scale(), 0.3048);
    }

    #[test]
    fn test_defaults_to_metres() {
        let model = model_with_units("#3=IFCSIUNIT(*,.TIMEUNIT.,$,.SECOND.);", "#3");
        assert_eq!(model.length_unit_scale(), 1.0);

        let bare = IfcModel::parse("ISO-10303-21;\nDATA;\n#1=IFCWALL('w');\nENDSEC;\n").unwrap();
        assert_eq!(bare.length_unit_scale(), 1.0);
    }
}
