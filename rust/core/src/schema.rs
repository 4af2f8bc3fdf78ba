// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC Schema Types
//!
//! Fast type checking using an enum instead of string comparison.
//! Only the types the viewer reasons about are named; everything else
//! decodes as [`IfcType::Unknown`].

use rustc_hash::FxHashMap;
use std::fmt;
use std::sync::OnceLock;

macro_rules! ifc_types {
    (
        products: [$($product:ident),* $(,)?],
        others: [$($other:ident),* $(,)?] $(,)?
    ) => {
        /// IFC Entity Types
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum IfcType {
            $($product,)*
            $($other,)*
            /// Any type not listed above
            Unknown,
        }

        impl IfcType {
            const ALL: &'static [IfcType] = &[
                $(IfcType::$product,)*
                $(IfcType::$other,)*
            ];

            /// Schema name in IFC casing, e.g. `IfcWall`
            pub fn name(&self) -> &'static str {
                match self {
                    $(IfcType::$product => stringify!($product),)*
                    $(IfcType::$other => stringify!($other),)*
                    IfcType::Unknown => "Unknown",
                }
            }

            /// True for subtypes of IfcProduct (entities that can carry a shape)
            pub fn is_product(&self) -> bool {
                matches!(self, $(IfcType::$product)|*)
            }
        }
    };
}

ifc_types! {
    products: [
        // Built elements
        IfcBuildingElement,
        IfcBuiltElement,
        IfcBeam,
        IfcBeamStandardCase,
        IfcBearing,
        IfcBuildingElementComponent,
        IfcBuildingElementPart,
        IfcBuildingElementProxy,
        IfcCaissonFoundation,
        IfcChimney,
        IfcColumn,
        IfcColumnStandardCase,
        IfcCourse,
        IfcCovering,
        IfcCurtainWall,
        IfcDeepFoundation,
        IfcDoor,
        IfcDoorStandardCase,
        IfcEarthworksElement,
        IfcEarthworksFill,
        IfcFooting,
        IfcKerb,
        IfcMember,
        IfcMemberStandardCase,
        IfcMooringDevice,
        IfcNavigationElement,
        IfcPavement,
        IfcPile,
        IfcPlate,
        IfcPlateStandardCase,
        IfcRail,
        IfcRailing,
        IfcRamp,
        IfcRampFlight,
        IfcReinforcedSoil,
        IfcRoof,
        IfcShadingDevice,
        IfcSlab,
        IfcSlabElementedCase,
        IfcSlabStandardCase,
        IfcStair,
        IfcStairFlight,
        IfcTrackElement,
        IfcWall,
        IfcWallElementedCase,
        IfcWallStandardCase,
        IfcWindow,
        IfcWindowStandardCase,
        // Components and assemblies
        IfcDiscreteAccessory,
        IfcElementAssembly,
        IfcFastener,
        IfcImpactProtectionDevice,
        IfcMechanicalFastener,
        IfcReinforcingBar,
        IfcReinforcingMesh,
        IfcSign,
        IfcTendon,
        IfcTendonAnchor,
        IfcTendonConduit,
        IfcVibrationDamper,
        IfcVibrationIsolator,
        // Furnishing and other elements
        IfcFurnishingElement,
        IfcFurniture,
        IfcSystemFurnitureElement,
        IfcElectricalElement,
        IfcEquipmentElement,
        IfcGeographicElement,
        IfcTransportElement,
        IfcVirtualElement,
        IfcCivilElement,
        // Features
        IfcOpeningElement,
        IfcOpeningStandardCase,
        IfcProjectionElement,
        IfcSurfaceFeature,
        IfcVoidingFeature,
        IfcEarthworksCut,
        IfcEdgeFeature,
        IfcChamferEdgeFeature,
        IfcRoundedEdgeFeature,
        // Distribution elements
        IfcDistributionElement,
        IfcDistributionControlElement,
        IfcDistributionFlowElement,
        IfcDistributionChamberElement,
        IfcDistributionPort,
        IfcEnergyConversionDevice,
        IfcFlowController,
        IfcFlowFitting,
        IfcFlowMovingDevice,
        IfcFlowSegment,
        IfcFlowStorageDevice,
        IfcFlowTerminal,
        IfcFlowTreatmentDevice,
        IfcActuator,
        IfcAirTerminal,
        IfcAirTerminalBox,
        IfcAirToAirHeatRecovery,
        IfcAlarm,
        IfcAudioVisualAppliance,
        IfcBoiler,
        IfcBurner,
        IfcCableCarrierFitting,
        IfcCableCarrierSegment,
        IfcCableFitting,
        IfcCableSegment,
        IfcChiller,
        IfcCoil,
        IfcCommunicationsAppliance,
        IfcCompressor,
        IfcCondenser,
        IfcController,
        IfcConveyorSegment,
        IfcCooledBeam,
        IfcCoolingTower,
        IfcDamper,
        IfcDistributionBoard,
        IfcDuctFitting,
        IfcDuctSegment,
        IfcDuctSilencer,
        IfcElectricAppliance,
        IfcElectricDistributionBoard,
        IfcElectricDistributionPoint,
        IfcElectricFlowStorageDevice,
        IfcElectricFlowTreatmentDevice,
        IfcElectricGenerator,
        IfcElectricHeater,
        IfcElectricMotor,
        IfcElectricTimeControl,
        IfcEngine,
        IfcEvaporativeCooler,
        IfcEvaporator,
        IfcFan,
        IfcFilter,
        IfcFireSuppressionTerminal,
        IfcFlowInstrument,
        IfcFlowMeter,
        IfcGasTerminal,
        IfcHeatExchanger,
        IfcHumidifier,
        IfcInterceptor,
        IfcJunctionBox,
        IfcLamp,
        IfcLightFixture,
        IfcLiquidTerminal,
        IfcMedicalDevice,
        IfcMobileTelecommunicationsAppliance,
        IfcMotorConnection,
        IfcOutlet,
        IfcPipeFitting,
        IfcPipeSegment,
        IfcProtectiveDevice,
        IfcProtectiveDeviceTrippingUnit,
        IfcPump,
        IfcSanitaryTerminal,
        IfcSensor,
        IfcSignal,
        IfcSolarDevice,
        IfcSpaceHeater,
        IfcStackTerminal,
        IfcSwitchingDevice,
        IfcTank,
        IfcTransformer,
        IfcTubeBundle,
        IfcUnitaryControlElement,
        IfcUnitaryEquipment,
        IfcValve,
        IfcWasteTerminal,
        // Spatial elements
        IfcSite,
        IfcBuilding,
        IfcBuildingStorey,
        IfcSpace,
        IfcSpatialZone,
        IfcExternalSpatialElement,
        IfcFacility,
        IfcFacilityPart,
        IfcFacilityPartCommon,
        IfcBridge,
        IfcBridgePart,
        IfcMarineFacility,
        IfcMarinePart,
        IfcRailway,
        IfcRailwayPart,
        IfcRoad,
        IfcRoadPart,
        // Positioning (IFC4X3)
        IfcAlignment,
        IfcAlignmentCant,
        IfcAlignmentHorizontal,
        IfcAlignmentSegment,
        IfcAlignmentVertical,
        IfcLinearPositioningElement,
        IfcReferent,
        // Geotechnics (IFC4X3)
        IfcBorehole,
        IfcGeomodel,
        IfcGeoslice,
        IfcSolidStratum,
        IfcVoidStratum,
        IfcWaterStratum,
        // Structural analysis items
        IfcStructuralCurveAction,
        IfcStructuralCurveConnection,
        IfcStructuralCurveMember,
        IfcStructuralCurveMemberVarying,
        IfcStructuralCurveReaction,
        IfcStructuralLinearAction,
        IfcStructuralPlanarAction,
        IfcStructuralPointAction,
        IfcStructuralPointConnection,
        IfcStructuralPointReaction,
        IfcStructuralSurfaceAction,
        IfcStructuralSurfaceConnection,
        IfcStructuralSurfaceMember,
        IfcStructuralSurfaceMemberVarying,
        IfcStructuralSurfaceReaction,
        // Other products
        IfcAnnotation,
        IfcGrid,
        IfcProxy,
    ],
    others: [
        IfcProject,
        IfcOwnerHistory,
        IfcUnitAssignment,
        IfcSiUnit,
        IfcConversionBasedUnit,
        IfcMeasureWithUnit,
        IfcGeometricRepresentationContext,
        IfcGeometricRepresentationSubContext,
        // Shapes
        IfcProductDefinitionShape,
        IfcShapeRepresentation,
        // Placement
        IfcLocalPlacement,
        IfcAxis2Placement3D,
        IfcCartesianPoint,
        IfcDirection,
        // Tessellated geometry
        IfcCartesianPointList3D,
        IfcTriangulatedFaceSet,
        IfcTriangulatedIrregularNetwork,
        IfcPolygonalFaceSet,
        IfcIndexedPolygonalFace,
        IfcIndexedPolygonalFaceWithVoids,
        // Parametric geometry (never tessellated here)
        IfcExtrudedAreaSolid,
        IfcRevolvedAreaSolid,
        IfcSweptDiskSolid,
        IfcFacetedBrep,
        IfcAdvancedBrep,
        IfcBooleanResult,
        IfcBooleanClippingResult,
        IfcMappedItem,
        IfcRectangleProfileDef,
        IfcPolyline,
    ],
}

fn upper_name_index() -> &'static FxHashMap<String, IfcType> {
    static INDEX: OnceLock<FxHashMap<String, IfcType>> = OnceLock::new();
    INDEX.get_or_init(|| {
        IfcType::ALL
            .iter()
            .map(|ty| (ty.name().to_ascii_uppercase(), *ty))
            .collect()
    })
}

impl IfcType {
    /// Look up a STEP type name (`IFCWALL`, case-insensitive)
    ///
    /// Names outside the known set map to [`IfcType::Unknown`].
    pub fn from_name(name: &str) -> Self {
        let index = upper_name_index();
        if let Some(ty) = index.get(name) {
            return *ty;
        }
        index
            .get(&name.to_ascii_uppercase())
            .copied()
            .unwrap_or(IfcType::Unknown)
    }
}

impl fmt::Display for IfcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
