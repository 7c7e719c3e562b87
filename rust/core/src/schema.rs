// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! IFC class knowledge needed for tabular extraction.
//!
//! Building-element classes are matched by name rather than through a full
//! generated schema. Unknown classes pass through as raw type names.

use rustc_hash::FxHashMap;
use std::sync::OnceLock;

/// Canonical names of `IfcBuildingElement` subclasses across IFC2X3/IFC4.
pub const BUILDING_ELEMENT_CLASSES: &[&str] = &[
    "IfcBeam",
    "IfcBeamStandardCase",
    "IfcBuildingElementComponent",
    "IfcBuildingElementPart",
    "IfcBuildingElementProxy",
    "IfcChimney",
    "IfcColumn",
    "IfcColumnStandardCase",
    "IfcCovering",
    "IfcCurtainWall",
    "IfcDoor",
    "IfcDoorStandardCase",
    "IfcFooting",
    "IfcMember",
    "IfcMemberStandardCase",
    "IfcPile",
    "IfcPlate",
    "IfcPlateStandardCase",
    "IfcRailing",
    "IfcRamp",
    "IfcRampFlight",
    "IfcReinforcingBar",
    "IfcReinforcingMesh",
    "IfcRoof",
    "IfcShadingDevice",
    "IfcSlab",
    "IfcSlabElementedCase",
    "IfcSlabStandardCase",
    "IfcStair",
    "IfcStairFlight",
    "IfcTendon",
    "IfcTendonAnchor",
    "IfcWall",
    "IfcWallElementedCase",
    "IfcWallStandardCase",
    "IfcWindow",
    "IfcWindowStandardCase",
];

fn class_table() -> &'static FxHashMap<String, &'static str> {
    static TABLE: OnceLock<FxHashMap<String, &'static str>> = OnceLock::new();
    TABLE.get_or_init(|| {
        BUILDING_ELEMENT_CLASSES
            .iter()
            .map(|&name| (name.to_ascii_uppercase(), name))
            .collect()
    })
}

/// Canonical CamelCase class name for a raw type name, if it is a known
/// building-element class. `IFCWALL` -> `IfcWall`.
#[inline]
pub fn canonical_class(type_name: &str) -> Option<&'static str> {
    class_table()
        .get(&type_name.to_ascii_uppercase())
        .copied()
}

/// Whether a raw type name is an `IfcBuildingElement` subclass.
#[inline]
pub fn is_building_element(type_name: &str) -> bool {
    canonical_class(type_name).is_some()
}

/// Detect the schema version declared in the file header.
pub fn detect_schema_version(content: &str) -> &'static str {
    // FILE_SCHEMA sits in the header section, before DATA;
    let header = content.split("DATA;").next().unwrap_or(content);
    if header.contains("IFC4X3") {
        "IFC4X3"
    } else if header.contains("IFC4") {
        "IFC4"
    } else {
        "IFC2X3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_class() {
        assert_eq!(canonical_class("IFCWALL"), Some("IfcWall"));
        assert_eq!(canonical_class("ifcwallstandardcase"), Some("IfcWallStandardCase"));
        assert_eq!(canonical_class("IFCFLOWSEGMENT"), None);
    }

    #[test]
    fn test_is_building_element() {
        assert!(is_building_element("IFCSLAB"));
        assert!(is_building_element("IfcCurtainWall"));
        assert!(!is_building_element("IFCPROPERTYSET"));
        assert!(!is_building_element("IFCSPACE"));
    }

    #[test]
    fn test_detect_schema_version() {
        let header = "ISO-10303-21;\nHEADER;\nFILE_SCHEMA(('IFC4'));\nENDSEC;\nDATA;\n";
        assert_eq!(detect_schema_version(header), "IFC4");

        let header = "FILE_SCHEMA(('IFC4X3_ADD2'));\nDATA;\n#1=IFC4 nonsense;";
        assert_eq!(detect_schema_version(header), "IFC4X3");

        let header = "FILE_SCHEMA(('IFC2X3'));\nDATA;\n";
        assert_eq!(detect_schema_version(header), "IFC2X3");
    }
}
