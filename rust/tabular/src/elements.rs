// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Building-element extraction: identity attributes plus attached
//! property and quantity sets, resolved through relationship entities.

use ifc_sheet_core::{
    build_entity_index, canonical_class, is_building_element, DecodedEntity, EntityDecoder,
    EntityIndex, EntityScanner,
};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use std::sync::Arc;

use crate::table::CellValue;

/// Which entity classes to extract.
#[derive(Debug, Clone, Default)]
pub enum ClassFilter {
    /// Every `IfcBuildingElement` subclass.
    #[default]
    BuildingElements,
    /// A single class, matched case-insensitively by name.
    Class(String),
}

impl ClassFilter {
    fn matches(&self, type_name: &str) -> bool {
        match self {
            ClassFilter::BuildingElements => is_building_element(type_name),
            ClassFilter::Class(name) => type_name.eq_ignore_ascii_case(name),
        }
    }
}

/// Property values of one set: property name -> cell.
pub type SetValues = FxHashMap<String, CellValue>;

/// One extracted building element.
#[derive(Debug, Clone)]
pub struct ElementRecord {
    /// STEP entity id.
    pub entity_id: u32,
    /// GlobalId attribute.
    pub global_id: Option<String>,
    /// Class name for display (e.g. "IfcWall").
    pub class_name: String,
    /// Name attribute.
    pub name: Option<String>,
    /// Name of the element's type object, if typed.
    pub type_name: Option<String>,
    /// Property sets: set name -> (property name -> value).
    pub property_sets: FxHashMap<String, SetValues>,
    /// Quantity sets: set name -> (quantity name -> value).
    pub quantity_sets: FxHashMap<String, SetValues>,
}

struct EntityJob {
    id: u32,
    type_name: String,
    start: usize,
    end: usize,
}

/// Extract all elements matching the filter, with their property and
/// quantity sets. Elements that fail to decode are skipped.
pub fn extract_elements(content: &str, filter: &ClassFilter) -> Vec<ElementRecord> {
    let extract_start = std::time::Instant::now();

    let entity_index = Arc::new(build_entity_index(content));

    // One scan over the file
    let mut scanner = EntityScanner::new(content);
    let mut jobs: Vec<EntityJob> = Vec::new();
    while let Some((id, type_name, start, end)) = scanner.next_entity() {
        jobs.push(EntityJob {
            id,
            type_name: type_name.to_string(),
            start,
            end,
        });
    }

    let (sets_by_element, type_by_element) = collect_relationships(&jobs, content, &entity_index);

    let element_jobs: Vec<&EntityJob> = jobs
        .iter()
        .filter(|job| filter.matches(&job.type_name))
        .collect();

    tracing::debug!(
        entities = jobs.len(),
        elements = element_jobs.len(),
        "Scanned entities"
    );

    let records: Vec<ElementRecord> = element_jobs
        .par_iter()
        .filter_map(|job| {
            let mut decoder = EntityDecoder::with_arc_index(content, entity_index.clone());
            extract_one(job, &mut decoder, &sets_by_element, &type_by_element)
        })
        .collect();

    tracing::info!(
        elements = records.len(),
        extract_time_ms = extract_start.elapsed().as_millis() as u64,
        "Element extraction complete"
    );

    records
}

/// Resolve relationship entities into lookup maps:
/// element id -> attached set ids, and element id -> type-object id.
fn collect_relationships(
    jobs: &[EntityJob],
    content: &str,
    entity_index: &Arc<EntityIndex>,
) -> (FxHashMap<u32, Vec<u32>>, FxHashMap<u32, u32>) {
    let mut decoder = EntityDecoder::with_arc_index(content, entity_index.clone());

    let mut sets_by_element: FxHashMap<u32, Vec<u32>> = FxHashMap::default();
    let mut type_by_element: FxHashMap<u32, u32> = FxHashMap::default();

    for job in jobs {
        // IfcRelDefinesByProperties: [4]=RelatedObjects, [5]=RelatingPropertyDefinition
        if job.type_name.eq_ignore_ascii_case("IFCRELDEFINESBYPROPERTIES") {
            let Ok(rel) = decoder.decode_at(job.start, job.end) else {
                continue;
            };
            let Some(set_id) = rel.get_ref(5) else {
                continue;
            };
            if let Some(related) = rel.get_list(4) {
                for item in related {
                    if let Some(element_id) = item.as_entity_ref() {
                        sets_by_element.entry(element_id).or_default().push(set_id);
                    }
                }
            }
        // IfcRelDefinesByType: [4]=RelatedObjects, [5]=RelatingType
        } else if job.type_name.eq_ignore_ascii_case("IFCRELDEFINESBYTYPE") {
            let Ok(rel) = decoder.decode_at(job.start, job.end) else {
                continue;
            };
            let Some(type_id) = rel.get_ref(5) else {
                continue;
            };
            if let Some(related) = rel.get_list(4) {
                for item in related {
                    if let Some(element_id) = item.as_entity_ref() {
                        type_by_element.insert(element_id, type_id);
                    }
                }
            }
        }
    }

    (sets_by_element, type_by_element)
}

/// Decode one element and everything attached to it.
fn extract_one(
    job: &EntityJob,
    decoder: &mut EntityDecoder,
    sets_by_element: &FxHashMap<u32, Vec<u32>>,
    type_by_element: &FxHashMap<u32, u32>,
) -> Option<ElementRecord> {
    let entity = decoder.decode_at(job.start, job.end).ok()?;

    // Rooted objects: [0]=GlobalId, [2]=Name
    let global_id = entity.get_string(0).map(|s| s.to_string());
    let name = entity.get_string(2).map(|s| s.to_string());
    let class_name = canonical_class(&job.type_name)
        .map(|s| s.to_string())
        .unwrap_or_else(|| job.type_name.clone());

    let mut record = ElementRecord {
        entity_id: job.id,
        global_id,
        class_name,
        name,
        type_name: None,
        property_sets: FxHashMap::default(),
        quantity_sets: FxHashMap::default(),
    };

    // Type object first, so occurrence sets can override sets of the same
    // name defined on the type.
    if let Some(&type_id) = type_by_element.get(&job.id) {
        if let Ok(type_entity) = decoder.decode_by_id(type_id) {
            record.type_name = type_entity.get_string(2).map(|s| s.to_string());

            // IfcTypeObject: [5]=HasPropertySets
            if let Some(set_refs) = type_entity.get_list(5) {
                for set_ref in set_refs {
                    if let Some(set_id) = set_ref.as_entity_ref() {
                        attach_set(&mut record, set_id, decoder);
                    }
                }
            }
        }
    }

    if let Some(set_ids) = sets_by_element.get(&job.id) {
        for &set_id in set_ids {
            attach_set(&mut record, set_id, decoder);
        }
    }

    Some(record)
}

/// Decode a property or quantity set and merge it into the record.
fn attach_set(record: &mut ElementRecord, set_id: u32, decoder: &mut EntityDecoder) {
    let Ok(set_entity) = decoder.decode_by_id(set_id) else {
        return;
    };

    // Sets merge per property: a later (occurrence) value replaces a type
    // value of the same name, other properties of the set survive.
    if set_entity.is_type("IFCPROPERTYSET") {
        if let Some((set_name, values)) = decode_property_set(&set_entity, decoder) {
            record
                .property_sets
                .entry(set_name)
                .or_default()
                .extend(values);
        }
    } else if set_entity.is_type("IFCELEMENTQUANTITY") {
        if let Some((set_name, values)) = decode_quantity_set(&set_entity, decoder) {
            record
                .quantity_sets
                .entry(set_name)
                .or_default()
                .extend(values);
        }
    }
}

/// IfcPropertySet: [2]=Name, [4]=HasProperties.
fn decode_property_set(
    entity: &DecodedEntity,
    decoder: &mut EntityDecoder,
) -> Option<(String, SetValues)> {
    let set_name = entity.get_string(2)?.to_string();
    let has_properties = entity.get_list(4)?;

    let mut values = SetValues::default();

    for prop_ref in has_properties {
        let Some(prop_id) = prop_ref.as_entity_ref() else {
            continue;
        };
        let Ok(prop) = decoder.decode_by_id(prop_id) else {
            continue;
        };

        // IfcPropertySingleValue: [0]=Name, [2]=NominalValue
        // IfcPropertyEnumeratedValue: [0]=Name, [2]=EnumerationValues
        if prop.is_type("IFCPROPERTYSINGLEVALUE") || prop.is_type("IFCPROPERTYENUMERATEDVALUE") {
            let Some(prop_name) = prop.get_string(0) else {
                continue;
            };
            let Some(nominal) = prop.get(2) else {
                continue;
            };
            values.insert(prop_name.to_string(), CellValue::from_attribute(nominal));
        }
    }

    if values.is_empty() {
        return None;
    }

    Some((set_name, values))
}

/// IfcElementQuantity: [2]=Name, [5]=Quantities.
fn decode_quantity_set(
    entity: &DecodedEntity,
    decoder: &mut EntityDecoder,
) -> Option<(String, SetValues)> {
    let set_name = entity.get_string(2)?.to_string();
    let quantities = entity.get_list(5)?;

    let mut values = SetValues::default();

    for quant_ref in quantities {
        let Some(quant_id) = quant_ref.as_entity_ref() else {
            continue;
        };
        let Ok(quant) = decoder.decode_by_id(quant_id) else {
            continue;
        };
        if let Some((name, value)) = decode_quantity(&quant) {
            values.insert(name, value);
        }
    }

    if values.is_empty() {
        return None;
    }

    Some((set_name, values))
}

const QUANTITY_TYPES: &[&str] = &[
    "IFCQUANTITYLENGTH",
    "IFCQUANTITYAREA",
    "IFCQUANTITYVOLUME",
    "IFCQUANTITYCOUNT",
    "IFCQUANTITYWEIGHT",
    "IFCQUANTITYTIME",
];

/// IfcPhysicalSimpleQuantity subtypes: [0]=Name, [3]=value.
fn decode_quantity(entity: &DecodedEntity) -> Option<(String, CellValue)> {
    if !QUANTITY_TYPES
        .iter()
        .any(|&t| entity.type_name.eq_ignore_ascii_case(t))
    {
        return None;
    }

    let name = entity.get_string(0)?.to_string();
    let value = entity.get_float(3)?;

    Some((name, CellValue::Real(value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONTENT: &str = "\
#1=IFCPROJECT('gp',$,'P',$,$,$,$,$,$);\n\
#10=IFCWALL('gw1',$,'Wall-A',$,$,$,$,'T1');\n\
#11=IFCDOOR('gd1',$,'Door-A',$,$,$,$,'T2',$,$);\n\
#20=IFCWALLTYPE('gt1',$,'W200',$,$,(#33),$,$,$,.STANDARD.);\n\
#21=IFCRELDEFINESBYTYPE('gr1',$,$,$,(#10),#20);\n\
#30=IFCPROPERTYSET('gps',$,'Pset_WallCommon',$,(#31,#32));\n\
#31=IFCPROPERTYSINGLEVALUE('LoadBearing',$,IFCBOOLEAN(.T.),$);\n\
#32=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('F60'),$);\n\
#33=IFCPROPERTYSET('gps2',$,'Pset_WallCommon',$,(#34,#35));\n\
#34=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('F30'),$);\n\
#35=IFCPROPERTYSINGLEVALUE('Reference',$,IFCIDENTIFIER('W200'),$);\n\
#40=IFCRELDEFINESBYPROPERTIES('grp',$,$,$,(#10),#30);\n\
#50=IFCELEMENTQUANTITY('gq',$,'Qto_WallBaseQuantities',$,$,(#51));\n\
#51=IFCQUANTITYVOLUME('NetVolume',$,$,2.5);\n\
#52=IFCRELDEFINESBYPROPERTIES('grq',$,$,$,(#10),#50);\n";

    #[test]
    fn test_extract_building_elements() {
        let records = extract_elements(CONTENT, &ClassFilter::BuildingElements);
        assert_eq!(records.len(), 2);

        let wall = records.iter().find(|r| r.entity_id == 10).unwrap();
        assert_eq!(wall.class_name, "IfcWall");
        assert_eq!(wall.global_id.as_deref(), Some("gw1"));
        assert_eq!(wall.name.as_deref(), Some("Wall-A"));
        assert_eq!(wall.type_name.as_deref(), Some("W200"));
    }

    #[test]
    fn test_occurrence_overrides_type_pset() {
        let records = extract_elements(CONTENT, &ClassFilter::Class("IfcWall".into()));
        assert_eq!(records.len(), 1);
        let wall = &records[0];

        let pset = &wall.property_sets["Pset_WallCommon"];
        // Occurrence value wins, type-only properties survive
        assert_eq!(pset["FireRating"], CellValue::Text("F60".into()));
        assert_eq!(pset["LoadBearing"], CellValue::Bool(true));
        assert_eq!(pset["Reference"], CellValue::Text("W200".into()));
    }

    #[test]
    fn test_quantities() {
        let records = extract_elements(CONTENT, &ClassFilter::Class("IfcWall".into()));
        let wall = &records[0];
        let qset = &wall.quantity_sets["Qto_WallBaseQuantities"];
        assert_eq!(qset["NetVolume"], CellValue::Real(2.5));
    }

    #[test]
    fn test_class_filter() {
        let records = extract_elements(CONTENT, &ClassFilter::Class("IfcDoor".into()));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].class_name, "IfcDoor");
        assert!(records[0].property_sets.is_empty());
    }
}
