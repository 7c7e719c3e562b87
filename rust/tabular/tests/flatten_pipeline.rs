// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end pipeline over a miniature IFC file: extract, flatten,
//! filter, summarize, export.

use ifc_sheet_tabular::{
    build_table, column_diff, count_total, extract_elements, value_counts, write_xlsx, CellValue,
    ClassFilter, IgnoreLists,
};

const MODEL: &str = "\
ISO-10303-21;
HEADER;
FILE_DESCRIPTION((''),'2;1');
FILE_NAME('demo.ifc','2024-06-01T00:00:00',(''),(''),'','','');
FILE_SCHEMA(('IFC4'));
ENDSEC;
DATA;
#1=IFCPROJECT('guidP',$,'Demo',$,$,$,$,$,$);
#10=IFCWALL('gw1',$,'Wall-A',$,$,$,$,'T1');
#11=IFCWALL('gw2',$,'Wall-B',$,$,$,$,'T2');
#12=IFCSLAB('gs1',$,'Slab-A',$,$,$,$,'S1',.FLOOR.);
#20=IFCWALLTYPE('gt1',$,'Basic Wall 200',$,$,(#33),$,$,$,.STANDARD.);
#21=IFCRELDEFINESBYTYPE('gr1',$,$,$,(#10,#11),#20);
#30=IFCPROPERTYSET('gp1',$,'Pset_WallCommon',$,(#31,#32));
#31=IFCPROPERTYSINGLEVALUE('LoadBearing',$,IFCBOOLEAN(.T.),$);
#32=IFCPROPERTYSINGLEVALUE('FireRating',$,IFCLABEL('F60'),$);
#33=IFCPROPERTYSET('gp2',$,'Pset_TypeCommon',$,(#34));
#34=IFCPROPERTYSINGLEVALUE('Reference',$,IFCIDENTIFIER('W200'),$);
#40=IFCRELDEFINESBYPROPERTIES('gr2',$,$,$,(#10),#30);
#50=IFCELEMENTQUANTITY('gq1',$,'Qto_WallBaseQuantities',$,$,(#51));
#51=IFCQUANTITYVOLUME('NetVolume',$,$,2.5);
#41=IFCRELDEFINESBYPROPERTIES('gr3',$,$,$,(#10,#11),#50);
ENDSEC;
END-ISO-10303-21;
";

#[test]
fn full_pipeline() {
    let records = extract_elements(MODEL, &ClassFilter::BuildingElements);
    assert_eq!(records.len(), 3);

    let table = build_table(&records);
    assert_eq!(
        table.columns,
        vec![
            "GlobalId",
            "Class",
            "Name",
            "Type",
            "Pset_TypeCommon.Reference",
            "Pset_WallCommon.FireRating",
            "Pset_WallCommon.LoadBearing",
            "Qto_WallBaseQuantities.NetVolume",
        ]
    );
    assert_eq!(table.row_count(), 3);

    // Wall-A carries occurrence psets, a type pset, and a quantity set
    let wall_a = &table.rows[0];
    assert_eq!(wall_a[0], CellValue::Text("gw1".into()));
    assert_eq!(wall_a[1], CellValue::Text("IfcWall".into()));
    assert_eq!(wall_a[3], CellValue::Text("Basic Wall 200".into()));
    assert_eq!(wall_a[4], CellValue::Text("W200".into()));
    assert_eq!(wall_a[5], CellValue::Text("F60".into()));
    assert_eq!(wall_a[6], CellValue::Bool(true));
    assert_eq!(wall_a[7], CellValue::Real(2.5));

    // Wall-B shares the type and the quantity relationship only
    let wall_b = &table.rows[1];
    assert_eq!(wall_b[4], CellValue::Text("W200".into()));
    assert_eq!(wall_b[5], CellValue::Empty);
    assert_eq!(wall_b[7], CellValue::Real(2.5));

    // The slab has no type and no sets
    let slab = &table.rows[2];
    assert_eq!(slab[1], CellValue::Text("IfcSlab".into()));
    assert_eq!(slab[3], CellValue::Empty);
    assert_eq!(slab[7], CellValue::Empty);
}

#[test]
fn counts_and_diff() {
    let records = extract_elements(MODEL, &ClassFilter::BuildingElements);
    let table = build_table(&records);

    let counts = value_counts(&table, "Type").unwrap();
    // The slab's empty Type cell is not counted
    assert_eq!(counts.row_count(), 1);
    assert_eq!(
        counts.rows[0],
        vec![
            CellValue::Text("Basic Wall 200".into()),
            CellValue::Integer(2)
        ]
    );
    assert_eq!(count_total(&counts), 2);

    let diff = column_diff(&table, "Name", "Type").unwrap();
    // Every row differs; the slab because its Type is empty
    assert_eq!(diff.row_count(), 3);
    assert_eq!(diff.columns, vec!["Name", "Type"]);
}

#[test]
fn ignore_lists_reshape_the_table() {
    let records = extract_elements(MODEL, &ClassFilter::BuildingElements);
    let table = build_table(&records);

    let ignore = IgnoreLists {
        columns: vec!["Pset_TypeCommon.Reference".into()],
        row_values: vec!["Slab-A".into()],
    };
    let cleaned = ignore.apply(&table);

    assert_eq!(cleaned.row_count(), 2);
    assert!(cleaned.column_index("Pset_TypeCommon.Reference").is_none());
    assert_eq!(cleaned.column_count(), table.column_count() - 1);
}

#[test]
fn single_class_filter_and_export() {
    let records = extract_elements(MODEL, &ClassFilter::Class("IfcSlab".into()));
    let table = build_table(&records);
    assert_eq!(table.row_count(), 1);

    let bytes = write_xlsx(&table).unwrap();
    assert_eq!(&bytes[..2], b"PK");
}
