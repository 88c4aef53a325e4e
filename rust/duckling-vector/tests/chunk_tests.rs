use duckling_testkit::{ChunkBuilder, Literal, fixtures};
use duckling_types::LogicalType;
use duckling_vector::{DataChunkView, DecodeConfig, ReadValueAsJson};
use serde_json::json;

#[test]
fn test_column_labels() {
    let chunk = fixtures::all_types().unwrap();
    let view = DataChunkView::new(&chunk).unwrap();
    assert_eq!(view.column_count(), fixtures::ALL_TYPES_COLUMNS.len());
    assert_eq!(view.row_count(), 3);

    let labels = view.column_labels().unwrap();
    let label = |name: &str| {
        let index = fixtures::ALL_TYPES_COLUMNS
            .iter()
            .position(|c| *c == name)
            .unwrap();
        labels[index].clone()
    };
    assert_eq!(label("int"), "INTEGER");
    assert_eq!(label("time_tz"), "TIME WITH TIME ZONE");
    assert_eq!(label("timestamp_tz"), "TIMESTAMP WITH TIME ZONE");
    assert_eq!(label("dec_4_1"), "DECIMAL(4,1)");
    assert_eq!(label("small_enum"), "ENUM('DUCK_DUCK_ENUM', 'GOOSE')");

    let columns = view.columns().unwrap();
    for (column, ty) in columns.iter().zip(view.column_types().unwrap()) {
        assert_eq!(column.logical_type(), ty);
        assert_eq!(column.len(), 3);
    }
    assert!(view.column(columns.len()).is_err());
    assert!(view.column_type(columns.len()).is_err());
}

#[test]
fn test_chunk_larger_than_vector_size() {
    let chunk = fixtures::all_types().unwrap();
    let config = DecodeConfig {
        vector_size: 2,
        ..Default::default()
    };
    assert!(DataChunkView::with_config(&chunk, config).is_err());
}

#[test]
fn test_list_json() {
    let chunk = fixtures::int_list().unwrap();
    let view = DataChunkView::new(&chunk).unwrap();
    assert_eq!(
        view.to_json().unwrap(),
        json!([[[]], [[42, 999, null, null, -42]], [null]])
    );
    assert_eq!(
        view.read_value_as_json(1).unwrap(),
        json!([[42, 999, null, null, -42]])
    );
}

#[test]
fn test_union_json() {
    let chunk = fixtures::name_or_age().unwrap();
    let view = DataChunkView::new(&chunk).unwrap();
    assert_eq!(
        view.to_json().unwrap(),
        json!([[{"name": "Frank"}], [{"age": 5}], [null]])
    );
}

#[test]
fn test_scalar_json() {
    let chunk = fixtures::all_types().unwrap();
    let view = DataChunkView::new(&chunk).unwrap();
    let column = |name: &str| {
        let index = fixtures::ALL_TYPES_COLUMNS
            .iter()
            .position(|c| *c == name)
            .unwrap();
        view.column(index).unwrap().to_json().unwrap()
    };

    assert_eq!(column("bool"), json!([false, true, null]));
    assert_eq!(column("int"), json!([i32::MIN, i32::MAX, null]));
    assert_eq!(column("ubigint"), json!([0, u64::MAX.to_string(), null]));
    assert_eq!(
        column("hugeint"),
        json!([i128::MIN.to_string(), i128::MAX.to_string(), null])
    );
    assert_eq!(column("dec_4_1"), json!(["-999.9", "999.9", null]));
    assert_eq!(
        column("time_tz"),
        json!(["00:00:00+15:59:59", "24:00:00-15:59:59", null])
    );
    assert_eq!(
        column("uuid"),
        json!([
            "00000000-0000-0000-0000-000000000000",
            "ffffffff-ffff-ffff-ffff-ffffffffffff",
            null
        ])
    );
    assert_eq!(
        column("blob"),
        json!(["thisisalongblob\\x00withnullbytes", "\\x00\\x00\\x00a", null])
    );
    assert_eq!(column("small_enum"), json!(["DUCK_DUCK_ENUM", "GOOSE", null]));
    assert_eq!(
        column("interval"),
        json!([
            {"months": 0, "days": 0, "micros": 0},
            {"months": 999, "days": 999, "micros": 999_999_999},
            null
        ])
    );
}

#[test]
fn test_nested_json() {
    let ty = LogicalType::structure([
        ("id", LogicalType::Integer),
        ("attrs", LogicalType::map(LogicalType::Varchar, LogicalType::Double)),
        ("xy", LogicalType::array(LogicalType::Float, 2)),
        ("bits", LogicalType::Bit),
    ]);
    let chunk = ChunkBuilder::new()
        .column(
            ty,
            vec![
                Literal::Struct(vec![
                    Literal::Integer(7),
                    Literal::Map(vec![(Literal::varchar("w"), Literal::Double(f64::NAN))]),
                    Literal::Array(vec![Literal::Float(0.5), Literal::Null]),
                    Literal::bit("10101"),
                ]),
                Literal::Null,
            ],
        )
        .unwrap()
        .build();
    let view = DataChunkView::new(&chunk).unwrap();
    assert_eq!(
        view.to_json().unwrap(),
        json!([
            [{
                "id": 7,
                "attrs": [{"key": "w", "value": "NaN"}],
                "xy": [0.5, null],
                "bits": "10101",
            }],
            [null],
        ])
    );
}
