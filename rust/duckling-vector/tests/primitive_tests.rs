use duckling_testkit::{ChunkBuilder, Literal, MemoryChunk, fixtures};
use duckling_types::LogicalType;
use duckling_vector::{
    PrimitiveVector, RawChunk, Value, Vector, VectorFactory,
    scalar::{Date, Interval, TimeTz},
};

fn decode_column(chunk: &MemoryChunk, index: usize) -> Vector<'_> {
    let factory = VectorFactory::new(chunk);
    let column = chunk.column(index).unwrap();
    factory
        .create_from_engine_type(column, chunk.row_count())
        .unwrap()
}

fn column_values<'a>(vector: &Vector<'a>) -> Vec<Value<'a>> {
    vector.values().collect::<Result<Vec<_>, _>>().unwrap()
}

#[test]
fn test_all_types_boundaries() {
    let chunk = fixtures::all_types().unwrap();
    let name_index = |name: &str| {
        fixtures::ALL_TYPES_COLUMNS
            .iter()
            .position(|c| *c == name)
            .unwrap()
    };

    let tinyint = decode_column(&chunk, name_index("tinyint"));
    let values = column_values(&tinyint);
    assert!(matches!(values[0], Value::TinyInt(i8::MIN)));
    assert!(matches!(values[1], Value::TinyInt(i8::MAX)));
    assert!(values[2].is_null());

    let bigint = decode_column(&chunk, name_index("bigint"));
    let values = column_values(&bigint);
    assert_eq!(values[0].as_i64(), Some(i64::MIN));
    assert_eq!(values[1].as_i64(), Some(i64::MAX));

    let hugeint = decode_column(&chunk, name_index("hugeint"));
    let values = column_values(&hugeint);
    assert!(matches!(values[0], Value::HugeInt(i128::MIN)));
    assert!(matches!(values[1], Value::HugeInt(i128::MAX)));

    let uhugeint = decode_column(&chunk, name_index("uhugeint"));
    let values = column_values(&uhugeint);
    assert!(matches!(values[0], Value::UHugeInt(0)));
    assert!(matches!(values[1], Value::UHugeInt(u128::MAX)));

    let ubigint = decode_column(&chunk, name_index("ubigint"));
    assert!(matches!(ubigint.get_item(1).unwrap(), Value::UBigInt(u64::MAX)));

    let date = decode_column(&chunk, name_index("date"));
    assert!(matches!(
        date.get_item(0).unwrap(),
        Value::Date(Date { days: -2147483646 })
    ));

    let double = decode_column(&chunk, name_index("double"));
    assert_eq!(double.get_item(0).unwrap().as_f64(), Some(f64::MIN));
    assert_eq!(double.get_item(1).unwrap().as_f64(), Some(f64::MAX));

    let float = decode_column(&chunk, name_index("float"));
    assert_eq!(float.get_item(1).unwrap().as_f64(), Some(f32::MAX as f64));

    let interval = decode_column(&chunk, name_index("interval"));
    match interval.get_item(1).unwrap() {
        Value::Interval(Interval {
            months,
            days,
            micros,
        }) => assert_eq!((months, days, micros), (999, 999, 999_999_999)),
        other => panic!("unexpected value {other:?}"),
    }

    let boolean = decode_column(&chunk, name_index("bool"));
    assert!(matches!(boolean.get_item(0).unwrap(), Value::Boolean(false)));
    assert!(matches!(boolean.get_item(1).unwrap(), Value::Boolean(true)));
}

#[test]
fn test_validity_agrees_with_values() {
    let chunk = fixtures::all_types().unwrap();
    let factory = VectorFactory::new(&chunk);
    for index in 0..chunk.column_count() {
        let column = chunk.column(index).unwrap();
        let vector = factory
            .create_from_engine_type(column, chunk.row_count())
            .unwrap();
        assert_eq!(vector.len(), 3);
        for row in 0..vector.len() {
            let value = vector.get_item(row).unwrap();
            assert_eq!(
                vector.is_valid(row),
                !value.is_null(),
                "column {} row {row}",
                fixtures::ALL_TYPES_COLUMNS[index]
            );
        }
        assert!(!vector.is_valid(2));
    }
}

#[test]
fn test_special_floats() {
    let chunk = ChunkBuilder::new()
        .column(
            LogicalType::Double,
            vec![
                Literal::Double(f64::NAN),
                Literal::Double(f64::INFINITY),
                Literal::Double(f64::NEG_INFINITY),
                Literal::Double(-0.0),
            ],
        )
        .unwrap()
        .column(
            LogicalType::Float,
            vec![
                Literal::Float(f32::NAN),
                Literal::Float(f32::INFINITY),
                Literal::Float(f32::NEG_INFINITY),
                Literal::Float(f32::MIN_POSITIVE),
            ],
        )
        .unwrap()
        .build();

    let doubles = decode_column(&chunk, 0)
        .downcast::<PrimitiveVector<f64>>()
        .unwrap();
    assert!(doubles.get(0).unwrap().is_nan());
    assert_eq!(doubles.get(1), Some(f64::INFINITY));
    assert_eq!(doubles.get(2), Some(f64::NEG_INFINITY));
    assert!(doubles.get(3).unwrap().is_sign_negative());

    let floats = decode_column(&chunk, 1)
        .downcast::<PrimitiveVector<f32>>()
        .unwrap();
    assert!(floats.get(0).unwrap().is_nan());
    assert_eq!(floats.get(1), Some(f32::INFINITY));
    assert_eq!(floats.get(2), Some(f32::NEG_INFINITY));
    assert_eq!(floats.get(3), Some(f32::MIN_POSITIVE));
}

#[test]
fn test_wide_boolean_slots() {
    let chunk = ChunkBuilder::new()
        .with_boolean_width(4)
        .column(
            LogicalType::Boolean,
            vec![Literal::Boolean(true), Literal::Null, Literal::Boolean(false)],
        )
        .unwrap()
        .build();
    let booleans = decode_column(&chunk, 0)
        .downcast::<PrimitiveVector<bool>>()
        .unwrap();
    assert_eq!(booleans.width(), 4);
    assert_eq!(
        booleans.iter().collect::<Vec<_>>(),
        vec![Some(true), None, Some(false)]
    );
}

#[test]
fn test_uuid_boundaries() {
    let chunk = fixtures::all_types().unwrap();
    let index = fixtures::ALL_TYPES_COLUMNS
        .iter()
        .position(|c| *c == "uuid")
        .unwrap();
    let uuids = decode_column(&chunk, index);

    let Value::Uuid(min) = uuids.get_item(0).unwrap() else {
        panic!("expected a UUID");
    };
    assert_eq!(min.raw(), i128::MIN);
    assert_eq!(min.to_string(), "00000000-0000-0000-0000-000000000000");

    let Value::Uuid(max) = uuids.get_item(1).unwrap() else {
        panic!("expected a UUID");
    };
    assert_eq!(max.raw(), i128::MAX);
    assert_eq!(max.to_string(), "ffffffff-ffff-ffff-ffff-ffffffffffff");
    assert!(min < max);
}

#[test]
fn test_time_tz_offsets() {
    let chunk = fixtures::time_tz().unwrap();
    let times = decode_column(&chunk, 0)
        .downcast::<PrimitiveVector<TimeTz>>()
        .unwrap();

    let first = times.get(0).unwrap();
    assert_eq!(first.micros, 0);
    assert_eq!(first.offset_seconds, 57599);
    assert_eq!(first.to_string(), "00:00:00+15:59:59");

    let second = times.get(1).unwrap();
    assert_eq!(second.micros, 86_400_000_000);
    assert_eq!(second.offset_seconds, -57599);
    assert_eq!(second.to_string(), "24:00:00-15:59:59");

    assert_eq!(times.get(2), None);
}

#[test]
fn test_slices_borrow_chunk_buffers() {
    let values = (0..100).map(Literal::Integer).collect::<Vec<_>>();
    let chunk = ChunkBuilder::new()
        .column(LogicalType::Integer, values)
        .unwrap()
        .build();
    let raw = chunk.vector(chunk.column(0).unwrap()).unwrap();

    let vector = decode_column(&chunk, 0);
    let ints = vector.downcast_ref::<PrimitiveVector<i32>>().unwrap();
    assert_eq!(ints.data().as_ptr(), raw.data.as_ptr());

    let slice = vector.slice(10, 20);
    let slice = slice.downcast_ref::<PrimitiveVector<i32>>().unwrap();
    assert_eq!(slice.data().as_ptr(), raw.data[40..].as_ptr());
    assert_eq!(slice.get(0), Some(10));
    assert_eq!(slice.get(19), Some(29));
}
