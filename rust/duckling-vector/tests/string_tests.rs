use duckling_common::error::ErrorKind;
use duckling_testkit::{ChunkBuilder, Literal, fixtures};
use duckling_types::LogicalType;
use duckling_vector::{
    RawChunk, Value, VectorFactory,
    string_vector::{BitVector, BlobVector, VarCharVector},
};

#[test]
fn test_inline_boundary() {
    let twelve = "abcdefghijkl";
    let thirteen = "abcdefghijklm";
    let chunk = ChunkBuilder::new()
        .column(
            LogicalType::Varchar,
            vec![
                Literal::varchar(twelve),
                Literal::varchar(thirteen),
                Literal::varchar(""),
                Literal::Null,
            ],
        )
        .unwrap()
        .build();
    assert_eq!(chunk.heap_len(), 1);

    let factory = VectorFactory::new(&chunk);
    let strings: VarCharVector = factory
        .create_typed(chunk.column(0).unwrap(), 4, &LogicalType::Varchar)
        .unwrap();
    assert!(strings.slots().is_inlined(0));
    assert!(!strings.slots().is_inlined(1));
    assert_eq!(strings.get(0).unwrap(), Some(twelve));
    assert_eq!(strings.get(1).unwrap(), Some(thirteen));
    assert_eq!(strings.get(2).unwrap(), Some(""));
    assert_eq!(strings.get(3).unwrap(), None);
}

#[test]
fn test_multibyte_text() {
    let chunk = fixtures::all_types().unwrap();
    let index = fixtures::ALL_TYPES_COLUMNS
        .iter()
        .position(|c| *c == "varchar")
        .unwrap();
    let factory = VectorFactory::new(&chunk);
    let strings = factory
        .create_from_engine_type(chunk.column(index).unwrap(), 3)
        .unwrap();
    assert_eq!(strings.get_item(0).unwrap().as_str(), Some("🦆🦆🦆🦆🦆🦆"));
    assert_eq!(strings.get_item(1).unwrap().as_str(), Some("goo\0se"));
    assert!(strings.get_item(2).unwrap().is_null());
}

#[test]
fn test_blob_bytes() {
    let chunk = fixtures::all_types().unwrap();
    let index = fixtures::ALL_TYPES_COLUMNS
        .iter()
        .position(|c| *c == "blob")
        .unwrap();
    let factory = VectorFactory::new(&chunk);
    let blobs: BlobVector = factory
        .create_typed(chunk.column(index).unwrap(), 3, &LogicalType::Blob)
        .unwrap();
    assert_eq!(
        blobs.get(0),
        Some(&b"thisisalongblob\x00withnullbytes"[..])
    );
    assert_eq!(blobs.get(1), Some(&b"\x00\x00\x00a"[..]));
    assert_eq!(blobs.get(2), None);
}

#[test]
fn test_unresolved_pointer_reads_as_null() {
    let chunk = ChunkBuilder::new()
        .column(
            LogicalType::Blob,
            vec![Literal::Dangling(64), Literal::Blob(b"ok".to_vec())],
        )
        .unwrap()
        .build();
    let factory = VectorFactory::new(&chunk);
    let blobs: BlobVector = factory
        .create_typed(chunk.column(0).unwrap(), 2, &LogicalType::Blob)
        .unwrap();
    assert!(blobs.is_valid(0));
    assert_eq!(blobs.slots().payload_len(0), 64);
    assert_eq!(blobs.get(0), None);
    assert_eq!(blobs.get(1), Some(&b"ok"[..]));
}

#[test]
fn test_invalid_utf8_is_reported() {
    let mut chunk = ChunkBuilder::new()
        .column(LogicalType::Varchar, vec![Literal::varchar("abc")])
        .unwrap()
        .build();
    let id = chunk.column(0).unwrap();
    // Corrupt the inlined payload.
    chunk.vector_mut(id).unwrap().data[5] = 0xff;

    let factory = VectorFactory::new(&chunk);
    let strings = factory.create_from_engine_type(id, 1).unwrap();
    let err = strings.get_item(0).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::InvalidUtf8 { row: 0, .. }));
    assert!(err.is_corruption());
}

#[test]
fn test_bit_strings() {
    let chunk = fixtures::bits().unwrap();
    let factory = VectorFactory::new(&chunk);
    let bits: BitVector = factory
        .create_typed(chunk.column(0).unwrap(), 3, &LogicalType::Bit)
        .unwrap();

    let long = bits.get(0).unwrap().unwrap();
    assert_eq!(long.len(), 31);
    assert_eq!(long.to_string(), "0010001001011100010101011010111");
    assert!(!long.get(0));
    assert!(long.get(2));
    assert!(long.get(30));

    let short = bits.get(1).unwrap().unwrap();
    assert_eq!(short.len(), 5);
    assert_eq!(short.to_string(), "10101");
    assert_eq!(
        short.iter().collect::<Vec<_>>(),
        vec![true, false, true, false, true]
    );
    assert_eq!(short.as_bytes()[0], 3);

    assert!(bits.get(2).unwrap().is_none());
    assert!(matches!(bits.get_item(1).unwrap(), Value::Bit(b) if b.len() == 5));
}

#[test]
fn test_string_slices() {
    let values = (0..40)
        .map(|i| {
            if i % 7 == 3 {
                Literal::Null
            } else {
                Literal::varchar(format!("value number {i:02}"))
            }
        })
        .collect::<Vec<_>>();
    let chunk = ChunkBuilder::new()
        .column(LogicalType::Varchar, values)
        .unwrap()
        .build();
    let factory = VectorFactory::new(&chunk);
    let strings = factory
        .create_from_engine_type(chunk.column(0).unwrap(), 40)
        .unwrap();

    let slice = strings.slice(5, 30).slice(5, 10);
    for i in 0..10 {
        let row = i + 10;
        let expected = (row % 7 != 3).then(|| format!("value number {row:02}"));
        assert_eq!(
            slice.get_item(i).unwrap().as_str().map(str::to_string),
            expected
        );
    }
}
