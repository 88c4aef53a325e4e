use duckling_testkit::{ChunkBuilder, Literal, fixtures};
use duckling_types::LogicalType;
use duckling_vector::{RawChunk, Value, Vector, VectorFactory};

fn random_column(rng: &mut fastrand::Rng, len: usize) -> Vec<Option<i64>> {
    (0..len)
        .map(|_| {
            if rng.u8(..) < 40 {
                None
            } else {
                Some(rng.i64(..))
            }
        })
        .collect()
}

fn check_matches(vector: &Vector, expected: &[Option<i64>]) {
    assert_eq!(vector.len(), expected.len());
    for (i, expected) in expected.iter().enumerate() {
        assert_eq!(vector.get_item(i).unwrap().as_i64(), *expected, "row {i}");
        assert_eq!(vector.is_valid(i), expected.is_some(), "row {i}");
    }
}

#[test]
fn test_slice_composition() {
    let mut rng = fastrand::Rng::with_seed(2985745485);
    let expected = random_column(&mut rng, 1000);
    let chunk = ChunkBuilder::new()
        .column(
            LogicalType::BigInt,
            expected
                .iter()
                .map(|v| v.map_or(Literal::Null, Literal::BigInt))
                .collect(),
        )
        .unwrap()
        .build();
    let vector = VectorFactory::new(&chunk)
        .create_from_engine_type(chunk.column(0).unwrap(), expected.len())
        .unwrap();
    check_matches(&vector, &expected);

    for _ in 0..200 {
        let a = rng.usize(0..=expected.len());
        let a_len = rng.usize(0..=expected.len() - a);
        let b = rng.usize(0..=a_len);
        let b_len = rng.usize(0..=a_len - b);

        let composed = vector.slice(a, a_len).slice(b, b_len);
        let direct = vector.slice(a + b, b_len);
        check_matches(&composed, &expected[a + b..a + b + b_len]);
        check_matches(&direct, &expected[a + b..a + b + b_len]);
    }
}

#[test]
fn test_list_slice_composition() {
    let mut rng = fastrand::Rng::with_seed(42);
    let rows = (0..300)
        .map(|_| {
            if rng.u8(..) < 30 {
                None
            } else {
                let len = rng.usize(0..6);
                Some(random_column(&mut rng, len))
            }
        })
        .collect::<Vec<_>>();
    let literal = |row: &Option<Vec<Option<i64>>>| match row {
        None => Literal::Null,
        Some(items) => Literal::List(
            items
                .iter()
                .map(|v| v.map_or(Literal::Null, Literal::BigInt))
                .collect(),
        ),
    };
    let chunk = ChunkBuilder::new()
        .column(
            LogicalType::list(LogicalType::BigInt),
            rows.iter().map(literal).collect(),
        )
        .unwrap()
        .build();
    let vector = VectorFactory::new(&chunk)
        .create_from_engine_type(chunk.column(0).unwrap(), rows.len())
        .unwrap();

    for _ in 0..100 {
        let offset = rng.usize(0..rows.len());
        let len = rng.usize(0..=rows.len() - offset);
        let inner = rng.usize(0..=len);
        let slice = vector.slice(offset, len).slice(inner, len - inner);
        for (i, row) in rows[offset + inner..offset + len].iter().enumerate() {
            let value = slice.get_item(i).unwrap();
            match row {
                None => assert!(value.is_null()),
                Some(items) => check_matches(value.as_vector().unwrap(), items),
            }
        }
    }
}

#[test]
#[should_panic(expected = "out of bounds")]
fn test_slice_past_end_panics() {
    let chunk = ChunkBuilder::new()
        .column(LogicalType::Integer, vec![Literal::Integer(1); 4])
        .unwrap()
        .build();
    let vector = VectorFactory::new(&chunk)
        .create_from_engine_type(chunk.column(0).unwrap(), 4)
        .unwrap();
    let _ = vector.slice(3, 2);
}

fn check_slices_match_rows(vector: &Vector) {
    let rows = vector
        .values()
        .map(|v| v.unwrap().to_json().unwrap())
        .collect::<Vec<_>>();
    for a in 0..=rows.len() {
        for b in 0..=rows.len() - a {
            let slice = vector.slice(a, b);
            assert_eq!(slice.len(), b);
            for j in 0..b {
                assert_eq!(
                    slice.get_item(j).unwrap().to_json().unwrap(),
                    rows[a + j],
                    "slice({a}, {b}) row {j}"
                );
                assert_eq!(slice.is_valid(j), vector.is_valid(a + j));
            }
        }
    }
}

#[test]
fn test_union_slices() {
    let chunk = fixtures::name_or_age().unwrap();
    let vector = VectorFactory::new(&chunk)
        .create_from_engine_type(chunk.column(0).unwrap(), chunk.row_count())
        .unwrap();
    check_slices_match_rows(&vector);

    let nested = vector.slice(1, 2).slice(1, 1);
    assert!(nested.get_item(0).unwrap().is_null());
}

#[test]
fn test_map_slices() {
    let ty = LogicalType::map(LogicalType::Varchar, LogicalType::Integer);
    let pair = |k: &str, v| (Literal::varchar(k), Literal::Integer(v));
    let chunk = ChunkBuilder::new()
        .column(
            ty,
            vec![
                Literal::Map(vec![pair("a", 1)]),
                Literal::Null,
                Literal::Map(vec![pair("b", 2), pair("a key that lives on the heap", 3)]),
                Literal::Map(vec![]),
            ],
        )
        .unwrap()
        .build();
    let vector = VectorFactory::new(&chunk)
        .create_from_engine_type(chunk.column(0).unwrap(), 4)
        .unwrap();
    check_slices_match_rows(&vector);

    let Value::Map(pairs) = vector.slice(1, 2).slice(1, 1).get_item(0).unwrap() else {
        panic!("expected a map");
    };
    assert_eq!(pairs[1].key.as_str(), Some("a key that lives on the heap"));
    assert_eq!(pairs[1].value.as_i64(), Some(3));
}
