//! Ready-made chunks mirroring the engine's own test tables.

use duckling_types::LogicalType;
use duckling_vector::scalar::{
    Date, Interval, Time, TimeTz, Timestamp, TimestampMillis, TimestampNanos, TimestampSeconds,
    TimestampTz,
};

use crate::{
    builder::{ChunkBuilder, Literal},
    memory_chunk::MemoryChunk,
};

/// One `INTEGER[]` column: `[]`, `[42, 999, NULL, NULL, -42]`, `NULL`.
pub fn int_list() -> anyhow::Result<MemoryChunk> {
    Ok(ChunkBuilder::new()
        .column(
            LogicalType::list(LogicalType::Integer),
            vec![
                Literal::List(vec![]),
                Literal::List(vec![
                    Literal::Integer(42),
                    Literal::Integer(999),
                    Literal::Null,
                    Literal::Null,
                    Literal::Integer(-42),
                ]),
                Literal::Null,
            ],
        )?
        .build())
}

/// The union type of [`name_or_age`].
pub fn name_or_age_type() -> LogicalType {
    LogicalType::union([("name", LogicalType::Varchar), ("age", LogicalType::SmallInt)])
}

/// One `UNION(name VARCHAR, age SMALLINT)` column: `'Frank'`, `5`, `NULL`.
pub fn name_or_age() -> anyhow::Result<MemoryChunk> {
    Ok(ChunkBuilder::new()
        .column(
            name_or_age_type(),
            vec![
                Literal::union(0, Literal::varchar("Frank")),
                Literal::union(1, Literal::SmallInt(5)),
                Literal::Null,
            ],
        )?
        .build())
}

/// Widths exercising every decimal storage size, as `(width, scale)`.
pub const DECIMAL_TYPES: [(u8, u8); 4] = [(4, 1), (9, 4), (18, 6), (38, 10)];

/// One column per entry of [`DECIMAL_TYPES`], with rows holding the
/// smallest value, the largest value and `NULL`.
pub fn decimals() -> anyhow::Result<MemoryChunk> {
    let mut builder = ChunkBuilder::new();
    for (width, scale) in DECIMAL_TYPES {
        let max = 10i128.pow(width as u32) - 1;
        builder = builder.column(
            LogicalType::decimal(width, scale),
            vec![Literal::Decimal(-max), Literal::Decimal(max), Literal::Null],
        )?;
    }
    Ok(builder.build())
}

/// One `TIME WITH TIME ZONE` column: `00:00:00+15:59:59`,
/// `24:00:00-15:59:59`, `NULL`.
pub fn time_tz() -> anyhow::Result<MemoryChunk> {
    Ok(ChunkBuilder::new()
        .column(
            LogicalType::TimeTz,
            vec![
                Literal::TimeTz(TimeTz {
                    micros: 0,
                    offset_seconds: TimeTz::MAX_OFFSET,
                }),
                Literal::TimeTz(TimeTz {
                    micros: 24 * 60 * 60 * 1_000_000,
                    offset_seconds: -TimeTz::MAX_OFFSET,
                }),
                Literal::Null,
            ],
        )?
        .build())
}

/// One `BIT` column: a 31-bit string, a 5-bit string, `NULL`.
pub fn bits() -> anyhow::Result<MemoryChunk> {
    Ok(ChunkBuilder::new()
        .column(
            LogicalType::Bit,
            vec![
                Literal::bit("0010001001011100010101011010111"),
                Literal::bit("10101"),
                Literal::Null,
            ],
        )?
        .build())
}

/// Column names of [`all_types`].
pub const ALL_TYPES_COLUMNS: [&str; 27] = [
    "bool",
    "tinyint",
    "smallint",
    "int",
    "bigint",
    "hugeint",
    "uhugeint",
    "utinyint",
    "usmallint",
    "uint",
    "ubigint",
    "date",
    "time",
    "timestamp",
    "timestamp_s",
    "timestamp_ms",
    "timestamp_ns",
    "time_tz",
    "timestamp_tz",
    "float",
    "double",
    "dec_4_1",
    "uuid",
    "interval",
    "varchar",
    "blob",
    "small_enum",
];

/// Three rows per column, holding the smallest value, the largest value
/// and `NULL`, in the order of [`ALL_TYPES_COLUMNS`].
pub fn all_types() -> anyhow::Result<MemoryChunk> {
    let rows = |min: Literal, max: Literal| vec![min, max, Literal::Null];
    let parse_uuid = |s: &str| -> anyhow::Result<Literal> { Ok(Literal::Uuid(uuid::Uuid::parse_str(s)?)) };

    Ok(ChunkBuilder::new()
        .column(
            LogicalType::Boolean,
            rows(Literal::Boolean(false), Literal::Boolean(true)),
        )?
        .column(
            LogicalType::TinyInt,
            rows(Literal::TinyInt(i8::MIN), Literal::TinyInt(i8::MAX)),
        )?
        .column(
            LogicalType::SmallInt,
            rows(Literal::SmallInt(i16::MIN), Literal::SmallInt(i16::MAX)),
        )?
        .column(
            LogicalType::Integer,
            rows(Literal::Integer(i32::MIN), Literal::Integer(i32::MAX)),
        )?
        .column(
            LogicalType::BigInt,
            rows(Literal::BigInt(i64::MIN), Literal::BigInt(i64::MAX)),
        )?
        .column(
            LogicalType::HugeInt,
            rows(Literal::HugeInt(i128::MIN), Literal::HugeInt(i128::MAX)),
        )?
        .column(
            LogicalType::UHugeInt,
            rows(Literal::UHugeInt(0), Literal::UHugeInt(u128::MAX)),
        )?
        .column(
            LogicalType::UTinyInt,
            rows(Literal::UTinyInt(0), Literal::UTinyInt(u8::MAX)),
        )?
        .column(
            LogicalType::USmallInt,
            rows(Literal::USmallInt(0), Literal::USmallInt(u16::MAX)),
        )?
        .column(
            LogicalType::UInteger,
            rows(Literal::UInteger(0), Literal::UInteger(u32::MAX)),
        )?
        .column(
            LogicalType::UBigInt,
            rows(Literal::UBigInt(0), Literal::UBigInt(u64::MAX)),
        )?
        .column(
            LogicalType::Date,
            rows(
                Literal::Date(Date { days: -2147483646 }),
                Literal::Date(Date { days: 2147483646 }),
            ),
        )?
        .column(
            LogicalType::Time,
            rows(
                Literal::Time(Time { micros: 0 }),
                Literal::Time(Time {
                    micros: 86_400_000_000,
                }),
            ),
        )?
        .column(
            LogicalType::Timestamp,
            rows(
                Literal::Timestamp(Timestamp {
                    micros: -9223372022400000000,
                }),
                Literal::Timestamp(Timestamp {
                    micros: 9223372036854775806,
                }),
            ),
        )?
        .column(
            LogicalType::TimestampS,
            rows(
                Literal::TimestampS(TimestampSeconds {
                    seconds: -9223372022400,
                }),
                Literal::TimestampS(TimestampSeconds {
                    seconds: 9223372036854,
                }),
            ),
        )?
        .column(
            LogicalType::TimestampMs,
            rows(
                Literal::TimestampMs(TimestampMillis {
                    millis: -9223372022400000,
                }),
                Literal::TimestampMs(TimestampMillis {
                    millis: 9223372036854775,
                }),
            ),
        )?
        .column(
            LogicalType::TimestampNs,
            rows(
                Literal::TimestampNs(TimestampNanos { nanos: i64::MIN + 1 }),
                Literal::TimestampNs(TimestampNanos {
                    nanos: i64::MAX - 1,
                }),
            ),
        )?
        .column(
            LogicalType::TimeTz,
            rows(
                Literal::TimeTz(TimeTz {
                    micros: 0,
                    offset_seconds: TimeTz::MAX_OFFSET,
                }),
                Literal::TimeTz(TimeTz {
                    micros: 86_400_000_000,
                    offset_seconds: -TimeTz::MAX_OFFSET,
                }),
            ),
        )?
        .column(
            LogicalType::TimestampTz,
            rows(
                Literal::TimestampTz(TimestampTz {
                    micros: -9223372022400000000,
                }),
                Literal::TimestampTz(TimestampTz {
                    micros: 9223372036854775806,
                }),
            ),
        )?
        .column(
            LogicalType::Float,
            rows(Literal::Float(f32::MIN), Literal::Float(f32::MAX)),
        )?
        .column(
            LogicalType::Double,
            rows(Literal::Double(f64::MIN), Literal::Double(f64::MAX)),
        )?
        .column(
            LogicalType::decimal(4, 1),
            rows(Literal::Decimal(-9999), Literal::Decimal(9999)),
        )?
        .column(
            LogicalType::Uuid,
            rows(
                parse_uuid("00000000-0000-0000-0000-000000000000")?,
                parse_uuid("ffffffff-ffff-ffff-ffff-ffffffffffff")?,
            ),
        )?
        .column(
            LogicalType::Interval,
            rows(
                Literal::Interval(Interval {
                    months: 0,
                    days: 0,
                    micros: 0,
                }),
                Literal::Interval(Interval {
                    months: 999,
                    days: 999,
                    micros: 999_999_999,
                }),
            ),
        )?
        .column(
            LogicalType::Varchar,
            rows(
                Literal::varchar("🦆🦆🦆🦆🦆🦆"),
                Literal::varchar("goo\0se"),
            ),
        )?
        .column(
            LogicalType::Blob,
            rows(
                Literal::Blob(b"thisisalongblob\x00withnullbytes".to_vec()),
                Literal::Blob(b"\x00\x00\x00a".to_vec()),
            ),
        )?
        .column(
            LogicalType::enumeration(["DUCK_DUCK_ENUM", "GOOSE"]),
            rows(
                Literal::Enum("DUCK_DUCK_ENUM".into()),
                Literal::Enum("GOOSE".into()),
            ),
        )?
        .build())
}

#[cfg(test)]
mod tests {
    use duckling_vector::RawChunk;

    use super::*;

    #[test]
    fn test_fixture_shapes() {
        let chunk = all_types().unwrap();
        assert_eq!(chunk.column_count(), ALL_TYPES_COLUMNS.len());
        assert_eq!(chunk.row_count(), 3);

        let chunk = int_list().unwrap();
        assert_eq!(chunk.column_count(), 1);
        // list, child
        assert_eq!(chunk.vector_count(), 2);

        let chunk = name_or_age().unwrap();
        // union, tag, name, age
        assert_eq!(chunk.vector_count(), 4);
    }
}
