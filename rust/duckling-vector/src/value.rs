//! Dynamically typed row values.

use std::sync::Arc;

use crate::{
    scalar::{
        BitString, Date, Decimal, Interval, Time, TimeTz, Timestamp, TimestampMillis,
        TimestampNanos, TimestampSeconds, TimestampTz, Uuid,
    },
    vector::Vector,
};

/// A single decoded value, borrowing variable-length payloads from the
/// chunk it was read from.
///
/// `LIST` and `ARRAY` values are slices of the child vector, so reading a
/// nested value never copies the elements.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Null,
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Integer(i32),
    BigInt(i64),
    UTinyInt(u8),
    USmallInt(u16),
    UInteger(u32),
    UBigInt(u64),
    Float(f32),
    Double(f64),
    Date(Date),
    Time(Time),
    TimeTz(TimeTz),
    Timestamp(Timestamp),
    TimestampS(TimestampSeconds),
    TimestampMs(TimestampMillis),
    TimestampNs(TimestampNanos),
    TimestampTz(TimestampTz),
    Interval(Interval),
    HugeInt(i128),
    UHugeInt(u128),
    Uuid(Uuid),
    Varchar(&'a str),
    Blob(&'a [u8]),
    Bit(BitString<'a>),
    Decimal(Decimal),
    Enum(Arc<str>),
    List(Vector<'a>),
    Struct(Vec<StructItem<'a>>),
    Map(Vec<MapItem<'a>>),
    Array(Vector<'a>),
    Union(UnionItem<'a>),
}

/// A named field value of a struct row.
#[derive(Debug, Clone)]
pub struct StructItem<'a> {
    pub name: Arc<str>,
    pub value: Value<'a>,
}

/// A key/value pair of a map row.
#[derive(Debug, Clone)]
pub struct MapItem<'a> {
    pub key: Value<'a>,
    pub value: Value<'a>,
}

/// The selected alternative of a union row.
#[derive(Debug, Clone)]
pub struct UnionItem<'a> {
    pub tag: Arc<str>,
    pub value: Box<Value<'a>>,
}

impl<'a> Value<'a> {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&'a str> {
        match self {
            Value::Varchar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&'a [u8]> {
        match self {
            Value::Blob(b) => Some(b),
            Value::Varchar(s) => Some(s.as_bytes()),
            _ => None,
        }
    }

    /// Returns the value as an `i64` if it is an integer that fits.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::TinyInt(v) => Some(v.into()),
            Value::SmallInt(v) => Some(v.into()),
            Value::Integer(v) => Some(v.into()),
            Value::BigInt(v) => Some(v),
            Value::UTinyInt(v) => Some(v.into()),
            Value::USmallInt(v) => Some(v.into()),
            Value::UInteger(v) => Some(v.into()),
            Value::UBigInt(v) => i64::try_from(v).ok(),
            Value::HugeInt(v) => i64::try_from(v).ok(),
            Value::UHugeInt(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Float(v) => Some(v.into()),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the elements of a `LIST` or `ARRAY` value.
    pub fn as_vector(&self) -> Option<&Vector<'a>> {
        match self {
            Value::List(v) | Value::Array(v) => Some(v),
            _ => None,
        }
    }
}

macro_rules! impl_from_scalar {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl<'a> From<$t> for Value<'a> {
                #[inline]
                fn from(value: $t) -> Self {
                    Value::$variant(value)
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool => Boolean,
    i8 => TinyInt,
    i16 => SmallInt,
    i32 => Integer,
    i64 => BigInt,
    u8 => UTinyInt,
    u16 => USmallInt,
    u32 => UInteger,
    u64 => UBigInt,
    f32 => Float,
    f64 => Double,
    Date => Date,
    Time => Time,
    TimeTz => TimeTz,
    Timestamp => Timestamp,
    TimestampSeconds => TimestampS,
    TimestampMillis => TimestampMs,
    TimestampNanos => TimestampNs,
    TimestampTz => TimestampTz,
    Interval => Interval,
    i128 => HugeInt,
    u128 => UHugeInt,
    Uuid => Uuid,
    Decimal => Decimal,
);
