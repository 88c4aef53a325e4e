//! The closed set of vector decoders.

use duckling_common::{Result, error::Error, verify_arg};
use duckling_types::LogicalType;

use crate::{
    array_vector::ArrayVector,
    decimal_vector::DecimalVector,
    enum_vector::EnumVector,
    list_vector::ListVector,
    map_vector::MapVector,
    primitive_vector::PrimitiveVector,
    scalar::{
        Date, Interval, Time, TimeTz, Timestamp, TimestampMillis, TimestampNanos,
        TimestampSeconds, TimestampTz, Uuid,
    },
    string_vector::{BitVector, BlobVector, VarCharVector},
    struct_vector::StructVector,
    union_vector::UnionVector,
    value::Value,
};

/// A decoded column, or a nested child of one.
///
/// There is exactly one variant per logical type tag. All variants are
/// cheap to clone and to slice: they hold borrowed windows over the chunk's
/// buffers and reference-counted child vectors.
#[derive(Debug, Clone)]
pub enum Vector<'a> {
    Boolean(PrimitiveVector<'a, bool>),
    TinyInt(PrimitiveVector<'a, i8>),
    SmallInt(PrimitiveVector<'a, i16>),
    Integer(PrimitiveVector<'a, i32>),
    BigInt(PrimitiveVector<'a, i64>),
    UTinyInt(PrimitiveVector<'a, u8>),
    USmallInt(PrimitiveVector<'a, u16>),
    UInteger(PrimitiveVector<'a, u32>),
    UBigInt(PrimitiveVector<'a, u64>),
    Float(PrimitiveVector<'a, f32>),
    Double(PrimitiveVector<'a, f64>),
    Date(PrimitiveVector<'a, Date>),
    Time(PrimitiveVector<'a, Time>),
    TimeTz(PrimitiveVector<'a, TimeTz>),
    Timestamp(PrimitiveVector<'a, Timestamp>),
    TimestampS(PrimitiveVector<'a, TimestampSeconds>),
    TimestampMs(PrimitiveVector<'a, TimestampMillis>),
    TimestampNs(PrimitiveVector<'a, TimestampNanos>),
    TimestampTz(PrimitiveVector<'a, TimestampTz>),
    Interval(PrimitiveVector<'a, Interval>),
    HugeInt(PrimitiveVector<'a, i128>),
    UHugeInt(PrimitiveVector<'a, u128>),
    Uuid(PrimitiveVector<'a, Uuid>),
    Varchar(VarCharVector<'a>),
    Blob(BlobVector<'a>),
    Bit(BitVector<'a>),
    Decimal(DecimalVector<'a>),
    Enum(EnumVector<'a>),
    List(ListVector<'a>),
    Struct(StructVector<'a>),
    Map(MapVector<'a>),
    Array(ArrayVector<'a>),
    Union(UnionVector<'a>),
}

/// Evaluates `$body` with `$v` bound to the decoder of any variant.
macro_rules! dispatch {
    ($vector:expr, $v:ident => $body:expr) => {
        match $vector {
            Vector::Boolean($v) => $body,
            Vector::TinyInt($v) => $body,
            Vector::SmallInt($v) => $body,
            Vector::Integer($v) => $body,
            Vector::BigInt($v) => $body,
            Vector::UTinyInt($v) => $body,
            Vector::USmallInt($v) => $body,
            Vector::UInteger($v) => $body,
            Vector::UBigInt($v) => $body,
            Vector::Float($v) => $body,
            Vector::Double($v) => $body,
            Vector::Date($v) => $body,
            Vector::Time($v) => $body,
            Vector::TimeTz($v) => $body,
            Vector::Timestamp($v) => $body,
            Vector::TimestampS($v) => $body,
            Vector::TimestampMs($v) => $body,
            Vector::TimestampNs($v) => $body,
            Vector::TimestampTz($v) => $body,
            Vector::Interval($v) => $body,
            Vector::HugeInt($v) => $body,
            Vector::UHugeInt($v) => $body,
            Vector::Uuid($v) => $body,
            Vector::Varchar($v) => $body,
            Vector::Blob($v) => $body,
            Vector::Bit($v) => $body,
            Vector::Decimal($v) => $body,
            Vector::Enum($v) => $body,
            Vector::List($v) => $body,
            Vector::Struct($v) => $body,
            Vector::Map($v) => $body,
            Vector::Array($v) => $body,
            Vector::Union($v) => $body,
        }
    };
}

/// Like `dispatch!`, wrapping the result back into the same variant.
macro_rules! rewrap {
    ($vector:expr, $v:ident => $body:expr) => {
        match $vector {
            Vector::Boolean($v) => Vector::Boolean($body),
            Vector::TinyInt($v) => Vector::TinyInt($body),
            Vector::SmallInt($v) => Vector::SmallInt($body),
            Vector::Integer($v) => Vector::Integer($body),
            Vector::BigInt($v) => Vector::BigInt($body),
            Vector::UTinyInt($v) => Vector::UTinyInt($body),
            Vector::USmallInt($v) => Vector::USmallInt($body),
            Vector::UInteger($v) => Vector::UInteger($body),
            Vector::UBigInt($v) => Vector::UBigInt($body),
            Vector::Float($v) => Vector::Float($body),
            Vector::Double($v) => Vector::Double($body),
            Vector::Date($v) => Vector::Date($body),
            Vector::Time($v) => Vector::Time($body),
            Vector::TimeTz($v) => Vector::TimeTz($body),
            Vector::Timestamp($v) => Vector::Timestamp($body),
            Vector::TimestampS($v) => Vector::TimestampS($body),
            Vector::TimestampMs($v) => Vector::TimestampMs($body),
            Vector::TimestampNs($v) => Vector::TimestampNs($body),
            Vector::TimestampTz($v) => Vector::TimestampTz($body),
            Vector::Interval($v) => Vector::Interval($body),
            Vector::HugeInt($v) => Vector::HugeInt($body),
            Vector::UHugeInt($v) => Vector::UHugeInt($body),
            Vector::Uuid($v) => Vector::Uuid($body),
            Vector::Varchar($v) => Vector::Varchar($body),
            Vector::Blob($v) => Vector::Blob($body),
            Vector::Bit($v) => Vector::Bit($body),
            Vector::Decimal($v) => Vector::Decimal($body),
            Vector::Enum($v) => Vector::Enum($body),
            Vector::List($v) => Vector::List($body),
            Vector::Struct($v) => Vector::Struct($body),
            Vector::Map($v) => Vector::Map($body),
            Vector::Array($v) => Vector::Array($body),
            Vector::Union($v) => Vector::Union($body),
        }
    };
}

impl<'a> Vector<'a> {
    /// Number of rows.
    pub fn len(&self) -> usize {
        dispatch!(self, v => v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if row `index` holds a value, i.e. if
    /// [`get_item`](Self::get_item) does not return [`Value::Null`] for it.
    ///
    /// # Panics
    ///
    /// May panic if `index` is out of bounds.
    pub fn is_valid(&self, index: usize) -> bool {
        dispatch!(self, v => v.is_valid(index))
    }

    /// Returns the logical type decoded by this vector.
    pub fn logical_type(&self) -> LogicalType {
        match self {
            Vector::Boolean(_) => LogicalType::Boolean,
            Vector::TinyInt(_) => LogicalType::TinyInt,
            Vector::SmallInt(_) => LogicalType::SmallInt,
            Vector::Integer(_) => LogicalType::Integer,
            Vector::BigInt(_) => LogicalType::BigInt,
            Vector::UTinyInt(_) => LogicalType::UTinyInt,
            Vector::USmallInt(_) => LogicalType::USmallInt,
            Vector::UInteger(_) => LogicalType::UInteger,
            Vector::UBigInt(_) => LogicalType::UBigInt,
            Vector::Float(_) => LogicalType::Float,
            Vector::Double(_) => LogicalType::Double,
            Vector::Date(_) => LogicalType::Date,
            Vector::Time(_) => LogicalType::Time,
            Vector::TimeTz(_) => LogicalType::TimeTz,
            Vector::Timestamp(_) => LogicalType::Timestamp,
            Vector::TimestampS(_) => LogicalType::TimestampS,
            Vector::TimestampMs(_) => LogicalType::TimestampMs,
            Vector::TimestampNs(_) => LogicalType::TimestampNs,
            Vector::TimestampTz(_) => LogicalType::TimestampTz,
            Vector::Interval(_) => LogicalType::Interval,
            Vector::HugeInt(_) => LogicalType::HugeInt,
            Vector::UHugeInt(_) => LogicalType::UHugeInt,
            Vector::Uuid(_) => LogicalType::Uuid,
            Vector::Varchar(_) => LogicalType::Varchar,
            Vector::Blob(_) => LogicalType::Blob,
            Vector::Bit(_) => LogicalType::Bit,
            Vector::Decimal(v) => LogicalType::Decimal(v.decimal_type()),
            Vector::Enum(v) => LogicalType::Enum(v.enum_type().clone()),
            Vector::List(v) => LogicalType::List(v.list_type().clone()),
            Vector::Struct(v) => LogicalType::Struct(v.struct_type().clone()),
            Vector::Map(v) => LogicalType::Map(v.map_type().clone()),
            Vector::Array(v) => LogicalType::Array(v.array_type().clone()),
            Vector::Union(v) => LogicalType::Union(v.union_type().clone()),
        }
    }

    /// Reads row `index` as a dynamically typed value.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of bounds, or if the row holds
    /// data the engine should never produce (an out-of-range `ENUM` index
    /// or `UNION` tag, a null `MAP` entry, invalid UTF-8).
    pub fn get_item(&self, index: usize) -> Result<Value<'a>> {
        verify_arg!(index, index < self.len());
        dispatch!(self, v => v.get_item(index))
    }

    /// Iterates over all rows as dynamically typed values.
    pub fn values(&self) -> impl Iterator<Item = Result<Value<'a>>> + '_ {
        (0..self.len()).map(|i| self.get_item(i))
    }

    /// Returns a view of rows `[offset, offset + len)` of this vector.
    ///
    /// Slicing is O(1) in the row count and never copies the chunk's
    /// buffers.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the length of this vector.
    pub fn slice(&self, offset: usize, len: usize) -> Vector<'a> {
        assert!(
            offset.checked_add(len).is_some_and(|end| end <= self.len()),
            "slice [{offset}, {offset} + {len}) out of bounds for vector of length {}",
            self.len()
        );
        rewrap!(self, v => v.slice(offset, len))
    }

    /// Converts into the concrete decoder `V`.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if this vector is of a different class.
    pub fn downcast<V: FromVector<'a>>(self) -> Result<V> {
        V::from_vector(self)
            .map_err(|other| Error::type_mismatch(V::CLASS, other.logical_type().to_string()))
    }

    /// Borrows the concrete decoder `V`.
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` if this vector is of a different class.
    pub fn downcast_ref<V: FromVector<'a>>(&self) -> Result<&V> {
        V::from_vector_ref(self)
            .ok_or_else(|| Error::type_mismatch(V::CLASS, self.logical_type().to_string()))
    }
}

/// A concrete decoder that can be extracted from a [`Vector`].
pub trait FromVector<'a>: Sized {
    /// Name of the decoder class, reported in `TypeMismatch` errors.
    const CLASS: &'static str;

    /// Unwraps the decoder, handing the vector back if it is of another class.
    fn from_vector(vector: Vector<'a>) -> std::result::Result<Self, Vector<'a>>;

    fn from_vector_ref<'v>(vector: &'v Vector<'a>) -> Option<&'v Self>;
}

macro_rules! impl_from_vector_primitive {
    ($($variant:ident => $t:ty, $class:literal);* $(;)?) => {
        $(
            impl<'a> FromVector<'a> for PrimitiveVector<'a, $t> {
                const CLASS: &'static str = $class;

                fn from_vector(vector: Vector<'a>) -> std::result::Result<Self, Vector<'a>> {
                    match vector {
                        Vector::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }

                fn from_vector_ref<'v>(vector: &'v Vector<'a>) -> Option<&'v Self> {
                    match vector {
                        Vector::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

macro_rules! impl_from_vector {
    ($($variant:ident => $t:ident, $class:literal);* $(;)?) => {
        $(
            impl<'a> FromVector<'a> for $t<'a> {
                const CLASS: &'static str = $class;

                fn from_vector(vector: Vector<'a>) -> std::result::Result<Self, Vector<'a>> {
                    match vector {
                        Vector::$variant(v) => Ok(v),
                        other => Err(other),
                    }
                }

                fn from_vector_ref<'v>(vector: &'v Vector<'a>) -> Option<&'v Self> {
                    match vector {
                        Vector::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_from_vector_primitive!(
    Boolean => bool, "BOOLEAN";
    TinyInt => i8, "TINYINT";
    SmallInt => i16, "SMALLINT";
    Integer => i32, "INTEGER";
    BigInt => i64, "BIGINT";
    UTinyInt => u8, "UTINYINT";
    USmallInt => u16, "USMALLINT";
    UInteger => u32, "UINTEGER";
    UBigInt => u64, "UBIGINT";
    Float => f32, "FLOAT";
    Double => f64, "DOUBLE";
    Date => Date, "DATE";
    Time => Time, "TIME";
    TimeTz => TimeTz, "TIME WITH TIME ZONE";
    Timestamp => Timestamp, "TIMESTAMP";
    TimestampS => TimestampSeconds, "TIMESTAMP_S";
    TimestampMs => TimestampMillis, "TIMESTAMP_MS";
    TimestampNs => TimestampNanos, "TIMESTAMP_NS";
    TimestampTz => TimestampTz, "TIMESTAMP WITH TIME ZONE";
    Interval => Interval, "INTERVAL";
    HugeInt => i128, "HUGEINT";
    UHugeInt => u128, "UHUGEINT";
    Uuid => Uuid, "UUID";
);

impl_from_vector!(
    Varchar => VarCharVector, "VARCHAR";
    Blob => BlobVector, "BLOB";
    Bit => BitVector, "BIT";
    Decimal => DecimalVector, "DECIMAL";
    Enum => EnumVector, "ENUM";
    List => ListVector, "LIST";
    Struct => StructVector, "STRUCT";
    Map => MapVector, "MAP";
    Array => ArrayVector, "ARRAY";
    Union => UnionVector, "UNION";
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validity::Validity;

    fn int_vector(data: &[u8], len: usize) -> Vector<'_> {
        Vector::Integer(PrimitiveVector::new(data, Validity::all_valid(len)))
    }

    #[test]
    fn test_downcast() {
        let data: Vec<u8> = bytemuck::cast_slice(&[1i32, 2, 3]).to_vec();
        let vector = int_vector(&data, 3);

        let ints = vector.downcast_ref::<PrimitiveVector<i32>>().unwrap();
        assert_eq!(ints.get(2), Some(3));

        let err = vector.downcast_ref::<PrimitiveVector<i64>>().unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: expected BIGINT, found INTEGER");

        let err = vector.clone().downcast::<VarCharVector>().unwrap_err();
        assert_eq!(err.to_string(), "type mismatch: expected VARCHAR, found INTEGER");

        let ints = vector.downcast::<PrimitiveVector<i32>>().unwrap();
        assert_eq!(ints.len(), 3);
    }

    #[test]
    fn test_get_item_bounds() {
        let data: Vec<u8> = bytemuck::cast_slice(&[7i32, 8]).to_vec();
        let vector = int_vector(&data, 2);
        assert!(matches!(vector.get_item(1).unwrap(), Value::Integer(8)));
        assert!(vector.get_item(2).is_err());
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_slice_bounds() {
        let data: Vec<u8> = bytemuck::cast_slice(&[7i32, 8]).to_vec();
        int_vector(&data, 2).slice(1, 2);
    }
}
