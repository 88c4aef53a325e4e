//! The logical type tree of a column.

use std::{fmt, sync::Arc};

use duckling_common::{Result, error::Error};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::type_id::TypeId;

/// Declared type of a column, a struct field, a list element or any other
/// node of a nested type.
///
/// Each variant corresponds to one engine type id. Parameterized and nested
/// variants carry their parameters; cloning a `LogicalType` is cheap since
/// the nested parts are reference-counted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalType {
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    UTinyInt,
    USmallInt,
    UInteger,
    UBigInt,
    Float,
    Double,
    Date,
    Time,
    TimeTz,
    Timestamp,
    TimestampS,
    TimestampMs,
    TimestampNs,
    TimestampTz,
    Interval,
    HugeInt,
    UHugeInt,
    Uuid,
    Varchar,
    Blob,
    Bit,
    Decimal(DecimalType),
    Enum(EnumType),
    List(ListType),
    Struct(StructType),
    Map(MapType),
    Array(ArrayType),
    Union(UnionType),
    /// A type the engine reports for which no decoder exists
    /// (`ANY`, `VARINT`, `NULL`, `INVALID`).
    Other(TypeId),
}

impl LogicalType {
    /// Returns the logical type for a type id that takes no parameters.
    ///
    /// Returns `None` for `DECIMAL`, `ENUM` and the nested type ids, which
    /// cannot be described by the id alone.
    pub fn primitive(type_id: TypeId) -> Option<LogicalType> {
        use LogicalType as L;
        let ty = match type_id {
            TypeId::Boolean => L::Boolean,
            TypeId::TinyInt => L::TinyInt,
            TypeId::SmallInt => L::SmallInt,
            TypeId::Integer => L::Integer,
            TypeId::BigInt => L::BigInt,
            TypeId::UTinyInt => L::UTinyInt,
            TypeId::USmallInt => L::USmallInt,
            TypeId::UInteger => L::UInteger,
            TypeId::UBigInt => L::UBigInt,
            TypeId::Float => L::Float,
            TypeId::Double => L::Double,
            TypeId::Date => L::Date,
            TypeId::Time => L::Time,
            TypeId::TimeTz => L::TimeTz,
            TypeId::Timestamp => L::Timestamp,
            TypeId::TimestampS => L::TimestampS,
            TypeId::TimestampMs => L::TimestampMs,
            TypeId::TimestampNs => L::TimestampNs,
            TypeId::TimestampTz => L::TimestampTz,
            TypeId::Interval => L::Interval,
            TypeId::HugeInt => L::HugeInt,
            TypeId::UHugeInt => L::UHugeInt,
            TypeId::Uuid => L::Uuid,
            TypeId::Varchar => L::Varchar,
            TypeId::Blob => L::Blob,
            TypeId::Bit => L::Bit,
            TypeId::Invalid | TypeId::Any | TypeId::VarInt | TypeId::SqlNull => {
                L::Other(type_id)
            }
            TypeId::Decimal
            | TypeId::Enum
            | TypeId::List
            | TypeId::Struct
            | TypeId::Map
            | TypeId::Array
            | TypeId::Union => return None,
        };
        Some(ty)
    }

    pub fn decimal(width: u8, scale: u8) -> LogicalType {
        LogicalType::Decimal(DecimalType { width, scale })
    }

    pub fn enumeration<I, S>(values: I) -> LogicalType
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        LogicalType::Enum(EnumType::new(values))
    }

    pub fn list(element: LogicalType) -> LogicalType {
        LogicalType::List(ListType::new(element))
    }

    pub fn structure<I, S>(entries: I) -> LogicalType
    where
        I: IntoIterator<Item = (S, LogicalType)>,
        S: Into<Arc<str>>,
    {
        LogicalType::Struct(StructType::new(entries))
    }

    pub fn map(key: LogicalType, value: LogicalType) -> LogicalType {
        LogicalType::Map(MapType::new(key, value))
    }

    pub fn array(element: LogicalType, length: usize) -> LogicalType {
        LogicalType::Array(ArrayType::new(element, length))
    }

    pub fn union<I, S>(alternatives: I) -> LogicalType
    where
        I: IntoIterator<Item = (S, LogicalType)>,
        S: Into<Arc<str>>,
    {
        LogicalType::Union(UnionType::new(alternatives))
    }

    /// Returns the engine type id of this type.
    pub fn type_id(&self) -> TypeId {
        use LogicalType as L;
        match self {
            L::Boolean => TypeId::Boolean,
            L::TinyInt => TypeId::TinyInt,
            L::SmallInt => TypeId::SmallInt,
            L::Integer => TypeId::Integer,
            L::BigInt => TypeId::BigInt,
            L::UTinyInt => TypeId::UTinyInt,
            L::USmallInt => TypeId::USmallInt,
            L::UInteger => TypeId::UInteger,
            L::UBigInt => TypeId::UBigInt,
            L::Float => TypeId::Float,
            L::Double => TypeId::Double,
            L::Date => TypeId::Date,
            L::Time => TypeId::Time,
            L::TimeTz => TypeId::TimeTz,
            L::Timestamp => TypeId::Timestamp,
            L::TimestampS => TypeId::TimestampS,
            L::TimestampMs => TypeId::TimestampMs,
            L::TimestampNs => TypeId::TimestampNs,
            L::TimestampTz => TypeId::TimestampTz,
            L::Interval => TypeId::Interval,
            L::HugeInt => TypeId::HugeInt,
            L::UHugeInt => TypeId::UHugeInt,
            L::Uuid => TypeId::Uuid,
            L::Varchar => TypeId::Varchar,
            L::Blob => TypeId::Blob,
            L::Bit => TypeId::Bit,
            L::Decimal(_) => TypeId::Decimal,
            L::Enum(_) => TypeId::Enum,
            L::List(_) => TypeId::List,
            L::Struct(_) => TypeId::Struct,
            L::Map(_) => TypeId::Map,
            L::Array(_) => TypeId::Array,
            L::Union(_) => TypeId::Union,
            L::Other(type_id) => *type_id,
        }
    }

    /// Returns `true` for the types whose values are made of child vectors.
    pub fn is_nested(&self) -> bool {
        matches!(
            self,
            LogicalType::List(_)
                | LogicalType::Struct(_)
                | LogicalType::Map(_)
                | LogicalType::Array(_)
                | LogicalType::Union(_)
        )
    }

    /// Number of levels in this type tree, `1` for a non-nested type.
    pub fn depth(&self) -> usize {
        1 + match self {
            LogicalType::List(list) => list.element().depth(),
            LogicalType::Array(array) => array.element().depth(),
            LogicalType::Map(map) => 1 + map.key().depth().max(map.value().depth()),
            LogicalType::Struct(st) => st
                .entries()
                .iter()
                .map(|e| e.logical_type.depth())
                .max()
                .unwrap_or(0),
            LogicalType::Union(union) => union
                .alternatives()
                .iter()
                .map(|a| a.logical_type.depth())
                .max()
                .unwrap_or(0),
            _ => 0,
        }
    }
}

impl fmt::Display for LogicalType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalType::Decimal(decimal) => write!(f, "DECIMAL({},{})", decimal.width, decimal.scale),
            LogicalType::Enum(enum_type) => write!(
                f,
                "ENUM({})",
                enum_type
                    .values()
                    .iter()
                    .format_with(", ", |v, f| f(&format_args!("'{}'", v.replace('\'', "''"))))
            ),
            LogicalType::List(list) => write!(f, "{}[]", list.element()),
            LogicalType::Array(array) => write!(f, "{}[{}]", array.element(), array.length()),
            LogicalType::Struct(st) => write!(
                f,
                "STRUCT({})",
                st.entries().iter().format_with(", ", |e, f| f(&format_args!(
                    "{} {}",
                    Identifier(&e.name),
                    e.logical_type
                )))
            ),
            LogicalType::Map(map) => write!(f, "MAP({}, {})", map.key(), map.value()),
            LogicalType::Union(union) => write!(
                f,
                "UNION({})",
                union.alternatives().iter().format_with(", ", |a, f| f(&format_args!(
                    "{} {}",
                    Identifier(&a.tag),
                    a.logical_type
                )))
            ),
            other => f.write_str(other.type_id().name()),
        }
    }
}

/// Renders a field name, quoting it when it is not a plain identifier.
struct Identifier<'a>(&'a str);

impl fmt::Display for Identifier<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plain = self
            .0
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && self.0.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if plain {
            f.write_str(self.0)
        } else {
            write!(f, "\"{}\"", self.0.replace('"', "\"\""))
        }
    }
}

/// `DECIMAL(width, scale)`.
///
/// The type is accepted as reported by the engine; an out-of-range width is
/// only rejected when a decoder needs its physical layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecimalType {
    /// Total number of decimal digits.
    pub width: u8,
    /// Number of digits after the decimal point.
    pub scale: u8,
}

impl DecimalType {
    /// Widest precision the engine supports.
    pub const MAX_WIDTH: u8 = 38;

    /// Returns the byte width of the scaled integer that stores a value of
    /// this type.
    ///
    /// | width  | storage |
    /// |--------|---------|
    /// | 1-4    | `i16`   |
    /// | 5-9    | `i32`   |
    /// | 10-18  | `i64`   |
    /// | 19-38  | `i128`  |
    ///
    /// # Errors
    ///
    /// Returns `InvalidDecimalWidth` if the width is zero or above 38.
    pub fn physical_width(&self) -> Result<usize> {
        match self.width {
            1..=4 => Ok(2),
            5..=9 => Ok(4),
            10..=18 => Ok(8),
            19..=38 => Ok(16),
            width => Err(Error::invalid_decimal_width(width)),
        }
    }
}

/// `ENUM` with its dictionary.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumType {
    values: Arc<[Arc<str>]>,
    internal_type: TypeId,
}

impl EnumType {
    /// Creates an enum type over the given dictionary, deriving the internal
    /// index type from the dictionary size.
    pub fn new<I, S>(values: I) -> EnumType
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        let values: Arc<[Arc<str>]> = values.into_iter().map(Into::into).collect();
        let internal_type = Self::internal_type_for(values.len());
        EnumType {
            values,
            internal_type,
        }
    }

    /// Creates an enum type with the internal index type reported by the
    /// engine.
    pub fn with_internal_type(values: Arc<[Arc<str>]>, internal_type: TypeId) -> EnumType {
        EnumType {
            values,
            internal_type,
        }
    }

    /// Unsigned integer type id able to index a dictionary of `size` values.
    pub fn internal_type_for(size: usize) -> TypeId {
        if size <= u8::MAX as usize {
            TypeId::UTinyInt
        } else if size <= u16::MAX as usize {
            TypeId::USmallInt
        } else {
            TypeId::UInteger
        }
    }

    /// Byte width of a dictionary index, derived from the dictionary size:
    /// 1 byte up to 255 values, 2 bytes up to 65535, 4 bytes beyond.
    pub fn index_width(&self) -> usize {
        match Self::internal_type_for(self.values.len()) {
            TypeId::UTinyInt => 1,
            TypeId::USmallInt => 2,
            _ => 4,
        }
    }

    pub fn values(&self) -> &Arc<[Arc<str>]> {
        &self.values
    }

    pub fn value(&self, index: usize) -> Option<&Arc<str>> {
        self.values.get(index)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Index type id as reported by the engine.
    pub fn internal_type(&self) -> TypeId {
        self.internal_type
    }
}

/// `LIST` of variable-length lists of `element`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListType {
    element: Arc<LogicalType>,
}

impl ListType {
    pub fn new(element: LogicalType) -> ListType {
        ListType {
            element: Arc::new(element),
        }
    }

    pub fn element(&self) -> &LogicalType {
        &self.element
    }
}

/// A named field of a `STRUCT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructEntryType {
    pub name: Arc<str>,
    pub logical_type: LogicalType,
}

/// `STRUCT` with its ordered fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StructType {
    entries: Arc<[StructEntryType]>,
}

impl StructType {
    pub fn new<I, S>(entries: I) -> StructType
    where
        I: IntoIterator<Item = (S, LogicalType)>,
        S: Into<Arc<str>>,
    {
        StructType {
            entries: entries
                .into_iter()
                .map(|(name, logical_type)| StructEntryType {
                    name: name.into(),
                    logical_type,
                })
                .collect(),
        }
    }

    pub fn entries(&self) -> &[StructEntryType] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the position of the field named `name`.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name.as_ref() == name)
    }
}

/// `MAP(key, value)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MapType {
    key: Arc<LogicalType>,
    value: Arc<LogicalType>,
}

impl MapType {
    pub const KEY_FIELD: &'static str = "key";
    pub const VALUE_FIELD: &'static str = "value";

    pub fn new(key: LogicalType, value: LogicalType) -> MapType {
        MapType {
            key: Arc::new(key),
            value: Arc::new(value),
        }
    }

    pub fn key(&self) -> &LogicalType {
        &self.key
    }

    pub fn value(&self) -> &LogicalType {
        &self.value
    }

    /// Returns the physical shape of the map: `LIST(STRUCT(key, value))`.
    pub fn as_list_type(&self) -> ListType {
        ListType::new(LogicalType::Struct(self.entry_type()))
    }

    /// Returns the `STRUCT(key, value)` type of a single map entry.
    pub fn entry_type(&self) -> StructType {
        StructType::new([
            (Self::KEY_FIELD, self.key().clone()),
            (Self::VALUE_FIELD, self.value().clone()),
        ])
    }
}

/// `ARRAY` of fixed-length lists of `element`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArrayType {
    element: Arc<LogicalType>,
    length: usize,
}

impl ArrayType {
    pub fn new(element: LogicalType, length: usize) -> ArrayType {
        ArrayType {
            element: Arc::new(element),
            length,
        }
    }

    pub fn element(&self) -> &LogicalType {
        &self.element
    }

    /// Number of elements in every array value.
    pub fn length(&self) -> usize {
        self.length
    }
}

/// A tagged alternative of a `UNION`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnionAlternativeType {
    pub tag: Arc<str>,
    pub logical_type: LogicalType,
}

/// `UNION` with its ordered alternatives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnionType {
    alternatives: Arc<[UnionAlternativeType]>,
}

impl UnionType {
    /// Name of the synthetic discriminant field.
    pub const TAG_FIELD: &'static str = "tag";

    pub fn new<I, S>(alternatives: I) -> UnionType
    where
        I: IntoIterator<Item = (S, LogicalType)>,
        S: Into<Arc<str>>,
    {
        UnionType {
            alternatives: alternatives
                .into_iter()
                .map(|(tag, logical_type)| UnionAlternativeType {
                    tag: tag.into(),
                    logical_type,
                })
                .collect(),
        }
    }

    pub fn alternatives(&self) -> &[UnionAlternativeType] {
        &self.alternatives
    }

    pub fn len(&self) -> usize {
        self.alternatives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }

    /// Returns the position of the alternative tagged `tag`.
    pub fn find(&self, tag: &str) -> Option<usize> {
        self.alternatives.iter().position(|a| a.tag.as_ref() == tag)
    }

    /// Returns the physical shape of the union: a `STRUCT` whose first field
    /// is the `UTINYINT` discriminant, followed by one field per
    /// alternative named after its tag.
    ///
    /// An alternative may itself be tagged [`Self::TAG_FIELD`], so field
    /// names of this struct are not unique. Resolve alternatives with
    /// [`UnionType::find`] and offset by one.
    pub fn as_struct_type(&self) -> StructType {
        StructType::new(
            std::iter::once((Arc::<str>::from(Self::TAG_FIELD), LogicalType::UTinyInt)).chain(
                self.alternatives
                    .iter()
                    .map(|a| (a.tag.clone(), a.logical_type.clone())),
            ),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_physical_width() {
        assert_eq!(DecimalType { width: 4, scale: 1 }.physical_width().unwrap(), 2);
        assert_eq!(DecimalType { width: 9, scale: 4 }.physical_width().unwrap(), 4);
        assert_eq!(DecimalType { width: 18, scale: 6 }.physical_width().unwrap(), 8);
        assert_eq!(DecimalType { width: 38, scale: 10 }.physical_width().unwrap(), 16);
        assert_eq!(DecimalType { width: 5, scale: 0 }.physical_width().unwrap(), 4);
        assert_eq!(DecimalType { width: 19, scale: 0 }.physical_width().unwrap(), 16);

        for width in [0, 39, 255] {
            let err = DecimalType { width, scale: 0 }.physical_width().unwrap_err();
            assert!(matches!(
                err.kind(),
                duckling_common::error::ErrorKind::InvalidDecimalWidth { width: w } if *w == width
            ));
        }
    }

    #[test]
    fn test_enum_index_width() {
        let small = EnumType::new((0..255).map(|i| i.to_string()));
        assert_eq!(small.index_width(), 1);
        assert_eq!(small.internal_type(), TypeId::UTinyInt);

        let medium = EnumType::new((0..256).map(|i| i.to_string()));
        assert_eq!(medium.index_width(), 2);
        assert_eq!(medium.internal_type(), TypeId::USmallInt);

        let large = EnumType::new((0..65536).map(|i| i.to_string()));
        assert_eq!(large.index_width(), 4);
        assert_eq!(large.internal_type(), TypeId::UInteger);
    }

    #[test]
    fn test_display() {
        assert_eq!(LogicalType::Integer.to_string(), "INTEGER");
        assert_eq!(LogicalType::decimal(18, 6).to_string(), "DECIMAL(18,6)");
        assert_eq!(LogicalType::list(LogicalType::Integer).to_string(), "INTEGER[]");
        assert_eq!(
            LogicalType::array(LogicalType::list(LogicalType::Varchar), 3).to_string(),
            "VARCHAR[][3]"
        );
        assert_eq!(
            LogicalType::structure([("a", LogicalType::Integer), ("b c", LogicalType::Varchar)])
                .to_string(),
            "STRUCT(a INTEGER, \"b c\" VARCHAR)"
        );
        assert_eq!(
            LogicalType::map(LogicalType::Varchar, LogicalType::BigInt).to_string(),
            "MAP(VARCHAR, BIGINT)"
        );
        assert_eq!(
            LogicalType::union([("name", LogicalType::Varchar), ("age", LogicalType::SmallInt)])
                .to_string(),
            "UNION(name VARCHAR, age SMALLINT)"
        );
        assert_eq!(
            LogicalType::enumeration(["sad", "it's ok"]).to_string(),
            "ENUM('sad', 'it''s ok')"
        );
        assert_eq!(LogicalType::TimestampTz.to_string(), "TIMESTAMP WITH TIME ZONE");
        assert_eq!(LogicalType::Other(TypeId::VarInt).to_string(), "VARINT");
    }

    #[test]
    fn test_map_as_list_type() {
        let map = MapType::new(LogicalType::Varchar, LogicalType::Integer);
        let list = map.as_list_type();
        assert_eq!(
            list.element(),
            &LogicalType::structure([("key", LogicalType::Varchar), ("value", LogicalType::Integer)])
        );
    }

    #[test]
    fn test_union_as_struct_type() {
        let union = UnionType::new([("name", LogicalType::Varchar), ("age", LogicalType::SmallInt)]);
        let st = union.as_struct_type();
        assert_eq!(st.len(), 3);
        assert_eq!(st.entries()[0].logical_type, LogicalType::UTinyInt);
        assert_eq!(st.entries()[1].name.as_ref(), "name");
        assert_eq!(st.entries()[2].logical_type, LogicalType::SmallInt);
        assert_eq!(st.find("age"), Some(2));
    }

    #[test]
    fn test_primitive_and_type_id() {
        assert_eq!(LogicalType::primitive(TypeId::Uuid), Some(LogicalType::Uuid));
        assert_eq!(LogicalType::primitive(TypeId::Decimal), None);
        assert_eq!(
            LogicalType::primitive(TypeId::SqlNull),
            Some(LogicalType::Other(TypeId::SqlNull))
        );
        assert_eq!(LogicalType::list(LogicalType::Blob).type_id(), TypeId::List);
    }

    #[test]
    fn test_depth() {
        assert_eq!(LogicalType::Integer.depth(), 1);
        assert_eq!(LogicalType::list(LogicalType::Integer).depth(), 2);
        assert_eq!(
            LogicalType::map(LogicalType::Varchar, LogicalType::list(LogicalType::Integer)).depth(),
            4
        );
    }

    #[test]
    fn test_serde() {
        let ty = LogicalType::structure([
            ("id", LogicalType::BigInt),
            ("mood", LogicalType::enumeration(["sad", "happy"])),
            ("tags", LogicalType::list(LogicalType::Varchar)),
        ]);
        let json = serde_json::to_string(&ty).unwrap();
        let back: LogicalType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ty);
    }
}
