//! Logical type model of DuckDB result columns.
//!
//! A [`LogicalType`] is an immutable tree describing what a column holds:
//! a primitive tag, a parameterized type such as `DECIMAL(18,6)` or an
//! `ENUM` with its dictionary, or a nested `LIST`, `STRUCT`, `MAP`, `ARRAY`
//! or `UNION` shape. The vector decoders consume this model to pick the
//! physical layout of every column and every nested child.
//!
//! [`TypeId`] carries the engine's numeric type identifiers, which is how
//! the engine reports the type of a raw vector.

pub mod logical_type;
pub mod type_id;

pub use logical_type::{
    ArrayType, DecimalType, EnumType, ListType, LogicalType, MapType, StructEntryType,
    StructType, UnionAlternativeType, UnionType,
};
pub use type_id::TypeId;
