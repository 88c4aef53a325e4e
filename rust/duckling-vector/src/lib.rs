//! Zero-copy decoders for DuckDB result vectors.
//!
//! A result chunk is a set of columnar vectors laid out the way the engine
//! keeps them in memory: fixed-width value buffers, 64-bit validity words,
//! 16-byte string slots pointing into a heap, list entry buffers and child
//! vectors. This crate wraps those buffers in typed, read-only views.
//!
//! The entry points are:
//!
//! - [`RawChunk`], the abstraction over the engine's chunk memory.
//! - [`VectorFactory`], which maps a [`LogicalType`] onto the decoder for
//!   its physical layout, recursing into nested children.
//! - [`DataChunkView`], which decodes whole chunks column by column.
//! - [`Vector`], the closed set of decoders, and [`Value`], the dynamically
//!   typed row value they produce.
//!
//! Every decoder borrows the chunk it was built from. Slicing a decoder
//! narrows its window over the same buffers and never copies.
//!
//! [`LogicalType`]: duckling_types::LogicalType

pub mod array_vector;
pub mod chunk;
pub mod config;
pub mod decimal_vector;
pub mod enum_vector;
pub mod factory;
pub mod json_printer;
pub mod list_vector;
pub mod map_vector;
pub mod primitive_vector;
pub mod raw;
pub mod scalar;
pub mod string_vector;
pub mod struct_vector;
pub mod union_vector;
pub mod validity;
pub mod value;
pub mod vector;

pub use chunk::DataChunkView;
pub use config::{DecodeConfig, STANDARD_VECTOR_SIZE};
pub use factory::VectorFactory;
pub use json_printer::ReadValueAsJson;
pub use primitive_vector::{FixedWidth, PrimitiveVector};
pub use raw::{HeapReader, RawChunk};
pub use validity::Validity;
pub use value::{MapItem, StructItem, UnionItem, Value};
pub use vector::{FromVector, Vector};
