//! Access to the engine's raw chunk memory.
//!
//! The decoders never talk to the engine directly. Everything they need
//! (vector data, validity bitmaps, child vectors, out-of-line payloads) is
//! requested through [`RawChunk`], whose implementor owns the chunk for the
//! lifetime of every decoder built over it.

use std::fmt;

use duckling_common::Result;
use duckling_types::LogicalType;

/// Resolves out-of-line payload pointers stored in string, blob and bit
/// string slots.
pub trait HeapReader: Sync {
    /// Returns the `len` bytes starting at `pointer`.
    ///
    /// Returns `None` if the pointer does not resolve to a live buffer of at
    /// least `len` bytes; the corresponding value decodes as null.
    fn read_bytes(&self, pointer: u64, len: usize) -> Option<&[u8]>;
}

/// A chunk of vectors produced by the engine.
///
/// All returned slices borrow from the chunk, so decoders built over
/// `&'a C` cannot outlive it.
pub trait RawChunk: HeapReader {
    /// Identifies one vector of the chunk, a column or a nested child.
    type VectorHandle: Copy + fmt::Debug;

    /// Number of top-level columns.
    fn column_count(&self) -> usize;

    /// Number of rows in every top-level column.
    fn row_count(&self) -> usize;

    /// Returns the vector of column `index`.
    fn column(&self, index: usize) -> Result<Self::VectorHandle>;

    /// Returns the logical type the engine reports for `vector`.
    fn vector_logical_type(&self, vector: Self::VectorHandle) -> Result<LogicalType>;

    /// Returns the first `byte_len` bytes of the data buffer of `vector`.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer is shorter than `byte_len`.
    fn vector_data(&self, vector: Self::VectorHandle, byte_len: usize) -> Result<&[u8]>;

    /// Returns the validity bitmap of `vector`, or `None` if all of its rows
    /// are valid.
    fn vector_validity(&self, vector: Self::VectorHandle) -> Option<&[u64]>;

    /// Returns the child vector of a `LIST` (or `MAP`) vector together with
    /// the number of child rows in use.
    fn list_child(&self, vector: Self::VectorHandle) -> Result<(Self::VectorHandle, usize)>;

    /// Returns field `index` of a `STRUCT` (or `UNION`) vector.
    fn struct_child(&self, vector: Self::VectorHandle, index: usize)
    -> Result<Self::VectorHandle>;

    /// Returns the child vector of an `ARRAY` vector.
    fn array_child(&self, vector: Self::VectorHandle) -> Result<Self::VectorHandle>;

    /// Byte width of the `BOOLEAN` physical representation on this platform.
    fn boolean_physical_width(&self) -> usize;
}
