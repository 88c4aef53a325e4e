//! An engine-layout chunk held in process memory.

use duckling_common::{Result, error::Error};
use duckling_types::LogicalType;
use duckling_vector::{HeapReader, RawChunk};

/// Index of a vector within a [`MemoryChunk`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VectorId(pub usize);

/// One vector's buffers.
#[derive(Debug, Clone)]
pub struct RawVector {
    pub logical_type: LogicalType,
    pub data: Vec<u8>,
    pub validity: Option<Vec<u64>>,
    /// List and array element vector, or struct fields in order.
    pub children: Vec<VectorId>,
    /// Number of child rows in use, for list vectors.
    pub child_count: usize,
}

impl RawVector {
    pub fn new(logical_type: LogicalType, data: Vec<u8>, validity: Option<Vec<u64>>) -> RawVector {
        RawVector {
            logical_type,
            data,
            validity,
            children: Vec::new(),
            child_count: 0,
        }
    }
}

/// A chunk of vectors stored in an arena, with a heap of out-of-line
/// payloads addressed by their real memory addresses.
#[derive(Debug, Clone)]
pub struct MemoryChunk {
    pub(crate) vectors: Vec<RawVector>,
    pub(crate) columns: Vec<VectorId>,
    pub(crate) row_count: usize,
    pub(crate) heap: Vec<Box<[u8]>>,
    pub(crate) boolean_width: usize,
}

impl MemoryChunk {
    pub fn vector(&self, id: VectorId) -> Result<&RawVector> {
        self.vectors
            .get(id.0)
            .ok_or_else(|| Error::invalid_arg("vector", format!("no vector {}", id.0)))
    }

    /// Mutable access to a vector's buffers, for corrupting them in tests.
    pub fn vector_mut(&mut self, id: VectorId) -> Option<&mut RawVector> {
        self.vectors.get_mut(id.0)
    }

    pub fn columns(&self) -> &[VectorId] {
        &self.columns
    }

    /// Total number of vectors, nested children included.
    pub fn vector_count(&self) -> usize {
        self.vectors.len()
    }

    /// Number of payloads stored out of line.
    pub fn heap_len(&self) -> usize {
        self.heap.len()
    }
}

impl HeapReader for MemoryChunk {
    fn read_bytes(&self, pointer: u64, len: usize) -> Option<&[u8]> {
        self.heap.iter().find_map(|payload| {
            let start = payload.as_ptr() as u64;
            let offset = pointer.checked_sub(start)? as usize;
            payload.get(offset..offset.checked_add(len)?)
        })
    }
}

impl RawChunk for MemoryChunk {
    type VectorHandle = VectorId;

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn row_count(&self) -> usize {
        self.row_count
    }

    fn column(&self, index: usize) -> Result<VectorId> {
        self.columns
            .get(index)
            .copied()
            .ok_or_else(|| Error::invalid_arg("index", format!("no column {index}")))
    }

    fn vector_logical_type(&self, vector: VectorId) -> Result<LogicalType> {
        Ok(self.vector(vector)?.logical_type.clone())
    }

    fn vector_data(&self, vector: VectorId, byte_len: usize) -> Result<&[u8]> {
        self.vector(vector)?
            .data
            .get(..byte_len)
            .ok_or_else(|| Error::invalid_format("vector data"))
    }

    fn vector_validity(&self, vector: VectorId) -> Option<&[u64]> {
        self.vectors.get(vector.0)?.validity.as_deref()
    }

    fn list_child(&self, vector: VectorId) -> Result<(VectorId, usize)> {
        let raw = self.vector(vector)?;
        let child = raw
            .children
            .first()
            .copied()
            .ok_or_else(|| Error::invalid_format("list child"))?;
        Ok((child, raw.child_count))
    }

    fn struct_child(&self, vector: VectorId, index: usize) -> Result<VectorId> {
        self.vector(vector)?
            .children
            .get(index)
            .copied()
            .ok_or_else(|| Error::invalid_format("struct child"))
    }

    fn array_child(&self, vector: VectorId) -> Result<VectorId> {
        self.vector(vector)?
            .children
            .first()
            .copied()
            .ok_or_else(|| Error::invalid_format("array child"))
    }

    fn boolean_physical_width(&self) -> usize {
        self.boolean_width
    }
}
