//! Dictionary-encoded `ENUM` decoder.

use std::sync::Arc;

use duckling_common::{Result, error::Error};
use duckling_types::EnumType;

use crate::{primitive_vector::PrimitiveVector, validity::Validity, value::Value};

/// Dictionary indices, one byte per value up to 255 dictionary entries,
/// two bytes up to 65535, four beyond.
#[derive(Debug, Clone)]
pub enum EnumIndices<'a> {
    U8(PrimitiveVector<'a, u8>),
    U16(PrimitiveVector<'a, u16>),
    U32(PrimitiveVector<'a, u32>),
}

impl<'a> EnumIndices<'a> {
    fn validity(&self) -> &Validity<'a> {
        match self {
            EnumIndices::U8(v) => v.validity(),
            EnumIndices::U16(v) => v.validity(),
            EnumIndices::U32(v) => v.validity(),
        }
    }

    fn get(&self, index: usize) -> Option<u32> {
        match self {
            EnumIndices::U8(v) => v.get(index).map(u32::from),
            EnumIndices::U16(v) => v.get(index).map(u32::from),
            EnumIndices::U32(v) => v.get(index),
        }
    }

    fn slice(&self, offset: usize, len: usize) -> EnumIndices<'a> {
        match self {
            EnumIndices::U8(v) => EnumIndices::U8(v.slice(offset, len)),
            EnumIndices::U16(v) => EnumIndices::U16(v.slice(offset, len)),
            EnumIndices::U32(v) => EnumIndices::U32(v.slice(offset, len)),
        }
    }

    fn width(&self) -> usize {
        match self {
            EnumIndices::U8(_) => 1,
            EnumIndices::U16(_) => 2,
            EnumIndices::U32(_) => 4,
        }
    }
}

/// `ENUM` vector: dictionary indices resolved against the type's values.
#[derive(Debug, Clone)]
pub struct EnumVector<'a> {
    enum_type: EnumType,
    indices: EnumIndices<'a>,
}

impl<'a> EnumVector<'a> {
    pub fn new(enum_type: EnumType, indices: EnumIndices<'a>) -> EnumVector<'a> {
        EnumVector { enum_type, indices }
    }

    pub fn enum_type(&self) -> &EnumType {
        &self.enum_type
    }

    /// Byte width of a dictionary index.
    pub fn index_width(&self) -> usize {
        self.indices.width()
    }

    pub fn len(&self) -> usize {
        self.indices.validity().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.indices.validity().is_valid(index)
    }

    /// Returns the raw dictionary index of row `index`, or `None` if it is
    /// null.
    pub fn get_index(&self, index: usize) -> Option<u32> {
        self.indices.get(index)
    }

    /// Returns the dictionary value of row `index`, or `None` if it is null.
    ///
    /// # Errors
    ///
    /// Returns `InvalidEnumIndex` if the stored index is outside the
    /// dictionary.
    pub fn get(&self, index: usize) -> Result<Option<Arc<str>>> {
        let Some(position) = self.indices.get(index) else {
            return Ok(None);
        };
        self.enum_type
            .value(position as usize)
            .cloned()
            .map(Some)
            .ok_or_else(|| Error::invalid_enum_index(position, self.enum_type.len()))
    }

    pub fn get_item(&self, index: usize) -> Result<Value<'a>> {
        Ok(self.get(index)?.map_or(Value::Null, Value::Enum))
    }

    pub fn slice(&self, offset: usize, len: usize) -> EnumVector<'a> {
        EnumVector {
            enum_type: self.enum_type.clone(),
            indices: self.indices.slice(offset, len),
        }
    }
}
