//! `DECIMAL` decoder.

use duckling_common::Result;
use duckling_types::DecimalType;

use crate::{primitive_vector::PrimitiveVector, scalar::Decimal, validity::Validity, value::Value};

/// Scaled integers of the width selected by the declared precision.
#[derive(Debug, Clone)]
pub enum DecimalStorage<'a> {
    I16(PrimitiveVector<'a, i16>),
    I32(PrimitiveVector<'a, i32>),
    I64(PrimitiveVector<'a, i64>),
    I128(PrimitiveVector<'a, i128>),
}

impl<'a> DecimalStorage<'a> {
    fn len(&self) -> usize {
        self.validity().len()
    }

    fn validity(&self) -> &Validity<'a> {
        match self {
            DecimalStorage::I16(v) => v.validity(),
            DecimalStorage::I32(v) => v.validity(),
            DecimalStorage::I64(v) => v.validity(),
            DecimalStorage::I128(v) => v.validity(),
        }
    }

    fn get(&self, index: usize) -> Option<i128> {
        match self {
            DecimalStorage::I16(v) => v.get(index).map(i128::from),
            DecimalStorage::I32(v) => v.get(index).map(i128::from),
            DecimalStorage::I64(v) => v.get(index).map(i128::from),
            DecimalStorage::I128(v) => v.get(index),
        }
    }

    fn slice(&self, offset: usize, len: usize) -> DecimalStorage<'a> {
        match self {
            DecimalStorage::I16(v) => DecimalStorage::I16(v.slice(offset, len)),
            DecimalStorage::I32(v) => DecimalStorage::I32(v.slice(offset, len)),
            DecimalStorage::I64(v) => DecimalStorage::I64(v.slice(offset, len)),
            DecimalStorage::I128(v) => DecimalStorage::I128(v.slice(offset, len)),
        }
    }

    fn physical_width(&self) -> usize {
        match self {
            DecimalStorage::I16(_) => 2,
            DecimalStorage::I32(_) => 4,
            DecimalStorage::I64(_) => 8,
            DecimalStorage::I128(_) => 16,
        }
    }
}

/// `DECIMAL(width, scale)` vector.
#[derive(Debug, Clone)]
pub struct DecimalVector<'a> {
    decimal_type: DecimalType,
    storage: DecimalStorage<'a>,
}

impl<'a> DecimalVector<'a> {
    pub fn new(decimal_type: DecimalType, storage: DecimalStorage<'a>) -> DecimalVector<'a> {
        DecimalVector {
            decimal_type,
            storage,
        }
    }

    pub fn decimal_type(&self) -> DecimalType {
        self.decimal_type
    }

    /// Byte width of the scaled integers backing this vector.
    pub fn physical_width(&self) -> usize {
        self.storage.physical_width()
    }

    pub fn storage(&self) -> &DecimalStorage<'a> {
        &self.storage
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.storage.validity().is_valid(index)
    }

    pub fn get(&self, index: usize) -> Option<Decimal> {
        self.storage.get(index).map(|value| Decimal {
            value,
            width: self.decimal_type.width,
            scale: self.decimal_type.scale,
        })
    }

    pub fn get_item(&self, index: usize) -> Result<Value<'a>> {
        Ok(self.get(index).map_or(Value::Null, Value::Decimal))
    }

    pub fn slice(&self, offset: usize, len: usize) -> DecimalVector<'a> {
        DecimalVector {
            decimal_type: self.decimal_type,
            storage: self.storage.slice(offset, len),
        }
    }
}
