//! `STRUCT` decoder.

use std::sync::Arc;

use duckling_common::{Result, verify_arg};
use duckling_types::StructType;

use crate::{
    validity::Validity,
    value::{StructItem, Value},
    vector::Vector,
};

/// A vector of structs: one child vector per field, all of the same length
/// as the struct vector itself.
#[derive(Debug, Clone)]
pub struct StructVector<'a> {
    struct_type: StructType,
    validity: Validity<'a>,
    fields: Arc<[Vector<'a>]>,
}

impl<'a> StructVector<'a> {
    /// Creates a struct vector from its field vectors.
    ///
    /// # Errors
    ///
    /// Returns an error if the number of fields, their types or their
    /// lengths do not match the struct type and validity.
    pub fn try_new(
        struct_type: StructType,
        validity: Validity<'a>,
        fields: Vec<Vector<'a>>,
    ) -> Result<StructVector<'a>> {
        verify_arg!(fields, fields.len() == struct_type.len());
        for (field, entry) in fields.iter().zip(struct_type.entries()) {
            verify_arg!(field, field.len() == validity.len());
            verify_arg!(field, field.logical_type() == entry.logical_type);
        }
        Ok(StructVector {
            struct_type,
            validity,
            fields: fields.into(),
        })
    }

    pub fn struct_type(&self) -> &StructType {
        &self.struct_type
    }

    pub fn len(&self) -> usize {
        self.validity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validity(&self) -> &Validity<'a> {
        &self.validity
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.validity.is_valid(index)
    }

    pub fn fields(&self) -> &[Vector<'a>] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&Vector<'a>> {
        self.fields.get(index)
    }

    pub fn field_by_name(&self, name: &str) -> Option<&Vector<'a>> {
        self.struct_type.find(name).map(|i| &self.fields[i])
    }

    /// Returns the named field values of row `index`, or `None` if the
    /// struct itself is null.
    pub fn get(&self, index: usize) -> Result<Option<Vec<StructItem<'a>>>> {
        assert!(index < self.len());
        if !self.validity.is_valid(index) {
            return Ok(None);
        }
        self.struct_type
            .entries()
            .iter()
            .zip(self.fields.iter())
            .map(|(entry, field)| -> Result<StructItem<'a>> {
                Ok(StructItem {
                    name: entry.name.clone(),
                    value: field.get_item(index)?,
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    pub fn get_item(&self, index: usize) -> Result<Value<'a>> {
        Ok(self.get(index)?.map_or(Value::Null, Value::Struct))
    }

    /// Returns a view of rows `[offset, offset + len)`, slicing every field
    /// in lockstep.
    pub fn slice(&self, offset: usize, len: usize) -> StructVector<'a> {
        StructVector {
            struct_type: self.struct_type.clone(),
            validity: self.validity.slice(offset, len),
            fields: self.fields.iter().map(|f| f.slice(offset, len)).collect(),
        }
    }
}
