//! `ARRAY` decoder.

use std::sync::Arc;

use duckling_common::{Result, verify_arg};
use duckling_types::ArrayType;

use crate::{validity::Validity, value::Value, vector::Vector};

/// A vector of fixed-length arrays.
///
/// Row `i` covers child rows `[i * length, (i + 1) * length)`. The child is
/// shared between slices; a slice only moves its starting row.
#[derive(Debug, Clone)]
pub struct ArrayVector<'a> {
    array_type: ArrayType,
    validity: Validity<'a>,
    child: Arc<Vector<'a>>,
    first_row: usize,
}

impl<'a> ArrayVector<'a> {
    /// # Errors
    ///
    /// Returns an error if the child is not of the element type or does not
    /// hold `length` elements for every row.
    pub fn try_new(
        array_type: ArrayType,
        validity: Validity<'a>,
        child: Vector<'a>,
    ) -> Result<ArrayVector<'a>> {
        verify_arg!(child, &child.logical_type() == array_type.element());
        verify_arg!(
            child,
            validity
                .len()
                .checked_mul(array_type.length())
                .is_some_and(|n| n <= child.len())
        );
        Ok(ArrayVector {
            array_type,
            validity,
            child: Arc::new(child),
            first_row: 0,
        })
    }

    pub fn array_type(&self) -> &ArrayType {
        &self.array_type
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

    /// The child vector holding the elements of every row of the unsliced
    /// vector.
    pub fn child(&self) -> &Vector<'a> {
        &self.child
    }

    /// Returns the elements of row `index`, or `None` if the row is null.
    pub fn get(&self, index: usize) -> Option<Vector<'a>> {
        assert!(index < self.len());
        if !self.validity.is_valid(index) {
            return None;
        }
        let length = self.array_type.length();
        Some(self.child.slice((self.first_row + index) * length, length))
    }

    pub fn get_item(&self, index: usize) -> Result<Value<'a>> {
        Ok(self.get(index).map_or(Value::Null, Value::Array))
    }

    pub fn slice(&self, offset: usize, len: usize) -> ArrayVector<'a> {
        ArrayVector {
            array_type: self.array_type.clone(),
            validity: self.validity.slice(offset, len),
            child: self.child.clone(),
            first_row: self.first_row + offset,
        }
    }
}
