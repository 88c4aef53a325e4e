//! `LIST` decoder.

use std::sync::Arc;

use duckling_common::{Result, verify_arg, verify_data};
use duckling_types::ListType;

use crate::{
    primitive_vector::PrimitiveVector, scalar::ListEntry, validity::Validity, value::Value,
    vector::Vector,
};

/// A vector of variable-length lists.
///
/// Every row holds an `(offset, length)` entry into a single child vector
/// shared by all rows. Slicing narrows the entry window only: offsets stay
/// absolute into the shared child, which is never re-sliced.
#[derive(Debug, Clone)]
pub struct ListVector<'a> {
    list_type: ListType,
    entries: PrimitiveVector<'a, ListEntry>,
    child: Arc<Vector<'a>>,
}

impl<'a> ListVector<'a> {
    /// Creates a list vector over the given entries and child vector.
    ///
    /// # Errors
    ///
    /// Returns an error if the child's type is not the list's element type.
    pub fn try_new(
        list_type: ListType,
        entries: PrimitiveVector<'a, ListEntry>,
        child: Vector<'a>,
    ) -> Result<ListVector<'a>> {
        verify_arg!(child, &child.logical_type() == list_type.element());
        Ok(ListVector {
            list_type,
            entries,
            child: Arc::new(child),
        })
    }

    pub fn list_type(&self) -> &ListType {
        &self.list_type
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn validity(&self) -> &Validity<'a> {
        self.entries.validity()
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.entries.is_valid(index)
    }

    /// The shared child vector holding the elements of all lists.
    pub fn child(&self) -> &Vector<'a> {
        &self.child
    }

    /// The raw `(offset, length)` entries.
    pub fn entries(&self) -> &PrimitiveVector<'a, ListEntry> {
        &self.entries
    }

    /// Checks every non-null entry against the bounds of the child vector.
    pub fn validate_entries(&self) -> Result<()> {
        for entry in self.entries.iter().flatten() {
            self.child_range(entry)?;
        }
        Ok(())
    }

    /// Returns the elements of row `index` as a slice of the child vector,
    /// or `None` if the row is null.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry reaches past the end of the child.
    pub fn get(&self, index: usize) -> Result<Option<Vector<'a>>> {
        let Some(entry) = self.entries.get(index) else {
            return Ok(None);
        };
        let (offset, len) = self.child_range(entry)?;
        Ok(Some(self.child.slice(offset, len)))
    }

    pub fn get_item(&self, index: usize) -> Result<Value<'a>> {
        Ok(self.get(index)?.map_or(Value::Null, Value::List))
    }

    pub fn slice(&self, offset: usize, len: usize) -> ListVector<'a> {
        ListVector {
            list_type: self.list_type.clone(),
            entries: self.entries.slice(offset, len),
            child: self.child.clone(),
        }
    }

    fn child_range(&self, entry: ListEntry) -> Result<(usize, usize)> {
        let end = entry.offset.checked_add(entry.length);
        verify_data!(
            list_entry,
            end.is_some_and(|end| end <= self.child.len() as u64)
        );
        Ok((entry.offset as usize, entry.length as usize))
    }
}
