//! `MAP` decoder.

use duckling_common::{Result, error::Error, error::ErrorKind, verify_arg};
use duckling_types::MapType;

use crate::{
    list_vector::ListVector,
    struct_vector::StructVector,
    value::{MapItem, Value},
    vector::Vector,
};

/// A vector of maps, physically a `LIST(STRUCT(key, value))`.
#[derive(Debug, Clone)]
pub struct MapVector<'a> {
    map_type: MapType,
    entries: ListVector<'a>,
}

impl<'a> MapVector<'a> {
    /// Wraps the list-of-struct vector holding the map entries.
    ///
    /// # Errors
    ///
    /// Returns an error if `entries` does not have the map's list shape.
    pub fn try_new(map_type: MapType, entries: ListVector<'a>) -> Result<MapVector<'a>> {
        verify_arg!(entries, entries.list_type() == &map_type.as_list_type());
        Ok(MapVector { map_type, entries })
    }

    pub fn map_type(&self) -> &MapType {
        &self.map_type
    }

    /// The underlying list of key/value structs.
    pub fn entries(&self) -> &ListVector<'a> {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.entries.is_valid(index)
    }

    /// Returns the key/value pairs of row `index`, or `None` if the map is
    /// null.
    ///
    /// # Errors
    ///
    /// Returns `NullMapEntry` if one of the row's entries is null.
    pub fn get(&self, index: usize) -> Result<Option<Vec<MapItem<'a>>>> {
        let Some(entries) = self.entries.get(index)? else {
            return Ok(None);
        };
        let entries = as_entry_struct(&entries)?;
        let (keys, values) = (&entries.fields()[0], &entries.fields()[1]);
        (0..entries.len())
            .map(|entry| -> Result<MapItem<'a>> {
                if !entries.is_valid(entry) {
                    return Err(Error::from(ErrorKind::NullMapEntry { row: index, entry }));
                }
                Ok(MapItem {
                    key: keys.get_item(entry)?,
                    value: values.get_item(entry)?,
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(Some)
    }

    pub fn get_item(&self, index: usize) -> Result<Value<'a>> {
        Ok(self.get(index)?.map_or(Value::Null, Value::Map))
    }

    pub fn slice(&self, offset: usize, len: usize) -> MapVector<'a> {
        MapVector {
            map_type: self.map_type.clone(),
            entries: self.entries.slice(offset, len),
        }
    }
}

fn as_entry_struct<'v, 'a>(entries: &'v Vector<'a>) -> Result<&'v StructVector<'a>> {
    match entries {
        Vector::Struct(entries) if entries.fields().len() == 2 => Ok(entries),
        other => Err(Error::type_mismatch(
            "STRUCT(key, value)",
            other.logical_type().to_string(),
        )),
    }
}
