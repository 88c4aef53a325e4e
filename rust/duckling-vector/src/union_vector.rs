//! `UNION` decoder.

use duckling_common::{Result, error::Error, verify_arg};
use duckling_types::UnionType;

use crate::{
    primitive_vector::PrimitiveVector,
    struct_vector::StructVector,
    value::{UnionItem, Value},
    vector::Vector,
};

/// A vector of tagged unions.
///
/// Physically a struct whose first field holds the `UTINYINT` tag of each
/// row, followed by one field per alternative. Only the field selected by
/// the tag is meaningful for a given row.
#[derive(Debug, Clone)]
pub struct UnionVector<'a> {
    union_type: UnionType,
    members: StructVector<'a>,
    tags: PrimitiveVector<'a, u8>,
}

impl<'a> UnionVector<'a> {
    /// # Errors
    ///
    /// Returns an error if `members` does not have the union's struct shape.
    pub fn try_new(union_type: UnionType, members: StructVector<'a>) -> Result<UnionVector<'a>> {
        verify_arg!(members, members.struct_type() == &union_type.as_struct_type());
        let tags = match &members.fields()[0] {
            Vector::UTinyInt(tags) => tags.clone(),
            other => {
                return Err(Error::type_mismatch(
                    "UTINYINT",
                    other.logical_type().to_string(),
                ));
            }
        };
        Ok(UnionVector {
            union_type,
            members,
            tags,
        })
    }

    pub fn union_type(&self) -> &UnionType {
        &self.union_type
    }

    /// The underlying struct: the tag field followed by one field per
    /// alternative.
    ///
    /// Looking fields up by name on the struct finds the discriminant first
    /// when an alternative is also tagged `tag`; prefer
    /// [`UnionVector::alternative_by_tag`].
    pub fn members(&self) -> &StructVector<'a> {
        &self.members
    }

    /// Values of the alternative at position `index`, over all rows.
    pub fn alternative(&self, index: usize) -> Option<&Vector<'a>> {
        if index < self.union_type.len() {
            self.members.fields().get(index + 1)
        } else {
            None
        }
    }

    pub fn alternative_by_tag(&self, tag: &str) -> Option<&Vector<'a>> {
        self.alternative(self.union_type.find(tag)?)
    }

    pub fn tags(&self) -> &PrimitiveVector<'a, u8> {
        &self.tags
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.members.is_valid(index) && self.tags.is_valid(index)
    }

    /// Returns the selected alternative of row `index`, or `None` if the
    /// union or its tag is null.
    ///
    /// # Errors
    ///
    /// Returns `InvalidDiscriminant` if the tag does not select an
    /// alternative.
    pub fn get(&self, index: usize) -> Result<Option<UnionItem<'a>>> {
        if !self.members.is_valid(index) {
            return Ok(None);
        }
        let Some(tag) = self.tags.get(index) else {
            return Ok(None);
        };
        let alternative = self
            .union_type
            .alternatives()
            .get(tag as usize)
            .ok_or_else(|| Error::invalid_discriminant(tag, self.union_type.len()))?;
        let value = self.members.fields()[tag as usize + 1].get_item(index)?;
        Ok(Some(UnionItem {
            tag: alternative.tag.clone(),
            value: Box::new(value),
        }))
    }

    pub fn get_item(&self, index: usize) -> Result<Value<'a>> {
        Ok(self.get(index)?.map_or(Value::Null, Value::Union))
    }

    pub fn slice(&self, offset: usize, len: usize) -> UnionVector<'a> {
        UnionVector {
            union_type: self.union_type.clone(),
            members: self.members.slice(offset, len),
            tags: self.tags.slice(offset, len),
        }
    }
}
