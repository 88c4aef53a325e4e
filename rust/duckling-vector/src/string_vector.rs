//! Decoders for the 16-byte inline/pointer string slot layout, shared by
//! `VARCHAR`, `BLOB` and `BIT`.

use std::fmt;

use duckling_common::{Result, error::ErrorKind};

use crate::{
    primitive_vector::FixedWidth, raw::HeapReader, scalar::BitString, validity::Validity,
    value::Value,
};

/// Byte width of a string slot.
pub const STRING_SLOT_WIDTH: usize = 16;

/// Longest payload stored inside the slot itself.
pub const STRING_INLINE_LENGTH: usize = 12;

/// The raw string slots of a vector.
///
/// Each slot starts with a `u32` length. Payloads of up to 12 bytes follow
/// the length inline; longer payloads are referenced by a pointer in bytes
/// 8-15, with bytes 4-7 caching the first four payload bytes.
#[derive(Clone, Copy)]
pub struct StringSlots<'a> {
    slots: &'a [u8],
    validity: Validity<'a>,
    heap: &'a dyn HeapReader,
}

impl<'a> StringSlots<'a> {
    /// # Panics
    ///
    /// Panics if `slots` holds fewer than `validity.len()` slots.
    pub fn new(slots: &'a [u8], validity: Validity<'a>, heap: &'a dyn HeapReader) -> StringSlots<'a> {
        StringSlots {
            slots: &slots[..validity.len() * STRING_SLOT_WIDTH],
            validity,
            heap,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.validity.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn validity(&self) -> &Validity<'a> {
        &self.validity
    }

    /// The raw slot bytes backing this view.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.slots
    }

    #[inline]
    pub fn is_valid(&self, index: usize) -> bool {
        self.validity.is_valid(index)
    }

    fn slot(&self, index: usize) -> &'a [u8] {
        let start = index * STRING_SLOT_WIDTH;
        &self.slots[start..start + STRING_SLOT_WIDTH]
    }

    /// Payload length recorded in slot `index`, whether or not the row is
    /// valid.
    pub fn payload_len(&self, index: usize) -> usize {
        u32::decode(&self.slot(index)[..4]) as usize
    }

    /// Returns `true` if the payload of row `index` is stored in the slot.
    pub fn is_inlined(&self, index: usize) -> bool {
        self.payload_len(index) <= STRING_INLINE_LENGTH
    }

    /// Returns the payload of row `index`.
    ///
    /// Returns `None` if the row is null, or if its out-of-line pointer does
    /// not resolve to a buffer.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn get_bytes(&self, index: usize) -> Option<&'a [u8]> {
        assert!(index < self.len());
        if !self.validity.is_valid(index) {
            return None;
        }
        let slot = self.slot(index);
        let len = self.payload_len(index);
        if len <= STRING_INLINE_LENGTH {
            Some(&slot[4..4 + len])
        } else {
            let pointer = u64::decode(&slot[8..16]);
            self.heap.read_bytes(pointer, len)
        }
    }

    pub fn slice(&self, offset: usize, len: usize) -> StringSlots<'a> {
        let validity = self.validity.slice(offset, len);
        let start = offset * STRING_SLOT_WIDTH;
        StringSlots {
            slots: &self.slots[start..start + len * STRING_SLOT_WIDTH],
            validity,
            heap: self.heap,
        }
    }
}

impl fmt::Debug for StringSlots<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringSlots")
            .field("len", &self.len())
            .field("validity", &self.validity)
            .finish_non_exhaustive()
    }
}

/// `VARCHAR` vector: slots decoded as UTF-8 text.
#[derive(Debug, Clone, Copy)]
pub struct VarCharVector<'a> {
    slots: StringSlots<'a>,
}

impl<'a> VarCharVector<'a> {
    pub fn new(slots: StringSlots<'a>) -> VarCharVector<'a> {
        VarCharVector { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.slots.is_valid(index)
    }

    pub fn slots(&self) -> &StringSlots<'a> {
        &self.slots
    }

    /// Returns the string at `index`, or `None` if it is null.
    ///
    /// # Errors
    ///
    /// Returns `InvalidUtf8` if the payload is not valid UTF-8.
    pub fn get(&self, index: usize) -> Result<Option<&'a str>> {
        self.slots
            .get_bytes(index)
            .map(|bytes| -> Result<&'a str> {
                std::str::from_utf8(bytes)
                    .map_err(|source| ErrorKind::InvalidUtf8 { row: index, source }.into())
            })
            .transpose()
    }

    pub fn get_item(&self, index: usize) -> Result<Value<'a>> {
        Ok(self.get(index)?.map_or(Value::Null, Value::Varchar))
    }

    pub fn slice(&self, offset: usize, len: usize) -> VarCharVector<'a> {
        VarCharVector {
            slots: self.slots.slice(offset, len),
        }
    }
}

/// `BLOB` vector: slots returned as raw bytes.
#[derive(Debug, Clone, Copy)]
pub struct BlobVector<'a> {
    slots: StringSlots<'a>,
}

impl<'a> BlobVector<'a> {
    pub fn new(slots: StringSlots<'a>) -> BlobVector<'a> {
        BlobVector { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.slots.is_valid(index)
    }

    pub fn slots(&self) -> &StringSlots<'a> {
        &self.slots
    }

    pub fn get(&self, index: usize) -> Option<&'a [u8]> {
        self.slots.get_bytes(index)
    }

    pub fn get_item(&self, index: usize) -> Result<Value<'a>> {
        Ok(self.get(index).map_or(Value::Null, Value::Blob))
    }

    pub fn slice(&self, offset: usize, len: usize) -> BlobVector<'a> {
        BlobVector {
            slots: self.slots.slice(offset, len),
        }
    }
}

/// `BIT` vector: slots decoded as padded bit strings.
#[derive(Debug, Clone, Copy)]
pub struct BitVector<'a> {
    slots: StringSlots<'a>,
}

impl<'a> BitVector<'a> {
    pub fn new(slots: StringSlots<'a>) -> BitVector<'a> {
        BitVector { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn is_valid(&self, index: usize) -> bool {
        self.slots.is_valid(index)
    }

    pub fn slots(&self) -> &StringSlots<'a> {
        &self.slots
    }

    /// # Errors
    ///
    /// Returns an error if the payload is not a well-formed bit string.
    pub fn get(&self, index: usize) -> Result<Option<BitString<'a>>> {
        self.slots
            .get_bytes(index)
            .map(BitString::try_new)
            .transpose()
    }

    pub fn get_item(&self, index: usize) -> Result<Value<'a>> {
        Ok(self.get(index)?.map_or(Value::Null, Value::Bit))
    }

    pub fn slice(&self, offset: usize, len: usize) -> BitVector<'a> {
        BitVector {
            slots: self.slots.slice(offset, len),
        }
    }
}
