//! Type-directed construction of vector decoders.

use duckling_common::{
    Result,
    error::{Error, ErrorKind},
    verify_arg, verify_data,
};
use duckling_types::{ArrayType, DecimalType, EnumType, ListType, LogicalType, StructType};

use crate::{
    array_vector::ArrayVector,
    config::DecodeConfig,
    decimal_vector::{DecimalStorage, DecimalVector},
    enum_vector::{EnumIndices, EnumVector},
    list_vector::ListVector,
    map_vector::MapVector,
    primitive_vector::{FixedWidth, PrimitiveVector},
    raw::{HeapReader, RawChunk},
    scalar::ListEntry,
    string_vector::{BitVector, BlobVector, STRING_SLOT_WIDTH, StringSlots, VarCharVector},
    struct_vector::StructVector,
    union_vector::UnionVector,
    validity::Validity,
    vector::{FromVector, Vector},
};

/// Builds decoders over the vectors of one chunk.
///
/// The factory borrows the chunk, and so does every vector it creates:
/// none of them can outlive the chunk.
pub struct VectorFactory<'a, C: RawChunk> {
    chunk: &'a C,
    config: DecodeConfig,
}

impl<'a, C: RawChunk> VectorFactory<'a, C> {
    /// Creates a factory with the default configuration.
    pub fn new(chunk: &'a C) -> VectorFactory<'a, C> {
        VectorFactory {
            chunk,
            config: DecodeConfig::default(),
        }
    }

    /// # Errors
    ///
    /// Returns an error if `config` is invalid.
    pub fn with_config(chunk: &'a C, config: DecodeConfig) -> Result<VectorFactory<'a, C>> {
        config.validate()?;
        Ok(VectorFactory { chunk, config })
    }

    pub fn config(&self) -> &DecodeConfig {
        &self.config
    }

    pub fn chunk(&self) -> &'a C {
        self.chunk
    }

    /// Creates the decoder for `item_count` rows of `vector`, interpreted as
    /// `logical_type`.
    ///
    /// Nested types recurse into the child vectors reported by the chunk.
    ///
    /// # Errors
    ///
    /// - `UnsupportedType` if no decoder exists for the type or one of its
    ///   nested types.
    /// - `InvalidDecimalWidth` for a `DECIMAL` of width outside 1..=38.
    /// - `NestingTooDeep` if the type exceeds the configured nesting depth.
    /// - An invalid format error if the chunk's buffers are too short for
    ///   `item_count` rows.
    pub fn create(
        &self,
        vector: C::VectorHandle,
        item_count: usize,
        logical_type: &LogicalType,
    ) -> Result<Vector<'a>> {
        self.create_at_depth(vector, item_count, logical_type, 1)
    }

    /// Creates the decoder for `vector` using the logical type the chunk
    /// reports for it.
    pub fn create_from_engine_type(
        &self,
        vector: C::VectorHandle,
        item_count: usize,
    ) -> Result<Vector<'a>> {
        let logical_type = self.chunk.vector_logical_type(vector)?;
        self.create(vector, item_count, &logical_type)
    }

    /// Creates the decoder and extracts the concrete decoder class `V`.
    ///
    /// # Errors
    ///
    /// In addition to the errors of [`create`](Self::create), returns
    /// `TypeMismatch` if `logical_type` does not decode to `V`.
    pub fn create_typed<V: FromVector<'a>>(
        &self,
        vector: C::VectorHandle,
        item_count: usize,
        logical_type: &LogicalType,
    ) -> Result<V> {
        self.create(vector, item_count, logical_type)?.downcast()
    }

    fn create_at_depth(
        &self,
        vector: C::VectorHandle,
        count: usize,
        logical_type: &LogicalType,
        depth: usize,
    ) -> Result<Vector<'a>> {
        if depth > self.config.max_nesting_depth {
            return Err(ErrorKind::NestingTooDeep {
                limit: self.config.max_nesting_depth,
            }
            .into());
        }
        log::trace!("decoding {count} rows of {logical_type} from {vector:?}");

        let decoded = match logical_type {
            LogicalType::Boolean => Vector::Boolean(self.primitive_with_width(
                vector,
                count,
                self.chunk.boolean_physical_width(),
            )?),
            LogicalType::TinyInt => Vector::TinyInt(self.primitive(vector, count)?),
            LogicalType::SmallInt => Vector::SmallInt(self.primitive(vector, count)?),
            LogicalType::Integer => Vector::Integer(self.primitive(vector, count)?),
            LogicalType::BigInt => Vector::BigInt(self.primitive(vector, count)?),
            LogicalType::UTinyInt => Vector::UTinyInt(self.primitive(vector, count)?),
            LogicalType::USmallInt => Vector::USmallInt(self.primitive(vector, count)?),
            LogicalType::UInteger => Vector::UInteger(self.primitive(vector, count)?),
            LogicalType::UBigInt => Vector::UBigInt(self.primitive(vector, count)?),
            LogicalType::Float => Vector::Float(self.primitive(vector, count)?),
            LogicalType::Double => Vector::Double(self.primitive(vector, count)?),
            LogicalType::Date => Vector::Date(self.primitive(vector, count)?),
            LogicalType::Time => Vector::Time(self.primitive(vector, count)?),
            LogicalType::TimeTz => Vector::TimeTz(self.primitive(vector, count)?),
            LogicalType::Timestamp => Vector::Timestamp(self.primitive(vector, count)?),
            LogicalType::TimestampS => Vector::TimestampS(self.primitive(vector, count)?),
            LogicalType::TimestampMs => Vector::TimestampMs(self.primitive(vector, count)?),
            LogicalType::TimestampNs => Vector::TimestampNs(self.primitive(vector, count)?),
            LogicalType::TimestampTz => Vector::TimestampTz(self.primitive(vector, count)?),
            LogicalType::Interval => Vector::Interval(self.primitive(vector, count)?),
            LogicalType::HugeInt => Vector::HugeInt(self.primitive(vector, count)?),
            LogicalType::UHugeInt => Vector::UHugeInt(self.primitive(vector, count)?),
            LogicalType::Uuid => Vector::Uuid(self.primitive(vector, count)?),
            LogicalType::Varchar => {
                Vector::Varchar(VarCharVector::new(self.string_slots(vector, count)?))
            }
            LogicalType::Blob => Vector::Blob(BlobVector::new(self.string_slots(vector, count)?)),
            LogicalType::Bit => Vector::Bit(BitVector::new(self.string_slots(vector, count)?)),
            LogicalType::Decimal(decimal_type) => {
                Vector::Decimal(self.decimal(vector, count, *decimal_type)?)
            }
            LogicalType::Enum(enum_type) => {
                Vector::Enum(self.enumeration(vector, count, enum_type.clone())?)
            }
            LogicalType::List(list_type) => {
                Vector::List(self.list(vector, count, list_type.clone(), depth)?)
            }
            LogicalType::Struct(struct_type) => {
                Vector::Struct(self.structure(vector, count, struct_type.clone(), depth)?)
            }
            LogicalType::Map(map_type) => {
                let entries = self.list(vector, count, map_type.as_list_type(), depth)?;
                Vector::Map(MapVector::try_new(map_type.clone(), entries)?)
            }
            LogicalType::Array(array_type) => {
                Vector::Array(self.array(vector, count, array_type.clone(), depth)?)
            }
            LogicalType::Union(union_type) => {
                let members = self.structure(vector, count, union_type.as_struct_type(), depth)?;
                Vector::Union(UnionVector::try_new(union_type.clone(), members)?)
            }
            LogicalType::Other(type_id) => {
                log::debug!("no decoder for {type_id} vector {vector:?}");
                return Err(Error::unsupported_type(type_id.name()));
            }
        };
        Ok(decoded)
    }

    fn validity(&self, vector: C::VectorHandle, count: usize) -> Result<Validity<'a>> {
        let words = self.chunk.vector_validity(vector);
        if let Some(words) = words {
            verify_data!(validity, words.len() >= Validity::word_count(count));
        }
        Ok(Validity::new(words, count))
    }

    fn data(&self, vector: C::VectorHandle, count: usize, width: usize) -> Result<&'a [u8]> {
        let byte_len = count
            .checked_mul(width)
            .ok_or_else(|| Error::invalid_arg("item_count", "byte length overflows usize"))?;
        let data = self.chunk.vector_data(vector, byte_len)?;
        verify_data!(data, data.len() >= byte_len);
        Ok(data)
    }

    fn primitive<T: FixedWidth>(
        &self,
        vector: C::VectorHandle,
        count: usize,
    ) -> Result<PrimitiveVector<'a, T>> {
        self.primitive_with_width(vector, count, T::WIDTH)
    }

    fn primitive_with_width<T: FixedWidth>(
        &self,
        vector: C::VectorHandle,
        count: usize,
        width: usize,
    ) -> Result<PrimitiveVector<'a, T>> {
        verify_arg!(width, width >= T::WIDTH);
        let data = self.data(vector, count, width)?;
        let validity = self.validity(vector, count)?;
        Ok(PrimitiveVector::with_width(data, width, validity))
    }

    fn string_slots(&self, vector: C::VectorHandle, count: usize) -> Result<StringSlots<'a>> {
        let data = self.data(vector, count, STRING_SLOT_WIDTH)?;
        let validity = self.validity(vector, count)?;
        let heap: &'a dyn HeapReader = self.chunk;
        Ok(StringSlots::new(data, validity, heap))
    }

    fn decimal(
        &self,
        vector: C::VectorHandle,
        count: usize,
        decimal_type: DecimalType,
    ) -> Result<DecimalVector<'a>> {
        verify_data!(decimal_scale, decimal_type.scale <= decimal_type.width);
        let storage = match decimal_type.physical_width()? {
            2 => DecimalStorage::I16(self.primitive(vector, count)?),
            4 => DecimalStorage::I32(self.primitive(vector, count)?),
            8 => DecimalStorage::I64(self.primitive(vector, count)?),
            _ => DecimalStorage::I128(self.primitive(vector, count)?),
        };
        Ok(DecimalVector::new(decimal_type, storage))
    }

    fn enumeration(
        &self,
        vector: C::VectorHandle,
        count: usize,
        enum_type: EnumType,
    ) -> Result<EnumVector<'a>> {
        let expected = EnumType::internal_type_for(enum_type.len());
        if enum_type.internal_type() != expected {
            log::warn!(
                "ENUM of {} values reports internal type {}, decoding indices as {expected}",
                enum_type.len(),
                enum_type.internal_type()
            );
        }
        let indices = match enum_type.index_width() {
            1 => EnumIndices::U8(self.primitive(vector, count)?),
            2 => EnumIndices::U16(self.primitive(vector, count)?),
            _ => EnumIndices::U32(self.primitive(vector, count)?),
        };
        Ok(EnumVector::new(enum_type, indices))
    }

    fn list(
        &self,
        vector: C::VectorHandle,
        count: usize,
        list_type: ListType,
        depth: usize,
    ) -> Result<ListVector<'a>> {
        let entries = self.primitive::<ListEntry>(vector, count)?;
        let (child, child_count) = self.chunk.list_child(vector)?;
        let child = self.create_at_depth(child, child_count, list_type.element(), depth + 1)?;
        let list = ListVector::try_new(list_type, entries, child)?;
        if self.config.eager_list_validation {
            list.validate_entries()?;
        }
        Ok(list)
    }

    fn structure(
        &self,
        vector: C::VectorHandle,
        count: usize,
        struct_type: StructType,
        depth: usize,
    ) -> Result<StructVector<'a>> {
        let validity = self.validity(vector, count)?;
        let fields = struct_type
            .entries()
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let child = self.chunk.struct_child(vector, i)?;
                self.create_at_depth(child, count, &entry.logical_type, depth + 1)
            })
            .collect::<Result<Vec<_>>>()?;
        StructVector::try_new(struct_type, validity, fields)
    }

    fn array(
        &self,
        vector: C::VectorHandle,
        count: usize,
        array_type: ArrayType,
        depth: usize,
    ) -> Result<ArrayVector<'a>> {
        let validity = self.validity(vector, count)?;
        let child_count = count
            .checked_mul(array_type.length())
            .ok_or_else(|| Error::invalid_arg("item_count", "array child count overflows usize"))?;
        let child = self.chunk.array_child(vector)?;
        let child = self.create_at_depth(child, child_count, array_type.element(), depth + 1)?;
        ArrayVector::try_new(array_type, validity, child)
    }
}
