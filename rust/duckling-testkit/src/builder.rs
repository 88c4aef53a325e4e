//! Encoding rows of values into engine-layout vectors.

use anyhow::{Context, bail, ensure};
use duckling_types::{ArrayType, DecimalType, EnumType, ListType, LogicalType, StructType, UnionType};
use duckling_vector::{
    Validity,
    scalar::{
        Date, Interval, ListEntry, Time, TimeTz, Timestamp, TimestampMillis, TimestampNanos,
        TimestampSeconds, TimestampTz, Uuid,
    },
    string_vector::{STRING_INLINE_LENGTH, STRING_SLOT_WIDTH},
};

use crate::memory_chunk::{MemoryChunk, RawVector, VectorId};

/// An owned value to encode into a vector.
///
/// The variant must match the logical type of the vector it is encoded
/// into; [`Literal::Null`] fits any type.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Null,
    Boolean(bool),
    TinyInt(i8),
    SmallInt(i16),
    Integer(i32),
    BigInt(i64),
    UTinyInt(u8),
    USmallInt(u16),
    UInteger(u32),
    UBigInt(u64),
    Float(f32),
    Double(f64),
    Date(Date),
    Time(Time),
    TimeTz(TimeTz),
    Timestamp(Timestamp),
    TimestampS(TimestampSeconds),
    TimestampMs(TimestampMillis),
    TimestampNs(TimestampNanos),
    TimestampTz(TimestampTz),
    Interval(Interval),
    HugeInt(i128),
    UHugeInt(u128),
    Uuid(uuid::Uuid),
    Varchar(String),
    Blob(Vec<u8>),
    /// Bits written as a string of `0` and `1`, leftmost bit first.
    Bit(String),
    /// The unscaled value, e.g. `-9999` for `-999.9` in `DECIMAL(4,1)`.
    Decimal(i128),
    /// A dictionary entry, by value.
    Enum(String),
    /// A raw dictionary index, which need not be in range.
    EnumIndex(u32),
    List(Vec<Literal>),
    Struct(Vec<Literal>),
    Map(Vec<(Literal, Literal)>),
    Array(Vec<Literal>),
    /// A union row: the alternative index and its value. The index need
    /// not be in range.
    Union(u8, Box<Literal>),
    /// A string slot claiming `length` out-of-line bytes behind a pointer
    /// that resolves to nothing.
    Dangling(u32),
}

impl Literal {
    pub fn varchar(s: impl Into<String>) -> Literal {
        Literal::Varchar(s.into())
    }

    pub fn bit(bits: impl Into<String>) -> Literal {
        Literal::Bit(bits.into())
    }

    pub fn union(tag: u8, value: Literal) -> Literal {
        Literal::Union(tag, Box::new(value))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Literal::Null)
    }
}

/// Builds a [`MemoryChunk`] column by column.
///
/// ```ignore
/// let chunk = ChunkBuilder::new()
///     .column(LogicalType::Integer, vec![Literal::Integer(1), Literal::Null])?
///     .build();
/// ```
#[derive(Debug)]
pub struct ChunkBuilder {
    vectors: Vec<RawVector>,
    columns: Vec<VectorId>,
    row_count: Option<usize>,
    heap: Vec<Box<[u8]>>,
    boolean_width: usize,
    list_child_padding: usize,
}

impl Default for ChunkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkBuilder {
    pub fn new() -> ChunkBuilder {
        ChunkBuilder {
            vectors: Vec::new(),
            columns: Vec::new(),
            row_count: None,
            heap: Vec::new(),
            boolean_width: 1,
            list_child_padding: 0,
        }
    }

    /// Stores booleans in slots of `width` bytes.
    pub fn with_boolean_width(mut self, width: usize) -> ChunkBuilder {
        assert_ne!(width, 0);
        self.boolean_width = width;
        self
    }

    /// Appends `padding` unused null elements to every list child, the way
    /// the engine over-allocates list storage.
    pub fn with_list_child_padding(mut self, padding: usize) -> ChunkBuilder {
        self.list_child_padding = padding;
        self
    }

    /// Appends a column holding `values`.
    pub fn column(mut self, logical_type: LogicalType, values: Vec<Literal>) -> anyhow::Result<Self> {
        self.check_row_count(values.len())?;
        let id = self
            .add_vector(&logical_type, &values)
            .with_context(|| format!("encoding column of type {logical_type}"))?;
        self.columns.push(id);
        Ok(self)
    }

    /// Appends a column from hand-made buffers.
    pub fn raw_column(mut self, vector: RawVector, row_count: usize) -> anyhow::Result<Self> {
        self.check_row_count(row_count)?;
        let id = self.push(vector);
        self.columns.push(id);
        Ok(self)
    }

    /// Encodes `values` into a new vector that is not a column, e.g. a child
    /// for a hand-made [`RawVector`].
    pub fn add_vector(
        &mut self,
        logical_type: &LogicalType,
        values: &[Literal],
    ) -> anyhow::Result<VectorId> {
        let validity = validity_words(values);
        let mut vector = match logical_type {
            LogicalType::Boolean => {
                let data = fixed(logical_type, values, self.boolean_width, |value, slot| {
                    let Literal::Boolean(b) = value else {
                        return None;
                    };
                    slot[0] = *b as u8;
                    Some(())
                })?;
                RawVector::new(logical_type.clone(), data, validity)
            }
            LogicalType::TinyInt => self.pod(logical_type, values, |v| match v {
                Literal::TinyInt(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::SmallInt => self.pod(logical_type, values, |v| match v {
                Literal::SmallInt(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::Integer => self.pod(logical_type, values, |v| match v {
                Literal::Integer(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::BigInt => self.pod(logical_type, values, |v| match v {
                Literal::BigInt(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::UTinyInt => self.pod(logical_type, values, |v| match v {
                Literal::UTinyInt(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::USmallInt => self.pod(logical_type, values, |v| match v {
                Literal::USmallInt(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::UInteger => self.pod(logical_type, values, |v| match v {
                Literal::UInteger(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::UBigInt => self.pod(logical_type, values, |v| match v {
                Literal::UBigInt(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::Float => self.pod(logical_type, values, |v| match v {
                Literal::Float(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::Double => self.pod(logical_type, values, |v| match v {
                Literal::Double(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::Date => self.pod(logical_type, values, |v| match v {
                Literal::Date(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::Time => self.pod(logical_type, values, |v| match v {
                Literal::Time(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::TimeTz => self.pod(logical_type, values, |v| match v {
                Literal::TimeTz(x) => Some(x.to_bits().to_ne_bytes().to_vec()),
                _ => None,
            })?,
            LogicalType::Timestamp => self.pod(logical_type, values, |v| match v {
                Literal::Timestamp(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::TimestampS => self.pod(logical_type, values, |v| match v {
                Literal::TimestampS(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::TimestampMs => self.pod(logical_type, values, |v| match v {
                Literal::TimestampMs(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::TimestampNs => self.pod(logical_type, values, |v| match v {
                Literal::TimestampNs(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::TimestampTz => self.pod(logical_type, values, |v| match v {
                Literal::TimestampTz(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::Interval => self.pod(logical_type, values, |v| match v {
                Literal::Interval(x) => Some(bytemuck::bytes_of(x).to_vec()),
                _ => None,
            })?,
            LogicalType::HugeInt => self.pod(logical_type, values, |v| match v {
                Literal::HugeInt(x) => Some(hugeint_bytes(*x).to_vec()),
                _ => None,
            })?,
            LogicalType::UHugeInt => self.pod(logical_type, values, |v| match v {
                Literal::UHugeInt(x) => Some(hugeint_bytes(*x as i128).to_vec()),
                _ => None,
            })?,
            LogicalType::Uuid => self.pod(logical_type, values, |v| match v {
                Literal::Uuid(x) => Some(hugeint_bytes(Uuid::from_uuid(*x).raw()).to_vec()),
                _ => None,
            })?,
            LogicalType::Varchar | LogicalType::Blob | LogicalType::Bit => {
                let data = self.string_slots(logical_type, values)?;
                RawVector::new(logical_type.clone(), data, validity)
            }
            LogicalType::Decimal(decimal_type) => {
                let data = decimal_data(logical_type, *decimal_type, values)?;
                RawVector::new(logical_type.clone(), data, validity)
            }
            LogicalType::Enum(enum_type) => {
                let data = enum_data(logical_type, enum_type, values)?;
                RawVector::new(logical_type.clone(), data, validity)
            }
            LogicalType::List(list_type) => self.list(logical_type, list_type, values)?,
            LogicalType::Map(map_type) => {
                let entries = values
                    .iter()
                    .map(|value| match value {
                        Literal::Null => Ok(Literal::Null),
                        Literal::Map(pairs) => Ok(Literal::List(
                            pairs
                                .iter()
                                .map(|(k, v)| Literal::Struct(vec![k.clone(), v.clone()]))
                                .collect(),
                        )),
                        other => bail!("{other:?} is not a {logical_type} value"),
                    })
                    .collect::<anyhow::Result<Vec<_>>>()?;
                self.list(logical_type, &map_type.as_list_type(), &entries)?
            }
            LogicalType::Struct(struct_type) => {
                self.structure(logical_type, struct_type, values, validity)?
            }
            LogicalType::Union(union_type) => {
                let rows = union_rows(logical_type, union_type, values)?;
                self.structure(logical_type, &union_type.as_struct_type(), &rows, validity)?
            }
            LogicalType::Array(array_type) => {
                self.array(logical_type, array_type, values, validity)?
            }
            LogicalType::Other(type_id) => bail!("cannot encode values of type {type_id}"),
        };
        vector.logical_type = logical_type.clone();
        Ok(self.push(vector))
    }

    pub fn build(self) -> MemoryChunk {
        MemoryChunk {
            vectors: self.vectors,
            columns: self.columns,
            row_count: self.row_count.unwrap_or(0),
            heap: self.heap,
            boolean_width: self.boolean_width,
        }
    }

    fn check_row_count(&mut self, row_count: usize) -> anyhow::Result<()> {
        match self.row_count {
            Some(expected) => ensure!(
                expected == row_count,
                "column has {row_count} rows, expected {expected}"
            ),
            None => self.row_count = Some(row_count),
        }
        Ok(())
    }

    fn push(&mut self, vector: RawVector) -> VectorId {
        self.vectors.push(vector);
        VectorId(self.vectors.len() - 1)
    }

    fn pod(
        &self,
        logical_type: &LogicalType,
        values: &[Literal],
        encode: impl Fn(&Literal) -> Option<Vec<u8>>,
    ) -> anyhow::Result<RawVector> {
        let width = primitive_width(logical_type);
        let data = fixed(logical_type, values, width, |value, slot| {
            let bytes = encode(value)?;
            slot.copy_from_slice(&bytes);
            Some(())
        })?;
        Ok(RawVector::new(
            logical_type.clone(),
            data,
            validity_words(values),
        ))
    }

    fn string_slots(
        &mut self,
        logical_type: &LogicalType,
        values: &[Literal],
    ) -> anyhow::Result<Vec<u8>> {
        let mut data = vec![0u8; values.len() * STRING_SLOT_WIDTH];
        for (value, slot) in values.iter().zip(data.chunks_exact_mut(STRING_SLOT_WIDTH)) {
            let payload = match (logical_type, value) {
                (_, Literal::Null) => continue,
                (_, Literal::Dangling(length)) => {
                    ensure!(*length as usize > STRING_INLINE_LENGTH, "dangling payload is inlined");
                    slot[..4].copy_from_slice(&length.to_ne_bytes());
                    continue;
                }
                (LogicalType::Varchar, Literal::Varchar(s)) => s.as_bytes().to_vec(),
                (LogicalType::Blob, Literal::Blob(b)) => b.clone(),
                (LogicalType::Bit, Literal::Bit(bits)) => encode_bits(bits)?,
                (_, other) => bail!("{other:?} is not a {logical_type} value"),
            };
            slot[..4].copy_from_slice(&(payload.len() as u32).to_ne_bytes());
            if payload.len() <= STRING_INLINE_LENGTH {
                slot[4..4 + payload.len()].copy_from_slice(&payload);
            } else {
                slot[4..8].copy_from_slice(&payload[..4]);
                let payload: Box<[u8]> = payload.into_boxed_slice();
                slot[8..16].copy_from_slice(&(payload.as_ptr() as u64).to_ne_bytes());
                self.heap.push(payload);
            }
        }
        Ok(data)
    }

    fn list(
        &mut self,
        logical_type: &LogicalType,
        list_type: &ListType,
        values: &[Literal],
    ) -> anyhow::Result<RawVector> {
        let mut entries = Vec::with_capacity(values.len());
        let mut elements = Vec::new();
        for value in values {
            match value {
                Literal::Null => entries.push(ListEntry {
                    offset: 0,
                    length: 0,
                }),
                Literal::List(items) => {
                    entries.push(ListEntry {
                        offset: elements.len() as u64,
                        length: items.len() as u64,
                    });
                    elements.extend(items.iter().cloned());
                }
                other => bail!("{other:?} is not a {logical_type} value"),
            }
        }
        elements.resize(elements.len() + self.list_child_padding, Literal::Null);
        let child = self.add_vector(list_type.element(), &elements)?;
        let mut vector = RawVector::new(
            logical_type.clone(),
            bytemuck::cast_slice(&entries).to_vec(),
            validity_words(values),
        );
        vector.children = vec![child];
        vector.child_count = elements.len();
        Ok(vector)
    }

    fn structure(
        &mut self,
        logical_type: &LogicalType,
        struct_type: &StructType,
        values: &[Literal],
        validity: Option<Vec<u64>>,
    ) -> anyhow::Result<RawVector> {
        for value in values {
            match value {
                Literal::Null => {}
                Literal::Struct(fields) => ensure!(
                    fields.len() == struct_type.len(),
                    "struct row has {} fields, expected {}",
                    fields.len(),
                    struct_type.len()
                ),
                other => bail!("{other:?} is not a {logical_type} value"),
            }
        }
        let mut children = Vec::with_capacity(struct_type.len());
        for (i, entry) in struct_type.entries().iter().enumerate() {
            let column = values
                .iter()
                .map(|value| match value {
                    Literal::Struct(fields) => fields[i].clone(),
                    _ => Literal::Null,
                })
                .collect::<Vec<_>>();
            children.push(self.add_vector(&entry.logical_type, &column)?);
        }
        let mut vector = RawVector::new(logical_type.clone(), Vec::new(), validity);
        vector.children = children;
        Ok(vector)
    }

    fn array(
        &mut self,
        logical_type: &LogicalType,
        array_type: &ArrayType,
        values: &[Literal],
        validity: Option<Vec<u64>>,
    ) -> anyhow::Result<RawVector> {
        let mut elements = Vec::with_capacity(values.len() * array_type.length());
        for value in values {
            match value {
                Literal::Null => {
                    elements.extend(std::iter::repeat_n(Literal::Null, array_type.length()))
                }
                Literal::Array(items) => {
                    ensure!(
                        items.len() == array_type.length(),
                        "array row has {} elements, expected {}",
                        items.len(),
                        array_type.length()
                    );
                    elements.extend(items.iter().cloned());
                }
                other => bail!("{other:?} is not a {logical_type} value"),
            }
        }
        let child = self.add_vector(array_type.element(), &elements)?;
        let mut vector = RawVector::new(logical_type.clone(), Vec::new(), validity);
        vector.children = vec![child];
        Ok(vector)
    }
}

/// Validity words with a bit set for every non-null row, or `None` if no
/// row is null.
fn validity_words(values: &[Literal]) -> Option<Vec<u64>> {
    if !values.iter().any(Literal::is_null) {
        return None;
    }
    let mut words = vec![0u64; Validity::word_count(values.len())];
    for (i, value) in values.iter().enumerate() {
        if !value.is_null() {
            words[i / 64] |= 1 << (i % 64);
        }
    }
    Some(words)
}

fn fixed(
    logical_type: &LogicalType,
    values: &[Literal],
    width: usize,
    mut write: impl FnMut(&Literal, &mut [u8]) -> Option<()>,
) -> anyhow::Result<Vec<u8>> {
    let mut data = vec![0u8; values.len() * width];
    for (value, slot) in values.iter().zip(data.chunks_exact_mut(width)) {
        if value.is_null() {
            continue;
        }
        if write(value, slot).is_none() {
            bail!("{value:?} is not a {logical_type} value");
        }
    }
    Ok(data)
}

fn primitive_width(logical_type: &LogicalType) -> usize {
    match logical_type {
        LogicalType::TinyInt | LogicalType::UTinyInt => 1,
        LogicalType::SmallInt | LogicalType::USmallInt => 2,
        LogicalType::Integer | LogicalType::UInteger | LogicalType::Float | LogicalType::Date => 4,
        LogicalType::HugeInt | LogicalType::UHugeInt | LogicalType::Uuid | LogicalType::Interval => 16,
        _ => 8,
    }
}

/// `HUGEINT` layout: low word, then high word, each in native order.
fn hugeint_bytes(value: i128) -> [u8; 16] {
    let mut bytes = [0u8; 16];
    bytes[..8].copy_from_slice(&(value as u64).to_ne_bytes());
    bytes[8..].copy_from_slice(&((value >> 64) as i64).to_ne_bytes());
    bytes
}

/// Encodes a `0`/`1` string with a leading padding count byte. Padding bits
/// sit at the high end of the first data byte and are set to one.
fn encode_bits(bits: &str) -> anyhow::Result<Vec<u8>> {
    ensure!(!bits.is_empty(), "empty bit string");
    let data_len = bits.len().div_ceil(8);
    let padding = data_len * 8 - bits.len();
    let mut bytes = vec![0u8; 1 + data_len];
    bytes[0] = padding as u8;
    for position in 0..padding {
        bytes[1] |= 1 << (7 - position);
    }
    for (i, bit) in bits.chars().enumerate() {
        let position = i + padding;
        match bit {
            '1' => bytes[1 + position / 8] |= 1 << (7 - position % 8),
            '0' => {}
            other => bail!("invalid bit {other:?}"),
        }
    }
    Ok(bytes)
}

fn decimal_data(
    logical_type: &LogicalType,
    decimal_type: DecimalType,
    values: &[Literal],
) -> anyhow::Result<Vec<u8>> {
    let width = decimal_type.physical_width()?;
    fixed(logical_type, values, width, |value, slot| {
        let Literal::Decimal(v) = value else {
            return None;
        };
        match width {
            2 => slot.copy_from_slice(&(*v as i16).to_ne_bytes()),
            4 => slot.copy_from_slice(&(*v as i32).to_ne_bytes()),
            8 => slot.copy_from_slice(&(*v as i64).to_ne_bytes()),
            _ => slot.copy_from_slice(&hugeint_bytes(*v)),
        }
        Some(())
    })
}

fn enum_data(
    logical_type: &LogicalType,
    enum_type: &EnumType,
    values: &[Literal],
) -> anyhow::Result<Vec<u8>> {
    let mut indices = Vec::with_capacity(values.len());
    for value in values {
        let index = match value {
            Literal::Null => 0,
            Literal::EnumIndex(index) => *index,
            Literal::Enum(name) => enum_type
                .values()
                .iter()
                .position(|v| v.as_ref() == name)
                .with_context(|| format!("{name:?} is not in {logical_type}"))?
                as u32,
            other => bail!("{other:?} is not a {logical_type} value"),
        };
        indices.push(index);
    }
    let width = enum_type.index_width();
    let mut data = Vec::with_capacity(values.len() * width);
    for index in indices {
        match width {
            1 => data.push(index as u8),
            2 => data.extend_from_slice(&(index as u16).to_ne_bytes()),
            _ => data.extend_from_slice(&index.to_ne_bytes()),
        }
    }
    Ok(data)
}

/// Rewrites union rows as rows of the union's physical struct.
fn union_rows(
    logical_type: &LogicalType,
    union_type: &UnionType,
    values: &[Literal],
) -> anyhow::Result<Vec<Literal>> {
    values
        .iter()
        .map(|value| match value {
            Literal::Null => Ok(Literal::Null),
            Literal::Union(tag, member) => {
                let mut fields = vec![Literal::UTinyInt(*tag)];
                fields.extend((0..union_type.len()).map(|i| {
                    if i == *tag as usize {
                        member.as_ref().clone()
                    } else {
                        Literal::Null
                    }
                }));
                Ok(Literal::Struct(fields))
            }
            other => bail!("{other:?} is not a {logical_type} value"),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_bits() {
        assert_eq!(encode_bits("10101").unwrap(), vec![3, 0b1111_0101]);
        assert_eq!(encode_bits("00000000").unwrap(), vec![0, 0]);
        assert_eq!(encode_bits("111111111").unwrap(), vec![7, 0xff, 0xff]);
        assert!(encode_bits("").is_err());
        assert!(encode_bits("012").is_err());
    }

    #[test]
    fn test_validity_words() {
        assert_eq!(validity_words(&[Literal::Integer(1)]), None);
        let mut values = vec![Literal::Integer(1); 70];
        values[1] = Literal::Null;
        values[65] = Literal::Null;
        let words = validity_words(&values).unwrap();
        assert_eq!(words.len(), 2);
        assert_eq!(words[0], !0b10);
        assert_eq!(words[1], 0b111101);
    }

    #[test]
    fn test_row_count_mismatch() {
        let result = ChunkBuilder::new()
            .column(LogicalType::Integer, vec![Literal::Integer(1)])
            .unwrap()
            .column(LogicalType::Integer, vec![]);
        assert!(result.is_err());
    }

    #[test]
    fn test_type_mismatch() {
        let result = ChunkBuilder::new().column(LogicalType::Integer, vec![Literal::BigInt(1)]);
        assert!(result.is_err());
    }

    #[test]
    fn test_out_of_line_payloads() {
        let chunk = ChunkBuilder::new()
            .column(
                LogicalType::Varchar,
                vec![
                    Literal::varchar("short"),
                    Literal::varchar("a string longer than twelve bytes"),
                ],
            )
            .unwrap()
            .build();
        assert_eq!(chunk.heap_len(), 1);
    }
}
