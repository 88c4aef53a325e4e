//! Decoder for fixed-width values.

use std::{fmt, marker::PhantomData};

use duckling_common::Result;

use crate::{
    scalar::{
        Date, Interval, ListEntry, Time, TimeTz, Timestamp, TimestampMillis, TimestampNanos,
        TimestampSeconds, TimestampTz, Uuid,
    },
    validity::Validity,
    value::Value,
};

/// A value with a fixed-size physical representation in a vector.
pub trait FixedWidth: Copy + fmt::Debug + Send + Sync + 'static {
    /// Natural byte width of the value. A vector may use a wider slot if the
    /// engine reports one (see `BOOLEAN`).
    const WIDTH: usize;

    /// Decodes a value from the first `WIDTH` bytes of `bytes`, in native
    /// byte order.
    fn decode(bytes: &[u8]) -> Self;
}

macro_rules! impl_pod_fixed_width {
    ($($t:ty),* $(,)?) => {
        $(
            impl FixedWidth for $t {
                const WIDTH: usize = std::mem::size_of::<$t>();

                #[inline]
                fn decode(bytes: &[u8]) -> Self {
                    bytemuck::pod_read_unaligned(&bytes[..Self::WIDTH])
                }
            }
        )*
    };
}

impl_pod_fixed_width!(
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    u64,
    f32,
    f64,
    Date,
    Time,
    Timestamp,
    TimestampSeconds,
    TimestampMillis,
    TimestampNanos,
    TimestampTz,
    Interval,
    ListEntry,
);

impl FixedWidth for bool {
    const WIDTH: usize = 1;

    /// Any non-zero byte in the slot means `true`.
    #[inline]
    fn decode(bytes: &[u8]) -> Self {
        bytes.iter().any(|&b| b != 0)
    }
}

/// `HUGEINT` layout: the low 64-bit word first, then the signed high word.
impl FixedWidth for i128 {
    const WIDTH: usize = 16;

    #[inline]
    fn decode(bytes: &[u8]) -> Self {
        let lower = u64::decode(&bytes[..8]);
        let upper = i64::decode(&bytes[8..16]);
        ((upper as i128) << 64) | lower as i128
    }
}

impl FixedWidth for u128 {
    const WIDTH: usize = 16;

    #[inline]
    fn decode(bytes: &[u8]) -> Self {
        let lower = u64::decode(&bytes[..8]);
        let upper = u64::decode(&bytes[8..16]);
        ((upper as u128) << 64) | lower as u128
    }
}

impl FixedWidth for Uuid {
    const WIDTH: usize = 16;

    #[inline]
    fn decode(bytes: &[u8]) -> Self {
        Uuid(i128::decode(bytes))
    }
}

impl FixedWidth for TimeTz {
    const WIDTH: usize = 8;

    #[inline]
    fn decode(bytes: &[u8]) -> Self {
        TimeTz::from_bits(u64::decode(bytes))
    }
}

/// A vector of fixed-width values borrowed from a chunk.
///
/// Holds the data window covering exactly `len` slots and the matching
/// validity view. Slicing narrows both windows without copying.
#[derive(Clone)]
pub struct PrimitiveVector<'a, T> {
    data: &'a [u8],
    width: usize,
    validity: Validity<'a>,
    _marker: PhantomData<T>,
}

impl<'a, T: FixedWidth> PrimitiveVector<'a, T> {
    /// Creates a vector over `validity.len()` slots of `T::WIDTH` bytes.
    ///
    /// # Panics
    ///
    /// Panics if `data` holds fewer than `validity.len() * T::WIDTH` bytes.
    pub fn new(data: &'a [u8], validity: Validity<'a>) -> PrimitiveVector<'a, T> {
        Self::with_width(data, T::WIDTH, validity)
    }

    /// Creates a vector whose slots are `width` bytes wide.
    ///
    /// # Panics
    ///
    /// Panics if `width` is smaller than `T::WIDTH`, or if `data` holds fewer
    /// than `validity.len() * width` bytes.
    pub fn with_width(data: &'a [u8], width: usize, validity: Validity<'a>) -> PrimitiveVector<'a, T> {
        assert!(width >= T::WIDTH);
        let data = &data[..validity.len() * width];
        PrimitiveVector {
            data,
            width,
            validity,
            _marker: PhantomData,
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

    /// Byte width of a slot.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn validity(&self) -> &Validity<'a> {
        &self.validity
    }

    /// The raw bytes backing this view.
    #[inline]
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    #[inline]
    pub fn is_valid(&self, index: usize) -> bool {
        self.validity.is_valid(index)
    }

    /// Returns the value at `index`, or `None` if the row is null.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[inline]
    pub fn get(&self, index: usize) -> Option<T> {
        assert!(index < self.len());
        if self.validity.is_valid(index) {
            let start = index * self.width;
            Some(T::decode(&self.data[start..start + self.width]))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<T>> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }

    /// Returns a view of rows `[offset, offset + len)`.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the length of this vector.
    pub fn slice(&self, offset: usize, len: usize) -> PrimitiveVector<'a, T> {
        let validity = self.validity.slice(offset, len);
        let start = offset * self.width;
        PrimitiveVector {
            data: &self.data[start..start + len * self.width],
            width: self.width,
            validity,
            _marker: PhantomData,
        }
    }
}

impl<'a, T> PrimitiveVector<'a, T>
where
    T: FixedWidth + Into<Value<'a>>,
{
    /// Returns the value at `index` as a dynamically typed [`Value`].
    pub fn get_item(&self, index: usize) -> Result<Value<'a>> {
        Ok(self.get(index).map_or(Value::Null, Into::into))
    }
}

impl<T: FixedWidth> fmt::Debug for PrimitiveVector<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_bytes<T: bytemuck::Pod>(values: &[T]) -> Vec<u8> {
        bytemuck::cast_slice(values).to_vec()
    }

    #[test]
    fn test_get_and_nulls() {
        let data = to_bytes(&[10i32, -20, 30, 40]);
        let words = [0b1011u64];
        let v = PrimitiveVector::<i32>::new(&data, Validity::new(Some(&words), 4));
        assert_eq!(v.len(), 4);
        assert_eq!(v.get(0), Some(10));
        assert_eq!(v.get(1), Some(-20));
        assert_eq!(v.get(2), None);
        assert_eq!(v.get(3), Some(40));
    }

    #[test]
    fn test_slice_shares_data() {
        let data = to_bytes(&[1u64, 2, 3, 4, 5]);
        let v = PrimitiveVector::<u64>::new(&data, Validity::all_valid(5));
        let s = v.slice(1, 3);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![Some(2), Some(3), Some(4)]);
        assert_eq!(s.data().as_ptr(), v.data()[8..].as_ptr());
        let s2 = s.slice(2, 1);
        assert_eq!(s2.get(0), Some(4));
        assert_eq!(s2.data().as_ptr(), v.data()[24..].as_ptr());
    }

    #[test]
    fn test_wide_boolean() {
        let data = [1u8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];
        let v = PrimitiveVector::<bool>::with_width(&data, 4, Validity::all_valid(3));
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![Some(true), Some(false), Some(true)]);
        assert_eq!(v.slice(1, 2).get(1), Some(true));
    }

    #[test]
    fn test_hugeint_words() {
        let mut data = Vec::new();
        for value in [i128::MIN, -1, i128::MAX, 1 << 64] {
            data.extend_from_slice(&(value as u64).to_ne_bytes());
            data.extend_from_slice(&((value >> 64) as i64).to_ne_bytes());
        }
        let v = PrimitiveVector::<i128>::new(&data, Validity::all_valid(4));
        assert_eq!(
            v.iter().collect::<Vec<_>>(),
            vec![Some(i128::MIN), Some(-1), Some(i128::MAX), Some(1 << 64)]
        );

        let u = PrimitiveVector::<u128>::new(&data, Validity::all_valid(4));
        assert_eq!(u.get(1), Some(u128::MAX));
    }

    #[test]
    fn test_unaligned_data() {
        let mut data = vec![0u8];
        data.extend_from_slice(&to_bytes(&[1.5f64, f64::NAN]));
        let v = PrimitiveVector::<f64>::new(&data[1..], Validity::all_valid(2));
        assert_eq!(v.get(0), Some(1.5));
        assert!(v.get(1).unwrap().is_nan());
    }
}
