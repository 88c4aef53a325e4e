//! Row validity of a vector.

/// A borrowed view of a vector's validity bitmap.
///
/// The engine packs one bit per row into 64-bit words: row `i` is valid if
/// bit `i % 64` of word `i / 64` is set. A vector without a bitmap has no
/// nulls at all, which is represented by `words == None`.
///
/// The view carries a row offset so that slicing a vector only moves the
/// offset and never touches the bitmap.
#[derive(Debug, Clone, Copy)]
pub struct Validity<'a> {
    words: Option<&'a [u64]>,
    offset: usize,
    len: usize,
}

impl<'a> Validity<'a> {
    /// Creates a validity view over `len` rows.
    ///
    /// # Arguments
    ///
    /// * `words` - The validity bitmap, or `None` if all rows are valid.
    ///   When present it must cover at least `len` bits.
    /// * `len` - The number of rows.
    pub fn new(words: Option<&'a [u64]>, len: usize) -> Validity<'a> {
        Validity {
            words,
            offset: 0,
            len,
        }
    }

    /// Creates a validity view where every one of `len` rows is valid.
    pub fn all_valid(len: usize) -> Validity<'a> {
        Validity::new(None, len)
    }

    /// Number of 64-bit words needed to hold `len` validity bits.
    #[inline]
    pub fn word_count(len: usize) -> usize {
        len.div_ceil(64)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Row offset of this view into the underlying bitmap.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the underlying bitmap, if any.
    #[inline]
    pub fn words(&self) -> Option<&'a [u64]> {
        self.words
    }

    /// Returns `true` if no row in the underlying vector can be null.
    #[inline]
    pub fn is_trivial_non_null(&self) -> bool {
        self.words.is_none()
    }

    /// Returns `true` if the row at `index` holds a value.
    ///
    /// Indices past the end of the bitmap are reported as valid; the owning
    /// vector is responsible for bounds-checking.
    #[inline]
    pub fn is_valid(&self, index: usize) -> bool {
        match self.words {
            None => true,
            Some(words) => {
                let row = self.offset + index;
                words
                    .get(row / 64)
                    .is_none_or(|&word| (word >> (row % 64)) & 1 == 1)
            }
        }
    }

    /// Returns `true` if the row at `index` is null.
    #[inline]
    pub fn is_null(&self, index: usize) -> bool {
        !self.is_valid(index)
    }

    /// Returns the number of null rows in this view.
    pub fn count_nulls(&self) -> usize {
        if self.words.is_none() {
            return 0;
        }
        (0..self.len).filter(|&i| self.is_null(i)).count()
    }

    /// Returns the number of valid rows in this view.
    pub fn count_non_nulls(&self) -> usize {
        self.len - self.count_nulls()
    }

    /// Returns a view of rows `[offset, offset + len)` sharing the same bitmap.
    ///
    /// # Panics
    ///
    /// Panics if `offset + len` exceeds the length of this view.
    pub fn slice(&self, offset: usize, len: usize) -> Validity<'a> {
        assert!(offset + len <= self.len);
        Validity {
            words: self.words,
            offset: self.offset + offset,
            len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_bitmap_is_all_valid() {
        let validity = Validity::new(None, 5);
        assert!((0..5).all(|i| validity.is_valid(i)));
        assert_eq!(validity.count_nulls(), 0);
        assert!(validity.is_trivial_non_null());
    }

    #[test]
    fn test_bit_addressing() {
        // rows 1, 63 and 64 are null
        let words = [!((1u64 << 1) | (1u64 << 63)), !1u64];
        let validity = Validity::new(Some(&words), 70);
        assert!(validity.is_valid(0));
        assert!(validity.is_null(1));
        assert!(validity.is_valid(62));
        assert!(validity.is_null(63));
        assert!(validity.is_null(64));
        assert!(validity.is_valid(65));
        assert_eq!(validity.count_nulls(), 3);
        assert_eq!(validity.count_non_nulls(), 67);
    }

    #[test]
    fn test_slice_shifts_offset() {
        let words = [!((1u64 << 1) | (1u64 << 63)), !1u64];
        let validity = Validity::new(Some(&words), 70);

        let tail = validity.slice(60, 10);
        assert_eq!(tail.len(), 10);
        assert_eq!(tail.offset(), 60);
        assert!(std::ptr::eq(tail.words().unwrap(), validity.words().unwrap()));
        assert!(tail.is_null(3));
        assert!(tail.is_null(4));
        assert!(tail.is_valid(5));
        assert_eq!(tail.count_nulls(), 2);

        let nested = tail.slice(4, 2);
        assert_eq!(nested.offset(), 64);
        assert!(nested.is_null(0));
        assert!(nested.is_valid(1));
    }

    #[test]
    #[should_panic]
    fn test_slice_out_of_bounds() {
        Validity::all_valid(4).slice(3, 2);
    }
}
