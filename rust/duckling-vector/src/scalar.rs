//! Decoded scalar values that have no direct Rust primitive counterpart.

use std::fmt;

use bytemuck::{Pod, Zeroable};
use duckling_common::{Result, verify_data};
use serde::{Deserialize, Serialize};

/// `DATE`: days since 1970-01-01.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Date {
    pub days: i32,
}

/// `TIME`: microseconds since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Time {
    pub micros: i64,
}

/// `TIMESTAMP`: microseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Timestamp {
    pub micros: i64,
}

/// `TIMESTAMP_S`: seconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TimestampSeconds {
    pub seconds: i64,
}

/// `TIMESTAMP_MS`: milliseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TimestampMillis {
    pub millis: i64,
}

/// `TIMESTAMP_NS`: nanoseconds since the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TimestampNanos {
    pub nanos: i64,
}

/// `TIMESTAMP WITH TIME ZONE`: microseconds since the epoch, in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[repr(transparent)]
pub struct TimestampTz {
    pub micros: i64,
}

/// `INTERVAL`, stored as three independent components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable, Serialize, Deserialize)]
#[repr(C)]
pub struct Interval {
    pub months: i32,
    pub days: i32,
    pub micros: i64,
}

/// `(offset, length)` pair locating a list value inside its child vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct ListEntry {
    pub offset: u64,
    pub length: u64,
}

/// `TIME WITH TIME ZONE`: time of day plus the UTC offset it was recorded in.
///
/// The engine packs both into a single 64-bit word: the upper 40 bits hold
/// the microseconds, the low 24 bits hold the offset, biased so that larger
/// raw values mean more negative offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeTz {
    pub micros: u64,
    pub offset_seconds: i32,
}

impl TimeTz {
    /// Largest absolute UTC offset, `15:59:59`.
    pub const MAX_OFFSET: i32 = 16 * 60 * 60 - 1;

    const OFFSET_BITS: u32 = 24;
    const OFFSET_MASK: u64 = (1 << Self::OFFSET_BITS) - 1;

    /// Unpacks the engine representation.
    pub fn from_bits(bits: u64) -> TimeTz {
        TimeTz {
            micros: bits >> Self::OFFSET_BITS,
            offset_seconds: Self::MAX_OFFSET - (bits & Self::OFFSET_MASK) as i32,
        }
    }

    /// Packs the value into the engine representation.
    pub fn to_bits(&self) -> u64 {
        let offset = (Self::MAX_OFFSET - self.offset_seconds) as u64 & Self::OFFSET_MASK;
        (self.micros << Self::OFFSET_BITS) | offset
    }
}

impl fmt::Display for TimeTz {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let seconds = self.micros / 1_000_000;
        let fraction = self.micros % 1_000_000;
        write!(
            f,
            "{:02}:{:02}:{:02}",
            seconds / 3600,
            (seconds / 60) % 60,
            seconds % 60
        )?;
        if fraction != 0 {
            write!(f, ".{fraction:06}")?;
        }

        let sign = if self.offset_seconds < 0 { '-' } else { '+' };
        let offset = self.offset_seconds.unsigned_abs();
        write!(f, "{sign}{:02}", offset / 3600)?;
        let (minutes, seconds) = ((offset / 60) % 60, offset % 60);
        if minutes != 0 || seconds != 0 {
            write!(f, ":{minutes:02}")?;
        }
        if seconds != 0 {
            write!(f, ":{seconds:02}")?;
        }
        Ok(())
    }
}

/// A `DECIMAL` value: a scaled integer together with its declared precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Decimal {
    /// The value multiplied by `10^scale`.
    pub value: i128,
    pub width: u8,
    pub scale: u8,
}

impl Decimal {
    /// Converts to the nearest `f64`; precision is lost beyond 15-17 digits.
    pub fn to_f64(&self) -> f64 {
        self.value as f64 / 10f64.powi(self.scale as i32)
    }
}

impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value < 0 {
            f.write_str("-")?;
        }
        let digits = self.value.unsigned_abs().to_string();
        let scale = self.scale as usize;
        if scale == 0 {
            return f.write_str(&digits);
        }
        // At least one digit before the point.
        let digits = format!("{digits:0>width$}", width = scale + 1);
        let (whole, fraction) = digits.split_at(digits.len() - scale);
        write!(f, "{whole}.{fraction}")
    }
}

/// A `UUID` as stored by the engine: a signed 128-bit integer whose top bit
/// is flipped relative to the UUID's natural big-endian byte order, so that
/// signed comparison orders UUIDs lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Uuid(pub i128);

impl Uuid {
    const SIGN_BIT: u128 = 1 << 127;

    /// Raw signed value, as the engine stores it.
    pub fn raw(&self) -> i128 {
        self.0
    }

    pub fn to_uuid(&self) -> uuid::Uuid {
        uuid::Uuid::from_u128(self.0 as u128 ^ Self::SIGN_BIT)
    }

    pub fn from_uuid(value: uuid::Uuid) -> Uuid {
        Uuid((value.as_u128() ^ Self::SIGN_BIT) as i128)
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_uuid().hyphenated(), f)
    }
}

/// A `BIT` string borrowed from the vector's payload.
///
/// The first byte holds the number of padding bits (0-7). The remaining
/// bytes hold the bits most-significant first, with the padding occupying
/// the high end of the first data byte.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitString<'a> {
    bytes: &'a [u8],
}

impl<'a> BitString<'a> {
    /// Wraps an encoded bit string.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload is empty or its padding count is
    /// larger than the data it pads.
    pub fn try_new(bytes: &'a [u8]) -> Result<BitString<'a>> {
        verify_data!(bit_string, !bytes.is_empty());
        let padding = bytes[0] as usize;
        verify_data!(bit_string, padding < 8);
        verify_data!(bit_string, padding <= (bytes.len() - 1) * 8);
        Ok(BitString { bytes })
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        (self.bytes.len() - 1) * 8 - self.padding()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns bit `index`, counting from the leftmost bit of the string.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn get(&self, index: usize) -> bool {
        assert!(index < self.len());
        let position = index + self.padding();
        (self.bytes[1 + position / 8] >> (7 - position % 8)) & 1 == 1
    }

    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len()).map(|i| self.get(i))
    }

    /// The encoded payload, padding byte included.
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    fn padding(&self) -> usize {
        self.bytes[0] as usize
    }
}

impl fmt::Display for BitString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString({self})")
    }
}
