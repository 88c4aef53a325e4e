//! Numeric type identifiers reported by the engine.

use serde::{Deserialize, Serialize};

/// The engine's type identifier, as returned by its logical type API.
///
/// The discriminant values are part of the engine's C ABI and must not
/// be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u32)]
pub enum TypeId {
    Invalid = 0,
    Boolean = 1,
    TinyInt = 2,
    SmallInt = 3,
    Integer = 4,
    BigInt = 5,
    UTinyInt = 6,
    USmallInt = 7,
    UInteger = 8,
    UBigInt = 9,
    Float = 10,
    Double = 11,
    Timestamp = 12,
    Date = 13,
    Time = 14,
    Interval = 15,
    HugeInt = 16,
    Varchar = 17,
    Blob = 18,
    Decimal = 19,
    TimestampS = 20,
    TimestampMs = 21,
    TimestampNs = 22,
    Enum = 23,
    List = 24,
    Struct = 25,
    Map = 26,
    Uuid = 27,
    Union = 28,
    Bit = 29,
    TimeTz = 30,
    TimestampTz = 31,
    UHugeInt = 32,
    Array = 33,
    Any = 34,
    VarInt = 35,
    SqlNull = 36,
}

impl TypeId {
    /// Converts a raw engine type id, returning `None` for values this
    /// version does not know about.
    pub fn from_raw(raw: u32) -> Option<TypeId> {
        use TypeId::*;
        let id = match raw {
            0 => Invalid,
            1 => Boolean,
            2 => TinyInt,
            3 => SmallInt,
            4 => Integer,
            5 => BigInt,
            6 => UTinyInt,
            7 => USmallInt,
            8 => UInteger,
            9 => UBigInt,
            10 => Float,
            11 => Double,
            12 => Timestamp,
            13 => Date,
            14 => Time,
            15 => Interval,
            16 => HugeInt,
            17 => Varchar,
            18 => Blob,
            19 => Decimal,
            20 => TimestampS,
            21 => TimestampMs,
            22 => TimestampNs,
            23 => Enum,
            24 => List,
            25 => Struct,
            26 => Map,
            27 => Uuid,
            28 => Union,
            29 => Bit,
            30 => TimeTz,
            31 => TimestampTz,
            32 => UHugeInt,
            33 => Array,
            34 => Any,
            35 => VarInt,
            36 => SqlNull,
            _ => return None,
        };
        Some(id)
    }

    #[inline]
    pub fn as_raw(self) -> u32 {
        self as u32
    }

    /// Returns the SQL name of the type id, without any type parameters.
    pub fn name(self) -> &'static str {
        use TypeId::*;
        match self {
            Invalid => "INVALID",
            Boolean => "BOOLEAN",
            TinyInt => "TINYINT",
            SmallInt => "SMALLINT",
            Integer => "INTEGER",
            BigInt => "BIGINT",
            UTinyInt => "UTINYINT",
            USmallInt => "USMALLINT",
            UInteger => "UINTEGER",
            UBigInt => "UBIGINT",
            Float => "FLOAT",
            Double => "DOUBLE",
            Timestamp => "TIMESTAMP",
            Date => "DATE",
            Time => "TIME",
            Interval => "INTERVAL",
            HugeInt => "HUGEINT",
            Varchar => "VARCHAR",
            Blob => "BLOB",
            Decimal => "DECIMAL",
            TimestampS => "TIMESTAMP_S",
            TimestampMs => "TIMESTAMP_MS",
            TimestampNs => "TIMESTAMP_NS",
            Enum => "ENUM",
            List => "LIST",
            Struct => "STRUCT",
            Map => "MAP",
            Uuid => "UUID",
            Union => "UNION",
            Bit => "BIT",
            TimeTz => "TIME WITH TIME ZONE",
            TimestampTz => "TIMESTAMP WITH TIME ZONE",
            UHugeInt => "UHUGEINT",
            Array => "ARRAY",
            Any => "ANY",
            VarInt => "VARINT",
            SqlNull => "NULL",
        }
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
