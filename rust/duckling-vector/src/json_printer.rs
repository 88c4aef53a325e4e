//! Utilities for printing [`Value`]s and [`Vector`]s as JSON.
//!
//! Intended for diagnostics, debugging, and testing. 128-bit integers,
//! decimals, and other values without an exact JSON number representation
//! are rendered as strings.

use duckling_common::Result;
use serde_json::{Map, Value as Json, json};

use crate::{chunk::DataChunkView, raw::RawChunk, value::Value, vector::Vector};

/// Read a single value at a given index and convert it into JSON.
pub trait ReadValueAsJson {
    /// Read the value at `index` and produce a `serde_json::Value`.
    fn read_value_as_json(&self, index: usize) -> Result<Json>;
}

impl ReadValueAsJson for Vector<'_> {
    fn read_value_as_json(&self, index: usize) -> Result<Json> {
        self.get_item(index)?.to_json()
    }
}

/// Produces a JSON array of the values of row `index`, one per column.
impl<C: RawChunk> ReadValueAsJson for DataChunkView<'_, C> {
    fn read_value_as_json(&self, index: usize) -> Result<Json> {
        let row = self
            .columns()?
            .iter()
            .map(|column| column.read_value_as_json(index))
            .collect::<Result<Vec<_>>>()?;
        Ok(Json::Array(row))
    }
}

impl Vector<'_> {
    /// Converts all rows into a JSON array.
    pub fn to_json(&self) -> Result<Json> {
        let values = self
            .values()
            .map(|value| value?.to_json())
            .collect::<Result<Vec<_>>>()?;
        Ok(Json::Array(values))
    }
}

impl<C: RawChunk> DataChunkView<'_, C> {
    /// Converts the chunk into a JSON array of rows, each row an array of
    /// column values.
    pub fn to_json(&self) -> Result<Json> {
        let columns = self.columns()?;
        let rows = (0..self.row_count())
            .map(|row| {
                columns
                    .iter()
                    .map(|column| column.read_value_as_json(row))
                    .collect::<Result<Vec<_>>>()
                    .map(Json::Array)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Json::Array(rows))
    }
}

impl Value<'_> {
    pub fn to_json(&self) -> Result<Json> {
        let json = match self {
            Value::Null => Json::Null,
            Value::Boolean(v) => Json::Bool(*v),
            Value::TinyInt(v) => json!(v),
            Value::SmallInt(v) => json!(v),
            Value::Integer(v) => json!(v),
            Value::BigInt(v) => int_to_json(*v as i128),
            Value::UTinyInt(v) => json!(v),
            Value::USmallInt(v) => json!(v),
            Value::UInteger(v) => json!(v),
            Value::UBigInt(v) => int_to_json(*v as i128),
            Value::Float(v) => float_to_json(*v as f64),
            Value::Double(v) => float_to_json(*v),
            Value::Date(v) => json!(v.days),
            Value::Time(v) => int_to_json(v.micros as i128),
            Value::Timestamp(v) => int_to_json(v.micros as i128),
            Value::TimestampS(v) => int_to_json(v.seconds as i128),
            Value::TimestampMs(v) => int_to_json(v.millis as i128),
            Value::TimestampNs(v) => int_to_json(v.nanos as i128),
            Value::TimestampTz(v) => int_to_json(v.micros as i128),
            Value::Interval(v) => json!({
                "months": v.months,
                "days": v.days,
                "micros": int_to_json(v.micros as i128),
            }),
            Value::TimeTz(v) => Json::String(v.to_string()),
            Value::HugeInt(v) => int_to_json(*v),
            Value::UHugeInt(v) => match i128::try_from(*v) {
                Ok(v) => int_to_json(v),
                Err(_) => Json::String(v.to_string()),
            },
            Value::Uuid(v) => Json::String(v.to_string()),
            Value::Varchar(s) => Json::String(s.to_string()),
            Value::Blob(b) => Json::String(escape_blob(b)),
            Value::Bit(b) => Json::String(b.to_string()),
            Value::Decimal(d) => Json::String(d.to_string()),
            Value::Enum(s) => Json::String(s.to_string()),
            Value::List(v) | Value::Array(v) => v.to_json()?,
            Value::Struct(items) => {
                let mut object = Map::new();
                for item in items {
                    object.insert(item.name.to_string(), item.value.to_json()?);
                }
                Json::Object(object)
            }
            Value::Map(items) => Json::Array(
                items
                    .iter()
                    .map(|item| -> Result<Json> {
                        Ok(json!({
                            "key": item.key.to_json()?,
                            "value": item.value.to_json()?,
                        }))
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            Value::Union(item) => {
                let mut object = Map::new();
                object.insert(item.tag.to_string(), item.value.to_json()?);
                Json::Object(object)
            }
        };
        Ok(json)
    }
}

/// Largest integer magnitude a JSON reader can hold in a double without
/// losing precision.
const MAX_SAFE_INTEGER: i128 = (1 << 53) - 1;

fn int_to_json(value: i128) -> Json {
    if (-MAX_SAFE_INTEGER..=MAX_SAFE_INTEGER).contains(&value) {
        json!(value as i64)
    } else {
        Json::String(value.to_string())
    }
}

fn float_to_json(value: f64) -> Json {
    match serde_json::Number::from_f64(value) {
        Some(n) => Json::Number(n),
        None if value.is_nan() => Json::String("NaN".into()),
        None if value > 0.0 => Json::String("Infinity".into()),
        None => Json::String("-Infinity".into()),
    }
}

/// Renders bytes the way the engine prints a `BLOB`: printable ASCII as
/// is, everything else as `\xNN`.
fn escape_blob(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        if (0x20..0x7f).contains(&b) && b != b'\\' {
            out.push(b as char);
        } else {
            out.push_str(&format!("\\x{b:02X}"));
        }
    }
    out
}
