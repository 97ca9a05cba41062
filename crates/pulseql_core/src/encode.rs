//! Row values and their textual and JSON encodings.

use std::fmt;

use async_sqlite::rusqlite::types::ValueRef;
use serde::de::{self, Deserialize, Deserializer, Visitor};
use serde::ser::{Error as _, Serialize, Serializer};

use crate::errors::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Rows are handed back as is.
    #[default]
    Native,
    /// Rows are serialized as a JSON array of arrays.
    Json,
}

/// A single column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

pub type Row = Vec<Value>;

impl From<ValueRef<'_>> for Value {
    fn from(v: ValueRef<'_>) -> Self {
        match v {
            ValueRef::Null => Value::Null,
            ValueRef::Integer(i) => Value::Integer(i),
            ValueRef::Real(f) => Value::Real(f),
            ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => Value::Blob(b.to_vec()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Real(r) => write!(f, "{r:?}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Blob(b) => {
                write!(f, "X'")?;
                for byte in b {
                    write!(f, "{byte:02X}")?;
                }
                write!(f, "'")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Real(r) if r.is_finite() => serializer.serialize_f64(*r),
            Value::Real(r) => Err(S::Error::custom(format!(
                "non-finite real {r} is not JSON serializable"
            ))),
            Value::Text(s) => serializer.serialize_str(s),
            Value::Blob(_) => Err(S::Error::custom("binary values are not JSON serializable")),
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ValueVisitor;

        impl Visitor<'_> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("null, a number, or a string")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E: de::Error>(self) -> Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Value, E> {
                Ok(Value::Integer(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Value, E> {
                i64::try_from(v)
                    .map(Value::Integer)
                    .map_err(|_| E::custom(format!("integer out of range: {v}")))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Value, E> {
                Ok(Value::Real(v))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Value, E> {
                Ok(Value::Text(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Value, E> {
                Ok(Value::Text(v))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

/// Result of a single execution, in the requested output format.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutput {
    Rows(Vec<Row>),
    /// JSON document, an array of arrays.
    Json(String),
}

impl QueryOutput {
    pub fn encode(rows: Vec<Row>, format: OutputFormat) -> Result<Self> {
        match format {
            OutputFormat::Native => Ok(QueryOutput::Rows(rows)),
            OutputFormat::Json => Ok(QueryOutput::Json(serde_json::to_string(&rows)?)),
        }
    }

    /// Rows, decoding the JSON document if needed.
    pub fn into_rows(self) -> Result<Vec<Row>> {
        match self {
            QueryOutput::Rows(rows) => Ok(rows),
            QueryOutput::Json(s) => Ok(serde_json::from_str(&s)?),
        }
    }

    /// Rendering for interactive display. JSON is pretty printed.
    pub fn to_pretty_string(&self) -> Result<String> {
        match self {
            QueryOutput::Rows(_) => Ok(self.to_string()),
            QueryOutput::Json(s) => {
                let doc: serde_json::Value = serde_json::from_str(s)?;
                Ok(serde_json::to_string_pretty(&doc)?)
            }
        }
    }
}

/// One row per line, values separated by `|`.
impl fmt::Display for QueryOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryOutput::Rows(rows) => {
                for (idx, row) in rows.iter().enumerate() {
                    if idx > 0 {
                        writeln!(f)?;
                    }
                    for (col, value) in row.iter().enumerate() {
                        if col > 0 {
                            write!(f, "|")?;
                        }
                        write!(f, "{value}")?;
                    }
                }
                Ok(())
            }
            QueryOutput::Json(s) => write!(f, "{s}"),
        }
    }
}
