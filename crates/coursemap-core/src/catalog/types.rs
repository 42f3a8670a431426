//! Core type definitions for the catalog.

use rkyv::{Archive, Deserialize, Serialize};
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Scalar data types a field can map to.
#[derive(
    Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ScalarType {
    /// Boolean value.
    Bool,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// Fixed-precision decimal.
    Decimal {
        /// Total number of digits.
        precision: u8,
        /// Number of digits after decimal point.
        scale: u8,
    },
    /// UTF-8 string.
    String,
    /// Binary data.
    Bytes,
    /// Timestamp (microseconds since Unix epoch).
    Timestamp,
    /// UUID (128-bit identifier).
    Uuid,
}

/// Length limit of a text or binary column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Archive, Serialize, Deserialize, SerdeSerialize, SerdeDeserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum LengthLimit {
    /// At most this many characters (or bytes).
    Bounded(i64),
    /// The largest length the engine supports, e.g. `nvarchar(max)`.
    Unbounded,
}

/// How the engine generates values for a column.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Archive,
    Serialize,
    Deserialize,
    SerdeSerialize,
    SerdeDeserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum GeneratedOption {
    /// Values are always supplied by the application.
    #[default]
    None,
    /// Values are generated on insert.
    Identity,
    /// Values are generated on insert and update.
    Computed,
}

impl ScalarType {
    /// Check if this type is a string-like type.
    pub fn is_string_like(&self) -> bool {
        matches!(self, ScalarType::String | ScalarType::Bytes)
    }
}

impl LengthLimit {
    /// Check if the limit can be represented by a column.
    pub fn is_valid(&self) -> bool {
        match self {
            LengthLimit::Bounded(n) => *n > 0,
            LengthLimit::Unbounded => true,
        }
    }
}
