//! Field value types for comment records.
//!
//! Cells read from tabular input are text unless they hold a conventional
//! missing-value marker, which reads as [`FieldValue::Null`]. Numeric and
//! boolean values only appear in records built in code.
//!
//! ```
//! use comment_risk::dataset::field_value::FieldValue;
//!
//! assert_eq!(FieldValue::from_cell("hello"), FieldValue::Text("hello".to_string()));
//! assert_eq!(FieldValue::from_cell("007"), FieldValue::Text("007".to_string()));
//! assert_eq!(FieldValue::from_cell("NaN"), FieldValue::Null);
//! assert_eq!(FieldValue::Integer(42).as_text(), None);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Cell contents treated as missing values.
const NULL_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Represents the value of a single column in a comment record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text value
    Text(String),
    /// Integer value
    Integer(i64),
    /// Floating point value
    Float(f64),
    /// Boolean value
    Boolean(bool),
    /// Missing value
    Null,
}

impl FieldValue {
    /// Interpret a raw CSV cell. Missing-value markers become
    /// [`FieldValue::Null`]; every other cell is kept as text, so `007` or
    /// `1e3` in a comment column is not turned into a number.
    pub fn from_cell(raw: &str) -> Self {
        if NULL_MARKERS.contains(&raw) {
            FieldValue::Null
        } else {
            FieldValue::Text(raw.to_string())
        }
    }

    /// Convert to text if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Check if this is a missing value.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl fmt::Display for FieldValue {
    /// Renders the value as a CSV cell for records that were not read from
    /// a file. Null renders as an empty cell.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Boolean(b) => f.write_str(if *b { "True" } else { "False" }),
            FieldValue::Null => Ok(()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}
