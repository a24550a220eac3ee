//! A single table cell.

use std::borrow::Cow;
use std::sync::Arc;

use crate::Geometry;
use crate::geometry::geometry_size_bytes;
use crate::strings::equivalent;

/// Dynamically typed cell value.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Text(String),
    Integer(i64),
    Double(f64),
    Geometry(Arc<Geometry>),
}

impl Value {
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view of the value.  Text is parsed after trimming.
    pub fn to_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Double(d)  => Some(*d),
            Value::Text(s)    => s.trim().parse::<f64>().ok(),
            Value::Null | Value::Geometry(_) => None,
        }
    }

    /// Textual view of the value.  Geometry and null have none.
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Value::Text(s)    => Some(Cow::Borrowed(s)),
            Value::Integer(i) => Some(Cow::Owned(i.to_string())),
            Value::Double(d)  => Some(Cow::Owned(d.to_string())),
            Value::Null | Value::Geometry(_) => None,
        }
    }

    pub fn as_geometry(&self) -> Option<&Arc<Geometry>> {
        match self {
            Value::Geometry(g) => Some(g),
            _ => None,
        }
    }

    /// Equality test against a search string, as used by table lookups.
    ///
    /// Text compares by standard form; numbers compare after parsing the
    /// search string.
    pub fn matches(&self, search: &str) -> bool {
        match self {
            Value::Text(s)    => equivalent(s, search),
            Value::Integer(i) => search.trim().parse::<i64>().is_ok_and(|v| v == *i),
            Value::Double(d)  => search.trim().parse::<f64>().is_ok_and(|v| v == *d),
            Value::Null | Value::Geometry(_) => false,
        }
    }

    /// Rough in-memory footprint used for cache accounting.
    pub fn estimated_size_bytes(&self) -> usize {
        let base = std::mem::size_of::<Value>();
        match self {
            Value::Text(s)     => base + s.len(),
            Value::Geometry(g) => base + geometry_size_bytes(g),
            _                  => base,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Value::Double(d)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<Geometry> for Value {
    fn from(g: Geometry) -> Self {
        Value::Geometry(Arc::new(g))
    }
}
