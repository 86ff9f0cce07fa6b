//! Dataset abstraction layer.
//!
//! The rule engine never opens files. It reads an already-open dataset through
//! the [`Dataset`] trait, which exposes exactly what the checks need:
//! - dimension lookup by name
//! - variable lookup by name (shape, dimension names, attributes)
//! - attribute-based variable search
//!
//! [`memory::MemoryDataset`] is the bundled implementation, built either in
//! code or from a JSON description of a dataset header.

pub mod memory;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub use memory::MemoryDataset;

/// A named attribute value as stored on a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Int(i64),
    Float(f64),
    Text(String),
    Ints(Vec<i64>),
    Floats(Vec<f64>),
}

impl AttrValue {
    /// Text content, if this is a text attribute.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integer content. Single-element integer arrays are treated as scalars,
    /// which is how most readers surface scalar netCDF attributes.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            AttrValue::Ints(values) if values.len() == 1 => Some(values[0]),
            _ => None,
        }
    }

    /// Whole-number content of an integer or integral float attribute.
    /// Writers often store counts and dimensions as doubles, so `2.0`
    /// reads as 2 and `2.5` does not read at all.
    pub fn as_whole_number(&self) -> Option<i64> {
        let x = match self {
            AttrValue::Float(x) => *x,
            AttrValue::Floats(values) if values.len() == 1 => values[0],
            other => return other.as_int(),
        };
        // 2^53 bounds the exactly representable integers
        (x.fract() == 0.0 && x.abs() <= 9_007_199_254_740_992.0).then_some(x as i64)
    }

    /// Short type name used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            AttrValue::Int(_) => "int",
            AttrValue::Float(_) => "float",
            AttrValue::Text(_) => "str",
            AttrValue::Ints(_) => "int array",
            AttrValue::Floats(_) => "float array",
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Int(i) => write!(f, "{}", i),
            AttrValue::Float(x) => write!(f, "{:?}", x),
            AttrValue::Text(s) => write!(f, "{}", s),
            AttrValue::Ints(values) => write_list(f, values),
            AttrValue::Floats(values) => {
                let rendered: Vec<String> = values.iter().map(|x| format!("{:?}", x)).collect();
                write_list(f, &rendered)
            }
        }
    }
}

fn write_list<T: fmt::Display>(f: &mut fmt::Formatter<'_>, values: &[T]) -> fmt::Result {
    write!(f, "[")?;
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", value)?;
    }
    write!(f, "]")
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

/// A named dataset dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Dimension {
    pub name: String,
    pub size: usize,
}

impl Dimension {
    pub fn new(name: impl Into<String>, size: usize) -> Self {
        Dimension {
            name: name.into(),
            size,
        }
    }
}

/// A dataset variable: its dimension names, the matching sizes, and its
/// attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub dimensions: Vec<String>,
    pub shape: Vec<usize>,
    pub attributes: BTreeMap<String, AttrValue>,
}

impl Variable {
    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Number of dimensions.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Size of the first dimension; `None` for scalar variables.
    pub fn length(&self) -> Option<usize> {
        self.shape.first().copied()
    }
}

/// Read-only view of an opened dataset.
///
/// Implementations must be immutable for the duration of a check run. The
/// `Send + Sync` bound lets the orchestrator share one dataset across mesh
/// worker threads.
pub trait Dataset: Send + Sync {
    /// Dimension by name.
    fn dimension(&self, name: &str) -> Option<&Dimension>;

    /// Variable by name.
    fn variable(&self, name: &str) -> Option<&Variable>;

    /// All variables carrying a text attribute `attribute` exactly equal to
    /// `value`, in a stable order.
    fn variables_by_attribute(&self, attribute: &str, value: &str) -> Vec<&Variable>;

    /// Human-readable label for reports.
    fn label(&self) -> &str {
        "dataset"
    }
}
