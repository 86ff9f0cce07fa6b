//! In-memory dataset.
//!
//! Holds dimensions and variables in name-ordered maps. Datasets are built
//! either in code (builder methods) or from a JSON description of a dataset
//! header:
//!
//! ```json
//! {
//!   "name": "triangles.nc",
//!   "dimensions": { "nnodes": 4, "nfaces": 2, "three": 3 },
//!   "variables": {
//!     "mesh": { "attributes": { "cf_role": "mesh_topology", "topology_dimension": 2 } },
//!     "nv": { "dimensions": ["nfaces", "three"] }
//!   }
//! }
//! ```

use super::{AttrValue, Dataset, Dimension, Variable};
use crate::UgridError;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

/// A dataset held entirely in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryDataset {
    name: String,
    dimensions: BTreeMap<String, Dimension>,
    variables: BTreeMap<String, Variable>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DatasetDocument {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    dimensions: BTreeMap<String, usize>,
    #[serde(default)]
    variables: BTreeMap<String, VariableDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct VariableDocument {
    #[serde(default)]
    dimensions: Vec<String>,
    #[serde(default)]
    attributes: BTreeMap<String, AttrValue>,
}

impl MemoryDataset {
    /// Create an empty dataset
    pub fn new(name: impl Into<String>) -> Self {
        MemoryDataset {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Parse a JSON dataset description.
    ///
    /// Every dimension a variable references must be declared; the variable's
    /// shape is derived from those dimension sizes.
    pub fn from_json_str(json: &str, context: &str) -> Result<Self, UgridError> {
        let document: DatasetDocument =
            serde_json::from_str(json).map_err(|source| UgridError::Parse {
                context: context.to_string(),
                source,
            })?;

        let mut dataset = MemoryDataset::new(document.name.unwrap_or_else(|| context.to_string()));
        for (name, size) in document.dimensions {
            dataset.add_dimension(name, size);
        }
        for (name, variable) in document.variables {
            dataset.add_variable(name, variable.dimensions, variable.attributes)?;
        }

        tracing::debug!(
            dataset = %dataset.name,
            dimensions = dataset.dimensions.len(),
            variables = dataset.variables.len(),
            "loaded dataset description"
        );
        Ok(dataset)
    }

    /// Read and parse a JSON dataset description from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, UgridError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| UgridError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&content, &path.display().to_string())
    }

    /// Add or replace a dimension.
    pub fn add_dimension(&mut self, name: impl Into<String>, size: usize) {
        let name = name.into();
        self.dimensions.insert(name.clone(), Dimension::new(name, size));
    }

    /// Add or replace a variable. Fails if a referenced dimension is unknown.
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        dimensions: Vec<String>,
        attributes: BTreeMap<String, AttrValue>,
    ) -> Result<(), UgridError> {
        let name = name.into();
        let mut shape = Vec::with_capacity(dimensions.len());
        for dim in &dimensions {
            match self.dimensions.get(dim) {
                Some(d) => shape.push(d.size),
                None => {
                    return Err(UgridError::UnknownDimension {
                        variable: name,
                        dimension: dim.clone(),
                    })
                }
            }
        }
        self.variables.insert(
            name.clone(),
            Variable {
                name,
                dimensions,
                shape,
                attributes,
            },
        );
        Ok(())
    }

    /// Builder form of [`add_dimension`](Self::add_dimension).
    pub fn with_dimension(mut self, name: &str, size: usize) -> Self {
        self.add_dimension(name, size);
        self
    }

    /// Builder form of [`add_variable`](Self::add_variable).
    ///
    /// Unlike `add_variable` this accepts dimension names the dataset does
    /// not declare, recording size 0 for them, so fixtures can model dangling
    /// references.
    pub fn with_variable(mut self, name: &str, dimensions: &[&str], attributes: &[(&str, AttrValue)]) -> Self {
        let shape = dimensions
            .iter()
            .map(|d| match self.dimensions.get(*d) {
                Some(dim) => dim.size,
                None => {
                    tracing::warn!(variable = name, dimension = *d, "variable references undeclared dimension");
                    0
                }
            })
            .collect();
        self.variables.insert(
            name.to_string(),
            Variable {
                name: name.to_string(),
                dimensions: dimensions.iter().map(|d| d.to_string()).collect(),
                shape,
                attributes: attributes
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
            },
        );
        self
    }

    /// Set an attribute on an existing variable. Returns false if the
    /// variable does not exist.
    pub fn set_attribute(&mut self, variable: &str, name: &str, value: impl Into<AttrValue>) -> bool {
        match self.variables.get_mut(variable) {
            Some(var) => {
                var.attributes.insert(name.to_string(), value.into());
                true
            }
            None => false,
        }
    }

    /// Remove an attribute from a variable, returning its previous value.
    pub fn remove_attribute(&mut self, variable: &str, name: &str) -> Option<AttrValue> {
        self.variables
            .get_mut(variable)
            .and_then(|var| var.attributes.remove(name))
    }

    /// Remove a variable, returning it.
    pub fn remove_variable(&mut self, name: &str) -> Option<Variable> {
        self.variables.remove(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Iterate over all variables in name order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.variables.values()
    }

    /// Iterate over all dimensions in name order.
    pub fn dimensions(&self) -> impl Iterator<Item = &Dimension> {
        self.dimensions.values()
    }
}

impl Dataset for MemoryDataset {
    fn dimension(&self, name: &str) -> Option<&Dimension> {
        self.dimensions.get(name)
    }

    fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    fn variables_by_attribute(&self, attribute: &str, value: &str) -> Vec<&Variable> {
        self.variables
            .values()
            .filter(|v| v.attribute(attribute).and_then(AttrValue::as_text) == Some(value))
            .collect()
    }

    fn label(&self) -> &str {
        &self.name
    }
}
