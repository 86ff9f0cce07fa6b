//! Mesh discovery and raw attribute probing.
//!
//! Setup never validates anything: each attribute of the fixed set is either
//! copied from the mesh variable or recorded as absent.

use super::attributes::MeshAttribute;
use crate::dataset::{AttrValue, Dataset, Variable};
use std::collections::BTreeMap;

/// Attribute that tags a variable's role.
pub const ROLE_ATTRIBUTE: &str = "cf_role";

/// Role value identifying a mesh topology variable.
pub const MESH_TOPOLOGY_ROLE: &str = "mesh_topology";

/// Raw declared attributes of one mesh topology variable.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshState {
    name: String,
    attributes: BTreeMap<MeshAttribute, Option<AttrValue>>,
}

impl MeshState {
    /// Read every attribute of the fixed set from `mesh`.
    pub fn from_variable(mesh: &Variable) -> Self {
        let attributes = MeshAttribute::ALL
            .iter()
            .map(|attr| (*attr, mesh.attribute(attr.name()).cloned()))
            .collect();
        MeshState {
            name: mesh.name.clone(),
            attributes,
        }
    }

    /// Name of the mesh topology variable.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared value of `attr`, `None` when absent.
    pub fn get(&self, attr: MeshAttribute) -> Option<&AttrValue> {
        self.attributes.get(&attr).and_then(Option::as_ref)
    }

    pub fn is_declared(&self, attr: MeshAttribute) -> bool {
        self.get(attr).is_some()
    }

    /// Declared text value of `attr`, `None` when absent or not text.
    pub fn text(&self, attr: MeshAttribute) -> Option<&str> {
        self.get(attr).and_then(AttrValue::as_text)
    }

    /// Every attribute read, declared or not.
    pub fn entries(&self) -> impl Iterator<Item = (MeshAttribute, Option<&AttrValue>)> {
        self.attributes.iter().map(|(k, v)| (*k, v.as_ref()))
    }
}

/// All meshes discovered in one dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshRegistry {
    meshes: Vec<MeshState>,
}

impl MeshRegistry {
    /// Discover mesh topology variables and read their attributes.
    ///
    /// The result depends only on `dataset`; calling this again on another
    /// dataset yields an independent registry.
    pub fn setup(dataset: &dyn Dataset) -> Self {
        let meshes: Vec<MeshState> = dataset
            .variables_by_attribute(ROLE_ATTRIBUTE, MESH_TOPOLOGY_ROLE)
            .into_iter()
            .map(MeshState::from_variable)
            .collect();

        tracing::debug!(
            dataset = dataset.label(),
            meshes = meshes.len(),
            "discovered mesh topology variables"
        );
        for mesh in &meshes {
            let declared = mesh.entries().filter(|(_, v)| v.is_some()).count();
            tracing::debug!(mesh = mesh.name(), declared, "read mesh attributes");
        }

        MeshRegistry { meshes }
    }

    pub fn meshes(&self) -> &[MeshState] {
        &self.meshes
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Mesh state by variable name.
    pub fn get(&self, name: &str) -> Option<&MeshState> {
        self.meshes.iter().find(|m| m.name() == name)
    }
}
