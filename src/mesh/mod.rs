//! Mesh vocabulary and the mesh registry.

pub mod attributes;
pub mod registry;

pub use attributes::{ConnectivityKind, ElementKind, MeshAttribute, TopologyDimension};
pub use registry::{MeshRegistry, MeshState};
