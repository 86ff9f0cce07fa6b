//! Shape and cross-reference validators shared by several rules.
//!
//! These resolve names declared on a mesh (variables, dimensions) against
//! the dataset and compare declared array shapes with what the mesh implies.

use crate::dataset::{Dataset, Dimension, Variable};
use crate::mesh::attributes::MAX_NODES_PER_FACE_DIMENSION;
use crate::mesh::{ConnectivityKind, MeshAttribute, MeshState};
use thiserror::Error;

pub use crate::engine::facts::DimensionOrdering;

/// A name declared on a mesh that does not resolve the way it must.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CrossRefError {
    #[error("Mesh does not declare \"{attribute}\"")]
    Undeclared { attribute: MeshAttribute },

    #[error("\"{attribute}\" must name a variable, found {type_name} \"{value}\"")]
    NotText {
        attribute: MeshAttribute,
        value: String,
        type_name: &'static str,
    },

    #[error("Variable \"{variable}\" named by \"{attribute}\" is not in the dataset")]
    MissingVariable {
        attribute: MeshAttribute,
        variable: String,
    },

    #[error("Variable \"{variable}\" must have 2 dimensions, found {rank}")]
    WrongRank { variable: String, rank: usize },

    #[error("Dimension \"{dimension}\" of variable \"{variable}\" is not defined in the dataset")]
    UnknownDimension { variable: String, dimension: String },

    #[error("Invalid shape {shape} of \"{attribute}\" array, expected {expected}")]
    InvalidShape {
        attribute: MeshAttribute,
        shape: String,
        expected: String,
    },

    #[error("Incorrect shape {shape} of {attribute} array, expected {expected}")]
    UnexpectedShape {
        attribute: MeshAttribute,
        shape: String,
        expected: String,
    },

    #[error("Mesh does not contain {attribute}, required when connectivity in non-standard order")]
    MissingCompanion { attribute: MeshAttribute },

    #[error("{attribute} \"{dimension}\" defined in mesh, not defined in dataset dimensions")]
    DanglingDimension {
        attribute: MeshAttribute,
        dimension: String,
    },

    #[error("Coordinate variable \"{variable}\" listed in {attribute} is not in the dataset")]
    MissingCoordinate {
        attribute: MeshAttribute,
        variable: String,
    },

    #[error("{attribute} should have length of {dimension} ({expected}), \"{variable}\" has length {actual}")]
    CoordinateLength {
        attribute: MeshAttribute,
        variable: String,
        dimension: String,
        expected: usize,
        actual: usize,
    },
}

/// Result of classifying a node connectivity array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeCheck {
    Valid {
        ordering: DimensionOrdering,
        /// Element-count dimension.
        count: Dimension,
        nodes_per_element: usize,
    },
    Invalid(CrossRefError),
    /// Volume arrays resolve but their shape is not classified.
    Unsupported { variable: String },
}

/// Render a shape as `(d1, d2, ...)`.
pub fn format_shape(shape: &[usize]) -> String {
    let parts: Vec<String> = shape.iter().map(usize::to_string).collect();
    format!("({})", parts.join(", "))
}

fn declared_name<'m>(mesh: &'m MeshState, attribute: MeshAttribute) -> Result<&'m str, CrossRefError> {
    let value = mesh
        .get(attribute)
        .ok_or(CrossRefError::Undeclared { attribute })?;
    value
        .as_text()
        .map(str::trim)
        .ok_or_else(|| CrossRefError::NotText {
            attribute,
            value: value.to_string(),
            type_name: value.type_name(),
        })
}

/// Resolve the variable a mesh attribute names.
pub fn resolve_variable<'d>(
    dataset: &'d dyn Dataset,
    mesh: &MeshState,
    attribute: MeshAttribute,
) -> Result<&'d Variable, CrossRefError> {
    let name = declared_name(mesh, attribute)?;
    dataset
        .variable(name)
        .ok_or_else(|| CrossRefError::MissingVariable {
            attribute,
            variable: name.to_string(),
        })
}

/// Name of the element-count dimension for `kind`: the mesh's declared
/// `edge_dimension`/`face_dimension` if it names a dataset dimension,
/// otherwise the conventional default.
pub fn count_dimension_name(dataset: &dyn Dataset, mesh: &MeshState, kind: ConnectivityKind) -> String {
    mesh.text(kind.dimension_attribute())
        .map(str::trim)
        .filter(|name| dataset.dimension(name).is_some())
        .unwrap_or(kind.default_count_dimension())
        .to_string()
}

/// Node widths a connectivity array of `kind` may have.
fn accepted_widths(dataset: &dyn Dataset, kind: ConnectivityKind) -> Vec<usize> {
    let mut widths: Vec<usize> = kind.node_width().into_iter().collect();
    if kind == ConnectivityKind::FaceNode {
        if let Some(max) = dataset.dimension(MAX_NODES_PER_FACE_DIMENSION) {
            if !widths.contains(&max.size) {
                widths.push(max.size);
            }
        }
    }
    widths
}

/// Classify the array named by a node connectivity attribute.
///
/// The array must have two dataset dimensions. Ordering is standard when
/// the element-count dimension comes first and nonstandard when it comes
/// second; the other dimension must have an accepted node width.
pub fn classify_connectivity_shape(
    dataset: &dyn Dataset,
    mesh: &MeshState,
    kind: ConnectivityKind,
) -> ShapeCheck {
    let attribute = kind.attribute();
    let variable = match resolve_variable(dataset, mesh, attribute) {
        Ok(v) => v,
        Err(e) => return ShapeCheck::Invalid(e),
    };

    if kind == ConnectivityKind::VolumeNode {
        return ShapeCheck::Unsupported {
            variable: variable.name.clone(),
        };
    }

    if variable.dimensions.len() != 2 {
        return ShapeCheck::Invalid(CrossRefError::WrongRank {
            variable: variable.name.clone(),
            rank: variable.dimensions.len(),
        });
    }

    let mut dims = Vec::with_capacity(2);
    for name in &variable.dimensions {
        match dataset.dimension(name) {
            Some(d) => dims.push(d),
            None => {
                return ShapeCheck::Invalid(CrossRefError::UnknownDimension {
                    variable: variable.name.clone(),
                    dimension: name.clone(),
                })
            }
        }
    }
    let (first, second) = (dims[0], dims[1]);

    let count_name = count_dimension_name(dataset, mesh, kind);
    let widths = accepted_widths(dataset, kind);

    if first.name == count_name && widths.contains(&second.size) {
        ShapeCheck::Valid {
            ordering: DimensionOrdering::Standard,
            count: first.clone(),
            nodes_per_element: second.size,
        }
    } else if second.name == count_name && widths.contains(&first.size) {
        ShapeCheck::Valid {
            ordering: DimensionOrdering::Nonstandard,
            count: second.clone(),
            nodes_per_element: first.size,
        }
    } else {
        let width = widths
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(" or ");
        ShapeCheck::Invalid(CrossRefError::InvalidShape {
            attribute,
            shape: format!("({}, {})", first.name, second.name),
            expected: format!("({}, {})", count_name, width),
        })
    }
}

/// Companion check for nonstandard ordering: `edge_dimension` or
/// `face_dimension` must be declared and name a dataset dimension.
pub fn check_nonstandard_dimension(
    dataset: &dyn Dataset,
    mesh: &MeshState,
    kind: ConnectivityKind,
) -> Result<Dimension, CrossRefError> {
    let attribute = kind.dimension_attribute();
    let name = match declared_name(mesh, attribute) {
        Err(CrossRefError::Undeclared { .. }) => {
            return Err(CrossRefError::MissingCompanion { attribute })
        }
        other => other?,
    };
    dataset
        .dimension(name)
        .cloned()
        .ok_or_else(|| CrossRefError::DanglingDimension {
            attribute,
            dimension: name.to_string(),
        })
}

/// Check the optional element coordinates of `kind` against the element
/// count. `None` when the mesh declares no such coordinates.
pub fn check_element_coordinates(
    dataset: &dyn Dataset,
    mesh: &MeshState,
    kind: ConnectivityKind,
    count: &Dimension,
) -> Option<Result<(), Vec<CrossRefError>>> {
    let attribute = kind.coordinates_attribute()?;
    mesh.get(attribute)?;

    let names = match declared_name(mesh, attribute) {
        Ok(names) => names,
        Err(e) => return Some(Err(vec![e])),
    };

    let errors: Vec<CrossRefError> = names
        .split_whitespace()
        .filter_map(|name| match dataset.variable(name) {
            None => Some(CrossRefError::MissingCoordinate {
                attribute,
                variable: name.to_string(),
            }),
            Some(v) if v.length() != Some(count.size) => Some(CrossRefError::CoordinateLength {
                attribute,
                variable: name.to_string(),
                dimension: count.name.clone(),
                expected: count.size,
                actual: v.length().unwrap_or(0),
            }),
            Some(_) => None,
        })
        .collect();

    if errors.is_empty() {
        Some(Ok(()))
    } else {
        Some(Err(errors))
    }
}

/// Check that the array named by `attribute` has shape `(count, width)`.
pub fn check_declared_shape(
    dataset: &dyn Dataset,
    mesh: &MeshState,
    attribute: MeshAttribute,
    count: &Dimension,
    width: usize,
) -> Result<(), CrossRefError> {
    let variable = resolve_variable(dataset, mesh, attribute)?;
    if variable.shape == [count.size, width] {
        Ok(())
    } else {
        Err(CrossRefError::UnexpectedShape {
            attribute,
            shape: format_shape(&variable.shape),
            expected: format!("({}={}, {})", count.name, count.size, width),
        })
    }
}
