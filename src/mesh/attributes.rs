//! Static UGRID vocabulary: the mesh attributes the registry reads, the
//! connectivity kinds and the topology dimensions.

use crate::dataset::AttrValue;
use serde::Serialize;
use std::fmt;

/// Attribute set read from every mesh topology variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MeshAttribute {
    TopologyDimension,
    NodeCoordinates,
    EdgeNodeConnectivity,
    FaceNodeConnectivity,
    VolumeNodeConnectivity,
    EdgeCoordinates,
    FaceCoordinates,
    VolumeCoordinates,
    EdgeDimension,
    FaceDimension,
    VolumeDimension,
    EdgeFaceConnectivity,
    FaceEdgeConnectivity,
    FaceFaceConnectivity,
    BoundaryNodeConnectivity,
    Nedges,
    Nfaces,
    VolumeEdgeConnectivity,
    VolumeFaceConnectivity,
    VolumeVolumeConnectivity,
    VolumeShapeType,
}

impl MeshAttribute {
    pub const ALL: [MeshAttribute; 21] = [
        MeshAttribute::TopologyDimension,
        MeshAttribute::NodeCoordinates,
        MeshAttribute::EdgeNodeConnectivity,
        MeshAttribute::FaceNodeConnectivity,
        MeshAttribute::VolumeNodeConnectivity,
        MeshAttribute::EdgeCoordinates,
        MeshAttribute::FaceCoordinates,
        MeshAttribute::VolumeCoordinates,
        MeshAttribute::EdgeDimension,
        MeshAttribute::FaceDimension,
        MeshAttribute::VolumeDimension,
        MeshAttribute::EdgeFaceConnectivity,
        MeshAttribute::FaceEdgeConnectivity,
        MeshAttribute::FaceFaceConnectivity,
        MeshAttribute::BoundaryNodeConnectivity,
        MeshAttribute::Nedges,
        MeshAttribute::Nfaces,
        MeshAttribute::VolumeEdgeConnectivity,
        MeshAttribute::VolumeFaceConnectivity,
        MeshAttribute::VolumeVolumeConnectivity,
        MeshAttribute::VolumeShapeType,
    ];

    /// Attribute name as it appears on the mesh variable.
    pub fn name(self) -> &'static str {
        match self {
            MeshAttribute::TopologyDimension => "topology_dimension",
            MeshAttribute::NodeCoordinates => "node_coordinates",
            MeshAttribute::EdgeNodeConnectivity => "edge_node_connectivity",
            MeshAttribute::FaceNodeConnectivity => "face_node_connectivity",
            MeshAttribute::VolumeNodeConnectivity => "volume_node_connectivity",
            MeshAttribute::EdgeCoordinates => "edge_coordinates",
            MeshAttribute::FaceCoordinates => "face_coordinates",
            MeshAttribute::VolumeCoordinates => "volume_coordinates",
            MeshAttribute::EdgeDimension => "edge_dimension",
            MeshAttribute::FaceDimension => "face_dimension",
            MeshAttribute::VolumeDimension => "volume_dimension",
            MeshAttribute::EdgeFaceConnectivity => "edge_face_connectivity",
            MeshAttribute::FaceEdgeConnectivity => "face_edge_connectivity",
            MeshAttribute::FaceFaceConnectivity => "face_face_connectivity",
            MeshAttribute::BoundaryNodeConnectivity => "boundary_node_connectivity",
            MeshAttribute::Nedges => "nedges",
            MeshAttribute::Nfaces => "nfaces",
            MeshAttribute::VolumeEdgeConnectivity => "volume_edge_connectivity",
            MeshAttribute::VolumeFaceConnectivity => "volume_face_connectivity",
            MeshAttribute::VolumeVolumeConnectivity => "volume_volume_connectivity",
            MeshAttribute::VolumeShapeType => "volume_shape_type",
        }
    }
}

impl fmt::Display for MeshAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Mesh element kinds above nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Edge,
    Face,
    Volume,
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Edge => write!(f, "edge"),
            ElementKind::Face => write!(f, "face"),
            ElementKind::Volume => write!(f, "volume"),
        }
    }
}

/// Name of the optional dataset dimension bounding nodes per face.
pub const MAX_NODES_PER_FACE_DIMENSION: &str = "maxnumnodesperface";

/// Element-to-node connectivity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConnectivityKind {
    EdgeNode,
    FaceNode,
    VolumeNode,
}

impl ConnectivityKind {
    pub const ALL: [ConnectivityKind; 3] = [
        ConnectivityKind::EdgeNode,
        ConnectivityKind::FaceNode,
        ConnectivityKind::VolumeNode,
    ];

    /// Mesh attribute naming the connectivity array.
    pub fn attribute(self) -> MeshAttribute {
        match self {
            ConnectivityKind::EdgeNode => MeshAttribute::EdgeNodeConnectivity,
            ConnectivityKind::FaceNode => MeshAttribute::FaceNodeConnectivity,
            ConnectivityKind::VolumeNode => MeshAttribute::VolumeNodeConnectivity,
        }
    }

    pub fn element(self) -> ElementKind {
        match self {
            ConnectivityKind::EdgeNode => ElementKind::Edge,
            ConnectivityKind::FaceNode => ElementKind::Face,
            ConnectivityKind::VolumeNode => ElementKind::Volume,
        }
    }

    /// Topology dimension for which this connectivity is required.
    pub fn topology_dimension(self) -> TopologyDimension {
        match self {
            ConnectivityKind::EdgeNode => TopologyDimension::One,
            ConnectivityKind::FaceNode => TopologyDimension::Two,
            ConnectivityKind::VolumeNode => TopologyDimension::Three,
        }
    }

    /// Mesh attribute naming the element-count dimension, required when the
    /// connectivity array is stored in nonstandard order.
    pub fn dimension_attribute(self) -> MeshAttribute {
        match self {
            ConnectivityKind::EdgeNode => MeshAttribute::EdgeDimension,
            ConnectivityKind::FaceNode => MeshAttribute::FaceDimension,
            ConnectivityKind::VolumeNode => MeshAttribute::VolumeDimension,
        }
    }

    /// Optional mesh attribute listing element location coordinates.
    pub fn coordinates_attribute(self) -> Option<MeshAttribute> {
        match self {
            ConnectivityKind::EdgeNode => Some(MeshAttribute::EdgeCoordinates),
            ConnectivityKind::FaceNode => Some(MeshAttribute::FaceCoordinates),
            ConnectivityKind::VolumeNode => None,
        }
    }

    /// Element-count dimension name used when the mesh does not declare one.
    pub fn default_count_dimension(self) -> &'static str {
        match self {
            ConnectivityKind::EdgeNode => "nedges",
            ConnectivityKind::FaceNode => "nfaces",
            ConnectivityKind::VolumeNode => "nvolumes",
        }
    }

    /// Fixed node width of the connectivity array, if there is one.
    pub fn node_width(self) -> Option<usize> {
        match self {
            ConnectivityKind::EdgeNode => Some(2),
            ConnectivityKind::FaceNode => Some(3),
            ConnectivityKind::VolumeNode => None,
        }
    }
}

impl fmt::Display for ConnectivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.attribute().name())
    }
}

/// Validated `topology_dimension` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TopologyDimension {
    One,
    Two,
    Three,
}

impl TopologyDimension {
    /// Accepts the whole numbers 1, 2 and 3, stored as integers or floats.
    pub fn from_value(value: &AttrValue) -> Option<Self> {
        match value.as_whole_number()? {
            1 => Some(TopologyDimension::One),
            2 => Some(TopologyDimension::Two),
            3 => Some(TopologyDimension::Three),
            _ => None,
        }
    }

    pub fn as_usize(self) -> usize {
        match self {
            TopologyDimension::One => 1,
            TopologyDimension::Two => 2,
            TopologyDimension::Three => 3,
        }
    }

    /// Connectivity that a mesh of this dimension must declare.
    pub fn required_connectivity(self) -> ConnectivityKind {
        match self {
            TopologyDimension::One => ConnectivityKind::EdgeNode,
            TopologyDimension::Two => ConnectivityKind::FaceNode,
            TopologyDimension::Three => ConnectivityKind::VolumeNode,
        }
    }
}

impl fmt::Display for TopologyDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_usize())
    }
}
