pub mod adjacency;
pub mod mesh_data;
pub mod weld;

pub use adjacency::{
    build_adjacency,
    find_edge_neighbors,
    AdjacencyError,
    EdgeNeighbor,
    OpenEdge,
    OpenEdgePolicy,
    ADJACENCY_GROUP,
};
pub use mesh_data::MeshData;
pub use weld::{ PositionKey, WeldMap };
