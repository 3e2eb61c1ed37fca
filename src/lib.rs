//! Hard shadows for triangle meshes with zfail stencil shadow volumes.
//!
//! Meshes are welded, expanded to `GL_TRIANGLES_ADJACENCY` element lists
//! for silhouette extrusion in a geometry shader, and drawn by a fixed
//! four-stage pass sequence (depth fill, stencil accumulation, masked
//! lighting, restore).

pub mod app;
pub mod engine;
