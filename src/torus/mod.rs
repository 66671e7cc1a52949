//! Torus mesh with audio-reactive simplex-noise displacement.

mod deform;
mod mesh;

// Re-export public types
pub use deform::{Displacer, Drive};
pub use mesh::{TorusMesh, Vertex};
