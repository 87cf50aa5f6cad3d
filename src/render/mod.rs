//! Everything drawn on screen: the cube geometry and the three textured instances.

pub mod cube;
pub mod scene;
