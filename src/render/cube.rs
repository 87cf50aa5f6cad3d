//! Geometry of the unit cube shared by every instance.

use glam::{Vec2, Vec3};

use crate::abs::Vertex;

/// Number of floats per vertex: position (3) followed by texture coordinates (2).
pub const FLOATS_PER_VERTEX: usize = 5;

/// Vertices in the cube's triangle list.
pub const CUBE_VERTEX_COUNT: usize = 36;

#[rustfmt::skip]
const CUBE_VERTICES: [f32; CUBE_VERTEX_COUNT * FLOATS_PER_VERTEX] = [
    // back
    -0.5, -0.5, -0.5,  0.0, 0.0,
     0.5, -0.5, -0.5,  1.0, 0.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
    -0.5,  0.5, -0.5,  0.0, 1.0,
    -0.5, -0.5, -0.5,  0.0, 0.0,
    // front
    -0.5, -0.5,  0.5,  0.0, 0.0,
     0.5, -0.5,  0.5,  1.0, 0.0,
     0.5,  0.5,  0.5,  1.0, 1.0,
     0.5,  0.5,  0.5,  1.0, 1.0,
    -0.5,  0.5,  0.5,  0.0, 1.0,
    -0.5, -0.5,  0.5,  0.0, 0.0,
    // left
    -0.5,  0.5,  0.5,  1.0, 0.0,
    -0.5,  0.5, -0.5,  1.0, 1.0,
    -0.5, -0.5, -0.5,  0.0, 1.0,
    -0.5, -0.5, -0.5,  0.0, 1.0,
    -0.5, -0.5,  0.5,  0.0, 0.0,
    -0.5,  0.5,  0.5,  1.0, 0.0,
    // right
     0.5,  0.5,  0.5,  1.0, 0.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
     0.5, -0.5, -0.5,  0.0, 1.0,
     0.5, -0.5, -0.5,  0.0, 1.0,
     0.5, -0.5,  0.5,  0.0, 0.0,
     0.5,  0.5,  0.5,  1.0, 0.0,
    // bottom
    -0.5, -0.5, -0.5,  0.0, 1.0,
     0.5, -0.5, -0.5,  1.0, 1.0,
     0.5, -0.5,  0.5,  1.0, 0.0,
     0.5, -0.5,  0.5,  1.0, 0.0,
    -0.5, -0.5,  0.5,  0.0, 0.0,
    -0.5, -0.5, -0.5,  0.0, 1.0,
    // top
    -0.5,  0.5, -0.5,  0.0, 1.0,
     0.5,  0.5, -0.5,  1.0, 1.0,
     0.5,  0.5,  0.5,  1.0, 0.0,
     0.5,  0.5,  0.5,  1.0, 0.0,
    -0.5,  0.5,  0.5,  0.0, 0.0,
    -0.5,  0.5, -0.5,  0.0, 1.0,
];

#[derive(Clone, Copy, Debug, PartialEq)]
#[repr(C)]
pub struct CubeVertex {
    pub position: Vec3,
    pub tex_coord: Vec2,
}

impl Vertex for CubeVertex {
    fn vertex_attribs(gl: &glow::Context) {
        use glow::HasContext;

        unsafe {
            let stride = std::mem::size_of::<CubeVertex>() as i32;

            // Position attribute
            gl.enable_vertex_attrib_array(0);
            gl.vertex_attrib_pointer_f32(0, 3, glow::FLOAT, false, stride, 0);

            // Texture coordinate attribute
            gl.enable_vertex_attrib_array(1);
            gl.vertex_attrib_pointer_f32(1, 2, glow::FLOAT, false, stride, size_of::<Vec3>() as i32);
        }
    }
}

/// Builds the 36-vertex triangle list of a unit cube centered on the origin.
pub fn cube_vertices() -> Vec<CubeVertex> {
    CUBE_VERTICES
        .chunks_exact(FLOATS_PER_VERTEX)
        .map(|v| CubeVertex {
            position: Vec3::new(v[0], v[1], v[2]),
            tex_coord: Vec2::new(v[3], v[4]),
        })
        .collect()
}
