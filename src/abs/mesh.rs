//! Mesh management module.
//!
//! This module defines the [`Mesh`] struct for managing mesh data on the GPU side.
//! Vertices should implement the [`Vertex`] trait.

use std::sync::Arc;

use glow::HasContext;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("failed to create {object}: {reason}")]
pub struct MeshError {
    object: &'static str,
    reason: String,
}

/// Trait that defines the necessary methods for a vertex.
pub trait Vertex: Copy {
    /// Sets up the vertex attribute pointers for the vertex.
    fn vertex_attribs(gl: &glow::Context);
}

/// Views a vertex slice as the bytes uploaded to the buffer.
fn vertex_bytes<V: Vertex>(vertices: &[V]) -> &[u8] {
    unsafe {
        std::slice::from_raw_parts(vertices.as_ptr() as *const u8, std::mem::size_of_val(vertices))
    }
}

/// Represents a non-indexed mesh stored on the GPU side.
pub struct Mesh {
    gl: Arc<glow::Context>,
    draw_mode: u32,
    vao: glow::VertexArray,
    vbo: glow::Buffer,
    vertex_count: usize,
}

impl Mesh {
    /// Uploads `vertices` once into a static buffer.
    pub fn new<V: Vertex>(gl: &Arc<glow::Context>, vertices: &[V], draw_mode: u32) -> Result<Self, MeshError> {
        unsafe {
            let vao = gl.create_vertex_array().map_err(|reason| MeshError {
                object: "vertex array",
                reason,
            })?;
            let vbo = match gl.create_buffer() {
                Ok(vbo) => vbo,
                Err(reason) => {
                    gl.delete_vertex_array(vao);
                    return Err(MeshError {
                        object: "vertex buffer",
                        reason,
                    });
                }
            };

            gl.bind_vertex_array(Some(vao));
            gl.bind_buffer(glow::ARRAY_BUFFER, Some(vbo));
            gl.buffer_data_u8_slice(glow::ARRAY_BUFFER, vertex_bytes(vertices), glow::STATIC_DRAW);

            V::vertex_attribs(gl);

            gl.bind_vertex_array(None);
            gl.bind_buffer(glow::ARRAY_BUFFER, None);

            Ok(Self {
                gl: Arc::clone(gl),
                draw_mode,
                vao,
                vbo,
                vertex_count: vertices.len(),
            })
        }
    }

    /// Draws the mesh.
    pub fn draw(&self) {
        unsafe {
            self.gl.bind_vertex_array(Some(self.vao));
            self.gl.draw_arrays(self.draw_mode, 0, self.vertex_count as i32);
            self.gl.bind_vertex_array(None);
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }
}

impl Drop for Mesh {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_buffer(self.vbo);
            self.gl.delete_vertex_array(self.vao);
        }
    }
}
