//! OpenGL Shaders
//!
//! This module defines the [`Shader`] and [`ShaderProgram`] structs for managing OpenGL shaders.
//! Uniform locations are reflected once when a program is linked, and values are written
//! through the [`Uniform`] trait.

use std::{collections::HashMap, fmt, sync::Arc};

use glam::Mat4;
use glow::HasContext;
use thiserror::Error;

/// The programmable pipeline stage a [`Shader`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn gl_enum(self) -> u32 {
        match self {
            ShaderStage::Vertex => glow::VERTEX_SHADER,
            ShaderStage::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("failed to create {stage} shader object: {reason}")]
    Create { stage: ShaderStage, reason: String },

    #[error("failed to compile {stage} shader:\n{log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("failed to create program object: {0}")]
    CreateProgram(String),

    #[error("failed to link shader program:\n{0}")]
    Link(String),
}

/// Represents an individual OpenGL shader.
pub struct Shader {
    gl: Arc<glow::Context>,
    id: glow::Shader,
}

impl Shader {
    /// Compiles a new shader from the given source code.
    ///
    /// On failure the shader object is deleted and the driver's info log is returned.
    pub fn new(gl: &Arc<glow::Context>, stage: ShaderStage, source: &str) -> Result<Self, ShaderError> {
        unsafe {
            let shader = gl
                .create_shader(stage.gl_enum())
                .map_err(|reason| ShaderError::Create { stage, reason })?;
            gl.shader_source(shader, source);
            gl.compile_shader(shader);

            if !gl.get_shader_compile_status(shader) {
                let log = gl.get_shader_info_log(shader);
                gl.delete_shader(shader);
                return Err(ShaderError::Compile { stage, log });
            }

            Ok(Self {
                gl: Arc::clone(gl),
                id: shader,
            })
        }
    }

}

impl Drop for Shader {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_shader(self.id);
        }
    }
}

/// Represents a value that can be written to a uniform location.
pub trait Uniform {
    /// Writes the value to `location` of the currently bound program.
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation);
}

impl Uniform for i32 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_1_i32(Some(location), *self);
        }
    }
}

impl Uniform for f32 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_1_f32(Some(location), *self);
        }
    }
}

impl Uniform for Mat4 {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        unsafe {
            gl.uniform_matrix_4_f32_slice(Some(location), false, self.as_ref());
        }
    }
}

impl<T: Uniform> Uniform for &T {
    fn set_uniform(&self, gl: &glow::Context, location: &glow::UniformLocation) {
        (*self).set_uniform(gl, location);
    }
}

/// Array uniforms are reported as `name[0]`; they are stored under their bare name.
fn uniform_base_name(name: &str) -> &str {
    name.strip_suffix("[0]").unwrap_or(name)
}

/// Name to location map of a linked program's active uniforms.
#[derive(Debug, Default)]
pub struct UniformLocations {
    locations: HashMap<String, glow::UniformLocation>,
}

impl UniformLocations {
    fn reflect(gl: &glow::Context, program: glow::Program) -> Self {
        let mut locations = HashMap::new();
        unsafe {
            let count = gl.get_active_uniforms(program);
            for index in 0..count {
                let Some(active) = gl.get_active_uniform(program, index) else {
                    continue;
                };
                let name = uniform_base_name(&active.name);
                if let Some(location) = gl.get_uniform_location(program, name) {
                    locations.insert(name.to_string(), location);
                }
            }
        }
        Self { locations }
    }

    pub fn get(&self, name: &str) -> Option<&glow::UniformLocation> {
        self.locations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.locations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }
}

/// Represents an OpenGL shader program composed of multiple shaders.
pub struct ShaderProgram {
    gl: Arc<glow::Context>,
    id: glow::Program,
    uniforms: UniformLocations,
}

impl ShaderProgram {
    /// Links a new shader program from the given shaders and caches its uniform locations.
    pub fn new(gl: &Arc<glow::Context>, shaders: &[&Shader]) -> Result<Self, ShaderError> {
        unsafe {
            let program = gl.create_program().map_err(ShaderError::CreateProgram)?;

            for shader in shaders {
                gl.attach_shader(program, shader.id);
            }

            gl.link_program(program);

            if !gl.get_program_link_status(program) {
                let log = gl.get_program_info_log(program);
                gl.delete_program(program);
                return Err(ShaderError::Link(log));
            }

            for shader in shaders {
                gl.detach_shader(program, shader.id);
            }

            let uniforms = UniformLocations::reflect(gl, program);
            log::debug!("Linked shader program with {} active uniforms", uniforms.len());

            Ok(Self {
                gl: Arc::clone(gl),
                id: program,
                uniforms,
            })
        }
    }

    /// Logs a warning for each name the linker did not keep as an active uniform.
    ///
    /// The driver strips uniforms the shaders never read, so this is not an error.
    pub fn check_uniforms(&self, names: &[&str]) {
        for name in names {
            if !self.uniforms.contains(name) {
                log::warn!("Uniform `{name}` is not active in the linked program");
            }
        }
    }

    /// Binds the shader program for use.
    pub fn use_program(&self) {
        unsafe {
            self.gl.use_program(Some(self.id));
        }
    }

    /// Sets a uniform variable in the shader program. Inactive names are skipped.
    pub fn set_uniform<T: Uniform>(&self, name: &str, value: T) {
        if let Some(location) = self.uniforms.get(name) {
            value.set_uniform(&self.gl, location);
        }
    }
}

impl Drop for ShaderProgram {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_program(self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn array_uniforms_are_keyed_by_base_name() {
        assert_eq!(uniform_base_name("lights[0]"), "lights");
        assert_eq!(uniform_base_name("mixRatio"), "mixRatio");
        assert_eq!(uniform_base_name("grid[0][0]"), "grid[0]");
    }

    #[test]
    fn compile_errors_name_the_stage() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            log: "0:3: syntax error".to_string(),
        };
        let message = err.to_string();
        assert!(message.starts_with("failed to compile fragment shader"));
        assert!(message.ends_with("0:3: syntax error"));
    }

    #[test]
    fn stages_map_to_gl_enums() {
        assert_eq!(ShaderStage::Vertex.gl_enum(), glow::VERTEX_SHADER);
        assert_eq!(ShaderStage::Fragment.gl_enum(), glow::FRAGMENT_SHADER);
    }
}
