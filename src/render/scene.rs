//! The three spinning cubes and the renderer that draws them.

use std::sync::Arc;

use glam::{Mat4, Vec3};
use glow::HasContext;

use crate::abs::{Mesh, MeshError, ShaderProgram, Texture, bind_texture_unit};
use crate::render::cube::cube_vertices;

/// Mix ratio sent with every draw; only [`TextureMix::Blend`] reads it.
pub const DEFAULT_MIX_RATIO: f32 = 0.4;

/// Uniforms the cube program is expected to expose.
pub const CUBE_UNIFORMS: [&str; 7] = [
    "model",
    "view",
    "projection",
    "mode",
    "mixRatio",
    "myTexture1",
    "myTexture2",
];

/// How the fragment shader combines the two bound textures.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TextureMix {
    /// Texture unit 0 only.
    First,
    /// Texture unit 1 only.
    Second,
    /// `mix(first, second, ratio)`.
    Blend(f32),
}

impl TextureMix {
    /// Value of the `mode` uniform selecting this branch in the fragment shader.
    pub fn mode(self) -> i32 {
        match self {
            TextureMix::First => 0,
            TextureMix::Second => 1,
            TextureMix::Blend(_) => 2,
        }
    }

    /// Value of the `mixRatio` uniform.
    pub fn ratio(self) -> f32 {
        match self {
            TextureMix::Blend(ratio) => ratio,
            TextureMix::First | TextureMix::Second => DEFAULT_MIX_RATIO,
        }
    }
}

/// One cube on screen, spinning about `axis` at a constant rate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubeInstance {
    pub offset: Vec3,
    pub axis: Vec3,
    pub degrees_per_second: f32,
    pub mix: TextureMix,
}

impl CubeInstance {
    /// Model matrix `time` seconds after startup.
    pub fn model(&self, time: f32) -> Mat4 {
        let angle = (time * self.degrees_per_second).to_radians();
        Mat4::from_translation(self.offset) * Mat4::from_axis_angle(self.axis.normalize(), angle)
    }
}

pub const CUBES: [CubeInstance; 3] = [
    CubeInstance {
        offset: Vec3::ZERO,
        axis: Vec3::new(0.5, 1.0, 0.0),
        degrees_per_second: 50.0,
        mix: TextureMix::Blend(DEFAULT_MIX_RATIO),
    },
    CubeInstance {
        offset: Vec3::new(1.5, 0.0, 0.0),
        axis: Vec3::new(1.0, 0.5, 0.0),
        degrees_per_second: 120.0,
        mix: TextureMix::First,
    },
    CubeInstance {
        offset: Vec3::new(-1.5, 0.0, 0.0),
        axis: Vec3::new(1.0, 0.5, 1.0),
        degrees_per_second: 45.0,
        mix: TextureMix::Second,
    },
];

/// Per-frame camera matrices.
pub struct FrameUniforms {
    pub view: Mat4,
    pub projection: Mat4,
}

/// Owns the cube program, mesh and both texture slots.
pub struct CubeRenderer {
    gl: Arc<glow::Context>,
    program: ShaderProgram,
    mesh: Mesh,
    textures: [Option<Texture>; 2],
}

impl CubeRenderer {
    /// Uploads the cube mesh and points the samplers at texture units 0 and 1.
    ///
    /// Either texture may be missing, in which case its unit is left unbound.
    pub fn new(
        gl: &Arc<glow::Context>,
        program: ShaderProgram,
        textures: [Option<Texture>; 2],
    ) -> Result<Self, MeshError> {
        let mesh = Mesh::new(gl, &cube_vertices(), glow::TRIANGLES)?;
        log::debug!("Uploaded cube mesh with {} vertices", mesh.vertex_count());

        program.check_uniforms(&CUBE_UNIFORMS);
        program.use_program();
        program.set_uniform("myTexture1", 0);
        program.set_uniform("myTexture2", 1);

        Ok(Self {
            gl: Arc::clone(gl),
            program,
            mesh,
            textures,
        })
    }

    pub fn clear(&self, color: [f32; 4]) {
        let [r, g, b, a] = color;
        unsafe {
            self.gl.clear_color(r, g, b, a);
            self.gl.clear(glow::COLOR_BUFFER_BIT | glow::DEPTH_BUFFER_BIT);
        }
    }

    /// Draws every entry of [`CUBES`] as it stands `time` seconds after startup.
    pub fn render(&self, frame: &FrameUniforms, time: f32) {
        self.program.use_program();
        self.program.set_uniform("view", frame.view);
        self.program.set_uniform("projection", frame.projection);

        for cube in &CUBES {
            self.program.set_uniform("model", cube.model(time));
            self.program.set_uniform("mode", cube.mix.mode());
            self.program.set_uniform("mixRatio", cube.mix.ratio());
            for (unit, texture) in self.textures.iter().enumerate() {
                bind_texture_unit(&self.gl, unit as u32, texture.as_ref());
            }
            self.mesh.draw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX_SOURCE: &str = include_str!("shaders/cube/vert.glsl");
    const FRAGMENT_SOURCE: &str = include_str!("shaders/cube/frag.glsl");

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn each_cube_selects_exactly_one_branch() {
        let modes: Vec<i32> = CUBES.iter().map(|c| c.mix.mode()).collect();
        assert_eq!(modes, [2, 0, 1]);
        assert_eq!(CUBES[0].mix, TextureMix::Blend(0.4));
        assert_eq!(CUBES[0].mix.ratio(), 0.4);
    }

    #[test]
    fn single_texture_modes_still_send_the_default_ratio() {
        assert_eq!(TextureMix::First.ratio(), DEFAULT_MIX_RATIO);
        assert_eq!(TextureMix::Second.ratio(), DEFAULT_MIX_RATIO);
    }

    #[test]
    fn models_start_at_their_offsets() {
        assert_eq!(CUBES[0].model(0.0), Mat4::IDENTITY);
        for cube in &CUBES {
            let origin = cube.model(0.0).transform_point3(Vec3::ZERO);
            assert!(approx(origin, cube.offset));
        }
    }

    #[test]
    fn rotation_keeps_the_axis_fixed() {
        for cube in &CUBES {
            let axis = cube.axis.normalize();
            let rotated = cube.model(2.7).transform_vector3(axis);
            assert!(approx(rotated, axis));
        }
    }

    #[test]
    fn rotation_rate_is_degrees_per_second() {
        let cube = CubeInstance {
            offset: Vec3::ZERO,
            axis: Vec3::Y,
            degrees_per_second: 45.0,
            mix: TextureMix::First,
        };
        let rotated = cube.model(2.0).transform_vector3(Vec3::X);
        assert!(approx(rotated, Vec3::NEG_Z));
    }

    #[test]
    fn rotation_rates_match_the_instance_table() {
        let rates: Vec<f32> = CUBES.iter().map(|c| c.degrees_per_second).collect();
        assert_eq!(rates, [50.0, 120.0, 45.0]);
    }

    #[test]
    fn shaders_declare_every_uniform() {
        for name in CUBE_UNIFORMS {
            assert!(
                VERTEX_SOURCE.contains(name) || FRAGMENT_SOURCE.contains(name),
                "{name} missing from cube shaders"
            );
        }
        assert!(FRAGMENT_SOURCE.contains("mode == 0"));
        assert!(FRAGMENT_SOURCE.contains("mode == 1"));
    }
}
