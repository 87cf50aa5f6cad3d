use std::{path::Path, sync::Arc, time::Instant};

use glow::HasContext;
use log::{error, info, warn};
use sdl2::{
    event::{Event, WindowEvent},
    keyboard::Keycode,
};
use thiserror::Error;

use crate::{
    abs::*,
    camera::FrameClock,
    input::MoveKeys,
    render::scene::{CubeRenderer, FrameUniforms},
    settings::{SETTINGS_FILE, Settings},
};

mod abs;
mod camera;
mod input;
mod logging;
mod render;
mod settings;

/// Compiles and links `render/shaders/<name>/{vert,frag}.glsl`.
macro_rules! shader_program {
    ($name:ident, $gl:expr) => {{
        let gl = &$gl;
        Shader::new(
            gl,
            ShaderStage::Vertex,
            include_str!(concat!("render/shaders/", stringify!($name), "/vert.glsl")),
        )
        .and_then(|vert| {
            let frag = Shader::new(
                gl,
                ShaderStage::Fragment,
                include_str!(concat!("render/shaders/", stringify!($name), "/frag.glsl")),
            )?;
            ShaderProgram::new(gl, &[&vert, &frag])
        })
    }};
}

#[derive(Debug, Error)]
enum StartupError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Shader(#[from] ShaderError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

fn main() {
    let (settings, settings_error) = match Settings::load(SETTINGS_FILE) {
        Ok(settings) => (settings, None),
        Err(e) => (Settings::default(), Some(e)),
    };

    if let Err(e) = logging::setup_logger(logging::parse_level(&settings.log_level)) {
        eprintln!("Failed to initialize logging: {e}");
    }
    if let Some(e) = settings_error {
        warn!("{e}; using default settings");
    }

    if let Err(e) = run(&settings) {
        error!("{e}");
        std::process::exit(-1);
    }
    info!("Window closed, shutting down");
}

/// Loads one texture slot. Failures are logged and leave the slot empty.
fn load_texture(gl: &Arc<glow::Context>, path: &Path) -> Option<Texture> {
    let loaded = TextureImage::load(path).and_then(|image| {
        let texture = Texture::new(gl, &image)?;
        info!(
            "Loaded {} ({}x{}, {} channels)",
            path.display(),
            texture.width(),
            texture.height(),
            image.format.channels()
        );
        Ok(texture)
    });

    match loaded {
        Ok(texture) => Some(texture),
        Err(e) => {
            warn!("{e}; texture unit left unbound");
            None
        }
    }
}

fn run(settings: &Settings) -> Result<(), StartupError> {
    let mut app = App::new(
        &settings.window_title,
        settings.window_width,
        settings.window_height,
        settings.vsync,
    )?;

    let (width, height) = app.window.drawable_size();
    unsafe {
        app.gl.viewport(0, 0, width as i32, height as i32);
        app.gl.enable(glow::DEPTH_TEST);
        app.gl.depth_func(glow::LESS);
    }

    let program = shader_program!(cube, app.gl)?;
    let textures = settings
        .textures
        .each_ref()
        .map(|path| load_texture(&app.gl, Path::new(path)));
    let renderer = CubeRenderer::new(&app.gl, program, textures)?;

    let start = Instant::now();
    let mut clock = FrameClock::default();
    let mut camera = settings.camera();

    'running: loop {
        for event in app.event_pump.poll_iter() {
            match event {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'running,
                Event::Window {
                    win_event: WindowEvent::SizeChanged(..),
                    ..
                } => {
                    let (width, height) = app.window.drawable_size();
                    unsafe {
                        app.gl.viewport(0, 0, width as i32, height as i32);
                    }
                }
                _ => {}
            }
        }

        let now = start.elapsed().as_secs_f32();
        let (next_clock, delta_time) = clock.advance(now);
        clock = next_clock;
        camera = camera.advance(MoveKeys::poll(&app.event_pump), delta_time);

        renderer.clear(settings.clear_color);

        let (width, height) = app.window.drawable_size();
        let frame = FrameUniforms {
            view: camera.view(),
            projection: camera.projection(width, height),
        };
        renderer.render(&frame, now);

        app.window.gl_swap_window();
    }

    Ok(())
}
