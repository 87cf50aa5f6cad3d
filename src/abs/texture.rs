//! Structs and functions for handling textures.
//!
//! Decoding is split from uploading: [`TextureImage`] is the CPU-side pixel data read from disk
//! and [`Texture`] is the GPU texture created from it.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use glow::HasContext;
use image::DynamicImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TextureError {
    #[error("failed to load {}: {source}", path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image of {width}x{height} is too large to upload")]
    TooLarge { width: u32, height: u32 },

    #[error("failed to create texture object: {0}")]
    Create(String),
}

/// Layout of the bytes in a [`TextureImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    Rgb,
    Rgba,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn channels(self) -> usize {
        match self {
            PixelFormat::Rgb => 3,
            PixelFormat::Rgba => 4,
        }
    }

    /// Sized internal format the GPU stores the texture in.
    pub fn internal_format(self) -> i32 {
        match self {
            PixelFormat::Rgb => glow::RGB8 as i32,
            PixelFormat::Rgba => glow::RGBA8 as i32,
        }
    }

    /// Client-side format of the uploaded pixel rows.
    pub fn gl_format(self) -> u32 {
        match self {
            PixelFormat::Rgb => glow::RGB,
            PixelFormat::Rgba => glow::RGBA,
        }
    }
}

/// Decoded 8-bit pixel data, bottom row first.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl TextureImage {
    /// Reads and decodes an image file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TextureError> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|source| TextureError::Load {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_image(image))
    }

    /// Flips the image so its first row is the bottom one, matching GL texture coordinates.
    ///
    /// 8-bit RGB and RGBA images keep their layout; anything else is converted to RGBA.
    pub fn from_image(image: DynamicImage) -> Self {
        let image = image.flipv();
        let (width, height) = (image.width(), image.height());
        let (format, data) = match image {
            DynamicImage::ImageRgb8(buffer) => (PixelFormat::Rgb, buffer.into_raw()),
            DynamicImage::ImageRgba8(buffer) => (PixelFormat::Rgba, buffer.into_raw()),
            other => (PixelFormat::Rgba, other.to_rgba8().into_raw()),
        };
        Self {
            width,
            height,
            format,
            data,
        }
    }
}

/// Represents a texture stored on the GPU side.
pub struct Texture {
    gl: Arc<glow::Context>,
    id: glow::Texture,
    width: u32,
    height: u32,
}

impl Texture {
    /// Uploads `image` with mipmaps, repeat wrapping and linear filtering.
    pub fn new(gl: &Arc<glow::Context>, image: &TextureImage) -> Result<Self, TextureError> {
        let too_large = |_: std::num::TryFromIntError| TextureError::TooLarge {
            width: image.width,
            height: image.height,
        };
        let width = i32::try_from(image.width).map_err(too_large)?;
        let height = i32::try_from(image.height).map_err(too_large)?;

        unsafe {
            let texture = gl.create_texture().map_err(TextureError::Create)?;
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            // RGB rows are not 4-byte aligned for most widths.
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                image.format.internal_format(),
                width,
                height,
                0,
                image.format.gl_format(),
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(image.data.as_slice())),
            );
            gl.generate_mipmap(glow::TEXTURE_2D);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, glow::REPEAT as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32);
            gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            gl.bind_texture(glow::TEXTURE_2D, None);

            Ok(Self {
                gl: Arc::clone(gl),
                id: texture,
                width: image.width,
                height: image.height,
            })
        }
    }

    /// Returns the width of the texture.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the height of the texture.
    pub fn height(&self) -> u32 {
        self.height
    }
}

/// Binds `texture` to the given texture unit, or unbinds the unit when there is none.
pub fn bind_texture_unit(gl: &glow::Context, unit: u32, texture: Option<&Texture>) {
    unsafe {
        gl.active_texture(glow::TEXTURE0 + unit);
        gl.bind_texture(glow::TEXTURE_2D, texture.map(|t| t.id));
    }
}

impl Drop for Texture {
    fn drop(&mut self) {
        unsafe {
            self.gl.delete_texture(self.id);
        }
    }
}
