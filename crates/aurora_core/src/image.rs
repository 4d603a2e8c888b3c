//! Floating-point RGB framebuffer.
//!
//! Pixels are stored row-major with row 0 at the top, in linear radiance
//! until post-processing maps them into display range.

use std::path::Path;

use aurora_math::{Color, ColorExt};
use thiserror::Error;

/// Errors that can occur while reading or writing images.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Invalid image data: {0}")]
    Format(String),
}

pub type ImageResult<T> = Result<T, ImageError>;

/// A width x height grid of linear RGB colors.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    pixels: Vec<Color>,
}

impl Image {
    /// Create a new image filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Wrap existing row-major pixel data.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Color>) -> ImageResult<Self> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(ImageError::Format(format!(
                "{} pixels for a {width}x{height} image",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} image",
            self.width,
            self.height
        );
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    pub fn pixels(&self) -> &[Color] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Color] {
        &mut self.pixels
    }

    /// Scale every pixel by `2^exposure`.
    pub fn apply_exposure(&mut self, exposure: f32) {
        for p in &mut self.pixels {
            *p = p.apply_exposure(exposure);
        }
    }

    /// Raise every channel to `1 / gamma`.
    pub fn apply_gamma(&mut self, gamma: f32) {
        for p in &mut self.pixels {
            *p = p.apply_gamma(gamma);
        }
    }

    /// Clip every channel to [0, 1].
    pub fn saturate(&mut self) {
        for p in &mut self.pixels {
            *p = p.saturate();
        }
    }

    /// Quantize to packed 8-bit RGB, row-major.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color.to_rgb8());
        }
        bytes
    }
}

/// Save an image as PNG. Channels are clipped and quantized as-is, so
/// post-process first.
pub fn save_png(path: impl AsRef<Path>, image: &Image) -> ImageResult<()> {
    let buffer = image::RgbImage::from_raw(image.width(), image.height(), image.to_rgb8())
        .ok_or_else(|| ImageError::Format("pixel buffer does not match dimensions".into()))?;
    buffer.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}
