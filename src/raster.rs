//! Pixel grid model and the image file adapter.
//!
//! The codec only ever sees a [`PixelGrid`]: a row-major buffer of packed
//! `0xAARRGGBB` values. File decoding and encoding go through the `image`
//! crate; palette-based sources are refused before any pixel is touched.

use crate::error::{Result, StegoError};
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// PNG colour type for palette images (IHDR byte 25)
const PNG_COLOR_TYPE_INDEXED: u8 = 3;

/// How the source image stored its colours
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    Rgb,
    Argb,
    Indexed,
}

/// Rectangular grid of packed ARGB pixels addressed by (x, y)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelGrid {
    width: u32,
    height: u32,
    color_model: ColorModel,
    pixels: Vec<u32>,
}

impl PixelGrid {
    /// Create an opaque black RGB grid
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            color_model: ColorModel::Rgb,
            pixels: vec![0xFF00_0000; width as usize * height as usize],
        }
    }

    /// Wrap an existing packed-ARGB buffer
    pub fn from_pixels(
        width: u32,
        height: u32,
        color_model: ColorModel,
        pixels: Vec<u32>,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(StegoError::InvalidImage(format!(
                "{}x{} image has no pixels",
                width, height
            )));
        }
        if pixels.len() != width as usize * height as usize {
            return Err(StegoError::InvalidImage(format!(
                "{}x{} image needs {} pixels, got {}",
                width,
                height,
                width as usize * height as usize,
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            color_model,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn color_model(&self) -> ColorModel {
        self.color_model
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    pub fn get(&self, x: u32, y: u32) -> u32 {
        self.pixels[self.index(x, y)]
    }

    pub fn set(&mut self, x: u32, y: u32, argb: u32) {
        let i = self.index(x, y);
        self.pixels[i] = argb;
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Fail with `InvalidImage` for grids the bit multiplexer cannot use
    pub fn ensure_supported(&self) -> Result<()> {
        if self.pixels.is_empty() {
            return Err(StegoError::InvalidImage(format!(
                "{}x{} image has no pixels",
                self.width, self.height
            )));
        }
        if self.color_model == ColorModel::Indexed {
            return Err(StegoError::InvalidImage(
                "indexed colour images are not supported".into(),
            ));
        }
        Ok(())
    }

    fn from_dynamic(image: &DynamicImage) -> Self {
        let has_alpha = image.color().has_alpha();
        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        let pixels = rgba
            .pixels()
            .map(|p| {
                let [r, g, b, a] = p.0;
                let a = if has_alpha { a } else { 0xFF };
                u32::from_be_bytes([a, r, g, b])
            })
            .collect();
        Self {
            width,
            height,
            color_model: if has_alpha {
                ColorModel::Argb
            } else {
                ColorModel::Rgb
            },
            pixels,
        }
    }

    fn to_dynamic(&self) -> Result<DynamicImage> {
        let unsized_buffer =
            || StegoError::InvalidImage("pixel buffer does not match dimensions".into());
        match self.color_model {
            ColorModel::Argb => {
                let raw = self
                    .pixels
                    .iter()
                    .flat_map(|&p| {
                        let [a, r, g, b] = p.to_be_bytes();
                        [r, g, b, a]
                    })
                    .collect();
                RgbaImage::from_raw(self.width, self.height, raw)
                    .map(DynamicImage::ImageRgba8)
                    .ok_or_else(unsized_buffer)
            }
            ColorModel::Rgb => {
                let raw = self
                    .pixels
                    .iter()
                    .flat_map(|&p| {
                        let [_, r, g, b] = p.to_be_bytes();
                        [r, g, b]
                    })
                    .collect();
                RgbImage::from_raw(self.width, self.height, raw)
                    .map(DynamicImage::ImageRgb8)
                    .ok_or_else(unsized_buffer)
            }
            ColorModel::Indexed => Err(StegoError::InvalidImage(
                "indexed colour images cannot be encoded".into(),
            )),
        }
    }
}

/// Decode an image file held in memory
pub fn decode(bytes: &[u8]) -> Result<PixelGrid> {
    let format = image::guess_format(bytes)
        .map_err(|e| StegoError::InvalidImage(format!("unknown image format: {}", e)))?;
    if is_indexed(bytes, format) {
        return Err(StegoError::InvalidImage(
            "indexed colour images are not supported".into(),
        ));
    }
    let image = image::load_from_memory_with_format(bytes, format)
        .map_err(|e| StegoError::InvalidImage(e.to_string()))?;
    Ok(PixelGrid::from_dynamic(&image))
}

/// Encode a grid with a lossless format
pub fn encode(grid: &PixelGrid, format: ImageFormat) -> Result<Vec<u8>> {
    if !is_lossless(format) {
        return Err(StegoError::InvalidImage(format!(
            "{:?} is not a lossless output format",
            format
        )));
    }
    let image = grid.to_dynamic()?;
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, format)
        .map_err(|e| StegoError::InvalidImage(e.to_string()))?;
    Ok(out.into_inner())
}

/// Read and decode an image file
pub fn load(path: &Path) -> Result<PixelGrid> {
    let bytes = std::fs::read(path)?;
    decode(&bytes)
}

/// Encode and write an image file; the format follows the file extension
pub fn save(grid: &PixelGrid, path: &Path) -> Result<()> {
    let format = ImageFormat::from_path(path)
        .map_err(|e| StegoError::InvalidImage(format!("{}: {}", path.display(), e)))?;
    let bytes = encode(grid, format)?;
    std::fs::write(path, bytes)?;
    Ok(())
}

pub fn is_lossless(format: ImageFormat) -> bool {
    matches!(format, ImageFormat::Png | ImageFormat::Bmp)
}

fn is_indexed(bytes: &[u8], format: ImageFormat) -> bool {
    match format {
        ImageFormat::Png => bytes.get(25) == Some(&PNG_COLOR_TYPE_INDEXED),
        // BITMAPINFOHEADER bits-per-pixel; 8 and below always carry a palette
        ImageFormat::Bmp => bytes
            .get(28..30)
            .map(|b| u16::from_le_bytes([b[0], b[1]]) <= 8)
            .unwrap_or(false),
        ImageFormat::Gif => true,
        _ => false,
    }
}
