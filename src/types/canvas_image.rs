//! Placed bitmaps and the pixel buffer capability the slicer needs.

use std::fmt;
use std::io::Cursor;

use image::{ImageFormat, ImageResult, RgbaImage};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::rect::{PixelRect, Point, Rect};
use crate::error::{Result, SlicerError};

/// A crop rectangle the buffer cannot honour.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("crop {rect} does not fit a {width}x{height} buffer")]
pub struct CropError {
    pub rect: PixelRect,
    pub width: u32,
    pub height: u32,
}

/// The minimal bitmap surface the slicing engine works against.
pub trait PixelBuffer: Sized {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Copy out a sub-rectangle. Must reject empty or out-of-bounds rects.
    fn crop(&self, rect: PixelRect) -> std::result::Result<Self, CropError>;

    /// Encode as PNG, keeping alpha.
    fn encode_png(&self) -> ImageResult<Vec<u8>>;

    /// The buffer's own extent as a rectangle at the origin.
    fn bounds(&self) -> Rect {
        Rect::new(0.0, 0.0, f64::from(self.width()), f64::from(self.height()))
    }
}

impl PixelBuffer for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn crop(&self, rect: PixelRect) -> std::result::Result<Self, CropError> {
        let (width, height) = self.dimensions();
        if rect.is_empty() || !rect.fits_within(width, height) {
            return Err(CropError {
                rect,
                width,
                height,
            });
        }

        Ok(image::imageops::crop_imm(self, rect.x, rect.y, rect.width, rect.height).to_image())
    }

    fn encode_png(&self) -> ImageResult<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)?;
        Ok(buffer)
    }
}

/// Stable identifier of a placed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ImageId(Uuid);

impl ImageId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ImageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bitmap placed on the canvas.
///
/// `position` is the display center. The canvas footprint is the native
/// size multiplied by `scale`.
#[derive(Debug, Clone)]
pub struct CanvasImage<P = RgbaImage> {
    pub id: ImageId,

    /// Used to group exported output per image.
    pub name: String,

    pub pixels: P,
    pub position: Point,
    scale: f64,
}

impl<P: PixelBuffer> CanvasImage<P> {
    /// Place `pixels` at `position` (its center) with the given scale.
    ///
    /// Fails for empty buffers and for scales that are not finite and
    /// positive.
    pub fn new(name: impl Into<String>, pixels: P, position: Point, scale: f64) -> Result<Self> {
        let name = name.into();

        if pixels.width() == 0 || pixels.height() == 0 {
            return Err(SlicerError::Validation {
                message: format!(
                    "Image '{}' has zero dimensions ({}x{})",
                    name,
                    pixels.width(),
                    pixels.height()
                ),
                help: Some("Images must have non-zero width and height".to_string()),
            });
        }

        Self::check_scale(&name, scale)?;

        Ok(Self {
            id: ImageId::new(),
            name,
            pixels,
            position,
            scale,
        })
    }

    /// Place `pixels` so its top-left corner sits on the canvas origin.
    /// Canvas and pixel coordinates then coincide.
    pub fn at_origin(name: impl Into<String>, pixels: P) -> Result<Self> {
        let center = Point::new(
            f64::from(pixels.width()) / 2.0,
            f64::from(pixels.height()) / 2.0,
        );
        Self::new(name, pixels, center, 1.0)
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f64) -> Result<()> {
        Self::check_scale(&self.name, scale)?;
        self.scale = scale;
        Ok(())
    }

    /// Canvas-space footprint, centered on `position`.
    pub fn display_rect(&self) -> Rect {
        Rect::from_center(
            self.position,
            f64::from(self.pixels.width()) * self.scale,
            f64::from(self.pixels.height()) * self.scale,
        )
    }

    fn check_scale(name: &str, scale: f64) -> Result<()> {
        if scale.is_finite() && scale > 0.0 {
            Ok(())
        } else {
            Err(SlicerError::Validation {
                message: format!("Image '{}' has invalid scale {}", name, scale),
                help: Some("Scale must be a positive number".to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn buffer(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, 255]))
    }

    #[test]
    fn test_display_rect_centered() {
        let img = CanvasImage::new("a", buffer(400, 200), Point::ORIGIN, 1.0).unwrap();
        assert_eq!(img.display_rect(), Rect::new(-200.0, -100.0, 400.0, 200.0));
    }

    #[test]
    fn test_display_rect_scaled() {
        let img = CanvasImage::new("a", buffer(100, 100), Point::new(50.0, 50.0), 2.0).unwrap();
        assert_eq!(img.display_rect(), Rect::new(-50.0, -50.0, 200.0, 200.0));
    }

    #[test]
    fn test_at_origin() {
        let img = CanvasImage::at_origin("a", buffer(40, 30)).unwrap();
        assert_eq!(img.display_rect(), Rect::new(0.0, 0.0, 40.0, 30.0));
    }

    #[test]
    fn test_rejects_bad_scale() {
        assert!(CanvasImage::new("a", buffer(4, 4), Point::ORIGIN, 0.0).is_err());
        assert!(CanvasImage::new("a", buffer(4, 4), Point::ORIGIN, -1.0).is_err());
        assert!(CanvasImage::new("a", buffer(4, 4), Point::ORIGIN, f64::INFINITY).is_err());

        let mut img = CanvasImage::new("a", buffer(4, 4), Point::ORIGIN, 1.0).unwrap();
        assert!(img.set_scale(0.0).is_err());
        assert_eq!(img.scale(), 1.0);
    }

    #[test]
    fn test_rejects_empty_buffer() {
        assert!(CanvasImage::new("a", RgbaImage::new(0, 4), Point::ORIGIN, 1.0).is_err());
    }

    #[test]
    fn test_crop_in_bounds() {
        let mut img = buffer(4, 4);
        img.put_pixel(2, 1, Rgba([255, 0, 0, 128]));

        let cropped = img.crop(PixelRect::new(2, 1, 2, 3)).unwrap();
        assert_eq!(cropped.dimensions(), (2, 3));
        assert_eq!(cropped.get_pixel(0, 0).0, [255, 0, 0, 128]);
    }

    #[test]
    fn test_crop_rejects_out_of_bounds() {
        let img = buffer(4, 4);
        let err = img.crop(PixelRect::new(3, 0, 2, 2)).unwrap_err();
        assert_eq!(err.width, 4);
        assert!(img.crop(PixelRect::new(0, 0, 0, 2)).is_err());
    }

    #[test]
    fn test_encode_png_keeps_alpha() {
        let img = RgbaImage::from_pixel(2, 2, Rgba([1, 2, 3, 77]));
        let bytes = img.encode_png().unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(1, 1).0, [1, 2, 3, 77]);
    }
}
