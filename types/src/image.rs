//! Decoded pixel buffers as handed to the engine.
//!
//! Decoding of encoded uploads happens upstream; the engine only sees raw
//! interleaved 8-bit pixels with an explicit layout.

use crate::error::InputError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Interleaved 8-bit pixel layouts the engine accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PixelFormat {
    Gray8,
    Rgb8,
    Rgba8,
    /// OpenCV-style channel order.
    Bgr8,
}

impl PixelFormat {
    /// Bytes per pixel.
    pub fn channels(&self) -> usize {
        match self {
            PixelFormat::Gray8 => 1,
            PixelFormat::Rgb8 | PixelFormat::Bgr8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// Which slot of a verification request an image was submitted in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageRole {
    Document,
    Selfie,
}

impl ImageRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageRole::Document => "document",
            ImageRole::Selfie => "selfie",
        }
    }
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A decoded image: dimensions, pixel layout and the raw buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    format: PixelFormat,
    data: Vec<u8>,
}

impl Image {
    /// Wrap a raw pixel buffer, checking it matches the declared layout.
    pub fn new(
        width: u32,
        height: u32,
        format: PixelFormat,
        data: Vec<u8>,
    ) -> Result<Self, InputError> {
        if width == 0 || height == 0 {
            return Err(InputError::ZeroDimension { width, height });
        }
        let expected = width as usize * height as usize * format.channels();
        if data.len() != expected {
            return Err(InputError::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            format,
            data,
        })
    }

    /// A single-colour RGB image. Zero dimensions are clamped to one pixel.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        let data = rgb
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 3)
            .collect();
        Self {
            width,
            height,
            format: PixelFormat::Rgb8,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Total pixel count.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Width divided by height.
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// The pixel at `(x, y)` as RGB, whatever the stored layout.
    ///
    /// Coordinates must be in bounds.
    pub fn rgb_at(&self, x: u32, y: u32) -> [u8; 3] {
        let channels = self.format.channels();
        let i = (y as usize * self.width as usize + x as usize) * channels;
        let px = &self.data[i..i + channels];
        match self.format {
            PixelFormat::Gray8 => [px[0], px[0], px[0]],
            PixelFormat::Rgb8 | PixelFormat::Rgba8 => [px[0], px[1], px[2]],
            PixelFormat::Bgr8 => [px[2], px[1], px[0]],
        }
    }

    /// Mutable access for building synthetic images. Panics out of bounds.
    pub fn put_rgb(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let channels = self.format.channels();
        let i = (y as usize * self.width as usize + x as usize) * channels;
        let px = &mut self.data[i..i + channels];
        match self.format {
            PixelFormat::Gray8 => {
                px[0] = ((rgb[0] as u32 * 299 + rgb[1] as u32 * 587 + rgb[2] as u32 * 114)
                    / 1000) as u8
            }
            PixelFormat::Rgb8 => px.copy_from_slice(&rgb),
            PixelFormat::Rgba8 => {
                px[..3].copy_from_slice(&rgb);
                px[3] = 255;
            }
            PixelFormat::Bgr8 => px.copy_from_slice(&[rgb[2], rgb[1], rgb[0]]),
        }
    }

    /// Paint an axis-aligned filled rectangle, clipped to the image.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, rgb: [u8; 3]) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for py in y.min(self.height)..y_end {
            for px in x.min(self.width)..x_end {
                self.put_rgb(px, py, rgb);
            }
        }
    }

    /// Reject images whose sides fall outside `[min, max]`.
    pub fn check_dimensions(&self, role: ImageRole, min: u32, max: u32) -> Result<(), InputError> {
        if self.width < min || self.height < min {
            return Err(InputError::TooSmall {
                role,
                width: self.width,
                height: self.height,
                min,
            });
        }
        if self.width > max || self.height > max {
            return Err(InputError::TooLarge {
                role,
                width: self.width,
                height: self.height,
                max,
            });
        }
        Ok(())
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("format", &self.format)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_buffer_of_wrong_length() {
        let err = Image::new(4, 4, PixelFormat::Rgb8, vec![0; 47]).unwrap_err();
        assert_eq!(
            err,
            InputError::BufferSizeMismatch {
                expected: 48,
                actual: 47
            }
        );
    }

    #[test]
    fn rejects_zero_dimension() {
        let err = Image::new(0, 4, PixelFormat::Gray8, Vec::new()).unwrap_err();
        assert!(matches!(err, InputError::ZeroDimension { .. }));
    }

    #[test]
    fn rgb_at_normalises_channel_order() {
        let bgr = Image::new(1, 1, PixelFormat::Bgr8, vec![1, 2, 3]).unwrap();
        assert_eq!(bgr.rgb_at(0, 0), [3, 2, 1]);
        let rgba = Image::new(1, 1, PixelFormat::Rgba8, vec![1, 2, 3, 9]).unwrap();
        assert_eq!(rgba.rgb_at(0, 0), [1, 2, 3]);
        let gray = Image::new(1, 1, PixelFormat::Gray8, vec![7]).unwrap();
        assert_eq!(gray.rgb_at(0, 0), [7, 7, 7]);
    }

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut img = Image::solid(10, 10, [0, 0, 0]);
        img.fill_rect(8, 8, 5, 5, [255, 0, 0]);
        assert_eq!(img.rgb_at(9, 9), [255, 0, 0]);
        assert_eq!(img.rgb_at(7, 7), [0, 0, 0]);
    }

    #[test]
    fn dimension_limits_are_inclusive() {
        let img = Image::solid(100, 200, [1, 2, 3]);
        assert!(img.check_dimensions(ImageRole::Selfie, 100, 200).is_ok());
        assert!(matches!(
            img.check_dimensions(ImageRole::Selfie, 101, 4096),
            Err(InputError::TooSmall { .. })
        ));
        assert!(matches!(
            img.check_dimensions(ImageRole::Document, 10, 199),
            Err(InputError::TooLarge { .. })
        ));
    }
}
