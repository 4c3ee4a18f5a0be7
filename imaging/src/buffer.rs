//! Canonical RGB and grayscale buffers with bilinear resampling.

use idv_types::Image;

/// Interleaved RGB, three bytes per pixel, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RgbBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl RgbBuffer {
    /// Convert any supported pixel layout to RGB.
    pub fn from_image(image: &Image) -> Self {
        let width = image.width() as usize;
        let height = image.height() as usize;
        let mut data = Vec::with_capacity(width * height * 3);
        for y in 0..image.height() {
            for x in 0..image.width() {
                data.extend_from_slice(&image.rgb_at(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    pub fn pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.data.chunks_exact(3).map(|p| [p[0], p[1], p[2]])
    }

    /// Resample to exactly `width` x `height`.
    pub fn resize(&self, width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: resample(&self.data, self.width, self.height, 3, width, height),
        }
    }

    /// Downscale so neither side exceeds `max_side`, keeping the aspect
    /// ratio. Smaller images are returned unchanged.
    pub fn fit_within(&self, max_side: usize) -> Self {
        match fitted_size(self.width, self.height, max_side) {
            Some((w, h)) => self.resize(w, h),
            None => self.clone(),
        }
    }

    /// BT.601 luma.
    pub fn to_gray(&self) -> GrayBuffer {
        GrayBuffer {
            width: self.width,
            height: self.height,
            data: self.pixels().map(luma).collect(),
        }
    }
}

/// Single-channel 8-bit buffer, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GrayBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl GrayBuffer {
    /// Wrap raw luma bytes. Returns `None` if the length does not match.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Option<Self> {
        (width > 0 && height > 0 && data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_image(image: &Image) -> Self {
        RgbBuffer::from_image(image).to_gray()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    /// Read with coordinates clamped to the border.
    pub fn get_clamped(&self, x: isize, y: isize) -> u8 {
        let x = x.clamp(0, self.width as isize - 1) as usize;
        let y = y.clamp(0, self.height as isize - 1) as usize;
        self.get(x, y)
    }

    pub fn resize(&self, width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: resample(&self.data, self.width, self.height, 1, width, height),
        }
    }

    pub fn fit_within(&self, max_side: usize) -> Self {
        match fitted_size(self.width, self.height, max_side) {
            Some((w, h)) => self.resize(w, h),
            None => self.clone(),
        }
    }

    pub fn mean(&self) -> f64 {
        self.data.iter().map(|&v| v as f64).sum::<f64>() / self.data.len() as f64
    }

    /// Population standard deviation of the intensities.
    pub fn std_dev(&self) -> f64 {
        let mean = self.mean();
        let var = self
            .data
            .iter()
            .map(|&v| (v as f64 - mean).powi(2))
            .sum::<f64>()
            / self.data.len() as f64;
        var.sqrt()
    }
}

pub(crate) fn luma(rgb: [u8; 3]) -> u8 {
    ((rgb[0] as u32 * 299 + rgb[1] as u32 * 587 + rgb[2] as u32 * 114 + 500) / 1000) as u8
}

fn fitted_size(width: usize, height: usize, max_side: usize) -> Option<(usize, usize)> {
    let longest = width.max(height);
    if longest <= max_side || max_side == 0 {
        return None;
    }
    let scale = max_side as f64 / longest as f64;
    let w = ((width as f64 * scale).round() as usize).clamp(1, max_side);
    let h = ((height as f64 * scale).round() as usize).clamp(1, max_side);
    Some((w, h))
}

/// Bilinear resampling with pixel-centre alignment.
fn resample(src: &[u8], sw: usize, sh: usize, channels: usize, dw: usize, dh: usize) -> Vec<u8> {
    let dw = dw.max(1);
    let dh = dh.max(1);
    if sw == dw && sh == dh {
        return src.to_vec();
    }
    let x_ratio = sw as f64 / dw as f64;
    let y_ratio = sh as f64 / dh as f64;
    let mut out = Vec::with_capacity(dw * dh * channels);

    for y in 0..dh {
        let sy = ((y as f64 + 0.5) * y_ratio - 0.5).clamp(0.0, (sh - 1) as f64);
        let y0 = sy.floor() as usize;
        let y1 = (y0 + 1).min(sh - 1);
        let fy = sy - y0 as f64;
        for x in 0..dw {
            let sx = ((x as f64 + 0.5) * x_ratio - 0.5).clamp(0.0, (sw - 1) as f64);
            let x0 = sx.floor() as usize;
            let x1 = (x0 + 1).min(sw - 1);
            let fx = sx - x0 as f64;
            for c in 0..channels {
                let at = |xx: usize, yy: usize| src[(yy * sw + xx) * channels + c] as f64;
                let top = at(x0, y0) * (1.0 - fx) + at(x1, y0) * fx;
                let bottom = at(x0, y1) * (1.0 - fx) + at(x1, y1) * fx;
                let v = top * (1.0 - fy) + bottom * fy;
                out.push(v.round().clamp(0.0, 255.0) as u8);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use idv_types::PixelFormat;

    #[test]
    fn resize_of_solid_stays_solid() {
        let rgb = RgbBuffer::from_image(&Image::solid(37, 11, [10, 200, 30]));
        let small = rgb.resize(5, 9);
        assert_eq!(small.width(), 5);
        assert_eq!(small.height(), 9);
        assert!(small.pixels().all(|p| p == [10, 200, 30]));
    }

    #[test]
    fn fit_within_keeps_aspect() {
        let rgb = RgbBuffer::from_image(&Image::solid(1600, 1000, [0, 0, 0]));
        let fitted = rgb.fit_within(800);
        assert_eq!((fitted.width(), fitted.height()), (800, 500));

        let small = RgbBuffer::from_image(&Image::solid(300, 200, [0, 0, 0]));
        assert_eq!(small.fit_within(800), small);
    }

    #[test]
    fn gray_uses_bt601_weights() {
        let gray = GrayBuffer::from_image(&Image::solid(2, 2, [255, 0, 0]));
        assert_eq!(gray.get(0, 0), 76);
        let white = GrayBuffer::from_image(&Image::solid(2, 2, [255, 255, 255]));
        assert_eq!(white.get(1, 1), 255);
    }

    #[test]
    fn gray_input_passes_through() {
        let img = Image::new(2, 1, PixelFormat::Gray8, vec![17, 230]).unwrap();
        let gray = GrayBuffer::from_image(&img);
        assert_eq!(gray.as_slice(), &[17, 230]);
    }

    #[test]
    fn std_dev_of_two_levels() {
        let gray = GrayBuffer::new(2, 1, vec![0, 100]).unwrap();
        assert_eq!(gray.mean(), 50.0);
        assert_eq!(gray.std_dev(), 50.0);
        assert!(GrayBuffer::new(2, 2, vec![0; 3]).is_none());
    }
}
