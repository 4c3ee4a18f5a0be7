//! Gradient, box-mean and Laplacian filters over [`GrayBuffer`].

use crate::buffer::GrayBuffer;
use crate::mask::Mask;

/// L1 Sobel gradient magnitude (`|gx| + |gy|`), borders replicated.
pub fn sobel_magnitude(gray: &GrayBuffer) -> Vec<u16> {
    let (w, h) = (gray.width(), gray.height());
    let mut out = Vec::with_capacity(w * h);
    for y in 0..h as isize {
        for x in 0..w as isize {
            let p = |dx: isize, dy: isize| gray.get_clamped(x + dx, y + dy) as i32;
            let gx = (p(1, -1) + 2 * p(1, 0) + p(1, 1)) - (p(-1, -1) + 2 * p(-1, 0) + p(-1, 1));
            let gy = (p(-1, 1) + 2 * p(0, 1) + p(1, 1)) - (p(-1, -1) + 2 * p(0, -1) + p(1, -1));
            out.push((gx.abs() + gy.abs()) as u16);
        }
    }
    out
}

/// Pixels whose Sobel magnitude reaches `threshold`.
pub fn edge_mask(gray: &GrayBuffer, threshold: u16) -> Mask {
    let magnitude = sobel_magnitude(gray);
    Mask::from_fn(gray.width(), gray.height(), |x, y| {
        magnitude[y * gray.width() + x] >= threshold
    })
}

/// Summed-area table for constant-time window sums.
pub struct IntegralImage {
    width: usize,
    height: usize,
    /// `(width + 1) * (height + 1)`, first row and column zero.
    sums: Vec<u64>,
}

impl IntegralImage {
    pub fn new(gray: &GrayBuffer) -> Self {
        let (w, h) = (gray.width(), gray.height());
        let stride = w + 1;
        let mut sums = vec![0u64; stride * (h + 1)];
        for y in 0..h {
            let mut row = 0u64;
            for x in 0..w {
                row += gray.get(x, y) as u64;
                sums[(y + 1) * stride + x + 1] = sums[y * stride + x + 1] + row;
            }
        }
        Self {
            width: w,
            height: h,
            sums,
        }
    }

    /// Sum over `[x0, x1) x [y0, y1)`.
    pub fn sum(&self, x0: usize, y0: usize, x1: usize, y1: usize) -> u64 {
        let stride = self.width + 1;
        self.sums[y1 * stride + x1] + self.sums[y0 * stride + x0]
            - self.sums[y0 * stride + x1]
            - self.sums[y1 * stride + x0]
    }

    /// Mean over the `(2r+1)`-square window centred on `(x, y)`, clipped to
    /// the image.
    pub fn window_mean(&self, x: usize, y: usize, radius: usize) -> f64 {
        let x0 = x.saturating_sub(radius);
        let y0 = y.saturating_sub(radius);
        let x1 = (x + radius + 1).min(self.width);
        let y1 = (y + radius + 1).min(self.height);
        let n = ((x1 - x0) * (y1 - y0)) as f64;
        self.sum(x0, y0, x1, y1) as f64 / n
    }
}

/// Inverted adaptive threshold: a pixel is foreground when it is at least
/// `c` darker than the mean of its `block`-square neighbourhood.
pub fn adaptive_threshold_inv(gray: &GrayBuffer, block: usize, c: f64) -> Mask {
    let integral = IntegralImage::new(gray);
    let radius = block / 2;
    Mask::from_fn(gray.width(), gray.height(), |x, y| {
        (gray.get(x, y) as f64) <= integral.window_mean(x, y, radius) - c
    })
}

/// Variance of the 4-neighbour Laplacian over interior pixels. Low values
/// mean a blurry image.
pub fn laplacian_variance(gray: &GrayBuffer) -> f64 {
    let (w, h) = (gray.width(), gray.height());
    if w < 3 || h < 3 {
        return 0.0;
    }
    let mut values = Vec::with_capacity((w - 2) * (h - 2));
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let centre = gray.get(x, y) as f64;
            let lap = gray.get(x - 1, y) as f64
                + gray.get(x + 1, y) as f64
                + gray.get(x, y - 1) as f64
                + gray.get(x, y + 1) as f64
                - 4.0 * centre;
            values.push(lap);
        }
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n
}
