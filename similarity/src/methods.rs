//! The four built-in similarity metrics.

use crate::scorer::{PreparedImage, SimilarityScorer};
use idv_imaging::{ColorHistogram, GrayBuffer};

// ── Structural similarity ───────────────────────────────────────────────

/// Mean SSIM over every full `window` x `window` patch of the luma canvas.
pub struct SsimScorer {
    pub window: usize,
}

impl Default for SsimScorer {
    fn default() -> Self {
        Self { window: 7 }
    }
}

const SSIM_C1: f64 = (0.01 * 255.0) * (0.01 * 255.0);
const SSIM_C2: f64 = (0.03 * 255.0) * (0.03 * 255.0);

impl SimilarityScorer for SsimScorer {
    fn name(&self) -> &'static str {
        "ssim"
    }

    fn score(&self, a: &PreparedImage, b: &PreparedImage) -> f64 {
        ssim(&a.gray, &b.gray, self.window)
    }
}

/// Summed-area tables of x, y, x², y² and xy.
struct Moments {
    stride: usize,
    tables: [Vec<f64>; 5],
}

impl Moments {
    fn new(a: &GrayBuffer, b: &GrayBuffer) -> Self {
        let (w, h) = (a.width(), a.height());
        let stride = w + 1;
        let mut tables: [Vec<f64>; 5] = std::array::from_fn(|_| vec![0.0; stride * (h + 1)]);
        for y in 0..h {
            let mut row = [0.0f64; 5];
            for x in 0..w {
                let (p, q) = (a.get(x, y) as f64, b.get(x, y) as f64);
                let vals = [p, q, p * p, q * q, p * q];
                for k in 0..5 {
                    row[k] += vals[k];
                    tables[k][(y + 1) * stride + x + 1] = tables[k][y * stride + x + 1] + row[k];
                }
            }
        }
        Self { stride, tables }
    }

    fn window(&self, k: usize, x0: usize, y0: usize, size: usize) -> f64 {
        let t = &self.tables[k];
        let (x1, y1) = (x0 + size, y0 + size);
        t[y1 * self.stride + x1] + t[y0 * self.stride + x0]
            - t[y0 * self.stride + x1]
            - t[y1 * self.stride + x0]
    }
}

fn ssim(a: &GrayBuffer, b: &GrayBuffer, window: usize) -> f64 {
    let (w, h) = (a.width().min(b.width()), a.height().min(b.height()));
    let window = window.clamp(2, w.min(h).max(2));
    if w < window || h < window {
        return if a == b { 1.0 } else { 0.0 };
    }
    let moments = Moments::new(a, b);
    let n = (window * window) as f64;
    let mut total = 0.0;
    let mut count = 0usize;
    for y in 0..=h - window {
        for x in 0..=w - window {
            let sum = |k| moments.window(k, x, y, window);
            let (mu_a, mu_b) = (sum(0) / n, sum(1) / n);
            let var_a = (sum(2) - n * mu_a * mu_a) / (n - 1.0);
            let var_b = (sum(3) - n * mu_b * mu_b) / (n - 1.0);
            let cov = (sum(4) - n * mu_a * mu_b) / (n - 1.0);
            let num = (2.0 * mu_a * mu_b + SSIM_C1) * (2.0 * cov + SSIM_C2);
            let den = (mu_a * mu_a + mu_b * mu_b + SSIM_C1) * (var_a + var_b + SSIM_C2);
            total += num / den;
            count += 1;
        }
    }
    (total / count as f64).clamp(0.0, 1.0)
}

// ── Colour histogram ────────────────────────────────────────────────────

/// Correlation of joint RGB histograms. Negative correlation scores zero.
pub struct HistogramScorer {
    pub bins: usize,
}

impl Default for HistogramScorer {
    fn default() -> Self {
        Self { bins: 8 }
    }
}

impl SimilarityScorer for HistogramScorer {
    fn name(&self) -> &'static str {
        "histogram"
    }

    fn score(&self, a: &PreparedImage, b: &PreparedImage) -> f64 {
        let ha = ColorHistogram::from_rgb(&a.rgb, self.bins);
        let hb = ColorHistogram::from_rgb(&b.rgb, self.bins);
        ha.correlation(&hb).clamp(0.0, 1.0)
    }
}

// ── Pixel difference ────────────────────────────────────────────────────

/// One minus the mean absolute luma difference, scaled to `[0, 1]`.
#[derive(Default)]
pub struct PixelDiffScorer;

impl SimilarityScorer for PixelDiffScorer {
    fn name(&self) -> &'static str {
        "pixel_difference"
    }

    fn score(&self, a: &PreparedImage, b: &PreparedImage) -> f64 {
        let pa = a.gray.as_slice();
        let pb = b.gray.as_slice();
        let n = pa.len().min(pb.len());
        if n == 0 {
            return 0.0;
        }
        let diff: u64 = pa
            .iter()
            .zip(pb)
            .map(|(&x, &y)| x.abs_diff(y) as u64)
            .sum();
        1.0 - diff as f64 / n as f64 / 255.0
    }
}

// ── Perceptual hash ─────────────────────────────────────────────────────

/// 64-bit difference hash: shrink to 9x8 and record whether each pixel is
/// brighter than its left neighbour. Similarity is one minus the normalised
/// Hamming distance.
#[derive(Default)]
pub struct DifferenceHashScorer;

impl DifferenceHashScorer {
    pub fn hash(gray: &GrayBuffer) -> u64 {
        let small = gray.resize(9, 8);
        let mut bits = 0u64;
        for y in 0..8 {
            for x in 0..8 {
                bits <<= 1;
                if small.get(x + 1, y) > small.get(x, y) {
                    bits |= 1;
                }
            }
        }
        bits
    }
}

impl SimilarityScorer for DifferenceHashScorer {
    fn name(&self) -> &'static str {
        "perceptual_hash"
    }

    fn score(&self, a: &PreparedImage, b: &PreparedImage) -> f64 {
        let distance = (Self::hash(&a.gray) ^ Self::hash(&b.gray)).count_ones();
        1.0 - distance as f64 / 64.0
    }
}
