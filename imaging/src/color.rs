//! HSV conversion, specular-highlight ratio and colour histograms.

use crate::buffer::RgbBuffer;

/// HSV on OpenCV's 8-bit scale: hue in degrees `[0, 360)`, saturation and
/// value in `[0, 255]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsv {
    pub h: f32,
    pub s: u8,
    pub v: u8,
}

impl Hsv {
    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        let [r, g, b] = rgb.map(|c| c as f32);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        let s = if max == 0.0 { 0.0 } else { delta * 255.0 / max };
        let h = if delta == 0.0 {
            0.0
        } else if max == r {
            60.0 * (g - b) / delta
        } else if max == g {
            120.0 + 60.0 * (b - r) / delta
        } else {
            240.0 + 60.0 * (r - g) / delta
        };
        Self {
            h: if h < 0.0 { h + 360.0 } else { h },
            s: s.round() as u8,
            v: max as u8,
        }
    }
}

/// Fraction of pixels that are bright and washed out, the signature of
/// holograms and laminate glare.
pub fn specular_ratio(rgb: &RgbBuffer, min_value: u8, max_saturation: u8) -> f64 {
    let total = rgb.width() * rgb.height();
    if total == 0 {
        return 0.0;
    }
    let shiny = rgb
        .pixels()
        .map(Hsv::from_rgb)
        .filter(|hsv| hsv.v >= min_value && hsv.s <= max_saturation)
        .count();
    shiny as f64 / total as f64
}

/// Joint RGB histogram with `bins` buckets per channel, normalised to sum 1.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorHistogram {
    bins: usize,
    counts: Vec<f64>,
}

impl ColorHistogram {
    pub fn from_rgb(rgb: &RgbBuffer, bins: usize) -> Self {
        let bins = bins.clamp(1, 256);
        let mut counts = vec![0.0; bins * bins * bins];
        let bucket = |c: u8| c as usize * bins / 256;
        for [r, g, b] in rgb.pixels() {
            counts[(bucket(r) * bins + bucket(g)) * bins + bucket(b)] += 1.0;
        }
        let total: f64 = counts.iter().sum();
        if total > 0.0 {
            counts.iter_mut().for_each(|c| *c /= total);
        }
        Self { bins, counts }
    }

    pub fn bins(&self) -> usize {
        self.bins
    }

    /// Pearson correlation of the bin vectors, in `[-1, 1]`.
    ///
    /// Flat histograms have no variance; they correlate 1 with an equal
    /// histogram and 0 with anything else.
    pub fn correlation(&self, other: &ColorHistogram) -> f64 {
        if self.counts.len() != other.counts.len() {
            return 0.0;
        }
        let n = self.counts.len() as f64;
        let mean_a = self.counts.iter().sum::<f64>() / n;
        let mean_b = other.counts.iter().sum::<f64>() / n;
        let (mut cov, mut var_a, mut var_b) = (0.0, 0.0, 0.0);
        for (a, b) in self.counts.iter().zip(&other.counts) {
            let (da, db) = (a - mean_a, b - mean_b);
            cov += da * db;
            var_a += da * da;
            var_b += db * db;
        }
        let denom = (var_a * var_b).sqrt();
        if denom <= f64::EPSILON {
            return if self.counts == other.counts { 1.0 } else { 0.0 };
        }
        cov / denom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use idv_types::Image;

    #[test]
    fn hsv_of_primaries() {
        let red = Hsv::from_rgb([255, 0, 0]);
        assert_eq!((red.h, red.s, red.v), (0.0, 255, 255));
        let blue = Hsv::from_rgb([0, 0, 255]);
        assert_eq!(blue.h, 240.0);
        let grey = Hsv::from_rgb([128, 128, 128]);
        assert_eq!((grey.s, grey.v), (0, 128));
    }

    #[test]
    fn specular_ratio_counts_white_only() {
        let mut img = Image::solid(10, 10, [40, 40, 40]);
        img.fill_rect(0, 0, 5, 2, [250, 250, 250]);
        img.fill_rect(0, 5, 5, 2, [255, 0, 0]);
        let ratio = specular_ratio(&RgbBuffer::from_image(&img), 180, 120);
        assert!((ratio - 0.10).abs() < 1e-12);
    }

    #[test]
    fn histogram_correlation_of_self_is_one() {
        let mut img = Image::solid(20, 20, [10, 20, 30]);
        img.fill_rect(5, 5, 10, 10, [200, 100, 50]);
        let hist = ColorHistogram::from_rgb(&RgbBuffer::from_image(&img), 8);
        assert!((hist.correlation(&hist) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn disjoint_colours_correlate_poorly() {
        let a = ColorHistogram::from_rgb(&RgbBuffer::from_image(&Image::solid(8, 8, [0, 0, 0])), 8);
        let b = ColorHistogram::from_rgb(
            &RgbBuffer::from_image(&Image::solid(8, 8, [255, 255, 255])),
            8,
        );
        assert!(a.correlation(&b) < 0.0);
    }
}
