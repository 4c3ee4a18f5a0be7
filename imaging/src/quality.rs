//! Capture quality measurements. These only ever produce advisories.

use crate::buffer::GrayBuffer;
use crate::filters::laplacian_variance;
use crate::WORKING_CANVAS_MAX;
use idv_types::{Image, ImageRole};
use serde::{Deserialize, Serialize};

/// Limits below or above which an image earns a quality advisory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Laplacian variance below this reads as blurry.
    pub min_sharpness: f64,
    pub min_brightness: f64,
    pub max_brightness: f64,
    /// Intensity standard deviation below this reads as washed out.
    pub min_contrast: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            min_sharpness: 50.0,
            min_brightness: 50.0,
            max_brightness: 200.0,
            min_contrast: 30.0,
        }
    }
}

/// Sharpness, brightness and contrast of one image.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub sharpness: f64,
    pub brightness: f64,
    pub contrast: f64,
}

impl QualityReport {
    /// Measure on the working canvas so results do not depend on upload size.
    pub fn measure(image: &Image) -> Self {
        let gray = GrayBuffer::from_image(image).fit_within(WORKING_CANVAS_MAX);
        Self {
            sharpness: laplacian_variance(&gray),
            brightness: gray.mean(),
            contrast: gray.std_dev(),
        }
    }

    /// Human-readable advisories, empty for a clean capture.
    pub fn advisories(&self, role: ImageRole, limits: &QualityThresholds) -> Vec<String> {
        let mut out = Vec::new();
        if self.sharpness < limits.min_sharpness {
            out.push(format!(
                "{role} image appears blurry (sharpness {:.1})",
                self.sharpness
            ));
        }
        if self.brightness < limits.min_brightness {
            out.push(format!(
                "{role} image is too dark (brightness {:.1})",
                self.brightness
            ));
        } else if self.brightness > limits.max_brightness {
            out.push(format!(
                "{role} image is too bright (brightness {:.1})",
                self.brightness
            ));
        }
        if self.contrast < limits.min_contrast {
            out.push(format!(
                "{role} image has low contrast ({:.1})",
                self.contrast
            ));
        }
        out
    }
}
