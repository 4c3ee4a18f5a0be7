//! The five structural features of an identity document.
//!
//! Each detector takes the prepared working canvas and returns a verdict
//! plus the measurement behind it, so the result can be audited.

use idv_imaging::{
    adaptive_threshold_inv, edge_mask, specular_ratio, Component, GrayBuffer, Mask, RgbBuffer,
};

/// Feature weights; they sum to 1.
pub const WEIGHT_CARD_EDGES: f64 = 0.30;
pub const WEIGHT_TEXT_REGIONS: f64 = 0.25;
pub const WEIGHT_SECURITY_FEATURES: f64 = 0.20;
pub const WEIGHT_PHOTO_REGION: f64 = 0.15;
pub const WEIGHT_ASPECT_RATIO: f64 = 0.10;

/// Sobel L1 magnitude treated as an edge.
const EDGE_THRESHOLD: u16 = 80;

/// Card outline: long side over short side.
const CARD_ASPECT: (f64, f64) = (1.3, 1.8);
/// Smallest card outline, as a fraction of the canvas.
const CARD_MIN_AREA: f64 = 0.05;
/// Share of an outline's pixels that must hug its bounding box.
const CARD_BORDER_SHARE: f64 = 0.90;
/// Share of each side of the bounding box the outline must cover.
const CARD_SIDE_COVERAGE: f64 = 0.60;

const TEXT_BLOCK: usize = 11;
const TEXT_OFFSET: f64 = 2.0;
const TEXT_KERNEL: (usize, usize) = (25, 3);
const TEXT_MIN_ASPECT: f64 = 1.5;
const TEXT_MIN_WIDTH: usize = 30;
const TEXT_MIN_LINES: usize = 2;

const SPECULAR_MIN_VALUE: u8 = 180;
const SPECULAR_MAX_SATURATION: u8 = 120;
const SPECULAR_RANGE: (f64, f64) = (0.005, 0.15);

const PHOTO_AREA: (f64, f64) = (0.05, 0.30);
const PHOTO_ASPECT: (f64, f64) = (0.6, 1.5);

const LANDSCAPE: (f64, f64) = (1.2, 2.0);
const PORTRAIT: (f64, f64) = (0.5, 0.83);

/// Edge components, shared by the card-edge and photo-region checks.
pub struct EdgeMap {
    pub components: Vec<Component>,
    canvas_area: f64,
}

impl EdgeMap {
    pub fn new(gray: &GrayBuffer) -> Self {
        Self {
            components: edge_mask(gray, EDGE_THRESHOLD).components(),
            canvas_area: (gray.width() * gray.height()) as f64,
        }
    }

    fn area_fraction(&self, component: &Component) -> f64 {
        component.bbox_area() as f64 / self.canvas_area
    }
}

// ── (a) Card edges ──────────────────────────────────────────────────────

/// Count closed, card-proportioned outlines.
pub fn card_outlines(edges: &EdgeMap) -> usize {
    edges
        .components
        .iter()
        .filter(|c| edges.area_fraction(c) >= CARD_MIN_AREA)
        .filter(|c| {
            let long = c.width().max(c.height()) as f64;
            let short = c.width().min(c.height()) as f64;
            (CARD_ASPECT.0..=CARD_ASPECT.1).contains(&(long / short))
        })
        .filter(|c| is_rectangular_outline(c))
        .count()
}

/// An outline hugs its bounding box and covers most of every side.
fn is_rectangular_outline(c: &Component) -> bool {
    let (w, h) = (c.width(), c.height());
    let band = (w.min(h) / 50).max(3);
    let mut top = vec![false; w];
    let mut bottom = vec![false; w];
    let mut left = vec![false; h];
    let mut right = vec![false; h];
    let mut on_border = 0usize;

    for &(x, y) in &c.pixels {
        let (dx, dy) = (x - c.min_x, y - c.min_y);
        let near_top = dy < band;
        let near_bottom = h - 1 - dy < band;
        let near_left = dx < band;
        let near_right = w - 1 - dx < band;
        if near_top || near_bottom || near_left || near_right {
            on_border += 1;
        }
        top[dx] |= near_top;
        bottom[dx] |= near_bottom;
        left[dy] |= near_left;
        right[dy] |= near_right;
    }

    let coverage = |side: &[bool]| side.iter().filter(|&&b| b).count() as f64 / side.len() as f64;
    on_border as f64 / c.len() as f64 >= CARD_BORDER_SHARE
        && [&top, &bottom, &left, &right]
            .iter()
            .all(|side| coverage(side) >= CARD_SIDE_COVERAGE)
}

// ── (b) Text regions ────────────────────────────────────────────────────

/// Count line-shaped clusters of small dark marks.
pub fn text_lines(gray: &GrayBuffer) -> usize {
    let max_height = (gray.height() / 8).max(1);
    let marks: Mask = adaptive_threshold_inv(gray, TEXT_BLOCK, TEXT_OFFSET);
    marks
        .dilate(TEXT_KERNEL.0, TEXT_KERNEL.1)
        .components()
        .iter()
        .filter(|c| {
            c.width() as f64 / c.height() as f64 > TEXT_MIN_ASPECT
                && c.width() > TEXT_MIN_WIDTH
                && c.height() <= max_height
        })
        .count()
}

pub fn has_text(lines: usize) -> bool {
    lines >= TEXT_MIN_LINES
}

// ── (c) Security features ───────────────────────────────────────────────

/// Fraction of specular pixels; holograms and laminate glare show as a
/// small bright, desaturated patch.
pub fn specular_share(rgb: &RgbBuffer) -> f64 {
    specular_ratio(rgb, SPECULAR_MIN_VALUE, SPECULAR_MAX_SATURATION)
}

pub fn has_security_features(ratio: f64) -> bool {
    (SPECULAR_RANGE.0..=SPECULAR_RANGE.1).contains(&ratio)
}

// ── (d) Photo region ────────────────────────────────────────────────────

/// Count outlines sized and shaped like an embedded portrait.
pub fn photo_candidates(edges: &EdgeMap) -> usize {
    edges
        .components
        .iter()
        .filter(|c| {
            let area = edges.area_fraction(c);
            let aspect = c.width() as f64 / c.height() as f64;
            area > PHOTO_AREA.0
                && area < PHOTO_AREA.1
                && aspect > PHOTO_ASPECT.0
                && aspect < PHOTO_ASPECT.1
        })
        .count()
}

// ── (e) Proportions ─────────────────────────────────────────────────────

/// Card or passport proportions in either orientation.
pub fn is_document_shaped(aspect_ratio: f64) -> bool {
    (LANDSCAPE.0..=LANDSCAPE.1).contains(&aspect_ratio)
        || (PORTRAIT.0..=PORTRAIT.1).contains(&aspect_ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use idv_types::Image;

    fn gray_of(img: &Image) -> GrayBuffer {
        GrayBuffer::from_image(img)
    }

    #[test]
    fn card_outline_is_found() {
        let mut img = Image::solid(400, 300, [20, 20, 20]);
        img.fill_rect(50, 50, 300, 190, [180, 180, 180]);
        assert_eq!(card_outlines(&EdgeMap::new(&gray_of(&img))), 1);
    }

    #[test]
    fn square_outline_is_not_a_card() {
        let mut img = Image::solid(400, 300, [20, 20, 20]);
        img.fill_rect(100, 50, 200, 200, [180, 180, 180]);
        assert_eq!(card_outlines(&EdgeMap::new(&gray_of(&img))), 0);
    }

    #[test]
    fn filled_blob_is_not_an_outline() {
        // A dense texture has card proportions but is not a hollow border.
        let mut img = Image::solid(400, 300, [20, 20, 20]);
        for x in (50..350).step_by(4) {
            img.fill_rect(x, 50, 2, 190, [220, 220, 220]);
        }
        assert_eq!(card_outlines(&EdgeMap::new(&gray_of(&img))), 0);
    }

    #[test]
    fn text_lines_are_counted() {
        let mut img = Image::solid(400, 300, [200, 200, 200]);
        for row in 0..3 {
            img.fill_rect(40, 40 + row * 40, 200, 5, [10, 10, 10]);
        }
        assert_eq!(text_lines(&gray_of(&img)), 3);
        assert!(has_text(3));
        assert!(!has_text(1));
    }

    #[test]
    fn blank_page_has_no_text() {
        assert_eq!(text_lines(&gray_of(&Image::solid(300, 200, [90, 90, 90]))), 0);
    }

    #[test]
    fn specular_share_window() {
        assert!(!has_security_features(0.0));
        assert!(has_security_features(0.005));
        assert!(has_security_features(0.15));
        assert!(!has_security_features(0.5));
    }

    #[test]
    fn photo_candidate_found_inside_frame() {
        let mut img = Image::solid(400, 300, [150, 150, 150]);
        img.fill_rect(40, 60, 90, 110, [40, 40, 40]);
        assert_eq!(photo_candidates(&EdgeMap::new(&gray_of(&img))), 1);
    }

    #[test]
    fn document_proportions() {
        assert!(is_document_shaped(1.586));
        assert!(is_document_shaped(0.7));
        assert!(!is_document_shaped(1.0));
        assert!(!is_document_shaped(2.5));
    }
}
