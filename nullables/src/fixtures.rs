//! Synthetic images drawn from flat shapes.
//!
//! They are built to trip specific detectors: `id_card` carries every
//! structural document feature, `face_closeup` carries none of the ones
//! that matter, and `selfie` is a plain portrait unrelated to either.

use idv_types::{FaceBox, Image};

/// Paint a filled axis-aligned ellipse.
pub fn fill_ellipse(image: &mut Image, cx: u32, cy: u32, rx: u32, ry: u32, rgb: [u8; 3]) {
    let (rx2, ry2) = ((rx * rx) as f64, (ry * ry) as f64);
    let y_end = (cy + ry).min(image.height() - 1);
    let x_end = (cx + rx).min(image.width() - 1);
    for y in cy.saturating_sub(ry)..=y_end {
        for x in cx.saturating_sub(rx)..=x_end {
            let dx = x as f64 - cx as f64;
            let dy = y as f64 - cy as f64;
            if dx * dx / rx2 + dy * dy / ry2 <= 1.0 {
                image.put_rgb(x, y, rgb);
            }
        }
    }
}

/// An 800x520 landscape frame holding an ID card: a bordered card with an
/// embedded portrait, four printed text lines and a hologram patch.
pub fn id_card() -> Image {
    let mut img = Image::solid(800, 520, [30, 30, 30]);
    // card body
    img.fill_rect(80, 60, 640, 400, [120, 140, 160]);
    // portrait
    img.fill_rect(110, 110, 150, 180, [90, 70, 60]);
    // text lines
    for line in 0..4 {
        img.fill_rect(300, 120 + line * 30, 220, 6, [20, 20, 20]);
    }
    // hologram
    img.fill_rect(600, 360, 60, 60, [255, 255, 255]);
    img
}

/// Where the portrait sits in [`id_card`].
pub fn id_card_face() -> FaceBox {
    FaceBox::new(110, 110, 150, 180)
}

/// A 480x640 portrait-orientation close-up: one face filling most of the
/// frame, no card around it.
pub fn face_closeup() -> Image {
    let mut img = Image::solid(480, 640, [200, 190, 180]);
    fill_ellipse(&mut img, 240, 320, 200, 300, [210, 160, 130]);
    img.fill_rect(150, 230, 60, 24, [60, 40, 30]);
    img.fill_rect(270, 230, 60, 24, [60, 40, 30]);
    img.fill_rect(180, 430, 120, 20, [150, 60, 60]);
    img
}

/// Face box a detector would report for [`face_closeup`]; covers 75% of
/// the frame.
pub fn face_closeup_face() -> FaceBox {
    FaceBox::new(32, 43, 416, 554)
}

/// A 600x800 selfie: a face on a muted background with a shirt below.
pub fn selfie() -> Image {
    let mut img = Image::solid(600, 800, [70, 110, 90]);
    img.fill_rect(100, 560, 400, 240, [40, 50, 120]);
    fill_ellipse(&mut img, 300, 330, 150, 200, [205, 170, 140]);
    img.fill_rect(235, 280, 40, 16, [50, 35, 30]);
    img.fill_rect(325, 280, 40, 16, [50, 35, 30]);
    img.fill_rect(255, 430, 90, 14, [160, 70, 70]);
    img
}
