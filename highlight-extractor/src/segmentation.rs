//! Highlight color segmentation.
//!
//! Classifies raster pixels by HSV color band and produces a binary mask of
//! highlighted regions, using the 8-bit HSV scales of the usual computer vision
//! conventions (hue 0-179, saturation and value 0-255).

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::distance_transform::Norm;
use imageproc::morphology::dilate;
use serde::Deserialize;

/// Largest hue on the 8-bit half-degree scale.
pub const HUE_MAX: u8 = 179;

const MASK_ON: Luma<u8> = Luma([255]);
const MASK_OFF: Luma<u8> = Luma([0]);

/// Inclusive HSV bounds a pixel must fall inside to count as highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct HsvBand {
    #[serde(default = "default_hue")]
    pub hue: [u8; 2],

    #[serde(default = "default_saturation")]
    pub saturation: [u8; 2],

    #[serde(default = "default_value")]
    pub value: [u8; 2],
}

impl Default for HsvBand {
    /// Yellow marker ink.
    fn default() -> Self {
        Self {
            hue: default_hue(),
            saturation: default_saturation(),
            value: default_value(),
        }
    }
}

impl HsvBand {
    /// Check whether an `[h, s, v]` triple lies inside the band.
    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        let [h, s, v] = hsv;
        (self.hue[0]..=self.hue[1]).contains(&h)
            && (self.saturation[0]..=self.saturation[1]).contains(&s)
            && (self.value[0]..=self.value[1]).contains(&v)
    }
}

fn default_hue() -> [u8; 2] {
    [20, 35]
}

fn default_saturation() -> [u8; 2] {
    [100, 255]
}

fn default_value() -> [u8; 2] {
    [100, 255]
}

/// Convert an 8-bit RGB pixel to 8-bit `[h, s, v]`.
///
/// Hue is in half-degrees (0-179) so it fits a byte. Achromatic pixels get hue 0.
pub fn rgb_to_hsv(pixel: &Rgb<u8>) -> [u8; 3] {
    let [r, g, b] = pixel.0.map(i32::from);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v == 0 { 0 } else { (255 * diff + v / 2) / v };

    let h = if diff == 0 {
        0
    } else {
        // Sector offset in units of 60 degrees, scaled by diff
        let raw = if v == r {
            g - b
        } else if v == g {
            b - r + 2 * diff
        } else {
            r - g + 4 * diff
        };
        let h = (raw as f32 * 30.0 / diff as f32 + 0.5).floor() as i32;
        if h < 0 { h + 180 } else { h }
    };

    [h as u8, s as u8, v as u8]
}

/// Build the highlight mask for a page raster.
///
/// Pixels inside `band` are set to 255, everything else to 0. The raw mask is
/// then dilated with a square of the given radius (1 = 3x3) to close the gaps
/// anti-aliased marker edges leave around glyphs. A radius of 0 skips dilation.
pub fn highlight_mask(raster: &RgbImage, band: &HsvBand, dilation_radius: u8) -> GrayImage {
    let raw = GrayImage::from_fn(raster.width(), raster.height(), |x, y| {
        if band.contains(rgb_to_hsv(raster.get_pixel(x, y))) {
            MASK_ON
        } else {
            MASK_OFF
        }
    });

    if dilation_radius == 0 || raw.width() == 0 || raw.height() == 0 {
        return raw;
    }
    dilate(&raw, Norm::LInf, dilation_radius)
}

/// Keep raster pixels where the mask is set and black out the rest.
pub fn apply_mask(raster: &RgbImage, mask: &GrayImage) -> RgbImage {
    debug_assert_eq!(raster.dimensions(), mask.dimensions());

    RgbImage::from_fn(raster.width(), raster.height(), |x, y| {
        if mask.get_pixel(x, y)[0] > 0 {
            *raster.get_pixel(x, y)
        } else {
            Rgb([0, 0, 0])
        }
    })
}

/// Fraction of mask pixels that are set.
pub fn mask_coverage(mask: &GrayImage) -> f64 {
    let total = mask.width() as u64 * mask.height() as u64;
    if total == 0 {
        return 0.0;
    }
    let set = mask.pixels().filter(|p| p[0] > 0).count() as u64;
    set as f64 / total as f64
}
