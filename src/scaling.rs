use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::raster::RasterImage;

/// Size of the display viewport images are fitted into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
        }
    }
}

/// Result of fitting a source size into a bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleSpec {
    pub bound_width: u32,
    pub bound_height: u32,
    pub scale: f64,
    pub width: u32,
    pub height: u32,
}

/// Largest uniform scale of `src` that fits inside `bound`.
///
/// Small sources are scaled up. Each output side is rounded and then
/// clamped to `1..=bound`. Returns `None` if any input is zero.
pub fn fit(src_width: u32, src_height: u32, bound_width: u32, bound_height: u32) -> Option<ScaleSpec> {
    if src_width == 0 || src_height == 0 || bound_width == 0 || bound_height == 0 {
        return None;
    }

    let scale = f64::min(
        bound_width as f64 / src_width as f64,
        bound_height as f64 / src_height as f64,
    );
    let side = |src: u32, bound: u32| ((src as f64 * scale).round() as u32).clamp(1, bound);

    Some(ScaleSpec {
        bound_width,
        bound_height,
        scale,
        width: side(src_width, bound_width),
        height: side(src_height, bound_height),
    })
}

/// Fit `image` into `viewport`.
pub fn fit_image(image: &RasterImage, viewport: Viewport) -> ScaleSpec {
    // RasterImage and Viewport never carry zero sides.
    fit(image.width(), image.height(), viewport.width, viewport.height).unwrap_or(ScaleSpec {
        bound_width: viewport.width,
        bound_height: viewport.height,
        scale: 1.0,
        width: image.width().clamp(1, viewport.width.max(1)),
        height: image.height().clamp(1, viewport.height.max(1)),
    })
}

/// Resize `image` to exactly the size in `spec` as a display-order bitmap.
pub fn render_display(image: &RasterImage, spec: &ScaleSpec) -> RgbaImage {
    let rgba = image.to_rgba_display();
    if rgba.dimensions() == (spec.width, spec.height) {
        return rgba;
    }
    imageops::resize(&rgba, spec.width, spec.height, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_inputs_have_no_fit() {
        assert!(fit(0, 10, 800, 600).is_none());
        assert!(fit(10, 10, 800, 0).is_none());
    }

    #[test]
    fn extreme_aspect_ratio_keeps_one_pixel() {
        let spec = fit(100_000, 1, 800, 600).unwrap();
        assert_eq!((spec.width, spec.height), (800, 1));
        let spec = fit(1, 100_000, 800, 600).unwrap();
        assert_eq!((spec.width, spec.height), (1, 600));
    }

    #[test]
    fn exact_fit_is_identity() {
        let spec = fit(800, 600, 800, 600).unwrap();
        assert_eq!(spec.scale, 1.0);
        assert_eq!((spec.width, spec.height), (800, 600));
    }
}
