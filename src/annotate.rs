use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::drawing::{Canvas, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use crate::detection::FaceRegion;
use crate::raster::RasterImage;

/// Outline color, in RGB.
pub const MARKER_COLOR: [u8; 3] = [0, 255, 0];

/// Outline thickness in pixels, drawn inward from the region edge.
pub const STROKE_WIDTH: u32 = 2;

/// Copy `image` and outline every region on the copy.
///
/// Regions are in `image`'s own pixel coordinates; `image` is left untouched.
pub fn annotate(image: &RasterImage, regions: &[FaceRegion]) -> RasterImage {
    let (width, height) = image.dimensions();
    let pixels = image.pixels().to_vec();

    let drawn = if image.channels() == 1 {
        GrayImage::from_raw(width, height, pixels).map(|mut canvas| {
            outline(&mut canvas, regions, Luma([u8::MAX]));
            canvas.into_raw()
        })
    } else {
        let color = Rgb(image.encode_rgb(MARKER_COLOR));
        RgbImage::from_raw(width, height, pixels).map(|mut canvas| {
            outline(&mut canvas, regions, color);
            canvas.into_raw()
        })
    };

    match drawn {
        Some(pixels) => image.with_pixels(pixels),
        None => image.clone(),
    }
}

fn outline<C: Canvas>(canvas: &mut C, regions: &[FaceRegion], color: C::Pixel) {
    for region in regions {
        for t in 0..STROKE_WIDTH {
            let (w, h) = (
                region.width.saturating_sub(2 * t),
                region.height.saturating_sub(2 * t),
            );
            if w == 0 || h == 0 {
                break;
            }
            let rect = Rect::at((region.x + t) as i32, (region.y + t) as i32).of_size(w, h);
            draw_hollow_rect_mut(canvas, rect, color);
        }
    }
}
