use image::imageops::{self, FilterType};
use image::{GrayImage, Luma};
use imageproc::integral_image::{integral_image, integral_squared_image};

use crate::raster::RasterImage;

/// Convert image to grayscale
pub fn to_grayscale(img: &RasterImage) -> GrayImage {
    img.to_luminance()
}

/// Bilinear resize, skipped when the size already matches
pub fn resize(img: &GrayImage, width: u32, height: u32) -> GrayImage {
    if img.dimensions() == (width, height) {
        return img.clone();
    }
    imageops::resize(img, width, height, FilterType::Triangle)
}

/// Summed-area tables of pixel values and squared pixel values.
///
/// Both tables are `(width + 1) x (height + 1)` with a zero first row and
/// column, so `sum(x, y, w, h)` needs no bounds special-casing.
pub struct IntegralImages {
    sum: Vec<u64>,
    squared: Vec<u64>,
    stride: usize,
}

impl IntegralImages {
    pub fn new(img: &GrayImage) -> Self {
        let sum = integral_image::<Luma<u8>, u64>(img);
        let squared = integral_squared_image::<Luma<u8>, u64>(img);
        Self {
            stride: sum.width() as usize,
            sum: sum.into_raw(),
            squared: squared.into_raw(),
        }
    }

    pub fn sum(&self, x: u32, y: u32, w: u32, h: u32) -> u64 {
        Self::area(&self.sum, self.stride, x, y, w, h)
    }

    pub fn squared_sum(&self, x: u32, y: u32, w: u32, h: u32) -> u64 {
        Self::area(&self.squared, self.stride, x, y, w, h)
    }

    fn area(table: &[u64], stride: usize, x: u32, y: u32, w: u32, h: u32) -> u64 {
        let (x0, y0) = (x as usize, y as usize);
        let (x1, y1) = (x0 + w as usize, y0 + h as usize);
        table[y1 * stride + x1] + table[y0 * stride + x0]
            - table[y0 * stride + x1]
            - table[y1 * stride + x0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integral_sums_match_direct_sums() {
        let img = GrayImage::from_fn(7, 5, |x, y| Luma([(x * 13 + y * 29) as u8]));
        let tables = IntegralImages::new(&img);

        let (x, y, w, h) = (2, 1, 4, 3);
        let mut direct = 0u64;
        let mut direct_sq = 0u64;
        for yy in y..y + h {
            for xx in x..x + w {
                let v = img.get_pixel(xx, yy).0[0] as u64;
                direct += v;
                direct_sq += v * v;
            }
        }

        assert_eq!(tables.sum(x, y, w, h), direct);
        assert_eq!(tables.squared_sum(x, y, w, h), direct_sq);
        assert_eq!(tables.sum(0, 0, 7, 5), img.pixels().map(|p| p.0[0] as u64).sum::<u64>());
    }
}
