use std::path::Path;

use image::{GrayImage, ImageReader, RgbImage, RgbaImage};

use crate::error::{DecodeError, RasterError};

/// Byte order of the color channels in a 3-channel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    /// Red, green, blue. What the display surface expects.
    Display,
    /// Blue, green, red. What the decoder hands out and the detector consumes.
    Native,
}

/// An in-memory pixel buffer.
///
/// Width and height are never zero and the buffer always holds exactly
/// `width * height * channels` bytes. Only 1 and 3 channel images exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    pixels: Vec<u8>,
    width: u32,
    height: u32,
    channels: u8,
    order: ChannelOrder,
}

impl RasterImage {
    pub fn from_raw(
        width: u32,
        height: u32,
        channels: u8,
        order: ChannelOrder,
        pixels: Vec<u8>,
    ) -> Result<Self, RasterError> {
        if width == 0 || height == 0 {
            return Err(RasterError::ZeroDimensions);
        }
        if channels != 1 && channels != 3 {
            return Err(RasterError::UnsupportedChannels(channels));
        }
        let expected = width as usize * height as usize * channels as usize;
        if pixels.len() != expected {
            return Err(RasterError::BufferLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
            channels,
            order,
        })
    }

    /// Wrap an RGB buffer, keeping it in display order.
    pub fn from_rgb(img: RgbImage) -> Result<Self, RasterError> {
        let (width, height) = img.dimensions();
        Self::from_raw(width, height, 3, ChannelOrder::Display, img.into_raw())
    }

    pub fn from_gray(img: GrayImage) -> Result<Self, RasterError> {
        let (width, height) = img.dimensions();
        Self::from_raw(width, height, 1, ChannelOrder::Display, img.into_raw())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn channels(&self) -> u8 {
        self.channels
    }

    pub fn order(&self) -> ChannelOrder {
        self.order
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Copy with the color channels rearranged into `order`.
    pub fn to_order(&self, order: ChannelOrder) -> Self {
        let mut out = self.clone();
        if self.channels == 3 && self.order != order {
            for px in out.pixels.chunks_exact_mut(3) {
                px.swap(0, 2);
            }
        }
        out.order = order;
        out
    }

    /// Single-channel brightness using BT.601 weights.
    pub fn to_luminance(&self) -> GrayImage {
        let luma = if self.channels == 1 {
            self.pixels.clone()
        } else {
            self.pixels
                .chunks_exact(3)
                .map(|px| {
                    let [r, g, b] = self.rgb_of(px);
                    let weighted = 299 * r as u32 + 587 * g as u32 + 114 * b as u32;
                    ((weighted + 500) / 1000) as u8
                })
                .collect()
        };
        // Length matches width * height by construction.
        GrayImage::from_raw(self.width, self.height, luma)
            .unwrap_or_else(|| GrayImage::new(self.width, self.height))
    }

    pub fn to_rgb_display(&self) -> RgbImage {
        RgbImage::from_fn(self.width, self.height, |x, y| {
            let i = self.index(x, y);
            if self.channels == 1 {
                let v = self.pixels[i];
                image::Rgb([v, v, v])
            } else {
                image::Rgb(self.rgb_of(&self.pixels[i..i + 3]))
            }
        })
    }

    pub fn to_rgba_display(&self) -> RgbaImage {
        image::DynamicImage::ImageRgb8(self.to_rgb_display()).to_rgba8()
    }

    /// Map an RGB color into this image's channel order.
    pub(crate) fn encode_rgb(&self, [r, g, b]: [u8; 3]) -> [u8; 3] {
        match self.order {
            ChannelOrder::Display => [r, g, b],
            ChannelOrder::Native => [b, g, r],
        }
    }

    /// Same geometry and order, different pixels. `pixels` must have the
    /// same length as the current buffer.
    pub(crate) fn with_pixels(&self, pixels: Vec<u8>) -> Self {
        debug_assert_eq!(pixels.len(), self.pixels.len());
        Self {
            pixels,
            width: self.width,
            height: self.height,
            channels: self.channels,
            order: self.order,
        }
    }

    fn rgb_of(&self, px: &[u8]) -> [u8; 3] {
        match self.order {
            ChannelOrder::Display => [px[0], px[1], px[2]],
            ChannelOrder::Native => [px[2], px[1], px[0]],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * self.channels as usize
    }
}

/// Decode the image file at `path` into a 3-channel native-order buffer.
///
/// The file extension is ignored; the format is sniffed from the content.
/// Alpha is dropped and grayscale sources are expanded to three channels.
pub fn load(path: impl AsRef<Path>) -> Result<RasterImage, DecodeError> {
    let path = path.as_ref();
    let io_err = |source| DecodeError::Io {
        path: path.to_path_buf(),
        source,
    };

    let decoded = ImageReader::open(path)
        .map_err(io_err)?
        .with_guessed_format()
        .map_err(io_err)?
        .decode()
        .map_err(|source| DecodeError::Image {
            path: path.to_path_buf(),
            source,
        })?;

    let raster = RasterImage::from_rgb(decoded.to_rgb8()).map_err(|_| DecodeError::Empty {
        path: path.to_path_buf(),
    })?;

    log::debug!(
        "decoded {} as {}x{}",
        path.display(),
        raster.width(),
        raster.height()
    );
    Ok(raster.to_order(ChannelOrder::Native))
}
