pub mod cascade;
pub mod grouping;
pub mod preprocessing;

use image::GrayImage;

use crate::raster::RasterImage;

pub use cascade::HaarCascade;

/// One detected face, in pixel coordinates of the image it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Trim the region to a `width` x `height` image. `None` if nothing is left.
    pub fn clamp_to(&self, width: u32, height: u32) -> Option<Self> {
        if self.x >= width || self.y >= height {
            return None;
        }
        let clamped = Self {
            x: self.x,
            y: self.y,
            width: self.width.min(width - self.x),
            height: self.height.min(height - self.y),
        };
        (clamped.width > 0 && clamped.height > 0).then_some(clamped)
    }

    pub fn is_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width && self.bottom() <= height
    }
}

/// Tuning knobs handed to a [`FaceDetector`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    /// Growth of the search window between scan passes (1.1 = 10% per step).
    pub scale_factor: f64,
    /// A candidate must be corroborated by more than this many overlapping
    /// raw detections to be reported.
    pub min_neighbors: u32,
    /// Regions smaller than this (width, height) are discarded.
    pub min_size: (u32, u32),
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 5,
            min_size: (30, 30),
        }
    }
}

/// A face detection backend.
pub trait FaceDetector {
    /// Find faces in a grayscale image. Regions are in `gray`'s coordinates.
    fn detect_multi_scale(&self, gray: &GrayImage, params: &DetectionParams) -> Vec<FaceRegion>;
}

impl<D: FaceDetector + ?Sized> FaceDetector for Box<D> {
    fn detect_multi_scale(&self, gray: &GrayImage, params: &DetectionParams) -> Vec<FaceRegion> {
        (**self).detect_multi_scale(gray, params)
    }
}

/// Runs a [`FaceDetector`] with a fixed parameter policy.
pub struct DetectionInvoker<D> {
    detector: D,
    params: DetectionParams,
}

impl<D: FaceDetector> DetectionInvoker<D> {
    pub fn new(detector: D) -> Self {
        Self::with_params(detector, DetectionParams::default())
    }

    pub fn with_params(detector: D, params: DetectionParams) -> Self {
        Self { detector, params }
    }

    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    /// Detect faces in `image`.
    ///
    /// Every returned region lies inside the image and is at least
    /// `min_size` before trimming to the image edge.
    pub fn detect(&self, image: &RasterImage) -> Vec<FaceRegion> {
        let gray = preprocessing::to_grayscale(image);
        let (min_w, min_h) = self.params.min_size;

        let raw = self.detector.detect_multi_scale(&gray, &self.params);
        let raw_count = raw.len();
        let regions: Vec<FaceRegion> = raw
            .into_iter()
            .filter(|r| r.width >= min_w && r.height >= min_h)
            .filter_map(|r| r.clamp_to(image.width(), image.height()))
            .collect();

        log::debug!(
            "detector returned {} regions, kept {} on {}x{} image",
            raw_count,
            regions.len(),
            image.width(),
            image.height()
        );
        regions
    }
}
