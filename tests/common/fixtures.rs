use facefind::{
    ChannelOrder, DetectionParams, FaceDetector, FaceRegion, HaarCascade, Notice, RasterImage,
    Surface,
};
use image::{GrayImage, Rgb, RgbImage, RgbaImage};
use tempfile::NamedTempFile;

/// One-stage cascade with a 20x20 window that fires when the middle
/// quarter of the window is much brighter than its border.
pub const TEST_CASCADE_XML: &str = r#"<?xml version="1.0"?>
<opencv_storage>
<cascade type_id="opencv-cascade-classifier">
  <stageType>BOOST</stageType>
  <featureType>HAAR</featureType>
  <height>20</height>
  <width>20</width>
  <stageParams>
    <maxWeakCount>1</maxWeakCount></stageParams>
  <featureParams>
    <maxCatCount>0</maxCatCount></featureParams>
  <stageNum>1</stageNum>
  <stages>
    <_>
      <maxWeakCount>1</maxWeakCount>
      <stageThreshold>5.0000000000000000e-01</stageThreshold>
      <weakClassifiers>
        <_>
          <internalNodes>
            0 -1 0 5.0000000000000003e-02</internalNodes>
          <leafValues>
            -1. 1.</leafValues></_></weakClassifiers></_></stages>
  <features>
    <_>
      <rects>
        <_>
          0 0 20 20 -1.</_>
        <_>
          5 5 10 10 4.</_></rects></_></features></cascade>
</opencv_storage>
"#;

pub fn test_cascade() -> HaarCascade {
    HaarCascade::from_xml_str(TEST_CASCADE_XML).expect("test cascade should parse")
}

pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Black RGB image with a white square drawn at `(x, y)`.
pub fn square_rgb(width: u32, height: u32, x: u32, y: u32, size: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |px, py| {
        if px >= x && px < x + size && py >= y && py < y + size {
            WHITE
        } else {
            BLACK
        }
    })
}

pub fn square_image(width: u32, height: u32, x: u32, y: u32, size: u32) -> RasterImage {
    RasterImage::from_rgb(square_rgb(width, height, x, y, size))
        .expect("non-empty image")
        .to_order(ChannelOrder::Native)
}

pub fn blank_image(width: u32, height: u32) -> RasterImage {
    RasterImage::from_raw(
        width,
        height,
        3,
        ChannelOrder::Native,
        vec![0; (width * height * 3) as usize],
    )
    .expect("valid blank image")
}

/// Writes `img` as a PNG into a temp file with the given suffix.
/// The file will be automatically cleaned up when dropped.
pub fn write_png(img: &RgbImage, suffix: &str) -> NamedTempFile {
    let file = tempfile::Builder::new()
        .suffix(suffix)
        .tempfile()
        .expect("Failed to create temp image file");
    img.save_with_format(file.path(), image::ImageFormat::Png)
        .expect("Failed to save test image");
    file
}

/// Surface that remembers everything it was handed.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub frames: Vec<RgbaImage>,
    pub notices: Vec<Notice>,
}

impl RecordingSurface {
    pub fn last_frame(&self) -> &RgbaImage {
        self.frames.last().expect("a frame was presented")
    }
}

impl Surface for RecordingSurface {
    fn present(&mut self, bitmap: RgbaImage) {
        self.frames.push(bitmap);
    }

    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

/// Detector that reports the same regions for every image.
#[derive(Debug, Clone)]
pub struct FixedDetector(pub Vec<FaceRegion>);

impl FaceDetector for FixedDetector {
    fn detect_multi_scale(&self, _gray: &GrayImage, _params: &DetectionParams) -> Vec<FaceRegion> {
        self.0.clone()
    }
}
