use std::path::Path;

use image::RgbaImage;

use crate::annotate::annotate;
use crate::detection::{DetectionInvoker, FaceDetector, FaceRegion};
use crate::error::{Error, Result};
use crate::raster::{self, RasterImage};
use crate::scaling::{ScaleSpec, Viewport, fit_image, render_display};

pub const LOAD_ERROR_TITLE: &str = "Error";
pub const LOAD_ERROR_MESSAGE: &str = "Could not load image!";
pub const DETECTION_TITLE: &str = "Detection Complete";

pub fn faces_found_message(count: usize) -> String {
    format!("Found {count} faces in the image!")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    NoImage,
    ImageOnly,
    ImageWithFaces,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Error,
    Info,
}

/// A message for the user, shown by the shell as a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: &'static str,
    pub message: String,
}

impl Notice {
    pub fn error(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            title,
            message: message.into(),
        }
    }

    pub fn info(title: &'static str, message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            title,
            message: message.into(),
        }
    }
}

/// Where the controller sends what the user sees.
pub trait Surface {
    /// Replace the displayed bitmap.
    fn present(&mut self, bitmap: RgbaImage);

    fn notify(&mut self, notice: Notice);
}

#[derive(Debug, Clone)]
pub struct SessionState {
    original: Option<RasterImage>,
    faces: Option<Vec<FaceRegion>>,
    mode: DisplayMode,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            original: None,
            faces: None,
            mode: DisplayMode::NoImage,
        }
    }
}

impl SessionState {
    pub fn original(&self) -> Option<&RasterImage> {
        self.original.as_ref()
    }

    pub fn faces(&self) -> Option<&[FaceRegion]> {
        self.faces.as_deref()
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }
}

/// Drives the load and detect transitions for one window.
///
/// `NoImage -> ImageOnly` on a successful load, `ImageOnly | ImageWithFaces ->
/// ImageWithFaces` on detect. A successful load always lands in `ImageOnly`
/// and forgets earlier detections; a failed load changes nothing.
pub struct SessionController<D> {
    state: SessionState,
    invoker: DetectionInvoker<D>,
    viewport: Viewport,
}

impl<D: FaceDetector> SessionController<D> {
    pub fn new(detector: D, viewport: Viewport) -> Self {
        Self::with_invoker(DetectionInvoker::new(detector), viewport)
    }

    pub fn with_invoker(invoker: DetectionInvoker<D>, viewport: Viewport) -> Self {
        Self {
            state: SessionState::default(),
            invoker,
            viewport,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn mode(&self) -> DisplayMode {
        self.state.mode
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether the Detect control should be enabled.
    pub fn can_detect(&self) -> bool {
        self.state.original.is_some()
    }

    /// Display size of the loaded image.
    pub fn scale_spec(&self) -> Option<ScaleSpec> {
        self.state
            .original
            .as_ref()
            .map(|img| fit_image(img, self.viewport))
    }

    pub fn load(&mut self, path: impl AsRef<Path>, surface: &mut impl Surface) -> Result<()> {
        let path = path.as_ref();
        let image = match raster::load(path) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("{e}");
                surface.notify(Notice::error(LOAD_ERROR_TITLE, LOAD_ERROR_MESSAGE));
                return Err(e.into());
            }
        };

        let spec = fit_image(&image, self.viewport);
        let bitmap = render_display(&image, &spec);
        log::info!(
            "loaded {} ({}x{}), displaying at {}x{}",
            path.display(),
            image.width(),
            image.height(),
            spec.width,
            spec.height
        );

        self.state = SessionState {
            original: Some(image),
            faces: None,
            mode: DisplayMode::ImageOnly,
        };
        surface.present(bitmap);
        Ok(())
    }

    /// Detect faces in the loaded image and show them outlined.
    ///
    /// Always annotates the image as loaded, never an earlier annotated copy.
    /// Returns the number of faces found.
    pub fn detect(&mut self, surface: &mut impl Surface) -> Result<usize> {
        let Some(original) = self.state.original.as_ref() else {
            log::error!("detect requested with no image loaded");
            return Err(Error::NoImageLoaded);
        };

        let faces = self.invoker.detect(original);
        let annotated = annotate(original, &faces);
        let spec = fit_image(original, self.viewport);
        let bitmap = render_display(&annotated, &spec);

        let count = faces.len();
        log::info!("found {count} faces");

        self.state.faces = Some(faces);
        self.state.mode = DisplayMode::ImageWithFaces;
        surface.present(bitmap);
        surface.notify(Notice::info(DETECTION_TITLE, faces_found_message(count)));
        Ok(count)
    }
}
