pub mod annotate;
pub mod config;
pub mod detection;
pub mod error;
pub mod logging;
pub mod raster;
pub mod scaling;
pub mod session;

pub use annotate::annotate;
pub use config::AppConfig;
pub use detection::{DetectionInvoker, DetectionParams, FaceDetector, FaceRegion, HaarCascade};
pub use error::{CascadeError, DecodeError, Error, RasterError};
pub use raster::{ChannelOrder, RasterImage, load};
pub use scaling::{ScaleSpec, Viewport, fit};
pub use session::{DisplayMode, Notice, NoticeLevel, SessionController, SessionState, Surface};

#[cfg(feature = "gui")]
pub mod gui;
