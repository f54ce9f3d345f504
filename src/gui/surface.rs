use iced::widget::image::Handle;
use image::RgbaImage;

use crate::session::{Notice, Surface};

/// The bitmap currently on screen.
#[derive(Debug, Clone)]
pub struct Frame {
    pub handle: Handle,
    pub width: u32,
    pub height: u32,
}

/// Collects what the session controller presents until the view picks it up.
#[derive(Debug, Default)]
pub struct CanvasSurface {
    frame: Option<Frame>,
    pending: Vec<Notice>,
}

impl CanvasSurface {
    pub fn frame(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}

impl Surface for CanvasSurface {
    fn present(&mut self, bitmap: RgbaImage) {
        let (width, height) = bitmap.dimensions();
        self.frame = Some(Frame {
            handle: Handle::from_rgba(width, height, bitmap.into_raw()),
            width,
            height,
        });
    }

    fn notify(&mut self, notice: Notice) {
        self.pending.push(notice);
    }
}
