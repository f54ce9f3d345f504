mod app;
mod message;
mod surface;

pub use app::FaceFindApp;
pub use message::Message;
pub use surface::{CanvasSurface, Frame};

use crate::config::AppConfig;
use crate::detection::HaarCascade;
use crate::session::SessionController;

/// Open the window and block until it is closed.
pub fn run(config: AppConfig, cascade: HaarCascade) -> anyhow::Result<()> {
    let viewport = config.viewport;
    let boot = move || FaceFindApp::new(SessionController::new(cascade.clone(), viewport));

    iced::application(boot, FaceFindApp::update, FaceFindApp::view)
        .title(FaceFindApp::title)
        .window_size((viewport.width as f32 + 40.0, viewport.height as f32 + 160.0))
        .run()?;
    Ok(())
}
