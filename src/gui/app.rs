use iced::{
    Alignment::Center,
    Element, Length, Task,
    widget::{button, column, container, text},
};
use rfd::{AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageLevel};

use super::{CanvasSurface, Message};
use crate::config::IMAGE_EXTENSIONS;
use crate::detection::FaceDetector;
use crate::scaling::Viewport;
use crate::session::{Notice, NoticeLevel, SessionController};

pub struct FaceFindApp<D> {
    controller: SessionController<D>,
    canvas: CanvasSurface,
}

impl<D: FaceDetector> FaceFindApp<D> {
    pub fn new(controller: SessionController<D>) -> Self {
        Self {
            controller,
            canvas: CanvasSurface::default(),
        }
    }

    pub fn title(&self) -> String {
        "Face Detection App".to_string()
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::LoadImage => Task::perform(
                AsyncFileDialog::new()
                    .add_filter("Image files", &IMAGE_EXTENSIONS)
                    .pick_file(),
                |handle| Message::FileChosen(handle.map(|data| data.path().to_path_buf())),
            ),
            Message::FileChosen(None) => Task::none(),
            Message::FileChosen(Some(path)) => {
                // Failures are already reported through the canvas notices.
                let _ = self.controller.load(&path, &mut self.canvas);
                self.show_notices()
            }
            Message::DetectFaces => {
                if let Err(e) = self.controller.detect(&mut self.canvas) {
                    log::error!("detect ignored: {e}");
                }
                self.show_notices()
            }
            Message::DialogClosed => Task::none(),
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        let load = button("Load Image")
            .padding([10, 20])
            .on_press(Message::LoadImage);
        let detect = button("Detect Faces")
            .padding([10, 20])
            .on_press_maybe(self.controller.can_detect().then_some(Message::DetectFaces));

        let display: Element<'_, Message> = match self.canvas.frame() {
            Some(frame) => iced::widget::image(frame.handle.clone())
                .width(Length::Fixed(frame.width as f32))
                .height(Length::Fixed(frame.height as f32))
                .into(),
            None => {
                let Viewport { width, height } = self.controller.viewport();
                container(text(""))
                    .width(Length::Fixed(width as f32))
                    .height(Length::Fixed(height as f32))
                    .into()
            }
        };

        column![load, detect, display]
            .spacing(10)
            .padding(10)
            .align_x(Center)
            .into()
    }

    fn show_notices(&mut self) -> Task<Message> {
        Task::batch(self.canvas.take_notices().into_iter().map(show_notice))
    }
}

fn show_notice(notice: Notice) -> Task<Message> {
    let level = match notice.level {
        NoticeLevel::Error => MessageLevel::Error,
        NoticeLevel::Info => MessageLevel::Info,
    };
    Task::perform(
        AsyncMessageDialog::new()
            .set_level(level)
            .set_title(notice.title)
            .set_description(notice.message)
            .set_buttons(MessageButtons::Ok)
            .show(),
        |_| Message::DialogClosed,
    )
}
