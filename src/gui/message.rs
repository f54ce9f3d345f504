use std::path::PathBuf;

#[derive(Debug, Clone)]
pub enum Message {
    LoadImage,
    FileChosen(Option<PathBuf>),
    DetectFaces,
    DialogClosed,
}
