mod common;

use common::*;
use facefind::session::{DETECTION_TITLE, LOAD_ERROR_MESSAGE, faces_found_message};
use facefind::{DisplayMode, Error, FaceRegion, NoticeLevel, SessionController, Viewport};

fn controller() -> SessionController<facefind::HaarCascade> {
    SessionController::new(test_cascade(), Viewport::default())
}

#[test]
fn starts_without_image() {
    let session = controller();
    assert_eq!(session.mode(), DisplayMode::NoImage);
    assert!(!session.can_detect());
    assert!(session.scale_spec().is_none());
}

#[test]
fn load_large_image_displays_at_half_size() -> anyhow::Result<()> {
    let file = write_png(&square_rgb(1600, 1200, 100, 100, 200), ".png");
    let mut session = controller();
    let mut surface = RecordingSurface::default();

    session.load(file.path(), &mut surface)?;

    assert_eq!(session.mode(), DisplayMode::ImageOnly);
    assert!(session.can_detect());
    let spec = session.scale_spec().unwrap();
    assert_eq!(spec.scale, 0.5);
    assert_eq!(surface.frames.len(), 1);
    assert_eq!(surface.last_frame().dimensions(), (800, 600));
    assert!(surface.notices.is_empty());
    Ok(())
}

#[test]
fn load_missing_file_reports_error_and_keeps_state() {
    let mut session = controller();
    let mut surface = RecordingSurface::default();

    let result = session.load("/no/such/image.png", &mut surface);

    assert!(matches!(result, Err(Error::Decode(_))));
    assert_eq!(session.mode(), DisplayMode::NoImage);
    assert!(!session.can_detect());
    assert!(surface.frames.is_empty());
    assert_eq!(surface.notices.len(), 1);
    assert_eq!(surface.notices[0].level, NoticeLevel::Error);
    assert_eq!(surface.notices[0].message, LOAD_ERROR_MESSAGE);
    assert_eq!(LOAD_ERROR_MESSAGE, "Could not load image!");
}

#[test]
fn failed_load_keeps_previous_image() -> anyhow::Result<()> {
    let file = write_png(&square_rgb(300, 200, 10, 10, 40), ".png");
    let garbage = tempfile::NamedTempFile::new()?;
    std::fs::write(garbage.path(), b"not an image at all")?;

    let mut session = controller();
    let mut surface = RecordingSurface::default();
    session.load(file.path(), &mut surface)?;
    session.detect(&mut surface)?;
    let before = session.state().clone();

    assert!(session.load(garbage.path(), &mut surface).is_err());

    assert_eq!(session.mode(), DisplayMode::ImageWithFaces);
    assert_eq!(session.state().original(), before.original());
    assert_eq!(session.state().faces(), before.faces());
    Ok(())
}

#[test]
fn detect_without_image_is_rejected() {
    let mut session = controller();
    let mut surface = RecordingSurface::default();

    let result = session.detect(&mut surface);

    assert!(matches!(result, Err(Error::NoImageLoaded)));
    assert_eq!(session.mode(), DisplayMode::NoImage);
    assert!(surface.frames.is_empty());
    assert!(surface.notices.is_empty());
}

#[test]
fn detect_on_blank_image_finds_nothing() -> anyhow::Result<()> {
    let file = write_png(&square_rgb(640, 480, 0, 0, 0), ".png");
    let mut session = controller();
    let mut surface = RecordingSurface::default();
    session.load(file.path(), &mut surface)?;

    let count = session.detect(&mut surface)?;

    assert_eq!(count, 0);
    assert_eq!(session.mode(), DisplayMode::ImageWithFaces);
    assert_eq!(session.state().faces(), Some(&[][..]));
    assert_eq!(surface.frames.len(), 2);
    assert_eq!(surface.last_frame().dimensions(), (800, 600));
    let notice = surface.notices.last().unwrap();
    assert_eq!(notice.level, NoticeLevel::Info);
    assert_eq!(notice.title, DETECTION_TITLE);
    assert_eq!(notice.message, "Found 0 faces in the image!");
    Ok(())
}

#[test]
fn detect_reports_count_and_keeps_display_size() -> anyhow::Result<()> {
    let file = write_png(&square_rgb(320, 240, 130, 90, 60), ".png");
    let mut session = controller();
    let mut surface = RecordingSurface::default();
    session.load(file.path(), &mut surface)?;
    let loaded_size = surface.last_frame().dimensions();

    let count = session.detect(&mut surface)?;

    assert!(count >= 1);
    assert_eq!(surface.last_frame().dimensions(), loaded_size);
    assert_eq!(surface.notices.last().unwrap().message, faces_found_message(count));
    let original = session.state().original().unwrap();
    for face in session.state().faces().unwrap() {
        assert!(face.is_within(original.width(), original.height()));
    }
    Ok(())
}

#[test]
fn redetect_annotates_from_the_original() -> anyhow::Result<()> {
    let file = write_png(&square_rgb(320, 240, 130, 90, 60), ".png");
    let mut session = controller();
    let mut surface = RecordingSurface::default();
    session.load(file.path(), &mut surface)?;
    let original = session.state().original().unwrap().clone();

    let first = session.detect(&mut surface)?;
    let first_frame = surface.last_frame().clone();
    let second = session.detect(&mut surface)?;

    assert_eq!(first, second);
    assert_eq!(surface.last_frame(), &first_frame);
    assert_eq!(session.state().original(), Some(&original));
    assert_eq!(session.mode(), DisplayMode::ImageWithFaces);
    Ok(())
}

#[test]
fn redetect_with_fixed_regions_does_not_compound() -> anyhow::Result<()> {
    let file = write_png(&square_rgb(100, 100, 0, 0, 0), ".png");
    let detector = FixedDetector(vec![FaceRegion::new(10, 10, 40, 40)]);
    let mut session = SessionController::new(detector, Viewport::default());
    let mut surface = RecordingSurface::default();
    session.load(file.path(), &mut surface)?;

    session.detect(&mut surface)?;
    session.detect(&mut surface)?;
    session.detect(&mut surface)?;

    assert_eq!(surface.frames[1], surface.frames[3]);
    assert_eq!(session.state().faces().map(<[_]>::len), Some(1));
    Ok(())
}

#[test]
fn load_after_detect_clears_faces() -> anyhow::Result<()> {
    let first = write_png(&square_rgb(320, 240, 130, 90, 60), ".png");
    let second = write_png(&square_rgb(200, 400, 0, 0, 0), ".png");
    let mut session = controller();
    let mut surface = RecordingSurface::default();

    session.load(first.path(), &mut surface)?;
    session.detect(&mut surface)?;
    session.load(second.path(), &mut surface)?;

    assert_eq!(session.mode(), DisplayMode::ImageOnly);
    assert!(session.state().faces().is_none());
    assert!(session.can_detect());
    assert_eq!(surface.last_frame().dimensions(), (300, 600));
    Ok(())
}
