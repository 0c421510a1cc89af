use std::path::PathBuf;

use futures::executor::block_on;
use uuid::Uuid;

use raster_paint::canvas::{Color, Point};
use raster_paint::snapshot::{PngCodec, RawCodec};
use raster_paint::state::{AUTOSAVE_FILE, AutosaveRecord, DrawingSession, RestoreKind, StatePersistence};
use raster_paint::tools::ToolKind;

fn temp_state_dir() -> PathBuf {
    std::env::temp_dir().join(format!("raster_paint_test_{}", Uuid::new_v4()))
}

fn drawn_session() -> DrawingSession {
    let mut session = DrawingSession::new(6, 6, Color::WHITE, Box::new(PngCodec));
    session.set_tool(ToolKind::Fill);
    session.set_brush_color(Color::rgb(0, 128, 255));
    session.pointer_down(Point::new(2, 2)).unwrap();
    session.set_tool(ToolKind::Circle);
    session.set_brush_size(4.0);
    session
}

#[test]
fn test_missing_autosave_loads_as_none() {
    let persistence = StatePersistence::new(temp_state_dir());

    assert!(persistence.load().unwrap().is_none());
    persistence.clear().unwrap();
}

#[test]
fn test_save_load_restore_round_trip() {
    let dir = temp_state_dir();
    let persistence = StatePersistence::new(&dir);
    let source = drawn_session();

    let record = AutosaveRecord::capture(&source).unwrap();
    persistence.save(&record).unwrap();
    assert!(dir.join(AUTOSAVE_FILE).exists());

    let loaded = persistence.load().unwrap().unwrap();
    assert_eq!(loaded, record);
    assert_eq!(loaded.session_id, source.id());
    assert_eq!((loaded.width, loaded.height), (6, 6));

    // Restoring into a fresh session with a different codec
    let mut restored = DrawingSession::new(6, 6, Color::WHITE, Box::new(RawCodec));
    loaded.restore(&mut restored).unwrap();
    assert!(restored.is_restoring());
    assert_eq!(
        block_on(restored.finish_restore()).unwrap(),
        Some(RestoreKind::External)
    );

    assert_eq!(restored.canvas(), source.canvas());
    assert_eq!(restored.tool(), ToolKind::Circle);
    assert_eq!(restored.brush(), source.brush());
    assert!(!restored.can_undo());

    persistence.clear().unwrap();
    assert!(persistence.load().unwrap().is_none());
    let _ = std::fs::remove_dir_all(dir);
}

#[test]
fn test_corrupt_autosave_is_an_error() {
    let dir = temp_state_dir();
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(AUTOSAVE_FILE), "{ not json").unwrap();

    let persistence = StatePersistence::new(&dir);
    assert!(persistence.load().is_err());

    let _ = std::fs::remove_dir_all(dir);
}
