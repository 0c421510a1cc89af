use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::channel::oneshot;
use futures::executor::block_on;

use raster_paint::canvas::{Color, PixelBuffer, Point};
use raster_paint::error::PaintError;
use raster_paint::snapshot::{
    DecodeFuture, PngCodec, RawCodec, Snapshot, SnapshotCodec, SnapshotError, SnapshotFormat,
};
use raster_paint::state::{DrawingSession, EditorState, RestoreKind};
use raster_paint::tools::ToolKind;

const RED: Color = Color::rgb(255, 0, 0);

/// Raw codec whose decodes wait until the test opens their gate
#[derive(Clone, Default)]
struct GatedCodec {
    gates: Arc<Mutex<Vec<oneshot::Sender<()>>>>,
}

impl GatedCodec {
    fn open_all(&self) {
        for gate in self.gates.lock().unwrap().drain(..) {
            let _ = gate.send(());
        }
    }

    fn drop_all(&self) {
        self.gates.lock().unwrap().clear();
    }

    fn pending(&self) -> usize {
        self.gates.lock().unwrap().len()
    }
}

impl SnapshotCodec for GatedCodec {
    fn format(&self) -> SnapshotFormat {
        SnapshotFormat::Raw
    }

    fn encode(&self, buffer: &PixelBuffer) -> Result<Snapshot, SnapshotError> {
        RawCodec.encode(buffer)
    }

    fn decode(&self, snapshot: Snapshot) -> DecodeFuture {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().push(tx);
        async move {
            rx.await.map_err(|_| SnapshotError::Cancelled)?;
            RawCodec.decode(snapshot).await
        }
        .boxed()
    }
}

fn png_session(width: u32, height: u32) -> DrawingSession {
    DrawingSession::new(width, height, Color::WHITE, Box::new(PngCodec))
}

fn gated_session(width: u32, height: u32) -> (DrawingSession, GatedCodec) {
    let codec = GatedCodec::default();
    let session = DrawingSession::new(width, height, Color::WHITE, Box::new(codec.clone()));
    (session, codec)
}

fn fill_at(session: &mut DrawingSession, point: Point, color: Color) {
    session.set_tool(ToolKind::Fill);
    session.set_brush_color(color);
    session.pointer_down(point).unwrap();
}

fn stroke(session: &mut DrawingSession, points: &[Point]) {
    let (first, rest) = points.split_first().unwrap();
    session.pointer_down(*first).unwrap();
    for point in rest {
        session.pointer_move(*point).unwrap();
    }
    session.pointer_up(*points.last().unwrap()).unwrap();
}

#[test]
fn test_fill_undo_redo_round_trip() {
    let mut session = png_session(4, 4);
    let original = session.canvas().clone();

    fill_at(&mut session, Point::new(0, 0), Color::BLACK);
    let filled = session.canvas().clone();
    assert_eq!(filled.rgb_at(Point::new(3, 3)), Some(Color::BLACK));
    assert_eq!(session.history().undo_len(), 1);

    assert!(session.undo().unwrap());
    assert_eq!(
        block_on(session.finish_restore()).unwrap(),
        Some(RestoreKind::Undo)
    );
    assert_eq!(session.canvas(), &original);
    assert!(session.current_state().is_idle());

    assert!(session.redo().unwrap());
    assert_eq!(
        block_on(session.finish_restore()).unwrap(),
        Some(RestoreKind::Redo)
    );
    assert_eq!(session.canvas(), &filled);
}

#[test]
fn test_undo_with_empty_history_does_nothing() {
    let mut session = png_session(4, 4);

    assert!(!session.undo().unwrap());
    assert!(!session.redo().unwrap());
    assert!(session.current_state().is_idle());
    assert_eq!(block_on(session.finish_restore()).unwrap(), None);
}

#[test]
fn test_same_color_fill_still_records_a_step() {
    let mut session = png_session(4, 4);

    fill_at(&mut session, Point::new(1, 1), Color::WHITE);

    assert_eq!(session.history().undo_len(), 1);
}

#[test]
fn test_actions_rejected_while_restore_in_flight() {
    let (mut session, codec) = gated_session(4, 4);
    fill_at(&mut session, Point::new(0, 0), RED);

    assert!(session.undo().unwrap());
    assert!(matches!(session.current_state(), EditorState::Restoring { .. }));
    assert!(!session.can_undo() && !session.can_redo());

    let undo_len = session.history().undo_len();
    let redo_len = session.history().redo_len();

    assert!(matches!(
        session.pointer_down(Point::new(1, 1)),
        Err(PaintError::RestoreInFlight)
    ));
    assert!(matches!(session.clear(), Err(PaintError::RestoreInFlight)));
    assert!(matches!(session.undo(), Err(PaintError::RestoreInFlight)));
    assert!(matches!(session.redo(), Err(PaintError::RestoreInFlight)));
    assert_eq!(session.history().undo_len(), undo_len);
    assert_eq!(session.history().redo_len(), redo_len);

    // The canvas keeps the fill until the decode lands
    assert!(session.try_finish_restore().is_none());
    assert_eq!(session.canvas().rgb_at(Point::new(0, 0)), Some(RED));
    assert_eq!(codec.pending(), 1);

    codec.open_all();
    assert!(matches!(
        session.try_finish_restore(),
        Some(Ok(Some(RestoreKind::Undo)))
    ));
    assert_eq!(session.canvas().rgb_at(Point::new(0, 0)), Some(Color::WHITE));

    // Accepted again once idle
    fill_at(&mut session, Point::new(0, 0), RED);
    assert_eq!(session.history().undo_len(), 1);
    assert!(!session.can_redo());
}

#[test]
fn test_failed_decode_returns_to_idle() {
    let (mut session, codec) = gated_session(4, 4);
    fill_at(&mut session, Point::new(0, 0), RED);
    let filled = session.canvas().clone();

    assert!(session.undo().unwrap());
    codec.drop_all();

    let result = session.try_finish_restore();
    assert!(matches!(
        result,
        Some(Err(PaintError::Snapshot(SnapshotError::Cancelled)))
    ));
    assert!(session.current_state().is_idle());
    assert_eq!(session.canvas(), &filled);
}

#[test]
fn test_brush_stroke_records_one_snapshot() {
    let mut session = png_session(16, 16);
    session.set_tool(ToolKind::Brush);
    session.set_brush_size(1.0);

    stroke(
        &mut session,
        &[Point::new(2, 2), Point::new(6, 2), Point::new(10, 2), Point::new(10, 10)],
    );

    assert_eq!(session.history().undo_len(), 1);
    assert!(session.current_state().is_idle());
    assert_eq!(session.canvas().rgb_at(Point::new(8, 2)), Some(Color::BLACK));
    assert_eq!(session.canvas().rgb_at(Point::new(10, 6)), Some(Color::BLACK));
    assert_eq!(session.canvas().rgb_at(Point::new(8, 6)), Some(Color::WHITE));
}

#[test]
fn test_click_without_drag_records_nothing() {
    let mut session = png_session(8, 8);
    session.set_tool(ToolKind::Brush);

    session.pointer_down(Point::new(3, 3)).unwrap();
    session.pointer_up(Point::new(3, 3)).unwrap();

    assert_eq!(session.history().undo_len(), 0);
}

#[test]
fn test_eraser_paints_white() {
    let mut session = png_session(8, 8);
    fill_at(&mut session, Point::new(0, 0), RED);

    session.set_tool(ToolKind::Eraser);
    session.set_brush_size(1.0);
    stroke(&mut session, &[Point::new(0, 4), Point::new(7, 4)]);

    assert_eq!(session.canvas().rgb_at(Point::new(5, 4)), Some(Color::WHITE));
    assert_eq!(session.canvas().rgb_at(Point::new(5, 3)), Some(RED));
    assert_eq!(session.history().undo_len(), 2);
}

#[test]
fn test_shapes_draw_on_release() {
    let mut session = png_session(20, 20);
    session.set_brush_size(1.0);

    session.set_tool(ToolKind::Rect);
    session.pointer_down(Point::new(2, 2)).unwrap();
    session.pointer_move(Point::new(5, 5)).unwrap();
    // Nothing drawn or recorded mid-drag
    assert_eq!(session.canvas().rgb_at(Point::new(2, 2)), Some(Color::WHITE));
    assert_eq!(session.history().undo_len(), 0);
    session.pointer_up(Point::new(7, 7)).unwrap();

    assert_eq!(session.canvas().rgb_at(Point::new(2, 2)), Some(Color::BLACK));
    assert_eq!(session.canvas().rgb_at(Point::new(7, 5)), Some(Color::BLACK));
    assert_eq!(session.canvas().rgb_at(Point::new(4, 4)), Some(Color::WHITE));
    assert_eq!(session.history().undo_len(), 1);

    session.set_tool(ToolKind::Line);
    session.pointer_down(Point::new(0, 15)).unwrap();
    session.pointer_up(Point::new(19, 15)).unwrap();
    assert_eq!(session.canvas().rgb_at(Point::new(10, 15)), Some(Color::BLACK));

    session.set_tool(ToolKind::Circle);
    session.pointer_down(Point::new(14, 6)).unwrap();
    session.pointer_up(Point::new(17, 6)).unwrap();
    assert_eq!(session.canvas().rgb_at(Point::new(11, 6)), Some(Color::BLACK));
    assert_eq!(session.canvas().rgb_at(Point::new(14, 6)), Some(Color::WHITE));

    assert_eq!(session.history().undo_len(), 3);
}

#[test]
fn test_switching_tool_abandons_shape() {
    let mut session = png_session(10, 10);
    session.set_tool(ToolKind::Line);
    session.pointer_down(Point::new(1, 1)).unwrap();

    session.set_tool(ToolKind::Rect);
    session.pointer_up(Point::new(8, 8)).unwrap();

    assert!(session.current_state().is_idle());
    assert_eq!(session.history().undo_len(), 0);
}

#[test]
fn test_text_without_font_records_nothing() {
    let mut session = png_session(10, 10);
    session.set_tool(ToolKind::Text);

    // Text is placed through stamp_text, not the pointer
    session.pointer_down(Point::new(1, 1)).unwrap();
    assert!(session.current_state().is_idle());

    assert!(session.stamp_text(Point::new(1, 8), "").is_ok());
    assert!(matches!(
        session.stamp_text(Point::new(1, 8), "hi"),
        Err(PaintError::FontUnavailable)
    ));
    assert_eq!(session.history().undo_len(), 0);
}

#[test]
fn test_clear_is_undoable() {
    let mut session = png_session(4, 4);

    session.clear().unwrap();
    assert_eq!(session.canvas().rgba_at(Point::new(1, 1)), Some([0, 0, 0, 0]));

    assert!(session.undo().unwrap());
    block_on(session.finish_restore()).unwrap();
    assert_eq!(
        session.canvas().rgba_at(Point::new(1, 1)),
        Some([255, 255, 255, 255])
    );
}

#[test]
fn test_import_background_stretches_image() {
    let mut session = png_session(6, 4);
    let image = PngCodec::encode_png(&PixelBuffer::new(2, 2, RED)).unwrap();

    session.import_background(&image).unwrap();

    assert_eq!(session.history().undo_len(), 1);
    for point in [Point::new(0, 0), Point::new(5, 3), Point::new(3, 2)] {
        assert_eq!(session.canvas().rgb_at(point), Some(RED));
    }
}

#[test]
fn test_import_of_garbage_records_nothing() {
    let mut session = png_session(4, 4);

    assert!(matches!(
        session.import_background(b"not an image"),
        Err(PaintError::Image(_))
    ));
    assert_eq!(session.history().undo_len(), 0);
}

#[test]
fn test_export_matches_canvas() {
    let mut session = png_session(5, 5);
    fill_at(&mut session, Point::new(0, 0), RED);

    let bytes = session.export_png().unwrap();
    let decoded = PngCodec::decode_png(&bytes).unwrap();

    assert_eq!(&decoded, session.canvas());
}

#[test]
fn test_history_cap_applies_to_session() {
    let mut session = png_session(2, 2).with_history_cap(3);

    for i in 0..5u8 {
        fill_at(&mut session, Point::new(0, 0), Color::rgb(i * 10, 0, 0));
    }

    assert_eq!(session.history().undo_len(), 3);
}

#[test]
fn test_restore_from_keeps_history() {
    let mut source = png_session(4, 4);
    fill_at(&mut source, Point::new(0, 0), RED);
    let snapshot = source.snapshot().unwrap();

    // A raw session can still restore a PNG snapshot
    let (mut session, _codec) = gated_session(4, 4);
    fill_at(&mut session, Point::new(0, 0), Color::BLACK);

    session.restore_from(snapshot).unwrap();
    assert_eq!(
        block_on(session.finish_restore()).unwrap(),
        Some(RestoreKind::External)
    );
    assert_eq!(session.canvas(), source.canvas());
    assert_eq!(session.history().undo_len(), 1);
}

#[test]
fn test_malformed_restore_leaves_canvas_intact() {
    let mut session = DrawingSession::new(2, 2, Color::WHITE, Box::new(RawCodec));
    fill_at(&mut session, Point::new(0, 0), RED);
    let before = session.canvas().clone();

    let mut bytes = session.snapshot().unwrap().bytes().to_vec();
    bytes.extend_from_slice(&[0, 0, 0, 0]);
    session
        .restore_from(Snapshot::new(SnapshotFormat::Raw, bytes))
        .unwrap();

    assert!(matches!(
        block_on(session.finish_restore()),
        Err(PaintError::Snapshot(SnapshotError::LengthMismatch { .. }))
    ));
    assert!(session.current_state().is_idle());
    assert_eq!(session.canvas(), &before);
    assert_eq!(session.canvas().as_raw().len(), 16);

    // Export still works on the untouched canvas
    let exported = PngCodec::decode_png(&session.export_png().unwrap()).unwrap();
    assert_eq!(&exported, session.canvas());
}
