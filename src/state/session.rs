/// The drawing session owns the live canvas and coordinates tools, history and restores.
///
/// Every handler the front-end calls goes through `DrawingSession`; there is no other
/// place that mutates the canvas. Mutating actions follow one pattern:
/// 1. refuse if a snapshot restore is still in flight
/// 2. encode the live canvas and record it in the history
/// 3. apply the command to the canvas
///
/// Undo and redo swap snapshots with the history and start an asynchronous decode. The
/// decoded canvas lands when the front-end drives [`DrawingSession::poll_restore`] (or
/// awaits [`DrawingSession::finish_restore`]); until then the session stays in
/// `EditorState::Restoring` and rejects every other mutating action.
///
/// # Example
///
/// ```rust,no_run
/// use raster_paint::canvas::{Color, Point};
/// use raster_paint::snapshot::PngCodec;
/// use raster_paint::state::DrawingSession;
/// use raster_paint::tools::ToolKind;
///
/// let mut session = DrawingSession::new(64, 64, Color::WHITE, Box::new(PngCodec));
/// session.set_tool(ToolKind::Fill);
/// session.pointer_down(Point::new(3, 3)).unwrap();
///
/// if session.undo().unwrap() {
///     futures::executor::block_on(session.finish_restore()).unwrap();
/// }
/// ```
use std::path::Path;
use std::task::{Context, Poll};

use futures::FutureExt;
use uuid::Uuid;

use super::EditorState;
use crate::canvas::{Color, PixelBuffer, Point, TextStamper};
use crate::command::{Command, SnapshotHistory};
use crate::config::PaintConfig;
use crate::error::{PaintError, PaintResult};
use crate::snapshot::{DecodeFuture, PngCodec, Snapshot, SnapshotCodec, codec_for};
use crate::tools::{BrushSettings, ToolKind};

/// What started a restore
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreKind {
    Undo,
    Redo,
    /// A snapshot from outside the history, such as an autosave
    External,
}

struct PendingRestore {
    generation: u64,
    kind: RestoreKind,
    decode: DecodeFuture,
}

/// The session state for one canvas.
pub struct DrawingSession {
    id: Uuid,
    canvas: PixelBuffer,
    history: SnapshotHistory,
    tool: ToolKind,
    brush: BrushSettings,
    state: EditorState,
    codec: Box<dyn SnapshotCodec>,
    text: TextStamper,
    pending: Option<PendingRestore>,
    generation: u64,
    last_action: Option<&'static str>,
}

impl std::fmt::Debug for DrawingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DrawingSession")
            .field("id", &self.id)
            .field("canvas", &self.canvas)
            .field("history", &format!("<{} undo, {} redo>", self.history.undo_len(), self.history.redo_len()))
            .field("tool", &self.tool)
            .field("brush", &self.brush)
            .field("state", &self.state)
            .field("codec", &self.codec.format())
            .finish()
    }
}

impl DrawingSession {
    /// Creates a session with a `width` x `height` canvas filled with `background`.
    pub fn new(width: u32, height: u32, background: Color, codec: Box<dyn SnapshotCodec>) -> Self {
        Self {
            id: Uuid::new_v4(),
            canvas: PixelBuffer::new(width, height, background),
            history: SnapshotHistory::new(),
            tool: ToolKind::default(),
            brush: BrushSettings::default(),
            state: EditorState::Idle,
            codec,
            text: TextStamper::without_font(),
            pending: None,
            generation: 0,
            last_action: None,
        }
    }

    /// Creates a session from the startup configuration.
    ///
    /// A font that fails to load leaves the text tool disabled rather than failing startup.
    pub fn from_config(config: &PaintConfig) -> PaintResult<Self> {
        config.validate()?;
        let mut session = Self::new(
            config.canvas_width,
            config.canvas_height,
            config.background_color()?,
            codec_for(config.snapshot_format),
        )
        .with_history_cap(config.history_cap);
        session.brush = config.brush()?;

        if let Some(path) = &config.font_path {
            match TextStamper::from_path(path) {
                Ok(stamper) => session.text = stamper,
                Err(err) => log::error!("Text tool disabled, font {} failed: {}", path.display(), err),
            }
        }
        Ok(session)
    }

    pub fn with_history_cap(mut self, cap: usize) -> Self {
        self.history = SnapshotHistory::with_capacity(cap);
        self
    }

    pub fn with_text_stamper(mut self, text: TextStamper) -> Self {
        self.text = text;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn canvas(&self) -> &PixelBuffer {
        &self.canvas
    }

    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.state.is_idle() && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.is_idle() && self.history.can_redo()
    }

    /// Gets a reference to the current state.
    pub fn current_state(&self) -> &EditorState {
        &self.state
    }

    pub fn is_restoring(&self) -> bool {
        self.state.is_restoring()
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    /// Selects a tool. An unfinished stroke or shape is abandoned.
    pub fn set_tool(&mut self, tool: ToolKind) {
        if self.tool == tool {
            return;
        }
        if self.state.is_drawing() {
            self.state = EditorState::Idle;
        }
        log::info!("Tool changed: {} -> {}", self.tool.name(), tool.name());
        self.tool = tool;
    }

    pub fn brush(&self) -> BrushSettings {
        self.brush
    }

    pub fn set_brush_color(&mut self, color: Color) {
        self.brush.color = color;
    }

    /// Sets the stroke width. Non-positive sizes are ignored.
    pub fn set_brush_size(&mut self, size: f32) {
        if size > 0.0 {
            self.brush.size = size;
        } else {
            log::warn!("Ignoring brush size {}", size);
        }
    }

    /// Label of the most recent recorded action
    pub fn last_action(&self) -> Option<&'static str> {
        self.last_action
    }

    pub fn has_font(&self) -> bool {
        self.text.has_font()
    }

    /// Attempts to transition to a new state, validating the transition.
    fn transition_to(&mut self, new_state: EditorState) -> PaintResult<()> {
        if !self.state.can_transition_to(&new_state) {
            if self.state.is_restoring() {
                return Err(PaintError::RestoreInFlight);
            }
            return Err(PaintError::InvalidTransition {
                from: self.state.name(),
                to: new_state.name(),
            });
        }
        self.state = new_state;
        Ok(())
    }

    fn ensure_not_restoring(&self) -> PaintResult<()> {
        if self.state.is_restoring() {
            log::warn!("Rejected canvas action while a restore is in flight");
            return Err(PaintError::RestoreInFlight);
        }
        Ok(())
    }

    /// Checked before the history is touched, so a refused undo or redo changes nothing.
    fn ensure_can_restore(&self) -> PaintResult<()> {
        self.ensure_not_restoring()?;
        if !self.state.is_idle() {
            return Err(PaintError::InvalidTransition {
                from: self.state.name(),
                to: "Restoring",
            });
        }
        Ok(())
    }

    /// Records the live canvas in the history, ahead of a mutation.
    fn record_snapshot(&mut self) -> PaintResult<()> {
        let snapshot = self.codec.encode(&self.canvas)?;
        log::debug!("Recorded {:?} snapshot ({} bytes)", snapshot.format(), snapshot.len());
        self.history.record_before_action(snapshot);
        Ok(())
    }

    /// Runs a mutating command: snapshot first, then apply.
    ///
    /// A text command without a font fails before anything is recorded.
    pub fn execute(&mut self, command: Command) -> PaintResult<()> {
        self.ensure_not_restoring()?;
        if matches!(command, Command::Text { .. }) && !self.text.has_font() {
            return Err(PaintError::FontUnavailable);
        }
        self.record_snapshot()?;
        log::debug!("Executing {:?}", command);
        self.last_action = Some(command.label());
        command.apply(&mut self.canvas, &self.text)
    }

    /// Pointer pressed at `point`, in canvas coordinates.
    pub fn pointer_down(&mut self, point: Point) -> PaintResult<()> {
        self.ensure_not_restoring()?;
        match self.tool {
            ToolKind::Fill => self.execute(Command::Fill {
                seed: point,
                color: self.brush.color,
            }),
            // Text is placed with `stamp_text` once the user has typed it
            ToolKind::Text => Ok(()),
            tool => self.transition_to(EditorState::Drawing {
                tool,
                start: point,
                last: point,
                recorded: false,
            }),
        }
    }

    /// Pointer moved to `point` while pressed.
    ///
    /// Freehand tools paint a segment from the previous position. The first segment of
    /// a stroke records the history snapshot, so a stroke is one undo step.
    pub fn pointer_move(&mut self, point: Point) -> PaintResult<()> {
        let EditorState::Drawing { tool, start, last, recorded } = self.state else {
            return Ok(());
        };

        if tool.is_freehand() {
            if !recorded {
                self.record_snapshot()?;
            }
            let segment = Command::Segment {
                from: last,
                to: point,
                color: self.brush.color_for(tool),
                width: self.brush.size,
            };
            if !recorded {
                self.last_action = Some(segment.label());
            }
            segment.apply(&mut self.canvas, &self.text)?;
        }

        self.transition_to(EditorState::Drawing {
            tool,
            start,
            last: point,
            recorded: recorded || tool.is_freehand(),
        })
    }

    /// Pointer released at `point`. Shape tools draw here.
    pub fn pointer_up(&mut self, point: Point) -> PaintResult<()> {
        let EditorState::Drawing { tool, start, .. } = self.state else {
            return Ok(());
        };
        self.transition_to(EditorState::Idle)?;

        let color = self.brush.color;
        let width = self.brush.size;
        let shape = match tool {
            ToolKind::Line => Command::Line { from: start, to: point, color, width },
            ToolKind::Rect => Command::Rect { corner: start, opposite: point, color, width },
            ToolKind::Circle => Command::Circle {
                center: start,
                radius: start.distance_to(point),
                color,
                width,
            },
            _ => return Ok(()),
        };
        self.execute(shape)
    }

    /// Abandons an unfinished stroke or shape, keeping what was already painted.
    pub fn cancel_drawing(&mut self) {
        if self.state.is_drawing() {
            self.state = EditorState::Idle;
        }
    }

    /// Stamps `text` at `point` using the brush color at twice the brush size.
    ///
    /// Empty text does nothing.
    pub fn stamp_text(&mut self, point: Point, text: &str) -> PaintResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.execute(Command::Text {
            origin: point,
            text: text.to_owned(),
            color: self.brush.color,
            size_px: self.brush.text_size(),
        })
    }

    /// Clears the canvas to transparent.
    pub fn clear(&mut self) -> PaintResult<()> {
        self.execute(Command::Clear)
    }

    /// Draws an encoded image (PNG, JPEG, ...) stretched over the canvas.
    ///
    /// Nothing is recorded if the image cannot be decoded.
    pub fn import_background(&mut self, bytes: &[u8]) -> PaintResult<()> {
        self.ensure_not_restoring()?;
        let image = image::load_from_memory(bytes)?.into_rgba8();
        log::info!("Importing background image {}x{}", image.width(), image.height());
        self.execute(Command::DrawBackground { image })
    }

    /// The live canvas as PNG bytes.
    pub fn export_png(&self) -> PaintResult<Vec<u8>> {
        Ok(PngCodec::encode_png(&self.canvas)?)
    }

    pub fn export_to(&self, path: &Path) -> PaintResult<()> {
        let bytes = self.export_png()?;
        std::fs::write(path, bytes)?;
        log::info!("Exported canvas to {}", path.display());
        Ok(())
    }

    /// Encodes the live canvas, for autosave.
    pub fn snapshot(&self) -> PaintResult<Snapshot> {
        Ok(self.codec.encode(&self.canvas)?)
    }

    /// Starts restoring the previous canvas. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> PaintResult<bool> {
        self.ensure_can_restore()?;
        if !self.history.can_undo() {
            return Ok(false);
        }
        let current = self.codec.encode(&self.canvas)?;
        match self.history.undo(current) {
            Some(previous) => {
                self.begin_restore(previous, RestoreKind::Undo)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Starts restoring the next canvas. Returns `false` if there is nothing to redo.
    pub fn redo(&mut self) -> PaintResult<bool> {
        self.ensure_can_restore()?;
        if !self.history.can_redo() {
            return Ok(false);
        }
        let current = self.codec.encode(&self.canvas)?;
        match self.history.redo(current) {
            Some(next) => {
                self.begin_restore(next, RestoreKind::Redo)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Starts restoring a snapshot from outside the history, such as an autosave.
    ///
    /// The history is left as it is.
    pub fn restore_from(&mut self, snapshot: Snapshot) -> PaintResult<()> {
        self.ensure_can_restore()?;
        self.begin_restore(snapshot, RestoreKind::External)
    }

    fn begin_restore(&mut self, snapshot: Snapshot, kind: RestoreKind) -> PaintResult<()> {
        let generation = self.generation + 1;
        self.transition_to(EditorState::Restoring { generation })?;
        self.generation = generation;

        let decode = if snapshot.format() == self.codec.format() {
            self.codec.decode(snapshot)
        } else {
            codec_for(snapshot.format()).decode(snapshot)
        };
        log::debug!("Restore #{} ({:?}) started", generation, kind);
        self.pending = Some(PendingRestore { generation, kind, decode });
        Ok(())
    }

    /// Drives a pending restore.
    ///
    /// Resolves to `Ok(None)` when nothing is pending. When the decode lands, the canvas
    /// takes the decoded pixels and the session returns to idle. A failed decode leaves
    /// the canvas untouched and still returns to idle.
    pub fn poll_restore(&mut self, cx: &mut Context<'_>) -> Poll<PaintResult<Option<RestoreKind>>> {
        let result = match self.pending.as_mut() {
            None => return Poll::Ready(Ok(None)),
            Some(pending) => match pending.decode.poll_unpin(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(result) => result,
            },
        };
        let Some(pending) = self.pending.take() else {
            return Poll::Ready(Ok(None));
        };
        self.state = EditorState::Idle;

        match result {
            Ok(buffer) => {
                if buffer.size() != self.canvas.size() {
                    log::warn!(
                        "Restored canvas is {}x{}, live canvas is {}x{}",
                        buffer.width(),
                        buffer.height(),
                        self.canvas.width(),
                        self.canvas.height()
                    );
                }
                self.canvas.copy_from(&buffer);
                log::debug!("Restore #{} ({:?}) complete", pending.generation, pending.kind);
                Poll::Ready(Ok(Some(pending.kind)))
            }
            Err(err) => {
                log::error!("Restore #{} ({:?}) failed: {}", pending.generation, pending.kind, err);
                Poll::Ready(Err(err.into()))
            }
        }
    }

    /// Waits for a pending restore to land.
    pub async fn finish_restore(&mut self) -> PaintResult<Option<RestoreKind>> {
        futures::future::poll_fn(|cx| self.poll_restore(cx)).await
    }

    /// Polls a pending restore once without blocking, for a frame loop.
    ///
    /// Returns `None` while the decode is still running.
    pub fn try_finish_restore(&mut self) -> Option<PaintResult<Option<RestoreKind>>> {
        let mut cx = Context::from_waker(futures::task::noop_waker_ref());
        match self.poll_restore(&mut cx) {
            Poll::Ready(result) => Some(result),
            Poll::Pending => None,
        }
    }
}
