use crate::canvas::{Color, Point};
use crate::config::PaintConfig;
use crate::error::PaintResult;
use crate::file_handler::FileHandler;
use crate::panels::{central_panel, tools_panel};
use crate::snapshot::PngCodec;
use crate::state::{AutosaveRecord, DrawingSession, RestoreKind, StatePersistence};
use crate::tools::{BrushSettings, ToolKind};

/// Storage key for the autosaved canvas on the web, where there is no state directory
#[cfg(target_arch = "wasm32")]
const AUTOSAVE_KEY: &str = "autosave";

/// Tool settings persisted through eframe storage between runs.
#[derive(serde::Deserialize, serde::Serialize, Debug, Default)]
#[serde(default)] // if we add new fields, give them default values when deserializing old state
struct AppSettings {
    tool: ToolKind,
    brush: BrushSettings,
}

/// A text stamp waiting for the user to type it
#[derive(Debug)]
struct TextPrompt {
    at: Point,
    text: String,
    focus_requested: bool,
}

pub struct PaintApp {
    session: DrawingSession,
    config: PaintConfig,
    persistence: StatePersistence,
    file_handler: FileHandler,
    texture: Option<egui::TextureHandle>,
    texture_dirty: bool,
    text_prompt: Option<TextPrompt>,
    status: Option<String>,
}

impl PaintApp {
    /// Called once before the first frame.
    pub fn new(cc: &eframe::CreationContext<'_>, config: PaintConfig) -> Self {
        let mut app = Self::with_config(config);

        if let Some(storage) = cc.storage {
            if let Some(settings) = eframe::get_value::<AppSettings>(storage, eframe::APP_KEY) {
                app.session.set_tool(settings.tool);
                app.session.set_brush_color(settings.brush.color);
                app.session.set_brush_size(settings.brush.size);
            }
        }
        app.restore_autosave(cc.storage);
        app
    }

    fn with_config(config: PaintConfig) -> Self {
        let session = DrawingSession::from_config(&config).unwrap_or_else(|err| {
            log::error!("Invalid configuration, using defaults: {}", err);
            let defaults = PaintConfig::default();
            DrawingSession::new(
                defaults.canvas_width,
                defaults.canvas_height,
                Color::WHITE,
                Box::new(PngCodec),
            )
        });

        Self {
            session,
            persistence: StatePersistence::new(config.state_dir.clone()),
            config,
            file_handler: FileHandler::new(),
            texture: None,
            texture_dirty: true,
            text_prompt: None,
            status: None,
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn restore_autosave(&mut self, _storage: Option<&dyn eframe::Storage>) {
        match self.persistence.load() {
            Ok(Some(record)) => {
                log::info!("Restoring autosave from session {}", record.session_id);
                let result = record.restore(&mut self.session);
                self.report(result);
            }
            Ok(None) => {}
            Err(err) => log::error!("Failed to load autosave: {}", err),
        }
    }

    #[cfg(target_arch = "wasm32")]
    fn restore_autosave(&mut self, storage: Option<&dyn eframe::Storage>) {
        let Some(record) = storage.and_then(|s| eframe::get_value::<AutosaveRecord>(s, AUTOSAVE_KEY)) else {
            return;
        };
        log::info!("Restoring autosave from session {}", record.session_id);
        let result = record.restore(&mut self.session);
        self.report(result);
    }

    pub fn session(&self) -> &DrawingSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut DrawingSession {
        &mut self.session
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// Logs and shows the error of a failed action. Successful actions mark the canvas dirty.
    pub fn report(&mut self, result: PaintResult<()>) {
        match result {
            Ok(()) => self.texture_dirty = true,
            Err(err) => {
                log::warn!("{}", err);
                self.status = Some(err.to_string());
            }
        }
    }

    pub fn undo(&mut self) {
        let result = self.session.undo().map(|_| ());
        self.report(result);
    }

    pub fn redo(&mut self) {
        let result = self.session.redo().map(|_| ());
        self.report(result);
    }

    pub fn clear(&mut self) {
        let result = self.session.clear();
        self.report(result);
    }

    /// Writes the canvas to the configured export path
    pub fn save_drawing(&mut self) {
        let path = self.config.export_path.clone();
        match self.session.export_to(&path) {
            Ok(()) => self.status = Some(format!("Saved {}", path.display())),
            Err(err) => self.report(Err(err)),
        }
    }

    pub fn open_text_prompt(&mut self, at: Point) {
        self.text_prompt = Some(TextPrompt {
            at,
            text: String::new(),
            focus_requested: false,
        });
    }

    /// The canvas texture, re-uploaded if the canvas changed since the last frame
    pub fn canvas_texture(&mut self, ctx: &egui::Context) -> egui::TextureId {
        let canvas = self.session.canvas();
        let image = || egui::ColorImage::from_rgba_unmultiplied(canvas.size(), canvas.as_raw());

        match &mut self.texture {
            Some(texture) => {
                if self.texture_dirty {
                    texture.set(image(), egui::TextureOptions::NEAREST);
                }
            }
            None => {
                self.texture = Some(ctx.load_texture("canvas", image(), egui::TextureOptions::NEAREST));
            }
        }
        self.texture_dirty = false;

        match &self.texture {
            Some(texture) => texture.id(),
            None => egui::TextureId::default(),
        }
    }

    fn poll_restore(&mut self, ctx: &egui::Context) {
        match self.session.try_finish_restore() {
            Some(Ok(Some(kind))) => {
                if kind == RestoreKind::External {
                    log::info!("Autosave restored");
                }
                self.texture_dirty = true;
            }
            Some(Ok(None)) => {}
            Some(Err(err)) => self.report(Err(err)),
            None => ctx.request_repaint(),
        }
    }

    fn handle_shortcuts(&mut self, ctx: &egui::Context) {
        let (undo, redo) = ctx.input_mut(|i| {
            // Shift+Z first, the plain shortcut would match it too
            let redo = i.consume_key(egui::Modifiers::COMMAND | egui::Modifiers::SHIFT, egui::Key::Z)
                || i.consume_key(egui::Modifiers::COMMAND, egui::Key::Y);
            let undo = i.consume_key(egui::Modifiers::COMMAND, egui::Key::Z);
            (undo, redo)
        });
        if undo {
            self.undo();
        }
        if redo {
            self.redo();
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        self.file_handler.preview_files_being_dropped(ctx);
        if !self.file_handler.check_for_dropped_files(ctx) {
            return;
        }
        for image in self.file_handler.process_dropped_files() {
            log::info!("Using {} as background", image.name);
            let result = self.session.import_background(&image.bytes);
            self.report(result);
        }
    }

    fn text_prompt_window(&mut self, ctx: &egui::Context) {
        let Some(prompt) = &mut self.text_prompt else {
            return;
        };

        let mut submit = false;
        let mut cancel = false;
        egui::Window::new("Enter text")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                let edit = ui.text_edit_singleline(&mut prompt.text);
                if !prompt.focus_requested {
                    edit.request_focus();
                    prompt.focus_requested = true;
                }
                if edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                    submit = true;
                }
                ui.horizontal(|ui| {
                    submit |= ui.button("OK").clicked();
                    cancel |= ui.button("Cancel").clicked();
                });
            });

        if submit {
            if let Some(prompt) = self.text_prompt.take() {
                let result = self.session.stamp_text(prompt.at, &prompt.text);
                self.report(result);
            }
        } else if cancel {
            self.text_prompt = None;
        }
    }

    fn autosave_record(&self) -> Option<AutosaveRecord> {
        match AutosaveRecord::capture(&self.session) {
            Ok(record) => Some(record),
            Err(err) => {
                log::error!("Failed to capture autosave: {}", err);
                None
            }
        }
    }
}

impl eframe::App for PaintApp {
    /// Called by the frame work to save state before shutdown.
    fn save(&mut self, storage: &mut dyn eframe::Storage) {
        let settings = AppSettings {
            tool: self.session.tool(),
            brush: self.session.brush(),
        };
        eframe::set_value(storage, eframe::APP_KEY, &settings);

        // A canvas mid-restore would save the state being replaced
        if self.session.is_restoring() {
            return;
        }
        let Some(record) = self.autosave_record() else {
            return;
        };

        #[cfg(not(target_arch = "wasm32"))]
        if let Err(err) = self.persistence.save(&record) {
            log::error!("Autosave failed: {}", err);
        }

        #[cfg(target_arch = "wasm32")]
        eframe::set_value(storage, AUTOSAVE_KEY, &record);
    }

    /// Called each time the UI needs repainting, which may be many times per second.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_restore(ctx);
        self.handle_shortcuts(ctx);
        self.handle_dropped_files(ctx);

        tools_panel(self, ctx);
        central_panel(self, ctx);

        self.text_prompt_window(ctx);
    }
}
