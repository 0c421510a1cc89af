/// An image file dropped onto the window, not yet decoded
#[derive(Debug, Clone)]
pub struct DroppedImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct FileHandler {
    dropped_files: Vec<egui::DroppedFile>,
}

impl FileHandler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes any newly dropped files from the UI context.
    /// Returns true if there is something to process.
    pub fn check_for_dropped_files(&mut self, ctx: &egui::Context) -> bool {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if dropped.is_empty() {
            return false;
        }
        self.dropped_files = dropped;
        true
    }

    /// Reads the image files among the dropped files, draining the queue
    pub fn process_dropped_files(&mut self) -> Vec<DroppedImage> {
        std::mem::take(&mut self.dropped_files)
            .into_iter()
            .filter_map(|file| {
                let name = display_name(&file);
                if !is_image_file(&file) {
                    log::warn!("Dropped file is not a supported type: {}", name);
                    return None;
                }
                read_bytes(&file, &name).map(|bytes| DroppedImage { name, bytes })
            })
            .collect()
    }

    /// Shades the window while files are dragged over it
    pub fn preview_files_being_dropped(&self, ctx: &egui::Context) {
        use egui::{Align2, Color32, Id, LayerId, Order};

        if ctx.input(|i| i.raw.hovered_files.is_empty()) {
            return;
        }

        let text = ctx.input(|i| {
            let mut text = "Drop to set the background:\n".to_owned();
            for file in &i.raw.hovered_files {
                if let Some(path) = &file.path {
                    text += &format!("\n{}", path.display());
                } else if !file.mime.is_empty() {
                    text += &format!("\n{}", file.mime);
                }
            }
            text
        });

        let painter = ctx.layer_painter(LayerId::new(Order::Foreground, Id::new("file_drop_target")));
        let screen_rect = ctx.screen_rect();
        painter.rect_filled(screen_rect, 0.0, Color32::from_black_alpha(192));
        painter.text(
            screen_rect.center(),
            Align2::CENTER_CENTER,
            text,
            egui::TextStyle::Heading.resolve(&ctx.style()),
            Color32::WHITE,
        );
    }
}

fn display_name(file: &egui::DroppedFile) -> String {
    if let Some(path) = &file.path {
        path.display().to_string()
    } else if !file.name.is_empty() {
        file.name.clone()
    } else {
        "unknown".to_owned()
    }
}

/// Check if a file is an image based on MIME type or extension
fn is_image_file(file: &egui::DroppedFile) -> bool {
    if !file.mime.is_empty() {
        return file.mime.starts_with("image/");
    }
    let extension = file
        .path
        .as_ref()
        .and_then(|path| path.extension())
        .or_else(|| std::path::Path::new(&file.name).extension())
        .map(|ext| ext.to_string_lossy().to_lowercase());
    matches!(
        extension.as_deref(),
        Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp")
    )
}

fn read_bytes(file: &egui::DroppedFile, name: &str) -> Option<Vec<u8>> {
    if let Some(bytes) = &file.bytes {
        log::info!("Reading image from memory: {} ({} bytes)", name, bytes.len());
        return Some(bytes.to_vec());
    }

    #[cfg(not(target_arch = "wasm32"))]
    if let Some(path) = &file.path {
        return match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(err) => {
                log::error!("Failed to read image file {}: {}", path.display(), err);
                None
            }
        };
    }

    log::warn!("Dropped file has no accessible data: {}", name);
    None
}
