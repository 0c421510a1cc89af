use crate::tools::ToolKind;

/// Side length of a tool button in points
const BUTTON_SIZE: f32 = 32.0;

/// A square icon button for one tool, highlighted while its tool is active.
pub struct ToolButton {
    tool: ToolKind,
    selected: bool,
}

impl ToolButton {
    pub fn new(tool: ToolKind, selected: bool) -> Self {
        Self { tool, selected }
    }

    /// Fill and icon colors, taken from the current theme
    fn colors(&self, visuals: &egui::Visuals, response: &egui::Response) -> (egui::Color32, egui::Color32) {
        if self.selected {
            (visuals.selection.bg_fill, visuals.selection.stroke.color)
        } else {
            let widget = if response.hovered() {
                &visuals.widgets.hovered
            } else {
                &visuals.widgets.inactive
            };
            (widget.weak_bg_fill, widget.fg_stroke.color)
        }
    }

    /// Paints the button and returns its response, with the tool name as hover text.
    pub fn show(self, ui: &mut egui::Ui) -> egui::Response {
        let (rect, response) =
            ui.allocate_exact_size(egui::Vec2::splat(BUTTON_SIZE), egui::Sense::click());

        if ui.is_rect_visible(rect) {
            let (fill, icon_color) = self.colors(ui.visuals(), &response);
            let rounding = ui.visuals().widgets.inactive.rounding;
            let painter = ui.painter();

            painter.rect_filled(rect, rounding, fill);
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                self.tool.icon(),
                egui::FontId::proportional(BUTTON_SIZE * 0.6),
                icon_color,
            );
            if response.has_focus() {
                painter.rect_stroke(rect, rounding, ui.visuals().selection.stroke);
            }
        }

        response.on_hover_text(self.tool.name())
    }
}
