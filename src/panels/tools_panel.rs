use crate::PaintApp;
use crate::components::ToolButton;
use crate::tools::ToolKind;

pub fn tools_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::SidePanel::left("tools_panel")
        .resizable(true)
        .default_width(200.0)
        .show(ctx, |ui| {
            ui.heading("Tools");

            let active_tool = app.session().tool();
            ui.horizontal_wrapped(|ui| {
                for tool in ToolKind::ALL {
                    if ToolButton::new(tool, tool == active_tool).show(ui).clicked() {
                        log::info!("Tool selected from UI: {}", tool.name());
                        app.session_mut().set_tool(tool);
                    }
                }
            });

            if active_tool == ToolKind::Text && !app.session().has_font() {
                ui.colored_label(ui.visuals().warn_fg_color, "No font configured for text");
            }
            ui.separator();

            let brush = app.session().brush();
            ui.horizontal(|ui| {
                ui.label("Color");
                let mut color: egui::Color32 = brush.color.into();
                if egui::color_picker::color_edit_button_srgba(
                    ui,
                    &mut color,
                    egui::color_picker::Alpha::Opaque,
                )
                .changed()
                {
                    app.session_mut().set_brush_color(color.into());
                }
            });

            let mut size = brush.size;
            if ui
                .add(egui::Slider::new(&mut size, 1.0..=100.0).text("Size"))
                .changed()
            {
                app.session_mut().set_brush_size(size);
            }
            ui.separator();

            // Undo/Redo section
            ui.horizontal(|ui| {
                let can_undo = app.session().can_undo();
                let can_redo = app.session().can_redo();

                if ui.add_enabled(can_undo, egui::Button::new("Undo")).clicked() {
                    app.undo();
                }
                if ui.add_enabled(can_redo, egui::Button::new("Redo")).clicked() {
                    app.redo();
                }
            });

            let idle = app.session().current_state().is_idle();
            ui.horizontal(|ui| {
                if ui.add_enabled(idle, egui::Button::new("Clear")).clicked() {
                    app.clear();
                }
                if ui.button("Save").clicked() {
                    app.save_drawing();
                }
            });
            ui.separator();

            let history = app.session().history();
            ui.label(format!("Undo steps: {} / {}", history.undo_len(), history.cap()));
            ui.label(format!("Redo steps: {}", history.redo_len()));
            ui.label(format!("State: {}", app.session().current_state().name()));
            if let Some(action) = app.session().last_action() {
                ui.label(format!("Last action: {}", action));
            }

            ui.separator();
            ui.small("Drop an image onto the window to use it as the background.");

            if let Some(status) = app.status() {
                ui.separator();
                ui.label(status);
            }
        });
}
