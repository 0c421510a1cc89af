use crate::PaintApp;
use crate::canvas::Point;
use crate::tools::ToolKind;

pub fn central_panel(app: &mut PaintApp, ctx: &egui::Context) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let texture_id = app.canvas_texture(ctx);
        let [width, height] = app.session().canvas().size();
        let size = egui::vec2(width as f32, height as f32);

        egui::ScrollArea::both().show(ui, |ui| {
            let (rect, response) = ui.allocate_exact_size(size, egui::Sense::click_and_drag());
            ui.painter().image(
                texture_id,
                rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
            handle_canvas_input(app, ctx, &response, rect);
        });
    });
}

/// Maps a screen position onto canvas pixels
fn to_canvas(app: &PaintApp, rect: egui::Rect, pos: egui::Pos2) -> Point {
    let canvas = app.session().canvas();
    let scale_x = canvas.width() as f32 / rect.width().max(1.0);
    let scale_y = canvas.height() as f32 / rect.height().max(1.0);
    Point::new(
        ((pos.x - rect.min.x) * scale_x).floor() as i32,
        ((pos.y - rect.min.y) * scale_y).floor() as i32,
    )
}

fn handle_canvas_input(
    app: &mut PaintApp,
    ctx: &egui::Context,
    response: &egui::Response,
    rect: egui::Rect,
) {
    let (pressed, released, latest) = ctx.input(|i| {
        (
            i.pointer.primary_pressed(),
            i.pointer.primary_released(),
            i.pointer.interact_pos(),
        )
    });

    if pressed {
        if let Some(pos) = response.hover_pos() {
            let canvas = app.session().canvas();
            let point = to_canvas(app, rect, pos);
            // The press landed inside the canvas rect, keep rounding from leaving it
            let point = Point::new(
                point.x.clamp(0, canvas.width() as i32 - 1),
                point.y.clamp(0, canvas.height() as i32 - 1),
            );
            if app.session().tool() == ToolKind::Text {
                app.open_text_prompt(point);
            } else {
                let result = app.session_mut().pointer_down(point);
                app.report(result);
            }
        }
    }

    if response.dragged() && app.session().current_state().is_drawing() {
        if let Some(pos) = response.interact_pointer_pos() {
            let point = to_canvas(app, rect, pos);
            let result = app.session_mut().pointer_move(point);
            app.report(result);
        }
    }

    if released && app.session().current_state().is_drawing() {
        match latest {
            Some(pos) => {
                let point = to_canvas(app, rect, pos);
                let result = app.session_mut().pointer_up(point);
                app.report(result);
            }
            None => app.session_mut().cancel_drawing(),
        }
    }
}
