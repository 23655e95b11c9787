use eframe::egui::{
    self, Align2, Color32, FontId, Painter, PointerButton, Pos2, Rect, Sense, Shape, Stroke,
    StrokeKind, Ui, Vec2, vec2,
};
use log::warn;

use crate::inspect::Inspection;
use crate::interaction::node_at;

use super::ViewModel;

const BACKGROUND: Color32 = Color32::from_rgb(19, 23, 29);
const LINK_COLOR: Color32 = Color32::from_rgb(138, 150, 163);
const NODE_FILL: Color32 = Color32::from_rgb(86, 156, 214);
const NODE_DRAGGED: Color32 = Color32::from_rgb(245, 206, 93);
const SEARCH_HALO: Color32 = Color32::from_rgb(250, 140, 60);
const POPUP_WIDTH: f32 = 240.0;

fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, BACKGROUND);

    let step = 56.0;
    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));
    let mut x = rect.left() + step;
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += step;
    }
    let mut y = rect.top() + step;
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += step;
    }
}

fn draw_popup(painter: &Painter, origin: Vec2, inspection: &Inspection) {
    let title = painter.layout(
        inspection.title.clone(),
        FontId::proportional(14.0),
        Color32::WHITE,
        POPUP_WIDTH,
    );
    let body = painter.layout(
        inspection.description.clone(),
        FontId::proportional(12.0),
        Color32::from_gray(215),
        POPUP_WIDTH,
    );

    let padding = vec2(10.0, 8.0);
    let content = vec2(
        title.size().x.max(body.size().x),
        title.size().y + 4.0 + body.size().y,
    );
    let top_left = inspection.anchor + origin;
    let frame = Rect::from_min_size(top_left, content + padding * 2.0);

    painter.rect_filled(frame, 6.0, Color32::from_rgba_unmultiplied(32, 36, 44, 235));
    painter.rect_stroke(
        frame,
        6.0,
        Stroke::new(1.0, Color32::from_gray(120)),
        StrokeKind::Inside,
    );
    let title_height = title.size().y;
    painter.galley(top_left + padding, title, Color32::WHITE);
    painter.galley(
        top_left + padding + vec2(0.0, title_height + 4.0),
        body,
        Color32::from_gray(215),
    );
}

impl ViewModel {
    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui, canvas: Vec2) {
        egui::ScrollArea::both().show(ui, |ui| {
            let (rect, response) = ui.allocate_exact_size(canvas, Sense::click_and_drag());
            let origin = rect.min.to_vec2();
            self.handle_pointer(ui, &response, origin);
            self.paint(&ui.painter_at(rect), rect);
        });
    }

    fn handle_pointer(&mut self, ui: &Ui, response: &egui::Response, origin: Vec2) {
        let radius = self.scene.style().node_radius;

        if response.drag_started_by(PointerButton::Primary)
            && let Some(press) = ui.input(|input| input.pointer.press_origin())
            && let Some(index) = node_at(&self.model, press - origin, radius)
            && let Err(error) = self
                .interaction
                .drag_start(&mut self.model, &mut self.engine, index)
        {
            warn!("{error}");
        }

        if let Some(index) = self.interaction.dragging() {
            if response.dragged()
                && let Some(pointer) = response.interact_pointer_pos()
                && let Err(error) = self.interaction.drag_move(&mut self.model, index, pointer - origin)
            {
                warn!("{error}");
            }

            if response.drag_stopped() {
                if let Err(error) = self
                    .interaction
                    .drag_end(&mut self.model, &mut self.engine, index)
                {
                    warn!("{error}");
                }
            } else if !response.dragged() {
                self.interaction.release_all(&mut self.model, &mut self.engine);
            }
            ui.ctx().request_repaint();
        }

        if response.clicked_by(PointerButton::Primary)
            && let Some(pointer) = response.interact_pointer_pos()
        {
            let point = pointer - origin;
            let hit = node_at(&self.model, point, radius);
            self.inspector.click(&self.model, hit, point);
        }

        if ui.input(|input| input.key_pressed(egui::Key::Escape)) {
            self.inspector.dismiss();
        }

        if response.hovered()
            && let Some(pointer) = response.hover_pos()
            && node_at(&self.model, pointer - origin, radius).is_some()
        {
            ui.ctx().set_cursor_icon(egui::CursorIcon::Grab);
        }
    }

    fn paint(&self, painter: &Painter, rect: Rect) {
        let origin = rect.min.to_vec2();
        let style = self.scene.style();
        let link_stroke = Stroke::new(1.5, LINK_COLOR);
        let label_font = FontId::proportional(11.0);

        draw_background(painter, rect);

        for link in self.scene.links() {
            painter.line_segment([link.from + origin, link.to + origin], link_stroke);
            if let Some(arrow) = link.arrow {
                painter.add(Shape::convex_polygon(
                    arrow.iter().map(|point| *point + origin).collect(),
                    LINK_COLOR,
                    Stroke::NONE,
                ));
            }
        }

        for link in self.scene.links() {
            if link.label.is_empty() {
                continue;
            }
            painter.text(
                link.label_position + origin,
                Align2::CENTER_CENTER,
                &link.label,
                label_font.clone(),
                Color32::from_gray(200),
            );
        }

        let dragged = self.interaction.dragging();
        for (index, node) in self.scene.nodes().iter().enumerate() {
            let center = node.center + origin;
            let fill = if dragged == Some(index) {
                NODE_DRAGGED
            } else {
                NODE_FILL
            };
            painter.circle_filled(center, style.node_radius, fill);

            let outline = if self.search_matches.contains(&index) {
                Stroke::new(3.0, SEARCH_HALO)
            } else {
                Stroke::new(1.0, Color32::from_rgba_unmultiplied(15, 15, 15, 190))
            };
            painter.circle_stroke(center, style.node_radius, outline);
        }

        for node in self.scene.nodes() {
            painter.text(
                node.label_anchor + origin,
                Align2::CENTER_CENTER,
                &node.label,
                FontId::proportional(12.0),
                Color32::from_gray(238),
            );
        }

        if let Some(inspection) = self.inspector.current() {
            draw_popup(painter, origin, inspection);
        }
    }
}
