use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, Rect, Sense, Stroke, StrokeKind, Ui, vec2,
};

use crate::engine::{NodeShape, NodeStyle};
use crate::util::truncate_label;

use super::super::ViewModel;
use super::super::render_utils::{
    blend_color, circle_visible, draw_background, segment_may_be_visible, with_opacity,
    world_to_screen,
};
use super::interaction::ScreenNodes;

const EDGE_OPACITY: f32 = 0.6;
const LABEL_GAP: f32 = 5.0;
const LABEL_MIN_ZOOM: f32 = 0.6;

impl ViewModel {
    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect, self.pan, self.zoom);
        self.handle_graph_zoom(ui, rect, &response);

        let node_count = self.engine.graph().node_count();
        let styles = (0..node_count)
            .map(|index| self.engine.node_style(index))
            .collect::<Vec<_>>();
        let screen_positions = self
            .engine
            .positions()
            .iter()
            .map(|world| world_to_screen(rect, self.pan, self.zoom, *world))
            .collect::<Vec<_>>();
        let screen_radii = styles
            .iter()
            .map(|style| style.as_ref().map_or(0.0, |style| style.radius * self.zoom))
            .collect::<Vec<_>>();
        let candidates = (0..node_count)
            .filter(|&index| {
                styles[index].as_ref().is_some_and(|style| style.visible)
                    && circle_visible(rect, screen_positions[index], screen_radii[index])
            })
            .collect::<Vec<_>>();
        let nodes = ScreenNodes {
            candidates: &candidates,
            positions: &screen_positions,
            radii: &screen_radii,
        };

        let node_drag = self.handle_node_pointer(ui, rect, &response, &nodes);
        self.handle_graph_pan(&response, node_drag);

        let hovered = response.hover_pos().and_then(|point| nodes.node_at(point));
        if hovered.is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        let zoom_sqrt = self.zoom.sqrt();
        for (edge_index, edge) in self.engine.graph().edges().iter().enumerate() {
            let Some(style) = self.engine.edge_style(edge_index) else {
                continue;
            };
            if !style.visible || edge.source == edge.target {
                continue;
            }

            let start = screen_positions[edge.source];
            let end = screen_positions[edge.target];
            if !segment_may_be_visible(rect, start, end) {
                continue;
            }

            painter.line_segment(
                [start, end],
                Stroke::new(
                    (style.width * zoom_sqrt).clamp(0.6, 3.0),
                    with_opacity(style.stroke, EDGE_OPACITY),
                ),
            );
        }

        // Large hubs first so small nodes stay clickable on top of them.
        let mut draw_order = candidates.clone();
        draw_order.sort_by(|a, b| screen_radii[*b].total_cmp(&screen_radii[*a]));

        let focus = self.engine.focus_state();
        let neighborhood = focus
            .target()
            .and_then(|target| self.engine.graph().neighbors(target));
        let selected = self.engine.selected();
        for index in draw_order {
            let Some(style) = &styles[index] else {
                continue;
            };
            let Some(node) = self.engine.graph().node(index) else {
                continue;
            };

            let position = screen_positions[index];
            let radius = screen_radii[index].max(2.0);
            let is_hovered = hovered == Some(index);
            let is_selected = selected == Some(index);
            let emphasized = focus.target() == Some(index);
            Self::draw_node(&painter, position, radius, style, &node.name, is_hovered, emphasized);

            if is_selected {
                painter.circle_stroke(
                    position,
                    radius + 4.0,
                    Stroke::new(1.5, Color32::from_rgba_unmultiplied(245, 206, 93, 200)),
                );
            }

            let in_focus = emphasized
                || neighborhood.is_some_and(|neighbors| neighbors.contains(&index));
            if self.zoom >= LABEL_MIN_ZOOM || is_hovered || is_selected || in_focus {
                painter.text(
                    position + vec2(0.0, radius + LABEL_GAP),
                    Align2::CENTER_TOP,
                    truncate_label(&node.name, 28),
                    FontId::proportional(11.0),
                    with_opacity(Color32::from_gray(225), style.opacity),
                );
            }
        }

        if let Some(index) = hovered
            && let Some(node) = self.engine.graph().node(index)
        {
            let mut panel_text = format!(
                "{}  |  {}  |  {} connections",
                node.name,
                node.kind().label(),
                self.engine.graph().degree(index)
            );
            if self.engine.filter().photo_mode
                && let Some(image) = &node.image
            {
                panel_text.push_str(&format!("  |  {image}"));
            }
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                panel_text,
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }

    fn draw_node(
        painter: &egui::Painter,
        position: Pos2,
        radius: f32,
        style: &NodeStyle,
        name: &str,
        is_hovered: bool,
        emphasized: bool,
    ) {
        let mut fill = style.fill;
        if is_hovered {
            fill = blend_color(fill, Color32::WHITE, 0.25);
        }
        let fill = with_opacity(fill, style.opacity);
        let stroke_width = if emphasized { 3.0 } else { 1.5 };
        let stroke = Stroke::new(stroke_width, with_opacity(style.stroke, style.opacity));

        match &style.shape {
            NodeShape::Circle => {
                painter.circle_filled(position, radius, fill);
                painter.circle_stroke(position, radius, stroke);
            }
            NodeShape::Image(_) => {
                // Photo frame with the name's initial; the URL is shown on hover.
                let frame = Rect::from_center_size(position, vec2(radius * 2.0, radius * 2.0));
                let rounding = radius * 0.25;
                painter.rect_filled(frame, rounding, fill);
                painter.rect_stroke(frame, rounding, stroke, StrokeKind::Outside);
                if let Some(initial) = name.chars().next() {
                    painter.text(
                        position,
                        Align2::CENTER_CENTER,
                        initial,
                        FontId::proportional((radius * 0.9).clamp(8.0, 32.0)),
                        with_opacity(Color32::from_gray(20), style.opacity),
                    );
                }
            }
        }
    }
}
