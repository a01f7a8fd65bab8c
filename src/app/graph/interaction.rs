use eframe::egui::{PointerButton, Pos2, Rect, Response, Ui};

use crate::engine::Command;

use super::super::ViewModel;
use super::super::render_utils::{MAX_ZOOM, MIN_ZOOM, screen_to_world};

pub(super) struct ScreenNodes<'a> {
    pub(super) candidates: &'a [usize],
    pub(super) positions: &'a [Pos2],
    pub(super) radii: &'a [f32],
}

impl ScreenNodes<'_> {
    pub(super) fn node_at(&self, point: Pos2) -> Option<usize> {
        self.candidates
            .iter()
            .filter_map(|&index| {
                let distance = self.positions[index].distance(point);
                (distance <= self.radii[index].max(4.0)).then_some((index, distance))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(index, _)| index)
    }
}

impl ViewModel {
    pub(in crate::app) fn handle_graph_zoom(&mut self, ui: &Ui, rect: Rect, response: &Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .unwrap_or_else(|| rect.center());
        let world_before = screen_to_world(rect, self.pan, self.zoom, pointer);

        let zoom_factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        self.zoom = (self.zoom * zoom_factor).clamp(MIN_ZOOM, MAX_ZOOM);
        self.pan = pointer - rect.center() - (world_before * self.zoom);
    }

    pub(in crate::app) fn handle_graph_pan(&mut self, response: &Response, node_drag: bool) {
        if response.dragged_by(PointerButton::Secondary)
            || response.dragged_by(PointerButton::Middle)
            || (response.dragged_by(PointerButton::Primary) && !node_drag)
        {
            self.pan += response.drag_delta();
        }
    }

    pub(super) fn handle_node_pointer(
        &mut self,
        ui: &Ui,
        rect: Rect,
        response: &Response,
        nodes: &ScreenNodes<'_>,
    ) -> bool {
        // The engine only sees a DragStart once the next step drains it.
        let mut grabbed = None;
        if response.drag_started_by(PointerButton::Primary) {
            let origin = ui.input(|input| input.pointer.press_origin());
            if let Some(index) = origin.and_then(|point| nodes.node_at(point))
                && let Some(pointer) = response.interact_pointer_pos()
            {
                let position = screen_to_world(rect, self.pan, self.zoom, pointer);
                grabbed = Some(index);
                self.dispatch_for(index, |id| Command::DragStart { id, position });
            }
        }

        let dragging = grabbed.or(self.engine.dragging());
        if let Some(index) = dragging {
            if response.dragged_by(PointerButton::Primary)
                && let Some(pointer) = response.interact_pointer_pos()
            {
                let position = screen_to_world(rect, self.pan, self.zoom, pointer);
                self.dispatch_for(index, |id| Command::DragMove { id, position });
            }
            if response.drag_stopped() {
                self.dispatch_for(index, |id| Command::DragEnd { id });
                ui.ctx().request_repaint();
            }
        }

        if response.clicked_by(PointerButton::Primary)
            && let Some(index) = response
                .interact_pointer_pos()
                .and_then(|point| nodes.node_at(point))
        {
            self.dispatch_for(index, Command::SelectNode);
        }

        dragging.is_some()
    }

    fn dispatch_for(&mut self, index: usize, command: impl FnOnce(String) -> Command) {
        let Some(id) = self.engine.graph().node(index).map(|node| node.id.clone()) else {
            return;
        };
        self.engine.dispatch(command(id));
    }
}
