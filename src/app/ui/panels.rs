use eframe::egui::{self, Align, Context, Layout, RichText, Vec2};

use crate::engine::{EngineEvent, GraphEngine, LinkDistance};
use crate::network::DataSource;

use super::super::ViewModel;

impl ViewModel {
    pub(in crate::app) const INITIAL_CONNECTION_ROWS: usize = 24;
    pub(in crate::app) const CONNECTION_PAGE_ROWS: usize = 24;
    pub(in crate::app) const CONNECTION_PREFETCH_MARGIN: usize = 4;

    pub(in crate::app) fn new(engine: GraphEngine) -> Self {
        let forces = engine.forces();
        let link_distance = match forces.link.map(|link| link.distance) {
            Some(LinkDistance::Uniform(distance)) => distance,
            _ => 150.0,
        };
        let charge_strength = forces.charge.map_or(-200.0, |charge| charge.strength);

        Self {
            links_enabled: forces.link.is_some(),
            charge_enabled: forces.charge.is_some(),
            centering: forces.center.is_some(),
            engine,
            search: String::new(),
            summary: None,
            pan: Vec2::ZERO,
            zoom: 1.0,
            link_distance,
            charge_strength,
            tick_count: 0,
            last_shown: 0,
            last_hidden: 0,
            connection_rows_visible: Self::INITIAL_CONNECTION_ROWS,
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        source: &DataSource,
        reload_requested: &mut bool,
        is_loading: bool,
    ) {
        self.consume_events();
        if !self.engine.is_idle() || self.engine.dragging().is_some() {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("entity-graph");
                    ui.separator();
                    ui.label(format!("source: {source}"));
                    ui.label(format!("nodes: {}", self.engine.graph().node_count()));
                    ui.label(format!("edges: {}", self.engine.graph().edge_count()));
                    let reload_button =
                        ui.add_enabled(!is_loading, egui::Button::new("Reload data"));
                    if reload_button.clicked() {
                        *reload_requested = true;
                    }
                    if let Some(warning) = self.load_report_text() {
                        ui.label(RichText::new(warning).color(egui::Color32::from_rgb(230, 180, 80)));
                    }
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.visible_graph_text());
                    });
                });
            });

        egui::SidePanel::left("controls")
            .resizable(true)
            .default_width(300.0)
            .show(ctx, |ui| self.draw_controls(ui));

        egui::SidePanel::right("details")
            .resizable(true)
            .default_width(340.0)
            .show(ctx, |ui| self.draw_details(ui));

        egui::CentralPanel::default().show(ctx, |ui| {
            if is_loading {
                ui.vertical_centered(|ui| {
                    ui.add_space(120.0);
                    ui.heading("Reloading network...");
                    ui.add_space(8.0);
                    ui.spinner();
                });
            } else {
                self.draw_graph(ui);
            }
        });

        if self.engine.has_pending_commands() {
            ctx.request_repaint();
        }
    }

    fn consume_events(&mut self) {
        let events = self.engine.step();
        let mut shown = 0;
        let mut hidden = 0;

        for event in events {
            match event {
                EngineEvent::Tick { .. } => self.tick_count += 1,
                EngineEvent::NodeSelected(summary) => {
                    if self.summary.as_ref().is_none_or(|current| current.id != summary.id) {
                        self.connection_rows_visible = Self::INITIAL_CONNECTION_ROWS;
                    }
                    self.summary = Some(summary);
                }
                EngineEvent::VisibilityChanged { visible: true, .. } => shown += 1,
                EngineEvent::VisibilityChanged { visible: false, .. } => hidden += 1,
            }
        }

        if shown + hidden > 0 {
            self.last_shown = shown;
            self.last_hidden = hidden;
        }
    }

    fn load_report_text(&self) -> Option<String> {
        let report = self.engine.report();
        let mut parts = Vec::new();
        if report.dropped_edges > 0 {
            parts.push(format!("{} dangling edges dropped", report.dropped_edges));
        }
        if report.unknown_types > 0 {
            parts.push(format!("{} nodes of unknown type", report.unknown_types));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }

    fn visible_graph_text(&self) -> String {
        let mut text = format!(
            "showing {} nodes, {} edges",
            self.engine.visible_node_count(),
            self.engine.visible_edge_count()
        );
        if self.last_shown + self.last_hidden > 0 {
            text.push_str(&format!(
                "  (last filter: +{} / -{})",
                self.last_shown, self.last_hidden
            ));
        }
        text
    }
}
