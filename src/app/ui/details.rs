use eframe::egui::{self, RichText, Ui};

use crate::engine::{Command, NodeSummary};

use super::super::ViewModel;

struct ConnectionEntry {
    id: String,
    name: String,
    relation: Option<String>,
    visible: bool,
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        ui.heading("Node Details");
        ui.add_space(6.0);

        let Some(summary) = self.summary.clone() else {
            ui.label("Click a node in the graph to see its details.");
            return;
        };

        ui.label(RichText::new(summary.name.as_str()).strong());
        ui.small(format!("{} · {}", summary.kind.label(), summary.id));
        ui.add_space(6.0);

        for (label, value) in &summary.fields {
            ui.label(format!("{label}: {value}"));
        }
        ui.label(format!("Connections: {}", summary.connections));
        if let Some(image) = &summary.image {
            ui.hyperlink_to("Open image", image);
        }

        if self.engine.focus_enabled() && ui.button("Focus here").clicked() {
            self.engine.dispatch(Command::SelectNode(summary.id.clone()));
        }

        if let Some(target) = self.engine.focus_state().target()
            && let Some(focused) = self.engine.graph().node(target)
            && focused.id != summary.id
        {
            let adjacent = self
                .engine
                .graph()
                .is_connected_by_id(&summary.id, &focused.id);
            ui.small(if adjacent {
                format!("Neighbor of {}", focused.name)
            } else {
                format!("Not connected to {}", focused.name)
            });
        }

        ui.separator();
        let neighbor_count = self.engine.graph().neighbors_by_id(&summary.id).len();
        ui.label(RichText::new(format!("Connected nodes ({neighbor_count})")).strong());
        let connections = self.connections_for(&summary);
        if connections.is_empty() {
            ui.label("This node has no connections.");
            return;
        }

        let row_count = connections.len().min(self.connection_rows_visible);
        let mut should_load_more = false;
        let mut picked = None;

        egui::ScrollArea::vertical()
            .id_salt("connections_scroll")
            .auto_shrink([false, false])
            .show_rows(ui, 22.0, row_count, |ui, row_range| {
                if row_range.end + Self::CONNECTION_PREFETCH_MARGIN >= row_count {
                    should_load_more = true;
                }

                for index in row_range {
                    let Some(entry) = connections.get(index) else {
                        continue;
                    };
                    let mut label = entry.name.clone();
                    if let Some(relation) = &entry.relation {
                        label.push_str(&format!("  [{relation}]"));
                    }
                    if !entry.visible {
                        label.push_str("  (hidden)");
                    }

                    if ui.link(label).on_hover_text(entry.id.as_str()).clicked() {
                        picked = Some(entry.id.clone());
                    }
                }
            });

        if should_load_more && row_count < connections.len() {
            self.connection_rows_visible =
                (row_count + Self::CONNECTION_PAGE_ROWS).min(connections.len());
        }
        if let Some(id) = picked {
            self.engine.dispatch(Command::SelectNode(id));
        }
    }

    fn connections_for(&self, summary: &NodeSummary) -> Vec<ConnectionEntry> {
        let graph = self.engine.graph();
        let Some(index) = graph.index_of(&summary.id) else {
            return Vec::new();
        };

        let mut entries = graph
            .incident_edges(index)
            .iter()
            .filter_map(|&edge_index| {
                let edge = graph.edges().get(edge_index)?;
                let other = edge.other(index);
                let node = graph.node(other)?;
                Some(ConnectionEntry {
                    id: node.id.clone(),
                    name: node.name.clone(),
                    relation: edge.relation.clone(),
                    visible: self.engine.node_visible(other),
                })
            })
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        entries
    }
}
