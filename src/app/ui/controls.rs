use eframe::egui::{self, Ui, Vec2};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::engine::{
    CenterForce, ChargeForce, Command, Force, ForceName, FocusState, LinkDistance, LinkForce,
};
use crate::network::NodeKind;
use crate::util::truncate_label;

use super::super::ViewModel;

const MAX_SUGGESTIONS: usize = 8;

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

fn toggle_label(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Character => "Characters",
        NodeKind::Episode => "Episodes",
        NodeKind::Location => "Locations",
        NodeKind::Other => "Other",
    }
}

fn type_filter_label(kind: Option<NodeKind>) -> &'static str {
    kind.map_or("all", NodeKind::label)
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Filters");
        ui.separator();
        ui.add_space(4.0);

        ui.label("Search by name")
            .on_hover_text("Hide every node whose name does not contain this text.");
        if ui.text_edit_singleline(&mut self.search).changed() {
            self.engine
                .dispatch(Command::SetSearchText(self.search.clone()));
        }
        self.draw_suggestions(ui);

        ui.separator();

        let filter = self.engine.filter().clone();
        let mut photo_mode = filter.photo_mode;
        if ui
            .checkbox(&mut photo_mode, "Show photos")
            .on_hover_text("Draw nodes that carry an image as photo frames instead of circles.")
            .changed()
        {
            self.engine.dispatch(Command::SetPhotoMode(photo_mode));
        }

        for kind in NodeKind::TOGGLEABLE {
            let mut enabled = filter.toggles.allows(kind);
            if ui.checkbox(&mut enabled, toggle_label(kind)).changed() {
                self.engine.dispatch(Command::ToggleType { kind, enabled });
            }
        }

        let mut type_filter = filter.type_filter;
        egui::ComboBox::from_label("Type")
            .selected_text(type_filter_label(type_filter))
            .show_ui(ui, |ui| {
                ui.selectable_value(&mut type_filter, None, "all");
                for kind in NodeKind::TOGGLEABLE {
                    ui.selectable_value(&mut type_filter, Some(kind), kind.label());
                }
                ui.selectable_value(&mut type_filter, Some(NodeKind::Other), "other");
            });
        if type_filter != filter.type_filter {
            self.engine.dispatch(Command::SetTypeFilter(type_filter));
        }

        if ui
            .button("Reset filters")
            .on_hover_text("Clear the search and show every type again.")
            .clicked()
        {
            self.search.clear();
            self.engine.dispatch(Command::ResetFilters);
        }

        ui.separator();
        ui.heading("Focus");

        let mut focus_mode = self.engine.focus_enabled();
        if ui
            .checkbox(&mut focus_mode, "Focus mode")
            .on_hover_text("Clicking a node pulls its neighborhood together and hides other edges.")
            .changed()
        {
            self.engine.dispatch(Command::SetFocusMode(focus_mode));
        }
        match self.engine.focus_state() {
            FocusState::Normal => {
                ui.label("No focus target.");
            }
            FocusState::Focused(target) => {
                if let Some(node) = self.engine.graph().node(target) {
                    ui.label(format!("Focused on {}", node.name));
                }
            }
        }

        ui.separator();
        self.draw_simulation_controls(ui);
    }

    fn draw_suggestions(&mut self, ui: &mut Ui) {
        let query = self.search.trim();
        if query.is_empty() {
            return;
        }

        let matcher = SkimMatcherV2::default();
        let mut ranked = self
            .engine
            .graph()
            .nodes()
            .iter()
            .filter_map(|node| {
                fuzzy_match_score(&matcher, &node.name, query)
                    .map(|score| (score, node.name.as_str(), node.id.as_str()))
            })
            .collect::<Vec<_>>();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(&b.1)));
        ranked.truncate(MAX_SUGGESTIONS);

        let mut picked = None;
        for (_score, name, id) in &ranked {
            if ui
                .link(truncate_label(name, 36))
                .on_hover_text(*id)
                .clicked()
            {
                picked = Some(((*name).to_owned(), (*id).to_owned()));
            }
        }

        if let Some((name, id)) = picked {
            self.search = name;
            self.engine
                .dispatch(Command::SetSearchText(self.search.clone()));
            self.engine.dispatch(Command::SelectNode(id));
        }
    }

    fn draw_simulation_controls(&mut self, ui: &mut Ui) {
        ui.heading("Layout");

        let mut paused = self.engine.is_paused();
        if ui.checkbox(&mut paused, "Pause layout").changed() {
            self.engine.set_paused(paused);
        }
        ui.horizontal(|ui| {
            if ui.button("Reheat").clicked() {
                self.engine.reheat();
            }
            if ui.button("Recenter view").clicked() {
                self.pan = Vec2::ZERO;
                self.zoom = 1.0;
            }
        });

        let status = if self.engine.is_idle() {
            "settled"
        } else {
            "running"
        };
        ui.label(format!(
            "alpha {:.3} -> {:.1} ({status}, {} ticks)",
            self.engine.alpha(),
            self.engine.alpha_target(),
            self.tick_count
        ));

        ui.collapsing("Force tuning", |ui| {
            let tunable = self.engine.focus_state() == FocusState::Normal;
            ui.add_enabled_ui(tunable, |ui| {
                let link_toggle = ui.checkbox(&mut self.links_enabled, "Links");
                let distance_slider = ui
                    .add_enabled(
                        self.links_enabled,
                        egui::Slider::new(&mut self.link_distance, 30.0..=400.0)
                            .text("Link distance"),
                    )
                    .on_hover_text("Rest length of every edge.");
                if link_toggle.changed() && !self.links_enabled {
                    self.engine.remove_force(ForceName::Link);
                } else if link_toggle.changed() || distance_slider.changed() {
                    self.engine.set_force(Force::Link(LinkForce {
                        distance: LinkDistance::Uniform(self.link_distance),
                        stiffness: None,
                    }));
                }

                let charge_toggle = ui.checkbox(&mut self.charge_enabled, "Repulsion");
                let charge_slider = ui
                    .add_enabled(
                        self.charge_enabled,
                        egui::Slider::new(&mut self.charge_strength, -600.0..=0.0)
                            .text("Strength"),
                    )
                    .on_hover_text("Negative values push nodes apart.");
                if charge_toggle.changed() && !self.charge_enabled {
                    self.engine.remove_force(ForceName::Charge);
                } else if charge_toggle.changed() || charge_slider.changed() {
                    let charge = self.engine.forces().charge.unwrap_or(ChargeForce {
                        strength: self.charge_strength,
                        theta: 0.9,
                        distance_min: 1.0,
                    });
                    self.engine.set_force(Force::Charge(ChargeForce {
                        strength: self.charge_strength,
                        ..charge
                    }));
                }

                if ui.checkbox(&mut self.centering, "Centering").changed() {
                    if self.centering {
                        self.engine.set_force(Force::Center(CenterForce {
                            center: Vec2::ZERO,
                            strength: 1.0,
                        }));
                    } else {
                        self.engine.remove_force(ForceName::Center);
                    }
                }
            });
            if !tunable {
                ui.small("Leave focus mode to tune forces.");
            }
        });
    }
}
