mod filter;
mod focus;
mod physics;
mod projection;
mod summary;

use std::collections::VecDeque;

use eframe::egui::Vec2;

use crate::network::{LoadReport, NetworkGraph, NodeKind};
pub use filter::FilterState;
use filter::{edge_visibility, node_visibility};
pub use focus::FocusState;
use focus::{FocusController, FocusTransition, focused_edge_visibility};
pub use physics::{
    CenterForce, ChargeForce, Force, ForceName, ForceSet, LinkDistance, LinkForce,
};
use physics::{Simulation, SimulationConfig};
pub use projection::{EdgeStyle, NodeShape, NodeStyle};
use projection::{SizeScale, project_edge, project_node};
pub use summary::NodeSummary;

#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    ToggleType { kind: NodeKind, enabled: bool },
    SetTypeFilter(Option<NodeKind>),
    SetSearchText(String),
    SetPhotoMode(bool),
    SetFocusMode(bool),
    SelectNode(String),
    DragStart { id: String, position: Vec2 },
    DragMove { id: String, position: Vec2 },
    DragEnd { id: String },
    ResetFilters,
}

#[derive(Clone, Debug, PartialEq)]
pub enum EngineEvent {
    Tick { alpha: f32 },
    NodeSelected(NodeSummary),
    VisibilityChanged { id: String, visible: bool },
}

pub struct GraphEngine {
    graph: NetworkGraph,
    report: LoadReport,
    simulation: Simulation,
    filter: FilterState,
    focus: FocusController,
    node_visible: Vec<bool>,
    edge_visible: Vec<bool>,
    scale: SizeScale,
    commands: VecDeque<Command>,
    events: Vec<EngineEvent>,
    dragging: Option<usize>,
    selected: Option<usize>,
    paused: bool,
}

impl GraphEngine {
    pub fn new(graph: NetworkGraph, report: LoadReport) -> Self {
        let simulation = Simulation::new(
            graph.node_count(),
            graph
                .edges()
                .iter()
                .map(|edge| (edge.source, edge.target))
                .collect(),
            ForceSet::default(),
            SimulationConfig::default(),
        );
        let filter = FilterState::default();
        let node_visible = node_visibility(&graph, &filter);
        let edge_visible = edge_visibility(&graph, &node_visible);

        Self {
            scale: SizeScale::new(graph.max_degree()),
            graph,
            report,
            simulation,
            filter,
            focus: FocusController::default(),
            node_visible,
            edge_visible,
            commands: VecDeque::new(),
            events: Vec::new(),
            dragging: None,
            selected: None,
            paused: false,
        }
    }

    pub fn dispatch(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    pub fn has_pending_commands(&self) -> bool {
        !self.commands.is_empty()
    }

    pub fn step(&mut self) -> Vec<EngineEvent> {
        while let Some(command) = self.commands.pop_front() {
            self.apply(command);
        }
        if self.simulation.tick() {
            self.events.push(EngineEvent::Tick {
                alpha: self.simulation.alpha(),
            });
        }
        std::mem::take(&mut self.events)
    }

    pub fn apply(&mut self, command: Command) {
        match command {
            Command::ToggleType { kind, enabled } => {
                self.set_filter(self.filter.with_type_toggle(kind, enabled));
            }
            Command::SetTypeFilter(kind) => self.set_filter(self.filter.with_type_filter(kind)),
            Command::SetSearchText(text) => self.set_filter(self.filter.with_search_text(text)),
            Command::SetPhotoMode(enabled) => {
                self.filter = self.filter.with_photo_mode(enabled);
            }
            Command::ResetFilters => self.set_filter(self.filter.reset()),
            Command::SetFocusMode(enabled) => {
                let transition = self.focus.set_enabled(enabled, &mut self.simulation);
                self.after_focus(transition);
            }
            Command::SelectNode(id) => self.select(&id),
            Command::DragStart { id, position } => self.drag_start(&id, position),
            Command::DragMove { id, position } => self.drag_move(&id, position),
            Command::DragEnd { id } => self.drag_end(&id),
        }
    }

    fn set_filter(&mut self, filter: FilterState) {
        if filter != self.filter {
            self.filter = filter;
            self.recompute_visibility();
        }
    }

    fn recompute_visibility(&mut self) {
        let node_visible = node_visibility(&self.graph, &self.filter);
        for (index, (before, after)) in self.node_visible.iter().zip(&node_visible).enumerate() {
            if before != after {
                self.events.push(EngineEvent::VisibilityChanged {
                    id: self.graph.nodes()[index].id.clone(),
                    visible: *after,
                });
            }
        }
        self.node_visible = node_visible;

        self.edge_visible = match self.focus.state() {
            FocusState::Normal => edge_visibility(&self.graph, &self.node_visible),
            FocusState::Focused(target) => focused_edge_visibility(&self.graph, target),
        };
    }

    fn after_focus(&mut self, transition: Option<FocusTransition>) {
        let Some(transition) = transition else {
            return;
        };
        if self.paused {
            self.simulation.stop();
        }
        log::debug!("focus transition: {transition:?}");
        self.recompute_visibility();
    }

    fn select(&mut self, id: &str) {
        let Some(index) = self.graph.index_of(id) else {
            log::debug!("ignoring selection of unknown node {id}");
            return;
        };
        self.selected = Some(index);
        if let Some(summary) = NodeSummary::from_graph(&self.graph, index) {
            self.events.push(EngineEvent::NodeSelected(summary));
        }
        let transition = self.focus.select(index, &mut self.simulation);
        self.after_focus(transition);
    }

    fn drag_start(&mut self, id: &str, position: Vec2) {
        let Some(index) = self.graph.index_of(id) else {
            return;
        };
        if let Some(previous) = self.dragging.replace(index)
            && previous != index
        {
            self.simulation.unpin(previous);
        }
        log::debug!("drag started on {id}");
        self.simulation.pin(index, position);
        self.simulation
            .set_alpha_target(self.simulation.config().drag_alpha_target);
        self.simulation.resume();
        self.paused = false;
    }

    fn drag_move(&mut self, id: &str, position: Vec2) {
        if let Some(index) = self.dragging
            && self.graph.index_of(id) == Some(index)
        {
            self.simulation.pin(index, position);
        }
    }

    fn drag_end(&mut self, id: &str) {
        let Some(index) = self.dragging else {
            return;
        };
        if self.graph.index_of(id) != Some(index) {
            return;
        }
        self.dragging = None;
        self.simulation.unpin(index);
        self.simulation.set_alpha_target(0.0);
        log::debug!("drag ended on {id}");
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        if paused {
            self.simulation.stop();
        } else if self.simulation.alpha() >= self.simulation.config().alpha_min {
            self.simulation.resume();
        }
    }

    pub fn reheat(&mut self) {
        self.paused = false;
        self.simulation.restart();
    }

    // Refused while focused so leaving focus restores the saved set intact.
    pub fn set_force(&mut self, force: Force) -> bool {
        if self.focus.state() != FocusState::Normal {
            return false;
        }
        self.simulation.set_force(force);
        self.reheat();
        true
    }

    pub fn remove_force(&mut self, name: ForceName) -> bool {
        if self.focus.state() != FocusState::Normal {
            return false;
        }
        log::debug!("force removed: {name:?}");
        self.simulation.remove_force(name);
        self.reheat();
        true
    }

    pub fn forces(&self) -> ForceSet {
        self.simulation.forces()
    }

    pub fn graph(&self) -> &NetworkGraph {
        &self.graph
    }

    pub fn report(&self) -> LoadReport {
        self.report
    }

    pub fn positions(&self) -> &[Vec2] {
        self.simulation.positions()
    }

    pub fn alpha(&self) -> f32 {
        self.simulation.alpha()
    }

    pub fn alpha_target(&self) -> f32 {
        self.simulation.alpha_target()
    }

    pub fn is_idle(&self) -> bool {
        self.simulation.is_idle()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn focus_enabled(&self) -> bool {
        self.focus.enabled()
    }

    pub fn focus_state(&self) -> FocusState {
        self.focus.state()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn dragging(&self) -> Option<usize> {
        self.dragging
    }

    pub fn node_visible(&self, index: usize) -> bool {
        self.node_visible.get(index).copied().unwrap_or(false)
    }

    pub fn edge_visible(&self, index: usize) -> bool {
        self.edge_visible.get(index).copied().unwrap_or(false)
    }

    pub fn visible_node_count(&self) -> usize {
        self.node_visible.iter().filter(|visible| **visible).count()
    }

    pub fn visible_edge_count(&self) -> usize {
        self.edge_visible.iter().filter(|visible| **visible).count()
    }

    pub fn node_style(&self, index: usize) -> Option<NodeStyle> {
        project_node(
            &self.graph,
            index,
            self.scale,
            &self.filter,
            self.focus.state(),
            self.node_visible(index),
        )
    }

    pub fn edge_style(&self, index: usize) -> Option<EdgeStyle> {
        project_edge(
            &self.graph,
            index,
            self.focus.state(),
            self.edge_visible(index),
        )
    }
}
