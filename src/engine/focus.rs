use crate::network::NetworkGraph;

use super::physics::{ChargeForce, ForceSet, LinkDistance, LinkForce, Simulation};

pub const FOCUS_NEAR_DISTANCE: f32 = 100.0;
pub const FOCUS_FAR_DISTANCE: f32 = 300.0;
pub const FOCUS_CHARGE_STRENGTH: f32 = -50.0;
pub const DIMMED_OPACITY: f32 = 0.3;

pub fn edge_touches(source: usize, target: usize, anchor: usize) -> bool {
    source == anchor || target == anchor
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FocusState {
    #[default]
    Normal,
    Focused(usize),
}

impl FocusState {
    pub fn target(self) -> Option<usize> {
        match self {
            Self::Normal => None,
            Self::Focused(target) => Some(target),
        }
    }
}

pub fn focused_forces(base: ForceSet, target: usize) -> ForceSet {
    let link = base.link.unwrap_or(LinkForce {
        distance: LinkDistance::Uniform(FOCUS_FAR_DISTANCE),
        stiffness: None,
    });
    let charge = base.charge.unwrap_or(ChargeForce {
        strength: FOCUS_CHARGE_STRENGTH,
        theta: 0.9,
        distance_min: 1.0,
    });

    ForceSet {
        link: Some(LinkForce {
            distance: LinkDistance::Focused {
                anchor: target,
                near: FOCUS_NEAR_DISTANCE,
                far: FOCUS_FAR_DISTANCE,
            },
            ..link
        }),
        charge: Some(ChargeForce {
            strength: FOCUS_CHARGE_STRENGTH,
            ..charge
        }),
        center: base.center,
    }
}

pub fn focused_edge_visibility(graph: &NetworkGraph, target: usize) -> Vec<bool> {
    graph
        .edges()
        .iter()
        .map(|edge| edge.touches(target))
        .collect()
}

pub fn node_opacity(graph: &NetworkGraph, focus: FocusState, index: usize) -> f32 {
    match focus {
        FocusState::Normal => 1.0,
        FocusState::Focused(target) => {
            if index == target || graph.is_connected(target, index) {
                1.0
            } else {
                DIMMED_OPACITY
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusTransition {
    Entered(usize),
    Exited,
}

#[derive(Debug, Default)]
pub struct FocusController {
    enabled: bool,
    state: FocusState,
    saved_forces: Option<ForceSet>,
}

impl FocusController {
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> FocusState {
        self.state
    }

    pub fn set_enabled(
        &mut self,
        enabled: bool,
        simulation: &mut Simulation,
    ) -> Option<FocusTransition> {
        self.enabled = enabled;
        if enabled || self.state == FocusState::Normal {
            return None;
        }

        if let Some(forces) = self.saved_forces.take() {
            simulation.replace_forces(forces);
        }
        self.state = FocusState::Normal;
        simulation.restart();
        log::debug!("focus mode left");
        Some(FocusTransition::Exited)
    }

    pub fn select(&mut self, target: usize, simulation: &mut Simulation) -> Option<FocusTransition> {
        if !self.enabled {
            return None;
        }

        let base = *self.saved_forces.get_or_insert_with(|| simulation.forces());
        simulation.replace_forces(focused_forces(base, target));
        self.state = FocusState::Focused(target);
        simulation.restart();
        log::debug!("focused on node #{target}");
        Some(FocusTransition::Entered(target))
    }
}
