mod forces;
mod quadtree;

use eframe::egui::Vec2;

use crate::util::phyllotaxis;
use forces::{
    ChargeParams, LinkInputs, accumulate_charge_exact, accumulate_charge_for_node,
    accumulate_links, apply_centering,
};
pub use forces::{CenterForce, ChargeForce, LinkDistance, LinkForce};
use quadtree::QuadNode;

const EXACT_CHARGE_LIMIT: usize = 500;

pub const DEFAULT_LINK_DISTANCE: f32 = 150.0;
pub const DEFAULT_CHARGE_STRENGTH: f32 = -200.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationConfig {
    pub initial_alpha: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub velocity_damping: f32,
    pub restart_alpha: f32,
    pub drag_alpha_target: f32,
    pub max_speed: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            initial_alpha: 1.0,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            velocity_damping: 0.9,
            restart_alpha: 0.5,
            drag_alpha_target: 0.3,
            max_speed: 120.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceSet {
    pub link: Option<LinkForce>,
    pub charge: Option<ChargeForce>,
    pub center: Option<CenterForce>,
}

impl Default for ForceSet {
    fn default() -> Self {
        Self {
            link: Some(LinkForce {
                distance: LinkDistance::Uniform(DEFAULT_LINK_DISTANCE),
                stiffness: None,
            }),
            charge: Some(ChargeForce {
                strength: DEFAULT_CHARGE_STRENGTH,
                theta: 0.9,
                distance_min: 1.0,
            }),
            center: Some(CenterForce {
                center: Vec2::ZERO,
                strength: 1.0,
            }),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Force {
    Link(LinkForce),
    Charge(ChargeForce),
    Center(CenterForce),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ForceName {
    Link,
    Charge,
    Center,
}

impl ForceSet {
    pub fn with(mut self, force: Force) -> Self {
        match force {
            Force::Link(link) => self.link = Some(link),
            Force::Charge(charge) => self.charge = Some(charge),
            Force::Center(center) => self.center = Some(center),
        }
        self
    }
}

struct PhysicsScratch {
    forces: Vec<Vec2>,
}

pub struct Simulation {
    positions: Vec<Vec2>,
    velocities: Vec<Vec2>,
    pinned: Vec<Option<Vec2>>,
    edges: Vec<(usize, usize)>,
    default_stiffness: Vec<f32>,
    bias: Vec<f32>,
    forces: ForceSet,
    config: SimulationConfig,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    scratch: PhysicsScratch,
}

impl Simulation {
    pub fn new(
        node_count: usize,
        edges: Vec<(usize, usize)>,
        forces: ForceSet,
        config: SimulationConfig,
    ) -> Self {
        let edges = edges
            .into_iter()
            .filter(|&(source, target)| source < node_count && target < node_count)
            .collect::<Vec<_>>();

        let mut link_counts = vec![0usize; node_count];
        for &(source, target) in &edges {
            if source != target {
                link_counts[source] += 1;
                link_counts[target] += 1;
            }
        }

        let mut default_stiffness = Vec::with_capacity(edges.len());
        let mut bias = Vec::with_capacity(edges.len());
        for &(source, target) in &edges {
            let source_count = link_counts[source].max(1) as f32;
            let target_count = link_counts[target].max(1) as f32;
            default_stiffness.push(1.0 / source_count.min(target_count));
            bias.push(source_count / (source_count + target_count));
        }

        let center = forces.center.map(|center| center.center).unwrap_or(Vec2::ZERO);
        Self {
            positions: (0..node_count).map(|index| center + phyllotaxis(index)).collect(),
            velocities: vec![Vec2::ZERO; node_count],
            pinned: vec![None; node_count],
            edges,
            default_stiffness,
            bias,
            forces,
            alpha: config.initial_alpha,
            alpha_target: 0.0,
            running: node_count > 0,
            config,
            scratch: PhysicsScratch { forces: Vec::new() },
        }
    }

    pub fn positions(&self) -> &[Vec2] {
        &self.positions
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn config(&self) -> SimulationConfig {
        self.config
    }

    pub fn forces(&self) -> ForceSet {
        self.forces
    }

    pub fn is_idle(&self) -> bool {
        !self.running
    }

    pub fn set_force(&mut self, force: Force) {
        log::debug!("force reconfigured: {force:?}");
        self.forces = self.forces.with(force);
    }

    pub fn remove_force(&mut self, name: ForceName) {
        match name {
            ForceName::Link => self.forces.link = None,
            ForceName::Charge => self.forces.charge = None,
            ForceName::Center => self.forces.center = None,
        }
    }

    pub fn replace_forces(&mut self, forces: ForceSet) {
        self.forces = forces;
    }

    pub fn set_alpha_target(&mut self, alpha_target: f32) {
        self.alpha_target = alpha_target.clamp(0.0, 1.0);
    }

    pub fn restart(&mut self) {
        self.alpha = self.alpha.max(self.config.restart_alpha);
        self.resume();
    }

    pub fn resume(&mut self) {
        self.running = !self.positions.is_empty();
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn pin(&mut self, index: usize, position: Vec2) {
        if let Some(pin) = self.pinned.get_mut(index) {
            *pin = Some(position);
            self.positions[index] = position;
            self.velocities[index] = Vec2::ZERO;
        }
    }

    pub fn unpin(&mut self, index: usize) {
        if let Some(pin) = self.pinned.get_mut(index) {
            *pin = None;
        }
    }

    pub fn tick(&mut self) -> bool {
        if !self.running {
            return false;
        }

        let node_count = self.positions.len();
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        let alpha = self.alpha;

        let forces = &mut self.scratch.forces;
        forces.clear();
        forces.resize(node_count, Vec2::ZERO);

        if let Some(link) = self.forces.link {
            let inputs = LinkInputs {
                edges: &self.edges,
                default_stiffness: &self.default_stiffness,
                bias: &self.bias,
                positions: &self.positions,
                velocities: &self.velocities,
                pinned: &self.pinned,
            };
            accumulate_links(link, &inputs, alpha, forces);
        }

        if let Some(charge) = self.forces.charge
            && node_count > 1
        {
            let params = ChargeParams::new(charge, alpha);
            if node_count <= EXACT_CHARGE_LIMIT {
                accumulate_charge_exact(params, &self.positions, forces);
            } else if let Some(tree) = QuadNode::build(&self.positions) {
                for (index, force) in forces.iter_mut().enumerate() {
                    accumulate_charge_for_node(&tree, index, &self.positions, params, force);
                }
            }
        }

        let max_speed_sq = self.config.max_speed * self.config.max_speed;
        for index in 0..node_count {
            if let Some(pin) = self.pinned[index] {
                self.positions[index] = pin;
                self.velocities[index] = Vec2::ZERO;
                continue;
            }

            let mut velocity =
                (self.velocities[index] + forces[index]) * self.config.velocity_damping;
            let speed_sq = velocity.length_sq();
            if speed_sq > max_speed_sq {
                velocity *= self.config.max_speed / speed_sq.sqrt();
            }
            if !velocity.x.is_finite() || !velocity.y.is_finite() {
                velocity = Vec2::ZERO;
            }

            self.velocities[index] = velocity;
            self.positions[index] += velocity;
        }

        if let Some(center) = self.forces.center {
            apply_centering(center, &mut self.positions, &self.pinned);
        }

        if self.alpha < self.config.alpha_min {
            log::debug!("simulation settled");
            self.running = false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    fn chain(node_count: usize) -> Simulation {
        let edges = (1..node_count).map(|index| (index - 1, index)).collect();
        Simulation::new(
            node_count,
            edges,
            ForceSet::default(),
            SimulationConfig::default(),
        )
    }

    #[test]
    fn alpha_decreases_strictly_until_idle() {
        let mut simulation = chain(12);
        let mut previous = simulation.alpha();
        let mut ticks = 0;

        while simulation.tick() {
            assert!(simulation.alpha() < previous);
            previous = simulation.alpha();
            ticks += 1;
            assert!(ticks < 1_000);
        }

        assert!(simulation.is_idle());
        assert!(simulation.alpha() < simulation.config().alpha_min);
        assert!((290..=310).contains(&ticks), "settled after {ticks} ticks");
    }

    #[test]
    fn idle_ticks_leave_positions_untouched() {
        let mut simulation = chain(6);
        while simulation.tick() {}

        let settled = simulation.positions().to_vec();
        for _ in 0..20 {
            assert!(!simulation.tick());
        }
        for (before, after) in settled.iter().zip(simulation.positions()) {
            assert!((*before - *after).length() < 1e-6);
        }
    }

    #[test]
    fn settled_chain_keeps_roughly_link_distance() {
        let mut simulation = chain(2);
        simulation.remove_force(ForceName::Charge);
        while simulation.tick() {}

        let gap = (simulation.positions()[0] - simulation.positions()[1]).length();
        assert!((gap - DEFAULT_LINK_DISTANCE).abs() < 15.0, "gap {gap}");
    }

    #[test]
    fn centering_keeps_centroid_at_origin() {
        let mut simulation = chain(20);
        for _ in 0..50 {
            simulation.tick();
        }

        let centroid = simulation
            .positions()
            .iter()
            .fold(Vec2::ZERO, |sum, position| sum + *position)
            / 20.0;
        assert!(centroid.length() < 1e-2);
    }

    #[test]
    fn repulsion_spreads_unlinked_nodes() {
        let mut simulation = Simulation::new(
            8,
            Vec::new(),
            ForceSet::default(),
            SimulationConfig::default(),
        );
        let spread = |simulation: &Simulation| {
            simulation
                .positions()
                .iter()
                .map(|position| position.length())
                .sum::<f32>()
        };

        let before = spread(&simulation);
        for _ in 0..100 {
            simulation.tick();
        }
        assert!(spread(&simulation) > before);
    }

    #[test]
    fn pinned_node_follows_pointer_only() {
        let mut simulation = chain(5);
        let anchor = vec2(300.0, -120.0);
        simulation.pin(2, anchor);

        for _ in 0..30 {
            simulation.tick();
            assert_eq!(simulation.positions()[2], anchor);
        }

        simulation.unpin(2);
        simulation.tick();
        assert_ne!(simulation.positions()[2], anchor);
    }

    #[test]
    fn alpha_target_keeps_simulation_hot() {
        let mut simulation = chain(4);
        simulation.set_alpha_target(simulation.config().drag_alpha_target);
        for _ in 0..2_000 {
            assert!(simulation.tick());
        }
        assert!((simulation.alpha() - 0.3).abs() < 1e-3);

        simulation.set_alpha_target(0.0);
        while simulation.tick() {}
        assert!(simulation.is_idle());
    }

    #[test]
    fn restart_reheats_idle_simulation() {
        let mut simulation = chain(4);
        while simulation.tick() {}

        simulation.restart();
        assert!(!simulation.is_idle());
        assert_eq!(simulation.alpha(), simulation.config().restart_alpha);
        assert!(simulation.tick());
    }

    #[test]
    fn set_force_swaps_only_that_term() {
        let mut simulation = chain(3);
        let before = simulation.forces();
        let weaker = ChargeForce {
            strength: -50.0,
            ..before.charge.unwrap()
        };

        simulation.set_force(Force::Charge(weaker));
        assert_eq!(simulation.forces().charge, Some(weaker));
        assert_eq!(simulation.forces().link, before.link);
        assert_eq!(simulation.forces().center, before.center);
    }

    #[test]
    fn large_graphs_use_the_quadtree_without_blowing_up() {
        let node_count = EXACT_CHARGE_LIMIT + 100;
        let edges = (1..node_count).map(|index| (index / 2, index)).collect();
        let mut simulation = Simulation::new(
            node_count,
            edges,
            ForceSet::default(),
            SimulationConfig::default(),
        );

        for _ in 0..10 {
            simulation.tick();
        }
        assert!(
            simulation
                .positions()
                .iter()
                .all(|position| position.x.is_finite() && position.y.is_finite())
        );
    }
}
