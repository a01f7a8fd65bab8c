use eframe::egui::Vec2;

use crate::engine::focus::edge_touches;
use crate::util::separation_direction;

use super::quadtree::QuadNode;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LinkDistance {
    Uniform(f32),
    Focused { anchor: usize, near: f32, far: f32 },
}

impl LinkDistance {
    pub fn for_edge(self, source: usize, target: usize) -> f32 {
        match self {
            Self::Uniform(distance) => distance,
            Self::Focused { anchor, near, far } => {
                if edge_touches(source, target, anchor) {
                    near
                } else {
                    far
                }
            }
        }
    }
}

// Default stiffness is 1 / min(degree(source), degree(target)).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinkForce {
    pub distance: LinkDistance,
    pub stiffness: Option<f32>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChargeForce {
    pub strength: f32,
    pub theta: f32,
    pub distance_min: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CenterForce {
    pub center: Vec2,
    pub strength: f32,
}

pub(super) struct LinkInputs<'a> {
    pub(super) edges: &'a [(usize, usize)],
    pub(super) default_stiffness: &'a [f32],
    pub(super) bias: &'a [f32],
    pub(super) positions: &'a [Vec2],
    pub(super) velocities: &'a [Vec2],
    pub(super) pinned: &'a [Option<Vec2>],
}

pub(super) fn accumulate_links(
    link: LinkForce,
    inputs: &LinkInputs<'_>,
    alpha: f32,
    forces: &mut [Vec2],
) {
    for (edge_index, &(source, target)) in inputs.edges.iter().enumerate() {
        if source == target {
            continue;
        }

        let mut delta = (inputs.positions[target] + inputs.velocities[target])
            - (inputs.positions[source] + inputs.velocities[source]);
        if delta.length_sq() <= f32::EPSILON {
            delta = separation_direction(source, target) * 1e-3;
        }
        let distance = delta.length();
        let rest = link.distance.for_edge(source, target);
        let stiffness = link
            .stiffness
            .unwrap_or(inputs.default_stiffness[edge_index]);
        let correction = delta * ((distance - rest) / distance * alpha * stiffness);

        // A pinned endpoint does not move, so its partner absorbs the full correction.
        let bias = match (inputs.pinned[source], inputs.pinned[target]) {
            (Some(_), None) => 1.0,
            (None, Some(_)) => 0.0,
            _ => inputs.bias[edge_index],
        };
        forces[target] -= correction * bias;
        forces[source] += correction * (1.0 - bias);
    }
}

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    strength_alpha: f32,
    theta_sq: f32,
    distance_min_sq: f32,
}

impl ChargeParams {
    pub(super) fn new(charge: ChargeForce, alpha: f32) -> Self {
        Self {
            strength_alpha: charge.strength * alpha,
            theta_sq: charge.theta * charge.theta,
            distance_min_sq: charge.distance_min * charge.distance_min,
        }
    }

    fn pull(self, delta: Vec2, weight: f32) -> Vec2 {
        let mut distance_sq = delta.length_sq();
        if distance_sq < self.distance_min_sq {
            distance_sq = (self.distance_min_sq * distance_sq).sqrt();
        }
        delta * (self.strength_alpha * weight / distance_sq)
    }

    fn between(self, from: usize, to: usize, positions: &[Vec2]) -> Vec2 {
        let mut delta = positions[to] - positions[from];
        if delta.length_sq() <= f32::EPSILON {
            delta = separation_direction(from, to) * 1e-3;
        }
        self.pull(delta, 1.0)
    }
}

pub(super) fn accumulate_charge_exact(params: ChargeParams, positions: &[Vec2], forces: &mut [Vec2]) {
    for from in 0..positions.len() {
        for to in (from + 1)..positions.len() {
            let pull = params.between(from, to, positions);
            forces[from] += pull;
            forces[to] -= pull;
        }
    }
}

pub(super) fn accumulate_charge_for_node(
    node: &QuadNode,
    index: usize,
    positions: &[Vec2],
    params: ChargeParams,
    force: &mut Vec2,
) {
    if node.mass <= 0.0 {
        return;
    }

    let point = positions[index];
    let delta = node.center_of_mass - point;
    let distance_sq = delta.length_sq();
    let side = node.bounds.side_length();
    let can_approximate = !node.bounds.contains(point)
        && distance_sq > f32::EPSILON
        && (side * side / distance_sq) < params.theta_sq;

    if can_approximate {
        *force += params.pull(delta, node.mass);
        return;
    }

    if node.is_leaf() {
        for &other_index in &node.indices {
            if other_index != index {
                *force += params.between(index, other_index, positions);
            }
        }
        return;
    }

    for child in node.children.iter().flatten() {
        accumulate_charge_for_node(child, index, positions, params, force);
    }
}

pub(super) fn apply_centering(
    center: CenterForce,
    positions: &mut [Vec2],
    pinned: &[Option<Vec2>],
) {
    if positions.is_empty() {
        return;
    }

    let mut centroid = Vec2::ZERO;
    for position in positions.iter() {
        centroid += *position;
    }
    centroid /= positions.len() as f32;

    let shift = (centroid - center.center) * center.strength;
    if shift.length_sq() <= f32::EPSILON {
        return;
    }

    for (position, pin) in positions.iter_mut().zip(pinned) {
        if pin.is_none() {
            *position -= shift;
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    const REPEL: ChargeForce = ChargeForce {
        strength: -200.0,
        theta: 0.9,
        distance_min: 1.0,
    };

    #[test]
    fn focused_distance_depends_on_anchor() {
        let distance = LinkDistance::Focused {
            anchor: 2,
            near: 100.0,
            far: 300.0,
        };
        assert_eq!(distance.for_edge(2, 5), 100.0);
        assert_eq!(distance.for_edge(5, 2), 100.0);
        assert_eq!(distance.for_edge(4, 5), 300.0);
        assert_eq!(LinkDistance::Uniform(150.0).for_edge(4, 5), 150.0);
    }

    #[test]
    fn stretched_link_pulls_endpoints_together() {
        let positions = [vec2(0.0, 0.0), vec2(400.0, 0.0)];
        let velocities = [Vec2::ZERO; 2];
        let pinned = [None, None];
        let inputs = LinkInputs {
            edges: &[(0, 1)],
            default_stiffness: &[1.0],
            bias: &[0.5],
            positions: &positions,
            velocities: &velocities,
            pinned: &pinned,
        };
        let link = LinkForce {
            distance: LinkDistance::Uniform(150.0),
            stiffness: None,
        };

        let mut forces = [Vec2::ZERO; 2];
        accumulate_links(link, &inputs, 1.0, &mut forces);

        assert!(forces[0].x > 0.0);
        assert!(forces[1].x < 0.0);
        assert!((forces[0] + forces[1]).length() < 1e-4);
    }

    #[test]
    fn pinned_endpoint_gets_no_link_force() {
        let positions = [vec2(0.0, 0.0), vec2(400.0, 0.0)];
        let velocities = [Vec2::ZERO; 2];
        let pinned = [Some(vec2(0.0, 0.0)), None];
        let inputs = LinkInputs {
            edges: &[(0, 1)],
            default_stiffness: &[1.0],
            bias: &[0.5],
            positions: &positions,
            velocities: &velocities,
            pinned: &pinned,
        };
        let link = LinkForce {
            distance: LinkDistance::Uniform(150.0),
            stiffness: None,
        };

        let mut forces = [Vec2::ZERO; 2];
        accumulate_links(link, &inputs, 1.0, &mut forces);

        assert_eq!(forces[0], Vec2::ZERO);
        assert!((forces[1].x + 250.0).abs() < 1e-3);
    }

    #[test]
    fn charge_pushes_pairs_apart() {
        let positions = [vec2(-5.0, 0.0), vec2(5.0, 0.0)];
        let mut forces = [Vec2::ZERO; 2];
        accumulate_charge_exact(ChargeParams::new(REPEL, 1.0), &positions, &mut forces);

        assert!(forces[0].x < 0.0);
        assert!(forces[1].x > 0.0);
    }

    #[test]
    fn coincident_bodies_are_separated() {
        let positions = [vec2(1.0, 1.0), vec2(1.0, 1.0)];
        let mut forces = [Vec2::ZERO; 2];
        accumulate_charge_exact(ChargeParams::new(REPEL, 1.0), &positions, &mut forces);

        assert!(forces[0].length() > 1.0);
        assert!((forces[0] + forces[1]).length() < 1e-3);
    }

    #[test]
    fn barnes_hut_matches_exact_for_distant_cluster() {
        let mut positions = (0..40)
            .map(|index| {
                let angle = index as f32 * 0.9;
                vec2(angle.cos(), angle.sin()) * (1.0 + index as f32 * 0.1)
            })
            .collect::<Vec<_>>();
        positions.push(vec2(1000.0, 0.0));
        let probe = positions.len() - 1;
        let params = ChargeParams::new(REPEL, 1.0);

        let mut exact = vec![Vec2::ZERO; positions.len()];
        accumulate_charge_exact(params, &positions, &mut exact);

        let tree = QuadNode::build(&positions).unwrap();
        let mut approximated = Vec2::ZERO;
        accumulate_charge_for_node(&tree, probe, &positions, params, &mut approximated);

        let error = (approximated - exact[probe]).length() / exact[probe].length();
        assert!(error < 1e-2, "relative error {error}");
    }

    #[test]
    fn centering_moves_centroid_onto_center() {
        let mut positions = [vec2(10.0, 10.0), vec2(30.0, 10.0)];
        let center = CenterForce {
            center: Vec2::ZERO,
            strength: 1.0,
        };
        apply_centering(center, &mut positions, &[None, None]);

        let centroid = (positions[0] + positions[1]) * 0.5;
        assert!(centroid.length() < 1e-4);
        assert!((positions[1] - positions[0] - vec2(20.0, 0.0)).length() < 1e-4);
    }
}
