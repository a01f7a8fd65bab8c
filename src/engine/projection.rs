use eframe::egui::Color32;

use crate::network::{NetworkGraph, NodeKind};

use super::filter::FilterState;
use super::focus::{FocusState, node_opacity};

pub const MIN_RADIUS: f32 = 5.0;
pub const MAX_RADIUS: f32 = 70.0;

pub const CHARACTER_COLOR: Color32 = Color32::from_rgb(0x69, 0xb3, 0xa2);
pub const EPISODE_COLOR: Color32 = Color32::from_rgb(0xff, 0x8c, 0x00);
pub const LOCATION_COLOR: Color32 = Color32::from_rgb(0x6a, 0x5a, 0xcd);
pub const OTHER_COLOR: Color32 = Color32::from_rgb(0xcc, 0xcc, 0xcc);
pub const EDGE_COLOR: Color32 = Color32::from_rgb(0xaa, 0xaa, 0xaa);
pub const FOCUS_EDGE_COLOR: Color32 = Color32::from_rgb(0xff, 0x00, 0x00);
pub const NODE_STROKE_COLOR: Color32 = Color32::from_rgb(0xff, 0xff, 0xff);
pub const EDGE_WIDTH: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizeScale {
    max_degree: usize,
}

impl SizeScale {
    pub fn new(max_degree: usize) -> Self {
        Self { max_degree }
    }

    pub fn radius(self, degree: usize) -> f32 {
        if self.max_degree == 0 {
            return MIN_RADIUS;
        }
        let t = (degree.min(self.max_degree) as f32 / self.max_degree as f32).sqrt();
        MIN_RADIUS + t * (MAX_RADIUS - MIN_RADIUS)
    }
}

pub fn fill_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::Character => CHARACTER_COLOR,
        NodeKind::Episode => EPISODE_COLOR,
        NodeKind::Location => LOCATION_COLOR,
        NodeKind::Other => OTHER_COLOR,
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeShape {
    Circle,
    Image(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct NodeStyle {
    pub radius: f32,
    pub fill: Color32,
    pub stroke: Color32,
    pub visible: bool,
    pub opacity: f32,
    pub shape: NodeShape,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
    pub visible: bool,
    pub stroke: Color32,
    pub width: f32,
}

pub fn project_node(
    graph: &NetworkGraph,
    index: usize,
    scale: SizeScale,
    filter: &FilterState,
    focus: FocusState,
    visible: bool,
) -> Option<NodeStyle> {
    let node = graph.node(index)?;
    let shape = match (&node.image, filter.photo_mode) {
        (Some(url), true) => NodeShape::Image(url.clone()),
        _ => NodeShape::Circle,
    };
    let stroke = if focus.target() == Some(index) {
        FOCUS_EDGE_COLOR
    } else {
        NODE_STROKE_COLOR
    };

    Some(NodeStyle {
        radius: scale.radius(graph.degree(index)),
        fill: fill_color(node.kind()),
        stroke,
        visible,
        opacity: node_opacity(graph, focus, index),
        shape,
    })
}

pub fn project_edge(
    graph: &NetworkGraph,
    edge_index: usize,
    focus: FocusState,
    visible: bool,
) -> Option<EdgeStyle> {
    let edge = graph.edges().get(edge_index)?;
    let highlighted = focus.target().is_some_and(|target| edge.touches(target));

    Some(EdgeStyle {
        visible,
        stroke: if highlighted {
            FOCUS_EDGE_COLOR
        } else {
            EDGE_COLOR
        },
        width: EDGE_WIDTH,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::load_network_str;

    fn graph() -> NetworkGraph {
        load_network_str(
            r#"{"nodes": [
                    {"id": "c", "type": "character", "name": "Summer", "image": "https://example.invalid/s.png"},
                    {"id": "e", "type": "episode", "name": "Pilot"},
                    {"id": "l", "type": "location", "name": "Gazorpazorp"},
                    {"id": "x", "type": "dimension", "name": "C-132"}
                ],
                "edges": [
                    {"source": "c", "target": "e"},
                    {"source": "c", "target": "l"},
                    {"source": "c", "target": "x"},
                    {"source": "e", "target": "l"}
                ]}"#,
        )
        .unwrap()
        .graph
    }

    #[test]
    fn radius_follows_square_root_of_degree() {
        let scale = SizeScale::new(4);
        assert_eq!(scale.radius(0), MIN_RADIUS);
        assert_eq!(scale.radius(4), MAX_RADIUS);
        assert!((scale.radius(1) - (MIN_RADIUS + 0.5 * (MAX_RADIUS - MIN_RADIUS))).abs() < 1e-4);
        assert_eq!(scale.radius(9), MAX_RADIUS);
    }

    #[test]
    fn edgeless_graph_uses_minimum_radius() {
        assert_eq!(SizeScale::new(0).radius(0), MIN_RADIUS);
    }

    #[test]
    fn colors_are_keyed_by_kind() {
        let graph = graph();
        let scale = SizeScale::new(graph.max_degree());
        let filter = FilterState::default();
        let fills = (0..4)
            .map(|index| {
                project_node(&graph, index, scale, &filter, FocusState::Normal, true)
                    .unwrap()
                    .fill
            })
            .collect::<Vec<_>>();

        assert_eq!(
            fills,
            vec![CHARACTER_COLOR, EPISODE_COLOR, LOCATION_COLOR, OTHER_COLOR]
        );
    }

    #[test]
    fn photo_mode_switches_shape_only_for_nodes_with_images() {
        let graph = graph();
        let scale = SizeScale::new(graph.max_degree());
        let photos = FilterState::default().with_photo_mode(true);

        let summer = project_node(&graph, 0, scale, &photos, FocusState::Normal, true).unwrap();
        let pilot = project_node(&graph, 1, scale, &photos, FocusState::Normal, true).unwrap();
        assert_eq!(
            summer.shape,
            NodeShape::Image("https://example.invalid/s.png".to_owned())
        );
        assert_eq!(pilot.shape, NodeShape::Circle);
        assert!(summer.visible && pilot.visible);
    }

    #[test]
    fn focus_marks_target_and_its_edges() {
        let graph = graph();
        let scale = SizeScale::new(graph.max_degree());
        let filter = FilterState::default();
        let focus = FocusState::Focused(1);

        let target = project_node(&graph, 1, scale, &filter, focus, true).unwrap();
        let outsider = project_node(&graph, 3, scale, &filter, focus, true).unwrap();
        assert_eq!(target.stroke, FOCUS_EDGE_COLOR);
        assert_eq!(target.opacity, 1.0);
        assert_eq!(outsider.opacity, 0.3);

        assert_eq!(project_edge(&graph, 0, focus, true).unwrap().stroke, FOCUS_EDGE_COLOR);
        assert_eq!(project_edge(&graph, 1, focus, false).unwrap().stroke, EDGE_COLOR);
        assert!(project_edge(&graph, 9, focus, true).is_none());
    }

    #[test]
    fn hidden_decision_is_passed_through() {
        let graph = graph();
        let style = project_node(
            &graph,
            2,
            SizeScale::new(graph.max_degree()),
            &FilterState::default(),
            FocusState::Normal,
            false,
        )
        .unwrap();
        assert!(!style.visible);
        assert_eq!(style.radius, SizeScale::new(3).radius(2));
    }
}
