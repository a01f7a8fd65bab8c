use std::collections::{HashMap, HashSet};

use super::error::ValidationError;
use super::parse::{RawId, RawNetwork, RawNode};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Character,
    Episode,
    Location,
    Other,
}

impl NodeKind {
    pub const TOGGLEABLE: [Self; 3] = [Self::Character, Self::Episode, Self::Location];

    pub fn from_type_name(name: &str) -> Self {
        match name {
            "character" => Self::Character,
            "episode" => Self::Episode,
            "location" => Self::Location,
            _ => Self::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Character => "character",
            Self::Episode => "episode",
            Self::Location => "location",
            Self::Other => "other",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeDetails {
    Character {
        species: Option<String>,
        status: Option<String>,
        gender: Option<String>,
        origin: Option<String>,
        location: Option<String>,
    },
    Episode {
        air_date: Option<String>,
        code: Option<String>,
    },
    Location {
        dimension: Option<String>,
        location_type: Option<String>,
    },
    Other {
        type_name: Option<String>,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
    pub details: NodeDetails,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self.details {
            NodeDetails::Character { .. } => NodeKind::Character,
            NodeDetails::Episode { .. } => NodeKind::Episode,
            NodeDetails::Location { .. } => NodeKind::Location,
            NodeDetails::Other { .. } => NodeKind::Other,
        }
    }

    fn from_raw(raw: RawNode) -> Self {
        let id = raw.id.into_string();
        let name = raw.name.unwrap_or_else(|| id.clone());
        let type_name = raw.kind;
        let details = match type_name.as_deref().map(NodeKind::from_type_name) {
            Some(NodeKind::Character) => NodeDetails::Character {
                species: raw.species,
                status: raw.status,
                gender: raw.gender,
                origin: raw.origin,
                location: raw.location,
            },
            Some(NodeKind::Episode) => NodeDetails::Episode {
                air_date: raw.air_date,
                code: raw.episode_code,
            },
            Some(NodeKind::Location) => NodeDetails::Location {
                dimension: raw.dimension,
                location_type: raw.location_type,
            },
            Some(NodeKind::Other) | None => NodeDetails::Other { type_name },
        };

        Self {
            id,
            name,
            image: raw.image.filter(|url| !url.is_empty()),
            details,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub relation: Option<String>,
}

impl Edge {
    pub fn touches(&self, index: usize) -> bool {
        self.source == index || self.target == index
    }

    pub fn other(&self, index: usize) -> usize {
        if self.source == index {
            self.target
        } else {
            self.source
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub dropped_edges: usize,
    pub unknown_types: usize,
    pub self_loops: usize,
}

#[derive(Clone, Debug)]
pub struct NetworkGraph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    index_by_id: HashMap<String, usize>,
    degrees: Vec<usize>,
    adjacency: Vec<HashSet<usize>>,
    incident_edges: Vec<Vec<usize>>,
    max_degree: usize,
}

impl NetworkGraph {
    pub fn from_raw(raw: RawNetwork) -> Result<(Self, LoadReport), ValidationError> {
        let mut report = LoadReport::default();

        let mut nodes = Vec::with_capacity(raw.nodes.len());
        let mut index_by_id = HashMap::with_capacity(raw.nodes.len());
        for raw_node in raw.nodes {
            let node = Node::from_raw(raw_node);
            if node.kind() == NodeKind::Other {
                report.unknown_types += 1;
            }
            if index_by_id.insert(node.id.clone(), nodes.len()).is_some() {
                return Err(ValidationError::DuplicateNodeId(node.id));
            }
            nodes.push(node);
        }

        report.dropped_edges += raw.malformed_edges;
        let resolve =
            |id: Option<RawId>| id.and_then(|id| index_by_id.get(&id.into_string()).copied());
        let mut edges = Vec::with_capacity(raw.edges.len());
        for raw_edge in raw.edges {
            let source = resolve(raw_edge.source);
            let target = resolve(raw_edge.target);
            let (Some(source), Some(target)) = (source, target) else {
                report.dropped_edges += 1;
                continue;
            };

            if source == target {
                report.self_loops += 1;
            }
            edges.push(Edge {
                source,
                target,
                relation: raw_edge.relation,
            });
        }

        let mut degrees = vec![0usize; nodes.len()];
        let mut adjacency = vec![HashSet::new(); nodes.len()];
        let mut incident_edges = vec![Vec::new(); nodes.len()];
        for (edge_index, edge) in edges.iter().enumerate() {
            degrees[edge.source] += 1;
            incident_edges[edge.source].push(edge_index);
            adjacency[edge.source].insert(edge.target);
            if edge.target != edge.source {
                degrees[edge.target] += 1;
                incident_edges[edge.target].push(edge_index);
                adjacency[edge.target].insert(edge.source);
            }
        }
        let max_degree = degrees.iter().copied().max().unwrap_or(0);

        Ok((
            Self {
                nodes,
                edges,
                index_by_id,
                degrees,
                adjacency,
                incident_edges,
                max_degree,
            },
            report,
        ))
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_by_id.get(id).copied()
    }

    pub fn degree(&self, index: usize) -> usize {
        self.degrees.get(index).copied().unwrap_or(0)
    }

    pub fn max_degree(&self) -> usize {
        self.max_degree
    }

    pub fn neighbors(&self, index: usize) -> Option<&HashSet<usize>> {
        self.adjacency.get(index)
    }

    pub fn is_connected(&self, a: usize, b: usize) -> bool {
        self.adjacency
            .get(a)
            .is_some_and(|neighbors| neighbors.contains(&b))
    }

    pub fn incident_edges(&self, index: usize) -> &[usize] {
        self.incident_edges
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn neighbors_by_id(&self, id: &str) -> HashSet<&str> {
        let Some(neighbors) = self.index_of(id).and_then(|index| self.neighbors(index)) else {
            return HashSet::new();
        };
        neighbors
            .iter()
            .map(|&index| self.nodes[index].id.as_str())
            .collect()
    }

    pub fn is_connected_by_id(&self, a: &str, b: &str) -> bool {
        match (self.index_of(a), self.index_of(b)) {
            (Some(a), Some(b)) => self.is_connected(a, b),
            _ => false,
        }
    }
}
