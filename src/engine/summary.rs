use crate::network::{NetworkGraph, NodeDetails, NodeKind};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeSummary {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub image: Option<String>,
    pub fields: Vec<(&'static str, String)>,
    pub connections: usize,
}

impl NodeSummary {
    pub fn from_graph(graph: &NetworkGraph, index: usize) -> Option<Self> {
        let node = graph.node(index)?;
        let fields = match &node.details {
            NodeDetails::Character {
                species,
                status,
                gender,
                origin,
                location,
            } => present(&[
                ("Species", species),
                ("Status", status),
                ("Gender", gender),
                ("Origin", origin),
                ("Location", location),
            ]),
            NodeDetails::Episode { air_date, code } => {
                present(&[("Episode", code), ("Air date", air_date)])
            }
            NodeDetails::Location {
                dimension,
                location_type,
            } => present(&[("Dimension", dimension), ("Type", location_type)]),
            NodeDetails::Other { type_name } => present(&[("Type", type_name)]),
        };

        Some(Self {
            id: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind(),
            image: node.image.clone(),
            fields,
            connections: graph.degree(index),
        })
    }
}

fn present(fields: &[(&'static str, &Option<String>)]) -> Vec<(&'static str, String)> {
    fields
        .iter()
        .filter_map(|(label, value)| {
            value
                .as_deref()
                .filter(|value| !value.trim().is_empty())
                .map(|value| (*label, value.to_owned()))
        })
        .collect()
}
