use serde::Deserialize;
use serde_json::Value;

use super::error::ValidationError;

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    pub fn into_string(self) -> String {
        match self {
            Self::Text(text) => text,
            Self::Number(number) => number.to_string(),
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawNode {
    pub id: RawId,
    #[serde(default, rename = "type", alias = "group")]
    pub kind: Option<String>,
    #[serde(default, alias = "label")]
    pub name: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub dimension: Option<String>,
    #[serde(default)]
    pub location_type: Option<String>,
    #[serde(default)]
    pub air_date: Option<String>,
    #[serde(default, rename = "episode")]
    pub episode_code: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RawEdge {
    #[serde(default, alias = "from")]
    pub source: Option<RawId>,
    #[serde(default, alias = "to")]
    pub target: Option<RawId>,
    #[serde(default, rename = "type", alias = "label")]
    pub relation: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct RawNetwork {
    pub nodes: Vec<RawNode>,
    pub edges: Vec<RawEdge>,
    pub malformed_edges: usize,
}

fn array_field<'a>(
    object: &'a serde_json::Map<String, Value>,
    field: &'static str,
) -> Result<&'a Vec<Value>, ValidationError> {
    object
        .get(field)
        .and_then(Value::as_array)
        .ok_or(ValidationError::MissingArray { field })
}

pub fn parse_network(raw: &str) -> Result<RawNetwork, ValidationError> {
    let parsed: Value = serde_json::from_str(raw).map_err(ValidationError::InvalidJson)?;
    let object = parsed.as_object().ok_or(ValidationError::NotAnObject)?;

    let node_values = array_field(object, "nodes")?;
    let edge_values = array_field(object, "edges")?;

    let mut nodes = Vec::with_capacity(node_values.len());
    for (index, value) in node_values.iter().enumerate() {
        let node = RawNode::deserialize(value)
            .map_err(|source| ValidationError::InvalidNode { index, source })?;
        nodes.push(node);
    }

    let mut edges = Vec::with_capacity(edge_values.len());
    let mut malformed_edges = 0;
    for (index, value) in edge_values.iter().enumerate() {
        match RawEdge::deserialize(value) {
            Ok(edge) => edges.push(edge),
            Err(error) => {
                log::debug!("skipping edge #{index}: {error}");
                malformed_edges += 1;
            }
        }
    }

    Ok(RawNetwork {
        nodes,
        edges,
        malformed_edges,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generated_network_shape() {
        let raw = r#"{
            "nodes": [
                {"id": "char-1", "type": "character", "name": "Rick Sanchez",
                 "species": "Human", "status": "Alive", "gender": "Male",
                 "origin": "Earth (C-137)", "location": "Citadel of Ricks",
                 "image": "https://example.invalid/1.jpeg"},
                {"id": "ep-1", "type": "episode", "name": "Pilot",
                 "air_date": "December 2, 2013", "episode": "S01E01"}
            ],
            "edges": [{"source": "char-1", "target": "ep-1", "type": "appeared_in"}]
        }"#;

        let network = parse_network(raw).unwrap();
        assert_eq!(network.nodes.len(), 2);
        assert_eq!(network.nodes[0].kind.as_deref(), Some("character"));
        assert_eq!(network.nodes[0].location.as_deref(), Some("Citadel of Ricks"));
        assert_eq!(network.nodes[1].episode_code.as_deref(), Some("S01E01"));
        assert_eq!(network.edges[0].relation.as_deref(), Some("appeared_in"));
    }

    #[test]
    fn accepts_label_group_and_numeric_ids() {
        let raw = r#"{
            "nodes": [{"id": 7, "label": "Anatomy Park", "group": "location"}],
            "edges": [{"from": 7, "to": "7"}]
        }"#;

        let network = parse_network(raw).unwrap();
        let node = &network.nodes[0];
        assert_eq!(node.id.clone().into_string(), "7");
        assert_eq!(node.name.as_deref(), Some("Anatomy Park"));
        assert_eq!(node.kind.as_deref(), Some("location"));
        assert_eq!(
            network.edges[0].source.clone().map(RawId::into_string).as_deref(),
            Some("7")
        );
    }

    #[test]
    fn rejects_payloads_without_arrays() {
        assert!(matches!(
            parse_network("[1, 2, 3]"),
            Err(ValidationError::NotAnObject)
        ));
        assert!(matches!(
            parse_network(r#"{"nodes": []}"#),
            Err(ValidationError::MissingArray { field: "edges" })
        ));
        assert!(matches!(
            parse_network(r#"{"nodes": {}, "edges": []}"#),
            Err(ValidationError::MissingArray { field: "nodes" })
        ));
        assert!(matches!(
            parse_network("{not json"),
            Err(ValidationError::InvalidJson(_))
        ));
    }

    #[test]
    fn malformed_edges_do_not_fail_the_payload() {
        let raw = r#"{"nodes": [], "edges": [
            {"source": "a", "target": "b"},
            {"source": "a"},
            {"source": "a", "target": null},
            {"source": true, "target": "b"},
            "a->b"
        ]}"#;

        let network = parse_network(raw).unwrap();
        assert_eq!(network.edges.len(), 3);
        assert!(network.edges[1].target.is_none());
        assert!(network.edges[2].target.is_none());
        assert_eq!(network.malformed_edges, 2);
    }
}
