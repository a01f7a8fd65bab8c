use crate::network::{NetworkGraph, Node, NodeKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeToggles {
    pub character: bool,
    pub episode: bool,
    pub location: bool,
}

impl Default for TypeToggles {
    fn default() -> Self {
        Self {
            character: true,
            episode: true,
            location: true,
        }
    }
}

impl TypeToggles {
    // Unknown kinds have no toggle.
    pub fn allows(self, kind: NodeKind) -> bool {
        match kind {
            NodeKind::Character => self.character,
            NodeKind::Episode => self.episode,
            NodeKind::Location => self.location,
            NodeKind::Other => true,
        }
    }

    pub fn with(mut self, kind: NodeKind, enabled: bool) -> Self {
        match kind {
            NodeKind::Character => self.character = enabled,
            NodeKind::Episode => self.episode = enabled,
            NodeKind::Location => self.location = enabled,
            NodeKind::Other => {}
        }
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterState {
    pub toggles: TypeToggles,
    pub type_filter: Option<NodeKind>,
    pub search_text: String,
    pub photo_mode: bool,
}

impl FilterState {
    pub fn with_type_toggle(&self, kind: NodeKind, enabled: bool) -> Self {
        Self {
            toggles: self.toggles.with(kind, enabled),
            ..self.clone()
        }
    }

    pub fn with_type_filter(&self, type_filter: Option<NodeKind>) -> Self {
        Self {
            type_filter,
            ..self.clone()
        }
    }

    pub fn with_search_text(&self, search_text: impl Into<String>) -> Self {
        Self {
            search_text: search_text.into(),
            ..self.clone()
        }
    }

    pub fn with_photo_mode(&self, photo_mode: bool) -> Self {
        Self {
            photo_mode,
            ..self.clone()
        }
    }

    pub fn reset(&self) -> Self {
        Self {
            photo_mode: self.photo_mode,
            ..Self::default()
        }
    }
}

pub fn compute_visibility(node: &Node, filter: &FilterState) -> bool {
    let kind = node.kind();
    filter.toggles.allows(kind)
        && filter.type_filter.is_none_or(|selected| selected == kind)
        && (filter.search_text.is_empty()
            || node
                .name
                .to_lowercase()
                .contains(&filter.search_text.to_lowercase()))
}

pub fn node_visibility(graph: &NetworkGraph, filter: &FilterState) -> Vec<bool> {
    graph
        .nodes()
        .iter()
        .map(|node| compute_visibility(node, filter))
        .collect()
}

pub fn edge_visibility(graph: &NetworkGraph, node_visible: &[bool]) -> Vec<bool> {
    graph
        .edges()
        .iter()
        .map(|edge| node_visible[edge.source] && node_visible[edge.target])
        .collect()
}
