use anyhow::{Context, Result};

use super::graph::{LoadReport, NetworkGraph};
use super::parse::parse_network;
use super::source::DataSource;

pub struct LoadedNetwork {
    pub graph: NetworkGraph,
    pub report: LoadReport,
}

pub fn load_network_str(raw: &str) -> Result<LoadedNetwork> {
    let parsed = parse_network(raw).context("failed to parse network payload")?;
    let (graph, report) =
        NetworkGraph::from_raw(parsed).context("failed to validate network payload")?;

    log::info!(
        "loaded {} nodes and {} edges (max degree {})",
        graph.node_count(),
        graph.edge_count(),
        graph.max_degree()
    );
    if report.dropped_edges > 0 {
        log::warn!(
            "dropped {} edges with missing or unknown endpoints",
            report.dropped_edges
        );
    }
    if report.unknown_types > 0 {
        log::warn!(
            "{} nodes have an unknown type and use the default style",
            report.unknown_types
        );
    }
    if report.self_loops > 0 {
        log::debug!("{} self-loop edges kept", report.self_loops);
    }

    Ok(LoadedNetwork { graph, report })
}

pub fn load_network(source: &DataSource) -> Result<LoadedNetwork> {
    let raw = source.read_to_string()?;
    load_network_str(&raw).with_context(|| format!("failed to load network from {source}"))
}
