mod collect;
mod error;
mod graph;
mod parse;
mod source;

pub use collect::{LoadedNetwork, load_network};
pub use error::ValidationError;
pub use graph::{LoadReport, NetworkGraph, Node, NodeDetails, NodeKind};
pub use source::DataSource;

#[cfg(test)]
pub(crate) use collect::load_network_str;
