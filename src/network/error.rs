#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("network payload is not valid JSON")]
    InvalidJson(#[source] serde_json::Error),

    #[error("network payload must be a JSON object with `nodes` and `edges` arrays")]
    NotAnObject,

    #[error("network payload is missing the `{field}` array")]
    MissingArray { field: &'static str },

    #[error("node #{index} is malformed")]
    InvalidNode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("node id `{0}` appears more than once")]
    DuplicateNodeId(String),
}
