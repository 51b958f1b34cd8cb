use thiserror::Error;

/// Failures the XML facade can report. Every variant here is recoverable by
/// a caller one layer up (the engine never lets one propagate out of its own
/// public entry — see `reconcile-engine::error`).
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("input is not well-formed XML: {0}")]
    NotWellFormed(String),
    #[error("document has no root element")]
    NoRoot,
    #[error("node {0:?} is not an element")]
    NotAnElement(indextree::NodeId),
}
