//! Parse/serialize primitives over OOXML, plus namespace-qualified element
//! lookups that tolerate both namespace-aware and literal `w:`-prefixed
//! queries. This crate owns the arena; every other crate in the workspace
//! holds `NodeId`s into a document it borrows, never a node it owns outright.

pub mod document;
pub mod error;
pub mod namespaces;
pub mod xname;

pub use document::{XmlDocument, XmlNodeData};
pub use error::XmlError;
pub use indextree::NodeId;
pub use xname::XName;
