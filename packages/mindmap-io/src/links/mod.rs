//! Connectors and hyperlinks.
//!
//! Connector elements are read in two steps: each `arrowlink` is built and
//! filled in as the document is walked, then attached to its source node in
//! a completion pass once the whole document (and every identifier in it)
//! is known.

mod attributes;
mod builder;
mod model;
mod policy;

pub use attributes::{ConnectorAttribute, HyperlinkAttribute};
pub use builder::LinkBuilder;
pub use model::{ConnectorModel, Hyperlink, Link, NodeLinks, PlainLink};
pub use policy::LinkPolicy;
