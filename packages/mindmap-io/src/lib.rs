//! Mind-map document reading and writing with node-to-node connectors.
//!
//! Maps are read through a registry of element builders and attribute
//! handlers, so features plug in their own tags and attributes. Connectors
//! refer to their target node by identifier; targets are resolved after the
//! whole document is read, following any identifiers that were replaced to
//! avoid collisions when a fragment is pasted into an existing map.
//!
//! # Example
//!
//! ```
//! use mindmap_io::{read_map, write_map, NodeLinks};
//!
//! let xml = r#"<map version="freeplane 1.2.0">
//!   <node ID="ID_1" TEXT="Root">
//!     <arrowlink DESTINATION="ID_2"/>
//!     <node ID="ID_2" TEXT="Child"/>
//!   </node>
//! </map>"#;
//!
//! let outcome = read_map(xml).unwrap();
//! let root = outcome.map.root().unwrap();
//! let links = outcome.map.node(root).extensions().get::<NodeLinks>().unwrap();
//! assert_eq!(links.connectors().count(), 1);
//!
//! let written = write_map(&outcome.map).unwrap();
//! assert!(written.contains(r#"DESTINATION="ID_2""#));
//! ```
//!
//! # Architecture
//!
//! - [`config`]: Format constants and the standard connector style
//! - [`types`]: Attribute value types (colors, points, shapes, arrows)
//! - [`error`]: Error types and Result alias
//! - [`model`]: Map tree, node identifiers, node extensions
//! - [`registry`]: Extensible element handler system and tree walker
//! - [`nodes`]: `map`/`node` element handling
//! - [`links`]: Connectors and hyperlinks
//! - [`writer`]: XML output
//! - [`document`]: Reader and writer wired together
//! - [`cli`]: Command-line interface

pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod links;
pub mod model;
pub mod nodes;
pub mod registry;
pub mod types;
pub mod writer;

pub use document::{read_map, write_map, MapIo};

pub use config::ConnectorStyle;
pub use error::{DocumentError, Result};
pub use links::{ConnectorModel, Hyperlink, Link, LinkPolicy, NodeLinks};
pub use model::{MapModel, NodeKey, NodeModel};
pub use registry::{ParseOutcome, ParseWarning};
pub use types::{ArrowType, Color, Point, Shape};
