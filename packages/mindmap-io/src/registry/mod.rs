//! Handler registry system for extensible document reading and writing.
//!
//! Features register element builders per tag, attribute handlers per
//! (tag, attribute) pair, completion listeners, and writers per node
//! extension type. Unknown tags and attributes are skipped so documents
//! written by newer versions still load.

mod config;
mod core;
mod engine;
mod handler;
mod types;

pub use config::create_registries;
pub use self::core::{ReadRegistry, WriteRegistry};
pub use engine::{DocumentReader, ParseOutcome};
pub use handler::{
    AttributeHandler, ElementBuilder, ExtensionAttributeWriter, ExtensionElementWriter,
    ReadCompletionListener,
};
pub use types::{ConnectorKey, ElementObject, ParseWarning, ReadContext};
