//! # xsdgen Library
//!
//! Generalizes example XML documents into an XSD schema, and expands an XSD
//! schema into a minimal, comment-annotated XML instance template.
//!
//! Both directions share one internal representation, the [`SchemaGraph`]: a
//! merged content model per distinct element name with occurrence bounds and
//! attribute requiredness.

pub mod cli;
pub mod error;
pub mod file_discovery;
pub mod inference;
pub mod merge;
pub mod model;
pub mod occurrence;
pub mod output;
pub mod schema_loader;
pub mod schema_writer;
pub mod synthesizer;

pub use cli::{Cli, Command, Config, VerbosityLevel};
pub use error::{Anomaly, Result, SchemaError};
pub use file_discovery::{Discovery, FileDiscovery};
pub use inference::{InferenceEngine, InferenceReport};
pub use merge::{merge_complex, merge_element};
pub use model::{AttributeSpec, ComplexSpec, ElementKind, ElementSpec, LeafType, SchemaGraph};
pub use occurrence::{MaxOccurs, Occurs};
pub use output::Output;
pub use schema_loader::{LoadReport, SchemaLoader};
pub use schema_writer::write_schema;
pub use synthesizer::{
    AttributeSlot, InstanceNode, SynthesisReport, TemplateSynthesizer, render,
};
