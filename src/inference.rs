//! Schema inference engine
//!
//! Streams each input document through a depth-first walk and folds every
//! element observation into a growing [`SchemaGraph`]. Same-named siblings at
//! one node form a single observation group whose size seeds the occurrence
//! bounds; groups from different nodes and documents are then generalized
//! against each other by the type merger.
//!
//! Processing is strictly one document at a time: each inference step depends
//! on the cumulative graph built so far. A malformed document aborts the whole
//! run; inference never produces a partial result.

use std::fs;
use std::path::Path;

use crate::error::{Anomaly, Result, SchemaError};
use crate::merge::merge_element;
use crate::model::{AttributeSpec, ComplexSpec, ElementSpec, LeafType, SchemaGraph};
use crate::occurrence::Occurs;

/// Outcome of an inference run: the finished graph plus any non-fatal
/// anomalies observed while merging.
#[derive(Debug)]
pub struct InferenceReport {
    pub graph: SchemaGraph,
    pub anomalies: Vec<Anomaly>,
}

/// Folds example documents into a single generalized schema graph.
#[derive(Debug, Default)]
pub struct InferenceEngine {
    graph: SchemaGraph,
    anomalies: Vec<Anomaly>,
}

impl InferenceEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Infer a schema from an ordered sequence of document paths.
    pub fn infer<P: AsRef<Path>>(paths: &[P]) -> Result<InferenceReport> {
        let mut engine = InferenceEngine::new();
        for path in paths {
            engine.add_document(path.as_ref())?;
        }
        Ok(engine.into_report())
    }

    /// Fold one document into the graph.
    pub fn add_document(&mut self, path: &Path) -> Result<()> {
        let text = fs::read_to_string(path).map_err(|e| SchemaError::InputUnreadable {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        self.add_document_text(&text).map_err(|details| {
            SchemaError::InputUnreadable {
                path: path.to_path_buf(),
                details,
            }
        })
    }

    /// Fold one already-read document into the graph. Errors carry the parser
    /// diagnostic; the caller attaches the offending path.
    pub fn add_document_text(&mut self, text: &str) -> std::result::Result<(), String> {
        let doc = roxmltree::Document::parse(text).map_err(|e| e.to_string())?;
        let root = doc.root_element();

        let spec = self.build_spec(root, Occurs::ONCE);
        self.graph.add_root(&spec.name);
        let anomalies = &mut self.anomalies;
        self.graph.install(spec, anomalies);
        Ok(())
    }

    /// Consume the engine, yielding the finished graph and collected
    /// anomalies.
    pub fn into_report(self) -> InferenceReport {
        InferenceReport {
            graph: self.graph,
            anomalies: self.anomalies,
        }
    }

    /// Build the spec for one element node: attributes from the node itself,
    /// children from its same-named sibling groups, recursing before merging.
    /// Every child group's merged spec is also installed into the graph under
    /// its name, so the graph ends up holding one generalized content model
    /// per distinct element name.
    fn build_spec(&mut self, node: roxmltree::Node<'_, '_>, occurs: Occurs) -> ElementSpec {
        let name = node.tag_name().name().to_string();

        let attributes: Vec<AttributeSpec> = node
            .attributes()
            .map(|a| AttributeSpec::new(a.name(), true, LeafType::from_value(a.value())))
            .collect();

        // Same-named siblings grouped in first-seen order.
        let mut groups: Vec<(String, Vec<roxmltree::Node>)> = Vec::new();
        for child in node.children().filter(|c| c.is_element()) {
            let child_name = child.tag_name().name();
            match groups.iter_mut().find(|(n, _)| n == child_name) {
                Some((_, nodes)) => nodes.push(child),
                None => groups.push((child_name.to_string(), vec![child])),
            }
        }

        let mut children: Vec<ElementSpec> = Vec::with_capacity(groups.len());
        for (_, nodes) in groups {
            let group_occurs = Occurs::from_group_count(nodes.len() as u32);
            let mut merged: Option<ElementSpec> = None;
            for member in nodes {
                let spec = self.build_spec(member, group_occurs);
                merged = Some(merge_element(merged, spec, &mut self.anomalies));
            }
            let mut spec = merged.expect("sibling group is never empty");
            // The occurrence merge above compares group members against each
            // other; the group's bounds come from its size alone.
            spec.occurs = group_occurs;
            let anomalies = &mut self.anomalies;
            self.graph.install(spec.clone(), anomalies);
            children.push(spec);
        }

        let text: String = node
            .children()
            .filter_map(|c| if c.is_text() { c.text() } else { None })
            .collect();

        if children.is_empty() && attributes.is_empty() {
            ElementSpec::simple(name, occurs, LeafType::from_value(&text))
        } else {
            ElementSpec::complex(
                name,
                occurs,
                ComplexSpec {
                    children,
                    attributes,
                },
            )
        }
    }
}
