//! Template synthesis
//!
//! Walks a schema graph from its root elements and produces an annotated
//! instance document skeleton: every element and attribute appears once, each
//! preceded by a comment describing its cardinality or requiredness.
//!
//! Recursive type definitions would make a naive walk diverge. The synthesizer
//! carries the set of element names currently being expanded down the
//! recursion; a child already on that path (or marked as a back-reference by
//! the schema loader) is emitted as a truncated placeholder instead of being
//! expanded again.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::{Anomaly, Result};
use crate::model::{ElementKind, ElementSpec, SchemaGraph};
use crate::occurrence::{MaxOccurs, Occurs};

/// One attribute placeholder in the synthesized document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSlot {
    pub name: String,
    pub annotation: String,
}

/// One element of the synthesized instance document. Nodes exclusively own
/// their children; the tree is discarded after rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceNode {
    pub name: String,
    pub annotation: String,
    pub attributes: Vec<AttributeSlot>,
    pub children: Vec<InstanceNode>,
    /// Leaf nodes render with empty placeholder text content.
    pub leaf: bool,
}

/// Outcome of synthesis: one node tree per root element plus any
/// recursive-type notes collected while expanding.
#[derive(Debug)]
pub struct SynthesisReport {
    pub nodes: Vec<InstanceNode>,
    pub anomalies: Vec<Anomaly>,
}

/// Builds annotated instance templates from a schema graph.
pub struct TemplateSynthesizer;

impl TemplateSynthesizer {
    /// Synthesize one template tree per root element of the graph.
    pub fn synthesize(graph: &SchemaGraph) -> SynthesisReport {
        Self::synthesize_roots(graph, graph.roots())
    }

    /// Synthesize templates for the named root elements, in the given order.
    pub fn synthesize_roots(graph: &SchemaGraph, roots: &[String]) -> SynthesisReport {
        let mut anomalies = Vec::new();
        let nodes = roots
            .iter()
            .filter_map(|name| graph.get(name))
            .map(|spec| {
                let mut expanding = Vec::new();
                expand(spec, &mut expanding, &mut anomalies)
            })
            .collect();
        SynthesisReport { nodes, anomalies }
    }
}

fn expand(
    spec: &ElementSpec,
    expanding: &mut Vec<String>,
    anomalies: &mut Vec<Anomaly>,
) -> InstanceNode {
    expanding.push(spec.name.clone());

    let node = match &spec.kind {
        ElementKind::Simple(_) => InstanceNode {
            name: spec.name.clone(),
            annotation: occurs_annotation(&spec.occurs),
            attributes: Vec::new(),
            children: Vec::new(),
            leaf: true,
        },
        ElementKind::Complex(content) => {
            let attributes = content
                .attributes
                .iter()
                .map(|attr| AttributeSlot {
                    name: attr.name.clone(),
                    annotation: if attr.required {
                        "required".to_string()
                    } else {
                        "optional".to_string()
                    },
                })
                .collect();

            let mut children = Vec::with_capacity(content.children.len());
            for child in &content.children {
                if child.recursive || expanding.contains(&child.name) {
                    anomalies.push(Anomaly::RecursiveType {
                        element: child.name.clone(),
                    });
                    children.push(truncated(child));
                } else {
                    children.push(expand(child, expanding, anomalies));
                }
            }

            InstanceNode {
                name: spec.name.clone(),
                annotation: occurs_annotation(&spec.occurs),
                attributes,
                children,
                leaf: false,
            }
        }
    };

    expanding.pop();
    node
}

/// Placeholder for a child whose type is already being expanded on the
/// current path.
fn truncated(spec: &ElementSpec) -> InstanceNode {
    InstanceNode {
        name: spec.name.clone(),
        annotation: "recursive reference - truncated".to_string(),
        attributes: Vec::new(),
        children: Vec::new(),
        leaf: false,
    }
}

/// Human-readable cardinality summary, e.g. `required, exactly once` or
/// `optional, unbounded`.
fn occurs_annotation(occurs: &Occurs) -> String {
    let required = if occurs.is_required() {
        "required"
    } else {
        "optional"
    };
    let multiplicity = match occurs.max {
        MaxOccurs::Unbounded => "unbounded".to_string(),
        MaxOccurs::Bounded(n) if n > 1 => format!("appears at most {} times", n),
        MaxOccurs::Bounded(_) if occurs.min >= 1 => "exactly once".to_string(),
        MaxOccurs::Bounded(_) => "at most once".to_string(),
    };
    format!("{}, {}", required, multiplicity)
}

/// Serialize synthesized trees as one indented XML document, annotations
/// rendered as comments preceding each element. Attribute annotations also
/// precede the owning element's start tag, since comments cannot appear
/// inside a tag.
pub fn render(nodes: &[InstanceNode]) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    for node in nodes {
        write_node(&mut writer, node)?;
    }

    let mut text = String::from_utf8(writer.into_inner()).expect("rendered XML is valid UTF-8");
    text.push('\n');
    Ok(text)
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &InstanceNode) -> Result<()> {
    let comment = format!(" Element: <{}> ({}) ", node.name, node.annotation);
    writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?;

    for attr in &node.attributes {
        let comment = format!(" Attribute: {} ({}) ", attr.name, attr.annotation);
        writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?;
    }

    let mut start = BytesStart::new(node.name.as_str());
    for attr in &node.attributes {
        start.push_attribute((attr.name.as_str(), ""));
    }

    if node.leaf {
        // Empty placeholder text keeps the start and end tags on one line.
        writer.write_event(Event::Start(start))?;
        writer.write_event(Event::Text(BytesText::new("")))?;
        writer.write_event(Event::End(BytesEnd::new(node.name.as_str())))?;
    } else if node.children.is_empty() {
        writer.write_event(Event::Empty(start))?;
    } else {
        writer.write_event(Event::Start(start))?;
        for child in &node.children {
            write_node(writer, child)?;
        }
        writer.write_event(Event::End(BytesEnd::new(node.name.as_str())))?;
    }

    Ok(())
}
