//! Schema graph loader
//!
//! Parses an existing XSD document and translates it into the same
//! [`SchemaGraph`] representation the inference engine produces. Low-level XML
//! grammar concerns are delegated to roxmltree; the loader's own job is
//! resolving named-type and element references so the synthesizer sees a fully
//! inlined tree.
//!
//! Named types may refer to themselves, directly or through other types. The
//! loader keeps an explicit set of the identities currently being inlined and,
//! on re-entry, emits a marked back-reference instead of recursing, so a
//! cyclic schema still loads into a finite graph.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Anomaly, Result, SchemaError};
use crate::model::{AttributeSpec, ComplexSpec, ElementSpec, LeafType, SchemaGraph};
use crate::occurrence::{MaxOccurs, Occurs};

/// Outcome of loading a schema: the translated graph plus any non-fatal
/// anomalies.
#[derive(Debug)]
pub struct LoadReport {
    pub graph: SchemaGraph,
    pub anomalies: Vec<Anomaly>,
}

/// Translates XSD documents into schema graphs.
pub struct SchemaLoader;

impl SchemaLoader {
    /// Load and translate the schema at `path`.
    pub fn load(path: &Path) -> Result<LoadReport> {
        let text = fs::read_to_string(path).map_err(|e| SchemaError::InputUnreadable {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        Self::load_str(&text, path)
    }

    /// Translate schema text; `path` is used for diagnostics only.
    pub fn load_str(text: &str, path: &Path) -> Result<LoadReport> {
        let doc = roxmltree::Document::parse(text).map_err(|e| SchemaError::MalformedSchema {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;

        let root = doc.root_element();
        if root.tag_name().name() != "schema" {
            return Err(SchemaError::MalformedSchema {
                path: path.to_path_buf(),
                details: format!(
                    "expected document root <schema>, found <{}>",
                    root.tag_name().name()
                ),
            });
        }

        let mut translator = Translator::new(path, root);
        translator.run()?;

        if translator.graph.roots().is_empty() {
            return Err(SchemaError::EmptySchema {
                path: path.to_path_buf(),
            });
        }

        Ok(LoadReport {
            graph: translator.graph,
            anomalies: translator.anomalies,
        })
    }
}

/// Identity of a definition currently being inlined; used for cycle
/// detection across both named types and global element references.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Expanding {
    Type(String),
    Element(String),
}

struct Translator<'a, 'input> {
    path: PathBuf,
    /// Named top-level complex and simple type definitions.
    types: HashMap<String, roxmltree::Node<'a, 'input>>,
    /// Global element declarations, referenceable via `ref`.
    globals: Vec<(String, roxmltree::Node<'a, 'input>)>,
    graph: SchemaGraph,
    anomalies: Vec<Anomaly>,
}

impl<'a, 'input> Translator<'a, 'input> {
    fn new(path: &Path, schema: roxmltree::Node<'a, 'input>) -> Self {
        let mut types = HashMap::new();
        let mut globals = Vec::new();

        for child in schema.children().filter(|c| c.is_element()) {
            match child.tag_name().name() {
                "complexType" | "simpleType" => {
                    if let Some(name) = child.attribute("name") {
                        types.insert(name.to_string(), child);
                    }
                }
                "element" => {
                    if let Some(name) = child.attribute("name") {
                        globals.push((name.to_string(), child));
                    }
                }
                _ => {}
            }
        }

        Self {
            path: path.to_path_buf(),
            types,
            globals,
            graph: SchemaGraph::new(),
            anomalies: Vec::new(),
        }
    }

    fn run(&mut self) -> Result<()> {
        for (name, node) in self.globals.clone() {
            let mut expanding = vec![Expanding::Element(name.clone())];
            let spec = self.translate_element(node, Occurs::ONCE, &mut expanding)?;
            self.graph.add_root(&name);
            let anomalies = &mut self.anomalies;
            self.graph.install(spec, anomalies);
        }
        Ok(())
    }

    fn malformed(&self, details: String) -> SchemaError {
        SchemaError::MalformedSchema {
            path: self.path.clone(),
            details,
        }
    }

    /// Translate one `xs:element` declaration (global or local).
    fn translate_element(
        &mut self,
        node: roxmltree::Node<'a, 'input>,
        occurs: Occurs,
        expanding: &mut Vec<Expanding>,
    ) -> Result<ElementSpec> {
        if let Some(reference) = node.attribute("ref") {
            return self.translate_element_ref(reference, occurs, expanding);
        }

        let name = node.attribute("name").ok_or_else(|| {
            self.malformed("element declaration without 'name' or 'ref'".to_string())
        })?;

        // Type named via attribute.
        if let Some(type_name) = node.attribute("type") {
            return self.element_with_named_type(name, type_name, occurs, expanding);
        }

        // Inline anonymous type.
        if let Some(complex) = child_element(node, "complexType") {
            let content = self.translate_complex(complex, expanding)?;
            return Ok(ElementSpec::complex(name, occurs, content));
        }
        if let Some(simple) = child_element(node, "simpleType") {
            return Ok(ElementSpec::simple(name, occurs, simple_type_leaf(simple)));
        }

        // No type information at all: anyType, rendered as text.
        Ok(ElementSpec::simple(name, occurs, LeafType::Text))
    }

    fn translate_element_ref(
        &mut self,
        reference: &str,
        occurs: Occurs,
        expanding: &mut Vec<Expanding>,
    ) -> Result<ElementSpec> {
        let local = strip_prefix(reference);
        let identity = Expanding::Element(local.to_string());
        if expanding.contains(&identity) {
            return Ok(ElementSpec::recursive_ref(local, occurs));
        }

        let target = self
            .globals
            .iter()
            .find(|(n, _)| n == local)
            .map(|(_, node)| *node)
            .ok_or_else(|| {
                self.malformed(format!("reference to undeclared element '{}'", reference))
            })?;

        expanding.push(identity);
        let spec = self.translate_element(target, occurs, expanding)?;
        expanding.pop();
        Ok(spec)
    }

    fn element_with_named_type(
        &mut self,
        name: &str,
        type_name: &str,
        occurs: Occurs,
        expanding: &mut Vec<Expanding>,
    ) -> Result<ElementSpec> {
        if is_builtin_type(type_name) {
            return Ok(ElementSpec::simple(
                name,
                occurs,
                LeafType::from_xsd_name(type_name),
            ));
        }

        let local = strip_prefix(type_name);
        let identity = Expanding::Type(local.to_string());
        if expanding.contains(&identity) {
            return Ok(ElementSpec::recursive_ref(name, occurs));
        }

        let definition = self.types.get(local).copied().ok_or_else(|| {
            self.malformed(format!(
                "element '{}' references undefined type '{}'",
                name, type_name
            ))
        })?;

        match definition.tag_name().name() {
            "simpleType" => Ok(ElementSpec::simple(
                name,
                occurs,
                simple_type_leaf(definition),
            )),
            _ => {
                expanding.push(identity);
                let content = self.translate_complex(definition, expanding)?;
                expanding.pop();
                Ok(ElementSpec::complex(name, occurs, content))
            }
        }
    }

    /// Translate a `xs:complexType` definition into a content model. Only
    /// `xs:sequence` particles are in scope; other groupings contribute no
    /// children.
    fn translate_complex(
        &mut self,
        node: roxmltree::Node<'a, 'input>,
        expanding: &mut Vec<Expanding>,
    ) -> Result<ComplexSpec> {
        let mut content = ComplexSpec::default();

        if let Some(sequence) = child_element(node, "sequence") {
            for item in sequence.children().filter(|c| c.is_element()) {
                if item.tag_name().name() != "element" {
                    continue;
                }
                let occurs = particle_occurs(item).map_err(|details| self.malformed(details))?;
                let spec = self.translate_element(item, occurs, expanding)?;
                // A back-reference placeholder carries no content observation
                // and must not dilute the graph entry for its name.
                if !spec.recursive {
                    let anomalies = &mut self.anomalies;
                    self.graph.install(spec.clone(), anomalies);
                }
                content.children.push(spec);
            }
        }

        for attr in node.children().filter(|c| c.is_element()) {
            if attr.tag_name().name() != "attribute" {
                continue;
            }
            let name = attr
                .attribute("name")
                .ok_or_else(|| self.malformed("attribute declaration without 'name'".to_string()))?;
            let required = attr.attribute("use") == Some("required");
            let leaf = match attr.attribute("type") {
                Some(t) => LeafType::from_xsd_name(t),
                None => child_element(attr, "simpleType")
                    .map(simple_type_leaf)
                    .unwrap_or(LeafType::Text),
            };
            content
                .attributes
                .push(AttributeSpec::new(name, required, leaf));
        }

        Ok(content)
    }
}

/// First child element with the given local name.
fn child_element<'a, 'input>(
    node: roxmltree::Node<'a, 'input>,
    name: &str,
) -> Option<roxmltree::Node<'a, 'input>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

/// Drop any namespace prefix from a QName in attribute position.
fn strip_prefix(qname: &str) -> &str {
    qname.rsplit(':').next().unwrap_or(qname)
}

/// True for `xs:*`/`xsd:*` built-in simple type references.
fn is_builtin_type(qname: &str) -> bool {
    matches!(qname.split(':').next(), Some("xs") | Some("xsd")) && qname.contains(':')
}

/// Leaf type of a `xs:simpleType` definition via its restriction base.
fn simple_type_leaf(node: roxmltree::Node<'_, '_>) -> LeafType {
    child_element(node, "restriction")
        .and_then(|r| r.attribute("base"))
        .map(LeafType::from_xsd_name)
        .unwrap_or(LeafType::Text)
}

/// Occurrence bounds of a particle from its minOccurs/maxOccurs attributes.
fn particle_occurs(node: roxmltree::Node<'_, '_>) -> std::result::Result<Occurs, String> {
    let min = match node.attribute("minOccurs") {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| format!("invalid minOccurs value '{}'", raw))?,
        None => 1,
    };
    let max = match node.attribute("maxOccurs") {
        Some("unbounded") => MaxOccurs::Unbounded,
        Some(raw) => MaxOccurs::Bounded(
            raw.parse::<u32>()
                .map_err(|_| format!("invalid maxOccurs value '{}'", raw))?,
        ),
        None => MaxOccurs::Bounded(1),
    };
    Ok(Occurs::new(min, max))
}
