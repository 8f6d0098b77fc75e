//! Shared schema data model
//!
//! Both the inference engine and the schema loader produce the same
//! representation: a [`SchemaGraph`] mapping element names to merged
//! [`ElementSpec`]s. The graph is mutated only while it is being built;
//! afterwards the writer and synthesizer read it without modifying it.

use crate::occurrence::Occurs;

/// Simple-type hint for leaf content, ordered as a small widening lattice:
/// `Integer` widens to `Decimal` widens to `Text`; `Boolean` widens to `Text`
/// against anything but itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafType {
    Boolean,
    Integer,
    Decimal,
    Text,
}

impl LeafType {
    /// Infer a leaf type from observed text content.
    pub fn from_value(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return LeafType::Text;
        }
        if trimmed == "true" || trimmed == "false" {
            return LeafType::Boolean;
        }
        if trimmed.parse::<i64>().is_ok() {
            return LeafType::Integer;
        }
        if trimmed.parse::<f64>().is_ok() {
            return LeafType::Decimal;
        }
        LeafType::Text
    }

    /// The most general of two hints.
    pub fn widen(self, other: Self) -> Self {
        use LeafType::*;
        match (self, other) {
            (a, b) if a == b => a,
            (Integer, Decimal) | (Decimal, Integer) => Decimal,
            _ => Text,
        }
    }

    /// Built-in XSD type name for this hint.
    pub fn xsd_name(&self) -> &'static str {
        match self {
            LeafType::Boolean => "xs:boolean",
            LeafType::Integer => "xs:integer",
            LeafType::Decimal => "xs:decimal",
            LeafType::Text => "xs:string",
        }
    }

    /// Map a built-in XSD type name onto the lattice. Unknown or non-builtin
    /// names fall back to `Text`.
    pub fn from_xsd_name(name: &str) -> Self {
        let local = name.rsplit(':').next().unwrap_or(name);
        match local {
            "boolean" => LeafType::Boolean,
            "byte" | "short" | "int" | "integer" | "long" | "negativeInteger"
            | "nonNegativeInteger" | "nonPositiveInteger" | "positiveInteger" | "unsignedByte"
            | "unsignedShort" | "unsignedInt" | "unsignedLong" => LeafType::Integer,
            "decimal" | "float" | "double" => LeafType::Decimal,
            _ => LeafType::Text,
        }
    }
}

/// One attribute of a complex element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSpec {
    pub name: String,
    /// Logical AND of presence across all observations: one absence makes the
    /// attribute optional forever.
    pub required: bool,
    pub leaf: LeafType,
}

impl AttributeSpec {
    pub fn new(name: impl Into<String>, required: bool, leaf: LeafType) -> Self {
        Self {
            name: name.into(),
            required,
            leaf,
        }
    }
}

/// Content model of a structured element: an ordered sequence of child
/// elements plus a set of attributes, both unique by name and kept in
/// first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComplexSpec {
    pub children: Vec<ElementSpec>,
    pub attributes: Vec<AttributeSpec>,
}

impl ComplexSpec {
    pub fn child(&self, name: &str) -> Option<&ElementSpec> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut ElementSpec> {
        self.children.iter_mut().find(|c| c.name == name)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeSpec> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.attributes.is_empty()
    }
}

/// Element content discriminator.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// Text-only content with a leaf type hint.
    Simple(LeafType),
    /// Structured content: child elements and/or attributes.
    Complex(ComplexSpec),
}

impl ElementKind {
    pub fn is_complex(&self) -> bool {
        matches!(self, ElementKind::Complex(_))
    }
}

/// One element definition, inferred from documents or loaded from a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSpec {
    pub name: String,
    pub occurs: Occurs,
    pub kind: ElementKind,
    /// Marks a truncated back-reference: the element's type was already being
    /// inlined further up the tree, so its content is not expanded here.
    pub recursive: bool,
}

impl ElementSpec {
    pub fn simple(name: impl Into<String>, occurs: Occurs, leaf: LeafType) -> Self {
        Self {
            name: name.into(),
            occurs,
            kind: ElementKind::Simple(leaf),
            recursive: false,
        }
    }

    pub fn complex(name: impl Into<String>, occurs: Occurs, content: ComplexSpec) -> Self {
        Self {
            name: name.into(),
            occurs,
            kind: ElementKind::Complex(content),
            recursive: false,
        }
    }

    /// A placeholder for an element whose type is already being expanded on
    /// the current path.
    pub fn recursive_ref(name: impl Into<String>, occurs: Occurs) -> Self {
        Self {
            name: name.into(),
            occurs,
            kind: ElementKind::Complex(ComplexSpec::default()),
            recursive: true,
        }
    }
}

/// The finished schema: one merged content model per distinct element name,
/// plus the list of root element names in first-seen order.
///
/// Built incrementally by the inference engine or the schema loader; nothing
/// is ever deleted, and merging only generalizes specs.
#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    elements: Vec<ElementSpec>,
    roots: Vec<String>,
}

impl SchemaGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&ElementSpec> {
        self.elements.iter().find(|e| e.name == name)
    }

    /// All element specs in first-seen order.
    pub fn elements(&self) -> &[ElementSpec] {
        &self.elements
    }

    /// Root element names in first-seen order.
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    /// Root element specs in root order.
    pub fn root_elements(&self) -> impl Iterator<Item = &ElementSpec> {
        self.roots.iter().filter_map(|name| self.get(name))
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Record `name` as a root element; duplicates are ignored.
    pub fn add_root(&mut self, name: &str) {
        if !self.roots.iter().any(|r| r == name) {
            self.roots.push(name.to_string());
        }
    }

    /// Install `spec` under its name, generalizing any existing entry via the
    /// type merger. Entries keep their first-seen position. Anomalies found
    /// while merging are appended to `anomalies`.
    pub fn install(&mut self, spec: ElementSpec, anomalies: &mut Vec<crate::error::Anomaly>) {
        match self.elements.iter().position(|e| e.name == spec.name) {
            Some(idx) => {
                let existing = self.elements.remove(idx);
                let merged = crate::merge::merge_element(Some(existing), spec, anomalies);
                self.elements.insert(idx, merged);
            }
            None => {
                let merged = crate::merge::merge_element(None, spec, anomalies);
                self.elements.push(merged);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::occurrence::MaxOccurs;

    #[test]
    fn test_leaf_type_from_value() {
        assert_eq!(LeafType::from_value("42"), LeafType::Integer);
        assert_eq!(LeafType::from_value("-17"), LeafType::Integer);
        assert_eq!(LeafType::from_value("3.25"), LeafType::Decimal);
        assert_eq!(LeafType::from_value("true"), LeafType::Boolean);
        assert_eq!(LeafType::from_value("hello"), LeafType::Text);
        assert_eq!(LeafType::from_value(""), LeafType::Text);
        assert_eq!(LeafType::from_value("  7  "), LeafType::Integer);
    }

    #[test]
    fn test_leaf_type_widening_lattice() {
        assert_eq!(LeafType::Integer.widen(LeafType::Decimal), LeafType::Decimal);
        assert_eq!(LeafType::Decimal.widen(LeafType::Integer), LeafType::Decimal);
        assert_eq!(LeafType::Integer.widen(LeafType::Text), LeafType::Text);
        assert_eq!(LeafType::Boolean.widen(LeafType::Integer), LeafType::Text);
        assert_eq!(LeafType::Boolean.widen(LeafType::Boolean), LeafType::Boolean);
    }

    #[test]
    fn test_leaf_type_xsd_round_trip() {
        assert_eq!(LeafType::from_xsd_name("xs:integer"), LeafType::Integer);
        assert_eq!(LeafType::from_xsd_name("xsd:unsignedInt"), LeafType::Integer);
        assert_eq!(LeafType::from_xsd_name("xs:double"), LeafType::Decimal);
        assert_eq!(LeafType::from_xsd_name("xs:boolean"), LeafType::Boolean);
        assert_eq!(LeafType::from_xsd_name("xs:date"), LeafType::Text);
        assert_eq!(LeafType::Integer.xsd_name(), "xs:integer");
    }

    #[test]
    fn test_graph_install_and_roots() {
        let mut graph = SchemaGraph::new();
        let mut anomalies = Vec::new();

        graph.install(
            ElementSpec::simple("item", Occurs::ONCE, LeafType::Text),
            &mut anomalies,
        );
        graph.add_root("item");
        graph.add_root("item");

        assert_eq!(graph.len(), 1);
        assert_eq!(graph.roots(), ["item".to_string()]);
        assert!(graph.get("item").is_some());
        assert!(graph.get("missing").is_none());
        assert!(anomalies.is_empty());
    }

    #[test]
    fn test_graph_install_merges_by_name() {
        let mut graph = SchemaGraph::new();
        let mut anomalies = Vec::new();

        graph.install(
            ElementSpec::simple("qty", Occurs::ONCE, LeafType::Integer),
            &mut anomalies,
        );
        graph.install(
            ElementSpec::simple("qty", Occurs::new(0, MaxOccurs::Unbounded), LeafType::Decimal),
            &mut anomalies,
        );

        assert_eq!(graph.len(), 1);
        let spec = graph.get("qty").unwrap();
        assert_eq!(spec.occurs, Occurs::new(0, MaxOccurs::Unbounded));
        assert_eq!(spec.kind, ElementKind::Simple(LeafType::Decimal));
    }
}
