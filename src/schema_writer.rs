//! Schema serialization
//!
//! Renders a finished [`SchemaGraph`] as one XSD document: a global
//! `xs:element` per root with nested anonymous complex types, occurrence
//! bounds as `minOccurs`/`maxOccurs`, and attribute requiredness as
//! `use="required"`.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};

use crate::error::Result;
use crate::model::{AttributeSpec, ComplexSpec, ElementKind, ElementSpec, SchemaGraph};
use crate::occurrence::MaxOccurs;

const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema";

/// Serialize the graph as one indented XSD document.
pub fn write_schema(graph: &SchemaGraph) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut schema = BytesStart::new("xs:schema");
    schema.push_attribute(("xmlns:xs", XSD_NAMESPACE));
    writer.write_event(Event::Start(schema))?;

    for root in graph.root_elements() {
        write_element(&mut writer, root, true)?;
    }

    writer.write_event(Event::End(BytesEnd::new("xs:schema")))?;

    let mut text = String::from_utf8(writer.into_inner()).expect("rendered XSD is valid UTF-8");
    text.push('\n');
    Ok(text)
}

fn write_element(
    writer: &mut Writer<Vec<u8>>,
    spec: &ElementSpec,
    is_root: bool,
) -> Result<()> {
    let mut start = BytesStart::new("xs:element");
    start.push_attribute(("name", spec.name.as_str()));

    // Global element declarations take no occurrence bounds.
    if !is_root {
        if spec.occurs.min != 1 {
            start.push_attribute(("minOccurs", spec.occurs.min.to_string().as_str()));
        }
        match spec.occurs.max {
            MaxOccurs::Bounded(1) => {}
            MaxOccurs::Bounded(n) => {
                start.push_attribute(("maxOccurs", n.to_string().as_str()));
            }
            MaxOccurs::Unbounded => {
                start.push_attribute(("maxOccurs", "unbounded"));
            }
        }
    }

    // A truncated back-reference is written without a content model rather
    // than expanded forever.
    if spec.recursive {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    match &spec.kind {
        ElementKind::Simple(leaf) => {
            start.push_attribute(("type", leaf.xsd_name()));
            writer.write_event(Event::Empty(start))?;
        }
        ElementKind::Complex(content) => {
            writer.write_event(Event::Start(start))?;
            write_complex(writer, content)?;
            writer.write_event(Event::End(BytesEnd::new("xs:element")))?;
        }
    }
    Ok(())
}

fn write_complex(writer: &mut Writer<Vec<u8>>, content: &ComplexSpec) -> Result<()> {
    if content.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new("xs:complexType")))?;
        return Ok(());
    }

    writer.write_event(Event::Start(BytesStart::new("xs:complexType")))?;

    if !content.children.is_empty() {
        writer.write_event(Event::Start(BytesStart::new("xs:sequence")))?;
        for child in &content.children {
            write_element(writer, child, false)?;
        }
        writer.write_event(Event::End(BytesEnd::new("xs:sequence")))?;
    }

    for attr in &content.attributes {
        write_attribute(writer, attr)?;
    }

    writer.write_event(Event::End(BytesEnd::new("xs:complexType")))?;
    Ok(())
}

fn write_attribute(writer: &mut Writer<Vec<u8>>, attr: &AttributeSpec) -> Result<()> {
    let mut start = BytesStart::new("xs:attribute");
    start.push_attribute(("name", attr.name.as_str()));
    start.push_attribute(("type", attr.leaf.xsd_name()));
    if attr.required {
        start.push_attribute(("use", "required"));
    }
    writer.write_event(Event::Empty(start))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::InferenceEngine;
    use crate::model::LeafType;
    use crate::occurrence::Occurs;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_write_inferred_order_schema() {
        let mut engine = InferenceEngine::new();
        engine
            .add_document_text(r#"<order id="7"><item>1</item><item>2</item></order>"#)
            .unwrap();
        let report = engine.into_report();

        let xsd = write_schema(&report.graph).unwrap();
        let expected = "\
<?xml version=\"1.0\" encoding=\"utf-8\"?>
<xs:schema xmlns:xs=\"http://www.w3.org/2001/XMLSchema\">
  <xs:element name=\"order\">
    <xs:complexType>
      <xs:sequence>
        <xs:element name=\"item\" minOccurs=\"2\" maxOccurs=\"unbounded\" type=\"xs:integer\"/>
      </xs:sequence>
      <xs:attribute name=\"id\" type=\"xs:integer\" use=\"required\"/>
    </xs:complexType>
  </xs:element>
</xs:schema>
";
        assert_eq!(xsd, expected);
    }

    #[test]
    fn test_written_schema_loads_back() {
        let mut engine = InferenceEngine::new();
        engine
            .add_document_text("<order><item/><note>hi</note></order>")
            .unwrap();
        engine.add_document_text("<order><item/></order>").unwrap();
        let inferred = engine.into_report();

        let xsd = write_schema(&inferred.graph).unwrap();
        let loaded =
            crate::schema_loader::SchemaLoader::load_str(&xsd, std::path::Path::new("round.xsd"))
                .unwrap();

        assert_eq!(loaded.graph.roots(), ["order".to_string()]);
        let order = loaded.graph.get("order").unwrap();
        let ElementKind::Complex(content) = &order.kind else {
            panic!("expected complex order");
        };
        assert_eq!(content.child("item").unwrap().occurs, Occurs::ONCE);
        assert_eq!(content.child("note").unwrap().occurs.min, 0);
        assert_eq!(
            content.child("note").unwrap().kind,
            ElementKind::Simple(LeafType::Text)
        );
    }

    #[test]
    fn test_boolean_and_decimal_leaf_types() {
        let mut engine = InferenceEngine::new();
        engine
            .add_document_text(r#"<flags on="true"><ratio>0.5</ratio></flags>"#)
            .unwrap();
        let report = engine.into_report();

        let xsd = write_schema(&report.graph).unwrap();
        assert!(xsd.contains(r#"<xs:attribute name="on" type="xs:boolean" use="required"/>"#));
        assert!(xsd.contains(r#"<xs:element name="ratio" type="xs:decimal"/>"#));
    }
}
