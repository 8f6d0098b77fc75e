//! CLI-level tests running the compiled binary against on-disk fixtures.

use std::fs;
use std::process::Command;

use tempfile::TempDir;

fn xsdgen() -> Command {
    Command::new(env!("CARGO_BIN_EXE_xsdgen"))
}

#[test]
fn test_cli_help_output() {
    let output = xsdgen().arg("--help").output().expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("xsd"));
    assert!(stdout.contains("template"));
    assert!(stdout.contains("--verbose"));
    assert!(stdout.contains("--quiet"));
}

#[test]
fn test_cli_version_output() {
    let output = xsdgen().arg("--version").output().expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("xsdgen 0.2.0"));
}

#[test]
fn test_cli_xsd_generation_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("one.xml"),
        r#"<order id="1"><item>widget</item></order>"#,
    )
    .unwrap();
    fs::write(
        temp_dir.path().join("two.xml"),
        r#"<order id="2"><item>bolt</item><item>nut</item></order>"#,
    )
    .unwrap();

    let schema_path = temp_dir.path().join("combined_schema.xsd");
    let output = xsdgen()
        .arg("xsd")
        .arg(temp_dir.path())
        .arg("-o")
        .arg(&schema_path)
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("Schema written"));

    let schema = fs::read_to_string(&schema_path).unwrap();
    assert!(schema.contains(r#"<xs:element name="order">"#));
    assert!(schema.contains(r#"maxOccurs="unbounded""#));
    assert!(schema.contains(r#"<xs:attribute name="id" type="xs:integer" use="required"/>"#));
}

#[test]
fn test_cli_template_generation_end_to_end() {
    let temp_dir = TempDir::new().unwrap();
    let schema_path = temp_dir.path().join("orders.xsd");
    fs::write(
        &schema_path,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="order">
    <xs:complexType>
      <xs:sequence>
        <xs:element name="item" type="xs:string" maxOccurs="unbounded"/>
      </xs:sequence>
      <xs:attribute name="id" type="xs:integer" use="required"/>
    </xs:complexType>
  </xs:element>
</xs:schema>"#,
    )
    .unwrap();

    let template_path = temp_dir.path().join("orders_template.xml");
    let output = xsdgen()
        .arg("template")
        .arg(&schema_path)
        .arg("-o")
        .arg(&template_path)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let template = fs::read_to_string(&template_path).unwrap();
    assert!(template.contains("<!-- Element: <order> (required, exactly once) -->"));
    assert!(template.contains("<!-- Attribute: id (required) -->"));
    assert!(template.contains("<!-- Element: <item> (required, unbounded) -->"));
    assert!(template.contains(r#"<order id="">"#));
}

#[test]
fn test_cli_malformed_document_fails_and_names_it() {
    let temp_dir = TempDir::new().unwrap();
    let bad = temp_dir.path().join("bad.xml");
    fs::write(&bad, "<order><item></order>").unwrap();

    let output = xsdgen()
        .arg("xsd")
        .arg(&bad)
        .arg("-o")
        .arg(temp_dir.path().join("out.xsd"))
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad.xml"));

    // All-or-nothing: no partial schema on disk.
    assert!(!temp_dir.path().join("out.xsd").exists());
}

#[test]
fn test_cli_no_xml_files_found() {
    let temp_dir = TempDir::new().unwrap();

    let output = xsdgen()
        .arg("xsd")
        .arg(temp_dir.path())
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No XML files found"));
}

#[test]
fn test_cli_missing_schema_error() {
    let output = xsdgen()
        .arg("template")
        .arg("/nonexistent/schema.xsd")
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("/nonexistent/schema.xsd"));
}

#[test]
fn test_cli_conflicting_options() {
    let output = xsdgen()
        .args(["--verbose", "--quiet", "template", "s.xsd"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("cannot be used with"));
}

#[test]
fn test_cli_recursive_schema_reports_note_not_failure() {
    let temp_dir = TempDir::new().unwrap();
    let schema_path = temp_dir.path().join("tree.xsd");
    fs::write(
        &schema_path,
        r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
  <xs:element name="node" type="NodeType"/>
  <xs:complexType name="NodeType">
    <xs:sequence>
      <xs:element name="child" type="NodeType" minOccurs="0"/>
    </xs:sequence>
  </xs:complexType>
</xs:schema>"#,
    )
    .unwrap();

    let template_path = temp_dir.path().join("tree_template.xml");
    let output = xsdgen()
        .arg("template")
        .arg(&schema_path)
        .arg("-o")
        .arg(&template_path)
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("child"));

    let template = fs::read_to_string(&template_path).unwrap();
    assert_eq!(template.matches("recursive reference - truncated").count(), 1);
}
