use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Main application error type that encompasses all fatal failure modes.
///
/// Fatal errors unwind the entire run; no partial schema or template output
/// is ever written.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cannot read XML document: {path} - {details}")]
    InputUnreadable { path: PathBuf, details: String },

    #[error("Malformed schema: {path} - {details}")]
    MalformedSchema { path: PathBuf, details: String },

    #[error("No root element found in schema: {path}")]
    EmptySchema { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Non-fatal findings collected during inference, loading, or synthesis.
///
/// Anomalies never abort a run; they are carried alongside the successful
/// result and surfaced to the user as warnings or notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Anomaly {
    /// The same element name was observed both as a simple (text-only) element
    /// and as a complex element; the merge proceeded with the complex form.
    TypeConflict { element: String },

    /// A cyclic type reference was truncated rather than expanded.
    RecursiveType { element: String },
}

impl Anomaly {
    /// Anomalies are warnings except recursive-type notes, which are
    /// informational.
    pub fn is_warning(&self) -> bool {
        matches!(self, Anomaly::TypeConflict { .. })
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::TypeConflict { element } => write!(
                f,
                "element '{}' was seen with both text-only and structured content; \
                 treating it as structured",
                element
            ),
            Anomaly::RecursiveType { element } => write!(
                f,
                "element '{}' refers to its own type; expansion truncated",
                element
            ),
        }
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_the_offending_path() {
        let err = SchemaError::InputUnreadable {
            path: PathBuf::from("/data/orders.xml"),
            details: "unexpected end of stream".to_string(),
        };
        assert!(err.to_string().contains("/data/orders.xml"));
        assert!(err.to_string().contains("unexpected end of stream"));

        let err = SchemaError::MalformedSchema {
            path: PathBuf::from("/data/orders.xsd"),
            details: "unknown type reference 'OrderType'".to_string(),
        };
        assert!(err.to_string().contains("Malformed schema"));
        assert!(err.to_string().contains("orders.xsd"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: SchemaError = io_error.into();

        match err {
            SchemaError::Io(_) => (),
            _ => panic!("Expected SchemaError::Io"),
        }
    }

    #[test]
    fn test_anomaly_display_names_the_element() {
        let conflict = Anomaly::TypeConflict {
            element: "item".to_string(),
        };
        assert!(conflict.to_string().contains("item"));
        assert!(conflict.is_warning());

        let recursive = Anomaly::RecursiveType {
            element: "node".to_string(),
        };
        assert!(recursive.to_string().contains("node"));
        assert!(!recursive.is_warning());
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;

        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err = SchemaError::Io(io_error);

        assert!(err.source().is_some());
        assert_eq!(err.source().unwrap().to_string(), "File not found");
    }
}
