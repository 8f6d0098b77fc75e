//! Simple Output and Reporting
//!
//! This module provides console formatting for inference and synthesis runs.

use std::path::{Path, PathBuf};

use crate::cli::VerbosityLevel;
use crate::error::Anomaly;
use crate::model::SchemaGraph;

/// Simple output formatter for human-readable results
pub struct Output {
    verbosity: VerbosityLevel,
    show_colors: bool,
}

impl Output {
    pub fn new(verbosity: VerbosityLevel) -> Self {
        Self {
            verbosity,
            show_colors: atty::is(atty::Stream::Stdout),
        }
    }

    fn colorize(&self, text: &str, color: &str) -> String {
        if self.show_colors {
            format!("\x1b[{}m{}\x1b[0m", color, text)
        } else {
            text.to_string()
        }
    }

    /// Summary of an inference run, printed after the schema has been
    /// written.
    pub fn format_inference_summary(
        &self,
        files: &[PathBuf],
        graph: &SchemaGraph,
        anomalies: &[Anomaly],
        output_path: &Path,
    ) -> String {
        let mut output = String::new();

        if self.verbosity >= VerbosityLevel::Normal {
            output.push_str("Schema Generation Summary:\n");
            output.push_str(&format!("  Documents: {}\n", files.len()));
            if self.verbosity >= VerbosityLevel::Verbose {
                for file in files {
                    output.push_str(&format!("    - {}\n", file.display()));
                }
            }
            output.push_str(&format!("  Elements inferred: {}\n", graph.len()));
            output.push_str(&format!(
                "  Root elements: {}\n",
                graph.roots().join(", ")
            ));
        }

        output.push_str(&self.format_anomalies(anomalies));

        if self.verbosity >= VerbosityLevel::Normal {
            output.push_str(&format!(
                "{} Schema written: {}\n",
                self.colorize("✓", "32"),
                output_path.display()
            ));
        }

        output
    }

    /// Summary of a template synthesis run.
    pub fn format_synthesis_summary(
        &self,
        schema_path: &Path,
        roots: &[String],
        anomalies: &[Anomaly],
        output_path: &Path,
    ) -> String {
        let mut output = String::new();

        if self.verbosity >= VerbosityLevel::Normal {
            output.push_str("Template Generation Summary:\n");
            output.push_str(&format!("  Schema: {}\n", schema_path.display()));
            output.push_str(&format!("  Root elements: {}\n", roots.join(", ")));
        }

        output.push_str(&self.format_anomalies(anomalies));

        if self.verbosity >= VerbosityLevel::Normal {
            output.push_str(&format!(
                "{} Template written: {}\n",
                self.colorize("✓", "32"),
                output_path.display()
            ));
        }

        output
    }

    /// Non-fatal findings, one line each. Warnings are always shown, notes
    /// only outside quiet mode.
    pub fn format_anomalies(&self, anomalies: &[Anomaly]) -> String {
        let mut output = String::new();
        for anomaly in anomalies {
            if anomaly.is_warning() {
                output.push_str(&format!(
                    "{}  {}\n",
                    self.colorize("⚠ WARNING", "33"),
                    anomaly
                ));
            } else if self.verbosity >= VerbosityLevel::Normal {
                output.push_str(&format!("{}  {}\n", self.colorize("- NOTE", "36"), anomaly));
            }
        }
        output
    }

    /// One line per skipped input, mirrored to stderr by the caller.
    pub fn format_skipped(&self, skipped: &[(PathBuf, String)]) -> String {
        let mut output = String::new();
        for (path, reason) in skipped {
            output.push_str(&format!(
                "{}  Skipped {}: {}\n",
                self.colorize("⚠ WARNING", "33"),
                path.display(),
                reason
            ));
        }
        output
    }
}
