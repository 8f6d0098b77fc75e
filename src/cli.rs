use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Verbosity levels for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum VerbosityLevel {
    /// Only show warnings and errors
    Quiet,
    /// Show standard information
    #[default]
    Normal,
    /// Show detailed information
    Verbose,
}

/// Main application configuration derived from CLI
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub verbose: bool,
    pub quiet: bool,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            verbose: cli.verbose,
            quiet: cli.quiet,
        }
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        if self.quiet {
            VerbosityLevel::Quiet
        } else if self.verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }
}

/// XML schema generation tool
#[derive(Parser, Debug, Clone)]
#[command(name = "xsdgen")]
#[command(about = "Generate an XSD schema from example XML, or an annotated XML template from an XSD")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Enable quiet mode (warnings and errors only)
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        help = "Quiet mode",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate a generalized XSD schema from example XML files and directories
    Xsd {
        /// XML files or directories to learn from
        #[arg(required = true, help = "XML files or directories to learn from")]
        inputs: Vec<PathBuf>,

        /// Where to write the generated schema
        #[arg(
            short = 'o',
            long = "output",
            help = "Output schema path (defaults to combined_schema.xsd)"
        )]
        output: Option<PathBuf>,

        /// File extensions to process (comma-separated)
        #[arg(
            short = 'e',
            long = "extensions",
            default_value = "xml",
            help = "File extensions to process (e.g., 'xml,cmdi')"
        )]
        extensions: String,

        /// Include file patterns (glob syntax)
        #[arg(long = "include", action = clap::ArgAction::Append)]
        include_patterns: Vec<String>,

        /// Exclude file patterns (glob syntax)
        #[arg(long = "exclude", action = clap::ArgAction::Append)]
        exclude_patterns: Vec<String>,
    },

    /// Generate an annotated XML instance template from an XSD schema
    Template {
        /// Schema file to expand into a template
        #[arg(help = "XSD schema file")]
        schema: PathBuf,

        /// Where to write the generated template
        #[arg(
            short = 'o',
            long = "output",
            help = "Output template path (defaults to <schema>_template.xml)"
        )]
        output: Option<PathBuf>,
    },
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn validate(&self) -> Result<(), String> {
        match &self.command {
            Command::Xsd { inputs, .. } => {
                if inputs.is_empty() {
                    return Err("At least one XML file or directory is required".to_string());
                }
            }
            Command::Template { schema, .. } => {
                if !schema.exists() {
                    return Err(format!("Schema file does not exist: {}", schema.display()));
                }
            }
        }
        Ok(())
    }
}

/// Split a comma-separated extension list into normalized entries.
pub fn parse_extensions(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_start_matches('.').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
