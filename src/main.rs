use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;

use xsdgen::cli::{Cli, Command, Config, parse_extensions};
use xsdgen::{
    FileDiscovery, InferenceEngine, Output, SchemaLoader, TemplateSynthesizer, render,
    write_schema,
};

fn main() {
    let cli = Cli::parse_args();

    if let Err(message) = cli.validate() {
        eprintln!("Error: {}", message);
        process::exit(1);
    }

    let config = Config::from_cli(&cli);
    if let Err(e) = run(&cli, &config) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli, config: &Config) -> anyhow::Result<()> {
    let output = Output::new(config.verbosity());

    match &cli.command {
        Command::Xsd {
            inputs,
            output: out_path,
            extensions,
            include_patterns,
            exclude_patterns,
        } => run_inference(
            inputs,
            out_path.as_deref(),
            extensions,
            include_patterns,
            exclude_patterns,
            &output,
        ),
        Command::Template {
            schema,
            output: out_path,
        } => run_template(schema, out_path.as_deref(), &output),
    }
}

fn run_inference(
    inputs: &[PathBuf],
    out_path: Option<&Path>,
    extensions: &str,
    include_patterns: &[String],
    exclude_patterns: &[String],
    output: &Output,
) -> anyhow::Result<()> {
    let discovery = FileDiscovery::new()
        .with_extensions(parse_extensions(extensions))
        .with_include_patterns(include_patterns.to_vec())?
        .with_exclude_patterns(exclude_patterns.to_vec())?
        .resolve(inputs)?;

    eprint!("{}", output.format_skipped(&discovery.skipped));
    if discovery.files.is_empty() {
        anyhow::bail!("No XML files found in the given inputs");
    }

    let report = InferenceEngine::infer(&discovery.files)?;
    let schema_text = write_schema(&report.graph)?;

    // The schema is complete in memory before anything touches the disk.
    let destination = out_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("combined_schema.xsd"));
    fs::write(&destination, schema_text)
        .with_context(|| format!("writing schema to {}", destination.display()))?;

    print!(
        "{}",
        output.format_inference_summary(
            &discovery.files,
            &report.graph,
            &report.anomalies,
            &destination
        )
    );
    Ok(())
}

fn run_template(
    schema_path: &Path,
    out_path: Option<&Path>,
    output: &Output,
) -> anyhow::Result<()> {
    let loaded = SchemaLoader::load(schema_path)?;
    let synthesis = TemplateSynthesizer::synthesize(&loaded.graph);
    let template_text = render(&synthesis.nodes)?;

    let destination = out_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| default_template_path(schema_path));
    fs::write(&destination, template_text)
        .with_context(|| format!("writing template to {}", destination.display()))?;

    let mut anomalies = loaded.anomalies;
    anomalies.extend(synthesis.anomalies);

    print!(
        "{}",
        output.format_synthesis_summary(
            schema_path,
            loaded.graph.roots(),
            &anomalies,
            &destination
        )
    );
    Ok(())
}

/// `orders.xsd` expands into `orders_template.xml` next to the current
/// working directory, matching the schema's file stem.
fn default_template_path(schema_path: &Path) -> PathBuf {
    let stem = schema_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("schema");
    PathBuf::from(format!("{}_template.xml", stem))
}
