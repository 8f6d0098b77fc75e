use std::path::{Path, PathBuf};

use globset::{GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::error::{Result, SchemaError};

/// Result of resolving CLI inputs into concrete document paths.
#[derive(Debug, Default)]
pub struct Discovery {
    /// De-duplicated document paths in sorted order.
    pub files: Vec<PathBuf>,
    /// Inputs that were neither matching files nor directories, with the
    /// reason they were skipped.
    pub skipped: Vec<(PathBuf, String)>,
}

/// Resolves a mixed list of files and directories into an ordered,
/// de-duplicated list of XML documents.
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    /// File extensions to include (e.g., ["xml"])
    extensions: Vec<String>,
    /// Include patterns set
    include_set: Option<GlobSet>,
    /// Exclude patterns set
    exclude_set: Option<GlobSet>,
}

impl FileDiscovery {
    pub fn new() -> Self {
        Self {
            extensions: vec!["xml".to_string()],
            include_set: None,
            exclude_set: None,
        }
    }

    /// Set file extensions to discover
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Add include patterns
    pub fn with_include_patterns(mut self, patterns: Vec<String>) -> Result<Self> {
        self.include_set = build_glob_set(&patterns, "include")?;
        Ok(self)
    }

    /// Add exclude patterns
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Result<Self> {
        self.exclude_set = build_glob_set(&patterns, "exclude")?;
        Ok(self)
    }

    /// Resolve each input: a matching file stands alone, a directory is
    /// walked recursively, anything else is recorded as skipped. The final
    /// list is sorted and de-duplicated so document order is deterministic.
    pub fn resolve(&self, inputs: &[PathBuf]) -> Result<Discovery> {
        let mut discovery = Discovery::default();

        for input in inputs {
            if input.is_file() {
                if self.should_process(input) {
                    discovery.files.push(input.clone());
                } else {
                    discovery.skipped.push((
                        input.clone(),
                        "file does not match the requested extensions or patterns".to_string(),
                    ));
                }
            } else if input.is_dir() {
                self.walk_directory(input, &mut discovery);
            } else {
                discovery.skipped.push((
                    input.clone(),
                    "not an existing file or directory".to_string(),
                ));
            }
        }

        discovery.files.sort();
        discovery.files.dedup();
        Ok(discovery)
    }

    fn walk_directory(&self, dir: &Path, discovery: &mut Discovery) {
        let walker = WalkBuilder::new(dir).standard_filters(false).build();
        for entry in walker {
            match entry {
                Ok(entry) => {
                    let path = entry.path();
                    if entry.file_type().is_some_and(|t| t.is_file()) && self.should_process(path)
                    {
                        discovery.files.push(path.to_path_buf());
                    }
                }
                Err(e) => {
                    discovery
                        .skipped
                        .push((dir.to_path_buf(), format!("traversal error: {}", e)));
                }
            }
        }
    }

    /// Check whether a file should be processed based on extension and
    /// include/exclude patterns.
    fn should_process(&self, path: &Path) -> bool {
        let extension_matches = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|wanted| wanted.eq_ignore_ascii_case(ext))
            });
        if !extension_matches {
            return false;
        }

        if let Some(include) = &self.include_set
            && !include.is_match(path)
        {
            return false;
        }
        if let Some(exclude) = &self.exclude_set
            && exclude.is_match(path)
        {
            return false;
        }
        true
    }
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

fn build_glob_set(patterns: &[String], kind: &str) -> Result<Option<GlobSet>> {
    if patterns.is_empty() {
        return Ok(None);
    }

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = globset::GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| {
                SchemaError::Config(format!("Invalid glob pattern '{}': {}", pattern, e))
            })?;
        builder.add(glob);
    }

    let set = builder
        .build()
        .map_err(|e| SchemaError::Config(format!("Failed to build {} glob set: {}", kind, e)))?;
    Ok(Some(set))
}
