//! Builder pattern API and the generation pipeline.
//!
//! ```rust,ignore
//! // build.rs
//! use gml_core::Gml;
//!
//! fn main() -> Result<(), gml_core::GmlError> {
//!     println!("cargo:rerun-if-changed=src/status.rs");
//!     Gml::new("Example")
//!         .input("src/status.rs")
//!         .package("super")
//!         .write()?;
//!     Ok(())
//! }
//! ```
//!
//! Pipeline: parse -> extract -> render -> format, then (optionally) write.
//! Every stage either returns its output or aborts the run.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::{GmlConfig, DEFAULT_SUFFIX};
use crate::error::{GmlError, GmlResult};
use crate::extract::{extract_declarations, ExtractionResult};
use crate::format::{format_source, GeneratedSource};
use crate::output::{write_generated, WriteOutcome};
use crate::parse::{parse_path, parse_source, ParsedSource};
use crate::render::{render, RenderContext};

/// Builder for one generation run.
///
/// # Example
///
/// ```rust,ignore
/// let generation = Gml::new("Example")
///     .input("src/status.rs")
///     .package("crate::status")
///     .generate()?;
/// println!("{}", generation.source);
/// ```
#[derive(Debug, Clone)]
pub struct Gml {
    /// Target type name
    type_name: String,

    /// Input file
    input: Option<PathBuf>,

    /// Package path for the generated imports
    package: Option<String>,

    /// Explicit output file name
    file_name: Option<String>,

    /// Default output suffix
    suffix: String,
}

impl Gml {
    /// Create a builder for the given type.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            input: None,
            package: None,
            file_name: None,
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }

    /// Set the file to parse.
    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.input = Some(path.into());
        self
    }

    /// Set the module path the generated file imports from.
    pub fn package(mut self, package: impl Into<String>) -> Self {
        self.package = Some(package.into());
        self
    }

    /// Set an explicit output file name.
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    /// Set the suffix of the default output file name.
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Build and validate the configuration.
    pub fn config(&self) -> GmlResult<GmlConfig> {
        let input = self
            .input
            .clone()
            .ok_or_else(|| GmlError::config("input file must be set"))?;
        let package = self
            .package
            .clone()
            .ok_or_else(|| GmlError::config("package must be set"))?;

        let config = GmlConfig {
            type_name: self.type_name.clone(),
            input,
            package,
            file_name: self.file_name.clone(),
            suffix: self.suffix.clone(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Run the pipeline without touching the file system beyond the input.
    pub fn generate(&self) -> GmlResult<Generation> {
        generate(&self.config()?)
    }

    /// Run the pipeline and write the output file.
    pub fn write(&self) -> GmlResult<Written> {
        self.generate()?.write()
    }
}

/// Result of a successful pipeline run.
#[derive(Debug, Clone)]
pub struct Generation {
    /// Configuration the run used
    pub config: GmlConfig,
    /// Extracted declarations
    pub result: ExtractionResult,
    /// Formatted output
    pub source: GeneratedSource,
}

/// Result of writing a [`Generation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Written {
    pub path: PathBuf,
    pub outcome: WriteOutcome,
}

impl Generation {
    /// Path the output goes to.
    pub fn output_path(&self) -> PathBuf {
        self.config.output_path()
    }

    /// Write the output file.
    pub fn write(self) -> GmlResult<Written> {
        let path = self.output_path();
        let outcome = write_generated(&path, &self.source)?;
        Ok(Written { path, outcome })
    }
}

/// Extract, render and format an already parsed source.
pub fn generate_parsed(
    parsed: &ParsedSource,
    type_name: &str,
    package: &str,
) -> GmlResult<(ExtractionResult, GeneratedSource)> {
    let result = extract_declarations(&parsed.file, &parsed.comments, type_name)?;
    let raw = render(&RenderContext::new(type_name, package, &result))?;
    let source = format_source(&raw)?;
    Ok((result, source))
}

/// Full pipeline over in-memory source text. `path` is used for diagnostics.
pub fn generate_source(
    path: &Path,
    content: &str,
    type_name: &str,
    package: &str,
) -> GmlResult<(ExtractionResult, GeneratedSource)> {
    let parsed = parse_source(path, content)?;
    generate_parsed(&parsed, type_name, package)
}

/// Full pipeline for a validated configuration.
pub fn generate(config: &GmlConfig) -> GmlResult<Generation> {
    let parsed = parse_path(&config.input)?;
    let (result, source) = generate_parsed(&parsed, &config.type_name, &config.package)?;

    info!(
        type_name = %config.type_name,
        input = %config.input.display(),
        constants = result.len(),
        "generated source"
    );

    Ok(Generation {
        config: config.clone(),
        result,
        source,
    })
}
