//! Configuration: the explicit [`GmlConfig`] value handed to the pipeline, and
//! the optional `gml.toml` defaults file.
//!
//! The core never reads flags or environment variables. The CLI (or a
//! `build.rs`) resolves them once and passes a `GmlConfig` down.

use std::fs;
use std::path::{Path, PathBuf};

use convert_case::{Case, Casing};
use serde::Deserialize;
use syn::{Ident, Path as SynPath};

use crate::error::{GmlError, GmlResult, IoResultExt};

/// Suffix of the default output file name.
pub const DEFAULT_SUFFIX: &str = "gml.rs";

/// Name of the optional defaults file.
pub const CONFIG_FILE: &str = "gml.toml";

/// Resolved configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GmlConfig {
    /// Type whose constants are collected
    pub type_name: String,
    /// File to parse
    pub input: PathBuf,
    /// Module path the generated file imports from (`crate::status`, `super`)
    pub package: String,
    /// Explicit output file name
    pub file_name: Option<String>,
    /// Suffix for the default output file name
    pub suffix: String,
}

impl GmlConfig {
    pub fn new(
        type_name: impl Into<String>,
        input: impl Into<PathBuf>,
        package: impl Into<String>,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            input: input.into(),
            package: package.into(),
            file_name: None,
            suffix: DEFAULT_SUFFIX.to_string(),
        }
    }

    /// Checks every required field. The input file must exist.
    pub fn validate(&self) -> GmlResult<()> {
        if self.type_name.trim().is_empty() {
            return Err(GmlError::config("type name must be set"));
        }
        if syn::parse_str::<Ident>(&self.type_name).is_err() {
            return Err(GmlError::config(format!(
                "type name `{}` is not a valid Rust identifier",
                self.type_name
            )));
        }
        if self.package.trim().is_empty() {
            return Err(GmlError::config("package must be set"));
        }
        if syn::parse_str::<SynPath>(&self.package).is_err() {
            return Err(GmlError::config(format!(
                "package `{}` is not a valid Rust module path",
                self.package
            )));
        }
        if self.input.as_os_str().is_empty() {
            return Err(GmlError::config("input file must be set"));
        }
        if let Some(name) = &self.file_name {
            if name.trim().is_empty() || name.contains('\0') {
                return Err(GmlError::config(format!("invalid output file name {:?}", name)));
            }
        }
        if self.suffix.trim().is_empty() || self.suffix.contains('\0') {
            return Err(GmlError::config(format!("invalid output suffix {:?}", self.suffix)));
        }
        if !self.input.exists() {
            return Err(GmlError::InputNotFound {
                path: self.input.clone(),
            });
        }
        Ok(())
    }

    /// Output file name: explicit, or `<type_name in snake_case>_<suffix>`.
    pub fn output_file_name(&self) -> String {
        match &self.file_name {
            Some(name) => name.clone(),
            None => format!("{}_{}", self.type_name.to_case(Case::Snake), self.suffix),
        }
    }

    /// Output path. Relative names resolve against the input file's directory.
    pub fn output_path(&self) -> PathBuf {
        let name = PathBuf::from(self.output_file_name());
        if name.is_absolute() {
            return name;
        }
        match self.input.parent() {
            Some(dir) => dir.join(name),
            None => name,
        }
    }
}

/// Contents of `gml.toml`.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct FileConfig {
    /// Generation defaults.
    pub generate: Option<GenerateConfig>,
}

/// `[generate]` section of `gml.toml`.
#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct GenerateConfig {
    /// Default package path.
    pub package: Option<String>,
    /// Default output suffix.
    pub suffix: Option<String>,
}

impl FileConfig {
    pub fn package(&self) -> Option<&str> {
        self.generate.as_ref()?.package.as_deref()
    }

    pub fn suffix(&self) -> Option<&str> {
        self.generate.as_ref()?.suffix.as_deref()
    }
}

/// Parses a `gml.toml` file. A missing file is a configuration error.
pub fn load_config_file(path: &Path) -> GmlResult<FileConfig> {
    if !path.exists() {
        return Err(GmlError::config(format!(
            "config file {} not found",
            path.display()
        )));
    }
    let content = fs::read_to_string(path).with_path(path)?;
    toml::from_str(&content)
        .map_err(|e| GmlError::config(format!("invalid {}: {}", path.display(), e.message())))
}

/// Loads `gml.toml` from `dir` if it exists.
pub fn load_config(dir: &Path) -> GmlResult<Option<FileConfig>> {
    let path = dir.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}
