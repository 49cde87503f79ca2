//! gml-core: generate label mappers and ordered lists for typed Rust constants.
//!
//! Given a Rust source file declaring constants of one type, each carrying a
//! comment, gml emits a companion file with:
//!
//! - `<Type>Mapper`: `&[(<Type>, &str)]` pairing every constant with its label
//! - `<Type>List`: `&[<Type>]` listing the constants in declaration order
//!
//! ```rust,ignore
//! // src/status.rs
//! pub type Example = u8;
//!
//! pub const ErrCode200: Example = 0; // request ok
//! pub const ErrCode400: Example = 1; // request not found
//! pub const ErrCode500: Example = 2; // request failed
//! ```
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use gml_core::prelude::*;
//!
//! let written = Gml::new("Example")
//!     .input("src/status.rs")
//!     .package("super")
//!     .write()?;
//! ```
//!
//! # Module Organization
//!
//! - [`parse`]: reading and parsing the input file
//! - [`comments`]: attached-comment lookup keyed by declaration
//! - [`extract`]: selecting and ordering matching constants
//! - [`render`]: the fixed output template
//! - [`format`]: validation and canonical formatting of the output
//! - [`output`]: all-or-nothing writing of the generated file
//! - [`config`]: explicit configuration value and `gml.toml`
//! - [`builder`]: fluent API and pipeline entry points
//! - [`error`]: typed error handling

pub mod builder;
pub mod comments;
pub mod config;
pub mod error;
pub mod extract;
pub mod format;
pub mod logging;
pub mod output;
pub mod parse;
pub mod prelude;
pub mod render;
pub mod report;

// Error types
pub use error::{GmlError, GmlResult, IoResultExt};

// Builder API and pipeline
pub use builder::{generate, generate_parsed, generate_source, Generation, Gml, Written};

// Configuration
pub use config::{load_config, load_config_file, FileConfig, GenerateConfig, GmlConfig, CONFIG_FILE, DEFAULT_SUFFIX};

// Pipeline stages
pub use comments::{AttachedMetadata, CommentMap, DeclKey};
pub use extract::{extract_declarations, simple_type_name, Declaration, ExtractionResult};
pub use format::{format_source, GeneratedSource};
pub use output::{write_generated, WriteOutcome};
pub use parse::{parse_path, parse_source, read_source, value_decls, ParsedSource, ValueDecl, ValueKind};
pub use render::{marker_line, render, RenderContext, GENERATOR};

// Logging
pub use logging::{init_structured_logging, log_failure};

// Reporting
pub use report::{extraction_json, print_json, summary};
