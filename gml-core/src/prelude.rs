//! Prelude module for convenient imports.
//!
//! ```rust,ignore
//! use gml_core::prelude::*;
//! ```

// Errors
pub use crate::error::{GmlError, GmlResult};

// Builder API
pub use crate::builder::{generate, Generation, Gml, Written};

// Configuration
pub use crate::config::{load_config, GmlConfig};

// Results
pub use crate::extract::{Declaration, ExtractionResult};
pub use crate::format::GeneratedSource;
pub use crate::output::WriteOutcome;
