//! Declaration extraction: selects the commented top-level constants of one
//! type, in source order.
//!
//! Matching and ordering policy:
//! - declarations without attached metadata are invisible
//! - every visible declaration must have a simple type name (`Example`, `u8`),
//!   otherwise the whole run aborts
//! - declarations of another type are skipped
//! - a matching `static` aborts the run
//! - a redeclared name keeps its first position and takes the last label

use std::collections::HashMap;

use quote::ToTokens;
use serde::{Deserialize, Serialize};
use syn::ext::IdentExt;
use syn::{File, PathArguments, Type, TypePath};
use tracing::{debug, trace};

use crate::comments::{AttachedMetadata, DeclKey};
use crate::error::{GmlError, GmlResult};
use crate::parse::{value_decls, ValueDecl, ValueKind};

/// One matching constant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Declaration {
    /// Identifier of the constant
    pub name: String,
    /// Declared type name
    pub declared_type: String,
    /// Attached comment, trimmed
    pub attached_comment: String,
    /// Position among the matching declarations (0-indexed, first occurrence)
    pub source_order: usize,
    /// Line of the first occurrence (1-indexed)
    pub line: usize,
}

/// Matching declarations of one type, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Requested type name
    pub type_name: String,
    /// Number of commented declarations of any type that were classified
    pub scanned: usize,
    declarations: Vec<Declaration>,
}

impl ExtractionResult {
    /// Declarations ordered by `source_order`.
    pub fn declarations(&self) -> &[Declaration] {
        &self.declarations
    }

    /// Constant names in list order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.declarations.iter().map(|d| d.name.as_str())
    }

    /// `(name, label)` pairs in list order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.declarations
            .iter()
            .map(|d| (d.name.as_str(), d.attached_comment.as_str()))
    }

    /// Name to label mapping. Keys are exactly [`Self::names`].
    pub fn mapping(&self) -> HashMap<&str, &str> {
        self.entries().collect()
    }

    /// Label of the constant `name`.
    pub fn label(&self, name: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.attached_comment.as_str())
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Single pass over the top-level value declarations of a file.
struct DeclarationExtractor<'a, M: AttachedMetadata + ?Sized> {
    metadata: &'a M,
    type_name: &'a str,
    declarations: Vec<Declaration>,
    positions: HashMap<String, usize>,
    scanned: usize,
}

impl<'a, M: AttachedMetadata + ?Sized> DeclarationExtractor<'a, M> {
    fn new(metadata: &'a M, type_name: &'a str) -> Self {
        Self {
            metadata,
            type_name,
            declarations: Vec::with_capacity(16),
            positions: HashMap::with_capacity(16),
            scanned: 0,
        }
    }

    fn visit(&mut self, decl: &ValueDecl<'_>) -> GmlResult<()> {
        let key = DeclKey::of(decl.ident);
        let Some(comment) = self.metadata.attached(&key) else {
            return Ok(());
        };
        self.scanned += 1;

        let name = decl.ident.to_string();
        let declared_type = simple_type_name(decl.ty).ok_or_else(|| {
            GmlError::UnclassifiableDeclaration {
                name: name.clone(),
                line: key.line,
                found: decl.ty.to_token_stream().to_string(),
            }
        })?;

        if declared_type != self.type_name {
            trace!(name = %name, declared_type = %declared_type, "skipping declaration of other type");
            return Ok(());
        }
        if name == "_" {
            trace!(line = key.line, "skipping unnamed constant");
            return Ok(());
        }
        if decl.kind == ValueKind::Static {
            return Err(GmlError::StaticDeclaration {
                name,
                line: key.line,
            });
        }

        let label = comment.trim().to_string();
        match self.positions.get(&name) {
            Some(&index) => {
                debug!(name = %name, line = key.line, "redeclared constant, keeping first position");
                self.declarations[index].attached_comment = label;
            }
            None => {
                let index = self.declarations.len();
                self.positions.insert(name.clone(), index);
                self.declarations.push(Declaration {
                    name,
                    declared_type,
                    attached_comment: label,
                    source_order: index,
                    line: key.line,
                });
            }
        }
        Ok(())
    }

    fn finish(self) -> GmlResult<ExtractionResult> {
        if self.declarations.is_empty() {
            return Err(GmlError::NoDeclarationsFound {
                type_name: self.type_name.to_string(),
                scanned: self.scanned,
            });
        }
        Ok(ExtractionResult {
            type_name: self.type_name.to_string(),
            scanned: self.scanned,
            declarations: self.declarations,
        })
    }
}

/// Name of a simple type annotation: a single path segment with no generic
/// arguments, no qualified self and no leading `::`.
pub fn simple_type_name(ty: &Type) -> Option<String> {
    match ty {
        Type::Path(TypePath { qself: None, path })
            if path.leading_colon.is_none() && path.segments.len() == 1 =>
        {
            let segment = &path.segments[0];
            match segment.arguments {
                PathArguments::None => Some(segment.ident.unraw().to_string()),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Extracts the commented top-level declarations of type `type_name`.
///
/// Fails with [`GmlError::UnclassifiableDeclaration`] on the first commented
/// declaration without a simple type, and with
/// [`GmlError::NoDeclarationsFound`] when nothing matches.
pub fn extract_declarations<M>(
    file: &File,
    metadata: &M,
    type_name: &str,
) -> GmlResult<ExtractionResult>
where
    M: AttachedMetadata + ?Sized,
{
    let mut extractor = DeclarationExtractor::new(metadata, type_name);
    for decl in value_decls(file) {
        extractor.visit(&decl)?;
    }
    let result = extractor.finish()?;
    debug!(
        type_name = %type_name,
        matched = result.len(),
        scanned = result.scanned,
        "extracted declarations"
    );
    Ok(result)
}
