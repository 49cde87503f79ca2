//! Source parsing: reads the single input file and turns it into a syntax
//! tree plus the attached-comment map.
//!
//! Only top-level value declarations (`const` and `static` items) matter to
//! the rest of the pipeline. [`value_decls`] is the shared view of them used by
//! both the comment map and the extractor, so both agree on what a
//! declaration is and on its identity.

use std::fs;
use std::path::{Path, PathBuf};

use proc_macro2::Span;
use syn::{Attribute, File, Ident, Item, ItemConst, ItemStatic, Type};
use tracing::debug;

use crate::comments::{AttachedMetadata, CommentMap};
use crate::error::{GmlError, GmlResult, IoResultExt};

/// Maximum file size to parse (10 MB).
const MAX_FILE_SIZE: usize = 10_000_000;

/// Kind of value declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// `const NAME: T = ...;`
    Const,
    /// `static NAME: T = ...;` (including `static mut`)
    Static,
}

/// Borrowed view of one top-level `const` / `static` item.
#[derive(Debug, Clone, Copy)]
pub struct ValueDecl<'a> {
    pub kind: ValueKind,
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub attrs: &'a [Attribute],
    /// Span of the terminating `;`
    pub semi: Span,
}

impl<'a> ValueDecl<'a> {
    fn from_item(item: &'a Item) -> Option<Self> {
        match item {
            Item::Const(ItemConst {
                attrs,
                ident,
                ty,
                semi_token,
                ..
            }) => Some(Self {
                kind: ValueKind::Const,
                ident,
                ty,
                attrs,
                semi: semi_token.spans[0],
            }),
            Item::Static(ItemStatic {
                attrs,
                ident,
                ty,
                semi_token,
                ..
            }) => Some(Self {
                kind: ValueKind::Static,
                ident,
                ty,
                attrs,
                semi: semi_token.spans[0],
            }),
            _ => None,
        }
    }
}

/// Iterates the top-level value declarations of a file in source order.
///
/// Items nested in `mod`, `impl` or function bodies are not yielded.
pub fn value_decls(file: &File) -> impl Iterator<Item = ValueDecl<'_>> {
    file.items.iter().filter_map(ValueDecl::from_item)
}

/// A parsed input file with its attached comments.
#[derive(Debug)]
pub struct ParsedSource {
    /// Path the source was read from (diagnostics only)
    pub path: PathBuf,
    /// Syntax tree
    pub file: File,
    /// Comments attached to top-level value declarations
    pub comments: CommentMap,
}

/// Reads the input file as UTF-8 text.
pub fn read_source(path: &Path) -> GmlResult<String> {
    let bytes = fs::read(path).with_path(path)?;
    String::from_utf8(bytes).map_err(|e| {
        GmlError::parse(
            path,
            format!("input is not valid UTF-8 (at byte {})", e.utf8_error().valid_up_to()),
        )
    })
}

/// Parses Rust source text and builds its comment map.
///
/// A leading byte order mark is dropped before parsing so spans and the
/// comment lookup index the same text.
pub fn parse_source(path: &Path, content: &str) -> GmlResult<ParsedSource> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.len() > MAX_FILE_SIZE {
        return Err(GmlError::parse(
            path,
            format!("file too large ({} bytes, max {})", content.len(), MAX_FILE_SIZE),
        ));
    }

    let file = syn::parse_file(content).map_err(|e| {
        let start = e.span().start();
        if start.line == 0 {
            GmlError::parse(path, e.to_string())
        } else {
            GmlError::parse_at(path, e.to_string(), start.line, start.column + 1)
        }
    })?;

    let comments = CommentMap::build(&file, content);
    debug!(
        path = %path.display(),
        items = file.items.len(),
        commented = comments.len(),
        "parsed source"
    );

    Ok(ParsedSource {
        path: path.to_path_buf(),
        file,
        comments,
    })
}

/// Reads and parses the input file. Fail-fast on any error.
pub fn parse_path(path: &Path) -> GmlResult<ParsedSource> {
    let content = read_source(path)?;
    parse_source(path, &content)
}
