//! Attached-comment lookup for value declarations.
//!
//! syn keeps doc comments as `#[doc = "..."]` attributes but drops plain `//`
//! comments, so trailing comments are recovered from the source text using
//! the span of each item's terminating `;`.
//!
//! Two conventions are recognised:
//!
//! ```text
//! /// request ok              <- outer doc comment (Rust convention)
//! pub const ErrCode200: Example = 0;
//!
//! pub const ErrCode400: Example = 1; // request not found   <- trailing comment
//! ```
//!
//! The extractor only sees the [`AttachedMetadata`] trait, keyed by
//! [`DeclKey`], so the convention can change without touching extraction.

use std::collections::HashMap;
use std::sync::OnceLock;

use proc_macro2::LineColumn;
use regex::Regex;
use syn::{Attribute, AttrStyle, Expr, ExprLit, File, Ident, Lit, Meta};

use crate::parse::value_decls;

/// Identity of a declaration: start position of its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DeclKey {
    /// 1-indexed line
    pub line: usize,
    /// 0-indexed column (in characters)
    pub column: usize,
}

impl DeclKey {
    /// Key of the declaration introducing `ident`.
    pub fn of(ident: &Ident) -> Self {
        let LineColumn { line, column } = ident.span().start();
        Self { line, column }
    }
}

/// Metadata attached to declarations, looked up by declaration identity.
pub trait AttachedMetadata {
    /// Raw attached text, or `None` if the declaration carries no metadata.
    fn attached(&self, key: &DeclKey) -> Option<&str>;

    /// Number of declarations carrying metadata.
    fn len(&self) -> usize;

    /// Whether no declaration carries metadata.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Comments attached to the top-level value declarations of one file.
#[derive(Debug, Clone, Default)]
pub struct CommentMap {
    entries: HashMap<DeclKey, String>,
}

impl CommentMap {
    /// Builds the map for `file`, whose text is `source`.
    pub fn build(file: &File, source: &str) -> Self {
        let lines: Vec<&str> = source.lines().collect();
        let mut map = Self::default();

        for decl in value_decls(file) {
            let mut parts = doc_lines(decl.attrs);
            let end = decl.semi.end();
            if let Some(text) = trailing_comment(&lines, end) {
                parts.push(text);
            }
            if !parts.is_empty() || has_doc(decl.attrs) {
                map.insert(DeclKey::of(decl.ident), parts.join("\n"));
            }
        }

        map
    }

    /// Records the comment for a declaration, replacing any previous one.
    pub fn insert(&mut self, key: DeclKey, text: impl Into<String>) {
        self.entries.insert(key, text.into());
    }

    /// Comment attached to the declaration at `key`.
    pub fn get(&self, key: &DeclKey) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

impl AttachedMetadata for CommentMap {
    fn attached(&self, key: &DeclKey) -> Option<&str> {
        self.get(key)
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

fn doc_value(attr: &Attribute) -> Option<String> {
    if attr.style != AttrStyle::Outer || !attr.path().is_ident("doc") {
        return None;
    }
    match &attr.meta {
        Meta::NameValue(nv) => match &nv.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(s), ..
            }) => Some(s.value()),
            _ => None,
        },
        _ => None,
    }
}

fn has_doc(attrs: &[Attribute]) -> bool {
    attrs.iter().any(|a| doc_value(a).is_some())
}

/// Outer doc comment lines, one leading space stripped per line.
fn doc_lines(attrs: &[Attribute]) -> Vec<String> {
    attrs
        .iter()
        .filter_map(doc_value)
        .flat_map(|v| {
            v.lines()
                .map(|l| l.strip_prefix(' ').unwrap_or(l).trim_end().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

/// Matches a plain line comment, possibly after `/* ... */` blocks closed on
/// the same line. `///` and `//!` are doc comments.
fn trailing_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?:\s*/\*.*?\*/)*\s*//(?:$|([^/!].*)$)")
            .expect("trailing comment regex is valid")
    })
}

/// Text of a `// comment` following position `end` on the same line.
fn trailing_comment(lines: &[&str], end: LineColumn) -> Option<String> {
    let line = lines.get(end.line.checked_sub(1)?)?;
    let rest: String = line.chars().skip(end.column).collect();
    let caps = trailing_regex().captures(&rest)?;
    Some(
        caps.get(1)
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(source: &str) -> (File, CommentMap) {
        let file = syn::parse_file(source).unwrap();
        let map = CommentMap::build(&file, source);
        (file, map)
    }

    fn comment_for(file: &File, map: &CommentMap, name: &str) -> Option<String> {
        value_decls(file)
            .find(|d| d.ident == name)
            .and_then(|d| map.attached(&DeclKey::of(d.ident)).map(str::to_string))
    }

    #[test]
    fn test_trailing_comment() {
        let (file, map) = build("const A: u8 = 0; // request ok\n");
        assert_eq!(comment_for(&file, &map, "A").as_deref(), Some("request ok"));
    }

    #[test]
    fn test_doc_comment_lines_joined() {
        let (file, map) = build("/// first line\n/// second line\nconst A: u8 = 0;\n");
        assert_eq!(
            comment_for(&file, &map, "A").as_deref(),
            Some("first line\nsecond line")
        );
    }

    #[test]
    fn test_doc_attribute_form() {
        let (file, map) = build("#[doc = \"from attr\"]\nconst A: u8 = 0;\n");
        assert_eq!(comment_for(&file, &map, "A").as_deref(), Some("from attr"));
    }

    #[test]
    fn test_doc_then_trailing() {
        let (file, map) = build("/// doc\nconst A: u8 = 0; // tail\n");
        assert_eq!(comment_for(&file, &map, "A").as_deref(), Some("doc\ntail"));
    }

    #[test]
    fn test_uncommented_has_no_entry() {
        let (file, map) = build("const A: u8 = 0;\nconst B: u8 = 1; // b\n");
        assert_eq!(comment_for(&file, &map, "A"), None);
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn test_empty_trailing_comment_is_present() {
        let (file, map) = build("const A: u8 = 0; //\n");
        assert_eq!(comment_for(&file, &map, "A").as_deref(), Some(""));
    }

    #[test]
    fn test_trailing_doc_belongs_to_next_item() {
        let (file, map) = build("const A: u8 = 0; /// for b\nconst B: u8 = 1;\n");
        assert_eq!(comment_for(&file, &map, "A"), None);
        assert_eq!(comment_for(&file, &map, "B").as_deref(), Some("for b"));
    }

    #[test]
    fn test_comment_after_next_item_on_same_line() {
        let (file, map) = build("const A: u8 = 0; const B: u8 = 1; // b only\n");
        assert_eq!(comment_for(&file, &map, "A"), None);
        assert_eq!(comment_for(&file, &map, "B").as_deref(), Some("b only"));
    }

    #[test]
    fn test_block_comment_before_trailing_comment() {
        let (file, map) = build(
            "const A: u8 = 0; /* x */ // label a\nconst B: u8 = 1; /**/ /* y */ // b\n",
        );
        assert_eq!(comment_for(&file, &map, "A").as_deref(), Some("label a"));
        assert_eq!(comment_for(&file, &map, "B").as_deref(), Some("b"));
    }

    #[test]
    fn test_block_comment_alone_is_not_a_label() {
        let (_, map) = build("const A: u8 = 0; /* not a label */\n");
        assert!(map.is_empty());
    }

    #[test]
    fn test_multiline_item_uses_semicolon_line() {
        let source = "const A: u8 =\n    0; // on semi line\n";
        let (file, map) = build(source);
        assert_eq!(comment_for(&file, &map, "A").as_deref(), Some("on semi line"));
    }

    #[test]
    fn test_inner_doc_ignored() {
        let (_, map) = build("//! crate docs\nconst A: u8 = 0;\n");
        assert!(map.is_empty());
    }

    #[test]
    fn test_non_ascii_columns() {
        let (file, map) = build("const É: u8 = 0; // état\n");
        assert_eq!(comment_for(&file, &map, "É").as_deref(), Some("état"));
    }
}
