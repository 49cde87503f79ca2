//! Canonical formatting of rendered source.
//!
//! syn drops plain `//` comments, so the leading comment block (the
//! generated-file marker) is split off, the rest is parsed and pretty-printed
//! with prettyplease, and the header is put back on top.

use std::fmt;

use tracing::debug;

use crate::error::{GmlError, GmlResult};

/// Formatted generated file, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSource {
    content: String,
}

impl GeneratedSource {
    pub fn as_str(&self) -> &str {
        &self.content
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }

    pub fn into_string(self) -> String {
        self.content
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

impl fmt::Display for GeneratedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.content)
    }
}

fn is_plain_comment(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("//") && !line.starts_with("///") && !line.starts_with("//!")
}

/// Splits leading plain `//` comment lines (and the blank lines after them)
/// from the body. Returns the header lines, the body and the number of lines
/// consumed.
fn split_header(raw: &str) -> (Vec<&str>, &str, usize) {
    let mut header = Vec::new();
    let mut consumed = 0;
    let mut offset = 0;

    for line in raw.split_inclusive('\n') {
        let text = line.trim_end_matches(['\n', '\r']);
        if is_plain_comment(text) {
            header.push(text.trim_end());
        } else if !text.trim().is_empty() {
            break;
        }
        consumed += 1;
        offset += line.len();
    }

    (header, &raw[offset..], consumed)
}

/// Validates `raw` as Rust and prints it in canonical style.
///
/// Fails with [`GmlError::MalformedOutput`] if the text does not parse.
pub fn format_source(raw: &str) -> GmlResult<GeneratedSource> {
    let (header, body, consumed) = split_header(raw);

    let file = syn::parse_file(body).map_err(|e| {
        let start = e.span().start();
        if start.line == 0 {
            GmlError::malformed(e.to_string(), None, None)
        } else {
            GmlError::malformed(
                e.to_string(),
                Some(start.line + consumed),
                Some(start.column + 1),
            )
        }
    })?;

    let pretty = prettyplease::unparse(&file);

    let mut content = String::with_capacity(raw.len() + pretty.len());
    for line in &header {
        content.push_str(line);
        content.push('\n');
    }
    if !header.is_empty() {
        content.push('\n');
    }
    content.push_str(pretty.trim_end());
    content.push('\n');

    debug!(bytes = content.len(), header_lines = header.len(), "formatted source");
    Ok(GeneratedSource { content })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = "// Code generated by \"gml --type=Color\"; DO NOT EDIT.\n\n\
        use super :: { Color , RED , BLUE } ; \
        # [allow (non_upper_case_globals)] pub const ColorMapper : & [(Color , & str)] = & [(RED , \"red\") , (BLUE , \"blue\")] ; \
        # [allow (non_upper_case_globals)] pub const ColorList : & [Color] = & [RED , BLUE] ;\n";

    #[test]
    fn test_header_preserved() {
        let out = format_source(RAW).unwrap();
        let mut lines = out.as_str().lines();
        assert_eq!(
            lines.next(),
            Some("// Code generated by \"gml --type=Color\"; DO NOT EDIT.")
        );
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("use super::{Color, RED, BLUE};"));
    }

    #[test]
    fn test_canonical_style() {
        let out = format_source(RAW).unwrap();
        assert!(out.as_str().contains("pub const ColorList: &[Color] = &[RED, BLUE];"));
        assert!(out.as_str().contains("#[allow(non_upper_case_globals)]"));
        assert!(out.as_str().ends_with(";\n"));
        assert!(!out.as_str().ends_with("\n\n"));
    }

    #[test]
    fn test_idempotent() {
        let once = format_source(RAW).unwrap();
        let twice = format_source(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_malformed_output() {
        let raw = "// header\n\npub const A: &[Color] = ;\n";
        let err = format_source(raw).unwrap_err();
        match err {
            GmlError::MalformedOutput { line, .. } => assert_eq!(line, Some(3)),
            other => panic!("expected malformed output, got {:?}", other),
        }
    }

    #[test]
    fn test_doc_comments_are_body() {
        let (header, body, consumed) = split_header("// a\n//! crate doc\nconst A: u8 = 0;\n");
        assert_eq!(header, vec!["// a"]);
        assert!(body.starts_with("//! crate doc"));
        assert_eq!(consumed, 1);
    }

    #[test]
    fn test_no_header() {
        let out = format_source("const A : u8 = 0 ;").unwrap();
        assert_eq!(out.as_str(), "const A: u8 = 0;\n");
    }
}
