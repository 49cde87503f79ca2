//! Template rendering for the generated file.
//!
//! The template is fixed; only the type name, the package path and the
//! extracted declarations vary:
//!
//! ```text
//! // Code generated by "gml --type=Example"; DO NOT EDIT.
//!
//! use crate::status::{Example, ErrCode200, ErrCode400};
//!
//! #[allow(non_upper_case_globals)]
//! pub const ExampleMapper: &[(Example, &str)] = &[(ErrCode200, "request ok"), (ErrCode400, "request not found")];
//!
//! #[allow(non_upper_case_globals)]
//! pub const ExampleList: &[Example] = &[ErrCode200, ErrCode400];
//! ```
//!
//! The output is a single-line token stream; [`crate::format`] makes it
//! readable.

use proc_macro2::{Ident, Literal, TokenStream};
use quote::{format_ident, quote};
use syn::Path;

use crate::error::{GmlError, GmlResult};
use crate::extract::ExtractionResult;

/// Tool name written into the generated-file marker.
pub const GENERATOR: &str = "gml";

/// Builtin types that are never imported from the package.
const PRIMITIVES: &[&str] = &[
    "bool", "char", "str", "u8", "u16", "u32", "u64", "u128", "usize", "i8", "i16", "i32", "i64",
    "i128", "isize", "f32", "f64",
];

/// Everything the template needs for one invocation.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Target type name
    pub type_name: &'a str,
    /// Module path the type and constants are imported from
    pub package: &'a str,
    /// Extracted declarations
    pub result: &'a ExtractionResult,
}

impl<'a> RenderContext<'a> {
    pub fn new(type_name: &'a str, package: &'a str, result: &'a ExtractionResult) -> Self {
        Self {
            type_name,
            package,
            result,
        }
    }
}

/// First line of every generated file.
pub fn marker_line(type_name: &str) -> String {
    format!(
        "// Code generated by \"{} --type={}\"; DO NOT EDIT.",
        GENERATOR, type_name
    )
}

fn ident(kind: &str, value: &str) -> GmlResult<Ident> {
    syn::parse_str::<Ident>(value)
        .map_err(|e| GmlError::render(format!("invalid {} `{}`: {}", kind, value, e)))
}

/// Renders the generated file as raw (unformatted) text.
pub fn render(ctx: &RenderContext<'_>) -> GmlResult<String> {
    let ty = ident("type name", ctx.type_name)?;
    let package: Path = syn::parse_str(ctx.package)
        .map_err(|e| GmlError::render(format!("invalid package path `{}`: {}", ctx.package, e)))?;

    let names = ctx
        .result
        .names()
        .map(|n| ident("constant name", n))
        .collect::<GmlResult<Vec<_>>>()?;
    let labels: Vec<Literal> = ctx
        .result
        .entries()
        .map(|(_, label)| Literal::string(label))
        .collect();

    let mut imports: Vec<&Ident> = Vec::with_capacity(names.len() + 1);
    if !PRIMITIVES.contains(&ctx.type_name) {
        imports.push(&ty);
    }
    imports.extend(names.iter());

    let mapper = format_ident!("{}Mapper", ty);
    let list = format_ident!("{}List", ty);

    let body: TokenStream = quote! {
        use #package::{#(#imports),*};

        #[allow(non_upper_case_globals)]
        pub const #mapper: &[(#ty, &str)] = &[#((#names, #labels)),*];

        #[allow(non_upper_case_globals)]
        pub const #list: &[#ty] = &[#(#names),*];
    };

    Ok(format!("{}\n\n{}\n", marker_line(ctx.type_name), body))
}
