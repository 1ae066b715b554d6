//! Small helpers for reading attribute arguments with `syn`.

use syn::meta::ParseNestedMeta;
use syn::{Attribute, Expr, ExprArray, Lit, LitStr, Token};

/// Whether the attribute's last path segment is `name`, so that both
/// `#[kafka_listener]` and `#[kafka::kafka_listener]` match.
pub fn attr_named(attr: &Attribute, name: &str) -> bool {
    attr.path()
        .segments
        .last()
        .is_some_and(|segment| segment.ident == name)
}

/// Finds the first attribute named `name`.
pub fn find_attr<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|attr| attr_named(attr, name))
}

/// Consumes the value of a nested meta item nobody asked for: `key = expr` or `key(...)`.
pub fn skip_meta_value(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<Expr>()?;
    } else if meta.input.peek(syn::token::Paren) {
        meta.input.parse::<proc_macro2::TokenTree>()?;
    }
    Ok(())
}

/// Parses `key = "a"` or `key = ["a", "b"]` into a list of strings.
pub fn parse_string_list(meta: &ParseNestedMeta) -> syn::Result<Vec<String>> {
    let value = meta.value()?;
    if value.peek(syn::token::Bracket) {
        let array: ExprArray = value.parse()?;
        array
            .elems
            .iter()
            .map(|elem| match elem {
                Expr::Lit(expr_lit) => match &expr_lit.lit {
                    Lit::Str(lit) => Ok(lit.value()),
                    other => Err(syn::Error::new_spanned(other, "expected a string literal")),
                },
                other => Err(syn::Error::new_spanned(other, "expected a string literal")),
            })
            .collect()
    } else {
        let lit: LitStr = value.parse()?;
        Ok(vec![lit.value()])
    }
}
