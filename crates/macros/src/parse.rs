//! Attribute parsing for the marker macros

use darling::ast::NestedMeta;
use darling::FromMeta;
use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::{Expr, ExprLit, ExprUnary, Lit, UnOp};

/// Numeric bound: integer, float, negated literal or a numeric string
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Number(pub f64);

impl FromMeta for Number {
    fn from_expr(expr: &Expr) -> darling::Result<Self> {
        match expr {
            Expr::Lit(ExprLit { lit, .. }) => Self::from_value(lit),
            Expr::Unary(ExprUnary {
                op: UnOp::Neg(_),
                expr,
                ..
            }) => Self::from_expr(expr).map(|n| Number(-n.0)),
            Expr::Group(group) => Self::from_expr(&group.expr),
            Expr::Paren(paren) => Self::from_expr(&paren.expr),
            _ => Err(darling::Error::unexpected_expr_type(expr)),
        }
    }

    fn from_value(lit: &Lit) -> darling::Result<Self> {
        let parsed = match lit {
            Lit::Int(int) => int.base10_parse::<f64>().map_err(darling::Error::from),
            Lit::Float(float) => float.base10_parse::<f64>().map_err(darling::Error::from),
            Lit::Str(s) => s
                .value()
                .trim()
                .parse::<f64>()
                .map_err(|_| darling::Error::unknown_value(&s.value())),
            _ => Err(darling::Error::unexpected_lit_type(lit)),
        };
        parsed.map(Number).map_err(|e| e.with_span(lit))
    }
}

impl Number {
    /// Tokens for an `f64` expression; `None` is the NaN sentinel
    pub fn tokens(value: Option<Number>) -> TokenStream {
        match value {
            Some(Number(v)) if v.is_finite() => {
                let lit = Literal::f64_suffixed(v.abs());
                if v.is_sign_negative() {
                    quote! { -#lit }
                } else {
                    quote! { #lit }
                }
            }
            _ => quote! { ::core::primitive::f64::NAN },
        }
    }
}

/// `#[tweak(...)]`
#[derive(Debug, Default, FromMeta)]
pub struct TweakArgs {
    pub label: Option<String>,
    pub category: Option<String>,
    pub min: Option<Number>,
    pub max: Option<Number>,
    /// Change hook name on the owner
    pub on_changed: Option<String>,
    /// Owner name (default: the module path)
    pub owner: Option<String>,
    /// Member name (default: the static's identifier)
    pub name: Option<String>,
}

/// `#[tweak_action(...)]`
#[derive(Debug, Default, FromMeta)]
pub struct ActionArgs {
    pub label: Option<String>,
    pub category: Option<String>,
    pub owner: Option<String>,
    pub name: Option<String>,
}

/// `#[tweak_actions(...)]` on an impl block
#[derive(Debug, Default, FromMeta)]
pub struct ActionsArgs {
    /// Owner name (default: module path plus the type name)
    pub owner: Option<String>,
    /// Category for actions that do not name one
    pub category: Option<String>,
}

/// `#[tweak_hook(...)]`
#[derive(Debug, Default, FromMeta)]
pub struct HookArgs {
    pub owner: Option<String>,
    pub name: Option<String>,
}

/// Parse attribute arguments into one of the structs above
pub fn parse_args<T: FromMeta>(attr: TokenStream) -> darling::Result<T> {
    let items = NestedMeta::parse_meta_list(attr)?;
    T::from_list(&items)
}

/// `Some(Cow::Borrowed("..."))` or `None`
pub fn cow_option(value: &Option<String>) -> TokenStream {
    match value {
        Some(s) => quote! { ::core::option::Option::Some(::std::borrow::Cow::Borrowed(#s)) },
        None => quote! { ::core::option::Option::None },
    }
}

/// `Cow::Borrowed(<expr>)`
pub fn cow(expr: TokenStream) -> TokenStream {
    quote! { ::std::borrow::Cow::Borrowed(#expr) }
}

/// Literal owner, or the module path of the call site
pub fn owner_expr(owner: &Option<String>) -> TokenStream {
    match owner {
        Some(owner) => quote! { #owner },
        None => quote! { ::core::module_path!() },
    }
}
