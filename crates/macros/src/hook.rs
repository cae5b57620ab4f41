//! `#[tweak_hook]` attribute macro implementation

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{FnArg, ItemFn, Type};

use crate::parse::{owner_expr, HookArgs};

/// Referenced type of a `&T` parameter
fn referenced(arg: &FnArg) -> syn::Result<&Type> {
    match arg {
        FnArg::Typed(pat) => match &*pat.ty {
            Type::Reference(reference) if reference.mutability.is_none() => Ok(&*reference.elem),
            other => Err(syn::Error::new_spanned(
                other,
                "hook parameters are shared references, e.g. `&f32`",
            )),
        },
        FnArg::Receiver(receiver) => Err(syn::Error::new_spanned(
            receiver,
            "hooks are free functions",
        )),
    }
}

fn is_str(ty: &Type) -> bool {
    matches!(ty, Type::Path(path) if path.qself.is_none() && path.path.is_ident("str"))
}

/// Pick the hook shape from the parameter list
fn hook_constructor(func: &ItemFn) -> syn::Result<TokenStream> {
    let fn_name = &func.sig.ident;
    let params = func
        .sig
        .inputs
        .iter()
        .map(referenced)
        .collect::<syn::Result<Vec<_>>>()?;

    if let Some(first) = params.first().filter(|_| params.len() >= 2) {
        if !is_str(first) {
            return Err(syn::Error::new_spanned(first, "the member parameter must be `&str`"));
        }
    }

    match params.as_slice() {
        [] => Ok(quote! { ::livetweak_core::callback::Hook::nullary(#fn_name) }),
        [value] => Ok(quote! { ::livetweak_core::callback::Hook::value::<#value, _>(#fn_name) }),
        [_, value] => Ok(quote! { ::livetweak_core::callback::Hook::member_value::<#value, _>(#fn_name) }),
        [_, key, value] => Ok(quote! {
            ::livetweak_core::callback::Hook::member_key_value::<#key, #value, _>(#fn_name)
        }),
        _ => Err(syn::Error::new_spanned(
            &func.sig.inputs,
            "hooks take (), (&value), (&str, &value) or (&str, &key, &value)",
        )),
    }
}

/// Generate the `#[tweak_hook]` expansion
pub fn generate_hook(args: HookArgs, func: ItemFn) -> TokenStream {
    let constructor = match hook_constructor(&func) {
        Ok(tokens) => tokens,
        Err(e) => return e.to_compile_error(),
    };

    let fn_name = &func.sig.ident;
    let hook_fn = format_ident!("__livetweak_hook_{}", fn_name);
    let owner = owner_expr(&args.owner);
    let name = args.name.clone().unwrap_or_else(|| fn_name.to_string());

    quote! {
        #func

        #[doc(hidden)]
        #[allow(non_snake_case)]
        fn #hook_fn() -> ::livetweak_core::callback::Hook {
            #constructor
        }

        ::livetweak_core::inventory::submit! {
            ::livetweak_core::marker::TweakRegistration::Hook {
                owner: #owner,
                name: #name,
                hook: #hook_fn,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(func: ItemFn) -> String {
        generate_hook(HookArgs::default(), func).to_string()
    }

    #[test]
    fn test_shapes() {
        assert!(expand(syn::parse_quote! { fn on_reset() {} }).contains("nullary"));
        assert!(expand(syn::parse_quote! { fn on_volume(v: &f32) {} }).contains(":: value :: < f32"));
        assert!(expand(syn::parse_quote! { fn on_named(m: &str, v: &f32) {} }).contains("member_value"));
        assert!(expand(syn::parse_quote! {
            fn on_key(m: &str, k: &String, v: &HashMap<String, String>) {}
        })
        .contains("member_key_value"));
    }

    #[test]
    fn test_bad_signatures() {
        assert!(expand(syn::parse_quote! { fn on_volume(v: f32) {} }).contains("compile_error"));
        assert!(expand(syn::parse_quote! { fn on_named(m: &String, v: &f32) {} }).contains("compile_error"));
        assert!(expand(syn::parse_quote! {
            fn on_many(a: &str, b: &i32, c: &i32, d: &i32) {}
        })
        .contains("compile_error"));
    }
}
