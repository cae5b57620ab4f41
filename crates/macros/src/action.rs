//! `#[tweak_action]` and `#[tweak_actions]` implementation

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{FnArg, ImplItem, ImplItemFn, ItemFn, ItemImpl, Signature, Type};

use crate::parse::{cow, cow_option, owner_expr, ActionArgs, ActionsArgs};

const ACTION_ATTR: &str = "tweak_action";

/// Actions take no arguments and are plain synchronous functions
fn check_signature(sig: &Signature, allow_receiver: bool) -> syn::Result<()> {
    if sig.asyncness.is_some() {
        return Err(syn::Error::new_spanned(sig.asyncness, "actions cannot be async"));
    }
    if !sig.generics.params.is_empty() {
        return Err(syn::Error::new_spanned(&sig.generics, "actions cannot be generic"));
    }
    for input in &sig.inputs {
        match input {
            FnArg::Receiver(receiver) if allow_receiver => {
                if receiver.reference.is_none() || receiver.mutability.is_some() {
                    return Err(syn::Error::new_spanned(
                        receiver,
                        "action methods must take `&self`",
                    ));
                }
            }
            FnArg::Receiver(receiver) => {
                return Err(syn::Error::new_spanned(
                    receiver,
                    "put #[tweak_actions] on the impl block to mark methods",
                ));
            }
            FnArg::Typed(arg) => {
                return Err(syn::Error::new_spanned(arg, "actions take no arguments"));
            }
        }
    }
    Ok(())
}

fn registration(
    args: &ActionArgs,
    owner: TokenStream,
    default_name: String,
    default_category: &Option<String>,
    action_fn: &syn::Ident,
) -> TokenStream {
    let name = args.name.clone().unwrap_or(default_name);
    let name = cow(quote! { #name });
    let owner = cow(owner);
    let label = cow_option(&args.label);
    let category = cow_option(&args.category.clone().or_else(|| default_category.clone()));

    quote! {
        ::livetweak_core::inventory::submit! {
            ::livetweak_core::marker::TweakRegistration::Action {
                marker: ::livetweak_core::marker::ActionMarker {
                    owner: #owner,
                    name: #name,
                    label: #label,
                    category: #category,
                },
                action: #action_fn,
            }
        }
    }
}

/// Generate the `#[tweak_action]` expansion for a free function
pub fn generate_action(args: ActionArgs, func: ItemFn) -> TokenStream {
    if let Err(e) = check_signature(&func.sig, false) {
        return e.to_compile_error();
    }

    let fn_name = &func.sig.ident;
    let action_fn = format_ident!("__livetweak_action_{}", fn_name);
    let submit = registration(
        &args,
        owner_expr(&args.owner),
        fn_name.to_string(),
        &None,
        &action_fn,
    );

    quote! {
        #func

        #[doc(hidden)]
        #[allow(non_snake_case)]
        fn #action_fn() -> ::livetweak_core::action::ActionResult {
            ::livetweak_core::action::run(#fn_name)
        }

        #submit
    }
}

/// Generate the `#[tweak_actions]` expansion for an impl block
///
/// Every method marked `#[tweak_action]` becomes an action on the type.
/// `&self` methods resolve their receiver through `ActionOwner`.
pub fn generate_actions(args: ActionsArgs, mut item: ItemImpl) -> TokenStream {
    if !item.generics.params.is_empty() {
        return syn::Error::new_spanned(&item.generics, "#[tweak_actions] impl blocks cannot be generic")
            .to_compile_error();
    }
    if let Some((_, path, _)) = &item.trait_ {
        return syn::Error::new_spanned(path, "#[tweak_actions] goes on an inherent impl block")
            .to_compile_error();
    }

    let self_ty = item.self_ty.clone();
    let type_ident = match type_ident(&self_ty) {
        Some(ident) => ident,
        None => {
            return syn::Error::new_spanned(&self_ty, "#[tweak_actions] needs a named type")
                .to_compile_error()
        }
    };

    let owner = match &args.owner {
        Some(owner) => quote! { #owner },
        None => quote! { ::core::concat!(::core::module_path!(), "::", ::core::stringify!(#type_ident)) },
    };

    let mut generated = Vec::new();
    for impl_item in item.items.iter_mut() {
        let ImplItem::Fn(method) = impl_item else {
            continue;
        };
        match take_action_args(method) {
            Ok(Some(action_args)) => {
                generated.push(generate_method_action(
                    &action_args,
                    &args,
                    &owner,
                    &self_ty,
                    &type_ident,
                    method,
                ));
            }
            Ok(None) => {}
            Err(e) => generated.push(e.write_errors()),
        }
    }

    quote! {
        #item

        #(#generated)*
    }
}

/// Remove a `#[tweak_action]` attribute from a method and parse its arguments
fn take_action_args(method: &mut ImplItemFn) -> darling::Result<Option<ActionArgs>> {
    let Some(position) = method
        .attrs
        .iter()
        .position(|attr| attr.path().is_ident(ACTION_ATTR))
    else {
        return Ok(None);
    };

    let attr = method.attrs.remove(position);
    let args = match &attr.meta {
        syn::Meta::Path(_) => ActionArgs::default(),
        syn::Meta::List(list) => crate::parse::parse_args(list.tokens.clone())?,
        syn::Meta::NameValue(nv) => {
            return Err(darling::Error::custom("expected #[tweak_action] or #[tweak_action(...)]")
                .with_span(nv))
        }
    };
    Ok(Some(args))
}

fn generate_method_action(
    args: &ActionArgs,
    impl_args: &ActionsArgs,
    owner: &TokenStream,
    self_ty: &Type,
    type_ident: &syn::Ident,
    method: &ImplItemFn,
) -> TokenStream {
    if let Err(e) = check_signature(&method.sig, true) {
        return e.to_compile_error();
    }

    let method_name = &method.sig.ident;
    let action_fn = format_ident!("__livetweak_action_{}_{}", type_ident, method_name);
    let has_receiver = matches!(method.sig.inputs.first(), Some(FnArg::Receiver(_)));

    let body = if has_receiver {
        quote! {
            let instance = ::livetweak_core::action::resolve_instance::<#self_ty>(#owner)?;
            ::livetweak_core::action::run(|| instance.#method_name())
        }
    } else {
        quote! {
            ::livetweak_core::action::run(<#self_ty>::#method_name)
        }
    };

    let owner = args
        .owner
        .as_ref()
        .map_or_else(|| owner.clone(), |explicit| quote! { #explicit });
    let submit = registration(
        args,
        owner,
        method_name.to_string(),
        &impl_args.category,
        &action_fn,
    );

    quote! {
        #[doc(hidden)]
        #[allow(non_snake_case)]
        fn #action_fn() -> ::livetweak_core::action::ActionResult {
            #body
        }

        #submit
    }
}

fn type_ident(ty: &Type) -> Option<syn::Ident> {
    match ty {
        Type::Path(path) => path.path.segments.last().map(|s| s.ident.clone()),
        Type::Group(group) => type_ident(&group.elem),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_action() {
        let func: ItemFn = syn::parse_quote! {
            fn reset_all() {}
        };
        let out = generate_action(ActionArgs::default(), func).to_string();
        assert!(out.contains("__livetweak_action_reset_all"));
        assert!(out.contains("\"reset_all\""));
    }

    #[test]
    fn test_action_with_arguments_rejected() {
        let func: ItemFn = syn::parse_quote! {
            fn spawn(count: i32) {}
        };
        let out = generate_action(ActionArgs::default(), func).to_string();
        assert!(out.contains("compile_error"));
    }

    #[test]
    fn test_impl_block_strips_markers() {
        let item: ItemImpl = syn::parse_quote! {
            impl Spawner {
                #[tweak_action(label = "Spawn Wave")]
                fn spawn_wave(&self) {}

                #[tweak_action]
                fn clear() {}

                fn helper(&self) {}
            }
        };
        let out = generate_actions(ActionsArgs::default(), item).to_string();
        assert!(!out.contains("# [tweak_action"));
        assert!(out.contains("__livetweak_action_Spawner_spawn_wave"));
        assert!(out.contains("__livetweak_action_Spawner_clear"));
        assert!(out.contains("resolve_instance"));
        assert!(!out.contains("__livetweak_action_Spawner_helper"));
    }

    #[test]
    fn test_mut_receiver_rejected() {
        let item: ItemImpl = syn::parse_quote! {
            impl Spawner {
                #[tweak_action]
                fn spawn_wave(&mut self) {}
            }
        };
        let out = generate_actions(ActionsArgs::default(), item).to_string();
        assert!(out.contains("compile_error"));
    }
}
