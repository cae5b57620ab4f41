//! `#[tweak]` attribute macro implementation

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ItemStatic;

use crate::parse::{cow, cow_option, owner_expr, Number, TweakArgs};

/// Generate the `#[tweak]` expansion
///
/// Keeps the static as written and submits a member registration that
/// erases it on first scan.
pub fn generate_tweak(args: TweakArgs, item: ItemStatic) -> TokenStream {
    if let syn::StaticMutability::Mut(token) = &item.mutability {
        return syn::Error::new_spanned(token, "#[tweak] statics must not be `mut`; use a TweakCell")
            .to_compile_error();
    }

    let ident = &item.ident;
    let member_fn = format_ident!("__livetweak_member_{}", ident);

    let name = args.name.clone().unwrap_or_else(|| ident.to_string());
    let owner = cow(owner_expr(&args.owner));
    let name = cow(quote! { #name });
    let label = cow_option(&args.label);
    let category = cow_option(&args.category);
    let on_changed = cow_option(&args.on_changed);
    let min = Number::tokens(args.min);
    let max = Number::tokens(args.max);

    quote! {
        #item

        #[doc(hidden)]
        #[allow(non_snake_case)]
        fn #member_fn() -> ::livetweak_core::slot::ErasedMember {
            ::livetweak_core::slot::erase_static(&#ident)
        }

        ::livetweak_core::inventory::submit! {
            ::livetweak_core::marker::TweakRegistration::Member {
                marker: ::livetweak_core::marker::MemberMarker {
                    owner: #owner,
                    name: #name,
                    label: #label,
                    category: #category,
                    min: #min,
                    max: #max,
                    on_changed: #on_changed,
                },
                member: #member_fn,
            }
        }
    }
}
