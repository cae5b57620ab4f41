//! TweakEnum derive macro implementation

use darling::{FromDeriveInput, FromVariant};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Ident};

/// Parsed enum; only fieldless variants are accepted
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(tweak_enum), supports(enum_unit))]
struct TweakEnumArgs {
    ident: Ident,
    generics: syn::Generics,
    data: darling::ast::Data<TweakVariant, ()>,

    /// Override the reported type name (default: module path plus the ident)
    #[darling(default)]
    type_name: Option<String>,
}

#[derive(Debug, FromVariant)]
#[darling(attributes(tweak_enum))]
struct TweakVariant {
    ident: Ident,

    /// Name used on the wire instead of the variant identifier
    #[darling(default)]
    rename: Option<String>,
}

/// Generate TweakEnum, TweakScalar and TweakShape impls
pub fn derive_tweak_enum(input: DeriveInput) -> TokenStream {
    match TweakEnumArgs::from_derive_input(&input) {
        Ok(args) => generate_impl(args),
        Err(e) => e.write_errors(),
    }
}

fn generate_impl(args: TweakEnumArgs) -> TokenStream {
    let ident = &args.ident;

    if !args.generics.params.is_empty() {
        return syn::Error::new_spanned(&args.generics, "TweakEnum cannot be derived for generic enums")
            .to_compile_error();
    }

    let variants = match args.data {
        darling::ast::Data::Enum(variants) => variants,
        darling::ast::Data::Struct(_) => {
            return syn::Error::new_spanned(ident, "TweakEnum can only be derived for enums")
                .to_compile_error()
        }
    };

    if variants.is_empty() {
        return syn::Error::new_spanned(ident, "TweakEnum needs at least one variant")
            .to_compile_error();
    }

    let type_name = match &args.type_name {
        Some(name) => quote! { #name },
        None => quote! { ::core::concat!(::core::module_path!(), "::", ::core::stringify!(#ident)) },
    };

    let variant_idents: Vec<_> = variants.iter().map(|v| &v.ident).collect();
    let variant_names: Vec<String> = variants
        .iter()
        .map(|v| v.rename.clone().unwrap_or_else(|| v.ident.to_string()))
        .collect();

    quote! {
        impl ::livetweak_core::coerce::TweakEnum for #ident {
            const TYPE_NAME: &'static str = #type_name;
            const VARIANTS: &'static [Self] = &[#(Self::#variant_idents),*];

            fn name(&self) -> &'static str {
                match self {
                    #(Self::#variant_idents => #variant_names,)*
                }
            }
        }

        impl ::livetweak_core::coerce::TweakScalar for #ident {
            const KIND: ::livetweak_core::sdk::ValueKind = ::livetweak_core::sdk::ValueKind::Enum;

            fn type_name() -> &'static str {
                <Self as ::livetweak_core::coerce::TweakEnum>::TYPE_NAME
            }

            fn parse_value(s: &str) -> ::core::option::Option<Self> {
                ::livetweak_core::coerce::parse_enum(s)
            }

            fn to_string_value(&self) -> ::std::string::String {
                ::livetweak_core::coerce::TweakEnum::name(self).to_string()
            }

            fn enum_type() -> ::core::option::Option<&'static str> {
                ::core::option::Option::Some(<Self as ::livetweak_core::coerce::TweakEnum>::TYPE_NAME)
            }
        }

        impl ::livetweak_core::slot::TweakShape for #ident {
            fn erase<S>(storage: S) -> ::livetweak_core::slot::ErasedMember
            where
                S: ::livetweak_core::slot::Storage<Self> + 'static,
            {
                ::livetweak_core::slot::ErasedMember::scalar::<Self, S>(storage)
            }
        }
    }
}
