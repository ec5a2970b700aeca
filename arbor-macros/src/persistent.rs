//! `#[derive(Persistent)]`.
//!
//! Generates `PersistentState` for a struct with named fields:
//!
//! - `#[persistent]` declares a field as a persistent property, named after
//!   the field; `#[persistent(rename = "camelName")]` overrides the name.
//!   Only `pub` fields are eligible; others are declared restricted.
//! - `#[inherit]` on at most one field delegates unknown names to it, for
//!   components that embed their base component.

use proc_macro::TokenStream;
use quote::quote;
use syn::{
    Data, DeriveInput, Fields, Ident, LitStr, Type, Visibility, parse_macro_input,
    spanned::Spanned,
};

struct PersistentField {
    ident: Ident,
    name: String,
    ty: Type,
    public: bool,
}

/// Derive macro implementation for `PersistentState`.
pub fn derive_persistent_impl(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match expand(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

fn expand(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "Persistent can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Persistent can only be derived for structs",
            ));
        }
    };

    let mut persistent = Vec::new();
    let mut inherit: Option<Ident> = None;

    for field in fields {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        for attr in &field.attrs {
            if attr.path().is_ident("inherit") {
                if inherit.is_some() {
                    return Err(syn::Error::new(
                        attr.span(),
                        "only one field can be marked #[inherit]",
                    ));
                }
                inherit = Some(ident.clone());
            } else if attr.path().is_ident("persistent") {
                let mut rename = None;
                if !matches!(attr.meta, syn::Meta::Path(_)) {
                    attr.parse_nested_meta(|meta| {
                        if meta.path.is_ident("rename") {
                            let lit: LitStr = meta.value()?.parse()?;
                            rename = Some(lit.value());
                            Ok(())
                        } else {
                            Err(meta.error("expected `rename = \"...\"`"))
                        }
                    })?;
                }
                persistent.push(PersistentField {
                    name: rename.unwrap_or_else(|| ident.to_string()),
                    ident: ident.clone(),
                    ty: field.ty.clone(),
                    public: matches!(field.vis, Visibility::Public(_)),
                });
            }
        }
    }

    let descriptors = persistent.iter().map(|field| {
        let prop = &field.name;
        let ty = &field.ty;
        let access = if field.public {
            quote! { ::arbor::Access::Public }
        } else {
            quote! { ::arbor::Access::Restricted }
        };
        quote! {
            ::arbor::PropertyDescriptor::persistent(#prop)
                .access(#access)
                .value_type(::core::stringify!(#ty))
        }
    });

    let getters = persistent.iter().map(|field| {
        let prop = &field.name;
        let ident = &field.ident;
        quote! {
            #prop => ::core::option::Option::Some(::arbor::PropertyValue::to_value(&self.#ident)),
        }
    });

    let setters = persistent.iter().map(|field| {
        let prop = &field.name;
        let ident = &field.ident;
        let ty = &field.ty;
        quote! {
            #prop => {
                self.#ident = <#ty as ::arbor::PropertyValue>::from_value(value)?;
                ::core::result::Result::Ok(true)
            }
        }
    });

    let checks = persistent.iter().map(|field| {
        let prop = &field.name;
        let ty = &field.ty;
        quote! {
            #prop => <#ty as ::arbor::PropertyValue>::from_value(::core::clone::Clone::clone(value))
                .map(|_| true),
        }
    });

    let (get_fallback, set_fallback, check_fallback) = match &inherit {
        Some(base) => (
            quote! { ::arbor::PersistentState::property(&self.#base, name) },
            quote! { ::arbor::PersistentState::set_property(&mut self.#base, name, value) },
            quote! { ::arbor::PersistentState::check_property(&self.#base, name, value) },
        ),
        None => (
            quote! { ::core::option::Option::None },
            quote! {
                {
                    let _ = value;
                    ::core::result::Result::Ok(false)
                }
            },
            quote! {
                {
                    let _ = value;
                    ::core::result::Result::Ok(false)
                }
            },
        ),
    };

    Ok(quote! {
        impl #impl_generics ::arbor::PersistentState for #name #ty_generics #where_clause {
            fn properties() -> ::std::vec::Vec<::arbor::PropertyDescriptor> {
                ::std::vec![#(#descriptors),*]
            }

            fn property(&self, name: &str) -> ::core::option::Option<::arbor::Value> {
                match name {
                    #(#getters)*
                    _ => #get_fallback,
                }
            }

            fn set_property(
                &mut self,
                name: &str,
                value: ::arbor::Value,
            ) -> ::core::result::Result<bool, ::arbor::ValueError> {
                match name {
                    #(#setters)*
                    _ => #set_fallback,
                }
            }

            fn check_property(
                &self,
                name: &str,
                value: &::arbor::Value,
            ) -> ::core::result::Result<bool, ::arbor::ValueError> {
                match name {
                    #(#checks)*
                    _ => #check_fallback,
                }
            }
        }
    })
}
