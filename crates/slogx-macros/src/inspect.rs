//! Expansion of `#[derive(Inspect)]`.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{Data, DataEnum, DeriveInput, Fields, Ident, Path};

use crate::attr::{ContainerAttrs, MemberAttrs};

#[allow(clippy::redundant_pub_crate)]
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let ContainerAttrs { krate } = ContainerAttrs::from_attrs(&input.attrs)?;
    let name = &input.ident;

    let mut generics = input.generics.clone();
    for param in generics.type_params_mut() {
        param.bounds.push(syn::parse_quote!(#krate::Inspect));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let body = match &input.data {
        Data::Struct(data) => expand_fields(&krate, &data.fields, &FieldAccess::SelfField)?,
        Data::Enum(data) => expand_enum(&krate, data)?,
        Data::Union(_) => {
            let placeholder = format!("<union {name}>");
            quote! {
                let _ = inspector;
                #krate::__private::Value::String(::std::string::String::from(#placeholder))
            }
        }
    };

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics #krate::Inspect for #name #ty_generics #where_clause {
            const AGGREGATE: bool = true;

            fn inspect(
                &self,
                inspector: &mut #krate::Inspector,
            ) -> #krate::__private::Value {
                #body
            }
        }
    })
}

/// How generated code reaches the value of a field.
enum FieldAccess {
    /// `self.field` / `self.0` on structs.
    SelfField,
    /// Bindings introduced by a variant pattern.
    Bound,
}

/// Binding name used for the field at `index` inside variant patterns.
fn binding(index: usize) -> Ident {
    format_ident!("__field{}", index)
}

fn expand_fields(krate: &Path, fields: &Fields, access: &FieldAccess) -> syn::Result<TokenStream> {
    let value = quote!(#krate::__private::Value);
    let map = quote!(#krate::__private::Map);

    match fields {
        Fields::Named(named) => {
            let mut inserts = Vec::new();
            for (index, field) in named.named.iter().enumerate() {
                let attrs = MemberAttrs::from_attrs(&field.attrs)?;
                if attrs.skip {
                    continue;
                }
                let Some(ident) = field.ident.as_ref() else {
                    continue;
                };
                let key = attrs
                    .rename
                    .unwrap_or_else(|| ident.to_string().trim_start_matches("r#").to_string());
                let expr = match access {
                    FieldAccess::SelfField => quote!(&self.#ident),
                    FieldAccess::Bound => {
                        let bound = binding(index);
                        quote!(#bound)
                    }
                };
                inserts.push(quote! {
                    record.insert(::std::string::String::from(#key), inspector.inspect(#expr));
                });
            }
            if inserts.is_empty() {
                return Ok(quote! {
                    let _ = inspector;
                    #value::Object(#map::new())
                });
            }
            Ok(quote! {
                let mut record = #map::new();
                #(#inserts)*
                #value::Object(record)
            })
        }
        Fields::Unnamed(unnamed) => {
            let mut items = Vec::new();
            for (index, field) in unnamed.unnamed.iter().enumerate() {
                let attrs = MemberAttrs::from_attrs(&field.attrs)?;
                if attrs.skip {
                    continue;
                }
                let expr = match access {
                    FieldAccess::SelfField => {
                        let member = syn::Index::from(index);
                        quote!(&self.#member)
                    }
                    FieldAccess::Bound => {
                        let bound = binding(index);
                        quote!(#bound)
                    }
                };
                items.push(quote!(inspector.inspect(#expr)));
            }
            match (unnamed.unnamed.len(), items.len()) {
                (_, 0) => Ok(quote! {
                    let _ = inspector;
                    #value::Array(::std::vec::Vec::new())
                }),
                (1, 1) => Ok(items.remove(0)),
                _ => Ok(quote!(#value::Array(::std::vec![#(#items),*]))),
            }
        }
        Fields::Unit => Ok(quote! {
            let _ = inspector;
            #value::Object(#map::new())
        }),
    }
}

fn expand_enum(krate: &Path, data: &DataEnum) -> syn::Result<TokenStream> {
    let value = quote!(#krate::__private::Value);
    let map = quote!(#krate::__private::Map);

    if data.variants.is_empty() {
        return Ok(quote! {
            let _ = inspector;
            match *self {}
        });
    }

    let mut arms = Vec::new();
    for variant in &data.variants {
        let attrs = MemberAttrs::from_attrs(&variant.attrs)?;
        if attrs.skip {
            return Err(syn::Error::new_spanned(
                &variant.ident,
                "`skip` is not supported on enum variants",
            ));
        }
        let ident = &variant.ident;
        let label = attrs.rename.unwrap_or_else(|| ident.to_string());

        let arm = match &variant.fields {
            Fields::Unit => quote! {
                Self::#ident => {
                    let _ = &inspector;
                    #value::String(::std::string::String::from(#label))
                }
            },
            Fields::Named(named) => {
                let mut bindings = Vec::new();
                for (index, field) in named.named.iter().enumerate() {
                    let Some(field_ident) = field.ident.as_ref() else {
                        continue;
                    };
                    let bound = binding(index);
                    bindings.push(quote!(#field_ident: #bound));
                }
                let payload = expand_fields(krate, &variant.fields, &FieldAccess::Bound)?;
                quote! {
                    #[allow(unused_variables)]
                    Self::#ident { #(#bindings),* } => {
                        let payload = { #payload };
                        let mut outer = #map::new();
                        outer.insert(::std::string::String::from(#label), payload);
                        #value::Object(outer)
                    }
                }
            }
            Fields::Unnamed(unnamed) => {
                let bindings = (0..unnamed.unnamed.len()).map(binding);
                let payload = expand_fields(krate, &variant.fields, &FieldAccess::Bound)?;
                quote! {
                    #[allow(unused_variables)]
                    Self::#ident ( #(#bindings),* ) => {
                        let payload = { #payload };
                        let mut outer = #map::new();
                        outer.insert(::std::string::String::from(#label), payload);
                        #value::Object(outer)
                    }
                }
            }
        };
        arms.push(arm);
    }

    Ok(quote! {
        match self {
            #(#arms)*
        }
    })
}
