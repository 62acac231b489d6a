//! `Record` derive expansion.
//!
//! The derive emits a `Record` impl holding a static descriptor table and
//! an index-to-field accessor, plus a `BindField` impl so the type can be
//! nested in other records.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Path};

use crate::parse::{RecordField, RecordInput};

/// Expands `#[derive(Record)]`.
pub fn expand_record(input: DeriveInput) -> syn::Result<TokenStream> {
    let parsed = RecordInput::parse(&input)?;
    let krate = &parsed.attrs.krate;

    let name = &input.ident;
    let name_str = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let mut where_clause = where_clause.cloned();
    if !input.generics.params.is_empty() {
        let predicates = &mut where_clause
            .get_or_insert_with(|| syn::parse_quote!(where))
            .predicates;
        for field in &parsed.fields {
            let ty = &field.ty;
            predicates.push(syn::parse_quote!(#ty: #krate::BindField));
        }
    }

    let field_count = parsed.fields.len();
    let descriptors = parsed.fields.iter().map(|field| field_descriptor(krate, field));
    let accessors = parsed.fields.iter().enumerate().map(|(index, field)| {
        let ident = &field.ident;
        quote! { #index => ::core::option::Option::Some(&mut self.#ident), }
    });

    let record_impl = quote! {
        impl #impl_generics #krate::Record for #name #ty_generics #where_clause {
            fn descriptor(&self) -> &'static #krate::RecordDescriptor {
                static FIELDS: [#krate::FieldDescriptor; #field_count] = [#(#descriptors),*];
                static DESCRIPTOR: #krate::RecordDescriptor =
                    #krate::RecordDescriptor::new(#name_str, &FIELDS);
                &DESCRIPTOR
            }

            #[allow(clippy::match_single_binding)]
            fn field_mut(
                &mut self,
                index: usize,
            ) -> ::core::option::Option<&mut dyn #krate::BindField> {
                match index {
                    #(#accessors)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };

    // A type that parses itself gets its `BindField` impl from `UnmarshalParam`.
    let bind_field_impl = if parsed.attrs.unmarshal {
        TokenStream::new()
    } else {
        quote! {
            impl #impl_generics #krate::BindField for #name #ty_generics #where_clause {
                fn kind(&self) -> #krate::FieldKind {
                    #krate::FieldKind::Record
                }

                fn bind_values(
                    &mut self,
                    values: &#krate::ParamValues,
                    _field: &#krate::FieldDescriptor,
                ) -> ::core::result::Result<(), #krate::TokenError> {
                    ::core::result::Result::Err(#krate::TokenError::new(
                        values.first(),
                        #krate::ConvertError::UnsupportedKind {
                            kind: #krate::FieldKind::Record,
                        },
                    ))
                }

                fn as_record(&mut self) -> ::core::option::Option<&mut dyn #krate::Record> {
                    ::core::option::Option::Some(self)
                }
            }
        }
    };

    Ok(quote! {
        #record_impl
        #bind_field_impl
    })
}

fn field_descriptor(krate: &Path, field: &RecordField) -> TokenStream {
    let name = field.ident.to_string();
    let attrs = &field.attrs;

    let mut tokens = quote! { #krate::FieldDescriptor::new(#name) };
    if let Some(query) = &attrs.query {
        tokens = quote! { #tokens.query(#query) };
    }
    if let Some(form) = &attrs.form {
        tokens = quote! { #tokens.form(#form) };
    }
    if let Some(format) = &attrs.time_format {
        tokens = quote! { #tokens.time_format(#format) };
    }
    if attrs.time_utc {
        tokens = quote! { #tokens.time_utc() };
    }
    if let Some(location) = &attrs.time_location {
        tokens = quote! { #tokens.time_location(#location) };
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;
    use syn::parse_quote;

    fn expand(input: DeriveInput) -> String {
        expand_record(input).unwrap().to_string()
    }

    #[test]
    fn test_expands_descriptor_table() {
        let out = expand(parse_quote! {
            struct Search {
                #[bind(query = "q", form = "term")]
                term: String,
                #[bind(skip)]
                cache: Vec<u8>,
                page: u32,
            }
        });

        assert!(out.contains("FieldDescriptor ; 2usize"));
        assert!(out.contains("FieldDescriptor :: new (\"term\") . query (\"q\") . form (\"term\")"));
        assert!(out.contains("FieldDescriptor :: new (\"page\")"));
        assert!(!out.contains("cache"));
        assert!(out.contains("RecordDescriptor :: new (\"Search\" , & FIELDS)"));
    }

    #[test]
    fn test_expands_time_annotations() {
        let out = expand(parse_quote! {
            struct Event {
                #[bind(time_format = "%Y-%m-%d", time_utc, time_location = "Europe/Paris")]
                at: Timestamp,
            }
        });

        assert!(out.contains(". time_format (\"%Y-%m-%d\") . time_utc () . time_location (\"Europe/Paris\")"));
    }

    #[test]
    fn test_unmarshal_container_skips_bind_field_impl() {
        let out = expand(parse_quote! {
            #[bind(unmarshal)]
            struct Point {
                x: i32,
            }
        });

        assert!(out.contains(":: daedalus_core :: Record for Point"));
        assert!(!out.contains("BindField for Point"));
    }

    #[test]
    fn test_custom_crate_path() {
        let out = expand(parse_quote! {
            #[bind(crate = "daedalus::core")]
            struct Flag {
                on: bool,
            }
        });

        assert!(out.contains("daedalus :: core :: Record for Flag"));
        assert!(!out.contains("daedalus_core"));
    }

    #[test]
    fn test_generic_fields_get_bounds() {
        let out = expand(parse_quote! {
            struct Wrapper<T> {
                inner: T,
            }
        });

        assert!(out.contains("where T : :: daedalus_core :: BindField"));
    }
}
