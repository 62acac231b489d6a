//! Parsing utilities for the `Record` derive.
//!
//! This module reads `#[bind(...)]` attributes from the container and from
//! each field.

use proc_macro2::Span;
use syn::{
    punctuated::Punctuated, spanned::Spanned, Attribute, Data, DeriveInput, Expr, ExprLit, Fields,
    Ident, Lit, LitStr, Meta, Path, Token, Type,
};

/// Parsed container attributes.
#[derive(Debug)]
pub struct ContainerAttrs {
    /// Path to the core crate (`::daedalus_core` unless overridden).
    pub krate: Path,
    /// Whether the type parses itself through `UnmarshalParam` when nested.
    pub unmarshal: bool,
}

impl ContainerAttrs {
    /// Parses the `#[bind(...)]` attributes on the deriving type.
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut krate = None;
        let mut unmarshal = false;

        for meta in bind_metas(attrs)? {
            match &meta {
                Meta::Path(path) if path.is_ident("unmarshal") => {
                    if unmarshal {
                        return Err(duplicate(path.span(), "unmarshal"));
                    }
                    unmarshal = true;
                }
                Meta::NameValue(nv) if nv.path.is_ident("crate") => {
                    if krate.is_some() {
                        return Err(duplicate(nv.path.span(), "crate"));
                    }
                    krate = Some(string_value(&nv.value)?.parse::<Path>()?);
                }
                _ => {
                    return Err(syn::Error::new(
                        meta.span(),
                        "unknown container attribute, expected `crate = \"...\"` or `unmarshal`",
                    ))
                }
            }
        }

        Ok(Self {
            krate: krate.unwrap_or_else(|| syn::parse_quote!(::daedalus_core)),
            unmarshal,
        })
    }
}

/// Parsed field attributes.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Source key in query mode.
    pub query: Option<String>,
    /// Source key in form mode.
    pub form: Option<String>,
    /// `strftime` format for timestamp fields.
    pub time_format: Option<String>,
    /// Read timestamps in UTC.
    pub time_utc: bool,
    /// IANA zone to read timestamps in.
    pub time_location: Option<String>,
    /// Leave the field out of the descriptor table.
    pub skip: bool,
}

impl FieldAttrs {
    /// Parses the `#[bind(...)]` attributes on a field.
    pub fn from_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();

        for meta in bind_metas(attrs)? {
            match &meta {
                Meta::Path(path) => {
                    let ident = meta_ident(path)?;
                    let flag = match ident.to_string().as_str() {
                        "time_utc" => &mut parsed.time_utc,
                        "skip" => &mut parsed.skip,
                        other => {
                            return Err(syn::Error::new(
                                ident.span(),
                                format!("unknown field attribute: {other}"),
                            ))
                        }
                    };
                    if *flag {
                        return Err(duplicate(ident.span(), &ident.to_string()));
                    }
                    *flag = true;
                }
                Meta::NameValue(nv) => {
                    let ident = meta_ident(&nv.path)?;
                    let value = string_value(&nv.value)?.value();
                    let slot = match ident.to_string().as_str() {
                        "query" => &mut parsed.query,
                        "form" => &mut parsed.form,
                        "time_format" => &mut parsed.time_format,
                        "time_location" => &mut parsed.time_location,
                        other => {
                            return Err(syn::Error::new(
                                ident.span(),
                                format!("unknown field attribute: {other}"),
                            ))
                        }
                    };
                    if slot.is_some() {
                        return Err(duplicate(ident.span(), &ident.to_string()));
                    }
                    *slot = Some(value);
                }
                Meta::List(list) => {
                    return Err(syn::Error::new(
                        list.span(),
                        "expected `name = \"value\"` or a bare flag",
                    ))
                }
            }
        }

        Ok(parsed)
    }
}

/// A field that takes part in binding.
#[derive(Debug)]
pub struct RecordField {
    /// The field identifier.
    pub ident: Ident,
    /// The field type.
    pub ty: Type,
    /// Parsed attributes.
    pub attrs: FieldAttrs,
}

/// Parsed derive input.
#[derive(Debug)]
pub struct RecordInput {
    /// Container attributes.
    pub attrs: ContainerAttrs,
    /// Bindable fields in declaration order, skipped fields removed.
    pub fields: Vec<RecordField>,
}

impl RecordInput {
    /// Parses a `DeriveInput` into a `RecordInput`.
    pub fn parse(input: &DeriveInput) -> syn::Result<Self> {
        let attrs = ContainerAttrs::from_attrs(&input.attrs)?;

        let named = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named,
                Fields::Unit => {
                    return Ok(Self {
                        attrs,
                        fields: Vec::new(),
                    })
                }
                Fields::Unnamed(_) => {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "Record can only be derived for structs with named fields",
                    ))
                }
            },
            Data::Enum(_) | Data::Union(_) => {
                return Err(syn::Error::new(
                    input.ident.span(),
                    "Record can only be derived for structs",
                ))
            }
        };

        let mut fields = Vec::with_capacity(named.named.len());
        for field in &named.named {
            let field_attrs = FieldAttrs::from_attrs(&field.attrs)?;
            if field_attrs.skip {
                continue;
            }
            let ident = field
                .ident
                .clone()
                .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;
            fields.push(RecordField {
                ident,
                ty: field.ty.clone(),
                attrs: field_attrs,
            });
        }

        Ok(Self { attrs, fields })
    }
}

fn bind_metas(attrs: &[Attribute]) -> syn::Result<Vec<Meta>> {
    let mut metas = Vec::new();
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("bind")) {
        let list = attr.parse_args_with(Punctuated::<Meta, Token![,]>::parse_terminated)?;
        metas.extend(list);
    }
    Ok(metas)
}

fn meta_ident(path: &Path) -> syn::Result<&Ident> {
    path.get_ident()
        .ok_or_else(|| syn::Error::new(path.span(), "expected identifier"))
}

fn string_value(expr: &Expr) -> syn::Result<&LitStr> {
    match expr {
        Expr::Lit(ExprLit {
            lit: Lit::Str(s), ..
        }) => Ok(s),
        _ => Err(syn::Error::new(expr.span(), "expected string literal")),
    }
}

fn duplicate(span: Span, name: &str) -> syn::Error {
    syn::Error::new(span, format!("duplicate attribute: {name}"))
}
