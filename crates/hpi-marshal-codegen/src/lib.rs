// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

extern crate proc_macro;

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{
    parse_macro_input, Attribute, Data, DataEnum, DeriveInput, Expr, Fields, FieldsNamed,
    GenericArgument, Ident, LitStr, PathArguments, Type,
};

/// How a struct field is described to the engine.
enum FieldRole {
    /// Any `HpiType`.
    Plain,
    /// `HpiUnion` selected by the earlier field at this index.
    Union { selector: usize, selector_name: String },
    /// `Vec<T>` sized by the earlier field at this index.
    VarArray { count_name: String, element: Type },
}

struct FieldInfo {
    ident: Ident,
    ty: Type,
    role: FieldRole,
}

/// `#[derive(Marshal)]`: generates the schema and value conversion for a type.
///
/// - Named-field structs implement `HpiType`. Fields are marshaled in
///   declaration order. `#[hpi(union = "field")]` marks an `HpiUnion` field
///   selected by an earlier integer field; `#[hpi(count = "field")]` marks a
///   `Vec<T>` whose length is an earlier integer field.
/// - Fieldless enums with `#[hpi(repr = u32)]` (or u8, u16, i8, i16, i32)
///   implement `HpiType` as that integer.
/// - Enums whose variants each hold one value and carry
///   `#[hpi(label = EXPR)]` implement `HpiUnion`.
///
/// Example:
/// ```ignore
/// use hpi_marshal::Marshal;
///
/// #[derive(Marshal)]
/// enum ReadingValue {
///     #[hpi(label = 0)]
///     Int64(i64),
///     #[hpi(label = 1)]
///     Uint64(u64),
/// }
///
/// #[derive(Marshal)]
/// struct Reading {
///     is_supported: bool,
///     reading_type: u32,
///     #[hpi(union = "reading_type")]
///     value: ReadingValue,
/// }
/// ```
#[proc_macro_derive(Marshal, attributes(hpi))]
pub fn derive_marshal(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    if !input.generics.params.is_empty() {
        return syn::Error::new_spanned(&input.generics, "Generic types are not supported")
            .to_compile_error()
            .into();
    }

    let expanded = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => derive_struct(&input.ident, fields),
            _ => Err(syn::Error::new_spanned(
                &input,
                "Only named fields are supported",
            )),
        },
        Data::Enum(data) => derive_enum(&input, data),
        Data::Union(_) => Err(syn::Error::new_spanned(
            &input,
            "Untagged unions are not supported; use an enum with #[hpi(label = ..)] variants",
        )),
    };

    match expanded {
        Ok(tokens) => tokens.into(),
        Err(e) => e.to_compile_error().into(),
    }
}

fn derive_struct(name: &Ident, fields: &FieldsNamed) -> syn::Result<TokenStream2> {
    let type_name = name.to_string();
    let mut infos: Vec<FieldInfo> = Vec::new();

    for field in &fields.named {
        let Some(ident) = field.ident.clone() else {
            return Err(syn::Error::new_spanned(field, "Field must have a name"));
        };

        let mut role = FieldRole::Plain;
        for attr in hpi_attrs(&field.attrs) {
            attr.parse_nested_meta(|meta| {
                let is_union = meta.path.is_ident("union");
                if !is_union && !meta.path.is_ident("count") {
                    return Err(meta.error("expected `union = \"field\"` or `count = \"field\"`"));
                }
                let sibling: LitStr = meta.value()?.parse()?;
                let sibling_name = sibling.value();
                let Some(index) = infos.iter().position(|f| f.ident == sibling_name) else {
                    return Err(syn::Error::new_spanned(
                        &sibling,
                        format!("`{}` must name a field declared before `{}`", sibling_name, ident),
                    ));
                };
                role = if is_union {
                    FieldRole::Union {
                        selector: index,
                        selector_name: sibling_name,
                    }
                } else {
                    let Some(element) = vec_element(&field.ty) else {
                        return Err(syn::Error::new_spanned(
                            &field.ty,
                            "`count` fields must have type Vec<T>",
                        ));
                    };
                    FieldRole::VarArray {
                        count_name: sibling_name,
                        element,
                    }
                };
                Ok(())
            })?;
        }

        infos.push(FieldInfo {
            ident,
            ty: field.ty.clone(),
            role,
        });
    }

    let builder_calls = infos.iter().map(|f| {
        let field_name = f.ident.to_string();
        let ty = &f.ty;
        match &f.role {
            FieldRole::Plain => quote! {
                .field(#field_name, <#ty as ::hpi_marshal::HpiType>::type_descriptor())
            },
            FieldRole::Union { selector_name, .. } => quote! {
                .union_field(#field_name, #selector_name, <#ty as ::hpi_marshal::HpiUnion>::arms())
            },
            FieldRole::VarArray {
                count_name,
                element,
            } => quote! {
                .var_array_field(
                    #field_name,
                    #count_name,
                    <#element as ::hpi_marshal::HpiType>::type_descriptor(),
                )
            },
        }
    });

    let to_values = infos.iter().map(|f| {
        let ident = &f.ident;
        match &f.role {
            FieldRole::Plain => quote! { ::hpi_marshal::HpiType::to_value(&self.#ident) },
            FieldRole::Union { selector, .. } => {
                let selector_ident = &infos[*selector].ident;
                let field = format!("{}.{}", type_name, ident);
                quote! {
                    ::hpi_marshal::traits::union_to_value(
                        #field,
                        &::hpi_marshal::HpiType::to_value(&self.#selector_ident),
                        &self.#ident,
                    )
                }
            }
            FieldRole::VarArray { .. } => {
                quote! { ::hpi_marshal::traits::var_array_to_value(&self.#ident) }
            }
        }
    });

    // Union labels are read before any field is moved out of the reader.
    let label_reads = infos.iter().enumerate().filter_map(|(i, f)| match &f.role {
        FieldRole::Union { selector, .. } => {
            let label = format_ident!("__label_{}", i);
            Some(quote! { let #label = __reader.selector(#selector)?; })
        }
        _ => None,
    });

    let field_inits = infos.iter().enumerate().map(|(i, f)| {
        let ident = &f.ident;
        let ty = &f.ty;
        match &f.role {
            FieldRole::Plain => quote! {
                #ident: <#ty as ::hpi_marshal::HpiType>::from_value(__reader.take(#i))?
            },
            FieldRole::Union { .. } => {
                let label = format_ident!("__label_{}", i);
                quote! {
                    #ident: ::hpi_marshal::traits::union_from_value::<#ty>(#label, __reader.take(#i))?
                }
            }
            FieldRole::VarArray { element, .. } => quote! {
                #ident: ::hpi_marshal::traits::var_array_from_value::<#element>(__reader.take(#i))?
            },
        }
    });

    let field_count = infos.len();

    Ok(quote! {
        impl ::hpi_marshal::HpiType for #name {
            fn type_descriptor() -> ::std::sync::Arc<::hpi_marshal::TypeDescriptor> {
                static DESCRIPTOR: ::std::sync::OnceLock<::std::sync::Arc<::hpi_marshal::TypeDescriptor>> =
                    ::std::sync::OnceLock::new();
                ::std::sync::Arc::clone(DESCRIPTOR.get_or_init(|| {
                    match ::hpi_marshal::types::StructBuilder::new(#type_name)
                        #(#builder_calls)*
                        .build()
                    {
                        Ok(desc) => ::std::sync::Arc::new(desc),
                        Err(e) => panic!("invalid schema for {}: {}", #type_name, e),
                    }
                }))
            }

            fn to_value(&self) -> ::hpi_marshal::Value {
                ::hpi_marshal::Value::Struct(::std::vec![#(#to_values),*])
            }

            fn from_value(
                value: ::hpi_marshal::Value,
            ) -> ::std::result::Result<Self, ::hpi_marshal::DecodeError> {
                #[allow(unused_mut)]
                let mut __reader = ::hpi_marshal::value::FieldReader::new(#type_name, value, #field_count)?;
                #(#label_reads)*
                Ok(Self {
                    #(#field_inits),*
                })
            }
        }
    })
}

fn derive_enum(input: &DeriveInput, data: &DataEnum) -> syn::Result<TokenStream2> {
    if data.variants.is_empty() {
        return Err(syn::Error::new_spanned(input, "Empty enums are not supported"));
    }

    if data.variants.iter().all(|v| matches!(v.fields, Fields::Unit)) {
        return derive_repr_enum(input, data);
    }

    let name = &input.ident;
    let type_name = name.to_string();
    let mut arms = Vec::new();
    let mut labels = Vec::new();
    let mut payloads = Vec::new();
    let mut from_arms = Vec::new();

    for variant in &data.variants {
        let payload_ty = match &variant.fields {
            Fields::Unnamed(f) if f.unnamed.len() == 1 => &f.unnamed[0].ty,
            _ => {
                return Err(syn::Error::new_spanned(
                    variant,
                    "Union variants must hold exactly one unnamed value",
                ))
            }
        };

        let mut label: Option<Expr> = None;
        for attr in hpi_attrs(&variant.attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("label") {
                    label = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("expected `label = <discriminator>`"))
                }
            })?;
        }
        let Some(label) = label else {
            return Err(syn::Error::new_spanned(
                variant,
                "Union variants need #[hpi(label = <discriminator>)]",
            ));
        };

        let ident = &variant.ident;
        let arm_name = ident.to_string();
        arms.push(quote! {
            ::hpi_marshal::types::UnionArm::new(
                (#label) as u32,
                #arm_name,
                <#payload_ty as ::hpi_marshal::HpiType>::type_descriptor(),
            )
        });
        labels.push(quote! { Self::#ident(_) => (#label) as u32 });
        payloads.push(quote! { Self::#ident(inner) => ::hpi_marshal::HpiType::to_value(inner) });
        from_arms.push(quote! {
            if label == (#label) as u32 {
                return Ok(Self::#ident(<#payload_ty as ::hpi_marshal::HpiType>::from_value(payload)?));
            }
        });
    }

    Ok(quote! {
        impl ::hpi_marshal::HpiUnion for #name {
            fn arms() -> ::std::vec::Vec<::hpi_marshal::types::UnionArm> {
                ::std::vec![#(#arms),*]
            }

            fn label(&self) -> u32 {
                match self {
                    #(#labels),*
                }
            }

            fn to_value(&self) -> ::hpi_marshal::Value {
                match self {
                    #(#payloads),*
                }
            }

            fn from_arm(
                label: u32,
                payload: ::hpi_marshal::Value,
            ) -> ::std::result::Result<Self, ::hpi_marshal::DecodeError> {
                #(#from_arms)*
                Err(::hpi_marshal::DecodeError::UnknownDiscriminator {
                    type_name: #type_name.into(),
                    value: label,
                })
            }
        }
    })
}

fn derive_repr_enum(input: &DeriveInput, data: &DataEnum) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let type_name = name.to_string();

    let mut repr: Option<Ident> = None;
    for attr in hpi_attrs(&input.attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("repr") {
                repr = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `repr = u8|u16|u32|i8|i16|i32`"))
            }
        })?;
    }
    let Some(repr) = repr else {
        return Err(syn::Error::new_spanned(
            input,
            "Fieldless enums need #[hpi(repr = u32)] (or u8, u16, i8, i16, i32)",
        ));
    };

    let (kind, variant) = match repr.to_string().as_str() {
        "u8" => (quote! { U8 }, quote! { U8 }),
        "u16" => (quote! { U16 }, quote! { U16 }),
        "u32" => (quote! { U32 }, quote! { U32 }),
        "i8" => (quote! { I8 }, quote! { I8 }),
        "i16" => (quote! { I16 }, quote! { I16 }),
        "i32" => (quote! { I32 }, quote! { I32 }),
        _ => {
            return Err(syn::Error::new_spanned(
                &repr,
                "Enumerations travel as u8, u16, u32, i8, i16 or i32",
            ))
        }
    };

    let idents: Vec<&Ident> = data.variants.iter().map(|v| &v.ident).collect();

    Ok(quote! {
        impl ::hpi_marshal::HpiType for #name {
            fn type_descriptor() -> ::std::sync::Arc<::hpi_marshal::TypeDescriptor> {
                ::hpi_marshal::types::primitive(::hpi_marshal::PrimitiveKind::#kind)
            }

            fn to_value(&self) -> ::hpi_marshal::Value {
                ::hpi_marshal::Value::#variant(match self {
                    #(Self::#idents => Self::#idents as #repr),*
                })
            }

            fn from_value(
                value: ::hpi_marshal::Value,
            ) -> ::std::result::Result<Self, ::hpi_marshal::DecodeError> {
                let raw = match value {
                    ::hpi_marshal::Value::#variant(raw) => raw,
                    other => {
                        return Err(::hpi_marshal::DecodeError::TypeMismatch {
                            expected: #type_name.into(),
                            found: other.kind_name().into(),
                        })
                    }
                };
                #(
                    if raw == Self::#idents as #repr {
                        return Ok(Self::#idents);
                    }
                )*
                Err(::hpi_marshal::DecodeError::InvalidEnumValue {
                    type_name: #type_name.into(),
                    value: i64::from(raw),
                })
            }
        }
    })
}

fn hpi_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|a| a.path().is_ident("hpi"))
}

/// `T` of a `Vec<T>` field type.
fn vec_element(ty: &Type) -> Option<Type> {
    let Type::Path(type_path) = ty else {
        return None;
    };
    let segment = type_path.path.segments.last()?;
    if segment.ident != "Vec" {
        return None;
    }
    match &segment.arguments {
        PathArguments::AngleBracketed(args) => match args.args.first()? {
            GenericArgument::Type(inner) => Some(inner.clone()),
            _ => None,
        },
        _ => None,
    }
}
