//! Derive macros for fixturegen.
//!
//! This crate provides `#[derive(Record)]`, which implements
//! `fixturegen::Introspectable` for structs with named fields so their
//! fields can be read, written and flattened by name.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Data, DeriveInput, Fields, Ident, LitStr, Type};

/// Derive macro implementing `Introspectable` for a struct.
///
/// Every named field becomes a property, in declaration order. Field types
/// must implement `fixturegen::FieldValue` and `Clone`.
///
/// Struct attributes:
/// - `#[record(type_name = "Name")]` overrides the reported type name;
/// - `#[record(accessors = field)]` routes names that are not properties to
///   `field`, which must implement `fixturegen::FieldAccess`;
/// - `#[record(nested)]` also implements `FieldValue`, so the struct can sit
///   inside another record and gets flattened with it. Requires `Default`.
///
/// Field attributes: `#[record(skip)]` and `#[record(rename = "name")]`.
///
/// # Example
///
/// ```rust,ignore
/// use fixturegen::*;
///
/// #[derive(Record, Debug, Clone, Default)]
/// #[record(type_name = "User")]
/// struct User {
///     login: String,
///     #[record(rename = "email")]
///     email_address: String,
///     age: i64,
/// }
///
/// let mut user = User::default();
/// set_field(&mut user, "login", Value::from("editor"))?;
/// assert_eq!(get_field(&user, "email")?, Value::from(""));
/// ```
#[proc_macro_derive(Record, attributes(record))]
pub fn derive_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

#[derive(Default)]
struct RecordOptions {
    type_name: Option<LitStr>,
    accessors: Option<Ident>,
    nested: bool,
}

struct Property<'a> {
    ident: &'a Ident,
    name: LitStr,
    ty: &'a Type,
}

fn record_options(input: &DeriveInput) -> Result<RecordOptions, syn::Error> {
    let mut options = RecordOptions::default();
    for attr in input.attrs.iter().filter(|a| a.path().is_ident("record")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("type_name") {
                options.type_name = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("accessors") {
                options.accessors = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("nested") {
                options.nested = true;
                Ok(())
            } else {
                Err(meta.error("expected `type_name`, `accessors` or `nested`"))
            }
        })?;
    }
    Ok(options)
}

/// Named fields that are exposed as properties.
fn properties(data: &syn::DataStruct) -> Result<Vec<Property<'_>>, syn::Error> {
    let fields = match &data.fields {
        Fields::Named(fields) => fields,
        Fields::Unnamed(fields) => {
            return Err(syn::Error::new_spanned(
                fields,
                "Record derive macro requires named fields",
            ));
        }
        Fields::Unit => return Ok(Vec::new()),
    };

    let mut properties = Vec::new();
    for field in &fields.named {
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let mut skip = false;
        let mut name = LitStr::new(&ident.to_string(), ident.span());

        for attr in field.attrs.iter().filter(|a| a.path().is_ident("record")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    skip = true;
                    Ok(())
                } else if meta.path.is_ident("rename") {
                    name = meta.value()?.parse()?;
                    Ok(())
                } else {
                    Err(meta.error("expected `skip` or `rename`"))
                }
            })?;
        }

        if !skip {
            properties.push(Property {
                ident,
                name,
                ty: &field.ty,
            });
        }
    }
    Ok(properties)
}

/// Generate the `Introspectable` implementation, plus `FieldValue` for
/// nested records.
fn generate_impl(input: &DeriveInput) -> Result<TokenStream2, syn::Error> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let data = match &input.data {
        Data::Struct(data) => data,
        Data::Enum(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Record derive macro does not support enums",
            ));
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "Record derive macro does not support unions",
            ));
        }
    };

    let options = record_options(input)?;
    let properties = properties(data)?;

    let type_name = options
        .type_name
        .clone()
        .unwrap_or_else(|| LitStr::new(&name.to_string(), name.span()));
    let names: Vec<_> = properties.iter().map(|p| &p.name).collect();

    let reads = properties.iter().map(|p| {
        let (ident, prop, ty) = (p.ident, &p.name, p.ty);
        quote! {
            #prop => ::std::option::Option::Some(
                <#ty as fixturegen::FieldValue>::into_value(::std::clone::Clone::clone(&self.#ident)),
            ),
        }
    });

    let writes = properties.iter().map(|p| {
        let (ident, prop, ty) = (p.ident, &p.name, p.ty);
        quote! {
            #prop => {
                self.#ident = <#ty as fixturegen::FieldValue>::from_value(value).map_err(|found| {
                    fixturegen::FixtureError::FieldTypeMismatch {
                        field: #prop.to_string(),
                        expected: <#ty as fixturegen::FieldValue>::KIND.to_string(),
                        found: found.kind().to_string(),
                    }
                })?;
                ::std::result::Result::Ok(true)
            }
        }
    });

    let accessors = options.accessors.as_ref().map(|field| {
        quote! {
            fn accessors(&self) -> ::std::option::Option<&dyn fixturegen::FieldAccess> {
                ::std::option::Option::Some(&self.#field)
            }

            fn accessors_mut(&mut self) -> ::std::option::Option<&mut dyn fixturegen::FieldAccess> {
                ::std::option::Option::Some(&mut self.#field)
            }
        }
    });

    let nested = options
        .nested
        .then(|| generate_field_value(input, &type_name, &properties));

    Ok(quote! {
        impl #impl_generics fixturegen::Introspectable for #name #ty_generics #where_clause {
            fn type_name(&self) -> &str {
                #type_name
            }

            fn property_names(&self) -> ::std::vec::Vec<&str> {
                ::std::vec![#(#names),*]
            }

            fn property(&self, name: &str) -> ::std::option::Option<fixturegen::Value> {
                match name {
                    #(#reads)*
                    _ => ::std::option::Option::None,
                }
            }

            #[allow(unused_variables)]
            fn set_property(
                &mut self,
                name: &str,
                value: fixturegen::Value,
            ) -> fixturegen::Result<bool> {
                match name {
                    #(#writes)*
                    _ => ::std::result::Result::Ok(false),
                }
            }

            #accessors
        }

        #nested
    })
}

/// Generate a `FieldValue` implementation converting through `DynamicRecord`.
fn generate_field_value(
    input: &DeriveInput,
    type_name: &LitStr,
    properties: &[Property<'_>],
) -> TokenStream2 {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let inserts = properties.iter().map(|p| {
        let (ident, prop, ty) = (p.ident, &p.name, p.ty);
        quote! {
            record.insert(#prop, <#ty as fixturegen::FieldValue>::into_value(self.#ident));
        }
    });

    quote! {
        impl #impl_generics fixturegen::FieldValue for #name #ty_generics #where_clause {
            const KIND: &'static str = #type_name;

            fn into_value(self) -> fixturegen::Value {
                let mut record = fixturegen::DynamicRecord::new(#type_name);
                #(#inserts)*
                fixturegen::Value::Record(record)
            }

            fn from_value(
                value: fixturegen::Value,
            ) -> ::std::result::Result<Self, fixturegen::Value> {
                let record = match value {
                    fixturegen::Value::Record(record) => record,
                    other => return ::std::result::Result::Err(other),
                };
                let mut target = <Self as ::std::default::Default>::default();
                let rejected = record.iter().any(|(field, field_value)| {
                    fixturegen::set_field(&mut target, field, field_value.clone()).is_err()
                });
                if rejected {
                    return ::std::result::Result::Err(fixturegen::Value::Record(record));
                }
                ::std::result::Result::Ok(target)
            }
        }
    }
}
