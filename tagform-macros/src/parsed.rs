use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Error, Expr, ExprLit, Fields, Generics, Ident, Lit, LitStr, Meta, Result, Visibility};

pub(crate) struct ParsedForm {
    ident: Ident,
    generics: Generics,
    type_name: String,
    prefix: String,
    doc: Option<String>,
    properties: Vec<ParsedProperty>,
}

struct ParsedProperty {
    name: String,
    doc: Option<String>,
    public: bool,
}

impl ParsedForm {
    pub(crate) fn from_input(input: &DeriveInput) -> Result<Self> {
        let mut type_name = input.ident.unraw().to_string();
        let mut prefix = String::new();

        for attr in &input.attrs {
            if attr.path().is_ident("form") {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("prefix") {
                        let value: LitStr = meta.value()?.parse()?;
                        prefix = value.value();
                    } else if meta.path.is_ident("name") {
                        let value: LitStr = meta.value()?.parse()?;
                        if value.value().trim().is_empty() {
                            return Err(Error::new(value.span(), "form name cannot be empty"));
                        }
                        type_name = value.value();
                    } else {
                        return Err(meta.error("unknown form option, expected `prefix` or `name`"));
                    }
                    Ok(())
                })?;
            }
        }

        let properties = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named
                    .named
                    .iter()
                    .filter_map(|field| {
                        let ident = field.ident.as_ref()?;
                        Some(ParsedProperty {
                            name: ident.unraw().to_string(),
                            doc: doc_block(&field.attrs),
                            public: matches!(field.vis, Visibility::Public(_)),
                        })
                    })
                    .collect(),
                Fields::Unit => Vec::new(),
                Fields::Unnamed(_) => {
                    return Err(Error::new(input.ident.span(), "FormClass requires named fields"));
                }
            },
            _ => return Err(Error::new(input.ident.span(), "FormClass can only be derived for structs")),
        };

        Ok(Self {
            ident: input.ident.clone(),
            generics: input.generics.clone(),
            type_name,
            prefix,
            doc: doc_block(&input.attrs),
            properties,
        })
    }

    pub(crate) fn emit(&self) -> TokenStream2 {
        let ident = &self.ident;
        let type_name = &self.type_name;
        let prefix = &self.prefix;
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        let class_doc = optional_string(self.doc.as_deref());
        let properties = self.properties.iter().map(|property| {
            let name = &property.name;
            let doc = optional_string(property.doc.as_deref());
            let public = property.public;
            quote! {
                ::tagform::PropertyDescriptor {
                    name: #name.to_string(),
                    doc: #doc,
                    public: #public,
                }
            }
        });

        // Generic types have no single descriptor function to register.
        let registration = if self.generics.params.is_empty() {
            quote! {
                ::tagform::inventory::submit! {
                    ::tagform::FormRegistration {
                        type_name: #type_name,
                        tag_prefix: #prefix,
                        descriptor_fn: <#ident as ::tagform::FormClass>::class_descriptor,
                    }
                }
            }
        } else {
            TokenStream2::new()
        };

        quote! {
            impl #impl_generics ::tagform::FormClass for #ident #ty_generics #where_clause {
                const TAG_PREFIX: &'static str = #prefix;

                fn class_descriptor() -> ::tagform::ClassDescriptor {
                    ::tagform::ClassDescriptor {
                        name: #type_name.to_string(),
                        doc: #class_doc,
                        properties: vec![#(#properties),*],
                    }
                }
            }

            #registration
        }
    }
}

/// Joins `#[doc]` attributes into one block, dropping the single space
/// rustdoc leaves after `///`.
fn doc_block(attrs: &[Attribute]) -> Option<String> {
    let lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| match &attr.meta {
            Meta::NameValue(nv) => match &nv.value {
                Expr::Lit(ExprLit { lit: Lit::Str(text), .. }) => Some(text.value()),
                _ => None,
            },
            _ => None,
        })
        .map(|line| line.strip_prefix(' ').map(str::to_string).unwrap_or(line))
        .collect();

    if lines.is_empty() { None } else { Some(lines.join("\n")) }
}

fn optional_string(value: Option<&str>) -> TokenStream2 {
    match value {
        Some(text) => quote! { ::core::option::Option::Some(#text.to_string()) },
        None => quote! { ::core::option::Option::None },
    }
}
