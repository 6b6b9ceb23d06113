//! Rust source parser using syn to extract FormClass definitions.

use anyhow::{Context, Result};
use std::path::Path;
use syn::ext::IdentExt;
use syn::visit::{self, Visit};
use syn::{Attribute, Expr, ExprLit, Fields, ItemStruct, Lit, LitStr, Meta, Visibility};
use tagform::{ClassDescriptor, PropertyDescriptor};

use super::LoadedForm;

/// Parse a Rust file and extract every struct deriving `FormClass`.
pub fn parse_form_file(path: &Path, relative_path: &str) -> Result<Vec<LoadedForm>> {
    let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))?;
    parse_form_source(&content, relative_path)
}

pub fn parse_form_source(content: &str, source: &str) -> Result<Vec<LoadedForm>> {
    let syntax = syn::parse_file(content).with_context(|| format!("Failed to parse Rust file: {source}"))?;

    let mut visitor = FormVisitor {
        source,
        forms: Vec::new(),
        error: None,
    };
    visitor.visit_file(&syntax);

    match visitor.error {
        Some(err) => Err(err),
        None => Ok(visitor.forms),
    }
}

/// Collects derived forms, including those declared in inline modules.
struct FormVisitor<'a> {
    source: &'a str,
    forms: Vec<LoadedForm>,
    error: Option<anyhow::Error>,
}

impl<'ast> Visit<'ast> for FormVisitor<'_> {
    fn visit_item_struct(&mut self, item: &'ast ItemStruct) {
        if self.error.is_none() && derives_form_class(&item.attrs) {
            match parse_struct(item, self.source) {
                Ok(form) => self.forms.push(form),
                Err(err) => self.error = Some(err),
            }
        }
        visit::visit_item_struct(self, item);
    }
}

/// Check if attributes include `derive(FormClass)` under any path.
fn derives_form_class(attrs: &[Attribute]) -> bool {
    let mut found = false;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("derive")) {
        let _ = attr.parse_nested_meta(|meta| {
            if meta.path.segments.last().is_some_and(|segment| segment.ident == "FormClass") {
                found = true;
            }
            Ok(())
        });
    }
    found
}

fn parse_struct(item: &ItemStruct, source: &str) -> Result<LoadedForm> {
    let mut name = item.ident.unraw().to_string();
    let mut prefix = String::new();

    // Same rules as the derive, so sources that would not compile are refused.
    for attr in item.attrs.iter().filter(|attr| attr.path().is_ident("form")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("prefix") {
                let value: LitStr = meta.value()?.parse()?;
                prefix = value.value();
            } else if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                if value.value().trim().is_empty() {
                    return Err(syn::Error::new(value.span(), "form name cannot be empty"));
                }
                name = value.value();
            } else {
                return Err(meta.error("unknown form option, expected `prefix` or `name`"));
            }
            Ok(())
        })
        .with_context(|| format!("Invalid #[form] attribute on `{}` in {source}", item.ident))?;
    }

    let mut descriptor = ClassDescriptor::new(name);
    descriptor.doc = doc_block(&item.attrs);

    if let Fields::Named(named) = &item.fields {
        for field in &named.named {
            let Some(ident) = &field.ident else {
                continue;
            };
            let mut property = PropertyDescriptor::new(ident.unraw().to_string());
            property.doc = doc_block(&field.attrs);
            property.public = matches!(field.vis, Visibility::Public(_));
            descriptor.properties.push(property);
        }
    }

    Ok(LoadedForm {
        descriptor,
        prefix,
        source: source.to_string(),
    })
}

/// Joins `///` lines the way the derive macro does.
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
