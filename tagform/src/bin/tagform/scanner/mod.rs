//! Loading form descriptors for the CLI.
//!
//! Forms come from TOML/JSON descriptor files, or from Rust sources whose
//! structs derive `FormClass`.

mod discovery;
mod parser;

use std::path::Path;

use anyhow::{Context, Result, bail};
use tagform::{ClassDescriptor, Form};

pub use discovery::discover_form_files;
pub use parser::parse_form_file;

/// A descriptor plus the tag prefix its annotations use.
#[derive(Debug, Clone)]
pub struct LoadedForm {
    pub descriptor: ClassDescriptor,
    pub prefix: String,
    /// Where the descriptor was read from, for display
    pub source: String,
}

impl LoadedForm {
    pub fn name(&self) -> &str {
        &self.descriptor.name
    }

    pub fn build(&self) -> Result<Form> {
        tagform::build_from_class(&self.descriptor, &self.prefix)
            .with_context(|| format!("Failed to build form `{}` from {}", self.name(), self.source))
    }
}

/// Loads every form found at `path`.
///
/// Directories are walked for Rust sources, `.rs` files are parsed, and any
/// other file is read as a descriptor. `prefix` overrides the tag prefix of
/// every loaded form.
pub fn load_forms(path: &Path, prefix: Option<&str>) -> Result<Vec<LoadedForm>> {
    let mut forms = if path.is_dir() {
        let mut forms = Vec::new();
        for file in discover_form_files(path)? {
            forms.extend(parse_form_file(&file.path, &file.relative_path)?);
        }
        forms
    } else if path.extension().is_some_and(|ext| ext == "rs") {
        parse_form_file(path, &path.display().to_string())?
    } else {
        let descriptor = ClassDescriptor::load(path)
            .with_context(|| format!("Failed to load descriptor: {}", path.display()))?;
        vec![LoadedForm {
            descriptor,
            prefix: String::new(),
            source: path.display().to_string(),
        }]
    };

    if let Some(prefix) = prefix {
        for form in &mut forms {
            form.prefix = prefix.to_string();
        }
    }
    Ok(forms)
}

/// Picks the form named `name`, or the only form when no name is given.
pub fn select_form(forms: Vec<LoadedForm>, name: Option<&str>) -> Result<LoadedForm> {
    match name {
        Some(name) => {
            let known: Vec<String> = forms.iter().map(|form| form.name().to_string()).collect();
            forms
                .into_iter()
                .find(|form| form.name() == name)
                .with_context(|| format!("No form named `{name}` (found: {})", known.join(", ")))
        }
        None => {
            if forms.len() > 1 {
                let known: Vec<&str> = forms.iter().map(LoadedForm::name).collect();
                bail!("Several forms found ({}); pick one with --form", known.join(", "));
            }
            forms.into_iter().next().context("No forms found")
        }
    }
}
