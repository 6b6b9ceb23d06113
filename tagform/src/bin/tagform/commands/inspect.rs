use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use serde::Serialize;
use tagform::{Form, Options};

use crate::examples::ExampleGroup;
use crate::output::{Output, Report};
use crate::scanner::{LoadedForm, load_forms};
use crate::style::Status;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Descriptor Files",
        commands: &[
            "tagform inspect forms/contact.toml       # Fields of a TOML descriptor",
            "tagform inspect forms/search.json        # Fields of a JSON descriptor",
        ],
    },
    ExampleGroup {
        title: "Rust Sources",
        commands: &[
            "tagform inspect src/forms.rs             # Every FormClass in one file",
            "tagform inspect . --form Signup          # One form found anywhere in the project",
            "tagform --output json inspect src        # Machine-readable field listing",
        ],
    },
];

#[derive(Args)]
pub struct InspectArgs {
    /// Descriptor file (.toml/.json), Rust source file, or directory
    pub path: PathBuf,

    /// Only show the form with this name
    #[arg(long)]
    pub form: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FieldRow {
    pub label: Option<String>,
    pub name: String,
    pub kind: String,
    pub fullname: String,
    pub id: String,
    pub attributes: String,
    pub options: Options,
}

#[derive(Debug, Serialize)]
pub struct FormReport {
    pub name: String,
    pub source: String,
    pub prefix: String,
    pub template: Option<String>,
    pub field_template: Option<String>,
    pub attributes: String,
    pub fields: Vec<FieldRow>,
}

impl FormReport {
    /// Describes `form`, memoizing each field's element id on the way.
    pub fn new(loaded: &LoadedForm, form: &mut Form) -> Self {
        let labels: HashMap<_, String> = form.fields().map(|(label, id, _)| (id, label.to_string())).collect();
        let ids: Vec<_> = form.field_set().iter().map(|(id, _)| id).collect();

        let mut fields = Vec::with_capacity(ids.len());
        for id in ids {
            let element_id = form.element_id(id).unwrap_or_default();
            let fullname = form.fullname(id).unwrap_or_default();
            let Some(field) = form.field_set().get(id) else {
                continue;
            };
            fields.push(FieldRow {
                label: labels.get(&id).cloned(),
                name: field.name().to_string(),
                kind: field.kind().to_string(),
                fullname,
                id: element_id,
                attributes: field.options_as_attribute_string(None, false),
                options: field.options().clone(),
            });
        }

        Self {
            name: loaded.name().to_string(),
            source: loaded.source.clone(),
            prefix: loaded.prefix.clone(),
            template: form.form_template().map(str::to_string),
            field_template: form.field_template().map(str::to_string),
            attributes: form.attributes_as_string(None, false),
            fields,
        }
    }
}

impl Report for FormReport {
    fn columns(&self) -> &'static [&'static str] {
        &["Label", "Name", "Type", "Fullname", "Id", "Attributes"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.fields
            .iter()
            .map(|field| {
                vec![
                    field.label.clone().unwrap_or_else(|| "-".to_string()),
                    field.name.clone(),
                    field.kind.clone(),
                    field.fullname.clone(),
                    field.id.clone(),
                    field.attributes.clone(),
                ]
            })
            .collect()
    }

    fn compact(&self) -> String {
        let fields: Vec<String> = self
            .fields
            .iter()
            .map(|field| format!("{}:{}", field.name, field.kind))
            .collect();
        format!("{} [{}]", self.name, fields.join(", "))
    }
}

#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub forms: Vec<FormReport>,
}

impl Report for InspectReport {
    fn columns(&self) -> &'static [&'static str] {
        &["Form", "Source", "Fields"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.forms
            .iter()
            .map(|form| vec![form.name.clone(), form.source.clone(), form.fields.len().to_string()])
            .collect()
    }

    fn compact(&self) -> String {
        self.forms.iter().map(FormReport::compact).collect::<Vec<_>>().join("\n")
    }
}

pub fn handle_inspect(args: InspectArgs, prefix: Option<&str>, output: &Output) -> Result<()> {
    let mut loaded = load_forms(&args.path, prefix)?;
    if let Some(name) = &args.form {
        loaded.retain(|form| form.name() == name);
    }
    if loaded.is_empty() {
        bail!("No forms found in {}", args.path.display());
    }
    output.status(Status::Detail, &format!("{} form(s) loaded from {}", loaded.len(), args.path.display()));

    let mut forms = Vec::with_capacity(loaded.len());
    for form in &loaded {
        let mut built = form.build()?;
        forms.push(FormReport::new(form, &mut built));
    }
    let report = InspectReport { forms };

    if output.is_json() {
        return output.report(&report);
    }

    for form in &report.forms {
        output.heading(&format!("{} ({})", form.name, form.source));
        if !form.prefix.is_empty() {
            output.property("Prefix", &form.prefix);
        }
        if let Some(template) = &form.template {
            output.property("Template", template);
        }
        if let Some(template) = &form.field_template {
            output.property("Field template", template);
        }
        if !form.attributes.is_empty() {
            output.property("Attributes", &form.attributes);
        }
        if form.fields.is_empty() {
            output.status(Status::Note, "No public fields");
            continue;
        }
        output.report(form)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagform::ClassDescriptor;

    fn loaded() -> LoadedForm {
        LoadedForm {
            descriptor: ClassDescriptor::new("Contact")
                .with_doc("@template contact.html\n@method post")
                .property("email", "@label E-mail\n@class wide")
                .property("message", "@field Textarea"),
            prefix: String::new(),
            source: "contact.toml".to_string(),
        }
    }

    #[test]
    fn reports_fields_with_ids_and_labels() {
        let loaded = loaded();
        let mut form = loaded.build().unwrap();
        let report = FormReport::new(&loaded, &mut form);

        assert_eq!(report.template.as_deref(), Some("contact.html"));
        assert_eq!(report.attributes, r#"method="post""#);
        assert_eq!(report.fields.len(), 2);
        assert_eq!(report.fields[0].label.as_deref(), Some("E-mail"));
        assert_eq!(report.fields[0].id, "email");
        assert_eq!(report.fields[0].attributes, r#"class="wide" id="email""#);
        assert_eq!(report.compact(), "Contact [email:Input, message:Textarea]");
        assert_eq!(form.field("email").and_then(|field| field.id_option()), Some("email"));
    }

    #[test]
    fn summary_counts_fields() {
        let loaded = loaded();
        let mut form = loaded.build().unwrap();
        let report = InspectReport {
            forms: vec![FormReport::new(&loaded, &mut form)],
        };
        let rendered = report.table(true).to_string();
        assert!(rendered.contains("contact.toml"));
        assert!(rendered.contains('2'));
    }
}
