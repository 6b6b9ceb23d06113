use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Args;
use indexmap::IndexMap;
use serde::Serialize;
use tagform::{FieldValue, Form, Submission, UploadedFile, ValidationIssue};

use super::parse_key_value;
use crate::examples::ExampleGroup;
use crate::output::{Output, Report};
use crate::scanner::{load_forms, select_form};
use crate::style::Status;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Validate Submissions",
        commands: &[
            "tagform validate forms/contact.toml -d email=ada@example.com -d message=Hi",
            "tagform validate src/forms.rs --form Signup -d username=ada -d password=hunter22",
        ],
    },
    ExampleGroup {
        title: "Uploads and Nested Fields",
        commands: &[
            "tagform validate profile.toml --file avatar=./me.png",
            "tagform validate address.json -d 'address[city]=Paris'",
        ],
    },
];

#[derive(Args)]
pub struct ValidateArgs {
    /// Descriptor file (.toml/.json), Rust source file, or directory
    pub path: PathBuf,

    /// Form to validate when the path holds several
    #[arg(long)]
    pub form: Option<String>,

    /// Submitted value as KEY=VALUE (repeatable)
    #[arg(short = 'd', long = "data", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub data: Vec<(String, String)>,

    /// Uploaded file as KEY=PATH (repeatable)
    #[arg(long = "file", value_name = "KEY=PATH", value_parser = parse_key_value)]
    pub files: Vec<(String, String)>,
}

#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub form: String,
    pub valid: bool,
    pub values: IndexMap<String, FieldValue>,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    pub fn from_form(name: &str, form: &mut Form) -> Self {
        let issues = match form.validate() {
            Ok(()) => Vec::new(),
            Err(err) => err.issues,
        };
        Self {
            form: name.to_string(),
            valid: issues.is_empty(),
            values: form.data(),
            issues,
        }
    }

    fn issue_for(&self, fullname: &str) -> Option<&ValidationIssue> {
        self.issues.iter().find(|issue| issue.field == fullname)
    }
}

impl Report for ValidationReport {
    fn columns(&self) -> &'static [&'static str] {
        &["Field", "Value", "Status", "Message"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.values
            .iter()
            .map(|(fullname, value)| {
                let (status, message) = match self.issue_for(fullname) {
                    Some(issue) => ("invalid", issue.message.as_str()),
                    None => ("ok", ""),
                };
                vec![fullname.clone(), value.to_string(), status.to_string(), message.to_string()]
            })
            .collect()
    }

    fn compact(&self) -> String {
        if self.valid {
            format!("{}: valid", self.form)
        } else {
            let messages: Vec<&str> = self.issues.iter().map(|issue| issue.message.as_str()).collect();
            format!("{}: invalid ({})", self.form, messages.join("; "))
        }
    }
}

fn uploaded_file(path: &Path) -> Result<UploadedFile> {
    let metadata = std::fs::metadata(path).with_context(|| format!("Cannot read upload {}", path.display()))?;
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(UploadedFile::new(name, path, metadata.len()))
}

fn build_submission(args: &ValidateArgs) -> Result<Submission> {
    let mut submission: Submission = args.data.iter().cloned().collect();
    for (key, path) in &args.files {
        submission.files.insert(key.clone(), uploaded_file(Path::new(path))?);
    }
    Ok(submission)
}

pub fn handle_validate(args: ValidateArgs, prefix: Option<&str>, output: &Output) -> Result<()> {
    let loaded = select_form(load_forms(&args.path, prefix)?, args.form.as_deref())?;
    let submission = build_submission(&args)?;

    let mut form = loaded.build()?;
    for key in submission.merged().keys() {
        if form.field(key).is_none() {
            output.status(Status::Warning, &format!("`{key}` does not match any field of {}", loaded.name()));
        }
    }
    form.set_data(submission.merged());

    let report = ValidationReport::from_form(loaded.name(), &mut form);
    output.report(&report)?;

    if !report.valid {
        bail!("Form `{}` is invalid ({} issue(s))", report.form, report.issues.len());
    }
    output.status(Status::Valid, &format!("Form `{}` is valid", report.form));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tagform::ClassDescriptor;

    fn signup() -> Form {
        let descriptor = ClassDescriptor::new("Signup")
            .property("username", "@required")
            .property("age", "@validate int\n@min-range 18");
        tagform::build_from_class(&descriptor, "").unwrap()
    }

    #[test]
    fn reports_each_failing_field() {
        let mut form = signup();
        form.set_data([("age", "12")]);
        let report = ValidationReport::from_form("Signup", &mut form);

        assert!(!report.valid);
        let fields: Vec<_> = report.issues.iter().map(|issue| issue.field.as_str()).collect();
        assert_eq!(fields, vec!["username", "age"]);
        assert_eq!(
            report.compact(),
            "Signup: invalid (username is required; age is not valid)"
        );
    }

    #[test]
    fn valid_reports_list_values() {
        let mut form = signup();
        form.set_data([("username", "ada"), ("age", "36")]);
        let report = ValidationReport::from_form("Signup", &mut form);

        assert!(report.valid);
        assert_eq!(report.compact(), "Signup: valid");
        let rendered = report.table(true).to_string();
        assert!(rendered.contains("ada"));
        assert!(!rendered.contains("invalid"));
    }

    #[test]
    fn uploads_are_read_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"avatar").unwrap();

        let args = ValidateArgs {
            path: PathBuf::from("unused.toml"),
            form: None,
            data: vec![("avatar".to_string(), "text".to_string())],
            files: vec![("avatar".to_string(), file.path().display().to_string())],
        };
        let submission = build_submission(&args).unwrap();
        let upload = submission.merged()["avatar"].as_file().cloned().unwrap();
        assert_eq!(upload.size, 6);
        assert_eq!(upload.path, file.path());
    }

    #[test]
    fn missing_uploads_are_errors() {
        assert!(uploaded_file(Path::new("/nonexistent/upload.bin")).is_err());
    }
}
