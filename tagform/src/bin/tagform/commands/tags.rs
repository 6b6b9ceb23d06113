use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use tagform::{AnnotationMap, TagValue};

use crate::examples::ExampleGroup;
use crate::output::{Output, Report};
use crate::style::Status;

pub const EXAMPLES: &[ExampleGroup] = &[
    ExampleGroup {
        title: "Read Tags",
        commands: &[
            "tagform tags doc.txt                     # Tags of a doc block stored in a file",
            "echo '@field Select' | tagform tags       # Tags read from stdin",
        ],
    },
    ExampleGroup {
        title: "Prefixed Tags",
        commands: &["tagform tags doc.txt --prefix form:     # Only @form:* tags"],
    },
];

#[derive(Args)]
pub struct TagsArgs {
    /// File holding the doc block (stdin when omitted)
    pub file: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct TagReport {
    pub prefix: String,
    pub tags: AnnotationMap,
}

fn kind_of(value: &TagValue) -> String {
    match value {
        TagValue::Flag => "flag".to_string(),
        TagValue::Text(_) => "text".to_string(),
        TagValue::List(values) => format!("list({})", values.len()),
    }
}

impl Report for TagReport {
    fn columns(&self) -> &'static [&'static str] {
        &["Tag", "Value", "Kind"]
    }

    fn rows(&self) -> Vec<Vec<String>> {
        self.tags
            .iter()
            .map(|(key, value)| vec![format!("@{}{key}", self.prefix), value.to_string(), kind_of(value)])
            .collect()
    }

    fn compact(&self) -> String {
        self.tags
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

pub fn handle_tags(args: TagsArgs, prefix: Option<&str>, output: &Output) -> Result<()> {
    let doc = match &args.file {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read doc block from stdin")?;
            buffer
        }
    };

    let prefix = prefix.unwrap_or_default();
    let report = TagReport {
        prefix: prefix.to_string(),
        tags: tagform::extract_tags(&doc, prefix),
    };

    if report.tags.is_empty() {
        output.status(Status::Warning, &format!("No @{prefix} tags found"));
        return Ok(());
    }
    output.status(Status::Detail, &format!("{} tag(s) found", report.tags.len()));
    output.report(&report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(doc: &str, prefix: &str) -> TagReport {
        TagReport {
            prefix: prefix.to_string(),
            tags: tagform::extract_tags(doc, prefix),
        }
    }

    #[test]
    fn compact_lists_every_tag() {
        let report = report("@required\n@class a\n@class b", "");
        assert_eq!(report.compact(), "required=true; class=[a, b]");
    }

    #[test]
    fn table_shows_prefixed_keys_and_kinds() {
        let report = report("@f:label Name\n@f:required", "f:");
        let rendered = report.table(true).to_string();
        assert!(rendered.contains("@f:label"));
        assert!(rendered.contains("flag"));
        assert_eq!(kind_of(&TagValue::List(vec![TagValue::Flag, TagValue::Flag])), "list(2)");
    }

    #[test]
    fn json_keeps_tag_order() {
        let report = report("@method post\n@action /go", "");
        let json = serde_json::to_string(&report).unwrap();
        assert_eq!(json, r#"{"prefix":"","tags":{"method":"post","action":"/go"}}"#);
    }
}
