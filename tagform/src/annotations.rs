//! `@tag value` annotation parsing for doc blocks.
//!
//! A doc block is any multi-line string. Every line containing `@<prefix>` starts a
//! tag whose key runs up to the first whitespace and whose value is the trimmed
//! rest of that line. A tag with nothing after the key is a presence flag.

use std::fmt;

use indexmap::IndexMap;
use log::warn;
use regex::Regex;
use serde::{Serialize, Serializer};

/// Ordered mapping from tag name (prefix stripped) to its value.
pub type AnnotationMap = IndexMap<String, TagValue>;

/// Value carried by a tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagValue {
    /// Valueless tag such as `@required`.
    Flag,
    Text(String),
    /// The tag appeared more than once; values are kept in source order.
    List(Vec<TagValue>),
}

impl TagValue {
    /// Returns the text when this is a single textual value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the last textual value, looking inside lists.
    pub fn last_text(&self) -> Option<&str> {
        match self {
            TagValue::Text(text) => Some(text),
            TagValue::Flag => None,
            TagValue::List(values) => values.iter().rev().find_map(TagValue::last_text),
        }
    }

    pub fn is_flag(&self) -> bool {
        matches!(self, TagValue::Flag)
    }

    fn push(&mut self, value: TagValue) {
        match self {
            TagValue::List(values) => values.push(value),
            scalar => {
                let first = std::mem::replace(scalar, TagValue::Flag);
                *scalar = TagValue::List(vec![first, value]);
            }
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Flag => f.write_str("true"),
            TagValue::Text(text) => f.write_str(text),
            TagValue::List(values) => {
                f.write_str("[")?;
                for (index, value) in values.iter().enumerate() {
                    if index > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{value}")?;
                }
                f.write_str("]")
            }
        }
    }
}

impl Serialize for TagValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            TagValue::Flag => serializer.serialize_bool(true),
            TagValue::Text(text) => serializer.serialize_str(text),
            TagValue::List(values) => values.serialize(serializer),
        }
    }
}

/// Extracts every `@<prefix>key value` tag from a doc block.
///
/// Repeated keys collect into [`TagValue::List`]. Absent or malformed input yields
/// an empty map; this function never fails.
pub fn extract_tags(doc: &str, prefix: &str) -> AnnotationMap {
    let mut tags = AnnotationMap::new();
    if doc.is_empty() {
        return tags;
    }

    let pattern = format!(r"(?m)@{}(.+?)$", regex::escape(prefix));
    let regex = match Regex::new(&pattern) {
        Ok(regex) => regex,
        Err(err) => {
            warn!("cannot build tag pattern for prefix {prefix:?}: {err}");
            return tags;
        }
    };

    for captures in regex.captures_iter(doc) {
        let Some(body) = captures.get(1) else {
            continue;
        };
        let (key, value) = split_tag(body.as_str());

        match tags.get_mut(key) {
            Some(existing) => existing.push(value),
            None => {
                tags.insert(key.to_string(), value);
            }
        }
    }

    tags
}

fn split_tag(body: &str) -> (&str, TagValue) {
    // `\r` from CRLF blocks; any other whitespace after the key still
    // separates an (empty) value.
    let body = body.trim_end_matches('\r');
    match body.find(char::is_whitespace) {
        Some(separator) => {
            let key = body[..separator].trim();
            let value = body[separator..].trim();
            (key, TagValue::Text(value.to_string()))
        }
        None => (body.trim(), TagValue::Flag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valueless_tag_is_a_flag() {
        let tags = extract_tags("@required", "");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags["required"], TagValue::Flag);
    }

    #[test]
    fn key_and_value_split_on_first_whitespace() {
        let tags = extract_tags("@field Select\n@label Country", "");
        assert_eq!(tags["field"], TagValue::Text("Select".into()));
        assert_eq!(tags["label"], TagValue::Text("Country".into()));
        assert_eq!(tags.keys().collect::<Vec<_>>(), vec!["field", "label"]);
    }

    #[test]
    fn value_keeps_inner_whitespace() {
        let tags = extract_tags("@placeholder   Your  full name  ", "");
        assert_eq!(tags["placeholder"].as_text(), Some("Your  full name"));
    }

    #[test]
    fn repeated_tags_become_an_ordered_list() {
        let tags = extract_tags("@x a\n@x b\n@x c", "");
        assert_eq!(
            tags["x"],
            TagValue::List(vec![
                TagValue::Text("a".into()),
                TagValue::Text("b".into()),
                TagValue::Text("c".into()),
            ])
        );
    }

    #[test]
    fn second_occurrence_wraps_the_first_value() {
        let tags = extract_tags("@flag\n@flag on", "");
        assert_eq!(
            tags["flag"],
            TagValue::List(vec![TagValue::Flag, TagValue::Text("on".into())])
        );
    }

    #[test]
    fn prefix_filters_and_is_stripped() {
        let doc = "@form:field Textarea\n@var string\n@form:rows 4";
        let tags = extract_tags(doc, "form:");
        assert_eq!(tags.len(), 2);
        assert_eq!(tags["field"].as_text(), Some("Textarea"));
        assert_eq!(tags["rows"].as_text(), Some("4"));
        assert!(!tags.contains_key("var"));
    }

    #[test]
    fn prefix_is_matched_literally() {
        let tags = extract_tags("@a.b x\n@axb y", "a.");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags["b"].as_text(), Some("x"));
    }

    #[test]
    fn tags_are_case_sensitive() {
        let tags = extract_tags("@Label Name\n@label name", "");
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn rest_of_line_belongs_to_one_tag() {
        let tags = extract_tags("@class wide @ignore", "");
        assert_eq!(tags.len(), 1);
        assert_eq!(tags["class"].as_text(), Some("wide @ignore"));
    }

    #[test]
    fn comment_decoration_is_tolerated() {
        let doc = "/**\n * The user's email.\n *\n * @validate validate_email\n * @required\n */";
        let tags = extract_tags(doc, "");
        assert_eq!(tags["validate"].as_text(), Some("validate_email"));
        assert!(tags["required"].is_flag());
    }

    #[test]
    fn crlf_blocks_keep_flags_valueless() {
        let tags = extract_tags("@required\r\n@field Select\r\n", "");
        assert!(tags["required"].is_flag());
        assert_eq!(tags["field"].as_text(), Some("Select"));
    }

    #[test]
    fn trailing_space_gives_an_empty_value() {
        let tags = extract_tags("@required \n@hidden\t\r\n", "");
        assert_eq!(tags["required"], TagValue::Text(String::new()));
        assert_eq!(tags["hidden"], TagValue::Text(String::new()));
    }

    #[test]
    fn empty_or_untagged_docs_yield_nothing() {
        assert!(extract_tags("", "").is_empty());
        assert!(extract_tags("Just prose.\nNo tags here.", "").is_empty());
    }

    #[test]
    fn last_text_reads_through_lists() {
        let tags = extract_tags("@label First\n@label Second\n@label", "");
        assert_eq!(tags["label"].last_text(), Some("Second"));
        assert_eq!(tags["label"].to_string(), "[First, Second, true]");
    }
}
