//! Option values attached to fields and forms.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

use crate::annotations::TagValue;
use crate::value::FieldValue;

/// Ordered option mapping. Iteration follows insertion order.
pub type Options = IndexMap<String, OptionValue>;

/// Predicate signature accepted by `validate-with`.
pub type Predicate = dyn Fn(&FieldValue) -> bool + Send + Sync;

/// A named validation predicate.
///
/// The name is what validation messages report as `<name>() returned false`.
#[derive(Clone)]
pub struct Callback {
    name: String,
    func: Arc<Predicate>,
}

impl Callback {
    pub fn new<F>(name: impl Into<String>, func: F) -> Self
    where
        F: Fn(&FieldValue) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            func: Arc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn call(&self, value: &FieldValue) -> bool {
        (self.func)(value)
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callback").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Value of a single option.
#[derive(Debug, Clone)]
pub enum OptionValue {
    Str(String),
    Bool(bool),
    List(Vec<OptionValue>),
    Callback(Callback),
    Raw(serde_json::Value),
}

impl OptionValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Truthiness used by flag-like options such as `required`.
    ///
    /// Strings are false when empty, `"0"` or `"false"` (any case).
    pub fn is_truthy(&self) -> bool {
        match self {
            OptionValue::Str(value) => !(value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false")),
            OptionValue::Bool(value) => *value,
            OptionValue::List(values) => !values.is_empty(),
            OptionValue::Callback(_) => true,
            OptionValue::Raw(value) => match value {
                serde_json::Value::Null => false,
                serde_json::Value::Bool(flag) => *flag,
                serde_json::Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
                serde_json::Value::String(text) => !(text.is_empty() || text == "0"),
                serde_json::Value::Array(items) => !items.is_empty(),
                serde_json::Value::Object(map) => !map.is_empty(),
            },
        }
    }
}

impl PartialEq for OptionValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (OptionValue::Str(a), OptionValue::Str(b)) => a == b,
            (OptionValue::Bool(a), OptionValue::Bool(b)) => a == b,
            (OptionValue::List(a), OptionValue::List(b)) => a == b,
            (OptionValue::Callback(a), OptionValue::Callback(b)) => Arc::ptr_eq(&a.func, &b.func),
            (OptionValue::Raw(a), OptionValue::Raw(b)) => a == b,
            _ => false,
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Str(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Str(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<Callback> for OptionValue {
    fn from(value: Callback) -> Self {
        OptionValue::Callback(value)
    }
}

impl From<serde_json::Value> for OptionValue {
    fn from(value: serde_json::Value) -> Self {
        OptionValue::Raw(value)
    }
}

impl From<TagValue> for OptionValue {
    fn from(value: TagValue) -> Self {
        match value {
            TagValue::Flag => OptionValue::Bool(true),
            TagValue::Text(text) => OptionValue::Str(text),
            TagValue::List(values) => OptionValue::List(values.into_iter().map(OptionValue::from).collect()),
        }
    }
}

impl Serialize for OptionValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            OptionValue::Str(value) => serializer.serialize_str(value),
            OptionValue::Bool(value) => serializer.serialize_bool(*value),
            OptionValue::List(values) => values.serialize(serializer),
            OptionValue::Callback(callback) => serializer.serialize_str(&format!("{}()", callback.name)),
            OptionValue::Raw(value) => value.serialize(serializer),
        }
    }
}

/// Converts an annotation map into options, keeping tag order.
pub fn options_from_tags<I>(tags: I) -> Options
where
    I: IntoIterator<Item = (String, TagValue)>,
{
    tags.into_iter().map(|(key, value)| (key, OptionValue::from(value))).collect()
}

/// Renders string-valued options as `name="value"` pairs.
///
/// `filter` is an allow-list, or a deny-list when `exclude` is set; an empty
/// filter selects everything. Values are emitted verbatim, without escaping.
pub fn attribute_string(options: &Options, filter: Option<&[&str]>, exclude: bool) -> String {
    let filter = filter.filter(|names| !names.is_empty());
    let mut rendered = String::new();

    for (name, value) in options {
        let OptionValue::Str(value) = value else {
            continue;
        };
        if let Some(names) = filter {
            let listed = names.contains(&name.as_str());
            if listed == exclude {
                continue;
            }
        }
        rendered.push(' ');
        rendered.push_str(name);
        rendered.push_str("=\"");
        rendered.push_str(value);
        rendered.push('"');
    }

    rendered.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Options {
        let mut options = Options::new();
        options.insert("class".into(), "wide".into());
        options.insert("required".into(), true.into());
        options.insert("placeholder".into(), "Your name".into());
        options.insert("validate-with".into(), Callback::new("always", |_| true).into());
        options.insert("maxlength".into(), "40".into());
        options
    }

    #[test]
    fn only_string_options_render_in_insertion_order() {
        assert_eq!(
            attribute_string(&sample(), None, false),
            r#"class="wide" placeholder="Your name" maxlength="40""#
        );
    }

    #[test]
    fn allow_list_and_deny_list() {
        let options = sample();
        assert_eq!(
            attribute_string(&options, Some(&["maxlength", "class", "required"]), false),
            r#"class="wide" maxlength="40""#
        );
        assert_eq!(
            attribute_string(&options, Some(&["class"]), true),
            r#"placeholder="Your name" maxlength="40""#
        );
        assert_eq!(attribute_string(&options, Some(&[]), false), attribute_string(&options, None, false));
    }

    #[test]
    fn values_are_not_escaped() {
        let mut options = Options::new();
        options.insert("title".into(), r#"say "hi" <b>"#.into());
        assert_eq!(attribute_string(&options, None, false), r#"title="say "hi" <b>""#);
    }

    #[test]
    fn truthiness() {
        assert!(OptionValue::from(true).is_truthy());
        assert!(!OptionValue::from(false).is_truthy());
        assert!(OptionValue::from("yes").is_truthy());
        assert!(!OptionValue::from("").is_truthy());
        assert!(!OptionValue::from("0").is_truthy());
        assert!(!OptionValue::from("False").is_truthy());
        assert!(!OptionValue::Raw(serde_json::json!(0)).is_truthy());
        assert!(OptionValue::Raw(serde_json::json!([1])).is_truthy());
    }

    #[test]
    fn tags_convert_to_options() {
        let options = options_from_tags([
            ("required".to_string(), TagValue::Flag),
            ("rows".to_string(), TagValue::Text("4".into())),
        ]);
        assert_eq!(options["required"], OptionValue::Bool(true));
        assert_eq!(options["rows"].as_str(), Some("4"));
    }

    #[test]
    fn callbacks_serialize_by_name() {
        let value = OptionValue::from(Callback::new("is_even", |_| false));
        assert_eq!(serde_json::to_string(&value).unwrap(), r#""is_even()""#);
    }
}
