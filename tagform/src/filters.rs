//! Validation-filter catalog consulted by the `validate` option.
//!
//! A `validate` option names either a registered filter (`validate_email`,
//! `int`, ...) or a slash-delimited regular expression such as `/^[0-9]+$/i`.

use std::fmt;
use std::sync::{OnceLock, PoisonError, RwLock};

use indexmap::IndexMap;
use log::{debug, warn};
use regex::{Regex, RegexBuilder};

use crate::options::Options;
use crate::validators;
use crate::value::FieldValue;

/// Signature of a named filter: the submitted text plus the field's options.
pub type FilterFn = fn(&str, &Options) -> bool;

/// Lookup and application of validation filters.
pub trait FilterRegistry {
    /// Names of every filter this registry recognizes.
    fn filter_names(&self) -> Vec<&str>;

    fn has_filter(&self, name: &str) -> bool {
        self.filter_names().contains(&name)
    }

    /// Applies the named filter. Unknown names never pass.
    fn apply_named_filter(&self, name: &str, value: &FieldValue, options: &Options) -> bool;

    /// Applies a `/body/flags` pattern. Malformed patterns never pass.
    fn apply_regexp_filter(&self, pattern: &str, value: &FieldValue) -> bool;
}

/// Filter registered at link time through `inventory`.
pub struct FilterRegistration {
    pub name: &'static str,
    pub filter: FilterFn,
}

inventory::collect!(FilterRegistration);

/// The built-in catalog plus any filters registered at startup.
#[derive(Clone)]
pub struct StandardFilters {
    filters: IndexMap<String, FilterFn>,
}

impl fmt::Debug for StandardFilters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StandardFilters").field("filters", &self.filter_names()).finish()
    }
}

impl StandardFilters {
    /// Catalog with the built-in filters only.
    pub fn new() -> Self {
        let mut filters: IndexMap<String, FilterFn> = IndexMap::new();
        filters.insert("int".into(), int_filter);
        filters.insert("float".into(), float_filter);
        filters.insert("boolean".into(), |value, _| validators::parse_boolean(value).is_some());
        filters.insert("validate_email".into(), |value, _| validators::is_valid_email(value));
        filters.insert("validate_url".into(), |value, _| validators::is_valid_url(value));
        filters.insert("validate_ip".into(), |value, _| validators::is_valid_ip(value));
        filters.insert("validate_mac".into(), |value, _| validators::is_valid_mac(value));
        filters.insert("validate_domain".into(), |value, _| validators::is_valid_domain(value));
        filters.insert("uuid".into(), |value, _| validators::is_valid_uuid(value));
        Self { filters }
    }

    /// Built-ins plus every [`FilterRegistration`] linked into the binary.
    pub fn with_registered() -> Self {
        let mut catalog = Self::new();
        for registration in inventory::iter::<FilterRegistration>() {
            catalog.register(registration.name, registration.filter);
        }
        catalog
    }

    /// Adds or replaces a filter.
    pub fn register(&mut self, name: impl Into<String>, filter: FilterFn) {
        let name = name.into();
        debug!("registering validation filter `{name}`");
        self.filters.insert(name, filter);
    }
}

impl Default for StandardFilters {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterRegistry for StandardFilters {
    fn filter_names(&self) -> Vec<&str> {
        self.filters.keys().map(String::as_str).collect()
    }

    fn has_filter(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }

    fn apply_named_filter(&self, name: &str, value: &FieldValue, options: &Options) -> bool {
        let (Some(filter), Some(text)) = (self.filters.get(name), value.as_text()) else {
            return false;
        };
        filter(text, options)
    }

    fn apply_regexp_filter(&self, pattern: &str, value: &FieldValue) -> bool {
        let Some(text) = value.as_text() else {
            return false;
        };
        match compile_delimited(pattern) {
            Ok(regex) => regex.is_match(text),
            Err(reason) => {
                warn!("regexp filter {pattern:?} rejected: {reason}");
                false
            }
        }
    }
}

static FILTERS: OnceLock<RwLock<StandardFilters>> = OnceLock::new();

fn registry() -> &'static RwLock<StandardFilters> {
    FILTERS.get_or_init(|| RwLock::new(StandardFilters::with_registered()))
}

/// Snapshot of the process-wide catalog used by
/// [`crate::field::Field::is_valid`]. No lock is held once it returns, so
/// callbacks run during validation may register filters.
pub fn global_filters() -> StandardFilters {
    registry().read().unwrap_or_else(PoisonError::into_inner).clone()
}

/// Registers a filter in the process-wide catalog. Call during startup.
pub fn register_filter(name: impl Into<String>, filter: FilterFn) {
    registry()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(name, filter);
}

/// Splits `/body/flags` into its parts. Returns `None` for anything else.
pub fn split_delimited(pattern: &str) -> Option<(&str, &str)> {
    let rest = pattern.strip_prefix('/')?;
    let end = rest.rfind('/')?;
    let (body, flags) = (&rest[..end], &rest[end + 1..]);
    if body.is_empty() || !flags.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some((body, flags))
}

/// Whether a `validate` value has the shape of a delimited regexp.
pub fn is_regexp_spec(pattern: &str) -> bool {
    split_delimited(pattern).is_some()
}

fn compile_delimited(pattern: &str) -> Result<Regex, String> {
    let (body, flags) = split_delimited(pattern).ok_or_else(|| "not a /pattern/flags string".to_string())?;
    let mut builder = RegexBuilder::new(body);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'x' => builder.ignore_whitespace(true),
            'U' => builder.swap_greed(true),
            'u' | 'D' => &mut builder,
            other => return Err(format!("unsupported flag `{other}`")),
        };
    }
    builder.build().map_err(|err| err.to_string())
}

fn range_bound<T: std::str::FromStr>(options: &Options, key: &str) -> Option<T> {
    options.get(key)?.as_str()?.trim().parse().ok()
}

fn int_filter(value: &str, options: &Options) -> bool {
    let Some(number) = validators::parse_int(value) else {
        return false;
    };
    range_bound::<i64>(options, "min-range").is_none_or(|min| number >= min)
        && range_bound::<i64>(options, "max-range").is_none_or(|max| number <= max)
}

fn float_filter(value: &str, options: &Options) -> bool {
    let Some(number) = validators::parse_float(value) else {
        return false;
    };
    range_bound::<f64>(options, "min-range").is_none_or(|min| number >= min)
        && range_bound::<f64>(options, "max-range").is_none_or(|max| number <= max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::UploadedFile;

    fn text(value: &str) -> FieldValue {
        FieldValue::from(value)
    }

    #[test]
    fn catalog_lists_builtin_names() {
        let filters = StandardFilters::new();
        assert!(filters.has_filter("validate_email"));
        assert!(filters.has_filter("int"));
        assert!(!filters.has_filter("/^a$/"));
        assert_eq!(filters.filter_names()[0], "int");
    }

    #[test]
    fn named_filters_apply_to_text() {
        let filters = StandardFilters::new();
        let options = Options::new();
        assert!(filters.apply_named_filter("validate_email", &text("a@b.co"), &options));
        assert!(!filters.apply_named_filter("validate_email", &text("nope"), &options));
        assert!(filters.apply_named_filter("boolean", &text("off"), &options));
        assert!(!filters.apply_named_filter("missing", &text("x"), &options));
    }

    #[test]
    fn int_filter_honours_ranges() {
        let filters = StandardFilters::new();
        let mut options = Options::new();
        options.insert("min-range".into(), "1".into());
        options.insert("max-range".into(), "10".into());
        assert!(filters.apply_named_filter("int", &text("7"), &options));
        assert!(!filters.apply_named_filter("int", &text("11"), &options));
        assert!(!filters.apply_named_filter("int", &text("0"), &options));
        assert!(!filters.apply_named_filter("int", &text("seven"), &options));
    }

    #[test]
    fn uploads_never_pass_filters() {
        let filters = StandardFilters::new();
        let upload = FieldValue::from(UploadedFile::new("a.txt", "/tmp/a", 1));
        assert!(!filters.apply_named_filter("uuid", &upload, &Options::new()));
        assert!(!filters.apply_regexp_filter("/.*/", &upload));
    }

    #[test]
    fn delimited_patterns() {
        assert_eq!(split_delimited("/^[0-9]+$/"), Some(("^[0-9]+$", "")));
        assert_eq!(split_delimited("/a/b/im"), Some(("a/b", "im")));
        assert_eq!(split_delimited("//"), None);
        assert_eq!(split_delimited("^abc$"), None);
        assert_eq!(split_delimited("/abc/1"), None);
    }

    #[test]
    fn regexp_filter_matches() {
        let filters = StandardFilters::new();
        assert!(filters.apply_regexp_filter("/^[0-9]+$/", &text("123")));
        assert!(!filters.apply_regexp_filter("/^[0-9]+$/", &text("12a")));
        assert!(filters.apply_regexp_filter("/^abc$/i", &text("ABC")));
    }

    #[test]
    fn bad_patterns_fail_closed() {
        let filters = StandardFilters::new();
        assert!(!filters.apply_regexp_filter("/(unclosed/", &text("(unclosed")));
        assert!(!filters.apply_regexp_filter("/abc/q", &text("abc")));
    }

    #[test]
    fn registered_filters_extend_the_catalog() {
        let mut filters = StandardFilters::new();
        filters.register("even", |value, _| validators::parse_int(value).is_some_and(|n| n % 2 == 0));
        assert!(filters.apply_named_filter("even", &text("4"), &Options::new()));
        assert!(!filters.apply_named_filter("even", &text("5"), &Options::new()));
    }
}
