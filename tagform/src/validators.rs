use std::net::IpAddr;

use email_address::EmailAddress;
use url::Url;
use uuid::Uuid;

/// Returns `true` if the provided string is a syntactically valid email address.
pub fn is_valid_email(value: &str) -> bool {
    EmailAddress::is_valid(value)
}

/// Returns `true` if the provided string parses as a URL with a scheme.
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok()
}

/// Returns `true` if the provided string parses as a UUID.
pub fn is_valid_uuid(value: &str) -> bool {
    Uuid::parse_str(value).is_ok()
}

/// Returns `true` for IPv4 and IPv6 addresses.
pub fn is_valid_ip(value: &str) -> bool {
    value.parse::<IpAddr>().is_ok()
}

/// Accepts `01:23:45:67:89:ab`, `01-23-45-67-89-ab` and `0123.4567.89ab`.
pub fn is_valid_mac(value: &str) -> bool {
    let hex_groups = |separator: char, count: usize, width: usize| {
        let groups: Vec<&str> = value.split(separator).collect();
        groups.len() == count
            && groups
                .iter()
                .all(|group| group.len() == width && group.chars().all(|c| c.is_ascii_hexdigit()))
    };
    hex_groups(':', 6, 2) || hex_groups('-', 6, 2) || hex_groups('.', 3, 4)
}

/// Host-name rules: dot-separated labels of 1-63 alphanumerics or hyphens, no
/// label starting or ending with a hyphen, 253 characters overall.
pub fn is_valid_domain(value: &str) -> bool {
    let value = value.strip_suffix('.').unwrap_or(value);
    if value.is_empty() || value.len() > 253 {
        return false;
    }
    value.split('.').all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    })
}

/// Parses an integer, tolerating surrounding whitespace.
pub fn parse_int(value: &str) -> Option<i64> {
    value.trim().parse::<i64>().ok()
}

/// Parses a finite float, tolerating surrounding whitespace.
pub fn parse_float(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|number| number.is_finite())
}

/// Recognizes boolean literals: `1/0`, `true/false`, `on/off`, `yes/no`.
pub fn parse_boolean(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
