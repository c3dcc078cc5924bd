//! Key/value attribute access for persisted model definitions.
//!
//! Models are stored as flat string attributes (the layout file keeps them as
//! element attributes). Integers are read permissively: whatever does not
//! parse as a number becomes `0`, and a missing attribute falls back to the
//! caller's default.

use std::collections::BTreeMap;

/// Flat attribute map of a single persisted element.
pub type Attributes = BTreeMap<String, String>;

/// Parse a leading integer the way C's `atoi` does.
///
/// Leading whitespace is skipped, an optional sign is honoured and digits are
/// consumed until the first non-digit. Anything else yields `0`.
pub fn atoi(s: &str) -> i32 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        value = value * 10 + i64::from(b - b'0');
        if value > i64::from(i32::MAX) + 1 {
            break;
        }
    }

    let value = if negative { -value } else { value };
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Read an integer attribute, using `default` when the attribute is absent.
pub fn get_int(attrs: &Attributes, key: &str, default: i32) -> i32 {
    attrs.get(key).map(|v| atoi(v)).unwrap_or(default)
}

/// Read a string attribute, using `default` when the attribute is absent.
pub fn get_str<'a>(attrs: &'a Attributes, key: &str, default: &'a str) -> &'a str {
    attrs.get(key).map(String::as_str).unwrap_or(default)
}

pub fn set_int(attrs: &mut Attributes, key: &str, value: i32) {
    attrs.insert(key.to_string(), value.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atoi_plain_numbers() {
        assert_eq!(atoi("540"), 540);
        assert_eq!(atoi("-12"), -12);
        assert_eq!(atoi("+7"), 7);
    }

    #[test]
    fn test_atoi_is_permissive() {
        assert_eq!(atoi("  42abc"), 42);
        assert_eq!(atoi("abc"), 0);
        assert_eq!(atoi(""), 0);
        assert_eq!(atoi("-"), 0);
        assert_eq!(atoi("99999999999"), i32::MAX);
    }

    #[test]
    fn test_get_int_defaults_when_missing() {
        let mut attrs = Attributes::new();
        assert_eq!(get_int(&attrs, "DmxPanDegOfRot", 540), 540);

        attrs.insert("DmxPanDegOfRot".to_string(), "360".to_string());
        assert_eq!(get_int(&attrs, "DmxPanDegOfRot", 540), 360);

        // Present but garbage is zero, not the default
        attrs.insert("DmxPanDegOfRot".to_string(), "lots".to_string());
        assert_eq!(get_int(&attrs, "DmxPanDegOfRot", 540), 0);
    }
}
