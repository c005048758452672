use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

/// Field names whose values never reach a log line, whatever they look like.
const SECRET_FIELDS: &[&str] = &[
    "password",
    "token",
    "accessToken",
    "refreshToken",
    "idToken",
    "secret",
    "value",
];

const MASK: &str = "[REDACTED]";

/// Registry for the redaction patterns.
///
/// All patterns are literals known to compile; the `unwrap`s are confined here.
pub struct PiiRegexRegistry;

impl PiiRegexRegistry {
    /// Email pattern: matches standard email addresses
    pub fn email() -> &'static Regex {
        static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
        });
        &EMAIL_REGEX
    }

    /// Opaque token pattern: base64url-ish runs of 24+ characters
    pub fn opaque_token() -> &'static Regex {
        static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9_+/]{24,}={0,2}").unwrap()
        });
        &TOKEN_REGEX
    }
}

/// Redacts sensitive information from a string.
///
/// Emails keep the first character of the local part and the full domain.
/// Opaque tokens (session tokens, OAuth tokens, verification values) become
/// `[REDACTED_TOKEN]`. Emails are handled first so a long address is not
/// mistaken for a token.
pub fn redact(input: &str) -> String {
    let email_redacted = PiiRegexRegistry::email().replace_all(input, |caps: &regex::Captures| {
        let full_match = &caps[0];
        match full_match.split_once('@') {
            Some((local, domain)) if !local.is_empty() => {
                format!("{}***@{domain}", &local[..1])
            }
            _ => full_match.to_string(),
        }
    });

    PiiRegexRegistry::opaque_token()
        .replace_all(&email_redacted, "[REDACTED_TOKEN]")
        .to_string()
}

/// Redacts a JSON document for logging.
///
/// Values under secret field names are masked outright; every other string is
/// passed through [`redact`]. Filter conditions of the shape
/// `{ "field": "token", "value": "..." }` are masked by the `value` rule.
pub fn redact_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(redact(s)),
        Value::Array(items) => Value::Array(items.iter().map(redact_value).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let masked = if SECRET_FIELDS.contains(&k.as_str()) && !v.is_null() {
                        Value::String(MASK.to_string())
                    } else {
                        redact_value(v)
                    };
                    (k.clone(), masked)
                })
                .collect(),
        ),
        other => other.clone(),
    }
}

/// A wrapper that redacts a string when displayed.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
