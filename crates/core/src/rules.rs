use serde_json::Value;
use std::collections::BTreeMap;

/// The default language tag: the empty string.
pub const DEFAULT_LANG: &str = "";

/// A single declarative constraint on a field value: a pure predicate
/// plus per-language descriptions, rendered once at declaration time.
pub struct Rule {
    check: Box<dyn Fn(&Value) -> bool + Send + Sync>,
    descriptions: BTreeMap<String, String>,
}

impl Rule {
    /// Rule with only a default-language description.
    pub fn new(
        check: impl Fn(&Value) -> bool + Send + Sync + 'static,
        description: impl Into<String>,
    ) -> Self {
        Self {
            check: Box::new(check),
            descriptions: BTreeMap::from([(DEFAULT_LANG.to_string(), description.into())]),
        }
    }

    /// Add a localized description for a language tag.
    pub fn describe(mut self, lang: impl Into<String>, description: impl Into<String>) -> Self {
        self.descriptions.insert(lang.into(), description.into());
        self
    }

    /// Run the predicate; `true` means the value satisfies this rule.
    pub fn check(&self, value: &Value) -> bool {
        (self.check)(value)
    }

    /// Description for a language, falling back to the default language
    /// when the rule was never localized for it.
    pub fn description(&self, lang: &str) -> &str {
        self.descriptions
            .get(lang)
            .or_else(|| self.descriptions.get(DEFAULT_LANG))
            .map(String::as_str)
            .unwrap_or_default()
    }

    /// Language tags this rule carries descriptions for.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.descriptions.keys().map(String::as_str)
    }
}

pub fn alphanumeric() -> Rule {
    Rule::new(
        |value| {
            value
                .as_str()
                .is_some_and(|s| s.chars().all(|c| c.is_ascii_alphanumeric()))
        },
        "must only contain alphanumeric characters",
    )
    .describe("DE", "darf nur alphanumerische Zeichen enthalten")
}

pub fn min_max_len(min: usize, max: usize) -> Rule {
    Rule::new(
        move |value| {
            value.as_str().is_some_and(|s| {
                let len = s.chars().count();
                len >= min && len <= max
            })
        },
        format!("must be between {min} and {max} characters long"),
    )
    .describe("DE", format!("muss zwischen {min} und {max} Zeichen lang sein"))
}

pub fn email() -> Rule {
    Rule::new(
        |value| value.as_str().is_some_and(is_email),
        "must be a valid email address",
    )
    .describe("DE", "muss eine gültige E-Mail-Adresse sein")
}

pub fn integer() -> Rule {
    Rule::new(
        |value| value.as_i64().is_some() || value.as_u64().is_some(),
        "must be an integer",
    )
    .describe("DE", "muss eine ganze Zahl sein")
}

pub fn min_max_number(min: i64, max: i64) -> Rule {
    Rule::new(
        move |value| {
            value
                .as_f64()
                .is_some_and(|n| n >= min as f64 && n <= max as f64)
        },
        format!("must be a number between {min} and {max}"),
    )
    .describe("DE", format!("muss eine Zahl zwischen {min} und {max} sein"))
}

pub fn array() -> Rule {
    Rule::new(|value| value.is_array(), "must be a list of values")
        .describe("DE", "muss eine Liste von Werten sein")
}

pub fn array_min_size(min: usize) -> Rule {
    Rule::new(
        move |value| value.as_array().is_some_and(|items| items.len() >= min),
        format!("must contain at least {min} entries"),
    )
    .describe("DE", format!("muss mindestens {min} Einträge enthalten"))
}

/// Every element (or the scalar itself) must be one of the allowed values.
pub fn one_of(allowed: &[&str]) -> Rule {
    let allowed: Vec<String> = allowed.iter().map(|s| s.to_string()).collect();
    let listed = allowed.join(", ");
    let members = allowed.clone();
    Rule::new(
        move |value| match value {
            Value::Array(items) => items
                .iter()
                .all(|item| item.as_str().is_some_and(|s| members.iter().any(|a| a == s))),
            Value::String(s) => members.iter().any(|a| a == s),
            _ => false,
        },
        format!("must only contain known values ({listed})"),
    )
    .describe("DE", format!("darf nur bekannte Werte enthalten ({listed})"))
}

// Deliberately permissive: local@domain.tld with no whitespace. The
// authoritative check is whatever the mail system accepts.
fn is_email(s: &str) -> bool {
    if s.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains("..") {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && tld.len() >= 2,
        None => false,
    }
}
