//! Name variants derived from raw SQL identifiers
//!
//! Every derivation is a pure function of the raw identifier, so the
//! projection step can recompute names at output time and always get the
//! same answer.

mod inflection;

use heck::{ToLowerCamelCase, ToUpperCamelCase};
use serde::Serialize;

/// Plural form, with `information` treated as countable.
pub fn pluralize(word: &str) -> String {
    let out = inflection::plural(word);
    match out.as_str() {
        "information" => "informations".to_string(),
        "Information" => "Informations".to_string(),
        _ => out,
    }
}

pub fn singularize(word: &str) -> String {
    inflection::singular(word)
}

/// Lower-case the first character only
pub fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Lower-cased concatenation of the capital letters in `camel`
pub fn short_code(camel: &str) -> String {
    camel
        .chars()
        .filter(char::is_ascii_uppercase)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Upper-camel identifier that is always a valid identifier
pub fn identifier(raw: &str) -> String {
    let camel: String = raw
        .to_upper_camel_case()
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_')
        .collect();
    match camel.chars().next() {
        Some(first) if !first.is_ascii_digit() => camel,
        _ => format!("_{camel}"),
    }
}

/// Canonical key of a table: identifier form of its singular name
pub fn table_key(raw: &str) -> String {
    identifier(&singularize(raw))
}

fn fix_ids_suffix(camel: String) -> String {
    match camel.strip_suffix("ids") {
        Some(head) => format!("{head}Ids"),
        None => camel,
    }
}

fn json_key(raw: &str) -> String {
    let key = raw.to_lower_camel_case();
    if key == "id" {
        return key;
    }
    match key.strip_suffix("id") {
        Some(head) => format!("{head}Id"),
        None => key,
    }
}

/// Full set of names derived from one raw identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Names {
    /// Identifier as written in the DDL
    pub raw: String,
    pub singular: String,
    pub plural: String,
    /// `OrderItem`
    pub camel: String,
    /// `orderItem`
    pub lower_camel: String,
    /// `OrderItems`
    pub camel_plural: String,
    /// `orderItems`
    pub lower_camel_plural: String,
    pub json: String,
    pub short: String,
}

impl Names {
    pub fn derive(raw: &str) -> Self {
        let singular = singularize(raw);
        let plural = pluralize(raw);

        let camel = singular.to_upper_camel_case();
        let lower_camel = lower_first(&camel);
        let camel_plural = fix_ids_suffix(plural.to_upper_camel_case());
        let lower_camel_plural = lower_first(&camel_plural);

        Self {
            raw: raw.to_string(),
            json: json_key(raw),
            short: short_code(&camel),
            singular,
            plural,
            camel,
            lower_camel,
            camel_plural,
            lower_camel_plural,
        }
    }
}
