//! SQL type descriptors and target type mapping

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Map a canonical (lower-case) SQL base type to the target scalar type.
///
/// Unknown base types yield `None`; the caller renders them as an empty type.
pub fn scalar_type(base: &str) -> Option<&'static str> {
    let scalar = match base {
        // Integer types
        "int" | "integer" | "smallint" | "mediumint" | "bigint" | "tinyint" => "int64",
        "timestamp" => "int64",

        // Boolean
        "bool" | "boolean" => "bool",

        // Floating point
        "float" | "double" => "float64",

        // Fixed point is carried as an opaque string
        "decimal" | "numeric" => "string",

        // Character and document types
        "char" | "varchar" | "text" | "blob" | "json" => "string",

        // Binary
        "binary" | "varbinary" => "[]byte",

        // Calendar types
        "date" => "civil.Date",
        "datetime" => "time.Time",

        _ => return None,
    };
    Some(scalar)
}

/// Integer-like base types whose declared width of 1 means a boolean flag
fn is_integer_like(base: &str) -> bool {
    matches!(
        base,
        "bit" | "tinyint" | "smallint" | "mediumint" | "int" | "integer" | "bigint"
    )
}

/// A column's SQL type: base keyword, declared length, array-ness
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SqlType {
    pub base: String,
    pub len: u64,
    pub array: bool,
}

impl SqlType {
    /// Parse a descriptor of the form `base`, `base(len)` or `base(len, scale)`.
    ///
    /// The base is lower-cased and stripped of `unsigned`/`zerofill` modifiers.
    /// An integer-like base with a length of exactly 1 is reclassified as `bool`.
    pub fn parse(descriptor: &str, array: bool) -> Result<Self> {
        let lowered = descriptor.trim().to_lowercase();
        let (head, args) = match lowered.split_once('(') {
            Some((head, rest)) => (head, rest.split_once(')').map_or(rest, |(args, _)| args)),
            None => (lowered.as_str(), ""),
        };
        let mut base = strip_modifiers(head).to_string();

        let mut len = 0;
        // ENUM/SET carry a value list, not a length
        if !args.trim().is_empty() && base != "enum" && base != "set" {
            for (i, literal) in args.split(',').map(str::trim).enumerate() {
                let parsed = literal
                    .parse::<u64>()
                    .map_err(|source| Error::InvalidLength {
                        descriptor: descriptor.to_string(),
                        literal: literal.to_string(),
                        source,
                    })?;
                if i == 0 {
                    len = parsed;
                }
            }
        }

        if len == 1 && is_integer_like(&base) {
            base = "bool".to_string();
        }

        Ok(Self { base, len, array })
    }

    /// Scalar target type for the base, if the base is known
    pub fn scalar(&self) -> Option<&'static str> {
        scalar_type(&self.base)
    }
}

fn strip_modifiers(head: &str) -> &str {
    let mut base = head.trim();
    loop {
        let stripped = base
            .strip_suffix("unsigned")
            .or_else(|| base.strip_suffix("zerofill"))
            .or_else(|| base.strip_suffix("signed"));
        match stripped {
            Some(rest) if rest.ends_with(char::is_whitespace) => base = rest.trim_end(),
            _ => return base,
        }
    }
}

/// Resolved target type of a column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetType {
    /// Bare scalar (`int64`); empty when the base type is unknown
    pub scalar: String,
    /// Scalar wrapped as nullable when the column allows null (`*int64`)
    pub base: String,
    /// `base` wrapped as a sequence when the column is an array (`[]*int64`)
    pub full: String,
}

impl TargetType {
    pub fn resolve(sql_type: &SqlType, not_null: bool) -> Self {
        let scalar = sql_type.scalar().unwrap_or_default().to_string();
        let base = if not_null {
            scalar.clone()
        } else {
            format!("*{scalar}")
        };
        let full = if sql_type.array {
            format!("[]{base}")
        } else {
            base.clone()
        };
        Self { scalar, base, full }
    }
}
