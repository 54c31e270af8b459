use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

static NUMERIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-?\d+(\.\d+)?$").expect("valid regex"));

/// Lexical category of a shorthand argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArgumentKind {
    String,
    Bool,
    Numeric,
    /// Leading uppercase, e.g. a model reference such as `User`
    Class,
    /// Dotted path such as `app.locale`
    Variable,
    Null,
}

/// One argument of a shorthand method, e.g. `User` in `belongsTo:User`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Argument {
    pub kind: ArgumentKind,
    pub value: String,
}

impl Argument {
    /// Classify a raw argument by lightweight lexical sniffing
    pub fn parse(raw: &str) -> Self {
        let value = raw.trim();

        if let Some(inner) = unquote(value) {
            return Self::string(inner);
        }

        let kind = if value.is_empty() || value == "~" || value.eq_ignore_ascii_case("null") {
            ArgumentKind::Null
        } else if value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false") {
            ArgumentKind::Bool
        } else if NUMERIC.is_match(value) {
            ArgumentKind::Numeric
        } else if value.starts_with(|c: char| c.is_ascii_uppercase()) {
            ArgumentKind::Class
        } else if value.contains('.') {
            ArgumentKind::Variable
        } else {
            ArgumentKind::String
        };

        let value = match kind {
            ArgumentKind::Null => String::new(),
            ArgumentKind::Bool => value.to_lowercase(),
            _ => value.to_string(),
        };

        Self { kind, value }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self {
            kind: ArgumentKind::String,
            value: value.into(),
        }
    }

    pub fn class(value: impl Into<String>) -> Self {
        Self {
            kind: ArgumentKind::Class,
            value: value.into(),
        }
    }

    pub fn numeric(value: impl Into<String>) -> Self {
        Self {
            kind: ArgumentKind::Numeric,
            value: value.into(),
        }
    }

    pub fn null() -> Self {
        Self {
            kind: ArgumentKind::Null,
            value: String::new(),
        }
    }

    pub fn is_null(&self) -> bool {
        self.kind == ArgumentKind::Null
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Literal form of the argument in generated code
    pub fn render(&self) -> String {
        match self.kind {
            ArgumentKind::String => format!("'{}'", self.value.replace('\'', "\\'")),
            ArgumentKind::Class => format!("{}::class", self.value),
            ArgumentKind::Null => "null".to_string(),
            ArgumentKind::Bool | ArgumentKind::Numeric | ArgumentKind::Variable => {
                self.value.clone()
            }
        }
    }
}

impl fmt::Display for Argument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn unquote(value: &str) -> Option<&str> {
    let first = value.chars().next()?;
    if (first == '\'' || first == '"') && value.len() >= 2 && value.ends_with(first) {
        Some(&value[1..value.len() - 1])
    } else {
        None
    }
}
