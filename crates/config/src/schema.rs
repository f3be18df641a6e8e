//! Structural validation of the primary settings document.
//!
//! Serde stops at the first problem it finds. The loader instead wants to
//! report every missing or mistyped field at once, so the raw table is walked
//! against [`SCHEMA`] before anything is deserialized.

use toml::{Table, Value};

use crate::error::FieldError;

/// The expected type of a settings field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A TOML boolean.
    Bool,
    /// A non-negative integer that fits in a `u32`.
    Count,
    /// A float; integers are accepted too.
    Float,
    /// A TOML string.
    String,
}

impl FieldKind {
    fn describe(self) -> &'static str {
        match self {
            Self::Bool => "boolean",
            Self::Count => "non-negative integer",
            Self::Float => "float",
            Self::String => "string",
        }
    }

    fn accepts(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Bool, Value::Boolean(_)) => true,
            (Self::Count, Value::Integer(n)) => u32::try_from(*n).is_ok(),
            (Self::Float, Value::Float(_) | Value::Integer(_)) => true,
            (Self::String, Value::String(_)) => true,
            _ => false,
        }
    }
}

/// A section of the primary document and its required fields.
pub type SectionSchema = (&'static str, &'static [(&'static str, FieldKind)]);

use FieldKind::{Bool, Count, Float, String as Str};

/// Every required section and field of the primary document.
pub const SCHEMA: &[SectionSchema] = &[
    ("cli", &[("emojis", Bool), ("offline", Bool)]),
    (
        "files",
        &[
            ("dependency_files", Str),
            ("identifiers", Str),
            ("ignore_files", Str),
            ("language_names", Str),
            ("language_setup", Str),
            ("output", Str),
            ("shieldsio_icons", Str),
            ("skill_icons", Str),
        ],
    ),
    ("git", &[("repository", Str)]),
    (
        "llm",
        &[
            ("endpoint", Str),
            ("encoding", Str),
            ("model", Str),
            ("rate_limit", Count),
            ("temperature", Float),
            ("tokens", Count),
            ("tokens_max", Count),
        ],
    ),
    (
        "md",
        &[
            ("align", Str),
            ("badges_offline", Str),
            ("badges_shieldsio", Str),
            ("badges_skills", Str),
            ("badges_style", Str),
            ("contribute", Str),
            ("default", Str),
            ("dropdown", Str),
            ("getting_started", Str),
            ("header", Str),
            ("header_left", Str),
            ("image", Str),
            ("modules", Str),
            ("overview", Str),
            ("tables", Str),
            ("toc", Str),
            ("tree", Str),
        ],
    ),
    (
        "prompts",
        &[
            ("features", Str),
            ("overview", Str),
            ("slogan", Str),
            ("summaries", Str),
        ],
    ),
];

/// Checks `document` against [`SCHEMA`], returning every offending field.
///
/// A missing or non-table section yields a single error for the section.
/// Unknown keys are ignored.
///
/// # Examples
///
/// ```
/// use readmeai_config::schema::check_document;
///
/// let document: toml::Table = toml::from_str("[cli]\nemojis = true\n").unwrap();
/// let errors = check_document(&document);
/// assert!(errors.iter().any(|e| e.field == "cli.offline"));
/// assert!(errors.iter().any(|e| e.field == "git"));
/// ```
#[must_use]
pub fn check_document(document: &Table) -> Vec<FieldError> {
    let mut errors = Vec::new();

    for (section, fields) in SCHEMA {
        let table = match document.get(*section) {
            Some(Value::Table(table)) => table,
            Some(other) => {
                errors.push(FieldError::new(
                    *section,
                    format!("expected table, found {}", other.type_str()),
                ));
                continue;
            }
            None => {
                errors.push(FieldError::new(*section, "missing required section"));
                continue;
            }
        };

        for (key, kind) in *fields {
            let field = format!("{section}.{key}");
            match table.get(*key) {
                Some(value) if kind.accepts(value) => {}
                Some(value) => errors.push(FieldError::new(
                    field,
                    format!("expected {}, found {}", kind.describe(), describe_value(value)),
                )),
                None => errors.push(FieldError::new(field, "missing required field")),
            }
        }
    }

    errors
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::Integer(n) => format!("integer {n}"),
        other => other.type_str().to_string(),
    }
}
