//! Validated, schema-qualified table names

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

/// Allowed characters in one identifier part. Parts are always
/// bracket-quoted, so a leading digit is fine.
static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}_#@][\p{L}\p{N}_#@$ -]*$").expect("identifier regex"));

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableNameError {
    #[error("table name is empty")]
    Empty,

    #[error("table name '{0}' has more than three parts")]
    TooManyParts(String),

    #[error("invalid identifier '{part}' in table name '{name}'")]
    InvalidPart { name: String, part: String },
}

/// A table reference of the form `table`, `schema.table` or
/// `database.schema.table`
///
/// Each part must match an identifier allow-list, so a name is always safe
/// to place in SQL text in its bracket-quoted form.
///
/// # Example
/// ```
/// use datasync::table::TableName;
///
/// let name = TableName::parse("dbo.Diwali").unwrap();
/// assert_eq!(name.quoted(), "[dbo].[Diwali]");
/// assert_eq!(name.to_string(), "dbo.Diwali");
///
/// assert!(TableName::parse("dbo.Diwali; DROP TABLE x").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableName {
    parts: Vec<String>,
}

impl TableName {
    pub fn parse(name: &str) -> Result<Self, TableNameError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TableNameError::Empty);
        }

        let parts: Vec<String> = trimmed
            .split('.')
            .map(|part| {
                let part = part.trim();
                part.strip_prefix('[')
                    .and_then(|p| p.strip_suffix(']'))
                    .unwrap_or(part)
                    .to_string()
            })
            .collect();

        if parts.len() > 3 {
            return Err(TableNameError::TooManyParts(trimmed.to_string()));
        }

        if let Some(part) = parts.iter().find(|p| !IDENTIFIER.is_match(p)) {
            return Err(TableNameError::InvalidPart {
                name: trimmed.to_string(),
                part: part.clone(),
            });
        }

        Ok(Self { parts })
    }

    /// Unqualified table name (last part)
    pub fn table(&self) -> &str {
        self.parts.last().map(String::as_str).unwrap_or_default()
    }

    /// Schema part, when qualified
    pub fn schema(&self) -> Option<&str> {
        (self.parts.len() >= 2).then(|| self.parts[self.parts.len() - 2].as_str())
    }

    /// Bracket-quoted form for SQL text
    pub fn quoted(&self) -> String {
        self.parts
            .iter()
            .map(|p| crate::client::quote_ident(p))
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.parts.join("."))
    }
}

impl std::str::FromStr for TableName {
    type Err = TableNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
