//! Token Models
//!
//! `RawToken` is what the analysis service sends; `ClassifiedToken` is the
//! three-column row the token panel renders (Lexeme / Token / Token Type).

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A token record as produced by the remote lexer
///
/// The vocabulary of `kind` is owned by the backend and grows over time;
/// nothing here assumes it is closed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawToken {
    /// Backend token identifier (`"idf"`, `"TT_RW_PLANT"`, `";"`, ...)
    #[serde(rename = "type", alias = "kind")]
    pub kind: String,

    /// Source text the token was scanned from
    #[serde(default, deserialize_with = "deserialize_lexeme")]
    pub value: Option<String>,

    /// Source line, carried through but unused by classification
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl RawToken {
    /// Token with a source value
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: Some(value.into()),
            line: None,
        }
    }

    /// Token whose kind alone encodes it (pure punctuation, markers)
    pub fn bare(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
            line: None,
        }
    }

    /// Attach a source line
    pub fn at_line(mut self, line: u32) -> Self {
        self.line = Some(line);
        self
    }
}

/// Backends send the value as a string, a number, a bool or null.
/// Numbers and bools keep their JSON text form.
fn deserialize_lexeme<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// Named punctuation symbols
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Punctuation {
    OpenBrace,
    CloseBrace,
    OpenParen,
    CloseParen,
    OpenBracket,
    CloseBracket,
    Comma,
    Semicolon,
    Colon,
    Dot,
}

impl Punctuation {
    /// Name shown in the Token Type column
    pub fn name(self) -> &'static str {
        match self {
            Punctuation::OpenBrace => "OpenBrace",
            Punctuation::CloseBrace => "CloseBrace",
            Punctuation::OpenParen => "OpenParen",
            Punctuation::CloseParen => "CloseParen",
            Punctuation::OpenBracket => "OpenBracket",
            Punctuation::CloseBracket => "CloseBracket",
            Punctuation::Comma => "Comma",
            Punctuation::Semicolon => "Semicolon",
            Punctuation::Colon => "Colon",
            Punctuation::Dot => "Dot",
        }
    }
}

/// Literal families a kind can denote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Literal {
    Integer,
    Double,
    Str,
    Char,
    Bool,
}

impl Literal {
    pub fn category(self) -> Category {
        match self {
            Literal::Integer => Category::Integer,
            Literal::Double => Category::Double,
            Literal::Str => Category::StringLit,
            Literal::Char => Category::CharLit,
            Literal::Bool => Category::BoolLit,
        }
    }
}

/// Coarse classification shown in the Token Type column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    ReservedWord,
    Identifier,
    Integer,
    Double,
    StringLit,
    CharLit,
    /// `sunshine` / `frost` in gal
    BoolLit,
    Operator,
    Punctuation(Punctuation),
    /// Unknown to the active vocabulary; rendered blank
    Unclassified,
}

impl Category {
    /// Column text for this category
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::ReservedWord => "RW",
            Category::Identifier => "ID",
            Category::Integer => "integer",
            Category::Double => "double",
            Category::StringLit => "string",
            Category::CharLit => "character",
            Category::BoolLit => "boolean",
            Category::Operator => "operator",
            Category::Punctuation(p) => p.name(),
            Category::Unclassified => "",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// One row of the token panel
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassifiedToken {
    /// Literal source text (empty when the backend sent none)
    pub lexeme: String,
    /// Short display form for the Token column
    pub label: String,
    /// Token Type column
    pub category: Category,
}

impl ClassifiedToken {
    /// The three column texts in display order
    pub fn columns(&self) -> [&str; 3] {
        [&self.lexeme, &self.label, self.category.display_name()]
    }
}
