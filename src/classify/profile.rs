//! Language Profiles
//!
//! A profile is the vocabulary the classifier consults: which kinds are
//! reserved words, identifiers, literals or stream markers, and which
//! symbols are operators or punctuation. Profiles are plain data; adding a
//! keyword to the backend means adding an entry here, not a new branch in
//! the classifier.
//!
//! Two profiles ship built in. `gal` is the default; `cgma` is the sibling
//! teaching language served by the same analysis/execution protocol.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::models::{Literal, Punctuation};

/// Name of the profile used when configuration does not pick one
pub const DEFAULT_PROFILE: &str = "gal";

/// Operators shared by both built-in languages
const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "**", "=", "==", "+=", "-=", "*=", "/=", "%=", "<", ">", "<=", ">=",
    "!=", "&&", "||", "!", "++", "--", "~", "`",
];

const PUNCTUATION: &[(&str, Punctuation)] = &[
    ("{", Punctuation::OpenBrace),
    ("}", Punctuation::CloseBrace),
    ("(", Punctuation::OpenParen),
    (")", Punctuation::CloseParen),
    ("[", Punctuation::OpenBracket),
    ("]", Punctuation::CloseBracket),
    (",", Punctuation::Comma),
    (";", Punctuation::Semicolon),
    (":", Punctuation::Colon),
    (".", Punctuation::Dot),
];

/// End-of-line and end-of-stream markers across backend generations
const TERMINATORS: &[&str] = &["TT_NL", "nl", "\n", "TT_EOF", "EOF"];

const IDENTIFIER_KINDS: &[&str] = &["idf", "id", "TT_IDENTIFIER", "identifier"];

const LITERALS: &[(&str, Literal)] = &[
    ("intlit", Literal::Integer),
    ("~intlit", Literal::Integer),
    ("TT_INTEGERLIT", Literal::Integer),
    ("seedlit", Literal::Integer),
    ("seed_lit", Literal::Integer),
    ("dbllit", Literal::Double),
    ("~dbllit", Literal::Double),
    ("TT_DOUBLELIT", Literal::Double),
    ("treelit", Literal::Double),
    ("tree_lit", Literal::Double),
    ("strnglit", Literal::Str),
    ("TT_STRINGLIT", Literal::Str),
    ("string_lit", Literal::Str),
    ("chrlit", Literal::Char),
    ("TT_CHARLIT", Literal::Char),
    ("leaflit", Literal::Char),
    ("leaf_lit", Literal::Char),
    ("branch_lit", Literal::Bool),
    ("TT_BOOL_TRUE", Literal::Bool),
    ("TT_BOOL_FALSE", Literal::Bool),
];

/// Internal namespacing prefixes, longest first
const NAMESPACE_PREFIXES: &[&str] = &["TT_RW_", "TT_"];

const GAL_RESERVED: &[&str] = &[
    "water", "plant", "seed", "leaf", "branch", "tree", "spring", "wither", "bud", "harvest",
    "grow", "cultivate", "tend", "empty", "prune", "skip", "reclaim", "root", "pollinate",
    "variety", "fertile", "soil", "bundle", "string", "sprout",
];

const CGMA_RESERVED: &[&str] = &[
    "chungus", "chudeluxe", "forsen", "forsencd", "lwk", "nocap", "aura", "sturdy", "hawk",
    "tuah", "lethimcook", "jit", "lil", "plug", "yap", "chat", "append", "insert", "remove", "ts",
    "taper", "continue", "getout", "back", "npc", "caseoh", "fein", "true", "false",
];

static GAL: Lazy<Arc<LanguageProfile>> = Lazy::new(|| {
    Arc::new(
        LanguageProfile::new("gal", 2)
            .with_reserved_words(GAL_RESERVED.iter().copied())
            .with_identifier_fallback("id"),
    )
});

static CGMA: Lazy<Arc<LanguageProfile>> = Lazy::new(|| {
    Arc::new(
        LanguageProfile::new("cgma", 1)
            .with_reserved_words(CGMA_RESERVED.iter().copied())
            .with_identifier_fallback("IDF"),
    )
});

/// Names of the built-in profiles
pub fn builtin_names() -> &'static [&'static str] {
    &["gal", "cgma"]
}

/// Find a built-in profile by name (case-insensitive)
pub fn lookup(name: &str) -> Option<Arc<LanguageProfile>> {
    match name.to_ascii_lowercase().as_str() {
        "gal" => Some(Arc::clone(&GAL)),
        "cgma" => Some(Arc::clone(&CGMA)),
        _ => None,
    }
}

/// The default profile
pub fn default_profile() -> Arc<LanguageProfile> {
    Arc::clone(&GAL)
}

/// Immutable vocabulary tables for one taught language
#[derive(Debug, Clone, PartialEq)]
pub struct LanguageProfile {
    /// Profile name as used in configuration
    pub name: String,
    /// Vocabulary revision; bump whenever a table changes
    pub version: u32,
    reserved_words: HashSet<String>,
    identifier_kinds: HashSet<String>,
    literal_kinds: HashMap<String, Literal>,
    terminator_kinds: HashSet<String>,
    operator_symbols: HashSet<String>,
    punctuation_symbols: HashMap<String, Punctuation>,
    namespace_prefixes: Vec<String>,
    identifier_fallback: String,
}

impl LanguageProfile {
    /// Profile with the shared identifier/literal/symbol vocabulary and no
    /// reserved words
    pub fn new(name: impl Into<String>, version: u32) -> Self {
        Self {
            name: name.into(),
            version,
            reserved_words: HashSet::new(),
            identifier_kinds: IDENTIFIER_KINDS.iter().map(|s| s.to_string()).collect(),
            literal_kinds: LITERALS.iter().map(|(k, l)| (k.to_string(), *l)).collect(),
            terminator_kinds: TERMINATORS.iter().map(|s| s.to_string()).collect(),
            operator_symbols: OPERATORS.iter().map(|s| s.to_string()).collect(),
            punctuation_symbols: PUNCTUATION.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
            namespace_prefixes: NAMESPACE_PREFIXES.iter().map(|s| s.to_string()).collect(),
            identifier_fallback: "id".to_string(),
        }
    }

    pub fn with_reserved_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.reserved_words.extend(words.into_iter().map(Into::into));
        self
    }

    pub fn with_identifier_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.identifier_kinds.extend(kinds.into_iter().map(Into::into));
        self
    }

    pub fn with_literal_kind(mut self, kind: impl Into<String>, literal: Literal) -> Self {
        self.literal_kinds.insert(kind.into(), literal);
        self
    }

    pub fn with_terminator_kinds<I, S>(mut self, kinds: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terminator_kinds.extend(kinds.into_iter().map(Into::into));
        self
    }

    pub fn with_operator(mut self, symbol: impl Into<String>) -> Self {
        self.operator_symbols.insert(symbol.into());
        self
    }

    pub fn with_punctuation(mut self, symbol: impl Into<String>, name: Punctuation) -> Self {
        self.punctuation_symbols.insert(symbol.into(), name);
        self
    }

    /// Label used for an identifier token that arrived without text
    pub fn with_identifier_fallback(mut self, label: impl Into<String>) -> Self {
        self.identifier_fallback = label.into();
        self
    }

    pub fn is_terminator(&self, kind: &str) -> bool {
        self.terminator_kinds.contains(kind)
    }

    pub fn is_identifier(&self, kind: &str) -> bool {
        self.identifier_kinds.contains(kind)
    }

    pub fn literal(&self, kind: &str) -> Option<Literal> {
        self.literal_kinds.get(kind).copied()
    }

    pub fn is_operator(&self, symbol: &str) -> bool {
        self.operator_symbols.contains(symbol)
    }

    pub fn punctuation(&self, symbol: &str) -> Option<Punctuation> {
        self.punctuation_symbols.get(symbol).copied()
    }

    /// Whether `symbol` is in either symbol table
    pub fn is_symbol(&self, symbol: &str) -> bool {
        self.is_operator(symbol) || self.punctuation_symbols.contains_key(symbol)
    }

    pub fn identifier_fallback(&self) -> &str {
        &self.identifier_fallback
    }

    /// Canonical reserved word for `kind`, accepting namespaced kinds such
    /// as `TT_RW_PLANT`
    pub fn reserved_word(&self, kind: &str) -> Option<&str> {
        if let Some(word) = self.reserved_words.get(kind) {
            return Some(word.as_str());
        }
        let stripped = self.strip_namespace(kind)?;
        self.reserved_words
            .get(stripped.to_lowercase().as_str())
            .map(String::as_str)
    }

    /// `kind` without the first matching namespacing prefix
    pub fn strip_namespace<'k>(&self, kind: &'k str) -> Option<&'k str> {
        self.namespace_prefixes
            .iter()
            .find_map(|prefix| kind.strip_prefix(prefix.as_str()))
            .filter(|rest| !rest.is_empty())
    }

    pub fn reserved_words(&self) -> impl Iterator<Item = &str> {
        self.reserved_words.iter().map(String::as_str)
    }
}
