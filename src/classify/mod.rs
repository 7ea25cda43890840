//! Token Classification
//!
//! Turns raw lexer records into the three display facets of the token
//! panel: lexeme, label and category. Classification is total: every
//! token that is not a line/stream marker yields exactly one row, and
//! kinds the active profile has never heard of land in
//! [`Category::Unclassified`] instead of failing the analysis.
//!
//! ## Label priority
//!
//! 1. identifier kinds show the identifier text
//! 2. literal kinds show the literal text
//! 3. reserved-word kinds show the reserved word
//! 4. symbol values (then symbol kinds) show the symbol
//! 5. anything else shows the kind, de-namespaced and lower-cased
//!
//! ## Category priority
//!
//! reserved word, identifier, literal, operator (value, then kind),
//! punctuation (value, then kind), unclassified.

pub mod profile;

use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::{Category, ClassifiedToken, RawToken};
pub use profile::LanguageProfile;

/// Non-empty text made only of symbol characters
static SYMBOL_TEXT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\p{Alphabetic}\p{Nd}_\s]+$").expect("valid symbol pattern"));

/// Stateless classifier bound to one vocabulary profile
#[derive(Debug, Clone)]
pub struct TokenClassifier {
    profile: Arc<LanguageProfile>,
}

impl TokenClassifier {
    /// Classifier over the given profile
    pub fn new(profile: Arc<LanguageProfile>) -> Self {
        Self { profile }
    }

    /// Classifier over a built-in profile
    pub fn for_profile(name: &str) -> Result<Self> {
        profile::lookup(name)
            .map(Self::new)
            .ok_or_else(|| Error::UnknownProfile {
                name: name.to_string(),
            })
    }

    pub fn profile(&self) -> &LanguageProfile {
        &self.profile
    }

    /// Classify one raw token; `None` means the token is not displayed
    pub fn classify(&self, raw: &RawToken) -> Option<ClassifiedToken> {
        if self.profile.is_terminator(&raw.kind) {
            return None;
        }

        Some(ClassifiedToken {
            lexeme: raw.value.clone().unwrap_or_default(),
            label: self.label(raw),
            category: self.category(raw),
        })
    }

    /// Classify a token stream, dropping markers and keeping order
    pub fn classify_all<'a, I>(&self, raws: I) -> Vec<ClassifiedToken>
    where
        I: IntoIterator<Item = &'a RawToken>,
    {
        raws.into_iter()
            .filter_map(|raw| self.classify(raw))
            .collect()
    }

    fn label(&self, raw: &RawToken) -> String {
        let profile = &*self.profile;
        let kind = raw.kind.as_str();
        let value = raw.value.as_deref();

        if profile.is_identifier(kind) {
            return match value {
                Some(text) if !text.is_empty() => text.to_string(),
                _ => profile.identifier_fallback().to_string(),
            };
        }

        if profile.literal(kind).is_some() {
            return value.unwrap_or_default().to_string();
        }

        if let Some(word) = profile.reserved_word(kind) {
            return word.to_string();
        }

        if let Some(symbol) = value.filter(|v| is_symbol_text(v) && profile.is_symbol(v)) {
            return symbol.to_string();
        }
        if profile.is_symbol(kind) {
            return kind.to_string();
        }

        profile
            .strip_namespace(kind)
            .unwrap_or(kind)
            .to_lowercase()
    }

    fn category(&self, raw: &RawToken) -> Category {
        let profile = &*self.profile;
        let kind = raw.kind.as_str();
        let value = raw.value.as_deref().unwrap_or_default();

        if profile.reserved_word(kind).is_some() {
            return Category::ReservedWord;
        }
        if profile.is_identifier(kind) {
            return Category::Identifier;
        }
        if let Some(literal) = profile.literal(kind) {
            return literal.category();
        }
        if profile.is_operator(value) || profile.is_operator(kind) {
            return Category::Operator;
        }
        if let Some(name) = profile
            .punctuation(value)
            .or_else(|| profile.punctuation(kind))
        {
            return Category::Punctuation(name);
        }

        trace!(kind, "unclassified token kind");
        Category::Unclassified
    }
}

impl Default for TokenClassifier {
    fn default() -> Self {
        Self::new(profile::default_profile())
    }
}

/// Whether `text` consists solely of symbol characters
pub fn is_symbol_text(text: &str) -> bool {
    SYMBOL_TEXT.is_match(text)
}
