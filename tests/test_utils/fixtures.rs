//! Test Fixtures
//!
//! Common test data and fixtures for testing

use seedbed::config::{Config, RuntimeConfig};
use seedbed::models::RawToken;
use seedbed::remote::LexResponse;

/// Runtime configuration with defaults, optionally tweaked
pub fn test_runtime(tweak: impl FnOnce(&mut Config)) -> RuntimeConfig {
    let mut config = Config::default();
    tweak(&mut config);
    RuntimeConfig::from_config(config, None).unwrap()
}

/// Tokens the lexer reports for `plant x = 5;`
pub fn plant_program_tokens() -> Vec<RawToken> {
    vec![
        RawToken::new("plant", "plant").at_line(1),
        RawToken::new("idf", "x").at_line(1),
        RawToken::new("=", "=").at_line(1),
        RawToken::new("intlit", "5").at_line(1),
        RawToken::new(";", ";").at_line(1),
        RawToken::bare("TT_NL").at_line(1),
        RawToken::bare("EOF").at_line(2),
    ]
}

/// Clean analysis response
pub fn lex_ok(tokens: Vec<RawToken>) -> LexResponse {
    LexResponse {
        tokens,
        errors: Vec::new(),
    }
}

/// Analysis response with diagnostics
pub fn lex_error(errors: &[&str]) -> LexResponse {
    LexResponse {
        tokens: Vec::new(),
        errors: errors.iter().map(|e| e.to_string()).collect(),
    }
}
