//! Top-level entry point: input normalization plus orchestration of the
//! three tokenization phases.

use crate::disambiguate::disambiguate_and_compact;
use crate::scanner::scan;
use crate::token::Token;
use crate::whitespace::resolve;

/// The tokenizer's entire configuration surface.
///
/// There is no environment-variable or file-based configuration here —
/// every option is constructed and passed in-process by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TokenizeOptions {
    /// If `true`, a leading `=` is consumed during normalization instead
    /// of being scanned as the first token.
    ///
    /// By default this is `false`, matching the documented quirk that a
    /// formula's leading `=` becomes an ordinary `OperatorInfix`/`Logical`
    /// token at position 0 rather than being stripped. Consumers that find
    /// this surprising can set this to `true` to opt out of it.
    pub strip_leading_equals: bool,
}

/// Tokenizes `formula`, returning the disambiguated, compacted token
/// sequence.
///
/// This is a pure function: it allocates no process-wide state, performs
/// no I/O, and never fails. Any syntactic anomaly in `formula` surfaces as
/// an `Unknown`-typed token or a `Range`-subtype operand rather than an
/// error — see the crate documentation for the full error-handling
/// rationale.
///
/// Equivalent to [`tokenize_with_options`] with
/// [`TokenizeOptions::default`].
pub fn tokenize(formula: &str) -> Vec<Token> {
    tokenize_with_options(formula, &TokenizeOptions::default())
}

/// Like [`tokenize`], but with explicit [`TokenizeOptions`].
pub fn tokenize_with_options(formula: &str, options: &TokenizeOptions) -> Vec<Token> {
    let span = tracing::debug_span!("tokenize", formula_len = formula.len());
    let _enter = span.enter();

    let normalized = normalize(formula, options);
    if normalized.is_empty() {
        return Vec::new();
    }

    let scanned = scan(&normalized);
    let whitespace_resolved = resolve(&scanned);
    let tokens = disambiguate_and_compact(&whitespace_resolved).into_vec();

    tracing::debug!(tokens = tokens.len(), "tokenize: done");
    tokens
}

/// Strips leading/trailing whitespace, then prepends `=` to a non-empty
/// result that doesn't already start with it — unless
/// [`TokenizeOptions::strip_leading_equals`] is set, in which case a
/// leading `=` is consumed here instead of being handed to the scanner.
fn normalize(formula: &str, options: &TokenizeOptions) -> String {
    let trimmed = formula.trim();
    if trimmed.is_empty() {
        return String::new();
    }

    if options.strip_leading_equals {
        return trimmed.strip_prefix('=').unwrap_or(trimmed).to_string();
    }

    if trimmed.starts_with('=') {
        trimmed.to_string()
    } else {
        format!("={trimmed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{TokenSubType as Sub, TokenType as Ty};

    fn values(tokens: &[Token]) -> Vec<(&str, Ty, Sub)> {
        tokens
            .iter()
            .map(|t| (t.value.as_str(), t.token_type, t.subtype))
            .collect()
    }

    #[test]
    fn empty_input_yields_empty_stream() {
        assert_eq!(tokenize(""), Vec::new());
        assert_eq!(tokenize("   "), Vec::new());
    }

    #[test]
    fn missing_leading_equals_is_implied() {
        assert_eq!(tokenize("1+2"), tokenize("=1+2"));
    }

    #[test]
    fn strip_leading_equals_option_removes_the_quirk_token() {
        let options = TokenizeOptions {
            strip_leading_equals: true,
        };
        let tokens = tokenize_with_options("=1+2", &options);
        assert_eq!(
            values(&tokens),
            vec![
                ("1", Ty::Operand, Sub::Number),
                ("+", Ty::OperatorInfix, Sub::Math),
                ("2", Ty::Operand, Sub::Number),
            ]
        );
    }

    #[test]
    fn default_keeps_leading_equals_as_logical_infix() {
        let tokens = tokenize("1+2");
        assert_eq!(tokens[0].value, "=");
        assert_eq!(tokens[0].token_type, Ty::OperatorInfix);
        assert_eq!(tokens[0].subtype, Sub::Logical);
    }
}
