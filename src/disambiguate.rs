//! Phase 3 (operator/operand disambiguation) and phase 4 (compaction).
//!
//! The scan phase deliberately under-classifies: every `+`/`-` comes out
//! as a bare `OperatorInfix` with no subtype, every bareword/number comes
//! out as a bare `Operand` with no subtype, and `Noop` markers stand in
//! for tokens that turn out not to exist (a unary `+` sign). This phase
//! resolves all of that by walking the stream left to right, consulting
//! the token immediately before the one being classified — which, by the
//! time we reach it, has already been reclassified by this same walk.
//! That's what makes `- -5` two prefix operators rather than one infix
//! minus following a prefix minus: the first `-` becomes `OperatorPrefix`
//! before the second one ever asks "is my predecessor value-like?".

use crate::stream::TokenStream;
use crate::token::{Token, TokenSubType, TokenType};

/// Whether `token` is "value-like" immediately to its left: an operand, a
/// postfix operator (`50%`), or the close of a function call or
/// subexpression. This is the single predicate the `-`/`+` rules share —
/// implemented symmetrically, per the design notes, rather than
/// replicating the asymmetric parenthesization the source algorithm has
/// historically carried between its `-` and `+` branches.
fn predecessor_is_value_like(token: &Token) -> bool {
    matches!(
        token.token_type,
        TokenType::Operand | TokenType::OperatorPostfix
    ) || matches!(
        (token.token_type, token.subtype),
        (TokenType::Function, TokenSubType::Stop) | (TokenType::Subexpression, TokenSubType::Stop)
    )
}

fn classify_operand(value: &str) -> TokenSubType {
    if let Ok(n) = value.parse::<f64>() {
        if n.is_finite() {
            return TokenSubType::Number;
        }
    }
    if value == "TRUE" || value == "FALSE" {
        return TokenSubType::Logical;
    }
    TokenSubType::Range
}

fn classify_residual_infix(value: &str) -> TokenSubType {
    if matches!(value.chars().next(), Some('<' | '>' | '=')) {
        TokenSubType::Logical
    } else if value == "&" {
        TokenSubType::Concatenation
    } else {
        TokenSubType::Math
    }
}

/// Runs the disambiguation walk, producing a stream that may still
/// contain `Noop` tokens (dropped `+` signs); the caller compacts them
/// away separately, matching the scan's own "build, then compact" shape.
fn disambiguate(input: &TokenStream) -> Vec<Token> {
    let mut output: Vec<Token> = Vec::with_capacity(input.len());

    for token in input.as_slice() {
        let previous_qualifies = output.last().is_some_and(predecessor_is_value_like);

        let resolved = match (token.token_type, token.subtype, token.value.as_str()) {
            (TokenType::OperatorInfix, _, "-") => {
                if output.is_empty() {
                    Token::new("-", TokenType::OperatorPrefix, TokenSubType::Nothing)
                } else if previous_qualifies {
                    Token::new("-", TokenType::OperatorInfix, TokenSubType::Math)
                } else {
                    Token::new("-", TokenType::OperatorPrefix, TokenSubType::Nothing)
                }
            }
            (TokenType::OperatorInfix, _, "+") => {
                if previous_qualifies {
                    Token::new("+", TokenType::OperatorInfix, TokenSubType::Math)
                } else {
                    Token::new("+", TokenType::Noop, TokenSubType::Nothing)
                }
            }
            (TokenType::OperatorInfix, TokenSubType::Nothing, value) => {
                let subtype = classify_residual_infix(value);
                Token::new(value, TokenType::OperatorInfix, subtype)
            }
            (TokenType::Operand, TokenSubType::Nothing, value) => {
                let subtype = classify_operand(value);
                Token::new(value, TokenType::Operand, subtype)
            }
            (TokenType::Function, subtype, value) => {
                let stripped = value.strip_prefix('@').unwrap_or(value);
                Token::new(stripped, TokenType::Function, subtype)
            }
            _ => token.clone(),
        };

        output.push(resolved);
    }

    output
}

/// Drops every `Noop` token. No returned token ever has type `Noop`.
fn compact(tokens: Vec<Token>) -> TokenStream {
    tokens
        .into_iter()
        .filter(|t| t.token_type != TokenType::Noop)
        .collect()
}

/// Runs phases 3 and 4 together: disambiguate operators and operands,
/// then drop the `Noop` markers that disambiguation produced.
pub(crate) fn disambiguate_and_compact(input: &TokenStream) -> TokenStream {
    tracing::trace!(tokens = input.len(), "disambiguate: start");
    let result = compact(disambiguate(input));
    tracing::trace!(tokens = result.len(), "disambiguate: done");
    result
}
