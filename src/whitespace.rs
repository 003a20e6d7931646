//! Phase 2: whitespace resolution.
//!
//! Whitespace between two reference-like operands is significant — it's
//! the implicit intersection operator (`A1:A10 B1:B20`). Everywhere else
//! it's noise. This phase is the one place that distinction gets made,
//! by looking at the token on either side of each `Whitespace` token.

use crate::stream::TokenStream;
use crate::token::{Token, TokenSubType, TokenType};

fn predecessor_qualifies(token: &Token) -> bool {
    matches!(token.token_type, TokenType::Operand)
        || matches!(
            (token.token_type, token.subtype),
            (TokenType::Function, TokenSubType::Stop) | (TokenType::Subexpression, TokenSubType::Stop)
        )
}

fn successor_qualifies(token: &Token) -> bool {
    matches!(token.token_type, TokenType::Operand)
        || matches!(
            (token.token_type, token.subtype),
            (TokenType::Function, TokenSubType::Start) | (TokenType::Subexpression, TokenSubType::Start)
        )
}

/// Resolves whitespace tokens in `input`, dropping them unless both
/// neighbors qualify, in which case the whitespace is rewritten to an
/// implicit intersection operator.
///
/// Boundary tokens (no predecessor, or no successor) never produce an
/// intersection, regardless of their own type — there's no well-formed
/// reading of a formula that starts or ends mid-intersection.
///
/// The emitted intersection token's value is a single space, matching how
/// [`crate::render::render`] treats it, rather than whatever (empty)
/// value the scan phase stored on the original `Whitespace` token.
pub(crate) fn resolve(input: &TokenStream) -> TokenStream {
    tracing::trace!(tokens = input.len(), "whitespace: start");
    let tokens = input.as_slice();
    let mut output = TokenStream::with_capacity(tokens.len());

    for (i, token) in tokens.iter().enumerate() {
        if token.token_type != TokenType::Whitespace {
            output.push(token.clone());
            continue;
        }

        let prev = i.checked_sub(1).and_then(|j| tokens.get(j));
        let next = tokens.get(i + 1);

        if let (Some(prev), Some(next)) = (prev, next) {
            if predecessor_qualifies(prev) && successor_qualifies(next) {
                output.push(Token::new(
                    " ",
                    TokenType::OperatorInfix,
                    TokenSubType::Intersection,
                ));
            }
        }
        // Otherwise: drop. Either a disqualifying neighbor, or a boundary
        // whitespace token with no neighbor on one side at all.
    }

    tracing::trace!(tokens = output.len(), "whitespace: done");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::scan;
    use crate::token::{TokenSubType as Sub, TokenType as Ty};

    fn values(stream: &TokenStream) -> Vec<(&str, Ty, Sub)> {
        stream
            .as_slice()
            .iter()
            .map(|t| (t.value.as_str(), t.token_type, t.subtype))
            .collect()
    }

    #[test]
    fn whitespace_between_ranges_becomes_intersection() {
        let scanned = scan("=A1:A10 B1:B20");
        let resolved = resolve(&scanned);
        assert_eq!(
            values(&resolved),
            vec![
                ("=", Ty::OperatorInfix, Sub::Nothing),
                ("A1:A10", Ty::Operand, Sub::Nothing),
                (" ", Ty::OperatorInfix, Sub::Intersection),
                ("B1:B20", Ty::Operand, Sub::Nothing),
            ]
        );
    }

    #[test]
    fn whitespace_around_operator_is_dropped() {
        let scanned = scan("=1 + 2");
        let resolved = resolve(&scanned);
        assert_eq!(
            values(&resolved),
            vec![
                ("=", Ty::OperatorInfix, Sub::Nothing),
                ("1", Ty::Operand, Sub::Nothing),
                ("+", Ty::OperatorInfix, Sub::Nothing),
                ("2", Ty::Operand, Sub::Nothing),
            ]
        );
    }

    #[test]
    fn leading_whitespace_never_becomes_intersection() {
        let scanned = scan("= A1");
        let resolved = resolve(&scanned);
        assert_eq!(
            values(&resolved),
            vec![
                ("=", Ty::OperatorInfix, Sub::Nothing),
                ("A1", Ty::Operand, Sub::Nothing),
            ]
        );
    }

    #[test]
    fn whitespace_between_stop_and_start_becomes_intersection() {
        let scanned = scan("=SUM(A1) (B1)");
        let resolved = resolve(&scanned);
        assert_eq!(
            values(&resolved),
            vec![
                ("=", Ty::OperatorInfix, Sub::Nothing),
                ("SUM", Ty::Function, Sub::Start),
                ("A1", Ty::Operand, Sub::Nothing),
                ("", Ty::Function, Sub::Stop),
                (" ", Ty::OperatorInfix, Sub::Intersection),
                ("", Ty::Subexpression, Sub::Start),
                ("B1", Ty::Operand, Sub::Nothing),
                ("", Ty::Subexpression, Sub::Stop),
            ]
        );
    }
}
