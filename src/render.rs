//! The two thin consumers described alongside the primary API: a
//! debugging pretty-printer and a lossy-but-readable formula reconstructor.
//! Neither is part of the core tokenizer; both are simple enough to not
//! need their own phase.

use crate::token::{Token, TokenSubType, TokenType};

/// Linearizes `tokens` one per line as `<indent><value> <<type>> <<subtype>>`,
/// indenting nested groups.
///
/// Indentation increases after any `Start`-subtype token is printed and
/// decreases before any `Stop`-subtype token is printed, so a `Start` and
/// its matching `Stop` line up at the same indent level.
pub fn pretty_print(tokens: &[Token]) -> String {
    let mut output = String::new();
    let mut indent: usize = 0;

    for token in tokens {
        if token.subtype == TokenSubType::Stop {
            indent = indent.saturating_sub(1);
        }

        output.push_str(&"\t".repeat(indent));
        output.push_str(&token.value);
        output.push_str(" <");
        output.push_str(&token.token_type.to_string());
        output.push_str("> <");
        output.push_str(&token.subtype.to_string());
        output.push_str(">\n");

        if token.subtype == TokenSubType::Start {
            indent += 1;
        }
    }

    output
}

/// Reconstructs a textual formula from `tokens`. This is not guaranteed to
/// reproduce the original source text byte-for-byte — whitespace beyond a
/// resolved intersection operator is not recoverable from the token
/// stream — but re-tokenizing the result reproduces the same token
/// structure (see the weak round-trip property in the crate tests).
pub fn render(tokens: &[Token]) -> String {
    let mut output = String::new();

    for token in tokens {
        match (token.token_type, token.subtype) {
            (TokenType::Function, TokenSubType::Start) => {
                output.push_str(&token.value);
                output.push('(');
            }
            (TokenType::Function, TokenSubType::Stop)
            | (TokenType::Subexpression, TokenSubType::Stop) => {
                output.push(')');
            }
            (TokenType::Subexpression, TokenSubType::Start) => {
                output.push('(');
            }
            (TokenType::Operand, TokenSubType::Text) => {
                output.push('"');
                output.push_str(&token.value);
                output.push('"');
            }
            (TokenType::OperatorInfix, TokenSubType::Intersection) => {
                output.push(' ');
            }
            _ => output.push_str(&token.value),
        }
    }

    output
}
