//! The token data model: `TokenType`, `TokenSubType`, and the `Token` triple
//! they compose into.

use std::error::Error;
use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// The type half of a token's classification.
///
/// This is a closed set: every token produced by [`crate::tokenize`] has
/// exactly one of these types.
#[derive(Debug, Display, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenType {
    #[strum(to_string = "no-op")]
    Noop,
    #[strum(to_string = "operand")]
    Operand,
    #[strum(to_string = "function")]
    Function,
    #[strum(to_string = "subexpression")]
    Subexpression,
    #[strum(to_string = "argument")]
    Argument,
    #[strum(to_string = "prefix operator")]
    OperatorPrefix,
    #[strum(to_string = "infix operator")]
    OperatorInfix,
    #[strum(to_string = "postfix operator")]
    OperatorPostfix,
    #[strum(to_string = "whitespace")]
    Whitespace,
    #[strum(to_string = "unknown")]
    Unknown,
}

/// The subtype half of a token's classification.
///
/// Most variants only make sense paired with a particular [`TokenType`];
/// see [`Token::is_legal_pair`] for the closed table of legal pairings.
#[derive(Debug, Display, Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenSubType {
    #[strum(to_string = "")]
    Nothing,
    #[strum(to_string = "start")]
    Start,
    #[strum(to_string = "stop")]
    Stop,
    #[strum(to_string = "text")]
    Text,
    #[strum(to_string = "number")]
    Number,
    #[strum(to_string = "logical")]
    Logical,
    #[strum(to_string = "error")]
    Error,
    #[strum(to_string = "range")]
    Range,
    #[strum(to_string = "math")]
    Math,
    #[strum(to_string = "concatenation")]
    Concatenation,
    #[strum(to_string = "intersection")]
    Intersection,
    #[strum(to_string = "union")]
    Union,
}

/// A single classified token: a value together with its type and subtype.
///
/// `Token` intentionally mirrors the `(value, type, subtype)` triple from
/// the wire/API-level description of this tokenizer rather than a richer
/// sum type, so that it serializes as a flat, stable shape for downstream
/// consumers (evaluators, formatters, dependency analyzers) that were not
/// written against this crate's internal enums.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Token {
    pub value: String,
    #[serde(rename = "type")]
    pub token_type: TokenType,
    pub subtype: TokenSubType,
}

impl Token {
    /// Constructs a token without checking the (type, subtype) legality
    /// table. Used internally by the scan/whitespace/disambiguate phases,
    /// which are trusted to only ever produce legal pairs.
    pub(crate) fn new(
        value: impl Into<String>,
        token_type: TokenType,
        subtype: TokenSubType,
    ) -> Self {
        Self {
            value: value.into(),
            token_type,
            subtype,
        }
    }

    /// Whether `(token_type, subtype)` appears in the closed legality
    /// table from the data model.
    pub fn is_legal_pair(token_type: TokenType, subtype: TokenSubType) -> bool {
        use TokenSubType::*;
        use TokenType::*;
        matches!(
            (token_type, subtype),
            (Operand, Text | Number | Logical | Range | Error)
                | (Function, Start | Stop)
                | (Subexpression, Start | Stop)
                | (
                    OperatorInfix,
                    Math | Logical | Concatenation | Intersection | Union
                )
                | (OperatorPrefix, Nothing)
                | (OperatorPostfix, Nothing)
                | (Argument, Nothing)
                | (Whitespace, Nothing)
                | (Noop, Nothing)
                | (Unknown, Nothing)
        )
    }

    pub fn is_start(&self) -> bool {
        self.subtype == TokenSubType::Start
    }

    pub fn is_stop(&self) -> bool {
        self.subtype == TokenSubType::Stop
    }
}

/// Error returned by [`TryFrom`] when constructing a [`Token`] by hand
/// outside of [`crate::tokenize`] with a (type, subtype) pair that is not
/// in the legality table.
///
/// This validates *construction*, not *input* — it never classifies a
/// formula string as malformed, which remains out of scope per the
/// tokenizer's design.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegalityError {
    pub token_type: TokenType,
    pub subtype: TokenSubType,
}

impl fmt::Display for LegalityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} is not a legal subtype for token type {:?}",
            self.subtype, self.token_type
        )
    }
}

impl Error for LegalityError {}

impl TryFrom<(String, TokenType, TokenSubType)> for Token {
    type Error = LegalityError;

    fn try_from(
        (value, token_type, subtype): (String, TokenType, TokenSubType),
    ) -> Result<Self, Self::Error> {
        if !Self::is_legal_pair(token_type, subtype) {
            return Err(LegalityError {
                token_type,
                subtype,
            });
        }
        Ok(Self {
            value,
            token_type,
            subtype,
        })
    }
}
