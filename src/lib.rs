//! A lossless tokenizer for spreadsheet formulas in the Excel formula
//! dialect.
//!
//! Given a formula string, [`tokenize`] produces a flat, ordered sequence
//! of classified [`Token`]s that a formula evaluator, a formatter, or a
//! dependency analyzer can consume directly, without re-scanning
//! characters. Tokenizing is a pure, synchronous, single-pass-plus-two-
//! post-passes operation: it never fails, performs no I/O, and holds no
//! process-wide state.
//!
//! ```
//! use formula_tokenizer::tokenize;
//!
//! let tokens = tokenize("=SUM(A1,B1)");
//! assert_eq!(tokens[1].value, "SUM");
//! ```
//!
//! # The leading `=`
//!
//! A documented quirk, carried over unchanged from the algorithm this
//! crate implements: the leading `=` of a formula is not stripped before
//! scanning. It is normalized onto input that's missing it, then scanned
//! as an ordinary `OperatorInfix`/`Logical` token at position 0. Callers
//! that don't want this token can pass
//! [`TokenizeOptions::strip_leading_equals`] via [`tokenize_with_options`].

mod disambiguate;
mod render;
mod scanner;
mod stream;
mod token;
mod tokenize;
mod whitespace;

pub use render::{pretty_print, render};
pub use stream::TokenStream;
pub use token::{LegalityError, Token, TokenSubType, TokenType};
pub use tokenize::{tokenize, tokenize_with_options, TokenizeOptions};
