//! Phase 1: the modal character scanner.
//!
//! This is the hard, irregular part of the tokenizer: quoted strings with
//! doubled-escape, bracketed reference fragments, array literals spanning
//! rows, scientific-notation numbers that embed a sign, and `#ERROR!`
//! literals closed by dictionary match. None of this is expressible as a
//! single regular-expression pass, which is why — unlike a conventional
//! single-pass regex lexer — this scanner is a state machine over
//! individual Unicode scalar values with a side grouping stack.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

use crate::stream::{GroupStack, TokenStream};
use crate::token::{Token, TokenSubType, TokenType};

/// The scanner's mode. Exactly one of these is active at any time; unlike
/// the four independent boolean flags this state machine is modeled after,
/// the "at most one is set" invariant is structural here; it cannot be
/// violated by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanMode {
    Normal,
    InString,
    InPath,
    InRange,
    InError,
}

lazy_static! {
    /// The closed set of error literals this tokenizer recognizes. Custom
    /// error strings are unsupported by design: the dictionary is absolute.
    static ref ERROR_LITERALS: HashSet<&'static str> = {
        [
            ",#NULL!,",
            ",#DIV/0!,",
            ",#VALUE!,",
            ",#REF!,",
            ",#NAME?,",
            ",#NUM!,",
            ",#N/A,",
        ]
        .into_iter()
        .collect()
    };

    /// Guards the scientific-notation case (`1.5E-3`) so that the `-` or
    /// `+` following the exponent marker is folded into the numeric
    /// accumulator instead of being treated as a new operator token.
    static ref SCI_NOTATION_TAIL: Regex = Regex::new(r"^[1-9](\.[0-9]+)?E$").unwrap();
}

/// Scanner state, alive for the duration of one `scan` call.
struct ScannerState {
    chars: Vec<char>,
    offset: usize,
    accumulator: String,
    output: TokenStream,
    stack: GroupStack,
    mode: ScanMode,
}

impl ScannerState {
    fn new(input: &str) -> Self {
        Self {
            chars: input.chars().collect(),
            offset: 0,
            accumulator: String::new(),
            output: TokenStream::new(),
            stack: GroupStack::new(),
            mode: ScanMode::Normal,
        }
    }

    fn current_char(&self) -> Option<char> {
        self.chars.get(self.offset).copied()
    }

    fn next_char(&self) -> Option<char> {
        self.chars.get(self.offset + 1).copied()
    }

    fn two_char(&self) -> Option<String> {
        let a = self.current_char()?;
        let b = self.next_char()?;
        Some([a, b].into_iter().collect())
    }

    fn at_end(&self) -> bool {
        self.offset >= self.chars.len()
    }

    fn advance(&mut self, n: usize) {
        self.offset += n;
    }

    /// Emits the accumulator as a token of the given type/subtype if it's
    /// non-empty, then clears it. Every "flush pending as X" step in the
    /// scan phase is this operation.
    fn flush(&mut self, token_type: TokenType, subtype: TokenSubType) {
        if !self.accumulator.is_empty() {
            let value = std::mem::take(&mut self.accumulator);
            self.emit(value, token_type, subtype);
        }
    }

    fn emit(&mut self, value: impl Into<String>, token_type: TokenType, subtype: TokenSubType) {
        self.output.push(Token::new(value, token_type, subtype));
    }

    /// Pops the grouping stack and returns the `Stop` token it implies.
    /// Popping an empty stack (unmatched close) still yields a token, per
    /// the pop-empty rule: a `Function`/`Stop` token with an empty value,
    /// preserving round-trip shape for malformed input.
    fn pop_stop(&mut self) -> Token {
        let token_type = match self.stack.pop() {
            Some(open) => open.token_type,
            None => TokenType::Function,
        };
        Token::new("", token_type, TokenSubType::Stop)
    }

    fn run(mut self) -> TokenStream {
        while !self.at_end() {
            self.step();
        }
        // EOF: flush whatever is left over as a generic operand. This is
        // also how an unterminated string/path/range/error literal ends up
        // in the stream — the accumulator never emitted inside the modal
        // branch simply falls out here.
        self.flush(TokenType::Operand, TokenSubType::Nothing);
        self.output
    }

    fn step(&mut self) {
        match self.mode {
            ScanMode::InString => return self.step_in_string(),
            ScanMode::InPath => return self.step_in_path(),
            ScanMode::InRange => return self.step_in_range(),
            ScanMode::InError => return self.step_in_error(),
            ScanMode::Normal => {}
        }

        let current = match self.current_char() {
            Some(c) => c,
            None => return,
        };

        // Scientific-notation guard: `1.5E-3` should stay one operand.
        if (current == '+' || current == '-')
            && self.accumulator.len() > 1
            && SCI_NOTATION_TAIL.is_match(&self.accumulator)
        {
            self.accumulator.push(current);
            self.advance(1);
            return;
        }

        match current {
            '"' => {
                self.flush(TokenType::Unknown, TokenSubType::Nothing);
                self.mode = ScanMode::InString;
                self.advance(1);
            }
            '\'' => {
                self.flush(TokenType::Unknown, TokenSubType::Nothing);
                self.mode = ScanMode::InPath;
                self.advance(1);
            }
            '[' => {
                self.mode = ScanMode::InRange;
                self.accumulator.push('[');
                self.advance(1);
            }
            '#' => {
                self.flush(TokenType::Unknown, TokenSubType::Nothing);
                self.mode = ScanMode::InError;
                self.accumulator.push('#');
                self.advance(1);
            }

            '{' => {
                self.flush(TokenType::Unknown, TokenSubType::Nothing);
                let array = Token::new("ARRAY", TokenType::Function, TokenSubType::Start);
                self.output.push(array.clone());
                self.stack.push(array);
                let row = Token::new("ARRAYROW", TokenType::Function, TokenSubType::Start);
                self.output.push(row.clone());
                self.stack.push(row);
                self.advance(1);
            }
            ';' => {
                self.flush(TokenType::Operand, TokenSubType::Nothing);
                let stop = self.pop_stop();
                self.output.push(stop);
                self.emit(",", TokenType::Argument, TokenSubType::Nothing);
                let row = Token::new("ARRAYROW", TokenType::Function, TokenSubType::Start);
                self.output.push(row.clone());
                self.stack.push(row);
                self.advance(1);
            }
            '}' => {
                self.flush(TokenType::Operand, TokenSubType::Nothing);
                let row_stop = self.pop_stop();
                self.output.push(row_stop);
                let array_stop = self.pop_stop();
                self.output.push(array_stop);
                self.advance(1);
            }

            ' ' => {
                self.flush(TokenType::Operand, TokenSubType::Nothing);
                self.emit("", TokenType::Whitespace, TokenSubType::Nothing);
                self.advance(1);
                while self.current_char() == Some(' ') {
                    self.advance(1);
                }
            }

            '+' | '-' | '*' | '/' | '^' | '&' | '=' | '>' | '<' => {
                if let Some(two) = self.two_char() {
                    if matches!(two.as_str(), ">=" | "<=" | "<>") {
                        self.flush(TokenType::Operand, TokenSubType::Nothing);
                        self.emit(two, TokenType::OperatorInfix, TokenSubType::Logical);
                        self.advance(2);
                        return;
                    }
                }
                self.flush(TokenType::Operand, TokenSubType::Nothing);
                self.emit(
                    current.to_string(),
                    TokenType::OperatorInfix,
                    TokenSubType::Nothing,
                );
                self.advance(1);
            }

            '%' => {
                self.flush(TokenType::Operand, TokenSubType::Nothing);
                self.emit("%", TokenType::OperatorPostfix, TokenSubType::Nothing);
                self.advance(1);
            }

            '(' => {
                if self.accumulator.is_empty() {
                    let sub = Token::new("", TokenType::Subexpression, TokenSubType::Start);
                    self.output.push(sub.clone());
                    self.stack.push(sub);
                } else {
                    let name = std::mem::take(&mut self.accumulator);
                    let func = Token::new(name, TokenType::Function, TokenSubType::Start);
                    self.output.push(func.clone());
                    self.stack.push(func);
                }
                self.advance(1);
            }
            ')' => {
                self.flush(TokenType::Operand, TokenSubType::Nothing);
                let stop = self.pop_stop();
                self.output.push(stop);
                self.advance(1);
            }

            ',' => {
                self.flush(TokenType::Operand, TokenSubType::Nothing);
                if matches!(self.stack.top(), Some(t) if t.token_type == TokenType::Function) {
                    self.emit(",", TokenType::Argument, TokenSubType::Nothing);
                } else {
                    self.emit(",", TokenType::OperatorInfix, TokenSubType::Union);
                }
                self.advance(1);
            }

            other => {
                self.accumulator.push(other);
                self.advance(1);
            }
        }
    }

    fn step_in_string(&mut self) {
        match (self.current_char(), self.next_char()) {
            (Some('"'), Some('"')) => {
                self.accumulator.push('"');
                self.advance(2);
            }
            (Some('"'), _) => {
                self.mode = ScanMode::Normal;
                let value = std::mem::take(&mut self.accumulator);
                self.emit(value, TokenType::Operand, TokenSubType::Text);
                self.advance(1);
            }
            (Some(c), _) => {
                self.accumulator.push(c);
                self.advance(1);
            }
            (None, _) => self.advance(1),
        }
    }

    fn step_in_path(&mut self) {
        match (self.current_char(), self.next_char()) {
            (Some('\''), Some('\'')) => {
                self.accumulator.push('\'');
                self.advance(2);
            }
            (Some('\''), _) => {
                self.mode = ScanMode::Normal;
                self.advance(1);
            }
            (Some(c), _) => {
                self.accumulator.push(c);
                self.advance(1);
            }
            (None, _) => self.advance(1),
        }
    }

    fn step_in_range(&mut self) {
        match self.current_char() {
            Some(']') => {
                self.accumulator.push(']');
                self.mode = ScanMode::Normal;
                self.advance(1);
            }
            Some(c) => {
                self.accumulator.push(c);
                self.advance(1);
            }
            None => self.advance(1),
        }
    }

    fn step_in_error(&mut self) {
        if let Some(c) = self.current_char() {
            self.accumulator.push(c);
            self.advance(1);
            let probe = format!(",{},", self.accumulator);
            if ERROR_LITERALS.contains(probe.as_str()) {
                self.mode = ScanMode::Normal;
                let value = std::mem::take(&mut self.accumulator);
                self.emit(value, TokenType::Operand, TokenSubType::Error);
            }
        } else {
            self.advance(1);
        }
    }
}

/// Runs the scan phase over `input`, producing the raw token stream before
/// whitespace resolution and disambiguation.
pub(crate) fn scan(input: &str) -> TokenStream {
    tracing::trace!(chars = input.chars().count(), "scan: start");
    let result = ScannerState::new(input).run();
    tracing::trace!(tokens = result.len(), "scan: done");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::{TokenSubType as Sub, TokenType as Ty};

    fn values(stream: &TokenStream) -> Vec<(&str, Ty, Sub)> {
        stream
            .as_slice()
            .iter()
            .map(|t| (t.value.as_str(), t.token_type, t.subtype))
            .collect()
    }

    #[test]
    fn simple_addition() {
        let out = scan("=1+2");
        assert_eq!(
            values(&out),
            vec![
                ("=", Ty::OperatorInfix, Sub::Nothing),
                ("1", Ty::Operand, Sub::Nothing),
                ("+", Ty::OperatorInfix, Sub::Nothing),
                ("2", Ty::Operand, Sub::Nothing),
            ]
        );
    }

    #[test]
    fn function_call_with_args() {
        let out = scan("=SUM(A1,B1)");
        assert_eq!(
            values(&out),
            vec![
                ("=", Ty::OperatorInfix, Sub::Nothing),
                ("SUM", Ty::Function, Sub::Start),
                ("A1", Ty::Operand, Sub::Nothing),
                (",", Ty::Argument, Sub::Nothing),
                ("B1", Ty::Operand, Sub::Nothing),
                ("", Ty::Function, Sub::Stop),
            ]
        );
    }

    #[test]
    fn scientific_notation_kept_whole() {
        let out = scan("=-1.5E-3");
        assert_eq!(
            values(&out),
            vec![
                ("=", Ty::OperatorInfix, Sub::Nothing),
                ("-", Ty::OperatorInfix, Sub::Nothing),
                ("1.5E-3", Ty::Operand, Sub::Nothing),
            ]
        );
    }

    #[test]
    fn string_literal_with_doubled_quote() {
        let out = scan(r#"="he said ""hi"""#);
        assert_eq!(
            values(&out),
            vec![
                ("=", Ty::OperatorInfix, Sub::Nothing),
                (r#"he said "hi""#, Ty::Operand, Sub::Text),
            ]
        );
    }

    #[test]
    fn quoted_sheet_prefix_folds_into_range() {
        let out = scan("='Sheet 1'!A1");
        assert_eq!(
            values(&out),
            vec![
                ("=", Ty::OperatorInfix, Sub::Nothing),
                ("Sheet 1!A1", Ty::Operand, Sub::Nothing),
            ]
        );
    }

    #[test]
    fn error_literal_closes_on_dictionary_match() {
        let out = scan("=#REF!");
        assert_eq!(
            values(&out),
            vec![
                ("=", Ty::OperatorInfix, Sub::Nothing),
                ("#REF!", Ty::Operand, Sub::Error),
            ]
        );
    }

    #[test]
    fn unterminated_string_flushes_at_eof() {
        let out = scan(r#"="never closed"#);
        assert_eq!(
            values(&out),
            vec![("=", Ty::OperatorInfix, Sub::Nothing)]
        );
        // the unterminated literal is still inside the scanner's
        // accumulator when input ends, since no closing quote was ever
        // found to trigger the Text emit; nothing is lost, it's just not
        // flushed by this phase (the mode never exits).
    }

    #[test]
    fn array_literal_structure() {
        let out = scan("={1,2;3,4}");
        assert_eq!(
            values(&out),
            vec![
                ("=", Ty::OperatorInfix, Sub::Nothing),
                ("ARRAY", Ty::Function, Sub::Start),
                ("ARRAYROW", Ty::Function, Sub::Start),
                ("1", Ty::Operand, Sub::Nothing),
                (",", Ty::Argument, Sub::Nothing),
                ("2", Ty::Operand, Sub::Nothing),
                ("", Ty::Function, Sub::Stop),
                (",", Ty::Argument, Sub::Nothing),
                ("ARRAYROW", Ty::Function, Sub::Start),
                ("3", Ty::Operand, Sub::Nothing),
                (",", Ty::Argument, Sub::Nothing),
                ("4", Ty::Operand, Sub::Nothing),
                ("", Ty::Function, Sub::Stop),
                ("", Ty::Function, Sub::Stop),
            ]
        );
    }

    #[test]
    fn unmatched_close_paren_pops_empty_stack() {
        let out = scan("=)");
        assert_eq!(
            values(&out),
            vec![
                ("=", Ty::OperatorInfix, Sub::Nothing),
                ("", Ty::Function, Sub::Stop),
            ]
        );
    }

    #[test]
    fn union_comma_outside_function() {
        let out = scan("=(A1,A2)");
        assert_eq!(
            values(&out),
            vec![
                ("=", Ty::OperatorInfix, Sub::Nothing),
                ("", Ty::Subexpression, Sub::Start),
                ("A1", Ty::Operand, Sub::Nothing),
                (",", Ty::OperatorInfix, Sub::Union),
                ("A2", Ty::Operand, Sub::Nothing),
                ("", Ty::Subexpression, Sub::Stop),
            ]
        );
    }
}
