//! Instruction, repeat-block and target parsing.

use stratum_ir::{Basis, Circuit, GateKind, Instruction, QubitId, Target};

use super::Parser;
use crate::error::{ParseError, ParseResult};
use crate::lexer::Token;

impl Parser {
    /// Parse lines until end of input, or until the closing brace of a
    /// repeat block when `in_repeat` is set.
    pub(super) fn parse_block(&mut self, in_repeat: bool) -> ParseResult<Circuit> {
        let mut circuit = Circuit::new();
        loop {
            self.skip_newlines();
            match self.peek() {
                None if in_repeat => {
                    return Err(ParseError::UnexpectedEof(
                        "'}' closing REPEAT block".into(),
                    ));
                }
                None => return Ok(circuit),
                Some(Token::RBrace) if in_repeat => {
                    self.advance();
                    return Ok(circuit);
                }
                Some(Token::Identifier(name)) if name.eq_ignore_ascii_case("REPEAT") => {
                    self.advance();
                    let repetitions = self.parse_int_literal()?;
                    self.expect(Token::LBrace)?;
                    let body = self.parse_block(true)?;
                    circuit.append_repeat(repetitions, body);
                }
                Some(Token::Identifier(_)) => {
                    let line = self.line;
                    let instruction = self.parse_instruction()?;
                    circuit
                        .append(instruction)
                        .map_err(|source| ParseError::CircuitError { line, source })?;
                }
                Some(other) => {
                    let other = other.clone();
                    self.advance();
                    return Err(self.unexpected("instruction", &other));
                }
            }
        }
    }

    /// Parse `NAME(args) targets` up to the end of the line.
    fn parse_instruction(&mut self) -> ParseResult<Instruction> {
        let name = match self.advance() {
            Some(Token::Identifier(name)) => name,
            Some(other) => return Err(self.unexpected("gate name", &other)),
            None => return Err(ParseError::UnexpectedEof("gate name".into())),
        };

        let args = if self.consume(&Token::LParen) {
            self.parse_arguments()?
        } else {
            vec![]
        };

        let mut targets = Vec::new();
        while !self.is_eof() && !self.check(&Token::Newline) && !self.check(&Token::RBrace) {
            targets.push(self.parse_target()?);
        }

        Ok(Instruction::new(GateKind::from_name(&name), targets).with_args(args))
    }

    /// Parse a comma separated argument list after `(`.
    fn parse_arguments(&mut self) -> ParseResult<Vec<f64>> {
        let mut args = Vec::new();
        if self.consume(&Token::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_number()?);
            if self.consume(&Token::RParen) {
                return Ok(args);
            }
            self.expect(Token::Comma)?;
        }
    }

    /// Parse an optionally negated number.
    #[allow(clippy::cast_precision_loss)]
    fn parse_number(&mut self) -> ParseResult<f64> {
        let negative = self.consume(&Token::Minus);
        let value = match self.advance() {
            Some(Token::IntLiteral(v)) => v as f64,
            Some(Token::FloatLiteral(v)) => v,
            Some(other) => return Err(self.unexpected("number", &other)),
            None => return Err(ParseError::UnexpectedEof("number".into())),
        };
        Ok(if negative { -value } else { value })
    }

    /// Parse one target.
    fn parse_target(&mut self) -> ParseResult<Target> {
        match self.advance() {
            Some(Token::Star) => Ok(Target::Combiner),
            Some(Token::IntLiteral(v)) => Ok(Target::Qubit {
                id: self.qubit_id(v)?,
                inverted: false,
            }),
            Some(Token::Not) => match self.advance() {
                Some(Token::IntLiteral(v)) => Ok(Target::Qubit {
                    id: self.qubit_id(v)?,
                    inverted: true,
                }),
                Some(Token::Identifier(word)) => self.pauli_target(&word, true),
                Some(other) => Err(self.unexpected("qubit after '!'", &other)),
                None => Err(ParseError::UnexpectedEof("qubit after '!'".into())),
            },
            Some(Token::Identifier(word)) if word == "rec" => self.parse_record(),
            Some(Token::Identifier(word)) if word == "sweep" => {
                self.expect(Token::LBracket)?;
                let index = self.parse_int_literal()?;
                self.expect(Token::RBracket)?;
                let index = u32::try_from(index)
                    .map_err(|_| self.invalid_target("sweep index out of range"))?;
                Ok(Target::Sweep(index))
            }
            Some(Token::Identifier(word)) => self.pauli_target(&word, false),
            Some(other) => Err(self.unexpected("target", &other)),
            None => Err(ParseError::UnexpectedEof("target".into())),
        }
    }

    /// Parse the remainder of `rec[-k]`.
    fn parse_record(&mut self) -> ParseResult<Target> {
        self.expect(Token::LBracket)?;
        let negative = self.consume(&Token::Minus);
        let lookback = self.parse_int_literal()?;
        self.expect(Token::RBracket)?;
        if !negative || lookback == 0 {
            return Err(self.invalid_target("measurement record lookback must be negative"));
        }
        let lookback = u32::try_from(lookback)
            .map_err(|_| self.invalid_target("measurement record lookback out of range"))?;
        Ok(Target::Record(lookback))
    }

    /// Interpret a word like `X5` as a Pauli target.
    fn pauli_target(&self, word: &str, inverted: bool) -> ParseResult<Target> {
        let mut chars = word.chars();
        let basis = chars.next().and_then(Basis::from_char);
        let digits = chars.as_str();
        match basis {
            Some(basis) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
                let index: u64 = digits
                    .parse()
                    .map_err(|_| self.invalid_target(&format!("'{word}'")))?;
                Ok(Target::Pauli {
                    basis,
                    id: self.qubit_id(index)?,
                    inverted,
                })
            }
            _ => Err(self.invalid_target(&format!("'{word}'"))),
        }
    }

    fn qubit_id(&self, value: u64) -> ParseResult<QubitId> {
        u32::try_from(value)
            .map(QubitId)
            .map_err(|_| self.invalid_target(&format!("qubit index {value} out of range")))
    }

    fn invalid_target(&self, message: &str) -> ParseError {
        ParseError::InvalidTarget {
            line: self.line,
            message: message.to_string(),
        }
    }
}
