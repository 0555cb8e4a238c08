//! Decoder for list-valued dataset cells such as `['Python', "C#"]`.
//!
//! Only a flat list of quoted strings is accepted. Anything else (bare words,
//! numbers, nesting, calls) is rejected with the offset where parsing stopped.

use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct TagListError {
    pub offset: usize,
    pub message: String,
}

pub fn parse(cell: &str) -> Result<Vec<String>, TagListError> {
    let mut parser = Parser {
        chars: cell.char_indices().peekable(),
        len: cell.len(),
    };
    parser.list()
}

struct Parser<'a> {
    chars: Peekable<CharIndices<'a>>,
    len: usize,
}

impl<'a> Parser<'a> {
    fn list(&mut self) -> Result<Vec<String>, TagListError> {
        self.skip_whitespace();
        self.expect('[')?;

        let mut tags = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                Some(']') => {
                    self.bump();
                    break;
                }
                Some('\'') | Some('"') => tags.push(self.string()?),
                Some(c) => return Err(self.error(format!("unexpected {:?}", c))),
                None => return Err(self.error("unterminated list")),
            }

            self.skip_whitespace();
            match self.peek() {
                Some(',') => {
                    self.bump();
                }
                Some(']') => {
                    self.bump();
                    break;
                }
                Some(c) => return Err(self.error(format!("expected ',' or ']', found {:?}", c))),
                None => return Err(self.error("unterminated list")),
            }
        }

        self.skip_whitespace();
        if let Some(c) = self.peek() {
            return Err(self.error(format!("trailing {:?} after list", c)));
        }
        Ok(tags)
    }

    fn string(&mut self) -> Result<String, TagListError> {
        let quote = match self.bump() {
            Some(q) => q,
            None => return Err(self.error("expected string")),
        };

        let mut out = String::new();
        loop {
            match self.bump() {
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    Some(c) => {
                        out.push('\\');
                        out.push(c);
                    }
                    None => return Err(self.error("unterminated string")),
                },
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn expect(&mut self, wanted: char) -> Result<(), TagListError> {
        match self.peek() {
            Some(c) if c == wanted => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.error(format!("expected {:?}, found {:?}", wanted, c))),
            None => Err(self.error(format!("expected {:?}, found end of input", wanted))),
        }
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn bump(&mut self) -> Option<char> {
        self.chars.next().map(|(_, c)| c)
    }

    fn error(&mut self, message: impl Into<String>) -> TagListError {
        let offset = self.chars.peek().map_or(self.len, |&(i, _)| i);
        TagListError { offset, message: message.into() }
    }
}
