//! Reader for the s-expression text notation of the IR.
//!
//! Two spellings are accepted and may be mixed:
//!
//! ```text
//! (call nil :puts (arglist (str "hi")))
//! s(:call, nil, :puts, s(:arglist, s(:str, "hi")))
//! ```
//!
//! Commas count as whitespace and `;` starts a comment running to the end of
//! the line. A bare word in field position (other than `nil`, `true`,
//! `false`) reads as a symbol.

use crate::error::ReadError;
use crate::sexp::{Field, Scalar, Sexp};

/// Deepest node nesting the reader accepts.
pub const MAX_READ_DEPTH: usize = 1_000;

const STACK_RED_ZONE: usize = 64 * 1024;
const STACK_SEGMENT: usize = 1024 * 1024;

/// Read every top-level node in `text`. Empty input yields no nodes.
pub fn read_sexps(text: &str) -> Result<Vec<Sexp>, ReadError> {
    let mut reader = Reader::new(text);
    let mut nodes = Vec::new();
    loop {
        reader.skip_trivia();
        if reader.is_at_end() {
            break;
        }
        nodes.push(reader.read_node()?);
    }
    Ok(nodes)
}

/// Read exactly one node; trailing input other than trivia is an error.
pub fn read_one(text: &str) -> Result<Sexp, ReadError> {
    let mut reader = Reader::new(text);
    reader.skip_trivia();
    let node = reader.read_node()?;
    reader.skip_trivia();
    match reader.peek() {
        None => Ok(node),
        Some(ch) => Err(reader.unexpected(ch)),
    }
}

struct Reader<'a> {
    text: &'a str,
    pos: usize,
    depth: usize,
}

impl<'a> Reader<'a> {
    const fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            depth: 0,
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.text[self.pos..].chars();
        chars.next();
        chars.next()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    /// 1-based line and column of a byte offset.
    fn location(&self, offset: usize) -> (usize, usize) {
        let before = &self.text[..offset.min(self.text.len())];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(newline) => before[newline + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        (line, column)
    }

    fn unexpected(&self, ch: char) -> ReadError {
        let (line, column) = self.location(self.pos);
        ReadError::UnexpectedChar { ch, line, column }
    }

    fn skip_trivia(&mut self) {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || ch == ',' {
                self.bump();
            } else if ch == ';' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn at_node_start(&self) -> bool {
        match self.peek() {
            Some('(') => true,
            Some('s') => self.peek_second() == Some('('),
            _ => false,
        }
    }

    fn read_node(&mut self) -> Result<Sexp, ReadError> {
        if self.depth >= MAX_READ_DEPTH {
            let (line, column) = self.location(self.pos);
            return Err(ReadError::NestingTooDeep {
                limit: MAX_READ_DEPTH,
                line,
                column,
            });
        }
        self.depth += 1;
        let node = stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT, || self.read_node_body());
        self.depth -= 1;
        node
    }

    fn read_node_body(&mut self) -> Result<Sexp, ReadError> {
        if self.peek() == Some('s') && self.peek_second() == Some('(') {
            self.bump();
        }
        match self.bump() {
            Some('(') => {}
            Some(ch) => {
                self.pos -= ch.len_utf8();
                return Err(self.unexpected(ch));
            }
            None => return Err(ReadError::UnexpectedEof { expected: "`(`" }),
        }

        self.skip_trivia();
        if self.peek() == Some(':') {
            self.bump();
        }
        let tag = self.read_word();
        if tag.is_empty() {
            return match self.peek() {
                Some(ch) => Err(self.unexpected(ch)),
                None => Err(ReadError::UnexpectedEof { expected: "a tag" }),
            };
        }

        let mut fields = Vec::new();
        loop {
            self.skip_trivia();
            match self.peek() {
                Some(')') => {
                    self.bump();
                    return Ok(Sexp::new(tag, fields));
                }
                Some(_) => fields.push(self.read_field()?),
                None => return Err(ReadError::UnexpectedEof { expected: "`)`" }),
            }
        }
    }

    fn read_field(&mut self) -> Result<Field, ReadError> {
        if self.at_node_start() {
            return Ok(Field::Node(self.read_node()?));
        }
        let start = self.pos;
        match self.peek() {
            Some('"') => Ok(Field::string(self.read_string()?)),
            Some(':') => {
                self.bump();
                if self.peek() == Some('"') {
                    return Ok(Field::symbol(self.read_string()?));
                }
                let name = self.read_word();
                if name.is_empty() {
                    self.pos = start;
                    return Err(self.unexpected(':'));
                }
                Ok(Field::symbol(name))
            }
            Some('/') => self.read_regex(),
            Some(ch) if ch.is_ascii_digit() => self.read_number(start),
            Some('-' | '+') if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number(start)
            }
            Some(ch) => {
                let word = self.read_word();
                match word {
                    "" => Err(self.unexpected(ch)),
                    "nil" => Ok(Field::nil()),
                    "true" => Ok(Field::from(true)),
                    "false" => Ok(Field::from(false)),
                    _ => Ok(Field::symbol(word)),
                }
            }
            None => Err(ReadError::UnexpectedEof { expected: "a field" }),
        }
    }

    /// Run of characters up to the next delimiter.
    fn read_word(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() || matches!(ch, ',' | '(' | ')' | '"' | ';') {
                break;
            }
            self.bump();
        }
        &self.text[start..self.pos]
    }

    fn read_number(&mut self, start: usize) -> Result<Field, ReadError> {
        let word = self.read_word();
        parse_number(word).ok_or_else(|| {
            let (line, column) = self.location(start);
            ReadError::InvalidNumber {
                text: word.to_string(),
                line,
                column,
            }
        })
    }

    fn read_string(&mut self) -> Result<String, ReadError> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(value),
                Some('\\') => match self.bump() {
                    Some('n') => value.push('\n'),
                    Some('t') => value.push('\t'),
                    Some('r') => value.push('\r'),
                    Some('e') => value.push('\x1b'),
                    Some('0') => value.push('\0'),
                    Some('a') => value.push('\x07'),
                    Some('b') => value.push('\x08'),
                    Some('f') => value.push('\x0c'),
                    Some('v') => value.push('\x0b'),
                    Some('s') => value.push(' '),
                    Some(other) => value.push(other),
                    None => break,
                },
                Some(ch) => value.push(ch),
                None => break,
            }
        }
        let (line, column) = self.location(start);
        Err(ReadError::UnterminatedString { line, column })
    }

    fn read_regex(&mut self) -> Result<Field, ReadError> {
        let start = self.pos;
        self.bump();
        let mut pattern = String::new();
        loop {
            match self.bump() {
                Some('/') => break,
                Some('\\') => {
                    pattern.push('\\');
                    match self.bump() {
                        Some(ch) => pattern.push(ch),
                        None => {
                            let (line, column) = self.location(start);
                            return Err(ReadError::UnterminatedString { line, column });
                        }
                    }
                }
                Some(ch) => pattern.push(ch),
                None => {
                    let (line, column) = self.location(start);
                    return Err(ReadError::UnterminatedString { line, column });
                }
            }
        }
        let mut flags = String::new();
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_alphabetic() {
                break;
            }
            flags.push(ch);
            self.bump();
        }
        Ok(Field::Scalar(Scalar::Regex { pattern, flags }))
    }
}

fn parse_number(word: &str) -> Option<Field> {
    let (bounds, exclusive) = match word.split_once("...") {
        Some(bounds) => (Some(bounds), true),
        None => (word.split_once(".."), false),
    };
    if let Some((start, end)) = bounds {
        return Some(Field::Scalar(Scalar::Range {
            start: parse_integer(start)?,
            end: parse_integer(end)?,
            exclusive,
        }));
    }
    if let Some(value) = parse_integer(word) {
        return Some(Field::from(value));
    }
    let cleaned = word.replace('_', "");
    if !cleaned.contains(['.', 'e', 'E']) {
        return None;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .map(|value| Field::Scalar(Scalar::Float(value)))
}

fn parse_integer(text: &str) -> Option<i64> {
    let cleaned = text.replace('_', "");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<i64>().ok()
}
