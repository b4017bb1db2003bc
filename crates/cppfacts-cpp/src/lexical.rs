//! Cursor over header text and the skip layer for comments, directives and
//! whitespace.
//!
//! Every structural character the grammar looks at is ASCII, so the cursor
//! works on bytes and only slices the source at token boundaries.

/// Byte cursor over a fully buffered source
#[derive(Debug, Clone)]
pub struct Cursor<'s> {
    src: &'s str,
    pos: usize,
}

impl<'s> Cursor<'s> {
    pub fn new(src: &'s str) -> Self {
        Self { src, pos: 0 }
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move back to a position previously returned by [`Cursor::pos`]
    pub fn reset(&mut self, pos: usize) {
        self.pos = pos;
    }

    pub fn is_eof(&self) -> bool {
        self.pos >= self.src.len()
    }

    fn bytes(&self) -> &'s [u8] {
        &self.src.as_bytes()[self.pos.min(self.src.len())..]
    }

    pub fn peek(&self) -> Option<u8> {
        self.bytes().first().copied()
    }

    pub fn peek_at(&self, offset: usize) -> Option<u8> {
        self.bytes().get(offset).copied()
    }

    /// At a `'` that separates digits (`1'000`, `0xFF'FF`) rather than one
    /// opening a character literal
    pub fn at_digit_separator(&self) -> bool {
        self.peek() == Some(b'\'')
            && self.pos > 0
            && self
                .src
                .as_bytes()
                .get(self.pos - 1)
                .is_some_and(|b| is_ident_byte(*b))
            && self.peek_at(1).is_some_and(is_ident_byte)
            && self.peek_at(2) != Some(b'\'')
    }

    pub fn bump(&mut self) {
        if !self.is_eof() {
            self.pos += 1;
        }
    }

    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.src.len());
    }

    pub fn starts_with(&self, lit: &str) -> bool {
        self.bytes().starts_with(lit.as_bytes())
    }

    /// Consume `lit` if the input continues with it
    pub fn eat(&mut self, lit: &str) -> bool {
        if self.starts_with(lit) {
            self.advance(lit.len());
            true
        } else {
            false
        }
    }

    pub fn eat_byte(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Consume `kw` only when it is a whole word
    pub fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.advance(kw.len());
            true
        } else {
            false
        }
    }

    pub fn at_keyword(&self, kw: &str) -> bool {
        self.starts_with(kw) && !self.peek_at(kw.len()).is_some_and(is_ident_byte)
    }

    /// Consume an identifier: `[A-Za-z_][A-Za-z0-9_]*`
    pub fn ident(&mut self) -> Option<&'s str> {
        let bytes = self.bytes();
        match bytes.first() {
            Some(b) if b.is_ascii_alphabetic() || *b == b'_' => {}
            _ => return None,
        }
        let len = bytes.iter().take_while(|b| is_ident_byte(**b)).count();
        let start = self.pos;
        self.pos += len;
        Some(&self.src[start..self.pos])
    }

    /// Source text between two positions taken from this cursor
    pub fn slice(&self, start: usize, end: usize) -> &'s str {
        &self.src[floor_boundary(self.src, start)..floor_boundary(self.src, end)]
    }

    /// Unconsumed text from the current position
    pub fn rest(&self) -> &'s str {
        &self.src[floor_boundary(self.src, self.pos)..]
    }

    fn skip_while(&mut self, pred: impl Fn(u8) -> bool) -> usize {
        let len = self.bytes().iter().take_while(|b| pred(**b)).count();
        self.pos += len;
        len
    }
}

pub fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Largest char boundary not after `pos`
pub fn floor_boundary(src: &str, pos: usize) -> usize {
    let mut pos = pos.min(src.len());
    while !src.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Skip everything the grammar ignores between matches.
///
/// Returns `true` if anything was skipped. A construct that cannot be skipped
/// completely (an unterminated block comment, a line comment with no line
/// terminator, a directive other than `#pragma once` or `#include`) is left in
/// place for the grammar to fail on.
pub fn skip_ignorable(cursor: &mut Cursor) -> bool {
    let start = cursor.pos();
    loop {
        let before = cursor.pos();
        cursor.skip_while(|b| b.is_ascii_whitespace());
        skip_block_comment(cursor);
        skip_line_comment(cursor);
        skip_pragma_once(cursor);
        skip_include(cursor);
        if cursor.pos() == before {
            break;
        }
    }
    cursor.pos() != start
}

fn skip_block_comment(cursor: &mut Cursor) -> bool {
    if !cursor.starts_with("/*") {
        return false;
    }
    match cursor.rest()[2..].find("*/") {
        Some(end) => {
            cursor.advance(2 + end + 2);
            true
        }
        None => false,
    }
}

fn skip_line_comment(cursor: &mut Cursor) -> bool {
    if !cursor.starts_with("//") {
        return false;
    }
    let rest = cursor.rest().as_bytes();
    match rest.iter().position(|b| *b == b'\n' || *b == b'\r') {
        Some(eol) => {
            let terminator = if rest[eol] == b'\r' && rest.get(eol + 1) == Some(&b'\n') {
                2
            } else {
                1
            };
            cursor.advance(eol + terminator);
            true
        }
        None => false,
    }
}

fn skip_pragma_once(cursor: &mut Cursor) -> bool {
    let mark = cursor.pos();
    if cursor.eat_keyword("#pragma")
        && cursor.skip_while(|b| b == b' ' || b == b'\t') > 0
        && cursor.eat_keyword("once")
    {
        return true;
    }
    cursor.reset(mark);
    false
}

fn skip_include(cursor: &mut Cursor) -> bool {
    let mark = cursor.pos();
    if cursor.eat_keyword("#include") {
        cursor.skip_while(|b| b == b' ' || b == b'\t');
        let close = match cursor.peek() {
            Some(b'<') => Some(b'>'),
            Some(b'"') => Some(b'"'),
            _ => None,
        };
        if let Some(close) = close {
            cursor.bump();
            let path_len = cursor.skip_while(is_include_path_byte);
            if path_len > 0 && cursor.eat_byte(close) {
                return true;
            }
        }
    }
    cursor.reset(mark);
    false
}

fn is_include_path_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'/' | b'.' | b'_' | b'-' | b'+')
}
