//! Brace depth tracking and balanced group skipping.

use crate::lexical::Cursor;

/// Depth of tracked `{` `}` pairs
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScopeTracker {
    depth: u32,
}

impl ScopeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn push(&mut self) -> u32 {
        self.depth += 1;
        self.depth
    }

    /// Close one scope. Returns `None` when no scope is open.
    pub fn pop(&mut self) -> Option<u32> {
        self.depth = self.depth.checked_sub(1)?;
        Some(self.depth)
    }
}

/// Consume a balanced `open` ... `close` group starting at the cursor.
///
/// Nested groups of the same delimiter pair only move a depth counter, so
/// nesting is bounded by memory rather than the call stack. String and
/// character literals and comments are stepped over, so delimiters inside
/// them do not count; a digit separator (`1'000`) is not a literal. Scope
/// depth is not touched and nothing is emitted. On failure the cursor is
/// left where it started.
pub fn skip_balanced(cursor: &mut Cursor, open: u8, close: u8) -> bool {
    let mark = cursor.pos();
    if !cursor.eat_byte(open) {
        return false;
    }
    let mut depth = 1usize;
    loop {
        let ok = match cursor.peek() {
            None => false,
            Some(b) if b == close => {
                cursor.bump();
                depth -= 1;
                if depth == 0 {
                    return true;
                }
                true
            }
            Some(b) if b == open => {
                cursor.bump();
                depth += 1;
                true
            }
            Some(b'\'') if cursor.at_digit_separator() => {
                cursor.bump();
                true
            }
            Some(b'"') | Some(b'\'') => skip_literal(cursor),
            Some(b'/') if cursor.starts_with("//") => {
                match cursor.rest().find('\n') {
                    Some(eol) => cursor.advance(eol + 1),
                    None => cursor.advance(cursor.rest().len()),
                }
                true
            }
            Some(b'/') if cursor.starts_with("/*") => match cursor.rest()[2..].find("*/") {
                Some(end) => {
                    cursor.advance(end + 4);
                    true
                }
                None => false,
            },
            Some(_) => {
                cursor.bump();
                true
            }
        };
        if !ok {
            cursor.reset(mark);
            return false;
        }
    }
}

/// Step over a `"..."` or `'...'` literal, honouring backslash escapes
pub fn skip_literal(cursor: &mut Cursor) -> bool {
    let mark = cursor.pos();
    let Some(quote) = cursor.peek() else {
        return false;
    };
    cursor.bump();
    loop {
        match cursor.peek() {
            None => {
                cursor.reset(mark);
                return false;
            }
            Some(b'\\') => cursor.advance(2),
            Some(b) if b == quote => {
                cursor.bump();
                return true;
            }
            Some(_) => cursor.bump(),
        }
    }
}
