use std::mem;

use tracing::{instrument, trace};

use crate::model::{Token, TokenKind};
use crate::parser::symbols;

/// The lexeme emitted for the `\\` end of statement marker.
pub const END_OF_STATEMENT: &str = "\\\\";

pub fn is_alpha(c: char) -> bool {
    c.is_ascii_alphabetic()
}

pub fn is_numeric(c: char) -> bool {
    c.is_ascii_digit()
}

pub fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n')
}

/// States of the tokeniser automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    /// Just saw a `\`.
    Escape,
    /// Inside an escaped name such as `\triangle`.
    Command,
    /// After `%`, collecting comment text.
    Comment,
    /// Saw a `\` inside a comment; a second one ends the statement.
    CommentExit,
    Int,
    Float,
    Scientific,
}

#[derive(Debug)]
struct Tokeniser {
    state: State,
    char_buf: String,
    tokens: Vec<Token>,
}

impl Tokeniser {
    fn new() -> Self {
        Self {
            state: State::Initial,
            char_buf: String::new(),
            tokens: Vec::new(),
        }
    }

    fn emit(&mut self, kind: TokenKind, text: impl Into<String>) {
        self.tokens.push(Token::new(kind, text));
    }

    /// Emit the character buffer as a single token and clear it.
    fn flush(&mut self, kind: TokenKind) {
        let text = mem::take(&mut self.char_buf);
        self.emit(kind, text);
    }

    fn flush_command(&mut self) {
        let kind = symbols::classify_command(&self.char_buf);
        self.flush(kind);
    }

    /// Handle a character that can only stand on its own, returning the next state.
    ///
    /// Used from the initial state and to re-dispatch the character that ended
    /// a command or a number.
    fn single_char(&mut self, c: char) -> State {
        let mut utf8 = [0; 4];
        let name: &str = c.encode_utf8(&mut utf8);

        if let Some(kind) = symbols::delimiter_kind(name) {
            self.emit(kind, name);
        } else if symbols::is_operator(name) {
            self.emit(TokenKind::Operator, name);
        } else if symbols::is_relation(name) {
            self.emit(TokenKind::Relation, name);
        } else if is_alpha(c) {
            self.emit(TokenKind::Identifier, name);
        } else if c == '\\' {
            return State::Escape;
        } else if c == '%' {
            return State::Comment;
        } else if !is_whitespace(c) {
            self.emit(TokenKind::Unknown, name);
        }

        State::Initial
    }

    fn step(&mut self, c: char) {
        self.state = match self.state {
            State::Initial => match c {
                '%' => State::Comment,
                '\\' => State::Escape,
                _ if is_numeric(c) => {
                    self.char_buf.push(c);
                    State::Int
                }
                _ => self.single_char(c),
            },
            State::Comment => {
                if c == '\\' {
                    State::CommentExit
                } else {
                    self.char_buf.push(c);
                    State::Comment
                }
            }
            State::CommentExit => {
                if c == '\\' {
                    self.flush(TokenKind::Comment);
                    self.emit(TokenKind::EndOfStatement, END_OF_STATEMENT);
                    State::Initial
                } else {
                    self.char_buf.push('\\');
                    self.char_buf.push(c);
                    State::Comment
                }
            }
            State::Escape => {
                if is_alpha(c) {
                    self.char_buf.push(c);
                    State::Command
                } else if c == '\\' {
                    self.emit(TokenKind::EndOfStatement, END_OF_STATEMENT);
                    State::Initial
                } else {
                    self.emit(TokenKind::Unknown, c);
                    State::Initial
                }
            }
            State::Command => {
                if is_alpha(c) {
                    self.char_buf.push(c);
                    State::Command
                } else {
                    self.flush_command();
                    self.single_char(c)
                }
            }
            State::Int => match c {
                '.' => {
                    self.char_buf.push(c);
                    State::Float
                }
                'e' => {
                    self.char_buf.push(c);
                    State::Scientific
                }
                _ if is_numeric(c) => {
                    self.char_buf.push(c);
                    State::Int
                }
                _ => {
                    self.flush(TokenKind::Number);
                    self.single_char(c)
                }
            },
            State::Float => match c {
                'e' => {
                    self.char_buf.push(c);
                    State::Scientific
                }
                _ if is_numeric(c) => {
                    self.char_buf.push(c);
                    State::Float
                }
                _ => {
                    self.flush(TokenKind::Number);
                    self.single_char(c)
                }
            },
            State::Scientific => {
                if is_numeric(c) {
                    self.char_buf.push(c);
                    State::Scientific
                } else {
                    self.flush(TokenKind::Number);
                    self.single_char(c)
                }
            }
        };
    }

    /// Flush whatever is left in the buffer once the input runs out.
    fn finish(mut self) -> Vec<Token> {
        if !self.char_buf.is_empty() {
            match self.state {
                State::Command => self.flush_command(),
                State::Int | State::Float | State::Scientific => self.flush(TokenKind::Number),
                State::Comment | State::CommentExit => self.flush(TokenKind::Comment),
                // The buffer is always empty in these states.
                State::Initial | State::Escape => {}
            }
        }
        self.tokens
    }
}

/// Tokenise a document.
///
/// Never fails: characters outside the notation come back as
/// [`TokenKind::Unknown`] tokens for the parser to reject.
#[instrument(skip_all, fields(chars = text.len()))]
pub fn tokenise(text: &str) -> Vec<Token> {
    let mut tokeniser = Tokeniser::new();
    for c in text.chars() {
        tokeniser.step(c);
    }
    let tokens = tokeniser.finish();
    trace!(count = tokens.len(), "tokenised");
    tokens
}
