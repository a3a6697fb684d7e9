//! Error types for parsing.

use std::fmt::{self, Display};

use thiserror::Error;

use crate::model::{Token, TokenKind};

/// What the parser was looking for when it gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expected {
    /// The start of an expression: a number, identifier, command or group.
    Expression,
    Relation,
    Kind(TokenKind),
    OneOf(&'static [TokenKind]),
}

impl Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expression => write!(f, "an expression"),
            Self::Relation => write!(f, "a relation"),
            Self::Kind(kind) => write!(f, "{kind}"),
            Self::OneOf(kinds) => {
                for (i, kind) in kinds.iter().enumerate() {
                    if i > 0 {
                        write!(f, " or ")?;
                    }
                    write!(f, "{kind}")?;
                }
                Ok(())
            }
        }
    }
}

/// The error type for parsing a token stream.
///
/// `position` is the index of the offending token in the parsed slice.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    /// A token of the wrong kind, including a missing primary expression.
    #[error("syntax error at token {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        expected: Expected,
        found: Token,
        position: usize,
    },

    /// The token stream ran out in the middle of a production.
    #[error("unexpected end of input at token {position}")]
    UnexpectedEndOfInput { position: usize },

    /// A relation token with no semantic relation kind.
    #[error("relation `{lexeme}` at token {position} has no meaning")]
    UnmappedRelation { lexeme: String, position: usize },

    /// Groups or prefix operators nested deeper than the parser allows.
    #[error("expression at token {position} nests deeper than {limit} levels")]
    NestingTooDeep { limit: usize, position: usize },
}

impl ParseError {
    /// Index of the token the error refers to.
    pub fn position(&self) -> usize {
        match self {
            Self::UnexpectedToken { position, .. }
            | Self::UnexpectedEndOfInput { position }
            | Self::UnmappedRelation { position, .. }
            | Self::NestingTooDeep { position, .. } => *position,
        }
    }
}

/// Result type for parsing.
pub type Result<T> = std::result::Result<T, ParseError>;
