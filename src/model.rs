use std::fmt::{self, Display};

/// The lexical category of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    Number,
    Command,
    Operator,
    Relation,
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    Separator,
    Comment,
    EndOfStatement,
    Unknown,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Identifier => "identifier",
            Self::Number => "number",
            Self::Command => "command",
            Self::Operator => "operator",
            Self::Relation => "relation",
            Self::LeftBrace => "`{`",
            Self::RightBrace => "`}`",
            Self::LeftParen => "`(`",
            Self::RightParen => "`)`",
            Self::Separator => "`,`",
            Self::Comment => "comment",
            Self::EndOfStatement => "end of statement",
            Self::Unknown => "unknown token",
        };
        write!(f, "{name}")
    }
}

/// A single lexeme and its category.
///
/// `text` holds the decoded lexeme: commands, operators and relations reached
/// through `\` are stored without the backslash, comments without the `%`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Command | TokenKind::Operator | TokenKind::Relation
                if self.text.chars().all(|c| c.is_ascii_alphabetic()) =>
            {
                write!(f, "{} `\\{}`", self.kind, self.text)
            }
            TokenKind::Comment => write!(f, "comment `%{}`", self.text),
            TokenKind::Identifier
            | TokenKind::Number
            | TokenKind::Command
            | TokenKind::Operator
            | TokenKind::Relation
            | TokenKind::Unknown => write!(f, "{} `{}`", self.kind, self.text),
            _ => write!(f, "{}", self.kind),
        }
    }
}

/// Convenience macro for creating a token by kind name and lexeme.
#[macro_export]
macro_rules! tok {
    ($kind:ident, $text:expr) => {
        $crate::model::Token::new($crate::model::TokenKind::$kind, $text)
    };
}
