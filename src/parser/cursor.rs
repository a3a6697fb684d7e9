use crate::error::{ParseError, Result};
use crate::model::{Token, TokenKind};

/// How deeply groups and prefix operators may nest before parsing fails.
pub const MAX_NESTING: usize = 128;

/// Returned by [`TokenStream::peek`] once the stream is exhausted.
static END_OF_STREAM: Token = Token {
    kind: TokenKind::Unknown,
    text: String::new(),
};

/// A single pass, forward only view over a token slice.
#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    tokens: &'a [Token],
    position: usize,
    depth: usize,
}

impl<'a> TokenStream<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    /// The current token, or an empty [`TokenKind::Unknown`] token at the end.
    pub fn peek(&self) -> &'a Token {
        self.tokens.get(self.position).unwrap_or(&END_OF_STREAM)
    }

    /// Does the current token have this kind? Always false at the end.
    pub fn peek_is(&self, kind: TokenKind) -> bool {
        !self.at_end() && self.peek().is(kind)
    }

    pub fn consume(&mut self) -> Result<&'a Token> {
        let token = self
            .tokens
            .get(self.position)
            .ok_or(ParseError::UnexpectedEndOfInput {
                position: self.position,
            })?;
        self.position += 1;
        Ok(token)
    }

    pub fn at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    /// Enter one level of nesting, failing past [`MAX_NESTING`].
    pub fn descend(&mut self) -> Result<()> {
        if self.depth >= MAX_NESTING {
            return Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING,
                position: self.position,
            });
        }
        self.depth += 1;
        Ok(())
    }

    pub fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Index of the token [`peek`](Self::peek) would return.
    pub fn position(&self) -> usize {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tok;

    #[test]
    fn consume_walks_forward() {
        let tokens = [tok!(Identifier, "A"), tok!(Relation, "=")];
        let mut stream = TokenStream::new(&tokens);

        assert_eq!(stream.peek(), &tokens[0]);
        assert_eq!(stream.consume().unwrap(), &tokens[0]);
        assert_eq!(stream.position(), 1);
        assert!(stream.peek_is(TokenKind::Relation));
        assert_eq!(stream.consume().unwrap(), &tokens[1]);
        assert!(stream.at_end());
    }

    #[test]
    fn depth_is_limited() {
        let mut stream = TokenStream::new(&[]);
        for _ in 0..MAX_NESTING {
            stream.descend().unwrap();
        }
        assert_eq!(
            stream.descend(),
            Err(ParseError::NestingTooDeep {
                limit: MAX_NESTING,
                position: 0
            })
        );
        stream.ascend();
        assert!(stream.descend().is_ok());
    }

    #[test]
    fn peek_past_end_is_sentinel() {
        let mut stream = TokenStream::new(&[]);
        assert!(stream.at_end());
        assert_eq!(stream.peek(), &tok!(Unknown, ""));
        assert!(!stream.peek_is(TokenKind::Unknown));
        assert_eq!(
            stream.consume(),
            Err(ParseError::UnexpectedEndOfInput { position: 0 })
        );
    }
}
