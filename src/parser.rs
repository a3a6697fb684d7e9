use std::rc::Rc;

use tracing::{debug, instrument, trace};

use crate::ast::{BoxExpr, Expression, Identifier, Operator, OperatorKind, Relation, Statement};
use crate::error::{Expected, ParseError, Result};
use crate::model::{Token, TokenKind};

pub mod cursor;
pub mod symbols;

pub use cursor::TokenStream;

/// Parse a tokenised document into its statements.
///
/// A statement chain is only parsed on the line after a comment, e.g.
///
/// ```text
/// % opposite sides \\
/// \overline{AB} \cong \overline{CD} \\
/// ```
///
/// Everything else is skipped. The first syntax error aborts the whole parse.
#[instrument(skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &[Token]) -> Result<Vec<Statement>> {
    let mut stream = TokenStream::new(tokens);
    let mut statements = Vec::new();

    while !stream.at_end() {
        if !stream.peek_is(TokenKind::Comment) {
            let skipped = stream.consume()?;
            trace!(%skipped, "skipping token outside a statement");
            continue;
        }

        stream.consume()?;
        if stream.peek_is(TokenKind::EndOfStatement) {
            stream.consume()?;
        }

        if stream.at_end()
            || stream.peek_is(TokenKind::Comment)
            || stream.peek_is(TokenKind::EndOfStatement)
        {
            continue;
        }

        statements.extend(parse_statement_chain(&mut stream)?);
    }

    Ok(statements)
}

/// Parse `expr (relation expr)*` up to the end of the statement.
///
/// Each relation yields one statement, so `A \cong B \cong C` gives two that
/// share the node for `B`. A lone expression yields nothing.
pub fn parse_statement_chain(stream: &mut TokenStream<'_>) -> Result<Vec<Statement>> {
    let start = stream.position();
    let mut left = Rc::new(parse_expression(stream)?);
    let mut statements = Vec::new();

    while !stream.at_end() {
        if stream.peek_is(TokenKind::EndOfStatement) {
            stream.consume()?;
            break;
        }

        let relation = parse_relation(stream)?;
        let right = Rc::new(parse_expression(stream)?);
        statements.push(Statement {
            relation,
            left: Rc::clone(&left),
            right: Rc::clone(&right),
        });
        left = right;
    }

    if statements.is_empty() {
        debug!(start, "discarding chain without a relation");
    } else {
        debug!(start, count = statements.len(), "parsed statement chain");
    }

    Ok(statements)
}

/// Consume one token, which must be a relation.
pub fn parse_relation(stream: &mut TokenStream<'_>) -> Result<Relation> {
    let position = stream.position();
    let token = stream.consume()?;
    if !token.is(TokenKind::Relation) {
        return Err(ParseError::UnexpectedToken {
            expected: Expected::Relation,
            found: token.clone(),
            position,
        });
    }
    Relation::from_token(token, position)
}

/// Parse an expression.
///
/// Precedence, tightest first: primaries, the prefix geometric operators
/// (`\triangle`, `\angle`, `\overline`, `\odot`), then `\cdot \times \div`,
/// then `+ -`. Binary operators group to the left.
///
/// Groups and prefix operators may nest at most
/// [`MAX_NESTING`](cursor::MAX_NESTING) deep.
pub fn parse_expression(stream: &mut TokenStream<'_>) -> Result<Expression> {
    stream.descend()?;
    let expr = parse_additive(stream);
    stream.ascend();
    expr
}

/// The operator at the head of the stream, if it satisfies `class`.
fn peek_operator(stream: &TokenStream<'_>, class: fn(OperatorKind) -> bool) -> Option<Operator> {
    if !stream.peek_is(TokenKind::Operator) {
        return None;
    }
    Operator::from_token(stream.peek()).filter(|op| class(op.kind))
}

fn parse_binary(
    stream: &mut TokenStream<'_>,
    class: fn(OperatorKind) -> bool,
    operand: fn(&mut TokenStream<'_>) -> Result<Expression>,
) -> Result<Expression> {
    let mut left = operand(stream)?;

    while let Some(operator) = peek_operator(stream, class) {
        stream.consume()?;
        let right = operand(stream)?;
        left = Expression::Binary {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        };
    }

    Ok(left)
}

fn parse_additive(stream: &mut TokenStream<'_>) -> Result<Expression> {
    parse_binary(stream, OperatorKind::is_additive, parse_multiplicative)
}

fn parse_multiplicative(stream: &mut TokenStream<'_>) -> Result<Expression> {
    parse_binary(stream, OperatorKind::is_multiplicative, parse_unary)
}

fn parse_unary(stream: &mut TokenStream<'_>) -> Result<Expression> {
    if let Some(operator) = peek_operator(stream, OperatorKind::is_unary) {
        stream.consume()?;
        stream.descend()?;
        let operand = parse_unary(stream);
        stream.ascend();
        let operand: BoxExpr = Box::new(operand?);
        return Ok(Expression::Unary { operator, operand });
    }
    parse_primary(stream)
}

fn parse_primary(stream: &mut TokenStream<'_>) -> Result<Expression> {
    let position = stream.position();
    let token = stream.consume()?;

    match token.kind {
        TokenKind::Number => parse_number(token, position),
        TokenKind::Identifier => {
            let mut points = vec![Identifier::new(token.text.as_str())];
            while stream.peek_is(TokenKind::Identifier) {
                points.push(Identifier::new(stream.consume()?.text.as_str()));
            }
            Ok(if points.len() == 1 {
                Expression::Identifier(points.remove(0))
            } else {
                Expression::Points(points)
            })
        }
        TokenKind::Command => parse_call(stream, token),
        TokenKind::LeftParen => parse_group(stream, TokenKind::RightParen),
        TokenKind::LeftBrace => parse_group(stream, TokenKind::RightBrace),
        _ => Err(ParseError::UnexpectedToken {
            expected: Expected::Expression,
            found: token.clone(),
            position,
        }),
    }
}

fn parse_number(token: &Token, position: usize) -> Result<Expression> {
    // `12e` lexes as one number; read it as its mantissa.
    let text = token.text.strip_suffix('e').unwrap_or(&token.text);
    text.parse::<f64>()
        .map(Expression::Number)
        .map_err(|_| ParseError::UnexpectedToken {
            expected: Expected::Kind(TokenKind::Number),
            found: token.clone(),
            position,
        })
}

/// Parse the rest of a parenthesised or braced sub-expression.
fn parse_group(stream: &mut TokenStream<'_>, close: TokenKind) -> Result<Expression> {
    let expr = parse_expression(stream)?;
    expect(stream, close)?;
    Ok(expr)
}

/// Parse the brace groups following a command, so `\frac{a}{b}` is a call
/// with two groups of one argument each.
fn parse_call(stream: &mut TokenStream<'_>, command: &Token) -> Result<Expression> {
    let callee = Identifier::new(command.text.as_str());
    let mut groups = Vec::new();

    while stream.peek_is(TokenKind::LeftBrace) {
        stream.consume()?;
        groups.push(parse_arguments(stream)?);
    }

    Ok(Expression::Call { callee, groups })
}

/// Parse `expr (, expr)* }` or an empty `}`.
fn parse_arguments(stream: &mut TokenStream<'_>) -> Result<Vec<Expression>> {
    const ARGUMENT_END: &[TokenKind] = &[TokenKind::Separator, TokenKind::RightBrace];

    let mut args = Vec::new();
    if stream.peek_is(TokenKind::RightBrace) {
        stream.consume()?;
        return Ok(args);
    }

    loop {
        args.push(parse_expression(stream)?);

        let position = stream.position();
        let token = stream.consume()?;
        match token.kind {
            TokenKind::Separator => {}
            TokenKind::RightBrace => return Ok(args),
            _ => {
                return Err(ParseError::UnexpectedToken {
                    expected: Expected::OneOf(ARGUMENT_END),
                    found: token.clone(),
                    position,
                });
            }
        }
    }
}

fn expect<'a>(stream: &mut TokenStream<'a>, kind: TokenKind) -> Result<&'a Token> {
    let position = stream.position();
    let token = stream.consume()?;
    if token.is(kind) {
        Ok(token)
    } else {
        Err(ParseError::UnexpectedToken {
            expected: Expected::Kind(kind),
            found: token.clone(),
            position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::RelationKind;
    use crate::parser::cursor::MAX_NESTING;
    use crate::tok;
    use crate::tokeniser::tokenise;

    fn ident(name: &str) -> Expression {
        Expression::Identifier(Identifier::new(name))
    }

    fn points(names: &str) -> Expression {
        Expression::Points(names.chars().map(Identifier::new).collect())
    }

    fn op(lexeme: &str) -> Operator {
        Operator::from_token(&tok!(Operator, lexeme)).unwrap()
    }

    fn binary(lexeme: &str, left: Expression, right: Expression) -> Expression {
        Expression::Binary {
            operator: op(lexeme),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn expression(text: &str) -> Result<Expression> {
        let tokens = tokenise(text);
        let mut stream = TokenStream::new(&tokens);
        let expr = parse_expression(&mut stream)?;
        assert!(stream.at_end(), "trailing tokens in {text:?}");
        Ok(expr)
    }

    fn chain(text: &str) -> Result<Vec<Statement>> {
        let tokens = tokenise(text);
        parse_statement_chain(&mut TokenStream::new(&tokens))
    }

    #[test]
    fn parse_chained_congruence() {
        let statements = chain("A \\cong B \\cong C \\\\").unwrap();

        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].relation.kind, RelationKind::Congruent);
        assert_eq!(*statements[0].left, ident("A"));
        assert_eq!(*statements[0].right, ident("B"));
        assert_eq!(statements[1].relation.kind, RelationKind::Congruent);
        assert_eq!(*statements[1].right, ident("C"));
        assert!(Rc::ptr_eq(&statements[0].right, &statements[1].left));
    }

    #[test]
    fn chain_of_k_expressions_gives_k_minus_one_statements() {
        let statements = chain("a < b \\leq c = d > e").unwrap();
        let kinds: Vec<_> = statements.iter().map(|s| s.relation.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RelationKind::LessThan,
                RelationKind::LessOrEqual,
                RelationKind::Equals,
                RelationKind::GreaterThan,
            ]
        );
        for pair in statements.windows(2) {
            assert!(Rc::ptr_eq(&pair[0].right, &pair[1].left));
        }
    }

    #[test]
    fn chain_stops_at_end_of_statement() {
        let tokens = tokenise("A = B \\\\ C = D");
        let mut stream = TokenStream::new(&tokens);
        assert_eq!(parse_statement_chain(&mut stream).unwrap().len(), 1);
        assert_eq!(stream.peek(), &tok!(Identifier, "C"));
    }

    #[test]
    fn lone_expression_is_discarded() {
        assert!(chain("\\triangle ABC \\\\").unwrap().is_empty());
    }

    #[test]
    fn leading_relation_is_rejected() {
        let tokens = [tok!(Relation, "cong"), tok!(Identifier, "A")];
        let err = parse_statement_chain(&mut TokenStream::new(&tokens)).unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::Expression,
                found: tok!(Relation, "cong"),
                position: 0,
            }
        );
    }

    #[test]
    fn missing_relation_is_rejected() {
        assert_eq!(
            chain("2 A = B").unwrap_err(),
            ParseError::UnexpectedToken {
                expected: Expected::Relation,
                found: tok!(Identifier, "A"),
                position: 1,
            }
        );
    }

    #[test]
    fn dangling_relation_is_end_of_input() {
        assert_eq!(
            chain("A = ").unwrap_err(),
            ParseError::UnexpectedEndOfInput { position: 2 }
        );
    }

    #[test]
    fn unknown_token_is_a_syntax_error() {
        let err = chain("A = &").unwrap_err();
        assert_eq!(err.position(), 2);
        assert!(matches!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::Expression,
                ..
            }
        ));
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(
            expression("a + b \\cdot c").unwrap(),
            binary("+", ident("a"), binary("cdot", ident("b"), ident("c")))
        );
    }

    #[test]
    fn binary_operators_group_left() {
        assert_eq!(
            expression("a - b + c").unwrap(),
            binary("+", binary("-", ident("a"), ident("b")), ident("c"))
        );
        assert_eq!(
            expression("a \\div b \\times c").unwrap(),
            binary("times", binary("div", ident("a"), ident("b")), ident("c"))
        );
    }

    #[test]
    fn parentheses_override_precedence() {
        assert_eq!(
            expression("(a + b) \\cdot 2").unwrap(),
            binary("cdot", binary("+", ident("a"), ident("b")), Expression::Number(2.0))
        );
    }

    #[test]
    fn unary_binds_tighter_than_binary() {
        assert_eq!(
            expression("\\angle ABC + \\angle DEF").unwrap(),
            binary(
                "+",
                Expression::Unary {
                    operator: op("angle"),
                    operand: Box::new(points("ABC")),
                },
                Expression::Unary {
                    operator: op("angle"),
                    operand: Box::new(points("DEF")),
                },
            )
        );
    }

    #[test]
    fn overline_takes_braced_group() {
        assert_eq!(
            expression("\\overline{AB}").unwrap(),
            Expression::Unary {
                operator: op("overline"),
                operand: Box::new(points("AB")),
            }
        );
    }

    #[test]
    fn parse_fraction_call() {
        assert_eq!(
            expression("\\frac{a}{b}").unwrap(),
            Expression::Call {
                callee: Identifier::new("frac"),
                groups: vec![vec![ident("a")], vec![ident("b")]],
            }
        );
    }

    #[test]
    fn call_with_separated_arguments() {
        assert_eq!(
            expression("\\polygon{A, B, C + 1}{}").unwrap(),
            Expression::Call {
                callee: Identifier::new("polygon"),
                groups: vec![
                    vec![
                        ident("A"),
                        ident("B"),
                        binary("+", ident("C"), Expression::Number(1.0)),
                    ],
                    vec![],
                ],
            }
        );
    }

    #[test]
    fn bare_command_is_call_without_arguments() {
        assert_eq!(
            expression("\\pi").unwrap(),
            Expression::Call {
                callee: Identifier::new("pi"),
                groups: vec![],
            }
        );
    }

    #[test]
    fn call_renders_its_groups() {
        let rendered = |text: &str| expression(text).unwrap().to_string();
        assert_eq!(rendered("\\polygon{A, B, C}"), "\\polygon{A, B, C}");
        assert_eq!(rendered("\\frac{a}{b \\cdot 2}"), "\\frac{a}{(b \\cdot 2)}");
        assert_eq!(rendered("\\circle{O}{}"), "\\circle{O}{}");
    }

    #[test]
    fn nesting_is_bounded() {
        let depth = MAX_NESTING + 1;
        let text = format!("{}A{}", "(".repeat(depth), ")".repeat(depth));
        assert_eq!(
            expression(&text).unwrap_err(),
            ParseError::NestingTooDeep {
                limit: MAX_NESTING,
                position: MAX_NESTING,
            }
        );

        let text = format!("{}A", "\\angle ".repeat(depth));
        assert!(matches!(
            expression(&text),
            Err(ParseError::NestingTooDeep { .. })
        ));
    }

    #[test]
    fn nesting_up_to_the_limit_parses() {
        let depth = MAX_NESTING - 1;
        let text = format!("{}A{}", "{".repeat(depth), "}".repeat(depth));
        assert_eq!(expression(&text).unwrap(), ident("A"));
    }

    #[test]
    fn unclosed_call_argument() {
        let err = expression("\\frac{a )").unwrap_err();
        assert_eq!(
            err,
            ParseError::UnexpectedToken {
                expected: Expected::OneOf(&[TokenKind::Separator, TokenKind::RightBrace]),
                found: tok!(RightParen, ")"),
                position: 3,
            }
        );
    }

    #[test]
    fn unclosed_paren() {
        assert_eq!(
            expression("(a + b").unwrap_err(),
            ParseError::UnexpectedEndOfInput { position: 4 }
        );
    }

    #[test]
    fn parse_numbers() {
        assert_eq!(expression("12.5e2").unwrap(), Expression::Number(1250.0));
        assert_eq!(expression("7e").unwrap(), Expression::Number(7.0));
        assert_eq!(expression("3.").unwrap(), Expression::Number(3.0));
    }

    #[test]
    fn document_parses_lines_after_comments() {
        let tokens = tokenise(
            "\\begin{align}\n\
             % congruent triangles \\\\\n\
             \\triangle ABC \\cong \\triangle DEF \\\\\n\
             A = B \\\\\n\
             % lengths \\\\\n\
             AB = CD = 2 \\\\\n\
             \\end{align}",
        );
        let statements = parse(&tokens).unwrap();

        let rendered: Vec<String> = statements.iter().map(ToString::to_string).collect();
        assert_eq!(
            rendered,
            vec!["\\triangle ABC \\cong \\triangle DEF", "AB = CD", "CD = 2"]
        );
    }

    #[test]
    fn document_error_position_is_absolute() {
        let tokens = tokenise("%c\\\\ \\cong A");
        assert_eq!(
            parse(&tokens).unwrap_err(),
            ParseError::UnexpectedToken {
                expected: Expected::Expression,
                found: tok!(Relation, "cong"),
                position: 2,
            }
        );
    }

    #[test]
    fn consecutive_comments_are_skipped() {
        let tokens = tokenise("%a\\\\%b\\\\ A \\sim B");
        let statements = parse(&tokens).unwrap();
        assert_eq!(statements.len(), 1);
        assert_eq!(statements[0].relation.kind, RelationKind::Similar);
    }

    #[test]
    fn document_without_comments_is_empty() {
        assert!(parse(&tokenise("A = B \\\\ C = D")).unwrap().is_empty());
    }
}
