use std::fmt::{self, Display};
use std::rc::Rc;

use crate::error::{ParseError, Result};
use crate::model::Token;

// AST NODES

/// A boxed Expression to allow recursive type structure.
pub type BoxExpr = Box<Expression>;

/// A point or command name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub name: String,
}

impl Identifier {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    Identifier(Identifier),
    /// Adjacent single letter identifiers, such as the `ABC` in `\triangle ABC`.
    Points(Vec<Identifier>),
    Unary {
        operator: Operator,
        operand: BoxExpr,
    },
    Binary {
        operator: Operator,
        left: BoxExpr,
        right: BoxExpr,
    },
    /// A command and its brace groups, e.g. `\frac{a}{b}` or `\polygon{A, B, C}`.
    Call {
        callee: Identifier,
        groups: Vec<Vec<Expression>>,
    },
}

impl Expression {
    /// The points named by an identifier or point sequence.
    pub fn as_points(&self) -> Option<&[Identifier]> {
        match self {
            Self::Identifier(ident) => Some(std::slice::from_ref(ident)),
            Self::Points(points) => Some(points),
            _ => None,
        }
    }
}

/// Semantic meaning of an operator lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Triangle,
    Angle,
    Overline,
    Odot,
    Cdot,
    Times,
    Div,
    Plus,
    Minus,
}

impl OperatorKind {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        Some(match lexeme {
            "triangle" => Self::Triangle,
            "angle" => Self::Angle,
            "overline" => Self::Overline,
            "odot" => Self::Odot,
            "cdot" => Self::Cdot,
            "times" => Self::Times,
            "div" => Self::Div,
            "+" => Self::Plus,
            "-" => Self::Minus,
            _ => return None,
        })
    }

    /// Prefix geometric operators, which take a single operand.
    pub fn is_unary(self) -> bool {
        matches!(self, Self::Triangle | Self::Angle | Self::Overline | Self::Odot)
    }

    pub fn is_multiplicative(self) -> bool {
        matches!(self, Self::Cdot | Self::Times | Self::Div)
    }

    pub fn is_additive(self) -> bool {
        matches!(self, Self::Plus | Self::Minus)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub token: Token,
    pub kind: OperatorKind,
}

impl Operator {
    /// Resolve an operator token, or `None` if its lexeme is not an operator.
    pub fn from_token(token: &Token) -> Option<Self> {
        OperatorKind::from_lexeme(&token.text).map(|kind| Self {
            token: token.clone(),
            kind,
        })
    }
}

/// Semantic meaning of a relation lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Equals,
    Congruent,
    Similar,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    ElementOf,
    NotElementOf,
    Subset,
    SubsetOrEqual,
    Superset,
    SupersetOrEqual,
}

impl RelationKind {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        Some(match lexeme {
            "=" => Self::Equals,
            "cong" => Self::Congruent,
            "sim" => Self::Similar,
            "gt" | ">" => Self::GreaterThan,
            "lt" | "<" => Self::LessThan,
            "geq" => Self::GreaterOrEqual,
            "leq" => Self::LessOrEqual,
            "in" => Self::ElementOf,
            "notin" => Self::NotElementOf,
            "subset" => Self::Subset,
            "subseteq" => Self::SubsetOrEqual,
            "supset" => Self::Superset,
            "supseteq" => Self::SupersetOrEqual,
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    pub token: Token,
    pub kind: RelationKind,
}

impl Relation {
    /// Resolve a relation token found at `position` in the token stream.
    pub fn from_token(token: &Token, position: usize) -> Result<Self> {
        let kind =
            RelationKind::from_lexeme(&token.text).ok_or_else(|| ParseError::UnmappedRelation {
                lexeme: token.text.clone(),
                position,
            })?;
        Ok(Self {
            token: token.clone(),
            kind,
        })
    }
}

/// One binary relation between two expressions.
///
/// In a chain `A = B = C` the right side of one statement and the left side
/// of the next are the same node.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub relation: Relation,
    pub left: Rc<Expression>,
    pub right: Rc<Expression>,
}

// DISPLAY

/// Write a symbol lexeme the way it appears in source.
fn write_symbol(f: &mut fmt::Formatter<'_>, lexeme: &str) -> fmt::Result {
    if lexeme.chars().all(|c| c.is_ascii_alphabetic()) {
        write!(f, "\\{lexeme}")
    } else {
        write!(f, "{lexeme}")
    }
}

impl Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_symbol(f, &self.token.text)
    }
}

impl Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_symbol(f, &self.token.text)
    }
}

impl Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(num) => write!(f, "{num}"),
            Self::Identifier(ident) => write!(f, "{ident}"),
            Self::Points(points) => points.iter().try_for_each(|p| write!(f, "{p}")),
            Self::Unary { operator, operand } => write!(f, "{operator} {operand}"),
            Self::Binary {
                operator,
                left,
                right,
            } => write!(f, "({left} {operator} {right})"),
            Self::Call { callee, groups } => {
                write!(f, "\\{callee}")?;
                for group in groups {
                    write!(f, "{{")?;
                    for (i, arg) in group.iter().enumerate() {
                        if i > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    write!(f, "}}")?;
                }
                Ok(())
            }
        }
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.relation, self.right)
    }
}
