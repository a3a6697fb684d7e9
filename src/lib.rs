//! Tokeniser and parser for a LaTeX-style geometry notation.
//!
//! Text goes through three stages:
//!
//! 1. [`tokeniser::tokenise`] turns it into [`Token`]s. It never fails;
//!    characters outside the notation become [`TokenKind::Unknown`].
//! 2. [`parser::parse`] builds [`Statement`]s from the statement lines that
//!    follow comments, desugaring chains such as `A \cong B \cong C`.
//! 3. [`Scene::from_statements`] collects the points and shapes the
//!    statements mention.
//!
//! ```
//! use geotex::{ast::RelationKind, parse_source};
//!
//! let statements = parse_source("% given \\\\ \\triangle ABC \\cong \\triangle DEF \\\\").unwrap();
//! assert_eq!(statements.len(), 1);
//! assert_eq!(statements[0].relation.kind, RelationKind::Congruent);
//! ```

pub mod ast;
pub mod error;
pub mod logs;
pub mod model;
pub mod parser;
pub mod scene;
pub mod tokeniser;

pub use ast::{Expression, Statement};
pub use error::{ParseError, Result};
pub use model::{Token, TokenKind};
pub use scene::Scene;

/// Tokenise and parse a document in one go.
pub fn parse_source(text: &str) -> Result<Vec<Statement>> {
    let tokens = tokeniser::tokenise(text);
    parser::parse(&tokens)
}
