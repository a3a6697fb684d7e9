use std::collections::{HashMap, HashSet};

use lazy_static::lazy_static;

use crate::model::TokenKind;

lazy_static! {
    /// Operator names, both escaped (`\triangle`) and bare single characters (`+`).
    pub static ref OPERATORS: HashSet<&'static str> = HashSet::from([
        "triangle",
        "angle",
        "overline",
        "odot",
        "cdot",
        "times",
        "div",
        "+",
        "-",
    ]);

    /// Relation names, both escaped (`\cong`) and bare single characters (`=`).
    pub static ref RELATIONS: HashSet<&'static str> = HashSet::from([
        "cong",
        "sim",
        "gt",
        "lt",
        "geq",
        "leq",
        "in",
        "notin",
        "subset",
        "subseteq",
        "supset",
        "supseteq",
        "=",
        ">",
        "<",
    ]);

    /// Single character delimiters and the token kind each one produces.
    pub static ref DELIMITERS: HashMap<&'static str, TokenKind> = HashMap::from([
        ("(", TokenKind::LeftParen),
        (")", TokenKind::RightParen),
        ("{", TokenKind::LeftBrace),
        ("}", TokenKind::RightBrace),
        (",", TokenKind::Separator),
    ]);
}

pub fn is_operator(name: &str) -> bool {
    OPERATORS.contains(name)
}

pub fn is_relation(name: &str) -> bool {
    RELATIONS.contains(name)
}

pub fn delimiter_kind(name: &str) -> Option<TokenKind> {
    DELIMITERS.get(name).copied()
}

/// Resolve the name following a `\` into its token kind.
///
/// Relations are checked before operators; anything in neither table is a
/// plain command such as `\frac` or `\begin`.
pub fn classify_command(name: &str) -> TokenKind {
    if is_relation(name) {
        TokenKind::Relation
    } else if is_operator(name) {
        TokenKind::Operator
    } else {
        TokenKind::Command
    }
}
