use std::fmt;

use mitex_parser::syntax::{SyntaxElement, SyntaxKind, SyntaxNode};
use mitex_spec_gen::DEFAULT_SPEC;
use thiserror::Error;

/// Whether an expression is typeset on its own line or within text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MathMode {
    Display,
    Inline,
}

impl fmt::Display for MathMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MathMode::Display => write!(f, "display"),
            MathMode::Inline => write!(f, "inline"),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Cannot typeset {mode} math, parse error at {fragment:?}")]
    Parse { mode: MathMode, fragment: String },
}

/// Checks whether a LaTeX expression can be typeset.
///
/// The tree builder keeps the expression as a math node when this succeeds
/// and shows it as plain code otherwise.
pub trait MathTypesetter {
    fn check(&self, expression: &str, mode: MathMode) -> Result<(), MathError>;
}

/// Typesetter backed by `mitex-parser` with its default command set.
///
/// The parser recovers from most mistakes, so besides its error tokens the
/// check rejects constructs it left without their closing half.
#[derive(Debug, Clone, Copy, Default)]
pub struct MitexTypesetter;

impl MathTypesetter for MitexTypesetter {
    fn check(&self, expression: &str, mode: MathMode) -> Result<(), MathError> {
        let tree = mitex_parser::parse(expression, DEFAULT_SPEC.clone());

        match tree.descendants_with_tokens().find(is_malformed) {
            None => Ok(()),
            Some(elem) => {
                let fragment = match &elem {
                    SyntaxElement::Node(n) => n.text().to_string(),
                    SyntaxElement::Token(t) => t.text().to_string(),
                };
                Err(MathError::Parse { mode, fragment })
            }
        }
    }
}

fn is_malformed(elem: &SyntaxElement) -> bool {
    use SyntaxKind::*;

    match elem {
        SyntaxElement::Token(t) => match t.kind() {
            TokenError => true,
            // `\right` outside a `\left ... \right` pair
            ClauseCommandName => {
                t.text() == "\\right" && t.parent().is_none_or(|p| p.kind() != ClauseLR)
            }
            _ => false,
        },
        SyntaxElement::Node(n) => match n.kind() {
            TokenError => true,
            ItemCurly => last_significant(n) != Some(TokenRBrace),
            ItemEnv => !n.children().any(|c| c.kind() == ItemEnd),
            ItemLR => n.children().filter(|c| c.kind() == ClauseLR).count() < 2,
            // `^` or `_` with nothing to attach
            ItemAttachComponent => matches!(last_significant(n), Some(TokenCaret | TokenUnderscore)),
            _ => false,
        },
    }
}

/// Kind of the last direct child that is not whitespace or a comment.
fn last_significant(node: &SyntaxNode) -> Option<SyntaxKind> {
    node.children_with_tokens()
        .map(|elem| elem.kind())
        .filter(|kind| !kind.is_trivia())
        .last()
}
