//! # Answer Pipeline
//!
//! Raw answer in, [`ParsedAnswer`] out:
//!
//! 1. **`rewrite`**: pattern rules turn headings, blocks, list items and math
//!    spans into markup
//! 2. **`citations::resolve`**: `[docN]` markers become display tokens and the
//!    referenced citations are collected
//! 3. **`citations::enumerate`**: part numbers per filepath
//!
//! Building the render tree is a separate step (see [`crate::render`]) run by
//! the rendering layer on `ParsedAnswer::markup_text`.

pub mod citations;
pub mod rewrite;

use crate::models::{ParsedAnswer, RawAnswer};
use crate::sanitize::Sanitizer;

pub use citations::{enumerate_citations, resolve_citations};
pub use rewrite::rewrite;

/// Runs the pipeline over one answer.
///
/// Returns `None` when the answer text is missing or was not a string.
pub fn parse_answer(answer: &RawAnswer) -> Option<ParsedAnswer> {
    let text = answer.answer_text.as_deref()?;
    Some(parse_text(text, answer))
}

/// Like [`parse_answer`], running `sanitizer` over the answer text first when one is given.
///
/// Callers pass a sanitizer when their configuration asks for it; the pipeline
/// output is safe to build a tree from either way.
pub fn prepare_answer(
    answer: &RawAnswer,
    sanitizer: Option<&dyn Sanitizer>,
) -> Option<ParsedAnswer> {
    let text = answer.answer_text.as_deref()?;
    match sanitizer {
        Some(sanitizer) => Some(parse_text(&sanitizer.sanitize(text), answer)),
        None => Some(parse_text(text, answer)),
    }
}

fn parse_text(text: &str, answer: &RawAnswer) -> ParsedAnswer {
    let markup = rewrite(text);
    let (markup_text, citations) = resolve_citations(&markup, &answer.citations);

    ParsedAnswer {
        citations: enumerate_citations(citations),
        markup_text,
        generated_chart: answer.generated_chart.clone(),
    }
}
