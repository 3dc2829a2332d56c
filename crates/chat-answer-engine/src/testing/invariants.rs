use std::collections::HashMap;

use crate::models::{ContentNode, ParsedAnswer, ResolvedCitation};
use crate::pipeline::citations::CitationMarker;
use crate::render::tags;

/// Validates a built render tree.
///
/// Asserts that:
/// - The root is `<div class="answerText">`
/// - Every element below it uses an allow-listed tag (or `code` for degraded math)
/// - Math expressions do not keep their delimiters
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check_tree(root: &ContentNode) {
    match root {
        ContentNode::Element { tag, class_name, .. } => {
            assert_eq!(tag, tags::ROOT_TAG, "root tag");
            assert_eq!(class_name.as_deref(), Some(tags::ROOT_CLASS), "root class");
        }
        other => panic!("root is not an element: {other:?}"),
    }

    root.walk(&mut |node| match node {
        ContentNode::Element { tag, .. } => {
            assert!(tags::is_allowed_tag(tag), "disallowed tag in tree: <{tag}>");
        }
        ContentNode::MathBlock { expression } => {
            assert!(
                !expression.starts_with(r"\[") && !expression.ends_with(r"\]"),
                "display math kept its delimiters: {expression:?}"
            );
        }
        ContentNode::MathInline { expression } => {
            assert!(
                !expression.starts_with(r"\(") && !expression.ends_with(r"\)"),
                "inline math kept its delimiters: {expression:?}"
            );
        }
        ContentNode::Text(_) | ContentNode::Fragment(_) => {}
    });
}

/// Validates resolved citations.
///
/// Asserts that:
/// - `reindex_id`s are exactly "1", "2", ... in list order
/// - Original ids are distinct
/// - `part_index` counts from 1 within each filepath, in list order
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check_citations(citations: &[ResolvedCitation]) {
    let mut seen_ids = Vec::new();
    let mut parts: HashMap<Option<&str>, u32> = HashMap::new();

    for (i, c) in citations.iter().enumerate() {
        assert_eq!(
            c.reindex_id,
            (i + 1).to_string(),
            "display order has a gap or repeat at position {i}"
        );
        assert!(
            !seen_ids.contains(&c.citation.id),
            "citation {} resolved twice",
            c.citation.id
        );
        seen_ids.push(c.citation.id.clone());

        let part = parts.entry(c.filepath()).or_insert(0);
        *part += 1;
        assert_eq!(
            c.part_index, *part,
            "wrong part index for {:?} at position {i}",
            c.filepath()
        );
    }
}

/// Validates a parsed answer: its citations, and that every display token in
/// the markup names one of them.
///
/// # Panics
/// Panics with a descriptive message if any invariant is violated.
pub fn check_answer(parsed: &ParsedAnswer) {
    check_citations(&parsed.citations);
    for c in &parsed.citations {
        let order: usize = c.reindex_id.parse().unwrap_or_default();
        assert!(
            parsed.markup_text.contains(&CitationMarker::token(order)),
            "citation {} has no token in the markup",
            c.reindex_id
        );
    }
}
