use std::fmt::Write;

use crate::models::ContentNode;

/// One line per node, children indented by two spaces.
///
/// ```text
/// div.answerText
///   h3
///     "Title"
///   math-block "x^2"
/// ```
pub fn outline(root: &ContentNode) -> String {
    let mut out = String::new();
    write_node(&mut out, root, 0);
    out
}

fn write_node(out: &mut String, node: &ContentNode, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = match node {
        ContentNode::Text(text) => writeln!(out, "{indent}{text:?}"),
        ContentNode::Element {
            tag,
            class_name: Some(class),
            ..
        } => writeln!(out, "{indent}{tag}.{class}"),
        ContentNode::Element { tag, .. } => writeln!(out, "{indent}{tag}"),
        ContentNode::MathBlock { expression } => writeln!(out, "{indent}math-block {expression:?}"),
        ContentNode::MathInline { expression } => {
            writeln!(out, "{indent}math-inline {expression:?}")
        }
        ContentNode::Fragment(_) => writeln!(out, "{indent}fragment"),
    };
    for child in node.children() {
        write_node(out, child, depth + 1);
    }
}
