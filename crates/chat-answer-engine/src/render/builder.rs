use crate::models::ContentNode;

use super::markup::{MarkupNode, scan_markup};
use super::math::{MathMode, MathTypesetter, MitexTypesetter};
use super::tags::{self, ElementRule};

/// Builds render trees from pipeline markup.
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder<T: MathTypesetter = MitexTypesetter> {
    typesetter: T,
}

impl TreeBuilder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<T: MathTypesetter> TreeBuilder<T> {
    pub fn with_typesetter(typesetter: T) -> Self {
        Self { typesetter }
    }

    /// Builds the tree for `markup`, rooted at `<div class="answerText">`.
    pub fn build(&self, markup: &str) -> ContentNode {
        let children = scan_markup(markup)
            .into_iter()
            .map(|node| self.convert(node))
            .collect();
        ContentNode::element(tags::ROOT_TAG, Some(tags::ROOT_CLASS), children)
    }

    fn convert(&self, node: MarkupNode) -> ContentNode {
        match node {
            MarkupNode::Text(text) => ContentNode::Text(text),
            MarkupNode::Element {
                name,
                class,
                children,
            } => match tags::rule_for(&name, class.as_deref()) {
                ElementRule::MathBlock => self.math(&children, MathMode::Display),
                ElementRule::MathInline => self.math(&children, MathMode::Inline),
                ElementRule::Element(tag) => ContentNode::Element {
                    tag: tag.to_string(),
                    class_name: class,
                    children: self.convert_all(children),
                },
                ElementRule::Flatten => {
                    log::debug!("Flattening disallowed <{name}>");
                    ContentNode::Fragment(self.convert_all(children))
                }
            },
        }
    }

    fn convert_all(&self, children: Vec<MarkupNode>) -> Vec<ContentNode> {
        children.into_iter().map(|c| self.convert(c)).collect()
    }

    fn math(&self, children: &[MarkupNode], mode: MathMode) -> ContentNode {
        let text: String = children.iter().map(MarkupNode::text_content).collect();
        let expression = strip_delimiters(&text);

        match self.typesetter.check(&expression, mode) {
            Ok(()) => match mode {
                MathMode::Display => ContentNode::MathBlock { expression },
                MathMode::Inline => ContentNode::MathInline { expression },
            },
            Err(e) => {
                log::warn!("{e}; showing {expression:?} as code");
                ContentNode::element(tags::DEGRADED_MATH_TAG, None, vec![ContentNode::Text(text)])
            }
        }
    }
}

/// Builds a tree with the default typesetter.
pub fn build_tree(markup: &str) -> ContentNode {
    TreeBuilder::new().build(markup)
}

/// Trims `text` and removes the two-character `\[ \]` or `\( \)` delimiters.
fn strip_delimiters(text: &str) -> String {
    let chars: Vec<char> = text.trim().chars().collect();
    if chars.len() < 4 {
        return String::new();
    }
    chars[2..chars.len() - 2].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::math::MathError;
    use pretty_assertions::assert_eq;

    struct RejectAll;

    impl MathTypesetter for RejectAll {
        fn check(&self, expression: &str, mode: MathMode) -> Result<(), MathError> {
            Err(MathError::Parse {
                mode,
                fragment: expression.to_string(),
            })
        }
    }

    fn root(children: Vec<ContentNode>) -> ContentNode {
        ContentNode::element("div", Some("answerText"), children)
    }

    #[test]
    fn empty_markup_builds_empty_root() {
        assert_eq!(build_tree(""), root(vec![]));
    }

    #[test]
    fn heading_and_paragraph() {
        assert_eq!(
            build_tree("<h3>Title</h3><p>body</p>\n\n"),
            root(vec![
                ContentNode::element("h3", None, vec![ContentNode::text("Title")]),
                ContentNode::element("p", None, vec![ContentNode::text("body")]),
                ContentNode::text("\n\n"),
            ])
        );
    }

    #[test]
    fn display_math() {
        assert_eq!(
            build_tree(r#"<div class="mathBlock">\[x^2\]</div>"#),
            root(vec![ContentNode::MathBlock {
                expression: "x^2".into()
            }])
        );
    }

    #[test]
    fn inline_math_keeps_inner_spacing() {
        assert_eq!(
            build_tree(r#"<span class="inlineMath">  \( y \) </span>"#),
            root(vec![ContentNode::MathInline {
                expression: " y ".into()
            }])
        );
    }

    #[test]
    fn short_math_text_yields_empty_expression() {
        assert_eq!(
            build_tree(r#"<span class="inlineMath">ab</span>"#),
            root(vec![ContentNode::MathInline {
                expression: String::new()
            }])
        );
    }

    #[test]
    fn rejected_math_degrades_to_code() {
        let builder = TreeBuilder::with_typesetter(RejectAll);
        assert_eq!(
            builder.build(r#"<div class="mathBlock"> \[\frac{\] </div>"#),
            root(vec![ContentNode::element(
                "code",
                None,
                vec![ContentNode::text(r" \[\frac{\] ")]
            )])
        );
    }

    #[test]
    fn malformed_math_degrades_with_default_typesetter() {
        assert_eq!(
            build_tree(r#"<div class="mathBlock">\[\frac{\]</div>"#),
            root(vec![ContentNode::element(
                "code",
                None,
                vec![ContentNode::text(r"\[\frac{\]")]
            )])
        );
    }

    #[test]
    fn unterminated_tags_build_quickly() {
        let markup = "<a ".repeat(33_000);
        let started = std::time::Instant::now();

        let tree = build_tree(&markup);

        assert!(started.elapsed() < std::time::Duration::from_secs(2));
        assert_eq!(tree.text_content(), markup);
    }

    #[test]
    fn disallowed_tags_are_flattened() {
        assert_eq!(
            build_tree("<script>alert(1)</script><a class=\"x\">link</a>"),
            root(vec![
                ContentNode::Fragment(vec![ContentNode::text("alert(1)")]),
                ContentNode::Fragment(vec![ContentNode::text("link")]),
            ])
        );
    }

    #[test]
    fn class_is_preserved_on_allowed_elements() {
        assert_eq!(
            build_tree(r#"<div class="keyPoint" style="color:red">k</div>"#),
            root(vec![ContentNode::element(
                "div",
                Some("keyPoint"),
                vec![ContentNode::text("k")]
            )])
        );
    }

    #[test]
    fn markup_inside_math_is_text() {
        let tree = build_tree(r#"<div class="mathBlock">\[a <b>c</b>\]</div>"#);
        assert_eq!(
            tree.children(),
            &[ContentNode::MathBlock {
                expression: "a c".into()
            }]
        );
    }

    #[test]
    fn strip_delimiters_counts_chars() {
        assert_eq!(strip_delimiters(r"\(é\)"), "é");
        assert_eq!(strip_delimiters(" \\[\\] "), "");
        assert_eq!(strip_delimiters("abc"), "");
    }
}
