use crate::pipeline::rewrite::rules::BlockClass;

/// Tag and class of the element wrapping every built tree.
pub const ROOT_TAG: &str = "div";
pub const ROOT_CLASS: &str = "answerText";

/// Tag used for math the typesetter rejected.
pub const DEGRADED_MATH_TAG: &str = "code";

/// What a scanned element becomes in the render tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRule {
    MathBlock,
    MathInline,
    /// Kept as an element with this tag.
    Element(&'static str),
    /// Wrapper discarded, children kept.
    Flatten,
}

/// Tags allowed through to the render tree.
pub const TAG_TABLE: &[(&str, ElementRule)] = &[
    ("h3", ElementRule::Element("h3")),
    ("h4", ElementRule::Element("h4")),
    ("p", ElementRule::Element("p")),
    ("div", ElementRule::Element("div")),
    ("span", ElementRule::Element("span")),
    ("strong", ElementRule::Element("strong")),
];

/// Looks up the rule for an element. Math classes win over the tag name.
pub fn rule_for(name: &str, class: Option<&str>) -> ElementRule {
    match class {
        Some(BlockClass::MATH_BLOCK) => return ElementRule::MathBlock,
        Some(BlockClass::INLINE_MATH) => return ElementRule::MathInline,
        _ => {}
    }
    TAG_TABLE
        .iter()
        .find(|(tag, _)| *tag == name)
        .map_or(ElementRule::Flatten, |(_, rule)| *rule)
}

/// Whether `tag` can appear as an element in a built tree.
pub fn is_allowed_tag(tag: &str) -> bool {
    tag == DEGRADED_MATH_TAG || TAG_TABLE.iter().any(|(allowed, _)| *allowed == tag)
}
