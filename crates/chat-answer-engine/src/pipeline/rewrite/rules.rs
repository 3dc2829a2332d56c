use std::sync::OnceLock;

use regex::Regex;

/// A textual substitution applied globally to the answer text.
///
/// Every rule owns its pattern and replacement template; the rewriter only
/// decides the order in which rules run.
#[derive(Debug)]
pub struct RewriteRule {
    pub name: &'static str,
    pub pattern: &'static str,
    pub replacement: &'static str,
}

/// Class names emitted by the rewriter and recognised by the tree builder.
pub struct BlockClass;

impl BlockClass {
    pub const DEFINITION: &'static str = "definitionBlock";
    pub const EXAMPLE: &'static str = "exampleBlock";
    pub const KEY_POINT: &'static str = "keyPoint";
    pub const LIST_ITEM: &'static str = "listItem";
    pub const MATH_BLOCK: &'static str = "mathBlock";
    pub const INLINE_MATH: &'static str = "inlineMath";
}

/// Rules in application order. Later rules see the output of earlier ones.
pub const RULES: &[RewriteRule] = &[
    RewriteRule {
        name: "heading3",
        pattern: r"(?m)^###\s+([^\n]+)",
        replacement: "<h3>${1}</h3>",
    },
    RewriteRule {
        name: "heading4",
        pattern: r"(?m)^####\s+([^\n]+)",
        replacement: "<h4>${1}</h4>",
    },
    RewriteRule {
        name: "definition",
        pattern: r"\*\*([^*]+)\*\*:\s*([^\n]+)",
        replacement: r#"<div class="definitionBlock"><strong>${1}:</strong> ${2}</div>"#,
    },
    RewriteRule {
        name: "example",
        pattern: r"(?mi)^example\s*[0-9]*:\s*([^\n]+)",
        replacement: r#"<div class="exampleBlock">${1}</div>"#,
    },
    RewriteRule {
        name: "key_point",
        pattern: r"(?m)^Key\s*Point:\s*([^\n]+)",
        replacement: r#"<div class="keyPoint">${1}</div>"#,
    },
    RewriteRule {
        name: "list_item",
        pattern: r"(?m)^-\s+([^\n]+)",
        replacement: r#"<div class="listItem">• ${1}</div>"#,
    },
    RewriteRule {
        name: "math_block",
        pattern: r"(?s)\\\[(.*?)\\\]",
        replacement: r#"<div class="mathBlock">\[${1}\]</div>"#,
    },
    RewriteRule {
        name: "inline_math",
        pattern: r"(?s)\\\((.*?)\\\)",
        replacement: r#"<span class="inlineMath">\(${1}\)</span>"#,
    },
];

/// A rule together with its compiled pattern.
pub struct CompiledRule {
    pub rule: &'static RewriteRule,
    pub regex: Regex,
}

impl CompiledRule {
    pub fn apply(&self, text: &str) -> String {
        self.regex
            .replace_all(text, self.rule.replacement)
            .into_owned()
    }
}

pub fn compiled_rules() -> &'static [CompiledRule] {
    static COMPILED: OnceLock<Vec<CompiledRule>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RULES
            .iter()
            .map(|rule| CompiledRule {
                rule,
                regex: Regex::new(rule.pattern).expect("Invalid rewrite rule pattern"),
            })
            .collect()
    })
}

/// Paragraph wrapping: a run of non-newline characters followed by a blank line.
pub struct Paragraph;

impl Paragraph {
    pub const OPEN: &'static str = "<p>";
    pub const CLOSE: &'static str = "</p>";
    pub const BREAK: &'static str = "\n\n";

    pub fn regex() -> &'static Regex {
        static PARAGRAPH: OnceLock<Regex> = OnceLock::new();
        PARAGRAPH.get_or_init(|| Regex::new(r"([^\n]+)\n\n").expect("Invalid paragraph regex"))
    }

    /// Math elements produced by the math rules; their newlines are not line breaks.
    pub fn math_element_regex() -> &'static Regex {
        static MATH: OnceLock<Regex> = OnceLock::new();
        MATH.get_or_init(|| {
            Regex::new(
                r#"(?s)<div class="mathBlock">\\\[.*?\\\]</div>|<span class="inlineMath">\\\(.*?\\\)</span>"#,
            )
            .expect("Invalid math element regex")
        })
    }
}

/// Math spans in the raw text, before any rule has run.
pub struct MathSpan;

impl MathSpan {
    /// Stands in for a newline inside a math span while the line rules run.
    pub const NEWLINE_MASK: char = '\u{E000}';

    pub fn regex() -> &'static Regex {
        static SPAN: OnceLock<Regex> = OnceLock::new();
        SPAN.get_or_init(|| {
            Regex::new(r"(?s)\\\[.*?\\\]|\\\(.*?\\\)").expect("Invalid math span regex")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_rule_patterns_compile() {
        assert_eq!(compiled_rules().len(), RULES.len());
    }

    #[test]
    fn rule_names_are_unique() {
        let mut names: Vec<_> = RULES.iter().map(|r| r.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), RULES.len());
    }

    #[test]
    fn math_rules_run_after_line_rules() {
        let position = |name: &str| RULES.iter().position(|r| r.name == name).unwrap();
        assert!(position("list_item") < position("math_block"));
        assert!(position("math_block") < position("inline_math"));
    }
}
