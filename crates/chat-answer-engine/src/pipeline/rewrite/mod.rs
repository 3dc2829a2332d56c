//! # Pattern Rewriter
//!
//! Turns raw generated text into the HTML-like markup consumed by the tree
//! builder. Rules live in [`rules`] and run in a fixed order:
//!
//! 1. `###` / `####` headings
//! 2. `**Label**: rest` definition blocks
//! 3. `Example N:` blocks
//! 4. `Key Point:` blocks
//! 5. `- ` list items
//! 6. `\[ ... \]` block math (delimiters kept for the typesetter)
//! 7. `\( ... \)` inline math
//! 8. paragraph wrapping of lines followed by a blank line
//!
//! Every rule treats a math span as a single line, so a line break inside
//! `\[ ... \]` never splits the expression or ends a list item early.

pub mod rules;

use rules::{MathSpan, Paragraph, compiled_rules};

/// Applies every rewrite rule to `text`. Pure and total.
pub fn rewrite(text: &str) -> String {
    // Text that already holds the mask character is rewritten unmasked.
    let masked = !text.contains(MathSpan::NEWLINE_MASK);
    let mut out = if masked {
        mask_span_newlines(text)
    } else {
        text.to_string()
    };
    for rule in compiled_rules() {
        out = rule.apply(&out);
    }
    let out = wrap_paragraphs(&out);
    if masked {
        out.replace(MathSpan::NEWLINE_MASK, "\n")
    } else {
        out
    }
}

fn mask_span_newlines(text: &str) -> String {
    MathSpan::regex()
        .replace_all(text, |caps: &regex::Captures<'_>| {
            caps[0].replace('\n', &MathSpan::NEWLINE_MASK.to_string())
        })
        .into_owned()
}

/// Wraps every line that is followed by a blank line in `<p>...</p>`.
pub fn wrap_paragraphs(text: &str) -> String {
    // Same byte length as `text`, so match offsets index into both.
    let masked = mask_math_newlines(text);

    let mut out = String::with_capacity(text.len() + 16);
    let mut last = 0;
    for caps in Paragraph::regex().captures_iter(&masked) {
        let (Some(whole), Some(line)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        out.push_str(Paragraph::OPEN);
        out.push_str(&text[line.range()]);
        out.push_str(Paragraph::CLOSE);
        out.push_str(Paragraph::BREAK);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    out
}

fn mask_math_newlines(text: &str) -> String {
    let mut masked = String::with_capacity(text.len());
    let mut last = 0;
    for m in Paragraph::math_element_regex().find_iter(text) {
        masked.push_str(&text[last..m.start()]);
        masked.push_str(&m.as_str().replace('\n', " "));
        last = m.end();
    }
    masked.push_str(&text[last..]);
    masked
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::heading3("### Title", "<h3>Title</h3>")]
    #[case::heading4("#### Sub", "<h4>Sub</h4>")]
    #[case::five_hashes_untouched("##### Deep", "##### Deep")]
    #[case::definition(
        "**Energy**: capacity to do work",
        r#"<div class="definitionBlock"><strong>Energy:</strong> capacity to do work</div>"#
    )]
    #[case::example("Example 2: two apples", r#"<div class="exampleBlock">two apples</div>"#)]
    #[case::example_lowercase("example: one", r#"<div class="exampleBlock">one</div>"#)]
    #[case::key_point("Key Point: remember", r#"<div class="keyPoint">remember</div>"#)]
    #[case::key_point_no_space("KeyPoint: tight", r#"<div class="keyPoint">tight</div>"#)]
    #[case::list_item("- first", r#"<div class="listItem">• first</div>"#)]
    #[case::dash_without_space("-1 degrees", "-1 degrees")]
    #[case::block_math(r"\[x^2\]", r#"<div class="mathBlock">\[x^2\]</div>"#)]
    #[case::inline_math(r"so \(y\) holds", r#"so <span class="inlineMath">\(y\)</span> holds"#)]
    #[case::plain("just text", "just text")]
    fn single_rule(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(rewrite(input), expected);
    }

    #[test]
    fn headings_only_match_at_line_start() {
        insta::assert_snapshot!(rewrite("a ### b"), @"a ### b");
    }

    #[test]
    fn paragraph_wraps_line_before_blank_line() {
        assert_eq!(rewrite("one\n\ntwo\n\nthree"), "<p>one</p>\n\n<p>two</p>\n\nthree");
    }

    #[test]
    fn paragraph_wraps_block_output() {
        assert_eq!(
            rewrite("Key Point: use it.\n\n"),
            "<p><div class=\"keyPoint\">use it.</div></p>\n\n"
        );
    }

    #[test]
    fn list_items_get_bullets() {
        assert_eq!(
            rewrite("- a\n- b"),
            "<div class=\"listItem\">• a</div>\n<div class=\"listItem\">• b</div>"
        );
    }

    #[test]
    fn multiline_block_math_is_one_element() {
        let out = rewrite("\\[a +\nb\\]");
        assert_eq!(out, "<div class=\"mathBlock\">\\[a +\nb\\]</div>");
    }

    #[test]
    fn blank_line_inside_math_does_not_split_it() {
        let out = rewrite("\\[a\n\nb\\]\n\nafter");
        assert_eq!(
            out,
            "<p><div class=\"mathBlock\">\\[a\n\nb\\]</div></p>\n\nafter"
        );
    }

    #[test]
    fn multiline_math_stays_inside_list_item() {
        assert_eq!(
            rewrite("- \\[a\nb\\]\n- next"),
            "<div class=\"listItem\">• <div class=\"mathBlock\">\\[a\nb\\]</div></div>\n<div class=\"listItem\">• next</div>"
        );
    }

    #[test]
    fn line_rules_do_not_match_inside_math() {
        assert_eq!(
            rewrite("\\[a\n- b\n### c\\]"),
            "<div class=\"mathBlock\">\\[a\n- b\n### c\\]</div>"
        );
    }

    #[test]
    fn mask_character_in_input_is_kept() {
        let input = "a\u{E000}b\n\n";
        assert_eq!(rewrite(input), "<p>a\u{E000}b</p>\n\n");
    }

    #[test]
    fn inline_math_inside_definition() {
        let out = rewrite("**Area**: \\(\\pi r^2\\)");
        assert_eq!(
            out,
            "<div class=\"definitionBlock\"><strong>Area:</strong> <span class=\"inlineMath\">\\(\\pi r^2\\)</span></div>"
        );
    }

    #[test]
    fn dollar_signs_in_text_are_kept() {
        assert_eq!(rewrite("- costs $1"), "<div class=\"listItem\">• costs $1</div>");
    }

    #[test]
    fn rewrite_is_deterministic() {
        let input = "### T\n\n**A**: b\n\n- c\n\\[d\\]\n\n";
        assert_eq!(rewrite(input), rewrite(input));
    }

    #[test]
    fn empty_input() {
        assert_eq!(rewrite(""), "");
    }
}
