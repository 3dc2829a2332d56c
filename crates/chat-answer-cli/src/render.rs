//! Turns a render tree into styled terminal lines.

use chat_answer_engine::ContentNode;
use chat_answer_engine::pipeline::citations::CitationMarker;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Tags that start and end on their own line.
const BLOCK_TAGS: &[&str] = &["h3", "h4", "p", "div"];

pub struct LineRenderer {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    error_style: Style,
}

impl LineRenderer {
    pub fn new(math_error_color: Color) -> Self {
        Self {
            lines: Vec::new(),
            current: Vec::new(),
            error_style: Style::default().fg(math_error_color),
        }
    }

    /// Renders `root` and returns its lines. Runs of blank lines are collapsed to one.
    pub fn render(mut self, root: &ContentNode) -> Vec<Line<'static>> {
        self.node(root, Style::default());
        self.break_line();
        while self.lines.last().is_some_and(is_blank) {
            self.lines.pop();
        }
        self.lines
    }

    fn node(&mut self, node: &ContentNode, style: Style) {
        match node {
            ContentNode::Text(text) => self.text(text, style),
            ContentNode::MathInline { expression } => {
                self.current
                    .push(Span::styled(format!("${}$", expression.trim()), math_style()));
            }
            ContentNode::MathBlock { expression } => {
                self.break_line();
                self.current
                    .push(Span::styled(format!("$${}$$", expression.trim()), math_style()));
                self.break_line();
            }
            ContentNode::Fragment(children) => {
                for child in children {
                    self.node(child, style);
                }
            }
            ContentNode::Element {
                tag,
                class_name,
                children,
            } => {
                if tag == "code" {
                    let text = node.text_content();
                    self.current.push(Span::styled(text, self.error_style));
                    return;
                }

                let style = style.patch(element_style(tag, class_name.as_deref()));
                let block = BLOCK_TAGS.contains(&tag.as_str());
                if block {
                    self.break_line();
                }
                if class_name.as_deref() == Some("keyPoint") {
                    self.current.push(Span::styled("▶ ", style));
                }
                for child in children {
                    self.node(child, style);
                }
                if block {
                    self.break_line();
                }
            }
        }
    }

    fn text(&mut self, text: &str, style: Style) {
        let mut parts = text.split('\n');
        if let Some(first) = parts.next() {
            self.push_text(first, style);
        }
        for part in parts {
            self.end_line();
            self.push_text(part, style);
        }
    }

    fn push_text(&mut self, text: &str, style: Style) {
        for (piece, is_token) in split_citation_tokens(text) {
            if piece.is_empty() {
                continue;
            }
            let style = if is_token { citation_style() } else { style };
            self.current.push(Span::styled(piece.to_string(), style));
        }
    }

    /// Ends the current line if it has content.
    fn break_line(&mut self) {
        if !self.current.is_empty() {
            self.end_line();
        }
    }

    /// Ends the current line, keeping at most one blank line in a row.
    fn end_line(&mut self) {
        let line = Line::from(std::mem::take(&mut self.current));
        if is_blank(&line) && self.lines.last().is_none_or(is_blank) {
            return;
        }
        self.lines.push(line);
    }
}

/// Splits text around display tokens such as `^2^`, marking the tokens.
pub fn split_citation_tokens(text: &str) -> Vec<(&str, bool)> {
    let glyph = CitationMarker::TOKEN_GLYPH;
    let mut out = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find(glyph) {
        let after = &rest[start + 1..];
        let digits = after.chars().take_while(char::is_ascii_digit).count();
        if digits > 0 && after[digits..].starts_with(glyph) {
            let end = start + 1 + digits + 1;
            out.push((&rest[..start], false));
            out.push((&rest[start..end], true));
            rest = &rest[end..];
        } else {
            out.push((&rest[..start + 1], false));
            rest = after;
        }
    }
    out.push((rest, false));
    out
}

/// The text of a line with styling removed.
pub fn plain_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|span| span.content.as_ref()).collect()
}

fn is_blank(line: &Line<'_>) -> bool {
    line.spans.iter().all(|span| span.content.trim().is_empty())
}

fn element_style(tag: &str, class_name: Option<&str>) -> Style {
    let base = match tag {
        "h3" => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        "h4" => Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        "strong" => Style::default().add_modifier(Modifier::BOLD),
        _ => Style::default(),
    };
    match class_name {
        Some("definitionBlock") => base.fg(Color::Green),
        Some("exampleBlock") => base.add_modifier(Modifier::ITALIC),
        Some("keyPoint") => base.fg(Color::Yellow),
        _ => base,
    }
}

fn math_style() -> Style {
    Style::default().fg(Color::LightBlue)
}

fn citation_style() -> Style {
    Style::default().fg(Color::Magenta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chat_answer_engine::build_tree;
    use pretty_assertions::assert_eq;

    fn render_plain(markup: &str) -> Vec<String> {
        LineRenderer::new(Color::Red)
            .render(&build_tree(markup))
            .iter()
            .map(plain_text)
            .collect()
    }

    #[test]
    fn blocks_start_new_lines() {
        assert_eq!(
            render_plain("<p><h3>Title</h3></p>\n\n<p>body</p>\n\n"),
            vec!["Title", "", "body"]
        );
    }

    #[test]
    fn list_items_are_separate_lines() {
        assert_eq!(
            render_plain(
                "<div class=\"listItem\">• one</div>\n<p><div class=\"listItem\">• two</div></p>\n\n"
            ),
            vec!["• one", "", "• two"]
        );
    }

    #[test]
    fn key_point_has_marker() {
        assert_eq!(
            render_plain("<div class=\"keyPoint\">remember</div>"),
            vec!["▶ remember"]
        );
    }

    #[test]
    fn math_is_shown_with_dollars() {
        assert_eq!(
            render_plain(
                "see <span class=\"inlineMath\">\\(y\\)</span> and\n<div class=\"mathBlock\">\\[x^2\\]</div>"
            ),
            vec!["see $y$ and", "$$x^2$$"]
        );
    }

    #[test]
    fn degraded_math_uses_error_colour() {
        let tree = ContentNode::element(
            "div",
            Some("answerText"),
            vec![ContentNode::element(
                "code",
                None,
                vec![ContentNode::text(r"\(\frac{\)")],
            )],
        );

        let lines = LineRenderer::new(Color::Rgb(0xcc, 0, 0)).render(&tree);

        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].spans[0].content, r"\(\frac{\)");
        assert_eq!(lines[0].spans[0].style.fg, Some(Color::Rgb(0xcc, 0, 0)));
    }

    #[test]
    fn citation_tokens_are_highlighted() {
        let lines = LineRenderer::new(Color::Red).render(&build_tree("fact  ^1^ ."));
        let token = lines[0]
            .spans
            .iter()
            .find(|span| span.content == "^1^")
            .unwrap();
        assert_eq!(token.style.fg, Some(Color::Magenta));
        assert_eq!(plain_text(&lines[0]), "fact  ^1^ .");
    }

    #[test]
    fn split_tokens() {
        assert_eq!(
            split_citation_tokens("a ^12^ b ^x^"),
            vec![
                ("a ", false),
                ("^12^", true),
                (" b ^", false),
                ("x^", false),
                ("", false),
            ]
        );
    }

    #[test]
    fn empty_tree_has_no_lines() {
        assert!(render_plain("").is_empty());
    }
}
