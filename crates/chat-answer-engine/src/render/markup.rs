use super::cursor::Cursor;

/// Deepest element nesting the scanner will build. Tags opened below this
/// depth are dropped and their content attached to the enclosing element.
pub const MAX_DEPTH: usize = 256;

/// Elements that never have children.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// A scanned markup node: text with entities decoded, or an element with
/// its lowercased tag name and `class` attribute. All other attributes are
/// discarded during scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Text(String),
    Element {
        name: String,
        class: Option<String>,
        children: Vec<MarkupNode>,
    },
}

impl MarkupNode {
    /// Concatenated text of the node and its descendants.
    pub fn text_content(&self) -> String {
        match self {
            MarkupNode::Text(text) => text.clone(),
            MarkupNode::Element { children, .. } => {
                children.iter().map(MarkupNode::text_content).collect()
            }
        }
    }
}

#[derive(Debug)]
enum Tag {
    Open {
        name: String,
        class: Option<String>,
        self_closing: bool,
    },
    Close(String),
    /// Comments and declarations.
    Ignored,
}

/// Scans `markup` into a forest of [`MarkupNode`]s.
///
/// Never fails: a `<` that does not start a well-formed tag is text, stray
/// closing tags are ignored and elements left open at the end are closed.
/// A tag ends at a fresh `<`, so `<` inside an attribute value makes the tag text.
///
/// Runs in time linear in the input: a failed tag is abandoned at the next `<`.
pub fn scan_markup(markup: &str) -> Vec<MarkupNode> {
    let mut scanner = Scanner {
        cur: Cursor::new(markup),
        open: Vec::new(),
        last_gt: markup.rfind('>'),
        last_comment_end: markup.rfind("-->"),
    };
    scanner.children()
}

struct Scanner<'a> {
    cur: Cursor<'a>,
    /// Names of the currently open elements, outermost first.
    open: Vec<String>,
    /// Byte offset of the last `>`; no tag can start after it.
    last_gt: Option<usize>,
    /// Byte offset of the last `-->`.
    last_comment_end: Option<usize>,
}

impl<'a> Scanner<'a> {
    /// Scans nodes until end of input or until the innermost open element is closed.
    fn children(&mut self) -> Vec<MarkupNode> {
        let mut out = vec![];
        let mut text_start = self.cur.pos();

        while !self.cur.eof() {
            if self.cur.peek() != Some(b'<') {
                self.cur.bump();
                continue;
            }

            if self.last_gt.is_none_or(|gt| gt < self.cur.pos()) {
                // Nothing left can close a tag
                self.cur.skip_to_end();
                break;
            }

            let tag_start = self.cur.clone();
            let Some(tag) = self.try_tag() else {
                // Not a tag: the `<` is text
                self.cur = tag_start;
                self.cur.bump();
                continue;
            };
            flush_text(&mut out, self.cur.slice(text_start, tag_start.pos()));

            match tag {
                Tag::Ignored => {}
                Tag::Close(name) => {
                    if self.open.last() == Some(&name) {
                        return out;
                    }
                    if self.open.contains(&name) {
                        // Closes an ancestor: end this element and let the
                        // ancestor see the tag again.
                        self.cur = tag_start;
                        return out;
                    }
                    log::debug!("Ignoring stray closing tag </{name}>");
                }
                Tag::Open {
                    name,
                    class,
                    self_closing,
                } => {
                    if self_closing || VOID_ELEMENTS.contains(&name.as_str()) {
                        out.push(MarkupNode::Element {
                            name,
                            class,
                            children: vec![],
                        });
                    } else if self.open.len() >= MAX_DEPTH {
                        log::debug!("Nesting deeper than {MAX_DEPTH}, dropping <{name}>");
                    } else {
                        self.open.push(name);
                        let children = self.children();
                        let name = self.open.pop().unwrap_or_default();
                        out.push(MarkupNode::Element {
                            name,
                            class,
                            children,
                        });
                    }
                }
            }
            text_start = self.cur.pos();
        }

        flush_text(&mut out, self.cur.slice(text_start, self.cur.pos()));
        out
    }

    /// Attempts to read a tag at the current `<`.
    ///
    /// Returns `None` if the input here is not a complete tag; the caller restores the cursor.
    fn try_tag(&mut self) -> Option<Tag> {
        self.cur.bump(); // <

        if self.cur.starts_with(b"!--") {
            self.cur.bump_n(3);
            if self.last_comment_end.is_none_or(|end| end < self.cur.pos()) {
                return None;
            }
            return self.cur.skip_past(b"-->").then_some(Tag::Ignored);
        }
        if matches!(self.cur.peek(), Some(b'!' | b'?')) {
            return self.cur.skip_past(b">").then_some(Tag::Ignored);
        }

        let closing = self.cur.peek() == Some(b'/');
        if closing {
            self.cur.bump();
        }

        let name = self.tag_name()?;
        match self.cur.peek() {
            Some(b) if b.is_ascii_whitespace() || b == b'/' || b == b'>' => {}
            _ => return None,
        }

        if closing {
            return self.cur.skip_past(b">").then_some(Tag::Close(name));
        }

        let (class, self_closing) = self.attributes()?;
        Some(Tag::Open {
            name,
            class,
            self_closing,
        })
    }

    /// An ASCII letter followed by letters, digits or `-`, lowercased.
    fn tag_name(&mut self) -> Option<String> {
        if !self.cur.peek()?.is_ascii_alphabetic() {
            return None;
        }
        let name = self
            .cur
            .take_while(|b| b.is_ascii_alphanumeric() || b == b'-');
        Some(name.to_ascii_lowercase())
    }

    /// Reads attributes up to and including the closing `>`, keeping only `class`.
    fn attributes(&mut self) -> Option<(Option<String>, bool)> {
        let mut class: Option<String> = None;
        loop {
            self.cur.skip_whitespace();
            match self.cur.peek()? {
                b'<' => return None,
                b'>' => {
                    self.cur.bump();
                    return Some((class, false));
                }
                b'/' => {
                    self.cur.bump();
                    if self.cur.peek() == Some(b'>') {
                        self.cur.bump();
                        return Some((class, true));
                    }
                }
                b'=' => {
                    // Value without a name
                    self.cur.bump();
                    self.cur.skip_whitespace();
                    self.attribute_value()?;
                }
                _ => {
                    let name = self
                        .cur
                        .take_while(|b| {
                            !b.is_ascii_whitespace() && !matches!(b, b'=' | b'>' | b'/' | b'<')
                        })
                        .to_ascii_lowercase();
                    self.cur.skip_whitespace();
                    let value = if self.cur.peek() == Some(b'=') {
                        self.cur.bump();
                        self.cur.skip_whitespace();
                        Some(self.attribute_value()?)
                    } else {
                        None
                    };
                    if name == "class" && class.is_none() {
                        class = value
                            .map(|v| html_escape::decode_html_entities(v).into_owned())
                            .filter(|v| !v.is_empty());
                    }
                }
            }
        }
    }

    /// A quoted or unquoted attribute value, raw. `None` if a quote is left open.
    fn attribute_value(&mut self) -> Option<&'a str> {
        match self.cur.peek()? {
            quote @ (b'"' | b'\'') => {
                self.cur.bump();
                let value = self.cur.take_while(|b| b != quote && b != b'<');
                if self.cur.bump()? != quote {
                    return None;
                }
                Some(value)
            }
            _ => Some(
                self.cur
                    .take_while(|b| !b.is_ascii_whitespace() && !matches!(b, b'>' | b'<')),
            ),
        }
    }
}

fn flush_text(out: &mut Vec<MarkupNode>, raw: &str) {
    if !raw.is_empty() {
        out.push(MarkupNode::Text(
            html_escape::decode_html_entities(raw).into_owned(),
        ));
    }
}
