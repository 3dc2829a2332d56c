use serde::Serialize;

/// A node of the render tree handed to the UI layer.
///
/// Text is final: the renderer must display it literally and never
/// re-interpret it as markup. Math nodes carry the expression without its
/// `\[ \]` / `\( \)` delimiters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ContentNode {
    Text(String),
    Element {
        tag: String,
        class_name: Option<String>,
        children: Vec<ContentNode>,
    },
    MathBlock {
        expression: String,
    },
    MathInline {
        expression: String,
    },
    /// Children of an element whose own tag was discarded.
    Fragment(Vec<ContentNode>),
}

impl ContentNode {
    pub fn text(text: impl Into<String>) -> Self {
        ContentNode::Text(text.into())
    }

    pub fn element(
        tag: impl Into<String>,
        class_name: Option<&str>,
        children: Vec<ContentNode>,
    ) -> Self {
        ContentNode::Element {
            tag: tag.into(),
            class_name: class_name.map(str::to_string),
            children,
        }
    }

    /// Child nodes; empty for leaves.
    pub fn children(&self) -> &[ContentNode] {
        match self {
            ContentNode::Element { children, .. } | ContentNode::Fragment(children) => children,
            ContentNode::Text(_) | ContentNode::MathBlock { .. } | ContentNode::MathInline { .. } => {
                &[]
            }
        }
    }

    /// Concatenated text of this node and its descendants.
    ///
    /// Math nodes contribute their expression.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.walk(&mut |node| match node {
            ContentNode::Text(text) => out.push_str(text),
            ContentNode::MathBlock { expression } | ContentNode::MathInline { expression } => {
                out.push_str(expression)
            }
            ContentNode::Element { .. } | ContentNode::Fragment(_) => {}
        });
        out
    }

    /// Depth-first, pre-order visit of this node and all descendants.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a ContentNode)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Elements in the subtree carrying the given class.
    pub fn find_by_class<'a>(&'a self, class: &str) -> Vec<&'a ContentNode> {
        let mut found = Vec::new();
        self.walk(&mut |node| {
            if let ContentNode::Element {
                class_name: Some(c),
                ..
            } = node
                && c == class
            {
                found.push(node);
            }
        });
        found
    }
}
