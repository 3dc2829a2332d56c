use std::sync::OnceLock;

use regex::Regex;

/// The in-text citation marker `[docN]`, N being 1 to 3 decimal digits.
pub struct CitationMarker;

impl CitationMarker {
    pub const OPEN: &'static str = "[doc";
    pub const CLOSE: &'static str = "]";
    /// Glyph surrounding the display order in the rewritten token.
    pub const TOKEN_GLYPH: char = '^';

    /// Pattern with the digits in capture group 1.
    pub fn regex() -> &'static Regex {
        static MARKER: OnceLock<Regex> = OnceLock::new();
        MARKER.get_or_init(|| Regex::new(r"\[doc([0-9]{1,3})\]").expect("Invalid citation marker regex"))
    }

    /// The display token that replaces a resolved marker, e.g. ` ^2^ `.
    pub fn token(order: usize) -> String {
        let glyph = Self::TOKEN_GLYPH;
        format!(" {glyph}{order}{glyph} ")
    }

    /// The marker text for a 1-based citation index.
    pub fn for_index(index: usize) -> String {
        format!("{}{index}{}", Self::OPEN, Self::CLOSE)
    }
}
