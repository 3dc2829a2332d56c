/// A byte cursor over markup text.
///
/// Every position the scanner stops at sits next to an ASCII byte, so slices
/// taken between cursor positions are always on char boundaries.
#[derive(Clone)]
pub struct Cursor<'a> {
    /// The markup being scanned.
    pub s: &'a str,
    /// Current byte index into `s`.
    pub i: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(s: &'a str) -> Self {
        Self { s, i: 0 }
    }

    pub fn pos(&self) -> usize {
        self.i
    }

    pub fn eof(&self) -> bool {
        self.i >= self.s.len()
    }

    /// Peeks at the current byte without advancing.
    pub fn peek(&self) -> Option<u8> {
        self.s.as_bytes().get(self.i).copied()
    }

    /// Checks if the remaining input starts with the given byte pattern.
    pub fn starts_with(&self, pat: &[u8]) -> bool {
        self.s.as_bytes().get(self.i..).is_some_and(|rest| rest.starts_with(pat))
    }

    /// Advances by one byte, returning the consumed byte.
    pub fn bump(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.i += 1;
        Some(b)
    }

    /// Advances by `n` bytes.
    pub fn bump_n(&mut self, n: usize) {
        self.i += n;
    }

    /// Consumes bytes while `pred` holds and returns them.
    pub fn take_while(&mut self, pred: impl Fn(u8) -> bool) -> &'a str {
        let start = self.i;
        while let Some(b) = self.peek() {
            if !pred(b) {
                break;
            }
            self.i += 1;
        }
        self.slice(start, self.i)
    }

    pub fn skip_whitespace(&mut self) {
        self.take_while(|b| b.is_ascii_whitespace());
    }

    /// Advances until just past the next `pat`. Returns false, leaving the
    /// cursor at end of input, when `pat` does not occur.
    pub fn skip_past(&mut self, pat: &[u8]) -> bool {
        while !self.eof() {
            if self.starts_with(pat) {
                self.bump_n(pat.len());
                return true;
            }
            self.bump();
        }
        false
    }

    pub fn skip_to_end(&mut self) {
        self.i = self.s.len();
    }

    /// The text between two positions; empty if they are not on char boundaries.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        self.s.get(start..end).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_basics() {
        let mut cur = Cursor::new("hello");
        assert_eq!(cur.pos(), 0);
        assert!(!cur.eof());
        assert_eq!(cur.peek(), Some(b'h'));
        assert_eq!(cur.bump(), Some(b'h'));
        assert_eq!(cur.pos(), 1);
    }

    #[test]
    fn cursor_starts_with() {
        let cur = Cursor::new("<!-- x -->");
        assert!(cur.starts_with(b"<!--"));
        assert!(!cur.starts_with(b"-->"));
    }

    #[test]
    fn empty_string_input() {
        let cur = Cursor::new("");
        assert!(cur.eof());
        assert_eq!(cur.peek(), None);
        assert_eq!(cur.pos(), 0);
    }

    #[test]
    fn starts_with_past_end() {
        let mut cur = Cursor::new("ab");
        cur.bump_n(10);
        assert!(cur.eof());
        assert!(!cur.starts_with(b"a"));
    }

    #[test]
    fn take_while_stops_at_predicate() {
        let mut cur = Cursor::new("div class");
        assert_eq!(cur.take_while(|b| b.is_ascii_alphanumeric()), "div");
        assert_eq!(cur.peek(), Some(b' '));
    }

    #[test]
    fn skip_past_finds_pattern() {
        let mut cur = Cursor::new("abc-->rest");
        assert!(cur.skip_past(b"-->"));
        assert_eq!(cur.slice(cur.pos(), cur.s.len()), "rest");
    }

    #[test]
    fn skip_to_end_reaches_eof() {
        let mut cur = Cursor::new("abc");
        cur.bump();
        cur.skip_to_end();
        assert!(cur.eof());
        assert_eq!(cur.pos(), 3);
    }

    #[test]
    fn skip_past_missing_pattern_ends_at_eof() {
        let mut cur = Cursor::new("abc");
        assert!(!cur.skip_past(b"-->"));
        assert!(cur.eof());
    }

    #[test]
    fn slice_off_char_boundary_is_empty() {
        let cur = Cursor::new("é");
        assert_eq!(cur.slice(0, 1), "");
        assert_eq!(cur.slice(0, 2), "é");
    }

    #[test]
    fn bump_at_eof_returns_none() {
        let mut cur = Cursor::new("x");
        assert_eq!(cur.bump(), Some(b'x'));
        assert_eq!(cur.bump(), None);
        assert_eq!(cur.bump(), None);
    }
}
