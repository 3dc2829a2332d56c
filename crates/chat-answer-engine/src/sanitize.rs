//! Optional sanitization of raw answer text before it enters the pipeline.
//!
//! Sanitization is an external capability; the tree builder enforces its own
//! allow-list regardless of whether a sanitizer ran.

/// Cleans untrusted answer text.
pub trait Sanitizer {
    fn sanitize(&self, text: &str) -> String;
}

impl<F> Sanitizer for F
where
    F: Fn(&str) -> String,
{
    fn sanitize(&self, text: &str) -> String {
        self(text)
    }
}

/// Escapes `&`, `<` and `>` so any markup in the generated text stays literal.
///
/// The tree builder decodes entities in text, so escaped characters are shown
/// to the reader exactly as the model wrote them.
#[derive(Debug, Clone, Copy, Default)]
pub struct EscapeSanitizer;

impl Sanitizer for EscapeSanitizer {
    fn sanitize(&self, text: &str) -> String {
        html_escape::encode_text(text).into_owned()
    }
}
