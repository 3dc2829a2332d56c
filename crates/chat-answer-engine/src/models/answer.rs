use serde::{Deserialize, Deserializer, Serialize};

use super::citation::{RawCitation, ResolvedCitation};

#[derive(Debug, thiserror::Error)]
pub enum AnswerError {
    #[error("Invalid answer JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A generated answer as delivered by the chat backend.
///
/// The record is treated as immutable input: the pipeline clones whatever it
/// needs to change and never mutates the caller's copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAnswer {
    /// The generated text. `None` when the wire value was missing or not a
    /// string, which callers treat as "nothing to render".
    #[serde(rename = "answer", default, deserialize_with = "string_or_none")]
    pub answer_text: Option<String>,
    /// Citations in model output order; `[docN]` refers to `citations[N - 1]`.
    #[serde(default)]
    pub citations: Vec<RawCitation>,
    /// Base64 encoded PNG chart, passed through untouched.
    #[serde(default)]
    pub generated_chart: Option<String>,
    #[serde(default)]
    pub message_id: Option<String>,
    /// Stored feedback marker, either a single value or a comma separated list.
    #[serde(default)]
    pub feedback: Option<String>,
}

impl RawAnswer {
    /// Create an answer with the given text and no citations
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            answer_text: Some(text.into()),
            ..Self::default()
        }
    }

    /// Replace the citation list
    pub fn citations(mut self, citations: Vec<RawCitation>) -> Self {
        self.citations = citations;
        self
    }

    /// Set the message id and stored feedback marker
    pub fn message(mut self, message_id: impl Into<String>, feedback: Option<&str>) -> Self {
        self.message_id = Some(message_id.into());
        self.feedback = feedback.map(str::to_string);
        self
    }

    /// Deserialize an answer from the backend's JSON shape
    pub fn from_json(json: &str) -> Result<Self, AnswerError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Accepts any JSON value, keeping it only when it is a string.
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(text) => Some(text),
        _ => None,
    })
}

/// The output of the answer pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedAnswer {
    /// One entry per distinct citation referenced in the text, in order of
    /// first appearance.
    pub citations: Vec<ResolvedCitation>,
    /// Rewritten text, ready for the tree builder.
    pub markup_text: String,
    pub generated_chart: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_shape() {
        let json = r#"{
            "answer": "See [doc1].",
            "citations": [{"id": "1", "filepath": "a.pdf", "chunk_id": "0", "content": "alpha"}],
            "generated_chart": null,
            "message_id": "m-1",
            "feedback": "positive"
        }"#;

        let answer = RawAnswer::from_json(json).unwrap();

        assert_eq!(answer.answer_text.as_deref(), Some("See [doc1]."));
        assert_eq!(answer.citations.len(), 1);
        assert_eq!(answer.citations[0].filepath.as_deref(), Some("a.pdf"));
        assert_eq!(answer.message_id.as_deref(), Some("m-1"));
        assert_eq!(answer.feedback.as_deref(), Some("positive"));
        assert!(answer.generated_chart.is_none());
    }

    #[test]
    fn non_string_answer_becomes_none() {
        for json in [
            r#"{"answer": 42}"#,
            r#"{"answer": {"text": "hi"}}"#,
            r#"{"answer": null}"#,
            r#"{}"#,
        ] {
            let answer = RawAnswer::from_json(json).unwrap();
            assert!(answer.answer_text.is_none(), "{json}");
        }
    }

    #[test]
    fn invalid_json_is_an_error() {
        let err = RawAnswer::from_json("{not json").unwrap_err();
        assert!(err.to_string().starts_with("Invalid answer JSON"));
    }

    #[test]
    fn metadata_passes_through() {
        let json = r#"{"answer": "x", "citations": [{"content": "c", "metadata": {"page": 3}}]}"#;
        let answer = RawAnswer::from_json(json).unwrap();
        assert_eq!(
            answer.citations[0].metadata,
            Some(serde_json::json!({"page": 3}))
        );
    }
}
