use serde::{Deserialize, Serialize};

/// A citation as produced by the retrieval step, in model output order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawCitation {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub filepath: Option<String>,
    #[serde(default)]
    pub chunk_id: Option<String>,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub metadata: Option<serde_json::Value>,
}

impl RawCitation {
    /// Create a citation pointing at `filepath` with empty content
    pub fn from_filepath(filepath: impl Into<String>) -> Self {
        Self {
            filepath: Some(filepath.into()),
            ..Self::default()
        }
    }
}

/// A citation referenced by the answer text, renumbered for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedCitation {
    /// Cloned source record. `id` holds the original 1-based index.
    #[serde(flatten)]
    pub citation: RawCitation,
    /// Display order, starting at "1" for the first citation in the text.
    pub reindex_id: String,
    /// Occurrence count among citations sharing the same filepath.
    /// Zero until the enumerator has run.
    pub part_index: u32,
}

impl ResolvedCitation {
    pub(crate) fn new(mut citation: RawCitation, original_index: usize, order: usize) -> Self {
        citation.id = original_index.to_string();
        Self {
            citation,
            reindex_id: order.to_string(),
            part_index: 0,
        }
    }

    pub fn filepath(&self) -> Option<&str> {
        self.citation.filepath.as_deref()
    }

    pub fn content(&self) -> &str {
        &self.citation.content
    }
}
