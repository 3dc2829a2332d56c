use std::collections::HashMap;

use crate::models::ResolvedCitation;

/// Assigns `part_index`: 1 for the first citation of each filepath, then 2, 3, ...
///
/// Only labelling depends on this; citation identity and display order do not.
/// Citations without a filepath share one counter.
pub fn enumerate_citations(mut citations: Vec<ResolvedCitation>) -> Vec<ResolvedCitation> {
    let mut parts: HashMap<Option<String>, u32> = HashMap::new();
    for citation in &mut citations {
        let part = parts
            .entry(citation.citation.filepath.clone())
            .and_modify(|n| *n += 1)
            .or_insert(1);
        citation.part_index = *part;
    }
    citations
}
