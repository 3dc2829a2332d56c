use std::collections::HashMap;

use regex::Captures;

use crate::models::{RawCitation, ResolvedCitation};

use super::marker::CitationMarker;

/// Resolves `[docN]` markers against `citations` and renumbers them for display.
///
/// Markers are visited left to right. The first marker naming a given
/// original index gets the next display order; every marker naming that index
/// is rewritten to the same token. Markers whose index is zero or past the end
/// of `citations` are left in the text unchanged.
///
/// Returns the rewritten text and the referenced citations in order of first
/// appearance. `citations` itself is never modified.
pub fn resolve_citations(
    text: &str,
    citations: &[RawCitation],
) -> (String, Vec<ResolvedCitation>) {
    let mut resolved: Vec<ResolvedCitation> = Vec::new();
    let mut orders: HashMap<usize, usize> = HashMap::new();

    let rewritten = CitationMarker::regex().replace_all(text, |caps: &Captures<'_>| {
        let marker = &caps[0];
        let Some(index) = caps[1].parse::<usize>().ok().filter(|i| *i >= 1) else {
            log::debug!("Skipping citation marker {marker}: index out of range");
            return marker.to_string();
        };
        let Some(citation) = citations.get(index - 1) else {
            log::debug!(
                "Skipping citation marker {marker}: only {} citations available",
                citations.len()
            );
            return marker.to_string();
        };

        let order = *orders.entry(index).or_insert_with(|| {
            let order = resolved.len() + 1;
            resolved.push(ResolvedCitation::new(citation.clone(), index, order));
            order
        });
        CitationMarker::token(order)
    });

    (rewritten.into_owned(), resolved)
}
