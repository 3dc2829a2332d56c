use crate::models::ResolvedCitation;

/// Filepaths longer than this are shortened in compact citation lists.
pub const DEFAULT_LABEL_LIMIT: usize = 50;

/// Characters kept from each end of a shortened filepath.
const KEEP_CHARS: usize = 20;

/// Human readable label for a citation, e.g. `"guide.pdf - Part 2"`.
///
/// With `truncate_at`, filepaths longer than that many characters keep only
/// their first and last 20 characters. Citations without a filepath are
/// labelled `"Citation {display_index}"`.
pub fn citation_label(
    citation: &ResolvedCitation,
    display_index: usize,
    truncate_at: Option<usize>,
) -> String {
    let Some(filepath) = citation.filepath().filter(|f| !f.is_empty()) else {
        return format!("Citation {display_index}");
    };

    let count = filepath.chars().count();
    let name = match truncate_at {
        Some(limit) if count > limit && count > KEEP_CHARS * 2 => {
            let head: String = filepath.chars().take(KEEP_CHARS).collect();
            let tail: String = filepath.chars().skip(count - KEEP_CHARS).collect();
            format!("{head}...{tail}")
        }
        _ => filepath.to_string(),
    };
    format!("{name} - Part {}", citation.part_index)
}

/// Summary line for the citation list, e.g. `"3 references"`.
pub fn reference_count_label(count: usize) -> String {
    match count {
        1 => "1 reference".to_string(),
        n => format!("{n} references"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawCitation;

    fn cited(filepath: Option<&str>, part_index: u32) -> ResolvedCitation {
        let mut resolved = ResolvedCitation::new(
            RawCitation {
                filepath: filepath.map(str::to_string),
                ..RawCitation::default()
            },
            1,
            1,
        );
        resolved.part_index = part_index;
        resolved
    }

    #[test]
    fn label_with_filepath() {
        assert_eq!(
            citation_label(&cited(Some("guide.pdf"), 2), 1, None),
            "guide.pdf - Part 2"
        );
    }

    #[test]
    fn label_without_filepath() {
        assert_eq!(citation_label(&cited(None, 1), 3, None), "Citation 3");
        assert_eq!(citation_label(&cited(Some(""), 1), 4, None), "Citation 4");
    }

    #[test]
    fn long_filepath_is_shortened() {
        let path = format!("{}{}{}", "a".repeat(20), "m".repeat(15), "z".repeat(20));
        assert_eq!(
            citation_label(&cited(Some(&path), 1), 1, Some(DEFAULT_LABEL_LIMIT)),
            format!("{}...{} - Part 1", "a".repeat(20), "z".repeat(20))
        );
    }

    #[test]
    fn short_filepath_is_kept_when_truncating() {
        let path = "x".repeat(DEFAULT_LABEL_LIMIT);
        assert_eq!(
            citation_label(&cited(Some(&path), 1), 1, Some(DEFAULT_LABEL_LIMIT)),
            format!("{path} - Part 1")
        );
    }

    #[test]
    fn truncation_counts_chars_not_bytes() {
        let path = "é".repeat(60);
        assert_eq!(
            citation_label(&cited(Some(&path), 1), 1, Some(DEFAULT_LABEL_LIMIT)),
            format!("{}...{} - Part 1", "é".repeat(20), "é".repeat(20))
        );
    }

    #[test]
    fn reference_counts() {
        assert_eq!(reference_count_label(1), "1 reference");
        assert_eq!(reference_count_label(0), "0 references");
        assert_eq!(reference_count_label(5), "5 references");
    }
}
