use super::Vocabulary;

/// Returns the tracked categories with at least one keyword occurring in
/// `text`, in tracked order.
///
/// Matching is case-insensitive substring containment with no word
/// boundaries, so short keywords can hit inside longer words
/// (`"ue"` inside `"questo"`). Keywords are stored lowercased.
pub fn find_categories(text: &str, vocabulary: &Vocabulary) -> Vec<String> {
    let text_lower = text.to_lowercase();

    vocabulary
        .tracked()
        .iter()
        .filter(|id| {
            vocabulary
                .keywords(id)
                .iter()
                .any(|keyword| text_lower.contains(keyword.as_str()))
        })
        .cloned()
        .collect()
}
