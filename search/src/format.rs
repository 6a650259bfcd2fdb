use std::fmt::Write;

use crate::types::SearchResults;

/// Returned whenever a result set has no items
pub const NO_RESULTS: &str = "Aucun résultat trouvé pour cette recherche.";

const MAX_DISPLAYED: usize = 5;

/// Renders up to five results as numbered title/snippet/link blocks
pub fn format_search_results(results: &SearchResults) -> String {
    if results.items.is_empty() {
        return NO_RESULTS.to_string();
    }

    let info = &results.search_information;
    let mut out = String::from("Résultats de recherche:\n");
    let _ = writeln!(out, "Temps de recherche: {:.2} secondes", info.search_time);
    let _ = writeln!(out, "Résultats totaux: {}\n", info.formatted_total_results);

    for (i, item) in results.items.iter().take(MAX_DISPLAYED).enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, item.title);
        let _ = writeln!(out, "   {}", item.snippet);
        let _ = writeln!(out, "   [{}]\n", item.link);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SearchInformation, SearchItem};

    fn item(n: usize) -> SearchItem {
        SearchItem {
            title: format!("Titre {n}"),
            link: format!("https://example.com/{n}"),
            snippet: format!("Extrait {n}"),
            ..SearchItem::default()
        }
    }

    #[test]
    fn empty_items_yield_sentinel_regardless_of_metadata() {
        let results = SearchResults {
            kind: "customsearch#search".to_string(),
            search_information: SearchInformation {
                search_time: 1.5,
                formatted_total_results: "42".to_string(),
                ..SearchInformation::default()
            },
            items: Vec::new(),
        };
        assert_eq!(format_search_results(&results), NO_RESULTS);
        assert_eq!(format_search_results(&SearchResults::default()), NO_RESULTS);
    }

    #[test]
    fn caps_output_at_five_items() {
        let results = SearchResults {
            items: (1..=8).map(item).collect(),
            ..SearchResults::default()
        };
        let text = format_search_results(&results);
        assert!(text.contains("5. Titre 5"));
        assert!(!text.contains("Titre 6"));
        assert!(text.contains("   Extrait 1\n   [https://example.com/1]"));
    }

    #[test]
    fn header_reports_time_and_totals() {
        let results = SearchResults {
            search_information: SearchInformation {
                search_time: 0.256,
                formatted_total_results: "1 000".to_string(),
                ..SearchInformation::default()
            },
            items: vec![item(1)],
            ..SearchResults::default()
        };
        let text = format_search_results(&results);
        assert!(text.starts_with("Résultats de recherche:\nTemps de recherche: 0.26 secondes\n"));
        assert!(text.contains("Résultats totaux: 1 000"));
    }
}
