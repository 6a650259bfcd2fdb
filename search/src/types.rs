use serde::{Deserialize, Serialize};

/// Timing and volume metadata returned alongside the items
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchInformation {
    #[serde(default)]
    pub search_time: f64,
    #[serde(default)]
    pub formatted_search_time: String,
    #[serde(default)]
    pub total_results: String,
    #[serde(default)]
    pub formatted_total_results: String,
}

/// One ranked result; identity is its position in `SearchResults::items`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub display_link: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub formatted_url: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    #[serde(default)]
    pub kind: String,
    #[serde(default, alias = "search_information")]
    pub search_information: SearchInformation,
    #[serde(default, alias = "organic_results")]
    pub items: Vec<SearchItem>,
}
