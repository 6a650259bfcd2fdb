// Web search for the ASIONE agent: a single-shot client for the search
// provider plus a plain-text rendering of the results.

pub mod client;
pub mod errors;
pub mod format;
pub mod types;

pub use client::{WebSearcher, SEARCH_ENDPOINT};
pub use errors::{SearchError, SearchResult};
pub use format::{format_search_results, NO_RESULTS};
pub use types::{SearchInformation, SearchItem, SearchResults};
