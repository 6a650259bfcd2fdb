/// Words ignored by keyword extraction
pub const STOP_WORDS: &[&str] = &[
    "le", "la", "les", "un", "une", "des", "et", "ou", "mais", "donc", "or", "ni", "car", "à",
    "de", "en", "dans", "par", "pour", "avec", "sur", "sous", "entre", "avant", "après",
    "pendant", "comme", "que", "qui", "quoi", "quand", "où", "comment", "quel", "quelle",
    "quels", "quelles", "ce", "cette", "ces", "il", "elle", "ils", "elles", "nous", "vous", "je",
    "tu", "me", "te", "se", "lui", "leur", "y", "ci", "là", "ici", "là-bas",
];

const PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '"', '\'', '(', ')', '[', ']', '{', '}'];

/// Extracts de-duplicated lowercase keywords in order of first occurrence.
///
/// Tokens are whitespace-separated words stripped of surrounding punctuation;
/// a token is kept when it is longer than three bytes and is not a stop word.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let mut keywords: Vec<String> = Vec::new();

    for word in lowered.split_whitespace() {
        let word = word.trim_matches(PUNCTUATION);
        if word.len() <= 3 || STOP_WORDS.contains(&word) {
            continue;
        }
        if !keywords.iter().any(|k| k == word) {
            keywords.push(word.to_string());
        }
    }

    keywords
}
