//! Parsing of the prompt input into built-in commands and task routing.

use anyhow::{Result, bail};

/// One line typed at the prompt, classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    Help,
    Exit,
    Config,
    YesToAll,
    NoToAll,
    Email(&'a str),
    SetApiKey(&'a str),
    SetBaseUrl(&'a str),
    SetModel(&'a str),
    Models,
    Memory,
    Recall(&'a str),
    Remember(&'a str),
    Task(&'a str),
}

impl<'a> Command<'a> {
    /// Classifies a trimmed, non-empty input line. Command words are
    /// case-insensitive; arguments keep their original case.
    pub fn parse(input: &'a str) -> Self {
        let input = input.trim();
        let lower = input.to_lowercase();

        match lower.as_str() {
            "help" => return Command::Help,
            "exit" | "quit" => return Command::Exit,
            "config" => return Command::Config,
            "yes-to-all" | "oui à tout" => return Command::YesToAll,
            "no-to-all" | "non à tout" => return Command::NoToAll,
            "models" => return Command::Models,
            "memory" => return Command::Memory,
            _ => {}
        }

        let (word, rest) = match input.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (input, ""),
        };

        match word.to_lowercase().as_str() {
            "email" if !rest.is_empty() => Command::Email(rest),
            "set-api-key" => Command::SetApiKey(rest),
            "set-base-url" => Command::SetBaseUrl(rest),
            "set-model" => Command::SetModel(rest),
            "recall" if !rest.is_empty() => Command::Recall(rest),
            "remember" if !rest.is_empty() => Command::Remember(rest),
            _ => Command::Task(input),
        }
    }
}

/// Where a free-form task is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Search,
    Ai,
}

const SEARCH_TERMS: [&str; 3] = ["cherche", "recherche", "trouve"];
const RECENT_TERMS: [&str; 4] = ["récemment", "dernières", "2024", "2025"];
// "recherche" must go before "cherche", which it contains
const QUERY_NOISE: [&str; 6] = [
    "recherche",
    "cherche",
    "trouve",
    "informations sur",
    "dernières nouvelles sur",
    "qu'est-ce que",
];

pub fn route_task(task: &str, has_api_key: bool) -> Route {
    let lower = task.to_lowercase();

    if SEARCH_TERMS.iter().any(|term| lower.contains(term)) {
        return Route::Search;
    }
    if RECENT_TERMS.iter().any(|term| lower.contains(term)) || !has_api_key {
        return Route::Search;
    }
    Route::Ai
}

/// Strips the search phrasing from a task, leaving the query itself.
pub fn extract_search_query(task: &str) -> String {
    let mut query = task.to_string();
    for term in QUERY_NOISE {
        query = remove_ignoring_case(&query, term);
    }
    query.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn remove_ignoring_case(text: &str, term: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while !rest.is_empty() {
        match find_ignoring_case(rest, term) {
            Some((start, end)) => {
                out.push_str(&rest[..start]);
                rest = &rest[end..];
            }
            None => {
                out.push_str(rest);
                break;
            }
        }
    }
    out
}

/// Byte range in `haystack` of the first case-insensitive match of `needle`.
pub(crate) fn find_ignoring_case(haystack: &str, needle: &str) -> Option<(usize, usize)> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();

    for (start, _) in haystack.char_indices() {
        let mut matched = 0;
        let mut end = start;
        for c in haystack[start..].chars() {
            let lowered: Vec<char> = c.to_lowercase().collect();
            if needle.len() < matched + lowered.len()
                || needle[matched..matched + lowered.len()] != lowered[..]
            {
                break;
            }
            matched += lowered.len();
            end += c.len_utf8();
            if matched == needle.len() {
                return Some((start, end));
            }
        }
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailArgs {
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub const EMAIL_USAGE: &str = "Usage: email <destinataire> <sujet> <corps>";

/// Splits `<to> <subject> <body>`. A subject starting with `"` runs until
/// the first word ending with `"`.
pub fn parse_email_args(args: &str) -> Result<EmailArgs> {
    let parts: Vec<&str> = args.split_whitespace().collect();
    if parts.len() < 3 {
        bail!(EMAIL_USAGE);
    }

    let to = parts[0].to_string();

    let subject_end = if parts[1].starts_with('"') {
        (1..parts.len())
            .find(|&i| parts[i].ends_with('"') && (i > 1 || parts[i].len() > 1))
            .unwrap_or(parts.len() - 1)
    } else {
        1
    };

    let subject = parts[1..=subject_end].join(" ").trim_matches('"').to_string();
    let body = parts[subject_end + 1..].join(" ");

    Ok(EmailArgs { to, subject, body })
}

/// Hides a secret for display: long values keep four characters at each end.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "********".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_ignore_case() {
        assert_eq!(Command::parse("HELP"), Command::Help);
        assert_eq!(Command::parse("Quit"), Command::Exit);
        assert_eq!(Command::parse("exit"), Command::Exit);
        assert_eq!(Command::parse("Oui à tout"), Command::YesToAll);
        assert_eq!(Command::parse("no-to-all"), Command::NoToAll);
        assert_eq!(Command::parse("models"), Command::Models);
    }

    #[test]
    fn builtin_arguments_keep_their_case() {
        assert_eq!(Command::parse("set-api-key AbC123"), Command::SetApiKey("AbC123"));
        assert_eq!(
            Command::parse("SET-BASE-URL https://Example.org/v1"),
            Command::SetBaseUrl("https://Example.org/v1")
        );
        assert_eq!(Command::parse("set-model"), Command::SetModel(""));
        assert_eq!(
            Command::parse("email bob@example.org salut ça va"),
            Command::Email("bob@example.org salut ça va")
        );
        assert_eq!(Command::parse("recall rust"), Command::Recall("rust"));
        assert_eq!(
            Command::parse("remember le serveur tourne sur le port 8080"),
            Command::Remember("le serveur tourne sur le port 8080")
        );
    }

    #[test]
    fn anything_else_is_a_task() {
        assert_eq!(
            Command::parse("liste les fichiers du dossier"),
            Command::Task("liste les fichiers du dossier")
        );
        assert_eq!(Command::parse("helpme"), Command::Task("helpme"));
        assert_eq!(Command::parse("recall"), Command::Task("recall"));
    }

    #[test]
    fn search_words_always_route_to_search() {
        assert_eq!(route_task("cherche la météo à Paris", true), Route::Search);
        assert_eq!(route_task("Trouve un bon restaurant", true), Route::Search);
    }

    #[test]
    fn recent_topics_and_missing_key_route_to_search() {
        assert_eq!(route_task("les sorties de 2025", true), Route::Search);
        assert_eq!(route_task("ce qui s'est passé récemment", true), Route::Search);
        assert_eq!(route_task("liste les fichiers", false), Route::Search);
        assert_eq!(route_task("liste les fichiers", true), Route::Ai);
    }

    #[test]
    fn search_query_drops_phrasing() {
        assert_eq!(extract_search_query("cherche la météo à Paris"), "la météo à Paris");
        assert_eq!(extract_search_query("Recherche tokio tutorial"), "tokio tutorial");
        assert_eq!(
            extract_search_query("Dernières nouvelles sur Rust"),
            "Rust"
        );
        assert_eq!(
            extract_search_query("Qu'est-ce que le protocole QUIC"),
            "le protocole QUIC"
        );
    }

    #[test]
    fn email_with_plain_subject() {
        let args = parse_email_args("bob@example.org Bonjour comment vas-tu").unwrap();
        assert_eq!(args.to, "bob@example.org");
        assert_eq!(args.subject, "Bonjour");
        assert_eq!(args.body, "comment vas-tu");
    }

    #[test]
    fn email_with_quoted_subject() {
        let args =
            parse_email_args("bob@example.org \"Rapport du jour\" tout est en ordre").unwrap();
        assert_eq!(args.subject, "Rapport du jour");
        assert_eq!(args.body, "tout est en ordre");

        let args = parse_email_args("bob@example.org \"Urgent\" rappelle-moi").unwrap();
        assert_eq!(args.subject, "Urgent");
        assert_eq!(args.body, "rappelle-moi");
    }

    #[test]
    fn email_needs_three_parts() {
        let err = parse_email_args("bob@example.org sujet").unwrap_err();
        assert_eq!(err.to_string(), EMAIL_USAGE);
    }

    #[test]
    fn short_secrets_are_fully_masked() {
        assert_eq!(mask_secret("ABC123"), "********");
        assert_eq!(mask_secret(""), "********");
        assert_eq!(mask_secret("12345678"), "********");
        assert_eq!(mask_secret("sk-abcdef123456"), "sk-a...3456");
    }
}
