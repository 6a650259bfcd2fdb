//! Finds the shell command a reply proposes to run.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag};

use crate::commands::find_ignoring_case;

const CUES: [&str; 6] = [
    "commande :",
    "voici la commande",
    "vous pouvez utiliser",
    "utilise cette commande",
    "exécute cette commande",
    "commande pour",
];

/// The cue whose bare line remainder is taken as the command.
const LITERAL_CUE: &str = "commande :";

/// Returns the command embedded in `reply`, if any.
///
/// A fenced `bash` block wins over `sh`/`shell`, which wins over an
/// untagged fence. Without a fence, a cue phrase followed by inline code on
/// the same line is used.
pub fn extract_command(reply: &str) -> Option<String> {
    let blocks = fenced_blocks(reply);

    let pick = |accept: &dyn Fn(&str) -> bool| {
        blocks
            .iter()
            .find(|(lang, body)| accept(lang.as_str()) && !body.is_empty())
            .map(|(_, body)| body.clone())
    };

    pick(&|lang| lang == "bash")
        .or_else(|| pick(&|lang| lang == "sh" || lang == "shell"))
        .or_else(|| pick(&|lang| lang.is_empty()))
        .or_else(|| command_after_cue(reply))
}

fn fenced_blocks(reply: &str) -> Vec<(String, String)> {
    let mut blocks = Vec::new();
    let mut current: Option<(String, String)> = None;

    for event in Parser::new(reply) {
        match event {
            Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info))) => {
                let lang = info
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_lowercase();
                current = Some((lang, String::new()));
            }
            Event::Text(text) => {
                if let Some((_, body)) = current.as_mut() {
                    body.push_str(&text);
                }
            }
            Event::End(Tag::CodeBlock(_)) => {
                if let Some((lang, body)) = current.take() {
                    blocks.push((lang, body.trim().to_string()));
                }
            }
            _ => {}
        }
    }

    blocks
}

fn command_after_cue(reply: &str) -> Option<String> {
    for line in reply.lines() {
        for cue in CUES {
            let Some((_, end)) = find_ignoring_case(line, cue) else {
                continue;
            };
            let rest = &line[end..];

            if let Some(code) = inline_code(rest) {
                return Some(code);
            }
            if cue == LITERAL_CUE {
                let rest = rest.trim();
                if !rest.is_empty() {
                    return Some(rest.to_string());
                }
            }
        }
    }
    None
}

fn inline_code(text: &str) -> Option<String> {
    let start = text.find('`')?;
    let ticks = text[start..].chars().take_while(|&c| c == '`').count();
    let open = start + ticks;
    let close = text[open..].find(&"`".repeat(ticks))?;
    let code = text[open..open + close].trim();
    (!code.is_empty()).then(|| code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_fence_is_extracted_without_its_tag() {
        let reply = "Pour lister :\n\n```bash\nls -la\n```\n";
        assert_eq!(extract_command(reply).as_deref(), Some("ls -la"));
    }

    #[test]
    fn bash_fence_wins_over_earlier_blocks() {
        let reply = "Exemple :\n\n```\necho brouillon\n```\n\nPuis :\n\n```sh\nuname -a\n```\n\n```bash\ndf -h\n```\n";
        assert_eq!(extract_command(reply).as_deref(), Some("df -h"));
    }

    #[test]
    fn sh_wins_over_untagged() {
        let reply = "```\necho un\n```\n\n```shell\necho deux\n```\n";
        assert_eq!(extract_command(reply).as_deref(), Some("echo deux"));
    }

    #[test]
    fn other_languages_are_not_commands() {
        let reply = "Voici un script :\n\n```python\nprint('salut')\n```\n";
        assert_eq!(extract_command(reply), None);
    }

    #[test]
    fn cue_with_inline_code() {
        let reply = "Vous pouvez utiliser `df -h` pour voir l'espace disque.";
        assert_eq!(extract_command(reply).as_deref(), Some("df -h"));
    }

    #[test]
    fn literal_cue_takes_rest_of_line() {
        let reply = "Commande : free -m\nElle affiche la mémoire.";
        assert_eq!(extract_command(reply).as_deref(), Some("free -m"));
    }

    #[test]
    fn other_cues_need_inline_code() {
        let reply = "Voici la commande qui convient le mieux.";
        assert_eq!(extract_command(reply), None);
    }

    #[test]
    fn plain_text_has_no_command() {
        assert_eq!(extract_command("Paris est la capitale de la France."), None);
    }
}
