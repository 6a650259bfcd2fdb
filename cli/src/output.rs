use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use pulldown_cmark::{CodeBlockKind, Event as MdEvent, HeadingLevel, Options, Parser as MdParser, Tag};
use std::time::Duration;
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::{LinesWithEndings, as_24_bit_terminal_escaped};

use crate::system_info::SystemInfo;

const CODE_THEME: &str = "base16-ocean.dark";

pub fn print_banner() {
    println!("{}", "┌─────────────────────────────────────────┐".cyan());
    println!("{}", "│         ASIONE Agent démarré            │".cyan());
    println!("{}", "│  (Tapez 'help' pour voir les commandes) │".cyan());
    println!("{}", "└─────────────────────────────────────────┘".cyan());
    println!();
}

pub fn print_system_info(info: &SystemInfo) {
    println!("{}", "Système détecté :".bold());
    println!("  Distribution : {} ({})", info.os_name, info.os_id);
    if !info.os_version.is_empty() {
        println!("  Version      : {}", info.os_version);
    }
    if !info.os_build.is_empty() {
        println!("  Build        : {}", info.os_build);
    }
    println!("  Noyau        : {}", info.kernel_version);
    println!("  Architecture : {}", info.architecture);
    println!();
}

pub fn print_help() {
    let entries = [
        ("help", "Affiche cette aide"),
        ("exit/quit", "Quitte l'agent"),
        ("config", "Affiche la configuration"),
        ("set-api-key <key>", "Définit la clé API"),
        ("set-base-url <url>", "Définit l'URL de base du fournisseur"),
        ("set-model <model>", "Définit le modèle à utiliser"),
        ("models", "Liste les modèles du fournisseur"),
        ("yes-to-all", "Exécute les commandes sans confirmation"),
        ("no-to-all", "Rétablit la confirmation des commandes"),
        ("email <to> <sujet> <corps>", "Envoie un email (sujet entre guillemets possible)"),
        ("memory", "Affiche l'état de la mémoire à long terme"),
        ("recall <requête>", "Cherche dans la mémoire à long terme"),
        ("remember <texte>", "Mémorise une information"),
        ("<tâche>", "Exécute une tâche (ex: coder, chercher, etc.)"),
    ];

    println!("\n{}", "Commandes disponibles :".yellow().bold());
    for (command, description) in entries {
        println!("  {:<28} - {}", command.green(), description);
    }
    println!();
}

pub fn print_success(message: &str) {
    println!("\n{} {}\n", "✅".green(), message);
}

pub fn print_error(message: &str) {
    println!("\n{} {}\n", "❌".red(), message.red());
}

pub fn print_notice(message: &str) {
    println!("\n{}\n", message.yellow());
}

/// Prints a model reply, rendered as terminal markdown
pub fn print_reply(reply: &str) {
    println!("\n{}\n", render_markdown(reply).trim_end());
}

pub fn spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner} {msg}")
    {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}

/// Render markdown for the terminal, highlighting fenced code
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let syntax_set = SyntaxSet::load_defaults_newlines();
    let theme_set = ThemeSet::load_defaults();
    let theme = theme_set.themes.get(CODE_THEME);

    let mut output = String::new();
    let mut code: Option<(String, String)> = None;
    let mut list_depth = 0usize;

    for event in MdParser::new_ext(markdown, options) {
        match event {
            MdEvent::Start(Tag::Heading(level, ..)) => {
                let marker = match level {
                    HeadingLevel::H1 => "#",
                    HeadingLevel::H2 => "##",
                    _ => "###",
                };
                output.push_str(&format!("\n{} ", marker.bright_cyan().bold()));
            }
            MdEvent::End(Tag::Heading(..)) => output.push('\n'),
            MdEvent::Start(Tag::Paragraph) => {
                if !output.is_empty() && !output.ends_with('\n') {
                    output.push('\n');
                }
            }
            MdEvent::End(Tag::Paragraph) => output.push('\n'),
            MdEvent::Start(Tag::CodeBlock(kind)) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().unwrap_or_default().to_string()
                    }
                    CodeBlockKind::Indented => String::new(),
                };
                code = Some((lang, String::new()));
            }
            MdEvent::End(Tag::CodeBlock(_)) => {
                if let Some((lang, body)) = code.take() {
                    output.push('\n');
                    if !lang.is_empty() {
                        output.push_str(&format!("{}:\n", lang.cyan()));
                    }
                    output.push_str(&"─".repeat(40).dimmed().to_string());
                    output.push('\n');

                    match theme {
                        Some(theme) => {
                            let syntax = syntax_set
                                .find_syntax_by_token(&lang)
                                .unwrap_or_else(|| syntax_set.find_syntax_plain_text());
                            let mut highlighter = HighlightLines::new(syntax, theme);
                            for line in LinesWithEndings::from(&body) {
                                let ranges = highlighter
                                    .highlight_line(line, &syntax_set)
                                    .unwrap_or_default();
                                output.push_str(&as_24_bit_terminal_escaped(&ranges, false));
                            }
                            output.push_str("\x1b[0m");
                        }
                        None => output.push_str(&body),
                    }

                    if !output.ends_with('\n') {
                        output.push('\n');
                    }
                    output.push_str(&"─".repeat(40).dimmed().to_string());
                    output.push('\n');
                }
            }
            MdEvent::Start(Tag::List(_)) => {
                if list_depth == 0 && !output.is_empty() && !output.ends_with('\n') {
                    output.push('\n');
                }
                list_depth += 1;
            }
            MdEvent::End(Tag::List(_)) => list_depth = list_depth.saturating_sub(1),
            MdEvent::Start(Tag::Item) => {
                if !output.is_empty() && !output.ends_with('\n') {
                    output.push('\n');
                }
                let indent = "  ".repeat(list_depth.saturating_sub(1));
                output.push_str(&format!("{}{}  ", indent, "•".yellow()));
            }
            MdEvent::End(Tag::Item) => {
                if !output.ends_with('\n') {
                    output.push('\n');
                }
            }
            MdEvent::Code(text) => {
                output.push_str(&text.on_bright_black().white().to_string());
            }
            MdEvent::Text(text) => match code.as_mut() {
                Some((_, body)) => body.push_str(&text),
                None => output.push_str(&text),
            },
            MdEvent::TaskListMarker(done) => {
                output.push_str(if done { "[x] " } else { "[ ] " });
            }
            MdEvent::SoftBreak => output.push(' '),
            MdEvent::HardBreak => output.push('\n'),
            MdEvent::Html(html) => output.push_str(&html),
            MdEvent::Rule => {
                output.push_str(&"─".repeat(40).dimmed().to_string());
                output.push('\n');
            }
            _ => {}
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_survives_rendering() {
        colored::control::set_override(false);
        let rendered = render_markdown("Bonjour **monde**");
        assert!(rendered.contains("Bonjour monde"));
    }

    #[test]
    fn list_items_get_bullets() {
        colored::control::set_override(false);
        let rendered = render_markdown("- un\n- deux\n");
        assert!(rendered.contains("•  un\n"));
        assert!(rendered.contains("•  deux\n"));
    }

    #[test]
    fn code_block_is_framed_with_its_language() {
        colored::control::set_override(false);
        let rendered = render_markdown("```bash\nls -la\n```\n");
        assert!(rendered.contains("bash:\n"));
        assert_eq!(rendered.matches(&"─".repeat(40)).count(), 2);
    }
}
