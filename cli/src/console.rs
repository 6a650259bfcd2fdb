use anyhow::{Context, Result, bail};
use colored::*;
use std::io::{self, BufRead, Write};

/// Accepts the answers treated as "yes"; an empty line counts as yes
pub fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "" | "oui" | "o" | "yes" | "y"
    )
}

/// Line-oriented interactive input shared by the command loop and prompts
pub struct Console {
    input: Box<dyn BufRead>,
    auto_confirm: bool,
}

impl Console {
    pub fn stdin() -> Self {
        Self::from_reader(io::stdin().lock())
    }

    pub fn from_reader(reader: impl BufRead + 'static) -> Self {
        Self {
            input: Box::new(reader),
            auto_confirm: false,
        }
    }

    pub fn auto_confirm(&self) -> bool {
        self.auto_confirm
    }

    pub fn set_auto_confirm(&mut self, enabled: bool) {
        self.auto_confirm = enabled;
    }

    /// Prints `prompt` and reads one line without its line ending.
    /// Returns `None` once the input is exhausted.
    pub fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        print!("{}", prompt);
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Failed to read input")?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    /// Asks a yes/no question, defaulting to yes on an empty answer.
    ///
    /// With auto-confirm enabled the question is answered without reading.
    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        if self.auto_confirm {
            println!("{} {}", question, "(oui à tout)".green());
            return Ok(true);
        }

        let prompt = format!("{} (oui/non) [ENTRÉE pour 'oui'] ", question);
        let Some(answer) = self.read_line(&prompt)? else {
            bail!("lecture de l'entrée utilisateur interrompue");
        };

        if answer.trim().is_empty() {
            println!("{}", "✅ (confirmation par défaut)".green());
        }
        Ok(is_affirmative(&answer))
    }
}
