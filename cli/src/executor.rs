use anyhow::Result;
use colored::*;
use log::{info, warn};
use std::process::Command;

use crate::console::Console;

/// Substrings that mark a command as needing root.
const PRIVILEGE_MARKERS: [&str; 5] = ["sudo", "/etc/", "apt", "yum", "systemctl"];

pub fn needs_privilege(command: &str) -> bool {
    let lower = command.to_lowercase();
    PRIVILEGE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Program and arguments a confirmed command is launched with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: &'static str,
    pub args: Vec<String>,
}

impl Invocation {
    /// Elevated commands go through `sudo -S` so the password prompt reads
    /// from the terminal; inline `sudo ` prefixes are dropped.
    pub fn plan(command: &str, elevated: bool) -> Self {
        if elevated {
            Self {
                program: "sudo",
                args: vec![
                    "-S".to_string(),
                    "sh".to_string(),
                    "-c".to_string(),
                    command.replace("sudo ", ""),
                ],
            }
        } else {
            Self {
                program: "sh",
                args: vec!["-c".to_string(), command.to_string()],
            }
        }
    }

    pub fn script(&self) -> &str {
        self.args.last().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Cancelled,
    Failed(String),
}

/// Asks for confirmation (twice for privileged commands) and runs `command`
/// with the terminal's streams. Only a closed input is an error.
pub fn confirm_and_run(console: &mut Console, command: &str) -> Result<Outcome> {
    println!("\nJe m'apprête à exécuter la commande suivante :");
    println!("{} {}", "$".bold(), command.bright_white());
    if !console.confirm("Voulez-vous que je l'exécute ?")? {
        return Ok(Outcome::Cancelled);
    }

    let elevated = needs_privilege(command);
    if elevated {
        println!(
            "\n{}",
            "⚠️  Cette commande nécessite des privilèges administrateur (sudo).".yellow()
        );
        if !console.confirm("Confirmer l'exécution avec sudo ?")? {
            return Ok(Outcome::Cancelled);
        }
    }

    let invocation = Invocation::plan(command, elevated);
    if elevated {
        println!("🔐 Exécution avec sudo -S : {}", invocation.script());
    } else {
        println!("➡️  Exécution : {}", invocation.script());
    }

    Ok(run(&invocation))
}

fn run(invocation: &Invocation) -> Outcome {
    info!("Running {} {:?}", invocation.program, invocation.args);

    match Command::new(invocation.program)
        .args(&invocation.args)
        .status()
    {
        Ok(status) if status.success() => Outcome::Succeeded,
        Ok(status) => {
            warn!("Command exited with {}", status);
            Outcome::Failed(format!("la commande s'est terminée avec le statut {}", status))
        }
        Err(e) => {
            warn!("Failed to launch {}: {}", invocation.program, e);
            Outcome::Failed(format!("impossible de lancer {} : {}", invocation.program, e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn privilege_markers() {
        assert!(needs_privilege("sudo reboot"));
        assert!(needs_privilege("cat /etc/hosts"));
        assert!(needs_privilege("APT install curl"));
        assert!(needs_privilege("systemctl restart nginx"));
        assert!(!needs_privilege("ls -la ~"));
    }

    #[test]
    fn plain_commands_run_through_sh() {
        let plan = Invocation::plan("ls -la", false);
        assert_eq!(plan.program, "sh");
        assert_eq!(plan.args, vec!["-c", "ls -la"]);
    }

    #[test]
    fn elevated_commands_drop_inline_sudo() {
        let plan = Invocation::plan("sudo apt update && sudo apt upgrade", true);
        assert_eq!(plan.program, "sudo");
        assert_eq!(plan.args, vec!["-S", "sh", "-c", "apt update && apt upgrade"]);
        assert_eq!(plan.script(), "apt update && apt upgrade");
    }

    #[test]
    fn refusal_cancels_without_running() {
        let mut console = Console::from_reader(Cursor::new("non\n"));
        let outcome = confirm_and_run(&mut console, "touch /tmp/never-created").unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
    }

    #[test]
    fn privileged_command_needs_second_yes() {
        let mut console = Console::from_reader(Cursor::new("oui\nnon\n"));
        let outcome = confirm_and_run(&mut console, "systemctl restart nginx").unwrap();
        assert_eq!(outcome, Outcome::Cancelled);
    }

    #[test]
    fn closed_input_is_an_error() {
        let mut console = Console::from_reader(Cursor::new(""));
        assert!(confirm_and_run(&mut console, "ls").is_err());
    }

    #[test]
    fn confirmed_command_reports_exit_status() {
        let mut console = Console::from_reader(Cursor::new("\n\n"));
        assert_eq!(confirm_and_run(&mut console, "true").unwrap(), Outcome::Succeeded);
        assert!(matches!(
            confirm_and_run(&mut console, "exit 3").unwrap(),
            Outcome::Failed(_)
        ));
    }
}
