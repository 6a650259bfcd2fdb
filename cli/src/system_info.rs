use log::{debug, warn};
use std::fs;
use std::process::Command;

const OS_RELEASE: &str = "/etc/os-release";

/// Host facts shown at startup and given to the model as context
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemInfo {
    pub os_name: String,
    pub os_version: String,
    pub os_id: String,
    pub os_build: String,
    pub kernel_version: String,
    pub architecture: String,
}

impl SystemInfo {
    /// Reads `/etc/os-release` and `uname -srm`. Either source may be
    /// missing; the matching fields then stay empty.
    pub fn detect() -> Self {
        let mut info = match fs::read_to_string(OS_RELEASE) {
            Ok(content) => parse_os_release(&content),
            Err(e) => {
                warn!("Cannot read {}: {}", OS_RELEASE, e);
                SystemInfo::default()
            }
        };

        match Command::new("uname").arg("-srm").output() {
            Ok(output) if output.status.success() => {
                let text = String::from_utf8_lossy(&output.stdout);
                if let Some((kernel, arch)) = parse_uname(&text) {
                    info.kernel_version = kernel;
                    info.architecture = arch;
                }
            }
            Ok(output) => warn!("uname exited with {}", output.status),
            Err(e) => warn!("Cannot run uname: {}", e),
        }

        debug!("Detected system: {:?}", info);
        info
    }

    /// Context appended to the seed system message
    pub fn describe(&self) -> String {
        format!(
            "Contexte système:\n  - Distribution: {} (ID: {})\n  - Version: {}\n  - Build: {}\n  - Kernel: {}\n  - Architecture: {}\n",
            self.os_name,
            self.os_id,
            self.os_version,
            self.os_build,
            self.kernel_version,
            self.architecture
        )
    }
}

pub fn parse_os_release(content: &str) -> SystemInfo {
    let mut info = SystemInfo::default();
    for line in content.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim().trim_matches('"').to_string();
        match key.trim() {
            "NAME" => info.os_name = value,
            "VERSION" => info.os_version = value,
            "ID" => info.os_id = value,
            "BUILD_ID" => info.os_build = value,
            _ => {}
        }
    }
    info
}

/// `uname -srm` prints `<kernel name> <release> <machine>`.
fn parse_uname(output: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = output.split_whitespace().collect();
    match parts.as_slice() {
        [name, release, machine, ..] => Some((format!("{} {}", name, release), machine.to_string())),
        _ => None,
    }
}

/// Seed system message for a new transcript
pub fn system_prompt(info: &SystemInfo) -> String {
    format!(
        "Vous êtes un agent AI puissant qui aide l'utilisateur à accomplir ses tâches. \
         Répondez de manière concise et directe. Utilisez des listes à puces pour les étapes. \
         Si la tâche nécessite des commandes shell, ajoutez un bloc de code avec la commande à exécuter. \
         Pour les opérations sur le système de fichiers, fournissez les commandes appropriées. \
         Vous allez générer des commandes qui seront exécutées par l'agent.\n\n\
         {}\
         Utilisez cette information pour adapter les commandes système en conséquence.",
        info.describe()
    )
}
