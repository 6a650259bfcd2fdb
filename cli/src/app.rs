use anyhow::Result;
use colored::*;
use log::{debug, info, warn};
use std::time::Duration;
use tokio::time::timeout;

use asione_core::{AgentConfig, ApiConfig, ChatClient, Message};
use asione_memory::{KnowledgeIntegrator, format_knowledge_response};
use asione_search::{WebSearcher, format_search_results};

use crate::commands::{
    Command, Route, extract_search_query, mask_secret, parse_email_args, route_task,
};
use crate::console::Console;
use crate::email::send_email;
use crate::executor::{Outcome, confirm_and_run};
use crate::extract::extract_command;
use crate::output::{
    print_error, print_help, print_notice, print_reply, print_success, spinner,
};
use crate::system_info::{SystemInfo, system_prompt};
use crate::transcript::Transcript;

const PROMPT: &str = "ASI-agent> ";
const CHAT_DEADLINE: Duration = Duration::from_secs(60);
const SEARCH_DEADLINE: Duration = Duration::from_secs(30);

const AUTO_CONFIRM_ON: &str = "L'utilisateur a activé le mode 'oui à tout'. Les commandes critiques doivent être exécutées sans confirmation.";
const AUTO_CONFIRM_OFF: &str = "Le mode 'oui à tout' a été désactivé. Toutes les commandes doivent être confirmées manuellement.";
const MISSING_API_KEY: &str =
    "Clé API non configurée. Veuillez configurer votre clé API avec 'set-api-key'.";
const MISSING_SEARCH_KEY: &str = "Clé API de recherche non configurée. Ajoutez SEARCH_API_KEY à votre fichier .env puis relancez l'agent.";
const MEMORY_UNAVAILABLE: &str = "La fonctionnalité de mémoire à long terme n'est pas disponible.";

/// Whether the loop keeps reading after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The interactive agent: owns the configuration, the clients, the
/// transcript and the console it reads from.
pub struct Agent {
    config: AgentConfig,
    chat: ChatClient,
    searcher: WebSearcher,
    knowledge: Option<KnowledgeIntegrator>,
    transcript: Transcript,
    console: Console,
    chat_deadline: Duration,
    search_deadline: Duration,
}

impl Agent {
    pub fn new(
        config: AgentConfig,
        knowledge: Option<KnowledgeIntegrator>,
        system: &SystemInfo,
        console: Console,
    ) -> Self {
        let chat = ChatClient::new(config.api.clone()).with_max_tokens(config.max_tokens);
        let searcher =
            WebSearcher::new(config.search.api_key.clone(), config.search.engine.clone());
        let transcript = Transcript::new(
            Message::system(system_prompt(system)),
            config.max_history_messages,
        );

        Self {
            config,
            chat,
            searcher,
            knowledge,
            transcript,
            console,
            chat_deadline: CHAT_DEADLINE,
            search_deadline: SEARCH_DEADLINE,
        }
    }

    #[cfg(test)]
    fn with_deadlines(mut self, chat: Duration, search: Duration) -> Self {
        self.chat_deadline = chat;
        self.search_deadline = search;
        self
    }

    #[cfg(test)]
    fn with_searcher(mut self, searcher: WebSearcher) -> Self {
        self.searcher = searcher;
        self
    }

    /// Reads and handles lines until `exit`/`quit` or the end of input.
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let Some(line) = self.console.read_line(PROMPT)? else {
                info!("Input closed, leaving");
                println!();
                break;
            };

            let input = line.trim();
            if input.is_empty() {
                continue;
            }

            match self.handle(input).await {
                Ok(Flow::Exit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => print_error(&format!("{:#}", e)),
            }
        }
        Ok(())
    }

    pub async fn handle(&mut self, input: &str) -> Result<Flow> {
        debug!("Handling input: {}", input);

        match Command::parse(input) {
            Command::Help => print_help(),
            Command::Exit => {
                println!("Arrêt de ASIONE Agent...");
                return Ok(Flow::Exit);
            }
            Command::Config => self.show_config(),
            Command::YesToAll => {
                self.set_auto_confirm(true);
                print_success("Confirmation automatique activée. Toutes les commandes seront exécutées sans confirmation.");
            }
            Command::NoToAll => {
                self.set_auto_confirm(false);
                print_success("Confirmation automatique désactivée. Toutes les commandes doivent être confirmées manuellement.");
            }
            Command::Email(args) => {
                let email = parse_email_args(args)?;
                println!("\nEnvoi de l'email à {}...", email.to);
                send_email(&self.config.smtp, &email).await?;
                print_success(&format!("Email envoyé avec succès à {}", email.to));
            }
            Command::SetApiKey(key) => {
                if key.is_empty() {
                    print_error("Clé API invalide");
                } else {
                    self.update_api(|api| api.api_key = key.to_string());
                    print_success("Clé API définie avec succès");
                }
            }
            Command::SetBaseUrl(url) => {
                if url.is_empty() {
                    print_error("URL invalide");
                } else {
                    self.update_api(|api| api.base_url = url.to_string());
                    print_success("URL de base définie avec succès");
                }
            }
            Command::SetModel(model) => {
                if model.is_empty() {
                    print_error("Modèle invalide");
                } else {
                    self.update_api(|api| api.model = model.to_string());
                    print_success("Modèle défini avec succès");
                }
            }
            Command::Models => self.list_models().await,
            Command::Memory => self.show_memory(),
            Command::Recall(query) => self.recall(query),
            Command::Remember(text) => self.remember(text),
            Command::Task(task) => self.process_task(task).await?,
        }

        Ok(Flow::Continue)
    }

    fn show_config(&self) {
        let api = &self.config.api;
        println!("\n{}", "Configuration actuelle :".bold());
        println!("  Base URL: {}", api.base_url);
        println!("  API Key: {}", mask_secret(&api.api_key));
        println!("  Model: {}", api.model);
        println!(
            "  Oui à tout: {}",
            if self.console.auto_confirm() { "activé" } else { "désactivé" }
        );
        println!();
    }

    fn set_auto_confirm(&mut self, enabled: bool) {
        let advisory = if enabled { AUTO_CONFIRM_ON } else { AUTO_CONFIRM_OFF };
        self.transcript.push(Message::system(advisory));
        self.console.set_auto_confirm(enabled);
    }

    fn update_api(&mut self, change: impl FnOnce(&mut ApiConfig)) {
        change(&mut self.config.api);
        self.chat.set_credentials(self.config.api.clone());
        info!(
            "Chat endpoint now {} with model {}",
            self.config.api.base_url, self.config.api.model
        );
    }

    async fn list_models(&self) {
        let progress = spinner("Récupération des modèles...");
        let result = timeout(self.chat_deadline, self.chat.list_models()).await;
        progress.finish_and_clear();

        match result {
            Ok(Ok(models)) if models.data.is_empty() => {
                print_notice("Le fournisseur n'a renvoyé aucun modèle.")
            }
            Ok(Ok(models)) => {
                println!("\n{}", "Modèles disponibles :".bold());
                for model in &models.data {
                    let marker = if model.id == self.config.api.model { "*" } else { " " };
                    if model.owned_by.is_empty() {
                        println!(" {} {}", marker.green(), model.id);
                    } else {
                        println!(" {} {} ({})", marker.green(), model.id, model.owned_by.dimmed());
                    }
                }
                println!();
            }
            Ok(Err(e)) => print_error(&format!("Erreur lors de l'appel API: {}", e)),
            Err(_) => print_error(&deadline_message(self.chat_deadline)),
        }
    }

    fn show_memory(&self) {
        let Some(knowledge) = &self.knowledge else {
            print_notice(MEMORY_UNAVAILABLE);
            return;
        };

        let store = knowledge.knowledge_base();
        let stats = store.stats();
        println!("\n{}", "État de la mémoire à long terme :".bold());
        println!("  Fichier : {}", store.file_path().display());
        println!("  Nombre d'entrées : {}", stats.entries);
        if let (Some(first), Some(last)) = (stats.first, stats.last) {
            println!("  Première interaction : {}", first.format("%Y-%m-%d"));
            println!("  Dernière interaction : {}", last.format("%Y-%m-%d"));
        }
        println!();
    }

    fn recall(&self, query: &str) {
        match &self.knowledge {
            Some(knowledge) => {
                let entries = knowledge.search_knowledge(query);
                println!("\n{}\n", format_knowledge_response(&entries).trim_end());
            }
            None => print_notice(MEMORY_UNAVAILABLE),
        }
    }

    fn remember(&self, text: &str) {
        let Some(knowledge) = &self.knowledge else {
            print_notice(MEMORY_UNAVAILABLE);
            return;
        };

        match knowledge.remember_manual(text) {
            Ok(keywords) => print_success(&format!(
                "Information mémorisée avec les mots-clés : {}",
                keywords.join(", ")
            )),
            Err(e) => print_error(&format!("Impossible de mémoriser l'information: {}", e)),
        }
    }

    async fn process_task(&mut self, task: &str) -> Result<()> {
        match route_task(task, self.config.api.has_api_key()) {
            Route::Search => self.search_then_complete(task).await,
            Route::Ai => self.complete_task(task).await,
        }
    }

    async fn complete_task(&mut self, task: &str) -> Result<()> {
        if !self.config.api.has_api_key() {
            print_error(MISSING_API_KEY);
            return Ok(());
        }

        println!("\n{} Analyse et exécution de la tâche...", "[AI]".magenta().bold());
        self.transcript.push(Message::user(task));

        match self.ask_model().await {
            Ok(Ok(reply)) => {
                self.learn(task, &reply);
                self.handle_reply(reply)
            }
            Ok(Err(e)) if e.is_overloaded() => {
                warn!("Chat endpoint overloaded: {}", e);
                print_notice("Le service d'IA est temporairement surchargé. Tentative de récupération avec recherche...");
                self.search_then_complete(task).await
            }
            Ok(Err(e)) => {
                print_error(&format!("Erreur lors de l'appel API: {}", e));
                Ok(())
            }
            Err(_) => {
                print_error(&deadline_message(self.chat_deadline));
                Ok(())
            }
        }
    }

    async fn search_then_complete(&mut self, task: &str) -> Result<()> {
        let query = extract_search_query(task);
        println!("\n{} Recherche sur Internet pour: {}", "[WEB]".blue().bold(), query);

        let progress = spinner("Recherche en cours...");
        let result = timeout(self.search_deadline, self.searcher.search(&query)).await;
        progress.finish_and_clear();

        let results = match result {
            Ok(Ok(results)) => results,
            Ok(Err(e)) if e.is_config() => {
                print_error(MISSING_SEARCH_KEY);
                return Ok(());
            }
            Ok(Err(e)) => {
                print_error(&format!("Erreur lors de la recherche: {}", e));
                return Ok(());
            }
            Err(_) => {
                print_error(&deadline_message(self.search_deadline));
                return Ok(());
            }
        };

        let formatted = format_search_results(&results);
        println!("\n{}", formatted);

        if self
            .console
            .confirm("Voulez-vous utiliser ces informations pour compléter votre tâche ?")?
        {
            self.complete_with_results(task, &formatted).await?;
        }
        Ok(())
    }

    async fn complete_with_results(&mut self, task: &str, results: &str) -> Result<()> {
        if !self.config.api.has_api_key() {
            print_error(MISSING_API_KEY);
            return Ok(());
        }

        println!(
            "\n{} Analyse des résultats de recherche et exécution de la tâche...",
            "[AI]".magenta().bold()
        );
        self.transcript.push(Message::user(format!(
            "Tâche: {}\n\nRésultats de recherche:\n{}",
            task, results
        )));

        match self.ask_model().await {
            Ok(Ok(reply)) => {
                self.learn(task, &reply);
                self.handle_reply(reply)
            }
            Ok(Err(e)) => {
                print_error(&format!("Erreur lors de l'appel API: {}", e));
                Ok(())
            }
            Err(_) => {
                print_error(&deadline_message(self.chat_deadline));
                Ok(())
            }
        }
    }

    async fn ask_model(
        &self,
    ) -> Result<asione_core::ChatResult<String>, tokio::time::error::Elapsed> {
        debug!("Sending {} messages to {}", self.transcript.len(), self.config.api.model);
        let progress = spinner("Réflexion en cours...");
        let result = timeout(self.chat_deadline, self.chat.complete(self.transcript.messages())).await;
        progress.finish_and_clear();
        result
    }

    fn learn(&self, task: &str, reply: &str) {
        let Some(knowledge) = &self.knowledge else {
            return;
        };
        match knowledge.learn_from_interaction(task, reply) {
            Ok(keywords) => debug!("Interaction stored under {:?}", keywords),
            Err(e) => warn!("Failed to record interaction: {}", e),
        }
    }

    /// Records and prints the reply, then offers to run its command.
    fn handle_reply(&mut self, reply: String) -> Result<()> {
        print_reply(&reply);
        let command = extract_command(&reply);
        self.transcript.push(Message::assistant(reply));

        let Some(command) = command else {
            return Ok(());
        };

        match confirm_and_run(&mut self.console, &command)? {
            Outcome::Succeeded => print_success("Commande exécutée avec succès."),
            Outcome::Cancelled => {
                print_notice("Exécution de la commande annulée par l'utilisateur.")
            }
            Outcome::Failed(reason) => print_error(&format!(
                "Erreur lors de l'exécution de la commande: {}",
                reason
            )),
        }
        Ok(())
    }
}

fn deadline_message(deadline: Duration) -> String {
    format!(
        "Délai dépassé: aucune réponse après {:.1} secondes",
        deadline.as_secs_f64()
    )
}
