use chrono::Utc;
use log::debug;
use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;

use crate::entry::KnowledgeEntry;
use crate::errors::KnowledgeResult;
use crate::keywords::extract_keywords;
use crate::store::KnowledgeBase;

pub const NOTHING_FOUND: &str =
    "Je ne trouve pas d'informations pertinentes dans ma mémoire à long terme.";

const MAX_FORMATTED_ENTRIES: usize = 5;

/// Thin façade over the knowledge base used by the agent
#[derive(Debug, Clone)]
pub struct KnowledgeIntegrator {
    knowledge_base: Arc<KnowledgeBase>,
}

impl KnowledgeIntegrator {
    pub fn new(knowledge_base: Arc<KnowledgeBase>) -> Self {
        Self { knowledge_base }
    }

    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.knowledge_base
    }

    pub fn remember(
        &self,
        category: &str,
        key: &str,
        value: &str,
        metadata: Option<HashMap<String, String>>,
    ) -> KnowledgeResult<KnowledgeEntry> {
        self.knowledge_base.add(category, key, value, metadata)
    }

    pub fn recall(&self, key: &str) -> Vec<KnowledgeEntry> {
        self.knowledge_base.get_by_key(key)
    }

    pub fn recall_by_category(&self, category: &str) -> Vec<KnowledgeEntry> {
        self.knowledge_base.get_by_category(category)
    }

    /// Stores the AI response once per keyword of the exchange.
    /// Returns the keywords used.
    pub fn learn_from_interaction(
        &self,
        user_input: &str,
        ai_response: &str,
    ) -> KnowledgeResult<Vec<String>> {
        let metadata = HashMap::from([
            ("input".to_string(), user_input.to_string()),
            ("source".to_string(), "interaction".to_string()),
        ]);

        let keywords = extract_keywords(&format!("{} {}", user_input, ai_response));
        for keyword in &keywords {
            self.knowledge_base
                .add("interaction", keyword, ai_response, Some(metadata.clone()))?;
        }
        debug!("Recorded interaction under {} keywords", keywords.len());
        Ok(keywords)
    }

    /// Stores user-provided content once per keyword of its description
    pub fn remember_manual(&self, content: &str) -> KnowledgeResult<Vec<String>> {
        let metadata = HashMap::from([
            ("source".to_string(), "manual".to_string()),
            ("timestamp".to_string(), Utc::now().to_rfc3339()),
        ]);

        let description = format!("Information mémorisée manuellement : {}", content);
        let keywords = extract_keywords(&description);
        for keyword in &keywords {
            self.remember("manual", keyword, content, Some(metadata.clone()))?;
        }
        Ok(keywords)
    }

    /// Case-insensitive substring match against every entry's key and value
    pub fn search_knowledge(&self, query: &str) -> Vec<KnowledgeEntry> {
        let query = query.to_lowercase();
        self.knowledge_base
            .get_all()
            .into_iter()
            .filter(|entry| {
                entry.value.to_lowercase().contains(&query)
                    || entry.key.to_lowercase().contains(&query)
            })
            .collect()
    }
}

/// Renders up to five entries as numbered blocks
pub fn format_knowledge_response(entries: &[KnowledgeEntry]) -> String {
    if entries.is_empty() {
        return NOTHING_FOUND.to_string();
    }

    let mut out = String::from("Informations trouvées dans ma mémoire à long terme :\n\n");
    for (i, entry) in entries.iter().take(MAX_FORMATTED_ENTRIES).enumerate() {
        let _ = writeln!(out, "{}. {} : {}", i + 1, entry.key, entry.value);
        if !entry.category.is_empty() {
            let _ = writeln!(out, "   Catégorie: {}", entry.category);
        }
        if let Some(metadata) = &entry.metadata {
            let mut pairs: Vec<_> = metadata.iter().collect();
            pairs.sort();
            for (k, v) in pairs {
                let _ = writeln!(out, "   {}: {}", k, v);
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::{tempdir, TempDir};

    fn integrator() -> (TempDir, KnowledgeIntegrator) {
        let dir = tempdir().unwrap();
        let store = KnowledgeBase::open(dir.path().join("kb.json")).unwrap();
        (dir, KnowledgeIntegrator::new(Arc::new(store)))
    }

    #[test]
    fn learn_stores_response_once_per_keyword() {
        let (_dir, ki) = integrator();
        let keywords = ki
            .learn_from_interaction("installer nginx", "Utilisez apt install nginx")
            .unwrap();
        assert_eq!(keywords, vec!["installer", "nginx", "utilisez", "install"]);

        let entries = ki.recall_by_category("interaction");
        assert_eq!(entries.len(), 4);
        for entry in &entries {
            assert_eq!(entry.value, "Utilisez apt install nginx");
            let metadata = entry.metadata.as_ref().unwrap();
            assert_eq!(metadata["input"], "installer nginx");
            assert_eq!(metadata["source"], "interaction");
        }
        assert_eq!(ki.recall("nginx").len(), 1);
    }

    #[test]
    fn search_matches_key_or_value_case_insensitively() {
        let (_dir, ki) = integrator();
        ki.remember("manual", "serveur", "Nginx tourne sur le port 8080", None)
            .unwrap();
        ki.remember("manual", "BaseDeDonnees", "postgres", None).unwrap();
        ki.remember("manual", "autre", "rien", None).unwrap();

        assert_eq!(ki.search_knowledge("NGINX").len(), 1);
        assert_eq!(ki.search_knowledge("basededonnees").len(), 1);
        assert_eq!(ki.search_knowledge("r").len(), 3);
        assert!(ki.search_knowledge("absent").is_empty());
    }

    #[test]
    fn manual_memory_uses_description_keywords() {
        let (_dir, ki) = integrator();
        let keywords = ki.remember_manual("mot de passe wifi: hunter22").unwrap();
        assert_eq!(
            keywords,
            vec!["information", "mémorisée", "manuellement", "passe", "wifi", "hunter22"]
        );
        let entries = ki.recall_by_category("manual");
        assert_eq!(entries.len(), keywords.len());
        assert!(entries.iter().all(|e| e.value == "mot de passe wifi: hunter22"));
    }

    #[test]
    fn format_empty_and_capped() {
        assert_eq!(format_knowledge_response(&[]), NOTHING_FOUND);

        let entries: Vec<_> = (1..=7)
            .map(|n| KnowledgeEntry::new("manual", format!("cle{n}"), format!("valeur{n}"), None))
            .collect();
        let text = format_knowledge_response(&entries);
        assert!(text.contains("1. cle1 : valeur1\n   Catégorie: manual\n"));
        assert!(text.contains("5. cle5"));
        assert!(!text.contains("cle6"));
    }

    #[test]
    fn format_lists_metadata_sorted() {
        let metadata = HashMap::from([
            ("source".to_string(), "manual".to_string()),
            ("input".to_string(), "bonjour".to_string()),
        ]);
        let entry = KnowledgeEntry::new("interaction", "bonjour", "salut", Some(metadata));
        let text = format_knowledge_response(&[entry]);
        assert!(text.contains("   input: bonjour\n   source: manual\n"));
    }
}
