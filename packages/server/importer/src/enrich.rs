use crate::Importer;
use anyhow::{Context, Result};
use database::models::ToolDraft;
use shared::dto::ToolPayload;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Partial updates keyed by the exact tool name they apply to.
pub type Enrichment = BTreeMap<String, ToolPayload>;

pub fn parse_enrichment(text: &str) -> Result<Enrichment> {
    serde_json::from_str(text).context("Enrichment file must be a JSON object keyed by tool name")
}

impl Importer {
    pub async fn enrich_from_path(&self, path: &Path) -> Result<usize> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read enrichment file {}", path.display()))?;
        let entries = parse_enrichment(&text)?;
        self.enrich(&entries).await
    }

    /// Applies each entry to the tool with the same name and returns how many
    /// were applied. Unknown names, blank required fields and rejected
    /// updates are logged and skipped.
    pub async fn enrich(&self, entries: &Enrichment) -> Result<usize> {
        let repo = self.db.tools();
        let mut applied = 0;

        for (name, payload) in entries {
            let Some(tool) = repo.find_by_name(name).await? else {
                warn!("No tool named '{}', skipping enrichment", name);
                continue;
            };

            let draft = match ToolDraft::from_payload(payload) {
                Ok(draft) => draft,
                Err(e) => {
                    warn!("Skipping enrichment for {}: {}", name, e);
                    continue;
                }
            };

            match repo.update(tool.id, &draft).await {
                Ok(_) => {
                    info!("Enhanced data for {}", name);
                    applied += 1;
                }
                Err(e) => warn!("Failed to enrich {}: {}", name, e),
            }
        }

        Ok(applied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::Database;

    async fn seeded() -> (Importer, std::sync::Arc<Database>) {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();
        let draft = ToolDraft {
            name: Some("Cody".into()),
            category: Some("AI Assistant".into()),
            frameworks: Some(vec!["React".into()]),
            maturity_score: Some(Some(5)),
            ..Default::default()
        };
        db.tools().create(&draft).await.unwrap();
        (Importer::new(db.clone()), db)
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(parse_enrichment("[1, 2]").is_err());
        assert!(parse_enrichment("{}").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_enrich_updates_only_named_fields() {
        let (importer, db) = seeded().await;
        let entries = parse_enrichment(
            r#"{
                "Cody": {
                    "maturity_score": 9,
                    "notableStrengths": "Context, Speed",
                    "url": "https://sourcegraph.com/cody"
                },
                "Nobody": { "pricing": "Free" }
            }"#,
        )
        .unwrap();

        let applied = importer.enrich(&entries).await.unwrap();
        assert_eq!(applied, 1);

        let cody = db.tools().find_by_name("Cody").await.unwrap().unwrap();
        assert_eq!(cody.maturity_score, Some(9));
        assert_eq!(cody.notable_strengths, vec!["Context", "Speed"]);
        assert_eq!(cody.url.as_deref(), Some("https://sourcegraph.com/cody"));
        assert_eq!(cody.frameworks, vec!["React"]);
        assert_eq!(cody.category, "AI Assistant");
    }

    #[tokio::test]
    async fn test_rejected_entry_does_not_stop_the_rest() {
        let (importer, db) = seeded().await;
        for name in ["Cursor", "Devin"] {
            let draft = ToolDraft {
                name: Some(name.into()),
                category: Some("AI".into()),
                ..Default::default()
            };
            db.tools().create(&draft).await.unwrap();
        }
        let entries = parse_enrichment(
            r#"{
                "Cody": { "name": "Devin" },
                "Cursor": { "pricing": "Free" }
            }"#,
        )
        .unwrap();

        assert_eq!(importer.enrich(&entries).await.unwrap(), 1);

        let repo = db.tools();
        assert!(repo.find_by_name("Cody").await.unwrap().is_some());
        let cursor = repo.find_by_name("Cursor").await.unwrap().unwrap();
        assert_eq!(cursor.pricing.as_deref(), Some("Free"));
    }

    #[tokio::test]
    async fn test_blank_name_entry_is_skipped() {
        let (importer, db) = seeded().await;
        let entries = parse_enrichment(r#"{ "Cody": { "name": "  " } }"#).unwrap();

        assert_eq!(importer.enrich(&entries).await.unwrap(), 0);
        assert!(db.tools().find_by_name("Cody").await.unwrap().is_some());
    }
}
