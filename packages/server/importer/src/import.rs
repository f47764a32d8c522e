use crate::columns::{Column, ColumnMap};
use crate::Importer;
use anyhow::{bail, Context, Result};
use database::models::ToolDraft;
use database::repositories::tool_repo;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Rows that survived parsing, keyed by their line in the source file.
#[derive(Debug, Default)]
pub struct ParsedRows {
    pub drafts: Vec<(usize, ToolDraft)>,
    pub skipped: usize,
}

/// Reads a CSV source into drafts. Bad rows are logged and counted, never
/// fatal; only an unreadable header or a missing name column fails.
pub fn parse_csv<R: Read>(source: R) -> Result<ParsedRows> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader
        .headers()
        .context("Failed to read CSV header row")?
        .clone();
    let columns = ColumnMap::from_headers(&headers);
    if !columns.has(Column::Name) {
        bail!("CSV has no name column");
    }

    let mut parsed = ParsedRows::default();
    for (index, record) in reader.records().enumerate() {
        // Header is line 1
        let line = index + 2;
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!("Skipping malformed row {}: {}", line, e);
                parsed.skipped += 1;
                continue;
            }
        };

        let draft = columns.draft(&record);
        match (&draft.name, &draft.category) {
            (None, _) => {
                debug!("Skipping row {}: no name", line);
                parsed.skipped += 1;
            }
            (Some(name), None) => {
                warn!("Skipping '{}' (row {}): no category", name, line);
                parsed.skipped += 1;
            }
            _ => parsed.drafts.push((line, draft)),
        }
    }

    Ok(parsed)
}

impl Importer {
    pub async fn import_csv(&self, path: &Path, replace: bool) -> Result<ImportSummary> {
        let file = File::open(path)
            .with_context(|| format!("CSV file not found at {}", path.display()))?;
        info!("Importing tools from {}...", path.display());

        let parsed = parse_csv(file)?;
        self.load(parsed, replace).await
    }

    /// Inserts parsed rows in a single transaction. A row the store rejects,
    /// such as a duplicate name, is skipped without undoing the others.
    pub async fn load(&self, parsed: ParsedRows, replace: bool) -> Result<ImportSummary> {
        let mut tx = self
            .db
            .pool
            .begin()
            .await
            .context("Failed to start import transaction")?;

        if replace {
            let removed = tool_repo::clear(&mut *tx).await?;
            info!("Cleared {} existing tools", removed);
        }

        let mut summary = ImportSummary {
            imported: 0,
            skipped: parsed.skipped,
        };

        for (line, draft) in &parsed.drafts {
            match tool_repo::insert(&mut *tx, draft).await {
                Ok(_) => {
                    summary.imported += 1;
                    if summary.imported % 10 == 0 {
                        info!("Imported {} tools...", summary.imported);
                    }
                }
                Err(e) => {
                    warn!(
                        "Error importing tool {} (row {}): {}",
                        draft.name.as_deref().unwrap_or("Unknown"),
                        line,
                        e
                    );
                    summary.skipped += 1;
                }
            }
        }

        tx.commit().await.context("Failed to commit import")?;
        info!(
            "Successfully imported {} tools ({} skipped)",
            summary.imported, summary.skipped
        );

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::Database;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const CATALOG: &str = "\
Name,Categories,Description,URL,Frameworks,Supported_Languages,Features,Native Integrations,Maturity Score,Popularity Score,Pricing
Cody,AI Assistant,Codebase-aware assistant,https://sourcegraph.com/cody,\"React, Vue\",\"Python, Go\",Chat,\"VS Code, JetBrains\",8,Not specified,Free
,AI Assistant,No name here,,,,,,,,
AI2sql,SQL Generator,Text to SQL,,Not specified,,\"SQL generation, Explain\",,15,7,
Orphan,,Missing category,,,,,,,,
Cody,Duplicate,Second Cody,,,,,,,,
";

    async fn importer() -> (Importer, std::sync::Arc<Database>) {
        let db = Database::connect_in_memory().await.unwrap();
        db.migrate().await.unwrap();
        (Importer::new(db.clone()), db)
    }

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_parse_skips_rows_without_name_or_category() {
        let parsed = parse_csv(CATALOG.as_bytes()).unwrap();

        let names: Vec<_> = parsed
            .drafts
            .iter()
            .map(|(_, d)| d.name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["Cody", "AI2sql", "Cody"]);
        assert_eq!(parsed.skipped, 2);
        assert_eq!(parsed.drafts[1].0, 4);
    }

    #[test]
    fn test_parse_requires_name_column() {
        assert!(parse_csv("Title,Category\nX,Y\n".as_bytes()).is_err());
    }

    #[tokio::test]
    async fn test_import_normalizes_and_survives_bad_rows() {
        let (importer, db) = importer().await;
        let file = csv_file(CATALOG);

        let summary = importer.import_csv(file.path(), false).await.unwrap();
        assert_eq!(
            summary,
            ImportSummary {
                imported: 2,
                skipped: 3
            }
        );

        let repo = db.tools();
        let cody = repo.find_by_name("Cody").await.unwrap().unwrap();
        assert_eq!(cody.category, "AI Assistant");
        assert_eq!(cody.frameworks, vec!["React", "Vue"]);
        assert_eq!(cody.supported_languages, vec!["Python", "Go"]);
        assert_eq!(cody.native_integrations, vec!["VS Code", "JetBrains"]);
        assert_eq!(cody.maturity_score, Some(8));
        assert_eq!(cody.popularity_score, None);
        assert_eq!(cody.pricing.as_deref(), Some("Free"));

        let sql = repo.find_by_name("AI2sql").await.unwrap().unwrap();
        assert!(sql.frameworks.is_empty());
        assert_eq!(sql.features, vec!["SQL generation", "Explain"]);
        assert_eq!(sql.maturity_score, None);
        assert_eq!(sql.popularity_score, Some(7));
        assert_eq!(sql.pricing, None);
    }

    #[tokio::test]
    async fn test_replace_clears_existing_tools() {
        let (importer, db) = importer().await;
        let file = csv_file(CATALOG);
        importer.import_csv(file.path(), false).await.unwrap();

        let again = importer.import_csv(file.path(), false).await.unwrap();
        assert_eq!(again.imported, 0);
        assert_eq!(db.tools().count().await.unwrap(), 2);

        let replaced = importer.import_csv(file.path(), true).await.unwrap();
        assert_eq!(replaced.imported, 2);
        assert_eq!(db.tools().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let (importer, _db) = importer().await;
        let err = importer
            .import_csv(Path::new("/nonexistent/catalog.csv"), false)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("CSV file not found"));
    }
}
