use csv::StringRecord;
use database::models::ToolDraft;
use shared::normalize::{normalize_array_field, normalize_score, normalize_text};

/// A tool field that a spreadsheet column can feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Name,
    Category,
    Description,
    Url,
    Pricing,
    Frameworks,
    SupportedLanguages,
    Features,
    NativeIntegrations,
    VerifiedIntegrations,
    NotableStrengths,
    KnownLimitations,
    MaturityScore,
    PopularityScore,
}

impl Column {
    /// Matches a header case-insensitively, ignoring spaces, underscores and
    /// hyphens, so `Native Integrations`, `native_integrations` and
    /// `nativeIntegrations` are the same column.
    pub fn from_header(header: &str) -> Option<Self> {
        let key: String = header
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .flat_map(char::to_lowercase)
            .collect();

        let column = match key.as_str() {
            "name" => Column::Name,
            "category" | "categories" => Column::Category,
            "description" => Column::Description,
            "url" | "website" => Column::Url,
            "pricing" => Column::Pricing,
            "frameworks" => Column::Frameworks,
            "supportedlanguages" | "languages" => Column::SupportedLanguages,
            "features" => Column::Features,
            "nativeintegrations" => Column::NativeIntegrations,
            "verifiedintegrations" => Column::VerifiedIntegrations,
            "notablestrengths" => Column::NotableStrengths,
            "knownlimitations" => Column::KnownLimitations,
            "maturityscore" | "maturity" => Column::MaturityScore,
            "popularityscore" | "popularity" => Column::PopularityScore,
            _ => return None,
        };
        Some(column)
    }
}

/// Header positions resolved once per file.
#[derive(Debug, Clone)]
pub struct ColumnMap {
    columns: Vec<(usize, Column)>,
}

impl ColumnMap {
    /// Resolves headers. The first header wins when two map to one column.
    pub fn from_headers(headers: &StringRecord) -> Self {
        let mut columns: Vec<(usize, Column)> = Vec::new();
        for (index, header) in headers.iter().enumerate() {
            match Column::from_header(header) {
                Some(column) if !columns.iter().any(|(_, c)| *c == column) => {
                    columns.push((index, column));
                }
                Some(_) => tracing::warn!("Ignoring duplicate column '{}'", header),
                None => tracing::debug!("Ignoring unknown column '{}'", header),
            }
        }
        Self { columns }
    }

    pub fn has(&self, column: Column) -> bool {
        self.columns.iter().any(|(_, c)| *c == column)
    }

    /// Maps one row onto a draft. Columns missing from the file stay unset;
    /// list columns that are present always produce a (possibly empty) list.
    pub fn draft(&self, record: &StringRecord) -> ToolDraft {
        let mut draft = ToolDraft::default();

        for &(index, column) in &self.columns {
            let raw = record.get(index);
            match column {
                Column::Name => draft.name = normalize_text(raw),
                Column::Category => draft.category = normalize_text(raw),
                Column::Description => draft.description = Some(normalize_text(raw)),
                Column::Url => draft.url = Some(normalize_text(raw)),
                Column::Pricing => draft.pricing = Some(normalize_text(raw)),
                Column::Frameworks => draft.frameworks = Some(normalize_array_field(raw)),
                Column::SupportedLanguages => {
                    draft.supported_languages = Some(normalize_array_field(raw))
                }
                Column::Features => draft.features = Some(normalize_array_field(raw)),
                Column::NativeIntegrations => {
                    draft.native_integrations = Some(normalize_array_field(raw))
                }
                Column::VerifiedIntegrations => {
                    draft.verified_integrations = Some(normalize_array_field(raw))
                }
                Column::NotableStrengths => {
                    draft.notable_strengths = Some(normalize_array_field(raw))
                }
                Column::KnownLimitations => {
                    draft.known_limitations = Some(normalize_array_field(raw))
                }
                Column::MaturityScore => draft.maturity_score = Some(normalize_score(raw)),
                Column::PopularityScore => draft.popularity_score = Some(normalize_score(raw)),
            }
        }

        draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_variants() {
        assert_eq!(Column::from_header("Name"), Some(Column::Name));
        assert_eq!(Column::from_header("Categories"), Some(Column::Category));
        assert_eq!(
            Column::from_header("Native Integrations"),
            Some(Column::NativeIntegrations)
        );
        assert_eq!(
            Column::from_header("native_integrations"),
            Some(Column::NativeIntegrations)
        );
        assert_eq!(
            Column::from_header("supportedLanguages"),
            Some(Column::SupportedLanguages)
        );
        assert_eq!(
            Column::from_header(" Maturity-Score "),
            Some(Column::MaturityScore)
        );
        assert_eq!(Column::from_header("Notes"), None);
    }

    #[test]
    fn test_row_to_draft() {
        let headers = StringRecord::from(vec![
            "Name",
            "Categories",
            "Description",
            "Frameworks",
            "Known Limitations",
            "Maturity Score",
            "Popularity Score",
            "Notes",
        ]);
        let map = ColumnMap::from_headers(&headers);
        assert!(map.has(Column::Category));
        assert!(!map.has(Column::Url));

        let row = StringRecord::from(vec![
            " Cody ",
            "AI Assistant",
            "",
            "React, Vue",
            "Not specified",
            "8",
            "42",
            "ignored",
        ]);
        let draft = map.draft(&row);

        assert_eq!(draft.name.as_deref(), Some("Cody"));
        assert_eq!(draft.category.as_deref(), Some("AI Assistant"));
        assert_eq!(draft.description, Some(None));
        assert_eq!(draft.url, None);
        assert_eq!(draft.frameworks, Some(vec!["React".into(), "Vue".into()]));
        assert_eq!(draft.known_limitations, Some(vec![]));
        assert_eq!(draft.maturity_score, Some(Some(8)));
        assert_eq!(draft.popularity_score, Some(None));
    }

    #[test]
    fn test_short_rows_leave_fields_empty() {
        let headers = StringRecord::from(vec!["Name", "Categories", "Features"]);
        let map = ColumnMap::from_headers(&headers);
        let draft = map.draft(&StringRecord::from(vec!["Devin"]));

        assert_eq!(draft.name.as_deref(), Some("Devin"));
        assert_eq!(draft.category, None);
        assert_eq!(draft.features, Some(vec![]));
    }
}
