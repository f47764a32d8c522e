use crate::error::RepoError;
use crate::models::{Tool, ToolDraft, ToolRow};
use chrono::Utc;
use shared::normalize::to_storage;
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};
use std::collections::BTreeMap;

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const MAX_PER_PAGE: i64 = 100;

const SELECT_TOOLS: &str = "SELECT * FROM developer_tools WHERE 1 = 1";

/// Filters for the paginated listing.
#[derive(Debug, Clone, Default)]
pub struct ToolFilter {
    pub category: Option<String>,
    pub search: Option<String>,
    pub page: i64,
    pub per_page: i64,
}

impl ToolFilter {
    /// 1-indexed page, never below 1.
    pub fn page(&self) -> i64 {
        self.page.max(1)
    }

    pub fn per_page(&self) -> i64 {
        self.per_page.clamp(1, MAX_PER_PAGE)
    }

    fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.per_page())
    }
}

/// Criteria for the unpaginated advanced search. Every supplied criterion must
/// hold; within `frameworks` and `languages` any one member is enough.
#[derive(Debug, Clone, Default)]
pub struct SearchCriteria {
    pub text: Option<String>,
    pub category: Option<String>,
    pub min_maturity: Option<i64>,
    pub min_popularity: Option<i64>,
    pub frameworks: Vec<String>,
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogStats {
    pub total_tools: i64,
    pub total_categories: i64,
    pub category_breakdown: BTreeMap<String, i64>,
}

#[derive(Clone)]
pub struct ToolRepository {
    pool: SqlitePool,
}

impl ToolRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// One page of tools in insertion order, plus the total match count.
    pub async fn list(&self, filter: &ToolFilter) -> Result<(Vec<Tool>, i64), RepoError> {
        let mut count =
            QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM developer_tools WHERE 1 = 1");
        push_list_filters(&mut count, filter);
        let total = count
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await?;

        let mut select = QueryBuilder::<Sqlite>::new(SELECT_TOOLS);
        push_list_filters(&mut select, filter);
        select
            .push(" ORDER BY id ASC LIMIT ")
            .push_bind(filter.per_page())
            .push(" OFFSET ")
            .push_bind(filter.offset());

        let rows = select
            .build_query_as::<ToolRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok((rows.into_iter().map(Tool::from).collect(), total))
    }

    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Tool>, RepoError> {
        let mut select = QueryBuilder::<Sqlite>::new(SELECT_TOOLS);

        if let Some(text) = non_blank(&criteria.text) {
            push_text_search(&mut select, text);
        }
        if let Some(category) = non_blank(&criteria.category) {
            select.push(" AND category LIKE ");
            push_like(&mut select, category);
        }
        if let Some(min) = criteria.min_maturity {
            select.push(" AND maturity_score >= ").push_bind(min);
        }
        if let Some(min) = criteria.min_popularity {
            select.push(" AND popularity_score >= ").push_bind(min);
        }
        push_any_of(&mut select, "frameworks", &criteria.frameworks);
        push_any_of(&mut select, "supported_languages", &criteria.languages);
        select.push(" ORDER BY id ASC");

        let rows = select
            .build_query_as::<ToolRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Tool::from).collect())
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<Tool>, RepoError> {
        let row = sqlx::query_as::<_, ToolRow>("SELECT * FROM developer_tools WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Tool::from))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Tool, RepoError> {
        self.find_by_id(id).await?.ok_or(RepoError::NotFound(id))
    }

    /// Exact, case-sensitive name lookup.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<Tool>, RepoError> {
        let row = sqlx::query_as::<_, ToolRow>("SELECT * FROM developer_tools WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Tool::from))
    }

    /// Distinct non-empty categories in ascending order.
    pub async fn distinct_categories(&self) -> Result<Vec<String>, RepoError> {
        let categories = sqlx::query_scalar::<_, String>(
            r#"
            SELECT DISTINCT category
            FROM developer_tools
            WHERE category IS NOT NULL AND category <> ''
            ORDER BY category ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    /// Inserts a new tool. The name pre-check gives the common case a clean
    /// error; the UNIQUE constraint still decides concurrent inserts.
    pub async fn create(&self, draft: &ToolDraft) -> Result<Tool, RepoError> {
        if let Some(name) = &draft.name {
            if self.find_by_name(name).await?.is_some() {
                return Err(RepoError::Conflict(name.clone()));
            }
        }
        insert(&self.pool, draft).await
    }

    /// Applies only the fields present in `draft` and bumps `updated_at`.
    pub async fn update(&self, id: i64, draft: &ToolDraft) -> Result<Tool, RepoError> {
        let mut update =
            QueryBuilder::<Sqlite>::new("UPDATE developer_tools SET updated_at = ");
        update.push_bind(Utc::now());

        if let Some(name) = &draft.name {
            update.push(", name = ").push_bind(name.clone());
        }
        if let Some(category) = &draft.category {
            update.push(", category = ").push_bind(category.clone());
        }
        if let Some(description) = &draft.description {
            update.push(", description = ").push_bind(description.clone());
        }
        if let Some(url) = &draft.url {
            update.push(", url = ").push_bind(url.clone());
        }
        if let Some(pricing) = &draft.pricing {
            update.push(", pricing = ").push_bind(pricing.clone());
        }
        for (column, items) in list_columns(draft) {
            if let Some(items) = items {
                update
                    .push(", ")
                    .push(column)
                    .push(" = ")
                    .push_bind(to_storage(items));
            }
        }
        if let Some(score) = draft.maturity_score {
            update.push(", maturity_score = ").push_bind(score);
        }
        if let Some(score) = draft.popularity_score {
            update.push(", popularity_score = ").push_bind(score);
        }
        update.push(" WHERE id = ").push_bind(id).push(" RETURNING *");

        let row = update
            .build_query_as::<ToolRow>()
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::on_write(e, draft.name.as_deref()))?;

        row.map(Tool::from).ok_or(RepoError::NotFound(id))
    }

    pub async fn delete(&self, id: i64) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM developer_tools WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    pub async fn count(&self) -> Result<i64, RepoError> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM developer_tools")
            .fetch_one(&self.pool)
            .await?;
        Ok(total)
    }

    pub async fn stats(&self) -> Result<CatalogStats, RepoError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT category, COUNT(id)
            FROM developer_tools
            GROUP BY category
            ORDER BY category ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let category_breakdown: BTreeMap<String, i64> = rows.into_iter().collect();
        Ok(CatalogStats {
            total_tools: category_breakdown.values().sum(),
            total_categories: category_breakdown.len() as i64,
            category_breakdown,
        })
    }
}

/// Inserts one tool through any executor, so bulk loads can run inside a
/// transaction. Requires `name` and `category`.
pub async fn insert<'c, E>(executor: E, draft: &ToolDraft) -> Result<Tool, RepoError>
where
    E: Executor<'c, Database = Sqlite>,
{
    let (Some(name), Some(category)) = (&draft.name, &draft.category) else {
        return Err(RepoError::Validation(
            "Name and category are required".to_string(),
        ));
    };
    let now = Utc::now();
    let list = |items: &Option<Vec<String>>| to_storage(items.as_deref().unwrap_or_default());

    let row = sqlx::query_as::<_, ToolRow>(
        r#"
        INSERT INTO developer_tools (
            name, category, description, url,
            frameworks, supported_languages, features, native_integrations,
            verified_integrations, notable_strengths, known_limitations,
            maturity_score, popularity_score, pricing, created_at, updated_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING *
        "#,
    )
    .bind(name)
    .bind(category)
    .bind(draft.description.clone().flatten())
    .bind(draft.url.clone().flatten())
    .bind(list(&draft.frameworks))
    .bind(list(&draft.supported_languages))
    .bind(list(&draft.features))
    .bind(list(&draft.native_integrations))
    .bind(list(&draft.verified_integrations))
    .bind(list(&draft.notable_strengths))
    .bind(list(&draft.known_limitations))
    .bind(draft.maturity_score.flatten())
    .bind(draft.popularity_score.flatten())
    .bind(draft.pricing.clone().flatten())
    .bind(now)
    .bind(now)
    .fetch_one(executor)
    .await
    .map_err(|e| RepoError::on_write(e, Some(name)))?;

    Ok(Tool::from(row))
}

/// Removes every tool. Used by replacing imports.
pub async fn clear<'c, E>(executor: E) -> Result<u64, RepoError>
where
    E: Executor<'c, Database = Sqlite>,
{
    let result = sqlx::query("DELETE FROM developer_tools")
        .execute(executor)
        .await?;
    Ok(result.rows_affected())
}

fn list_columns(draft: &ToolDraft) -> [(&'static str, &Option<Vec<String>>); 7] {
    [
        ("frameworks", &draft.frameworks),
        ("supported_languages", &draft.supported_languages),
        ("features", &draft.features),
        ("native_integrations", &draft.native_integrations),
        ("verified_integrations", &draft.verified_integrations),
        ("notable_strengths", &draft.notable_strengths),
        ("known_limitations", &draft.known_limitations),
    ]
}

fn push_list_filters(query: &mut QueryBuilder<'_, Sqlite>, filter: &ToolFilter) {
    if let Some(category) = non_blank(&filter.category) {
        query.push(" AND category LIKE ");
        push_like(query, category);
    }
    if let Some(text) = non_blank(&filter.search) {
        push_text_search(query, text);
    }
}

/// Substring match over name, description and the raw features text. Hits
/// inside the stored JSON syntax are accepted.
fn push_text_search(query: &mut QueryBuilder<'_, Sqlite>, text: &str) {
    query.push(" AND (name LIKE ");
    push_like(query, text);
    query.push(" OR description LIKE ");
    push_like(query, text);
    query.push(" OR features LIKE ");
    push_like(query, text);
    query.push(")");
}

fn push_any_of(query: &mut QueryBuilder<'_, Sqlite>, column: &'static str, terms: &[String]) {
    let terms: Vec<&str> = terms
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if terms.is_empty() {
        return;
    }

    query.push(" AND (");
    for (i, term) in terms.into_iter().enumerate() {
        if i > 0 {
            query.push(" OR ");
        }
        query.push(column).push(" LIKE ");
        push_like(query, term);
    }
    query.push(")");
}

/// Binds a case-insensitive `%term%` pattern with LIKE wildcards escaped.
fn push_like(query: &mut QueryBuilder<'_, Sqlite>, term: &str) {
    query.push_bind(like_pattern(term)).push(" ESCAPE '\\'");
}

fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
