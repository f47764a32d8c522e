use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("tool {0} not found")]
    NotFound(i64),

    #[error("a tool named '{0}' already exists")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl RepoError {
    /// Maps a failed write, turning a violation of the `name` uniqueness
    /// constraint into `Conflict`.
    pub(crate) fn on_write(err: sqlx::Error, name: Option<&str>) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepoError::Conflict(name.unwrap_or_default().to_string())
            }
            _ => RepoError::Database(err),
        }
    }
}
