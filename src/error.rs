use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ContentError>;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("database error: {0}")]
    Database(DbErr),

    #[error("search index error: {0}")]
    Search(#[from] anyhow::Error),

    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

impl From<DbErr> for ContentError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => {
                ContentError::Conflict(format!("Slug already exists ({detail})"))
            }
            _ => ContentError::Database(err),
        }
    }
}

impl ContentError {
    pub fn validation(message: impl Into<String>) -> Self {
        ContentError::Validation(message.into())
    }
}
