//! Persistence for quotes and the locales they belong to.
//!
//! Failures are reported as [`StoreError`]; `Ok(None)` and an empty `Vec`
//! always mean the rows are genuinely absent.

use async_trait::async_trait;

use crate::models::quotes::{Locale, LocaleId, NewQuote, Quote, QuoteFields, QuoteId};

pub mod sqlite;

pub use sqlite::SqliteQuoteStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

#[async_trait]
pub trait QuoteStore: Send + Sync {
    /// returns the quote with the given id, or `None` if it was never created or was deleted.
    async fn find_by_id(&self, id: QuoteId) -> Result<Option<Quote>, StoreError>;

    /// returns every quote tagged with `locale_id`. order is implementation-defined.
    async fn find_all_by_locale(&self, locale_id: LocaleId) -> Result<Vec<Quote>, StoreError>;

    async fn create(&self, quote: NewQuote) -> Result<Quote, StoreError>;

    /// replaces text, author and origin. id and locale are left untouched.
    async fn update(&self, id: QuoteId, fields: QuoteFields)
        -> Result<Option<Quote>, StoreError>;

    /// hard delete; returns whether a row was removed.
    async fn delete(&self, id: QuoteId) -> Result<bool, StoreError>;

    async fn count(&self) -> Result<i64, StoreError>;

    async fn count_by_locale(&self, locale_id: LocaleId) -> Result<i64, StoreError>;

    async fn find_locale(&self, code: &str) -> Result<Option<Locale>, StoreError>;

    /// looks up a locale by code, registering it first if needed.
    async fn ensure_locale(&self, code: &str) -> Result<Locale, StoreError>;
}
