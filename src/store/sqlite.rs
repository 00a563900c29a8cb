use async_trait::async_trait;
use sqlx::{Pool, Sqlite};

use super::{QuoteStore, StoreError};
use crate::models::quotes::{Locale, LocaleId, NewQuote, Quote, QuoteFields, QuoteId};

#[derive(Clone, Debug)]
pub struct SqliteQuoteStore {
    db: Pool<Sqlite>,
}

impl SqliteQuoteStore {
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    pub async fn migrate(&self) -> Result<(), StoreError> {
        tracing::info!("running migrations...");
        sqlx::migrate!("./migrations").run(&self.db).await?;
        tracing::info!("finished running migrations!");

        Ok(())
    }
}

#[async_trait]
impl QuoteStore for SqliteQuoteStore {
    #[tracing::instrument(level = "debug", skip(self))]
    async fn find_by_id(&self, id: QuoteId) -> Result<Option<Quote>, StoreError> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
                SELECT
                    id, locale_id, text, author, origin
                FROM quotes
                WHERE id = $1;
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(quote)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn find_all_by_locale(&self, locale_id: LocaleId) -> Result<Vec<Quote>, StoreError> {
        let quotes = sqlx::query_as::<_, Quote>(
            r#"
                SELECT
                    id, locale_id, text, author, origin
                FROM quotes
                WHERE locale_id = $1
                ORDER BY id;
            "#,
        )
        .bind(locale_id)
        .fetch_all(&self.db)
        .await?;

        Ok(quotes)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn create(&self, quote: NewQuote) -> Result<Quote, StoreError> {
        let NewQuote { locale_id, fields } = quote;

        let quote = sqlx::query_as::<_, Quote>(
            r#"
                INSERT INTO
                    quotes (locale_id, text, author, origin)
                VALUES
                    ($1, $2, $3, $4)
                RETURNING
                    id, locale_id, text, author, origin;
            "#,
        )
        .bind(locale_id)
        .bind(fields.text)
        .bind(fields.author)
        .bind(fields.origin)
        .fetch_one(&self.db)
        .await?;

        Ok(quote)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn update(
        &self,
        id: QuoteId,
        fields: QuoteFields,
    ) -> Result<Option<Quote>, StoreError> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
                UPDATE quotes
                SET
                    text = $2,
                    author = $3,
                    origin = $4
                WHERE id = $1
                RETURNING
                    id, locale_id, text, author, origin;
            "#,
        )
        .bind(id)
        .bind(fields.text)
        .bind(fields.author)
        .bind(fields.origin)
        .fetch_optional(&self.db)
        .await?;

        Ok(quote)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn delete(&self, id: QuoteId) -> Result<bool, StoreError> {
        let result = sqlx::query(
            r#"
                DELETE FROM quotes
                WHERE id = $1;
            "#,
        )
        .bind(id)
        .execute(&self.db)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM quotes;")
            .fetch_one(&self.db)
            .await?;

        Ok(count)
    }

    async fn count_by_locale(&self, locale_id: LocaleId) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
                SELECT COUNT(*) FROM quotes
                WHERE locale_id = $1;
            "#,
        )
        .bind(locale_id)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn find_locale(&self, code: &str) -> Result<Option<Locale>, StoreError> {
        let locale = sqlx::query_as::<_, Locale>(
            r#"
                SELECT
                    id, code
                FROM locales
                WHERE code = $1;
            "#,
        )
        .bind(code)
        .fetch_optional(&self.db)
        .await?;

        Ok(locale)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    async fn ensure_locale(&self, code: &str) -> Result<Locale, StoreError> {
        // the no-op update makes RETURNING yield the existing row on conflict.
        let locale = sqlx::query_as::<_, Locale>(
            r#"
                INSERT INTO
                    locales (code)
                VALUES
                    ($1)
                ON CONFLICT (code) DO UPDATE SET code = excluded.code
                RETURNING
                    id, code;
            "#,
        )
        .bind(code)
        .fetch_one(&self.db)
        .await?;

        Ok(locale)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::str::FromStr;

    use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

    use super::*;

    /// a fresh in-memory database with the real schema applied.
    pub(crate) async fn memory_store() -> SqliteQuoteStore {
        let opts = SqliteConnectOptions::from_str("sqlite::memory:")
            .unwrap()
            .foreign_keys(true);
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(opts)
            .await
            .unwrap();

        let store = SqliteQuoteStore::new(db);
        store.migrate().await.unwrap();
        store
    }

    fn fields(text: &str, author: Option<&str>, origin: Option<&str>) -> QuoteFields {
        QuoteFields::new(text, author.map(String::from), origin.map(String::from))
    }

    #[tokio::test]
    async fn created_quote_round_trips_by_id() {
        let store = memory_store().await;
        let locale = store.ensure_locale("en-US").await.unwrap();

        let created = store
            .create(NewQuote {
                locale_id: locale.id,
                fields: fields("T", Some("A"), Some("O")),
            })
            .await
            .unwrap();

        assert!(created.id >= 0);

        let fetched = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);
        assert_eq!(fetched.text, "T");
        assert_eq!(fetched.author.as_deref(), Some("A"));
        assert_eq!(fetched.origin.as_deref(), Some("O"));
        assert_eq!(fetched.locale_id, locale.id);
    }

    #[tokio::test]
    async fn unknown_and_deleted_ids_are_absent() {
        let store = memory_store().await;
        let locale = store.ensure_locale("en-US").await.unwrap();

        assert_eq!(store.find_by_id(42).await.unwrap(), None);

        let created = store
            .create(NewQuote {
                locale_id: locale.id,
                fields: fields("gone soon", None, None),
            })
            .await
            .unwrap();

        assert!(store.delete(created.id).await.unwrap());
        assert_eq!(store.find_by_id(created.id).await.unwrap(), None);
        assert!(!store.delete(created.id).await.unwrap());
    }

    #[tokio::test]
    async fn find_all_by_locale_only_returns_that_locale() {
        let store = memory_store().await;
        let en = store.ensure_locale("en-US").await.unwrap();
        let vi = store.ensure_locale("vi").await.unwrap();

        for text in ["one", "two"] {
            store
                .create(NewQuote {
                    locale_id: en.id,
                    fields: fields(text, None, None),
                })
                .await
                .unwrap();
        }
        store
            .create(NewQuote {
                locale_id: vi.id,
                fields: fields("một", None, None),
            })
            .await
            .unwrap();

        let en_quotes = store.find_all_by_locale(en.id).await.unwrap();
        assert_eq!(en_quotes.len(), 2);
        assert!(en_quotes.iter().all(|q| q.locale_id == en.id));

        let vi_quotes = store.find_all_by_locale(vi.id).await.unwrap();
        assert_eq!(vi_quotes.len(), 1);

        assert!(store.find_all_by_locale(9999).await.unwrap().is_empty());
        assert_eq!(store.count().await.unwrap(), 3);

        assert_eq!(store.count_by_locale(en.id).await.unwrap(), 2);
        assert_eq!(store.count_by_locale(vi.id).await.unwrap(), 1);
        assert_eq!(store.count_by_locale(9999).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_keeps_id_and_locale() {
        let store = memory_store().await;
        let locale = store.ensure_locale("en-US").await.unwrap();
        let created = store
            .create(NewQuote {
                locale_id: locale.id,
                fields: fields("before", Some("someone"), None),
            })
            .await
            .unwrap();

        let updated = store
            .update(created.id, fields("after", None, Some("somewhere")))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.locale_id, created.locale_id);
        assert_eq!(updated.text, "after");
        assert_eq!(updated.author, None);
        assert_eq!(updated.origin.as_deref(), Some("somewhere"));

        assert_eq!(
            store.update(created.id + 1, fields("x", None, None)).await.unwrap(),
            None
        );
    }

    #[tokio::test]
    async fn quote_with_unknown_locale_is_rejected() {
        let store = memory_store().await;

        let result = store
            .create(NewQuote {
                locale_id: 12345,
                fields: fields("orphan", None, None),
            })
            .await;

        assert!(matches!(result, Err(StoreError::Database(_))));
    }

    #[tokio::test]
    async fn ensure_locale_is_idempotent() {
        let store = memory_store().await;

        assert_eq!(store.find_locale("ja").await.unwrap(), None);

        let first = store.ensure_locale("ja").await.unwrap();
        let second = store.ensure_locale("ja").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(store.find_locale("ja").await.unwrap(), Some(first));
    }
}
