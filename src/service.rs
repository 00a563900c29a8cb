use crate::{
    models::quotes::{NewQuote, Quote, QuoteFields, QuoteId},
    selector::{PickStrategy, QuoteSelector},
    store::{QuoteStore, StoreError},
};

/// everything the commands need from the quote store, keyed by locale code.
#[derive(Clone, Debug)]
pub struct QuoteService<S> {
    selector: QuoteSelector<S>,
}

impl<S: QuoteStore> QuoteService<S> {
    pub fn new(store: S, strategy: PickStrategy) -> Self {
        Self {
            selector: QuoteSelector::new(store, strategy),
        }
    }

    fn store(&self) -> &S {
        self.selector.store()
    }

    /// a locale nobody has written a quote for yet has no quotes to pick from.
    pub async fn random_quote(&self, locale: &str) -> Result<Option<Quote>, StoreError> {
        match self.store().find_locale(locale).await? {
            Some(locale) => self.selector.pick_random(locale.id).await,
            None => Ok(None),
        }
    }

    pub async fn quotes_for_locale(&self, locale: &str) -> Result<Vec<Quote>, StoreError> {
        match self.store().find_locale(locale).await? {
            Some(locale) => self.store().find_all_by_locale(locale.id).await,
            None => Ok(vec![]),
        }
    }

    pub async fn quote(&self, id: QuoteId) -> Result<Option<Quote>, StoreError> {
        self.store().find_by_id(id).await
    }

    pub async fn add_quote(&self, locale: &str, fields: QuoteFields) -> Result<Quote, StoreError> {
        let locale = self.store().ensure_locale(locale).await?;

        let quote = self
            .store()
            .create(NewQuote {
                locale_id: locale.id,
                fields: fields.normalized(),
            })
            .await?;

        tracing::info!(id = quote.id, locale = %locale.code, "added quote");
        Ok(quote)
    }

    pub async fn edit_quote(
        &self,
        id: QuoteId,
        fields: QuoteFields,
    ) -> Result<Option<Quote>, StoreError> {
        let quote = self.store().update(id, fields.normalized()).await?;

        if quote.is_some() {
            tracing::info!(id, "edited quote");
        }

        Ok(quote)
    }

    pub async fn delete_quote(&self, id: QuoteId) -> Result<bool, StoreError> {
        let deleted = self.store().delete(id).await?;

        if deleted {
            tracing::info!(id, "deleted quote");
        }

        Ok(deleted)
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        self.store().count().await
    }

    pub async fn count_for_locale(&self, locale: &str) -> Result<i64, StoreError> {
        match self.store().find_locale(locale).await? {
            Some(locale) => self.store().count_by_locale(locale.id).await,
            None => Ok(0),
        }
    }
}
