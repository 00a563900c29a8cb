//! Random quote selection per locale.

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    models::quotes::{LocaleId, Quote},
    store::{QuoteStore, StoreError},
};

/// how a uniform random number is mapped onto a quote index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PickStrategy {
    /// every index is equally likely.
    #[default]
    Uniform,
    /// `round(r * (len - 1))`. the first and last index get half the weight
    /// of the others.
    Rounded,
}

impl PickStrategy {
    /// `len` must be non-zero. the result is always in `0..len`.
    pub fn choose_index<R: Rng + ?Sized>(self, len: usize, rng: &mut R) -> usize {
        debug_assert!(len > 0);

        match self {
            PickStrategy::Uniform => rng.gen_range(0..len),
            PickStrategy::Rounded => rounded_index(rng.gen::<f64>(), len),
        }
    }
}

impl std::str::FromStr for PickStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "uniform" => Ok(PickStrategy::Uniform),
            "rounded" => Ok(PickStrategy::Rounded),
            other => Err(format!("unknown pick strategy \"{other}\"")),
        }
    }
}

fn rounded_index(r: f64, len: usize) -> usize {
    let last = len.saturating_sub(1);

    ((r * last as f64).round() as usize).min(last)
}

#[derive(Clone, Debug)]
pub struct QuoteSelector<S> {
    store: S,
    strategy: PickStrategy,
}

impl<S: QuoteStore> QuoteSelector<S> {
    pub fn new(store: S, strategy: PickStrategy) -> Self {
        Self { store, strategy }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn pick_random(&self, locale_id: LocaleId) -> Result<Option<Quote>, StoreError> {
        // the thread rng is !Send and cannot be held across the store read.
        self.pick_random_with(locale_id, &mut StdRng::from_entropy()).await
    }

    pub async fn pick_random_with<R: Rng + Send + ?Sized>(
        &self,
        locale_id: LocaleId,
        rng: &mut R,
    ) -> Result<Option<Quote>, StoreError> {
        let quotes = self.store.find_all_by_locale(locale_id).await?;

        Ok(self.choose(quotes, rng))
    }

    fn choose<R: Rng + ?Sized>(&self, mut quotes: Vec<Quote>, rng: &mut R) -> Option<Quote> {
        if quotes.is_empty() {
            return None;
        }

        let idx = self.strategy.choose_index(quotes.len(), rng);
        tracing::debug!(idx, total = quotes.len(), "picked quote");

        Some(quotes.swap_remove(idx))
    }
}
