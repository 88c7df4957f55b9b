//! The agency aggregate and the rate resolution engine.

use currency_convert_common::{AgencyId, CurrencyCode, DecimalLike, Timestamp, ValidationResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CreationError, RateNotFoundError, UnprocessableEntry, UpdateError};
use crate::rate::Rate;
use crate::strategy::{RawRate, UpdateStrategy};
use crate::window::DateWindow;

/// A currency agency: a base currency plus every rate it has published
/// against that base.
///
/// The agency owns its rates exclusively. They can only be added through
/// [`Agency::add_rate`] and friends, and queries hand out copies or shared
/// references, never mutable access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    id: AgencyId,
    name: String,
    base: CurrencyCode,
    address: String,
    country: String,
    rates: Vec<Rate>,
}

impl Agency {
    /// Create a new agency with no rates.
    pub fn create(
        base: &str,
        name: impl Into<String>,
        address: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self, CreationError> {
        let base = CurrencyCode::create(base)?;
        Ok(Self::from_parts(
            AgencyId::new(),
            name,
            base,
            address,
            country,
            Vec::new(),
        ))
    }

    /// Rebuild an agency from stored state.
    pub fn from_parts(
        id: AgencyId,
        name: impl Into<String>,
        base: CurrencyCode,
        address: impl Into<String>,
        country: impl Into<String>,
        rates: Vec<Rate>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            base,
            address: address.into(),
            country: country.into(),
            rates,
        }
    }

    /// Get the agency ID.
    pub fn id(&self) -> AgencyId {
        self.id
    }

    /// Get the unique agency name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the currency every direct quote is expressed against.
    pub fn base(&self) -> &CurrencyCode {
        &self.base
    }

    /// Get the postal address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Get the country.
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Number of stored rates.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check if no rates are stored.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Validate and store a single rate. Duplicates are kept.
    ///
    /// On failure nothing is stored. A quote whose source currency is not
    /// the base is stored but never used for resolution.
    pub fn add_rate(
        &mut self,
        currency_from: &str,
        currency_to: &str,
        rate: impl DecimalLike,
        effective_at: &str,
    ) -> ValidationResult<()> {
        let rate = Rate::create(currency_from, currency_to, rate, effective_at)?;
        if !self.is_base_quote(&rate) {
            warn!(
                agency = %self.name,
                base = %self.base,
                %rate,
                "Stored rate is not quoted against the base and cannot be resolved"
            );
        }
        self.rates.push(rate);
        Ok(())
    }

    /// Ingest a batch, best effort.
    ///
    /// Every record that validates is stored. Records that fail are
    /// collected, and if there are any the call returns them as an error,
    /// but the valid records from the same batch remain stored.
    pub fn add_rates<I>(&mut self, batch: I) -> Result<(), Vec<UnprocessableEntry>>
    where
        I: IntoIterator<Item = RawRate>,
    {
        let mut rejected = Vec::new();
        let mut accepted = 0usize;

        for (index, raw) in batch.into_iter().enumerate() {
            match self.add_rate(&raw.currency_from, &raw.currency_to, raw.rate.as_str(), &raw.date) {
                Ok(()) => accepted += 1,
                Err(error) => {
                    warn!(
                        agency = %self.name,
                        index,
                        error = %error,
                        "Rejected raw rate"
                    );
                    rejected.push(UnprocessableEntry { index, raw, error });
                }
            }
        }

        info!(
            agency = %self.name,
            accepted,
            rejected = rejected.len(),
            "Ingested rate batch"
        );

        if rejected.is_empty() {
            Ok(())
        } else {
            Err(rejected)
        }
    }

    /// Pull one batch from `strategy` and ingest it with [`Agency::add_rates`].
    pub fn update(&mut self, strategy: &dyn UpdateStrategy) -> Result<(), UpdateError> {
        let batch = strategy.fetch()?;
        debug!(
            agency = %self.name,
            strategy = strategy.name(),
            records = batch.len(),
            "Fetched update batch"
        );
        self.add_rates(batch).map_err(UpdateError::Rejected)
    }

    /// Resolve the rate from `from` to `to` with optional effective-date
    /// bounds. Omitted bounds are open, so with no dates the newest stored
    /// rate is used.
    pub fn get_rate(
        &self,
        from: &str,
        to: &str,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<Rate, RateNotFoundError> {
        self.resolve(from, to, &DateWindow::new(start, end))
    }

    /// Resolve the rate from `from` to `to` within `window`.
    ///
    /// - `from` is the base: newest direct quote for `to`.
    /// - `to` is the base: newest direct quote for `from`, inverted.
    /// - otherwise: both quotes, composed through the base.
    pub fn resolve(&self, from: &str, to: &str, window: &DateWindow) -> Result<Rate, RateNotFoundError> {
        if self.base == from {
            debug!(agency = %self.name, from, to, %window, "Resolving direct rate");
            return self
                .latest_quote(to, window)
                .cloned()
                .ok_or_else(|| RateNotFoundError::no_match(from, to));
        }

        if self.base == to {
            debug!(agency = %self.name, from, to, %window, "Resolving inverted rate");
            let quote = self
                .latest_quote(from, window)
                .ok_or_else(|| RateNotFoundError::no_match(from, to))?;
            return quote
                .invert()
                .map_err(|e| RateNotFoundError::invalid(from, to, e));
        }

        debug!(agency = %self.name, from, to, %window, "Triangulating through base");
        let into_base = self
            .latest_quote(from, window)
            .ok_or_else(|| RateNotFoundError::no_match(from, to))?
            .invert()
            .map_err(|e| RateNotFoundError::invalid(from, to, e))?;
        let out_of_base = self
            .latest_quote(to, window)
            .ok_or_else(|| RateNotFoundError::no_match(from, to))?;

        out_of_base
            .multiply(&into_base)
            .map_err(|e| RateNotFoundError::invalid(from, to, e))
    }

    /// Stored rates matching `predicate`, most recent first.
    pub fn get_rates<P>(&self, predicate: P) -> Vec<&Rate>
    where
        P: Fn(&Rate) -> bool,
    {
        let mut matched: Vec<(usize, &Rate)> = self
            .rates
            .iter()
            .enumerate()
            .filter(|(_, rate)| predicate(*rate))
            .collect();
        matched.sort_by(|(ia, a), (ib, b)| {
            b.effective_at()
                .cmp(&a.effective_at())
                .then_with(|| ib.cmp(ia))
        });
        matched.into_iter().map(|(_, rate)| rate).collect()
    }

    /// Every stored rate, most recent first.
    pub fn list_rates(&self) -> Vec<Rate> {
        self.get_rates(|_| true).into_iter().cloned().collect()
    }

    /// Whether `rate` quotes the base currency, so resolution can use it.
    pub fn is_base_quote(&self, rate: &Rate) -> bool {
        rate.currency_from() == &self.base
    }

    /// Newest base-relative quote for `currency` within `window`. Among
    /// quotes with the same effective time the last one stored wins.
    fn latest_quote(&self, currency: &str, window: &DateWindow) -> Option<&Rate> {
        self.rates
            .iter()
            .enumerate()
            .filter(|(_, rate)| {
                self.is_base_quote(rate)
                    && *rate.currency_to() == currency
                    && window.contains(rate.effective_at())
            })
            .max_by_key(|(index, rate)| (rate.effective_at(), *index))
            .map(|(_, rate)| rate)
    }
}
