//! Update strategies: sources of raw rate observations.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::debug;

use crate::error::{FeedError, FeedResult};

/// An unvalidated rate record as delivered by a feed.
///
/// Every field is a loose string. Missing fields deserialize as empty
/// strings and are rejected later, during ingestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRate {
    #[serde(default)]
    pub currency_from: String,
    #[serde(default)]
    pub currency_to: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub rate: String,
    #[serde(default)]
    pub date: String,
}

impl RawRate {
    /// Create a raw record.
    pub fn new(
        currency_from: impl Into<String>,
        currency_to: impl Into<String>,
        rate: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            currency_from: currency_from.into(),
            currency_to: currency_to.into(),
            rate: rate.into(),
            date: date.into(),
        }
    }
}

/// Feeds write rates either as JSON strings or as bare numbers.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// A source of raw rate batches for an agency.
pub trait UpdateStrategy {
    /// Name used in logs.
    fn name(&self) -> &str {
        "anonymous"
    }

    /// Produce the next batch of raw records.
    fn fetch(&self) -> FeedResult<Vec<RawRate>>;
}

impl<F> UpdateStrategy for F
where
    F: Fn() -> Vec<RawRate>,
{
    fn fetch(&self) -> FeedResult<Vec<RawRate>> {
        Ok(self())
    }
}

/// Strategy that always yields the same fixed batch.
#[derive(Debug, Clone, Default)]
pub struct MemoryUpdateStrategy {
    name: String,
    rates: Vec<RawRate>,
}

impl MemoryUpdateStrategy {
    /// Create a strategy over a fixed batch.
    pub fn new(rates: Vec<RawRate>) -> Self {
        Self {
            name: "memory".to_string(),
            rates,
        }
    }

    /// Load the batch from a JSON array of raw records.
    pub fn from_json(json: &str) -> FeedResult<Self> {
        let rates: Vec<RawRate> =
            serde_json::from_str(json).map_err(|e| FeedError::Malformed(e.to_string()))?;
        debug!(records = rates.len(), "Loaded raw rates from JSON");
        Ok(Self::new(rates))
    }

    /// Set the name used in logs.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Number of records in the batch.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Check if the batch is empty.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl UpdateStrategy for MemoryUpdateStrategy {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> FeedResult<Vec<RawRate>> {
        Ok(self.rates.clone())
    }
}
