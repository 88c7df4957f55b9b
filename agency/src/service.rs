//! Application service: agency commands and rate queries over a repository.

use currency_convert_common::{now, AgencyId, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::agency::Agency;
use crate::config::ServiceConfig;
use crate::error::{ServiceError, ServiceResult, UpdateError};
use crate::rate::Rate;
use crate::repository::AgencyRepository;
use crate::strategy::UpdateStrategy;

/// Command to register a new agency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateAgency {
    pub name: String,
    pub base: String,
    pub address: String,
    pub country: String,
}

/// Query for a single resolved rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchOne {
    pub agency_name: String,
    pub currency_from: String,
    pub currency_to: String,
    #[serde(default)]
    pub start: Option<Timestamp>,
    #[serde(default)]
    pub end: Option<Timestamp>,
}

impl FetchOne {
    /// Query with no date bounds.
    pub fn new(
        agency_name: impl Into<String>,
        currency_from: impl Into<String>,
        currency_to: impl Into<String>,
    ) -> Self {
        Self {
            agency_name: agency_name.into(),
            currency_from: currency_from.into(),
            currency_to: currency_to.into(),
            start: None,
            end: None,
        }
    }

    /// Restrict the query to rates effective in `[start, end]`.
    pub fn within(mut self, start: Option<Timestamp>, end: Option<Timestamp>) -> Self {
        self.start = start;
        self.end = end;
        self
    }
}

/// Agency service.
pub struct AgencyService<R> {
    repository: R,
    config: ServiceConfig,
}

impl<R: AgencyRepository> AgencyService<R> {
    /// Create a new service over `repository`.
    pub fn new(repository: R, config: ServiceConfig) -> Self {
        Self { repository, config }
    }

    /// Get the configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Get the underlying repository.
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Register a new agency. Names are unique.
    #[instrument(skip(self, command), fields(name = %command.name, base = %command.base))]
    pub fn create_agency(&self, command: CreateAgency) -> ServiceResult<Agency> {
        if self.repository.find_by_name(&command.name)?.is_some() {
            return Err(ServiceError::AgencyExists(command.name));
        }

        let agency = Agency::create(
            &command.base,
            command.name,
            command.address,
            command.country,
        )?;
        self.repository.add(&agency)?;

        info!(id = %agency.id(), "Agency created");
        Ok(agency)
    }

    /// Pull a batch from `strategy` into the named agency and store it.
    #[instrument(skip(self, strategy), fields(strategy = strategy.name()))]
    pub fn update_by_name(&self, name: &str, strategy: &dyn UpdateStrategy) -> ServiceResult<()> {
        let agency = self
            .repository
            .find_by_name(name)?
            .ok_or_else(|| ServiceError::AgencyNotFound(name.to_string()))?;
        self.apply_update(agency, strategy)
    }

    /// Same as [`AgencyService::update_by_name`], looking the agency up by id.
    #[instrument(skip(self, strategy), fields(strategy = strategy.name()))]
    pub fn update_by_id(&self, id: AgencyId, strategy: &dyn UpdateStrategy) -> ServiceResult<()> {
        let agency = self
            .repository
            .find_by_id(id)?
            .ok_or_else(|| ServiceError::AgencyNotFound(id.to_string()))?;
        self.apply_update(agency, strategy)
    }

    /// Resolve one rate from a named agency.
    #[instrument(skip(self, query), fields(
        agency = %query.agency_name,
        from = %query.currency_from,
        to = %query.currency_to
    ))]
    pub fn fetch_one(&self, query: FetchOne) -> ServiceResult<Rate> {
        let agency = self.load(&query.agency_name)?;
        let window = self
            .config
            .default_window
            .resolve(query.start, query.end, now());
        let rate = agency.resolve(&query.currency_from, &query.currency_to, &window)?;
        Ok(rate)
    }

    /// Every rate of a named agency, most recent first.
    #[instrument(skip(self))]
    pub fn fetch_all(&self, agency_name: &str) -> ServiceResult<Vec<Rate>> {
        Ok(self.load(agency_name)?.list_rates())
    }

    /// Every registered agency, ordered by name.
    #[instrument(skip(self))]
    pub fn list_agencies(&self) -> ServiceResult<Vec<Agency>> {
        Ok(self.repository.find_all()?)
    }

    fn load(&self, name: &str) -> ServiceResult<Agency> {
        self.repository
            .find_by_name(name)?
            .ok_or_else(|| ServiceError::AgencyNotFound(name.to_string()))
    }

    fn apply_update(&self, mut agency: Agency, strategy: &dyn UpdateStrategy) -> ServiceResult<()> {
        match agency.update(strategy) {
            Ok(()) => {
                self.repository.save(&agency)?;
                Ok(())
            }
            Err(UpdateError::Rejected(entries)) if !self.config.strict_ingestion => {
                self.repository.save(&agency)?;
                Err(ServiceError::Ingestion(entries))
            }
            Err(UpdateError::Rejected(entries)) => {
                warn!(
                    agency = %agency.name(),
                    rejected = entries.len(),
                    "Discarding update in strict mode"
                );
                Err(ServiceError::Ingestion(entries))
            }
            Err(err) => Err(err.into()),
        }
    }
}
