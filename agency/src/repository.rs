//! Agency persistence port and an in-memory adapter.

use std::collections::HashMap;
use std::sync::Arc;

use currency_convert_common::AgencyId;
use parking_lot::RwLock;

use crate::agency::Agency;
use crate::error::{RepositoryError, RepositoryResult};

/// Storage for agencies.
///
/// Implementations hand out owned copies. Changes to a loaded agency are
/// only visible to later loads once they have been passed to [`save`].
///
/// [`save`]: AgencyRepository::save
pub trait AgencyRepository: Send + Sync {
    /// Look up an agency by its unique name.
    fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Agency>>;

    /// Look up an agency by id.
    fn find_by_id(&self, id: AgencyId) -> RepositoryResult<Option<Agency>>;

    /// Store a new agency. Fails with `Conflict` if the id is already stored.
    fn add(&self, agency: &Agency) -> RepositoryResult<()>;

    /// Replace a stored agency. Fails with `NotFound` if it was never added.
    fn save(&self, agency: &Agency) -> RepositoryResult<()>;

    /// Every stored agency, ordered by name.
    fn find_all(&self) -> RepositoryResult<Vec<Agency>>;
}

impl<R: AgencyRepository + ?Sized> AgencyRepository for Arc<R> {
    fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Agency>> {
        (**self).find_by_name(name)
    }

    fn find_by_id(&self, id: AgencyId) -> RepositoryResult<Option<Agency>> {
        (**self).find_by_id(id)
    }

    fn add(&self, agency: &Agency) -> RepositoryResult<()> {
        (**self).add(agency)
    }

    fn save(&self, agency: &Agency) -> RepositoryResult<()> {
        (**self).save(agency)
    }

    fn find_all(&self) -> RepositoryResult<Vec<Agency>> {
        (**self).find_all()
    }
}

/// In-memory [`AgencyRepository`], keyed by agency id.
///
/// Clones share the same storage.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAgencyRepository {
    storage: Arc<RwLock<HashMap<AgencyId, Agency>>>,
}

impl InMemoryAgencyRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored agencies.
    pub fn len(&self) -> usize {
        self.storage.read().len()
    }

    /// Check if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.storage.read().is_empty()
    }

    /// Drop every stored agency.
    pub fn clear(&self) {
        self.storage.write().clear();
    }
}

impl AgencyRepository for InMemoryAgencyRepository {
    fn find_by_name(&self, name: &str) -> RepositoryResult<Option<Agency>> {
        let storage = self.storage.read();
        Ok(storage.values().find(|a| a.name() == name).cloned())
    }

    fn find_by_id(&self, id: AgencyId) -> RepositoryResult<Option<Agency>> {
        Ok(self.storage.read().get(&id).cloned())
    }

    fn add(&self, agency: &Agency) -> RepositoryResult<()> {
        let mut storage = self.storage.write();
        if storage.contains_key(&agency.id()) {
            return Err(RepositoryError::Conflict(agency.id().to_string()));
        }
        storage.insert(agency.id(), agency.clone());
        Ok(())
    }

    fn save(&self, agency: &Agency) -> RepositoryResult<()> {
        let mut storage = self.storage.write();
        match storage.get_mut(&agency.id()) {
            Some(slot) => {
                *slot = agency.clone();
                Ok(())
            }
            None => Err(RepositoryError::NotFound(agency.id().to_string())),
        }
    }

    fn find_all(&self) -> RepositoryResult<Vec<Agency>> {
        let mut agencies: Vec<Agency> = self.storage.read().values().cloned().collect();
        agencies.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(agencies)
    }
}
