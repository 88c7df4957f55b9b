//! Currency Convert Agency
//!
//! Exchange rate agencies and the engine that resolves conversion rates
//! from the quotes they publish.
//!
//! # Features
//!
//! - Validated rate quotes at fixed eight decimal precision
//! - Best-effort batch ingestion from pluggable update strategies
//! - Direct, inverted and base-triangulated rate resolution
//! - Effective-date windows with deterministic tie-breaking
//! - Repository port with an in-memory adapter
//!
//! # Example
//!
//! ```rust,ignore
//! use currency_convert_agency::{AgencyService, CreateAgency, FetchOne};
//! use currency_convert_agency::{InMemoryAgencyRepository, MemoryUpdateStrategy, RawRate};
//!
//! let service = AgencyService::new(InMemoryAgencyRepository::new(), Default::default());
//! service.create_agency(CreateAgency {
//!     name: "Fed".into(),
//!     base: "USD".into(),
//!     address: "Washington".into(),
//!     country: "US".into(),
//! })?;
//!
//! let feed = MemoryUpdateStrategy::new(vec![
//!     RawRate::new("USD", "EUR", "0.85", "2023-10-01"),
//!     RawRate::new("USD", "JPY", "150.00", "2023-10-01"),
//! ]);
//! service.update_by_name("Fed", &feed)?;
//!
//! let eur_jpy = service.fetch_one(FetchOne::new("Fed", "EUR", "JPY"))?;
//! ```

pub mod agency;
pub mod config;
pub mod error;
pub mod rate;
pub mod repository;
pub mod service;
pub mod strategy;
pub mod window;

pub use agency::Agency;
pub use config::ServiceConfig;
pub use error::{
    CreationError, ErrorKind, FeedError, NotFoundReason, RateNotFoundError, RepositoryError,
    ServiceError, UnprocessableEntry, UpdateError,
};
pub use rate::Rate;
pub use repository::{AgencyRepository, InMemoryAgencyRepository};
pub use service::{AgencyService, CreateAgency, FetchOne};
pub use strategy::{MemoryUpdateStrategy, RawRate, UpdateStrategy};
pub use window::{DateWindow, WindowDefault};
