//! Currency Convert Common Types
//!
//! Value objects shared by the conversion engine: currency codes, fixed
//! precision amounts, timestamps, identifiers and the validation errors
//! raised while building them.

pub mod currency;
pub mod error;
pub mod identifiers;
pub mod monetary;
pub mod time;

pub use currency::*;
pub use error::*;
pub use identifiers::*;
pub use monetary::*;
pub use time::*;
