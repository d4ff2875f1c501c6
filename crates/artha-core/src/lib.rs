//! Personal-finance calculation engine.
//!
//! Pure, synchronous functions for equated monthly installments and
//! amortization, tiered marginal tax, compound growth and proportional
//! allocation. Inputs and outputs are plain values; nothing here knows about
//! presentation, locale or persistence.

pub mod error;
pub mod time_value;
pub mod types;

#[cfg(feature = "loans")]
pub mod loans;

#[cfg(feature = "allocation")]
pub mod allocation;

#[cfg(feature = "tax")]
pub mod tax;

#[cfg(feature = "wealth")]
pub mod wealth;

pub use error::ArthaError;
pub use types::*;

/// Standard result type for all engine operations
pub type ArthaResult<T> = Result<T, ArthaError>;
