pub mod error;
pub mod time_value;
pub mod types;
pub mod utils;

#[cfg(feature = "loans")]
pub mod loans;

#[cfg(feature = "deposits")]
pub mod deposits;

#[cfg(feature = "investments")]
pub mod investments;

#[cfg(feature = "cards")]
pub mod cards;

pub use error::FinCalcError;
pub use types::*;

/// Standard result type for all fincalc operations
pub type FinCalcResult<T> = Result<T, FinCalcError>;
